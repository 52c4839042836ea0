use crate::core::models::contact::ObjectPose;
use crate::core::models::hypothesis::GraspHypothesis;
use crate::core::simulator::ContactSimulator;
use crate::engine::evaluation::{Evaluation, evaluate_hypothesis};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluates every hypothesis of the batch, returning one [`Evaluation`] per input in batch order.
#[instrument(skip_all, name = "raw_scores_task", fields(hypotheses = batch.len()))]
pub fn run<S>(
    batch: &[GraspHypothesis],
    simulator: &S,
    object_pose: &ObjectPose,
    reporter: &ProgressReporter,
) -> Vec<Evaluation>
where
    S: ContactSimulator + ?Sized,
{
    reporter.report(Progress::TaskStart {
        total_steps: batch.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = batch.iter().enumerate();

    #[cfg(feature = "parallel")]
    let iterator = batch.par_iter().enumerate();

    let evaluations: Vec<Evaluation> = iterator
        .map(|(index, hypothesis)| {
            let evaluation = evaluate_hypothesis(hypothesis, index, simulator, object_pose);
            reporter.report(Progress::TaskIncrement);
            evaluation
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let failures = evaluations.iter().filter(|e| e.is_failure()).count();
    info!(
        evaluated = evaluations.len(),
        failures, "Collected raw scores for the batch."
    );
    evaluations
}
