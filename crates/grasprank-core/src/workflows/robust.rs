use super::rank::validate_batch;
use crate::core::models::contact::ObjectPose;
use crate::core::models::hypothesis::GraspHypothesis;
use crate::core::models::layout::HypothesisLayout;
use crate::core::simulator::ContactSimulator;
use crate::engine::config::{PerturbationNormalization, RobustRankingConfig};
use crate::engine::error::EngineError;
use crate::engine::normalization::ScoreRanges;
use crate::engine::perturbation::PerturbationSampler;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::ranking::{RankedCandidate, RankingResult, sort_candidates};
use crate::engine::scoring::Scorer;
use crate::engine::tasks;
use rand::Rng;
use tracing::{debug, info, instrument};

/// Ranks a batch by robustness: each hypothesis is scored as the mean performance of randomly
/// perturbed copies of itself.
///
/// With [`PerturbationNormalization::PopulationRange`] the nominal batch is evaluated first and
/// its ranges are fixed for every perturbed sample. Hypotheses are processed in batch order from
/// the single `rng`, so a seeded generator yields a reproducible ranking.
#[instrument(skip_all, name = "robust_workflow", fields(hypotheses = batch.len()))]
pub fn run<S, R>(
    batch: &[GraspHypothesis],
    layout: &HypothesisLayout,
    simulator: &S,
    object_pose: &ObjectPose,
    config: &RobustRankingConfig,
    rng: &mut R,
    reporter: &ProgressReporter,
) -> Result<RankingResult, EngineError>
where
    S: ContactSimulator + ?Sized,
    R: Rng + ?Sized,
{
    config.perturbation.validate()?;
    let sampler = PerturbationSampler::new(&config.perturbation)?;
    validate_batch(batch, layout)?;
    if batch.is_empty() {
        info!("Empty batch; nothing to rank.");
        return Ok(RankingResult::default());
    }

    // === Pass 1: Nominal population ranges ===
    let (scorer, ranges) = match config.perturbation.normalization {
        PerturbationNormalization::PopulationRange => {
            let evaluations = reporter.phase("Evaluating Nominal Batch", || {
                tasks::raw_scores::run(batch, simulator, object_pose, reporter)
            });
            let raws: Vec<_> = evaluations.iter().map(|e| e.raw).collect();
            let ranges = ScoreRanges::from_scores(&raws).ok_or_else(|| {
                EngineError::Internal("no raw scores for a non-empty batch".to_string())
            })?;
            (Scorer::normalized(ranges, &config.scoring)?, Some(ranges))
        }
        PerturbationNormalization::Raw => (Scorer::unnormalized(&config.scoring), None),
    };

    // === Pass 2: Perturbed sampling ===
    reporter.report(Progress::PhaseStart {
        name: "Sampling Perturbations",
    });
    reporter.report(Progress::TaskStart {
        total_steps: batch.len() as u64,
    });
    let mut candidates = Vec::with_capacity(batch.len());
    for (batch_index, hypothesis) in batch.iter().enumerate() {
        let robust =
            sampler.robust_score(hypothesis, layout, simulator, object_pose, &scorer, rng);
        debug!(
            hypothesis = %hypothesis.id,
            performance = robust.performance,
            failures = robust.failures,
            "Scored perturbed neighbourhood."
        );
        candidates.push(RankedCandidate {
            hypothesis_id: hypothesis.id,
            batch_index,
            raw: robust.mean_raw,
            performance: robust.performance,
            failed: robust.failures == robust.samples,
        });
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    sort_candidates(&mut candidates);
    reporter.report(Progress::PhaseFinish);

    let result = RankingResult { candidates, ranges };
    info!(
        ranked = result.len(),
        samples = sampler.samples(),
        best = result.best().map(|c| c.performance),
        "Robust ranking complete."
    );
    Ok(result)
}
