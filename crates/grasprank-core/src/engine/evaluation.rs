use crate::core::models::contact::ObjectPose;
use crate::core::models::hypothesis::{GraspHypothesis, HypothesisId};
use crate::core::quality::metrics::{MetricError, QualityMetrics, evaluate_wrench};
use crate::core::quality::score::RawScore;
use crate::core::quality::wrench::build_wrench_matrix;
use crate::core::simulator::{ContactSimulator, SimulationFailure};
use nalgebra::Point3;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Why a hypothesis could not be scored. Either way it receives [`RawScore::ZERO`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationFailure {
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationFailure),
    #[error("malformed wrench matrix: {0}")]
    MalformedWrench(#[from] MetricError),
}

/// Outcome of evaluating a single hypothesis, before any population normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub hypothesis_id: HypothesisId,
    pub batch_index: usize,
    pub raw: RawScore,
    pub metrics: Option<QualityMetrics>,
    pub failure: Option<EvaluationFailure>,
}

impl Evaluation {
    fn failed(hypothesis_id: HypothesisId, batch_index: usize, failure: EvaluationFailure) -> Self {
        Self {
            hypothesis_id,
            batch_index,
            raw: RawScore::ZERO,
            metrics: None,
            failure: Some(failure),
        }
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// Runs the simulator on `hypothesis` and measures the wrench space of the resulting contacts.
///
/// Torques are taken about the object pose origin. Simulator failures and malformed wrenches
/// never escape; they are logged and recorded on the returned [`Evaluation`].
pub fn evaluate_hypothesis<S>(
    hypothesis: &GraspHypothesis,
    batch_index: usize,
    simulator: &S,
    object_pose: &ObjectPose,
) -> Evaluation
where
    S: ContactSimulator + ?Sized,
{
    let id = hypothesis.id;
    let contacts = match simulator.evaluate_contact(hypothesis, object_pose) {
        Ok(contacts) => contacts,
        Err(failure) => {
            debug!(hypothesis = %id, error = %failure, "Simulation failed; scoring as zero.");
            return Evaluation::failed(id, batch_index, failure.into());
        }
    };

    let reference = Point3::from(object_pose.translation.vector);
    let wrenches = build_wrench_matrix(&reference, &contacts);
    match evaluate_wrench(&wrenches) {
        Ok(metrics) => {
            trace!(
                hypothesis = %id,
                contacts = contacts.len(),
                rank = metrics.rank,
                sigma_min = metrics.sigma_min,
                "Evaluated hypothesis."
            );
            Evaluation {
                hypothesis_id: id,
                batch_index,
                raw: metrics.raw_score(),
                metrics: Some(metrics),
                failure: None,
            }
        }
        Err(error) => {
            warn!(hypothesis = %id, %error, "Malformed wrench matrix; scoring as zero.");
            Evaluation::failed(id, batch_index, error.into())
        }
    }
}
