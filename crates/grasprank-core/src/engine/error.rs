use thiserror::Error;

use super::config::ConfigError;
use super::perturbation::PerturbationError;
use crate::core::models::hypothesis::HypothesisId;
use crate::core::models::layout::LayoutError;
use crate::core::quality::score::Metric;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Hypothesis does not match the batch layout: {source}")]
    Layout {
        #[from]
        source: LayoutError,
    },

    #[error("Perturbation sampler could not be initialized: {source}")]
    Perturbation {
        #[from]
        source: PerturbationError,
    },

    #[error("Hypothesis id {0} appears more than once in the batch")]
    DuplicateHypothesis(HypothesisId),

    #[error("Metric '{metric}' has a zero-width range [{min}, {max}] across the batch")]
    DegenerateRange { metric: Metric, min: f64, max: f64 },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
