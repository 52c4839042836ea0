use std::f64::consts::PI;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Weights of the three normalized metrics in the combined performance score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricWeights {
    pub sigma_min: f64,
    pub wrench_volume: f64,
    pub isotropy: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            sigma_min: 2.0,
            wrench_volume: 5.0,
            isotropy: 10.0,
        }
    }
}

/// What to do with a metric whose population range has zero width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DegenerateRangePolicy {
    /// Every candidate receives this normalized value for the metric.
    Constant(f64),
    /// Abort the ranking with an error.
    Reject,
}

impl Default for DegenerateRangePolicy {
    fn default() -> Self {
        DegenerateRangePolicy::Constant(0.0)
    }
}

/// How perturbed samples are brought onto a common scale before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PerturbationNormalization {
    /// Normalize against the ranges of the nominal (unperturbed) batch.
    #[default]
    PopulationRange,
    /// Weight the raw metric values directly.
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoringConfig {
    pub weights: MetricWeights,
    pub degenerate_range: DegenerateRangePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerturbationConfig {
    pub samples: usize,
    pub sigma_position: f64,
    pub sigma_angle: f64,
    pub normalization: PerturbationNormalization,
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        Self {
            samples: 5,
            sigma_position: 0.01,
            sigma_angle: PI / 24.0,
            normalization: PerturbationNormalization::PopulationRange,
        }
    }
}

impl PerturbationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "samples",
                reason: "at least one perturbed sample is required".to_string(),
            });
        }
        check_sigma("sigma_position", self.sigma_position)?;
        check_sigma("sigma_angle", self.sigma_angle)
    }
}

fn check_sigma(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("standard deviation must be finite and non-negative, got {value}"),
        });
    }
    Ok(())
}

fn check_weights(weights: &MetricWeights) -> Result<(), ConfigError> {
    for (name, value) in [
        ("weights.sigma_min", weights.sigma_min),
        ("weights.wrench_volume", weights.wrench_volume),
        ("weights.isotropy", weights.isotropy),
    ] {
        if !value.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name,
                reason: format!("weight must be finite, got {value}"),
            });
        }
    }
    Ok(())
}

fn check_policy(policy: &DegenerateRangePolicy) -> Result<(), ConfigError> {
    if let DegenerateRangePolicy::Constant(value) = policy {
        if !value.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "degenerate_range",
                reason: format!("constant must be finite, got {value}"),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    pub scoring: ScoringConfig,
}

#[derive(Default)]
pub struct RankingConfigBuilder {
    weights: Option<MetricWeights>,
    degenerate_range: Option<DegenerateRangePolicy>,
}

impl RankingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(mut self, weights: MetricWeights) -> Self {
        self.weights = Some(weights);
        self
    }
    pub fn degenerate_range(mut self, policy: DegenerateRangePolicy) -> Self {
        self.degenerate_range = Some(policy);
        self
    }

    pub fn build(self) -> Result<RankingConfig, ConfigError> {
        let scoring = ScoringConfig {
            weights: self.weights.unwrap_or_default(),
            degenerate_range: self.degenerate_range.unwrap_or_default(),
        };
        check_weights(&scoring.weights)?;
        check_policy(&scoring.degenerate_range)?;
        Ok(RankingConfig { scoring })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RobustRankingConfig {
    pub scoring: ScoringConfig,
    pub perturbation: PerturbationConfig,
}

#[derive(Default)]
pub struct RobustRankingConfigBuilder {
    weights: Option<MetricWeights>,
    degenerate_range: Option<DegenerateRangePolicy>,
    samples: Option<usize>,
    sigma_position: Option<f64>,
    sigma_angle: Option<f64>,
    normalization: Option<PerturbationNormalization>,
}

impl RobustRankingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(mut self, weights: MetricWeights) -> Self {
        self.weights = Some(weights);
        self
    }
    pub fn degenerate_range(mut self, policy: DegenerateRangePolicy) -> Self {
        self.degenerate_range = Some(policy);
        self
    }
    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }
    pub fn sigma_position(mut self, sigma: f64) -> Self {
        self.sigma_position = Some(sigma);
        self
    }
    pub fn sigma_angle(mut self, sigma: f64) -> Self {
        self.sigma_angle = Some(sigma);
        self
    }
    pub fn normalization(mut self, normalization: PerturbationNormalization) -> Self {
        self.normalization = Some(normalization);
        self
    }

    pub fn build(self) -> Result<RobustRankingConfig, ConfigError> {
        let defaults = PerturbationConfig::default();
        let scoring = ScoringConfig {
            weights: self.weights.unwrap_or_default(),
            degenerate_range: self.degenerate_range.unwrap_or_default(),
        };
        let perturbation = PerturbationConfig {
            samples: self.samples.unwrap_or(defaults.samples),
            sigma_position: self.sigma_position.unwrap_or(defaults.sigma_position),
            sigma_angle: self.sigma_angle.unwrap_or(defaults.sigma_angle),
            normalization: self.normalization.unwrap_or(defaults.normalization),
        };
        check_weights(&scoring.weights)?;
        check_policy(&scoring.degenerate_range)?;
        perturbation.validate()?;
        Ok(RobustRankingConfig {
            scoring,
            perturbation,
        })
    }
}
