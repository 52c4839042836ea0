use super::config::{DegenerateRangePolicy, MetricWeights, ScoringConfig};
use super::error::EngineError;
use super::normalization::{ScoreRanges, normalize};
use crate::core::quality::score::{Metric, RawScore};
use tracing::warn;

/// Combines the three raw metrics of a candidate into one performance value.
///
/// A normalized scorer maps each metric through the batch ranges before weighting; an
/// unnormalized scorer weights the raw values directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Scorer {
    weights: MetricWeights,
    ranges: Option<ScoreRanges>,
    degenerate_value: f64,
}

impl Scorer {
    pub fn normalized(ranges: ScoreRanges, config: &ScoringConfig) -> Result<Self, EngineError> {
        let mut degenerate_value = 0.0;
        for metric in Metric::ALL {
            let range = ranges.get(metric);
            if !range.is_degenerate() {
                continue;
            }
            match config.degenerate_range {
                DegenerateRangePolicy::Reject => {
                    return Err(EngineError::DegenerateRange {
                        metric,
                        min: range.min,
                        max: range.max,
                    });
                }
                DegenerateRangePolicy::Constant(value) => {
                    warn!(
                        %metric,
                        min = range.min,
                        max = range.max,
                        value,
                        "Metric has no spread across the batch; using a constant normalized value"
                    );
                    degenerate_value = value;
                }
            }
        }

        Ok(Self {
            weights: config.weights,
            ranges: Some(ranges),
            degenerate_value,
        })
    }

    pub fn unnormalized(config: &ScoringConfig) -> Self {
        Self {
            weights: config.weights,
            ranges: None,
            degenerate_value: 0.0,
        }
    }

    pub fn weights(&self) -> &MetricWeights {
        &self.weights
    }

    pub fn ranges(&self) -> Option<&ScoreRanges> {
        self.ranges.as_ref()
    }

    fn weight(&self, metric: Metric) -> f64 {
        match metric {
            Metric::SigmaMin => self.weights.sigma_min,
            Metric::WrenchVolume => self.weights.wrench_volume,
            Metric::Isotropy => self.weights.isotropy,
        }
    }

    fn scaled(&self, raw: &RawScore, metric: Metric) -> f64 {
        let value = raw.get(metric);
        match &self.ranges {
            None => value,
            Some(ranges) => normalize(value, ranges.get(metric)).unwrap_or(self.degenerate_value),
        }
    }

    pub fn score(&self, raw: &RawScore) -> f64 {
        Metric::ALL
            .iter()
            .map(|&metric| self.weight(metric) * self.scaled(raw, metric))
            .sum()
    }
}
