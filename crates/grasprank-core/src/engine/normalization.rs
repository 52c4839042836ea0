use crate::core::quality::score::{Metric, RawScore};
use thiserror::Error;

/// Ranges narrower than this are treated as zero-width and never divided by.
pub const DEGENERATE_RANGE_EPSILON: f64 = 1e-12;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum NormalizationError {
    #[error("Cannot normalize against the zero-width range [{min}, {max}]")]
    DegenerateRange { min: f64, max: f64 },
}

/// Observed `[min, max]` of one metric across a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `None` when `values` is empty.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |range, value| match range {
            None => Some(Self::new(value, value)),
            Some(Self { min, max }) => Some(Self::new(min.min(value), max.max(value))),
        })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width() <= DEGENERATE_RANGE_EPSILON
    }
}

/// Per-metric ranges of a complete batch.
///
/// Built once after every raw score of the batch is known and never updated afterwards; ranking
/// and the robust path both read the same instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRanges {
    pub sigma_min: MetricRange,
    pub wrench_volume: MetricRange,
    pub isotropy: MetricRange,
}

impl ScoreRanges {
    pub fn from_scores(scores: &[RawScore]) -> Option<Self> {
        let range_of = |metric: Metric| MetricRange::from_values(scores.iter().map(|s| s.get(metric)));
        Some(Self {
            sigma_min: range_of(Metric::SigmaMin)?,
            wrench_volume: range_of(Metric::WrenchVolume)?,
            isotropy: range_of(Metric::Isotropy)?,
        })
    }

    pub fn get(&self, metric: Metric) -> &MetricRange {
        match metric {
            Metric::SigmaMin => &self.sigma_min,
            Metric::WrenchVolume => &self.wrench_volume,
            Metric::Isotropy => &self.isotropy,
        }
    }
}

/// Maps `value` linearly so that the range endpoints land on 0 and 1.
///
/// Values outside the range are not clamped.
#[inline]
pub fn normalize(value: f64, range: &MetricRange) -> Result<f64, NormalizationError> {
    if range.is_degenerate() {
        return Err(NormalizationError::DegenerateRange {
            min: range.min,
            max: range.max,
        });
    }
    Ok((value - range.min) / range.width())
}
