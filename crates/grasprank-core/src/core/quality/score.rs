use std::fmt;
use std::ops::{Add, AddAssign, Div};

/// One of the three raw grasp-quality metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    SigmaMin,
    WrenchVolume,
    Isotropy,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::SigmaMin, Metric::WrenchVolume, Metric::Isotropy];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::SigmaMin => "sigma-min",
            Metric::WrenchVolume => "wrench-volume",
            Metric::Isotropy => "isotropy",
        };
        f.write_str(name)
    }
}

/// The unnormalized quality metrics of one grasp evaluation.
///
/// All components are non-negative. A grasp that cannot be evaluated scores [`RawScore::ZERO`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawScore {
    pub sigma_min: f64,
    pub wrench_volume: f64,
    pub isotropy: f64,
}

impl RawScore {
    pub const ZERO: RawScore = RawScore {
        sigma_min: 0.0,
        wrench_volume: 0.0,
        isotropy: 0.0,
    };

    pub fn new(sigma_min: f64, wrench_volume: f64, isotropy: f64) -> Self {
        Self {
            sigma_min,
            wrench_volume,
            isotropy,
        }
    }

    #[inline]
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::SigmaMin => self.sigma_min,
            Metric::WrenchVolume => self.wrench_volume,
            Metric::Isotropy => self.isotropy,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl Add for RawScore {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            sigma_min: self.sigma_min + rhs.sigma_min,
            wrench_volume: self.wrench_volume + rhs.wrench_volume,
            isotropy: self.isotropy + rhs.isotropy,
        }
    }
}

impl AddAssign for RawScore {
    fn add_assign(&mut self, rhs: Self) {
        self.sigma_min += rhs.sigma_min;
        self.wrench_volume += rhs.wrench_volume;
        self.isotropy += rhs.isotropy;
    }
}

impl Div<f64> for RawScore {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self {
            sigma_min: self.sigma_min / rhs,
            wrench_volume: self.wrench_volume / rhs,
            isotropy: self.isotropy / rhs,
        }
    }
}
