use super::score::RawScore;
use super::wrench::WrenchMatrix;
use nalgebra::DMatrix;
use thiserror::Error;
use tracing::trace;

/// Dimension of the wrench space (3 force + 3 torque components).
pub const WRENCH_DIMENSION: usize = 6;

const MAX_SVD_ITERATIONS: usize = 1_000;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricError {
    #[error("Wrench column {column} contains a non-finite value")]
    NonFinite { column: usize },
    #[error("Singular value decomposition did not converge within {iterations} iterations")]
    SvdFailed { iterations: usize },
}

/// Wrench-space quality of a grasp, derived from the singular values of its wrench matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QualityMetrics {
    /// Smallest singular value; zero when the contacts do not span all six wrench directions.
    pub sigma_min: f64,
    /// Largest singular value.
    pub sigma_max: f64,
    /// `sqrt(det(W·Wᵗ))`, proportional to the volume of the wrench ellipsoid.
    pub wrench_volume: f64,
    /// `sigma_min / sigma_max`; 1 for a perfectly isotropic grasp.
    pub isotropy: f64,
    /// Numerical rank of the wrench matrix.
    pub rank: usize,
}

impl QualityMetrics {
    pub fn raw_score(&self) -> RawScore {
        RawScore::new(self.sigma_min, self.wrench_volume, self.isotropy)
    }

    #[inline]
    pub fn is_full_rank(&self) -> bool {
        self.rank >= WRENCH_DIMENSION
    }
}

/// Computes the quality metrics of a wrench matrix.
///
/// A 6×0 matrix has zero quality. Rank-deficient matrices, which include every matrix with
/// fewer than six columns, report `sigma_min`, `wrench_volume` and `isotropy` as zero.
pub fn evaluate_wrench(wrenches: &WrenchMatrix) -> Result<QualityMetrics, MetricError> {
    let ncols = wrenches.ncols();
    if ncols == 0 {
        return Ok(QualityMetrics::default());
    }

    if let Some(column) = wrenches
        .column_iter()
        .position(|c| c.iter().any(|v| !v.is_finite()))
    {
        return Err(MetricError::NonFinite { column });
    }

    let dynamic = DMatrix::from_column_slice(WRENCH_DIMENSION, ncols, wrenches.as_slice());
    let svd = dynamic
        .try_svd(false, false, f64::EPSILON, MAX_SVD_ITERATIONS)
        .ok_or(MetricError::SvdFailed {
            iterations: MAX_SVD_ITERATIONS,
        })?;
    let singular_values = &svd.singular_values;

    let sigma_max = singular_values.iter().copied().fold(0.0, f64::max);
    let tolerance = sigma_max * WRENCH_DIMENSION.max(ncols) as f64 * f64::EPSILON;
    let rank = singular_values.iter().filter(|&&s| s > tolerance).count();

    if rank < WRENCH_DIMENSION {
        trace!(rank, ncols, "Wrench matrix is rank deficient.");
        return Ok(QualityMetrics {
            sigma_min: 0.0,
            sigma_max,
            wrench_volume: 0.0,
            isotropy: 0.0,
            rank,
        });
    }

    let sigma_min = singular_values
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let gram = wrenches * wrenches.transpose();
    let wrench_volume = gram.determinant().max(0.0).sqrt();
    let isotropy = if sigma_max > 0.0 {
        sigma_min / sigma_max
    } else {
        0.0
    };

    Ok(QualityMetrics {
        sigma_min,
        sigma_max,
        wrench_volume,
        isotropy,
        rank,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector6;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TOLERANCE: f64 = 1e-9;

    fn matrix_from_columns(columns: &[Vector6<f64>]) -> WrenchMatrix {
        let mut w = WrenchMatrix::zeros(columns.len());
        for (i, c) in columns.iter().enumerate() {
            w.set_column(i, c);
        }
        w
    }

    fn diagonal_wrenches(values: [f64; 6]) -> WrenchMatrix {
        let columns: Vec<_> = (0..6)
            .map(|i| {
                let mut c = Vector6::zeros();
                c[i] = values[i];
                c
            })
            .collect();
        matrix_from_columns(&columns)
    }

    #[test]
    fn empty_matrix_has_zero_quality() {
        let metrics = evaluate_wrench(&WrenchMatrix::zeros(0)).unwrap();
        assert_eq!(metrics, QualityMetrics::default());
        assert!(metrics.raw_score().is_zero());
    }

    #[test]
    fn identity_wrenches_are_perfectly_isotropic() {
        let metrics = evaluate_wrench(&diagonal_wrenches([1.0; 6])).unwrap();
        assert!((metrics.sigma_min - 1.0).abs() < TOLERANCE);
        assert!((metrics.sigma_max - 1.0).abs() < TOLERANCE);
        assert!((metrics.wrench_volume - 1.0).abs() < TOLERANCE);
        assert!((metrics.isotropy - 1.0).abs() < TOLERANCE);
        assert_eq!(metrics.rank, 6);
    }

    #[test]
    fn diagonal_wrenches_give_expected_metrics() {
        let metrics = evaluate_wrench(&diagonal_wrenches([1.0, 2.0, 3.0, 4.0, 5.0, 6.0])).unwrap();
        assert!((metrics.sigma_min - 1.0).abs() < TOLERANCE);
        assert!((metrics.sigma_max - 6.0).abs() < TOLERANCE);
        assert!((metrics.wrench_volume - 720.0).abs() < 1e-6);
        assert!((metrics.isotropy - 1.0 / 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn random_full_rank_matrices_have_positive_sigma_min() {
        let mut rng = StdRng::seed_from_u64(7);
        for ncols in [6, 9, 16] {
            let columns: Vec<_> = (0..ncols)
                .map(|_| Vector6::from_fn(|_, _| rng.gen_range(-1.0..1.0)))
                .collect();
            let metrics = evaluate_wrench(&matrix_from_columns(&columns)).unwrap();
            assert!(metrics.is_full_rank());
            assert!(metrics.sigma_min > 0.0);
            assert!(metrics.isotropy > 0.0 && metrics.isotropy <= 1.0);
            assert!(metrics.wrench_volume > 0.0);
        }
    }

    #[test]
    fn parallel_columns_have_zero_sigma_min_and_isotropy() {
        let column = Vector6::new(0.0, 0.0, 1.0, 0.3, -0.2, 0.0);
        let columns = vec![column; 8];
        let metrics = evaluate_wrench(&matrix_from_columns(&columns)).unwrap();
        assert_eq!(metrics.rank, 1);
        assert_eq!(metrics.sigma_min, 0.0);
        assert_eq!(metrics.isotropy, 0.0);
        assert_eq!(metrics.wrench_volume, 0.0);
        assert!(metrics.sigma_max > 0.0);
    }

    #[test]
    fn fewer_than_six_contacts_are_rank_deficient() {
        let columns: Vec<_> = (0..5)
            .map(|i| {
                let mut c = Vector6::zeros();
                c[i] = 1.0;
                c
            })
            .collect();
        let metrics = evaluate_wrench(&matrix_from_columns(&columns)).unwrap();
        assert_eq!(metrics.rank, 5);
        assert!(metrics.raw_score().is_zero());
    }

    #[test]
    fn linearly_dependent_sixth_column_is_rank_deficient() {
        let mut columns: Vec<_> = (0..5)
            .map(|i| {
                let mut c = Vector6::zeros();
                c[i] = 1.0;
                c
            })
            .collect();
        columns.push(columns[0] * 2.0 - columns[3]);
        let metrics = evaluate_wrench(&matrix_from_columns(&columns)).unwrap();
        assert_eq!(metrics.rank, 5);
        assert_eq!(metrics.sigma_min, 0.0);
        assert_eq!(metrics.wrench_volume, 0.0);
    }

    #[test]
    fn non_finite_entries_are_reported() {
        let mut columns = vec![Vector6::repeat(1.0); 3];
        columns[2][4] = f64::NAN;
        let result = evaluate_wrench(&matrix_from_columns(&columns));
        assert_eq!(result, Err(MetricError::NonFinite { column: 2 }));
    }
}
