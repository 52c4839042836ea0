use super::config::{ConfigError, PerturbationConfig};
use super::evaluation::evaluate_hypothesis;
use super::scoring::Scorer;
use crate::core::models::contact::ObjectPose;
use crate::core::models::hypothesis::GraspHypothesis;
use crate::core::models::layout::{Field, HypothesisLayout};
use crate::core::quality::score::RawScore;
use crate::core::simulator::ContactSimulator;
use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PerturbationError {
    #[error("Invalid perturbation parameters: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid noise distribution: {0}")]
    Distribution(#[from] NormalError),
}

/// Averaged quality of a hypothesis over its perturbed neighbours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustScore {
    /// Mean performance of the perturbed samples.
    pub performance: f64,
    /// Component-wise mean of the samples' raw scores.
    pub mean_raw: RawScore,
    pub samples: usize,
    /// Number of samples the simulator or the metric evaluation rejected.
    pub failures: usize,
}

/// Draws randomized neighbours of a grasp hypothesis.
///
/// Every position component, every direction component and the roll angle receive independent
/// zero-mean Gaussian noise. The direction is not renormalized; the simulator is expected to
/// handle non-unit approach vectors.
#[derive(Debug, Clone, Copy)]
pub struct PerturbationSampler {
    position_noise: Normal<f64>,
    angle_noise: Normal<f64>,
    samples: usize,
}

impl PerturbationSampler {
    /// Builds a sampler from a validated config; zero samples and negative or non-finite
    /// standard deviations are rejected.
    pub fn new(config: &PerturbationConfig) -> Result<Self, PerturbationError> {
        config.validate()?;
        Ok(Self {
            position_noise: Normal::new(0.0, config.sigma_position)?,
            angle_noise: Normal::new(0.0, config.sigma_angle)?,
            samples: config.samples,
        })
    }

    #[inline]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Returns a noisy copy of `hypothesis`; the original is left untouched.
    pub fn perturb<R: Rng + ?Sized>(
        &self,
        hypothesis: &GraspHypothesis,
        layout: &HypothesisLayout,
        rng: &mut R,
    ) -> GraspHypothesis {
        let mut perturbed = hypothesis.clone();
        for value in perturbed.field_mut(layout, Field::Position) {
            *value += self.position_noise.sample(rng);
        }
        for value in perturbed.field_mut(layout, Field::Direction) {
            *value += self.angle_noise.sample(rng);
        }
        for value in perturbed.field_mut(layout, Field::Roll) {
            *value += self.angle_noise.sample(rng);
        }
        perturbed
    }

    /// Evaluates `samples` perturbed copies of `hypothesis` and averages their performance.
    pub fn robust_score<S, R>(
        &self,
        hypothesis: &GraspHypothesis,
        layout: &HypothesisLayout,
        simulator: &S,
        object_pose: &ObjectPose,
        scorer: &Scorer,
        rng: &mut R,
    ) -> RobustScore
    where
        S: ContactSimulator + ?Sized,
        R: Rng + ?Sized,
    {
        let mut performance = 0.0;
        let mut total_raw = RawScore::ZERO;
        let mut failures = 0;

        for sample in 0..self.samples {
            let neighbour = self.perturb(hypothesis, layout, rng);
            let evaluation = evaluate_hypothesis(&neighbour, sample, simulator, object_pose);
            if evaluation.is_failure() {
                failures += 1;
            }
            // Running mean, so identical samples reproduce their common value exactly.
            performance += (scorer.score(&evaluation.raw) - performance) / (sample + 1) as f64;
            total_raw += evaluation.raw;
        }

        trace!(
            hypothesis = %hypothesis.id,
            performance,
            failures,
            "Computed robust score."
        );

        RobustScore {
            performance,
            mean_raw: total_raw / self.samples as f64,
            samples: self.samples,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::hypothesis::HypothesisId;
    use crate::core::models::contact::Contact;
    use crate::core::simulator::SimulationFailure;
    use crate::engine::config::{PerturbationNormalization, ScoringConfig};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn layout() -> HypothesisLayout {
        HypothesisLayout::standard(0)
    }

    fn top_grasp() -> GraspHypothesis {
        let mut values = vec![0.0; 9];
        values[1..4].copy_from_slice(&[0.0, 0.0, 1.0]);
        values[4] = 0.1;
        values[5..8].copy_from_slice(&[0.0, 0.0, -0.2]);
        values[8] = 0.19;
        GraspHypothesis::new(HypothesisId(0), values)
    }

    /// Six face contacts of a unit cube translated to the hypothesis position, so that the
    /// torques about the origin, and with them the scores, depend on the position noise.
    struct TranslatedCube {
        layout: HypothesisLayout,
    }

    impl ContactSimulator for TranslatedCube {
        fn evaluate_contact(
            &self,
            hypothesis: &GraspHypothesis,
            _object_pose: &ObjectPose,
        ) -> Result<Vec<Contact>, SimulationFailure> {
            let offset = hypothesis.position(&self.layout).coords;
            let rows = [
                [1.0, 0.0, 0.3, 1.0, 0.0, 0.0],
                [-1.0, 0.0, -0.3, -1.0, 0.0, 0.0],
                [0.3, 1.0, 0.0, 0.0, 1.0, 0.0],
                [-0.3, -1.0, 0.0, 0.0, -1.0, 0.0],
                [0.0, 0.3, 1.0, 0.0, 0.0, 1.0],
                [0.0, -0.3, -1.0, 0.0, 0.0, -1.0],
            ];
            Ok(rows
                .iter()
                .map(|row| {
                    let contact = Contact::from_row(*row);
                    Contact::new(contact.position + offset, contact.direction)
                })
                .collect())
        }
    }

    fn simulator() -> TranslatedCube {
        TranslatedCube { layout: layout() }
    }

    fn config(samples: usize, sigma_position: f64, sigma_angle: f64) -> PerturbationConfig {
        PerturbationConfig {
            samples,
            sigma_position,
            sigma_angle,
            normalization: PerturbationNormalization::Raw,
        }
    }

    #[test]
    fn zero_noise_reproduces_the_single_shot_score() {
        let layout = layout();
        let simulator = simulator();
        let pose = ObjectPose::identity();
        let scorer = Scorer::unnormalized(&ScoringConfig::default());
        let sampler = PerturbationSampler::new(&config(5, 0.0, 0.0)).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let nominal = evaluate_hypothesis(&top_grasp(), 0, &simulator, &pose);
        let robust =
            sampler.robust_score(&top_grasp(), &layout, &simulator, &pose, &scorer, &mut rng);

        assert_eq!(robust.samples, 5);
        assert_eq!(robust.performance, scorer.score(&nominal.raw));
        assert!(robust.performance > 0.0);
    }

    #[test]
    fn perturb_leaves_the_original_untouched() {
        let layout = layout();
        let original = top_grasp();
        let snapshot = original.clone();
        let sampler = PerturbationSampler::new(&config(1, 0.05, 0.2)).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let perturbed = sampler.perturb(&original, &layout, &mut rng);

        assert_eq!(original, snapshot);
        assert_eq!(perturbed.id, original.id);
        assert_ne!(perturbed.position(&layout), original.position(&layout));
        assert_ne!(perturbed.roll(&layout), original.roll(&layout));
        assert_eq!(perturbed.standoff(&layout), original.standoff(&layout));
        assert_eq!(perturbed.performance(&layout), original.performance(&layout));
    }

    #[test]
    fn seeded_runs_are_deterministic() {
        let layout = layout();
        let simulator = simulator();
        let pose = ObjectPose::identity();
        let scorer = Scorer::unnormalized(&ScoringConfig::default());
        let sampler = PerturbationSampler::new(&config(8, 0.01, 0.1)).unwrap();

        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            sampler.robust_score(&top_grasp(), &layout, &simulator, &pose, &scorer, &mut rng)
        };

        assert_eq!(run(42), run(42));
    }

    #[test]
    fn negative_sigma_is_rejected() {
        let result = PerturbationSampler::new(&config(3, -1.0, 0.1));
        assert!(matches!(
            result,
            Err(PerturbationError::Config(ConfigError::InvalidParameter {
                name: "sigma_position",
                ..
            }))
        ));

        let result = PerturbationSampler::new(&config(3, 0.01, -0.5));
        assert!(matches!(
            result,
            Err(PerturbationError::Config(ConfigError::InvalidParameter {
                name: "sigma_angle",
                ..
            }))
        ));
    }

    #[test]
    fn non_finite_sigma_is_rejected() {
        let result = PerturbationSampler::new(&config(3, f64::NAN, 0.1));
        assert!(matches!(result, Err(PerturbationError::Config(_))));
    }

    #[test]
    fn zero_samples_are_rejected() {
        let result = PerturbationSampler::new(&config(0, 0.1, 0.1));
        assert!(matches!(
            result,
            Err(PerturbationError::Config(ConfigError::InvalidParameter {
                name: "samples",
                ..
            }))
        ));
    }
}
