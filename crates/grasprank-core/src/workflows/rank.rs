use crate::core::models::contact::ObjectPose;
use crate::core::models::hypothesis::GraspHypothesis;
use crate::core::models::layout::HypothesisLayout;
use crate::core::simulator::ContactSimulator;
use crate::engine::config::RankingConfig;
use crate::engine::error::EngineError;
use crate::engine::normalization::ScoreRanges;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::ranking::{RankingResult, rank};
use crate::engine::scoring::Scorer;
use crate::engine::tasks;
use std::collections::HashSet;
use tracing::{info, instrument};

/// Checks the batch-level preconditions shared by every ranking workflow: each hypothesis
/// matches the layout width and no id appears twice.
pub(crate) fn validate_batch(
    batch: &[GraspHypothesis],
    layout: &HypothesisLayout,
) -> Result<(), EngineError> {
    let mut seen = HashSet::with_capacity(batch.len());
    for hypothesis in batch {
        layout.check_width(hypothesis.id, hypothesis.values())?;
        if !seen.insert(hypothesis.id) {
            return Err(EngineError::DuplicateHypothesis(hypothesis.id));
        }
    }
    Ok(())
}

/// Scores and ranks a batch of grasp hypotheses.
///
/// Pass one evaluates every hypothesis; the per-metric ranges of the complete batch are then
/// fixed and used to normalize and combine the metrics into one performance per candidate.
/// Every input appears exactly once in the result, failures included.
#[instrument(skip_all, name = "rank_workflow", fields(hypotheses = batch.len()))]
pub fn run<S>(
    batch: &[GraspHypothesis],
    layout: &HypothesisLayout,
    simulator: &S,
    object_pose: &ObjectPose,
    config: &RankingConfig,
    reporter: &ProgressReporter,
) -> Result<RankingResult, EngineError>
where
    S: ContactSimulator + ?Sized,
{
    validate_batch(batch, layout)?;
    if batch.is_empty() {
        info!("Empty batch; nothing to rank.");
        return Ok(RankingResult::default());
    }

    // === Pass 1: Raw scores ===
    let evaluations = reporter.phase("Evaluating Hypotheses", || {
        tasks::raw_scores::run(batch, simulator, object_pose, reporter)
    });

    // === Pass 2: Normalize, combine and order ===
    reporter.report(Progress::PhaseStart { name: "Ranking" });
    let raws: Vec<_> = evaluations.iter().map(|e| e.raw).collect();
    let ranges = ScoreRanges::from_scores(&raws)
        .ok_or_else(|| EngineError::Internal("no raw scores for a non-empty batch".to_string()))?;
    let scorer = Scorer::normalized(ranges, &config.scoring)?;
    let candidates = rank(&evaluations, &scorer);
    reporter.report(Progress::PhaseFinish);

    let result = RankingResult {
        candidates,
        ranges: Some(ranges),
    };
    info!(
        ranked = result.len(),
        failures = result.failures().count(),
        best = result.best().map(|c| c.performance),
        "Ranking complete."
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::contact::Contact;
    use crate::core::models::hypothesis::HypothesisId;
    use crate::core::models::layout::LayoutError;
    use crate::core::quality::score::{Metric, RawScore};
    use crate::core::simulator::replay::{Recording, ReplaySimulator};
    use crate::engine::config::{DegenerateRangePolicy, RankingConfigBuilder};

    fn layout() -> HypothesisLayout {
        HypothesisLayout::standard(0)
    }

    fn hypothesis(id: usize) -> GraspHypothesis {
        GraspHypothesis::new(HypothesisId(id), vec![0.0; 9])
    }

    /// Face contacts of a unit cube, offset sideways by `scale` so that they also resist torque.
    fn box_contacts(scale: f64) -> Vec<Contact> {
        [
            [1.0, 0.0, scale, 1.0, 0.0, 0.0],
            [-1.0, 0.0, -scale, -1.0, 0.0, 0.0],
            [scale, 1.0, 0.0, 0.0, 1.0, 0.0],
            [-scale, -1.0, 0.0, 0.0, -1.0, 0.0],
            [0.0, scale, 1.0, 0.0, 0.0, 1.0],
            [0.0, -scale, -1.0, 0.0, 0.0, -1.0],
        ]
        .into_iter()
        .map(Contact::from_row)
        .collect()
    }

    fn default_config() -> RankingConfig {
        RankingConfigBuilder::new().build().unwrap()
    }

    #[test]
    fn ranks_every_hypothesis_with_failures_last() {
        let batch: Vec<_> = (0..4).map(hypothesis).collect();
        let mut simulator = ReplaySimulator::default();
        simulator.record(HypothesisId(0), Recording::Contacts(box_contacts(1.0)));
        simulator.record(HypothesisId(1), Recording::Failure("collision".to_string()));
        simulator.record(HypothesisId(2), Recording::Contacts(box_contacts(2.0)));
        simulator.record(HypothesisId(3), Recording::Contacts(box_contacts(0.5)));

        let result = run(
            &batch,
            &layout(),
            &simulator,
            &ObjectPose::identity(),
            &default_config(),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.len(), 4);
        let mut ids: Vec<_> = result.candidates.iter().map(|c| c.hypothesis_id.0).collect();
        assert_eq!(ids.last(), Some(&1));
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(result.candidates[3].raw, RawScore::ZERO);
        assert!(result.ranges.is_some());
        assert!(
            result
                .candidates
                .windows(2)
                .all(|pair| pair[0].performance >= pair[1].performance)
        );
    }

    #[test]
    fn empty_batch_yields_an_empty_result() {
        let result = run(
            &[],
            &layout(),
            &ReplaySimulator::default(),
            &ObjectPose::identity(),
            &default_config(),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert!(result.is_empty());
        assert!(result.ranges.is_none());
    }

    #[test]
    fn width_mismatch_is_a_batch_error() {
        let batch = vec![
            hypothesis(0),
            GraspHypothesis::new(HypothesisId(1), vec![0.0; 5]),
        ];
        let result = run(
            &batch,
            &layout(),
            &ReplaySimulator::default(),
            &ObjectPose::identity(),
            &default_config(),
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(EngineError::Layout {
                source: LayoutError::WidthMismatch { found: 5, .. }
            })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected_before_evaluation() {
        let batch = vec![hypothesis(3), hypothesis(4), hypothesis(3)];
        let result = run(
            &batch,
            &layout(),
            &ReplaySimulator::default(),
            &ObjectPose::identity(),
            &default_config(),
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(EngineError::DuplicateHypothesis(HypothesisId(3)))
        ));
    }

    #[test]
    fn all_failed_batch_uses_the_degenerate_policy() {
        let batch: Vec<_> = (0..3).map(hypothesis).collect();
        let simulator = ReplaySimulator::default();

        let constant = run(
            &batch,
            &layout(),
            &simulator,
            &ObjectPose::identity(),
            &default_config(),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert!(constant.candidates.iter().all(|c| c.failed && c.performance == 0.0));
        let order: Vec<_> = constant.candidates.iter().map(|c| c.batch_index).collect();
        assert_eq!(order, vec![0, 1, 2]);

        let reject = RankingConfigBuilder::new()
            .degenerate_range(DegenerateRangePolicy::Reject)
            .build()
            .unwrap();
        let result = run(
            &batch,
            &layout(),
            &simulator,
            &ObjectPose::identity(),
            &reject,
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(EngineError::DegenerateRange {
                metric: Metric::SigmaMin,
                ..
            })
        ));
    }
}
