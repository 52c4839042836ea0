use super::evaluation::Evaluation;
use super::normalization::ScoreRanges;
use super::scoring::Scorer;
use crate::core::models::hypothesis::{GraspHypothesis, HypothesisId};
use crate::core::models::layout::HypothesisLayout;
use crate::core::quality::score::RawScore;

/// One scored entry of a ranked batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
    pub hypothesis_id: HypothesisId,
    /// Position of the hypothesis in the input batch.
    pub batch_index: usize,
    pub raw: RawScore,
    pub performance: f64,
    pub failed: bool,
}

/// Sorts candidates by descending performance. The sort is stable, so ties keep batch order.
pub(crate) fn sort_candidates(candidates: &mut [RankedCandidate]) {
    candidates.sort_by(|a, b| b.performance.total_cmp(&a.performance));
}

/// Scores every evaluation with `scorer` and orders the result best first.
pub fn rank(evaluations: &[Evaluation], scorer: &Scorer) -> Vec<RankedCandidate> {
    let mut candidates: Vec<RankedCandidate> = evaluations
        .iter()
        .map(|evaluation| RankedCandidate {
            hypothesis_id: evaluation.hypothesis_id,
            batch_index: evaluation.batch_index,
            raw: evaluation.raw,
            performance: scorer.score(&evaluation.raw),
            failed: evaluation.is_failure(),
        })
        .collect();
    sort_candidates(&mut candidates);
    candidates
}

/// The ordered output of a ranking workflow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankingResult {
    /// Every input hypothesis exactly once, best first.
    pub candidates: Vec<RankedCandidate>,
    /// Population ranges the performances were normalized against, if any.
    pub ranges: Option<ScoreRanges>,
}

impl RankingResult {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn best(&self) -> Option<&RankedCandidate> {
        self.candidates.first()
    }

    pub fn top(&self, k: usize) -> &[RankedCandidate] {
        &self.candidates[..k.min(self.candidates.len())]
    }

    pub fn failures(&self) -> impl Iterator<Item = &RankedCandidate> {
        self.candidates.iter().filter(|c| c.failed)
    }

    /// Copies of the batch hypotheses in ranked order, each with its performance field written.
    ///
    /// `batch` must be the slice the result was computed from.
    pub fn ranked_hypotheses(
        &self,
        batch: &[GraspHypothesis],
        layout: &HypothesisLayout,
    ) -> Vec<GraspHypothesis> {
        self.candidates
            .iter()
            .filter_map(|candidate| {
                batch
                    .get(candidate.batch_index)
                    .map(|hypothesis| hypothesis.with_performance(layout, candidate.performance))
            })
            .collect()
    }
}
