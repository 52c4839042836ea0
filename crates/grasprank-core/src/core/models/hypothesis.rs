use super::layout::{Field, HypothesisLayout};
use nalgebra::{Point3, Vector3};
use std::fmt;

/// Stable identity of a grasp hypothesis within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HypothesisId(pub usize);

impl fmt::Display for HypothesisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One candidate grasp: an opaque, fixed-width configuration vector whose named fields are
/// resolved through a [`HypothesisLayout`].
#[derive(Debug, Clone, PartialEq)]
pub struct GraspHypothesis {
    pub id: HypothesisId,
    values: Vec<f64>,
}

impl GraspHypothesis {
    pub fn new(id: HypothesisId, values: Vec<f64>) -> Self {
        Self { id, values }
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn field(&self, layout: &HypothesisLayout, field: Field) -> &[f64] {
        &self.values[layout.range(field).as_range()]
    }

    pub(crate) fn field_mut(&mut self, layout: &HypothesisLayout, field: Field) -> &mut [f64] {
        &mut self.values[layout.range(field).as_range()]
    }

    pub fn position(&self, layout: &HypothesisLayout) -> Point3<f64> {
        Point3::from(self.vector3(layout, Field::Position))
    }

    pub fn direction(&self, layout: &HypothesisLayout) -> Vector3<f64> {
        self.vector3(layout, Field::Direction)
    }

    pub fn roll(&self, layout: &HypothesisLayout) -> f64 {
        self.field(layout, Field::Roll)[0]
    }

    pub fn standoff(&self, layout: &HypothesisLayout) -> f64 {
        self.field(layout, Field::Standoff)[0]
    }

    pub fn preshape(&self, layout: &HypothesisLayout) -> &[f64] {
        self.field(layout, Field::Preshape)
    }

    pub fn performance(&self, layout: &HypothesisLayout) -> f64 {
        self.field(layout, Field::Performance)[0]
    }

    /// Returns a copy of this hypothesis with its `performance` slot set.
    pub fn with_performance(&self, layout: &HypothesisLayout, performance: f64) -> Self {
        let mut copy = self.clone();
        copy.field_mut(layout, Field::Performance)[0] = performance;
        copy
    }

    fn vector3(&self, layout: &HypothesisLayout, field: Field) -> Vector3<f64> {
        Vector3::from_column_slice(self.field(layout, field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hypothesis() -> GraspHypothesis {
        // performance, direction(3), roll, position(3), standoff, preshape(2)
        GraspHypothesis::new(
            HypothesisId(7),
            vec![0.0, 0.0, 0.0, 1.0, 0.25, 0.5, 0.6, 0.7, 0.02, 0.3, 0.4],
        )
    }

    #[test]
    fn named_fields_are_read_through_the_layout() {
        let layout = HypothesisLayout::standard(2);
        let h = sample_hypothesis();

        assert_eq!(h.direction(&layout), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(h.roll(&layout), 0.25);
        assert_eq!(h.position(&layout), Point3::new(0.5, 0.6, 0.7));
        assert_eq!(h.standoff(&layout), 0.02);
        assert_eq!(h.preshape(&layout), &[0.3, 0.4]);
        assert_eq!(h.performance(&layout), 0.0);
    }

    #[test]
    fn with_performance_writes_only_the_copy() {
        let layout = HypothesisLayout::standard(2);
        let original = sample_hypothesis();
        let ranked = original.with_performance(&layout, 12.25);

        assert_eq!(ranked.performance(&layout), 12.25);
        assert_eq!(original.performance(&layout), 0.0);
        assert_eq!(ranked.id, original.id);
        assert_eq!(&ranked.values()[1..], &original.values()[1..]);
    }

    #[test]
    fn id_display_is_prefixed() {
        assert_eq!(HypothesisId(42).to_string(), "#42");
    }
}
