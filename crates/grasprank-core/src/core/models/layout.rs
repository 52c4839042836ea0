use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// A named field of a grasp hypothesis configuration vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Position,
    Direction,
    Roll,
    Standoff,
    Preshape,
    Performance,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Position,
        Field::Direction,
        Field::Roll,
        Field::Standoff,
        Field::Preshape,
        Field::Performance,
    ];

    /// The number of scalars the field must span, or `None` for variable-length fields.
    pub fn expected_len(self) -> Option<usize> {
        match self {
            Field::Position | Field::Direction => Some(3),
            Field::Roll | Field::Standoff | Field::Performance => Some(1),
            Field::Preshape => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Position => "position",
            Field::Direction => "direction",
            Field::Roll => "roll",
            Field::Standoff => "standoff",
            Field::Preshape => "preshape",
            Field::Performance => "performance",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Half-open index range `[start, end)` of a field inside the configuration vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldRange {
    pub start: usize,
    pub end: usize,
}

impl FieldRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }

    fn overlaps(&self, other: &FieldRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }
}

impl From<Range<usize>> for FieldRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Hypothesis layout does not declare a vector width")]
    MissingWidth,

    #[error("Missing required field in hypothesis layout: {0}")]
    MissingField(Field),

    #[error("Field '{field}' must span {expected} value(s), but the layout assigns {found}")]
    FieldLength {
        field: Field,
        expected: usize,
        found: usize,
    },

    #[error("Field '{field}' range {start}..{end} is invalid for a vector of width {width}")]
    OutOfBounds {
        field: Field,
        start: usize,
        end: usize,
        width: usize,
    },

    #[error("Fields '{first}' and '{second}' overlap in the hypothesis layout")]
    Overlap { first: Field, second: Field },

    #[error("Hypothesis {id} has {found} values, but the layout width is {expected}")]
    WidthMismatch {
        id: String,
        expected: usize,
        found: usize,
    },
}

/// Maps the named fields of a grasp hypothesis onto index ranges of its configuration vector.
///
/// A layout is validated once on construction and is then shared, unchanged, by every
/// hypothesis of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HypothesisLayout {
    width: usize,
    fields: HashMap<Field, FieldRange>,
}

impl HypothesisLayout {
    /// The conventional layout: performance, direction, roll, position, standoff, then
    /// `preshape_dofs` preshape values.
    pub fn standard(preshape_dofs: usize) -> Self {
        let mut fields = HashMap::with_capacity(Field::ALL.len());
        fields.insert(Field::Performance, FieldRange::new(0, 1));
        fields.insert(Field::Direction, FieldRange::new(1, 4));
        fields.insert(Field::Roll, FieldRange::new(4, 5));
        fields.insert(Field::Position, FieldRange::new(5, 8));
        fields.insert(Field::Standoff, FieldRange::new(8, 9));
        fields.insert(Field::Preshape, FieldRange::new(9, 9 + preshape_dofs));
        Self {
            width: 9 + preshape_dofs,
            fields,
        }
    }

    pub fn builder(width: usize) -> HypothesisLayoutBuilder {
        HypothesisLayoutBuilder::new(width)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Every field is present after validation; a missing preshape is stored as an empty range.
    #[inline]
    pub fn range(&self, field: Field) -> FieldRange {
        self.fields.get(&field).copied().unwrap_or_default()
    }

    pub fn check_width(&self, id: impl fmt::Display, values: &[f64]) -> Result<(), LayoutError> {
        if values.len() != self.width {
            return Err(LayoutError::WidthMismatch {
                id: id.to_string(),
                expected: self.width,
                found: values.len(),
            });
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), LayoutError> {
        for field in Field::ALL {
            let range = self.range(field);
            if let Some(expected) = field.expected_len() {
                if range.len() != expected {
                    return Err(LayoutError::FieldLength {
                        field,
                        expected,
                        found: range.len(),
                    });
                }
            }
            if range.start > range.end || range.end > self.width {
                return Err(LayoutError::OutOfBounds {
                    field,
                    start: range.start,
                    end: range.end,
                    width: self.width,
                });
            }
        }

        for (i, &first) in Field::ALL.iter().enumerate() {
            for &second in &Field::ALL[i + 1..] {
                if self.range(first).overlaps(&self.range(second)) {
                    return Err(LayoutError::Overlap { first, second });
                }
            }
        }
        Ok(())
    }
}

pub struct HypothesisLayoutBuilder {
    width: usize,
    fields: HashMap<Field, FieldRange>,
}

impl HypothesisLayoutBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            fields: HashMap::new(),
        }
    }

    pub fn field(mut self, field: Field, range: impl Into<FieldRange>) -> Self {
        self.fields.insert(field, range.into());
        self
    }

    pub fn build(mut self) -> Result<HypothesisLayout, LayoutError> {
        for field in Field::ALL {
            if field == Field::Preshape {
                continue;
            }
            if !self.fields.contains_key(&field) {
                return Err(LayoutError::MissingField(field));
            }
        }
        let width = self.width;
        self.fields
            .entry(Field::Preshape)
            .or_insert_with(|| FieldRange::new(width, width));

        let layout = HypothesisLayout {
            width: self.width,
            fields: self.fields,
        };
        layout.validate()?;
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder(width: usize) -> HypothesisLayoutBuilder {
        HypothesisLayout::builder(width)
            .field(Field::Position, 0..3)
            .field(Field::Direction, 3..6)
            .field(Field::Roll, 6..7)
            .field(Field::Standoff, 7..8)
            .field(Field::Performance, 8..9)
    }

    #[test]
    fn standard_layout_is_valid_and_sized_by_preshape() {
        let layout = HypothesisLayout::standard(4);
        assert_eq!(layout.width(), 13);
        assert_eq!(layout.range(Field::Preshape), FieldRange::new(9, 13));
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn builder_defaults_preshape_to_an_empty_range() {
        let layout = complete_builder(9).build().unwrap();
        assert!(layout.range(Field::Preshape).is_empty());
    }

    #[test]
    fn builder_reports_missing_required_field() {
        let result = HypothesisLayout::builder(9)
            .field(Field::Position, 0..3)
            .field(Field::Direction, 3..6)
            .build();
        assert_eq!(result, Err(LayoutError::MissingField(Field::Roll)));
    }

    #[test]
    fn builder_rejects_wrong_field_length() {
        let result = complete_builder(9).field(Field::Position, 0..2).build();
        assert!(matches!(
            result,
            Err(LayoutError::FieldLength {
                field: Field::Position,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn builder_rejects_out_of_bounds_field() {
        let result = complete_builder(8).build();
        assert!(matches!(
            result,
            Err(LayoutError::OutOfBounds {
                field: Field::Performance,
                ..
            })
        ));
    }

    #[test]
    fn builder_rejects_overlapping_fields() {
        let result = complete_builder(9).field(Field::Roll, 2..3).build();
        assert_eq!(
            result,
            Err(LayoutError::Overlap {
                first: Field::Position,
                second: Field::Roll
            })
        );
    }

    #[test]
    fn check_width_reports_mismatch() {
        let layout = HypothesisLayout::standard(0);
        let err = layout.check_width("#3", &[0.0; 4]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::WidthMismatch {
                id: "#3".to_string(),
                expected: 9,
                found: 4
            }
        );
    }
}
