//! Typed cell values and the three-valued category.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// A categorical value drawn from the fixed set `{A, B, Neutral}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    A,
    B,
    Neutral,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::A, Category::B, Category::Neutral];

    /// The next value in the `A -> B -> Neutral -> A` cycle.
    pub fn next(self) -> Self {
        match self {
            Category::A => Category::B,
            Category::B => Category::Neutral,
            Category::Neutral => Category::A,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::A => "a",
            Category::B => "b",
            Category::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display labels for the three category values of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabels {
    a: String,
    b: String,
    neutral: String,
}

impl CategoryLabels {
    pub fn new(
        a: impl Into<String>,
        b: impl Into<String>,
        neutral: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let labels = Self {
            a: a.into().trim().to_string(),
            b: b.into().trim().to_string(),
            neutral: neutral.into().trim().to_string(),
        };
        for (i, first) in Category::ALL.iter().enumerate() {
            for second in &Category::ALL[i + 1..] {
                if labels.label(*first) == labels.label(*second) {
                    return Err(ModelError::DuplicateCategoryLabel {
                        label: labels.label(*first).to_string(),
                        first: *first,
                        second: *second,
                    });
                }
            }
        }
        Ok(labels)
    }

    pub fn label(&self, category: Category) -> &str {
        match category {
            Category::A => &self.a,
            Category::B => &self.b,
            Category::Neutral => &self.neutral,
        }
    }

    /// Resolve a raw cell or operand to its category. Matching is exact after trimming.
    pub fn parse(&self, raw: &str) -> Option<Category> {
        let raw = raw.trim();
        Category::ALL
            .into_iter()
            .find(|category| self.label(*category) == raw)
    }
}

/// A single typed cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Text(String),
    Number(f64),
    Category(Category),
    Missing,
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_category(&self) -> Option<Category> {
        match self {
            Value::Category(c) => Some(*c),
            _ => None,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Number(_) => 0,
            Value::Text(_) => 1,
            Value::Category(_) => 2,
            Value::Missing => 3,
        }
    }

    /// Total order used for sorting: numbers numerically, text
    /// lexicographically, categories `A < B < Neutral`, missing last.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Category(a), Value::Category(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Category(c) => write!(f, "{c}"),
            Value::Missing => Ok(()),
        }
    }
}

/// Formats a number without a trailing `.0` for integral values.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_cycle_has_period_three() {
        for start in Category::ALL {
            assert_ne!(start.next(), start);
            assert_eq!(start.next().next().next(), start);
        }
    }

    #[test]
    fn labels_reject_duplicates() {
        let err = CategoryLabels::new("x", "y", "x").unwrap_err();
        assert!(matches!(err, ModelError::DuplicateCategoryLabel { .. }));
    }

    #[test]
    fn labels_parse_trims() {
        let labels = CategoryLabels::new("democrat", "republican", "unsure").unwrap();
        assert_eq!(labels.parse(" republican "), Some(Category::B));
        assert_eq!(labels.parse("Republican"), None);
    }

    #[test]
    fn missing_sorts_after_everything() {
        assert_eq!(
            Value::Missing.sort_cmp(&Value::Number(1.0)),
            Ordering::Greater
        );
        assert_eq!(
            Value::text("b").sort_cmp(&Value::text("a")),
            Ordering::Greater
        );
        assert_eq!(
            Value::Number(2.0).sort_cmp(&Value::Number(10.0)),
            Ordering::Less
        );
    }

    #[test]
    fn format_number_trims_integral() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(2019.0), "2019");
        assert_eq!(format_number(12.5), "12.5");
    }
}
