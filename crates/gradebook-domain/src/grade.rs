//! Numeric course grade.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inclusive upper bound of a grade.
pub const MAX_GRADE: u8 = 100;

/// A grade in the range `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Grade(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("grade must be between 0 and {MAX_GRADE}, got {0}")]
pub struct GradeOutOfRange(pub i64);

impl Grade {
    pub fn new(value: i64) -> Result<Self, GradeOutOfRange> {
        match u8::try_from(value) {
            Ok(v) if v <= MAX_GRADE => Ok(Self(v)),
            _ => Err(GradeOutOfRange(value)),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Grade {
    type Error = GradeOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
