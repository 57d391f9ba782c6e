//! Per-field constraint evaluation

use crate::schema::ColumnSpec;
use std::fmt;

/// Why a raw value was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Empty value in a non-nullable column
    Null,

    /// Value shorter than the declared minimum
    TooShort(i64),

    /// Value longer than the declared maximum
    TooLong(i64),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Null => write!(f, "was null!"),
            Violation::TooShort(min) => write!(f, "is less than the length of {}", min),
            Violation::TooLong(max) => write!(f, "is greater than the length of {}", max),
        }
    }
}

/// Evaluate a raw value against its column spec
///
/// Rules are checked in order and the first failing one wins:
/// 1. empty (or absent) value on a non-nullable column
/// 2. no effective length bounds: accept
/// 3. shorter than the minimum
/// 4. longer than the maximum
pub fn evaluate(value: Option<&str>, spec: &ColumnSpec) -> Result<(), Violation> {
    let value = value.unwrap_or_default();

    if value.is_empty() && !spec.nullable {
        return Err(Violation::Null);
    }

    if !spec.has_length_bounds() {
        return Ok(());
    }

    let len = i64::try_from(value.chars().count()).unwrap_or(i64::MAX);

    if len < spec.min_length {
        return Err(Violation::TooShort(spec.min_length));
    }

    if let Some(max) = spec.max_length {
        if len > max {
            return Err(Violation::TooLong(max));
        }
    }

    Ok(())
}
