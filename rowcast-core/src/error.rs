//! Error types for rowcast operations

use thiserror::Error;

/// Fatal schema configuration errors
///
/// These are programmer errors in the declared column list. They abort a
/// decode session before any data row is processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Length bounds are negative or inverted
    #[error("{column} maximum must be greater than or equal to the minimum and cannot be negative (min {min}, max {max})")]
    InvalidLength {
        /// Column the bounds belong to.
        column: String,
        /// Declared minimum length.
        min: i64,
        /// Declared maximum length.
        max: i64,
    },

    /// Two declared columns share a name
    #[error("Column {0} is declared more than once")]
    DuplicateColumn(String),

    /// A declared column has an empty name
    #[error("Column names cannot be empty")]
    EmptyColumnName,
}

/// A raw value could not be converted into its target type
///
/// Conversion failures are recorded against the offending line, never
/// propagated out of a decode session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Value is not a valid number of the target type
    #[error("is not a valid {kind}: {reason}")]
    InvalidNumber {
        /// Target type name.
        kind: &'static str,
        /// Parser message.
        reason: String,
    },

    /// Value is not exactly one character
    #[error("is not a single character")]
    InvalidChar,
}

/// Fatal errors that terminate a decode run
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Invalid schema declaration
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Failure reading the input source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The session already reached its terminal state
    #[error("Decode session is already finished")]
    Finished,
}
