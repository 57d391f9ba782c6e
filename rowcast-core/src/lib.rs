//! # Rowcast Core
//!
//! Schema-driven decoding of delimited text rows into strongly typed records.
//!
//! ## Modules
//!
//! - `constants`: Delimiter and defaults
//! - `schema`: Column specs, field setters and the `Record` trait
//! - `binder`: Header-to-schema binding
//! - `constraint`: Per-field constraint evaluation
//! - `convert`: Raw value to typed value conversion
//! - `validate`: Post-decode validation hook
//! - `ledger`: Per-line error accumulation
//! - `dedup`: Keep-first / keep-last compaction
//! - `decoder`: Line-at-a-time decode sessions
//! - `engine`: Reader and file level entry points
//! - `dynamic`: Runtime-described records and serialized schemas

#![warn(missing_docs)]

pub mod binder;
pub mod constants;
pub mod constraint;
pub mod convert;
pub mod decoder;
pub mod dedup;
pub mod dynamic;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod schema;
pub mod types;
pub mod validate;

// Re-export commonly used types
pub use dedup::KeepPolicy;
pub use decoder::{DecodeOptions, FieldErrorPolicy, StreamDecoder};
pub use engine::CsvEngine;
pub use error::{ConvertError, DecodeError, SchemaError};
pub use ledger::{ErrorLedger, Issue, IssueKind};
pub use schema::{ColumnSpec, Field, Record, Schema};
pub use types::{DecodeStats, Decoded, EngineState};
pub use validate::{RecordValidator, Rejection};

/// Result type alias for rowcast operations
pub type Result<T> = std::result::Result<T, DecodeError>;
