//! Session state, statistics and decode results

use crate::ledger::ErrorLedger;
use serde::{Deserialize, Serialize};

/// Lifecycle of a decode session
///
/// `Idle → SchemaBound → Streaming ⇄ Compacted → Done`. Nothing leaves `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineState {
    /// No non-blank line seen yet
    Idle,
    /// Header bound, no data row processed yet
    SchemaBound,
    /// Processing data rows
    Streaming,
    /// A compaction just ran
    Compacted,
    /// End of input reached; terminal
    Done,
}

/// Counters collected while decoding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Every physical line read, including the header and blank lines
    pub lines_read: usize,

    /// Blank or whitespace-only lines skipped
    pub blank_lines: usize,

    /// Non-blank lines after the header
    pub data_rows: usize,

    /// Data rows excluded from the output
    pub rejected_rows: usize,

    /// Records appended to the output before compaction
    pub records_accepted: usize,

    /// Records removed by compaction
    pub duplicates_removed: usize,

    /// Records in the final output
    pub records_retained: usize,

    /// Compaction passes run, including the final one
    pub compactions: usize,
}

impl DecodeStats {
    /// Retained records as a percentage of data rows
    pub fn retention_rate(&self) -> f64 {
        if self.data_rows == 0 {
            0.0
        } else {
            (self.records_retained as f64 / self.data_rows as f64) * 100.0
        }
    }
}

/// Output of a finished decode session
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    /// Retained records, in input order after compaction
    pub records: Vec<T>,

    /// Errors recorded per line
    pub ledger: ErrorLedger,

    /// Session counters
    pub stats: DecodeStats,
}

impl<T> Decoded<T> {
    /// Total rows seen (every physical line read)
    pub fn total_rows(&self) -> usize {
        self.stats.lines_read
    }

    /// Formatted per-line error summaries
    pub fn error_messages(&self) -> Vec<String> {
        self.ledger.error_messages()
    }
}
