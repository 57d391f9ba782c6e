//! Streaming record decoding
//!
//! A [`StreamDecoder`] consumes one line at a time. The first non-blank line
//! binds the schema; every later non-blank line is split, evaluated field by
//! field, converted, validated and either retained or dropped. When a
//! deduplication key is configured, the retained records are compacted every
//! `compaction_interval` accepted records and once more when the stream ends.

use crate::binder::{bind, FieldBinding};
use crate::constants::{BYTE_ORDER_MARK, DEFAULT_COMPACTION_INTERVAL, FIELD_DELIMITER};
use crate::constraint::evaluate;
use crate::dedup::{compact, KeepPolicy};
use crate::error::DecodeError;
use crate::ledger::{ErrorLedger, Issue};
use crate::schema::Schema;
use crate::types::{DecodeStats, Decoded, EngineState};
use crate::validate::{run_hook, RecordValidator};
use crate::Result;
use std::hash::Hash;
use std::io::BufRead;
use std::mem;

#[cfg(feature = "logging")]
use tracing::{debug, trace, warn};

/// What happens to a row when one of its fields fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldErrorPolicy {
    /// Any recorded error on a line excludes its record
    #[default]
    DropRow,

    /// Failed fields keep their default; only a hook failure excludes the record
    KeepRow,
}

/// Tunables for a decode session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Accepted records between periodic compactions; 0 disables them
    pub compaction_interval: usize,

    /// Row handling for field-level failures
    pub field_errors: FieldErrorPolicy,
}

impl DecodeOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the periodic compaction interval
    pub fn with_compaction_interval(mut self, interval: usize) -> Self {
        self.compaction_interval = interval;
        self
    }

    /// Set the field error policy
    pub fn with_field_errors(mut self, policy: FieldErrorPolicy) -> Self {
        self.field_errors = policy;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            compaction_interval: DEFAULT_COMPACTION_INTERVAL,
            field_errors: FieldErrorPolicy::default(),
        }
    }
}

/// Split a line on the field delimiter; a delimiter inside a value always splits
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;

    for pos in memchr::memchr_iter(FIELD_DELIMITER, line.as_bytes()) {
        fields.push(&line[start..pos]);
        start = pos + 1;
    }
    fields.push(&line[start..]);

    fields
}

type Compactor<'e, T> = Box<dyn Fn(&mut Vec<T>) -> usize + 'e>;

/// Line-at-a-time decode session
pub struct StreamDecoder<'e, T> {
    schema: &'e Schema<T>,
    validator: Option<&'e dyn RecordValidator<T>>,
    compactor: Option<Compactor<'e, T>>,
    options: DecodeOptions,
    state: EngineState,
    binding: Option<FieldBinding>,
    records: Vec<T>,
    ledger: ErrorLedger,
    stats: DecodeStats,
    line: usize,
    since_compaction: usize,
}

impl<'e, T: Default> StreamDecoder<'e, T> {
    /// Create an idle session over `schema`
    pub fn new(schema: &'e Schema<T>) -> Self {
        Self {
            schema,
            validator: None,
            compactor: None,
            options: DecodeOptions::default(),
            state: EngineState::Idle,
            binding: None,
            records: Vec::new(),
            ledger: ErrorLedger::new(),
            stats: DecodeStats::default(),
            line: 0,
            since_compaction: 0,
        }
    }

    /// Install the post-decode validation hook
    pub fn with_validator(mut self, validator: &'e dyn RecordValidator<T>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Replace the session options
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Deduplicate retained records by `key` under `policy`
    pub fn with_dedup<K, F>(mut self, key: F, policy: KeepPolicy) -> Self
    where
        K: Hash + Eq,
        F: Fn(&T) -> K + 'e,
    {
        self.compactor = Some(Box::new(move |records: &mut Vec<T>| {
            compact(records, &key, policy)
        }));
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Header binding, once the first non-blank line has been seen
    pub fn binding(&self) -> Option<&FieldBinding> {
        self.binding.as_ref()
    }

    /// Records retained so far
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Errors recorded so far
    pub fn ledger(&self) -> &ErrorLedger {
        &self.ledger
    }

    /// Counters so far
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Feed one physical line (a trailing line terminator is ignored)
    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        self.feed(line, false)
    }

    /// Feed one physical line of raw bytes
    ///
    /// Invalid UTF-8 is replaced lossily and an encoding issue is recorded
    /// against the line; the stream keeps going.
    pub fn feed_bytes(&mut self, line: &[u8]) -> Result<()> {
        match std::str::from_utf8(line) {
            Ok(text) => self.feed(text, false),
            Err(_) => self.feed(&String::from_utf8_lossy(line), true),
        }
    }

    fn feed(&mut self, line: &str, lossy: bool) -> Result<()> {
        if self.state == EngineState::Done {
            return Err(DecodeError::Finished);
        }

        self.stats.lines_read += 1;

        let mut line = line.trim_end_matches(['\r', '\n']);
        if self.binding.is_none() {
            line = line.trim_start_matches(BYTE_ORDER_MARK);
        }

        if line.trim().is_empty() {
            self.stats.blank_lines += 1;
            return Ok(());
        }

        self.line += 1;
        let fields = split_fields(line);

        if self.binding.is_none() {
            #[cfg(feature = "logging")]
            if lossy {
                warn!("Header line contains invalid UTF-8");
            }

            return self.bind_header(&fields);
        }

        self.decode_row(&fields, lossy);
        Ok(())
    }

    /// Run a compaction pass now; returns the number of records removed
    ///
    /// Without a configured key this only moves the state machine.
    pub fn compact(&mut self) -> Result<usize> {
        if self.state == EngineState::Done {
            return Err(DecodeError::Finished);
        }
        Ok(self.run_compaction())
    }

    /// End the stream: final compaction, then `Done`
    pub fn finish(&mut self) -> Result<Decoded<T>> {
        if self.state == EngineState::Done {
            return Err(DecodeError::Finished);
        }

        self.run_compaction();
        self.state = EngineState::Done;

        let records = mem::take(&mut self.records);
        self.stats.records_retained = records.len();

        #[cfg(feature = "logging")]
        debug!(
            "Decode complete: {} lines read, {} records retained, {} lines with errors",
            self.stats.lines_read,
            self.stats.records_retained,
            self.ledger.len()
        );

        Ok(Decoded {
            records,
            ledger: mem::take(&mut self.ledger),
            stats: self.stats.clone(),
        })
    }

    /// Feed every line of `reader`, then finish
    ///
    /// The reader is owned by the call and dropped on every exit path.
    pub fn run<R: BufRead>(mut self, mut reader: R) -> Result<Decoded<T>> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            self.feed_bytes(&buf)?;
        }
        self.finish()
    }

    fn bind_header(&mut self, header: &[&str]) -> Result<()> {
        match bind(header, self.schema) {
            Ok(binding) => {
                self.binding = Some(binding);
                self.state = EngineState::SchemaBound;
                Ok(())
            }
            Err(err) => {
                self.state = EngineState::Done;
                Err(err.into())
            }
        }
    }

    fn decode_row(&mut self, fields: &[&str], lossy: bool) {
        let Some(binding) = self.binding.as_ref() else {
            return;
        };

        self.state = EngineState::Streaming;
        self.stats.data_rows += 1;

        let line = self.line;
        let mut record = T::default();
        let mut field_failed = false;

        if lossy {
            self.ledger.record(line, Issue::Encoding);
            field_failed = true;
        }

        for column in binding.columns() {
            let field = &self.schema.fields()[column.field];
            let spec = field.spec();
            let raw = fields.get(column.index).copied();

            if let Err(violation) = evaluate(raw, spec) {
                self.ledger.record(
                    line,
                    Issue::Constraint {
                        column: spec.name.clone(),
                        violation,
                        value: raw.unwrap_or_default().to_string(),
                    },
                );
                field_failed = true;
                continue;
            }

            let raw = raw.unwrap_or_default();
            if spec.nullable && raw.trim().is_empty() {
                continue;
            }

            if let Err(error) = field.assign(&mut record, raw) {
                self.ledger.record(
                    line,
                    Issue::Conversion {
                        column: spec.name.clone(),
                        error,
                        value: raw.to_string(),
                    },
                );
                field_failed = true;
            }
        }

        let hook_failed = match run_hook(self.validator, &record) {
            Some(rejection) => {
                self.ledger.record(line, Issue::Validation(rejection));
                true
            }
            None => false,
        };

        let tainted = hook_failed
            || (field_failed && self.options.field_errors == FieldErrorPolicy::DropRow);

        if tainted {
            self.stats.rejected_rows += 1;

            #[cfg(feature = "logging")]
            trace!("Line {} rejected", line);

            return;
        }

        self.records.push(record);
        self.stats.records_accepted += 1;
        self.since_compaction += 1;

        let interval = self.options.compaction_interval;
        if interval > 0 && self.since_compaction >= interval && self.compactor.is_some() {
            self.run_compaction();
        }
    }

    fn run_compaction(&mut self) -> usize {
        let mut removed = 0;

        if let Some(compactor) = &self.compactor {
            #[cfg(feature = "logging")]
            let before = self.records.len();

            removed = compactor(&mut self.records);
            self.stats.compactions += 1;
            self.stats.duplicates_removed += removed;

            #[cfg(feature = "logging")]
            debug!(
                "Compaction at line {}: {} -> {} records",
                self.line,
                before,
                self.records.len()
            );
        }

        self.since_compaction = 0;
        if self.state != EngineState::Idle {
            self.state = EngineState::Compacted;
        }

        removed
    }
}
