//! Per-line error accumulation

use crate::constraint::Violation;
use crate::error::ConvertError;
use crate::validate::Rejection;
use std::collections::BTreeMap;
use std::fmt;

/// One problem recorded against a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// A field failed its column constraints
    Constraint {
        /// Column name.
        column: String,
        /// Failed rule.
        violation: Violation,
        /// Raw value (empty when absent).
        value: String,
    },

    /// An accepted field could not be converted to its target type
    Conversion {
        /// Column name.
        column: String,
        /// Converter error.
        error: ConvertError,
        /// Raw value.
        value: String,
    },

    /// The validation hook rejected the record
    Validation(Rejection),

    /// The line was not valid UTF-8 and was decoded lossily
    Encoding,
}

/// Coarse classification of an [`Issue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// Column constraint violation
    Constraint,
    /// Type conversion failure
    Conversion,
    /// Validation hook failure
    Validation,
    /// Invalid UTF-8 on the line
    Encoding,
}

impl Issue {
    /// Classification of this issue
    pub fn kind(&self) -> IssueKind {
        match self {
            Issue::Constraint { .. } => IssueKind::Constraint,
            Issue::Conversion { .. } => IssueKind::Conversion,
            Issue::Validation(_) => IssueKind::Validation,
            Issue::Encoding => IssueKind::Encoding,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Constraint {
                column,
                violation,
                value,
            } => write!(f, "[{}] {} Value: {} ", column, violation, value),
            Issue::Conversion {
                column,
                error,
                value,
            } => write!(f, "[{}] could not be converted: {} Value: {} ", column, error, value),
            Issue::Validation(rejection) => write!(f, "{} ", rejection),
            Issue::Encoding => f.write_str("contains invalid UTF-8 "),
        }
    }
}

/// Mapping from 1-based line number to the issues recorded on it
///
/// Entries are never removed; the ledger only grows during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLedger {
    lines: BTreeMap<usize, Vec<Issue>>,
}

impl ErrorLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an issue to `line`, creating the entry if absent
    pub fn record(&mut self, line: usize, issue: Issue) {
        self.lines.entry(line).or_default().push(issue);
    }

    /// True when `line` has at least one issue
    pub fn contains(&self, line: usize) -> bool {
        self.lines.contains_key(&line)
    }

    /// Issues recorded on `line`, in recording order
    pub fn issues(&self, line: usize) -> &[Issue] {
        self.lines.get(&line).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Accumulated message text for `line`
    pub fn text(&self, line: usize) -> Option<String> {
        self.lines.get(&line).map(|issues| concat(issues))
    }

    /// Number of lines with issues
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when no line has issues
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of recorded issues across all lines
    pub fn issue_count(&self) -> usize {
        self.lines.values().map(Vec::len).sum()
    }

    /// `(line, issues)` pairs in line order
    pub fn entries(&self) -> impl Iterator<Item = (usize, &[Issue])> + '_ {
        self.lines.iter().map(|(line, issues)| (*line, issues.as_slice()))
    }

    /// Number of recorded issues of `kind`
    pub fn count_kind(&self, kind: IssueKind) -> usize {
        self.lines
            .values()
            .flatten()
            .filter(|issue| issue.kind() == kind)
            .count()
    }

    /// `(line, accumulated text)` pairs in line order
    pub fn iter(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        self.lines.iter().map(|(line, issues)| (*line, concat(issues)))
    }

    /// Human-readable summaries, regenerated on every call
    pub fn error_messages(&self) -> Vec<String> {
        self.iter()
            .map(|(line, text)| format!("Line {} contained the following errors: {}", line, text))
            .collect()
    }
}

fn concat(issues: &[Issue]) -> String {
    issues.iter().map(ToString::to_string).collect()
}
