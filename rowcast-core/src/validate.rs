//! Post-decode record validation hook

use std::fmt;

/// Outcome of a failed record check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    message: String,
}

impl Rejection {
    /// Create a rejection with a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The rejection message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<String> for Rejection {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for Rejection {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Caller-supplied check run on every fully decoded record
///
/// A failure excludes the record from the output and is recorded against
/// its line. Closures of the form `Fn(&T) -> Result<(), Rejection>`
/// implement this trait.
pub trait RecordValidator<T> {
    /// Check a decoded record
    fn validate(&self, record: &T) -> Result<(), Rejection>;
}

impl<T, F> RecordValidator<T> for F
where
    F: Fn(&T) -> Result<(), Rejection>,
{
    fn validate(&self, record: &T) -> Result<(), Rejection> {
        self(record)
    }
}

/// Run the hook if one is installed
pub(crate) fn run_hook<T>(
    validator: Option<&dyn RecordValidator<T>>,
    record: &T,
) -> Option<Rejection> {
    validator.and_then(|v| v.validate(record).err())
}
