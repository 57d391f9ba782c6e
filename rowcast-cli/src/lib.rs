//! Library entry for rowcast-cli used by integration tests and embedding.

pub mod commands;

// Re-export commands for convenience
pub use commands::*;

use rowcast_core::KeepPolicy;

/// Which record survives deduplication
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum KeepArg {
    /// Keep the earliest record for each key
    #[default]
    First,
    /// Keep the latest record for each key
    Last,
}

impl From<KeepArg> for KeepPolicy {
    fn from(arg: KeepArg) -> Self {
        match arg {
            KeepArg::First => KeepPolicy::First,
            KeepArg::Last => KeepPolicy::Last,
        }
    }
}
