//! Key-based compaction of the retained record sequence

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

/// Which record survives when several share a key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepPolicy {
    /// Keep the earliest record, at its original position
    #[default]
    First,

    /// Keep the latest record, at its final position
    Last,
}

/// Remove duplicate keys from `records` in place
///
/// Survivors keep their relative order. Compaction is idempotent, and
/// compacting a prefix before appending more records and compacting again
/// yields the same sequence as one compaction over everything.
///
/// Returns the number of records removed.
pub fn compact<T, K, F>(records: &mut Vec<T>, key: F, policy: KeepPolicy) -> usize
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let before = records.len();
    let mut seen = HashSet::with_capacity(before);

    match policy {
        KeepPolicy::First => records.retain(|r| seen.insert(key(r))),
        KeepPolicy::Last => {
            records.reverse();
            records.retain(|r| seen.insert(key(r)));
            records.reverse();
        }
    }

    before - records.len()
}

/// Owned variant of [`compact`]
pub fn remove_duplicates<T, K, F>(mut records: Vec<T>, key: F, policy: KeepPolicy) -> Vec<T>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    compact(&mut records, key, policy);
    records
}
