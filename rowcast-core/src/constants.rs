//! Constants and defaults for the rowcast record format

/// Field separator. Values are split naively: no quoting, no escaping.
pub const FIELD_DELIMITER: u8 = b',';

/// Byte-order mark some editors prepend to the first line
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Raw value treated as boolean `true` when a column declares no aliases of its own
pub const DEFAULT_TRUE_VALUE: &str = "Y";

/// Number of accepted records between two periodic compactions
pub const DEFAULT_COMPACTION_INTERVAL: usize = 10_000;

/// Returns the default boolean alias set (`["Y"]`)
pub fn default_true_values() -> Vec<String> {
    vec![DEFAULT_TRUE_VALUE.to_string()]
}
