//! Subcommand implementations and the helpers they share

pub mod check;
pub mod decode;
pub mod schema;

use anyhow::{Context, Result};
use rowcast_core::dynamic::{DynamicRecord, SchemaFile};
use rowcast_core::{Rejection, RecordValidator, Schema};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::str::FromStr;

/// Read and parse a JSON schema file
pub fn load_schema_file(path: &str) -> Result<SchemaFile> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read schema file: {}", path))?;

    serde_json::from_str(&text).with_context(|| format!("Failed to parse schema file: {}", path))
}

/// Read, parse and validate a JSON schema file
pub fn load_schema(path: &str) -> Result<Schema<DynamicRecord>> {
    load_schema_file(path)?
        .into_schema()
        .with_context(|| format!("Invalid schema: {}", path))
}

/// Open the CSV input, or stdin for `-`
pub fn open_input(input: &str) -> Result<Box<dyn BufRead>> {
    if input == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let file = File::open(input).with_context(|| format!("Failed to open input file: {}", input))?;
    Ok(Box::new(BufReader::new(file)))
}

/// `column=value` pair rejected by the deny list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyRule {
    /// Column to inspect
    pub column: String,
    /// Value to reject, compared case-insensitively
    pub value: String,
}

impl FromStr for DenyRule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((column, value)) if !column.trim().is_empty() => Ok(Self {
                column: column.trim().to_string(),
                value: value.trim().to_string(),
            }),
            _ => Err(format!("expected column=value, got '{}'", s)),
        }
    }
}

impl fmt::Display for DenyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.column, self.value)
    }
}

/// Validation hook rejecting records that carry a denied value
#[derive(Debug, Clone, Default)]
pub struct DenyList {
    rules: Vec<DenyRule>,
}

impl DenyList {
    /// Build a deny list from parsed rules
    pub fn new(rules: Vec<DenyRule>) -> Self {
        Self { rules }
    }
}

impl RecordValidator<DynamicRecord> for DenyList {
    fn validate(&self, record: &DynamicRecord) -> std::result::Result<(), Rejection> {
        for rule in &self.rules {
            let Some(value) = record.get(&rule.column) else {
                continue;
            };

            let text = value.to_string();
            if text.eq_ignore_ascii_case(&rule.value) {
                return Err(Rejection::new(format!(
                    "Cannot use the {} [{}]",
                    rule.column,
                    text.to_uppercase()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcast_core::dynamic::FieldValue;

    #[test]
    fn test_parse_deny_rule() {
        let rule: DenyRule = "last_name=Doe".parse().unwrap();
        assert_eq!(rule.column, "last_name");
        assert_eq!(rule.value, "Doe");
        assert_eq!(rule.to_string(), "last_name=Doe");

        assert!("last_name".parse::<DenyRule>().is_err());
        assert!("=Doe".parse::<DenyRule>().is_err());
    }

    #[test]
    fn test_deny_list_is_case_insensitive() {
        let deny = DenyList::new(vec!["last_name=doe".parse().unwrap()]);

        let mut record = DynamicRecord::default();
        record.insert("last_name", FieldValue::Text("Doe".to_string()));
        let rejection = deny.validate(&record).unwrap_err();
        assert_eq!(rejection.message(), "Cannot use the last_name [DOE]");

        let mut other = DynamicRecord::default();
        other.insert("last_name", FieldValue::Text("Smith".to_string()));
        assert!(deny.validate(&other).is_ok());
        assert!(deny.validate(&DynamicRecord::default()).is_ok());
    }
}
