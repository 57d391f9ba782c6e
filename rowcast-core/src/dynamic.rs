//! Records described at runtime
//!
//! [`SchemaFile`] is the serialized form of a schema; it converts into a
//! `Schema<DynamicRecord>` whose setters store typed [`FieldValue`]s by column
//! name. This is what the command-line tool decodes into.

use crate::convert::FromCell;
use crate::error::{ConvertError, SchemaError};
use crate::schema::{ColumnSpec, Field, Schema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Target type of a dynamic column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Raw text
    #[default]
    String,
    /// Signed 64-bit integer
    Integer,
    /// 64-bit float
    Float,
    /// Alias-set boolean
    Boolean,
    /// Single character
    Char,
}

/// A typed value stored on a [`DynamicRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Integer(i64),
    /// Float
    Float(f64),
    /// Text (also used for single characters)
    Text(String),
}

impl FieldValue {
    /// Convert `raw` into a value of `kind`
    pub fn parse(kind: FieldKind, raw: &str, spec: &ColumnSpec) -> Result<Self, ConvertError> {
        Ok(match kind {
            FieldKind::String => FieldValue::Text(String::from_cell(raw, spec)?),
            FieldKind::Integer => FieldValue::Integer(i64::from_cell(raw, spec)?),
            FieldKind::Float => FieldValue::Float(f64::from_cell(raw, spec)?),
            FieldKind::Boolean => FieldValue::Bool(bool::from_cell(raw, spec)?),
            FieldKind::Char => FieldValue::Text(char::from_cell(raw, spec)?.to_string()),
        })
    }

    /// Text content, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Column name → value map; unset columns are absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicRecord {
    values: BTreeMap<String, FieldValue>,
}

impl DynamicRecord {
    /// Value stored for `column`
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.values.get(column)
    }

    /// Store a value for `column`
    pub fn insert(&mut self, column: impl Into<String>, value: FieldValue) {
        self.values.insert(column.into(), value);
    }

    /// Number of populated columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no column is populated
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Populated columns in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// One column of a [`SchemaFile`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDecl {
    /// Constraints
    #[serde(flatten)]
    pub spec: ColumnSpec,

    /// Target type
    #[serde(default)]
    pub kind: FieldKind,
}

/// Serializable schema description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Declared columns, in order
    pub columns: Vec<ColumnDecl>,
}

impl SchemaFile {
    /// Validate and build a dynamic schema
    pub fn into_schema(self) -> Result<Schema<DynamicRecord>, SchemaError> {
        let schema = self
            .columns
            .into_iter()
            .fold(Schema::new(), |schema, decl| schema.field(dynamic_field(decl)));
        schema.validate()?;
        Ok(schema)
    }
}

fn dynamic_field(decl: ColumnDecl) -> Field<DynamicRecord> {
    let column = decl.spec.name.clone();
    let kind = decl.kind;

    Field::new(decl.spec, move |record: &mut DynamicRecord, raw, spec| {
        record.insert(column.as_str(), FieldValue::parse(kind, raw, spec)?);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CsvEngine;
    use std::io::Cursor;

    const SCHEMA: &str = r#"{
        "columns": [
            {"name": "name", "min_length": 1, "max_length": 10},
            {"name": "age", "kind": "integer", "nullable": true},
            {"name": "score", "kind": "float", "nullable": true},
            {"name": "vip", "kind": "boolean", "nullable": true, "true_values": ["Y", "yes"]},
            {"name": "grade", "kind": "char", "nullable": true}
        ]
    }"#;

    fn engine() -> CsvEngine<DynamicRecord> {
        let file: SchemaFile = serde_json::from_str(SCHEMA).unwrap();
        CsvEngine::new(file.into_schema().unwrap())
    }

    #[test]
    fn test_schema_file_defaults() {
        let file: SchemaFile = serde_json::from_str(SCHEMA).unwrap();
        assert_eq!(file.columns[0].kind, FieldKind::String);
        assert!(!file.columns[0].spec.nullable);
        assert_eq!(file.columns[3].spec.true_values, vec!["Y", "yes"]);
        assert_eq!(file.columns[4].spec.true_values, vec!["Y"]);
    }

    #[test]
    fn test_dynamic_decode() {
        let input = "name,age,score,vip,grade\nAda,36,9.5,yes,A\nBob,,,no,\n";
        let decoded = engine().decode(Cursor::new(input)).unwrap();

        assert!(decoded.ledger.is_empty());
        let ada = &decoded.records[0];
        assert_eq!(ada.get("age"), Some(&FieldValue::Integer(36)));
        assert_eq!(ada.get("score"), Some(&FieldValue::Float(9.5)));
        assert_eq!(ada.get("vip"), Some(&FieldValue::Bool(true)));
        assert_eq!(ada.get("grade").and_then(FieldValue::as_str), Some("A"));

        let bob = &decoded.records[1];
        assert_eq!(bob.get("age"), None);
        assert_eq!(bob.get("vip"), Some(&FieldValue::Bool(false)));
        assert_eq!(bob.len(), 2);
    }

    #[test]
    fn test_conversion_error_recorded() {
        let input = "name,age\nAda,old\n";
        let decoded = engine().decode(Cursor::new(input)).unwrap();

        assert!(decoded.records.is_empty());
        assert_eq!(
            decoded.ledger.text(2).unwrap(),
            "[age] could not be converted: is not a valid i64: invalid digit found in string Value: old "
        );
    }

    #[test]
    fn test_record_serializes_as_map() {
        let mut record = DynamicRecord::default();
        record.insert("b", FieldValue::Integer(2));
        record.insert("a", FieldValue::Text("x".to_string()));
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"a":"x","b":2}"#);
    }

    #[test]
    fn test_invalid_schema_file() {
        let file: SchemaFile =
            serde_json::from_str(r#"{"columns":[{"name":"zip","min_length":9,"max_length":5}]}"#).unwrap();
        assert!(matches!(
            file.into_schema(),
            Err(SchemaError::InvalidLength { .. })
        ));
    }
}
