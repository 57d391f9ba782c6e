//! Header binding: resolve header columns against the declared schema

use crate::error::SchemaError;
use crate::schema::Schema;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// A header position bound to a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundColumn {
    /// 0-based position in the header row
    pub index: usize,

    /// Position of the field in the schema
    pub field: usize,
}

/// Resolved mapping from header positions to declared fields
///
/// Built once per decode session from the first non-blank line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBinding {
    columns: Vec<BoundColumn>,
    unbound: Vec<usize>,
}

impl FieldBinding {
    /// Bound columns in header order
    pub fn columns(&self) -> &[BoundColumn] {
        &self.columns
    }

    /// Schema positions of declared fields absent from the header
    pub fn unbound(&self) -> &[usize] {
        &self.unbound
    }

    /// Schema field bound at header position `index`
    pub fn field_at(&self, index: usize) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.index == index)
            .map(|c| c.field)
    }

    /// Number of bound columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when no declared field matched the header
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Bind a header row to `schema`
///
/// Every declared spec is validated first; an invalid one fails the whole
/// binding. Header columns with no declared spec are ignored, and declared
/// specs missing from the header stay unbound. When a name appears more than
/// once in the header, the first occurrence wins.
pub fn bind<T>(header: &[&str], schema: &Schema<T>) -> Result<FieldBinding, SchemaError> {
    schema.validate()?;

    let mut binding = FieldBinding::default();

    for (field, spec) in schema.specs().enumerate() {
        match header.iter().position(|name| *name == spec.name) {
            Some(index) => binding.columns.push(BoundColumn { index, field }),
            None => {
                #[cfg(feature = "logging")]
                warn!("Column {} is not present in the header and stays unbound", spec.name);

                binding.unbound.push(field);
            }
        }
    }

    binding.columns.sort_by_key(|c| c.index);

    #[cfg(feature = "logging")]
    debug!(
        "Bound {} of {} declared columns against a {}-column header",
        binding.columns.len(),
        schema.len(),
        header.len()
    );

    Ok(binding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnSpec;

    #[derive(Default)]
    struct Row {
        a: String,
        c: String,
        z: String,
    }

    fn schema() -> Schema<Row> {
        Schema::new()
            .column(ColumnSpec::new("c"), |r: &mut Row, v: String| r.c = v)
            .column(ColumnSpec::new("a"), |r: &mut Row, v: String| r.a = v)
            .column(ColumnSpec::new("z"), |r: &mut Row, v: String| r.z = v)
    }

    #[test]
    fn test_bind_by_name_not_position() {
        let binding = bind(&["a", "b", "c"], &schema()).unwrap();

        assert_eq!(
            binding.columns(),
            &[
                BoundColumn { index: 0, field: 1 },
                BoundColumn { index: 2, field: 0 },
            ]
        );
        assert_eq!(binding.field_at(1), None);
        assert_eq!(binding.field_at(2), Some(0));
    }

    #[test]
    fn test_missing_column_is_unbound() {
        let binding = bind(&["a", "c"], &schema()).unwrap();
        assert_eq!(binding.unbound(), &[2]);
        assert_eq!(binding.len(), 2);
    }

    #[test]
    fn test_exact_match_only() {
        let binding = bind(&[" a", "A", "c "], &schema()).unwrap();
        assert!(binding.is_empty());
    }

    #[test]
    fn test_invalid_spec_fails_even_when_unbound() {
        let schema: Schema<Row> = schema().column(
            ColumnSpec::new("missing").with_length(3, 1),
            |r: &mut Row, v: String| r.z = v,
        );
        assert!(matches!(
            bind(&["a"], &schema),
            Err(SchemaError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_duplicate_header_first_wins() {
        let binding = bind(&["a", "a"], &schema()).unwrap();
        assert_eq!(binding.field_at(0), Some(1));
        assert_eq!(binding.field_at(1), None);
    }
}
