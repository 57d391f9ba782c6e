//! Schema declaration: column constraints and field setters

use crate::constants::{default_true_values, DEFAULT_TRUE_VALUE};
use crate::convert::FromCell;
use crate::error::{ConvertError, SchemaError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Declared constraint set for one named column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Header name this spec binds to (exact match)
    pub name: String,

    /// Whether an empty value is accepted
    #[serde(default)]
    pub nullable: bool,

    /// Minimum value length in characters
    #[serde(default)]
    pub min_length: i64,

    /// Maximum value length in characters; `None` means unbounded
    #[serde(default)]
    pub max_length: Option<i64>,

    /// Raw values that convert to boolean `true`
    #[serde(default = "default_true_values")]
    pub true_values: Vec<String>,
}

impl ColumnSpec {
    /// Create a non-nullable, unbounded spec for `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            min_length: 0,
            max_length: None,
            true_values: default_true_values(),
        }
    }

    /// Accept empty values
    pub fn allow_null(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Set the minimum length
    pub fn with_min_length(mut self, min: i64) -> Self {
        self.min_length = min;
        self
    }

    /// Set the maximum length
    pub fn with_max_length(mut self, max: i64) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Set both length bounds
    pub fn with_length(self, min: i64, max: i64) -> Self {
        self.with_min_length(min).with_max_length(max)
    }

    /// Replace the boolean alias set
    pub fn with_true_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.true_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// True when either bound is set to a non-zero value
    pub fn has_length_bounds(&self) -> bool {
        self.min_length != 0 || self.max_length.is_some_and(|max| max != 0)
    }

    /// Boolean conversion: membership in the alias set, case-sensitive
    pub fn is_true_value(&self, raw: &str) -> bool {
        if self.true_values.is_empty() {
            return raw == DEFAULT_TRUE_VALUE;
        }
        self.true_values.iter().any(|alias| alias == raw)
    }

    /// Validate the declared bounds
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyColumnName);
        }

        let invalid = match self.max_length {
            Some(max) => self.min_length < 0 || max < 0 || max < self.min_length,
            None => self.min_length < 0,
        };

        if invalid {
            return Err(SchemaError::InvalidLength {
                column: self.name.clone(),
                min: self.min_length,
                max: self.max_length.unwrap_or(i64::MAX),
            });
        }

        Ok(())
    }
}

/// Converts a raw value and stores it on the target record
pub type Setter<T> = Box<dyn Fn(&mut T, &str, &ColumnSpec) -> Result<(), ConvertError>>;

/// One declared field: its column spec plus the setter that populates it
pub struct Field<T> {
    spec: ColumnSpec,
    setter: Setter<T>,
}

impl<T> Field<T> {
    /// Create a field from a spec and an arbitrary setter
    pub fn new<F>(spec: ColumnSpec, setter: F) -> Self
    where
        F: Fn(&mut T, &str, &ColumnSpec) -> Result<(), ConvertError> + 'static,
    {
        Self {
            spec,
            setter: Box::new(setter),
        }
    }

    /// Create a field whose raw value converts through [`FromCell`]
    pub fn typed<V>(spec: ColumnSpec, assign: fn(&mut T, V)) -> Self
    where
        T: 'static,
        V: FromCell + 'static,
    {
        Self::new(spec, move |record, raw, spec| {
            assign(record, V::from_cell(raw, spec)?);
            Ok(())
        })
    }

    /// The column spec
    pub fn spec(&self) -> &ColumnSpec {
        &self.spec
    }

    /// Convert `raw` and store it on `record`
    pub fn assign(&self, record: &mut T, raw: &str) -> Result<(), ConvertError> {
        (self.setter)(record, raw, &self.spec)
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").field("spec", &self.spec).finish()
    }
}

/// Ordered list of declared fields for a record type
pub struct Schema<T> {
    fields: Vec<Field<T>>,
}

impl<T> Schema<T> {
    /// Create an empty schema
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field
    pub fn field(mut self, field: Field<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a typed column
    pub fn column<V>(self, spec: ColumnSpec, assign: fn(&mut T, V)) -> Self
    where
        T: 'static,
        V: FromCell + 'static,
    {
        self.field(Field::typed(spec, assign))
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Iterate over the column specs
    pub fn specs(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.fields.iter().map(Field::spec)
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field is declared
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate every declared spec and reject duplicate column names
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut names = HashSet::with_capacity(self.fields.len());
        for spec in self.specs() {
            spec.validate()?;
            if !names.insert(spec.name.as_str()) {
                return Err(SchemaError::DuplicateColumn(spec.name.clone()));
            }
        }
        Ok(())
    }
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.specs()).finish()
    }
}

/// A record type with a statically declared schema
pub trait Record: Default {
    /// The field list for this type
    fn schema() -> Schema<Self>;
}
