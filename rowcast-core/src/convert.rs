//! Conversion of accepted raw values into typed field values

use crate::error::ConvertError;
use crate::schema::ColumnSpec;

/// Types a raw column value can be converted into
pub trait FromCell: Sized {
    /// Convert `raw` using the column's declared rules
    fn from_cell(raw: &str, spec: &ColumnSpec) -> Result<Self, ConvertError>;
}

impl FromCell for String {
    fn from_cell(raw: &str, _spec: &ColumnSpec) -> Result<Self, ConvertError> {
        Ok(raw.to_string())
    }
}

/// Alias-set membership; there is no error path
impl FromCell for bool {
    fn from_cell(raw: &str, spec: &ColumnSpec) -> Result<Self, ConvertError> {
        Ok(spec.is_true_value(raw))
    }
}

impl FromCell for char {
    fn from_cell(raw: &str, _spec: &ColumnSpec) -> Result<Self, ConvertError> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConvertError::InvalidChar),
        }
    }
}

/// Empty or whitespace on a nullable column is the "no value" state
impl<V: FromCell> FromCell for Option<V> {
    fn from_cell(raw: &str, spec: &ColumnSpec) -> Result<Self, ConvertError> {
        if spec.nullable && raw.trim().is_empty() {
            return Ok(None);
        }
        V::from_cell(raw, spec).map(Some)
    }
}

macro_rules! impl_from_cell_parse {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromCell for $ty {
                fn from_cell(raw: &str, _spec: &ColumnSpec) -> Result<Self, ConvertError> {
                    raw.trim()
                        .parse::<$ty>()
                        .map_err(|e| ConvertError::InvalidNumber {
                            kind: stringify!($ty),
                            reason: e.to_string(),
                        })
                }
            }
        )*
    };
}

impl_from_cell_parse!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Convert `raw` into `V` under `spec`
pub fn convert<V: FromCell>(raw: &str, spec: &ColumnSpec) -> Result<V, ConvertError> {
    V::from_cell(raw, spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_default_alias() {
        let spec = ColumnSpec::new("married");
        assert!(convert::<bool>("Y", &spec).unwrap());
        assert!(!convert::<bool>("yes", &spec).unwrap());
        assert!(!convert::<bool>("y", &spec).unwrap());
        assert!(!convert::<bool>("", &spec).unwrap());
    }

    #[test]
    fn test_bool_configured_aliases() {
        let spec = ColumnSpec::new("married").with_true_values(["Y", "yes", "y"]);
        assert!(convert::<bool>("yes", &spec).unwrap());
        assert!(!convert::<bool>("Yes", &spec).unwrap());
    }

    #[test]
    fn test_numeric_parse() {
        let spec = ColumnSpec::new("n");
        assert_eq!(convert::<i32>("-17", &spec).unwrap(), -17);
        assert_eq!(convert::<u16>(" 8080 ", &spec).unwrap(), 8080);
        assert_eq!(convert::<f64>("2.5", &spec).unwrap(), 2.5);
    }

    #[test]
    fn test_numeric_failure_is_conversion_error() {
        let spec = ColumnSpec::new("n");
        let err = convert::<u8>("300", &spec).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidNumber { kind: "u8", .. }));
    }

    #[test]
    fn test_optional_nullable_empty() {
        let spec = ColumnSpec::new("n").allow_null();
        assert_eq!(convert::<Option<i64>>("  ", &spec).unwrap(), None);
        assert_eq!(convert::<Option<i64>>("5", &spec).unwrap(), Some(5));
    }

    #[test]
    fn test_optional_non_nullable_empty_fails() {
        let spec = ColumnSpec::new("n");
        assert!(convert::<Option<i64>>("", &spec).is_err());
    }

    #[test]
    fn test_char() {
        let spec = ColumnSpec::new("c");
        assert_eq!(convert::<char>("x", &spec).unwrap(), 'x');
        assert_eq!(convert::<char>("xy", &spec), Err(ConvertError::InvalidChar));
    }

    #[test]
    fn test_string_identity() {
        let spec = ColumnSpec::new("s");
        assert_eq!(convert::<String>(" padded ", &spec).unwrap(), " padded ");
    }
}
