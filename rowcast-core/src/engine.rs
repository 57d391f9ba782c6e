//! Decode engine: owns the schema, hook and options, and runs sessions

use crate::decoder::{DecodeOptions, StreamDecoder};
use crate::dedup::KeepPolicy;
use crate::schema::{Record, Schema};
use crate::types::Decoded;
use crate::validate::RecordValidator;
use crate::Result;
use std::fs::File;
use std::hash::Hash;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[cfg(feature = "logging")]
use tracing::info;

/// Schema-driven CSV decoder for records of type `T`
///
/// Each `decode*` call runs an independent session: the header is bound
/// afresh and a new error ledger is produced.
pub struct CsvEngine<T> {
    schema: Schema<T>,
    validator: Option<Box<dyn RecordValidator<T>>>,
    options: DecodeOptions,
}

impl<T: Default> CsvEngine<T> {
    /// Create an engine over an explicit schema
    pub fn new(schema: Schema<T>) -> Self {
        Self {
            schema,
            validator: None,
            options: DecodeOptions::default(),
        }
    }

    /// Create an engine from the record type's declared schema
    pub fn for_record() -> Self
    where
        T: Record,
    {
        Self::new(T::schema())
    }

    /// Install the post-decode validation hook
    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: RecordValidator<T> + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Replace the decode options
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// The declared schema
    pub fn schema(&self) -> &Schema<T> {
        &self.schema
    }

    /// The decode options
    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Start a line-at-a-time session
    pub fn session(&self) -> StreamDecoder<'_, T> {
        let session = StreamDecoder::new(&self.schema).with_options(self.options);
        match self.validator.as_deref() {
            Some(validator) => session.with_validator(validator),
            None => session,
        }
    }

    /// Decode every record from `reader` without deduplication
    pub fn decode<R: BufRead>(&self, reader: R) -> Result<Decoded<T>> {
        self.session().run(reader)
    }

    /// Decode every record from `reader`, keeping one record per key
    pub fn decode_unique<R, K, F>(
        &self,
        reader: R,
        key: F,
        policy: KeepPolicy,
    ) -> Result<Decoded<T>>
    where
        R: BufRead,
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        self.session().with_dedup(key, policy).run(reader)
    }

    /// Open `path` and decode it without deduplication
    pub fn decode_path<P: AsRef<Path>>(&self, path: P) -> Result<Decoded<T>> {
        let path = path.as_ref();

        #[cfg(feature = "logging")]
        info!("Decoding {}", path.display());

        self.decode(BufReader::new(File::open(path)?))
    }

    /// Open `path` and decode it, keeping one record per key
    pub fn decode_unique_path<P, K, F>(
        &self,
        path: P,
        key: F,
        policy: KeepPolicy,
    ) -> Result<Decoded<T>>
    where
        P: AsRef<Path>,
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        let path = path.as_ref();

        #[cfg(feature = "logging")]
        info!("Decoding {} with {:?} deduplication", path.display(), policy);

        self.decode_unique(BufReader::new(File::open(path)?), key, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::schema::ColumnSpec;
    use crate::validate::Rejection;
    use std::io::Cursor;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Item {
        sku: String,
        qty: u32,
        active: bool,
    }

    impl Record for Item {
        fn schema() -> Schema<Self> {
            Schema::new()
                .column(
                    ColumnSpec::new("sku").with_length(3, 8),
                    |i: &mut Item, v: String| i.sku = v,
                )
                .column(ColumnSpec::new("qty"), |i: &mut Item, v: u32| i.qty = v)
                .column(
                    ColumnSpec::new("active")
                        .allow_null()
                        .with_true_values(["Y", "yes"]),
                    |i: &mut Item, v: bool| i.active = v,
                )
        }
    }

    const INPUT: &str = "sku,qty,active\nABC,1,yes\nABC,2,N\nXYZ,3,Y\n";

    #[test]
    fn test_decode_without_dedup() {
        let engine = CsvEngine::<Item>::for_record();
        let decoded = engine.decode(Cursor::new(INPUT)).unwrap();

        assert_eq!(decoded.records.len(), 3);
        assert_eq!(
            decoded.records[0],
            Item {
                sku: "ABC".to_string(),
                qty: 1,
                active: true
            }
        );
        assert!(!decoded.records[1].active);
        assert_eq!(decoded.stats.compactions, 0);
        assert_eq!(decoded.total_rows(), 4);
    }

    #[test]
    fn test_decode_unique() {
        let engine = CsvEngine::<Item>::for_record();

        let first = engine
            .decode_unique(Cursor::new(INPUT), |i| i.sku.clone(), KeepPolicy::First)
            .unwrap();
        assert_eq!(first.records.iter().map(|i| i.qty).collect::<Vec<_>>(), vec![1, 3]);

        let last = engine
            .decode_unique(Cursor::new(INPUT), |i| i.sku.clone(), KeepPolicy::Last)
            .unwrap();
        assert_eq!(last.records.iter().map(|i| i.qty).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_sessions_are_independent() {
        let engine = CsvEngine::<Item>::for_record();
        let bad = engine.decode(Cursor::new("sku,qty\nA,1\n")).unwrap();
        assert_eq!(bad.ledger.len(), 1);

        let good = engine.decode(Cursor::new(INPUT)).unwrap();
        assert!(good.ledger.is_empty());
    }

    #[test]
    fn test_validator_rejects_record() {
        let engine = CsvEngine::<Item>::for_record().with_validator(|i: &Item| {
            if i.qty > 2 {
                Err(Rejection::new("qty too large"))
            } else {
                Ok(())
            }
        });
        let decoded = engine.decode(Cursor::new(INPUT)).unwrap();

        assert_eq!(decoded.records.len(), 2);
        assert_eq!(
            decoded.error_messages(),
            vec!["Line 4 contained the following errors: qty too large ".to_string()]
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let engine = CsvEngine::<Item>::for_record();
        let result = engine.decode_path("/definitely/not/here.csv");
        assert!(matches!(result, Err(DecodeError::Io(_))));
    }

    #[test]
    fn test_invalid_utf8_keeps_other_rows() {
        let engine = CsvEngine::<Item>::for_record();
        let data: &[u8] = b"sku,qty,active\nAB\xFFC,1,Y\nXYZ,3,Y\n";
        let decoded = engine.decode(data).unwrap();

        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].sku, "XYZ");
        assert_eq!(
            decoded.error_messages(),
            vec!["Line 2 contained the following errors: contains invalid UTF-8 ".to_string()]
        );
    }
}
