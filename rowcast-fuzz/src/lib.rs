//! Fuzzing entry points for rowcast-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_decode

use rowcast_core::dedup::{compact, KeepPolicy};
use rowcast_core::dynamic::{ColumnDecl, DynamicRecord, FieldKind, SchemaFile};
use rowcast_core::{ColumnSpec, CsvEngine, StreamDecoder};
use std::io::Cursor;

fn fuzz_schema() -> Option<rowcast_core::Schema<DynamicRecord>> {
    let columns = [
        ("a", FieldKind::String),
        ("b", FieldKind::Integer),
        ("c", FieldKind::Float),
        ("d", FieldKind::Boolean),
        ("e", FieldKind::Char),
    ]
    .into_iter()
    .map(|(name, kind)| ColumnDecl {
        spec: ColumnSpec::new(name).allow_null().with_length(0, 8),
        kind,
    })
    .collect();

    SchemaFile { columns }.into_schema().ok()
}

pub fn fuzz_decode(data: &[u8]) {
    let Some(schema) = fuzz_schema() else {
        return;
    };

    // Invalid UTF-8 lines are recorded in the ledger; never panics
    let _ = CsvEngine::new(schema).decode(Cursor::new(data));
}

pub fn fuzz_stream(data: &[u8]) {
    let Some(schema) = fuzz_schema() else {
        return;
    };
    let text = String::from_utf8_lossy(data);

    let mut decoder = StreamDecoder::new(&schema).with_dedup(
        |record: &DynamicRecord| record.get("a").map(ToString::to_string),
        KeepPolicy::Last,
    );
    for line in text.split('\n') {
        if decoder.feed_line(line).is_err() {
            return;
        }
    }
    let _ = decoder.finish();
}

pub fn fuzz_dedup(data: &[u8]) {
    let mut first = data.to_vec();
    let mut last = data.to_vec();

    let _ = compact(&mut first, |b| *b, KeepPolicy::First);
    let _ = compact(&mut last, |b| *b, KeepPolicy::Last);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzz_decode_empty() {
        fuzz_decode(&[]);
    }

    #[test]
    fn test_fuzz_decode_random() {
        fuzz_decode(&[0x12, 0x34, 0x2C, 0x0A, 0xFF, 0x2C, 0x0A]);
    }

    #[test]
    fn test_fuzz_decode_header_and_rows() {
        fuzz_decode(b"a,b,c,d,e\nx,1,2.5,Y,z\n,,,,\nlonger than eight,nan,inf,yes,zz\n");
    }

    #[test]
    fn test_fuzz_stream_random() {
        fuzz_stream(&[0xFF; 1024]);
        fuzz_stream(b"a\n1\n1\n2\n\n1\n");
    }

    #[test]
    fn test_fuzz_dedup() {
        fuzz_dedup(&[]);
        fuzz_dedup(&[1, 2, 1, 3, 2, 2, 9]);
    }

    #[test]
    fn test_dedup_policies_agree_on_survivor_count() {
        let data = [1u8, 2, 1, 3, 2, 2, 9];
        let mut first = data.to_vec();
        let mut last = data.to_vec();

        compact(&mut first, |b| *b, KeepPolicy::First);
        compact(&mut last, |b| *b, KeepPolicy::Last);

        assert_eq!(first, vec![1, 2, 3, 9]);
        assert_eq!(last, vec![1, 3, 2, 9]);
        assert_eq!(compact(&mut first, |b| *b, KeepPolicy::First), 0);
    }

    #[test]
    fn test_fuzz_decode_invalid_utf8_row() {
        fuzz_decode(b"a,b\n\xE9,1\nok,2\n");
    }
}
