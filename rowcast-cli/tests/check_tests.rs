use std::fs;
use tempfile::tempdir;

use rowcast_cli::commands::check;

const SCHEMA: &str = r#"{
    "columns": [
        {"name": "sku", "min_length": 3, "max_length": 8},
        {"name": "qty", "kind": "integer"},
        {"name": "grade", "kind": "char", "nullable": true}
    ]
}"#;

#[test]
fn test_check_reports_each_failure_kind() {
    let td = tempdir().unwrap();
    let schema_path = td.path().join("schema.json");
    let input_path = td.path().join("items.csv");
    fs::write(&schema_path, SCHEMA).unwrap();
    fs::write(
        &input_path,
        "sku,qty,grade\nABC,1,A\nAB,2,B\nXYZ,many,C\nQRS,3,AB\n",
    )
    .unwrap();

    let input = input_path.to_str().unwrap();
    let schema = schema_path.to_str().unwrap();

    let decoded = check::analyze(input, schema).unwrap();
    assert_eq!(decoded.stats.data_rows, 4);
    assert_eq!(decoded.stats.records_retained, 1);
    assert_eq!(decoded.ledger.len(), 3);
    assert!(decoded.ledger.text(3).unwrap().contains("is less than the length of 3"));
    assert!(decoded.ledger.text(4).unwrap().contains("is not a valid i64"));
    assert!(decoded.ledger.text(5).unwrap().contains("is not a single character"));

    check::execute(input, schema).unwrap();
}

#[test]
fn test_check_clean_file() {
    let td = tempdir().unwrap();
    let schema_path = td.path().join("schema.json");
    let input_path = td.path().join("items.csv");
    fs::write(&schema_path, SCHEMA).unwrap();
    fs::write(&input_path, "sku,qty\nABC,1\nDEF,2\n").unwrap();

    let decoded =
        check::analyze(input_path.to_str().unwrap(), schema_path.to_str().unwrap()).unwrap();
    assert!(decoded.ledger.is_empty());
    assert_eq!(decoded.stats.retention_rate(), 100.0);
}

#[test]
fn test_check_missing_schema() {
    let td = tempdir().unwrap();
    let input_path = td.path().join("items.csv");
    fs::write(&input_path, "sku,qty\nABC,1\n").unwrap();

    let result = check::execute(
        input_path.to_str().unwrap(),
        td.path().join("missing.json").to_str().unwrap(),
    );
    assert!(result.is_err());
}
