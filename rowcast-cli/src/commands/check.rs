use super::{load_schema, open_input};
use anyhow::{Context, Result};
use colored::*;
use rowcast_core::dynamic::DynamicRecord;
use rowcast_core::{CsvEngine, Decoded, IssueKind};
use tracing::info;

/// Decode `input` against `schema` without producing output
pub fn analyze(input: &str, schema: &str) -> Result<Decoded<DynamicRecord>> {
    let schema = load_schema(schema)?;
    let reader = open_input(input)?;

    CsvEngine::new(schema)
        .decode(reader)
        .with_context(|| format!("Failed to decode {}", input))
}

pub fn execute(input: &str, schema: &str) -> Result<()> {
    info!("Checking file: {}", input);

    let decoded = analyze(input, schema)?;
    let stats = &decoded.stats;

    println!("\n=== Check Results ===");
    println!("Lines read:        {}", stats.lines_read);
    println!("Blank lines:       {}", stats.blank_lines);
    println!("Data rows:         {}", stats.data_rows);
    println!("Valid rows:        {}", stats.records_retained.to_string().green());
    if stats.rejected_rows > 0 {
        println!("Rejected rows:     {}", stats.rejected_rows.to_string().red());
    } else {
        println!("Rejected rows:     {}", stats.rejected_rows);
    }
    println!("Retention rate:    {:.2}%", stats.retention_rate());

    let constraint = decoded.ledger.count_kind(IssueKind::Constraint);
    let conversion = decoded.ledger.count_kind(IssueKind::Conversion);
    let validation = decoded.ledger.count_kind(IssueKind::Validation);
    let encoding = decoded.ledger.count_kind(IssueKind::Encoding);

    if !decoded.ledger.is_empty() {
        println!("\n=== Errors ===");
        println!("Constraint violations: {}", constraint);
        println!("Conversion failures:   {}", conversion);
        println!("Hook rejections:       {}", validation);
        if encoding > 0 {
            println!("Invalid UTF-8 lines:   {}", encoding);
        }
        for message in decoded.error_messages() {
            println!("{} {}", "✗".red(), message);
        }
    }

    println!("\n=== Summary ===");
    if decoded.ledger.is_empty() {
        println!("{} Every row satisfies the schema", "✓".green());
    } else {
        println!(
            "{} {} lines contain errors",
            "✗".red(),
            decoded.ledger.len()
        );
    }

    Ok(())
}
