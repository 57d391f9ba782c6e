use super::load_schema_file;
use anyhow::{Context, Result};
use colored::*;
use tracing::info;

pub fn execute(schema: &str) -> Result<()> {
    info!("Validating schema: {}", schema);

    let file = load_schema_file(schema)?;

    println!("\n=== Columns ===");
    for decl in &file.columns {
        let spec = &decl.spec;
        let max = spec
            .max_length
            .map_or_else(|| "-".to_string(), |max| max.to_string());

        println!(
            "{:<20} {:<8} nullable: {:<5} length: {}..{}  true: {}",
            spec.name,
            format!("{:?}", decl.kind).to_lowercase(),
            spec.nullable,
            spec.min_length,
            max,
            spec.true_values.join("|")
        );
    }

    let count = file.columns.len();
    file.into_schema()
        .with_context(|| format!("Invalid schema: {}", schema))?;

    println!("\n{} Schema is valid ({} columns)", "✓".green(), count);

    Ok(())
}
