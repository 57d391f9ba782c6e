use super::{load_schema, open_input, DenyList, DenyRule};
use crate::KeepArg;
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rowcast_core::dynamic::DynamicRecord;
use rowcast_core::{
    constants::DEFAULT_COMPACTION_INTERVAL, CsvEngine, DecodeOptions, DecodeStats, Decoded,
    FieldErrorPolicy, StreamDecoder,
};
use serde::Serialize;
use std::fs;
use std::io::BufRead;
use std::time::Duration;
use tracing::{info, warn};

/// Lines between progress updates
const PROGRESS_EVERY: usize = 1_000;

/// Arguments of the `decode` subcommand
#[derive(Debug, Clone, clap::Args)]
pub struct DecodeArgs {
    /// Input CSV file (`-` for stdin)
    #[arg(short, long)]
    pub input: String,

    /// JSON schema file
    #[arg(short, long)]
    pub schema: String,

    /// Output JSON file for the decode report
    #[arg(short, long)]
    pub output: Option<String>,

    /// Keep one record per value of this column
    #[arg(long)]
    pub unique_by: Option<String>,

    /// Which duplicate survives
    #[arg(long, value_enum, default_value_t = KeepArg::First)]
    pub keep: KeepArg,

    /// Accepted records between compactions (0 compacts only at the end)
    #[arg(long, default_value_t = DEFAULT_COMPACTION_INTERVAL)]
    pub batch: usize,

    /// Reject records whose column equals a value, e.g. `last_name=Doe`
    #[arg(long = "deny", value_name = "COLUMN=VALUE")]
    pub deny: Vec<DenyRule>,

    /// Keep rows with field errors, leaving the failed fields unset
    #[arg(long)]
    pub keep_invalid_rows: bool,

    /// Show a progress spinner while reading
    #[arg(long)]
    pub progress: bool,
}

impl DecodeArgs {
    /// Arguments with defaults for everything but the input and schema
    pub fn new(input: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            schema: schema.into(),
            output: None,
            unique_by: None,
            keep: KeepArg::First,
            batch: DEFAULT_COMPACTION_INTERVAL,
            deny: Vec::new(),
            keep_invalid_rows: false,
            progress: false,
        }
    }
}

/// JSON document written by `decode`
#[derive(Serialize)]
struct DecodeReport {
    total_rows: usize,
    retained: usize,
    stats: DecodeStats,
    errors: Vec<String>,
    records: Vec<DynamicRecord>,
}

pub fn execute(args: &DecodeArgs) -> Result<()> {
    info!("Decoding {} with schema {}", args.input, args.schema);

    let schema = load_schema(&args.schema)?;

    if let Some(column) = &args.unique_by {
        if !schema.specs().any(|spec| &spec.name == column) {
            bail!("Unknown --unique-by column: {}", column);
        }
    }

    for rule in &args.deny {
        if !schema.specs().any(|spec| spec.name == rule.column) {
            warn!("Deny rule {} names a column the schema does not declare", rule);
        }
    }

    let field_errors = if args.keep_invalid_rows {
        FieldErrorPolicy::KeepRow
    } else {
        FieldErrorPolicy::DropRow
    };

    let mut engine = CsvEngine::new(schema).with_options(
        DecodeOptions::new()
            .with_compaction_interval(args.batch)
            .with_field_errors(field_errors),
    );
    if !args.deny.is_empty() {
        engine = engine.with_validator(DenyList::new(args.deny.clone()));
    }

    let reader = open_input(&args.input)?;

    let mut session = engine.session();
    if let Some(column) = args.unique_by.clone() {
        session = session.with_dedup(
            move |record: &DynamicRecord| record.get(&column).map(ToString::to_string),
            args.keep.into(),
        );
    }

    let decoded = if args.progress {
        run_with_progress(session, reader)?
    } else {
        session
            .run(reader)
            .with_context(|| format!("Failed to decode {}", args.input))?
    };

    // stdout carries only JSON when no output file is given
    let summary = format!(
        "Out of {} rows only {} could be processed.",
        decoded.total_rows(),
        decoded.records.len()
    );
    let messages = decoded.error_messages();
    if args.output.is_some() {
        println!("{}", summary);
        messages.iter().for_each(|m| println!("{}", m));
    } else {
        eprintln!("{}", summary);
        messages.iter().for_each(|m| eprintln!("{}", m));
    }

    let report = DecodeReport {
        total_rows: decoded.total_rows(),
        retained: decoded.records.len(),
        errors: messages,
        stats: decoded.stats,
        records: decoded.records,
    };

    let json =
        serde_json::to_string_pretty(&report).with_context(|| "Failed to serialize decode report")?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;

        info!("Decode report written to: {}", output_path);
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn run_with_progress<R: BufRead>(
    mut session: StreamDecoder<'_, DynamicRecord>,
    mut reader: R,
) -> Result<Decoded<DynamicRecord>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader
            .read_until(b'\n', &mut buf)
            .context("Failed to read input")?
            == 0
        {
            break;
        }
        session.feed_bytes(&buf)?;

        let stats = session.stats();
        if stats.lines_read % PROGRESS_EVERY == 0 {
            pb.set_message(format!(
                "{} lines, {} records",
                stats.lines_read,
                session.records().len()
            ));
        }
    }

    let decoded = session.finish()?;
    pb.finish_and_clear();

    Ok(decoded)
}
