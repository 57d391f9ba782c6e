use anyhow::Result;
use clap::{Parser, Subcommand};
use rowcast_cli::commands::{self, decode::DecodeArgs};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "rowcast")]
#[command(about = "Rowcast - Schema-driven CSV record decoding", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a CSV file into JSON records
    Decode(DecodeArgs),

    /// Report rows that violate the schema
    Check {
        /// Input CSV file (`-` for stdin)
        #[arg(short, long)]
        input: String,

        /// JSON schema file
        #[arg(short, long)]
        schema: String,
    },

    /// Validate a schema file and list its columns
    Schema {
        /// JSON schema file
        #[arg(short, long)]
        schema: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Decode(args) => commands::decode::execute(&args),
        Commands::Check { input, schema } => commands::check::execute(&input, &schema),
        Commands::Schema { schema } => commands::schema::execute(&schema),
    }
}
