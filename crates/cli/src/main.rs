//! # asksql-cli: A CLI for `asksql`
//!
//! Ask questions of the demo database from the terminal. Logs go to
//! `asksql-cli.log` so stdout carries only the command's output.

mod commands;

use anyhow::Result;
use asksql::constants::DEFAULT_DB_FILE;
use asksql::providers::ai::DEFAULT_MODEL;
use clap::{Parser, Subcommand};
use std::fs::File;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, env = "DB_URL", default_value = DEFAULT_DB_FILE)]
    db_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a natural-language question and print the outcome as JSON
    Ask(AskArgs),
    /// Print the database schema as it is shown to the model
    Schema,
    /// Create the demo tables and insert sample rows if they are empty
    Seed,
}

#[derive(Parser, Debug)]
struct AskArgs {
    /// The question to answer
    question: String,
    /// Completion provider type: groq, local, or gemini
    #[arg(long, env = "AI_PROVIDER", default_value = "groq")]
    provider: String,
    #[arg(long, env = "AI_API_URL")]
    api_url: Option<String>,
    #[arg(long, env = "AI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, env = "AI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
    /// Seconds to wait for the completion service before falling back
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    /// Skip the completion service and answer from fallback patterns only
    #[arg(long)]
    offline: bool,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Setup logging to a file
    let log_file = File::create("asksql-cli.log")?;
    let subscriber = fmt::Subscriber::builder()
        .with_writer(log_file)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match &cli.command {
        Commands::Ask(args) => commands::handle_ask(&cli.db_path, args).await,
        Commands::Schema => commands::handle_schema(&cli.db_path).await,
        Commands::Seed => commands::handle_seed(&cli.db_path).await,
    }
}
