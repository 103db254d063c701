use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use explorer::cli::{commands, commands::RangeArgs, init_logging};
use explorer::export::ExportFormat;
use explorer::ExplorerConfig;

#[derive(Parser)]
#[command(name = "explorer")]
#[command(about = "Explorer - LLM Parameter Sweeps\nRun a prompt across temperature and top-p values and compare the scored results")]
#[command(version)]
struct Cli {
  /// Path to a JSON configuration file
  #[arg(long, global = true, env = "EXPLORER_CONFIG")]
  config: Option<PathBuf>,

  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Run a prompt across a parameter grid and score every completion
  Run {
    /// The prompt to send
    prompt: String,
    #[command(flatten)]
    ranges: RangeArgs,
    /// Print the full completion text under each score table
    #[arg(long)]
    content: bool,
  },
  /// Score text from a file or stdin
  Score {
    /// Prompt the text answers, used for the length expectation
    #[arg(short, long, default_value = "")]
    prompt: String,
    /// Input file, or - for stdin
    input: Option<PathBuf>,
    /// Print the metrics as JSON
    #[arg(long)]
    json: bool,
  },
  /// Show the parameter grid for the given ranges
  Grid {
    #[command(flatten)]
    ranges: RangeArgs,
    /// Print the grid as JSON
    #[arg(long)]
    json: bool,
  },
  /// List stored experiments, newest first
  List {
    #[arg(short, long, default_value = "50")]
    limit: usize,
    #[arg(long, default_value = "0")]
    offset: usize,
  },
  /// Show an experiment with all of its responses
  Show {
    id: String,
    /// Print the full completion text under each score table
    #[arg(long)]
    content: bool,
  },
  /// Export an experiment as JSON or CSV
  Export {
    id: String,
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
    format: ExportFormat,
    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
  /// Delete an experiment and its responses
  Delete { id: String },
}

async fn handle(command: Command, config: &ExplorerConfig) -> Result<()> {
  match command {
    Command::Run { prompt, ranges, content } => commands::run_experiment(config, prompt, ranges, content).await,
    Command::Score { prompt, input, json } => commands::score_text(&prompt, input, json),
    Command::Grid { ranges, json } => commands::show_grid(ranges, json),
    Command::List { limit, offset } => commands::list_experiments(config, limit, offset).await,
    Command::Show { id, content } => commands::show_experiment(config, &id, content).await,
    Command::Export { id, format, output } => commands::export_experiment(config, &id, format, output).await,
    Command::Delete { id } => commands::delete_experiment(config, &id).await,
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose, "warn");

  let config = ExplorerConfig::load(cli.config.as_deref())?;
  handle(cli.command, &config).await
}
