use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use sumtype::commands::{load_config, run_check, run_expand};
use sumtype::{CommandResult, OutputFormat, logging};

/// Check and expand union and result declarations
#[derive(Parser)]
#[command(name = "sumtype")]
#[command(about = "Check and expand union and result declarations", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a sumtype.toml (defaults to the nearest one above the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Subcommand)]
enum Commands {
    /// Validate every declaration and print diagnostics
    Check {
        /// Declaration files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },
    /// Print or write the expanded source of a declaration file
    Expand {
        /// Declaration file
        input: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn run(cli: Cli) -> CommandResult {
    let start_dir = std::env::current_dir()?;
    let config = load_config(cli.config.as_deref(), &start_dir)?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Check { files, format } => {
            let color = std::io::stdout().is_terminal();
            run_check(&files, &config, format, &mut stdout, color)
        }
        Commands::Expand { input, output } => run_expand(&input, output.as_deref(), &config, &mut stdout),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(None) => ExitCode::SUCCESS,
        Ok(Some(code)) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
