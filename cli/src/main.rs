use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod decode;
mod error;
mod inspect;
mod output;
mod strip;
mod utils;

use error::Result;

#[derive(Parser)]
#[command(name = "rsapub")]
#[command(about = "RSA PUBLIC KEY inspector", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the exponent and modulus of a key file
    Inspect {
        #[command(flatten)]
        config: inspect::Config,
    },
    /// Print the base64 payload with guards and line breaks removed
    Strip {
        #[command(flatten)]
        config: strip::Config,
    },
    /// Decode a bare base64 payload
    Decode {
        #[command(flatten)]
        config: decode::Config,
    },
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Inspect { config } => inspect::execute(config),
        Commands::Strip { config } => strip::execute(config),
        Commands::Decode { config } => decode::execute(config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Had error: {} ({})", e.code(), e);
            ExitCode::FAILURE
        }
    }
}
