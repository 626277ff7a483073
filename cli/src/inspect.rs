use std::path::PathBuf;

use clap::Args;
use rsapub::Reader;
use tracing::info;

use crate::error::Result;
use crate::output::{OutputFormat, print_record};
use crate::utils::{DEFAULT_KEY_FILE, LimitArgs};

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the RSA PUBLIC KEY PEM file
    #[arg(default_value = DEFAULT_KEY_FILE)]
    pub(crate) file: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub(crate) output: OutputFormat,

    /// Show key size information
    #[arg(long)]
    pub(crate) detailed: bool,

    /// Print the key as canonical PEM instead of its fields
    #[arg(long)]
    pub(crate) show_pem: bool,

    #[command(flatten)]
    pub(crate) limits: LimitArgs,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let reader = Reader::new(config.limits.to_limits());
    let record = reader.parse_file(&config.file)?;
    info!(file = %config.file.display(), bits = record.bits(), "key parsed");

    if config.show_pem {
        print!("{}", record.to_pem()?);
        return Ok(());
    }

    print_record(&record, config.output, config.detailed)
}
