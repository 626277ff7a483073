use std::path::PathBuf;

use clap::Args;
use rsapub::Reader;

use crate::error::Result;
use crate::utils::{DEFAULT_KEY_FILE, LimitArgs};

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the RSA PUBLIC KEY PEM file
    #[arg(default_value = DEFAULT_KEY_FILE)]
    pub(crate) file: PathBuf,

    #[command(flatten)]
    pub(crate) limits: LimitArgs,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let reader = Reader::new(config.limits.to_limits());
    let buffer = reader.read_file(&config.file)?;
    let payload = reader.strip(&buffer)?;
    println!("{}", payload);
    Ok(())
}
