use clap::Args;
use rsapub::Reader;

use crate::error::Result;
use crate::output::{OutputFormat, print_record};
use crate::utils::{LimitArgs, read_text_input};

#[derive(Args)]
pub(crate) struct Config {
    /// Base64 DER payload without guards. If not specified, reads from stdin
    pub(crate) base64: Option<String>,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub(crate) output: OutputFormat,

    /// Show key size information
    #[arg(long)]
    pub(crate) detailed: bool,

    #[command(flatten)]
    pub(crate) limits: LimitArgs,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input = read_text_input(config.base64.as_deref())?;
    let reader = Reader::new(config.limits.to_limits());
    // Surrounding whitespace comes from the shell, not the payload.
    let record = reader.parse_base64(input.trim())?;
    print_record(&record, config.output, config.detailed)
}
