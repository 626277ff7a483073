use std::fmt::Write;

use rsapub::PublicKeyRecord;

use crate::error::Result;

#[derive(Clone, Copy, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Exponent in decimal, modulus as a hex block
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

pub(crate) fn print_record(
    record: &PublicKeyRecord,
    format: OutputFormat,
    detailed: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(record)?);
        }
        OutputFormat::Text => {
            let mut output = String::new();

            write!(output, "{}", record)?;
            if detailed {
                writeln!(output)?;
                writeln!(output, "Key size: {} bits", record.bits())?;
            }
            writeln!(output, "Done.")?;

            print!("{}", output);
        }
    }

    Ok(())
}
