//! Command line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::RangedU64ValueParser;
use clap::Parser;

/// Detect applications registered in an Azure tenant.
#[derive(Debug, Parser)]
#[command(name = "azureappscan", version, about)]
pub struct Args {
    /// Target Azure tenant domain
    #[arg(short, long, value_parser = parse_tenant)]
    pub tenant: String,

    /// File containing client IDs (TXT, CSV or TSV)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Write results as JSON to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of concurrent probes [default: 10]
    #[arg(short, long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub workers: Option<usize>,

    /// Delay between request submissions in seconds [default: 0.5]
    #[arg(short, long, value_parser = parse_delay)]
    pub delay: Option<Duration>,

    /// Output detailed information
    #[arg(short, long)]
    pub verbose: bool,
}

/// Accept a tenant domain or ID. It becomes a URL path segment, so only
/// ASCII letters, digits, `-` and `.` are allowed.
fn parse_tenant(value: &str) -> Result<String, String> {
    let tenant = value.trim();
    if tenant.is_empty() {
        return Err("tenant must not be empty".to_string());
    }
    if let Some(c) = tenant
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
    {
        return Err(format!("tenant `{tenant}` contains invalid character {c:?}"));
    }
    Ok(tenant.to_string())
}

/// Parse a non-negative, finite number of seconds.
fn parse_delay(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{value}` is not a number of seconds"))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| format!("delay must be a non-negative number of seconds, got {value}"))
}
