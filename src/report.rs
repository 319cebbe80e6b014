//! Console summary and JSON result file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use crate::error::OutputError;
use crate::scan::ScanResult;

/// Write every outcome, in input order, as a pretty-printed JSON array.
pub fn save_results(path: &Path, result: &ScanResult) -> Result<(), OutputError> {
    let content = serde_json::to_string_pretty(&result.outcomes)?;

    fs::write(path, content).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Saved {} results to {:?}", result.outcomes.len(), path);
    Ok(())
}

/// Render the human-readable summary.
///
/// `skipped` is the number of candidates never submitted because the scan was cancelled.
pub fn write_summary(out: &mut impl Write, result: &ScanResult, skipped: usize) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "[RESULT] Total applications checked: {}", result.total_checked)?;
    writeln!(out, "[RESULT] Found existing applications: {}", result.found.len())?;

    let counts = &result.counts;
    if counts.unknown > 0 || counts.error > 0 {
        writeln!(
            out,
            "[RESULT] Not found: {}, unknown: {}, errors: {}",
            counts.not_found, counts.unknown, counts.error
        )?;
    }

    if skipped > 0 {
        writeln!(out, "[RESULT] Skipped (scan cancelled): {}", skipped)?;
    }

    if !result.found.is_empty() {
        writeln!(out)?;
        writeln!(out, "Existing application list:")?;
        for outcome in &result.found {
            writeln!(
                out,
                "- Name: {}, ID: {}",
                outcome.candidate.label(),
                outcome.candidate.client_id
            )?;
        }
    }

    Ok(())
}
