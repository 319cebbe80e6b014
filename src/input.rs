//! Candidate loading from plain-text or CSV/TSV files.
//!
//! Plain-text files hold one application ID per line. Delimited files carry a
//! header row with an `appId` column and an optional `displayName` column,
//! separated by tabs or commas.

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::InputError;
use crate::scan::Candidate;

/// Header names that mark a delimited file.
const KNOWN_HEADERS: [&str; 2] = ["appId", "displayName"];

/// Input file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Text,
    Delimited,
}

impl InputFormat {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" => Some(Self::Text),
            "csv" | "tsv" => Some(Self::Delimited),
            _ => None,
        }
    }

    fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Guess the layout from the first line of the file.
    ///
    /// Delimited only when the line has a delimiter and names a known header.
    pub fn sniff(first_line: &str) -> Self {
        let has_delimiter = first_line.contains('\t') || first_line.contains(',');
        let has_header = KNOWN_HEADERS.iter().any(|h| first_line.contains(h));
        if has_delimiter && has_header {
            Self::Delimited
        } else {
            Self::Text
        }
    }
}

/// One row of a delimited input file.
#[derive(Debug, Deserialize)]
struct AppRow {
    #[serde(rename = "appId", default)]
    app_id: String,
    #[serde(rename = "displayName", default)]
    display_name: String,
}

/// Load candidates from `path`, detecting the format by extension or content.
///
/// Returns [`InputError::Empty`] when the file yields no application IDs.
pub fn load_candidates(path: &Path) -> Result<Vec<Candidate>, InputError> {
    let raw = fs::read_to_string(path).map_err(|source| InputError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    // UTF-8 byte order mark
    let content = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let format = match InputFormat::from_path(path) {
        Some(format) => {
            info!("Detected {:?} format file", format);
            format
        }
        None => {
            let format = InputFormat::sniff(content.lines().next().unwrap_or_default());
            info!("Identified as {:?} format file based on content", format);
            format
        }
    };

    let candidates = match format {
        InputFormat::Text => parse_text(content),
        InputFormat::Delimited => parse_delimited(content).map_err(|source| {
            InputError::Malformed {
                path: path.to_path_buf(),
                source,
            }
        })?,
    };

    if candidates.is_empty() {
        return Err(InputError::Empty {
            path: path.to_path_buf(),
        });
    }

    for candidate in &candidates {
        if Uuid::parse_str(&candidate.client_id).is_err() {
            debug!("{} is not a UUID, probing anyway", candidate.client_id);
        }
    }

    Ok(candidates)
}

/// One trimmed, non-empty identifier per line.
fn parse_text(content: &str) -> Vec<Candidate> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Candidate::new(line, ""))
        .collect()
}

/// Header-driven rows; tab-delimited when the header line contains a tab.
fn parse_delimited(content: &str) -> Result<Vec<Candidate>, csv::Error> {
    let first_line = content.lines().next().unwrap_or_default();
    let delimiter = if first_line.contains('\t') { b'\t' } else { b',' };

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut candidates = Vec::new();
    for row in reader.deserialize::<AppRow>() {
        let row = row?;
        if !row.app_id.is_empty() {
            candidates.push(Candidate::new(row.app_id, row.display_name));
        }
    }

    Ok(candidates)
}
