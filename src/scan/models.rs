//! Scan data models: candidates, raw probe results, and classified outcomes.

use serde::{Deserialize, Serialize};

use super::classify::classify;

/// One application identifier to check, plus its optional display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Application (client) ID. Opaque; usually a UUID but never validated as one.
    pub client_id: String,

    /// Display name from the input file, empty when unknown.
    #[serde(default)]
    pub display_name: String,
}

impl Candidate {
    pub fn new(client_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            display_name: display_name.into(),
        }
    }

    /// Display name, or "Unknown" when the input carried none.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            "Unknown"
        } else {
            &self.display_name
        }
    }
}

/// What a single token endpoint request produced, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawProbeResult {
    /// The endpoint answered with a decodable error body.
    /// `code` is the first entry of `error_codes`, or 0 when absent.
    Response { code: u64, description: String },

    /// Connection, timeout, TLS, or decoding failure.
    TransportFailure(String),
}

/// Classification of a candidate. Assigned once, never revised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Exists,
    NotFound,
    Unknown,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::NotFound => "not_found",
            Self::Unknown => "unknown",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified result for one candidate. Serializes to one record of the result file.
///
/// Exactly one of `remote_code` and `transport_error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    #[serde(flatten)]
    pub candidate: Candidate,

    pub status: Status,

    #[serde(rename = "error_code", skip_serializing_if = "Option::is_none", default)]
    pub remote_code: Option<u64>,

    #[serde(
        rename = "error_description",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub remote_description: Option<String>,

    #[serde(rename = "error_message", skip_serializing_if = "Option::is_none", default)]
    pub transport_error: Option<String>,
}

impl ProbeOutcome {
    /// Classify a raw probe result for the given candidate.
    pub fn from_raw(candidate: Candidate, raw: RawProbeResult) -> Self {
        let (status, remote_code, remote_description) = classify(&raw);
        let transport_error = match raw {
            RawProbeResult::TransportFailure(message) => Some(message),
            RawProbeResult::Response { .. } => None,
        };

        Self {
            candidate,
            status,
            remote_code,
            remote_description,
            transport_error,
        }
    }

    /// Outcome for a candidate whose probe never produced a result.
    pub fn failed(candidate: Candidate, message: impl Into<String>) -> Self {
        Self::from_raw(candidate, RawProbeResult::TransportFailure(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_label_fallback() {
        assert_eq!(Candidate::new("id", "").label(), "Unknown");
        assert_eq!(Candidate::new("id", "Graph Explorer").label(), "Graph Explorer");
    }

    #[test]
    fn test_outcome_exclusive_fields() {
        let ok = ProbeOutcome::from_raw(
            Candidate::new("a", ""),
            RawProbeResult::Response {
                code: 700016,
                description: "AADSTS700016: not found".into(),
            },
        );
        assert_eq!(ok.remote_code, Some(700016));
        assert!(ok.transport_error.is_none());

        let failed = ProbeOutcome::failed(Candidate::new("b", ""), "connection reset");
        assert!(failed.remote_code.is_none());
        assert!(failed.remote_description.is_none());
        assert_eq!(failed.transport_error.as_deref(), Some("connection reset"));
        assert_eq!(failed.status, Status::Error);
    }

    #[test]
    fn test_outcome_record_shape() {
        let outcome = ProbeOutcome::from_raw(
            Candidate::new("00000003-0000-0000-c000-000000000000", "Microsoft Graph"),
            RawProbeResult::Response {
                code: 7000215,
                description: "AADSTS7000215: Invalid client secret provided.".into(),
            },
        );

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["client_id"], "00000003-0000-0000-c000-000000000000");
        assert_eq!(value["display_name"], "Microsoft Graph");
        assert_eq!(value["status"], "exists");
        assert_eq!(value["error_code"], 7000215);
        assert!(value.get("error_message").is_none());

        let failed = serde_json::to_value(ProbeOutcome::failed(Candidate::new("x", ""), "timeout"))
            .unwrap();
        assert_eq!(failed["status"], "error");
        assert_eq!(failed["error_message"], "timeout");
        assert!(failed.get("error_code").is_none());
    }
}
