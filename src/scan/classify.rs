//! Token endpoint error code classification.

use super::models::{RawProbeResult, Status};

/// AADSTS7000215: invalid client secret. The application is registered.
pub const CODE_INVALID_CLIENT_SECRET: u64 = 7000215;

/// AADSTS700016: application not found in the directory.
pub const CODE_APPLICATION_NOT_FOUND: u64 = 700016;

/// Map a raw probe result to a status plus the remote code and description.
///
/// Only the error code decides; HTTP status and description text are ignored.
pub fn classify(raw: &RawProbeResult) -> (Status, Option<u64>, Option<String>) {
    match raw {
        RawProbeResult::TransportFailure(_) => (Status::Error, None, None),
        RawProbeResult::Response { code, description } => {
            let status = match *code {
                CODE_INVALID_CLIENT_SECRET => Status::Exists,
                CODE_APPLICATION_NOT_FOUND => Status::NotFound,
                _ => Status::Unknown,
            };
            (status, Some(*code), Some(description.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(code: u64, description: &str) -> RawProbeResult {
        RawProbeResult::Response {
            code,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_known_codes() {
        let (status, code, _) = classify(&response(7000215, "invalid secret"));
        assert_eq!(status, Status::Exists);
        assert_eq!(code, Some(7000215));

        let (status, code, _) = classify(&response(700016, "not found"));
        assert_eq!(status, Status::NotFound);
        assert_eq!(code, Some(700016));
    }

    #[test]
    fn test_other_codes_are_unknown() {
        for code in [0, 1, 50034, 90002, 700015, 700017, 7000214, 7000216, u64::MAX] {
            let (status, remote_code, _) = classify(&response(code, ""));
            assert_eq!(status, Status::Unknown, "code {code}");
            assert_eq!(remote_code, Some(code));
        }
    }

    #[test]
    fn test_description_never_overrides_code() {
        let (status, _, description) =
            classify(&response(90002, "AADSTS7000215: Invalid client secret provided."));
        assert_eq!(status, Status::Unknown);
        assert_eq!(
            description.as_deref(),
            Some("AADSTS7000215: Invalid client secret provided.")
        );

        let (status, _, _) = classify(&response(700016, "Invalid client secret provided."));
        assert_eq!(status, Status::NotFound);
    }

    #[test]
    fn test_transport_failure_is_error() {
        let raw = RawProbeResult::TransportFailure("dns error".into());
        assert_eq!(classify(&raw), (Status::Error, None, None));
    }

    #[test]
    fn test_classify_is_idempotent() {
        let inputs = [
            response(7000215, "a"),
            response(700016, "b"),
            response(0, ""),
            RawProbeResult::TransportFailure("timeout".into()),
        ];
        for raw in &inputs {
            assert_eq!(classify(raw), classify(raw));
        }
    }
}
