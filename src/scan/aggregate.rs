//! Scan result aggregation.

use serde::Serialize;

use super::models::{ProbeOutcome, Status};

/// Number of outcomes per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub exists: usize,
    pub not_found: usize,
    pub unknown: usize,
    pub error: usize,
}

impl StatusCounts {
    fn record(&mut self, status: Status) {
        match status {
            Status::Exists => self.exists += 1,
            Status::NotFound => self.not_found += 1,
            Status::Unknown => self.unknown += 1,
            Status::Error => self.error += 1,
        }
    }
}

/// Complete result of one scan, in input order.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub outcomes: Vec<ProbeOutcome>,
    pub found: Vec<ProbeOutcome>,
    pub total_checked: usize,
    pub counts: StatusCounts,
}

/// Build the scan result from outcomes already in input order.
pub fn aggregate(outcomes: Vec<ProbeOutcome>) -> ScanResult {
    let mut counts = StatusCounts::default();
    let mut found = Vec::new();

    for outcome in &outcomes {
        counts.record(outcome.status);
        if outcome.status == Status::Exists {
            found.push(outcome.clone());
        }
    }

    ScanResult {
        total_checked: outcomes.len(),
        outcomes,
        found,
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::models::{Candidate, RawProbeResult};

    fn outcome(id: &str, code: Option<u64>) -> ProbeOutcome {
        let raw = match code {
            Some(code) => RawProbeResult::Response {
                code,
                description: String::new(),
            },
            None => RawProbeResult::TransportFailure("timeout".into()),
        };
        ProbeOutcome::from_raw(Candidate::new(id, ""), raw)
    }

    #[test]
    fn test_aggregate_scenario() {
        let result = aggregate(vec![
            outcome("a", Some(7000215)),
            outcome("b", Some(700016)),
            outcome("c", None),
        ]);

        assert_eq!(result.total_checked, 3);
        assert_eq!(result.found.len(), 1);
        assert_eq!(result.found[0].candidate.client_id, "a");
        assert_eq!(
            result.counts,
            StatusCounts {
                exists: 1,
                not_found: 1,
                unknown: 0,
                error: 1,
            }
        );
    }

    #[test]
    fn test_found_preserves_input_order() {
        let result = aggregate(vec![
            outcome("z", Some(7000215)),
            outcome("y", Some(0)),
            outcome("x", Some(7000215)),
            outcome("w", Some(7000215)),
        ]);

        let found: Vec<&str> = result
            .found
            .iter()
            .map(|o| o.candidate.client_id.as_str())
            .collect();
        assert_eq!(found, vec!["z", "x", "w"]);
        assert_eq!(result.counts.unknown, 1);
        assert_eq!(result.outcomes.len(), 4);
    }

    #[test]
    fn test_aggregate_empty() {
        let result = aggregate(Vec::new());
        assert_eq!(result.total_checked, 0);
        assert!(result.found.is_empty());
        assert_eq!(result.counts, StatusCounts::default());
    }
}
