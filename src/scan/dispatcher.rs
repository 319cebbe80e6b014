//! Rate-limited probe dispatch over a bounded worker pool.
//!
//! Candidates are released one at a time in input order. A release waits for
//! a free worker slot and then for the submission pacer, so consecutive
//! submissions are at least `delay` apart no matter how fast probes finish.
//! Every spawned probe owns its result slot; outcomes are reassembled in input
//! order once all submitted probes have completed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::models::{Candidate, ProbeOutcome, Status};
use super::probe::Probe;

/// Worker pool size and submission pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Maximum number of probes in flight. Clamped to at least 1.
    pub workers: usize,
    /// Minimum time between two consecutive submissions.
    pub delay: Duration,
}

/// Enforces a minimum interval between submissions.
#[derive(Debug)]
struct SubmissionPacer {
    interval: Duration,
    last_release: Option<Instant>,
}

impl SubmissionPacer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_release: None,
        }
    }

    /// Wait until the next submission may go out, then record it.
    async fn ready(&mut self) {
        if let Some(last) = self.last_release {
            if !self.interval.is_zero() {
                time::sleep_until(last + self.interval).await;
            }
        }
        self.last_release = Some(Instant::now());
    }
}

/// Dispatches one probe per candidate with bounded concurrency.
pub struct Dispatcher<P> {
    probe: Arc<P>,
    settings: DispatchSettings,
}

impl<P: Probe> Dispatcher<P> {
    pub fn new(probe: Arc<P>, settings: DispatchSettings) -> Self {
        Self {
            probe,
            settings: DispatchSettings {
                workers: settings.workers.max(1),
                delay: settings.delay,
            },
        }
    }

    /// Probe every candidate against `tenant`, returning outcomes in input order.
    ///
    /// If `cancel` fires, no further candidates are submitted; probes already in
    /// flight run to completion and only their outcomes are returned.
    pub async fn dispatch(
        &self,
        candidates: &[Candidate],
        tenant: &str,
        cancel: &CancellationToken,
    ) -> Vec<ProbeOutcome> {
        let slots = Arc::new(Semaphore::new(self.settings.workers));
        let mut pacer = SubmissionPacer::new(self.settings.delay);
        let mut in_flight: Vec<(Candidate, JoinHandle<ProbeOutcome>)> =
            Vec::with_capacity(candidates.len());

        debug!(
            "Dispatching {} candidates with {} workers, {:?} between submissions",
            candidates.len(),
            self.settings.workers,
            self.settings.delay
        );

        for candidate in candidates {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                permit = Arc::clone(&slots).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = pacer.ready() => {}
            }

            let probe = Arc::clone(&self.probe);
            let tenant = tenant.to_string();
            let owned = candidate.clone();

            let handle = tokio::spawn(async move {
                let raw = probe.probe(&owned.client_id, &tenant).await;
                drop(permit);

                let outcome = ProbeOutcome::from_raw(owned, raw);
                if outcome.status == Status::Exists {
                    info!(
                        "[FOUND] App Name: {}, App ID: {}",
                        outcome.candidate.label(),
                        outcome.candidate.client_id
                    );
                }
                outcome
            });

            in_flight.push((candidate.clone(), handle));
        }

        if in_flight.len() < candidates.len() {
            warn!(
                "Scan cancelled: {} of {} candidates submitted",
                in_flight.len(),
                candidates.len()
            );
        }

        let mut outcomes = Vec::with_capacity(in_flight.len());
        for (candidate, handle) in in_flight {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Probe task for {} failed: {}", candidate.client_id, e);
                    ProbeOutcome::failed(candidate, format!("probe task failed: {e}"))
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}
