//! Sequential availability sweep.
//!
//! The `AvailabilityChecker` walks a candidate list one domain at a time:
//! registration lookup, then (for domains registered before the current
//! month) a traffic lookup, then a fixed pause. Results leave the worker as
//! `SweepEvent`s tagged with the sweep's generation so that whoever owns the
//! scan state can drop results from a sweep it has since replaced.

use crate::error::DomainScanError;
use crate::protocols::RdapClient;
use crate::providers::{StatusProvider, TrafficProvider};
use crate::traffic::TrafficEstimator;
use crate::types::{CandidateStatus, DomainCandidate, ScanConfig, StatusReport, DEFAULT_DELAY};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Sequence number identifying one sweep.
pub type Generation = u64;

/// "Candidate `index` of sweep `generation` resolved to `candidate`."
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateUpdate {
    pub generation: Generation,
    pub index: usize,
    pub candidate: DomainCandidate,
}

/// Messages emitted by a sweep worker.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepEvent {
    /// One candidate reached a terminal state
    Resolved(CandidateUpdate),
    /// Every candidate of the sweep has been processed
    Finished { generation: Generation },
}

/// Drives registration and traffic lookups for a list of candidates.
///
/// Never has more than one lookup in flight.
#[derive(Clone)]
pub struct AvailabilityChecker {
    status: Arc<dyn StatusProvider>,
    traffic: Arc<dyn TrafficProvider>,
    delay: Duration,
}

impl AvailabilityChecker {
    /// Create a checker around the given providers with the default delay.
    pub fn new(status: Arc<dyn StatusProvider>, traffic: Arc<dyn TrafficProvider>) -> Self {
        Self {
            status,
            traffic,
            delay: DEFAULT_DELAY,
        }
    }

    /// Create a checker backed by RDAP and the synthetic traffic estimator.
    pub fn from_config(config: &ScanConfig) -> Result<Self, DomainScanError> {
        let rdap = RdapClient::with_config(config)?;
        Ok(Self::new(Arc::new(rdap), Arc::new(TrafficEstimator::new())).with_delay(config.delay))
    }

    /// Set the pause inserted after every candidate.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Resolve one domain relative to today's month.
    pub async fn resolve(&self, domain: &str) -> DomainCandidate {
        self.resolve_at(domain, Utc::now().date_naive()).await
    }

    /// Resolve one domain: registration lookup, then traffic when warranted.
    ///
    /// Traffic failures are logged and dropped; the candidate stays registered.
    pub async fn resolve_at(&self, domain: &str, today: NaiveDate) -> DomainCandidate {
        let mut candidate = DomainCandidate::checking(domain);
        let report = self.status.check_status(domain).await;
        let wants_traffic = should_fetch_traffic(&report, today);
        candidate.apply_report(report);

        if wants_traffic {
            match self.traffic.traffic(domain).await {
                Ok(summary) => candidate.traffic_data = Some(summary),
                Err(e) => warn!("Failed to get traffic data for {}: {}", domain, e),
            }
        }

        candidate
    }

    /// Process `domains` in order, sending one event per domain and a final
    /// `Finished` event.
    ///
    /// Stops early if the receiving side has gone away.
    pub async fn run_sweep(
        &self,
        generation: Generation,
        domains: Vec<String>,
        events: mpsc::Sender<SweepEvent>,
    ) {
        debug!(
            "sweep {} starting: {} candidates, {:?} delay",
            generation,
            domains.len(),
            self.delay
        );

        for (index, domain) in domains.into_iter().enumerate() {
            let candidate = self.resolve(&domain).await;
            debug!("sweep {}: {} -> {}", generation, domain, candidate.status);

            let update = CandidateUpdate {
                generation,
                index,
                candidate,
            };
            if events.send(SweepEvent::Resolved(update)).await.is_err() {
                debug!("sweep {} abandoned: receiver dropped", generation);
                return;
            }

            tokio::time::sleep(self.delay).await;
        }

        let _ = events.send(SweepEvent::Finished { generation }).await;
    }

    /// Run a sweep on a background task.
    pub fn spawn_sweep(
        &self,
        generation: Generation,
        domains: Vec<String>,
        events: mpsc::Sender<SweepEvent>,
    ) -> JoinHandle<()> {
        let checker = self.clone();
        tokio::spawn(async move { checker.run_sweep(generation, domains, events).await })
    }
}

/// Whether a lookup result calls for a traffic lookup.
///
/// Only registered domains with a registration date outside the current
/// calendar month qualify. A date that cannot be parsed counts as outside.
pub fn should_fetch_traffic(report: &StatusReport, today: NaiveDate) -> bool {
    if report.status != CandidateStatus::Registered {
        return false;
    }
    match &report.registration_date {
        Some(date) => !registered_in_month(date, today),
        None => false,
    }
}

/// Whether an RDAP event date falls in the same calendar month as `today`.
pub fn registered_in_month(date: &str, today: NaiveDate) -> bool {
    match parse_event_date(date) {
        Some(d) => d.year() == today.year() && d.month() == today.month(),
        None => false,
    }
}

/// Parse an RDAP event date (RFC 3339 timestamp or plain `YYYY-MM-DD`).
fn parse_event_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(date) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    date.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_event_date_formats() {
        assert_eq!(parse_event_date("2020-01-01"), Some(date(2020, 1, 1)));
        assert_eq!(
            parse_event_date("1995-08-14T04:00:00Z"),
            Some(date(1995, 8, 14))
        );
        assert_eq!(
            parse_event_date("2024-03-31T23:30:00-02:00"),
            Some(date(2024, 4, 1))
        );
        assert_eq!(parse_event_date("2024-03-31T23:30:00"), Some(date(2024, 3, 31)));
        assert_eq!(parse_event_date("last tuesday"), None);
    }

    #[test]
    fn test_registered_in_month() {
        let today = date(2024, 6, 15);
        assert!(registered_in_month("2024-06-01T00:00:00Z", today));
        assert!(!registered_in_month("2024-05-31", today));
        assert!(!registered_in_month("2023-06-10", today));
        assert!(!registered_in_month("garbage", today));
    }

    #[test]
    fn test_should_fetch_traffic() {
        let today = date(2024, 6, 15);
        let old = StatusReport::registered("a.com", Some("2020-01-01".to_string()));
        let fresh = StatusReport::registered("b.com", Some("2024-06-02".to_string()));
        let undated = StatusReport::registered("c.com", None);

        assert!(should_fetch_traffic(&old, today));
        assert!(!should_fetch_traffic(&fresh, today));
        assert!(!should_fetch_traffic(&undated, today));
        assert!(!should_fetch_traffic(&StatusReport::available("d.com"), today));
        assert!(!should_fetch_traffic(
            &StatusReport::unknown("e.com", "Unexpected response from RDAP: 500"),
            today
        ));
    }

    mod sweep {
        use super::*;
        use crate::types::TrafficSummary;
        use async_trait::async_trait;
        use std::sync::atomic::{AtomicUsize, Ordering};

        /// Answers with a fixed report per domain.
        struct ScriptedRegistry;

        #[async_trait]
        impl StatusProvider for ScriptedRegistry {
            async fn check_status(&self, domain: &str) -> StatusReport {
                match domain {
                    "old.com" => StatusReport::registered(domain, Some("2020-01-01".to_string())),
                    "new.com" => {
                        StatusReport::registered(domain, Some("2024-06-02T10:00:00Z".to_string()))
                    }
                    "broken.com" => StatusReport::error(domain, "Failed to check domain status"),
                    "odd.com" => StatusReport::unknown(domain, "Unexpected response from RDAP: 503"),
                    _ => StatusReport::available(domain),
                }
            }
        }

        /// Counts calls and optionally fails every one of them.
        struct CountingTraffic {
            calls: AtomicUsize,
            fail: bool,
        }

        impl CountingTraffic {
            fn new(fail: bool) -> Arc<Self> {
                Arc::new(Self {
                    calls: AtomicUsize::new(0),
                    fail,
                })
            }
        }

        #[async_trait]
        impl TrafficProvider for CountingTraffic {
            async fn traffic(&self, domain: &str) -> Result<TrafficSummary, DomainScanError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if self.fail {
                    return Err(DomainScanError::internal("traffic backend down"));
                }
                Ok(TrafficSummary {
                    domain: domain.to_string(),
                    metrics: Vec::new(),
                })
            }
        }

        fn checker(traffic: Arc<CountingTraffic>) -> AvailabilityChecker {
            AvailabilityChecker::new(Arc::new(ScriptedRegistry), traffic).with_delay(Duration::ZERO)
        }

        #[tokio::test]
        async fn test_resolve_skips_traffic_for_this_month() {
            let traffic = CountingTraffic::new(false);
            let checker = checker(traffic.clone());
            let today = date(2024, 6, 15);

            let fresh = checker.resolve_at("new.com", today).await;
            assert_eq!(fresh.status, CandidateStatus::Registered);
            assert!(fresh.traffic_data.is_none());
            assert_eq!(traffic.calls.load(Ordering::SeqCst), 0);

            let old = checker.resolve_at("old.com", today).await;
            assert!(old.traffic_data.is_some());
            assert_eq!(traffic.calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_sweep_survives_failures() {
            let traffic = CountingTraffic::new(true);
            let checker = checker(traffic.clone());
            let (tx, mut rx) = mpsc::channel(16);

            let domains = ["old.com", "broken.com", "odd.com", "free.com"]
                .iter()
                .map(|d| d.to_string())
                .collect();
            checker.run_sweep(7, domains, tx).await;

            let mut events = Vec::new();
            while let Some(event) = rx.recv().await {
                events.push(event);
            }
            assert_eq!(events.len(), 5);
            assert_eq!(events[4], SweepEvent::Finished { generation: 7 });

            let updates: Vec<&CandidateUpdate> = events
                .iter()
                .filter_map(|e| match e {
                    SweepEvent::Resolved(u) => Some(u),
                    SweepEvent::Finished { .. } => None,
                })
                .collect();
            let statuses: Vec<CandidateStatus> =
                updates.iter().map(|u| u.candidate.status).collect();
            assert_eq!(
                statuses,
                [
                    CandidateStatus::Registered,
                    CandidateStatus::Error,
                    CandidateStatus::Unknown,
                    CandidateStatus::Available,
                ]
            );
            assert!(updates.iter().enumerate().all(|(i, u)| u.index == i && u.generation == 7));

            let registered = &updates[0].candidate;
            assert_eq!(registered.registration_date.as_deref(), Some("2020-01-01"));
            assert!(registered.traffic_data.is_none());
            assert_eq!(traffic.calls.load(Ordering::SeqCst), 1);
        }
    }
}
