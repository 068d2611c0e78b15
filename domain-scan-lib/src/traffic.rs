//! Synthetic website traffic.
//!
//! Stands in for a real analytics integration: every call fabricates visit
//! counts for the current month and the two before it.

use crate::error::DomainScanError;
use crate::providers::TrafficProvider;
use crate::types::{TrafficMetric, TrafficSummary};
use async_trait::async_trait;
use chrono::{Datelike, Months, NaiveDate, Utc};
use rand::Rng;

/// Number of months reported, current month included.
pub const TRAFFIC_WINDOW_MONTHS: u32 = 3;

/// Exclusive upper bound for fabricated visit counts.
pub const MAX_VISITS: u64 = 100_000;

/// Fabricates recent traffic figures.
#[derive(Debug, Clone, Default)]
pub struct TrafficEstimator;

impl TrafficEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Traffic for `domain` relative to today's month.
    pub fn estimate(&self, domain: &str) -> Result<TrafficSummary, DomainScanError> {
        self.estimate_at(domain, Utc::now().date_naive())
    }

    /// Traffic for `domain` relative to the month containing `today`.
    pub fn estimate_at(
        &self,
        domain: &str,
        today: NaiveDate,
    ) -> Result<TrafficSummary, DomainScanError> {
        let mut rng = rand::thread_rng();
        let metrics = window_months(today)?
            .into_iter()
            .map(|month| TrafficMetric {
                month,
                visits: rng.gen_range(0..MAX_VISITS),
            })
            .collect();

        Ok(TrafficSummary {
            domain: domain.to_string(),
            metrics,
        })
    }
}

#[async_trait]
impl TrafficProvider for TrafficEstimator {
    async fn traffic(&self, domain: &str) -> Result<TrafficSummary, DomainScanError> {
        self.estimate(domain)
    }
}

/// `YYYY-MM` labels for the reporting window, oldest first.
pub fn window_months(today: NaiveDate) -> Result<Vec<String>, DomainScanError> {
    let first_of_month = today
        .with_day(1)
        .ok_or_else(|| DomainScanError::internal("invalid calendar date"))?;

    (0..TRAFFIC_WINDOW_MONTHS)
        .rev()
        .map(|back| {
            first_of_month
                .checked_sub_months(Months::new(back))
                .map(|d| d.format("%Y-%m").to_string())
                .ok_or_else(|| DomainScanError::internal("month arithmetic out of range"))
        })
        .collect()
}
