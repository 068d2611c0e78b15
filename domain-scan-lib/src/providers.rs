//! Seams between the sweep orchestrator and the outside world.
//!
//! The concrete clients (`RdapClient`, `Translator`, `TrafficEstimator`)
//! implement these traits; tests substitute their own implementations.

use crate::error::DomainScanError;
use crate::types::{StatusReport, TrafficSummary, Translation};
use async_trait::async_trait;

/// Registration lookup for a single domain.
///
/// Failures are part of the report (`unknown` / `error`), so this never errors.
#[async_trait]
pub trait StatusProvider: Send + Sync {
    async fn check_status(&self, domain: &str) -> StatusReport;
}

/// Recent traffic for a registered domain.
#[async_trait]
pub trait TrafficProvider: Send + Sync {
    async fn traffic(&self, domain: &str) -> Result<TrafficSummary, DomainScanError>;
}

/// Keyword translation into the language roster.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Whether this provider answers without calling out (mock fallback).
    fn is_mock(&self) -> bool {
        false
    }

    async fn translate(&self, keyword: &str) -> Result<Vec<Translation>, DomainScanError>;
}
