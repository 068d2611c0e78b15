//! Core data types for domain scanning.
//!
//! This module defines the data structures passed between the translator,
//! the candidate generator, the RDAP resolver, the traffic estimator and the
//! sweep orchestrator, plus the configuration shared by all of them.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// IANA RDAP bootstrap registry for DNS.
pub const IANA_BOOTSTRAP_URL: &str = "https://data.iana.org/rdap/dns.json";

/// Default OpenAI-compatible API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model used for translations.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Suffixes selected when the user has not picked any.
pub const DEFAULT_TLDS: [&str; 3] = ["com", "net", "org"];

/// Pause between two candidates of a sweep.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

/// A keyword rendered in one target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// Language name from the roster (e.g., "Spanish")
    pub language: String,

    /// ASCII rendering of the keyword in that language
    pub translation: String,
}

impl Translation {
    pub fn new<L: Into<String>, T: Into<String>>(language: L, translation: T) -> Self {
        Self {
            language: language.into(),
            translation: translation.into(),
        }
    }
}

/// Body of a translation response, both from the provider and on our own API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationResponse {
    #[serde(default)]
    pub translations: Vec<Translation>,
}

/// Registration state of a candidate domain.
///
/// `Checking` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    /// Lookup pending
    Checking,
    /// Registry answered 404
    Available,
    /// Registry returned a domain object
    Registered,
    /// No RDAP service for the suffix, or an unexpected HTTP status
    Unknown,
    /// The lookup itself failed
    Error,
}

impl CandidateStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CandidateStatus::Checking)
    }
}

impl std::fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateStatus::Checking => write!(f, "checking"),
            CandidateStatus::Available => write!(f, "available"),
            CandidateStatus::Registered => write!(f, "registered"),
            CandidateStatus::Unknown => write!(f, "unknown"),
            CandidateStatus::Error => write!(f, "error"),
        }
    }
}

/// Outcome of a single registration lookup.
///
/// This is also the JSON body of `GET /api/domain-status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub domain: String,

    pub status: CandidateStatus,

    /// eventDate of the first "registration" event, as sent by the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,

    /// Human readable diagnostic for unknown / error outcomes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusReport {
    pub fn available<D: Into<String>>(domain: D) -> Self {
        Self {
            domain: domain.into(),
            status: CandidateStatus::Available,
            registration_date: None,
            message: None,
        }
    }

    pub fn registered<D: Into<String>>(domain: D, registration_date: Option<String>) -> Self {
        Self {
            domain: domain.into(),
            status: CandidateStatus::Registered,
            registration_date,
            message: None,
        }
    }

    pub fn unknown<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self {
            domain: domain.into(),
            status: CandidateStatus::Unknown,
            registration_date: None,
            message: Some(message.into()),
        }
    }

    pub fn error<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self {
            domain: domain.into(),
            status: CandidateStatus::Error,
            registration_date: None,
            message: Some(message.into()),
        }
    }
}

/// Visits recorded for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficMetric {
    /// Month in `YYYY-MM` form
    pub month: String,
    pub visits: u64,
}

/// Recent traffic for a registered domain, oldest month first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSummary {
    pub domain: String,
    pub metrics: Vec<TrafficMetric>,
}

/// A generated domain name and everything learned about it so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCandidate {
    /// Lowercased `translation.suffix`
    pub domain: String,

    pub status: CandidateStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_data: Option<TrafficSummary>,
}

impl DomainCandidate {
    /// A fresh candidate waiting for its lookup.
    pub fn checking<D: Into<String>>(domain: D) -> Self {
        Self {
            domain: domain.into(),
            status: CandidateStatus::Checking,
            registration_date: None,
            message: None,
            traffic_data: None,
        }
    }

    /// Merge a registration lookup into this candidate.
    pub fn apply_report(&mut self, report: StatusReport) {
        self.status = report.status;
        self.registration_date = report.registration_date;
        self.message = report.message;
    }
}

/// Grouping used by the suffix catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TldCategory {
    Popular,
    Country,
    New,
    Other,
}

/// A suffix the user can pick from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TldInfo {
    /// Bare suffix, e.g. "io"
    pub extension: &'static str,
    /// Display form, e.g. ".io"
    pub name: &'static str,
    pub category: TldCategory,
}

/// Configuration options for a scan.
///
/// Shared by the CLI and the HTTP server; both build it from defaults,
/// config files, environment variables and flags.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Suffixes combined with every valid translation
    /// Default: com, net, org
    pub tlds: Vec<String>,

    /// Pause after each candidate of a sweep
    /// Default: 300ms
    pub delay: Duration,

    /// Timeout for each RDAP request (bootstrap and registry)
    /// Default: 5 seconds
    pub rdap_timeout: Duration,

    /// Where the suffix -> RDAP service directory is fetched from
    pub bootstrap_url: String,

    /// Credential for the translation provider; `None` selects mock translations
    pub api_key: Option<String>,

    /// Chat model used for translations
    pub model: String,

    /// Root of the OpenAI-compatible API
    pub api_base_url: String,

    /// Timeout for the translation request
    /// Default: 30 seconds
    pub translate_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tlds: DEFAULT_TLDS.iter().map(|t| t.to_string()).collect(),
            delay: DEFAULT_DELAY,
            rdap_timeout: Duration::from_secs(5),
            bootstrap_url: IANA_BOOTSTRAP_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            translate_timeout: Duration::from_secs(30),
        }
    }
}

impl ScanConfig {
    /// Set the suffixes to combine with translations.
    pub fn with_tlds(mut self, tlds: Vec<String>) -> Self {
        self.tlds = tlds;
        self
    }

    /// Set the pause between candidates.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the timeout for RDAP requests.
    pub fn with_rdap_timeout(mut self, timeout: Duration) -> Self {
        self.rdap_timeout = timeout;
        self
    }

    /// Point the resolver at a different bootstrap directory.
    pub fn with_bootstrap_url<U: Into<String>>(mut self, url: U) -> Self {
        self.bootstrap_url = url.into();
        self
    }

    /// Set the translation credential.
    pub fn with_api_key<K: Into<String>>(mut self, key: K) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the chat model used for translations.
    pub fn with_model<M: Into<String>>(mut self, model: M) -> Self {
        self.model = model.into();
        self
    }

    /// Point the translator at a different OpenAI-compatible endpoint.
    pub fn with_api_base_url<U: Into<String>>(mut self, url: U) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the timeout for the translation request.
    pub fn with_translate_timeout(mut self, timeout: Duration) -> Self {
        self.translate_timeout = timeout;
        self
    }
}
