//! # Domain Scan Library
//!
//! Finds domain names for a keyword across languages: the keyword is
//! translated into a fixed roster of languages, every usable translation is
//! paired with the selected TLDs, and each candidate is checked against its
//! registry over RDAP.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_scan_lib::{DomainScanner, ScanConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scanner = DomainScanner::from_config(&ScanConfig::default())?;
//!     scanner.submit_keyword("coffee").await?;
//!
//!     while let Some(update) = scanner.next_update().await {
//!         println!("{} - {}", update.candidate.domain, update.candidate.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Translation**: chat-completion backed, with an offline mock fallback
//! - **RDAP**: registry discovery through the IANA bootstrap file
//! - **Sequential sweep**: one lookup at a time with a fixed pause
//! - **Traffic estimates**: synthetic visit counts for established domains

pub use checker::{
    registered_in_month, should_fetch_traffic, AvailabilityChecker, CandidateUpdate, Generation,
    SweepEvent,
};
pub use config::{
    load_env_config, parse_duration_string, ConfigManager, EnvConfig, FileConfig, ServerSettings,
};
pub use error::DomainScanError;
pub use protocols::{
    extract_registration_date, normalize_tld, popular_tlds, BootstrapRegistry, RdapClient,
    LOOKUP_FAILED_MESSAGE,
};
pub use providers::{StatusProvider, TrafficProvider, TranslationProvider};
pub use scanner::{DomainScanner, ScanBoard, ScanSummary};
pub use traffic::TrafficEstimator;
pub use translate::{mock_translations, Translator, LANGUAGES};
pub use types::{
    CandidateStatus, DomainCandidate, ScanConfig, StatusReport, TldCategory, TldInfo,
    TrafficMetric, TrafficSummary, Translation, TranslationResponse, DEFAULT_DELAY, DEFAULT_TLDS,
    IANA_BOOTSTRAP_URL,
};
pub use utils::{is_valid_label, validate_keyword};

// Public modules
pub mod generate;

pub use generate::generate_candidates;

mod checker;
mod config;
mod error;
mod protocols;
mod providers;
mod scanner;
mod traffic;
mod translate;
mod types;
mod utils;

pub type Result<T> = std::result::Result<T, DomainScanError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        languages: LANGUAGES.len(),
    }
}

/// Information about the library build
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub languages: usize,
}
