//! Protocol implementations for domain scanning.
//!
//! This module contains the RDAP client and the bootstrap registry lookup
//! it depends on.

/// RDAP (Registration Data Access Protocol) implementation
pub mod rdap;

/// Suffix catalogue and bootstrap discovery
pub mod registry;

// Re-export commonly used functions and types
pub use rdap::{extract_registration_date, RdapClient, LOOKUP_FAILED_MESSAGE};
pub use registry::{normalize_tld, popular_tlds, BootstrapRegistry};
