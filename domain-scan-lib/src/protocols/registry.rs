//! Suffix catalogue and IANA bootstrap registry lookup.
//!
//! The bootstrap registry maps top-level suffixes to the RDAP services that
//! are authoritative for them. It is fetched fresh for every lookup; nothing
//! is cached between calls.

use crate::error::DomainScanError;
use crate::types::{TldCategory, TldInfo};
use tracing::debug;

/// Suffixes offered in the selector, in display order.
const POPULAR_TLDS: &[TldInfo] = &[
    TldInfo { extension: "com", name: ".com", category: TldCategory::Popular },
    TldInfo { extension: "net", name: ".net", category: TldCategory::Popular },
    TldInfo { extension: "org", name: ".org", category: TldCategory::Popular },
    TldInfo { extension: "io", name: ".io", category: TldCategory::Popular },
    TldInfo { extension: "co", name: ".co", category: TldCategory::Popular },
    TldInfo { extension: "app", name: ".app", category: TldCategory::Popular },
    TldInfo { extension: "dev", name: ".dev", category: TldCategory::Popular },
    TldInfo { extension: "me", name: ".me", category: TldCategory::Popular },
    TldInfo { extension: "ai", name: ".ai", category: TldCategory::Popular },
    TldInfo { extension: "xyz", name: ".xyz", category: TldCategory::Popular },
];

/// The suffix catalogue shown to users.
pub fn popular_tlds() -> &'static [TldInfo] {
    POPULAR_TLDS
}

/// Clean up a user supplied suffix.
///
/// Trims whitespace, strips a leading dot and lowercases. Returns `None`
/// when the result is empty or cannot be a DNS label.
pub fn normalize_tld(raw: &str) -> Option<String> {
    let tld = raw.trim().trim_start_matches('.').to_lowercase();
    if tld.is_empty() || tld.contains('.') {
        return None;
    }
    if tld.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        Some(tld)
    } else {
        None
    }
}

/// Extract the suffix (last dot-delimited label) from a domain name.
///
/// Multi-level registries like `co.uk` are not special-cased: the bootstrap
/// registry is keyed on the last label only.
pub fn extract_suffix(domain: &str) -> Result<String, DomainScanError> {
    let parts: Vec<&str> = domain.split('.').collect();

    if parts.len() < 2 {
        return Err(DomainScanError::invalid_domain(
            domain,
            "Domain must contain at least one dot",
        ));
    }

    match parts.last() {
        Some(last) if !last.is_empty() => Ok(last.to_lowercase()),
        _ => Err(DomainScanError::invalid_domain(domain, "Domain has an empty suffix")),
    }
}

/// One `services` entry: the suffixes it covers and its base URLs.
#[derive(Debug, Clone, PartialEq)]
struct BootstrapService {
    tlds: Vec<String>,
    urls: Vec<String>,
}

/// Parsed IANA RDAP bootstrap file.
#[derive(Debug, Clone, Default)]
pub struct BootstrapRegistry {
    services: Vec<BootstrapService>,
}

impl BootstrapRegistry {
    /// Parse the bootstrap JSON (`{"services": [[[tld, ...], [url, ...]], ...]}`).
    ///
    /// Entries that do not have the two-array shape are skipped.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, DomainScanError> {
        let services = json
            .get("services")
            .and_then(|s| s.as_array())
            .ok_or_else(|| {
                DomainScanError::bootstrap(
                    "*",
                    "Invalid bootstrap JSON: missing or invalid 'services' array",
                )
            })?;

        let mut parsed = Vec::with_capacity(services.len());

        for service in services {
            let Some(service_array) = service.as_array() else {
                continue;
            };
            if service_array.len() < 2 {
                continue;
            }

            let strings = |value: &serde_json::Value| -> Vec<String> {
                value
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|i| i.as_str())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default()
            };

            parsed.push(BootstrapService {
                tlds: strings(&service_array[0]),
                urls: strings(&service_array[1]),
            });
        }

        Ok(Self { services: parsed })
    }

    /// First service URL of the first entry covering `tld`.
    pub fn service_url(&self, tld: &str) -> Option<&str> {
        self.services
            .iter()
            .find(|service| service.tlds.iter().any(|t| t.eq_ignore_ascii_case(tld)))
            .and_then(|service| service.urls.first())
            .map(String::as_str)
    }

    /// Number of service entries in the directory.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// Download and parse the bootstrap registry.
pub async fn fetch_bootstrap(
    client: &reqwest::Client,
    bootstrap_url: &str,
) -> Result<BootstrapRegistry, DomainScanError> {
    debug!("fetching RDAP bootstrap from {}", bootstrap_url);

    let response = client.get(bootstrap_url).send().await.map_err(|e| {
        DomainScanError::bootstrap("*", format!("Failed to fetch bootstrap registry: {}", e))
    })?;

    if !response.status().is_success() {
        return Err(DomainScanError::bootstrap(
            "*",
            format!("Bootstrap registry returned HTTP {}", response.status()),
        ));
    }

    let json: serde_json::Value = response.json().await.map_err(|e| {
        DomainScanError::bootstrap("*", format!("Failed to parse bootstrap JSON: {}", e))
    })?;

    BootstrapRegistry::from_json(&json)
}

/// Resolve the RDAP service for a suffix.
///
/// `Ok(None)` means the directory has no entry for the suffix.
pub async fn resolve_service_url(
    client: &reqwest::Client,
    bootstrap_url: &str,
    tld: &str,
) -> Result<Option<String>, DomainScanError> {
    let registry = fetch_bootstrap(client, bootstrap_url).await?;
    Ok(registry.service_url(tld).map(String::from))
}
