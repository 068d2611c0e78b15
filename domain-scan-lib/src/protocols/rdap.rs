//! RDAP (Registration Data Access Protocol) implementation.
//!
//! A lookup is two requests: the bootstrap directory to find the service for
//! the domain's suffix, then the domain object itself. Each request is made
//! exactly once; there is no retry and no backoff.

use crate::error::DomainScanError;
use crate::protocols::registry::{extract_suffix, resolve_service_url};
use crate::providers::StatusProvider;
use crate::types::{ScanConfig, StatusReport, IANA_BOOTSTRAP_URL};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

/// Message attached to candidates whose lookup failed outright.
pub const LOOKUP_FAILED_MESSAGE: &str = "Failed to check domain status";

/// RDAP client for checking domain registration status.
#[derive(Clone)]
pub struct RdapClient {
    /// HTTP client shared by bootstrap and registry requests
    http_client: reqwest::Client,
    /// Bootstrap directory location
    bootstrap_url: String,
}

impl RdapClient {
    /// Create a new RDAP client against the IANA bootstrap registry.
    pub fn new() -> Result<Self, DomainScanError> {
        Self::with_settings(IANA_BOOTSTRAP_URL, Duration::from_secs(5))
    }

    /// Create a new RDAP client from scan configuration.
    pub fn with_config(config: &ScanConfig) -> Result<Self, DomainScanError> {
        Self::with_settings(&config.bootstrap_url, config.rdap_timeout)
    }

    /// Create a new RDAP client with an explicit bootstrap URL and timeout.
    pub fn with_settings(bootstrap_url: &str, timeout: Duration) -> Result<Self, DomainScanError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainScanError::network_with_source(
                    "Failed to create RDAP HTTP client",
                    e.to_string(),
                )
            })?;

        Ok(Self {
            http_client,
            bootstrap_url: bootstrap_url.to_string(),
        })
    }

    /// Check a domain's registration status.
    ///
    /// Never fails: an unresolvable suffix becomes `unknown`, and a failed
    /// registry request becomes `error`.
    pub async fn check_domain(&self, domain: &str) -> StatusReport {
        let tld = extract_suffix(domain).unwrap_or_default();

        let service_url =
            match resolve_service_url(&self.http_client, &self.bootstrap_url, &tld).await {
                Ok(Some(url)) => url,
                Ok(None) => {
                    debug!("no RDAP service listed for .{}", tld);
                    return StatusReport::unknown(
                        domain,
                        format!("Could not find RDAP service for TLD: {}", tld),
                    );
                }
                Err(e) => {
                    warn!("RDAP service resolution failed for {}: {}", domain, e);
                    return StatusReport::unknown(
                        domain,
                        format!("Could not find RDAP service for TLD: {}", tld),
                    );
                }
            };

        match self.query_domain(&service_url, domain).await {
            Ok(report) => report,
            Err(e) => {
                warn!("RDAP lookup failed for {}: {}", domain, e);
                StatusReport::error(domain, LOOKUP_FAILED_MESSAGE)
            }
        }
    }

    /// Query a registry for one domain and classify the response.
    async fn query_domain(
        &self,
        service_url: &str,
        domain: &str,
    ) -> Result<StatusReport, DomainScanError> {
        let rdap_url = domain_url(service_url, domain);
        debug!("RDAP request to {}", rdap_url);

        let response = self
            .http_client
            .get(&rdap_url)
            .header(ACCEPT, "application/rdap+json")
            .send()
            .await
            .map_err(|e| DomainScanError::rdap(domain, format!("Request failed: {}", e)))?;

        debug!("RDAP response for {}: {}", domain, response.status());

        match response.status() {
            StatusCode::NOT_FOUND => Ok(StatusReport::available(domain)),
            StatusCode::OK => {
                let json = response.json::<serde_json::Value>().await.map_err(|e| {
                    DomainScanError::rdap(domain, format!("Failed to parse JSON: {}", e))
                })?;

                Ok(StatusReport::registered(
                    domain,
                    extract_registration_date(&json),
                ))
            }
            code => Ok(StatusReport::unknown(
                domain,
                format!("Unexpected response from RDAP: {}", code.as_u16()),
            )),
        }
    }
}

#[async_trait]
impl StatusProvider for RdapClient {
    async fn check_status(&self, domain: &str) -> StatusReport {
        self.check_domain(domain).await
    }
}

/// Build `{service}/domain/{domain}`, tolerating a trailing slash on the service URL.
fn domain_url(service_url: &str, domain: &str) -> String {
    format!("{}/domain/{}", service_url.trim_end_matches('/'), domain)
}

/// Extract the registration date from an RDAP domain object.
///
/// Returns the `eventDate` of the first event whose `eventAction` is
/// `registration`, unchanged.
pub fn extract_registration_date(json: &serde_json::Value) -> Option<String> {
    json.get("events")
        .and_then(|e| e.as_array())?
        .iter()
        .find(|event| event.get("eventAction").and_then(|a| a.as_str()) == Some("registration"))
        .and_then(|event| event.get("eventDate"))
        .and_then(|d| d.as_str())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdap_client_creation() {
        let client = RdapClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_domain_url_trailing_slash() {
        assert_eq!(
            domain_url("https://rdap.verisign.com/com/v1/", "example.com"),
            "https://rdap.verisign.com/com/v1/domain/example.com"
        );
        assert_eq!(
            domain_url("https://rdap.nic.example", "foo.example"),
            "https://rdap.nic.example/domain/foo.example"
        );
    }

    #[test]
    fn test_extract_registration_date() {
        let json = serde_json::json!({
            "events": [
                {
                    "eventAction": "last changed",
                    "eventDate": "2024-03-01T00:00:00Z"
                },
                {
                    "eventAction": "registration",
                    "eventDate": "1995-08-14T04:00:00Z"
                },
                {
                    "eventAction": "registration",
                    "eventDate": "2001-01-01T00:00:00Z"
                }
            ]
        });

        assert_eq!(
            extract_registration_date(&json),
            Some("1995-08-14T04:00:00Z".to_string())
        );
    }

    #[test]
    fn test_extract_registration_date_missing() {
        assert_eq!(extract_registration_date(&serde_json::json!({})), None);
        let json = serde_json::json!({
            "events": [{"eventAction": "expiration", "eventDate": "2030-01-01"}]
        });
        assert_eq!(extract_registration_date(&json), None);
    }
}
