//! Error handling for domain scanning operations.
//!
//! This module defines a single error type that covers the different ways a
//! scan can fail, from bad keywords to upstream services misbehaving.

use std::fmt;

/// Main error type for domain scanning operations.
#[derive(Debug, Clone)]
pub enum DomainScanError {
    /// Keyword contains characters that cannot form a domain label
    InvalidKeyword {
        keyword: String,
        reason: String,
    },

    /// Invalid domain name format
    InvalidDomain {
        domain: String,
        reason: String,
    },

    /// Network-related errors (connection, DNS, etc.)
    NetworkError {
        message: String,
        source: String,
    },

    /// RDAP protocol specific errors
    RdapError {
        domain: String,
        message: String,
    },

    /// Bootstrap registry lookup failures
    BootstrapError {
        tld: String,
        message: String,
    },

    /// Translation provider failures (bad status, empty or malformed reply)
    TranslationError {
        message: String,
    },

    /// Configuration errors (invalid settings, etc.)
    ConfigError {
        message: String,
    },

    /// File I/O errors when reading configuration
    FileError {
        path: String,
        message: String,
    },

    /// None of the translations can be used as a domain label
    NoValidTranslations,

    /// Generic internal errors that don't fit other categories
    Internal {
        message: String,
    },
}

impl DomainScanError {
    /// Create a new invalid keyword error.
    pub fn invalid_keyword<K: Into<String>, R: Into<String>>(keyword: K, reason: R) -> Self {
        Self::InvalidKeyword {
            keyword: keyword.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Create a new RDAP error.
    pub fn rdap<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::RdapError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new bootstrap error.
    pub fn bootstrap<T: Into<String>, M: Into<String>>(tld: T, message: M) -> Self {
        Self::BootstrapError {
            tld: tld.into(),
            message: message.into(),
        }
    }

    /// Create a new translation error.
    pub fn translation<M: Into<String>>(message: M) -> Self {
        Self::TranslationError {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the user can fix this by changing their input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidKeyword { .. } | Self::InvalidDomain { .. } | Self::NoValidTranslations
        )
    }
}

impl fmt::Display for DomainScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKeyword { keyword, reason } => {
                write!(f, "Invalid keyword '{}': {}", keyword, reason)
            }
            Self::InvalidDomain { domain, reason } => {
                write!(f, "Invalid domain '{}': {}", domain, reason)
            }
            Self::NetworkError { message, source } => {
                write!(f, "Network error: {} (source: {})", message, source)
            }
            Self::RdapError { domain, message } => {
                write!(f, "RDAP error for '{}': {}", domain, message)
            }
            Self::BootstrapError { tld, message } => {
                write!(f, "Bootstrap error for TLD '{}': {}", tld, message)
            }
            Self::TranslationError { message } => {
                write!(f, "Translation error: {}", message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::NoValidTranslations => {
                write!(f, "None of the translations are valid for domain names")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for DomainScanError {}
