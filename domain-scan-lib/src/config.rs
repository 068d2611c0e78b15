//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `DS_*`
//! environment variables, merging them with proper precedence rules, and
//! folding the result into a `ScanConfig`.

use crate::error::DomainScanError;
use crate::protocols::registry::normalize_tld;
use crate::types::ScanConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Default address the HTTP service binds to.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port the HTTP service binds to.
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Scan defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Translation provider settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator: Option<TranslatorConfig>,

    /// Registry lookup settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdap: Option<RdapConfig>,

    /// HTTP service settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
}

/// Default values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default TLD selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tlds: Option<Vec<String>>,

    /// Pause between candidates (e.g. "300ms")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,

    /// RDAP request timeout (e.g. "5s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TranslatorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Root of an OpenAI-compatible API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RdapConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to report which config files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed configuration or an error if reading, parsing or
    /// validation fails.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainScanError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainScanError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainScanError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            DomainScanError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;
        debug!("loaded config from {}", path.display());

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is the lowest precedence, then the home directory, then
    /// the current directory. Files that fail to load are skipped.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainScanError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let discovered = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in discovered.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => warn!("Ignoring config file {}: {}", path.display(), e),
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            warn!("Multiple config files found; later entries take precedence:");
            for path in &loaded_files {
                warn!("   {}", path.display());
            }
        }

        Ok(merged_config)
    }

    /// Configuration file in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        ["./domain-scan.toml", "./.domain-scan.toml"]
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Configuration file in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".domain-scan.toml", "domain-scan.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Configuration file under the XDG config directory.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-scan").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations with proper precedence.
    ///
    /// Values from `higher` take precedence over values from `lower`.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: merge_section(lower.defaults, higher.defaults, |l, h| DefaultsConfig {
                tlds: h.tlds.or(l.tlds),
                delay: h.delay.or(l.delay),
                timeout: h.timeout.or(l.timeout),
            }),
            translator: merge_section(lower.translator, higher.translator, |l, h| {
                TranslatorConfig {
                    model: h.model.or(l.model),
                    base_url: h.base_url.or(l.base_url),
                    timeout: h.timeout.or(l.timeout),
                }
            }),
            rdap: merge_section(lower.rdap, higher.rdap, |l, h| RdapConfig {
                bootstrap_url: h.bootstrap_url.or(l.bootstrap_url),
            }),
            server: merge_section(lower.server, higher.server, |l, h| ServerConfig {
                host: h.host.or(l.host),
                port: h.port.or(l.port),
            }),
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainScanError> {
        if let Some(defaults) = &config.defaults {
            if let Some(tlds) = &defaults.tlds {
                validate_tlds(tlds)?;
            }
            validate_duration("defaults.delay", defaults.delay.as_deref())?;
            validate_duration("defaults.timeout", defaults.timeout.as_deref())?;
        }

        if let Some(translator) = &config.translator {
            validate_duration("translator.timeout", translator.timeout.as_deref())?;
            if let Some(model) = &translator.model {
                if model.trim().is_empty() {
                    return Err(DomainScanError::config("translator.model cannot be empty"));
                }
            }
        }

        if let Some(server) = &config.server {
            if server.port == Some(0) {
                return Err(DomainScanError::config("server.port must be between 1 and 65535"));
            }
        }

        Ok(())
    }
}

fn merge_section<T>(lower: Option<T>, higher: Option<T>, merge: impl FnOnce(T, T) -> T) -> Option<T> {
    match (lower, higher) {
        (Some(l), Some(h)) => Some(merge(l, h)),
        (l, h) => h.or(l),
    }
}

fn validate_tlds(tlds: &[String]) -> Result<(), DomainScanError> {
    if tlds.is_empty() {
        return Err(DomainScanError::config("TLD list cannot be empty"));
    }
    for tld in tlds {
        if normalize_tld(tld).is_none() {
            return Err(DomainScanError::config(format!("Invalid TLD '{}'", tld)));
        }
    }
    Ok(())
}

fn validate_duration(field: &str, value: Option<&str>) -> Result<(), DomainScanError> {
    match value {
        Some(raw) if parse_duration_string(raw).is_none() => Err(DomainScanError::config(format!(
            "Invalid {} '{}'. Use format like '300ms', '5s', '2m'",
            field, raw
        ))),
        _ => Ok(()),
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via `DS_*`
/// environment variables, plus the translation credential.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub tlds: Option<Vec<String>>,
    pub delay: Option<Duration>,
    pub timeout: Option<Duration>,
    pub bootstrap_url: Option<String>,
    pub model: Option<String>,
    pub translator_url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<String>,
    pub api_key: Option<String>,
}

/// Load configuration from environment variables.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    EnvConfig::from_lookup(verbose, |key| env::var(key).ok())
}

impl EnvConfig {
    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(verbose: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env_config = EnvConfig::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let used = |key: &str, value: &str| {
            if verbose {
                debug!("Using {}={}", key, value);
            }
        };

        if let Some(tld_str) = non_empty("DS_TLD") {
            let tlds: Vec<String> = tld_str
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !tlds.is_empty() {
                used("DS_TLD", &tld_str);
                env_config.tlds = Some(tlds);
            }
        }

        for (key, slot) in [
            ("DS_DELAY", &mut env_config.delay),
            ("DS_TIMEOUT", &mut env_config.timeout),
        ] {
            if let Some(raw) = non_empty(key) {
                match parse_duration_string(&raw) {
                    Some(duration) => {
                        used(key, &raw);
                        *slot = Some(duration);
                    }
                    None => warn!(
                        "Invalid {}='{}', use format like '300ms', '5s', '2m'",
                        key, raw
                    ),
                }
            }
        }

        for (key, slot) in [
            ("DS_BOOTSTRAP_URL", &mut env_config.bootstrap_url),
            ("DS_MODEL", &mut env_config.model),
            ("DS_TRANSLATOR_URL", &mut env_config.translator_url),
            ("DS_HOST", &mut env_config.host),
            ("DS_CONFIG", &mut env_config.config),
        ] {
            if let Some(value) = non_empty(key) {
                used(key, &value);
                *slot = Some(value);
            }
        }

        if let Some(raw) = non_empty("DS_PORT") {
            match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => {
                    used("DS_PORT", &raw);
                    env_config.port = Some(port);
                }
                _ => warn!("Invalid DS_PORT='{}', must be 1-65535", raw),
            }
        }

        // never echoed
        env_config.api_key = non_empty("OPENAI_API_KEY");

        env_config
    }

    /// Fold these values over `config`.
    pub fn apply_to(&self, mut config: ScanConfig) -> ScanConfig {
        if let Some(tlds) = &self.tlds {
            config.tlds = tlds.clone();
        }
        if let Some(delay) = self.delay {
            config.delay = delay;
        }
        if let Some(timeout) = self.timeout {
            config.rdap_timeout = timeout;
        }
        if let Some(url) = &self.bootstrap_url {
            config.bootstrap_url = url.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(url) = &self.translator_url {
            config.api_base_url = url.clone();
        }
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        config
    }
}

impl FileConfig {
    /// Fold file values over `config`.
    ///
    /// Durations were checked when the file was loaded; anything that still
    /// fails to parse is reported as a config error.
    pub fn apply_to(&self, mut config: ScanConfig) -> Result<ScanConfig, DomainScanError> {
        if let Some(defaults) = &self.defaults {
            if let Some(tlds) = &defaults.tlds {
                config.tlds = tlds.clone();
            }
            if let Some(delay) = &defaults.delay {
                config.delay = require_duration("defaults.delay", delay)?;
            }
            if let Some(timeout) = &defaults.timeout {
                config.rdap_timeout = require_duration("defaults.timeout", timeout)?;
            }
        }

        if let Some(translator) = &self.translator {
            if let Some(model) = &translator.model {
                config.model = model.clone();
            }
            if let Some(url) = &translator.base_url {
                config.api_base_url = url.clone();
            }
            if let Some(timeout) = &translator.timeout {
                config.translate_timeout = require_duration("translator.timeout", timeout)?;
            }
        }

        if let Some(url) = self.rdap.as_ref().and_then(|r| r.bootstrap_url.as_ref()) {
            config.bootstrap_url = url.clone();
        }

        Ok(config)
    }
}

fn require_duration(field: &str, raw: &str) -> Result<Duration, DomainScanError> {
    parse_duration_string(raw)
        .ok_or_else(|| DomainScanError::config(format!("Invalid {} '{}'", field, raw)))
}

/// Where the HTTP service listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerSettings {
    /// Environment beats file beats default.
    pub fn resolve(file: &FileConfig, env: &EnvConfig) -> Self {
        let server = file.server.clone().unwrap_or_default();
        let defaults = Self::default();
        Self {
            host: env.host.clone().or(server.host).unwrap_or(defaults.host),
            port: env.port.or(server.port).unwrap_or(defaults.port),
        }
    }

    /// `host:port` suitable for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a duration string like "300ms", "5s" or "2m".
///
/// A bare number is taken as seconds.
pub fn parse_duration_string(raw: &str) -> Option<Duration> {
    let raw = raw.trim().to_lowercase();

    if let Some(ms) = raw.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(s) = raw.strip_suffix('s') {
        s.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(m) = raw.strip_suffix('m') {
        m.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        raw.parse::<u64>().ok().map(Duration::from_secs)
    }
}
