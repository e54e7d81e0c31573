// =============================================================================
// Service Configuration — explicit, file-backed settings with atomic save
// =============================================================================
//
// Every tunable of the analysis service lives here and is passed into each
// component at construction time; there is no global mutable configuration.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_site_name() -> String {
    "Meridian Stock Insight".to_string()
}

fn default_site_description() -> String {
    "Technical analysis dashboard for a single stock at a time".to_string()
}

fn default_cache_dir() -> String {
    "cache".to_string()
}

fn default_cache_expiry_secs() -> u64 {
    3600
}

fn default_provider_base_url() -> String {
    "https://api.example.com".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

// =============================================================================
// AppConfig
// =============================================================================

/// Top-level configuration for the Meridian analysis service.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    // --- Site identity -------------------------------------------------------

    /// Display name shown in the dashboard header.
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// One-line description shown under the site name.
    #[serde(default = "default_site_description")]
    pub site_description: String,

    // --- Cache ---------------------------------------------------------------

    /// Directory holding one JSON file per cached (symbol, start, end) key.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Age in seconds after which a cache entry is treated as absent.
    #[serde(default = "default_cache_expiry_secs")]
    pub cache_expiry_secs: u64,

    // --- History provider ----------------------------------------------------

    /// Base URL of the daily-history provider.
    #[serde(default = "default_provider_base_url")]
    pub provider_base_url: String,

    /// Per-request timeout for provider fetches, in seconds.
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    /// Number of additional attempts after a failed provider fetch.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between provider retry attempts, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            site_description: default_site_description(),
            cache_dir: default_cache_dir(),
            cache_expiry_secs: default_cache_expiry_secs(),
            provider_base_url: default_provider_base_url(),
            provider_timeout_secs: default_provider_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            site = %config.site_name,
            provider = %config.provider_base_url,
            "config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    ///
    /// This prevents corruption if the process crashes mid-write.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise config to JSON")?;

        // Atomic write: write to a temporary sibling file, then rename.
        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "config saved (atomic)");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.site_name, "Meridian Stock Insight");
        assert_eq!(cfg.cache_dir, "cache");
        assert_eq!(cfg.cache_expiry_secs, 3600);
        assert_eq!(cfg.provider_base_url, "https://api.example.com");
        assert_eq!(cfg.provider_timeout_secs, 10);
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_delay_ms, 1000);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.cache_expiry_secs, 3600);
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.site_name, "Meridian Stock Insight");
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "cache_dir": "/tmp/bars", "max_retries": 1 }"#;
        let cfg: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.cache_dir, "/tmp/bars");
        assert_eq!(cfg.max_retries, 1);
        assert_eq!(cfg.cache_expiry_secs, 3600);
        assert_eq!(cfg.provider_timeout_secs, 10);
    }

    #[test]
    fn roundtrip_serialisation() {
        let cfg = AppConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let cfg2: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.site_name, cfg2.site_name);
        assert_eq!(cfg.cache_dir, cfg2.cache_dir);
        assert_eq!(cfg.cache_expiry_secs, cfg2.cache_expiry_secs);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut cfg = AppConfig::default();
        cfg.cache_expiry_secs = 60;
        cfg.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.cache_expiry_secs, 60);
        assert_eq!(loaded.site_name, cfg.site_name);
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(AppConfig::load("/nonexistent/meridian/config.json").is_err());
    }
}
