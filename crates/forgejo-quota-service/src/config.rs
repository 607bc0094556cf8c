//! Quota configuration
//!
//! Settings are read with the `config` crate from `conf/quota.yml` and from
//! `FORGEJO__`-prefixed environment variables, e.g.
//! `FORGEJO__QUOTA__DEFAULT__TOTAL=1GiB`.

use config::{Config, ConfigError, Environment};

use forgejo_quota_common::{QuotaError, Result, UNLIMITED, format_size, parse_size};
use forgejo_quota_core::DefaultQuota;

pub const DEFAULT_CONFIG_FILE: &str = "conf/quota";
pub const ENV_PREFIX: &str = "FORGEJO";

pub const QUOTA_ENABLED: &str = "quota.enabled";
pub const QUOTA_DEFAULT_GROUPS: &str = "quota.default_groups";
pub const QUOTA_DEFAULT_TOTAL: &str = "quota.default.total";

/// Resolved quota settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotaSettings {
    /// Quota checks are skipped entirely when disabled
    pub enabled: bool,
    /// Groups applied to users that are not in any group
    pub default_groups: Vec<String>,
    /// Policy applied when a user resolves to no group at all
    pub default: DefaultQuota,
}

/// Application configuration wrapper
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Load from the default config file (optional) and the environment
    pub fn new() -> Result<Self> {
        Self::build(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
    }

    /// Load from `path` (required) and the environment
    pub fn load(path: &str) -> Result<Self> {
        Self::build(config::File::with_name(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key(QUOTA_DEFAULT_GROUPS)
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?;

        Ok(Configuration { config })
    }

    /// Create a configuration from an already built Config instance
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn quota_enabled(&self) -> bool {
        self.config.get_bool(QUOTA_ENABLED).unwrap_or(false)
    }

    /// Default group names, given as a list or a comma-separated string
    pub fn quota_default_groups(&self) -> Vec<String> {
        let names = match self.config.get::<Vec<String>>(QUOTA_DEFAULT_GROUPS) {
            Ok(names) => names,
            Err(_) => self
                .config
                .get_string(QUOTA_DEFAULT_GROUPS)
                .map(|raw| raw.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
        };

        names
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Total size limit for users without groups; `-1` when unset
    pub fn quota_default_total(&self) -> Result<i64> {
        match self.config.get_string(QUOTA_DEFAULT_TOTAL) {
            Ok(raw) => parse_size(&raw),
            Err(ConfigError::NotFound(_)) => Ok(UNLIMITED),
            Err(e) => Err(config_error(e)),
        }
    }

    pub fn quota_settings(&self) -> Result<QuotaSettings> {
        let settings = QuotaSettings {
            enabled: self.quota_enabled(),
            default_groups: self.quota_default_groups(),
            default: DefaultQuota::new(self.quota_default_total()?),
        };

        tracing::info!(
            enabled = settings.enabled,
            default_groups = ?settings.default_groups,
            default_total = %format_size(settings.default.total),
            "quota settings loaded"
        );

        Ok(settings)
    }
}

fn config_error(e: ConfigError) -> QuotaError {
    QuotaError::ConfigError(e.to_string())
}
