//! Configuration file support for flagsweep.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (`FLAGSWEEP_*`, e.g., `FLAGSWEEP_ACCESS_TOKEN`)
//! 3. Local config file (./flagsweep.toml)
//! 4. XDG config file (~/.config/flagsweep/config.toml)
//! 5. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [service]
//! host = "https://app.launchdarkly.com"  # optional, this is the default
//! access_token = "api-..."               # or use FLAGSWEEP_ACCESS_TOKEN
//! project_key = "web-app"                # or use FLAGSWEEP_PROJECT_KEY
//! requests_per_second = 5
//!
//! [sweep]
//! property_name = "flag.expiry.date"
//! days_offset = 30
//! date_format = "MM/DD/YYYY"
//! skip_existing = true
//! batch_size = 5
//! batch_delay_ms = 1000
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

use flagsweep::api::DEFAULT_HOST;
use flagsweep::dates::DEFAULT_DATE_FORMAT;
use flagsweep::rate_limit::DEFAULT_REQUESTS_PER_SECOND;
use flagsweep::sweep::{
    DEFAULT_BATCH_DELAY_MS, DEFAULT_BATCH_SIZE, DEFAULT_DAYS_OFFSET, DEFAULT_PROPERTY_NAME,
};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Flag service connection settings.
    pub service: ServiceConfig,
    /// Default sweep options.
    pub sweep: SweepConfig,
}

/// Flag service connection settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service host URL.
    pub host: String,
    /// API access token with read and write access to the project.
    /// Can also be set via FLAGSWEEP_ACCESS_TOKEN.
    pub access_token: Option<String>,
    /// Default project key when none is given on the command line.
    /// Can also be set via FLAGSWEEP_PROJECT_KEY.
    pub project_key: Option<String>,
    /// Proactive request pacing, in requests per second.
    pub requests_per_second: u32,
    /// Disable proactive rate limiting entirely.
    pub no_rate_limit: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            access_token: None,
            project_key: None,
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            no_rate_limit: false,
        }
    }
}

/// Default sweep options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Custom property the expiry date is written to.
    pub property_name: String,
    /// Calendar days from creation to expiry.
    pub days_offset: u32,
    /// Expiry date layout name.
    pub date_format: String,
    /// Leave flags that already carry the property untouched.
    pub skip_existing: bool,
    /// Concurrent write calls per batch.
    pub batch_size: usize,
    /// Pause between batches, in milliseconds.
    pub batch_delay_ms: u64,
    /// Pause between enumeration pages, in milliseconds.
    pub page_delay_ms: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            property_name: DEFAULT_PROPERTY_NAME.to_string(),
            days_offset: DEFAULT_DAYS_OFFSET,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            skip_existing: true,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay_ms: DEFAULT_BATCH_DELAY_MS,
            page_delay_ms: 0,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/flagsweep/config.toml)
    /// 3. Local config file (./flagsweep.toml)
    /// 4. Environment variables with the FLAGSWEEP prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "flagsweep") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("flagsweep.toml");
        if local_config.exists() {
            tracing::debug!("loading config from ./flagsweep.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // Nested keys via double underscore, e.g. FLAGSWEEP_SERVICE__HOST.
        builder = builder.add_source(Environment::with_prefix("FLAGSWEEP").separator("__"));

        let mut config = match builder.build().and_then(|c| c.try_deserialize::<Config>()) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load configuration, using defaults");
                Config::default()
            }
        };

        // Flat shortcuts for the variables operators actually set.
        if let Ok(token) = std::env::var("FLAGSWEEP_ACCESS_TOKEN") {
            if !token.is_empty() {
                config.service.access_token = Some(token);
            }
        }
        if let Ok(host) = std::env::var("FLAGSWEEP_HOST") {
            if !host.is_empty() {
                config.service.host = host;
            }
        }
        if let Ok(project) = std::env::var("FLAGSWEEP_PROJECT_KEY") {
            if !project.is_empty() {
                config.service.project_key = Some(project);
            }
        }

        config
    }
}
