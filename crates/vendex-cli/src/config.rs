// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vendex_app::MutationPolicy;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub service: Service,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            service: Service::default(),
            storage: Storage::default(),
            session: SessionSettings::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Service {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSettings {
    pub exclusive_mutations: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub filter: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            filter: Some(DEFAULT_LOG_FILTER.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("VENDEX_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set VENDEX_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(vendex_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [service], [storage], [session], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Regenerate it with `vendex --print-example-config`",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_url) = &self.service.base_url
            && base_url.trim().is_empty()
        {
            bail!(
                "service.base_url in {} must not be empty; remove it to use {}",
                path.display(),
                DEFAULT_BASE_URL
            );
        }

        if let Some(timeout) = &self.service.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "service.timeout in {} must be positive, got {}; remove it to wait without a limit",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(db_path) = &self.storage.db_path {
            vendex_db::validate_db_path(db_path)?;
        }

        if let Some(filter) = &self.log.filter {
            EnvFilter::try_new(filter).with_context(|| {
                format!(
                    "log.filter {filter:?} in {} is not a valid filter; use a level such as \"info\" or \"vendex_app=debug\"",
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.service
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// `None` when no timeout is configured; requests then wait indefinitely.
    pub fn timeout(&self) -> Result<Option<Duration>> {
        self.service
            .timeout
            .as_deref()
            .map(parse_duration)
            .transpose()
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => vendex_db::default_db_path(),
        }
    }

    pub fn mutation_policy(&self) -> MutationPolicy {
        if self.session.exclusive_mutations.unwrap_or(false) {
            MutationPolicy::Exclusive
        } else {
            MutationPolicy::Concurrent
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# vendex config\n# Place this file at: {}\n\nversion = 1\n\n[service]\nbase_url = \"{}\"\n# Optional. Without it requests wait as long as the service takes.\n# timeout = \"10s\"\n\n[storage]\n# Used with --local and --demo. Default is the platform data dir (for example ~/.local/share/vendex/vendex.db)\n# db_path = \"/absolute/path/to/vendex.db\"\n\n[session]\n# Refuse a new change while another is still in flight.\nexclusive_mutations = false\n\n[log]\n# Overridden by VENDEX_LOG.\nfilter = \"{}\"\n",
            path.display(),
            DEFAULT_BASE_URL,
            DEFAULT_LOG_FILTER,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        let Some(secs) = mins.checked_mul(60) else {
            bail!("timeout duration {raw:?} is too large; use a smaller number of minutes");
        };
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}
