// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_ERROR_REQUEUE_SECS: u64 = 60;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Requeue delay after a successful reconciliation
    pub poll_interval: Duration,
    /// Requeue delay after a failed reconciliation
    pub error_requeue_interval: Duration,
    /// Tolerate a failure to write the ProviderConfig availability status during connect
    pub provider_status_best_effort: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            error_requeue_interval: Duration::from_secs(DEFAULT_ERROR_REQUEUE_SECS),
            provider_status_best_effort: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let poll_interval = match lookup("POLL_INTERVAL_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .with_context(|| format!("POLL_INTERVAL_SECS is not a number: {}", v))?,
            ),
            None => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };

        let error_requeue_interval = match lookup("ERROR_REQUEUE_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .with_context(|| format!("ERROR_REQUEUE_SECS is not a number: {}", v))?,
            ),
            None => Duration::from_secs(DEFAULT_ERROR_REQUEUE_SECS),
        };

        let provider_status_best_effort = match lookup("PROVIDER_STATUS_BEST_EFFORT") {
            Some(v) => v
                .parse()
                .with_context(|| format!("PROVIDER_STATUS_BEST_EFFORT is not a boolean: {}", v))?,
            None => true,
        };

        Ok(Config {
            poll_interval,
            error_requeue_interval,
            provider_status_best_effort,
        })
    }
}
