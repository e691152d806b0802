// Copyright 2025 DevInfo Desktop Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application configuration management.
//!
//! This module handles persistent configuration storage using TOML format.
//! It covers probe settings, the connection-history policy, and the
//! per-install identifier reported on the diagnostics screen.

use std::time::Duration;

use netinfo_client::{HistoryPolicy, ProbeConfig};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Stable per-install identifier, generated on first run
    #[serde(default = "default_install_id")]
    pub install_id: String,

    /// Reachability probe targets in host:port format
    #[serde(default = "default_probe_targets")]
    pub probe_targets: Vec<String>,

    /// Delay between probe rounds in seconds
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,

    /// Timeout for a single connect attempt in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Accumulate connection-info history on the diagnostics screen
    #[serde(default = "default_true")]
    pub track_connection_history: bool,

    /// Cap on the history length; unbounded when absent
    #[serde(default)]
    pub connection_history_limit: Option<usize>,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_install_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_probe_targets() -> Vec<String> {
    netinfo_client::probe::DEFAULT_PROBE_TARGETS
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_probe_interval_secs() -> u64 {
    5
}

fn default_probe_timeout_secs() -> u64 {
    3
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            install_id: default_install_id(),
            probe_targets: default_probe_targets(),
            probe_interval_secs: default_probe_interval_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            track_connection_history: true,
            connection_history_limit: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load("devinfo-desktop", "config")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store("devinfo-desktop", "config", self)
    }

    /// Get the config file path for display to user
    #[allow(dead_code)]
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path("devinfo-desktop", "config")
    }

    /// History policy derived from the tracking knobs
    #[must_use]
    pub fn history_policy(&self) -> HistoryPolicy {
        if !self.track_connection_history {
            HistoryPolicy::Disabled
        } else if let Some(limit) = self.connection_history_limit {
            HistoryPolicy::Capped(limit)
        } else {
            HistoryPolicy::Unbounded
        }
    }

    /// Probe configuration derived from the probe knobs
    #[must_use]
    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            targets: self.probe_targets.clone(),
            connect_timeout: Duration::from_secs(self.probe_timeout_secs),
            interval: Duration::from_secs(self.probe_interval_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.config_version, 1);
        assert!(!config.install_id.is_empty());
        assert!(!config.probe_targets.is_empty());
        assert!(config.track_connection_history);
        assert!(config.connection_history_limit.is_none());
    }

    #[test]
    fn test_history_policy_mapping() {
        let mut config = AppConfig::default();
        assert_eq!(config.history_policy(), HistoryPolicy::Unbounded);

        config.connection_history_limit = Some(50);
        assert_eq!(config.history_policy(), HistoryPolicy::Capped(50));

        config.track_connection_history = false;
        assert_eq!(config.history_policy(), HistoryPolicy::Disabled);
    }

    #[test]
    fn test_probe_config_mapping() {
        let config = AppConfig {
            probe_targets: vec!["localhost:80".to_string()],
            probe_interval_secs: 7,
            probe_timeout_secs: 2,
            ..Default::default()
        };

        let probe = config.probe_config();
        assert_eq!(probe.targets, vec!["localhost:80".to_string()]);
        assert_eq!(probe.interval, Duration::from_secs(7));
        assert_eq!(probe.connect_timeout, Duration::from_secs(2));
    }
}
