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

//! Connection descriptors.
//!
//! A descriptor is an opaque payload describing the current connection.
//! Consumers store and serialize descriptors; only the monitor that
//! produced one knows its shape.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::interfaces::InterfaceSnapshot;
use crate::probe::ProbeReport;

/// Opaque payload describing the current connection type and quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionDescriptor(serde_json::Value);

impl ConnectionDescriptor {
    /// Wrap an arbitrary JSON payload as a descriptor.
    #[must_use]
    pub fn new(payload: serde_json::Value) -> Self {
        Self(payload)
    }

    /// Build a descriptor from a probe outcome and the active interface.
    #[must_use]
    pub fn from_observation(
        report: &ProbeReport,
        interface: &InterfaceSnapshot,
        probed_at: DateTime<Utc>,
    ) -> Self {
        Self(json!({
            "type": interface.link_type.as_str(),
            "interface": interface.name,
            "reachable": report.reachable,
            "latency_ms": report.latency.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            "target": report.target,
            "probed_at": probed_at.to_rfc3339(),
        }))
    }

    /// Borrow the raw JSON payload.
    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Serialize the descriptor to a JSON string.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
