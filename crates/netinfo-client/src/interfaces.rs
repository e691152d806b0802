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

//! Network interface snapshots.
//!
//! Descriptors are enriched with the name and link type of the most active
//! non-loopback interface. Link type is inferred from platform naming
//! conventions.

use sysinfo::Networks;

/// Link type of a network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    Ethernet,
    Wifi,
    Cellular,
    Loopback,
    Unknown,
}

impl LinkType {
    /// Lowercase label used in descriptors.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ethernet => "ethernet",
            Self::Wifi => "wifi",
            Self::Cellular => "cellular",
            Self::Loopback => "loopback",
            Self::Unknown => "unknown",
        }
    }
}

/// Classify an interface by its platform name.
#[must_use]
pub fn classify_interface(name: &str) -> LinkType {
    let lower = name.to_ascii_lowercase();

    if lower == "lo" || lower.starts_with("lo0") {
        LinkType::Loopback
    } else if lower.starts_with("wl") || lower.starts_with("wifi") || lower.starts_with("ath") {
        LinkType::Wifi
    } else if lower.starts_with("ww") || lower.starts_with("rmnet") || lower.starts_with("pdp") {
        LinkType::Cellular
    } else if lower.starts_with("eth") || lower.starts_with("en") {
        LinkType::Ethernet
    } else {
        LinkType::Unknown
    }
}

/// Name and link type of the interface carrying traffic.
#[derive(Debug, Clone)]
pub struct InterfaceSnapshot {
    /// Interface name, if any non-loopback interface exists.
    pub name: Option<String>,
    /// Link type inferred from the name.
    pub link_type: LinkType,
}

impl InterfaceSnapshot {
    /// Snapshot the most active non-loopback interface.
    #[must_use]
    pub fn capture() -> Self {
        let networks = Networks::new_with_refreshed_list();

        let mut best: Option<(String, u64)> = None;
        for (name, data) in &networks {
            if classify_interface(name) == LinkType::Loopback {
                continue;
            }
            let traffic = data.total_received() + data.total_transmitted();
            if best.as_ref().map_or(true, |(_, t)| traffic > *t) {
                best = Some((name.clone(), traffic));
            }
        }

        match best {
            Some((name, _)) => {
                let link_type = classify_interface(&name);
                Self {
                    name: Some(name),
                    link_type,
                }
            }
            None => Self {
                name: None,
                link_type: LinkType::Unknown,
            },
        }
    }
}
