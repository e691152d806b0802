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

//! Device identification facts.
//!
//! A [`DeviceInfoProvider`] is a set of pure string accessors; the fact
//! tables are built from one exactly once per screen and are read-only
//! afterwards. Values are displayed verbatim, empty or not.

use sysinfo::System;

/// Application bundle identifier reported on the diagnostics screen.
pub const BUNDLE_IDENTIFIER: &str = "com.devinfo.devinfodesktop";

/// Build number, injected at compile time when available.
pub const BUILD_NUMBER: &str = match option_env!("DEVINFO_BUILD_NUMBER") {
    Some(number) => number,
    None => "1",
};

/// One title/info row of a fact table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFactRow {
    pub title: String,
    pub info: String,
}

impl DeviceFactRow {
    pub(crate) fn new(title: &str, info: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            info: info.into(),
        }
    }
}

/// Static device identification strings.
pub trait DeviceInfoProvider {
    fn manufacturer(&self) -> String;
    fn device_name(&self) -> String;
    fn model(&self) -> String;
    fn unique_id(&self) -> String;
    fn locale(&self) -> String;
    fn country(&self) -> String;
    fn user_agent(&self) -> String;
    fn system_name(&self) -> String;
    fn device_id(&self) -> String;
    fn system_version(&self) -> String;
    fn bundle_id(&self) -> String;
    fn build_number(&self) -> String;
    fn version(&self) -> String;
    fn readable_version(&self) -> String;
}

/// Hardware fact table, in display order.
///
/// Screen dimensions are included when known; they come from the viewport
/// rather than the provider.
pub fn hardware_facts(
    provider: &dyn DeviceInfoProvider,
    screen: Option<(f32, f32)>,
) -> Vec<DeviceFactRow> {
    let mut rows = vec![
        DeviceFactRow::new("Device Manufacturer", provider.manufacturer()),
        DeviceFactRow::new("Device Name", provider.device_name()),
        DeviceFactRow::new("Device Model", provider.model()),
        DeviceFactRow::new("Device Unique ID", provider.unique_id()),
        DeviceFactRow::new("Device Locale", provider.locale()),
        DeviceFactRow::new("Device Country", provider.country()),
        DeviceFactRow::new("User Agent", provider.user_agent()),
    ];

    if let Some((width, height)) = screen {
        rows.push(DeviceFactRow::new("Screen Width", format!("{width:.0}")));
        rows.push(DeviceFactRow::new("Screen Height", format!("{height:.0}")));
    }

    rows
}

/// OS fact table, in display order.
pub fn os_facts(provider: &dyn DeviceInfoProvider) -> Vec<DeviceFactRow> {
    vec![
        DeviceFactRow::new("Device System Name", provider.system_name()),
        DeviceFactRow::new("Device ID", provider.device_id()),
        DeviceFactRow::new("Device Version", provider.system_version()),
    ]
}

/// App fact table, in display order.
pub fn app_facts(provider: &dyn DeviceInfoProvider) -> Vec<DeviceFactRow> {
    vec![
        DeviceFactRow::new("Bundle Id", provider.bundle_id()),
        DeviceFactRow::new("Build Number", provider.build_number()),
        DeviceFactRow::new("App Version", provider.version()),
        DeviceFactRow::new("App Version (Readable)", provider.readable_version()),
    ]
}

/// Read a DMI identification key.
#[cfg(target_os = "linux")]
fn read_dmi(key: &str) -> Option<String> {
    std::fs::read_to_string(format!("/sys/class/dmi/id/{key}"))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(not(target_os = "linux"))]
fn read_dmi(_key: &str) -> Option<String> {
    None
}

/// Locale tag from the process environment, e.g. "en_US".
fn locale_tag() -> String {
    for key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(value) = std::env::var(key) {
            let tag = value.split('.').next().unwrap_or("").to_string();
            if !tag.is_empty() && tag != "C" && tag != "POSIX" {
                return tag;
            }
        }
    }
    String::new()
}

/// Country part of a locale tag ("en_US" -> "US").
fn country_of(tag: &str) -> String {
    tag.split('@')
        .next()
        .unwrap_or("")
        .split('_')
        .nth(1)
        .unwrap_or("")
        .to_string()
}

/// Provider backed by the running system.
#[derive(Debug, Clone)]
pub struct SystemDeviceInfo {
    install_id: String,
}

impl SystemDeviceInfo {
    /// Create a provider reporting the given install id as the unique id.
    #[must_use]
    pub fn new(install_id: String) -> Self {
        Self { install_id }
    }
}

impl DeviceInfoProvider for SystemDeviceInfo {
    fn manufacturer(&self) -> String {
        read_dmi("sys_vendor").unwrap_or_else(|| "Unknown".to_string())
    }

    fn device_name(&self) -> String {
        System::host_name().unwrap_or_default()
    }

    fn model(&self) -> String {
        read_dmi("product_name").unwrap_or_else(|| "Unknown".to_string())
    }

    fn unique_id(&self) -> String {
        self.install_id.clone()
    }

    fn locale(&self) -> String {
        locale_tag()
    }

    fn country(&self) -> String {
        country_of(&locale_tag())
    }

    fn user_agent(&self) -> String {
        format!(
            "DevInfoDesktop/{} ({}; {})",
            self.version(),
            self.system_name(),
            self.system_version()
        )
    }

    fn system_name(&self) -> String {
        System::name().unwrap_or_default()
    }

    fn device_id(&self) -> String {
        read_dmi("board_name").unwrap_or_else(System::cpu_arch)
    }

    fn system_version(&self) -> String {
        System::os_version().unwrap_or_default()
    }

    fn bundle_id(&self) -> String {
        BUNDLE_IDENTIFIER.to_string()
    }

    fn build_number(&self) -> String {
        BUILD_NUMBER.to_string()
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn readable_version(&self) -> String {
        format!("{}.{}", self.version(), self.build_number())
    }
}
