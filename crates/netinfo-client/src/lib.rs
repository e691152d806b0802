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

//! Network connectivity monitoring library.
//!
//! This library derives connectivity state for desktop applications and
//! exposes it as a change feed. It is organized in layers that can be used
//! independently or composed together:
//!
//! - **Probe layer**: async TCP reachability probes against well-known
//!   endpoints
//! - **Monitor layer**: background task emitting connectivity and
//!   descriptor change events, with one-shot pull queries
//! - **Observer layer**: derived state (boolean connectivity, latest
//!   descriptor, descriptor history) driven from a render loop
//!
//! # Quick Start
//!
//! Spawn a [`NetworkMonitor`] and drive a [`ConnectivityObserver`] from
//! your UI loop:
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use netinfo_client::{ConnectivityObserver, MonitorConfig, NetworkMonitor};
//!
//! let monitor = NetworkMonitor::spawn(MonitorConfig::default());
//!
//! let mut observer = ConnectivityObserver::default();
//! observer.attach(&monitor);
//!
//! loop {
//!     if observer.poll() {
//!         println!("online: {}", observer.state().is_connected);
//!     }
//!     std::thread::sleep(Duration::from_millis(200));
//! }
//! ```
//!
//! # Using Individual Layers
//!
//! The probe layer works on its own for one-off reachability checks:
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use netinfo_client::probe::probe_target;
//!
//! # async fn example() {
//! match probe_target("1.1.1.1:443", Duration::from_secs(3)).await {
//!     Ok(latency) => println!("reachable in {latency:?}"),
//!     Err(e) => println!("unreachable: {e}"),
//! }
//! # }
//! ```
//!
//! Custom connectivity sources implement [`ConnectivityProvider`]; the
//! observer only ever sees that trait.

pub mod descriptor;
pub mod interfaces;
pub mod monitor;
pub mod observer;
pub mod probe;
pub mod provider;

pub use descriptor::ConnectionDescriptor;
pub use interfaces::{classify_interface, InterfaceSnapshot, LinkType};
pub use monitor::{MonitorConfig, NetworkMonitor};
pub use observer::{ConnectivityObserver, ConnectivityState, HistoryPolicy};
pub use probe::{ProbeConfig, ProbeError, ProbeReport};
pub use provider::ConnectivityProvider;
