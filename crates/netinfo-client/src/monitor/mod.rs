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

//! System connectivity monitor.
//!
//! Runs reachability probes on a dedicated background thread and broadcasts
//! connectivity transitions. Descriptor events are emitted only when the
//! link fingerprint changes, so subscribers see a change feed rather than a
//! probe feed. One-shot pull queries are served by the same task.

use chrono::Utc;
use log::{info, warn};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::descriptor::ConnectionDescriptor;
use crate::interfaces::{InterfaceSnapshot, LinkType};
use crate::probe::{run_probes, ProbeConfig};
use crate::provider::ConnectivityProvider;

const QUERY_CHANNEL_CAPACITY: usize = 16;

/// Configuration for the connectivity monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Reachability probing configuration.
    pub probe: ProbeConfig,
    /// Broadcast channel capacity for events.
    pub event_channel_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            probe: ProbeConfig::default(),
            event_channel_capacity: 64,
        }
    }
}

/// One-shot pull queries served by the monitor task.
enum Query {
    Connected(oneshot::Sender<bool>),
    ConnectionInfo(oneshot::Sender<ConnectionDescriptor>),
}

/// Handle to a running connectivity monitor.
///
/// The monitor runs on its own thread with a private tokio runtime, so the
/// handle can live on a thread without one. Dropping the handle stops the
/// monitor.
pub struct NetworkMonitor {
    connected_tx: broadcast::Sender<bool>,
    info_tx: broadcast::Sender<ConnectionDescriptor>,
    query_tx: mpsc::Sender<Query>,
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for NetworkMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkMonitor")
            .field("cancel_token", &self.cancel_token)
            .finish_non_exhaustive()
    }
}

impl NetworkMonitor {
    /// Spawn the monitor with the given configuration.
    #[must_use]
    pub fn spawn(config: MonitorConfig) -> Self {
        let (connected_tx, _) = broadcast::channel(config.event_channel_capacity);
        let (info_tx, _) = broadcast::channel(config.event_channel_capacity);
        let (query_tx, query_rx) = mpsc::channel(QUERY_CHANNEL_CAPACITY);
        let cancel_token = CancellationToken::new();

        let task_connected = connected_tx.clone();
        let task_info = info_tx.clone();
        let task_cancel = cancel_token.clone();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
            rt.block_on(monitor_loop(
                config,
                task_connected,
                task_info,
                query_rx,
                task_cancel,
            ));
        });

        Self {
            connected_tx,
            info_tx,
            query_tx,
            cancel_token,
        }
    }

    /// Stop the monitor task.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for NetworkMonitor {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

impl ConnectivityProvider for NetworkMonitor {
    fn subscribe_connected(&self) -> broadcast::Receiver<bool> {
        self.connected_tx.subscribe()
    }

    fn subscribe_connection_info(&self) -> broadcast::Receiver<ConnectionDescriptor> {
        self.info_tx.subscribe()
    }

    fn fetch_connected(&self) -> oneshot::Receiver<bool> {
        let (tx, rx) = oneshot::channel();
        if self.query_tx.try_send(Query::Connected(tx)).is_err() {
            warn!("connectivity monitor unavailable, dropping connected query");
        }
        rx
    }

    fn fetch_connection_info(&self) -> oneshot::Receiver<ConnectionDescriptor> {
        let (tx, rx) = oneshot::channel();
        if self.query_tx.try_send(Query::ConnectionInfo(tx)).is_err() {
            warn!("connectivity monitor unavailable, dropping connection-info query");
        }
        rx
    }
}

/// Identity of the current link, used for change detection.
///
/// Volatile descriptor fields (latency, timestamp) are excluded so a probe
/// round only produces an event when the link actually changed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkFingerprint {
    reachable: bool,
    link_type: LinkType,
    interface: Option<String>,
}

struct Observation {
    reachable: bool,
    fingerprint: LinkFingerprint,
    descriptor: ConnectionDescriptor,
}

async fn observe(probe: &ProbeConfig) -> Observation {
    let report = run_probes(probe).await;
    let interface = InterfaceSnapshot::capture();

    let fingerprint = LinkFingerprint {
        reachable: report.reachable,
        link_type: interface.link_type,
        interface: interface.name.clone(),
    };
    let descriptor = ConnectionDescriptor::from_observation(&report, &interface, Utc::now());

    Observation {
        reachable: report.reachable,
        fingerprint,
        descriptor,
    }
}

async fn monitor_loop(
    config: MonitorConfig,
    connected_tx: broadcast::Sender<bool>,
    info_tx: broadcast::Sender<ConnectionDescriptor>,
    mut query_rx: mpsc::Receiver<Query>,
    cancel_token: CancellationToken,
) {
    let mut interval = tokio::time::interval(config.probe.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last_connected: Option<bool> = None;
    let mut last_fingerprint: Option<LinkFingerprint> = None;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let observation = observe(&config.probe).await;

                if last_connected != Some(observation.reachable) {
                    info!(
                        "connectivity changed: {}",
                        if observation.reachable { "online" } else { "offline" }
                    );
                    last_connected = Some(observation.reachable);
                    let _ = connected_tx.send(observation.reachable);
                }

                if last_fingerprint.as_ref() != Some(&observation.fingerprint) {
                    last_fingerprint = Some(observation.fingerprint);
                    let _ = info_tx.send(observation.descriptor);
                }
            }

            Some(query) = query_rx.recv() => {
                let observation = observe(&config.probe).await;
                match query {
                    Query::Connected(tx) => {
                        let _ = tx.send(observation.reachable);
                    }
                    Query::ConnectionInfo(tx) => {
                        let _ = tx.send(observation.descriptor);
                    }
                }
            }

            () = cancel_token.cancelled() => {
                info!("connectivity monitor stopped");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn test_config(targets: Vec<String>) -> MonitorConfig {
        MonitorConfig {
            probe: ProbeConfig {
                targets,
                connect_timeout: Duration::from_millis(500),
                interval: Duration::from_millis(50),
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_connected_resolves_true_for_local_listener() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let monitor = NetworkMonitor::spawn(test_config(vec![address]));

        let connected = tokio::time::timeout(Duration::from_secs(5), monitor.fetch_connected())
            .await
            .unwrap()
            .unwrap();
        assert!(connected);

        monitor.shutdown();
    }

    #[tokio::test]
    async fn test_fetch_connection_info_carries_reachability() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let monitor = NetworkMonitor::spawn(test_config(vec![address]));

        let descriptor =
            tokio::time::timeout(Duration::from_secs(5), monitor.fetch_connection_info())
                .await
                .unwrap()
                .unwrap();
        assert_eq!(descriptor.as_value()["reachable"], true);

        monitor.shutdown();
    }

    #[tokio::test]
    async fn test_fetch_unreachable_target_resolves_false() {
        // TEST-NET-3 address, guaranteed not to answer.
        let monitor = NetworkMonitor::spawn(test_config(vec!["203.0.113.1:9".to_string()]));

        let connected = tokio::time::timeout(Duration::from_secs(5), monitor.fetch_connected())
            .await
            .unwrap()
            .unwrap();
        assert!(!connected);

        monitor.shutdown();
    }
}
