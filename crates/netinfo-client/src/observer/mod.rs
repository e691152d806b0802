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

//! Connectivity observation and derived state.
//!
//! The observer bridges a push-based connectivity source into three derived
//! fields: current boolean connectivity, the latest connection descriptor,
//! and an accumulating history of descriptors. Consumers call [`ConnectivityObserver::poll`]
//! from their render loop; all state mutation happens there.

use std::collections::VecDeque;

use log::warn;
use serde::Serialize;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::{broadcast, oneshot};

use crate::descriptor::ConnectionDescriptor;
use crate::provider::ConnectivityProvider;

/// Growth policy for the descriptor history.
///
/// The history is an append-only log with no eviction by default, which is
/// unbounded for long-lived sessions. Callers that care choose a cap or
/// disable accumulation instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPolicy {
    /// Append every descriptor, never evict.
    #[default]
    Unbounded,
    /// Append every descriptor, evicting the oldest beyond the cap.
    Capped(usize),
    /// Do not accumulate history.
    Disabled,
}

/// Derived connectivity state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectivityState {
    /// Current boolean connectivity.
    pub is_connected: bool,
    /// Latest connection descriptor, if any was observed.
    pub connection_info: Option<ConnectionDescriptor>,
    /// Descriptors in arrival order.
    pub connection_info_history: VecDeque<ConnectionDescriptor>,
}

impl ConnectivityState {
    fn new() -> Self {
        Self {
            is_connected: false,
            connection_info: None,
            connection_info_history: VecDeque::new(),
        }
    }

    fn record_history(&mut self, descriptor: ConnectionDescriptor, policy: HistoryPolicy) {
        match policy {
            HistoryPolicy::Unbounded => self.connection_info_history.push_back(descriptor),
            HistoryPolicy::Capped(cap) => {
                self.connection_info_history.push_back(descriptor);
                while self.connection_info_history.len() > cap {
                    self.connection_info_history.pop_front();
                }
            }
            HistoryPolicy::Disabled => {}
        }
    }

    /// Serialize the history as a JSON array.
    #[must_use]
    pub fn history_json(&self) -> String {
        serde_json::Value::Array(
            self.connection_info_history
                .iter()
                .map(|d| d.as_value().clone())
                .collect(),
        )
        .to_string()
    }
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriptions and in-flight pulls held while attached.
///
/// Dropping this is the deregistration: once it is gone there is no channel
/// an event or late fetch completion could arrive on.
struct Subscriptions {
    connected_rx: broadcast::Receiver<bool>,
    info_rx: broadcast::Receiver<ConnectionDescriptor>,
    history_rx: broadcast::Receiver<ConnectionDescriptor>,
    pending_connected: Option<oneshot::Receiver<bool>>,
    pending_info: Option<oneshot::Receiver<ConnectionDescriptor>>,
}

/// Observer deriving connectivity state from a provider.
///
/// Lifecycle is `Detached -> Attached -> Detached` with no intermediate
/// states. While attached it holds one boolean subscription and two
/// independent descriptor subscriptions (latest value and history).
pub struct ConnectivityObserver {
    state: ConnectivityState,
    history_policy: HistoryPolicy,
    subscriptions: Option<Subscriptions>,
}

impl std::fmt::Debug for ConnectivityObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityObserver")
            .field("state", &self.state)
            .field("history_policy", &self.history_policy)
            .field("attached", &self.subscriptions.is_some())
            .finish()
    }
}

impl Default for ConnectivityObserver {
    fn default() -> Self {
        Self::new(HistoryPolicy::default())
    }
}

impl ConnectivityObserver {
    /// Create a detached observer with initial state `{false, None, []}`.
    #[must_use]
    pub fn new(history_policy: HistoryPolicy) -> Self {
        Self {
            state: ConnectivityState::new(),
            history_policy,
            subscriptions: None,
        }
    }

    /// Current derived state.
    #[must_use]
    pub fn state(&self) -> &ConnectivityState {
        &self.state
    }

    /// Whether the observer currently holds subscriptions.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscriptions.is_some()
    }

    /// Subscribe to the provider and pull the current state once.
    ///
    /// Subscribing happens before the pulls: an event delivered between the
    /// two is buffered in the receivers, so no state change is lost. The
    /// pull completions resolve asynchronously and may race with live
    /// events; whichever is applied last wins. Re-attaching replaces any
    /// previous subscriptions.
    pub fn attach(&mut self, provider: &dyn ConnectivityProvider) {
        let connected_rx = provider.subscribe_connected();
        let info_rx = provider.subscribe_connection_info();
        let history_rx = provider.subscribe_connection_info();

        let pending_connected = Some(provider.fetch_connected());
        let pending_info = Some(provider.fetch_connection_info());

        self.subscriptions = Some(Subscriptions {
            connected_rx,
            info_rx,
            history_rx,
            pending_connected,
            pending_info,
        });
    }

    /// Release every subscription and in-flight pull.
    ///
    /// Events delivered afterwards are no-ops structurally: the receivers
    /// no longer exist. The derived state is left in place for inspection.
    pub fn detach(&mut self) {
        self.subscriptions = None;
    }

    /// Drain pending events and fetch completions into the state.
    ///
    /// Returns `true` if the state changed. Does nothing while detached.
    pub fn poll(&mut self) -> bool {
        let Self {
            state,
            history_policy,
            subscriptions,
        } = self;
        let Some(subs) = subscriptions.as_mut() else {
            return false;
        };

        let mut changed = false;

        loop {
            match subs.connected_rx.try_recv() {
                Ok(is_connected) => {
                    state.is_connected = is_connected;
                    changed = true;
                }
                Err(TryRecvError::Lagged(missed)) => {
                    warn!("connectivity events lagged, {missed} missed");
                }
                Err(_) => break,
            }
        }

        loop {
            match subs.info_rx.try_recv() {
                Ok(descriptor) => {
                    state.connection_info = Some(descriptor);
                    changed = true;
                }
                Err(TryRecvError::Lagged(missed)) => {
                    warn!("connection-info events lagged, {missed} missed");
                }
                Err(_) => break,
            }
        }

        loop {
            match subs.history_rx.try_recv() {
                Ok(descriptor) => {
                    state.record_history(descriptor, *history_policy);
                    changed = true;
                }
                Err(TryRecvError::Lagged(missed)) => {
                    warn!("connection-history events lagged, {missed} missed");
                }
                Err(_) => break,
            }
        }

        if let Some(rx) = subs.pending_connected.as_mut() {
            match rx.try_recv() {
                Ok(is_connected) => {
                    state.is_connected = is_connected;
                    changed = true;
                    subs.pending_connected = None;
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    subs.pending_connected = None;
                }
            }
        }

        if let Some(rx) = subs.pending_info.as_mut() {
            match rx.try_recv() {
                Ok(descriptor) => {
                    state.connection_info = Some(descriptor);
                    changed = true;
                    subs.pending_info = None;
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    subs.pending_info = None;
                }
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;

    /// Hand-driven provider: tests emit events and resolve pulls directly.
    struct TestHub {
        connected_tx: broadcast::Sender<bool>,
        info_tx: broadcast::Sender<ConnectionDescriptor>,
        connected_pulls: RefCell<Vec<oneshot::Sender<bool>>>,
        info_pulls: RefCell<Vec<oneshot::Sender<ConnectionDescriptor>>>,
    }

    impl TestHub {
        fn new() -> Self {
            let (connected_tx, _) = broadcast::channel(16);
            let (info_tx, _) = broadcast::channel(16);
            Self {
                connected_tx,
                info_tx,
                connected_pulls: RefCell::new(Vec::new()),
                info_pulls: RefCell::new(Vec::new()),
            }
        }

        fn emit_connected(&self, is_connected: bool) {
            let _ = self.connected_tx.send(is_connected);
        }

        fn emit_info(&self, descriptor: ConnectionDescriptor) {
            let _ = self.info_tx.send(descriptor);
        }

        fn resolve_connected(&self, is_connected: bool) {
            for tx in self.connected_pulls.borrow_mut().drain(..) {
                let _ = tx.send(is_connected);
            }
        }

        fn resolve_info(&self, descriptor: ConnectionDescriptor) {
            for tx in self.info_pulls.borrow_mut().drain(..) {
                let _ = tx.send(descriptor.clone());
            }
        }
    }

    impl ConnectivityProvider for TestHub {
        fn subscribe_connected(&self) -> broadcast::Receiver<bool> {
            self.connected_tx.subscribe()
        }

        fn subscribe_connection_info(&self) -> broadcast::Receiver<ConnectionDescriptor> {
            self.info_tx.subscribe()
        }

        fn fetch_connected(&self) -> oneshot::Receiver<bool> {
            let (tx, rx) = oneshot::channel();
            self.connected_pulls.borrow_mut().push(tx);
            rx
        }

        fn fetch_connection_info(&self) -> oneshot::Receiver<ConnectionDescriptor> {
            let (tx, rx) = oneshot::channel();
            self.info_pulls.borrow_mut().push(tx);
            rx
        }
    }

    fn descriptor(n: u64) -> ConnectionDescriptor {
        ConnectionDescriptor::new(json!({ "seq": n }))
    }

    #[test]
    fn test_initial_state() {
        let observer = ConnectivityObserver::default();
        assert!(!observer.state().is_connected);
        assert!(observer.state().connection_info.is_none());
        assert!(observer.state().connection_info_history.is_empty());
        assert!(!observer.is_attached());
    }

    #[test]
    fn test_history_preserves_arrival_order() {
        let hub = TestHub::new();
        let mut observer = ConnectivityObserver::default();
        observer.attach(&hub);

        let sent: Vec<_> = (0..5).map(descriptor).collect();
        for d in &sent {
            hub.emit_info(d.clone());
        }
        observer.poll();

        let history: Vec<_> = observer
            .state()
            .connection_info_history
            .iter()
            .cloned()
            .collect();
        assert_eq!(history, sent);
    }

    #[test]
    fn test_latest_descriptor_tracks_last_event() {
        let hub = TestHub::new();
        let mut observer = ConnectivityObserver::default();
        observer.attach(&hub);

        hub.emit_info(descriptor(1));
        hub.emit_info(descriptor(2));
        observer.poll();

        assert_eq!(observer.state().connection_info, Some(descriptor(2)));
    }

    #[test]
    fn test_events_after_detach_do_not_mutate_state() {
        let hub = TestHub::new();
        let mut observer = ConnectivityObserver::default();
        observer.attach(&hub);

        hub.emit_connected(true);
        hub.emit_info(descriptor(1));
        observer.poll();

        let snapshot = observer.state().clone();
        observer.detach();

        hub.emit_connected(false);
        hub.emit_info(descriptor(2));
        hub.resolve_connected(false);
        assert!(!observer.poll());

        assert_eq!(*observer.state(), snapshot);
    }

    #[test]
    fn test_fetch_resolving_after_live_event_wins() {
        let hub = TestHub::new();
        let mut observer = ConnectivityObserver::default();
        observer.attach(&hub);

        hub.emit_connected(false);
        observer.poll();
        assert!(!observer.state().is_connected);

        hub.resolve_connected(true);
        observer.poll();
        assert!(observer.state().is_connected);
    }

    #[test]
    fn test_live_event_after_fetch_wins() {
        let hub = TestHub::new();
        let mut observer = ConnectivityObserver::default();
        observer.attach(&hub);

        hub.resolve_connected(true);
        observer.poll();
        assert!(observer.state().is_connected);

        hub.emit_connected(false);
        observer.poll();
        assert!(!observer.state().is_connected);
    }

    #[test]
    fn test_event_between_subscribe_and_fetch_is_buffered() {
        let hub = TestHub::new();
        let mut observer = ConnectivityObserver::default();
        observer.attach(&hub);

        // Emitted before the pull resolves; must not be lost.
        hub.emit_info(descriptor(7));
        observer.poll();

        assert_eq!(observer.state().connection_info, Some(descriptor(7)));
        assert_eq!(observer.state().connection_info_history.len(), 1);
    }

    #[test]
    fn test_fetched_descriptor_fills_latest_but_not_history() {
        let hub = TestHub::new();
        let mut observer = ConnectivityObserver::default();
        observer.attach(&hub);

        hub.resolve_info(descriptor(3));
        observer.poll();

        assert_eq!(observer.state().connection_info, Some(descriptor(3)));
        assert!(observer.state().connection_info_history.is_empty());
    }

    #[test]
    fn test_capped_history_evicts_oldest() {
        let hub = TestHub::new();
        let mut observer = ConnectivityObserver::new(HistoryPolicy::Capped(2));
        observer.attach(&hub);

        for n in 0..4 {
            hub.emit_info(descriptor(n));
        }
        observer.poll();

        let history: Vec<_> = observer
            .state()
            .connection_info_history
            .iter()
            .cloned()
            .collect();
        assert_eq!(history, vec![descriptor(2), descriptor(3)]);
    }

    #[test]
    fn test_disabled_history_accumulates_nothing() {
        let hub = TestHub::new();
        let mut observer = ConnectivityObserver::new(HistoryPolicy::Disabled);
        observer.attach(&hub);

        hub.emit_info(descriptor(1));
        observer.poll();

        assert_eq!(observer.state().connection_info, Some(descriptor(1)));
        assert!(observer.state().connection_info_history.is_empty());
    }

    #[test]
    fn test_history_json_serialization() {
        let hub = TestHub::new();
        let mut observer = ConnectivityObserver::default();
        observer.attach(&hub);

        assert_eq!(observer.state().history_json(), "[]");

        hub.emit_info(descriptor(1));
        hub.emit_info(descriptor(2));
        observer.poll();

        assert_eq!(
            observer.state().history_json(),
            r#"[{"seq":1},{"seq":2}]"#
        );
    }

    #[test]
    fn test_poll_while_detached_is_inert() {
        let mut observer = ConnectivityObserver::default();
        assert!(!observer.poll());
    }
}
