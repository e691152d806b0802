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

//! Provider abstraction for connectivity sources.
//!
//! Implement this trait to plug a different connectivity source under the
//! observer. Subscriptions are plain channel receivers: dropping a receiver
//! is the deregistration, so teardown is symmetric on every path.

use tokio::sync::{broadcast, oneshot};

use crate::descriptor::ConnectionDescriptor;

/// A push-based connectivity source with one-shot pull queries.
pub trait ConnectivityProvider {
    /// Subscribe to boolean-connectivity changes.
    fn subscribe_connected(&self) -> broadcast::Receiver<bool>;

    /// Subscribe to connection-descriptor changes.
    ///
    /// Each call returns an independent receiver; subscribers that need the
    /// same notifications for different purposes subscribe separately.
    fn subscribe_connection_info(&self) -> broadcast::Receiver<ConnectionDescriptor>;

    /// Query current connectivity once.
    ///
    /// The completion resolves asynchronously and may race with live
    /// events; the consumer applies whichever arrives last.
    fn fetch_connected(&self) -> oneshot::Receiver<bool>;

    /// Query the current connection descriptor once.
    fn fetch_connection_info(&self) -> oneshot::Receiver<ConnectionDescriptor>;
}
