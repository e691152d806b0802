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

//! Reachability probing.
//!
//! Connectivity is derived by opening short-lived TCP connections to a set
//! of well-known endpoints. The first reachable target settles the question;
//! per-target failures are kept for descriptor enrichment.

use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Endpoints probed when no targets are configured.
pub const DEFAULT_PROBE_TARGETS: &[&str] = &["1.1.1.1:443", "8.8.8.8:53", "9.9.9.9:443"];

/// Default timeout for a single connect attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Default delay between probe rounds.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(5);

/// Errors that can occur while probing a target.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("connect timed out after {0:?}")]
    Timeout(Duration),

    #[error("connect failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for reachability probing.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Probe targets in "host:port" format, tried in order.
    pub targets: Vec<String>,
    /// Timeout for a single connect attempt.
    pub connect_timeout: Duration,
    /// Delay between probe rounds.
    pub interval: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            targets: DEFAULT_PROBE_TARGETS.iter().map(ToString::to_string).collect(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            interval: DEFAULT_PROBE_INTERVAL,
        }
    }
}

/// Outcome of one probe round across all configured targets.
#[derive(Debug)]
pub struct ProbeReport {
    /// Whether any target was reachable.
    pub reachable: bool,
    /// Connect latency of the first reachable target.
    pub latency: Option<Duration>,
    /// The first reachable target.
    pub target: Option<String>,
    /// Targets that failed before a reachable one was found.
    pub failures: Vec<(String, ProbeError)>,
}

/// Probe a single target, measuring connect latency.
pub async fn probe_target(address: &str, connect_timeout: Duration) -> Result<Duration, ProbeError> {
    let started = Instant::now();
    match timeout(connect_timeout, TcpStream::connect(address)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            Ok(started.elapsed())
        }
        Ok(Err(e)) => Err(ProbeError::Io(e)),
        Err(_) => Err(ProbeError::Timeout(connect_timeout)),
    }
}

/// Run one probe round, stopping at the first reachable target.
pub async fn run_probes(config: &ProbeConfig) -> ProbeReport {
    let mut attempts = Vec::with_capacity(config.targets.len());

    for target in &config.targets {
        let outcome = probe_target(target, config.connect_timeout).await;
        let reached = outcome.is_ok();
        attempts.push((target.clone(), outcome));
        if reached {
            break;
        }
    }

    summarize(attempts)
}

/// Aggregate per-target attempts into a report.
pub(crate) fn summarize(attempts: Vec<(String, Result<Duration, ProbeError>)>) -> ProbeReport {
    let mut report = ProbeReport {
        reachable: false,
        latency: None,
        target: None,
        failures: Vec::new(),
    };

    for (target, outcome) in attempts {
        match outcome {
            Ok(latency) => {
                report.reachable = true;
                report.latency = Some(latency);
                report.target = Some(target);
                break;
            }
            Err(e) => report.failures.push((target, e)),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_first_success_wins() {
        let attempts = vec![
            (
                "10.0.0.1:443".to_string(),
                Err(ProbeError::Timeout(Duration::from_secs(3))),
            ),
            ("1.1.1.1:443".to_string(), Ok(Duration::from_millis(20))),
        ];

        let report = summarize(attempts);
        assert!(report.reachable);
        assert_eq!(report.target.as_deref(), Some("1.1.1.1:443"));
        assert_eq!(report.latency, Some(Duration::from_millis(20)));
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_summarize_all_failures() {
        let attempts = vec![
            (
                "10.0.0.1:443".to_string(),
                Err(ProbeError::Timeout(Duration::from_secs(3))),
            ),
            (
                "10.0.0.2:443".to_string(),
                Err(ProbeError::Timeout(Duration::from_secs(3))),
            ),
        ];

        let report = summarize(attempts);
        assert!(!report.reachable);
        assert!(report.latency.is_none());
        assert!(report.target.is_none());
        assert_eq!(report.failures.len(), 2);
    }

    #[test]
    fn test_summarize_empty_round() {
        let report = summarize(Vec::new());
        assert!(!report.reachable);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_probe_local_listener() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let latency = probe_target(&address, Duration::from_secs(1)).await.unwrap();
        assert!(latency < Duration::from_secs(1));
    }
}
