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

//! Device diagnostics screen.
//!
//! Three fact tables are built once when the screen is constructed; the
//! fourth card is computed per frame from the connectivity observer.

use netinfo_client::{ConnectivityObserver, ConnectivityProvider, ConnectivityState, HistoryPolicy};

use crate::device_info::{app_facts, hardware_facts, os_facts, DeviceFactRow, DeviceInfoProvider};
use crate::navigation::Navigation;

const DESCRIPTION: &str = "Dedicated to identifying specifics of the device. \
    All info useful for identifying outlying behaviour specific to a device.";

/// Diagnostics screen showing device facts and live network state.
#[derive(Debug)]
pub struct DeviceInfoScreen {
    hardware: Vec<DeviceFactRow>,
    os: Vec<DeviceFactRow>,
    app: Vec<DeviceFactRow>,
    observer: ConnectivityObserver,
}

impl DeviceInfoScreen {
    /// Build the fact tables from the provider.
    ///
    /// The provider is read exactly once; the tables never change
    /// afterwards.
    #[must_use]
    pub fn new(
        provider: &dyn DeviceInfoProvider,
        screen: Option<(f32, f32)>,
        history_policy: HistoryPolicy,
    ) -> Self {
        Self {
            hardware: hardware_facts(provider, screen),
            os: os_facts(provider),
            app: app_facts(provider),
            observer: ConnectivityObserver::new(history_policy),
        }
    }

    /// Attach the connectivity observer. Called when the screen is pushed.
    pub fn mount(&mut self, provider: &dyn ConnectivityProvider) {
        self.observer.attach(provider);
    }

    /// Detach the connectivity observer. Called when the screen is popped.
    pub fn unmount(&mut self) {
        self.observer.detach();
    }

    /// Drain pending connectivity events into the observer state.
    pub fn poll(&mut self) -> bool {
        self.observer.poll()
    }

    /// Current connectivity state.
    #[must_use]
    pub fn connectivity(&self) -> &ConnectivityState {
        self.observer.state()
    }

    /// Invoke the back capability. One call per back-affordance tap.
    pub fn press_back(&self, nav: &mut dyn Navigation) {
        nav.go_back();
    }

    /// Net Info rows derived from the observer state.
    fn net_info(&self) -> Vec<DeviceFactRow> {
        let state = self.observer.state();

        vec![
            DeviceFactRow::new(
                "Connection",
                if state.is_connected { "Online" } else { "Offline" },
            ),
            DeviceFactRow::new(
                "Connection Info",
                state
                    .connection_info
                    .as_ref()
                    .map_or_else(|| "null".to_string(), |d| d.to_json()),
            ),
            DeviceFactRow::new("Connection Info History", state.history_json()),
        ]
    }

    /// Render the screen as the central panel.
    pub fn render(&mut self, ctx: &egui::Context, nav: &mut dyn Navigation) {
        self.poll();

        egui::CentralPanel::default()
            .frame(
                egui::Frame::default()
                    .fill(egui::Color32::from_rgb(25, 30, 35))
                    .inner_margin(egui::Margin::same(12)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui
                        .button(
                            egui::RichText::new("← Back")
                                .size(12.0)
                                .color(egui::Color32::from_rgb(150, 200, 220)),
                        )
                        .clicked()
                    {
                        self.press_back(nav);
                    }
                });

                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("Device Info")
                            .size(20.0)
                            .color(egui::Color32::from_rgb(220, 230, 240))
                            .strong(),
                    );
                });

                ui.add_space(6.0);

                ui.label(
                    egui::RichText::new(DESCRIPTION)
                        .size(10.0)
                        .color(egui::Color32::from_rgb(150, 150, 150)),
                );

                ui.add_space(8.0);
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    render_card(ui, "Device Hardware", &self.hardware);
                    ui.add_space(6.0);
                    render_card(ui, "Device OS", &self.os);
                    ui.add_space(6.0);
                    render_card(ui, "App Info", &self.app);
                    ui.add_space(6.0);
                    render_card(ui, "Net Info", &self.net_info());
                });
            });
    }
}

fn render_card(ui: &mut egui::Ui, title: &str, rows: &[DeviceFactRow]) {
    ui.label(
        egui::RichText::new(title.to_uppercase())
            .color(egui::Color32::from_rgb(150, 150, 150))
            .size(10.0)
            .strong(),
    );

    ui.add_space(3.0);

    for row in rows {
        render_row(ui, row);
    }
}

fn render_row(ui: &mut egui::Ui, row: &DeviceFactRow) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(&row.title)
                .color(egui::Color32::from_rgb(130, 130, 130))
                .size(9.0),
        );

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                egui::RichText::new(&row.info)
                    .color(egui::Color32::from_rgb(200, 200, 200))
                    .size(9.0)
                    .monospace(),
            );
        });
    });
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use netinfo_client::ConnectionDescriptor;
    use serde_json::json;
    use tokio::sync::{broadcast, oneshot};

    use super::*;
    use crate::device_info::tests::FakeDeviceInfo;
    use crate::navigation::Navigation;

    struct TestHub {
        connected_tx: broadcast::Sender<bool>,
        info_tx: broadcast::Sender<ConnectionDescriptor>,
        connected_pulls: RefCell<Vec<oneshot::Sender<bool>>>,
    }

    impl TestHub {
        fn new() -> Self {
            let (connected_tx, _) = broadcast::channel(16);
            let (info_tx, _) = broadcast::channel(16);
            Self {
                connected_tx,
                info_tx,
                connected_pulls: RefCell::new(Vec::new()),
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
            let (_tx, rx) = oneshot::channel();
            rx
        }
    }

    struct CountingNav {
        calls: usize,
    }

    impl Navigation for CountingNav {
        fn go_back(&mut self) {
            self.calls += 1;
        }
    }

    fn screen() -> DeviceInfoScreen {
        DeviceInfoScreen::new(&FakeDeviceInfo, None, HistoryPolicy::Unbounded)
    }

    #[test]
    fn test_net_info_rows_before_any_event() {
        let screen = screen();
        let rows = screen.net_info();

        assert_eq!(rows[0].title, "Connection");
        assert_eq!(rows[0].info, "Offline");
        assert_eq!(rows[1].title, "Connection Info");
        assert_eq!(rows[1].info, "null");
        assert_eq!(rows[2].title, "Connection Info History");
        assert_eq!(rows[2].info, "[]");
    }

    #[test]
    fn test_net_info_rows_reflect_events() {
        let hub = TestHub::new();
        let mut screen = screen();
        screen.mount(&hub);

        let _ = hub.connected_tx.send(true);
        let _ = hub
            .info_tx
            .send(ConnectionDescriptor::new(json!({"type": "wifi"})));
        screen.poll();

        let rows = screen.net_info();
        assert_eq!(rows[0].info, "Online");
        assert_eq!(rows[1].info, r#"{"type":"wifi"}"#);
        assert_eq!(rows[2].info, r#"[{"type":"wifi"}]"#);
    }

    #[test]
    fn test_unmounted_screen_ignores_events() {
        let hub = TestHub::new();
        let mut screen = screen();
        screen.mount(&hub);

        let _ = hub.connected_tx.send(true);
        screen.poll();
        let snapshot = screen.connectivity().clone();

        screen.unmount();
        let _ = hub.connected_tx.send(false);
        for tx in hub.connected_pulls.borrow_mut().drain(..) {
            let _ = tx.send(false);
        }
        assert!(!screen.poll());

        assert_eq!(*screen.connectivity(), snapshot);
    }

    #[test]
    fn test_back_press_calls_go_back_exactly_once() {
        let screen = screen();
        let mut nav = CountingNav { calls: 0 };

        screen.press_back(&mut nav);
        assert_eq!(nav.calls, 1);
    }

    #[test]
    fn test_fact_tables_built_once_from_provider() {
        let screen = screen();

        assert_eq!(screen.hardware[0].title, "Device Manufacturer");
        assert_eq!(screen.hardware[0].info, "Acme");
        assert_eq!(screen.hardware[2].title, "Device Model");
        assert_eq!(screen.hardware[2].info, "X1");
        assert_eq!(screen.os.len(), 3);
        assert_eq!(screen.app.len(), 4);
    }
}
