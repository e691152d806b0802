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

//! Launch screen listing the available diagnostics screens.

use crate::navigation::Screen;
use crate::widgets::FullButton;

/// Entry screen with buttons into the diagnostics screens.
#[derive(Debug, Default)]
pub struct LaunchScreen;

impl LaunchScreen {
    /// Render the screen. Returns the screen to navigate to, if any.
    pub fn render(&mut self, ctx: &egui::Context) -> Option<Screen> {
        let mut next = None;

        egui::CentralPanel::default()
            .frame(
                egui::Frame::default()
                    .fill(egui::Color32::from_rgb(25, 30, 35))
                    .inner_margin(egui::Margin::same(12)),
            )
            .show(ctx, |ui| {
                ui.add_space(40.0);

                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("DevInfo Desktop")
                            .size(22.0)
                            .color(egui::Color32::from_rgb(220, 230, 240))
                            .strong(),
                    );
                    ui.add_space(4.0);
                    ui.label(
                        egui::RichText::new("Developer diagnostics")
                            .size(11.0)
                            .color(egui::Color32::from_rgb(150, 150, 150)),
                    );
                });

                ui.add_space(24.0);

                let mut pressed = false;
                FullButton::new("Device Info", &mut || pressed = true).show(ui);
                if pressed {
                    next = Some(Screen::DeviceInfo);
                }
            });

        next
    }
}
