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

//! Shared widgets.

/// Full-width button wired to a press handler.
///
/// The handler is invoked through the reference supplied at construction,
/// exactly once per press. [`FullButton::press`] is the press path; the
/// egui rendering in [`FullButton::show`] routes clicks through it.
pub struct FullButton<'a> {
    text: &'a str,
    on_press: &'a mut dyn FnMut(),
}

impl std::fmt::Debug for FullButton<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FullButton")
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl<'a> FullButton<'a> {
    #[must_use]
    pub fn new(text: &'a str, on_press: &'a mut dyn FnMut()) -> Self {
        Self { text, on_press }
    }

    /// The label rendered on the button.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text
    }

    /// Invoke the press handler once.
    pub fn press(&mut self) {
        (self.on_press)();
    }

    /// Render the button across the available width.
    pub fn show(mut self, ui: &mut egui::Ui) -> egui::Response {
        let response = ui.add_sized(
            egui::vec2(ui.available_width(), 36.0),
            egui::Button::new(
                egui::RichText::new(self.text)
                    .size(13.0)
                    .color(egui::Color32::from_rgb(220, 230, 240))
                    .strong(),
            ),
        );

        if response.clicked() {
            self.press();
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_given_label() {
        let mut on_press = || {};
        let button = FullButton::new("hi", &mut on_press);
        assert_eq!(button.text(), "hi");
    }

    #[test]
    fn test_press_invokes_handler_exactly_once() {
        let mut count = 0;
        let mut on_press = || count += 1;

        let mut button = FullButton::new("hi", &mut on_press);
        button.press();
        drop(button);

        assert_eq!(count, 1);
    }

    #[test]
    fn test_handler_not_invoked_without_press() {
        let mut count = 0;
        let mut on_press = || count += 1;

        let button = FullButton::new("hi", &mut on_press);
        drop(button);

        assert_eq!(count, 0);
    }

    #[test]
    fn test_each_press_invokes_once_more() {
        let mut count = 0;
        let mut on_press = || count += 1;

        let mut button = FullButton::new("hi", &mut on_press);
        button.press();
        button.press();
        drop(button);

        assert_eq!(count, 2);
    }
}
