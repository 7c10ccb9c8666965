//! Search input: debouncing and type-anywhere capture

use super::App;
use eframe::egui;
use std::time::Instant;

impl App {
    /// The search box text changed
    pub(crate) fn on_search_edited(&mut self) {
        self.debouncer.input(Instant::now());
    }

    /// Apply the query once typing has paused; otherwise wake up when it is due.
    pub(crate) fn poll_search(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        if self.debouncer.poll(now) {
            self.gallery.apply_search(&self.search_input);
        } else if let Some(remaining) = self.debouncer.remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }

    pub(crate) fn clear_search(&mut self) {
        self.search_input.clear();
        self.debouncer.cancel();
        self.gallery.apply_search("");
    }

    /// Global keyboard capture: type anywhere to search (when no overlay is open)
    pub(crate) fn capture_typing(&mut self, ctx: &egui::Context) {
        if self.gallery.lightbox().is_open()
            || self.show_settings
            || self.guide.is_some()
            || ctx.wants_keyboard_input()
        {
            return;
        }

        let mut typed_text = String::new();
        let mut backspace = false;
        ctx.input(|i| {
            if i.modifiers.command {
                return;
            }
            for event in &i.events {
                if let egui::Event::Text(text) = event {
                    if !text.is_empty() && text.chars().all(|c| !c.is_control()) {
                        typed_text.push_str(text);
                    }
                }
                if let egui::Event::Key {
                    key: egui::Key::Backspace,
                    pressed: true,
                    ..
                } = event
                {
                    backspace = true;
                }
            }
        });

        if !typed_text.is_empty() {
            self.search_input.push_str(&typed_text);
            self.focus_search = true;
            self.on_search_edited();
        }
        if backspace && !self.search_input.is_empty() {
            self.search_input.pop();
            self.focus_search = true;
            self.on_search_edited();
        }
    }
}
