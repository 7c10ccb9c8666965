//! Lightbox state and keyboard bindings

use egui::Key;

/// Either closed or showing one position of the currently displayed list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lightbox {
    #[default]
    Closed,
    Open { position: usize },
}

impl Lightbox {
    pub fn is_open(&self) -> bool {
        matches!(self, Lightbox::Open { .. })
    }

    pub fn position(&self) -> Option<usize> {
        match self {
            Lightbox::Open { position } => Some(*position),
            Lightbox::Closed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxCommand {
    Close,
    Previous,
    Next,
    Download,
}

/// Key bindings active while the lightbox is open. `D` matches both cases
/// since egui reports physical keys.
pub fn command_for_key(key: Key) -> Option<LightboxCommand> {
    match key {
        Key::Escape => Some(LightboxCommand::Close),
        Key::ArrowLeft => Some(LightboxCommand::Previous),
        Key::ArrowRight => Some(LightboxCommand::Next),
        Key::D => Some(LightboxCommand::Download),
        _ => None,
    }
}
