//! Transient notifications. At most one toast per kind is shown at a time.

use crate::constants::{TOAST_FADE, TOAST_VISIBLE};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Download,
    Clipboard,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    started: Instant,
}

#[derive(Debug)]
pub struct Toasts {
    active: Vec<Toast>,
    visible: Duration,
    fade: Duration,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(TOAST_VISIBLE, TOAST_FADE)
    }
}

impl Toasts {
    pub fn new(visible: Duration, fade: Duration) -> Self {
        Self {
            active: Vec::new(),
            visible,
            fade,
        }
    }

    /// Show a toast, replacing any toast of the same kind
    pub fn show(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) {
        self.active.retain(|t| t.kind != kind);
        self.active.push(Toast {
            kind,
            message: message.into(),
            started: now,
        });
    }

    /// Restart the timer (pointer hovering the toast)
    pub fn hold(&mut self, kind: ToastKind, now: Instant) {
        if let Some(t) = self.active.iter_mut().find(|t| t.kind == kind) {
            t.started = now;
        }
    }

    /// Drop expired toasts
    pub fn prune(&mut self, now: Instant) {
        let total = self.visible + self.fade;
        self.active
            .retain(|t| now.saturating_duration_since(t.started) < total);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.active.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// 1.0 while fully visible, fading to 0.0 at expiry
    pub fn alpha(&self, toast: &Toast, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(toast.started);
        if elapsed <= self.visible {
            1.0
        } else if self.fade.is_zero() {
            0.0
        } else {
            let into_fade = (elapsed - self.visible).as_secs_f32();
            (1.0 - into_fade / self.fade.as_secs_f32()).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_kind_replaces_previous() {
        let now = Instant::now();
        let mut toasts = Toasts::default();
        toasts.show(ToastKind::Download, "a.jpg", now);
        toasts.show(ToastKind::Download, "b.jpg", now);
        toasts.show(ToastKind::Clipboard, "copied", now);

        let messages: Vec<_> = toasts.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["b.jpg", "copied"]);
    }

    #[test]
    fn toasts_expire_after_visible_and_fade() {
        let now = Instant::now();
        let mut toasts = Toasts::new(Duration::from_secs(3), Duration::from_millis(300));
        toasts.show(ToastKind::Download, "a.jpg", now);

        toasts.prune(now + Duration::from_millis(2900));
        assert!(!toasts.is_empty());
        let toast = toasts.iter().next().unwrap().clone();
        assert_eq!(toasts.alpha(&toast, now + Duration::from_secs(2)), 1.0);
        let mid_fade = toasts.alpha(&toast, now + Duration::from_millis(3150));
        assert!(mid_fade > 0.0 && mid_fade < 1.0);

        toasts.prune(now + Duration::from_millis(3300));
        assert!(toasts.is_empty());
    }

    #[test]
    fn hold_restarts_timer() {
        let now = Instant::now();
        let mut toasts = Toasts::new(Duration::from_secs(3), Duration::ZERO);
        toasts.show(ToastKind::Download, "a.jpg", now);
        toasts.hold(ToastKind::Download, now + Duration::from_secs(2));
        toasts.prune(now + Duration::from_secs(4));
        assert!(!toasts.is_empty());
    }
}
