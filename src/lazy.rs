//! Lazy thumbnail loading driven by a visibility notifier

use std::collections::HashSet;
use std::hash::Hash;

/// Answers whether a tile is close enough to the viewport to start loading.
pub trait VisibilityNotifier {
    fn is_visible(&self, bounds: egui::Rect) -> bool;
}

/// Viewport test with a fixed look-ahead margin
pub struct ViewportNotifier {
    area: egui::Rect,
}

impl ViewportNotifier {
    pub fn new(viewport: egui::Rect, margin: f32) -> Self {
        Self {
            area: viewport.expand(margin),
        }
    }
}

impl VisibilityNotifier for ViewportNotifier {
    fn is_visible(&self, bounds: egui::Rect) -> bool {
        self.area.intersects(bounds)
    }
}

/// Tracks which tiles have already requested their thumbnail. A tile stops being
/// observed as soon as it requests once.
#[derive(Debug)]
pub struct LazyLoader<K> {
    requested: HashSet<K>,
}

impl<K> Default for LazyLoader<K> {
    fn default() -> Self {
        Self {
            requested: HashSet::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> LazyLoader<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time the tile is visible; the caller starts the load.
    pub fn observe(&mut self, key: &K, bounds: egui::Rect, notifier: &dyn VisibilityNotifier) -> bool {
        if self.requested.contains(key) {
            return false;
        }
        if notifier.is_visible(bounds) {
            self.requested.insert(key.clone());
            return true;
        }
        false
    }

    #[cfg(test)]
    fn is_requested(&self, key: &K) -> bool {
        self.requested.contains(key)
    }

    #[cfg(test)]
    fn requested_count(&self) -> usize {
        self.requested.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2, Rect};
    use std::cell::Cell;

    fn tile_at(y: f32) -> Rect {
        Rect::from_min_size(pos2(0.0, y), vec2(100.0, 80.0))
    }

    #[test]
    fn margin_extends_viewport() {
        let n = ViewportNotifier::new(Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 600.0)), 50.0);
        assert!(n.is_visible(tile_at(100.0)));
        assert!(n.is_visible(tile_at(640.0)));
        assert!(!n.is_visible(tile_at(660.0)));
        assert!(!n.is_visible(tile_at(-140.0)));
    }

    struct CountingNotifier {
        visible: bool,
        calls: Cell<usize>,
    }

    impl VisibilityNotifier for CountingNotifier {
        fn is_visible(&self, _bounds: Rect) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.visible
        }
    }

    #[test]
    fn each_tile_loads_once() {
        let mut lazy = LazyLoader::new();
        let n = CountingNotifier {
            visible: true,
            calls: Cell::new(0),
        };
        assert!(lazy.observe(&7usize, tile_at(0.0), &n));
        assert!(!lazy.observe(&7usize, tile_at(0.0), &n));
        assert!(!lazy.observe(&7usize, tile_at(0.0), &n));
        assert!(lazy.is_requested(&7));
        // Unsubscribed after the first load
        assert_eq!(n.calls.get(), 1);
    }

    #[test]
    fn offscreen_tiles_wait() {
        let mut lazy = LazyLoader::new();
        let hidden = CountingNotifier {
            visible: false,
            calls: Cell::new(0),
        };
        assert!(!lazy.observe(&1usize, tile_at(5000.0), &hidden));
        assert!(!lazy.is_requested(&1));

        let shown = CountingNotifier {
            visible: true,
            calls: Cell::new(0),
        };
        assert!(lazy.observe(&1usize, tile_at(0.0), &shown));
        assert_eq!(lazy.requested_count(), 1);
    }
}
