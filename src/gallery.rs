//! Gallery state: the loaded records, the filtered view, and the lightbox.
//!
//! Records are fixed for the lifetime of the state. Searching only rebuilds
//! `visible`, a list of indices into `records` in original order. The lightbox
//! position always refers to `visible`, never to `records`.

use crate::i18n::Locale;
use crate::lightbox::Lightbox;
use crate::types::{ImageRecord, ViewMode};
use tracing::debug;

/// Case-insensitive substring filter. Returns indices into `records` in order.
pub fn filter_indices(records: &[ImageRecord], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..records.len()).collect();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.name.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// Display model for one tile
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Position in the displayed list (what the lightbox opens at)
    pub position: usize,
    /// Index into the full record list (stable across searches)
    pub record_index: usize,
    pub name: String,
    pub preview: String,
    pub date: String,
    pub size: String,
    pub dimensions: Option<String>,
}

#[derive(Debug, Default)]
pub struct GalleryState {
    records: Vec<ImageRecord>,
    visible: Vec<usize>,
    lightbox: Lightbox,
    scroll_locked: bool,
    scroll_lock_before_open: bool,
    view_mode: ViewMode,
}

impl GalleryState {
    pub fn new(records: Vec<ImageRecord>) -> Self {
        let visible = (0..records.len()).collect();
        Self {
            records,
            visible,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Layout only; records and order are untouched.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Recompute the displayed list. An open lightbox follows its record into the
    /// new list, or closes when the record is filtered out.
    pub fn apply_search(&mut self, query: &str) {
        let current = self.current().map(|(index, _)| index);
        self.visible = filter_indices(&self.records, query);
        debug!(query = %query, shown = self.visible.len(), total = self.records.len(), "Search applied");

        if let Some(index) = current {
            match self.visible.iter().position(|&i| i == index) {
                Some(position) => self.lightbox = Lightbox::Open { position },
                None => {
                    self.close();
                }
            }
        }
    }

    pub fn lightbox(&self) -> Lightbox {
        self.lightbox
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Open the lightbox at a displayed position. Out-of-range positions are rejected.
    pub fn open(&mut self, position: usize) -> bool {
        if position >= self.visible.len() {
            return false;
        }
        if !self.lightbox.is_open() {
            self.scroll_lock_before_open = self.scroll_locked;
        }
        self.lightbox = Lightbox::Open { position };
        self.scroll_locked = true;
        true
    }

    pub fn close(&mut self) -> bool {
        if !self.lightbox.is_open() {
            return false;
        }
        self.lightbox = Lightbox::Closed;
        self.scroll_locked = self.scroll_lock_before_open;
        true
    }

    /// No wraparound: a no-op on the last position.
    pub fn next(&mut self) -> bool {
        match self.lightbox {
            Lightbox::Open { position } if position + 1 < self.visible.len() => {
                self.lightbox = Lightbox::Open {
                    position: position + 1,
                };
                true
            }
            _ => false,
        }
    }

    /// No wraparound: a no-op on position 0.
    pub fn previous(&mut self) -> bool {
        match self.lightbox {
            Lightbox::Open { position } if position > 0 => {
                self.lightbox = Lightbox::Open {
                    position: position - 1,
                };
                true
            }
            _ => false,
        }
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.lightbox, Lightbox::Open { position } if position > 0)
    }

    pub fn has_next(&self) -> bool {
        matches!(self.lightbox, Lightbox::Open { position } if position + 1 < self.visible.len())
    }

    /// Record index and record shown in the lightbox
    pub fn current(&self) -> Option<(usize, &ImageRecord)> {
        let position = self.lightbox.position()?;
        let index = *self.visible.get(position)?;
        self.records.get(index).map(|r| (index, r))
    }

    /// Tiles for the displayed list, in display order
    pub fn tiles(&self, locale: Locale) -> Vec<Tile> {
        self.visible
            .iter()
            .enumerate()
            .filter_map(|(position, &index)| {
                self.records
                    .get(index)
                    .map(|record| tile_for(position, index, record, locale))
            })
            .collect()
    }
}

pub fn tile_for(position: usize, record_index: usize, record: &ImageRecord, locale: Locale) -> Tile {
    let strings = locale.strings();
    Tile {
        position,
        record_index,
        name: if record.name.is_empty() {
            strings.unknown_name.to_string()
        } else {
            record.name.clone()
        },
        preview: record.preview_source().into_owned(),
        date: locale.format_date(record.date),
        size: record
            .size
            .clone()
            .unwrap_or_else(|| strings.unknown_size.to_string()),
        dimensions: record.dimensions().map(|(w, h)| format!("{}×{}", w, h)),
    }
}
