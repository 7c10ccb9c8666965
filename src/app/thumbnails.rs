//! Thumbnail and lightbox image loading

use super::{App, TaskEvent};
use crate::constants::{FULL_TEXTURE_RADIUS, THUMBNAIL_MAX_EDGE};
use crate::image_loader::{load_full, load_preview, PreviewSource};
use crate::utils::placeholder_image;
use eframe::egui;
use image::RgbaImage;
use std::sync::Arc;
use tracing::{debug, warn};

fn to_color_image(image: &RgbaImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

impl App {
    /// Spawn the preview chain for one record. Called once per tile by the lazy loader.
    pub(crate) fn request_thumbnail(&mut self, ctx: &egui::Context, index: usize) {
        let Some(record) = self.gallery.records().get(index).cloned() else {
            return;
        };
        let fetcher = self.fetcher.clone();
        let base = self.manifest_location.clone();
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        let epoch = self.epoch;

        self.runtime.spawn_blocking(move || {
            let loaded = load_preview(fetcher.as_ref(), &base, &record, THUMBNAIL_MAX_EDGE);
            let _ = tx.send(TaskEvent::Thumbnail {
                epoch,
                index,
                image: loaded.image,
                source: loaded.source,
            });
            ctx.request_repaint();
        });
    }

    pub(crate) fn on_thumbnail(&mut self, ctx: &egui::Context, index: usize, image: RgbaImage, source: PreviewSource) {
        debug!(index, ?source, "Thumbnail ready");
        let texture = ctx.load_texture(
            format!("thumb_{}_{}", self.epoch, index),
            to_color_image(&image),
            egui::TextureOptions::LINEAR,
        );
        self.thumbnails.insert(index, texture);
    }

    /// Start loading the full image for the lightbox if it isn't loaded or in flight
    pub(crate) fn ensure_full_image(&mut self, ctx: &egui::Context, index: usize) {
        if self.full_images.contains_key(&index) || self.full_loading.contains(&index) {
            return;
        }
        let Some(record) = self.gallery.records().get(index).cloned() else {
            return;
        };
        self.full_loading.insert(index);

        let fetcher = self.fetcher.clone();
        let base = self.manifest_location.clone();
        let decoded = self.decoded.clone();
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        let epoch = self.epoch;

        self.runtime.spawn_blocking(move || {
            let image = match load_full(fetcher.as_ref(), &base, &record) {
                Ok(img) => {
                    let img = Arc::new(img);
                    // Reused by the re-encode download
                    decoded.insert(&record.path, img.clone());
                    Some(img)
                }
                Err(e) => {
                    warn!(name = %record.name, error = %e, "Full image unavailable");
                    None
                }
            };
            let _ = tx.send(TaskEvent::FullImage { epoch, index, image });
            ctx.request_repaint();
        });
    }

    pub(crate) fn on_full_image(&mut self, ctx: &egui::Context, index: usize, image: Option<Arc<RgbaImage>>) {
        self.full_loading.remove(&index);
        let color = match &image {
            Some(img) => to_color_image(img),
            None => to_color_image(&placeholder_image()),
        };
        let texture = ctx.load_texture(
            format!("full_{}_{}", self.epoch, index),
            color,
            egui::TextureOptions::LINEAR,
        );
        self.full_images.insert(index, texture);
    }

    /// Warm the neighbours so arrow-key navigation feels instant,
    /// and drop lightbox textures that fell out of that window.
    pub(crate) fn prefetch_neighbours(&mut self, ctx: &egui::Context) {
        let Some(position) = self.gallery.lightbox().position() else {
            return;
        };
        let window = texture_window(self.gallery.visible_indices(), position, FULL_TEXTURE_RADIUS);
        let before = self.full_images.len();
        self.full_images.retain(|index, _| window.contains(index));
        if self.full_images.len() != before {
            debug!(kept = self.full_images.len(), dropped = before - self.full_images.len(), "Pruned lightbox textures");
        }
        for index in window {
            self.ensure_full_image(ctx, index);
        }
    }
}

/// Record indices within `radius` positions of `position` in the visible list
fn texture_window(visible: &[usize], position: usize, radius: usize) -> Vec<usize> {
    let start = position.saturating_sub(radius);
    let end = position.saturating_add(radius).saturating_add(1).min(visible.len());
    visible.get(start..end).map(<[usize]>::to_vec).unwrap_or_default()
}
