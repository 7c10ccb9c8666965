//! Manifest loading

use super::{App, LoadState, TaskEvent};
use crate::gallery::GalleryState;
use crate::manifest::{load_manifest, LoadedManifest, ManifestOrigin};
use eframe::egui;
use tracing::{debug, info};

impl App {
    pub fn start_manifest_load(&mut self, ctx: &egui::Context) {
        let fetcher = self.fetcher.clone();
        let location = self.manifest_location.clone();
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();

        info!(location = %location, "Loading manifest");
        self.load_state = LoadState::Loading;
        self.manifest_task = Some(self.runtime.spawn_blocking(move || {
            let loaded = load_manifest(fetcher.as_ref(), &location);
            if tx.send(TaskEvent::ManifestLoaded(loaded)).is_err() {
                debug!("UI gone before manifest arrived");
            }
            ctx.request_repaint();
        }));
    }

    /// Replace the gallery; view mode and the current search carry over.
    pub(crate) fn on_manifest_loaded(&mut self, loaded: LoadedManifest) {
        let mut gallery = GalleryState::new(loaded.records);
        gallery.set_view_mode(self.gallery.view_mode());
        if !self.search_input.is_empty() {
            gallery.apply_search(&self.search_input);
        }
        self.gallery = gallery;
        self.manifest_origin = loaded.origin;
        self.manifest_updated = loaded.last_updated;
        self.manifest_total_size = loaded.total_size;
        self.load_state = LoadState::Ready;

        // Record indices changed meaning
        self.epoch += 1;
        self.thumbnails.clear();
        self.lazy = Default::default();
        self.full_images.clear();
        self.full_loading.clear();
        self.decoded.clear();
        self.downloads.reset(self.epoch);

        if self.manifest_origin == ManifestOrigin::Fallback {
            debug!("Showing fallback record");
        }
    }

    /// Re-fetch the manifest (reload button)
    pub fn reload(&mut self, ctx: &egui::Context) {
        self.gallery.close();
        self.start_manifest_load(ctx);
    }
}
