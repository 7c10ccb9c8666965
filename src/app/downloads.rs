//! Download logic

use super::{App, TaskEvent};
use crate::download::{DispatchReport, DownloadContext, DownloadError, DownloadOutcome, GalleryFolder};
use crate::toast::ToastKind;
use eframe::egui;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Records with a download running. Indices belong to one manifest epoch;
/// results from an older epoch never clear a newer record.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    epoch: u64,
    indices: HashSet<usize>,
}

impl InFlight {
    /// False if this record is already downloading
    pub fn begin(&mut self, index: usize) -> bool {
        self.indices.insert(index)
    }

    pub fn finish(&mut self, epoch: u64, index: usize) {
        if epoch == self.epoch {
            self.indices.remove(&index);
        }
    }

    /// The record list was replaced
    pub fn reset(&mut self, epoch: u64) {
        self.epoch = epoch;
        self.indices.clear();
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }
}

impl App {
    /// Run the download dispatcher for one record in the background.
    pub(crate) fn start_download(&mut self, ctx: &egui::Context, index: usize) {
        let Some(record) = self.gallery.records().get(index).cloned() else {
            return;
        };
        if !self.downloads.begin(index) {
            debug!(name = %record.name, "Download already in progress");
            return;
        }

        let fetcher = self.fetcher.clone();
        let base = self.manifest_location.clone();
        let env = self.env.clone();
        let dispatcher = self.dispatcher.clone();
        let decoded = self.decoded.clone();
        let download_dir = self.download_path.clone();
        let gallery_dir = self.gallery_path.clone();
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        let epoch = self.epoch;

        info!(name = %record.name, "Starting download");
        self.runtime.spawn_blocking(move || {
            let share = GalleryFolder::new(gallery_dir);
            let download_ctx = DownloadContext {
                fetcher: fetcher.as_ref(),
                base: &base,
                env: env.as_ref(),
                download_dir: &download_dir,
                share: &share,
                decoded: decoded.as_ref(),
            };
            let result = dispatcher.dispatch(&record, &download_ctx);
            let _ = tx.send(TaskEvent::DownloadFinished {
                epoch,
                index,
                name: record.name,
                result,
            });
            ctx.request_repaint();
        });
    }

    /// `D` in the lightbox and the lightbox download button
    pub(crate) fn download_current(&mut self, ctx: &egui::Context) {
        if let Some((index, _)) = self.gallery.current() {
            self.start_download(ctx, index);
        }
    }

    pub(crate) fn on_download_finished(
        &mut self,
        epoch: u64,
        index: usize,
        name: &str,
        result: Result<DispatchReport, DownloadError>,
    ) {
        self.downloads.finish(epoch, index);
        let name = if name.is_empty() {
            self.strings().unknown_name
        } else {
            name
        };

        match result {
            Ok(report) => {
                debug!(name = %name, attempted = ?report.attempted, "Dispatch report");
                match report.outcome {
                    DownloadOutcome::Downloaded { path } => {
                        info!(name = %name, path = %path.display(), strategy = report.strategy, "Image downloaded");
                        let message = self.locale.downloaded(name);
                        self.toasts.show(ToastKind::Download, message, Instant::now());
                    }
                    DownloadOutcome::SavedToGallery { path } => {
                        info!(name = %name, path = %path.display(), "Image saved to gallery");
                        let message = self.locale.saved_to_gallery(name);
                        self.toasts.show(ToastKind::Download, message, Instant::now());
                    }
                    DownloadOutcome::GuideShown { browser } => {
                        info!(browser = browser.label(), "Downloads blocked, showing guide");
                        self.guide = Some(browser);
                    }
                }
            }
            // Exhausted chains are not surfaced to the user
            Err(e) => warn!(name = %name, error = %e, "Download failed"),
        }
    }

    pub(crate) fn is_downloading(&self, index: usize) -> bool {
        self.downloads.contains(index)
    }

    pub(crate) fn open_download_folder(&self) {
        if let Err(e) = std::fs::create_dir_all(&self.download_path) {
            warn!(path = %self.download_path.display(), error = %e, "Failed to create download folder");
        }
        if let Err(e) = open::that(&self.download_path) {
            error!(path = %self.download_path.display(), error = %e, "Failed to open download folder");
        }
    }

    /// Absolute link to a record's full image
    pub(crate) fn image_link(&self, index: usize) -> Option<String> {
        let record = self.gallery.records().get(index)?;
        self.manifest_location
            .resolve(&record.path)
            .ok()
            .map(|location| location.to_string())
    }

    pub(crate) fn copy_to_clipboard(&mut self, ctx: &egui::Context, text: String) {
        if !self.env.clipboard_available {
            return;
        }
        ctx.copy_text(text);
        let message = self.strings().link_copied;
        self.toasts.show(ToastKind::Clipboard, message, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_rejects_duplicates() {
        let mut downloads = InFlight::default();
        assert!(downloads.begin(3));
        assert!(!downloads.begin(3));
        downloads.finish(0, 3);
        assert!(!downloads.contains(3));
        assert!(downloads.begin(3));
    }

    #[test]
    fn stale_result_does_not_clear_new_record() {
        let mut downloads = InFlight::default();
        assert!(downloads.begin(2));

        // Manifest reloaded while the download ran
        downloads.reset(1);
        assert!(!downloads.contains(2));

        // The new record at index 2 starts its own download
        assert!(downloads.begin(2));
        downloads.finish(0, 2);
        assert!(downloads.contains(2));

        downloads.finish(1, 2);
        assert!(!downloads.contains(2));
    }
}
