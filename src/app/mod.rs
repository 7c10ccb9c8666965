//! App module - contains the main application state and logic

mod context_menu;
mod downloads;
mod filters;
mod loader;
mod modals;
mod thumbnails;
mod views;

use crate::download::{default_user_agent, DispatchReport, Dispatcher, DownloadError, Environment, InAppBrowser};
use crate::fetch::{FetchError, HttpFetcher, Location};
use crate::gallery::GalleryState;
use crate::i18n::Locale;
use crate::image_loader::{DecodedImages, PreviewSource};
use crate::lazy::LazyLoader;
use crate::manifest::{LoadedManifest, ManifestOrigin};
use crate::search::Debouncer;
use crate::settings::Settings;
use crate::theme;
use crate::toast::Toasts;
use downloads::InFlight;
use eframe::egui;
use image::RgbaImage;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] FetchError),
}

/// Manifest loading progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// The loader task ended without delivering a manifest
    Failed,
}

/// Results sent back from background tasks to the UI thread
pub(crate) enum TaskEvent {
    ManifestLoaded(LoadedManifest),
    Thumbnail {
        epoch: u64,
        index: usize,
        image: RgbaImage,
        source: PreviewSource,
    },
    FullImage {
        epoch: u64,
        index: usize,
        image: Option<Arc<RgbaImage>>,
    },
    DownloadFinished {
        epoch: u64,
        index: usize,
        name: String,
        result: Result<DispatchReport, DownloadError>,
    },
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) gallery: GalleryState,
    pub(crate) load_state: LoadState,
    pub(crate) manifest_location: Location,
    pub(crate) manifest_origin: ManifestOrigin,
    pub(crate) manifest_updated: Option<String>,
    pub(crate) manifest_total_size: Option<u64>,
    pub(crate) manifest_task: Option<tokio::task::JoinHandle<()>>,
    // Background work
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) events_tx: UnboundedSender<TaskEvent>,
    pub(crate) events_rx: UnboundedReceiver<TaskEvent>,
    pub(crate) fetcher: Arc<HttpFetcher>,
    pub(crate) env: Arc<Environment>,
    pub(crate) dispatcher: Arc<Dispatcher>,
    pub(crate) decoded: Arc<DecodedImages>,
    /// Bumped whenever the record list is replaced; stale image results are dropped
    pub(crate) epoch: u64,
    // Thumbnails (keyed by record index)
    pub(crate) thumbnails: HashMap<usize, egui::TextureHandle>,
    pub(crate) lazy: LazyLoader<usize>,
    // Lightbox images
    pub(crate) full_images: HashMap<usize, egui::TextureHandle>,
    pub(crate) full_loading: HashSet<usize>,
    // Search
    pub(crate) search_input: String,
    pub(crate) focus_search: bool,
    pub(crate) debouncer: Debouncer,
    // Downloads
    pub(crate) downloads: InFlight,
    pub(crate) download_path: PathBuf,
    pub(crate) download_path_str: String,
    pub(crate) gallery_path: PathBuf,
    // Overlays
    pub(crate) toasts: Toasts,
    pub(crate) guide: Option<InAppBrowser>,
    pub(crate) show_settings: bool,
    pub(crate) central_panel_rect: Option<egui::Rect>,
    // Settings
    pub(crate) settings: Settings,
    pub(crate) locale: Locale,
    pub(crate) large_thumbnails: bool,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        manifest_location: Location,
        data_dir: PathBuf,
    ) -> Result<Self, StartupError> {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);
        cc.egui_ctx.set_fonts(Self::build_fonts(&settings));
        theme::apply_visuals(&cc.egui_ctx);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        let env = Environment::detect(settings.user_agent.as_deref(), settings.share_available);
        info!(
            user_agent = %env.user_agent,
            mobile = env.is_mobile(),
            share = env.share_available,
            "Environment detected"
        );
        let fetcher = HttpFetcher::new(&env.user_agent).or_else(|e| {
            warn!(error = %e, "Custom user agent rejected, using default");
            HttpFetcher::new(&default_user_agent())
        })?;

        let dispatcher = Dispatcher::standard();
        debug!(strategies = ?dispatcher.strategy_names(), "Download dispatcher ready");

        let (events_tx, events_rx) = unbounded_channel();
        let download_path = settings.download_path_or_default();
        let mut gallery = GalleryState::default();
        gallery.set_view_mode(settings.view_mode);

        let mut app = Self {
            gallery,
            load_state: LoadState::Loading,
            manifest_location,
            manifest_origin: ManifestOrigin::Manifest,
            manifest_updated: None,
            manifest_total_size: None,
            manifest_task: None,
            runtime,
            events_tx,
            events_rx,
            fetcher: Arc::new(fetcher),
            env: Arc::new(env),
            dispatcher: Arc::new(dispatcher),
            decoded: Arc::new(DecodedImages::default()),
            epoch: 0,
            thumbnails: HashMap::new(),
            lazy: LazyLoader::new(),
            full_images: HashMap::new(),
            full_loading: HashSet::new(),
            search_input: String::new(),
            focus_search: false,
            debouncer: Debouncer::new(settings.debounce()),
            downloads: InFlight::default(),
            download_path_str: download_path.to_string_lossy().to_string(),
            download_path,
            gallery_path: settings.gallery_path_or_default(),
            toasts: Toasts::default(),
            guide: None,
            show_settings: false,
            central_panel_rect: None,
            locale: settings.locale,
            large_thumbnails: settings.large_thumbnails,
            settings,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        };

        app.start_manifest_load(&cc.egui_ctx);
        Ok(app)
    }

    fn build_fonts(settings: &Settings) -> egui::FontDefinitions {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

        // Optional font with CJK coverage, appended as a fallback
        if let Some(path) = settings.font_path.as_deref() {
            match std::fs::read(path) {
                Ok(bytes) => {
                    fonts
                        .font_data
                        .insert("extra".to_owned(), Arc::new(egui::FontData::from_owned(bytes)));
                    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                        fonts.families.entry(family).or_default().push("extra".to_owned());
                    }
                }
                Err(e) => warn!(path = %path, error = %e, "Failed to read extra font"),
            }
        }
        fonts
    }

    pub fn save_settings(&mut self) {
        self.settings.window_x = self.window_pos.map(|p| p.x);
        self.settings.window_y = self.window_pos.map(|p| p.y);
        self.settings.window_w = self.window_size.map(|s| s.x);
        self.settings.window_h = self.window_size.map(|s| s.y);
        self.settings.view_mode = self.gallery.view_mode();
        self.settings.large_thumbnails = self.large_thumbnails;
        self.settings.locale = self.locale;
        self.settings.download_path = Some(self.download_path_str.clone());
        self.settings.save(&self.data_dir);
    }

    /// Apply everything the background tasks have delivered since the last frame
    pub fn process_events(&mut self, ctx: &egui::Context) {
        // Checked before draining so a finished task's last event is never missed
        let loader_finished = self.manifest_task.as_ref().is_some_and(|h| h.is_finished());

        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                TaskEvent::ManifestLoaded(loaded) => self.on_manifest_loaded(loaded),
                TaskEvent::Thumbnail { epoch, index, image, source } => {
                    if epoch == self.epoch {
                        self.on_thumbnail(ctx, index, image, source);
                    }
                }
                TaskEvent::FullImage { epoch, index, image } => {
                    if epoch == self.epoch {
                        self.on_full_image(ctx, index, image);
                    }
                }
                TaskEvent::DownloadFinished { epoch, index, name, result } => {
                    self.on_download_finished(epoch, index, &name, result)
                }
            }
        }

        if loader_finished {
            self.manifest_task = None;
            if self.load_state == LoadState::Loading {
                warn!("Manifest loader ended without a result");
                self.load_state = LoadState::Failed;
            }
        }
    }

    pub(crate) fn strings(&self) -> &'static crate::i18n::Strings {
        self.locale.strings()
    }

    /// The manifest location as a link the user can copy or open
    pub(crate) fn page_link(&self) -> String {
        match &self.manifest_location {
            Location::Url(url) => url.to_string(),
            Location::File(path) => std::fs::canonicalize(path)
                .unwrap_or_else(|_| path.clone())
                .to_string_lossy()
                .to_string(),
        }
    }
}
