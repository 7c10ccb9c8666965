#![windows_subsystem = "windows"]
//! Image Gallery - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod constants;
mod download;
mod fetch;
mod gallery;
mod i18n;
mod image_loader;
mod lazy;
mod lightbox;
mod manifest;
mod search;
mod settings;
mod theme;
mod toast;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use fetch::Location;
use settings::Settings;
use tracing::{error, info};
use utils::{get_data_dir, rasterize_svg, ICON_SVG};

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "image-gallery.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,image_gallery=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

/// First CLI argument, then the environment, then settings, then the default file.
fn manifest_source(cli: Option<String>, env: Option<String>, settings: &Settings) -> String {
    cli.into_iter()
        .chain(env)
        .chain(settings.manifest.clone())
        .find(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MANIFEST.to_string())
}

fn main() -> eframe::Result<()> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Image Gallery starting");

    let settings = Settings::load(&data_dir);
    let source = manifest_source(
        std::env::args().nth(1),
        std::env::var(MANIFEST_ENV).ok(),
        &settings,
    );
    let manifest_location = Location::parse(&source).unwrap_or_else(|e| {
        error!(source = %source, error = %e, "Invalid manifest location, using default");
        Location::File(DEFAULT_MANIFEST.into())
    });
    info!(location = %manifest_location, "Manifest location resolved");

    // Load saved window position/size
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(1280.0, 820.0)))
        .with_min_inner_size([640.0, 480.0])
        .with_title(APP_NAME);

    // Window/taskbar icon
    if let Some(icon_img) = rasterize_svg(ICON_SVG, 128) {
        let (w, h) = (icon_img.width(), icon_img.height());
        let icon = egui::IconData {
            rgba: icon_img.into_raw(),
            width: w,
            height: h,
        };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, manifest_location, data_dir)?;
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // Results from background tasks
        self.process_events(ctx);

        self.capture_typing(ctx);
        self.poll_search(ctx);

        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .inner_margin(egui::Margin::symmetric(16, 4)),
            )
            .show(ctx, |ui| {
                self.render_header(ui, ctx);
            });

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(12)),
            )
            .show(ctx, |ui| {
                // Store panel rect for toast positioning
                self.central_panel_rect = Some(ui.max_rect());
                self.render_content(ui, ctx);
            });

        self.render_lightbox(ctx);
        self.render_guide(ctx);
        self.render_settings(ctx);
        self.render_toasts(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.save_settings();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_source_precedence() {
        let mut settings = Settings::default();
        assert_eq!(manifest_source(None, None, &settings), "images_data.json");

        settings.manifest = Some("https://example.com/a.json".into());
        assert_eq!(manifest_source(None, None, &settings), "https://example.com/a.json");
        assert_eq!(
            manifest_source(None, Some("env.json".into()), &settings),
            "env.json"
        );
        assert_eq!(
            manifest_source(Some("cli.json".into()), Some("env.json".into()), &settings),
            "cli.json"
        );
        // Blank values are skipped
        assert_eq!(manifest_source(Some(" ".into()), None, &settings), "https://example.com/a.json");
    }
}
