//! Overlays: lightbox, in-app browser guide, settings, toasts

use super::App;
use crate::i18n::Locale;
use crate::lightbox::{command_for_key, LightboxCommand};
use crate::theme;
use crate::toast::ToastKind;
use crate::ui::components::{fit_size, modal_title, section_label};
use eframe::egui;
use egui_phosphor::regular as icons;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

const LIGHTBOX_BAR: f32 = 56.0;
const LIGHTBOX_SIDE: f32 = 72.0;

impl App {
    // ========================================================================
    // LIGHTBOX
    // ========================================================================

    pub(crate) fn render_lightbox(&mut self, ctx: &egui::Context) {
        let Some((index, record)) = self.gallery.current() else {
            return;
        };
        let record = record.clone();
        let position = self.gallery.lightbox().position().unwrap_or(0);
        let total = self.gallery.visible_len();

        self.ensure_full_image(ctx, index);
        self.prefetch_neighbours(ctx);

        // The search box must not swallow the lightbox keys
        ctx.memory_mut(|mem| mem.surrender_focus(egui::Id::new("search_box")));

        let commands: Vec<LightboxCommand> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } if !modifiers.command => command_for_key(*key),
                    _ => None,
                })
                .collect()
        });

        let strings = self.strings();
        let tile = crate::gallery::tile_for(position, index, &record, self.locale);
        let screen = ctx.screen_rect();
        let mut clicked: Option<LightboxCommand> = None;

        egui::Area::new(egui::Id::new("lightbox"))
            .fixed_pos(screen.min)
            .order(egui::Order::Foreground)
            .interactable(true)
            .show(ctx, |ui| {
                // Backdrop first so everything drawn later takes clicks over it
                let backdrop = ui.allocate_rect(screen, egui::Sense::click());
                ui.painter().rect_filled(screen, 0.0, egui::Color32::from_black_alpha(230));
                if backdrop.clicked() {
                    clicked = Some(LightboxCommand::Close);
                }

                let stage = egui::Rect::from_min_max(
                    screen.min + egui::vec2(LIGHTBOX_SIDE, LIGHTBOX_BAR),
                    screen.max - egui::vec2(LIGHTBOX_SIDE, LIGHTBOX_BAR),
                );
                let texture = self
                    .full_images
                    .get(&index)
                    .or_else(|| self.thumbnails.get(&index));
                match texture {
                    Some(texture) => {
                        let size = fit_size(texture.size_vec2(), stage.size());
                        let image_rect = egui::Rect::from_center_size(stage.center(), size);
                        // Clicks on the image itself keep the lightbox open
                        let _ = ui.allocate_rect(image_rect, egui::Sense::click());
                        ui.painter().image(
                            texture.id(),
                            image_rect,
                            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                            egui::Color32::WHITE,
                        );
                    }
                    None => {
                        let spinner = egui::Rect::from_center_size(stage.center(), egui::vec2(32.0, 32.0));
                        ui.put(spinner, egui::Spinner::new().size(32.0));
                    }
                }
                if self.full_loading.contains(&index) && self.thumbnails.contains_key(&index) {
                    let spinner = egui::Rect::from_center_size(
                        stage.right_bottom() - egui::vec2(16.0, 16.0),
                        egui::vec2(20.0, 20.0),
                    );
                    ui.put(spinner, egui::Spinner::new().size(20.0));
                }

                // Top bar: name and close
                ui.painter().text(
                    egui::pos2(screen.left() + theme::SPACING_XL, screen.top() + LIGHTBOX_BAR / 2.0),
                    egui::Align2::LEFT_CENTER,
                    &tile.name,
                    egui::FontId::proportional(theme::FONT_HEADING),
                    theme::TEXT_PRIMARY,
                );
                let close_rect = egui::Rect::from_center_size(
                    egui::pos2(screen.right() - LIGHTBOX_BAR / 2.0, screen.top() + LIGHTBOX_BAR / 2.0),
                    egui::vec2(36.0, 36.0),
                );
                if Self::lightbox_button(ui, close_rect, icons::X, strings.close).clicked() {
                    clicked = Some(LightboxCommand::Close);
                }

                // Side arrows, hidden at the ends of the list
                let left = egui::Rect::from_center_size(
                    egui::pos2(screen.left() + LIGHTBOX_SIDE / 2.0, stage.center().y),
                    egui::vec2(44.0, 44.0),
                );
                let right = egui::Rect::from_center_size(
                    egui::pos2(screen.right() - LIGHTBOX_SIDE / 2.0, stage.center().y),
                    egui::vec2(44.0, 44.0),
                );
                if self.gallery.has_previous()
                    && Self::lightbox_button(ui, left, icons::CARET_LEFT, strings.previous).clicked()
                {
                    clicked = Some(LightboxCommand::Previous);
                }
                if self.gallery.has_next()
                    && Self::lightbox_button(ui, right, icons::CARET_RIGHT, strings.next).clicked()
                {
                    clicked = Some(LightboxCommand::Next);
                }

                // Bottom bar: metadata, counter, download
                let bottom_y = screen.bottom() - LIGHTBOX_BAR / 2.0;
                let mut meta = vec![
                    format!("{} {}", strings.taken_at, tile.date),
                    format!("{} {}", strings.file_size, tile.size),
                ];
                if let Some(dims) = &tile.dimensions {
                    meta.push(format!("{} {}", strings.dimensions, dims));
                }
                ui.painter().text(
                    egui::pos2(screen.left() + theme::SPACING_XL, bottom_y),
                    egui::Align2::LEFT_CENTER,
                    meta.join("   "),
                    egui::FontId::proportional(theme::FONT_LABEL),
                    theme::TEXT_MUTED,
                );
                ui.painter().text(
                    egui::pos2(screen.center().x, bottom_y),
                    egui::Align2::CENTER_CENTER,
                    format!("{} / {}", position + 1, total),
                    egui::FontId::proportional(theme::FONT_LABEL),
                    theme::TEXT_SECONDARY,
                );
                let download_rect = egui::Rect::from_center_size(
                    egui::pos2(screen.right() - 90.0, bottom_y),
                    egui::vec2(150.0, 32.0),
                );
                let label = if self.is_downloading(index) {
                    format!("{}  {}", icons::HOURGLASS, strings.download)
                } else {
                    format!("{}  {}", icons::DOWNLOAD_SIMPLE, strings.download)
                };
                if ui
                    .put(download_rect, theme::button_accent(label))
                    .on_hover_text("D")
                    .clicked()
                {
                    clicked = Some(LightboxCommand::Download);
                }
            });

        for command in commands.into_iter().chain(clicked) {
            match command {
                LightboxCommand::Close => {
                    self.gallery.close();
                }
                LightboxCommand::Previous => {
                    self.gallery.previous();
                }
                LightboxCommand::Next => {
                    self.gallery.next();
                }
                LightboxCommand::Download => self.download_current(ctx),
            }
            if !self.gallery.lightbox().is_open() {
                break;
            }
        }
    }

    fn lightbox_button(ui: &mut egui::Ui, rect: egui::Rect, icon: &str, hint: &str) -> egui::Response {
        let response = ui.allocate_rect(rect, egui::Sense::click());
        let (fill, draw_rect) = theme::button_visual(&response, egui::Color32::from_rgb(0x22, 0x22, 0x26), rect);
        ui.painter().circle_filled(draw_rect.center(), draw_rect.width() / 2.0, fill);
        ui.painter().text(
            draw_rect.center(),
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(draw_rect.width() * 0.5),
            theme::TEXT_PRIMARY,
        );
        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        response.on_hover_text(hint)
    }

    // ========================================================================
    // IN-APP BROWSER GUIDE
    // ========================================================================

    pub(crate) fn render_guide(&mut self, ctx: &egui::Context) {
        let Some(browser) = self.guide else {
            return;
        };
        let strings = self.strings();
        let link = self.page_link();
        let mut close = false;
        let mut copy = false;

        let modal = egui::Modal::new(egui::Id::new("guide_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(160))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(360.0);
                close = modal_title(ui, strings.guide_title);
                ui.label(
                    egui::RichText::new(format!("{} ({})", strings.guide_intro, browser.label()))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(theme::SPACING_MD);
                for (n, step) in strings.guide_steps.iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(format!("{}", n + 1))
                                .strong()
                                .color(theme::ACCENT),
                        );
                        ui.label(egui::RichText::new(*step).color(theme::TEXT_PRIMARY));
                    });
                }
                ui.add_space(theme::SPACING_MD);
                ui.label(egui::RichText::new(&link).size(theme::FONT_SMALL).color(theme::TEXT_DIM));
                ui.add_space(theme::SPACING_MD);
                ui.horizontal(|ui| {
                    if self.env.clipboard_available
                        && ui
                            .add(theme::button_accent(format!("{}  {}", icons::COPY, strings.copy_link)))
                            .clicked()
                    {
                        copy = true;
                    }
                    if ui
                        .add(theme::button(format!("{}  {}", icons::ARROW_SQUARE_OUT, strings.open_in_browser)))
                        .clicked()
                    {
                        if let Err(e) = open::that(&link) {
                            warn!(link = %link, error = %e, "Failed to open link");
                        }
                    }
                });
            });

        if copy {
            self.copy_to_clipboard(ctx, link);
        }
        if close || modal.should_close() {
            self.guide = None;
        }
    }

    // ========================================================================
    // SETTINGS
    // ========================================================================

    pub(crate) fn render_settings(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }
        let strings = self.strings();
        let mut changed = false;
        let mut close = false;

        let modal = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(340.0);
                close = modal_title(ui, strings.settings);

                // View
                section_label(ui, strings.view_section);
                if theme::settings_checkbox(ui, self.large_thumbnails, strings.large_thumbnails, true) {
                    self.large_thumbnails = !self.large_thumbnails;
                    changed = true;
                }
                ui.add_space(theme::SPACING_MD);

                // Language
                section_label(ui, strings.language);
                egui::ComboBox::from_id_salt("locale_combo")
                    .selected_text(self.locale.label())
                    .show_ui(ui, |ui| {
                        for locale in Locale::ALL {
                            if ui
                                .selectable_value(&mut self.locale, locale, locale.label())
                                .changed()
                            {
                                changed = true;
                            }
                        }
                    });
                ui.add_space(theme::SPACING_MD);

                // Download folder
                section_label(ui, strings.download_path);
                let path_edit = ui.horizontal(|ui| {
                    let edit = ui.add(
                        egui::TextEdit::singleline(&mut self.download_path_str)
                            .desired_width(240.0)
                            .font(egui::FontId::proportional(theme::FONT_LABEL)),
                    );
                    if ui.add(theme::button(strings.browse)).clicked() {
                        if let Err(e) = std::fs::create_dir_all(&self.download_path) {
                            debug!(error = %e, "Download folder not created");
                        }
                        if let Some(path) = rfd::FileDialog::new()
                            .set_directory(&self.download_path)
                            .pick_folder()
                        {
                            self.download_path_str = path.to_string_lossy().to_string();
                            self.download_path = path;
                            changed = true;
                        }
                    }
                    edit.lost_focus()
                });
                if path_edit.inner && PathBuf::from(&self.download_path_str) != self.download_path {
                    self.download_path = PathBuf::from(&self.download_path_str);
                    changed = true;
                }
                if ui
                    .add(theme::button(format!("{}  {}", icons::FOLDER_OPEN, strings.open_folder)))
                    .clicked()
                {
                    self.open_download_folder();
                }
                ui.add_space(theme::SPACING_MD);

                // Gallery folder (mobile share target)
                section_label(ui, strings.gallery_path);
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(self.gallery_path.to_string_lossy())
                            .size(theme::FONT_LABEL)
                            .color(theme::TEXT_MUTED),
                    );
                    if ui.add(theme::button(strings.browse)).clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .set_directory(&self.gallery_path)
                            .pick_folder()
                        {
                            self.settings.gallery_path = Some(path.to_string_lossy().to_string());
                            self.gallery_path = path;
                            changed = true;
                        }
                    }
                });
            });

        if changed {
            self.save_settings();
        }
        if close || modal.should_close() {
            self.show_settings = false;
        }
    }

    // ========================================================================
    // TOASTS
    // ========================================================================

    /// Bottom-right of the central panel, 3s visible then fade, pause on hover
    pub(crate) fn render_toasts(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.toasts.prune(now);
        if self.toasts.is_empty() {
            return;
        }
        let Some(panel_rect) = self.central_panel_rect else {
            return;
        };
        let margin = theme::SPACING_LG;
        let mut offset = 0.0;
        let mut hovered: Vec<ToastKind> = Vec::new();

        for toast in self.toasts.iter() {
            let alpha = self.toasts.alpha(toast, now);
            let pos = egui::pos2(panel_rect.right() - margin, panel_rect.bottom() - margin - offset);
            let icon = match toast.kind {
                ToastKind::Download => icons::CHECK_CIRCLE,
                ToastKind::Clipboard => icons::CLIPBOARD_TEXT,
            };
            let response = egui::Area::new(egui::Id::new(("toast", toast.kind as u8)))
                .fixed_pos(pos)
                .pivot(egui::Align2::RIGHT_BOTTOM)
                .order(egui::Order::Tooltip)
                .show(ctx, |ui| {
                    egui::Frame::new()
                        .fill(egui::Color32::from_rgba_unmultiplied(0x1a, 0x1a, 0x1e, (230.0 * alpha) as u8))
                        .stroke(egui::Stroke::new(
                            1.0,
                            egui::Color32::from_rgba_unmultiplied(
                                theme::ACCENT.r(),
                                theme::ACCENT.g(),
                                theme::ACCENT.b(),
                                (100.0 * alpha) as u8,
                            ),
                        ))
                        .corner_radius(6.0)
                        .inner_margin(egui::Margin::symmetric(16, 10))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(format!("{}  {}", icon, toast.message)).color(
                                    egui::Color32::from_rgba_unmultiplied(255, 255, 255, (255.0 * alpha) as u8),
                                ),
                            );
                        });
                });
            if response.response.hovered() {
                hovered.push(toast.kind);
            }
            offset += response.response.rect.height() + theme::SPACING_SM;
        }

        for kind in hovered {
            self.toasts.hold(kind, now);
        }
        ctx.request_repaint();
    }
}
