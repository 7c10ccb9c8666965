//! View rendering (header, grid, list, empty states)

use super::context_menu::TileAction;
use super::{App, LoadState};
use crate::constants::{APP_NAME, LAZY_LOAD_MARGIN};
use crate::gallery::{GalleryState, Tile};
use crate::lazy::ViewportNotifier;
use crate::manifest::ManifestOrigin;
use crate::theme;
use crate::types::ViewMode;
use crate::ui::components::{cover_uv, empty_state, overlay_button};
use crate::utils::format_file_size;
use eframe::egui;
use egui_phosphor::regular as icons;

const GRID_CARD_SMALL: f32 = 220.0;
const GRID_CARD_LARGE: f32 = 320.0;
const GRID_INFO_HEIGHT: f32 = 64.0;
const LIST_ROW_HEIGHT: f32 = 64.0;
const DOWNLOAD_BUTTON: f32 = 30.0;

/// What the central panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContentState {
    Loading,
    Failed,
    /// The manifest has no images
    Empty,
    /// Images exist but the search hides all of them
    NoMatches,
    Tiles,
}

pub(crate) fn content_state(load: LoadState, gallery: &GalleryState) -> ContentState {
    match load {
        LoadState::Loading => ContentState::Loading,
        LoadState::Failed => ContentState::Failed,
        LoadState::Ready if gallery.records().is_empty() => ContentState::Empty,
        LoadState::Ready if gallery.visible_len() == 0 => ContentState::NoMatches,
        LoadState::Ready => ContentState::Tiles,
    }
}

/// Clicks collected while drawing tiles, applied after the scroll area closes
#[derive(Default)]
struct TileClicks {
    open: Option<(usize, usize)>,
    download: Option<usize>,
    menu: Option<(TileAction, usize, usize)>,
    thumbnails: Vec<usize>,
}

impl App {
    // ========================================================================
    // HEADER
    // ========================================================================

    pub(crate) fn render_header(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let strings = self.strings();
        ui.add_space(theme::SPACING_MD);
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("{}  {}", icons::IMAGES, APP_NAME))
                    .size(theme::FONT_TITLE)
                    .color(theme::TEXT_PRIMARY),
            );
            ui.add_space(theme::SPACING_LG);

            let search = egui::TextEdit::singleline(&mut self.search_input)
                .id(egui::Id::new("search_box"))
                .hint_text(format!("{} {}", icons::MAGNIFYING_GLASS, strings.search_hint))
                .desired_width(280.0);
            let response = ui.add(search);
            if self.focus_search {
                self.focus_search = false;
                response.request_focus();
                // Keep the caret at the end after type-anywhere capture
                if let Some(mut state) = egui::TextEdit::load_state(ctx, response.id) {
                    let end = egui::text::CCursor::new(self.search_input.chars().count());
                    state
                        .cursor
                        .set_char_range(Some(egui::text::CCursorRange::one(end)));
                    state.store(ctx, response.id);
                }
            }
            if response.changed() {
                self.on_search_edited();
            }
            if !self.search_input.is_empty()
                && ui
                    .add(theme::button(icons::X))
                    .on_hover_text(strings.clear_search)
                    .clicked()
            {
                self.clear_search();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(theme::button(icons::GEAR))
                    .on_hover_text(strings.settings)
                    .clicked()
                {
                    self.show_settings = true;
                }
                if ui
                    .add(theme::button(icons::FOLDER_OPEN))
                    .on_hover_text(strings.open_download_folder)
                    .clicked()
                {
                    self.open_download_folder();
                }
                let (icon, hint) = match self.gallery.view_mode() {
                    ViewMode::Grid => (icons::LIST, strings.list_view),
                    ViewMode::List => (icons::SQUARES_FOUR, strings.grid_view),
                };
                if ui.add(theme::button(icon)).on_hover_text(hint).clicked() {
                    let mode = self.gallery.view_mode().toggled();
                    self.gallery.set_view_mode(mode);
                    self.save_settings();
                }
            });
        });

        ui.horizontal(|ui| {
            let mut status = vec![self
                .locale
                .showing(self.gallery.visible_len(), self.gallery.records().len())];
            if let Some(updated) = &self.manifest_updated {
                status.push(format!("{} {}", strings.updated, updated));
            }
            if let Some(total) = self.manifest_total_size {
                status.push(format!("{} {}", strings.total_size, format_file_size(total)));
            }
            ui.label(
                egui::RichText::new(status.join("  •  "))
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_DIM),
            );
            if self.manifest_origin == ManifestOrigin::Fallback && self.load_state == LoadState::Ready {
                ui.label(
                    egui::RichText::new(format!("{} {}", icons::WARNING, strings.fallback_notice))
                        .size(theme::FONT_SMALL)
                        .color(theme::STATUS_WARNING),
                );
            }
        });
        ui.add_space(theme::SPACING_SM);
    }

    // ========================================================================
    // CONTENT
    // ========================================================================

    pub(crate) fn render_content(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let strings = self.strings();
        match content_state(self.load_state, &self.gallery) {
            ContentState::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.35);
                    ui.spinner();
                    ui.add_space(theme::SPACING_MD);
                    ui.label(egui::RichText::new(strings.loading).color(theme::TEXT_MUTED));
                });
            }
            ContentState::Failed => {
                empty_state(ui, icons::WARNING_CIRCLE, strings.load_failed_title, Some(strings.load_failed_body));
                ui.vertical_centered(|ui| {
                    if ui
                        .add(theme::button_accent(format!("{}  {}", icons::ARROW_CLOCKWISE, strings.reload)))
                        .clicked()
                    {
                        self.reload(ctx);
                    }
                });
            }
            ContentState::Empty => {
                empty_state(ui, icons::IMAGE, strings.no_images_title, Some(strings.no_images_body));
            }
            ContentState::NoMatches => {
                empty_state(ui, icons::MAGNIFYING_GLASS, strings.no_matches, None);
                ui.vertical_centered(|ui| {
                    if ui.add(theme::button(strings.clear_search)).clicked() {
                        self.clear_search();
                    }
                });
            }
            ContentState::Tiles => {
                let tiles = self.gallery.tiles(self.locale);
                let clicks = match self.gallery.view_mode() {
                    ViewMode::Grid => self.render_grid_view(ui, &tiles),
                    ViewMode::List => self.render_list_view(ui, &tiles),
                };
                self.apply_clicks(ctx, clicks);
            }
        }
    }

    fn apply_clicks(&mut self, ctx: &egui::Context, clicks: TileClicks) {
        for index in clicks.thumbnails {
            self.request_thumbnail(ctx, index);
        }
        if let Some((position, index)) = clicks.open {
            if self.gallery.open(position) {
                self.ensure_full_image(ctx, index);
            }
        }
        if let Some(index) = clicks.download {
            self.start_download(ctx, index);
        }
        if let Some((action, position, index)) = clicks.menu {
            self.apply_tile_action(ctx, action, position, index);
        }
    }

    fn scroll_area(&self, id: &str) -> egui::ScrollArea {
        egui::ScrollArea::vertical()
            .id_salt(id)
            .auto_shrink([false, false])
            // Background stays put while the lightbox is open
            .enable_scrolling(!self.gallery.scroll_locked())
    }

    /// Paint the tile's thumbnail, or a neutral slot while it loads
    fn paint_thumbnail(&self, painter: &egui::Painter, rect: egui::Rect, record_index: usize, rounding: egui::CornerRadius) {
        painter.rect_filled(rect, rounding, theme::BG_SURFACE);
        match self.thumbnails.get(&record_index) {
            Some(texture) => {
                let uv = cover_uv(texture.size_vec2(), rect.size());
                let brush = egui::epaint::Brush {
                    fill_texture_id: texture.id(),
                    uv,
                };
                let mut shape = egui::epaint::RectShape::filled(rect, rounding, egui::Color32::WHITE);
                shape.brush = Some(std::sync::Arc::new(brush));
                painter.add(shape);
            }
            None => {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    icons::IMAGE,
                    egui::FontId::proportional(28.0),
                    theme::TEXT_DIM,
                );
            }
        }
    }

    fn tile_interactions(&self, ui: &mut egui::Ui, response: &egui::Response, download: &egui::Response, tile: &Tile, clicks: &mut TileClicks) {
        if download.clicked() {
            clicks.download = Some(tile.record_index);
        } else if response.clicked() {
            clicks.open = Some((tile.position, tile.record_index));
        }
        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        response.context_menu(|ui| {
            let action = self.tile_context_menu(ui);
            if action.open || action.download || action.copy_link {
                clicks.menu = Some((action, tile.position, tile.record_index));
            }
        });
    }

    // ========================================================================
    // GRID VIEW
    // ========================================================================

    fn render_grid_view(&mut self, ui: &mut egui::Ui, tiles: &[Tile]) -> TileClicks {
        let spacing = theme::SPACING_MD;
        let base_w = if self.large_thumbnails { GRID_CARD_LARGE } else { GRID_CARD_SMALL };
        let available = ui.available_width() - spacing;
        let num_cols = ((available + spacing) / (base_w + spacing)).floor().max(1.0);
        let card_w = ((available - spacing * (num_cols - 1.0)) / num_cols).floor();
        let image_h = (card_w * 0.75).floor();
        let card_h = image_h + GRID_INFO_HEIGHT;

        let mut clicks = TileClicks::default();
        self.scroll_area("grid_scroll").show(ui, |ui| {
            let notifier = ViewportNotifier::new(ui.clip_rect(), LAZY_LOAD_MARGIN);
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing = egui::vec2(spacing, spacing);
                for tile in tiles {
                    let (rect, response) = ui.allocate_exact_size(egui::vec2(card_w, card_h), egui::Sense::click());
                    if self.lazy.observe(&tile.record_index, rect, &notifier) {
                        clicks.thumbnails.push(tile.record_index);
                    }

                    let image_rect = egui::Rect::from_min_size(rect.min, egui::vec2(card_w, image_h));
                    let button_rect = egui::Rect::from_center_size(
                        image_rect.right_top() + egui::vec2(-DOWNLOAD_BUTTON * 0.5 - 6.0, DOWNLOAD_BUTTON * 0.5 + 6.0),
                        egui::vec2(DOWNLOAD_BUTTON, DOWNLOAD_BUTTON),
                    );

                    if ui.is_rect_visible(rect) {
                        let painter = ui.painter().with_clip_rect(rect);
                        painter.rect_filled(rect, theme::RADIUS_LARGE, theme::BG_ELEVATED);
                        self.paint_thumbnail(
                            &painter,
                            image_rect,
                            tile.record_index,
                            egui::CornerRadius {
                                nw: theme::RADIUS_LARGE as u8,
                                ne: theme::RADIUS_LARGE as u8,
                                sw: 0,
                                se: 0,
                            },
                        );
                        if response.hovered() {
                            painter.rect_filled(image_rect, 0.0, egui::Color32::from_white_alpha(12));
                        }

                        let text_left = egui::pos2(rect.left() + theme::SPACING_MD, image_rect.bottom() + theme::SPACING_MD);
                        painter.text(
                            text_left,
                            egui::Align2::LEFT_TOP,
                            &tile.name,
                            egui::FontId::proportional(theme::FONT_LABEL),
                            theme::TEXT_PRIMARY,
                        );
                        painter.text(
                            text_left + egui::vec2(0.0, 18.0),
                            egui::Align2::LEFT_TOP,
                            &tile.date,
                            egui::FontId::proportional(theme::FONT_SMALL),
                            theme::TEXT_MUTED,
                        );
                        let meta = match &tile.dimensions {
                            Some(dims) => format!("{}  •  {}", tile.size, dims),
                            None => tile.size.clone(),
                        };
                        painter.text(
                            text_left + egui::vec2(0.0, 34.0),
                            egui::Align2::LEFT_TOP,
                            meta,
                            egui::FontId::proportional(theme::FONT_SMALL),
                            theme::TEXT_DIM,
                        );
                        let border = if response.hovered() { theme::BORDER_STRONG } else { theme::BORDER_SUBTLE };
                        ui.painter().rect_stroke(
                            rect,
                            theme::RADIUS_LARGE,
                            egui::Stroke::new(theme::STROKE_DEFAULT, border),
                            egui::StrokeKind::Inside,
                        );
                    }

                    let download = overlay_button(
                        ui,
                        egui::Id::new(("tile_download", tile.record_index)),
                        button_rect,
                        icons::DOWNLOAD_SIMPLE,
                        self.strings().download,
                        self.is_downloading(tile.record_index),
                    );
                    self.tile_interactions(ui, &response, &download, tile, &mut clicks);
                }
            });
        });
        clicks
    }

    // ========================================================================
    // LIST VIEW
    // ========================================================================

    fn render_list_view(&mut self, ui: &mut egui::Ui, tiles: &[Tile]) -> TileClicks {
        let mut clicks = TileClicks::default();
        self.scroll_area("list_scroll").show(ui, |ui| {
            let notifier = ViewportNotifier::new(ui.clip_rect(), LAZY_LOAD_MARGIN);
            ui.spacing_mut().item_spacing.y = theme::SPACING_XS;
            let width = ui.available_width();
            for tile in tiles {
                let (rect, response) = ui.allocate_exact_size(egui::vec2(width, LIST_ROW_HEIGHT), egui::Sense::click());
                if self.lazy.observe(&tile.record_index, rect, &notifier) {
                    clicks.thumbnails.push(tile.record_index);
                }
                let thumb_rect = egui::Rect::from_min_size(
                    rect.min + egui::vec2(theme::SPACING_SM, theme::SPACING_SM),
                    egui::vec2((LIST_ROW_HEIGHT - 8.0) * 4.0 / 3.0, LIST_ROW_HEIGHT - 8.0),
                );
                let button_rect = egui::Rect::from_center_size(
                    egui::pos2(rect.right() - DOWNLOAD_BUTTON, rect.center().y),
                    egui::vec2(DOWNLOAD_BUTTON, DOWNLOAD_BUTTON),
                );

                if ui.is_rect_visible(rect) {
                    let fill = if response.hovered() { theme::BG_HOVER_SUBTLE } else { theme::BG_ELEVATED };
                    ui.painter().rect_filled(rect, theme::RADIUS_DEFAULT, fill);
                    let painter = ui.painter().with_clip_rect(rect);
                    self.paint_thumbnail(
                        &painter,
                        thumb_rect,
                        tile.record_index,
                        egui::CornerRadius::same(theme::RADIUS_SMALL as u8),
                    );

                    let text_x = thumb_rect.right() + theme::SPACING_LG;
                    painter.text(
                        egui::pos2(text_x, rect.top() + 12.0),
                        egui::Align2::LEFT_TOP,
                        &tile.name,
                        egui::FontId::proportional(theme::FONT_BODY),
                        theme::TEXT_PRIMARY,
                    );
                    painter.text(
                        egui::pos2(text_x, rect.top() + 34.0),
                        egui::Align2::LEFT_TOP,
                        &tile.date,
                        egui::FontId::proportional(theme::FONT_SMALL),
                        theme::TEXT_MUTED,
                    );

                    let mut meta_right = button_rect.left() - theme::SPACING_XL;
                    for text in tile.dimensions.iter().chain(std::iter::once(&tile.size)) {
                        let galley = painter.layout_no_wrap(
                            text.clone(),
                            egui::FontId::proportional(theme::FONT_LABEL),
                            theme::TEXT_DIM,
                        );
                        let width = galley.size().x;
                        painter.galley(
                            egui::pos2(meta_right - width, rect.center().y - galley.size().y / 2.0),
                            galley,
                            theme::TEXT_DIM,
                        );
                        meta_right -= width + theme::SPACING_XL;
                    }
                }

                let download = overlay_button(
                    ui,
                    egui::Id::new(("row_download", tile.record_index)),
                    button_rect,
                    icons::DOWNLOAD_SIMPLE,
                    self.strings().download,
                    self.is_downloading(tile.record_index),
                );
                self.tile_interactions(ui, &response, &download, tile, &mut clicks);
            }
        });
        clicks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Location;
    use crate::image_loader::tests::MemoryFetcher;
    use crate::manifest::{load_manifest, LoadedManifest};

    fn loaded_gallery(body: &str) -> GalleryState {
        let location = Location::parse("https://example.com/images_data.json").unwrap();
        let fetcher = MemoryFetcher::default().with(&location.to_string(), body.as_bytes().to_vec());
        GalleryState::new(load_manifest(&fetcher, &location).records)
    }

    #[test]
    fn empty_manifest_shows_empty_state() {
        let gallery = loaded_gallery(r#"{"images": []}"#);
        assert_eq!(content_state(LoadState::Ready, &gallery), ContentState::Empty);
    }

    #[test]
    fn search_without_hits_is_distinct_from_empty() {
        let mut gallery = loaded_gallery(r#"{"images": [{"name": "cat.jpg", "path": "./cat.jpg"}]}"#);
        assert_eq!(content_state(LoadState::Ready, &gallery), ContentState::Tiles);
        gallery.apply_search("dog");
        assert_eq!(content_state(LoadState::Ready, &gallery), ContentState::NoMatches);
    }

    #[test]
    fn load_state_wins_over_records() {
        let gallery = GalleryState::new(LoadedManifest::fallback().records);
        assert_eq!(content_state(LoadState::Loading, &gallery), ContentState::Loading);
        assert_eq!(content_state(LoadState::Failed, &gallery), ContentState::Failed);
        assert_eq!(content_state(LoadState::Ready, &gallery), ContentState::Tiles);
    }
}
