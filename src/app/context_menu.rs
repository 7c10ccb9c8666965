//! Shared context menu for tiles (used by both grid and list views)

use super::App;
use crate::theme;
use eframe::egui;
use egui_phosphor::regular as icons;

#[derive(Default)]
pub(crate) struct TileAction {
    pub open: bool,
    pub download: bool,
    pub copy_link: bool,
}

impl App {
    pub(crate) fn tile_context_menu(&self, ui: &mut egui::Ui) -> TileAction {
        let mut action = TileAction::default();
        let strings = self.strings();
        ui.spacing_mut().item_spacing.y = 2.0;

        let labels = [
            format!("{}  {}", icons::EYE, strings.open),
            format!("{}  {}", icons::DOWNLOAD_SIMPLE, strings.download),
            format!("{}  {}", icons::LINK, strings.copy_image_link),
        ];
        let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        theme::set_menu_width(ui, &label_refs);

        if theme::menu_item(ui, icons::EYE, strings.open) {
            action.open = true;
            ui.close_menu();
        }
        if theme::menu_item(ui, icons::DOWNLOAD_SIMPLE, strings.download) {
            action.download = true;
            ui.close_menu();
        }
        if self.env.clipboard_available {
            ui.separator();
            if theme::menu_item(ui, icons::LINK, strings.copy_image_link) {
                action.copy_link = true;
                ui.close_menu();
            }
        }
        action
    }

    /// Carry out a context menu choice for the tile at `position` / record `index`
    pub(crate) fn apply_tile_action(&mut self, ctx: &egui::Context, action: TileAction, position: usize, index: usize) {
        if action.open && self.gallery.open(position) {
            self.ensure_full_image(ctx, index);
        }
        if action.download {
            self.start_download(ctx, index);
        }
        if action.copy_link {
            if let Some(link) = self.image_link(index) {
                self.copy_to_clipboard(ctx, link);
            }
        }
    }
}
