//! Reusable UI components

use crate::theme;
use eframe::egui;

/// UV rect that crops a texture to fill `target` without distortion
pub fn cover_uv(texture_size: egui::Vec2, target: egui::Vec2) -> egui::Rect {
    if texture_size.x <= 0.0 || texture_size.y <= 0.0 || target.x <= 0.0 || target.y <= 0.0 {
        return egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    }
    let tex_aspect = texture_size.x / texture_size.y;
    let target_aspect = target.x / target.y;
    if tex_aspect > target_aspect {
        // Wider than the slot: crop left/right
        let visible = target_aspect / tex_aspect;
        let margin = (1.0 - visible) / 2.0;
        egui::Rect::from_min_max(egui::pos2(margin, 0.0), egui::pos2(1.0 - margin, 1.0))
    } else {
        let visible = tex_aspect / target_aspect;
        let margin = (1.0 - visible) / 2.0;
        egui::Rect::from_min_max(egui::pos2(0.0, margin), egui::pos2(1.0, 1.0 - margin))
    }
}

/// Largest size with the texture's aspect ratio that fits in `bounds`
pub fn fit_size(texture_size: egui::Vec2, bounds: egui::Vec2) -> egui::Vec2 {
    if texture_size.x <= 0.0 || texture_size.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.x / texture_size.x).min(bounds.y / texture_size.y);
    texture_size * scale
}

/// Round overlay button drawn on top of a tile. Registered after the tile so it
/// takes the click instead of the tile.
pub fn overlay_button(
    ui: &mut egui::Ui,
    id: egui::Id,
    rect: egui::Rect,
    icon: &str,
    hint: &str,
    busy: bool,
) -> egui::Response {
    let response = ui.interact(rect, id, egui::Sense::click());
    let base = egui::Color32::from_black_alpha(170);
    let (fill, draw_rect) = theme::button_visual(&response, base, rect);
    let painter = ui.painter();
    painter.circle_filled(draw_rect.center(), draw_rect.width() / 2.0, fill);
    painter.text(
        draw_rect.center(),
        egui::Align2::CENTER_CENTER,
        if busy { egui_phosphor::regular::HOURGLASS } else { icon },
        egui::FontId::proportional(draw_rect.width() * 0.55),
        if response.hovered() { theme::ACCENT_LIGHT } else { theme::TEXT_PRIMARY },
    );
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    response.on_hover_text(hint)
}

/// Centered icon, title and body, used for empty, loading and error states
pub fn empty_state(ui: &mut egui::Ui, icon: &str, title: &str, body: Option<&str>) {
    ui.vertical_centered(|ui| {
        ui.add_space((ui.available_height() * 0.3).max(theme::SPACING_XL));
        ui.label(egui::RichText::new(icon).size(48.0).color(theme::TEXT_DIM));
        ui.add_space(theme::SPACING_MD);
        ui.label(
            egui::RichText::new(title)
                .size(theme::FONT_TITLE)
                .color(theme::TEXT_SECONDARY),
        );
        if let Some(body) = body {
            ui.add_space(theme::SPACING_SM);
            ui.label(
                egui::RichText::new(body)
                    .size(theme::FONT_BODY)
                    .color(theme::TEXT_MUTED),
            );
        }
        ui.add_space(theme::SPACING_LG);
    });
}

/// Modal title row with a close button. Returns true when close was clicked.
pub fn modal_title(ui: &mut egui::Ui, title: &str) -> bool {
    let mut close = false;
    ui.horizontal(|ui| {
        ui.add(egui::Label::new(egui::RichText::new(title).size(theme::FONT_HEADING).strong()).selectable(false));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let close_size = 24.0;
            let (rect, response) = ui.allocate_exact_size(egui::vec2(close_size, close_size), egui::Sense::click());
            let close_color = if response.hovered() {
                ui.painter().rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_SURFACE);
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                theme::STATUS_ERROR
            } else {
                theme::TEXT_DIM
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                egui_phosphor::regular::X,
                egui::FontId::proportional(16.0),
                close_color,
            );
            close = response.clicked();
        });
    });
    ui.add_space(theme::SPACING_SM);
    ui.separator();
    ui.add_space(theme::SPACING_SM);
    close
}

/// Accent-colored section heading inside a modal
pub fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.add(egui::Label::new(egui::RichText::new(text).size(theme::FONT_LABEL).color(theme::ACCENT)).selectable(false));
    ui.add_space(theme::SPACING_XS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    #[test]
    fn cover_crops_the_long_side() {
        let uv = cover_uv(vec2(400.0, 100.0), vec2(200.0, 100.0));
        assert!((uv.min.x - 0.25).abs() < 1e-5);
        assert!((uv.max.x - 0.75).abs() < 1e-5);
        assert_eq!(uv.min.y, 0.0);

        let uv = cover_uv(vec2(100.0, 400.0), vec2(100.0, 100.0));
        assert!((uv.min.y - 0.375).abs() < 1e-5);
        assert_eq!(uv.min.x, 0.0);
    }

    #[test]
    fn fit_keeps_aspect() {
        assert_eq!(fit_size(vec2(1000.0, 500.0), vec2(400.0, 400.0)), vec2(400.0, 200.0));
        assert_eq!(fit_size(vec2(0.0, 0.0), vec2(10.0, 10.0)), vec2(10.0, 10.0));
    }
}
