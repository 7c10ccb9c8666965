//! Centralized theme constants for the gallery
//! Colors, sizes, and widget styles used across views and overlays

use egui::Color32;

// =============================================================================
// COLORS - Backgrounds
// =============================================================================
pub const BG_BASE: Color32 = Color32::from_rgb(0x0c, 0x0c, 0x0f);
pub const BG_ELEVATED: Color32 = Color32::from_rgb(0x17, 0x17, 0x1b); // cards, header
pub const BG_SURFACE: Color32 = Color32::from_rgb(0x26, 0x26, 0x2b); // image slots, menu hover
pub const BG_HOVER_SUBTLE: Color32 = Color32::from_rgb(0x1f, 0x1f, 0x24); // list row hover

// =============================================================================
// COLORS - Accent
// =============================================================================
pub const ACCENT: Color32 = Color32::from_rgb(0x38, 0xbd, 0xf8); // sky-400
pub const ACCENT_LIGHT: Color32 = Color32::from_rgb(0x7d, 0xd3, 0xfc); // sky-300

// =============================================================================
// COLORS - Text
// =============================================================================
pub const TEXT_PRIMARY: Color32 = Color32::WHITE;
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0xe4, 0xe4, 0xe7);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(0xa1, 0xa1, 0xaa);
pub const TEXT_DIM: Color32 = Color32::from_rgb(0x71, 0x71, 0x7a);

// =============================================================================
// COLORS - Borders & status
// =============================================================================
pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(0x27, 0x27, 0x2a);
pub const BORDER_DEFAULT: Color32 = Color32::from_rgb(0x3f, 0x3f, 0x46);
pub const BORDER_STRONG: Color32 = Color32::from_rgb(0x52, 0x52, 0x5b);

pub const STATUS_WARNING: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24);
pub const STATUS_ERROR: Color32 = Color32::from_rgb(0xf8, 0x71, 0x71);

// =============================================================================
// COLORS - Buttons
// =============================================================================
pub const BTN_DEFAULT: Color32 = Color32::from_rgb(0x33, 0x33, 0x3a);
pub const BTN_ACCENT: Color32 = Color32::from_rgb(0x0e, 0xa5, 0xe9); // sky-500
const BTN_ACCENT_TEXT: Color32 = Color32::from_rgb(0x08, 0x2f, 0x49);

// =============================================================================
// TYPOGRAPHY - Font Sizes
// =============================================================================
pub const FONT_TITLE: f32 = 18.0;
pub const FONT_HEADING: f32 = 16.0;
pub const FONT_BODY: f32 = 14.0;
pub const FONT_LABEL: f32 = 13.0;
pub const FONT_SMALL: f32 = 11.0;

// =============================================================================
// SPACING, RADII, STROKES
// =============================================================================
pub const SPACING_XS: f32 = 2.0;
pub const SPACING_SM: f32 = 4.0;
pub const SPACING_MD: f32 = 8.0;
pub const SPACING_LG: f32 = 12.0;
pub const SPACING_XL: f32 = 16.0;

pub const RADIUS_SMALL: f32 = 2.0;
pub const RADIUS_DEFAULT: f32 = 4.0;
pub const RADIUS_LARGE: f32 = 8.0;

pub const STROKE_DEFAULT: f32 = 1.0;

// =============================================================================
// HELPER - Apply global visuals
// =============================================================================
pub fn apply_visuals(ctx: &egui::Context) {
    let widget = |bg_fill: Color32, weak_bg_fill: Color32, bg_stroke: egui::Stroke, fg: Color32, expansion: f32| {
        egui::style::WidgetVisuals {
            bg_fill,
            weak_bg_fill,
            bg_stroke,
            fg_stroke: egui::Stroke::new(STROKE_DEFAULT, fg),
            corner_radius: RADIUS_DEFAULT.into(),
            expansion,
        }
    };
    let subtle = egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE);

    ctx.set_visuals(egui::Visuals {
        dark_mode: true,
        panel_fill: BG_BASE,
        window_fill: BG_ELEVATED,
        extreme_bg_color: Color32::from_rgb(0x12, 0x12, 0x16), // text inputs
        faint_bg_color: BG_ELEVATED,
        hyperlink_color: ACCENT,
        selection: egui::style::Selection {
            bg_fill: Color32::from_rgb(0x1e, 0x3a, 0x4f),
            stroke: egui::Stroke::new(STROKE_DEFAULT, ACCENT),
        },
        widgets: egui::style::Widgets {
            noninteractive: widget(BG_ELEVATED, BG_SURFACE, subtle, TEXT_PRIMARY, 0.0),
            inactive: widget(Color32::TRANSPARENT, BTN_DEFAULT, subtle, TEXT_SECONDARY, 0.0),
            hovered: widget(BG_SURFACE, lighten(BTN_DEFAULT, 0.1), egui::Stroke::NONE, TEXT_PRIMARY, 0.0),
            active: widget(BG_SURFACE, BG_SURFACE, egui::Stroke::NONE, TEXT_PRIMARY, -1.0),
            open: widget(BG_SURFACE, BG_ELEVATED, subtle, TEXT_PRIMARY, 0.0),
        },
        interact_cursor: Some(egui::CursorIcon::PointingHand),
        popup_shadow: egui::epaint::Shadow {
            offset: [0, 4],
            blur: 12,
            spread: 0,
            color: Color32::from_black_alpha(80),
        },
        window_stroke: subtle,
        window_corner_radius: egui::CornerRadius::same(RADIUS_LARGE as u8),
        menu_corner_radius: egui::CornerRadius::same(RADIUS_LARGE as u8),
        ..egui::Visuals::dark()
    });

    ctx.style_mut(|style| {
        style.interaction.selectable_labels = false;
        style.spacing.menu_margin = egui::Margin::symmetric(6, 4);
        style.spacing.item_spacing = egui::vec2(SPACING_MD, 6.0);
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.scroll.bar_width = 6.0;
        style.spacing.scroll.floating = false;
    });
}

// =============================================================================
// HELPER - Frames and buttons
// =============================================================================
pub fn modal_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_ELEVATED)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_DEFAULT))
        .corner_radius(RADIUS_LARGE)
        .inner_margin(egui::Margin::same(20))
}

pub fn button(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(text.into())
        .fill(BTN_DEFAULT)
        .corner_radius(RADIUS_DEFAULT)
}

/// Primary action (download)
pub fn button_accent(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(BTN_ACCENT_TEXT))
        .fill(BTN_ACCENT)
        .corner_radius(RADIUS_DEFAULT)
}

/// Context menu item with icon. Returns true if clicked.
pub fn menu_item(ui: &mut egui::Ui, icon: &str, label: &str) -> bool {
    let w = ui.available_width();
    let (rect, response) = ui.allocate_exact_size(egui::vec2(w, 24.0), egui::Sense::click());
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        ui.painter().rect_filled(rect, RADIUS_DEFAULT, lighten(BG_SURFACE, 0.12));
    }
    ui.painter().text(
        rect.left_center() + egui::vec2(8.0, 0.0),
        egui::Align2::LEFT_CENTER,
        format!("{}  {}", icon, label),
        egui::FontId::proportional(FONT_LABEL),
        TEXT_SECONDARY,
    );
    response.clicked()
}

/// Sets context menu width to 1.5x the widest label.
pub fn set_menu_width(ui: &mut egui::Ui, labels: &[&str]) {
    let widest = labels
        .iter()
        .map(|l| {
            ui.fonts(|f| {
                f.layout_no_wrap(l.to_string(), egui::FontId::proportional(FONT_LABEL), TEXT_SECONDARY)
                    .rect
                    .width()
            })
        })
        .fold(0.0_f32, f32::max);
    let w = (widest + 16.0) * 1.5;
    ui.set_min_width(w);
    ui.set_max_width(w);
}

/// Checkbox row for the settings modal. Returns true if toggled.
pub fn settings_checkbox(ui: &mut egui::Ui, checked: bool, label: &str, enabled: bool) -> bool {
    let (row_rect, row_resp) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 20.0), egui::Sense::click());
    if enabled && row_resp.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    let painter = ui.painter();
    let cb_rect = egui::Rect::from_min_size(
        egui::pos2(row_rect.min.x, row_rect.center().y - 8.0),
        egui::vec2(16.0, 16.0),
    );
    let stroke_color = if checked { ACCENT } else { BORDER_DEFAULT };
    painter.rect_stroke(cb_rect, 3.0, egui::Stroke::new(1.5, stroke_color), egui::StrokeKind::Inside);
    if checked {
        painter.rect_filled(cb_rect.shrink(3.0), RADIUS_SMALL, ACCENT);
    }
    painter.text(
        egui::pos2(cb_rect.max.x + SPACING_MD, row_rect.center().y),
        egui::Align2::LEFT_CENTER,
        label,
        egui::FontId::proportional(FONT_BODY),
        if enabled { TEXT_PRIMARY } else { TEXT_DIM },
    );
    enabled && row_resp.clicked()
}

/// Returns (fill, draw_rect) for a custom-painted button with hover/press effects.
pub fn button_visual(response: &egui::Response, base_fill: Color32, rect: egui::Rect) -> (Color32, egui::Rect) {
    if response.is_pointer_button_down_on() {
        (lighten(base_fill, 0.06), rect.shrink(1.5))
    } else if response.hovered() {
        (lighten(base_fill, 0.12), rect)
    } else {
        (base_fill, rect)
    }
}

/// Mix toward white; alpha is kept.
fn lighten(c: Color32, amount: f32) -> Color32 {
    let mix = |v: u8| (v as f32 + (255.0 - v as f32) * amount) as u8;
    Color32::from_rgba_premultiplied(mix(c.r()), mix(c.g()), mix(c.b()), c.a())
}
