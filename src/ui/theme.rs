use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(34, 37, 48);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 45);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(90, 140, 220);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(255, 255, 255);

pub const ACCENT: Color32 = Color32::from_rgb(80, 140, 220);
pub const NOW_LINE: Color32 = Color32::from_rgb(240, 75, 75);
pub const GRID_MINOR: Color32 = Color32::from_rgb(38, 40, 51);
pub const GRID_MAJOR: Color32 = Color32::from_rgb(56, 59, 74);
pub const HATCH: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 70);

/// Opacity applied to bars outside the highlighted relation.
pub const DIM_FACTOR: f32 = 0.22;

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const HEADER_HEIGHT: f32 = 36.0;
pub const LABEL_GUTTER: f32 = 150.0;
pub const BAR_ROUNDING: f32 = 4.0;
pub const BAR_INSET: f32 = 4.0; // vertical inset so bars don't touch row edges
pub const HATCH_SPACING: f32 = 7.0;
pub const TOOLTIP_OFFSET: f32 = 12.0;
pub const STATUS_BAR_HEIGHT: f32 = 22.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_status() -> FontId {
    FontId::proportional(10.5)
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    let rounding = Rounding::same(BAR_ROUNDING);

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_HEADER;
    visuals.extreme_bg_color = BG_DARK;
    visuals.faint_bg_color = GRID_MINOR;

    let widgets = &mut visuals.widgets;
    widgets.noninteractive.bg_fill = BG_PANEL;
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);

    widgets.inactive.bg_fill = BG_HEADER;
    widgets.inactive.weak_bg_fill = BG_HEADER;
    widgets.inactive.bg_stroke = Stroke::new(1.0, GRID_MAJOR);
    widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);

    // Hover and press reuse the chart's selection accent.
    for state in [&mut widgets.hovered, &mut widgets.active] {
        state.bg_fill = GRID_MAJOR;
        state.weak_bg_fill = GRID_MAJOR;
        state.bg_stroke = Stroke::new(1.0, BORDER_ACCENT);
        state.fg_stroke = Stroke::new(1.5, TEXT_ON_BAR);
    }
    for state in [
        &mut widgets.noninteractive,
        &mut widgets.inactive,
        &mut widgets.hovered,
        &mut widgets.active,
    ] {
        state.rounding = rounding;
    }

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    visuals.window_rounding = Rounding::same(BAR_ROUNDING + 2.0);
    visuals.window_stroke = Stroke::new(1.0, GRID_MAJOR);
    visuals.menu_rounding = rounding;

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, BAR_INSET);
    style.spacing.menu_margin = egui::Margin::same(BAR_INSET + 2.0);
    ctx.set_style(style);
}
