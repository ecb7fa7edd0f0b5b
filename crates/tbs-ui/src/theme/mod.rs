use egui::{Context, Visuals, Style, Color32, Rounding, Stroke, FontId, FontFamily, TextStyle, FontData, FontDefinitions};
use std::collections::BTreeMap;
use tracing::info;

/// Font family name registered for the user-supplied Tamil font
const TAMIL_FONT_NAME: &str = "tamil";

/// Theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
    /// Multiplier applied to every text style
    pub text_scale: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Indigo Light".to_string(),
            dark_mode: false,
            text_scale: 1.0,
        }
    }
}

/// Apply the application theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode { Visuals::dark() } else { Visuals::light() };

    let (panel_bg, widget_bg, hover_color, text_color) = if theme.dark_mode {
        (
            Color32::from_rgb(31, 31, 40),
            Color32::from_rgb(45, 45, 60),
            Color32::from_rgb(60, 60, 85),
            Color32::from_rgb(225, 225, 235),
        )
    } else {
        (
            Color32::from_rgb(240, 242, 255),   // Indigo-50 backdrop
            Color32::WHITE,
            Color32::from_rgb(224, 231, 255),   // Indigo-100 hover
            Color32::from_rgb(31, 41, 55),      // Gray-800 text
        )
    };
    let accent = accent_color();

    // Window and panel styling
    visuals.window_fill = panel_bg;
    visuals.panel_fill = panel_bg;
    visuals.faint_bg_color = widget_bg;

    // Widget styling
    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.fg_stroke = Stroke::new(1.0, text_color);
        widget.rounding = Rounding::same(6.0);
    }
    visuals.widgets.inactive.bg_fill = widget_bg;
    visuals.widgets.inactive.weak_bg_fill = widget_bg;
    visuals.widgets.hovered.bg_fill = hover_color;
    visuals.widgets.hovered.weak_bg_fill = hover_color;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent);

    // Selection marks the current chapter and verse in the tree
    visuals.selection.bg_fill = accent;
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.hyperlink_color = accent;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    style.spacing.indent = 16.0;

    let scale = theme.text_scale.clamp(0.5, 3.0);
    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(12.0 * scale, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(15.0 * scale, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(15.0 * scale, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(24.0 * scale, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(13.0 * scale, FontFamily::Monospace));
    style.text_styles = font_sizes;

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

/// Register a Tamil-capable font ahead of the default proportional fonts.
///
/// egui's bundled fonts have no Tamil glyphs, so verse text renders as boxes
/// until one is installed.
pub fn install_tamil_font(ctx: &Context, font_bytes: Vec<u8>) {
    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert(TAMIL_FONT_NAME.to_string(), FontData::from_owned(font_bytes));
    fonts
        .families
        .entry(FontFamily::Proportional)
        .or_default()
        .insert(0, TAMIL_FONT_NAME.to_string());
    ctx.set_fonts(fonts);
    info!("Installed Tamil font");
}

/// Indigo accent used for the current chapter and verse
pub fn accent_color() -> Color32 {
    Color32::from_rgb(99, 102, 241)
}

/// Get the error color for the theme
pub fn error_color() -> Color32 {
    Color32::from_rgb(220, 38, 38)
}

/// Secondary text (references, counters)
pub fn muted_text_color() -> Color32 {
    Color32::from_rgb(107, 114, 128)
}
