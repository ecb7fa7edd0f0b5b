//! egui components for the verse slideshow
//!
//! Components draw from a `NavigationContext` snapshot and hand back the
//! `NavIntent` a click produced; applying it is left to the caller.

pub mod book_picker;
pub mod keyboard;
pub mod navigation_panel;
pub mod slide_view;
pub mod theme;
pub mod widget_utils;

/// Re-export commonly used types
pub use book_picker::book_picker;
pub use keyboard::{intent_for_key, pressed_intents};
pub use navigation_panel::{NavigationPanel, NavigationPanelConfig};
pub use slide_view::slide_view;
pub use theme::{apply_theme, install_tamil_font, Theme};
pub use widget_utils::{ScrollAreaExt, WidgetId};

/// Centered message used for the loading, empty and error screens
pub fn status_message(ui: &mut egui::Ui, title: &str, detail: Option<&str>, color: Option<egui::Color32>) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        let mut heading = egui::RichText::new(title).heading();
        if let Some(color) = color {
            heading = heading.color(color);
        }
        ui.label(heading);
        if let Some(detail) = detail {
            ui.add_space(8.0);
            ui.label(egui::RichText::new(detail).color(theme::muted_text_color()));
        }
    });
}
