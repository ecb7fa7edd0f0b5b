//! The verse card and its previous/next controls

use egui::{Align, Frame, Layout, Margin, RichText, Rounding, Ui, Vec2};
use tbs_core::{NavIntent, NavigationContext};

use crate::theme::{accent_color, muted_text_color};

pub const PREVIOUS_LABEL: &str = "◀ முந்தைய";
pub const NEXT_LABEL: &str = "அடுத்தது ▶";

/// Reference line under the verse, e.g. "ஆதியாகமம் 1:1"
pub fn reference_label(display_name: &str, chapter: &str, verse: &str) -> String {
    format!("{} {}:{}", display_name, chapter, verse)
}

/// Position counter, one-based
pub fn counter_label(current_index: usize, total: usize) -> String {
    format!("வசனம் {} / {}", current_index + 1, total)
}

/// Draw the current verse; returns the intent of a clicked control
pub fn slide_view(ui: &mut Ui, context: &NavigationContext) -> Option<NavIntent> {
    let (Some(book), Some(row)) = (context.book.as_deref(), context.current_row()) else {
        return None;
    };

    let card_width = (ui.available_width() * 0.8).max(240.0);
    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        Frame::none()
            .fill(ui.visuals().faint_bg_color)
            .rounding(Rounding::same(12.0))
            .inner_margin(Margin::same(32.0))
            .show(ui, |ui| {
                ui.set_width(card_width);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(&row.text).size(28.0));
                    ui.add_space(16.0);
                    ui.label(
                        RichText::new(reference_label(&book.display_name, row.chapter.as_str(), &row.verse))
                            .size(18.0)
                            .strong()
                            .color(accent_color()),
                    );
                });
            });
        ui.add_space(8.0);
        ui.label(
            RichText::new(counter_label(context.state.current_index(), context.total_rows()))
                .color(muted_text_color()),
        );
    });

    let mut intent = None;
    ui.add_space(16.0);
    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
        let previous = ui.add_enabled(
            !context.is_at_start(),
            egui::Button::new(PREVIOUS_LABEL).min_size(Vec2::new(120.0, 32.0)),
        );
        if previous.on_hover_text("←").clicked() {
            intent = Some(NavIntent::MoveBackward);
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let next = ui.add_enabled(
                !context.is_at_end(),
                egui::Button::new(NEXT_LABEL).min_size(Vec2::new(120.0, 32.0)),
            );
            if next.on_hover_text("→").clicked() {
                intent = Some(NavIntent::MoveForward);
            }
        });
    });

    intent
}
