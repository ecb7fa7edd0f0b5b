//! Home screen: every book in the registry, split by testament

use egui::{Grid, RichText, ScrollArea, Ui, Vec2};
use tbs_core::{BookRegistry, Testament};

use crate::widget_utils::{ScrollAreaExt, WidgetId};

pub const OLD_TESTAMENT_TITLE: &str = "பழைய ஏற்பாடு";
pub const NEW_TESTAMENT_TITLE: &str = "புதிய ஏற்பாடு";

/// Heading for a testament section
pub fn testament_title(testament: Testament) -> &'static str {
    match testament {
        Testament::Old => OLD_TESTAMENT_TITLE,
        Testament::New => NEW_TESTAMENT_TITLE,
    }
}

/// Draw the book grid and return the index of the clicked book
pub fn book_picker(ui: &mut Ui, registry: &BookRegistry, columns: usize) -> Option<usize> {
    let columns = columns.max(1);
    let mut picked = None;

    ScrollArea::vertical()
        .id_builder(WidgetId::new("book_picker"))
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for testament in [Testament::Old, Testament::New] {
                ui.add_space(12.0);
                ui.heading(testament_title(testament));
                ui.separator();

                Grid::new(WidgetId::new("book_grid").with(format!("{:?}", testament)).id())
                    .num_columns(columns)
                    .spacing(Vec2::new(8.0, 8.0))
                    .show(ui, |ui| {
                        for (count, (index, entry)) in registry.books_in(testament).enumerate() {
                            let button = egui::Button::new(RichText::new(&entry.display_name))
                                .min_size(Vec2::new(150.0, 36.0));
                            if ui.add(button).clicked() {
                                picked = Some(index);
                            }
                            if (count + 1) % columns == 0 {
                                ui.end_row();
                            }
                        }
                    });
            }
        });

    picked
}
