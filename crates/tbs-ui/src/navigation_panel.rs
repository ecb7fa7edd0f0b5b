//! Chapter tree shown beside the slide.
//! Chapters expand one at a time; picking a verse jumps the slide to it.

use egui::{Align, Color32, RichText, ScrollArea, Ui, Vec2};
use tbs_core::{ChapterLabel, GroupedRow, NavIntent, NavigationContext};

use crate::theme::{accent_color, muted_text_color};
use crate::widget_utils::{chapter_widget_id, verse_widget_id, ScrollAreaExt, WidgetId};

/// Navigation panel configuration
#[derive(Debug, Clone)]
pub struct NavigationPanelConfig {
    /// Width of the side panel
    pub width: f32,

    /// Number of verse buttons per row inside an expanded chapter
    pub verses_per_row: usize,

    /// Keep the current verse scrolled into view
    pub follow_current: bool,
}

impl Default for NavigationPanelConfig {
    fn default() -> Self {
        Self {
            width: 220.0,
            verses_per_row: 5,
            follow_current: true,
        }
    }
}

/// Chapter and verse tree for the open book
pub struct NavigationPanel {
    config: NavigationPanelConfig,

    /// Last position scrolled into view
    followed_position: Option<usize>,
}

impl Default for NavigationPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationPanel {
    pub fn new() -> Self {
        Self {
            config: NavigationPanelConfig::default(),
            followed_position: None,
        }
    }

    pub fn config(&self) -> &NavigationPanelConfig {
        &self.config
    }

    /// Draw the tree and return the intent picked this frame, if any
    pub fn ui(&mut self, ui: &mut Ui, context: &NavigationContext) -> Option<NavIntent> {
        let Some(book) = context.book.as_deref() else {
            return None;
        };

        ui.heading(&book.display_name);
        ui.label(
            RichText::new(format!("{} அதிகாரங்கள்", book.chapters.len()))
                .small()
                .color(muted_text_color()),
        );
        ui.separator();

        let current = context.state.current_index();
        let expanded = context.state.expanded_chapter();
        let scroll_to_current = self.config.follow_current
            && context.current_row().is_some()
            && self.followed_position != Some(current);

        let mut intent = None;
        ScrollArea::vertical()
            .id_builder(WidgetId::new("chapter_tree").index(book.book_index))
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for (chapter_position, (label, verses)) in book.chapters.iter().enumerate() {
                    let is_expanded = expanded == Some(label);
                    let contains_current = verses.iter().any(|v| v.position == current);

                    ui.push_id(chapter_widget_id(book.book_index, chapter_position).id(), |ui| {
                        if let Some(picked) = Self::chapter_header(ui, label, is_expanded, contains_current) {
                            intent = Some(picked);
                        }
                        if is_expanded {
                            if let Some(picked) = self.verse_grid(
                                ui,
                                book.book_index,
                                verses,
                                current,
                                scroll_to_current,
                            ) {
                                intent = Some(picked);
                            }
                        }
                    });
                }
            });

        if scroll_to_current {
            self.followed_position = Some(current);
        }
        intent
    }

    fn chapter_header(
        ui: &mut Ui,
        label: &ChapterLabel,
        is_expanded: bool,
        contains_current: bool,
    ) -> Option<NavIntent> {
        let arrow = if is_expanded { "▼" } else { "▶" };
        let mut text = RichText::new(format!("{} அதிகாரம் {}", arrow, label));
        if contains_current {
            text = text.strong().color(accent_color());
        }

        let response = ui.selectable_label(is_expanded, text);
        if response.clicked() {
            return Some(NavIntent::ToggleChapter(label.clone()));
        }
        None
    }

    fn verse_grid(
        &self,
        ui: &mut Ui,
        book_index: usize,
        verses: &[GroupedRow],
        current: usize,
        scroll_to_current: bool,
    ) -> Option<NavIntent> {
        let mut intent = None;
        let per_row = self.config.verses_per_row.max(1);

        ui.indent("verses", |ui| {
            for chunk in verses.chunks(per_row) {
                ui.horizontal(|ui| {
                    for verse in chunk {
                        let is_current = verse.position == current;
                        let text = if is_current {
                            RichText::new(&verse.row.verse).strong().color(Color32::WHITE)
                        } else {
                            RichText::new(&verse.row.verse)
                        };

                        let response = ui.push_id(verse_widget_id(book_index, verse.position).id(), |ui| {
                            ui.add_sized(
                                Vec2::new(36.0, 24.0),
                                egui::Button::new(text).fill(if is_current {
                                    accent_color()
                                } else {
                                    ui.visuals().widgets.inactive.weak_bg_fill
                                }),
                            )
                        })
                        .inner;

                        if is_current && scroll_to_current {
                            response.scroll_to_me(Some(Align::Center));
                        }
                        if response.on_hover_text(verse.row.reference()).clicked() {
                            intent = Some(NavIntent::JumpToRow {
                                position: verse.position,
                                chapter: verse.row.chapter.clone(),
                            });
                        }
                    }
                });
            }
        });

        intent
    }
}
