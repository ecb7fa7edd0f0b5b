//! Tamil Bible verse slideshow

mod route;
mod settings;

use std::sync::Arc;
use anyhow::Result;
use clap::Parser;
use egui::{CentralPanel, Context, SidePanel, TopBottomPanel};
use parking_lot::Mutex;
use tracing::{error, info, warn};

use tbs_core::events::events::{BookSelectionRejected, DatasetLoadFailed, DatasetLoaded};
use tbs_core::events::{handler_from_fn, Event};
use tbs_core::{AppState, CoreError, LoadStatus, NavIntent, NavigationContext, NavigationSubscriber, VerseSource};
use tbs_data::CsvVerseSource;
use tbs_ui::{NavigationPanel, Theme};

use route::Route;
use settings::{AppSettings, CliArgs};

const APP_TITLE: &str = "தமிழ் வேதாகமம்";
const BOOK_PICKER_COLUMNS: usize = 4;

/// Repaints whenever the cursor or the open book changes
struct RepaintOnNavigation {
    ctx: Context,
}

impl NavigationSubscriber for RepaintOnNavigation {
    fn on_navigation_change(&self, _context: &NavigationContext) {
        self.ctx.request_repaint();
    }
}

struct TamilBibleSlidesApp {
    state: Arc<AppState>,
    settings: AppSettings,
    route: Route,
    navigation_panel: NavigationPanel,

    /// Last load outcome, written by event handlers
    status_line: Arc<Mutex<String>>,

    /// Shown while no Tamil font could be installed. Plain ASCII on purpose.
    font_notice: Option<String>,

    /// Held so the engine's weak reference stays alive
    _repaint: Arc<RepaintOnNavigation>,

    runtime: tokio::runtime::Runtime,
    egui_ctx: Context,
}

impl TamilBibleSlidesApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        settings: AppSettings,
        initial_book: Option<String>,
    ) -> Self {
        tbs_ui::apply_theme(&cc.egui_ctx, &Self::theme_for(&settings));
        let font_notice = match settings.read_tamil_font() {
            Ok((path, bytes)) => {
                info!("Using Tamil font {}", path.display());
                tbs_ui::install_tamil_font(&cc.egui_ctx, bytes);
                None
            }
            Err(e) => {
                warn!("Tamil text will not render: {:#}", e);
                Some(format!("Tamil text cannot be displayed. {:#}", e))
            }
        };

        let state = Arc::new(AppState::with_canonical_registry());
        let repaint = Arc::new(RepaintOnNavigation { ctx: cc.egui_ctx.clone() });
        state.navigation.add_subscriber(repaint.clone());

        let status_line = Arc::new(Mutex::new(String::new()));
        Self::subscribe_status(&state, &status_line);

        let mut app = Self {
            state,
            settings,
            route: Route::Home,
            navigation_panel: NavigationPanel::new(),
            status_line,
            font_notice,
            _repaint: repaint,
            runtime,
            egui_ctx: cc.egui_ctx.clone(),
        };

        if let Some(id) = initial_book {
            let route = Route::for_book_id(&id, &app.state.registry);
            app.navigate(route);
        }
        app
    }

    fn theme_for(settings: &AppSettings) -> Theme {
        Theme {
            name: if settings.dark_mode { "Indigo Dark" } else { "Indigo Light" }.to_string(),
            dark_mode: settings.dark_mode,
            text_scale: settings.ui_scale,
        }
    }

    fn subscribe_status(state: &AppState, status_line: &Arc<Mutex<String>>) {
        let line = status_line.clone();
        state.event_bus.subscribe::<DatasetLoaded>(handler_from_fn(move |event: &dyn Event| {
            if let Some(e) = event.as_any().downcast_ref::<DatasetLoaded>() {
                *line.lock() = format!("{}: {} வரிசைகள்", e.source_name, e.row_count);
            }
        }));

        let line = status_line.clone();
        state.event_bus.subscribe::<DatasetLoadFailed>(handler_from_fn(move |event: &dyn Event| {
            if let Some(e) = event.as_any().downcast_ref::<DatasetLoadFailed>() {
                *line.lock() = format!("{}: {}", e.source_name, e.error);
            }
        }));
    }

    /// Switch screens, starting a load when a book is selected
    fn navigate(&mut self, route: Route) {
        info!("Navigating to {}", route);
        self.route = match route {
            Route::Home => {
                self.state.close_book();
                Route::Home
            }
            // A rejected index is already logged and published by the state
            Route::Book(index) => {
                let opened = self.open_book(index);
                if let Err(e) = &opened {
                    error!("Cannot open book {}: {}", index, e);
                }
                Route::after_open(index, &opened)
            }
            Route::InvalidSelection(raw) => {
                warn!("Invalid book selection '{}'", raw);
                self.state.event_bus.publish(BookSelectionRejected {
                    requested: raw.clone(),
                    reason: "not a book in the registry".to_string(),
                });
                Route::InvalidSelection(raw)
            }
        };
    }

    /// Load the dataset in the background; only the newest selection is applied
    fn open_book(&mut self, book_index: usize) -> Result<(), CoreError> {
        let ticket = self.state.begin_load(book_index)?;

        let source = CsvVerseSource::new(self.settings.dataset.clone());
        let state = self.state.clone();
        let ctx = self.egui_ctx.clone();

        self.runtime.spawn(async move {
            let result = source.load().await;
            state.finish_load(ticket, source.source_name(), result);
            ctx.request_repaint();
        });
        Ok(())
    }

    fn pick_dataset(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv", "tsv", "txt"])
            .pick_file()
        {
            info!("Dataset changed to {}", path.display());
            self.settings.dataset.path = path;
            if let Route::Book(index) = self.route {
                self.navigate(Route::Book(index));
            }
        }
    }

    fn apply_intent(&self, intent: NavIntent) {
        if let Err(e) = self.state.navigation.apply(intent) {
            warn!("Navigation rejected: {}", e);
        }
    }

    fn menu_bar(&mut self, ctx: &Context) {
        if let Some(notice) = &self.font_notice {
            TopBottomPanel::top("font_notice").show(ctx, |ui| {
                ui.colored_label(tbs_ui::theme::error_color(), notice.as_str());
            });
        }

        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("🏠 முகப்பு").clicked() {
                    self.navigate(Route::Home);
                }
                if ui.button("📁 தரவுக் கோப்பு…").clicked() {
                    self.pick_dataset();
                }
                let mut dark = self.settings.dark_mode;
                if ui.checkbox(&mut dark, "இருண்ட பயன்முறை").changed() {
                    self.settings.dark_mode = dark;
                    tbs_ui::apply_theme(ctx, &Self::theme_for(&self.settings));
                }
            });
        });

        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.route.to_string());
                ui.separator();
                ui.label(self.status_line.lock().as_str());
            });
        });
    }

    fn book_screen(&mut self, ctx: &Context, book_index: usize) {
        match self.state.status() {
            LoadStatus::Ready { .. } => {}
            LoadStatus::Loading { .. } | LoadStatus::Idle => {
                CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() * 0.3);
                        ui.spinner();
                        ui.label("ஏற்றுகிறது…");
                    });
                });
                return;
            }
            LoadStatus::Failed { error, .. } => {
                let mut retry = false;
                CentralPanel::default().show(ctx, |ui| {
                    tbs_ui::status_message(
                        ui,
                        "வசனங்களை ஏற்ற முடியவில்லை",
                        Some(error.as_str()),
                        Some(tbs_ui::theme::error_color()),
                    );
                    ui.vertical_centered(|ui| {
                        retry = ui.button("மீண்டும் முயல்க").clicked();
                    });
                });
                if retry {
                    self.navigate(Route::Book(book_index));
                }
                return;
            }
        }

        for intent in tbs_ui::pressed_intents(ctx) {
            self.apply_intent(intent);
        }

        let context = self.state.navigation.get_context();
        if context.current_row().is_none() {
            CentralPanel::default().show(ctx, |ui| {
                tbs_ui::status_message(ui, "இந்தப் புத்தகத்தில் வசனங்கள் இல்லை", None, None);
            });
            return;
        }

        let width = self.navigation_panel.config().width;
        let tree_intent = SidePanel::left("chapter_tree")
            .default_width(width)
            .resizable(true)
            .show(ctx, |ui| self.navigation_panel.ui(ui, &context))
            .inner;
        let slide_intent = CentralPanel::default()
            .show(ctx, |ui| tbs_ui::slide_view(ui, &context))
            .inner;

        for intent in tree_intent.into_iter().chain(slide_intent) {
            self.apply_intent(intent);
        }
    }
}

impl eframe::App for TamilBibleSlidesApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.menu_bar(ctx);

        match self.route.clone() {
            Route::Home => {
                let picked = CentralPanel::default()
                    .show(ctx, |ui| tbs_ui::book_picker(ui, &self.state.registry, BOOK_PICKER_COLUMNS))
                    .inner;
                if let Some(index) = picked {
                    self.navigate(Route::Book(index));
                }
            }
            Route::Book(index) => self.book_screen(ctx, index),
            Route::InvalidSelection(raw) => {
                let mut go_home = false;
                CentralPanel::default().show(ctx, |ui| {
                    tbs_ui::status_message(
                        ui,
                        "தவறான புத்தகத் தேர்வு",
                        Some(format!("'{}' என்ற புத்தகம் இல்லை", raw).as_str()),
                        Some(tbs_ui::theme::error_color()),
                    );
                    ui.vertical_centered(|ui| {
                        go_home = ui.button("முகப்புக்குச் செல்").clicked();
                    });
                });
                if go_home {
                    self.navigate(Route::Home);
                }
            }
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = CliArgs::parse();
    let settings = cli.load_settings()?;
    info!("Starting {} with dataset {}", APP_TITLE, settings.dataset.path.display());

    let runtime = tokio::runtime::Runtime::new()?;
    let dark_mode = settings.dark_mode;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 750.0])
            .with_min_inner_size([720.0, 480.0]),
        default_theme: if dark_mode { eframe::Theme::Dark } else { eframe::Theme::Light },
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| {
            Box::new(TamilBibleSlidesApp::new(cc, runtime, settings, cli.book))
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
