use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;

use crate::ui;
use crate::ui::timeline_chart::ChartState;
use machine_gantt::config::TimelineConfig;
use machine_gantt::io::load_schedule;
use machine_gantt::model::{ItemStatus, TimelineController, TimelineEvent};

/// Main application state.
pub struct PlannerApp {
    pub config: TimelineConfig,
    pub controller: TimelineController,
    pub schedule_path: Option<PathBuf>,
    pub chart: ChartState,

    // Status message
    pub status_message: String,
}

impl PlannerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let config = TimelineConfig::load();
        let controller = TimelineController::new(&config, Utc::now());
        let mut app = Self {
            controller,
            schedule_path: None,
            chart: ChartState::default(),
            status_message: format!("Ready · {}", config.tz().name()),
            config,
        };

        if let Some(path) = app.config.last_schedule.clone() {
            app.load_from(&path);
        }
        app
    }

    // --- Schedule files ---

    pub fn open_schedule(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Schedule", &["json"])
            .pick_file()
        {
            self.load_from(&path);
        }
    }

    pub fn reload_schedule(&mut self) {
        if let Some(path) = self.schedule_path.clone() {
            self.load_from(&path);
        }
    }

    fn load_from(&mut self, path: &Path) {
        match load_schedule(path) {
            Ok(schedule) => {
                let coverage = schedule
                    .bounds()
                    .map(|(start, end)| {
                        let tz = self.config.tz();
                        format!(
                            " · {} → {}",
                            start.with_timezone(&tz).format("%d/%m/%Y"),
                            end.with_timezone(&tz).format("%d/%m/%Y")
                        )
                    })
                    .unwrap_or_default();
                self.status_message = format!(
                    "Loaded {} machines, {} items{}",
                    schedule.machines.len(),
                    schedule.items.len(),
                    coverage
                );
                self.controller.apply(
                    TimelineEvent::DataReplaced {
                        resources: schedule.machines,
                        items: schedule.items,
                    },
                    Instant::now(),
                );
                self.schedule_path = Some(path.to_path_buf());
                if self.config.last_schedule.as_deref() != Some(path) {
                    self.config.last_schedule = Some(path.to_path_buf());
                    self.config.save();
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "schedule load failed");
                self.status_message = format!("Error loading: {}", e);
            }
        }
    }

    // --- Filters ---

    pub fn toggle_status(&mut self, status: ItemStatus, shown: bool) {
        self.config.visible_statuses.retain(|s| *s != status);
        if shown {
            self.config.visible_statuses.push(status);
        }
        self.push_filters();
    }

    pub fn set_hide_unrelated(&mut self, hide: bool) {
        self.config.highlight_hides_unrelated = hide;
        self.push_filters();
    }

    fn push_filters(&mut self) {
        self.controller.apply(
            TimelineEvent::FiltersChanged {
                visible_statuses: self.config.visible_statuses.clone(),
                hide_unrelated: self.config.highlight_hides_unrelated,
            },
            Instant::now(),
        );
        self.config.save();
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.controller.apply(TimelineEvent::Tick, now);

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.controller.apply(TimelineEvent::Escape, now);
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} · {:.1} px/h · {} machines",
                                self.controller.preset().label(),
                                self.controller.scale().pixels_per_hour(),
                                self.controller.resources().len()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(ui::theme::BG_DARK))
            .show(ctx, |ui| {
                ui::timeline_chart::show_timeline_chart(&mut self.controller, &mut self.chart, ui);
            });

        if let Some(deadline) = self.controller.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }
}
