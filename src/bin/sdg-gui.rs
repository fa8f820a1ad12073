/*!
 * Desktop dashboard for sdg-tracker
 *
 * Pick a country and a sustainability indicator and see its yearly values as
 * a bar chart coloured by the indicator's Sustainable Development Goal.
 *
 * All fetching goes through `Dashboard`, which runs requests in background
 * threads and only ever applies the response for the latest selection.
 */

use eframe::egui;
use sdg_tracker::catalog::{Rgb, sdg_color, sdg_goal};
use sdg_tracker::{Dashboard, SeriesResult, Settings, ViewState, stats};
use std::time::Duration;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Sustainable Development Goals Tracker"),
        ..Default::default()
    };

    let dashboard = Dashboard::with_settings(Settings::from_env())
        .map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;

    eframe::run_native(
        "SDG Tracker",
        options,
        Box::new(move |_cc| {
            let mut app = SdgApp { dashboard };
            app.dashboard.start();
            Ok(Box::new(app))
        }),
    )
}

struct SdgApp {
    dashboard: Dashboard<sdg_tracker::Client>,
}

fn color(c: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(c.r, c.g, c.b)
}

impl eframe::App for SdgApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.dashboard.poll() {
            ctx.request_repaint();
        }
        if self.dashboard.state().is_loading() || self.dashboard.catalog_loading() {
            // keep polling while requests are in flight
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Sustainable Development Goals Tracker");
                ui.label("Tracking global progress towards a sustainable future");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.controls(ui);
                ui.add_space(10.0);
                self.cards(ui);
                ui.add_space(10.0);
                self.series_area(ui);
            });
        });
    }
}

impl SdgApp {
    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label("Search countries:");
                let mut search = self.dashboard.selection().search.clone();
                if ui
                    .text_edit_singleline(&mut search)
                    .on_hover_text("Filter the country list by name")
                    .changed()
                {
                    self.dashboard.set_search(&search);
                }
            });

            if let Some(msg) = self.dashboard.catalog_error() {
                ui.colored_label(egui::Color32::RED, msg);
            }

            let selected_country = self.dashboard.selection().country.clone();
            let selected_label = self
                .dashboard
                .current_country()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| selected_country.clone());
            let options: Vec<(String, String)> = self
                .dashboard
                .filtered_countries()
                .into_iter()
                .map(|c| (c.id.clone(), c.name.clone()))
                .collect();

            let mut picked_country = None;
            ui.horizontal(|ui| {
                ui.label("Country:");
                egui::ComboBox::from_id_salt("country")
                    .selected_text(selected_label)
                    .width(320.0)
                    .show_ui(ui, |ui| {
                        for (id, name) in &options {
                            if ui.selectable_label(*id == selected_country, name.as_str()).clicked() {
                                picked_country = Some(id.clone());
                            }
                        }
                    });
            });
            if let Some(id) = picked_country {
                self.dashboard.select_country(&id);
            }

            let selected_indicator = self.dashboard.selection().indicator.clone();
            let mut picked_indicator = None;
            ui.horizontal(|ui| {
                ui.label("Indicator:");
                let label = self
                    .dashboard
                    .current_indicator()
                    .map(|i| format!("{} (SDG {})", i.name, i.sdg))
                    .unwrap_or_else(|| selected_indicator.clone());
                egui::ComboBox::from_id_salt("indicator")
                    .selected_text(label)
                    .width(420.0)
                    .show_ui(ui, |ui| {
                        for ind in self.dashboard.indicators() {
                            let text = format!("{} (SDG {})", ind.name, ind.sdg);
                            if ui
                                .selectable_label(ind.code == selected_indicator, text)
                                .clicked()
                            {
                                picked_indicator = Some(ind.code);
                            }
                        }
                    });
            });
            if let Some(code) = picked_indicator {
                self.dashboard.select_indicator(code);
            }
        });
    }

    fn cards(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Sustainable Development Goals").strong());
        let selected = self.dashboard.selection().indicator.clone();
        let mut picked = None;
        ui.horizontal_wrapped(|ui| {
            for ind in self.dashboard.indicators() {
                let c = color(sdg_color(ind.sdg));
                let is_selected = ind.code == selected;
                let text = egui::RichText::new(format!("SDG {}\n{}", ind.sdg, ind.name)).color(
                    if is_selected {
                        egui::Color32::WHITE
                    } else {
                        c
                    },
                );
                let button = egui::Button::new(text)
                    .fill(if is_selected {
                        c
                    } else {
                        egui::Color32::TRANSPARENT
                    })
                    .stroke(egui::Stroke::new(2.0, c))
                    .min_size(egui::vec2(200.0, 60.0));
                let resp = ui
                    .add(button)
                    .on_hover_text(sdg_goal(ind.sdg).unwrap_or_default());
                if resp.clicked() {
                    picked = Some(ind.code);
                }
            }
        });
        if let Some(code) = picked {
            self.dashboard.select_indicator(code);
        }
    }

    fn series_area(&mut self, ui: &mut egui::Ui) {
        match self.dashboard.state().clone() {
            ViewState::Idle => {
                ui.label("Select a country and an indicator.");
            }
            ViewState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading data...");
                });
            }
            ViewState::Error(msg) => {
                ui.colored_label(egui::Color32::RED, msg);
                if ui.button("Retry").clicked() {
                    self.dashboard.retry();
                }
            }
            ViewState::Loaded(series) if !series.has_data() => {
                let country = self
                    .dashboard
                    .current_country()
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "selected country".to_string());
                let indicator = self
                    .dashboard
                    .current_indicator()
                    .map(|i| i.name)
                    .unwrap_or("selected indicator");
                ui.label(format!("No data available for {country} on {indicator}."));
                ui.label("Try selecting a different country or indicator.");
            }
            ViewState::Loaded(series) => self.chart(ui, &series),
        }
    }

    fn chart(&self, ui: &mut egui::Ui, series: &SeriesResult) {
        let (name, sdg) = self
            .dashboard
            .current_indicator()
            .map(|i| (i.name, i.sdg))
            .unwrap_or((series.indicator.as_str(), 0));
        let country = self
            .dashboard
            .current_country()
            .map(|c| c.name.as_str())
            .unwrap_or(series.country.as_str());
        let bar_color = color(sdg_color(sdg));

        ui.heading(name);
        ui.label(format!("Country: {country}"));

        let obs = series.observations();
        let chart_max = stats::chart_max(series);
        let desired = egui::vec2(ui.available_width().max(200.0), 320.0);
        let (response, painter) = ui.allocate_painter(desired, egui::Sense::hover());
        let rect = response.rect;

        let label_band = 36.0;
        let value_band = 18.0;
        let plot = egui::Rect::from_min_max(
            egui::pos2(rect.left() + 4.0, rect.top() + value_band),
            egui::pos2(rect.right() - 4.0, rect.bottom() - label_band),
        );
        let axis = egui::Stroke::new(2.0, egui::Color32::from_gray(200));
        painter.line_segment([plot.left_bottom(), plot.right_bottom()], axis);
        painter.line_segment([plot.left_top(), plot.left_bottom()], axis);

        let slot = plot.width() / obs.len() as f32;
        let bar_w = (slot * 0.8).clamp(4.0, 60.0);
        let text_color = ui.visuals().text_color();
        for (i, o) in obs.iter().enumerate() {
            let frac = stats::bar_fraction(o.value, chart_max, 0.05) as f32;
            let cx = plot.left() + slot * (i as f32 + 0.5);
            let top = plot.bottom() - frac * plot.height();
            let bar = egui::Rect::from_min_max(
                egui::pos2(cx - bar_w / 2.0, top),
                egui::pos2(cx + bar_w / 2.0, plot.bottom()),
            );
            painter.rect_filled(bar, 4.0, bar_color);
            painter.text(
                egui::pos2(cx, top - 2.0),
                egui::Align2::CENTER_BOTTOM,
                stats::format_value(o.value, 2, "en"),
                egui::FontId::proportional(10.0),
                text_color,
            );
            painter.text(
                egui::pos2(cx, plot.bottom() + 4.0),
                egui::Align2::CENTER_TOP,
                &o.date,
                egui::FontId::proportional(11.0),
                text_color,
            );
        }

        ui.vertical_centered(|ui| {
            ui.label("Year");
        });
        ui.add_space(6.0);
        ui.label(format!("SDG {sdg} Indicator: {name}"));
        ui.label("Data shown for years with available measurements");
        if series.is_truncated() {
            ui.colored_label(
                egui::Color32::from_rgb(0xB0, 0x70, 0x00),
                format!(
                    "Showing the first of {} pages of data; set SDG_FOLLOW_PAGES=1 to fetch all",
                    series.pages
                ),
            );
        }
    }
}
