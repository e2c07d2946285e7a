use egui::{Color32, ComboBox, Context, RichText};

use super::App;
use crate::export::CSV_HEADER;
use crate::plotting::render_chart_cached;
use crate::types::{ChartKind, DerivedMetrics};

const POSITIVE_DELTA: Color32 = Color32::from_rgb(63, 182, 139);
const NEGATIVE_DELTA: Color32 = Color32::from_rgb(240, 99, 92);

/// Draw the main application UI
pub fn draw_ui(app: &mut App, ctx: &Context) {
    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        ui.heading("Display Options");
        ui.separator();

        ui.label("Chart type:");
        let prev_chart = app.selected_chart;
        let mut selected = app.selected_chart;
        ComboBox::new("chart_selector", "")
            .selected_text(selected.label())
            .show_ui(ui, |ui| {
                for kind in ChartKind::ALL {
                    ui.selectable_value(&mut selected, kind, kind.label());
                }
            });
        if prev_chart != selected {
            app.select_chart(selected);
        }

        ui.separator();
        ui.label("Random seed (blank = fresh sample):");
        let seed_response = ui.text_edit_singleline(&mut app.seed_input);
        if seed_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            app.apply_seed();
        }
        if ui.button("Apply Seed").clicked() {
            app.apply_seed();
        }
        if ui.button("Resample").clicked() {
            app.resample();
        }
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Sales Dashboard");
        ui.separator();

        if app.metrics.is_none() {
            app.refresh_metrics();
        }

        if let Some(error) = app.error_message.clone() {
            ui.colored_label(NEGATIVE_DELTA, error);
            ui.separator();
        }

        if let Some(metrics) = app.metrics.clone() {
            draw_metric_tiles(ui, &metrics);
            ui.separator();
        }

        ui.heading("Data Visualization");
        if let Some(texture) = &app.plot_texture {
            ui.image(texture);
        }

        ui.separator();
        ui.heading("Raw Data");
        draw_data_table(ui, app);

        ui.separator();
        if ui.button("Download CSV").clicked() {
            app.export_csv();
        }
        if let Some(status) = &app.export_status {
            ui.label(status);
        }
    });

    // Re-render the plot after any interaction that invalidated it
    if app.update_needed {
        update_plot(app, ctx);
        app.update_needed = false;
    }
}

fn draw_metric_tiles(ui: &mut egui::Ui, metrics: &DerivedMetrics) {
    ui.columns(4, |columns| {
        metric_tile(
            &mut columns[0],
            "Total Sales",
            format!("${}", format_thousands(metrics.total_sales)),
            Some(signed_thousands(metrics.sales_delta)),
        );
        metric_tile(
            &mut columns[1],
            "Avg Visitors",
            format!("{:.0}", metrics.mean_visitors),
            Some(format!("{:+.0}", metrics.visitors_delta)),
        );
        metric_tile(
            &mut columns[2],
            "Conversion Rate",
            format!("{:.2}%", metrics.mean_conversion_rate * 100.0),
            Some(format!("{:+.2}%", metrics.conversion_delta * 100.0)),
        );
        metric_tile(
            &mut columns[3],
            "Data Points",
            metrics.record_count.to_string(),
            None,
        );
    });
}

fn metric_tile(ui: &mut egui::Ui, label: &str, value: String, delta: Option<String>) {
    ui.label(label);
    ui.label(RichText::new(value).size(22.0).strong());
    if let Some(delta) = delta {
        let color = if delta.starts_with('-') {
            NEGATIVE_DELTA
        } else {
            POSITIVE_DELTA
        };
        ui.colored_label(color, delta);
    }
}

fn draw_data_table(ui: &mut egui::Ui, app: &App) {
    let Some(records) = app.cache.get(&app.params) else {
        ui.label("No data generated yet.");
        return;
    };

    egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
        egui::Grid::new("raw_data_grid")
            .striped(true)
            .min_col_width(90.0)
            .show(ui, |ui| {
                for header in CSV_HEADER {
                    ui.strong(header);
                }
                ui.end_row();

                for record in records {
                    ui.label(record.date.to_string());
                    ui.label(format!("{:.2}", record.sales));
                    ui.label(format!("{:.1}", record.visitors));
                    ui.label(format!("{:.4}", record.conversion_rate));
                    ui.label(record.category.to_string());
                    ui.end_row();
                }
            });
    });
}

fn update_plot(app: &mut App, ctx: &Context) {
    let rendered = match app.cache.dataset(&app.params) {
        Ok(records) => render_chart_cached(app.selected_chart, records, &app.plot_path),
        Err(e) => Err(e.into()),
    };

    match rendered {
        Ok(bytes) => load_plot_texture(app, ctx, &bytes),
        Err(e) => {
            eprintln!("Plotting error: {e}");
            app.error_message = Some(format!("Plotting error: {e}"));
        }
    }
}

fn load_plot_texture(app: &mut App, ctx: &Context, bytes: &[u8]) {
    match image::load_from_memory(bytes) {
        Ok(image) => {
            let size = [image.width() as usize, image.height() as usize];
            let pixels = image.to_rgba8();
            let pixels = pixels.as_flat_samples();
            let texture = ctx.load_texture(
                "plot_texture",
                egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()),
                egui::TextureOptions::LINEAR,
            );
            app.plot_texture = Some(texture);
        }
        Err(e) => eprintln!("Failed to decode plot image: {e}"),
    }
}

/// `1234567.8` -> `"1,234,568"`.
fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Like [`format_thousands`] but always carries an explicit sign.
fn signed_thousands(value: f64) -> String {
    if value.round() < 0.0 {
        format_thousands(value)
    } else {
        format!("+{}", format_thousands(value))
    }
}
