//! Sales Dashboard
//!
//! A GUI application for exploring a synthetic sales dataset: summary
//! metrics, four chart modes, a raw data table, and CSV export.

use anyhow::{anyhow, Result};
use eframe::egui;

use salesdash::app::App;

fn main() -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Sales Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Dashboard",
        options,
        Box::new(|cc| {
            // Configure default fonts and style
            let fonts = egui::FontDefinitions::default();
            cc.egui_ctx.set_fonts(fonts);

            Ok(Box::new(App::default()) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| anyhow!("failed to run the dashboard: {e}"))?;

    Ok(())
}
