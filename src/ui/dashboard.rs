use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::data::correlation::Correlation;
use crate::state::AppState;
use crate::ui::{heatmap, pie, plot};

// ---------------------------------------------------------------------------
// Central panel – metrics and charts
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Hotel Booking Dashboard");
            ui.add_space(8.0);
            metric_cards(ui, state);

            section(ui, "Average ADR per Country");
            plot::adr_bar_chart(ui, &state.report.top_countries);

            section(ui, "Market Segment Share");
            pie::segment_pie(ui, &state.report.segments);

            section(ui, "Monthly Booking Trend");
            plot::monthly_trend_chart(ui, &state.trend, &state.year_colors);

            section(ui, "ADR Bubble Map by Country");
            plot::adr_bubble_map(ui, &state.report.adr_by_country);

            section(ui, "Correlation Heatmap");
            match &state.report.correlation {
                Ok(Correlation::Matrix(matrix)) => heatmap::correlation_heatmap(ui, matrix),
                Ok(Correlation::NoColumnsSelected) => {
                    ui.label(
                        "Please select at least one column to display the correlation heatmap.",
                    );
                }
                Err(e) => {
                    ui.colored_label(egui::Color32::RED, format!("Error: {e}"));
                }
            }
            ui.add_space(16.0);
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.separator();
    ui.label(RichText::new(title).heading());
    ui.add_space(4.0);
}

fn metric_cards(ui: &mut Ui, state: &AppState) {
    let summary = &state.report.summary;
    let cards = [
        ("Total Bookings", summary.bookings.to_string()),
        ("Countries", summary.countries.to_string()),
        ("Avg. ADR", summary.mean_adr_label()),
        ("Max Special Requests", summary.max_special_requests_label()),
    ];
    ui.columns(cards.len(), |columns: &mut [Ui]| {
        for (ui, (label, value)) in columns.iter_mut().zip(cards) {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new(label).small());
                ui.label(RichText::new(value).size(24.0).strong());
            });
        }
    });
}
