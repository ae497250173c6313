use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::color::{Gradient, YearColors};
use crate::data::aggregate::{CountryAdr, MonthlyCount};
use crate::data::model::MONTH_NAMES;
use crate::geo;

const CHART_HEIGHT: f32 = 300.0;

/// Label for an integer-valued axis mark, or nothing between marks.
fn index_label(mark: &GridMark, labels: &[String]) -> String {
    let rounded = mark.value.round();
    if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Top countries by mean ADR
// ---------------------------------------------------------------------------

pub fn adr_bar_chart(ui: &mut Ui, top: &[CountryAdr]) {
    if top.is_empty() {
        ui.label("No bookings for this period.");
        return;
    }

    let labels: Vec<String> = top.iter().map(|c| c.country.clone()).collect();
    let bars: Vec<Bar> = top
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as f64, c.mean_adr)
                .name(&c.country)
                .width(0.6)
                .fill(Color32::from_rgb(0x87, 0xce, 0xeb))
        })
        .collect();

    Plot::new("adr_bar_chart")
        .height(CHART_HEIGHT)
        .y_axis_label("Average ADR ($)")
        .x_axis_formatter(move |mark, _range| index_label(&mark, &labels))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Average ADR"));
        });
}

// ---------------------------------------------------------------------------
// Monthly trend: one line per arrival year
// ---------------------------------------------------------------------------

pub fn monthly_trend_chart(ui: &mut Ui, trend: &[MonthlyCount], colors: &YearColors) {
    // Month 1 sits at index 1, so pad the front.
    let labels: Vec<String> = std::iter::once(String::new())
        .chain(MONTH_NAMES.iter().map(|m| m.to_string()))
        .collect();

    let mut years: Vec<i64> = trend.iter().map(|m| m.year).collect();
    years.dedup();

    Plot::new("monthly_trend")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Month")
        .y_axis_label("Bookings")
        .x_axis_formatter(move |mark, _range| index_label(&mark, &labels))
        .include_x(1.0)
        .include_x(12.0)
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for year in years {
                let series: Vec<[f64; 2]> = trend
                    .iter()
                    .filter(|m| m.year == year)
                    .map(|m| [m.month as f64, m.bookings as f64])
                    .collect();
                let color = colors.color_for(year);
                let name = year.to_string();

                plot_ui.line(
                    Line::new(PlotPoints::from(series.clone()))
                        .name(&name)
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(series))
                        .name(&name)
                        .color(color)
                        .shape(MarkerShape::Circle)
                        .radius(4.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// ADR bubble map
// ---------------------------------------------------------------------------

const MIN_RADIUS: f32 = 3.0;
const MAX_RADIUS: f32 = 18.0;

/// Equirectangular scatter of country centroids, coloured and sized by mean ADR.
pub fn adr_bubble_map(ui: &mut Ui, by_country: &[CountryAdr]) {
    let (placed, unplaced) = geo::place(by_country);
    let min = placed.iter().map(|p| p.mean_adr).fold(f64::INFINITY, f64::min);
    let max = placed.iter().map(|p| p.mean_adr).fold(f64::NEG_INFINITY, f64::max);
    let scale = Gradient::plasma();

    Plot::new("adr_bubble_map")
        .height(CHART_HEIGHT * 1.3)
        .data_aspect(1.0)
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-60.0)
        .include_y(80.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .label_formatter(|name, value| {
            if name.is_empty() {
                format!("{:.1}°, {:.1}°", value.x, value.y)
            } else {
                name.to_string()
            }
        })
        .show(ui, |plot_ui| {
            for p in &placed {
                let t = if max > min { (p.mean_adr - min) / (max - min) } else { 1.0 };
                let radius = MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * t.clamp(0.0, 1.0) as f32;
                plot_ui.points(
                    Points::new(vec![[p.lon, p.lat]])
                        .name(format!("{}: ${:.2}", p.country, p.mean_adr))
                        .color(scale.sample_range(p.mean_adr, min, max))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(radius),
                );
            }
        });

    if !unplaced.is_empty() {
        ui.small(format!("Not on map: {}", unplaced.join(", ")));
    }
}
