use std::path::{Path, PathBuf};

use crate::color::YearColors;
use crate::config::Config;
use crate::data::aggregate::{
    CountryAdr, MonthlyCount, SegmentSplit, Summary, market_segment_split, mean_adr_by_country,
    monthly_trend, summarize, top_countries_by_mean_adr,
};
use crate::data::correlation::{Correlation, correlation_matrix};
use crate::data::error::DataError;
use crate::data::export::export_to_path;
use crate::data::filter::{BookingView, filter_by_period};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Per-selection report
// ---------------------------------------------------------------------------

/// Everything the dashboard draws for the current (year, month) selection.
/// Rebuilt from scratch on every selection change.
pub struct DashboardReport {
    /// Rows of the filtered view.
    pub indices: Vec<usize>,
    pub summary: Summary,
    pub top_countries: Vec<CountryAdr>,
    pub segments: SegmentSplit,
    pub adr_by_country: Vec<CountryAdr>,
    pub correlation: Result<Correlation, DataError>,
}

impl DashboardReport {
    fn build(view: &BookingView<'_>, top_k: usize, correlation_columns: &[String]) -> Self {
        let correlation = correlation_matrix(view, correlation_columns);
        if let Err(e) = &correlation {
            log::error!("Correlation failed: {e}");
        }
        DashboardReport {
            indices: view.indices.clone(),
            summary: summarize(view),
            top_countries: top_countries_by_mean_adr(view, top_k),
            segments: market_segment_split(view),
            adr_by_country: mean_adr_by_country(view),
            correlation,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, never modified.
    pub dataset: Dataset,
    pub source: PathBuf,

    /// Distinct years (ascending) and month names (first appearance).
    pub years: Vec<i64>,
    pub months: Vec<String>,
    pub selected_year: Option<i64>,
    pub selected_month: Option<String>,

    /// Numeric columns offered for correlation, and the chosen subset in
    /// table order.
    pub numeric_columns: Vec<String>,
    pub correlation_columns: Vec<String>,

    /// Bookings per (year, month) over the whole dataset.
    pub trend: Vec<MonthlyCount>,
    pub year_colors: YearColors,

    pub report: DashboardReport,

    pub top_k: usize,
    pub export_name: String,
    pub logo: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Dataset, source: PathBuf, config: &Config) -> Self {
        let years = dataset.years();
        let months = dataset.months();
        let numeric_columns = dataset.table.schema.numeric_columns();
        let trend = monthly_trend(&dataset);
        let year_colors = YearColors::new(&years);
        let selected_year = years.first().copied();
        let selected_month = months.first().cloned();

        let view = Self::select(&dataset, selected_year, selected_month.as_deref());
        let report = DashboardReport::build(
            &view,
            config.dashboard.top_countries,
            &numeric_columns,
        );

        AppState {
            source,
            years,
            months,
            selected_year,
            selected_month,
            correlation_columns: numeric_columns.clone(),
            numeric_columns,
            trend,
            year_colors,
            report,
            top_k: config.dashboard.top_countries,
            export_name: config.export.file_name.clone(),
            logo: config.ui.logo.clone(),
            status_message: None,
            dataset,
        }
    }

    fn select<'a>(dataset: &'a Dataset, year: Option<i64>, month: Option<&str>) -> BookingView<'a> {
        match (year, month) {
            (Some(year), Some(month)) => filter_by_period(&dataset.table, year, month),
            _ => BookingView::from_indices(&dataset.table, Vec::new()),
        }
    }

    /// The rows of the current selection.
    pub fn view(&self) -> BookingView<'_> {
        BookingView::from_indices(&self.dataset.table, self.report.indices.clone())
    }

    /// Recompute the filtered view and every aggregation.
    pub fn refresh(&mut self) {
        let view = Self::select(
            &self.dataset,
            self.selected_year,
            self.selected_month.as_deref(),
        );
        log::debug!(
            "Selection {:?}/{:?}: {} bookings",
            self.selected_year,
            self.selected_month,
            view.len()
        );
        self.report = DashboardReport::build(&view, self.top_k, &self.correlation_columns);
    }

    pub fn set_year(&mut self, year: i64) {
        if self.selected_year != Some(year) {
            self.selected_year = Some(year);
            self.refresh();
        }
    }

    pub fn set_month(&mut self, month: &str) {
        if self.selected_month.as_deref() != Some(month) {
            self.selected_month = Some(month.to_string());
            self.refresh();
        }
    }

    /// Toggle one correlation column, keeping table order.
    pub fn toggle_correlation_column(&mut self, column: &str) {
        let mut chosen: Vec<&str> = self.correlation_columns.iter().map(String::as_str).collect();
        if let Some(pos) = chosen.iter().position(|c| *c == column) {
            chosen.remove(pos);
        } else {
            chosen.push(column);
        }
        self.correlation_columns = self
            .numeric_columns
            .iter()
            .filter(|c| chosen.contains(&c.as_str()))
            .cloned()
            .collect();
        self.refresh();
    }

    pub fn select_all_correlation(&mut self) {
        self.correlation_columns = self.numeric_columns.clone();
        self.refresh();
    }

    pub fn select_none_correlation(&mut self) {
        self.correlation_columns.clear();
        self.refresh();
    }

    /// Write the current view to `path` and report the outcome in the status line.
    pub fn export_to(&mut self, path: &Path) {
        match export_to_path(&self.view(), path) {
            Ok(rows) => {
                self.status_message = Some(format!("Saved {rows} rows to {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    fn state() -> AppState {
        AppState::new(sample_dataset(), PathBuf::from("hotels.csv"), &Config::default())
    }

    #[test]
    fn test_initial_selection_is_first_year_and_month() {
        let s = state();
        assert_eq!(s.selected_year, Some(2015));
        assert_eq!(s.selected_month.as_deref(), Some("July"));
        assert_eq!(s.report.summary.bookings, 3);
        assert_eq!(s.correlation_columns, s.numeric_columns);
    }

    #[test]
    fn test_selection_change_refreshes_report_but_not_trend() {
        let mut s = state();
        let trend = s.trend.clone();
        s.set_year(2016);
        s.set_month("January");
        assert_eq!(s.report.summary.bookings, 1);
        assert_eq!(s.report.top_countries[0].country, "FRA");
        s.set_month("March");
        assert_eq!(s.report.summary.bookings, 0);
        assert_eq!(s.report.summary.mean_adr_label(), "-");
        assert_eq!(s.trend, trend);
    }

    #[test]
    fn test_correlation_selection() {
        let mut s = state();
        s.select_none_correlation();
        assert!(matches!(s.report.correlation, Ok(Correlation::NoColumnsSelected)));

        s.toggle_correlation_column("lead_time");
        s.toggle_correlation_column("adr");
        assert_eq!(s.correlation_columns, vec!["adr".to_string(), "lead_time".to_string()]);
        assert!(matches!(s.report.correlation, Ok(Correlation::Matrix(_))));

        s.toggle_correlation_column("adr");
        assert_eq!(s.correlation_columns, vec!["lead_time".to_string()]);
    }

    #[test]
    fn test_export_current_view() {
        let mut s = state();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        s.export_to(&path);
        assert!(s.status_message.as_deref().unwrap().starts_with("Saved 3 rows"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_export_failure_is_shown_in_status() {
        let mut s = state();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.csv");
        s.export_to(&path);
        let msg = s.status_message.as_deref().unwrap();
        assert!(msg.starts_with("Error"), "{msg}");
        assert!(!path.exists());
    }
}
