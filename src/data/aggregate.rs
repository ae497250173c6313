//! Aggregations feeding the dashboard widgets.
//!
//! Every function takes a view (or the whole dataset) by reference and
//! returns freshly computed values; nothing here mutates its input.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::filter::BookingView;
use super::model::Dataset;

/// Market segment counted on its own in the segment split.
pub const ONLINE_TA: &str = "Online TA";

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// The four headline numbers shown above the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub bookings: usize,
    pub countries: usize,
    /// `None` for an empty view.
    pub mean_adr: Option<f64>,
    pub max_special_requests: Option<i64>,
}

impl Summary {
    pub fn mean_adr_label(&self) -> String {
        match self.mean_adr {
            Some(v) if v.is_finite() => format!("${v:.2}"),
            _ => "-".to_string(),
        }
    }

    pub fn max_special_requests_label(&self) -> String {
        self.max_special_requests
            .map_or_else(|| "-".to_string(), |n| n.to_string())
    }
}

pub fn summarize(view: &BookingView<'_>) -> Summary {
    let countries: BTreeSet<&str> = view.records().filter_map(|r| r.country.as_deref()).collect();
    let adr_sum: f64 = view.records().map(|r| r.adr).sum();
    Summary {
        bookings: view.len(),
        countries: countries.len(),
        mean_adr: (!view.is_empty()).then(|| adr_sum / view.len() as f64),
        max_special_requests: view.records().map(|r| r.special_requests).max(),
    }
}

// ---------------------------------------------------------------------------
// ADR per country
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CountryAdr {
    pub country: String,
    pub mean_adr: f64,
}

/// Mean ADR per country, groups in order of first appearance.
fn grouped_mean_adr(view: &BookingView<'_>) -> Vec<CountryAdr> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, f64, usize)> = Vec::new();
    for record in view.records() {
        let Some(country) = record.country.as_deref() else {
            continue;
        };
        let slot = *slots.entry(country).or_insert_with(|| {
            groups.push((country, 0.0, 0));
            groups.len() - 1
        });
        groups[slot].1 += record.adr;
        groups[slot].2 += 1;
    }
    groups
        .into_iter()
        .map(|(country, sum, n)| CountryAdr {
            country: country.to_string(),
            mean_adr: sum / n as f64,
        })
        .collect()
}

/// The `k` countries with the highest mean ADR, highest first.
///
/// Equal means keep the order in which the countries first appear.
pub fn top_countries_by_mean_adr(view: &BookingView<'_>, k: usize) -> Vec<CountryAdr> {
    let mut groups = grouped_mean_adr(view);
    groups.sort_by(|a, b| b.mean_adr.total_cmp(&a.mean_adr));
    groups.truncate(k);
    groups
}

/// Mean ADR for every country present in the view, ordered by country code.
pub fn mean_adr_by_country(view: &BookingView<'_>) -> Vec<CountryAdr> {
    let mut groups = grouped_mean_adr(view);
    groups.sort_by(|a, b| a.country.cmp(&b.country));
    groups
}

// ---------------------------------------------------------------------------
// Market segment split
// ---------------------------------------------------------------------------

/// Bookings from online travel agents versus every other segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSplit {
    pub online_ta: usize,
    pub other: usize,
}

impl SegmentSplit {
    pub fn total(&self) -> usize {
        self.online_ta + self.other
    }

    /// Pie slices as labelled on the published dashboard.
    ///
    /// The "Online TA" slice carries the count of every other segment and
    /// "Other" carries the Online TA count. Kept as shipped; see DESIGN.md.
    pub fn chart_slices(&self) -> [(&'static str, usize); 2] {
        [(ONLINE_TA, self.other), ("Other", self.online_ta)]
    }
}

pub fn market_segment_split(view: &BookingView<'_>) -> SegmentSplit {
    let online_ta = view
        .records()
        .filter(|r| r.market_segment == ONLINE_TA)
        .count();
    SegmentSplit {
        online_ta,
        other: view.len() - online_ta,
    }
}

// ---------------------------------------------------------------------------
// Monthly trend over the whole dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyCount {
    pub year: i64,
    /// 1..=12
    pub month: u32,
    pub bookings: usize,
}

/// Bookings per (year, calendar month) across the entire dataset, ordered
/// by year then month. Rows whose month name is not a calendar month are
/// not counted.
pub fn monthly_trend(dataset: &Dataset) -> Vec<MonthlyCount> {
    let mut counts: BTreeMap<(i64, u32), usize> = BTreeMap::new();
    for (record, month) in dataset.table.records.iter().zip(&dataset.month_numbers) {
        if let Some(month) = month {
            *counts.entry((record.arrival_year, *month)).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|((year, month), bookings)| MonthlyCount {
            year,
            month,
            bookings,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter_by_period;
    use crate::data::model::tests::{row, sample_dataset, schema};
    use crate::data::model::BookingTable;

    fn table(rows: Vec<Vec<crate::data::model::CellValue>>) -> BookingTable {
        BookingTable::from_rows(schema(), rows).unwrap()
    }

    #[test]
    fn test_empty_view_summary() {
        let ds = sample_dataset();
        let view = filter_by_period(&ds.table, 2020, "July");
        let summary = summarize(&view);
        assert_eq!(summary.bookings, 0);
        assert_eq!(summary.countries, 0);
        assert_eq!(summary.mean_adr, None);
        assert_eq!(summary.mean_adr_label(), "-");
        assert_eq!(summary.max_special_requests_label(), "-");
        assert!(top_countries_by_mean_adr(&view, 10).is_empty());
        assert!(mean_adr_by_country(&view).is_empty());
        assert_eq!(market_segment_split(&view).total(), 0);
    }

    #[test]
    fn test_summary_counts() {
        let ds = sample_dataset();
        let view = filter_by_period(&ds.table, 2015, "July");
        let summary = summarize(&view);
        assert_eq!(summary.bookings, 3);
        assert_eq!(summary.countries, 2);
        assert_eq!(summary.mean_adr_label(), "$125.00");
        assert_eq!(summary.max_special_requests, Some(2));
    }

    #[test]
    fn test_single_country_mean() {
        let t = table(vec![
            row(2015, "July", Some("PRT"), 100.0, "Direct", 0, 1),
            row(2015, "July", Some("PRT"), 200.0, "Direct", 0, 1),
            row(2015, "July", Some("PRT"), 300.0, "Direct", 0, 1),
        ]);
        let top = top_countries_by_mean_adr(&BookingView::all(&t), 10);
        assert_eq!(
            top,
            vec![CountryAdr {
                country: "PRT".into(),
                mean_adr: 200.0
            }]
        );
    }

    #[test]
    fn test_top_countries_sorted_truncated_and_stable() {
        let codes = [
            "AAA", "BBB", "CCC", "DDD", "EEE", "FFF", "GGG", "HHH", "III", "JJJ", "KKK", "LLL",
        ];
        let mut rows: Vec<_> = codes
            .iter()
            .enumerate()
            .map(|(i, c)| row(2016, "May", Some(*c), 10.0 * i as f64, "Direct", 0, 1))
            .collect();
        // Ties with BBB at 10.0, appearing after it.
        rows.push(row(2016, "May", Some("ZZZ"), 10.0, "Direct", 0, 1));
        rows.push(row(2016, "May", None, 1_000.0, "Direct", 0, 1));
        let t = table(rows);
        let view = BookingView::all(&t);

        let top = top_countries_by_mean_adr(&view, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].country, "LLL");
        assert!(top.windows(2).all(|w| w[0].mean_adr >= w[1].mean_adr));
        assert!(top.iter().all(|c| {
            t.records
                .iter()
                .any(|r| r.country.as_deref() == Some(c.country.as_str()))
        }));

        let all = top_countries_by_mean_adr(&view, 20);
        let bbb = all.iter().position(|c| c.country == "BBB").unwrap();
        let zzz = all.iter().position(|c| c.country == "ZZZ").unwrap();
        assert_eq!(zzz, bbb + 1);
    }

    #[test]
    fn test_mean_adr_by_country_one_row_per_country() {
        let ds = sample_dataset();
        let by_country = mean_adr_by_country(&BookingView::all(&ds.table));
        let codes: Vec<_> = by_country.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(codes, vec!["ESP", "FRA", "GBR", "PRT"]);
        assert_eq!(by_country[3].mean_adr, 200.0);
    }

    #[test]
    fn test_segment_split_sums_to_view() {
        let ds = sample_dataset();
        for (year, month) in [(2015, "July"), (2016, "July"), (2016, "January"), (2017, "May")] {
            let view = filter_by_period(&ds.table, year, month);
            assert_eq!(market_segment_split(&view).total(), view.len());
        }
        let split = market_segment_split(&BookingView::all(&ds.table));
        assert_eq!(split, SegmentSplit { online_ta: 3, other: 4 });
    }

    #[test]
    fn test_chart_slices_keep_published_labels() {
        let split = SegmentSplit { online_ta: 3, other: 4 };
        assert_eq!(split.chart_slices(), [("Online TA", 4), ("Other", 3)]);
    }

    #[test]
    fn test_monthly_trend_covers_full_dataset() {
        let ds = sample_dataset();
        let trend = monthly_trend(&ds);
        let total: usize = trend.iter().map(|m| m.bookings).sum();
        assert_eq!(total, ds.len());
        assert_eq!(
            trend[0],
            MonthlyCount {
                year: 2015,
                month: 7,
                bookings: 3
            }
        );
        assert_eq!(trend[1].month, 8);
        assert_eq!((trend[2].year, trend[2].month), (2016, 1));
    }

    #[test]
    fn test_monthly_trend_skips_unknown_month_names() {
        let t = table(vec![
            row(2015, "July", Some("PRT"), 1.0, "Direct", 0, 1),
            row(2015, "Julember", Some("PRT"), 1.0, "Direct", 0, 1),
        ]);
        let trend = monthly_trend(&Dataset::new(t));
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].bookings, 1);
    }
}
