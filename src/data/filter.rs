use super::model::{BookingRecord, BookingTable};

// ---------------------------------------------------------------------------
// Filtered view: the rows matching the selected arrival period
// ---------------------------------------------------------------------------

/// A borrowed subset of a [`BookingTable`], kept as row indices in table order.
#[derive(Debug, Clone)]
pub struct BookingView<'a> {
    pub table: &'a BookingTable,
    pub indices: Vec<usize>,
}

impl<'a> BookingView<'a> {
    /// View over every row of the table.
    #[cfg(test)]
    pub fn all(table: &'a BookingTable) -> Self {
        BookingView {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    pub fn from_indices(table: &'a BookingTable, indices: Vec<usize>) -> Self {
        BookingView { table, indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a BookingRecord> + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| &table.records[i])
    }
}

/// Rows whose arrival year and month name equal the selection.
///
/// An empty result is valid; every aggregation handles it.
pub fn filter_by_period<'a>(table: &'a BookingTable, year: i64, month: &str) -> BookingView<'a> {
    let indices = table
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.arrival_year == year && r.arrival_month == month)
        .map(|(i, _)| i)
        .collect();
    BookingView::from_indices(table, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    #[test]
    fn test_filter_matches_year_and_month() {
        let ds = sample_dataset();
        let view = filter_by_period(&ds.table, 2015, "July");
        assert_eq!(view.indices, vec![0, 1, 2]);
        assert!(view.records().all(|r| r.arrival_year == 2015 && r.arrival_month == "July"));
    }

    #[test]
    fn test_absent_period_is_empty() {
        let ds = sample_dataset();
        assert!(filter_by_period(&ds.table, 2015, "March").is_empty());
        assert!(filter_by_period(&ds.table, 1999, "July").is_empty());
    }

    #[test]
    fn test_view_all_covers_table() {
        let ds = sample_dataset();
        let view = BookingView::all(&ds.table);
        assert_eq!(view.len(), ds.len());
    }
}
