use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::filter::BookingView;

/// File name offered by the export dialog unless configured otherwise.
pub const DEFAULT_EXPORT_NAME: &str = "filtered_data.csv";

/// Write the view as comma-delimited UTF-8 text with a header row.
///
/// Rows keep table order; missing values are empty fields.
pub fn write_csv<W: Write>(view: &BookingView<'_>, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(view.table.schema.names())
        .context("writing CSV header")?;
    for record in view.records() {
        out.write_record(record.values.iter().map(|v| v.to_field()))
            .context("writing CSV row")?;
    }
    out.flush().context("flushing CSV output")?;
    Ok(())
}

/// Export the view to `path`, returning the number of rows written.
pub fn export_to_path(view: &BookingView<'_>, path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(view, std::io::BufWriter::new(file))?;
    log::info!("Exported {} rows to {}", view.len(), path.display());
    Ok(view.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter_by_period;
    use crate::data::error::DataError;
    use crate::data::loader::{LoadOptions, load_delimited_reader, load_file};
    use crate::data::model::CellValue;
    use crate::data::model::tests::sample_dataset;

    #[test]
    fn test_round_trip_preserves_rows_and_values() {
        let ds = sample_dataset();
        let view = filter_by_period(&ds.table, 2015, "July");

        let mut buf = Vec::new();
        write_csv(&view, &mut buf).unwrap();
        let reloaded = load_delimited_reader(buf.as_slice(), b',', Some(&ds.table.schema)).unwrap();

        assert_eq!(reloaded.len(), view.len());
        assert_eq!(reloaded.table.schema, ds.table.schema);
        for (original, back) in view.records().zip(&reloaded.table.records) {
            assert_eq!(original, back);
        }
    }

    #[test]
    fn test_round_trip_keeps_text_column_that_looks_numeric() {
        let csv = concat!(
            "arrival_date_year,arrival_date_month,country,adr,market_segment,",
            "total_of_special_requests,room\n",
            "2015,July,PRT,80.0,Direct,0,12\n",
            "2015,August,GBR,95.5,Online TA,1,A1\n",
        );
        let ds = load_delimited_reader(csv.as_bytes(), b',', None).unwrap();
        let view = filter_by_period(&ds.table, 2015, "July");

        let mut buf = Vec::new();
        write_csv(&view, &mut buf).unwrap();
        let schema = &ds.table.schema;
        let reloaded = load_delimited_reader(buf.as_slice(), b',', Some(schema)).unwrap();

        let room = schema.index_of("room").unwrap();
        assert_eq!(reloaded.table.schema, *schema);
        assert_eq!(reloaded.table.records[0].values[room], CellValue::Text("12".into()));
        assert_eq!(reloaded.table.records[0], view.records().next().unwrap().clone());
    }

    #[test]
    fn test_reload_with_schema_rejects_other_columns() {
        let ds = sample_dataset();
        let csv = "arrival_date_year,arrival_date_month\n2015,July\n";
        let err = load_delimited_reader(csv.as_bytes(), b',', Some(&ds.table.schema)).unwrap_err();
        assert!(matches!(err.downcast_ref::<DataError>(), Some(DataError::Parse(_))));
    }

    #[test]
    fn test_empty_view_writes_header_only() {
        let ds = sample_dataset();
        let view = filter_by_period(&ds.table, 1990, "July");
        let mut buf = Vec::new();
        write_csv(&view, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("arrival_date_year,arrival_date_month,country,adr"));
    }

    #[test]
    fn test_export_to_path() {
        let ds = sample_dataset();
        let view = filter_by_period(&ds.table, 2015, "July");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_NAME);

        assert_eq!(export_to_path(&view, &path).unwrap(), 3);
        let reloaded = load_file(&path, &LoadOptions::default()).unwrap();
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.table.records[2].adr, 200.0);
    }
}
