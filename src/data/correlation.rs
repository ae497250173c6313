use super::error::{DataError, DataResult};
use super::filter::BookingView;

/// Outcome of a correlation request.
#[derive(Debug, Clone, PartialEq)]
pub enum Correlation {
    /// The caller chose no columns; nothing was computed.
    NoColumnsSelected,
    Matrix(CorrelationMatrix),
}

/// Symmetric Pearson matrix over the selected columns, in selection order.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` squared entries. NaN where undefined.
    pub values: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.size() + col]
    }
}

/// Pearson correlation between every pair of `columns` over the view.
///
/// Each pair uses only the rows where both fields are present. A pair with
/// fewer than two such rows, or where either side is constant, is NaN.
pub fn correlation_matrix(view: &BookingView<'_>, columns: &[String]) -> DataResult<Correlation> {
    if columns.is_empty() {
        return Ok(Correlation::NoColumnsSelected);
    }

    let schema = &view.table.schema;
    let series = columns
        .iter()
        .map(|name| {
            let idx = schema
                .index_of(name)
                .ok_or_else(|| DataError::UnknownColumn(name.clone()))?;
            if !schema.columns[idx].kind.is_numeric() {
                return Err(DataError::NotNumeric(name.clone()));
            }
            Ok(view
                .records()
                .map(|r| r.values.get(idx).and_then(|v| v.as_f64()))
                .collect::<Vec<Option<f64>>>())
        })
        .collect::<DataResult<Vec<_>>>()?;

    let n = columns.len();
    let mut values = vec![f64::NAN; n * n];
    for i in 0..n {
        for j in i..n {
            let r = match pearson(&series[i], &series[j]) {
                r if i == j && !r.is_nan() => 1.0,
                r => r,
            };
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }
    log::debug!("Correlation over {} columns, {} rows", n, view.len());

    Ok(Correlation::Matrix(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    }))
}

fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{row, schema};
    use crate::data::model::{BookingTable, COL_ADR, COL_MONTH, COL_SPECIAL_REQUESTS};

    fn table() -> BookingTable {
        BookingTable::from_rows(
            schema(),
            vec![
                row(2015, "July", Some("PRT"), 100.0, "Direct", 0, 10),
                row(2015, "July", Some("PRT"), 200.0, "Direct", 0, 20),
                row(2015, "July", Some("GBR"), 300.0, "Direct", 0, 30),
                row(2015, "July", Some("GBR"), 400.0, "Direct", 0, 5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_no_columns_selected() {
        let t = table();
        let view = BookingView::all(&t);
        assert_eq!(
            correlation_matrix(&view, &[]).unwrap(),
            Correlation::NoColumnsSelected
        );
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let t = table();
        let view = BookingView::all(&t);
        let cols = vec![COL_ADR.to_string(), "lead_time".to_string()];
        let Correlation::Matrix(m) = correlation_matrix(&view, &cols).unwrap() else {
            panic!("expected a matrix");
        };
        assert_eq!(m.size(), 2);
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(1, 1), 1.0);
        assert_eq!(m.get(0, 1), m.get(1, 0));
        assert!(m.get(0, 1) < 0.0 && m.get(0, 1) > -1.0);
    }

    #[test]
    fn test_constant_column_is_nan() {
        let t = table();
        let view = BookingView::all(&t);
        let cols = vec![COL_SPECIAL_REQUESTS.to_string(), COL_ADR.to_string()];
        let Correlation::Matrix(m) = correlation_matrix(&view, &cols).unwrap() else {
            panic!("expected a matrix");
        };
        assert!(m.get(0, 0).is_nan());
        assert!(m.get(0, 1).is_nan());
        assert_eq!(m.get(1, 1), 1.0);
    }

    #[test]
    fn test_perfect_linear_relation() {
        let xs = [Some(1.0), Some(2.0), Some(3.0), None];
        let ys = [Some(2.0), Some(4.0), Some(6.0), Some(100.0)];
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
        let neg = [Some(-1.0), Some(-2.0), Some(-3.0), Some(0.0)];
        assert!((pearson(&xs, &neg) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_text_and_unknown_columns() {
        let t = table();
        let view = BookingView::all(&t);
        assert!(matches!(
            correlation_matrix(&view, &[COL_MONTH.to_string()]),
            Err(DataError::NotNumeric(_))
        ));
        assert!(matches!(
            correlation_matrix(&view, &["nope".to_string()]),
            Err(DataError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_empty_view_gives_nan_matrix() {
        let t = table();
        let view = BookingView::from_indices(&t, Vec::new());
        let Correlation::Matrix(m) = correlation_matrix(&view, &[COL_ADR.to_string()]).unwrap()
        else {
            panic!("expected a matrix");
        };
        assert!(m.get(0, 0).is_nan());
    }
}
