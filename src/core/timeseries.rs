use crate::models::{DataPoint, PriceSeries};
use chrono::NaiveDate;
use serde::Serialize;

/// One row of the aligned price table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MultiAlignedData {
    pub date: NaiveDate,
    pub values: Vec<f64>,
}

/// Aligns several series onto the master's trading calendar.
///
/// Each master date takes, from every other series, the last value observed on
/// or before that date (forward fill). Master dates before a series' first
/// observation take that first observation (backward fill). Dates are compared
/// as calendar days, so points must already carry their exchange-local date.
///
/// Returns nothing if any input series is empty.
pub fn align_series_multi(master: &[DataPoint], others: &[&[DataPoint]]) -> Vec<MultiAlignedData> {
    if master.is_empty() || others.iter().any(|s| s.is_empty()) {
        return Vec::new();
    }

    // Cursor per series; inputs are date-ascending.
    let mut cursors = vec![0usize; others.len()];
    let mut result = Vec::with_capacity(master.len());

    for dp in master {
        let date = dp.date();
        let mut values = Vec::with_capacity(others.len() + 1);
        values.push(dp.value);

        for (series, cursor) in others.iter().zip(cursors.iter_mut()) {
            while *cursor + 1 < series.len() && series[*cursor + 1].date() <= date {
                *cursor += 1;
            }
            // Before the first observation the cursor still points at index 0,
            // which is exactly the backward fill.
            values.push(series[*cursor].value);
        }

        result.push(MultiAlignedData { date, values });
    }

    result
}

/// Rebuilds one column of an aligned table as a `PriceSeries`.
pub fn column(symbol: &str, rows: &[MultiAlignedData], idx: usize) -> PriceSeries {
    let points = rows
        .iter()
        .filter_map(|row| row.values.get(idx).map(|v| DataPoint::on_date(row.date, *v)))
        .collect();
    PriceSeries::new(symbol, points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dp(date: &str, value: f64) -> DataPoint {
        DataPoint::on_date(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), value)
    }

    #[test]
    fn test_forward_and_backward_fill() {
        let master = vec![
            dp("2024-01-01", 10.0),
            dp("2024-01-02", 11.0),
            dp("2024-01-03", 12.0),
            dp("2024-01-04", 13.0),
        ];
        // Starts late and skips the 3rd
        let fx = vec![dp("2024-01-02", 5.0), dp("2024-01-04", 5.2)];

        let rows = align_series_multi(&master, &[&fx]);
        let fx_col: Vec<f64> = rows.iter().map(|r| r.values[1]).collect();

        assert_eq!(rows.len(), 4);
        assert_eq!(fx_col, vec![5.0, 5.0, 5.0, 5.2]);
    }

    #[test]
    fn test_other_dates_are_not_added() {
        let master = vec![dp("2024-01-02", 10.0), dp("2024-01-04", 11.0)];
        let fx = vec![dp("2024-01-01", 1.0), dp("2024-01-03", 2.0), dp("2024-01-05", 3.0)];

        let rows = align_series_multi(&master, &[&fx]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].values, vec![10.0, 1.0]);
        assert_eq!(rows[1].values, vec![11.0, 2.0]);
    }

    #[test]
    fn test_london_stamped_fx_has_no_lookahead() {
        use crate::fetcher::yahoo::session_date;

        let bar = |ts: &str, offset: i32, value: f64| {
            let epoch = chrono::DateTime::parse_from_rfc3339(ts).unwrap().timestamp();
            DataPoint::on_date(session_date(epoch, offset).unwrap(), value)
        };

        // NYSE opens, and BST-midnight FX bars for Mon/Tue/Wed
        let equity = vec![
            bar("2024-07-01T13:30:00Z", -14400, 10.0),
            bar("2024-07-02T13:30:00Z", -14400, 11.0),
        ];
        let fx = vec![
            bar("2024-06-30T23:00:00Z", 3600, 5.0),
            bar("2024-07-01T23:00:00Z", 3600, 5.1),
            bar("2024-07-02T23:00:00Z", 3600, 5.2),
        ];

        let rows = align_series_multi(&equity, &[&fx]);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(rows[0].values, vec![10.0, 5.0]);
        assert_eq!(rows[1].values, vec![11.0, 5.1]);
    }

    #[test]
    fn test_empty_other_series_yields_nothing() {
        let master = vec![dp("2024-01-01", 10.0)];
        let empty: Vec<DataPoint> = Vec::new();
        assert!(align_series_multi(&master, &[&empty]).is_empty());
    }

    #[test]
    fn test_column_roundtrip() {
        let master = vec![dp("2024-01-01", 10.0), dp("2024-01-02", 11.0)];
        let fx = vec![dp("2024-01-01", 4.0), dp("2024-01-02", 4.4)];
        let rows = align_series_multi(&master, &[&fx]);

        let col = column("BRL=X", &rows, 1);
        assert_eq!(col.values(), vec![4.0, 4.4]);
        assert_eq!(col.symbol(), "BRL=X");
    }
}
