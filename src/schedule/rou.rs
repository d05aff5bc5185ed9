//! Right-of-use asset straight-line depreciation

use chrono::NaiveDate;

use super::rows::{month_date, month_label, RouRow};
use crate::error::{LeaseError, LeaseResult};

/// Depreciate the opening ROU asset evenly over `num_months`
///
/// Net value is left unclamped and has no final-month override: it reaches
/// zero in the last month up to floating-point rounding.
pub fn depreciate_rou(
    opening_rou_value: f64,
    num_months: usize,
    start_date: NaiveDate,
) -> LeaseResult<Vec<RouRow>> {
    if num_months == 0 {
        return Err(LeaseError::DegenerateTerm(
            "ROU schedule needs at least one month".to_string(),
        ));
    }

    let depreciation = opening_rou_value / num_months as f64;
    let mut accumulated_depreciation = 0.0;
    let mut rows = Vec::with_capacity(num_months);

    for month_index in 0..num_months {
        accumulated_depreciation += depreciation;

        rows.push(RouRow {
            month_index,
            month: month_label(month_date(start_date, month_index)?),
            asset_value: opening_rou_value,
            depreciation,
            accumulated_depreciation,
            net_value: opening_rou_value - accumulated_depreciation,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_twelve_month_schedule() {
        let rows = depreciate_rou(12000.0, 12, start()).unwrap();
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|r| r.depreciation == 1000.0));
        assert_eq!(rows[0].accumulated_depreciation, 1000.0);
        assert_eq!(rows[0].net_value, 11000.0);
        assert_eq!(rows[11].month, "Dec-24");
        assert_abs_diff_eq!(rows[11].net_value, 0.0, epsilon = 1e-9);
        assert_relative_eq!(rows[11].accumulated_depreciation, 12000.0);
    }

    #[test]
    fn test_uneven_value_converges() {
        let opening = 19433.962264150945;
        let rows = depreciate_rou(opening, 37, start()).unwrap();
        let first = rows[0].depreciation;
        assert!(rows.iter().all(|r| r.depreciation == first));
        assert!(rows.iter().all(|r| r.asset_value == opening));
        for row in &rows {
            assert_relative_eq!(row.net_value, opening - row.accumulated_depreciation);
        }
        assert_relative_eq!(rows[36].accumulated_depreciation, opening, max_relative = 1e-12);
        assert_abs_diff_eq!(rows[36].net_value, 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_zero_months_is_degenerate() {
        assert!(depreciate_rou(100.0, 0, start()).unwrap_err().is_degenerate_term());
    }
}
