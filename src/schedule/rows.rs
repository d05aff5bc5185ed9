//! Monthly schedule rows

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{LeaseError, LeaseResult};

/// Calendar date `offset` months after `start`, clamped to month end
pub fn month_date(start: NaiveDate, offset: usize) -> LeaseResult<NaiveDate> {
    start
        .checked_add_months(Months::new(offset as u32))
        .ok_or_else(|| {
            LeaseError::validation("start_date", format!("{} + {} months is out of range", start, offset))
        })
}

/// Month label as shown in reports, e.g. `Jan-24`
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b-%y").to_string()
}

/// One month of the lease liability roll-forward
///
/// Values are unrounded; rounding happens when rows are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 0-based month index within the lease
    pub month_index: usize,

    pub month: String,

    /// Cash paid this month
    pub payment: f64,

    /// Interest accrued on the opening balance
    pub interest_expense: f64,

    /// Liability carried into the next month
    pub remaining_liability: f64,
}

/// One month of the ROU asset roll-forward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouRow {
    pub month_index: usize,

    pub month: String,

    /// Opening ROU asset, constant for the lease
    pub asset_value: f64,

    pub depreciation: f64,

    pub accumulated_depreciation: f64,

    pub net_value: f64,
}
