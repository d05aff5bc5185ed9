//! Run context stamped onto every reported row

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Operator name used when none is supplied
pub const DEFAULT_OPERATOR: &str = "Unknown";

/// Who ran a batch, and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    pub operator: String,
    pub run_date: NaiveDate,
}

impl RunContext {
    pub fn new(operator: impl Into<String>, run_date: NaiveDate) -> Self {
        Self {
            operator: operator.into(),
            run_date,
        }
    }

    /// Context dated with the local calendar date
    pub fn today(operator: impl Into<String>) -> Self {
        Self::new(operator, Local::now().date_naive())
    }

    /// Run date as stamped on output rows (YYYY-MM-DD)
    pub fn creation_date(&self) -> String {
        self.run_date.format("%Y-%m-%d").to_string()
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::today(DEFAULT_OPERATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_date_format() {
        let context = RunContext::new("analyst", NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
        assert_eq!(context.creation_date(), "2025-03-07");
        assert_eq!(context.operator, "analyst");
    }

    #[test]
    fn test_default_operator() {
        assert_eq!(RunContext::default().operator, DEFAULT_OPERATOR);
    }
}
