//! Monthly liability and ROU schedules for a lease

mod liability;
mod rou;
mod rows;

pub use liability::{amortize_liability, payment_for_month};
pub use rou::depreciate_rou;
pub use rows::{month_date, month_label, AmortizationRow, RouRow};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::contract::{Contract, LeaseTerm};
use crate::error::LeaseResult;
use crate::valuation::present_value;

/// Complete valuation and schedules for one contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseSchedule {
    pub contract: Contract,

    pub term: LeaseTerm,

    /// Unrounded present value; opening liability and opening ROU asset
    pub present_value: f64,

    pub amortization: Vec<AmortizationRow>,

    pub rou: Vec<RouRow>,
}

impl LeaseSchedule {
    /// Opening lease liability
    pub fn opening_liability(&self) -> f64 {
        self.present_value
    }

    /// Opening right-of-use asset
    pub fn opening_rou_asset(&self) -> f64 {
        self.present_value
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScheduleSummary {
        let total_payments: f64 = self.amortization.iter().map(|r| r.payment).sum();
        let total_interest: f64 = self.amortization.iter().map(|r| r.interest_expense).sum();
        let total_depreciation: f64 = self.rou.iter().map(|r| r.depreciation).sum();

        ScheduleSummary {
            total_months: self.amortization.len(),
            present_value: self.present_value,
            total_payments,
            total_interest,
            total_depreciation,
            final_liability: self.amortization.last().map(|r| r.remaining_liability).unwrap_or(0.0),
            final_net_rou: self.rou.last().map(|r| r.net_value).unwrap_or(0.0),
        }
    }
}

/// Summary statistics for a lease schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_months: usize,
    pub present_value: f64,
    pub total_payments: f64,
    pub total_interest: f64,
    pub total_depreciation: f64,
    pub final_liability: f64,
    pub final_net_rou: f64,
}

/// Value one contract and build both monthly schedules
pub fn evaluate_lease(contract: &Contract) -> LeaseResult<LeaseSchedule> {
    let term = LeaseTerm::derive(contract)?;

    let present_value = present_value(
        &term.payments,
        contract.payment_frequency,
        contract.discount_rate,
    )?;

    let amortization = amortize_liability(
        present_value,
        &term.payments,
        contract.payment_frequency,
        contract.discount_rate,
        term.num_months,
        contract.start_date,
    )?;
    let rou = depreciate_rou(present_value, term.num_months, contract.start_date)?;

    debug!(
        "{}: {} months, {} {} periods, PV {:.2}",
        contract.lease_name,
        term.num_months,
        term.num_periods,
        contract.payment_frequency,
        present_value
    );

    Ok(LeaseSchedule {
        contract: contract.clone(),
        term,
        present_value,
        amortization,
        rou,
    })
}
