//! Lease term derivation: month span, payment period count and payment vector

use chrono::{Datelike, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};

use super::{Contract, PaymentFrequency, PaymentSpec};
use crate::error::{LeaseError, LeaseResult};

/// Inclusive number of calendar months from start to end, ignoring days
///
/// Negative or zero when the end month precedes the start month.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end.year() as i64 - start.year() as i64) * 12
        + (end.month() as i64 - start.month() as i64)
        + 1
}

/// Number of payment events for a frequency over the lease span
///
/// Partial final quarters and years count as a full period.
pub fn periods_for(
    frequency: PaymentFrequency,
    start: NaiveDate,
    end: NaiveDate,
    num_months: i64,
) -> i64 {
    match frequency {
        PaymentFrequency::Monthly => num_months,
        PaymentFrequency::Quarterly => {
            if num_months % 3 == 0 {
                num_months / 3
            } else {
                num_months / 3 + 1
            }
        }
        PaymentFrequency::Yearly => {
            let whole_years = end.year() as i64 - start.year() as i64;
            whole_years + if end.month() >= start.month() { 1 } else { 0 }
        }
    }
}

/// Expand a payment specification into one amount per period
///
/// An explicit schedule is returned as supplied, whatever its length.
pub fn payment_vector(spec: &PaymentSpec, num_periods: usize) -> Vec<f64> {
    match spec {
        PaymentSpec::Flat(amount) => vec![*amount; num_periods],
        PaymentSpec::Schedule(amounts) => amounts.clone(),
    }
}

/// Derived timing and payments for one contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseTerm {
    /// Rows in each monthly roll-forward
    pub num_months: usize,

    /// Payment events implied by the frequency
    pub num_periods: usize,

    /// Per-period payments used for valuation
    pub payments: Vec<f64>,
}

impl LeaseTerm {
    /// Derive the term for a contract
    pub fn derive(contract: &Contract) -> LeaseResult<Self> {
        contract.validate()?;

        let num_months = months_between(contract.start_date, contract.end_date);
        if num_months <= 0 {
            return Err(LeaseError::DegenerateTerm(format!(
                "{}: lease spans {} months",
                contract.lease_name, num_months
            )));
        }

        let num_periods = periods_for(
            contract.payment_frequency,
            contract.start_date,
            contract.end_date,
            num_months,
        );
        if num_periods <= 0 {
            return Err(LeaseError::DegenerateTerm(format!(
                "{}: lease has {} {} payment periods",
                contract.lease_name, num_periods, contract.payment_frequency
            )));
        }

        let num_months = num_months as usize;
        let num_periods = num_periods as usize;
        let payments = payment_vector(&contract.payments, num_periods);

        if payments.is_empty() {
            return Err(LeaseError::DegenerateTerm(format!(
                "{}: no payments supplied",
                contract.lease_name
            )));
        }

        let term = Self {
            num_months,
            num_periods,
            payments,
        };

        if !term.payments_match_periods() {
            warn!(
                "{}: {} payments supplied for {} {} periods; using supplied list",
                contract.lease_name,
                term.payments.len(),
                term.num_periods,
                contract.payment_frequency
            );
        }

        Ok(term)
    }

    /// Whether the supplied payments cover exactly the derived periods
    pub fn payments_match_periods(&self) -> bool {
        self.payments.len() == self.num_periods
    }
}
