//! Discounting of lease payment streams
//!
//! Payments follow the annuity-due convention: the first payment falls at
//! inception and is taken at face value, payment `i` is discounted by `i`
//! whole periods at the periodic rate.

use serde::{Deserialize, Serialize};

use crate::contract::PaymentFrequency;
use crate::error::{LeaseError, LeaseResult};

/// Discount basis for one lease
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaseDiscount {
    /// Annual discount rate as a decimal
    pub annual_rate: f64,

    /// Payment frequency the periodic rate is quoted for
    pub frequency: PaymentFrequency,
}

impl LeaseDiscount {
    /// Build from an annual rate quoted in percent (6.0 = 6%)
    pub fn from_percent(annual_rate_percent: f64, frequency: PaymentFrequency) -> Self {
        Self {
            annual_rate: annual_rate_percent / 100.0,
            frequency,
        }
    }

    /// Nominal rate per payment period
    pub fn periodic_rate(&self) -> f64 {
        match self.frequency {
            PaymentFrequency::Monthly => self.annual_rate / 12.0,
            PaymentFrequency::Quarterly => self.annual_rate / 4.0,
            PaymentFrequency::Yearly => self.annual_rate,
        }
    }

    /// Rate at which interest accrues on the liability each month,
    /// whatever the payment frequency
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }

    /// Discount factor for the payment made at `period`
    pub fn discount_factor(&self, period: usize) -> f64 {
        if period == 0 {
            1.0
        } else {
            1.0 / (1.0 + self.periodic_rate()).powi(period as i32)
        }
    }

    /// Reject rates at which one period discounts a payment to nothing
    pub fn check_rate(&self) -> LeaseResult<()> {
        let growth = 1.0 + self.periodic_rate();
        if growth > 0.0 && growth.is_finite() {
            Ok(())
        } else {
            Err(LeaseError::validation(
                "discount_rate",
                format!(
                    "{}% a year gives a {} rate of {}%, at or below -100%",
                    self.annual_rate * 100.0,
                    self.frequency,
                    self.periodic_rate() * 100.0
                ),
            ))
        }
    }

    /// Present value of a per-period payment stream
    pub fn present_value(&self, payments: &[f64]) -> LeaseResult<f64> {
        self.check_rate()?;
        let (first, rest) = payments.split_first().ok_or_else(|| {
            LeaseError::DegenerateTerm("cannot value an empty payment stream".to_string())
        })?;

        let growth = 1.0 + self.periodic_rate();
        let discounted: f64 = rest
            .iter()
            .enumerate()
            .map(|(i, payment)| payment / growth.powi(i as i32 + 1))
            .sum();

        Ok(first + discounted)
    }
}

/// Present value of `payments` under annuity due at an annual percent rate
pub fn present_value(
    payments: &[f64],
    frequency: PaymentFrequency,
    annual_rate_percent: f64,
) -> LeaseResult<f64> {
    LeaseDiscount::from_percent(annual_rate_percent, frequency).present_value(payments)
}
