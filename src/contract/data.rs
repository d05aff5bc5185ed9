//! Lease contract data structures matching the batch upload format

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{LeaseError, LeaseResult};
use crate::valuation::LeaseDiscount;

/// How often a lease payment falls due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Monthly,
    Quarterly,
    Yearly,
}

impl PaymentFrequency {
    /// Number of payment periods per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Yearly => 1,
        }
    }

    /// Number of calendar months covered by one payment period
    pub fn months_per_period(&self) -> usize {
        match self {
            PaymentFrequency::Monthly => 1,
            PaymentFrequency::Quarterly => 3,
            PaymentFrequency::Yearly => 12,
        }
    }

    /// Get the string representation used in upload files
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Quarterly => "quarterly",
            PaymentFrequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = LeaseError;

    /// Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(PaymentFrequency::Monthly),
            "quarterly" => Ok(PaymentFrequency::Quarterly),
            "yearly" => Ok(PaymentFrequency::Yearly),
            other => Err(LeaseError::validation(
                "payment_frequency",
                format!("unknown frequency '{}', expected monthly, quarterly or yearly", other),
            )),
        }
    }
}

/// Raw payment specification as supplied for a contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaymentSpec {
    /// One amount paid every period
    Flat(f64),
    /// Explicit ordered per-period amounts
    Schedule(Vec<f64>),
}

impl PaymentSpec {
    /// Parse a payment field: a single number, or a comma-separated list
    pub fn parse(raw: &str) -> LeaseResult<Self> {
        let raw = raw.trim();
        if !raw.contains(',') {
            return parse_amount(raw).map(PaymentSpec::Flat);
        }

        raw.split(',')
            .map(parse_amount)
            .collect::<LeaseResult<Vec<f64>>>()
            .map(PaymentSpec::Schedule)
    }
}

fn parse_amount(piece: &str) -> LeaseResult<f64> {
    let piece = piece.trim();
    let amount: f64 = piece.parse().map_err(|_| {
        LeaseError::validation("payment_amounts", format!("'{}' is not a number", piece))
    })?;
    if !amount.is_finite() {
        return Err(LeaseError::validation(
            "payment_amounts",
            format!("'{}' is not a finite amount", piece),
        ));
    }
    Ok(amount)
}

/// A single lease contract from the batch input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Lease contract name
    pub lease_name: String,

    pub region: String,

    pub owner_name: String,

    /// Contract currency (reported as-is, never converted)
    pub currency: String,

    /// First day of the lease
    pub start_date: NaiveDate,

    /// Last day of the lease (inclusive)
    pub end_date: NaiveDate,

    /// Annual discount rate in percent (6.0 = 6%)
    pub discount_rate: f64,

    pub payment_frequency: PaymentFrequency,

    pub payments: PaymentSpec,
}

impl Contract {
    /// Create a new contract and check its dates and rate
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lease_name: impl Into<String>,
        region: impl Into<String>,
        owner_name: impl Into<String>,
        currency: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        discount_rate: f64,
        payment_frequency: PaymentFrequency,
        payments: PaymentSpec,
    ) -> LeaseResult<Self> {
        let contract = Self {
            lease_name: lease_name.into(),
            region: region.into(),
            owner_name: owner_name.into(),
            currency: currency.into(),
            start_date,
            end_date,
            discount_rate,
            payment_frequency,
            payments,
        };
        contract.validate()?;
        Ok(contract)
    }

    /// Check the invariants the engine relies on
    pub fn validate(&self) -> LeaseResult<()> {
        if self.end_date < self.start_date {
            return Err(LeaseError::validation(
                "end_date",
                format!("end date {} is before start date {}", self.end_date, self.start_date),
            ));
        }
        if !self.discount_rate.is_finite() {
            return Err(LeaseError::validation("discount_rate", "rate must be a finite number"));
        }
        LeaseDiscount::from_percent(self.discount_rate, self.payment_frequency).check_rate()?;
        Ok(())
    }

    /// Annual discount rate as a decimal (0.06 for 6%)
    pub fn annual_rate(&self) -> f64 {
        self.discount_rate / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_frequency_parse_is_exact() {
        assert_eq!("monthly".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Monthly);
        assert_eq!("quarterly".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Quarterly);
        assert_eq!("yearly".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Yearly);

        assert!("Monthly".parse::<PaymentFrequency>().unwrap_err().is_validation());
        assert!("annual".parse::<PaymentFrequency>().is_err());
    }

    #[test]
    fn test_payment_spec_parse() {
        assert_eq!(PaymentSpec::parse(" 1000 ").unwrap(), PaymentSpec::Flat(1000.0));
        assert_eq!(
            PaymentSpec::parse("100, 200.5,300").unwrap(),
            PaymentSpec::Schedule(vec![100.0, 200.5, 300.0])
        );
    }

    #[test]
    fn test_payment_spec_rejects_bad_amounts() {
        assert!(PaymentSpec::parse("abc").unwrap_err().is_validation());
        assert!(PaymentSpec::parse("100,,200").unwrap_err().is_validation());
        assert!(PaymentSpec::parse("100,x").unwrap_err().is_validation());
        assert!(PaymentSpec::parse("").unwrap_err().is_validation());
        assert!(PaymentSpec::parse("inf").unwrap_err().is_validation());
    }

    #[test]
    fn test_contract_rejects_inverted_dates() {
        let err = Contract::new(
            "Tower A",
            "North",
            "Owner",
            "USD",
            date(2024, 6, 1),
            date(2024, 5, 31),
            5.0,
            PaymentFrequency::Monthly,
            PaymentSpec::Flat(100.0),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_contract_rejects_rate_wiping_out_a_period() {
        let build = |rate: f64, frequency: PaymentFrequency| {
            Contract::new(
                "Tower A",
                "North",
                "Owner",
                "USD",
                date(2024, 1, 1),
                date(2025, 12, 1),
                rate,
                frequency,
                PaymentSpec::Flat(100.0),
            )
        };

        assert!(build(-100.0, PaymentFrequency::Yearly).unwrap_err().is_validation());
        assert!(build(-400.0, PaymentFrequency::Quarterly).unwrap_err().is_validation());
        assert!(build(-1200.0, PaymentFrequency::Monthly).unwrap_err().is_validation());

        // Negative but above the limit is still accepted
        assert!(build(-99.0, PaymentFrequency::Yearly).is_ok());
        assert!(build(-150.0, PaymentFrequency::Monthly).is_ok());
    }

    #[test]
    fn test_annual_rate_is_decimal() {
        let contract = Contract::new(
            "Tower A",
            "North",
            "Owner",
            "USD",
            date(2024, 1, 1),
            date(2024, 12, 1),
            6.0,
            PaymentFrequency::Yearly,
            PaymentSpec::Flat(100.0),
        )
        .unwrap();
        assert!((contract.annual_rate() - 0.06).abs() < 1e-12);
    }
}
