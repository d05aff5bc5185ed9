//! Consolidated report tables for a batch
//!
//! Every record carries the contract metadata and run context. Amounts are
//! rounded to cents here and nowhere else.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::batch::BatchOutcome;
use crate::context::RunContext;
use crate::error::LeaseResult;
use crate::schedule::LeaseSchedule;

pub const SUMMARY_FILE: &str = "lease_present_values.csv";
pub const AMORTIZATION_FILE: &str = "lease_amortization_schedule.csv";
pub const ROU_FILE: &str = "rou_depreciation_schedule.csv";

/// Round to 2 decimal places for reporting
///
/// Goes through the exact decimal expansion, so values stored just below a
/// tie round down and exact ties round to even.
pub fn round2(value: f64) -> f64 {
    let rounded: f64 = format!("{:.2}", value).parse().unwrap_or(value);
    // Avoid reporting "-0.00"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// One row of the present value summary table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    #[serde(rename = "Lease Contract Name")]
    pub lease_name: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Owner Name")]
    pub owner_name: String,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "End Date")]
    pub end_date: String,
    #[serde(rename = "Discount Rate")]
    pub discount_rate: f64,
    #[serde(rename = "Payment Frequency")]
    pub payment_frequency: String,
    #[serde(rename = "Present Value")]
    pub present_value: f64,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Creation Date")]
    pub creation_date: String,
}

/// One row of the consolidated liability amortization table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizationRecord {
    #[serde(rename = "Lease Contract Name")]
    pub lease_name: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Owner Name")]
    pub owner_name: String,
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Payment")]
    pub payment: f64,
    #[serde(rename = "Interest Expense")]
    pub interest_expense: f64,
    #[serde(rename = "Remaining Lease Liability")]
    pub remaining_liability: f64,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Creation Date")]
    pub creation_date: String,
}

/// One row of the consolidated ROU depreciation table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouRecord {
    #[serde(rename = "Lease Contract Name")]
    pub lease_name: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Owner Name")]
    pub owner_name: String,
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "ROU Asset Value")]
    pub asset_value: f64,
    #[serde(rename = "Depreciation")]
    pub depreciation: f64,
    #[serde(rename = "Accumulated Depreciation")]
    pub accumulated_depreciation: f64,
    #[serde(rename = "Net ROU Value")]
    pub net_value: f64,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Creation Date")]
    pub creation_date: String,
}

/// The three consolidated tables for a batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub summary: Vec<SummaryRecord>,
    pub amortization: Vec<AmortizationRecord>,
    pub rou: Vec<RouRecord>,

    /// Rendered failures, one per rejected contract
    pub failures: Vec<String>,
}

impl BatchReport {
    /// Build the report from a batch outcome
    pub fn from_outcome(outcome: &BatchOutcome) -> Self {
        let mut report = Self::default();
        for schedule in &outcome.schedules {
            report.push_schedule(schedule, &outcome.context);
        }
        report.failures = outcome.failures.iter().map(|f| f.to_string()).collect();
        report
    }

    /// Append one contract's rows to the consolidated tables
    pub fn push_schedule(&mut self, schedule: &LeaseSchedule, context: &RunContext) {
        let contract = &schedule.contract;
        let username = context.operator.clone();
        let creation_date = context.creation_date();

        self.summary.push(SummaryRecord {
            lease_name: contract.lease_name.clone(),
            region: contract.region.clone(),
            owner_name: contract.owner_name.clone(),
            currency: contract.currency.clone(),
            start_date: contract.start_date.format("%Y-%m-%d").to_string(),
            end_date: contract.end_date.format("%Y-%m-%d").to_string(),
            discount_rate: contract.discount_rate,
            payment_frequency: contract.payment_frequency.to_string(),
            present_value: round2(schedule.present_value),
            username: username.clone(),
            creation_date: creation_date.clone(),
        });

        self.amortization.extend(schedule.amortization.iter().map(|row| AmortizationRecord {
            lease_name: contract.lease_name.clone(),
            region: contract.region.clone(),
            owner_name: contract.owner_name.clone(),
            month: row.month.clone(),
            payment: round2(row.payment),
            interest_expense: round2(row.interest_expense),
            remaining_liability: round2(row.remaining_liability),
            username: username.clone(),
            creation_date: creation_date.clone(),
        }));

        self.rou.extend(schedule.rou.iter().map(|row| RouRecord {
            lease_name: contract.lease_name.clone(),
            region: contract.region.clone(),
            owner_name: contract.owner_name.clone(),
            month: row.month.clone(),
            asset_value: round2(row.asset_value),
            depreciation: round2(row.depreciation),
            accumulated_depreciation: round2(row.accumulated_depreciation),
            net_value: round2(row.net_value),
            username: username.clone(),
            creation_date: creation_date.clone(),
        }));
    }

    /// Write the three tables as CSV files into `dir`
    pub fn write_csv_dir<P: AsRef<Path>>(&self, dir: P) -> LeaseResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let summary_path = dir.join(SUMMARY_FILE);
        let amortization_path = dir.join(AMORTIZATION_FILE);
        let rou_path = dir.join(ROU_FILE);

        write_csv(File::create(&summary_path)?, &self.summary)?;
        write_csv(File::create(&amortization_path)?, &self.amortization)?;
        write_csv(File::create(&rou_path)?, &self.rou)?;

        Ok(vec![summary_path, amortization_path, rou_path])
    }

    /// Write the whole report as pretty-printed JSON
    pub fn write_json<W: Write>(&self, writer: W) -> LeaseResult<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Write serializable records as CSV with a header row
pub fn write_csv<W: Write, T: Serialize>(writer: W, records: &[T]) -> LeaseResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}
