//! Load lease contracts from a batch upload CSV

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};

use super::{Contract, PaymentFrequency, PaymentSpec};
use crate::error::{ContractFailure, LeaseError, LeaseResult};

/// Columns every batch upload must carry
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "lease_name",
    "region",
    "owner_name",
    "currency",
    "start_date",
    "end_date",
    "discount_rate",
    "payment_frequency",
    "payment_amounts",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Raw CSV row matching the upload columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    lease_name: String,
    region: String,
    owner_name: String,
    currency: String,
    start_date: String,
    end_date: String,
    discount_rate: String,
    payment_frequency: String,
    payment_amounts: String,
}

impl CsvRow {
    fn to_contract(&self) -> LeaseResult<Contract> {
        let lease_name = required("lease_name", &self.lease_name)?;
        let region = required("region", &self.region)?;
        let owner_name = required("owner_name", &self.owner_name)?;
        let currency = required("currency", &self.currency)?;

        let start_date = parse_date("start_date", required("start_date", &self.start_date)?)?;
        let end_date = parse_date("end_date", required("end_date", &self.end_date)?)?;

        let rate_text = required("discount_rate", &self.discount_rate)?;
        let discount_rate: f64 = rate_text.parse().map_err(|_| {
            LeaseError::validation("discount_rate", format!("'{}' is not a number", rate_text))
        })?;

        let payment_frequency: PaymentFrequency =
            required("payment_frequency", &self.payment_frequency)?.parse()?;
        let payments = PaymentSpec::parse(required("payment_amounts", &self.payment_amounts)?)?;

        Contract::new(
            lease_name,
            region,
            owner_name,
            currency,
            start_date,
            end_date,
            discount_rate,
            payment_frequency,
            payments,
        )
    }
}

fn required<'a>(field: &str, value: &'a str) -> LeaseResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(LeaseError::validation(field, "value is missing"))
    } else {
        Ok(value)
    }
}

/// Parse a calendar date in any of the accepted upload formats
pub fn parse_date(field: &str, value: &str) -> LeaseResult<NaiveDate> {
    let value = value.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }

    Err(LeaseError::validation(field, format!("'{}' is not a recognised date", value)))
}

/// Report every required column absent from the header row
pub fn check_columns(headers: &StringRecord) -> LeaseResult<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h.trim() == *column))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LeaseError::validation(
            "columns",
            format!("missing required columns: {}", missing.join(", ")),
        ))
    }
}

/// Contracts parsed from one upload, plus rows that were rejected
#[derive(Debug, Default)]
pub struct LoadedBatch {
    pub contracts: Vec<Contract>,

    /// 1-based CSV data row of each entry in `contracts`
    pub rows: Vec<usize>,

    pub rejected: Vec<ContractFailure>,
}

impl LoadedBatch {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Load contracts from any reader (e.g., string buffer, uploaded file)
///
/// Missing columns always abort. A bad row aborts when `fail_fast` is set,
/// otherwise it is recorded in `rejected` and loading continues.
pub fn load_contracts_from_reader<R: std::io::Read>(
    reader: R,
    fail_fast: bool,
) -> LeaseResult<LoadedBatch> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    check_columns(&headers)?;

    let mut batch = LoadedBatch::default();

    for (index, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = index + 1;
        let parsed = match result {
            Ok(raw) => raw
                .to_contract()
                .map_err(|error| (raw.lease_name.trim().to_string(), error)),
            Err(error) => Err((String::new(), LeaseError::from(error))),
        };

        match parsed {
            Ok(contract) => {
                debug!("row {}: loaded lease {}", row, contract.lease_name);
                batch.contracts.push(contract);
                batch.rows.push(row);
            }
            Err((_, error)) if fail_fast => return Err(error),
            Err((lease_name, error)) => {
                let failure = ContractFailure {
                    row,
                    lease_name,
                    error,
                };
                warn!("rejected {}", failure);
                batch.rejected.push(failure);
            }
        }
    }

    Ok(batch)
}

/// Load all contracts from a CSV file
pub fn load_contracts<P: AsRef<Path>>(path: P, fail_fast: bool) -> LeaseResult<LoadedBatch> {
    let file = std::fs::File::open(path)?;
    load_contracts_from_reader(file, fail_fast)
}
