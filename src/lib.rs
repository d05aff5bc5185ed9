//! IFRS 16 Lease Engine - present value, liability amortization and ROU depreciation
//!
//! This library provides:
//! - Contract loading from batch upload CSVs
//! - Lease term and payment period derivation (monthly, quarterly, yearly)
//! - Annuity-due present value of lease payments
//! - Monthly lease liability and right-of-use asset schedules
//! - Batch runs with per-contract failure isolation and consolidated reports

pub mod batch;
pub mod context;
pub mod contract;
pub mod error;
pub mod report;
pub mod schedule;
pub mod valuation;

// Re-export commonly used types
pub use batch::{BatchConfig, BatchOutcome, BatchRunner};
pub use context::RunContext;
pub use contract::{Contract, LeaseTerm, PaymentFrequency, PaymentSpec};
pub use error::{ContractFailure, LeaseError, LeaseResult};
pub use report::BatchReport;
pub use schedule::{evaluate_lease, AmortizationRow, LeaseSchedule, RouRow};
pub use valuation::present_value;
