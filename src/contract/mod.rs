//! Lease contract data, term derivation and batch loading

mod data;
pub mod loader;
pub mod term;

pub use data::{Contract, PaymentFrequency, PaymentSpec};
pub use loader::{load_contracts, load_contracts_from_reader, LoadedBatch, REQUIRED_COLUMNS};
pub use term::{months_between, payment_vector, periods_for, LeaseTerm};
