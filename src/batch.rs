//! Batch runner for valuing many lease contracts
//!
//! Contracts are independent of each other, so a batch can run sequentially
//! or across a rayon pool. Results always come back in input order.

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::context::RunContext;
use crate::contract::{Contract, LoadedBatch};
use crate::error::{ContractFailure, LeaseResult};
use crate::schedule::{evaluate_lease, LeaseSchedule};

/// Configuration for a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Abort the batch on the first failing contract
    pub fail_fast: bool,

    /// Evaluate contracts across the rayon thread pool
    pub parallel: bool,
}

/// Schedules for every contract that evaluated, plus the failures
#[derive(Debug)]
pub struct BatchOutcome {
    pub context: RunContext,
    pub schedules: Vec<LeaseSchedule>,
    pub failures: Vec<ContractFailure>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Sum of unrounded present values across the batch
    pub fn total_present_value(&self) -> f64 {
        self.schedules.iter().map(|s| s.present_value).sum()
    }
}

/// Runs valuations for a batch under one run context
#[derive(Debug, Clone)]
pub struct BatchRunner {
    context: RunContext,
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(context: RunContext, config: BatchConfig) -> Self {
        Self { context, config }
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Value a single contract
    pub fn run_one(&self, contract: &Contract) -> LeaseResult<LeaseSchedule> {
        evaluate_lease(contract)
    }

    /// Value every contract in the batch
    ///
    /// With `fail_fast` the first failure (in input order) is returned as the
    /// error. Otherwise failures are collected and the rest of the batch runs.
    pub fn run(&self, contracts: &[Contract]) -> LeaseResult<BatchOutcome> {
        let rows: Vec<usize> = (1..=contracts.len()).collect();
        self.run_rows(contracts, &rows)
    }

    /// Value the contracts of a loaded upload, reporting failures by CSV row
    pub fn run_loaded(&self, batch: &LoadedBatch) -> LeaseResult<BatchOutcome> {
        self.run_rows(&batch.contracts, &batch.rows)
    }

    /// Value contracts whose source rows are given in `rows`
    ///
    /// Contracts without a matching entry in `rows` fall back to their
    /// position in `contracts`.
    pub fn run_rows(&self, contracts: &[Contract], rows: &[usize]) -> LeaseResult<BatchOutcome> {
        let results: Vec<LeaseResult<LeaseSchedule>> = if self.config.parallel {
            contracts.par_iter().map(evaluate_lease).collect()
        } else if self.config.fail_fast {
            // Stop evaluating once a contract fails
            let mut results = Vec::with_capacity(contracts.len());
            for contract in contracts {
                let result = evaluate_lease(contract);
                let failed = result.is_err();
                results.push(result);
                if failed {
                    break;
                }
            }
            results
        } else {
            contracts.iter().map(evaluate_lease).collect()
        };

        let mut schedules = Vec::with_capacity(results.len());
        let mut failures = Vec::new();

        for (index, (contract, result)) in contracts.iter().zip(results).enumerate() {
            match result {
                Ok(schedule) => schedules.push(schedule),
                Err(error) if self.config.fail_fast => return Err(error),
                Err(error) => {
                    let failure = ContractFailure {
                        row: rows.get(index).copied().unwrap_or(index + 1),
                        lease_name: contract.lease_name.clone(),
                        error,
                    };
                    warn!("skipped {}", failure);
                    failures.push(failure);
                }
            }
        }

        let outcome = BatchOutcome {
            context: self.context.clone(),
            schedules,
            failures,
        };

        info!(
            "valued {} of {} contracts for {} on {}, total PV {:.2}",
            outcome.schedules.len(),
            contracts.len(),
            self.context.operator,
            self.context.creation_date(),
            outcome.total_present_value()
        );

        Ok(outcome)
    }
}
