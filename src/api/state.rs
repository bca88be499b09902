//! Application state for the Payroll Computation Engine API.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::engine::PayrollEngine;
use crate::ledger::{InMemoryPayslipStore, PayslipStore};

/// Shared application state.
///
/// Holds the payroll engine, and through it the loaded configuration and
/// the payslip store.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<PayrollEngine>,
}

impl AppState {
    /// Creates the application state over an existing payslip store.
    pub fn new(config: ConfigLoader, store: Arc<dyn PayslipStore>) -> Self {
        Self {
            engine: Arc::new(PayrollEngine::new(config, store)),
        }
    }

    /// Creates the application state with an empty in-memory store.
    pub fn in_memory(config: ConfigLoader) -> Self {
        Self::new(config, Arc::new(InMemoryPayslipStore::new()))
    }

    /// Returns the payroll engine.
    pub fn engine(&self) -> &PayrollEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
