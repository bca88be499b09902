//! Payslip persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::models::{Payslip, PayslipKey};

/// Storage for finalized payslips, keyed by [`PayslipKey`].
///
/// Implementations must enforce that at most one payslip exists per key.
pub trait PayslipStore: Send + Sync {
    /// Looks up the payslip for `key`.
    fn find(&self, key: &PayslipKey) -> EngineResult<Option<Payslip>>;

    /// Stores a new payslip.
    ///
    /// Fails with `ConcurrentUpdate` if a payslip for the same key exists.
    fn insert(&self, payslip: Payslip) -> EngineResult<()>;

    /// Overwrites the stored payslip with the same key.
    ///
    /// Fails with `PayslipNotFound` if there is none.
    fn replace(&self, payslip: Payslip) -> EngineResult<()>;

    /// Returns every payslip of `employee_id`, ordered by year, month and half.
    fn list_for_employee(&self, employee_id: &str) -> EngineResult<Vec<Payslip>>;
}

/// A process-local [`PayslipStore`].
#[derive(Debug, Default)]
pub struct InMemoryPayslipStore {
    payslips: RwLock<HashMap<PayslipKey, Payslip>>,
}

impl InMemoryPayslipStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> EngineError {
    EngineError::Storage {
        message: "payslip store lock poisoned".to_string(),
    }
}

impl PayslipStore for InMemoryPayslipStore {
    fn find(&self, key: &PayslipKey) -> EngineResult<Option<Payslip>> {
        let payslips = self.payslips.read().map_err(|_| poisoned())?;
        Ok(payslips.get(key).cloned())
    }

    fn insert(&self, payslip: Payslip) -> EngineResult<()> {
        let mut payslips = self.payslips.write().map_err(|_| poisoned())?;
        let key = payslip.key();
        if payslips.contains_key(&key) {
            return Err(EngineError::ConcurrentUpdate {
                key: key.to_string(),
            });
        }
        payslips.insert(key, payslip);
        Ok(())
    }

    fn replace(&self, payslip: Payslip) -> EngineResult<()> {
        let mut payslips = self.payslips.write().map_err(|_| poisoned())?;
        let key = payslip.key();
        match payslips.get_mut(&key) {
            Some(existing) => {
                *existing = payslip;
                Ok(())
            }
            None => Err(EngineError::PayslipNotFound {
                key: key.to_string(),
            }),
        }
    }

    fn list_for_employee(&self, employee_id: &str) -> EngineResult<Vec<Payslip>> {
        let payslips = self.payslips.read().map_err(|_| poisoned())?;
        let mut found: Vec<Payslip> = payslips
            .values()
            .filter(|p| p.employee_id == employee_id)
            .cloned()
            .collect();
        found.sort_by_key(|p| (p.year, p.month, p.period));
        Ok(found)
    }
}
