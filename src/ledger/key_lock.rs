//! Per-key advisory leases for payslip writes.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::{EngineError, EngineResult};
use crate::models::PayslipKey;

/// Tracks which payslip keys have a finalize in flight.
///
/// Leases never wait: a second finalize for a key that is already held fails
/// immediately with `ConcurrentUpdate`.
#[derive(Debug, Default)]
pub struct KeyLocks {
    in_flight: Mutex<HashSet<PayslipKey>>,
}

/// A held lease on one payslip key, released when dropped.
#[derive(Debug)]
pub struct KeyLease<'a> {
    locks: &'a KeyLocks,
    key: PayslipKey,
}

impl KeyLocks {
    /// Creates an empty lease table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the lease for `key`.
    pub fn try_acquire(&self, key: &PayslipKey) -> EngineResult<KeyLease<'_>> {
        let mut in_flight = self.in_flight.lock().map_err(|_| EngineError::Storage {
            message: "key lock table poisoned".to_string(),
        })?;

        if !in_flight.insert(key.clone()) {
            return Err(EngineError::ConcurrentUpdate {
                key: key.to_string(),
            });
        }

        Ok(KeyLease {
            locks: self,
            key: key.clone(),
        })
    }

}

impl Drop for KeyLease<'_> {
    fn drop(&mut self) {
        match self.locks.in_flight.lock() {
            Ok(mut in_flight) => {
                in_flight.remove(&self.key);
            }
            Err(poisoned) => {
                poisoned.into_inner().remove(&self.key);
            }
        }
    }
}
