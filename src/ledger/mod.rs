//! The payslip ledger: storage, per-key leases and payslip assembly.

mod assembler;
mod key_lock;
mod store;

pub use assembler::{AssembleOutcome, PayslipAssembler, PayslipDraft, payslip_totals};
pub use key_lock::{KeyLease, KeyLocks};
pub use store::{InMemoryPayslipStore, PayslipStore};
