//! Per-employee exclusive locks.
//!
//! Every read-then-write sequence on one employee's ledger (the daily batch
//! block, a reactive re-judgment) must be serialized against every other
//! such sequence for the same employee. Different employees never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// A map of per-employee mutexes, created on first use.
#[derive(Debug, Default)]
pub struct EmployeeLockMap {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EmployeeLockMap {
    /// Creates an empty lock map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock for one employee, creating it if needed.
    pub fn lock_for(&self, employee_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(
            locks
                .entry(employee_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Runs `f` while holding the employee's exclusive lock.
    pub fn with_employee<T>(&self, employee_id: &str, f: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(employee_id);
        let _guard: MutexGuard<'_, ()> = lock.lock().unwrap_or_else(|e| e.into_inner());
        f()
    }
}
