//! Per-job exclusive leases
//!
//! At most one advance may run against a job at a time. The registry is a
//! set of leased job ids; the guard removes its id on drop, so a lease is
//! released on every exit path including panics and cancelled futures.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub struct LeaseRegistry {
    held: Arc<Mutex<HashSet<Uuid>>>,
}

impl LeaseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `job_id`, or `None` if another holder has it
    pub fn try_acquire(&self, job_id: Uuid) -> Option<JobLease> {
        if !self.lock().insert(job_id) {
            return None;
        }

        Some(JobLease {
            job_id,
            held: Arc::clone(&self.held),
        })
    }

    pub fn is_held(&self, job_id: Uuid) -> bool {
        self.lock().contains(&job_id)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<Uuid>> {
        // The set stays consistent even if a holder panicked mid-insert
        self.held.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Exclusive claim on one job, released on drop
#[derive(Debug)]
pub struct JobLease {
    job_id: Uuid,
    held: Arc<Mutex<HashSet<Uuid>>>,
}

impl JobLease {
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }
}

impl Drop for JobLease {
    fn drop(&mut self) {
        let mut held = self.held.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        held.remove(&self.job_id);
    }
}
