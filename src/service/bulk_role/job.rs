use std::sync::Arc;

use tokio::sync::RwLock;

/// Lifecycle of the process-wide bulk role job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
    CancelRequested,
}

/// Single slot allowing at most one bulk role job at a time across all guilds.
#[derive(Debug, Clone)]
pub struct BulkRoleJob {
    state: Arc<RwLock<JobState>>,
}

impl Default for BulkRoleJob {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(JobState::Idle)),
        }
    }
}

impl BulkRoleJob {
    /// Claims the slot.
    ///
    /// # Returns
    /// - `true` - The slot was idle and is now running
    /// - `false` - Another job holds the slot
    pub async fn try_start(&self) -> bool {
        let mut state = self.state.write().await;
        if *state != JobState::Idle {
            return false;
        }

        *state = JobState::Running;
        true
    }

    /// Asks the running job to stop at its next checkpoint.
    ///
    /// # Returns
    /// - `true` - A job was running
    /// - `false` - The slot is idle
    pub async fn request_cancel(&self) -> bool {
        let mut state = self.state.write().await;
        match *state {
            JobState::Idle => false,
            _ => {
                *state = JobState::CancelRequested;
                true
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        *self.state.read().await != JobState::Idle
    }

    pub async fn is_cancel_requested(&self) -> bool {
        *self.state.read().await == JobState::CancelRequested
    }

    /// Releases the slot.
    pub async fn finish(&self) {
        *self.state.write().await = JobState::Idle;
    }
}
