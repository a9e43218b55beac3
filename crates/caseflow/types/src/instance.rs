use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{InstanceId, InstanceStatus, ProcessKey, UserId, VariableMap};

/// A running (or finished) occurrence of a catalog process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInstance {
    pub id: InstanceId,
    pub process_key: ProcessKey,
    pub status: InstanceStatus,
    /// Who started the process. Tasks are routed by role, not to this user.
    pub requester: UserId,
    /// Merged form data across the start form and every completed task.
    pub variables: VariableMap,
    pub created_at: DateTime<Utc>,
}

impl ProcessInstance {
    pub fn is_active(&self) -> bool {
        self.status == InstanceStatus::Active
    }
}
