use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseKeyError;

/// Lifecycle of a process instance. Monotonic: `Active` may end in
/// `Completed` or `Rejected`; a terminal status never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstanceStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "REJECTED")]
    Rejected,
}

impl InstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Active => "ACTIVE",
            InstanceStatus::Completed => "COMPLETED",
            InstanceStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InstanceStatus::Active)
    }

    /// Whether moving to `next` respects monotonicity. Staying put is
    /// always allowed; leaving a terminal status never is.
    pub fn can_transition_to(&self, next: InstanceStatus) -> bool {
        *self == next || *self == InstanceStatus::Active
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceStatus {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(InstanceStatus::Active),
            "COMPLETED" => Ok(InstanceStatus::Completed),
            "REJECTED" => Ok(InstanceStatus::Rejected),
            other => Err(ParseKeyError::new("instance status", other)),
        }
    }
}

/// Lifecycle of a task. One-way: a completed task never reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "COMPLETED")]
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TaskStatus::Pending),
            "COMPLETED" => Ok(TaskStatus::Completed),
            other => Err(ParseKeyError::new("task status", other)),
        }
    }
}

/// How a finished instance ended. The two legal terminal statuses, kept
/// apart from `InstanceStatus` so routing rules cannot "end" a process as
/// `ACTIVE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "REJECTED")]
    Rejected,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Completed => "COMPLETED",
            Outcome::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Outcome> for InstanceStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Completed => InstanceStatus::Completed,
            Outcome::Rejected => InstanceStatus::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_may_move_to_either_terminal() {
        assert!(InstanceStatus::Active.can_transition_to(InstanceStatus::Completed));
        assert!(InstanceStatus::Active.can_transition_to(InstanceStatus::Rejected));
        assert!(InstanceStatus::Active.can_transition_to(InstanceStatus::Active));
    }

    #[test]
    fn terminal_statuses_never_move() {
        assert!(!InstanceStatus::Completed.can_transition_to(InstanceStatus::Active));
        assert!(!InstanceStatus::Completed.can_transition_to(InstanceStatus::Rejected));
        assert!(!InstanceStatus::Rejected.can_transition_to(InstanceStatus::Active));
        assert!(!InstanceStatus::Rejected.can_transition_to(InstanceStatus::Completed));
        assert!(InstanceStatus::Rejected.can_transition_to(InstanceStatus::Rejected));
    }

    #[test]
    fn outcome_maps_onto_instance_status() {
        assert_eq!(
            InstanceStatus::from(Outcome::Completed),
            InstanceStatus::Completed
        );
        assert_eq!(
            InstanceStatus::from(Outcome::Rejected),
            InstanceStatus::Rejected
        );
    }
}
