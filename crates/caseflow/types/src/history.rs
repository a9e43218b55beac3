use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{InstanceId, TaskId, User, UserId};

/// Recorded author for entries the engine writes on its own behalf.
pub const SYSTEM_USER_NAME: &str = "System";

/// What a history entry records. The three lifecycle actions cover the
/// engine; `Custom` carries process-specific action labels verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    StartProcess,
    CompleteTask,
    EndProcess,
    Custom(String),
}

impl HistoryAction {
    pub fn as_str(&self) -> &str {
        match self {
            HistoryAction::StartProcess => "START_PROCESS",
            HistoryAction::CompleteTask => "COMPLETE_TASK",
            HistoryAction::EndProcess => "END_PROCESS",
            HistoryAction::Custom(label) => label,
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for HistoryAction {
    fn from(s: &str) -> Self {
        match s {
            "START_PROCESS" => HistoryAction::StartProcess,
            "COMPLETE_TASK" => HistoryAction::CompleteTask,
            "END_PROCESS" => HistoryAction::EndProcess,
            other => HistoryAction::Custom(other.to_string()),
        }
    }
}

impl Serialize for HistoryAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HistoryAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(HistoryAction::from(label.as_str()))
    }
}

/// Payload for appending one history entry. The store assigns the id, the
/// per-instance sequence number, and the chain hashes at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub instance_id: InstanceId,
    pub task_id: Option<TaskId>,
    pub user_id: Option<UserId>,
    /// Point-in-time snapshot of the actor's display name.
    pub user_name: String,
    pub action: HistoryAction,
    pub comment: String,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEvent {
    /// An entry authored by the engine itself.
    pub fn system(instance_id: InstanceId, action: HistoryAction, comment: impl Into<String>) -> Self {
        Self {
            instance_id,
            task_id: None,
            user_id: None,
            user_name: SYSTEM_USER_NAME.to_string(),
            action,
            comment: comment.into(),
            recorded_at: Utc::now(),
        }
    }

    /// An entry authored by a directory user, snapshotting their name.
    pub fn by_user(
        instance_id: InstanceId,
        user: &User,
        action: HistoryAction,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            instance_id,
            task_id: None,
            user_id: Some(user.id.clone()),
            user_name: user.full_name.clone(),
            action,
            comment: comment.into(),
            recorded_at: Utc::now(),
        }
    }

    pub fn with_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }
}

/// Persistent tamper-evident history record. Entries for one instance form
/// a blake3 hash chain in sequence order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub instance_id: InstanceId,
    /// Per-instance, 1-based, dense.
    pub sequence: u64,
    pub task_id: Option<TaskId>,
    pub user_id: Option<UserId>,
    pub user_name: String,
    pub action: HistoryAction,
    pub comment: String,
    pub recorded_at: DateTime<Utc>,
    pub previous_hash: Option<String>,
    pub hash: String,
}

impl HistoryEntry {
    fn event(&self) -> HistoryEvent {
        HistoryEvent {
            instance_id: self.instance_id,
            task_id: self.task_id,
            user_id: self.user_id.clone(),
            user_name: self.user_name.clone(),
            action: self.action.clone(),
            comment: self.comment.clone(),
            recorded_at: self.recorded_at,
        }
    }
}

/// A history chain failed verification.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChainError {
    #[error("history sequence gap: expected {expected}, found {found}")]
    SequenceGap { expected: u64, found: u64 },
    #[error("history entry {sequence} does not link to its predecessor")]
    BrokenLink { sequence: u64 },
    #[error("history entry {sequence} hash does not match its content")]
    HashMismatch { sequence: u64 },
    #[error("history entry could not be canonicalized: {0}")]
    Canonicalize(String),
}

/// Hash of one entry's canonical form, folded over its predecessor.
pub fn compute_entry_hash(
    event: &HistoryEvent,
    previous_hash: Option<&str>,
    sequence: u64,
) -> Result<String, ChainError> {
    let canonical = serde_json::json!({
        "previous_hash": previous_hash,
        "sequence": sequence,
        "instance_id": event.instance_id,
        "task_id": event.task_id,
        "user_id": event.user_id,
        "user_name": event.user_name,
        "action": event.action,
        "comment": event.comment,
        "recorded_at": event.recorded_at,
    });
    let serialized =
        serde_json::to_vec(&canonical).map_err(|e| ChainError::Canonicalize(e.to_string()))?;
    Ok(blake3::hash(&serialized).to_hex().to_string())
}

/// Recompute and check one instance's chain, in ascending sequence order.
pub fn verify_chain(entries: &[HistoryEntry]) -> Result<(), ChainError> {
    let mut previous_hash: Option<&str> = None;
    for (index, entry) in entries.iter().enumerate() {
        let expected_sequence = index as u64 + 1;
        if entry.sequence != expected_sequence {
            return Err(ChainError::SequenceGap {
                expected: expected_sequence,
                found: entry.sequence,
            });
        }
        if entry.previous_hash.as_deref() != previous_hash {
            return Err(ChainError::BrokenLink {
                sequence: entry.sequence,
            });
        }
        let recomputed = compute_entry_hash(&entry.event(), previous_hash, entry.sequence)?;
        if recomputed != entry.hash {
            return Err(ChainError::HashMismatch {
                sequence: entry.sequence,
            });
        }
        previous_hash = Some(entry.hash.as_str());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chained_entries(count: u64) -> Vec<HistoryEntry> {
        let instance_id = InstanceId::generate();
        let mut entries = Vec::new();
        let mut previous: Option<String> = None;
        for sequence in 1..=count {
            let event = HistoryEvent::system(
                instance_id,
                HistoryAction::CompleteTask,
                format!("step {sequence}"),
            );
            let hash = compute_entry_hash(&event, previous.as_deref(), sequence).unwrap();
            entries.push(HistoryEntry {
                id: format!("hist-{sequence}"),
                instance_id: event.instance_id,
                sequence,
                task_id: event.task_id,
                user_id: event.user_id.clone(),
                user_name: event.user_name.clone(),
                action: event.action.clone(),
                comment: event.comment.clone(),
                recorded_at: event.recorded_at,
                previous_hash: previous.clone(),
                hash: hash.clone(),
            });
            previous = Some(hash);
        }
        entries
    }

    #[test]
    fn well_formed_chain_verifies() {
        let entries = chained_entries(4);
        assert!(verify_chain(&entries).is_ok());
        assert!(entries[0].previous_hash.is_none());
        assert_eq!(
            entries[1].previous_hash.as_deref(),
            Some(entries[0].hash.as_str())
        );
    }

    #[test]
    fn edited_comment_breaks_the_chain() {
        let mut entries = chained_entries(3);
        entries[1].comment = "rewritten".to_string();
        assert!(matches!(
            verify_chain(&entries),
            Err(ChainError::HashMismatch { sequence: 2 })
        ));
    }

    #[test]
    fn dropped_entry_breaks_the_chain() {
        let mut entries = chained_entries(3);
        entries.remove(1);
        assert!(matches!(
            verify_chain(&entries),
            Err(ChainError::SequenceGap { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn custom_actions_round_trip() {
        let action = HistoryAction::from("REJECT_APP");
        assert_eq!(action, HistoryAction::Custom("REJECT_APP".to_string()));
        assert_eq!(
            serde_json::to_string(&action).unwrap(),
            "\"REJECT_APP\""
        );
        let parsed: HistoryAction = serde_json::from_str("\"START_PROCESS\"").unwrap();
        assert_eq!(parsed, HistoryAction::StartProcess);
    }
}
