//! Write-sets and receipts for the composite commit operations.
//!
//! The engine prepares every record up front (ids included) and hands the
//! store a complete write-set. The store's only job is to apply it
//! atomically or reject it without side effects.

use caseflow_types::{
    HistoryEntry, HistoryEvent, InstanceId, InstanceStatus, ProcessInstance, Task, TaskId,
    VariableMap,
};

/// Everything a process start persists: the new instance, its entry task,
/// and the opening history event. All three commit together or not at all.
#[derive(Debug, Clone)]
pub struct StartTransaction {
    pub instance: ProcessInstance,
    pub entry_task: Task,
    pub log: HistoryEvent,
}

/// Everything a task completion persists.
///
/// `task_id` is the linearization point: the commit succeeds only if it
/// still flips that task from pending to completed, so of two racing
/// completions exactly one wins.
#[derive(Debug, Clone)]
pub struct TransitionTransaction {
    pub instance_id: InstanceId,
    /// The task being completed. Must still be pending at commit time.
    pub task_id: TaskId,
    /// Full merged variable map to store on the instance.
    pub variables: VariableMap,
    /// `Active` when a successor task opens, terminal when the process ends.
    pub status: InstanceStatus,
    /// Successor task, absent when the process reached a terminal state.
    pub next_task: Option<Task>,
    /// History events to append, in order, inside the same commit.
    pub logs: Vec<HistoryEvent>,
}

/// What [`StartTransaction`] persisted.
#[derive(Debug, Clone)]
pub struct StartReceipt {
    pub instance: ProcessInstance,
    pub entry_task: Task,
    /// The opening history entry, hash-chained by the store.
    pub log: HistoryEntry,
}

/// What [`TransitionTransaction`] persisted.
#[derive(Debug, Clone)]
pub struct TransitionReceipt {
    pub instance: ProcessInstance,
    pub completed_task: Task,
    pub next_task: Option<Task>,
    /// The appended history entries, hash-chained by the store.
    pub logs: Vec<HistoryEntry>,
}
