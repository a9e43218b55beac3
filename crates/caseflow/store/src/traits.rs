use async_trait::async_trait;
use caseflow_types::{
    HistoryEntry, HistoryEvent, InstanceId, InstanceStatus, ProcessInstance, Role, Task, TaskId,
    User, UserId, VariableMap,
};

use crate::model::{StartReceipt, StartTransaction, TransitionReceipt, TransitionTransaction};
use crate::StoreResult;

/// Generic query window for paged reads.
///
/// A `limit` of zero means unbounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryWindow {
    pub limit: usize,
    pub offset: usize,
}

/// Storage interface for process instances.
#[async_trait]
pub trait InstanceStore: Send + Sync {
    /// Insert a freshly started instance.
    async fn create_instance(&self, instance: ProcessInstance) -> StoreResult<()>;

    /// Get one instance by id.
    async fn get_instance(&self, id: InstanceId) -> StoreResult<Option<ProcessInstance>>;

    /// List instances newest-first.
    async fn list_instances(&self, window: QueryWindow) -> StoreResult<Vec<ProcessInstance>>;

    /// Replace the variable map and move the status in one write.
    ///
    /// Terminal statuses are absorbing: moving a completed or rejected
    /// instance anywhere else is an invariant violation.
    async fn update_instance(
        &self,
        id: InstanceId,
        variables: VariableMap,
        status: InstanceStatus,
    ) -> StoreResult<ProcessInstance>;
}

/// Storage interface for workflow tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new task. Opening a second pending task for the same
    /// instance is an invariant violation.
    async fn create_task(&self, task: Task) -> StoreResult<()>;

    /// Get one task by id.
    async fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>>;

    /// Flip a task from pending to completed and return it.
    ///
    /// Fails with a conflict if the task already completed, so of two
    /// racing callers exactly one succeeds.
    async fn mark_task_completed(&self, id: TaskId) -> StoreResult<Task>;

    /// Pending tasks routed to a role, oldest-first.
    async fn list_pending_for_role(&self, role: Role) -> StoreResult<Vec<Task>>;

    /// Pending tasks a specific user may act on: directly assigned to
    /// them, or routed to their role. Oldest-first.
    async fn list_pending_for_user(&self, user_id: &UserId, role: Role) -> StoreResult<Vec<Task>>;
}

/// Storage interface for the append-only history log.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append an event and return the stored, hash-linked entry.
    async fn append_history(&self, event: HistoryEvent) -> StoreResult<HistoryEntry>;

    /// Read one instance's trail in recording order.
    async fn list_history(&self, instance_id: InstanceId) -> StoreResult<Vec<HistoryEntry>>;

    /// Hash anchor of the newest entry for an instance.
    async fn latest_history_hash(&self, instance_id: InstanceId) -> StoreResult<Option<String>>;
}

/// Composite commits that apply a whole workflow step atomically.
///
/// One trait method is one atomic unit: a backend either persists the
/// entire write-set or leaves no trace of it.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persist instance, entry task and opening log entry together.
    async fn commit_start(&self, start: StartTransaction) -> StoreResult<StartReceipt>;

    /// Persist a task completion: flip the task, update the instance,
    /// open the successor (if any) and append the log entries together.
    async fn commit_transition(
        &self,
        transition: TransitionTransaction,
    ) -> StoreResult<TransitionReceipt>;
}

/// Lookup of workflow actors. Backed by whatever identity system the
/// deployment has; the engine only needs id, display name and role.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, id: &UserId) -> StoreResult<Option<User>>;
}

/// Unified storage bundle consumed by the workflow engine.
pub trait WorkflowStore:
    InstanceStore + TaskStore + HistoryStore + TransactionStore + Send + Sync
{
}

impl<T> WorkflowStore for T where
    T: InstanceStore + TaskStore + HistoryStore + TransactionStore + Send + Sync
{
}
