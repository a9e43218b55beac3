use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use caseflow_catalog::{ProcessCatalog, RoutingResult};
use caseflow_store::{
    QueryWindow, StartTransaction, StoreError, TransitionTransaction, UserDirectory, WorkflowStore,
};
use caseflow_types::{
    HistoryAction, HistoryEntry, HistoryEvent, InstanceId, InstanceStatus, ProcessInstance,
    ProcessKey, Task, TaskId, TaskStatus, UserId, VariableMap,
};

use crate::error::{EngineError, EngineResult};

/// The workflow engine: starts process instances, completes tasks, and
/// answers queries about running work.
///
/// The engine owns no state of its own. Process graphs live in the
/// [`ProcessCatalog`], records live behind [`WorkflowStore`], and people
/// live behind [`UserDirectory`]; the engine's job is to sequence the three
/// so that every state change is routed first and committed atomically.
#[derive(Clone)]
pub struct WorkflowEngine {
    store: Arc<dyn WorkflowStore>,
    directory: Arc<dyn UserDirectory>,
    catalog: Arc<ProcessCatalog>,
}

impl WorkflowEngine {
    /// An engine over the given storage, directory, and catalog.
    pub fn new(
        store: Arc<dyn WorkflowStore>,
        directory: Arc<dyn UserDirectory>,
        catalog: Arc<ProcessCatalog>,
    ) -> Self {
        Self {
            store,
            directory,
            catalog,
        }
    }

    /// An engine over the built-in process catalog.
    pub fn with_builtin_catalog(
        store: Arc<dyn WorkflowStore>,
        directory: Arc<dyn UserDirectory>,
    ) -> EngineResult<Self> {
        Ok(Self::new(store, directory, Arc::new(ProcessCatalog::builtin()?)))
    }

    /// The catalog this engine routes with.
    pub fn catalog(&self) -> &ProcessCatalog {
        &self.catalog
    }

    // ============ Lifecycle Operations ============

    /// Start a new instance of `process_key` on behalf of `requester`.
    ///
    /// The start form becomes the instance's initial variables, the
    /// process's entry task is opened as `PENDING`, and a `START_PROCESS`
    /// history entry is recorded. All three records are committed as one
    /// unit; a failure leaves nothing behind.
    pub async fn start_process(
        &self,
        process_key: ProcessKey,
        requester: &UserId,
        form: VariableMap,
    ) -> EngineResult<ProcessInstance> {
        // Step 1: The process must exist in the catalog.
        let entry = *self
            .catalog
            .entry_task(process_key)
            .map_err(|_| EngineError::UnknownProcess(process_key))?;

        // Step 2: The requester must resolve in the directory.
        let user = self
            .directory
            .get_user(requester)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(requester.clone()))?;

        // Step 3: Build the write-set and commit it atomically.
        let now = Utc::now();
        let instance = ProcessInstance {
            id: InstanceId::generate(),
            process_key,
            status: InstanceStatus::Active,
            requester: user.id.clone(),
            variables: form,
            created_at: now,
        };
        let entry_task = Task {
            id: TaskId::generate(),
            instance_id: instance.id,
            key: entry.key,
            name: entry.name.to_string(),
            assignee_role: entry.assignee_role,
            assignee_user: None,
            status: TaskStatus::Pending,
            created_at: now,
        };
        let log = HistoryEvent::by_user(
            instance.id,
            &user,
            HistoryAction::StartProcess,
            "Process started",
        );

        let receipt = self
            .store
            .commit_start(StartTransaction {
                instance,
                entry_task,
                log,
            })
            .await?;

        info!(
            instance = %receipt.instance.id,
            process = %process_key,
            entry_task = %receipt.entry_task.key,
            role = %receipt.entry_task.assignee_role,
            "process started"
        );
        Ok(receipt.instance)
    }

    /// Complete a pending task as `actor`, submitting `submitted` form data.
    ///
    /// Completion works in three phases:
    /// 1. Load and check: the task must exist and be pending, its instance
    ///    must exist, and the actor must be authorized for it.
    /// 2. Route: submitted data is merged over the instance variables
    ///    (submitted wins per key) and the catalog resolves the successor.
    ///    Nothing has been written yet, so a routing failure leaves the
    ///    instance exactly as it was.
    /// 3. Commit: the task flips to `COMPLETED`, the merged variables and
    ///    any status change land on the instance, the successor task (if
    ///    any) opens, and history entries are appended, all in one unit.
    ///
    /// Two actors racing on the same task are serialized by the store's
    /// check-and-set on the task status; the loser gets
    /// [`EngineError::TaskAlreadyCompleted`].
    pub async fn complete_task(
        &self,
        task_id: TaskId,
        actor: &UserId,
        submitted: VariableMap,
    ) -> EngineResult<ProcessInstance> {
        // Step 1: The task must exist.
        let task = self
            .store
            .get_task(task_id)
            .await?
            .ok_or(EngineError::TaskNotFound(task_id))?;

        // Step 2: Retries of a finished task are rejected before any work.
        if !task.is_pending() {
            return Err(EngineError::TaskAlreadyCompleted(task_id));
        }

        // Step 3: The owning instance must exist.
        let instance = self
            .store
            .get_instance(task.instance_id)
            .await?
            .ok_or(EngineError::InstanceNotFound(task.instance_id))?;

        // Step 4: The actor must be known and authorized. A direct assignee
        // must match exactly; otherwise role equality decides.
        let user = self
            .directory
            .get_user(actor)
            .await?
            .ok_or_else(|| EngineError::UnauthorizedActor {
                user: actor.clone(),
                task: task_id,
            })?;
        if !task.is_actionable_by(&user) {
            debug!(
                task = %task_id,
                actor = %user.id,
                role = %user.role,
                "actor not authorized for task"
            );
            return Err(EngineError::UnauthorizedActor {
                user: actor.clone(),
                task: task_id,
            });
        }

        // Step 5: Merge the submission over the instance variables,
        // submitted values winning per key.
        let merged = instance.variables.clone().merged_with(&submitted);

        // Step 6: Route on the merged variables before anything is written.
        let routed = self
            .catalog
            .route(instance.process_key, task.key, &merged)?;

        // Step 7: Assemble the write-set and commit it in one unit.
        let submitted_json = serde_json::to_string(&submitted)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut logs = vec![HistoryEvent::by_user(
            instance.id,
            &user,
            HistoryAction::CompleteTask,
            format!("Completed {} {}", task.name, submitted_json),
        )
        .with_task(task_id)];

        let (status, next_task) = match routed {
            RoutingResult::NextTask {
                key,
                name,
                assignee_role,
            } => {
                let next = Task {
                    id: TaskId::generate(),
                    instance_id: instance.id,
                    key,
                    name: name.to_string(),
                    assignee_role,
                    assignee_user: None,
                    status: TaskStatus::Pending,
                    created_at: Utc::now(),
                };
                (InstanceStatus::Active, Some(next))
            }
            RoutingResult::Finished(outcome) => {
                let status = InstanceStatus::from(outcome);
                logs.push(HistoryEvent::system(
                    instance.id,
                    HistoryAction::EndProcess,
                    format!("Process ended with status {status}"),
                ));
                (status, None)
            }
        };

        let receipt = self
            .store
            .commit_transition(TransitionTransaction {
                instance_id: instance.id,
                task_id,
                variables: merged,
                status,
                next_task,
                logs,
            })
            .await
            .map_err(|err| match err {
                // The check-and-set lost a race. To the caller that is
                // indistinguishable from retrying a completed task.
                StoreError::Conflict(_) => EngineError::TaskAlreadyCompleted(task_id),
                other => EngineError::Store(other),
            })?;

        info!(
            instance = %receipt.instance.id,
            task = %task.key,
            actor = %user.id,
            status = %receipt.instance.status,
            "task completed"
        );
        if let Some(next) = &receipt.next_task {
            debug!(
                instance = %receipt.instance.id,
                next = %next.key,
                role = %next.assignee_role,
                "successor task opened"
            );
        }
        Ok(receipt.instance)
    }

    // ============ Query Operations ============

    /// Fetch one instance by id.
    pub async fn instance(&self, id: InstanceId) -> EngineResult<ProcessInstance> {
        self.store
            .get_instance(id)
            .await?
            .ok_or(EngineError::InstanceNotFound(id))
    }

    /// List instances, newest first.
    pub async fn instances(&self, window: QueryWindow) -> EngineResult<Vec<ProcessInstance>> {
        Ok(self.store.list_instances(window).await?)
    }

    /// The user's work queue: pending tasks assigned to them directly or
    /// routed to their role, oldest first.
    pub async fn pending_tasks_for(&self, user_id: &UserId) -> EngineResult<Vec<Task>> {
        let user = self
            .directory
            .get_user(user_id)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(user_id.clone()))?;
        Ok(self.store.list_pending_for_user(&user.id, user.role).await?)
    }

    /// An instance's audit trail in recording order.
    pub async fn history(&self, instance_id: InstanceId) -> EngineResult<Vec<HistoryEntry>> {
        if self.store.get_instance(instance_id).await?.is_none() {
            return Err(EngineError::InstanceNotFound(instance_id));
        }
        Ok(self.store.list_history(instance_id).await?)
    }
}
