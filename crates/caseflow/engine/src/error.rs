//! Error types for engine operations.

use caseflow_catalog::{CatalogError, RoutingError};
use caseflow_store::StoreError;
use caseflow_types::{InstanceId, ProcessKey, TaskId, UserId};
use thiserror::Error;

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the workflow engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The catalog has no definition for the requested process.
    #[error("unknown process: {0}")]
    UnknownProcess(ProcessKey),

    /// No task with the given id exists.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// No instance with the given id exists.
    #[error("instance {0} not found")]
    InstanceNotFound(InstanceId),

    /// The user id does not resolve in the directory.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// The task is no longer pending. Plain retries and race losers
    /// both land here.
    #[error("task {0} is already completed")]
    TaskAlreadyCompleted(TaskId),

    /// The actor is neither the direct assignee nor a holder of the
    /// task's assigned role.
    #[error("user {user} is not authorized to complete task {task}")]
    UnauthorizedActor {
        /// The actor that attempted the completion.
        user: UserId,
        /// The task the actor attempted to complete.
        task: TaskId,
    },

    /// The catalog could not route the completed task to a successor.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// Catalog construction or lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The storage backend rejected or failed an operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}
