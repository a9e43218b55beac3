use caseflow_types::{ProcessKey, TaskKey};

/// A definition (or set of definitions) failed construction-time checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate process definition: {0}")]
    DuplicateProcess(ProcessKey),

    #[error("unknown process: {0}")]
    UnknownProcess(ProcessKey),

    #[error("process {process}: duplicate task definition {task}")]
    DuplicateTask { process: ProcessKey, task: TaskKey },

    #[error("process {process}: more than one routing rule for {task}")]
    DuplicateRule { process: ProcessKey, task: TaskKey },

    #[error("process {process}: entry task {task} is not defined")]
    UndefinedEntryTask { process: ProcessKey, task: TaskKey },

    #[error("process {process}: routing rule attached to undefined task {task}")]
    RuleForUndefinedTask { process: ProcessKey, task: TaskKey },

    #[error("process {process}: rule on {task} targets undefined task {target}")]
    UndefinedTarget {
        process: ProcessKey,
        task: TaskKey,
        target: TaskKey,
    },

    #[error("process {process}: task {task} has no routing rule")]
    MissingRule { process: ProcessKey, task: TaskKey },

    #[error("process {process}: task {task} is unreachable from the entry task")]
    UnreachableTask { process: ProcessKey, task: TaskKey },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Routing failed at runtime. Every variant is a configuration or data
/// problem the caller must treat as fatal for the call; none of them are
/// normal outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    #[error("no definition for process {0} in this catalog")]
    UnknownProcess(ProcessKey),

    #[error("no routing rule for task {task} in process {process}")]
    NotFound { process: ProcessKey, task: TaskKey },

    #[error(
        "process {process}, task {task}: gateway field {field:?} expected {expected}, found {found}"
    )]
    FieldType {
        process: ProcessKey,
        task: TaskKey,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}
