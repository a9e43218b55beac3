use caseflow_types::{Outcome, Role, TaskKey};

/// Where a gateway branch lands: another task, or the end of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Task(TaskKey),
    Terminal(Outcome),
}

/// The authoring form of one task's outgoing edge.
///
/// Rules are inspectable data. Both gateway forms name the variable they
/// read, the type they expect, and where an absent value goes, so a
/// definition review can audit every branch without running anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingRule {
    /// Unconditional hand-off to the next task.
    Next(TaskKey),

    /// Completing this task ends the instance.
    Terminal(Outcome),

    /// Two-way branch on a boolean variable. An absent field reads as
    /// `default`; a present non-boolean value fails routing.
    BoolGateway {
        field: &'static str,
        default: bool,
        when_true: Branch,
        when_false: Branch,
    },

    /// Two-way branch on a string decision variable. Only an exact match
    /// with `accepted` takes the accepting branch; every other string, and
    /// an absent field, takes `otherwise`. A present non-string value fails
    /// routing.
    ChoiceGateway {
        field: &'static str,
        accepted: &'static str,
        on_accept: Branch,
        otherwise: Branch,
    },
}

/// Answer to "this task was just completed, what now?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingResult {
    /// Open this task next.
    NextTask {
        key: TaskKey,
        name: &'static str,
        assignee_role: Role,
    },
    /// The instance ends with this outcome.
    Finished(Outcome),
}
