use std::collections::{HashMap, HashSet};

use caseflow_types::{Outcome, ProcessKey, Role, TaskKey, VariableMap};
use serde_json::Value;

use crate::{Branch, CatalogError, CatalogResult, RoutingError, RoutingResult, RoutingRule};

/// One step of a process graph: what the task is called and which role
/// works it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskDefinition {
    pub key: TaskKey,
    pub name: &'static str,
    pub assignee_role: Role,
}

impl TaskDefinition {
    pub const fn new(key: TaskKey, name: &'static str, assignee_role: Role) -> Self {
        Self {
            key,
            name,
            assignee_role,
        }
    }
}

/// A validated, compiled process graph.
///
/// Construction resolves every rule target against the task table and
/// rejects malformed graphs, so [`route`](Self::route) never meets a
/// dangling reference.
#[derive(Debug, Clone)]
pub struct ProcessDefinition {
    key: ProcessKey,
    name: &'static str,
    entry: TaskDefinition,
    tasks: HashMap<TaskKey, TaskDefinition>,
    rules: HashMap<TaskKey, CompiledRule>,
}

impl ProcessDefinition {
    /// Build and validate a definition. Checks, in order: unique task keys,
    /// entry task defined, every rule attached to a defined task and free of
    /// dangling targets, exactly one rule per task, and every task reachable
    /// from the entry.
    pub fn new(
        key: ProcessKey,
        name: &'static str,
        entry: TaskKey,
        tasks: Vec<TaskDefinition>,
        rules: Vec<(TaskKey, RoutingRule)>,
    ) -> CatalogResult<Self> {
        let mut task_index = HashMap::with_capacity(tasks.len());
        for task in &tasks {
            if task_index.insert(task.key, *task).is_some() {
                return Err(CatalogError::DuplicateTask {
                    process: key,
                    task: task.key,
                });
            }
        }

        let entry_task = *task_index
            .get(&entry)
            .ok_or(CatalogError::UndefinedEntryTask {
                process: key,
                task: entry,
            })?;

        let mut compiled = HashMap::with_capacity(rules.len());
        for (source, rule) in rules {
            if !task_index.contains_key(&source) {
                return Err(CatalogError::RuleForUndefinedTask {
                    process: key,
                    task: source,
                });
            }
            let rule = compile_rule(key, source, rule, &task_index)?;
            if compiled.insert(source, rule).is_some() {
                return Err(CatalogError::DuplicateRule {
                    process: key,
                    task: source,
                });
            }
        }

        for task in &tasks {
            if !compiled.contains_key(&task.key) {
                return Err(CatalogError::MissingRule {
                    process: key,
                    task: task.key,
                });
            }
        }

        validate_reachability(key, entry, &tasks, &compiled)?;

        Ok(Self {
            key,
            name,
            entry: entry_task,
            tasks: task_index,
            rules: compiled,
        })
    }

    pub fn key(&self) -> ProcessKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The task every new instance opens with.
    pub fn entry_task(&self) -> &TaskDefinition {
        &self.entry
    }

    pub fn task(&self, key: TaskKey) -> Option<&TaskDefinition> {
        self.tasks.get(&key)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.values()
    }

    /// Pure routing step: resolve the completed task's rule against the
    /// instance variables.
    pub fn route(
        &self,
        completed: TaskKey,
        variables: &VariableMap,
    ) -> Result<RoutingResult, RoutingError> {
        let rule = self.rules.get(&completed).ok_or(RoutingError::NotFound {
            process: self.key,
            task: completed,
        })?;

        let branch = rule
            .resolve(variables)
            .map_err(|mismatch| RoutingError::FieldType {
                process: self.key,
                task: completed,
                field: mismatch.field,
                expected: mismatch.expected,
                found: mismatch.found,
            })?;

        let result = match branch {
            CompiledBranch::Task(def) => RoutingResult::NextTask {
                key: def.key,
                name: def.name,
                assignee_role: def.assignee_role,
            },
            CompiledBranch::Terminal(outcome) => RoutingResult::Finished(outcome),
        };
        tracing::trace!(
            process = %self.key,
            completed = %completed,
            result = ?result,
            "routing resolved"
        );
        Ok(result)
    }
}

/// Rule with branch targets resolved to their task definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompiledRule {
    Next(TaskDefinition),
    Terminal(Outcome),
    BoolGateway {
        field: &'static str,
        default: bool,
        when_true: CompiledBranch,
        when_false: CompiledBranch,
    },
    ChoiceGateway {
        field: &'static str,
        accepted: &'static str,
        on_accept: CompiledBranch,
        otherwise: CompiledBranch,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompiledBranch {
    Task(TaskDefinition),
    Terminal(Outcome),
}

struct FieldTypeMismatch {
    field: &'static str,
    expected: &'static str,
    found: &'static str,
}

impl CompiledRule {
    fn resolve(&self, variables: &VariableMap) -> Result<CompiledBranch, FieldTypeMismatch> {
        match *self {
            CompiledRule::Next(def) => Ok(CompiledBranch::Task(def)),
            CompiledRule::Terminal(outcome) => Ok(CompiledBranch::Terminal(outcome)),
            CompiledRule::BoolGateway {
                field,
                default,
                when_true,
                when_false,
            } => {
                let flag = match variables.get(field) {
                    None => default,
                    Some(&Value::Bool(flag)) => flag,
                    Some(other) => {
                        return Err(FieldTypeMismatch {
                            field,
                            expected: "boolean",
                            found: json_type_name(other),
                        })
                    }
                };
                Ok(if flag { when_true } else { when_false })
            }
            CompiledRule::ChoiceGateway {
                field,
                accepted,
                on_accept,
                otherwise,
            } => match variables.get(field) {
                None => Ok(otherwise),
                Some(Value::String(choice)) if choice.as_str() == accepted => Ok(on_accept),
                Some(Value::String(_)) => Ok(otherwise),
                Some(other) => Err(FieldTypeMismatch {
                    field,
                    expected: "string",
                    found: json_type_name(other),
                }),
            },
        }
    }

    fn successors(&self) -> Vec<TaskKey> {
        match *self {
            CompiledRule::Next(def) => vec![def.key],
            CompiledRule::Terminal(_) => Vec::new(),
            CompiledRule::BoolGateway {
                when_true,
                when_false,
                ..
            } => branch_keys(&[when_true, when_false]),
            CompiledRule::ChoiceGateway {
                on_accept,
                otherwise,
                ..
            } => branch_keys(&[on_accept, otherwise]),
        }
    }
}

fn branch_keys(branches: &[CompiledBranch]) -> Vec<TaskKey> {
    branches
        .iter()
        .filter_map(|branch| match branch {
            CompiledBranch::Task(def) => Some(def.key),
            CompiledBranch::Terminal(_) => None,
        })
        .collect()
}

fn compile_rule(
    process: ProcessKey,
    source: TaskKey,
    rule: RoutingRule,
    tasks: &HashMap<TaskKey, TaskDefinition>,
) -> CatalogResult<CompiledRule> {
    let compile_branch = |branch: Branch| -> CatalogResult<CompiledBranch> {
        match branch {
            Branch::Task(target) => tasks
                .get(&target)
                .copied()
                .map(CompiledBranch::Task)
                .ok_or(CatalogError::UndefinedTarget {
                    process,
                    task: source,
                    target,
                }),
            Branch::Terminal(outcome) => Ok(CompiledBranch::Terminal(outcome)),
        }
    };

    match rule {
        RoutingRule::Next(target) => tasks
            .get(&target)
            .copied()
            .map(CompiledRule::Next)
            .ok_or(CatalogError::UndefinedTarget {
                process,
                task: source,
                target,
            }),
        RoutingRule::Terminal(outcome) => Ok(CompiledRule::Terminal(outcome)),
        RoutingRule::BoolGateway {
            field,
            default,
            when_true,
            when_false,
        } => Ok(CompiledRule::BoolGateway {
            field,
            default,
            when_true: compile_branch(when_true)?,
            when_false: compile_branch(when_false)?,
        }),
        RoutingRule::ChoiceGateway {
            field,
            accepted,
            on_accept,
            otherwise,
        } => Ok(CompiledRule::ChoiceGateway {
            field,
            accepted,
            on_accept: compile_branch(on_accept)?,
            otherwise: compile_branch(otherwise)?,
        }),
    }
}

fn validate_reachability(
    process: ProcessKey,
    entry: TaskKey,
    tasks: &[TaskDefinition],
    rules: &HashMap<TaskKey, CompiledRule>,
) -> CatalogResult<()> {
    let mut visited = HashSet::new();
    let mut frontier = vec![entry];
    while let Some(current) = frontier.pop() {
        if !visited.insert(current) {
            continue;
        }
        if let Some(rule) = rules.get(&current) {
            frontier.extend(rule.successors());
        }
    }

    for task in tasks {
        if !visited.contains(&task.key) {
            return Err(CatalogError::UnreachableTask {
                process,
                task: task.key,
            });
        }
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseflow_types::TaskKey::{
        ImplementChanges, InformHeadOu, ReviewAndForwardHeadOu, ReviewApplicationPd,
    };

    fn head_ou() -> TaskDefinition {
        TaskDefinition::new(ReviewAndForwardHeadOu, "Review", Role::HeadOfOrgUnit)
    }

    fn pd_review() -> TaskDefinition {
        TaskDefinition::new(ReviewApplicationPd, "Check", Role::PersonnelDepartment)
    }

    fn make(
        entry: TaskKey,
        tasks: Vec<TaskDefinition>,
        rules: Vec<(TaskKey, RoutingRule)>,
    ) -> CatalogResult<ProcessDefinition> {
        ProcessDefinition::new(ProcessKey::LeaveRequest, "test process", entry, tasks, rules)
    }

    #[test]
    fn linear_definition_is_accepted() {
        let definition = make(
            ReviewAndForwardHeadOu,
            vec![head_ou(), pd_review()],
            vec![
                (ReviewAndForwardHeadOu, RoutingRule::Next(ReviewApplicationPd)),
                (ReviewApplicationPd, RoutingRule::Terminal(Outcome::Completed)),
            ],
        )
        .unwrap();

        assert_eq!(definition.entry_task().key, ReviewAndForwardHeadOu);
        assert_eq!(
            definition.task(ReviewApplicationPd).unwrap().assignee_role,
            Role::PersonnelDepartment
        );
    }

    #[test]
    fn duplicate_task_is_rejected() {
        let err = make(
            ReviewAndForwardHeadOu,
            vec![head_ou(), head_ou()],
            vec![(ReviewAndForwardHeadOu, RoutingRule::Terminal(Outcome::Completed))],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateTask { .. }));
    }

    #[test]
    fn undefined_entry_is_rejected() {
        let err = make(
            InformHeadOu,
            vec![head_ou()],
            vec![(ReviewAndForwardHeadOu, RoutingRule::Terminal(Outcome::Completed))],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::UndefinedEntryTask {
                task: InformHeadOu,
                ..
            }
        ));
    }

    #[test]
    fn rule_on_undefined_task_is_rejected() {
        let err = make(
            ReviewAndForwardHeadOu,
            vec![head_ou()],
            vec![
                (ReviewAndForwardHeadOu, RoutingRule::Terminal(Outcome::Completed)),
                (InformHeadOu, RoutingRule::Terminal(Outcome::Completed)),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::RuleForUndefinedTask {
                task: InformHeadOu,
                ..
            }
        ));
    }

    #[test]
    fn dangling_next_target_is_rejected() {
        let err = make(
            ReviewAndForwardHeadOu,
            vec![head_ou()],
            vec![(ReviewAndForwardHeadOu, RoutingRule::Next(ImplementChanges))],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::UndefinedTarget {
                target: ImplementChanges,
                ..
            }
        ));
    }

    #[test]
    fn dangling_gateway_branch_is_rejected() {
        let err = make(
            ReviewAndForwardHeadOu,
            vec![head_ou(), pd_review()],
            vec![
                (
                    ReviewAndForwardHeadOu,
                    RoutingRule::BoolGateway {
                        field: "ok",
                        default: false,
                        when_true: Branch::Task(ReviewApplicationPd),
                        when_false: Branch::Task(ImplementChanges),
                    },
                ),
                (ReviewApplicationPd, RoutingRule::Terminal(Outcome::Completed)),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::UndefinedTarget {
                target: ImplementChanges,
                ..
            }
        ));
    }

    #[test]
    fn task_without_rule_is_rejected() {
        let err = make(
            ReviewAndForwardHeadOu,
            vec![head_ou(), pd_review()],
            vec![(ReviewAndForwardHeadOu, RoutingRule::Next(ReviewApplicationPd))],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingRule {
                task: ReviewApplicationPd,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_rule_is_rejected() {
        let err = make(
            ReviewAndForwardHeadOu,
            vec![head_ou()],
            vec![
                (ReviewAndForwardHeadOu, RoutingRule::Terminal(Outcome::Completed)),
                (ReviewAndForwardHeadOu, RoutingRule::Terminal(Outcome::Rejected)),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateRule { .. }));
    }

    #[test]
    fn unreachable_task_is_rejected() {
        let err = make(
            ReviewAndForwardHeadOu,
            vec![head_ou(), pd_review()],
            vec![
                (ReviewAndForwardHeadOu, RoutingRule::Terminal(Outcome::Completed)),
                (ReviewApplicationPd, RoutingRule::Terminal(Outcome::Completed)),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::UnreachableTask {
                task: ReviewApplicationPd,
                ..
            }
        ));
    }

    #[test]
    fn routing_miss_is_an_error() {
        let definition = make(
            ReviewAndForwardHeadOu,
            vec![head_ou()],
            vec![(ReviewAndForwardHeadOu, RoutingRule::Terminal(Outcome::Completed))],
        )
        .unwrap();

        let err = definition
            .route(ImplementChanges, &VariableMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            RoutingError::NotFound {
                task: ImplementChanges,
                ..
            }
        ));
    }
}
