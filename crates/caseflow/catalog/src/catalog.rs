use std::collections::HashMap;

use caseflow_types::{ProcessKey, TaskKey, VariableMap};

use crate::{
    builtin_definitions, CatalogError, CatalogResult, ProcessDefinition, RoutingError,
    RoutingResult, TaskDefinition,
};

/// The deployment's set of process definitions.
///
/// Built once at startup and shared by reference; routing never mutates it.
#[derive(Debug, Clone)]
pub struct ProcessCatalog {
    processes: HashMap<ProcessKey, ProcessDefinition>,
}

impl ProcessCatalog {
    /// A catalog over the given definitions. Rejects duplicates; each
    /// definition was already validated by its own constructor.
    pub fn new(definitions: Vec<ProcessDefinition>) -> CatalogResult<Self> {
        let mut processes = HashMap::with_capacity(definitions.len());
        for definition in definitions {
            let key = definition.key();
            if processes.insert(key, definition).is_some() {
                return Err(CatalogError::DuplicateProcess(key));
            }
        }
        Ok(Self { processes })
    }

    /// The catalog of built-in processes.
    pub fn builtin() -> CatalogResult<Self> {
        Self::new(builtin_definitions()?)
    }

    pub fn definition(&self, process: ProcessKey) -> CatalogResult<&ProcessDefinition> {
        self.processes
            .get(&process)
            .ok_or(CatalogError::UnknownProcess(process))
    }

    /// The fixed first task of a process.
    pub fn entry_task(&self, process: ProcessKey) -> CatalogResult<&TaskDefinition> {
        Ok(self.definition(process)?.entry_task())
    }

    /// Resolve what completing `completed` leads to, given the instance
    /// variables. Pure; storage never enters the picture.
    pub fn route(
        &self,
        process: ProcessKey,
        completed: TaskKey,
        variables: &VariableMap,
    ) -> Result<RoutingResult, RoutingError> {
        let definition = self
            .processes
            .get(&process)
            .ok_or(RoutingError::UnknownProcess(process))?;
        definition.route(completed, variables)
    }

    pub fn processes(&self) -> impl Iterator<Item = &ProcessDefinition> {
        self.processes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseflow_types::{Outcome, Role};
    use serde_json::{json, Value};

    fn vars(value: Value) -> VariableMap {
        match value {
            Value::Object(map) => VariableMap::from(map),
            other => panic!("expected object, got {other}"),
        }
    }

    fn catalog() -> ProcessCatalog {
        ProcessCatalog::builtin().unwrap()
    }

    fn next_key(result: RoutingResult) -> TaskKey {
        match result {
            RoutingResult::NextTask { key, .. } => key,
            RoutingResult::Finished(outcome) => panic!("expected a task, finished {outcome}"),
        }
    }

    #[test]
    fn leave_request_walks_the_academic_chain() {
        let catalog = catalog();
        let academic = vars(json!({"is_academic": true}));
        let process = ProcessKey::LeaveRequest;

        let mut current = catalog.entry_task(process).unwrap().key;
        let expected = [
            TaskKey::ReviewApplicationPd,
            TaskKey::ReviewPrk,
            TaskKey::ReviewPrn,
            TaskKey::MakeDecisionRkr,
            TaskKey::InformHeadOu,
            TaskKey::ImplementChanges,
        ];
        for step in expected {
            current = next_key(catalog.route(process, current, &academic).unwrap());
            assert_eq!(current, step);
        }
        assert_eq!(
            catalog.route(process, current, &academic).unwrap(),
            RoutingResult::Finished(Outcome::Completed)
        );
    }

    #[test]
    fn non_academic_review_goes_to_the_chancellor() {
        let catalog = catalog();
        let result = catalog
            .route(
                ProcessKey::LeaveRequest,
                TaskKey::ReviewApplicationPd,
                &vars(json!({"is_academic": false})),
            )
            .unwrap();
        assert_eq!(next_key(result), TaskKey::MakeDecisionChancellor);
    }

    #[test]
    fn absent_academic_flag_takes_the_declared_default() {
        let catalog = catalog();
        for process in [ProcessKey::LeaveRequest, ProcessKey::EmploymentChange] {
            let gateway_task = match process {
                ProcessKey::LeaveRequest => TaskKey::ReviewApplicationPd,
                _ => TaskKey::ReviewKwe,
            };
            let result = catalog
                .route(process, gateway_task, &VariableMap::new())
                .unwrap();
            assert_eq!(next_key(result), TaskKey::MakeDecisionChancellor);
        }
    }

    #[test]
    fn wrong_typed_flag_is_a_configuration_error() {
        let catalog = catalog();
        let err = catalog
            .route(
                ProcessKey::LeaveRequest,
                TaskKey::ReviewApplicationPd,
                &vars(json!({"is_academic": "yes"})),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RoutingError::FieldType {
                field: "is_academic",
                expected: "boolean",
                found: "string",
                ..
            }
        ));
    }

    #[test]
    fn accepted_decoration_moves_on_everything_else_rejects() {
        let catalog = catalog();
        let process = ProcessKey::Decorations;
        let task = TaskKey::MakeDecision;

        let accepted = catalog
            .route(process, task, &vars(json!({"rkr_decision": "Accepted"})))
            .unwrap();
        assert_eq!(next_key(accepted), TaskKey::ForwardToMpd);

        for variables in [
            vars(json!({"rkr_decision": "Rejected"})),
            vars(json!({"rkr_decision": "Deferred"})),
            VariableMap::new(),
        ] {
            let result = catalog.route(process, task, &variables).unwrap();
            assert_eq!(result, RoutingResult::Finished(Outcome::Rejected));
        }
    }

    #[test]
    fn task_of_another_process_is_a_routing_miss() {
        let catalog = catalog();
        let err = catalog
            .route(
                ProcessKey::LeaveRequest,
                TaskKey::MakeDecision,
                &VariableMap::new(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RoutingError::NotFound {
                process: ProcessKey::LeaveRequest,
                task: TaskKey::MakeDecision,
            }
        ));
    }

    #[test]
    fn catalog_subset_reports_unknown_process() {
        let definitions = builtin_definitions().unwrap();
        let leave_only: Vec<_> = definitions
            .into_iter()
            .filter(|d| d.key() == ProcessKey::LeaveRequest)
            .collect();
        let catalog = ProcessCatalog::new(leave_only).unwrap();

        let err = catalog
            .route(
                ProcessKey::Decorations,
                TaskKey::MakeDecision,
                &VariableMap::new(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RoutingError::UnknownProcess(ProcessKey::Decorations)
        ));

        let err = catalog.definition(ProcessKey::Decorations).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::UnknownProcess(ProcessKey::Decorations)
        ));
    }

    #[test]
    fn duplicate_definitions_are_rejected() {
        let mut definitions = builtin_definitions().unwrap();
        definitions.extend(builtin_definitions().unwrap());
        let err = ProcessCatalog::new(definitions).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateProcess(_)));
    }

    #[test]
    fn entry_roles_come_from_the_definition() {
        let catalog = catalog();
        assert_eq!(
            catalog.entry_task(ProcessKey::LeaveRequest).unwrap().assignee_role,
            Role::HeadOfOrgUnit
        );
        assert_eq!(
            catalog.entry_task(ProcessKey::Decorations).unwrap().assignee_role,
            Role::PersonnelDepartment
        );
    }
}
