//! In-memory reference implementation of the storage traits.
//!
//! This adapter is deterministic and test-friendly. Production deployments
//! should use a transactional backend (e.g. PostgreSQL) for source-of-truth
//! data.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use caseflow_types::{
    compute_entry_hash, HistoryEntry, HistoryEvent, InstanceId, InstanceStatus, ProcessInstance,
    Role, Task, TaskId, TaskStatus, User, UserId, VariableMap,
};
use uuid::Uuid;

use crate::model::{StartReceipt, StartTransaction, TransitionReceipt, TransitionTransaction};
use crate::traits::{
    HistoryStore, InstanceStore, QueryWindow, TaskStore, TransactionStore, UserDirectory,
};
use crate::{StoreError, StoreResult};

/// In-memory workflow store.
///
/// All tables live behind one lock so the composite commits and the
/// pending-to-completed flip are single critical sections.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    instances: HashMap<InstanceId, ProcessInstance>,
    tasks: HashMap<TaskId, Task>,
    history: HashMap<InstanceId, Vec<HistoryEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }
}

impl Tables {
    /// Number of chained entries and newest hash for one instance.
    fn chain_state(&self, instance_id: InstanceId) -> (u64, Option<String>) {
        match self.history.get(&instance_id) {
            Some(chain) => (chain.len() as u64, chain.last().map(|e| e.hash.clone())),
            None => (0, None),
        }
    }

    /// Build one hash-linked entry without touching state.
    fn build_entry(&self, event: HistoryEvent) -> StoreResult<HistoryEntry> {
        let (count, previous_hash) = self.chain_state(event.instance_id);
        make_entry(event, count + 1, previous_hash)
    }

    /// Build hash-linked entries for a batch of events on one instance,
    /// without touching state.
    fn build_entries(
        &self,
        instance_id: InstanceId,
        events: Vec<HistoryEvent>,
    ) -> StoreResult<Vec<HistoryEntry>> {
        let (mut sequence, mut previous_hash) = self.chain_state(instance_id);
        let mut entries = Vec::with_capacity(events.len());
        for event in events {
            sequence += 1;
            let entry = make_entry(event, sequence, previous_hash)?;
            previous_hash = Some(entry.hash.clone());
            entries.push(entry);
        }
        Ok(entries)
    }

    fn push_entries(&mut self, entries: Vec<HistoryEntry>) {
        for entry in entries {
            self.history.entry(entry.instance_id).or_default().push(entry);
        }
    }
}

fn make_entry(
    event: HistoryEvent,
    sequence: u64,
    previous_hash: Option<String>,
) -> StoreResult<HistoryEntry> {
    let hash = compute_entry_hash(&event, previous_hash.as_deref(), sequence)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(HistoryEntry {
        id: format!("hist-{}", Uuid::new_v4()),
        instance_id: event.instance_id,
        sequence,
        task_id: event.task_id,
        user_id: event.user_id,
        user_name: event.user_name,
        action: event.action,
        comment: event.comment,
        recorded_at: event.recorded_at,
        previous_hash,
        hash,
    })
}

#[async_trait]
impl InstanceStore for InMemoryStore {
    async fn create_instance(&self, instance: ProcessInstance) -> StoreResult<()> {
        let mut tables = self.write()?;
        if tables.instances.contains_key(&instance.id) {
            return Err(StoreError::Conflict(format!(
                "instance {} already exists",
                instance.id
            )));
        }
        tables.instances.insert(instance.id, instance);
        Ok(())
    }

    async fn get_instance(&self, id: InstanceId) -> StoreResult<Option<ProcessInstance>> {
        let tables = self.read()?;
        Ok(tables.instances.get(&id).cloned())
    }

    async fn list_instances(&self, window: QueryWindow) -> StoreResult<Vec<ProcessInstance>> {
        let tables = self.read()?;
        let mut values = tables.instances.values().cloned().collect::<Vec<_>>();
        values.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(apply_window(values, window))
    }

    async fn update_instance(
        &self,
        id: InstanceId,
        variables: VariableMap,
        status: InstanceStatus,
    ) -> StoreResult<ProcessInstance> {
        let mut tables = self.write()?;
        let instance = tables
            .instances
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("instance {} not found", id)))?;
        if !instance.status.can_transition_to(status) {
            return Err(StoreError::InvariantViolation(format!(
                "instance {} cannot move from {} to {}",
                id, instance.status, status
            )));
        }
        instance.variables = variables;
        instance.status = status;
        Ok(instance.clone())
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn create_task(&self, task: Task) -> StoreResult<()> {
        let mut tables = self.write()?;
        if !tables.instances.contains_key(&task.instance_id) {
            return Err(StoreError::NotFound(format!(
                "instance {} not found",
                task.instance_id
            )));
        }
        if tables.tasks.contains_key(&task.id) {
            return Err(StoreError::Conflict(format!("task {} already exists", task.id)));
        }
        if task.is_pending()
            && tables
                .tasks
                .values()
                .any(|t| t.instance_id == task.instance_id && t.is_pending())
        {
            return Err(StoreError::InvariantViolation(format!(
                "instance {} already has a pending task",
                task.instance_id
            )));
        }
        tables.tasks.insert(task.id, task);
        Ok(())
    }

    async fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let tables = self.read()?;
        Ok(tables.tasks.get(&id).cloned())
    }

    async fn mark_task_completed(&self, id: TaskId) -> StoreResult<Task> {
        let mut tables = self.write()?;
        let task = tables
            .tasks
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("task {} not found", id)))?;
        if !task.is_pending() {
            return Err(StoreError::Conflict(format!("task {} is not pending", id)));
        }
        task.status = TaskStatus::Completed;
        Ok(task.clone())
    }

    async fn list_pending_for_role(&self, role: Role) -> StoreResult<Vec<Task>> {
        let tables = self.read()?;
        let mut values = tables
            .tasks
            .values()
            .filter(|task| task.is_pending() && task.assignee_role == role)
            .cloned()
            .collect::<Vec<_>>();
        values.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(values)
    }

    async fn list_pending_for_user(&self, user_id: &UserId, role: Role) -> StoreResult<Vec<Task>> {
        let tables = self.read()?;
        let mut values = tables
            .tasks
            .values()
            .filter(|task| {
                task.is_pending()
                    && (task.assignee_user.as_ref() == Some(user_id) || task.assignee_role == role)
            })
            .cloned()
            .collect::<Vec<_>>();
        values.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(values)
    }
}

#[async_trait]
impl HistoryStore for InMemoryStore {
    async fn append_history(&self, event: HistoryEvent) -> StoreResult<HistoryEntry> {
        let mut tables = self.write()?;
        if !tables.instances.contains_key(&event.instance_id) {
            return Err(StoreError::NotFound(format!(
                "instance {} not found",
                event.instance_id
            )));
        }
        let entry = tables.build_entry(event)?;
        tables.push_entries(vec![entry.clone()]);
        Ok(entry)
    }

    async fn list_history(&self, instance_id: InstanceId) -> StoreResult<Vec<HistoryEntry>> {
        let tables = self.read()?;
        Ok(tables.history.get(&instance_id).cloned().unwrap_or_default())
    }

    async fn latest_history_hash(&self, instance_id: InstanceId) -> StoreResult<Option<String>> {
        let tables = self.read()?;
        let (_, hash) = tables.chain_state(instance_id);
        Ok(hash)
    }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn commit_start(&self, start: StartTransaction) -> StoreResult<StartReceipt> {
        let mut tables = self.write()?;

        if start.entry_task.instance_id != start.instance.id
            || start.log.instance_id != start.instance.id
        {
            return Err(StoreError::InvalidInput(
                "start write-set spans more than one instance".to_string(),
            ));
        }
        if tables.instances.contains_key(&start.instance.id) {
            return Err(StoreError::Conflict(format!(
                "instance {} already exists",
                start.instance.id
            )));
        }
        if tables.tasks.contains_key(&start.entry_task.id) {
            return Err(StoreError::Conflict(format!(
                "task {} already exists",
                start.entry_task.id
            )));
        }

        let log = tables.build_entry(start.log)?;

        tables.instances.insert(start.instance.id, start.instance.clone());
        tables.tasks.insert(start.entry_task.id, start.entry_task.clone());
        tables.push_entries(vec![log.clone()]);

        Ok(StartReceipt {
            instance: start.instance,
            entry_task: start.entry_task,
            log,
        })
    }

    async fn commit_transition(
        &self,
        transition: TransitionTransaction,
    ) -> StoreResult<TransitionReceipt> {
        let mut tables = self.write()?;

        // Check everything before writing anything; a rejected commit must
        // leave no trace.
        let task = tables
            .tasks
            .get(&transition.task_id)
            .ok_or_else(|| StoreError::NotFound(format!("task {} not found", transition.task_id)))?;
        if task.instance_id != transition.instance_id {
            return Err(StoreError::InvalidInput(format!(
                "task {} does not belong to instance {}",
                transition.task_id, transition.instance_id
            )));
        }
        if !task.is_pending() {
            return Err(StoreError::Conflict(format!(
                "task {} is not pending",
                transition.task_id
            )));
        }

        let instance = tables.instances.get(&transition.instance_id).ok_or_else(|| {
            StoreError::NotFound(format!("instance {} not found", transition.instance_id))
        })?;
        if !instance.status.can_transition_to(transition.status) {
            return Err(StoreError::InvariantViolation(format!(
                "instance {} cannot move from {} to {}",
                transition.instance_id, instance.status, transition.status
            )));
        }

        if let Some(next) = &transition.next_task {
            if next.instance_id != transition.instance_id {
                return Err(StoreError::InvalidInput(format!(
                    "task {} does not belong to instance {}",
                    next.id, transition.instance_id
                )));
            }
            if tables.tasks.contains_key(&next.id) {
                return Err(StoreError::Conflict(format!("task {} already exists", next.id)));
            }
            // Once the completing task flips, the successor must be the only
            // pending task on the instance.
            let other_pending = tables.tasks.values().any(|t| {
                t.instance_id == transition.instance_id
                    && t.is_pending()
                    && t.id != transition.task_id
            });
            if other_pending {
                return Err(StoreError::InvariantViolation(format!(
                    "instance {} already has a pending task",
                    transition.instance_id
                )));
            }
        }
        for log in &transition.logs {
            if log.instance_id != transition.instance_id {
                return Err(StoreError::InvalidInput(
                    "log entry does not belong to the instance".to_string(),
                ));
            }
        }

        let entries = tables.build_entries(transition.instance_id, transition.logs)?;

        let completed_task = {
            let task = tables.tasks.get_mut(&transition.task_id).ok_or_else(|| {
                StoreError::NotFound(format!("task {} not found", transition.task_id))
            })?;
            task.status = TaskStatus::Completed;
            task.clone()
        };
        let instance = {
            let instance = tables.instances.get_mut(&transition.instance_id).ok_or_else(|| {
                StoreError::NotFound(format!("instance {} not found", transition.instance_id))
            })?;
            instance.variables = transition.variables;
            instance.status = transition.status;
            instance.clone()
        };
        if let Some(next) = &transition.next_task {
            tables.tasks.insert(next.id, next.clone());
        }
        tables.push_entries(entries.clone());

        Ok(TransitionReceipt {
            instance,
            completed_task,
            next_task: transition.next_task,
            logs: entries,
        })
    }
}

/// In-memory user directory for tests and demo setups.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory pre-populated with one user per role; ids match usernames.
    pub fn seed_demo_roster() -> Self {
        let users = demo_roster()
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// Insert or replace a user.
    pub fn insert(&self, user: User) -> StoreResult<()> {
        let mut guard = self
            .users
            .write()
            .map_err(|_| StoreError::Backend("user lock poisoned".to_string()))?;
        guard.insert(user.id.clone(), user);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_user(&self, id: &UserId) -> StoreResult<Option<User>> {
        let guard = self
            .users
            .read()
            .map_err(|_| StoreError::Backend("user lock poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

/// One demo user for every workflow role.
pub fn demo_roster() -> Vec<User> {
    vec![
        User::new(UserId::new("head_ou"), "head_ou", "Jan Kowalski", Role::HeadOfOrgUnit),
        User::new(UserId::new("pd"), "pd", "Anna Nowak", Role::PersonnelDepartment),
        User::new(UserId::new("prk"), "prk", "Piotr Wisniewski", Role::ViceRectorEducation),
        User::new(UserId::new("prn"), "prn", "Maria Wojcik", Role::ViceRectorScience),
        User::new(UserId::new("rkr"), "rkr", "Tomasz Kaminski", Role::Rector),
        User::new(UserId::new("kan"), "kan", "Ewa Lewandowska", Role::Chancellor),
        User::new(UserId::new("kwe"), "kwe", "Marek Zielinski", Role::Quartermaster),
        User::new(UserId::new("mpd"), "mpd", "Katarzyna Szymanska", Role::MilitaryPersonnelDepartment),
        User::new(UserId::new("employee"), "employee", "Adam Dabrowski", Role::Employee),
    ]
}

fn apply_window<T>(items: Vec<T>, window: QueryWindow) -> Vec<T> {
    let iter = items.into_iter().skip(window.offset);
    if window.limit == 0 {
        iter.collect()
    } else {
        iter.take(window.limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseflow_types::{HistoryAction, ProcessKey, TaskKey, verify_chain};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn create_and_get_instance_round_trips() {
        let store = InMemoryStore::new();
        let instance = sample_instance(Utc::now());
        store.create_instance(instance.clone()).await.unwrap();

        let fetched = store.get_instance(instance.id).await.unwrap().unwrap();
        assert_eq!(fetched.process_key, ProcessKey::LeaveRequest);
        assert_eq!(fetched.requester, instance.requester);

        let result = store.create_instance(instance).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn list_instances_is_newest_first_and_windowed() {
        let store = InMemoryStore::new();
        let base = Utc::now();
        for offset in 0..3 {
            store
                .create_instance(sample_instance(base + Duration::seconds(offset)))
                .await
                .unwrap();
        }

        let all = store.list_instances(QueryWindow::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[0].created_at > all[2].created_at);

        let page = store
            .list_instances(QueryWindow { limit: 1, offset: 1 })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].created_at, base + Duration::seconds(1));
    }

    #[tokio::test]
    async fn terminal_instances_cannot_be_revived() {
        let store = InMemoryStore::new();
        let instance = sample_instance(Utc::now());
        store.create_instance(instance.clone()).await.unwrap();
        store
            .update_instance(instance.id, VariableMap::new(), InstanceStatus::Rejected)
            .await
            .unwrap();

        let result = store
            .update_instance(instance.id, VariableMap::new(), InstanceStatus::Active)
            .await;
        assert!(matches!(result, Err(StoreError::InvariantViolation(_))));
    }

    #[tokio::test]
    async fn create_task_requires_the_instance() {
        let store = InMemoryStore::new();
        let orphan = sample_instance(Utc::now());
        let result = store.create_task(sample_task(&orphan)).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn a_second_pending_task_is_rejected() {
        let store = InMemoryStore::new();
        let instance = sample_instance(Utc::now());
        store.create_instance(instance.clone()).await.unwrap();
        store.create_task(sample_task(&instance)).await.unwrap();

        let result = store.create_task(sample_task(&instance)).await;
        assert!(matches!(result, Err(StoreError::InvariantViolation(_))));
    }

    #[tokio::test]
    async fn completion_has_exactly_one_winner() {
        let store = InMemoryStore::new();
        let instance = sample_instance(Utc::now());
        let task = sample_task(&instance);
        store.create_instance(instance).await.unwrap();
        store.create_task(task.clone()).await.unwrap();

        let won = store.mark_task_completed(task.id).await.unwrap();
        assert_eq!(won.status, TaskStatus::Completed);

        let lost = store.mark_task_completed(task.id).await;
        assert!(matches!(lost, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn pending_queues_filter_by_role_and_user() {
        let store = InMemoryStore::new();
        let instance = sample_instance(Utc::now());
        store.create_instance(instance.clone()).await.unwrap();
        let mut task = sample_task(&instance);
        task.assignee_user = Some(UserId::new("head_ou"));
        store.create_task(task.clone()).await.unwrap();

        let by_role = store
            .list_pending_for_role(Role::HeadOfOrgUnit)
            .await
            .unwrap();
        assert_eq!(by_role.len(), 1);

        let direct = store
            .list_pending_for_user(&UserId::new("head_ou"), Role::Employee)
            .await
            .unwrap();
        assert_eq!(direct.len(), 1);

        let unrelated = store
            .list_pending_for_user(&UserId::new("pd"), Role::PersonnelDepartment)
            .await
            .unwrap();
        assert!(unrelated.is_empty());
    }

    #[tokio::test]
    async fn history_chain_hashes_are_linked() {
        let store = InMemoryStore::new();
        let instance = sample_instance(Utc::now());
        store.create_instance(instance.clone()).await.unwrap();

        let first = store
            .append_history(HistoryEvent::system(
                instance.id,
                HistoryAction::StartProcess,
                "started",
            ))
            .await
            .unwrap();
        let second = store
            .append_history(HistoryEvent::system(
                instance.id,
                HistoryAction::CompleteTask,
                "reviewed",
            ))
            .await
            .unwrap();

        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert_eq!(second.previous_hash, Some(first.hash.clone()));

        let entries = store.list_history(instance.id).await.unwrap();
        verify_chain(&entries).unwrap();
        assert_eq!(
            store.latest_history_hash(instance.id).await.unwrap(),
            Some(second.hash)
        );
    }

    #[tokio::test]
    async fn append_history_requires_the_instance() {
        let store = InMemoryStore::new();
        let orphan = sample_instance(Utc::now());
        let result = store
            .append_history(HistoryEvent::system(
                orphan.id,
                HistoryAction::StartProcess,
                "started",
            ))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn commit_start_persists_all_three_records() {
        let store = InMemoryStore::new();
        let instance = sample_instance(Utc::now());
        let entry_task = sample_task(&instance);
        let receipt = store
            .commit_start(StartTransaction {
                instance: instance.clone(),
                entry_task: entry_task.clone(),
                log: HistoryEvent::system(
                    instance.id,
                    HistoryAction::StartProcess,
                    "Process started",
                ),
            })
            .await
            .unwrap();

        assert_eq!(receipt.log.sequence, 1);
        assert!(store.get_instance(instance.id).await.unwrap().is_some());
        let stored_task = store.get_task(entry_task.id).await.unwrap().unwrap();
        assert_eq!(stored_task.status, TaskStatus::Pending);
        assert_eq!(store.list_history(instance.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn commit_transition_moves_the_workflow_forward() {
        let store = InMemoryStore::new();
        let (instance, task) = committed_start(&store).await;

        let next = Task {
            id: TaskId::generate(),
            instance_id: instance.id,
            key: TaskKey::ReviewApplicationPd,
            name: "Review application".to_string(),
            assignee_role: Role::PersonnelDepartment,
            assignee_user: None,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        };
        let receipt = store
            .commit_transition(TransitionTransaction {
                instance_id: instance.id,
                task_id: task.id,
                variables: instance.variables.clone(),
                status: InstanceStatus::Active,
                next_task: Some(next.clone()),
                logs: vec![HistoryEvent::system(
                    instance.id,
                    HistoryAction::CompleteTask,
                    "forwarded",
                )],
            })
            .await
            .unwrap();

        assert_eq!(receipt.completed_task.status, TaskStatus::Completed);
        assert_eq!(receipt.instance.status, InstanceStatus::Active);
        let stored_next = store.get_task(next.id).await.unwrap().unwrap();
        assert!(stored_next.is_pending());

        let entries = store.list_history(instance.id).await.unwrap();
        assert_eq!(entries.len(), 2);
        verify_chain(&entries).unwrap();
    }

    #[tokio::test]
    async fn commit_transition_rejects_a_completed_task_without_side_effects() {
        let store = InMemoryStore::new();
        let (instance, task) = committed_start(&store).await;

        let transition = TransitionTransaction {
            instance_id: instance.id,
            task_id: task.id,
            variables: instance.variables.clone(),
            status: InstanceStatus::Completed,
            next_task: None,
            logs: vec![
                HistoryEvent::system(instance.id, HistoryAction::CompleteTask, "done"),
                HistoryEvent::system(instance.id, HistoryAction::EndProcess, "ended"),
            ],
        };
        store.commit_transition(transition.clone()).await.unwrap();

        let replay = store.commit_transition(transition).await;
        assert!(matches!(replay, Err(StoreError::Conflict(_))));

        // The losing replay must not have appended anything.
        assert_eq!(store.list_history(instance.id).await.unwrap().len(), 3);
        let stored = store.get_instance(instance.id).await.unwrap().unwrap();
        assert_eq!(stored.status, InstanceStatus::Completed);
    }

    #[tokio::test]
    async fn terminal_transition_leaves_no_pending_task() {
        let store = InMemoryStore::new();
        let (instance, task) = committed_start(&store).await;

        let receipt = store
            .commit_transition(TransitionTransaction {
                instance_id: instance.id,
                task_id: task.id,
                variables: instance.variables.clone(),
                status: InstanceStatus::Rejected,
                next_task: None,
                logs: vec![HistoryEvent::system(
                    instance.id,
                    HistoryAction::EndProcess,
                    "rejected",
                )],
            })
            .await
            .unwrap();

        assert!(receipt.next_task.is_none());
        let queue = store
            .list_pending_for_role(Role::HeadOfOrgUnit)
            .await
            .unwrap();
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn seeded_directory_resolves_every_role() {
        let directory = InMemoryUserDirectory::seed_demo_roster();
        for expected in demo_roster() {
            let user = directory.get_user(&expected.id).await.unwrap().unwrap();
            assert_eq!(user.role, expected.role);
        }
        let missing = directory.get_user(&UserId::new("nobody")).await.unwrap();
        assert!(missing.is_none());
    }

    fn sample_instance(created_at: chrono::DateTime<Utc>) -> ProcessInstance {
        ProcessInstance {
            id: InstanceId::generate(),
            process_key: ProcessKey::LeaveRequest,
            status: InstanceStatus::Active,
            requester: UserId::new("employee"),
            variables: VariableMap::new(),
            created_at,
        }
    }

    fn sample_task(instance: &ProcessInstance) -> Task {
        Task {
            id: TaskId::generate(),
            instance_id: instance.id,
            key: TaskKey::ReviewAndForwardHeadOu,
            name: "Review and approve leave request".to_string(),
            assignee_role: Role::HeadOfOrgUnit,
            assignee_user: None,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        }
    }

    async fn committed_start(store: &InMemoryStore) -> (ProcessInstance, Task) {
        let instance = sample_instance(Utc::now());
        let task = sample_task(&instance);
        store
            .commit_start(StartTransaction {
                instance: instance.clone(),
                entry_task: task.clone(),
                log: HistoryEvent::system(
                    instance.id,
                    HistoryAction::StartProcess,
                    "Process started",
                ),
            })
            .await
            .unwrap();
        (instance, task)
    }
}
