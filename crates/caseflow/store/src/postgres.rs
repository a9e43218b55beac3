//! PostgreSQL adapter for Caseflow storage.
//!
//! This adapter is the transactional source-of-truth backend. Each composite
//! commit runs as one database transaction, and the pending-to-completed
//! flip is a conditional UPDATE, so racing completions resolve inside the
//! database rather than in application code.

use async_trait::async_trait;
use caseflow_types::{
    compute_entry_hash, HistoryAction, HistoryEntry, HistoryEvent, InstanceId, InstanceStatus,
    ProcessInstance, ProcessKey, Role, Task, TaskId, TaskKey, TaskStatus, UserId, VariableMap,
};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Acquire, Row};
use uuid::Uuid;

use crate::model::{StartReceipt, StartTransaction, TransitionReceipt, TransitionTransaction};
use crate::traits::{
    HistoryStore, InstanceStore, QueryWindow, TaskStore, TransactionStore,
};
use crate::{StoreError, StoreResult};

/// PostgreSQL-backed workflow store.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to PostgreSQL and initialize the required schema.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        Self::connect_with_options(database_url, 10, 5).await
    }

    /// Connect with explicit pool parameters.
    pub async fn connect_with_options(
        database_url: &str,
        max_connections: u32,
        connect_timeout_secs: u64,
    ) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(connect_timeout_secs))
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Backend(format!("failed to connect postgres: {e}")))?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Create an adapter from an existing pool.
    pub async fn from_pool(pool: PgPool) -> StoreResult<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn init_schema(&self) -> StoreResult<()> {
        let ddl = [
            r#"
            CREATE TABLE IF NOT EXISTS caseflow_instances (
                id UUID PRIMARY KEY,
                process_key TEXT NOT NULL,
                status TEXT NOT NULL,
                requester TEXT NOT NULL,
                variables JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS caseflow_tasks (
                id UUID PRIMARY KEY,
                instance_id UUID NOT NULL REFERENCES caseflow_instances (id),
                task_key TEXT NOT NULL,
                name TEXT NOT NULL,
                assignee_role TEXT NOT NULL,
                assignee_user TEXT,
                status TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS caseflow_tasks_one_pending
                ON caseflow_tasks (instance_id)
             WHERE status = 'PENDING'
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS caseflow_history (
                id TEXT PRIMARY KEY,
                instance_id UUID NOT NULL REFERENCES caseflow_instances (id),
                sequence BIGINT NOT NULL,
                task_id UUID,
                user_id TEXT,
                user_name TEXT NOT NULL,
                action TEXT NOT NULL,
                comment TEXT NOT NULL,
                recorded_at TIMESTAMPTZ NOT NULL,
                previous_hash TEXT,
                hash TEXT NOT NULL,
                UNIQUE (instance_id, sequence)
            )
            "#,
        ];

        for stmt in ddl {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(format!("schema init failed: {e}")))?;
        }
        Ok(())
    }
}

#[async_trait]
impl InstanceStore for PostgresStore {
    async fn create_instance(&self, instance: ProcessInstance) -> StoreResult<()> {
        insert_instance(&self.pool, &instance).await
    }

    async fn get_instance(&self, id: InstanceId) -> StoreResult<Option<ProcessInstance>> {
        fetch_instance(&self.pool, id).await
    }

    async fn list_instances(&self, window: QueryWindow) -> StoreResult<Vec<ProcessInstance>> {
        let rows = if window.limit == 0 {
            sqlx::query(
                r#"
                SELECT id, process_key, status, requester, variables, created_at
                  FROM caseflow_instances
                 ORDER BY created_at DESC
                 OFFSET $1
                "#,
            )
            .bind(to_i64(window.offset)?)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
        } else {
            sqlx::query(
                r#"
                SELECT id, process_key, status, requester, variables, created_at
                  FROM caseflow_instances
                 ORDER BY created_at DESC
                 LIMIT $1 OFFSET $2
                "#,
            )
            .bind(to_i64(window.limit)?)
            .bind(to_i64(window.offset)?)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
        };

        rows.into_iter().map(instance_row_to_record).collect()
    }

    async fn update_instance(
        &self,
        id: InstanceId,
        variables: VariableMap,
        status: InstanceStatus,
    ) -> StoreResult<ProcessInstance> {
        let result = update_instance_guarded(&self.pool, id, &variables, status).await?;
        if result == 0 {
            let exists = self.get_instance(id).await?.is_some();
            if exists {
                return Err(StoreError::InvariantViolation(format!(
                    "instance {} cannot move to {}",
                    id, status
                )));
            }
            return Err(StoreError::NotFound(format!("instance {} not found", id)));
        }
        self.get_instance(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("instance {} not found", id)))
    }
}

#[async_trait]
impl TaskStore for PostgresStore {
    async fn create_task(&self, task: Task) -> StoreResult<()> {
        insert_task(&self.pool, &task).await
    }

    async fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        fetch_task(&self.pool, id).await
    }

    async fn mark_task_completed(&self, id: TaskId) -> StoreResult<Task> {
        let result = complete_task_guarded(&self.pool, id, None).await?;
        if result == 0 {
            let exists = self.get_task(id).await?.is_some();
            if exists {
                return Err(StoreError::Conflict(format!("task {} is not pending", id)));
            }
            return Err(StoreError::NotFound(format!("task {} not found", id)));
        }
        self.get_task(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("task {} not found", id)))
    }

    async fn list_pending_for_role(&self, role: Role) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query(
            r#"
            SELECT id, instance_id, task_key, name, assignee_role, assignee_user, status, created_at
              FROM caseflow_tasks
             WHERE status = $1
               AND assignee_role = $2
             ORDER BY created_at ASC
            "#,
        )
        .bind(TaskStatus::Pending.as_str())
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(task_row_to_record).collect()
    }

    async fn list_pending_for_user(&self, user_id: &UserId, role: Role) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query(
            r#"
            SELECT id, instance_id, task_key, name, assignee_role, assignee_user, status, created_at
              FROM caseflow_tasks
             WHERE status = $1
               AND (assignee_user = $2 OR assignee_role = $3)
             ORDER BY created_at ASC
            "#,
        )
        .bind(TaskStatus::Pending.as_str())
        .bind(user_id.0.clone())
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(task_row_to_record).collect()
    }
}

#[async_trait]
impl HistoryStore for PostgresStore {
    async fn append_history(&self, event: HistoryEvent) -> StoreResult<HistoryEntry> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let conn = tx
            .acquire()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let instance_id = event.instance_id;
        let entries = append_entries(&mut *conn, instance_id, vec![event]).await?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        entries
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend("history append produced no entry".to_string()))
    }

    async fn list_history(&self, instance_id: InstanceId) -> StoreResult<Vec<HistoryEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, instance_id, sequence, task_id, user_id, user_name, action, comment, recorded_at, previous_hash, hash
              FROM caseflow_history
             WHERE instance_id = $1
             ORDER BY sequence ASC
            "#,
        )
        .bind(instance_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(history_row_to_entry).collect()
    }

    async fn latest_history_hash(&self, instance_id: InstanceId) -> StoreResult<Option<String>> {
        let row = sqlx::query(
            "SELECT hash FROM caseflow_history WHERE instance_id = $1 ORDER BY sequence DESC LIMIT 1",
        )
        .bind(instance_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(row
            .map(|r| r.try_get::<String, _>("hash"))
            .transpose()
            .map_err(|e| StoreError::Backend(e.to_string()))?)
    }
}

#[async_trait]
impl TransactionStore for PostgresStore {
    async fn commit_start(&self, start: StartTransaction) -> StoreResult<StartReceipt> {
        if start.entry_task.instance_id != start.instance.id
            || start.log.instance_id != start.instance.id
        {
            return Err(StoreError::InvalidInput(
                "start write-set spans more than one instance".to_string(),
            ));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let conn = tx
            .acquire()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        insert_instance(&mut *conn, &start.instance).await?;
        insert_task(&mut *conn, &start.entry_task).await?;
        let entries = append_entries(&mut *conn, start.instance.id, vec![start.log]).await?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let log = entries
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend("start commit produced no entry".to_string()))?;
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
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let conn = tx
            .acquire()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        // Flip the completing task first; the loser of a race stops here
        // and the transaction rolls back without a trace.
        let flipped =
            complete_task_guarded(&mut *conn, transition.task_id, Some(transition.instance_id))
                .await?;
        if flipped == 0 {
            let existing = fetch_task(&mut *conn, transition.task_id).await?;
            return Err(match existing {
                Some(_) => StoreError::Conflict(format!(
                    "task {} is not pending",
                    transition.task_id
                )),
                None => StoreError::NotFound(format!("task {} not found", transition.task_id)),
            });
        }

        let moved = update_instance_guarded(
            &mut *conn,
            transition.instance_id,
            &transition.variables,
            transition.status,
        )
        .await?;
        if moved == 0 {
            let exists = fetch_instance(&mut *conn, transition.instance_id).await?.is_some();
            return Err(if exists {
                StoreError::InvariantViolation(format!(
                    "instance {} cannot move to {}",
                    transition.instance_id, transition.status
                ))
            } else {
                StoreError::NotFound(format!(
                    "instance {} not found",
                    transition.instance_id
                ))
            });
        }

        if let Some(next) = &transition.next_task {
            if next.instance_id != transition.instance_id {
                return Err(StoreError::InvalidInput(format!(
                    "task {} does not belong to instance {}",
                    next.id, transition.instance_id
                )));
            }
            insert_task(&mut *conn, next).await?;
        }

        let logs = append_entries(&mut *conn, transition.instance_id, transition.logs).await?;

        let completed_task = fetch_task(&mut *conn, transition.task_id)
            .await?
            .ok_or_else(|| {
                StoreError::NotFound(format!("task {} not found", transition.task_id))
            })?;
        let instance = fetch_instance(&mut *conn, transition.instance_id)
            .await?
            .ok_or_else(|| {
                StoreError::NotFound(format!("instance {} not found", transition.instance_id))
            })?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(TransitionReceipt {
            instance,
            completed_task,
            next_task: transition.next_task,
            logs,
        })
    }
}

async fn insert_instance<'e, E>(executor: E, instance: &ProcessInstance) -> StoreResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let variables = serde_json::to_value(&instance.variables)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

    sqlx::query(
        r#"
        INSERT INTO caseflow_instances
            (id, process_key, status, requester, variables, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(instance.id.0)
    .bind(instance.process_key.as_str())
    .bind(instance.status.as_str())
    .bind(instance.requester.0.clone())
    .bind(variables)
    .bind(instance.created_at)
    .execute(executor)
    .await
    .map_err(map_insert_err)?;

    Ok(())
}

async fn fetch_instance<'e, E>(executor: E, id: InstanceId) -> StoreResult<Option<ProcessInstance>>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let row = sqlx::query(
        r#"
        SELECT id, process_key, status, requester, variables, created_at
          FROM caseflow_instances
         WHERE id = $1
        "#,
    )
    .bind(id.0)
    .fetch_optional(executor)
    .await
    .map_err(|e| StoreError::Backend(e.to_string()))?;

    row.map(instance_row_to_record).transpose()
}

/// Conditional status move; returns affected rows. Staying put is allowed,
/// leaving a terminal status is not, mirroring
/// [`InstanceStatus::can_transition_to`].
async fn update_instance_guarded<'e, E>(
    executor: E,
    id: InstanceId,
    variables: &VariableMap,
    status: InstanceStatus,
) -> StoreResult<u64>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let variables =
        serde_json::to_value(variables).map_err(|e| StoreError::Serialization(e.to_string()))?;

    let result = sqlx::query(
        r#"
        UPDATE caseflow_instances
           SET variables = $1,
               status = $2
         WHERE id = $3
           AND (status = $2 OR status = $4)
        "#,
    )
    .bind(variables)
    .bind(status.as_str())
    .bind(id.0)
    .bind(InstanceStatus::Active.as_str())
    .execute(executor)
    .await
    .map_err(|e| StoreError::Backend(e.to_string()))?;

    Ok(result.rows_affected())
}

async fn insert_task<'e, E>(executor: E, task: &Task) -> StoreResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO caseflow_tasks
            (id, instance_id, task_key, name, assignee_role, assignee_user, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(task.id.0)
    .bind(task.instance_id.0)
    .bind(task.key.as_str())
    .bind(task.name.clone())
    .bind(task.assignee_role.as_str())
    .bind(task.assignee_user.as_ref().map(|u| u.0.clone()))
    .bind(task.status.as_str())
    .bind(task.created_at)
    .execute(executor)
    .await
    .map_err(map_insert_err)?;

    Ok(())
}

async fn fetch_task<'e, E>(executor: E, id: TaskId) -> StoreResult<Option<Task>>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let row = sqlx::query(
        r#"
        SELECT id, instance_id, task_key, name, assignee_role, assignee_user, status, created_at
          FROM caseflow_tasks
         WHERE id = $1
        "#,
    )
    .bind(id.0)
    .fetch_optional(executor)
    .await
    .map_err(|e| StoreError::Backend(e.to_string()))?;

    row.map(task_row_to_record).transpose()
}

/// Pending-to-completed flip; returns affected rows so callers can tell a
/// lost race from a missing task.
async fn complete_task_guarded<'e, E>(
    executor: E,
    id: TaskId,
    instance_id: Option<InstanceId>,
) -> StoreResult<u64>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let result = sqlx::query(
        r#"
        UPDATE caseflow_tasks
           SET status = $1
         WHERE id = $2
           AND status = $3
           AND ($4::UUID IS NULL OR instance_id = $4)
        "#,
    )
    .bind(TaskStatus::Completed.as_str())
    .bind(id.0)
    .bind(TaskStatus::Pending.as_str())
    .bind(instance_id.map(|i| i.0))
    .execute(executor)
    .await
    .map_err(|e| StoreError::Backend(e.to_string()))?;

    Ok(result.rows_affected())
}

/// Append hash-linked entries for one instance. Runs under an exclusive
/// table lock so sequence numbers and chain tips stay stable while the
/// surrounding transaction writes.
async fn append_entries(
    conn: &mut sqlx::PgConnection,
    instance_id: InstanceId,
    events: Vec<HistoryEvent>,
) -> StoreResult<Vec<HistoryEntry>> {
    sqlx::query("LOCK TABLE caseflow_history IN EXCLUSIVE MODE")
        .execute(&mut *conn)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

    let last = sqlx::query(
        "SELECT sequence, hash FROM caseflow_history WHERE instance_id = $1 ORDER BY sequence DESC LIMIT 1",
    )
    .bind(instance_id.0)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| StoreError::Backend(e.to_string()))?;

    let (mut sequence, mut previous_hash) = if let Some(row) = last {
        let seq: i64 = row
            .try_get("sequence")
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let prev: String = row
            .try_get("hash")
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        (seq, Some(prev))
    } else {
        (0_i64, None)
    };

    let mut entries = Vec::with_capacity(events.len());
    for event in events {
        if event.instance_id != instance_id {
            return Err(StoreError::InvalidInput(
                "log entry does not belong to the instance".to_string(),
            ));
        }
        sequence += 1;
        let hash = compute_entry_hash(&event, previous_hash.as_deref(), sequence as u64)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let id = format!("hist-{}", Uuid::new_v4());

        sqlx::query(
            r#"
            INSERT INTO caseflow_history
                (id, instance_id, sequence, task_id, user_id, user_name, action, comment, recorded_at, previous_hash, hash)
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(id.clone())
        .bind(event.instance_id.0)
        .bind(sequence)
        .bind(event.task_id.map(|t| t.0))
        .bind(event.user_id.as_ref().map(|u| u.0.clone()))
        .bind(event.user_name.clone())
        .bind(event.action.as_str().to_string())
        .bind(event.comment.clone())
        .bind(event.recorded_at)
        .bind(previous_hash.clone())
        .bind(hash.clone())
        .execute(&mut *conn)
        .await
        .map_err(map_insert_err)?;

        entries.push(HistoryEntry {
            id,
            instance_id: event.instance_id,
            sequence: sequence as u64,
            task_id: event.task_id,
            user_id: event.user_id,
            user_name: event.user_name,
            action: event.action,
            comment: event.comment,
            recorded_at: event.recorded_at,
            previous_hash: previous_hash.clone(),
            hash: hash.clone(),
        });
        previous_hash = Some(hash);
    }

    Ok(entries)
}

fn instance_row_to_record(row: PgRow) -> StoreResult<ProcessInstance> {
    let process_key: String = row
        .try_get("process_key")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let status: String = row
        .try_get("status")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let variables: serde_json::Value = row
        .try_get("variables")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let variables = match variables {
        serde_json::Value::Object(map) => VariableMap::from(map),
        _ => {
            return Err(StoreError::Serialization(
                "variables column is not a JSON object".to_string(),
            ))
        }
    };

    Ok(ProcessInstance {
        id: InstanceId(
            row.try_get::<Uuid, _>("id")
                .map_err(|e| StoreError::Backend(e.to_string()))?,
        ),
        process_key: process_key
            .parse::<ProcessKey>()
            .map_err(|e| StoreError::Serialization(e.to_string()))?,
        status: status
            .parse::<InstanceStatus>()
            .map_err(|e| StoreError::Serialization(e.to_string()))?,
        requester: UserId(
            row.try_get::<String, _>("requester")
                .map_err(|e| StoreError::Backend(e.to_string()))?,
        ),
        variables,
        created_at: row
            .try_get("created_at")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
    })
}

fn task_row_to_record(row: PgRow) -> StoreResult<Task> {
    let key: String = row
        .try_get("task_key")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let role: String = row
        .try_get("assignee_role")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let status: String = row
        .try_get("status")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let assignee_user: Option<String> = row
        .try_get("assignee_user")
        .map_err(|e| StoreError::Backend(e.to_string()))?;

    Ok(Task {
        id: TaskId(
            row.try_get::<Uuid, _>("id")
                .map_err(|e| StoreError::Backend(e.to_string()))?,
        ),
        instance_id: InstanceId(
            row.try_get::<Uuid, _>("instance_id")
                .map_err(|e| StoreError::Backend(e.to_string()))?,
        ),
        key: key
            .parse::<TaskKey>()
            .map_err(|e| StoreError::Serialization(e.to_string()))?,
        name: row
            .try_get("name")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        assignee_role: role
            .parse::<Role>()
            .map_err(|e| StoreError::Serialization(e.to_string()))?,
        assignee_user: assignee_user.map(UserId),
        status: status
            .parse::<TaskStatus>()
            .map_err(|e| StoreError::Serialization(e.to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
    })
}

fn history_row_to_entry(row: PgRow) -> StoreResult<HistoryEntry> {
    let action: String = row
        .try_get("action")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let task_id: Option<Uuid> = row
        .try_get("task_id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let user_id: Option<String> = row
        .try_get("user_id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;

    Ok(HistoryEntry {
        id: row
            .try_get("id")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        instance_id: InstanceId(
            row.try_get::<Uuid, _>("instance_id")
                .map_err(|e| StoreError::Backend(e.to_string()))?,
        ),
        sequence: row
            .try_get::<i64, _>("sequence")
            .map_err(|e| StoreError::Backend(e.to_string()))? as u64,
        task_id: task_id.map(TaskId),
        user_id: user_id.map(UserId),
        user_name: row
            .try_get("user_name")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        action: HistoryAction::from(action.as_str()),
        comment: row
            .try_get("comment")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        recorded_at: row
            .try_get("recorded_at")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        previous_hash: row
            .try_get("previous_hash")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        hash: row
            .try_get("hash")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
    })
}

fn map_insert_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => {
                if db_err.constraint() == Some("caseflow_tasks_one_pending") {
                    return StoreError::InvariantViolation(
                        "instance already has a pending task".to_string(),
                    );
                }
                return StoreError::Conflict(db_err.message().to_string());
            }
            Some("23503") => return StoreError::NotFound(db_err.message().to_string()),
            _ => {}
        }
    }
    StoreError::Backend(err.to_string())
}

fn to_i64(value: usize) -> StoreResult<i64> {
    i64::try_from(value).map_err(|_| StoreError::InvalidInput("window value too large".to_string()))
}
