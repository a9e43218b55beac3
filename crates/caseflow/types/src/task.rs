use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{InstanceId, Role, TaskId, TaskKey, TaskStatus, User, UserId};

/// One unit of human work inside a process instance.
///
/// An active instance has exactly one `PENDING` task at a time; completing
/// it routes the instance to its successor or to a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub instance_id: InstanceId,
    pub key: TaskKey,
    /// Display name from the process definition that created this task.
    pub name: String,
    pub assignee_role: Role,
    /// Direct assignment override. When set, only this user may complete
    /// the task, regardless of role.
    pub assignee_user: Option<UserId>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    /// Authorization check: a direct assignee must match exactly; otherwise
    /// the actor's role must equal the task's assignee role.
    pub fn is_actionable_by(&self, user: &User) -> bool {
        match &self.assignee_user {
            Some(direct) => *direct == user.id,
            None => self.assignee_role == user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(assignee_user: Option<UserId>) -> Task {
        Task {
            id: TaskId::generate(),
            instance_id: InstanceId::generate(),
            key: TaskKey::ReviewApplicationPd,
            name: "Review application (PD)".to_string(),
            assignee_role: Role::PersonnelDepartment,
            assignee_user,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        }
    }

    fn make_user(id: &str, role: Role) -> User {
        User::new(UserId::new(id), id, format!("User {id}"), role)
    }

    #[test]
    fn role_match_authorizes_when_no_direct_assignee() {
        let task = make_task(None);
        assert!(task.is_actionable_by(&make_user("pd1", Role::PersonnelDepartment)));
        assert!(!task.is_actionable_by(&make_user("head1", Role::HeadOfOrgUnit)));
    }

    #[test]
    fn direct_assignee_overrides_role_match() {
        let task = make_task(Some(UserId::new("pd1")));
        assert!(task.is_actionable_by(&make_user("pd1", Role::PersonnelDepartment)));
        // Same role, different user: the override wins.
        assert!(!task.is_actionable_by(&make_user("pd2", Role::PersonnelDepartment)));
    }
}
