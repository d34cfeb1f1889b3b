//! Staff task list.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use shared::{CreateTaskRequest, SetTaskStatusRequest};

use crate::domain::auth::SessionUser;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::new_id;
use crate::domain::models::task::{Task, TaskCategory, TaskStatus};
use crate::storage::traits::TaskStorage;
use crate::storage::yaml::{Connection, TaskRepository};

#[derive(Clone)]
pub struct TaskService {
    tasks: TaskRepository,
}

impl TaskService {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            tasks: TaskRepository::new(connection),
        }
    }

    pub fn create_task(&self, ctx: &SessionUser, request: CreateTaskRequest) -> DomainResult<Task> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("Task title cannot be empty"));
        }
        let due_date = super::child_service::parse_date(&request.due_date, "due_date")?;
        let category = TaskCategory::parse(&request.category).ok_or_else(|| {
            DomainError::validation(
                "category must be COMPLIANCE, FINANCE, PARENT_UPDATES or GENERAL",
            )
        })?;

        let now = Utc::now();
        let task = Task {
            id: new_id(),
            organisation_id: ctx.organisation_id.clone(),
            title: title.to_string(),
            description: super::child_service::none_if_blank(request.description),
            due_date,
            category,
            status: TaskStatus::Pending,
            assigned_to_id: super::child_service::none_if_blank(request.assigned_to_id),
            child_id: super::child_service::none_if_blank(request.child_id),
            linked_date: None,
            created_by_id: ctx.user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tasks.store_task(&task)?;
        info!("Created task {} ({})", task.title, task.id);
        Ok(task)
    }

    pub fn list_tasks(&self, ctx: &SessionUser) -> DomainResult<Vec<Task>> {
        Ok(self.tasks.list_tasks(&ctx.organisation_id)?)
    }

    pub fn set_status(
        &self,
        ctx: &SessionUser,
        task_id: &str,
        request: SetTaskStatusRequest,
    ) -> DomainResult<Task> {
        let status = TaskStatus::parse(&request.status).ok_or_else(|| {
            DomainError::validation("status must be PENDING, IN_PROGRESS or COMPLETED")
        })?;
        let mut task = self
            .tasks
            .get_task(&ctx.organisation_id, task_id)?
            .ok_or_else(|| DomainError::not_found(format!("Task not found: {task_id}")))?;
        if task.status == TaskStatus::Completed && status != TaskStatus::Completed {
            return Err(DomainError::conflict("Completed tasks cannot be reopened"));
        }

        task.status = status;
        task.updated_at = Utc::now();
        self.tasks.update_task(&task)?;
        Ok(task)
    }

    /// Open tasks due on the given date.
    pub fn due_on(&self, ctx: &SessionUser, date: NaiveDate) -> DomainResult<Vec<Task>> {
        Ok(self
            .tasks
            .list_tasks(&ctx.organisation_id)?
            .into_iter()
            .filter(|t| t.due_date == date && t.status != TaskStatus::Completed)
            .collect())
    }

    /// Follow-up task raised by the dispatcher when an update is missed.
    pub(crate) fn create_missed_update_task(
        &self,
        organisation_id: &str,
        created_by_id: &str,
        child_id: &str,
        child_name: &str,
        date: NaiveDate,
    ) -> DomainResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: new_id(),
            organisation_id: organisation_id.to_string(),
            title: format!("Send missed daily update for {child_name}"),
            description: Some(format!(
                "The {date} daily update was not approved before the send window."
            )),
            due_date: date.succ_opt().unwrap_or(date),
            category: TaskCategory::ParentUpdates,
            status: TaskStatus::Pending,
            assigned_to_id: None,
            child_id: Some(child_id.to_string()),
            linked_date: Some(date),
            created_by_id: created_by_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tasks.store_task(&task)?;
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::UserRole;
    use crate::domain::test_support::{connection, session};

    fn task_request(title: &str, due: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.to_string(),
            description: None,
            due_date: due.to_string(),
            category: "GENERAL".to_string(),
            assigned_to_id: None,
            child_id: None,
        }
    }

    #[test]
    fn test_tasks_start_pending_and_complete() {
        let (conn, _tmp) = connection();
        let service = TaskService::new(conn);
        let ctx = session(UserRole::Staff);

        let task = service
            .create_task(&ctx, task_request("Fire drill", "2026-09-01"))
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);

        let done = service
            .set_status(
                &ctx,
                &task.id,
                SetTaskStatusRequest {
                    status: "COMPLETED".to_string(),
                },
            )
            .unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(matches!(
            service.set_status(
                &ctx,
                &task.id,
                SetTaskStatusRequest {
                    status: "PENDING".to_string()
                }
            ),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn test_due_on_excludes_completed() {
        let (conn, _tmp) = connection();
        let service = TaskService::new(conn);
        let ctx = session(UserRole::Staff);
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();

        let open = service
            .create_task(&ctx, task_request("Fire drill", "2026-09-01"))
            .unwrap();
        let done = service
            .create_task(&ctx, task_request("Order supplies", "2026-09-01"))
            .unwrap();
        service
            .set_status(
                &ctx,
                &done.id,
                SetTaskStatusRequest {
                    status: "COMPLETED".to_string(),
                },
            )
            .unwrap();

        let due = service.due_on(&ctx, date).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, open.id);
    }

    #[test]
    fn test_missed_update_task_links_the_date() {
        let (conn, _tmp) = connection();
        let service = TaskService::new(conn);
        let date = NaiveDate::from_ymd_opt(2026, 8, 28).unwrap();

        let task = service
            .create_missed_update_task("org-1", "system", "c1", "Oliver Smith", date)
            .unwrap();
        assert_eq!(task.category, TaskCategory::ParentUpdates);
        assert_eq!(task.linked_date, Some(date));
        assert_eq!(task.due_date, date.succ_opt().unwrap());
    }
}
