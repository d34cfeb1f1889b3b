use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::Connection;
use crate::domain::models::task::Task;
use crate::storage::traits::TaskStorage;

const FILE: &str = "tasks.yaml";

#[derive(Clone)]
pub struct TaskRepository {
    connection: Arc<Connection>,
}

impl TaskRepository {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    fn path(&self, organisation_id: &str) -> PathBuf {
        self.connection.organisation_file(organisation_id, FILE)
    }

    fn load(&self, organisation_id: &str) -> Result<Vec<Task>> {
        self.connection.read_collection(&self.path(organisation_id))
    }
}

impl TaskStorage for TaskRepository {
    fn store_task(&self, task: &Task) -> Result<()> {
        let mut tasks = self.load(&task.organisation_id)?;
        tasks.push(task.clone());
        self.connection.write_collection(&self.path(&task.organisation_id), &tasks)
    }

    fn get_task(&self, organisation_id: &str, task_id: &str) -> Result<Option<Task>> {
        let tasks = self.load(organisation_id)?;
        Ok(tasks.into_iter().find(|t| t.id == task_id))
    }

    fn list_tasks(&self, organisation_id: &str) -> Result<Vec<Task>> {
        let mut tasks = self.load(organisation_id)?;
        tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        Ok(tasks)
    }

    fn update_task(&self, task: &Task) -> Result<()> {
        let mut tasks = self.load(&task.organisation_id)?;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => anyhow::bail!("Task not found for update: {}", task.id),
        }
        self.connection.write_collection(&self.path(&task.organisation_id), &tasks)
    }
}
