use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use super::connection::Connection;
use crate::domain::models::child::Child;
use crate::storage::traits::ChildStorage;

const FILE: &str = "children.yaml";

#[derive(Clone)]
pub struct ChildRepository {
    connection: Arc<Connection>,
}

impl ChildRepository {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    fn path(&self, organisation_id: &str) -> PathBuf {
        self.connection.organisation_file(organisation_id, FILE)
    }

    fn load(&self, organisation_id: &str) -> Result<Vec<Child>> {
        self.connection.read_collection(&self.path(organisation_id))
    }

    fn save(&self, organisation_id: &str, children: &[Child]) -> Result<()> {
        self.connection.write_collection(&self.path(organisation_id), children)
    }
}

impl ChildStorage for ChildRepository {
    fn store_child(&self, child: &Child) -> Result<()> {
        let mut children = self.load(&child.organisation_id)?;
        children.push(child.clone());
        self.save(&child.organisation_id, &children)
    }

    fn get_child(&self, organisation_id: &str, child_id: &str) -> Result<Option<Child>> {
        let children = self.load(organisation_id)?;
        Ok(children.into_iter().find(|c| c.id == child_id))
    }

    fn list_children(&self, organisation_id: &str) -> Result<Vec<Child>> {
        let mut children = self.load(organisation_id)?;
        children.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(children)
    }

    fn update_child(&self, child: &Child) -> Result<()> {
        let mut children = self.load(&child.organisation_id)?;
        match children.iter_mut().find(|c| c.id == child.id) {
            Some(existing) => *existing = child.clone(),
            None => {
                warn!("Attempted to update a non-existent child: {}", child.id);
                anyhow::bail!("Child not found for update: {}", child.id);
            }
        }
        self.save(&child.organisation_id, &children)
    }

    fn delete_child(&self, organisation_id: &str, child_id: &str) -> Result<bool> {
        let mut children = self.load(organisation_id)?;
        let before = children.len();
        children.retain(|c| c.id != child_id);
        if children.len() == before {
            return Ok(false);
        }
        self.save(organisation_id, &children)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;

    fn child(org: &str, id: &str, first: &str, last: &str) -> Child {
        let now = Utc::now();
        Child {
            id: id.to_string(),
            organisation_id: org.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2021, 3, 15).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            room: Some("Toddlers".to_string()),
            dietary_needs: None,
            medical_notes: None,
            key_person_id: None,
            created_by_id: "u1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn setup() -> (ChildRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = Connection::new(temp_dir.path()).unwrap();
        (ChildRepository::new(Arc::new(connection)), temp_dir)
    }

    #[test]
    fn test_store_and_list_sorted_by_name() {
        let (repo, _tmp) = setup();
        repo.store_child(&child("org1", "c1", "Oliver", "Smith")).unwrap();
        repo.store_child(&child("org1", "c2", "Amelia", "Brown")).unwrap();

        let children = repo.list_children("org1").unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].last_name, "Brown");
        assert_eq!(children[1].last_name, "Smith");
    }

    #[test]
    fn test_children_are_organisation_scoped() {
        let (repo, _tmp) = setup();
        repo.store_child(&child("org1", "c1", "Oliver", "Smith")).unwrap();

        assert!(repo.get_child("org2", "c1").unwrap().is_none());
        assert!(repo.list_children("org2").unwrap().is_empty());
    }

    #[test]
    fn test_delete_child() {
        let (repo, _tmp) = setup();
        repo.store_child(&child("org1", "c1", "Oliver", "Smith")).unwrap();

        assert!(repo.delete_child("org1", "c1").unwrap());
        assert!(!repo.delete_child("org1", "c1").unwrap());
        assert!(repo.get_child("org1", "c1").unwrap().is_none());
    }
}
