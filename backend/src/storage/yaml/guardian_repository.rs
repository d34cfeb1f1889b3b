use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::Connection;
use crate::domain::models::guardian::{ChildGuardian, Guardian};
use crate::storage::traits::GuardianStorage;

const GUARDIANS_FILE: &str = "guardians.yaml";
const LINKS_FILE: &str = "child_guardians.yaml";

/// Guardians plus the child-guardian link table.
#[derive(Clone)]
pub struct GuardianRepository {
    connection: Arc<Connection>,
}

impl GuardianRepository {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    fn guardians_path(&self, organisation_id: &str) -> PathBuf {
        self.connection.organisation_file(organisation_id, GUARDIANS_FILE)
    }

    fn links_path(&self, organisation_id: &str) -> PathBuf {
        self.connection.organisation_file(organisation_id, LINKS_FILE)
    }

    fn load_guardians(&self, organisation_id: &str) -> Result<Vec<Guardian>> {
        self.connection.read_collection(&self.guardians_path(organisation_id))
    }

    fn load_links(&self, organisation_id: &str) -> Result<Vec<ChildGuardian>> {
        self.connection.read_collection(&self.links_path(organisation_id))
    }
}

impl GuardianStorage for GuardianRepository {
    fn store_guardian(&self, guardian: &Guardian) -> Result<()> {
        let mut guardians = self.load_guardians(&guardian.organisation_id)?;
        guardians.push(guardian.clone());
        self.connection
            .write_collection(&self.guardians_path(&guardian.organisation_id), &guardians)
    }

    fn get_guardian(&self, organisation_id: &str, guardian_id: &str) -> Result<Option<Guardian>> {
        let guardians = self.load_guardians(organisation_id)?;
        Ok(guardians.into_iter().find(|g| g.id == guardian_id))
    }

    fn list_guardians(&self, organisation_id: &str) -> Result<Vec<Guardian>> {
        self.load_guardians(organisation_id)
    }

    fn update_guardian(&self, guardian: &Guardian) -> Result<()> {
        let mut guardians = self.load_guardians(&guardian.organisation_id)?;
        match guardians.iter_mut().find(|g| g.id == guardian.id) {
            Some(existing) => *existing = guardian.clone(),
            None => anyhow::bail!("Guardian not found for update: {}", guardian.id),
        }
        self.connection
            .write_collection(&self.guardians_path(&guardian.organisation_id), &guardians)
    }

    fn link_child(&self, organisation_id: &str, link: &ChildGuardian) -> Result<()> {
        let mut links = self.load_links(organisation_id)?;
        match links
            .iter_mut()
            .find(|l| l.child_id == link.child_id && l.guardian_id == link.guardian_id)
        {
            Some(existing) => existing.is_primary = link.is_primary,
            None => links.push(link.clone()),
        }
        self.connection.write_collection(&self.links_path(organisation_id), &links)
    }

    fn guardians_for_child(
        &self,
        organisation_id: &str,
        child_id: &str,
    ) -> Result<Vec<(Guardian, bool)>> {
        let links = self.load_links(organisation_id)?;
        let guardians = self.load_guardians(organisation_id)?;
        let mut result = Vec::new();
        for link in links.iter().filter(|l| l.child_id == child_id) {
            if let Some(guardian) = guardians.iter().find(|g| g.id == link.guardian_id) {
                result.push((guardian.clone(), link.is_primary));
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::guardian::CommunicationChannel;
    use chrono::Utc;
    use tempfile::TempDir;

    fn guardian(org: &str, id: &str) -> Guardian {
        let now = Utc::now();
        Guardian {
            id: id.to_string(),
            organisation_id: org.to_string(),
            first_name: "Pat".to_string(),
            last_name: "Smith".to_string(),
            email: Some("pat@example.com".to_string()),
            phone: None,
            relationship: Some("Mother".to_string()),
            pickup_permission: true,
            preferred_channel: CommunicationChannel::Email,
            created_at: now,
            updated_at: now,
        }
    }

    fn setup() -> (GuardianRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = Connection::new(temp_dir.path()).unwrap();
        (GuardianRepository::new(Arc::new(connection)), temp_dir)
    }

    #[test]
    fn test_link_and_list_for_child() {
        let (repo, _tmp) = setup();
        repo.store_guardian(&guardian("org1", "g1")).unwrap();
        repo.store_guardian(&guardian("org1", "g2")).unwrap();
        repo.link_child(
            "org1",
            &ChildGuardian {
                child_id: "c1".to_string(),
                guardian_id: "g1".to_string(),
                is_primary: true,
            },
        )
        .unwrap();
        repo.link_child(
            "org1",
            &ChildGuardian {
                child_id: "c1".to_string(),
                guardian_id: "g2".to_string(),
                is_primary: false,
            },
        )
        .unwrap();

        let linked = repo.guardians_for_child("org1", "c1").unwrap();
        assert_eq!(linked.len(), 2);
        assert!(linked.iter().any(|(g, primary)| g.id == "g1" && *primary));
        assert!(linked.iter().any(|(g, primary)| g.id == "g2" && !*primary));
    }

    #[test]
    fn test_relink_updates_primary_flag() {
        let (repo, _tmp) = setup();
        repo.store_guardian(&guardian("org1", "g1")).unwrap();
        let mut link = ChildGuardian {
            child_id: "c1".to_string(),
            guardian_id: "g1".to_string(),
            is_primary: false,
        };
        repo.link_child("org1", &link).unwrap();
        link.is_primary = true;
        repo.link_child("org1", &link).unwrap();

        let linked = repo.guardians_for_child("org1", "c1").unwrap();
        assert_eq!(linked.len(), 1);
        assert!(linked[0].1);
    }
}
