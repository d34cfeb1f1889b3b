use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::Connection;
use crate::domain::models::evidence::EvidenceItem;
use crate::storage::traits::EvidenceStorage;

const FILE: &str = "evidence_items.yaml";

#[derive(Clone)]
pub struct EvidenceRepository {
    connection: Arc<Connection>,
}

impl EvidenceRepository {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    fn path(&self, organisation_id: &str) -> PathBuf {
        self.connection.organisation_file(organisation_id, FILE)
    }

    fn load(&self, organisation_id: &str) -> Result<Vec<EvidenceItem>> {
        self.connection.read_collection(&self.path(organisation_id))
    }
}

impl EvidenceStorage for EvidenceRepository {
    fn store_item(&self, item: &EvidenceItem) -> Result<()> {
        let mut items = self.load(&item.organisation_id)?;
        items.push(item.clone());
        self.connection.write_collection(&self.path(&item.organisation_id), &items)
    }

    fn get_item(&self, organisation_id: &str, item_id: &str) -> Result<Option<EvidenceItem>> {
        let items = self.load(organisation_id)?;
        Ok(items.into_iter().find(|i| i.id == item_id))
    }

    fn list_items(&self, organisation_id: &str) -> Result<Vec<EvidenceItem>> {
        let mut items = self.load(organisation_id)?;
        items.sort_by(|a, b| (a.category.as_str(), a.name.as_str()).cmp(&(b.category.as_str(), b.name.as_str())));
        Ok(items)
    }

    fn update_item(&self, item: &EvidenceItem) -> Result<()> {
        let mut items = self.load(&item.organisation_id)?;
        match items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => anyhow::bail!("Evidence item not found for update: {}", item.id),
        }
        self.connection.write_collection(&self.path(&item.organisation_id), &items)
    }
}
