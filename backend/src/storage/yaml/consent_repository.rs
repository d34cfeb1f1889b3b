use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::Connection;
use crate::domain::models::consent::{ConsentRecord, ConsentTemplate};
use crate::storage::traits::ConsentStorage;

const TEMPLATES_FILE: &str = "consent_templates.yaml";
const RECORDS_FILE: &str = "consent_records.yaml";

/// Consent templates plus the per-child records instantiated from them.
#[derive(Clone)]
pub struct ConsentRepository {
    connection: Arc<Connection>,
}

impl ConsentRepository {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    fn templates_path(&self, organisation_id: &str) -> PathBuf {
        self.connection.organisation_file(organisation_id, TEMPLATES_FILE)
    }

    fn records_path(&self, organisation_id: &str) -> PathBuf {
        self.connection.organisation_file(organisation_id, RECORDS_FILE)
    }

    fn load_records(&self, organisation_id: &str) -> Result<Vec<ConsentRecord>> {
        self.connection.read_collection(&self.records_path(organisation_id))
    }
}

impl ConsentStorage for ConsentRepository {
    fn store_template(&self, template: &ConsentTemplate) -> Result<()> {
        let mut templates: Vec<ConsentTemplate> = self
            .connection
            .read_collection(&self.templates_path(&template.organisation_id))?;
        templates.push(template.clone());
        self.connection
            .write_collection(&self.templates_path(&template.organisation_id), &templates)
    }

    fn list_templates(&self, organisation_id: &str) -> Result<Vec<ConsentTemplate>> {
        self.connection.read_collection(&self.templates_path(organisation_id))
    }

    fn get_template(
        &self,
        organisation_id: &str,
        template_id: &str,
    ) -> Result<Option<ConsentTemplate>> {
        let templates = self.list_templates(organisation_id)?;
        Ok(templates.into_iter().find(|t| t.id == template_id))
    }

    fn store_record(&self, record: &ConsentRecord) -> Result<()> {
        let mut records = self.load_records(&record.organisation_id)?;
        records.push(record.clone());
        self.connection
            .write_collection(&self.records_path(&record.organisation_id), &records)
    }

    fn update_record(&self, record: &ConsentRecord) -> Result<()> {
        let mut records = self.load_records(&record.organisation_id)?;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => anyhow::bail!("Consent record not found for update: {}", record.id),
        }
        self.connection
            .write_collection(&self.records_path(&record.organisation_id), &records)
    }

    fn find_record(
        &self,
        organisation_id: &str,
        child_id: &str,
        template_id: &str,
    ) -> Result<Option<ConsentRecord>> {
        let records = self.load_records(organisation_id)?;
        Ok(records
            .into_iter()
            .find(|r| r.child_id == child_id && r.template_id == template_id))
    }

    fn list_records(&self, organisation_id: &str) -> Result<Vec<ConsentRecord>> {
        self.load_records(organisation_id)
    }

    fn list_records_for_child(
        &self,
        organisation_id: &str,
        child_id: &str,
    ) -> Result<Vec<ConsentRecord>> {
        let records = self.load_records(organisation_id)?;
        Ok(records.into_iter().filter(|r| r.child_id == child_id).collect())
    }
}
