use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::Connection;
use crate::domain::models::incident::IncidentLog;
use crate::storage::traits::IncidentStorage;

const FILE: &str = "incidents.yaml";

#[derive(Clone)]
pub struct IncidentRepository {
    connection: Arc<Connection>,
}

impl IncidentRepository {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    fn path(&self, organisation_id: &str) -> PathBuf {
        self.connection.organisation_file(organisation_id, FILE)
    }

    fn load(&self, organisation_id: &str) -> Result<Vec<IncidentLog>> {
        self.connection.read_collection(&self.path(organisation_id))
    }
}

impl IncidentStorage for IncidentRepository {
    fn store_incident(&self, incident: &IncidentLog) -> Result<()> {
        let mut incidents = self.load(&incident.organisation_id)?;
        incidents.push(incident.clone());
        self.connection
            .write_collection(&self.path(&incident.organisation_id), &incidents)
    }

    fn get_incident(
        &self,
        organisation_id: &str,
        incident_id: &str,
    ) -> Result<Option<IncidentLog>> {
        let incidents = self.load(organisation_id)?;
        Ok(incidents.into_iter().find(|i| i.id == incident_id))
    }

    fn list_incidents(&self, organisation_id: &str) -> Result<Vec<IncidentLog>> {
        let mut incidents = self.load(organisation_id)?;
        incidents.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(incidents)
    }

    fn update_incident(&self, incident: &IncidentLog) -> Result<()> {
        let mut incidents = self.load(&incident.organisation_id)?;
        match incidents.iter_mut().find(|i| i.id == incident.id) {
            Some(existing) => *existing = incident.clone(),
            None => anyhow::bail!("Incident not found for update: {}", incident.id),
        }
        self.connection
            .write_collection(&self.path(&incident.organisation_id), &incidents)
    }
}
