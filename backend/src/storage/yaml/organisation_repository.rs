use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::Connection;
use crate::domain::models::organisation::OrganisationSettings;
use crate::storage::traits::OrganisationStorage;

const FILE: &str = "organisation.yaml";

#[derive(Clone)]
pub struct OrganisationRepository {
    connection: Arc<Connection>,
}

impl OrganisationRepository {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    fn path(&self, organisation_id: &str) -> PathBuf {
        self.connection.organisation_file(organisation_id, FILE)
    }
}

impl OrganisationStorage for OrganisationRepository {
    fn get_settings(&self, organisation_id: &str) -> Result<Option<OrganisationSettings>> {
        // Settings are a single document, stored as a one-element collection
        // to reuse the atomic-write helper.
        let rows: Vec<OrganisationSettings> =
            self.connection.read_collection(&self.path(organisation_id))?;
        Ok(rows.into_iter().next())
    }

    fn save_settings(&self, settings: &OrganisationSettings) -> Result<()> {
        self.connection.write_collection(
            &self.path(&settings.organisation_id),
            std::slice::from_ref(settings),
        )
    }
}
