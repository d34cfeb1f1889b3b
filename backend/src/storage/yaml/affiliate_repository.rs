use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::Connection;
use crate::domain::models::affiliate::AffiliateApplication;
use crate::storage::traits::AffiliateStorage;

const FILE: &str = "affiliates.yaml";

/// Affiliate applications are global: applicants exist before (and outside)
/// any organisation.
#[derive(Clone)]
pub struct AffiliateRepository {
    connection: Arc<Connection>,
}

impl AffiliateRepository {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    fn path(&self) -> PathBuf {
        self.connection.global_file(FILE)
    }

    fn load(&self) -> Result<Vec<AffiliateApplication>> {
        self.connection.read_collection(&self.path())
    }
}

impl AffiliateStorage for AffiliateRepository {
    fn store_application(&self, application: &AffiliateApplication) -> Result<()> {
        let mut applications = self.load()?;
        applications.push(application.clone());
        self.connection.write_collection(&self.path(), &applications)
    }

    fn get_application(&self, application_id: &str) -> Result<Option<AffiliateApplication>> {
        let applications = self.load()?;
        Ok(applications.into_iter().find(|a| a.id == application_id))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<AffiliateApplication>> {
        let needle = email.to_lowercase();
        let applications = self.load()?;
        Ok(applications.into_iter().find(|a| a.email == needle))
    }

    fn find_by_referral_code(&self, code: &str) -> Result<Option<AffiliateApplication>> {
        let applications = self.load()?;
        Ok(applications
            .into_iter()
            .find(|a| a.referral_code.as_deref() == Some(code)))
    }

    fn update_application(&self, application: &AffiliateApplication) -> Result<()> {
        let mut applications = self.load()?;
        match applications.iter_mut().find(|a| a.id == application.id) {
            Some(existing) => *existing = application.clone(),
            None => anyhow::bail!("Affiliate application not found for update: {}", application.id),
        }
        self.connection.write_collection(&self.path(), &applications)
    }

    fn list_applications(&self) -> Result<Vec<AffiliateApplication>> {
        let mut applications = self.load()?;
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(applications)
    }
}
