use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::Connection;
use crate::domain::models::daily_update::{
    DailyNote, DailyUpdate, DailyUpdateApproval, OutboundMessageLog,
};
use crate::storage::traits::DailyUpdateStorage;

const NOTES_FILE: &str = "daily_notes.yaml";
const UPDATES_FILE: &str = "daily_updates.yaml";
const APPROVALS_FILE: &str = "daily_update_approvals.yaml";
const MESSAGE_LOG_FILE: &str = "outbound_messages.yaml";

/// Everything the daily-update workflow persists: notes, updates,
/// approvals and the append-only outbound message log.
#[derive(Clone)]
pub struct DailyUpdateRepository {
    connection: Arc<Connection>,
}

impl DailyUpdateRepository {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    fn file(&self, organisation_id: &str, name: &str) -> PathBuf {
        self.connection.organisation_file(organisation_id, name)
    }

    fn load_notes(&self, organisation_id: &str) -> Result<Vec<DailyNote>> {
        self.connection.read_collection(&self.file(organisation_id, NOTES_FILE))
    }

    fn load_updates(&self, organisation_id: &str) -> Result<Vec<DailyUpdate>> {
        self.connection.read_collection(&self.file(organisation_id, UPDATES_FILE))
    }

    fn load_approvals(&self, organisation_id: &str) -> Result<Vec<DailyUpdateApproval>> {
        self.connection.read_collection(&self.file(organisation_id, APPROVALS_FILE))
    }
}

impl DailyUpdateStorage for DailyUpdateRepository {
    fn upsert_note(&self, note: &DailyNote) -> Result<()> {
        let mut notes = self.load_notes(&note.organisation_id)?;
        match notes
            .iter_mut()
            .find(|n| n.child_id == note.child_id && n.date == note.date)
        {
            Some(existing) => *existing = note.clone(),
            None => notes.push(note.clone()),
        }
        self.connection
            .write_collection(&self.file(&note.organisation_id, NOTES_FILE), &notes)
    }

    fn find_note(
        &self,
        organisation_id: &str,
        child_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyNote>> {
        let notes = self.load_notes(organisation_id)?;
        Ok(notes
            .into_iter()
            .find(|n| n.child_id == child_id && n.date == date))
    }

    fn notes_for_date(&self, organisation_id: &str, date: NaiveDate) -> Result<Vec<DailyNote>> {
        let notes = self.load_notes(organisation_id)?;
        Ok(notes.into_iter().filter(|n| n.date == date).collect())
    }

    fn store_update(&self, update: &DailyUpdate) -> Result<()> {
        let mut updates = self.load_updates(&update.organisation_id)?;
        updates.push(update.clone());
        self.connection
            .write_collection(&self.file(&update.organisation_id, UPDATES_FILE), &updates)
    }

    fn update_update(&self, update: &DailyUpdate) -> Result<()> {
        let mut updates = self.load_updates(&update.organisation_id)?;
        match updates.iter_mut().find(|u| u.id == update.id) {
            Some(existing) => *existing = update.clone(),
            None => anyhow::bail!("Daily update not found for update: {}", update.id),
        }
        self.connection
            .write_collection(&self.file(&update.organisation_id, UPDATES_FILE), &updates)
    }

    fn get_update(&self, organisation_id: &str, update_id: &str) -> Result<Option<DailyUpdate>> {
        let updates = self.load_updates(organisation_id)?;
        Ok(updates.into_iter().find(|u| u.id == update_id))
    }

    fn find_update(
        &self,
        organisation_id: &str,
        child_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyUpdate>> {
        let updates = self.load_updates(organisation_id)?;
        Ok(updates
            .into_iter()
            .find(|u| u.child_id == child_id && u.date == date))
    }

    fn updates_for_date(&self, organisation_id: &str, date: NaiveDate) -> Result<Vec<DailyUpdate>> {
        let updates = self.load_updates(organisation_id)?;
        Ok(updates.into_iter().filter(|u| u.date == date).collect())
    }

    fn store_approval(&self, organisation_id: &str, approval: &DailyUpdateApproval) -> Result<()> {
        let mut approvals = self.load_approvals(organisation_id)?;
        // At most one approval per daily update, ever.
        if approvals
            .iter()
            .any(|a| a.daily_update_id == approval.daily_update_id)
        {
            anyhow::bail!(
                "Approval already exists for daily update {}",
                approval.daily_update_id
            );
        }
        approvals.push(approval.clone());
        self.connection
            .write_collection(&self.file(organisation_id, APPROVALS_FILE), &approvals)
    }

    fn approval_for_update(
        &self,
        organisation_id: &str,
        daily_update_id: &str,
    ) -> Result<Option<DailyUpdateApproval>> {
        let approvals = self.load_approvals(organisation_id)?;
        Ok(approvals
            .into_iter()
            .find(|a| a.daily_update_id == daily_update_id))
    }

    fn append_message_log(&self, entry: &OutboundMessageLog) -> Result<()> {
        let path = self.file(&entry.organisation_id, MESSAGE_LOG_FILE);
        let mut entries: Vec<OutboundMessageLog> = self.connection.read_collection(&path)?;
        entries.push(entry.clone());
        self.connection.write_collection(&path, &entries)
    }

    fn logs_for_update(
        &self,
        organisation_id: &str,
        daily_update_id: &str,
    ) -> Result<Vec<OutboundMessageLog>> {
        let path = self.file(organisation_id, MESSAGE_LOG_FILE);
        let entries: Vec<OutboundMessageLog> = self.connection.read_collection(&path)?;
        Ok(entries
            .into_iter()
            .filter(|e| e.daily_update_id == daily_update_id)
            .collect())
    }
}
