use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::Connection;
use crate::domain::models::attendance::Attendance;
use crate::storage::traits::AttendanceStorage;

const FILE: &str = "attendance.yaml";

#[derive(Clone)]
pub struct AttendanceRepository {
    connection: Arc<Connection>,
}

impl AttendanceRepository {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    fn path(&self, organisation_id: &str) -> PathBuf {
        self.connection.organisation_file(organisation_id, FILE)
    }

    fn load(&self, organisation_id: &str) -> Result<Vec<Attendance>> {
        self.connection.read_collection(&self.path(organisation_id))
    }

    fn save(&self, organisation_id: &str, rows: &[Attendance]) -> Result<()> {
        self.connection.write_collection(&self.path(organisation_id), rows)
    }
}

impl AttendanceStorage for AttendanceRepository {
    fn store_attendance(&self, attendance: &Attendance) -> Result<()> {
        let mut rows = self.load(&attendance.organisation_id)?;
        rows.push(attendance.clone());
        self.save(&attendance.organisation_id, &rows)
    }

    fn get_attendance(
        &self,
        organisation_id: &str,
        attendance_id: &str,
    ) -> Result<Option<Attendance>> {
        let rows = self.load(organisation_id)?;
        Ok(rows.into_iter().find(|a| a.id == attendance_id))
    }

    fn find_for_child_on_date(
        &self,
        organisation_id: &str,
        child_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Attendance>> {
        let rows = self.load(organisation_id)?;
        Ok(rows
            .into_iter()
            .find(|a| a.child_id == child_id && a.date == date))
    }

    fn list_for_date(&self, organisation_id: &str, date: NaiveDate) -> Result<Vec<Attendance>> {
        let rows = self.load(organisation_id)?;
        Ok(rows.into_iter().filter(|a| a.date == date).collect())
    }

    fn update_attendance(&self, attendance: &Attendance) -> Result<()> {
        let mut rows = self.load(&attendance.organisation_id)?;
        match rows.iter_mut().find(|a| a.id == attendance.id) {
            Some(existing) => *existing = attendance.clone(),
            None => anyhow::bail!("Attendance not found for update: {}", attendance.id),
        }
        self.save(&attendance.organisation_id, &rows)
    }
}
