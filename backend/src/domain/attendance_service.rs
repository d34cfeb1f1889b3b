//! Daily register: check-ins, check-outs, absences and the day summary.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use shared::{CheckInRequest, CheckOutRequest, RegisterSummary};

use crate::domain::auth::SessionUser;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::attendance::{Attendance, AttendanceStatus};
use crate::domain::models::new_id;
use crate::storage::traits::{AttendanceStorage, ChildStorage};
use crate::storage::yaml::{AttendanceRepository, ChildRepository, Connection};

#[derive(Clone)]
pub struct AttendanceService {
    attendance: AttendanceRepository,
    children: ChildRepository,
}

impl AttendanceService {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            attendance: AttendanceRepository::new(connection.clone()),
            children: ChildRepository::new(connection),
        }
    }

    /// Check a child in for today. A second check-in without a check-out in
    /// between is a conflict; checking in again after a check-out reopens
    /// the same register row.
    pub fn check_in(&self, ctx: &SessionUser, request: CheckInRequest) -> DomainResult<Attendance> {
        if self
            .children
            .get_child(&ctx.organisation_id, &request.child_id)?
            .is_none()
        {
            return Err(DomainError::not_found(format!(
                "Child not found: {}",
                request.child_id
            )));
        }

        let now = Utc::now();
        let check_in_time = request.check_in_time.unwrap_or(now);
        let date = check_in_time.date_naive();

        let existing =
            self.attendance
                .find_for_child_on_date(&ctx.organisation_id, &request.child_id, date)?;
        let record = match existing {
            Some(mut record) => {
                if record.check_in_time.is_some() && record.check_out_time.is_none() {
                    return Err(DomainError::conflict("Child is already checked in"));
                }
                record.check_in_time = Some(check_in_time);
                record.check_out_time = None;
                record.status = AttendanceStatus::Present;
                record.updated_at = now;
                self.attendance.update_attendance(&record)?;
                record
            }
            None => {
                let record = Attendance {
                    id: new_id(),
                    organisation_id: ctx.organisation_id.clone(),
                    child_id: request.child_id.clone(),
                    date,
                    check_in_time: Some(check_in_time),
                    check_out_time: None,
                    status: AttendanceStatus::Present,
                    created_at: now,
                    updated_at: now,
                };
                self.attendance.store_attendance(&record)?;
                record
            }
        };
        info!("Checked in child {} for {}", request.child_id, date);
        Ok(record)
    }

    pub fn check_out(
        &self,
        ctx: &SessionUser,
        attendance_id: &str,
        request: CheckOutRequest,
    ) -> DomainResult<Attendance> {
        let mut record = self
            .attendance
            .get_attendance(&ctx.organisation_id, attendance_id)?
            .ok_or_else(|| {
                DomainError::not_found(format!("Attendance record not found: {attendance_id}"))
            })?;
        if record.check_in_time.is_none() {
            return Err(DomainError::conflict("Child was never checked in"));
        }
        if record.check_out_time.is_some() {
            return Err(DomainError::conflict("Child is already checked out"));
        }

        let now = Utc::now();
        let check_out_time = request.check_out_time.unwrap_or(now);
        if let Some(check_in_time) = record.check_in_time {
            if check_out_time < check_in_time {
                return Err(DomainError::validation(
                    "Check-out time cannot be before check-in time",
                ));
            }
        }
        record.check_out_time = Some(check_out_time);
        record.updated_at = now;
        self.attendance.update_attendance(&record)?;
        Ok(record)
    }

    /// Mark a child absent/sick/on holiday for a date without a check-in.
    pub fn mark_absence(
        &self,
        ctx: &SessionUser,
        child_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> DomainResult<Attendance> {
        if status == AttendanceStatus::Present {
            return Err(DomainError::validation(
                "Use check-in to mark a child present",
            ));
        }
        if self
            .children
            .get_child(&ctx.organisation_id, child_id)?
            .is_none()
        {
            return Err(DomainError::not_found(format!(
                "Child not found: {child_id}"
            )));
        }

        let now = Utc::now();
        let existing = self
            .attendance
            .find_for_child_on_date(&ctx.organisation_id, child_id, date)?;
        let record = match existing {
            Some(mut record) => {
                if record.check_in_time.is_some() {
                    return Err(DomainError::conflict(
                        "Child already has a check-in for this date",
                    ));
                }
                record.status = status;
                record.updated_at = now;
                self.attendance.update_attendance(&record)?;
                record
            }
            None => {
                let record = Attendance {
                    id: new_id(),
                    organisation_id: ctx.organisation_id.clone(),
                    child_id: child_id.to_string(),
                    date,
                    check_in_time: None,
                    check_out_time: None,
                    status,
                    created_at: now,
                    updated_at: now,
                };
                self.attendance.store_attendance(&record)?;
                record
            }
        };
        Ok(record)
    }

    pub fn register_for_date(
        &self,
        ctx: &SessionUser,
        date: NaiveDate,
    ) -> DomainResult<Vec<Attendance>> {
        Ok(self.attendance.list_for_date(&ctx.organisation_id, date)?)
    }

    pub fn summary_for_date(
        &self,
        ctx: &SessionUser,
        date: NaiveDate,
    ) -> DomainResult<RegisterSummary> {
        let records = self.attendance.list_for_date(&ctx.organisation_id, date)?;
        let total_children = self.children.list_children(&ctx.organisation_id)?.len();
        let present = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count();
        let checked_in = records
            .iter()
            .filter(|r| r.check_in_time.is_some() && r.check_out_time.is_none())
            .count();
        let checked_out = records
            .iter()
            .filter(|r| r.check_out_time.is_some())
            .count();
        Ok(RegisterSummary {
            date,
            total_children,
            present,
            checked_in,
            checked_out,
        })
    }
}
