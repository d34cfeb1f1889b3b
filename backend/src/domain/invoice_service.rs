//! Payment invoices.
//!
//! OVERDUE is derived, not scheduled: an unpaid invoice past its due date is
//! promoted whenever it is read back.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use shared::CreateInvoiceRequest;

use crate::domain::auth::SessionUser;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::invoice::{PaymentInvoice, PaymentStatus};
use crate::domain::models::new_id;
use crate::storage::traits::{ChildStorage, InvoiceStorage};
use crate::storage::yaml::{ChildRepository, Connection, InvoiceRepository};

#[derive(Clone)]
pub struct InvoiceService {
    invoices: InvoiceRepository,
    children: ChildRepository,
}

impl InvoiceService {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            invoices: InvoiceRepository::new(connection.clone()),
            children: ChildRepository::new(connection),
        }
    }

    pub fn create_invoice(
        &self,
        ctx: &SessionUser,
        request: CreateInvoiceRequest,
    ) -> DomainResult<PaymentInvoice> {
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
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(DomainError::validation("Amount must be positive"));
        }
        let description = request.description.trim();
        if description.is_empty() {
            return Err(DomainError::validation("Description cannot be empty"));
        }
        let due_date = super::child_service::parse_date(&request.due_date, "due_date")?;

        let now = Utc::now();
        let invoice = PaymentInvoice {
            id: new_id(),
            organisation_id: ctx.organisation_id.clone(),
            child_id: request.child_id,
            amount: request.amount,
            due_date,
            paid_date: None,
            status: PaymentStatus::Unpaid,
            description: description.to_string(),
            created_by_id: ctx.user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.invoices.store_invoice(&invoice)?;
        info!("Created invoice {} for child {}", invoice.id, invoice.child_id);
        Ok(invoice)
    }

    /// All invoices, with unpaid ones past their due date shown as OVERDUE.
    pub fn list_invoices(&self, ctx: &SessionUser) -> DomainResult<Vec<PaymentInvoice>> {
        let today = Utc::now().date_naive();
        let invoices = self.invoices.list_invoices(&ctx.organisation_id)?;
        Ok(invoices
            .into_iter()
            .map(|invoice| derive_status(invoice, today))
            .collect())
    }

    pub fn get_invoice(&self, ctx: &SessionUser, invoice_id: &str) -> DomainResult<PaymentInvoice> {
        let today = Utc::now().date_naive();
        self.invoices
            .get_invoice(&ctx.organisation_id, invoice_id)?
            .map(|invoice| derive_status(invoice, today))
            .ok_or_else(|| DomainError::not_found(format!("Invoice not found: {invoice_id}")))
    }

    pub fn mark_paid(&self, ctx: &SessionUser, invoice_id: &str) -> DomainResult<PaymentInvoice> {
        let mut invoice = self
            .invoices
            .get_invoice(&ctx.organisation_id, invoice_id)?
            .ok_or_else(|| DomainError::not_found(format!("Invoice not found: {invoice_id}")))?;
        if invoice.status == PaymentStatus::Paid {
            return Err(DomainError::conflict("Invoice is already paid"));
        }

        let now = Utc::now();
        invoice.status = PaymentStatus::Paid;
        invoice.paid_date = Some(now.date_naive());
        invoice.updated_at = now;
        self.invoices.update_invoice(&invoice)?;
        info!("Marked invoice {} paid", invoice.id);
        Ok(invoice)
    }

    pub fn overdue_invoices(&self, ctx: &SessionUser) -> DomainResult<Vec<PaymentInvoice>> {
        Ok(self
            .list_invoices(ctx)?
            .into_iter()
            .filter(|invoice| invoice.status == PaymentStatus::Overdue)
            .collect())
    }
}

fn derive_status(mut invoice: PaymentInvoice, today: NaiveDate) -> PaymentInvoice {
    if invoice.status == PaymentStatus::Unpaid && invoice.due_date < today {
        invoice.status = PaymentStatus::Overdue;
    }
    invoice
}
