use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::Connection;
use crate::domain::models::invoice::PaymentInvoice;
use crate::storage::traits::InvoiceStorage;

const FILE: &str = "invoices.yaml";

#[derive(Clone)]
pub struct InvoiceRepository {
    connection: Arc<Connection>,
}

impl InvoiceRepository {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    fn path(&self, organisation_id: &str) -> PathBuf {
        self.connection.organisation_file(organisation_id, FILE)
    }

    fn load(&self, organisation_id: &str) -> Result<Vec<PaymentInvoice>> {
        self.connection.read_collection(&self.path(organisation_id))
    }
}

impl InvoiceStorage for InvoiceRepository {
    fn store_invoice(&self, invoice: &PaymentInvoice) -> Result<()> {
        let mut invoices = self.load(&invoice.organisation_id)?;
        invoices.push(invoice.clone());
        self.connection
            .write_collection(&self.path(&invoice.organisation_id), &invoices)
    }

    fn get_invoice(
        &self,
        organisation_id: &str,
        invoice_id: &str,
    ) -> Result<Option<PaymentInvoice>> {
        let invoices = self.load(organisation_id)?;
        Ok(invoices.into_iter().find(|i| i.id == invoice_id))
    }

    fn list_invoices(&self, organisation_id: &str) -> Result<Vec<PaymentInvoice>> {
        let mut invoices = self.load(organisation_id)?;
        invoices.sort_by(|a, b| b.due_date.cmp(&a.due_date));
        Ok(invoices)
    }

    fn update_invoice(&self, invoice: &PaymentInvoice) -> Result<()> {
        let mut invoices = self.load(&invoice.organisation_id)?;
        match invoices.iter_mut().find(|i| i.id == invoice.id) {
            Some(existing) => *existing = invoice.clone(),
            None => anyhow::bail!("Invoice not found for update: {}", invoice.id),
        }
        self.connection
            .write_collection(&self.path(&invoice.organisation_id), &invoices)
    }
}
