//! Traits for storage abstraction and validation

use async_trait::async_trait;

use crate::types::*;

/// Storage abstraction for raw invoice records
///
/// Only raw form data is stored. Derived figures are recomputed on every
/// read, so a backend never needs to know about taxes or totals.
#[async_trait]
pub trait InvoiceStorage: Send + Sync {
    /// Save a new invoice
    async fn save_invoice(&mut self, invoice: &StoredInvoice) -> InvoiceResult<()>;

    /// Get an invoice by ID
    async fn get_invoice(&self, invoice_id: &str) -> InvoiceResult<Option<StoredInvoice>>;

    /// Find an invoice by its printed invoice number, ignoring surrounding whitespace
    async fn find_by_number(&self, invoice_number: &str) -> InvoiceResult<Option<StoredInvoice>>;

    /// List all invoices
    async fn list_invoices(&self) -> InvoiceResult<Vec<StoredInvoice>>;

    /// Replace an existing invoice
    async fn update_invoice(&mut self, invoice: &StoredInvoice) -> InvoiceResult<()>;

    /// Delete an invoice
    async fn delete_invoice(&mut self, invoice_id: &str) -> InvoiceResult<()>;
}

/// Rules a raw invoice must satisfy before it is saved
pub trait InvoiceValidator: Send + Sync {
    fn validate_invoice(&self, invoice: &RawInvoice) -> InvoiceResult<()>;
}

/// Default validator: an invoice needs at least one line item
pub struct DefaultInvoiceValidator;

impl InvoiceValidator for DefaultInvoiceValidator {
    fn validate_invoice(&self, invoice: &RawInvoice) -> InvoiceResult<()> {
        if invoice.items.is_empty() {
            return Err(InvoiceError::Validation(
                "Invoice must have at least one line item".to_string(),
            ));
        }

        Ok(())
    }
}
