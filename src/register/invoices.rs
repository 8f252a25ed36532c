//! Register orchestrating validation, storage and derivation of invoices

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::InvoiceConfig;
use crate::invoice::{derive_invoice_with, Invoice};
use crate::traits::*;
use crate::types::*;
use crate::utils::format::{format_currency, format_invoice_date};
use crate::utils::validation::StrictInvoiceValidator;

/// One row of the admin invoice table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListing {
    pub id: String,
    pub invoice_number: String,
    pub buyer_name: String,
    /// Invoice date as printed
    pub invoice_date: String,
    pub grand_total: BigDecimal,
    /// Grand total with currency symbol, e.g. `₹1180.00`
    pub grand_total_display: String,
    pub created_at: NaiveDateTime,
}

/// Invoice register backed by any [`InvoiceStorage`].
///
/// Stores raw form data only; every read that needs figures derives them
/// afresh with the register's configuration.
pub struct InvoiceRegister<S: InvoiceStorage> {
    storage: S,
    validator: Box<dyn InvoiceValidator>,
    config: InvoiceConfig,
}

impl<S: InvoiceStorage> InvoiceRegister<S> {
    /// Create a register with the default validator and configuration
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultInvoiceValidator),
            config: InvoiceConfig::default(),
        }
    }

    /// Create a register with a custom validator
    pub fn with_validator(storage: S, validator: Box<dyn InvoiceValidator>) -> Self {
        Self {
            storage,
            validator,
            config: InvoiceConfig::default(),
        }
    }

    /// Create a register with a custom validator and configuration
    pub fn with_config(
        storage: S,
        validator: Box<dyn InvoiceValidator>,
        config: InvoiceConfig,
    ) -> Self {
        Self {
            storage,
            validator,
            config,
        }
    }

    /// Create a register that applies [`StrictInvoiceValidator`] under `config`
    pub fn strict(storage: S, config: InvoiceConfig) -> Self {
        let validator = Box::new(StrictInvoiceValidator::new(&config));
        Self::with_config(storage, validator, config)
    }

    pub fn config(&self) -> &InvoiceConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Validate and save a new invoice
    pub async fn create_invoice(&mut self, raw: RawInvoice) -> InvoiceResult<StoredInvoice> {
        self.validator.validate_invoice(&raw)?;
        self.ensure_number_available(&raw.header.invoice_number, None)
            .await?;

        let invoice = StoredInvoice::new(raw);
        self.storage.save_invoice(&invoice).await?;

        tracing::info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.raw.header.invoice_number,
            items = invoice.raw.items.len(),
            "invoice created"
        );
        Ok(invoice)
    }

    /// Get an invoice by ID
    pub async fn get_invoice(&self, invoice_id: &str) -> InvoiceResult<Option<StoredInvoice>> {
        self.storage.get_invoice(invoice_id).await
    }

    /// Get an invoice by ID, returning an error if not found
    pub async fn get_invoice_required(&self, invoice_id: &str) -> InvoiceResult<StoredInvoice> {
        self.storage
            .get_invoice(invoice_id)
            .await?
            .ok_or_else(|| InvoiceError::InvoiceNotFound(invoice_id.to_string()))
    }

    /// Load an invoice and derive its taxes, totals and words
    pub async fn derived_invoice(&self, invoice_id: &str) -> InvoiceResult<Invoice> {
        let stored = self.get_invoice_required(invoice_id).await?;
        Ok(derive_invoice_with(&stored.raw, &self.config))
    }

    /// Rows for the invoice table, newest first
    pub async fn list_invoices(&self) -> InvoiceResult<Vec<InvoiceListing>> {
        let mut invoices = self.storage.list_invoices().await?;
        invoices.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.raw.header.invoice_number.cmp(&a.raw.header.invoice_number))
        });

        Ok(invoices
            .into_iter()
            .map(|stored| {
                let derived = derive_invoice_with(&stored.raw, &self.config);
                InvoiceListing {
                    grand_total_display: format_currency(
                        &derived.grand_total,
                        &self.config.currency_symbol,
                    ),
                    grand_total: derived.grand_total,
                    invoice_date: format_invoice_date(&stored.raw.header.invoice_date),
                    invoice_number: stored.raw.header.invoice_number,
                    buyer_name: stored.raw.header.buyer.name,
                    id: stored.id,
                    created_at: stored.created_at,
                }
            })
            .collect())
    }

    /// Replace the form data of an existing invoice
    pub async fn update_invoice(
        &mut self,
        invoice_id: &str,
        raw: RawInvoice,
    ) -> InvoiceResult<StoredInvoice> {
        let mut invoice = self.get_invoice_required(invoice_id).await?;

        self.validator.validate_invoice(&raw)?;
        self.ensure_number_available(&raw.header.invoice_number, Some(invoice_id))
            .await?;

        invoice.replace_raw(raw);
        self.storage.update_invoice(&invoice).await?;

        tracing::info!(invoice_id = %invoice.id, "invoice updated");
        Ok(invoice)
    }

    /// Delete an invoice
    pub async fn delete_invoice(&mut self, invoice_id: &str) -> InvoiceResult<()> {
        if self.storage.get_invoice(invoice_id).await?.is_none() {
            return Err(InvoiceError::InvoiceNotFound(invoice_id.to_string()));
        }

        self.storage.delete_invoice(invoice_id).await?;
        tracing::info!(invoice_id = %invoice_id, "invoice deleted");
        Ok(())
    }

    async fn ensure_number_available(
        &self,
        invoice_number: &str,
        own_id: Option<&str>,
    ) -> InvoiceResult<()> {
        let invoice_number = invoice_number.trim();
        if invoice_number.is_empty() {
            return Ok(());
        }

        match self.storage.find_by_number(invoice_number).await? {
            Some(existing) if Some(existing.id.as_str()) != own_id => {
                tracing::warn!(invoice_number = %invoice_number, "duplicate invoice number rejected");
                Err(InvoiceError::DuplicateInvoiceNumber(
                    invoice_number.to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemoryStorage;

    fn raw(number: &str, amount: i64) -> RawInvoice {
        let header = InvoiceHeader {
            invoice_number: number.to_string(),
            invoice_date: "2024-05-02".to_string(),
            buyer: Party {
                name: "Central Railway".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        RawInvoice::new(
            header,
            vec![RawLineItem::new("Station branding", "998363", amount, 9, 9, 0)],
        )
    }

    #[tokio::test]
    async fn test_create_and_derive() {
        let mut register = InvoiceRegister::new(MemoryStorage::new());
        let stored = register.create_invoice(raw("INV-1", 1000)).await.unwrap();

        let invoice = register.derived_invoice(&stored.id).await.unwrap();
        assert_eq!(invoice.grand_total, BigDecimal::from(1180));
        assert_eq!(invoice.header.invoice_number, "INV-1");
    }

    #[tokio::test]
    async fn test_empty_invoice_rejected() {
        let mut register = InvoiceRegister::new(MemoryStorage::new());
        let result = register
            .create_invoice(RawInvoice::new(InvoiceHeader::default(), vec![]))
            .await;
        assert!(matches!(result, Err(InvoiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected() {
        let mut register = InvoiceRegister::new(MemoryStorage::new());
        register.create_invoice(raw("INV-1", 1000)).await.unwrap();

        let result = register.create_invoice(raw("INV-1", 500)).await;
        assert!(matches!(result, Err(InvoiceError::DuplicateInvoiceNumber(_))));

        // Drafts without a number may repeat
        register.create_invoice(raw("", 1)).await.unwrap();
        register.create_invoice(raw("", 2)).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_number_ignores_padding() {
        let mut register = InvoiceRegister::new(MemoryStorage::new());
        register.create_invoice(raw("INV-1", 1000)).await.unwrap();

        let padded = register.create_invoice(raw("INV-1 ", 500)).await;
        assert!(matches!(padded, Err(InvoiceError::DuplicateInvoiceNumber(_))));

        register.create_invoice(raw(" INV-2", 500)).await.unwrap();
        let plain = register.create_invoice(raw("INV-2", 500)).await;
        assert!(matches!(plain, Err(InvoiceError::DuplicateInvoiceNumber(_))));

        // Whitespace-only numbers count as drafts
        register.create_invoice(raw("  ", 1)).await.unwrap();
        register.create_invoice(raw(" ", 2)).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_keeps_own_number() {
        let mut register = InvoiceRegister::new(MemoryStorage::new());
        let stored = register.create_invoice(raw("INV-1", 1000)).await.unwrap();
        register.create_invoice(raw("INV-2", 1000)).await.unwrap();

        let updated = register
            .update_invoice(&stored.id, raw("INV-1", 2000))
            .await
            .unwrap();
        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.created_at, stored.created_at);

        let clash = register.update_invoice(&stored.id, raw("INV-2", 2000)).await;
        assert!(matches!(clash, Err(InvoiceError::DuplicateInvoiceNumber(_))));

        let invoice = register.derived_invoice(&stored.id).await.unwrap();
        assert_eq!(invoice.grand_total, BigDecimal::from(2360));
    }

    #[tokio::test]
    async fn test_missing_invoice() {
        let mut register = InvoiceRegister::new(MemoryStorage::new());
        assert!(register.get_invoice("nope").await.unwrap().is_none());
        assert!(matches!(
            register.derived_invoice("nope").await,
            Err(InvoiceError::InvoiceNotFound(_))
        ));
        assert!(matches!(
            register.delete_invoice("nope").await,
            Err(InvoiceError::InvoiceNotFound(_))
        ));
        assert!(matches!(
            register.update_invoice("nope", raw("INV-9", 1)).await,
            Err(InvoiceError::InvoiceNotFound(_))
        ));
    }
}
