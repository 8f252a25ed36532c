//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory invoice storage for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    invoices: Arc<RwLock<HashMap<String, StoredInvoice>>>,
}

fn poisoned<T>(_: T) -> InvoiceError {
    InvoiceError::Storage("invoice store lock poisoned".to_string())
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored invoices
    pub fn len(&self) -> InvoiceResult<usize> {
        Ok(self.invoices.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> InvoiceResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> InvoiceResult<()> {
        self.invoices.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

#[async_trait]
impl InvoiceStorage for MemoryStorage {
    async fn save_invoice(&mut self, invoice: &StoredInvoice) -> InvoiceResult<()> {
        self.invoices
            .write()
            .map_err(poisoned)?
            .insert(invoice.id.clone(), invoice.clone());
        Ok(())
    }

    async fn get_invoice(&self, invoice_id: &str) -> InvoiceResult<Option<StoredInvoice>> {
        Ok(self.invoices.read().map_err(poisoned)?.get(invoice_id).cloned())
    }

    async fn find_by_number(&self, invoice_number: &str) -> InvoiceResult<Option<StoredInvoice>> {
        Ok(self
            .invoices
            .read()
            .map_err(poisoned)?
            .values()
            .find(|invoice| {
                invoice.raw.header.invoice_number.trim() == invoice_number.trim()
            })
            .cloned())
    }

    async fn list_invoices(&self) -> InvoiceResult<Vec<StoredInvoice>> {
        Ok(self
            .invoices
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect())
    }

    async fn update_invoice(&mut self, invoice: &StoredInvoice) -> InvoiceResult<()> {
        let mut invoices = self.invoices.write().map_err(poisoned)?;
        match invoices.get_mut(&invoice.id) {
            Some(existing) => {
                *existing = invoice.clone();
                Ok(())
            }
            None => Err(InvoiceError::InvoiceNotFound(invoice.id.clone())),
        }
    }

    async fn delete_invoice(&mut self, invoice_id: &str) -> InvoiceResult<()> {
        if self
            .invoices
            .write()
            .map_err(poisoned)?
            .remove(invoice_id)
            .is_some()
        {
            Ok(())
        } else {
            Err(InvoiceError::InvoiceNotFound(invoice_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(number: &str) -> StoredInvoice {
        let header = InvoiceHeader {
            invoice_number: number.to_string(),
            ..Default::default()
        };
        StoredInvoice::new(RawInvoice::new(header, vec![]))
    }

    #[tokio::test]
    async fn test_len_and_clear() {
        let mut storage = MemoryStorage::new();
        assert!(storage.is_empty().unwrap());

        storage.save_invoice(&stored("INV-1")).await.unwrap();
        storage.save_invoice(&stored("INV-2")).await.unwrap();
        assert_eq!(storage.len().unwrap(), 2);

        storage.clear().unwrap();
        assert!(storage.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_a_storage_error() {
        let storage = MemoryStorage::new();
        let shared = storage.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.invoices.write().unwrap();
            panic!("writer crashed while holding the lock");
        })
        .join();

        assert!(matches!(storage.len(), Err(InvoiceError::Storage(_))));
        assert!(matches!(storage.is_empty(), Err(InvoiceError::Storage(_))));
        assert!(matches!(
            storage.get_invoice("any").await,
            Err(InvoiceError::Storage(_))
        ));
    }
}
