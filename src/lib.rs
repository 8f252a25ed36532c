//! # GST Invoice Core
//!
//! Invoice computation for GST tax invoices, as used by the admin invoice
//! generator of an advertising and tender-management back-office.
//!
//! ## Features
//!
//! - **Tax derivation**: CGST/SGST/IGST per line item, invoice totals, exact decimal arithmetic
//! - **HSN summary**: per-HSN/SAC tax table with a first-seen-rate-wins policy
//! - **Amount in words**: Indian numbering (Thousand, Lakh, Crore) with paise
//! - **Lenient input**: numeric form fields never fail; unusable values count as zero
//! - **Invoice register**: raw-record storage with derivation on every read
//! - **Validation**: GSTIN, PAN, state code, HSN and rate checks at save time
//!
//! ## Quick Start
//!
//! ```rust
//! use gst_invoice_core::{derive_invoice, InvoiceHeader, RawInvoice, RawLineItem};
//! use bigdecimal::BigDecimal;
//!
//! let raw = RawInvoice::new(
//!     InvoiceHeader::default(),
//!     vec![RawLineItem::new("Station hoarding", "998363", 1000, 9, 9, 0)],
//! );
//! let invoice = derive_invoice(&raw);
//!
//! assert_eq!(invoice.grand_total, BigDecimal::from(1180));
//! assert_eq!(invoice.grand_total_in_words, "INR One Thousand One Hundred Eighty Only");
//! ```

pub mod config;
pub mod invoice;
pub mod register;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;
pub mod words;

// Re-export commonly used types
pub use config::*;
pub use invoice::*;
pub use register::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
pub use words::*;
