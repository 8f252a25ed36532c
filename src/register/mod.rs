//! Invoice register: the admin-side store of invoices

pub mod invoices;

pub use invoices::*;
