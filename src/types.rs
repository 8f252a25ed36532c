//! Core types and data structures for raw invoice records

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::tax::gst::GstError;
use crate::utils::parse::parse_amount_or_zero;

/// A numeric form field as it arrives from the admin form or the REST API.
///
/// Accepts JSON numbers, numeric strings, `null` or anything else. The raw
/// text is kept as-is; [`RawNumber::value`] coerces it with
/// [`parse_amount_or_zero`], so an unusable value contributes zero instead of
/// failing the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawNumber(Option<String>);

impl RawNumber {
    /// A field that was never filled in
    pub fn missing() -> Self {
        Self(None)
    }

    /// The raw text of the field, if any
    pub fn as_text(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Numeric value of the field, zero when missing or unparsable
    pub fn value(&self) -> BigDecimal {
        parse_amount_or_zero(self.as_text())
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        Self(Some(value.to_string()))
    }
}

impl From<String> for RawNumber {
    fn from(value: String) -> Self {
        Self(Some(value))
    }
}

impl From<i32> for RawNumber {
    fn from(value: i32) -> Self {
        Self(Some(value.to_string()))
    }
}

impl From<i64> for RawNumber {
    fn from(value: i64) -> Self {
        Self(Some(value.to_string()))
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        Self(Some(value.to_string()))
    }
}

impl From<&BigDecimal> for RawNumber {
    fn from(value: &BigDecimal) -> Self {
        Self(Some(value.to_string()))
    }
}

impl From<BigDecimal> for RawNumber {
    fn from(value: BigDecimal) -> Self {
        Self::from(&value)
    }
}

impl Serialize for RawNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(text) => serializer.serialize_str(text),
            None => serializer.serialize_none(),
        }
    }
}

struct RawNumberVisitor;

impl<'de> Visitor<'de> for RawNumberVisitor {
    type Value = RawNumber;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number, a numeric string or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<RawNumber, E> {
        Ok(RawNumber::from(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<RawNumber, E> {
        Ok(RawNumber::from(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<RawNumber, E> {
        Ok(RawNumber::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<RawNumber, E> {
        Ok(RawNumber(Some(value.to_string())))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<RawNumber, E> {
        Ok(RawNumber::from(value))
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<RawNumber, E> {
        Ok(RawNumber::missing())
    }

    fn visit_none<E: de::Error>(self) -> Result<RawNumber, E> {
        Ok(RawNumber::missing())
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawNumber, E> {
        Ok(RawNumber::missing())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<RawNumber, D::Error> {
        deserializer.deserialize_any(RawNumberVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawNumber, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(RawNumber::missing())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawNumber, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(RawNumber::missing())
    }
}

impl<'de> Deserialize<'de> for RawNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawNumberVisitor)
    }
}

/// Read `null` as an empty string
fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Line item as entered on the invoice form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawLineItem {
    /// Description of the service or placement
    #[serde(deserialize_with = "nullable_string")]
    pub description: String,
    /// HSN/SAC code used to group the tax summary
    #[serde(deserialize_with = "nullable_string")]
    pub hsn: String,
    /// Taxable value
    pub amount: RawNumber,
    /// CGST rate percentage
    pub cgst_rate: RawNumber,
    /// SGST rate percentage
    pub sgst_rate: RawNumber,
    /// IGST rate percentage
    pub igst_rate: RawNumber,
}

impl RawLineItem {
    /// Create a line item with an explicit amount and CGST/SGST/IGST rates
    pub fn new(
        description: impl Into<String>,
        hsn: impl Into<String>,
        amount: impl Into<RawNumber>,
        cgst_rate: impl Into<RawNumber>,
        sgst_rate: impl Into<RawNumber>,
        igst_rate: impl Into<RawNumber>,
    ) -> Self {
        Self {
            description: description.into(),
            hsn: hsn.into(),
            amount: amount.into(),
            cgst_rate: cgst_rate.into(),
            sgst_rate: sgst_rate.into(),
            igst_rate: igst_rate.into(),
        }
    }
}

/// Seller or buyer identity block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Party {
    pub name: String,
    pub address: String,
    pub gstin: String,
    pub pan: String,
    pub state_name: String,
    /// Two-digit GST state code, e.g. "27" for Maharashtra
    pub state_code: String,
    pub email: String,
    pub phone: String,
}

/// Bank account printed in the payment section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BankDetails {
    pub account_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc: String,
    pub branch: String,
}

/// Everything on an invoice except its line items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceHeader {
    pub invoice_number: String,
    /// Invoice date as entered (usually `YYYY-MM-DD`)
    pub invoice_date: String,
    /// Start of the billed service period
    pub period_from: Option<String>,
    /// End of the billed service period
    pub period_to: Option<String>,
    pub seller: Party,
    pub buyer: Party,
    pub bank: BankDetails,
    pub declaration: String,
    pub terms: String,
}

/// Raw invoice record as persisted: header plus line items, no derived data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInvoice {
    #[serde(flatten)]
    pub header: InvoiceHeader,
    #[serde(default)]
    pub items: Vec<RawLineItem>,
}

impl RawInvoice {
    /// Create a raw invoice from a header and its items
    pub fn new(header: InvoiceHeader, items: Vec<RawLineItem>) -> Self {
        Self { header, items }
    }

    /// Append a line item
    pub fn add_item(&mut self, item: RawLineItem) {
        self.items.push(item);
    }
}

/// Raw invoice together with its storage identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredInvoice {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// The persisted form data
    pub raw: RawInvoice,
    /// When the invoice was first saved
    pub created_at: NaiveDateTime,
    /// When the invoice was last saved
    pub updated_at: NaiveDateTime,
}

impl StoredInvoice {
    /// Wrap a raw invoice under a fresh identifier
    pub fn new(raw: RawInvoice) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            raw,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the raw data, keeping identity and creation time
    pub fn replace_raw(&mut self, raw: RawInvoice) {
        self.raw = raw;
        self.updated_at = chrono::Utc::now().naive_utc();
    }
}

/// Errors raised by the invoice register and its storage
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),
    #[error("Duplicate invoice number: {0}")]
    DuplicateInvoiceNumber(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Gst(#[from] GstError),
}

/// Result type for invoice operations
pub type InvoiceResult<T> = Result<T, InvoiceError>;
