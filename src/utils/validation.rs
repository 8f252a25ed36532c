//! Validation utilities for raw invoices

use crate::config::InvoiceConfig;
use crate::invoice::LineItem;
use crate::tax::summary::{summarize_by_hsn, HsnRatePolicy};
use crate::traits::*;
use crate::types::*;
use crate::utils::format::parse_invoice_date;
use bigdecimal::BigDecimal;

const GSTIN_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// GST rules cap invoice numbers at 16 characters
const MAX_INVOICE_NUMBER_LEN: usize = 16;

fn is_pan_shape(pan: &str) -> bool {
    let bytes = pan.as_bytes();
    bytes.len() == 10
        && bytes[..5].iter().all(u8::is_ascii_uppercase)
        && bytes[5..9].iter().all(u8::is_ascii_digit)
        && bytes[9].is_ascii_uppercase()
}

fn gstin_check_char(gstin: &str) -> Option<char> {
    let mut sum = 0;
    for (index, c) in gstin.chars().take(14).enumerate() {
        let value = GSTIN_ALPHABET.find(c)?;
        let product = value * if index % 2 == 0 { 1 } else { 2 };
        sum += product / 36 + product % 36;
    }
    GSTIN_ALPHABET.chars().nth((36 - sum % 36) % 36)
}

/// Validate a PAN: five letters, four digits, one letter
pub fn validate_pan(pan: &str) -> InvoiceResult<()> {
    if !is_pan_shape(pan) {
        return Err(InvoiceError::Validation(format!("Invalid PAN '{}'", pan)));
    }
    Ok(())
}

/// Validate a two-digit GST state code
pub fn validate_state_code(state_code: &str) -> InvoiceResult<()> {
    let valid = state_code.len() == 2
        && state_code.chars().all(|c| c.is_ascii_digit())
        && state_code != "00";

    if !valid {
        return Err(InvoiceError::Validation(format!(
            "Invalid state code '{}'",
            state_code
        )));
    }
    Ok(())
}

/// Validate a GSTIN: state code, embedded PAN, entity number, `Z` and check character
pub fn validate_gstin(gstin: &str) -> InvoiceResult<()> {
    let invalid = || InvoiceError::Validation(format!("Invalid GSTIN '{}'", gstin));

    if gstin.len() != 15 || !gstin.is_ascii() {
        return Err(invalid());
    }

    validate_state_code(&gstin[..2]).map_err(|_| invalid())?;

    let bytes = gstin.as_bytes();
    if !is_pan_shape(&gstin[2..12])
        || !(bytes[12].is_ascii_digit() || bytes[12].is_ascii_uppercase())
        || bytes[13] != b'Z'
    {
        return Err(invalid());
    }

    if gstin_check_char(gstin) != Some(bytes[14] as char) {
        return Err(InvoiceError::Validation(format!(
            "GSTIN '{}' has an invalid check character",
            gstin
        )));
    }

    Ok(())
}

/// Validate an HSN/SAC code: 4 to 8 digits
pub fn validate_hsn(hsn: &str) -> InvoiceResult<()> {
    let valid = (4..=8).contains(&hsn.len()) && hsn.chars().all(|c| c.is_ascii_digit());
    if !valid {
        return Err(InvoiceError::Validation(format!(
            "Invalid HSN/SAC code '{}'",
            hsn
        )));
    }
    Ok(())
}

/// Validate an invoice number: present, at most 16 characters of letters, digits, `-` and `/`
pub fn validate_invoice_number(invoice_number: &str) -> InvoiceResult<()> {
    if invoice_number.trim().is_empty() {
        return Err(InvoiceError::Validation(
            "Invoice number cannot be empty".to_string(),
        ));
    }

    if invoice_number.len() > MAX_INVOICE_NUMBER_LEN {
        return Err(InvoiceError::Validation(format!(
            "Invoice number cannot exceed {} characters",
            MAX_INVOICE_NUMBER_LEN
        )));
    }

    if !invoice_number
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '/')
    {
        return Err(InvoiceError::Validation(
            "Invoice number can only contain letters, digits, dashes and slashes".to_string(),
        ));
    }

    Ok(())
}

/// Validate a seller or buyer block. `role` names the party in error messages.
pub fn validate_party(party: &Party, role: &str, gstin_required: bool) -> InvoiceResult<()> {
    if party.name.trim().is_empty() {
        return Err(InvoiceError::Validation(format!(
            "{} name cannot be empty",
            role
        )));
    }

    if party.gstin.is_empty() {
        if gstin_required {
            return Err(InvoiceError::Validation(format!(
                "{} GSTIN is required",
                role
            )));
        }
    } else {
        validate_gstin(&party.gstin)?;

        if !party.state_code.is_empty() && !party.gstin.starts_with(&party.state_code) {
            return Err(InvoiceError::Validation(format!(
                "{} GSTIN does not belong to state code {}",
                role, party.state_code
            )));
        }
        if !party.pan.is_empty() && party.gstin[2..12] != party.pan {
            return Err(InvoiceError::Validation(format!(
                "{} PAN does not match GSTIN",
                role
            )));
        }
    }

    if !party.pan.is_empty() {
        validate_pan(&party.pan)?;
    }
    if !party.state_code.is_empty() {
        validate_state_code(&party.state_code)?;
    }

    Ok(())
}

/// Strict validator used by the admin invoice generator.
///
/// On top of the default rules it checks invoice number and date, party
/// identifiers, HSN codes, non-negative amounts, the CGST+SGST / IGST rate
/// convention and, under [`HsnRatePolicy::RejectMismatch`], that items
/// sharing an HSN code agree on rates.
pub struct StrictInvoiceValidator {
    hsn_rate_policy: HsnRatePolicy,
    missing_hsn_code: String,
}

impl StrictInvoiceValidator {
    pub fn new(config: &InvoiceConfig) -> Self {
        Self {
            hsn_rate_policy: config.hsn_rate_policy,
            missing_hsn_code: config.missing_hsn_code.clone(),
        }
    }
}

impl Default for StrictInvoiceValidator {
    fn default() -> Self {
        Self::new(&InvoiceConfig::default())
    }
}

impl InvoiceValidator for StrictInvoiceValidator {
    fn validate_invoice(&self, invoice: &RawInvoice) -> InvoiceResult<()> {
        // Basic validation
        DefaultInvoiceValidator.validate_invoice(invoice)?;

        let header = &invoice.header;
        validate_invoice_number(&header.invoice_number)?;
        if parse_invoice_date(&header.invoice_date).is_none() {
            return Err(InvoiceError::Validation(format!(
                "Invalid invoice date '{}'",
                header.invoice_date
            )));
        }

        validate_party(&header.seller, "Seller", true)?;
        validate_party(&header.buyer, "Buyer", false)?;

        let items: Vec<LineItem> = invoice.items.iter().map(LineItem::derive).collect();
        for (index, item) in items.iter().enumerate() {
            if !item.hsn.is_empty() {
                validate_hsn(&item.hsn)?;
            }
            if item.amount < BigDecimal::from(0) {
                return Err(InvoiceError::Validation(format!(
                    "Line {} has a negative amount",
                    index + 1
                )));
            }
            item.rates().validate()?;
        }

        if self.hsn_rate_policy == HsnRatePolicy::RejectMismatch {
            let summary = summarize_by_hsn(&items, &self.missing_hsn_code);
            let mismatched = summary.mismatched_codes();
            if !mismatched.is_empty() {
                return Err(InvoiceError::Validation(format!(
                    "Items sharing HSN code {} have different tax rates",
                    mismatched.join(", ")
                )));
            }
        }

        Ok(())
    }
}
