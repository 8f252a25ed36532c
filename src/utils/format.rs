//! Display formatting for render-ready invoices

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date layouts accepted from the invoice form, tried in order
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y"];

/// Layout used when printing dates on the invoice
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Format an amount with exactly two decimals, rounding half-up
pub fn format_amount(amount: &BigDecimal) -> String {
    amount.with_scale_round(2, RoundingMode::HalfUp).to_string()
}

/// Format an amount as currency, e.g. `₹1234.50`
pub fn format_currency(amount: &BigDecimal, symbol: &str) -> String {
    format!("{}{}", symbol, format_amount(amount))
}

/// Parse a date as entered on the invoice form.
///
/// Accepts `YYYY-MM-DD`, `DD-MM-YYYY`, `DD/MM/YYYY`, `DD.MM.YYYY` and full
/// timestamps (RFC 3339 or `YYYY-MM-DDTHH:MM:SS`), which are reduced to their date.
pub fn parse_invoice_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date())
}

/// Format a form date as `DD-MM-YYYY`, falling back to the text as entered
pub fn format_invoice_date(text: &str) -> String {
    match parse_invoice_date(text) {
        Some(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        None => text.trim().to_string(),
    }
}

/// Format the billed service period, e.g. `01-04-2024 to 30-04-2024`
pub fn format_service_period(from: Option<&str>, to: Option<&str>) -> Option<String> {
    let from = from.map(str::trim).filter(|s| !s.is_empty());
    let to = to.map(str::trim).filter(|s| !s.is_empty());

    match (from, to) {
        (Some(from), Some(to)) => Some(format!(
            "{} to {}",
            format_invoice_date(from),
            format_invoice_date(to)
        )),
        (Some(single), None) | (None, Some(single)) => Some(format_invoice_date(single)),
        (None, None) => None,
    }
}
