//! Per-line tax derivation, invoice totals and amounts in words

use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::config::InvoiceConfig;
use crate::tax::gst::{GstBreakdown, GstRates};
use crate::tax::summary::{summarize_by_hsn, TaxSummary};
use crate::types::*;
use crate::utils::format::{format_currency, format_invoice_date, format_service_period};
use crate::words::amount_in_words;

/// Line item with its tax amounts worked out
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub hsn: String,
    /// Taxable value
    pub amount: BigDecimal,
    pub cgst_rate: BigDecimal,
    pub sgst_rate: BigDecimal,
    pub igst_rate: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub igst_amount: BigDecimal,
    /// Amount plus CGST, SGST and IGST, unrounded
    pub total: BigDecimal,
}

impl LineItem {
    /// Derive a line from form input. Unparsable numbers count as zero.
    pub fn derive(raw: &RawLineItem) -> Self {
        let amount = raw.amount.value();
        let rates = GstRates::new(
            raw.cgst_rate.value(),
            raw.sgst_rate.value(),
            raw.igst_rate.value(),
        );
        let breakdown = GstBreakdown::calculate(&amount, &rates);

        Self {
            description: raw.description.clone(),
            hsn: raw.hsn.clone(),
            amount,
            cgst_rate: rates.cgst_rate,
            sgst_rate: rates.sgst_rate,
            igst_rate: rates.igst_rate,
            cgst_amount: breakdown.cgst_amount,
            sgst_amount: breakdown.sgst_amount,
            igst_amount: breakdown.igst_amount,
            total: breakdown.total,
        }
    }

    pub fn rates(&self) -> GstRates {
        GstRates::new(
            self.cgst_rate.clone(),
            self.sgst_rate.clone(),
            self.igst_rate.clone(),
        )
    }

    /// CGST + SGST + IGST for this line
    pub fn total_tax(&self) -> BigDecimal {
        &self.cgst_amount + &self.sgst_amount + &self.igst_amount
    }

    /// The form input this line would be derived from
    pub fn to_raw(&self) -> RawLineItem {
        RawLineItem::new(
            self.description.clone(),
            self.hsn.clone(),
            &self.amount,
            &self.cgst_rate,
            &self.sgst_rate,
            &self.igst_rate,
        )
    }
}

/// Fully derived invoice, ready for the renderer and the PDF exporter.
///
/// Never persisted: build it from the stored [`RawInvoice`] on every read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(flatten)]
    pub header: InvoiceHeader,
    pub items: Vec<LineItem>,
    /// Sum of item amounts (taxable value)
    pub total_amount: BigDecimal,
    pub total_cgst: BigDecimal,
    pub total_sgst: BigDecimal,
    pub total_igst: BigDecimal,
    /// CGST + SGST + IGST across all items
    pub total_tax_amount: BigDecimal,
    /// Sum of item totals
    pub grand_total: BigDecimal,
    pub tax_summary: TaxSummary,
    pub grand_total_in_words: String,
    pub total_tax_in_words: String,
}

impl Invoice {
    /// Raw record this invoice derives from; re-deriving it yields the same invoice
    pub fn to_raw(&self) -> RawInvoice {
        RawInvoice::new(
            self.header.clone(),
            self.items.iter().map(LineItem::to_raw).collect(),
        )
    }

    /// Invoice date as printed, `DD-MM-YYYY` when it parses
    pub fn display_date(&self) -> String {
        format_invoice_date(&self.header.invoice_date)
    }

    /// Service period as printed, if one was entered
    pub fn display_period(&self) -> Option<String> {
        format_service_period(
            self.header.period_from.as_deref(),
            self.header.period_to.as_deref(),
        )
    }

    /// Format any of this invoice's amounts with the configured symbol
    pub fn display_amount(&self, amount: &BigDecimal, config: &InvoiceConfig) -> String {
        format_currency(amount, &config.currency_symbol)
    }
}

/// Derive an invoice with the default configuration
pub fn derive_invoice(raw: &RawInvoice) -> Invoice {
    derive_invoice_with(raw, &InvoiceConfig::default())
}

/// Derive every line, the totals, the HSN summary and the amounts in words.
///
/// Pure and total: the result depends only on `raw` and `config`, and bad
/// numeric input contributes zero rather than failing.
pub fn derive_invoice_with(raw: &RawInvoice, config: &InvoiceConfig) -> Invoice {
    let items: Vec<LineItem> = raw.items.iter().map(LineItem::derive).collect();

    let total_amount: BigDecimal = items.iter().map(|item| &item.amount).sum();
    let total_cgst: BigDecimal = items.iter().map(|item| &item.cgst_amount).sum();
    let total_sgst: BigDecimal = items.iter().map(|item| &item.sgst_amount).sum();
    let total_igst: BigDecimal = items.iter().map(|item| &item.igst_amount).sum();
    let grand_total: BigDecimal = items.iter().map(|item| &item.total).sum();
    let total_tax_amount = &total_cgst + &total_sgst + &total_igst;

    let tax_summary = summarize_by_hsn(&items, &config.missing_hsn_code);
    let grand_total_in_words = amount_in_words(&grand_total, &config.currency_code);
    let total_tax_in_words = amount_in_words(&total_tax_amount, &config.currency_code);

    tracing::debug!(
        invoice_number = %raw.header.invoice_number,
        items = items.len(),
        hsn_codes = tax_summary.len(),
        grand_total = %grand_total,
        "invoice derived"
    );

    Invoice {
        header: raw.header.clone(),
        items,
        total_amount,
        total_cgst,
        total_sgst,
        total_igst,
        total_tax_amount,
        grand_total,
        tax_summary,
        grand_total_in_words,
        total_tax_in_words,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn raw_invoice(items: Vec<RawLineItem>) -> RawInvoice {
        let header = InvoiceHeader {
            invoice_number: "ADV/2024-25/017".to_string(),
            invoice_date: "2024-04-30".to_string(),
            ..Default::default()
        };
        RawInvoice::new(header, items)
    }

    #[test]
    fn test_line_item_intra_state() {
        let item = LineItem::derive(&RawLineItem::new("Station hoarding", "998363", 1000, 9, 9, 0));

        assert_eq!(item.cgst_amount, BigDecimal::from(90));
        assert_eq!(item.sgst_amount, BigDecimal::from(90));
        assert_eq!(item.igst_amount, BigDecimal::from(0));
        assert_eq!(item.total, BigDecimal::from(1180));
        assert_eq!(item.total_tax(), BigDecimal::from(180));
    }

    #[test]
    fn test_line_item_from_strings() {
        let item = LineItem::derive(&RawLineItem::new(
            "Bus shelter panel",
            "998363",
            "2500.50",
            "",
            "",
            "18",
        ));

        assert_eq!(item.amount, BigDecimal::from_str("2500.50").unwrap());
        assert_eq!(item.igst_amount, BigDecimal::from_str("450.09").unwrap());
        assert_eq!(item.total, BigDecimal::from_str("2950.59").unwrap());
        assert_eq!(item.cgst_rate, BigDecimal::from(0));
    }

    #[test]
    fn test_unparsable_amount_is_zero() {
        let invoice = derive_invoice(&raw_invoice(vec![
            RawLineItem::new("Typo", "998363", "abc", 9, 9, 0),
            RawLineItem::new("Valid", "998363", 200, 9, 9, 0),
        ]));

        assert_eq!(invoice.items[0].amount, BigDecimal::from(0));
        assert_eq!(invoice.items[0].total, BigDecimal::from(0));
        assert_eq!(invoice.total_amount, BigDecimal::from(200));
        assert_eq!(invoice.grand_total, BigDecimal::from(236));
    }

    #[test]
    fn test_missing_fields_are_zero() {
        let item = LineItem::derive(&RawLineItem {
            description: "Blank".to_string(),
            ..Default::default()
        });
        assert_eq!(item.amount, BigDecimal::from(0));
        assert_eq!(item.total, BigDecimal::from(0));
    }

    #[test]
    fn test_invoice_totals() {
        let invoice = derive_invoice(&raw_invoice(vec![
            RawLineItem::new("Platform signage", "998363", 500, 9, 9, 0),
            RawLineItem::new("Train wrap", "998363", 700, 9, 9, 0),
            RawLineItem::new("Out-of-state display", "998365", 1000, 0, 0, 18),
        ]));

        assert_eq!(invoice.total_amount, BigDecimal::from(2200));
        assert_eq!(invoice.total_cgst, BigDecimal::from(108));
        assert_eq!(invoice.total_sgst, BigDecimal::from(108));
        assert_eq!(invoice.total_igst, BigDecimal::from(180));
        assert_eq!(invoice.total_tax_amount, BigDecimal::from(396));
        assert_eq!(invoice.grand_total, BigDecimal::from(2596));
        assert_eq!(
            invoice.grand_total_in_words,
            "INR Two Thousand Five Hundred Ninety Six Only"
        );
        assert_eq!(
            invoice.total_tax_in_words,
            "INR Three Hundred Ninety Six Only"
        );

        assert_eq!(invoice.tax_summary.len(), 2);
        assert_eq!(
            invoice.tax_summary.get("998363").unwrap().taxable_value,
            BigDecimal::from(1200)
        );
        assert_eq!(invoice.tax_summary.total_taxable_value(), invoice.total_amount);
    }

    #[test]
    fn test_item_order_preserved() {
        let invoice = derive_invoice(&raw_invoice(vec![
            RawLineItem::new("Third", "3", 3, 0, 0, 0),
            RawLineItem::new("First", "1", 1, 0, 0, 0),
            RawLineItem::new("Second", "2", 2, 0, 0, 0),
        ]));

        let descriptions: Vec<&str> = invoice
            .items
            .iter()
            .map(|item| item.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Third", "First", "Second"]);
    }

    #[test]
    fn test_empty_invoice_derives_zeros() {
        let invoice = derive_invoice(&raw_invoice(vec![]));
        assert_eq!(invoice.grand_total, BigDecimal::from(0));
        assert_eq!(invoice.grand_total_in_words, "Zero");
        assert!(invoice.tax_summary.is_empty());
    }

    #[test]
    fn test_rederive_is_identical() {
        let raw = raw_invoice(vec![
            RawLineItem::new("Hoarding", "998363", "1234.56", "9", "9", "0"),
            RawLineItem::new("Kiosk", "", 99.99, 0, 0, 12),
        ]);
        let first = derive_invoice(&raw);
        let second = derive_invoice(&first.to_raw());
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_config() {
        let config = InvoiceConfig {
            currency_code: "Rs.".to_string(),
            currency_symbol: "Rs.".to_string(),
            missing_hsn_code: "UNCLASSIFIED".to_string(),
            ..Default::default()
        };
        let invoice = derive_invoice_with(
            &raw_invoice(vec![RawLineItem::new("Misc", "", 10, 0, 0, 0)]),
            &config,
        );

        assert_eq!(invoice.grand_total_in_words, "Rs. Ten Only");
        assert!(invoice.tax_summary.get("UNCLASSIFIED").is_some());
        assert_eq!(invoice.display_amount(&invoice.grand_total, &config), "Rs.10.00");
    }

    #[test]
    fn test_display_helpers() {
        let mut raw = raw_invoice(vec![RawLineItem::new("Misc", "9983", 10, 0, 0, 0)]);
        raw.header.period_from = Some("2024-04-01".to_string());
        raw.header.period_to = Some("2024-04-30".to_string());
        let invoice = derive_invoice(&raw);

        assert_eq!(invoice.display_date(), "30-04-2024");
        assert_eq!(
            invoice.display_period(),
            Some("01-04-2024 to 30-04-2024".to_string())
        );
    }
}
