//! Per-HSN tax summary printed under the line items

use bigdecimal::BigDecimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::invoice::LineItem;
use crate::tax::gst::GstRates;

/// Code used for items whose HSN/SAC field was left empty
pub const DEFAULT_MISSING_HSN_CODE: &str = "N/A";

/// What to do when items sharing an HSN code carry different rates.
///
/// The summary always keeps the rates of the first item seen for a code and
/// sums amounts from every item. The policy only decides whether saving such
/// an invoice is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HsnRatePolicy {
    /// Accept the invoice and print the first-seen rates
    #[default]
    FirstSeenWins,
    /// Refuse to save the invoice until the rates agree
    RejectMismatch,
}

/// Policy applied when nothing else is configured
pub const DEFAULT_HSN_RATE_POLICY: HsnRatePolicy = HsnRatePolicy::FirstSeenWins;

impl FromStr for HsnRatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "first_seen_wins" => Ok(HsnRatePolicy::FirstSeenWins),
            "reject_mismatch" => Ok(HsnRatePolicy::RejectMismatch),
            other => Err(format!("unknown HSN rate policy '{}'", other)),
        }
    }
}

impl fmt::Display for HsnRatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HsnRatePolicy::FirstSeenWins => f.write_str("first_seen_wins"),
            HsnRatePolicy::RejectMismatch => f.write_str("reject_mismatch"),
        }
    }
}

/// Summary key for an item's HSN field: the code exactly as entered, or
/// `missing_hsn_code` when the field is empty
pub fn hsn_key<'a>(hsn: &'a str, missing_hsn_code: &'a str) -> &'a str {
    if hsn.is_empty() {
        missing_hsn_code
    } else {
        hsn
    }
}

/// Aggregated figures for one HSN/SAC code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HsnSummary {
    pub hsn: String,
    /// Sum of item amounts under this code
    pub taxable_value: BigDecimal,
    /// Rates of the first item seen with this code
    pub cgst_rate: BigDecimal,
    pub sgst_rate: BigDecimal,
    pub igst_rate: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub igst_amount: BigDecimal,
    /// Set when a later item with this code had different rates
    pub rate_mismatch: bool,
}

impl HsnSummary {
    fn seed(hsn: &str, item: &LineItem) -> Self {
        Self {
            hsn: hsn.to_string(),
            taxable_value: item.amount.clone(),
            cgst_rate: item.cgst_rate.clone(),
            sgst_rate: item.sgst_rate.clone(),
            igst_rate: item.igst_rate.clone(),
            cgst_amount: item.cgst_amount.clone(),
            sgst_amount: item.sgst_amount.clone(),
            igst_amount: item.igst_amount.clone(),
            rate_mismatch: false,
        }
    }

    fn absorb(&mut self, item: &LineItem) {
        if item.cgst_rate != self.cgst_rate
            || item.sgst_rate != self.sgst_rate
            || item.igst_rate != self.igst_rate
        {
            self.rate_mismatch = true;
        }

        self.taxable_value += &item.amount;
        self.cgst_amount += &item.cgst_amount;
        self.sgst_amount += &item.sgst_amount;
        self.igst_amount += &item.igst_amount;
    }

    /// Rates printed for this code
    pub fn rates(&self) -> GstRates {
        GstRates::new(
            self.cgst_rate.clone(),
            self.sgst_rate.clone(),
            self.igst_rate.clone(),
        )
    }

    /// CGST + SGST + IGST for this code
    pub fn total_tax(&self) -> BigDecimal {
        &self.cgst_amount + &self.sgst_amount + &self.igst_amount
    }
}

/// HSN summary table, one entry per distinct code in first-seen order.
///
/// Serializes as a JSON object keyed by HSN code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaxSummary {
    entries: Vec<HsnSummary>,
}

impl TaxSummary {
    /// Entry for an HSN code
    pub fn get(&self, hsn: &str) -> Option<&HsnSummary> {
        self.entries.iter().find(|entry| entry.hsn == hsn)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HsnSummary> {
        self.entries.iter()
    }

    /// HSN codes in first-seen order
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.hsn.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Codes whose items disagree on rates
    pub fn mismatched_codes(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.rate_mismatch)
            .map(|entry| entry.hsn.as_str())
            .collect()
    }

    /// Sum of taxable values across all codes
    pub fn total_taxable_value(&self) -> BigDecimal {
        self.entries.iter().map(|entry| &entry.taxable_value).sum()
    }
}

impl<'a> IntoIterator for &'a TaxSummary {
    type Item = &'a HsnSummary;
    type IntoIter = std::slice::Iter<'a, HsnSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for TaxSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.hsn, entry)?;
        }
        map.end()
    }
}

/// Group derived line items by HSN code.
///
/// Items with an empty code are grouped under `missing_hsn_code`; any other
/// code, whitespace included, is its own key. Rates are taken from the
/// first item of each code; amounts from all items are summed.
pub fn summarize_by_hsn(items: &[LineItem], missing_hsn_code: &str) -> TaxSummary {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<HsnSummary> = Vec::new();

    for item in items {
        let key = hsn_key(&item.hsn, missing_hsn_code);
        match positions.get(key) {
            Some(&index) => entries[index].absorb(item),
            None => {
                positions.insert(key.to_string(), entries.len());
                entries.push(HsnSummary::seed(key, item));
            }
        }
    }

    TaxSummary { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawLineItem;

    fn item(hsn: &str, amount: i64, cgst: i64, sgst: i64, igst: i64) -> LineItem {
        LineItem::derive(&RawLineItem::new("Hoarding", hsn, amount, cgst, sgst, igst))
    }

    #[test]
    fn test_same_hsn_accumulates() {
        let items = vec![item("998363", 500, 9, 9, 0), item("998363", 700, 9, 9, 0)];
        let summary = summarize_by_hsn(&items, DEFAULT_MISSING_HSN_CODE);

        assert_eq!(summary.len(), 1);
        let entry = summary.get("998363").unwrap();
        assert_eq!(entry.taxable_value, BigDecimal::from(1200));
        assert_eq!(entry.cgst_amount, BigDecimal::from(108));
        assert_eq!(entry.sgst_amount, BigDecimal::from(108));
        assert_eq!(entry.total_tax(), BigDecimal::from(216));
        assert!(!entry.rate_mismatch);
    }

    #[test]
    fn test_first_seen_rate_wins() {
        let items = vec![item("998363", 1000, 9, 9, 0), item("998363", 1000, 0, 0, 18)];
        let summary = summarize_by_hsn(&items, DEFAULT_MISSING_HSN_CODE);

        let entry = summary.get("998363").unwrap();
        assert_eq!(entry.cgst_rate, BigDecimal::from(9));
        assert_eq!(entry.igst_rate, BigDecimal::from(0));
        assert_eq!(entry.igst_amount, BigDecimal::from(180));
        assert_eq!(entry.taxable_value, BigDecimal::from(2000));
        assert!(entry.rate_mismatch);
        assert_eq!(summary.mismatched_codes(), vec!["998363"]);
    }

    #[test]
    fn test_empty_hsn_uses_missing_code() {
        let items = vec![item("", 100, 9, 9, 0), item("", 50, 9, 9, 0), item("9983", 10, 0, 0, 18)];
        let summary = summarize_by_hsn(&items, DEFAULT_MISSING_HSN_CODE);

        assert_eq!(summary.codes().collect::<Vec<_>>(), vec!["N/A", "9983"]);
        assert_eq!(
            summary.get("N/A").unwrap().taxable_value,
            BigDecimal::from(150)
        );
        assert_eq!(summary.total_taxable_value(), BigDecimal::from(160));
    }

    #[test]
    fn test_keys_match_item_hsn_exactly() {
        let items = vec![
            item("998363", 100, 9, 9, 0),
            item("998363 ", 200, 9, 9, 0),
            item("  ", 50, 9, 9, 0),
            item("", 10, 9, 9, 0),
        ];
        let summary = summarize_by_hsn(&items, DEFAULT_MISSING_HSN_CODE);

        assert_eq!(
            summary.codes().collect::<Vec<_>>(),
            vec!["998363", "998363 ", "  ", "N/A"]
        );
        assert_eq!(
            summary.get("998363").unwrap().taxable_value,
            BigDecimal::from(100)
        );
        assert_eq!(
            summary.get("998363 ").unwrap().taxable_value,
            BigDecimal::from(200)
        );
        assert_eq!(summary.get("  ").unwrap().taxable_value, BigDecimal::from(50));
        assert_eq!(summary.get("N/A").unwrap().taxable_value, BigDecimal::from(10));

        for line in &items {
            assert!(summary.get(hsn_key(&line.hsn, DEFAULT_MISSING_HSN_CODE)).is_some());
        }
    }

    #[test]
    fn test_insertion_order_preserved() {
        let items = vec![
            item("998366", 1, 9, 9, 0),
            item("998361", 1, 9, 9, 0),
            item("998366", 1, 9, 9, 0),
            item("998363", 1, 9, 9, 0),
        ];
        let summary = summarize_by_hsn(&items, "NONE");

        assert_eq!(
            summary.codes().collect::<Vec<_>>(),
            vec!["998366", "998361", "998363"]
        );
    }

    #[test]
    fn test_empty_items() {
        let summary = summarize_by_hsn(&[], DEFAULT_MISSING_HSN_CODE);
        assert!(summary.is_empty());
        assert_eq!(summary.total_taxable_value(), BigDecimal::from(0));
    }

    #[test]
    fn test_rate_policy_parsing() {
        assert_eq!(
            "reject-mismatch".parse::<HsnRatePolicy>(),
            Ok(HsnRatePolicy::RejectMismatch)
        );
        assert_eq!(
            " FIRST_SEEN_WINS ".parse::<HsnRatePolicy>(),
            Ok(HsnRatePolicy::FirstSeenWins)
        );
        assert!("strict".parse::<HsnRatePolicy>().is_err());
        assert_eq!(HsnRatePolicy::default(), DEFAULT_HSN_RATE_POLICY);
    }
}
