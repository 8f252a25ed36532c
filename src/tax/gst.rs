//! GST (Goods and Services Tax) rates and per-line tax breakdown

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// CGST/SGST/IGST percentages applied to one line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstRates {
    /// CGST rate percentage (Central GST)
    pub cgst_rate: BigDecimal,
    /// SGST rate percentage (State GST)
    pub sgst_rate: BigDecimal,
    /// IGST rate percentage (Integrated GST)
    pub igst_rate: BigDecimal,
}

impl GstRates {
    pub fn new(cgst_rate: BigDecimal, sgst_rate: BigDecimal, igst_rate: BigDecimal) -> Self {
        Self {
            cgst_rate,
            sgst_rate,
            igst_rate,
        }
    }

    /// Intra-state supply: the total rate is split evenly into CGST and SGST
    pub fn intra_state(total_rate: BigDecimal) -> Self {
        let half_rate = &total_rate / BigDecimal::from(2);
        Self {
            cgst_rate: half_rate.clone(),
            sgst_rate: half_rate,
            igst_rate: BigDecimal::from(0),
        }
    }

    /// Inter-state supply: the whole rate is IGST
    pub fn inter_state(total_rate: BigDecimal) -> Self {
        Self {
            cgst_rate: BigDecimal::from(0),
            sgst_rate: BigDecimal::from(0),
            igst_rate: total_rate,
        }
    }

    /// Combined rate of all three components
    pub fn total_rate(&self) -> BigDecimal {
        &self.cgst_rate + &self.sgst_rate + &self.igst_rate
    }

    /// Check the rates follow the usual CGST+SGST or IGST-only convention.
    ///
    /// Derivation never calls this; it is applied by the strict validator
    /// when an invoice is saved.
    pub fn validate(&self) -> Result<(), GstError> {
        let zero = BigDecimal::from(0);

        if self.cgst_rate < zero || self.sgst_rate < zero || self.igst_rate < zero {
            return Err(GstError::InvalidRate(format!(
                "GST rates cannot be negative: CGST {}, SGST {}, IGST {}",
                self.cgst_rate, self.sgst_rate, self.igst_rate
            )));
        }

        // For intra-state transactions, CGST and SGST should be equal
        if self.igst_rate == zero && self.cgst_rate != self.sgst_rate {
            return Err(GstError::InvalidRate(
                "CGST and SGST rates must be equal for intra-state transactions".to_string(),
            ));
        }

        // For inter-state transactions, only IGST should be non-zero
        if self.igst_rate > zero && (self.cgst_rate > zero || self.sgst_rate > zero) {
            return Err(GstError::InvalidRate(
                "Only IGST should be applicable for inter-state transactions".to_string(),
            ));
        }

        Ok(())
    }
}

/// Tax amounts for one taxable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstBreakdown {
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub igst_amount: BigDecimal,
    /// CGST + SGST + IGST
    pub total_tax: BigDecimal,
    /// Taxable value plus all tax
    pub total: BigDecimal,
}

impl GstBreakdown {
    /// Compute `amount * rate / 100` for each component. No rounding is applied.
    pub fn calculate(taxable_value: &BigDecimal, rates: &GstRates) -> Self {
        let cgst_amount = (taxable_value * &rates.cgst_rate) / BigDecimal::from(100);
        let sgst_amount = (taxable_value * &rates.sgst_rate) / BigDecimal::from(100);
        let igst_amount = (taxable_value * &rates.igst_rate) / BigDecimal::from(100);

        let total_tax = &cgst_amount + &sgst_amount + &igst_amount;
        let total = taxable_value + &total_tax;

        Self {
            cgst_amount,
            sgst_amount,
            igst_amount,
            total_tax,
            total,
        }
    }
}

/// Standard GST slabs offered as presets on the invoice form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstCategory {
    /// Exempt / nil-rated - 0%
    Essential,
    /// 5%
    Reduced,
    /// 12%
    Standard,
    /// 18%, the slab for advertising services
    Higher,
    /// 28%
    Luxury,
}

impl GstCategory {
    /// Get the standard GST rate for this category
    pub fn rate(&self) -> BigDecimal {
        match self {
            GstCategory::Essential => BigDecimal::from(0),
            GstCategory::Reduced => BigDecimal::from(5),
            GstCategory::Standard => BigDecimal::from(12),
            GstCategory::Higher => BigDecimal::from(18),
            GstCategory::Luxury => BigDecimal::from(28),
        }
    }

    pub fn intra_state_rates(&self) -> GstRates {
        GstRates::intra_state(self.rate())
    }

    pub fn inter_state_rates(&self) -> GstRates {
        GstRates::inter_state(self.rate())
    }
}

/// GST-related errors
#[derive(Debug, thiserror::Error)]
pub enum GstError {
    #[error("Invalid GST rate: {0}")]
    InvalidRate(String),
}
