//! Catalog records as curated on disk and consumed by the reconciliation pass.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Format of the locally recorded label-updated date.
pub const RECORDED_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a recorded label-updated date (`YYYY-MM-DD`).
pub fn parse_recorded_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, RECORDED_DATE_FORMAT)
}

/// One pharmaceutical product or device in the catalog.
///
/// Only `fda_label_needs_update` is ever written after loading, and only by
/// the reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub ingredient_name: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub medicine_type: String,
    #[serde(default)]
    pub administration_route: String,
    #[serde(default)]
    pub dose_frequency: String,
    #[serde(default)]
    pub savings: Vec<SavingsProgram>,
    /// Link to the label PDF in the FDA label repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fda_label_source: Option<String>,
    /// `YYYY-MM-DD` as recorded by the curator.
    #[serde(default)]
    pub fda_label_updated: String,
    #[serde(default)]
    pub fda_label_needs_update: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

impl Product {
    /// Name used in logs and error messages: the brand, or the ingredient
    /// when no brand is recorded.
    pub fn display_name(&self) -> &str {
        if self.brand_name.is_empty() {
            &self.ingredient_name
        } else {
            &self.brand_name
        }
    }

    pub fn label_updated(&self) -> Result<NaiveDate, chrono::ParseError> {
        parse_recorded_date(&self.fda_label_updated)
    }
}

/// A savings or assistance program offered for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsProgram {
    pub category: String,
    pub description: String,
    /// `1-DDD-DDD-DDDD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<Eligibility>,
}

/// Who can use a savings program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Eligibility {
    pub commercial_insurance_required: bool,
    pub government_insurance_excluded: bool,
    pub income_limit: bool,
    pub us_residency_required: bool,
    /// Free-text conditions shown alongside the flags.
    pub notes: Vec<String>,
}
