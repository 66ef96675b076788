//! openFDA drug label search envelope.
//!
//! Only the fields the reconciliation pass reads, plus the `openfda`
//! cross-reference block, are decoded. The label body sections (indications,
//! warnings, tables, ...) are ignored.

use serde::Deserialize;

/// Response body of `GET /drug/label.json?search=...`.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelSearchResponse {
    #[serde(default)]
    pub meta: Option<SearchMeta>,
    pub results: Vec<LabelDocument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchMeta {
    pub disclaimer: String,
    pub terms: String,
    pub license: String,
    pub last_updated: String,
    pub results: Option<ResultWindow>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ResultWindow {
    pub skip: u64,
    pub limit: u64,
    pub total: u64,
}

/// One structured product label.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabelDocument {
    /// Free-text product data element blocks. The first block starts with
    /// the product's brand name.
    pub spl_product_data_elements: Vec<String>,
    /// `YYYYMMDD`
    pub effective_time: String,
    pub set_id: String,
    pub id: String,
    pub version: String,
    pub openfda: OpenFda,
}

/// openFDA harmonised cross-references for a label.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpenFda {
    pub brand_name: Vec<String>,
    pub generic_name: Vec<String>,
    pub manufacturer_name: Vec<String>,
    pub application_number: Vec<String>,
    pub product_ndc: Vec<String>,
    pub product_type: Vec<String>,
    pub route: Vec<String>,
    pub substance_name: Vec<String>,
    pub spl_set_id: Vec<String>,
}

impl LabelDocument {
    /// First whitespace-delimited token of the first data element block.
    pub fn leading_token(&self) -> Option<&str> {
        self.spl_product_data_elements
            .first()
            .and_then(|line| line.split_whitespace().next())
    }
}
