//! Catalog-wide configuration: the closed value sets and label constraints.

use crate::enumeration::Enumeration;

/// Every label PDF must live under this path.
pub const FDA_LABEL_REPOSITORY: &str = "https://www.accessdata.fda.gov/drugsatfda_docs/label/";

pub const MEDICINE_TYPES: &[&str] = &[
    "Insulin",
    "GLP-1 Receptor Agonist",
    "GIP/GLP-1 Receptor Agonist",
    "SGLT2 Inhibitor",
    "DPP-4 Inhibitor",
    "Glucagon",
    "Continuous Glucose Monitor",
    "Insulin Pump",
];

pub const ADMINISTRATION_ROUTES: &[&str] = &[
    "Injection Pen",
    "Vial",
    "Auto-Injector",
    "Oral",
    "Nasal",
    "Inhaled",
    "Automatic Applicator",
    "Tubeless Insulin Pump",
];

pub const SAVINGS_CATEGORIES: &[&str] = &[
    "Copay Card",
    "Patient Assistance Program",
    "Manufacturer Discount",
    "Cash Price Cap",
    "Pharmacy Discount Card",
];

/// Routes for devices that have no FDA drug label to reconcile against.
pub const DEVICE_ROUTES: &[&str] = &["Automatic Applicator", "Tubeless Insulin Pump"];

/// Immutable rule set handed to the validator and the reconciliation pass.
#[derive(Debug, Clone)]
pub struct CatalogRules {
    pub medicine_types: Enumeration,
    pub administration_routes: Enumeration,
    pub savings_categories: Enumeration,
    pub device_routes: Enumeration,
    pub label_repository: String,
}

impl Default for CatalogRules {
    fn default() -> Self {
        Self {
            medicine_types: Enumeration::new(MEDICINE_TYPES.iter().copied()),
            administration_routes: Enumeration::new(ADMINISTRATION_ROUTES.iter().copied()),
            savings_categories: Enumeration::new(SAVINGS_CATEGORIES.iter().copied()),
            device_routes: Enumeration::new(DEVICE_ROUTES.iter().copied()),
            label_repository: FDA_LABEL_REPOSITORY.to_string(),
        }
    }
}

impl CatalogRules {
    /// Whether products on this route carry an FDA drug label.
    pub fn has_drug_label(&self, administration_route: &str) -> bool {
        !self.device_routes.contains(administration_route)
    }
}
