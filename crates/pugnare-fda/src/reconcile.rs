//! Reconciles recorded label dates in the catalog against openFDA.
//!
//! A pass runs in three steps:
//!
//! 1. drop products on device routes, which have no drug label
//! 2. search once per remaining brand, in catalog order, through the paced
//!    [`LabelSource`]
//! 3. flag every product whose newest matching label is strictly newer than
//!    its recorded `fda_label_updated` date
//!
//! Any failure aborts the pass. Flags already set stay set.

use std::collections::HashMap;

use chrono::NaiveDate;
use pugnare_core::{CatalogRules, Product};
use thiserror::Error;
use tracing::info;

use crate::LookupError;
use crate::cancel::CancelToken;
use crate::client::LabelSource;
use crate::matcher::latest_matching_date;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("error looking up FDA label recency: {0}")]
    Lookup(#[from] LookupError),

    #[error("error parsing recorded fda_label_updated {value:?} for {brand}: {source}")]
    RecordedDate {
        brand: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Newest matching label date per brand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupResult {
    dates: HashMap<String, NaiveDate>,
}

impl LookupResult {
    pub fn get(&self, brand: &str) -> Option<NaiveDate> {
        self.dates.get(brand).copied()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Search and match every brand in order.
///
/// Duplicate brands are searched again. Stops at the first brand that fails
/// to search or has no matching label.
pub async fn lookup_latest<S>(
    source: &S,
    brands: &[String],
    cancel: &CancelToken,
) -> Result<LookupResult, LookupError>
where
    S: LabelSource + ?Sized,
{
    let dates = resolve_each(source, brands, cancel).await?;
    Ok(LookupResult {
        dates: brands.iter().cloned().zip(dates).collect(),
    })
}

/// Newest matching label date for each brand, in the order given.
async fn resolve_each<S>(
    source: &S,
    brands: &[String],
    cancel: &CancelToken,
) -> Result<Vec<NaiveDate>, LookupError>
where
    S: LabelSource + ?Sized,
{
    let gaps = u32::try_from(brands.len().saturating_sub(1)).unwrap_or(u32::MAX);
    let pacing = source.interval().saturating_mul(gaps);
    info!(
        brands = brands.len(),
        pacing_secs = pacing.as_secs_f64(),
        "starting FDA label recency lookup"
    );

    let mut dates = Vec::with_capacity(brands.len());
    for brand in brands {
        let search = source.search(brand, cancel).await?;
        let latest = latest_matching_date(brand, &search.documents)?.ok_or_else(|| {
            LookupError::UnmatchedBrand {
                brand: brand.clone(),
                url: search.url.clone(),
            }
        })?;
        info!(brand = %brand, effective = %latest, "resolved latest FDA label");
        dates.push(latest);
    }
    Ok(dates)
}

/// What a reconciliation pass did.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// Brands searched, in catalog order.
    pub looked_up: Vec<String>,
    /// Products skipped as devices.
    pub skipped: Vec<String>,
    /// Brands newly flagged as needing a label update.
    pub flagged: Vec<String>,
}

/// Drives a reconciliation pass over a catalog.
pub struct Reconciler<S> {
    source: S,
    rules: CatalogRules,
}

impl<S: LabelSource> Reconciler<S> {
    pub fn new(source: S, rules: CatalogRules) -> Self {
        Self { source, rules }
    }

    /// Brands that take part in the lookup, in catalog order.
    pub fn eligible_brands(&self, products: &[Product]) -> Vec<String> {
        products
            .iter()
            .filter(|p| self.rules.has_drug_label(&p.administration_route))
            .map(|p| p.brand_name.clone())
            .collect()
    }

    /// Run the pass, setting `fda_label_needs_update` in place.
    pub async fn reconcile(
        &self,
        products: &mut [Product],
        cancel: &CancelToken,
    ) -> Result<ReconcileReport, ReconcileError> {
        let mut report = ReconcileReport::default();
        for p in products.iter() {
            if !self.rules.has_drug_label(&p.administration_route) {
                info!(
                    brand = %p.display_name(),
                    route = %p.administration_route,
                    "skipping label update for device"
                );
                report.skipped.push(p.display_name().to_string());
            }
        }

        let brands = self.eligible_brands(products);
        let latest = resolve_each(&self.source, &brands, cancel).await?;
        report.looked_up = brands;

        let eligible = products
            .iter_mut()
            .filter(|p| self.rules.has_drug_label(&p.administration_route));
        for (p, resolved) in eligible.zip(latest) {
            let recorded = p
                .label_updated()
                .map_err(|source| ReconcileError::RecordedDate {
                    brand: p.brand_name.clone(),
                    value: p.fda_label_updated.clone(),
                    source,
                })?;

            if resolved > recorded {
                info!(
                    brand = %p.brand_name,
                    recorded = %recorded,
                    effective = %resolved,
                    "FDA label updated since last recorded date"
                );
                p.fda_label_needs_update = true;
                report.flagged.push(p.brand_name.clone());
            }
        }

        info!(
            looked_up = report.looked_up.len(),
            skipped = report.skipped.len(),
            flagged = report.flagged.len(),
            "FDA label reconciliation complete"
        );
        Ok(report)
    }
}
