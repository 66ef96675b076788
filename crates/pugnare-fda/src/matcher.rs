//! Picks the label documents that really describe a brand.
//!
//! The openFDA search is a keyword search, so a query for "Ozempic" also
//! returns labels that merely mention Ozempic. A document is accepted only
//! when the first token of its first product data element equals the brand
//! name, ignoring case.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::LookupError;
use crate::label::LabelDocument;

/// Format of openFDA `effective_time`.
pub const EFFECTIVE_TIME_FORMAT: &str = "%Y%m%d";

/// Parse a strict 8-digit `YYYYMMDD` effective date.
pub fn parse_effective_time(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(value, EFFECTIVE_TIME_FORMAT).ok()
}

/// Whether `doc` is a label for `brand`.
pub fn describes_brand(doc: &LabelDocument, brand: &str) -> bool {
    doc.leading_token()
        .is_some_and(|token| token.to_lowercase() == brand.to_lowercase())
}

/// Most recent effective date among the documents describing `brand`.
///
/// Returns `Ok(None)` when no document matches. A matching document with a
/// malformed effective date fails the whole lookup.
pub fn latest_matching_date(
    brand: &str,
    documents: &[LabelDocument],
) -> Result<Option<NaiveDate>, LookupError> {
    let mut latest: Option<NaiveDate> = None;

    for doc in documents {
        if doc.spl_product_data_elements.is_empty() {
            warn!(
                brand,
                set_id = %doc.set_id,
                "skipping FDA label with empty spl_product_data_elements"
            );
            continue;
        }
        if !describes_brand(doc, brand) {
            debug!(brand, token = ?doc.leading_token(), "not a match");
            continue;
        }

        let effective =
            parse_effective_time(&doc.effective_time).ok_or_else(|| LookupError::EffectiveTime {
                brand: brand.to_string(),
                value: doc.effective_time.clone(),
            })?;
        if latest.is_none_or(|current| effective > current) {
            latest = Some(effective);
        }
    }

    Ok(latest)
}
