//! FDA label recency: paced openFDA searches, brand matching, and catalog reconciliation.

pub mod cancel;
pub mod client;
mod error;
pub mod label;
pub mod limiter;
pub mod matcher;
pub mod reconcile;

pub use cancel::{CancelHandle, CancelToken, cancellation};
pub use client::{FdaLabelClient, LabelSearch, LabelSource, LookupConfig};
pub use error::LookupError;
pub use label::LabelDocument;
pub use reconcile::{LookupResult, ReconcileError, ReconcileReport, Reconciler, lookup_latest};
