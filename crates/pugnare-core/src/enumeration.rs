//! Closed-set string enumerations used by the catalog rules.

use thiserror::Error;

/// A value that is not a member of an [`Enumeration`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{value:?} is not a valid value, must be one of {allowed:?}")]
pub struct EnumError {
    pub value: String,
    pub allowed: Vec<String>,
}

/// An ordered set of permitted values.
///
/// Membership is exact by default; [`contains_ignore_case`](Self::contains_ignore_case)
/// is the only relaxed mode. No trimming or other normalisation is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    values: Vec<String>,
}

impl Enumeration {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Permitted values in declaration order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Case-sensitive membership.
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Case-insensitive membership.
    pub fn contains_ignore_case(&self, value: &str) -> bool {
        let lower = value.to_lowercase();
        self.values.iter().any(|v| v.to_lowercase() == lower)
    }

    /// Case-sensitive membership, reporting the allowed set on failure.
    pub fn check(&self, value: &str) -> Result<(), EnumError> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(EnumError {
                value: value.to_string(),
                allowed: self.values.clone(),
            })
        }
    }
}
