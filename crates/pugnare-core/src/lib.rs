//! Catalog model and integrity rules for the Pugnare medication catalog.

pub mod enumeration;
pub mod product;
pub mod rules;
pub mod validate;

pub use enumeration::{EnumError, Enumeration};
pub use product::{Eligibility, Product, SavingsProgram, parse_recorded_date};
pub use rules::CatalogRules;
pub use validate::{ValidationError, Validator};
