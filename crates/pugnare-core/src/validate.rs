//! Catalog integrity rules, checked before anything is published.
//!
//! Rules run in a fixed order and the first violation is returned:
//!
//! 1. brand name, ingredient name and dose frequency are non-empty, and the
//!    product lists at least one savings program
//! 2. medicine type and administration route are members of their sets
//! 3. each savings program has a description, a well-formed phone and URL
//!    when present, and a known category
//! 4. when a label source is recorded: the recorded date is a real
//!    `YYYY-MM-DD` date not in the future, and the source is an absolute URL
//!    to a PDF inside the FDA label repository

use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::enumeration::EnumError;
use crate::product::{Product, SavingsProgram, parse_recorded_date};
use crate::rules::CatalogRules;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^1-[0-9]{3}-[0-9]{3}-[0-9]{4}$").expect("phone pattern compiles")
});

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{product}: {field} must not be empty")]
    MissingField {
        product: String,
        field: &'static str,
    },

    #[error("{product}: at least one savings program is required")]
    NoSavings { product: String },

    #[error("{product}: invalid {field}: {source}")]
    InvalidEnum {
        product: String,
        field: String,
        #[source]
        source: EnumError,
    },

    #[error("{product}: savings[{index}].description must not be empty")]
    SavingsDescription { product: String, index: usize },

    #[error("{product}: savings[{index}].phone {phone:?} does not match 1-DDD-DDD-DDDD")]
    SavingsPhone {
        product: String,
        index: usize,
        phone: String,
    },

    #[error("{product}: savings[{index}].url {url:?} must start with http:// or https://")]
    SavingsUrl {
        product: String,
        index: usize,
        url: String,
    },

    #[error("{product}: fda_label_updated {value:?} is not a YYYY-MM-DD date: {source}")]
    LabelDate {
        product: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("{product}: fda_label_updated {date} is in the future (today is {today})")]
    LabelDateInFuture {
        product: String,
        date: NaiveDate,
        today: NaiveDate,
    },

    #[error("{product}: fda_label_source {url:?} is not under {repository}")]
    LabelRepository {
        product: String,
        url: String,
        repository: String,
    },

    #[error("{product}: fda_label_source {url:?} is not a valid URL: {source}")]
    LabelUrl {
        product: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{product}: fda_label_source {url:?} does not point to a PDF")]
    LabelNotPdf { product: String, url: String },
}

/// Applies [`CatalogRules`] to products.
pub struct Validator {
    rules: CatalogRules,
}

impl Validator {
    pub fn new(rules: CatalogRules) -> Self {
        Self { rules }
    }

    /// Validate one product against today's local date.
    pub fn validate(&self, product: &Product) -> Result<(), ValidationError> {
        self.validate_on(product, Local::now().date_naive())
    }

    /// Validate one product, treating `today` as the current date.
    pub fn validate_on(&self, product: &Product, today: NaiveDate) -> Result<(), ValidationError> {
        let name = product.display_name();
        debug!(product = %name, "validating");

        self.check_required(product, name)?;
        self.check_categories(product, name)?;
        for (index, program) in product.savings.iter().enumerate() {
            self.check_savings(program, index, name)?;
        }
        if let Some(source) = &product.fda_label_source {
            self.check_label(product, source, today, name)?;
        }
        Ok(())
    }

    /// Validate every product in order, stopping at the first violation.
    pub fn validate_catalog(&self, products: &[Product]) -> Result<(), ValidationError> {
        let today = Local::now().date_naive();
        for product in products {
            self.validate_on(product, today)?;
        }
        info!(count = products.len(), "catalog validated");
        Ok(())
    }

    fn check_required(&self, product: &Product, name: &str) -> Result<(), ValidationError> {
        let required = [
            ("brand_name", &product.brand_name),
            ("ingredient_name", &product.ingredient_name),
            ("dose_frequency", &product.dose_frequency),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ValidationError::MissingField {
                    product: name.to_string(),
                    field,
                });
            }
        }
        if product.savings.is_empty() {
            return Err(ValidationError::NoSavings {
                product: name.to_string(),
            });
        }
        Ok(())
    }

    fn check_categories(&self, product: &Product, name: &str) -> Result<(), ValidationError> {
        self.rules
            .medicine_types
            .check(&product.medicine_type)
            .map_err(|source| invalid_enum(name, "medicine_type", source))?;
        self.rules
            .administration_routes
            .check(&product.administration_route)
            .map_err(|source| invalid_enum(name, "administration_route", source))?;
        Ok(())
    }

    fn check_savings(
        &self,
        program: &SavingsProgram,
        index: usize,
        name: &str,
    ) -> Result<(), ValidationError> {
        if program.description.is_empty() {
            return Err(ValidationError::SavingsDescription {
                product: name.to_string(),
                index,
            });
        }
        if let Some(phone) = &program.phone
            && !PHONE_RE.is_match(phone)
        {
            return Err(ValidationError::SavingsPhone {
                product: name.to_string(),
                index,
                phone: phone.clone(),
            });
        }
        if let Some(url) = &program.url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ValidationError::SavingsUrl {
                product: name.to_string(),
                index,
                url: url.clone(),
            });
        }
        self.rules
            .savings_categories
            .check(&program.category)
            .map_err(|source| invalid_enum(name, &format!("savings[{index}].category"), source))
    }

    fn check_label(
        &self,
        product: &Product,
        source: &str,
        today: NaiveDate,
        name: &str,
    ) -> Result<(), ValidationError> {
        let date = parse_recorded_date(&product.fda_label_updated).map_err(|e| {
            ValidationError::LabelDate {
                product: name.to_string(),
                value: product.fda_label_updated.clone(),
                source: e,
            }
        })?;
        if date > today {
            return Err(ValidationError::LabelDateInFuture {
                product: name.to_string(),
                date,
                today,
            });
        }

        if !source.starts_with(&self.rules.label_repository) {
            return Err(ValidationError::LabelRepository {
                product: name.to_string(),
                url: source.to_string(),
                repository: self.rules.label_repository.clone(),
            });
        }

        let parsed = Url::parse(source).map_err(|e| ValidationError::LabelUrl {
            product: name.to_string(),
            url: source.to_string(),
            source: e,
        })?;
        if !parsed.path().to_ascii_lowercase().ends_with(".pdf") {
            return Err(ValidationError::LabelNotPdf {
                product: name.to_string(),
                url: source.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(CatalogRules::default())
    }
}

fn invalid_enum(product: &str, field: &str, source: EnumError) -> ValidationError {
    ValidationError::InvalidEnum {
        product: product.to_string(),
        field: field.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Eligibility;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn mounjaro() -> Product {
        Product {
            ingredient_name: "tirzepatide".into(),
            brand_name: "Mounjaro".into(),
            medicine_type: "GIP/GLP-1 Receptor Agonist".into(),
            administration_route: "Injection Pen".into(),
            dose_frequency: "Once weekly".into(),
            savings: vec![SavingsProgram {
                category: "Copay Card".into(),
                description: "Pay as little as $25 for a 1-month supply".into(),
                phone: Some("1-844-807-6576".into()),
                url: Some("https://www.mounjaro.com/savings-resources".into()),
                eligibility: Some(Eligibility {
                    commercial_insurance_required: true,
                    ..Default::default()
                }),
            }],
            fda_label_source: Some(
                "https://www.accessdata.fda.gov/drugsatfda_docs/label/2025/215866s025lbl.pdf"
                    .into(),
            ),
            fda_label_updated: "2025-03-14".into(),
            fda_label_needs_update: false,
            display_order: None,
        }
    }

    fn check(p: &Product) -> Result<(), ValidationError> {
        Validator::default().validate_on(p, today())
    }

    #[test]
    fn valid_product_passes() {
        check(&mounjaro()).unwrap();
    }

    #[test]
    fn missing_brand_name() {
        let mut p = mounjaro();
        p.brand_name.clear();
        let err = check(&p).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingField { field: "brand_name", .. }
        ));
        // Falls back to the ingredient for identification.
        assert!(err.to_string().starts_with("tirzepatide:"));
    }

    #[test]
    fn missing_dose_frequency() {
        let mut p = mounjaro();
        p.dose_frequency.clear();
        assert!(matches!(
            check(&p),
            Err(ValidationError::MissingField { field: "dose_frequency", .. })
        ));
    }

    #[test]
    fn empty_savings() {
        let mut p = mounjaro();
        p.savings.clear();
        assert!(matches!(check(&p), Err(ValidationError::NoSavings { .. })));
    }

    #[test]
    fn unknown_medicine_type_names_allowed_set() {
        let mut p = mounjaro();
        p.medicine_type = "Ketchup".into();
        let err = check(&p).unwrap_err();
        match &err {
            ValidationError::InvalidEnum { field, source, .. } => {
                assert_eq!(field, "medicine_type");
                assert_eq!(source.value, "Ketchup");
                assert!(source.allowed.iter().any(|v| v == "Insulin"));
            }
            other => panic!("expected InvalidEnum, got {other:?}"),
        }
        assert!(err.to_string().contains("Ketchup"));
    }

    #[test]
    fn route_check_is_case_sensitive() {
        let mut p = mounjaro();
        p.administration_route = "injection pen".into();
        assert!(matches!(
            check(&p),
            Err(ValidationError::InvalidEnum { ref field, .. }) if field == "administration_route"
        ));
    }

    #[test]
    fn bad_phone_format() {
        let mut p = mounjaro();
        p.savings[0].phone = Some("555-1234".into());
        match check(&p).unwrap_err() {
            ValidationError::SavingsPhone { index, phone, .. } => {
                assert_eq!(index, 0);
                assert_eq!(phone, "555-1234");
            }
            other => panic!("expected SavingsPhone, got {other:?}"),
        }
    }

    #[test]
    fn phone_with_trailing_text_rejected() {
        let mut p = mounjaro();
        p.savings[0].phone = Some("1-844-807-6576 ext 2".into());
        assert!(matches!(check(&p), Err(ValidationError::SavingsPhone { .. })));
    }

    #[test]
    fn phone_digits_must_be_ascii() {
        let mut p = mounjaro();
        p.savings[0].phone = Some("1-٨٠٠-٥٥٥-١٢٣٤".into());
        assert!(matches!(check(&p), Err(ValidationError::SavingsPhone { .. })));
        p.savings[0].phone = Some("1-８００-５５５-１２３４".into());
        assert!(matches!(check(&p), Err(ValidationError::SavingsPhone { .. })));
    }

    #[test]
    fn savings_url_needs_http_scheme() {
        let mut p = mounjaro();
        p.savings[0].url = Some("www.mounjaro.com".into());
        assert!(matches!(check(&p), Err(ValidationError::SavingsUrl { .. })));
        p.savings[0].url = Some("http://www.mounjaro.com".into());
        check(&p).unwrap();
    }

    #[test]
    fn optional_savings_fields_may_be_absent() {
        let mut p = mounjaro();
        p.savings[0].phone = None;
        p.savings[0].url = None;
        p.savings[0].eligibility = None;
        check(&p).unwrap();
    }

    #[test]
    fn empty_savings_description() {
        let mut p = mounjaro();
        p.savings.push(SavingsProgram {
            category: "Patient Assistance Program".into(),
            description: String::new(),
            phone: None,
            url: None,
            eligibility: None,
        });
        assert!(matches!(
            check(&p),
            Err(ValidationError::SavingsDescription { index: 1, .. })
        ));
    }

    #[test]
    fn unknown_savings_category() {
        let mut p = mounjaro();
        p.savings[0].category = "Coupon".into();
        assert!(matches!(
            check(&p),
            Err(ValidationError::InvalidEnum { ref field, .. }) if field == "savings[0].category"
        ));
    }

    #[test]
    fn label_outside_repository_rejected_even_if_pdf() {
        let mut p = mounjaro();
        p.fda_label_source = Some("https://example.com/label.pdf".into());
        assert!(matches!(
            check(&p),
            Err(ValidationError::LabelRepository { .. })
        ));
    }

    #[test]
    fn label_must_be_pdf() {
        let mut p = mounjaro();
        p.fda_label_source =
            Some("https://www.accessdata.fda.gov/drugsatfda_docs/label/2025/215866.html".into());
        assert!(matches!(check(&p), Err(ValidationError::LabelNotPdf { .. })));
    }

    #[test]
    fn label_pdf_suffix_is_case_insensitive() {
        let mut p = mounjaro();
        p.fda_label_source =
            Some("https://www.accessdata.fda.gov/drugsatfda_docs/label/2025/215866LBL.PDF".into());
        check(&p).unwrap();
    }

    #[test]
    fn label_pdf_suffix_ignores_query_string() {
        let mut p = mounjaro();
        p.fda_label_source = Some(
            "https://www.accessdata.fda.gov/drugsatfda_docs/label/2025/download?f=x.pdf".into(),
        );
        assert!(matches!(check(&p), Err(ValidationError::LabelNotPdf { .. })));
    }

    #[test]
    fn malformed_label_url() {
        // The prefix check passes, the port does not.
        let mut rules = CatalogRules::default();
        rules.label_repository = "https://labels.example:99999/".into();
        let mut p = mounjaro();
        p.fda_label_source = Some("https://labels.example:99999/a.pdf".into());
        assert!(matches!(
            Validator::new(rules).validate_on(&p, today()),
            Err(ValidationError::LabelUrl { .. })
        ));
    }

    #[test]
    fn label_date_must_parse() {
        let mut p = mounjaro();
        p.fda_label_updated = "03/14/2025".into();
        assert!(matches!(check(&p), Err(ValidationError::LabelDate { .. })));
    }

    #[test]
    fn label_date_in_future() {
        let mut p = mounjaro();
        p.fda_label_updated = "2025-06-02".into();
        assert!(matches!(
            check(&p),
            Err(ValidationError::LabelDateInFuture { .. })
        ));
        p.fda_label_updated = "2025-06-01".into();
        check(&p).unwrap();
    }

    #[test]
    fn label_checks_skipped_without_source() {
        let mut p = mounjaro();
        p.fda_label_source = None;
        p.fda_label_updated = String::new();
        check(&p).unwrap();
    }

    #[test]
    fn first_violation_wins() {
        let mut p = mounjaro();
        p.medicine_type = "Ketchup".into();
        p.savings[0].phone = Some("555-1234".into());
        p.fda_label_source = Some("https://example.com/label.pdf".into());
        assert!(matches!(check(&p), Err(ValidationError::InvalidEnum { .. })));
    }

    #[test]
    fn validation_is_repeatable() {
        let v = Validator::default();
        let good = mounjaro();
        let mut bad = mounjaro();
        bad.savings[0].phone = Some("555-1234".into());
        assert!(v.validate_on(&good, today()).is_ok());
        assert!(v.validate_on(&good, today()).is_ok());
        assert!(v.validate_on(&bad, today()).is_err());
        assert!(v.validate_on(&bad, today()).is_err());
    }

    #[test]
    fn catalog_stops_at_first_invalid_product() {
        let mut bad = mounjaro();
        bad.brand_name = "Zepbound".into();
        bad.dose_frequency.clear();
        let mut worse = mounjaro();
        worse.medicine_type = "Ketchup".into();
        let err = Validator::default()
            .validate_catalog(&[mounjaro(), bad, worse])
            .unwrap_err();
        assert!(err.to_string().starts_with("Zepbound:"));
    }

    #[test]
    fn custom_rules_are_honoured() {
        let mut rules = CatalogRules::default();
        rules.medicine_types = crate::Enumeration::new(["Ketchup"]);
        let mut p = mounjaro();
        p.medicine_type = "Ketchup".into();
        Validator::new(rules).validate_on(&p, today()).unwrap();
    }
}
