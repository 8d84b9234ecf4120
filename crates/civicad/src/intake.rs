//! Intake validation for the complaint form.
//!
//! Required-field presence is checked before anything else happens:
//! a rejected form produces no reference id and no dispatch attempt.

use civica_common::{Category, CivicaError, ComplaintSubmission};
use serde::Deserialize;

/// Raw fields posted by the complaint form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// Validate required fields and build the transient submission
pub fn validate(form: &ComplaintForm) -> Result<ComplaintSubmission, CivicaError> {
    let name = required(&form.name, "name")?;
    let contact = required(&form.contact, "contact")?;
    let category: Category = required(&form.category, "category")?.parse()?;
    let description = required(&form.description, "description")?;

    Ok(ComplaintSubmission::new(name, contact, category, description))
}

fn required(value: &str, field: &'static str) -> Result<String, CivicaError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CivicaError::MissingField(field));
    }
    Ok(trimmed.to_string())
}
