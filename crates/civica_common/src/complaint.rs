//! Complaint submission model.
//!
//! A submission exists only for the duration of one request. The
//! reference id is the tracking handle returned to the submitter and is
//! generated regardless of notification outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Complaint category accepted by the intake form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Pothole,
    Streetlight,
    Garbage,
    WaterLeak,
    Other,
}

impl Category {
    /// All categories, in form display order
    pub const ALL: [Category; 5] = [
        Category::Pothole,
        Category::Streetlight,
        Category::Garbage,
        Category::WaterLeak,
        Category::Other,
    ];

    /// Form value for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pothole => "pothole",
            Self::Streetlight => "streetlight",
            Self::Garbage => "garbage",
            Self::WaterLeak => "water_leak",
            Self::Other => "other",
        }
    }

    /// Human-readable label for form rendering
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pothole => "Pothole",
            Self::Streetlight => "Broken streetlight",
            Self::Garbage => "Uncollected garbage",
            Self::WaterLeak => "Water leak",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = crate::error::CivicaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pothole" => Ok(Self::Pothole),
            "streetlight" => Ok(Self::Streetlight),
            "garbage" => Ok(Self::Garbage),
            "water_leak" => Ok(Self::WaterLeak),
            "other" => Ok(Self::Other),
            unknown => Err(crate::error::CivicaError::UnknownCategory(
                unknown.to_string(),
            )),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One form-originated report of a city infrastructure issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintSubmission {
    pub name: String,
    /// Email address or phone number
    pub contact: String,
    pub category: Category,
    pub description: String,
    pub submitted_at: DateTime<Utc>,
}

impl ComplaintSubmission {
    /// Build a submission stamped with the current time
    pub fn new(name: String, contact: String, category: Category, description: String) -> Self {
        Self {
            name,
            contact,
            category,
            description,
            submitted_at: Utc::now(),
        }
    }

    /// True when the contact field looks like an email address.
    /// Phone contacts are accepted by intake but cannot be emailed.
    pub fn contact_is_email(&self) -> bool {
        let c = self.contact.trim();
        match c.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.'),
            None => false,
        }
    }
}

/// Opaque tracking handle returned to the submitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceId(String);

impl ReferenceId {
    /// Generate a fresh reference id (`REF-` + 8 upper hex chars).
    /// No uniqueness registry exists; collisions are accepted as
    /// negligible at this scale.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("REF-{}", hex[..8].to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of one notification attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub delivered: bool,
    pub warning: Option<String>,
}

impl NotificationResult {
    pub fn delivered() -> Self {
        Self {
            delivered: true,
            warning: None,
        }
    }

    pub fn failed(warning: impl Into<String>) -> Self {
        Self {
            delivered: false,
            warning: Some(warning.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    #[test]
    fn test_category_roundtrip() {
        for cat in Category::ALL {
            assert_eq!(Category::from_str(cat.as_str()).unwrap(), cat);
        }
    }

    #[test]
    fn test_category_parse_trims_and_lowercases() {
        assert_eq!(Category::from_str("  Pothole ").unwrap(), Category::Pothole);
        assert_eq!(Category::from_str("WATER_LEAK").unwrap(), Category::WaterLeak);
    }

    #[test]
    fn test_category_unknown_rejected() {
        assert!(Category::from_str("sinkhole").is_err());
        assert!(Category::from_str("").is_err());
    }

    #[test]
    fn test_reference_id_format() {
        let id = ReferenceId::generate();
        assert!(id.as_str().starts_with("REF-"));
        assert_eq!(id.as_str().len(), 12);
        let suffix = &id.as_str()[4..];
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_reference_id_unique_across_calls() {
        let ids: HashSet<String> = (0..1000)
            .map(|_| ReferenceId::generate().as_str().to_string())
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_contact_is_email() {
        let sub = ComplaintSubmission::new(
            "A. Citizen".into(),
            "a@example.com".into(),
            Category::Pothole,
            "Large pothole on Main St.".into(),
        );
        assert!(sub.contact_is_email());

        let phone = ComplaintSubmission::new(
            "B. Citizen".into(),
            "+1 555 0100".into(),
            Category::Garbage,
            "Bins not collected".into(),
        );
        assert!(!phone.contact_is_email());
    }
}
