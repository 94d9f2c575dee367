//! Site model
//!
//! Site-wide configuration: blog name, description, and logo. The blog has a
//! single active site record; see `SiteRepository::get`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Site entity holding blog-wide presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Site {
    /// Unique identifier
    pub id: i64,
    /// Site name, shown in headers and titles
    pub name: String,
    /// Site description / tagline
    pub description: String,
    /// Stored path of the uploaded logo image
    pub logo: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Site {
    /// Create a new Site. The ID is assigned by the database.
    pub fn new(name: String, description: String, logo: Option<String>) -> Self {
        Self {
            id: 0,
            name,
            description,
            logo,
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Input for updating site settings (partial; unset fields are left alone)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSiteInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
}

impl UpdateSiteInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_logo(mut self, logo: String) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.name.is_some() || self.description.is_some() || self.logo.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_display_is_name() {
        let site = Site::new("My Blog".to_string(), "Notes and essays".to_string(), None);
        assert_eq!(site.to_string(), "My Blog");
    }

    #[test]
    fn test_update_input_has_changes() {
        assert!(!UpdateSiteInput::new().has_changes());
        assert!(UpdateSiteInput::new().with_name("x".to_string()).has_changes());
    }
}
