//! User model
//!
//! Identity and profile fields for blog authors and commenters. Credential
//! handling is delegated to the surrounding deployment; this crate persists
//! identity and profile data only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity.
///
/// Referenced by posts and comments as author, and by both through the
/// like relations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email
    pub email: String,
    /// When the account was created
    pub date_joined: DateTime<Utc>,
    /// Stored path of the uploaded avatar image
    pub avatar: Option<String>,
    /// Short self-description
    pub bio: Option<String>,
    /// Free-form location
    pub location: Option<String>,
    /// Personal website URL
    pub website: Option<String>,
}

impl User {
    /// Full display name, falling back to the username when both name
    /// fields are empty.
    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.username)
    }
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
}

impl CreateUserInput {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            avatar: None,
            bio: None,
            location: None,
            website: None,
        }
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }
}

/// Input for updating an existing user (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
}

impl UpdateUserInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.email.is_some()
            || self.avatar.is_some()
            || self.bio.is_some()
            || self.location.is_some()
            || self.website.is_some()
    }
}
