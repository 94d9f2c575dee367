//! Comment model
//!
//! Comments keep nullable references to both their post and their author:
//! deleting either one orphans the comment instead of removing it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum accepted comment length in characters.
pub const MAX_COMMENT_LEN: usize = 1000;

/// Length at which `display_content` truncates.
const DISPLAY_LEN: usize = 50;

/// Comment entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    /// Unique identifier
    pub id: i64,
    /// Comment body, at most `MAX_COMMENT_LEN` characters
    pub content: String,
    /// Post being commented on; null once the post is deleted
    pub post_id: Option<i64>,
    /// Comment author; null once the account is deleted
    pub user_id: Option<i64>,
    /// Whether the comment passed moderation
    pub is_approved: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Content shortened for list displays: the first 50 characters plus
    /// an ellipsis when longer, the content unchanged otherwise.
    pub fn display_content(&self) -> String {
        let chars: Vec<char> = self.content.chars().collect();
        if chars.len() > DISPLAY_LEN {
            let head: String = chars[..DISPLAY_LEN].iter().collect();
            format!("{}...", head)
        } else {
            self.content.clone()
        }
    }
}

impl std::fmt::Display for Comment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_content())
    }
}

/// Validation errors for comment input
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CommentValidationError {
    #[error("Comment content cannot be empty")]
    Empty,

    #[error("Comment content exceeds {MAX_COMMENT_LEN} characters (got {0})")]
    TooLong(usize),
}

/// Input for creating a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentInput {
    pub post_id: i64,
    pub user_id: Option<i64>,
    pub content: String,
    /// Whether the comment is approved on creation (defaults to false)
    #[serde(default)]
    pub is_approved: bool,
}

impl CreateCommentInput {
    pub fn new(post_id: i64, content: impl Into<String>) -> Self {
        Self {
            post_id,
            user_id: None,
            content: content.into(),
            is_approved: false,
        }
    }

    pub fn by_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn approved(mut self) -> Self {
        self.is_approved = true;
        self
    }

    /// Validate the content bound before handing the input to storage.
    pub fn validate(&self) -> Result<(), CommentValidationError> {
        let len = self.content.chars().count();
        if self.content.trim().is_empty() {
            return Err(CommentValidationError::Empty);
        }
        if len > MAX_COMMENT_LEN {
            return Err(CommentValidationError::TooLong(len));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment_with(content: &str) -> Comment {
        Comment {
            id: 1,
            content: content.to_string(),
            post_id: Some(1),
            user_id: Some(1),
            is_approved: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_content_short_is_unchanged() {
        let comment = comment_with("Nice post!");
        assert_eq!(comment.display_content(), "Nice post!");
    }

    #[test]
    fn test_display_content_exactly_fifty_is_unchanged() {
        let content = "a".repeat(50);
        let comment = comment_with(&content);
        assert_eq!(comment.display_content(), content);
    }

    #[test]
    fn test_display_content_long_is_truncated() {
        let comment = comment_with(&"b".repeat(80));
        let shown = comment.display_content();
        assert_eq!(shown.chars().count(), 53);
        assert!(shown.ends_with("..."));
        assert!(shown.starts_with(&"b".repeat(50)));
    }

    #[test]
    fn test_display_content_counts_chars_not_bytes() {
        // 60 multibyte characters must truncate at 50 characters, not panic
        // on a byte boundary.
        let comment = comment_with(&"é".repeat(60));
        let shown = comment.display_content();
        assert_eq!(shown.chars().count(), 53);
    }

    #[test]
    fn test_validate_rejects_empty() {
        let input = CreateCommentInput::new(1, "   ");
        assert_eq!(input.validate(), Err(CommentValidationError::Empty));
    }

    #[test]
    fn test_validate_rejects_over_limit() {
        let input = CreateCommentInput::new(1, "x".repeat(MAX_COMMENT_LEN + 1));
        assert_eq!(
            input.validate(),
            Err(CommentValidationError::TooLong(MAX_COMMENT_LEN + 1))
        );
    }

    #[test]
    fn test_validate_accepts_at_limit() {
        let input = CreateCommentInput::new(1, "x".repeat(MAX_COMMENT_LEN));
        assert!(input.validate().is_ok());
    }
}
