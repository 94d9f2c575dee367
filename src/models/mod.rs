//! Data models
//!
//! This module contains all data structures used throughout the blog
//! backend: database entities (Site, User, Category, Tag, Post, Comment)
//! and their create/update input types.

mod category;
mod comment;
mod post;
mod site;
mod tag;
mod user;

pub use category::{Category, UpdateCategoryInput};
pub use comment::{
    Comment, CommentValidationError, CreateCommentInput, MAX_COMMENT_LEN,
};
pub use post::{CreatePostInput, ListParams, PagedResult, Post, UpdatePostInput};
pub use site::{Site, UpdateSiteInput};
pub use tag::{Tag, UpdateTagInput};
pub use user::{CreateUserInput, UpdateUserInput, User};
