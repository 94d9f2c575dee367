//! Repository layer
//!
//! One trait + SQLx implementation per entity. Implementations dispatch on
//! the pool's driver to pick the SQLite or MySQL query path.

mod category;
mod comment;
mod post;
mod site;
mod tag;
mod user;

pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use post::{PostRepository, SqlxPostRepository};
pub use site::{SiteRepository, SqlxSiteRepository};
pub use tag::{SqlxTagRepository, TagRepository};
pub use user::{SqlxUserRepository, UserRepository};
