//! Comment repository
//!
//! Database operations for comments and their like relation. A comment
//! outlives both its post and its author: either delete nulls the FK.
//! Content length is validated by `CreateCommentInput::validate` before the
//! row is written.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Comment, CreateCommentInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Create a comment. Input is validated before insertion.
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment>;

    /// Get comment by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>>;

    /// Comments on a post, oldest first
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>>;

    /// Flip the approval flag. Returns true when a row was changed.
    async fn set_approved(&self, id: i64, approved: bool) -> Result<bool>;

    /// Delete a comment. Returns true when a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Record a like by a user. Returns false when already liked (no-op).
    async fn add_like(&self, comment_id: i64, user_id: i64) -> Result<bool>;

    /// Remove a like. Returns true when a row was removed.
    async fn remove_like(&self, comment_id: i64, user_id: i64) -> Result<bool>;

    /// Number of likes: the cardinality of the like set at query time
    async fn like_count(&self, comment_id: i64) -> Result<i64>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: DynDatabasePool,
}

impl SqlxCommentRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment> {
        input.validate()?;
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().unwrap(), input).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().unwrap(), input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_for_post_sqlite(self.pool.as_sqlite().unwrap(), post_id).await
            }
            DatabaseDriver::Mysql => {
                list_for_post_mysql(self.pool.as_mysql().unwrap(), post_id).await
            }
        }
    }

    async fn set_approved(&self, id: i64, approved: bool) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                set_approved_sqlite(self.pool.as_sqlite().unwrap(), id, approved).await
            }
            DatabaseDriver::Mysql => {
                set_approved_mysql(self.pool.as_mysql().unwrap(), id, approved).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => delete_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn add_like(&self, comment_id: i64, user_id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                add_like_sqlite(self.pool.as_sqlite().unwrap(), comment_id, user_id).await
            }
            DatabaseDriver::Mysql => {
                add_like_mysql(self.pool.as_mysql().unwrap(), comment_id, user_id).await
            }
        }
    }

    async fn remove_like(&self, comment_id: i64, user_id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                remove_like_sqlite(self.pool.as_sqlite().unwrap(), comment_id, user_id).await
            }
            DatabaseDriver::Mysql => {
                remove_like_mysql(self.pool.as_mysql().unwrap(), comment_id, user_id).await
            }
        }
    }

    async fn like_count(&self, comment_id: i64) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                like_count_sqlite(self.pool.as_sqlite().unwrap(), comment_id).await
            }
            DatabaseDriver::Mysql => {
                like_count_mysql(self.pool.as_mysql().unwrap(), comment_id).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_sqlite(pool: &SqlitePool, input: &CreateCommentInput) -> Result<Comment> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO comments (content, post_id, user_id, is_approved, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.content)
    .bind(input.post_id)
    .bind(input.user_id)
    .bind(input.is_approved)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    Ok(Comment {
        id: result.last_insert_rowid(),
        content: input.content.clone(),
        post_id: Some(input.post_id),
        user_id: input.user_id,
        is_approved: input.is_approved,
        created_at: now,
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(
        r#"
        SELECT id, content, post_id, user_id, is_approved, created_at
        FROM comments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get comment by ID")?;

    Ok(row.map(|row| row_to_comment_sqlite(&row)))
}

async fn list_for_post_sqlite(pool: &SqlitePool, post_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(
        r#"
        SELECT id, content, post_id, user_id, is_approved, created_at
        FROM comments
        WHERE post_id = ?
        ORDER BY created_at, id
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments for post")?;

    Ok(rows.iter().map(row_to_comment_sqlite).collect())
}

async fn set_approved_sqlite(pool: &SqlitePool, id: i64, approved: bool) -> Result<bool> {
    let result = sqlx::query("UPDATE comments SET is_approved = ? WHERE id = ?")
        .bind(approved)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to set comment approval")?;

    Ok(result.rows_affected() > 0)
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete comment")?;

    Ok(result.rows_affected() > 0)
}

async fn add_like_sqlite(pool: &SqlitePool, comment_id: i64, user_id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO comment_likes (comment_id, user_id, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(comment_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to like comment")?;

    Ok(result.rows_affected() > 0)
}

async fn remove_like_sqlite(pool: &SqlitePool, comment_id: i64, user_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM comment_likes WHERE comment_id = ? AND user_id = ?")
        .bind(comment_id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to unlike comment")?;

    Ok(result.rows_affected() > 0)
}

async fn like_count_sqlite(pool: &SqlitePool, comment_id: i64) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM comment_likes WHERE comment_id = ?")
        .bind(comment_id)
        .fetch_one(pool)
        .await
        .context("Failed to count comment likes")
}

fn row_to_comment_sqlite(row: &sqlx::sqlite::SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        content: row.get("content"),
        post_id: row.get("post_id"),
        user_id: row.get("user_id"),
        is_approved: row.get("is_approved"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_mysql(pool: &MySqlPool, input: &CreateCommentInput) -> Result<Comment> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO comments (content, post_id, user_id, is_approved, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.content)
    .bind(input.post_id)
    .bind(input.user_id)
    .bind(input.is_approved)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    Ok(Comment {
        id: result.last_insert_id() as i64,
        content: input.content.clone(),
        post_id: Some(input.post_id),
        user_id: input.user_id,
        is_approved: input.is_approved,
        created_at: now,
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(
        r#"
        SELECT id, content, post_id, user_id, is_approved, created_at
        FROM comments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get comment by ID")?;

    Ok(row.map(|row| row_to_comment_mysql(&row)))
}

async fn list_for_post_mysql(pool: &MySqlPool, post_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(
        r#"
        SELECT id, content, post_id, user_id, is_approved, created_at
        FROM comments
        WHERE post_id = ?
        ORDER BY created_at, id
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments for post")?;

    Ok(rows.iter().map(row_to_comment_mysql).collect())
}

async fn set_approved_mysql(pool: &MySqlPool, id: i64, approved: bool) -> Result<bool> {
    let result = sqlx::query("UPDATE comments SET is_approved = ? WHERE id = ?")
        .bind(approved)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to set comment approval")?;

    Ok(result.rows_affected() > 0)
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete comment")?;

    Ok(result.rows_affected() > 0)
}

async fn add_like_mysql(pool: &MySqlPool, comment_id: i64, user_id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT IGNORE INTO comment_likes (comment_id, user_id, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(comment_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to like comment")?;

    Ok(result.rows_affected() > 0)
}

async fn remove_like_mysql(pool: &MySqlPool, comment_id: i64, user_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM comment_likes WHERE comment_id = ? AND user_id = ?")
        .bind(comment_id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to unlike comment")?;

    Ok(result.rows_affected() > 0)
}

async fn like_count_mysql(pool: &MySqlPool, comment_id: i64) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM comment_likes WHERE comment_id = ?")
        .bind(comment_id)
        .fetch_one(pool)
        .await
        .context("Failed to count comment likes")
}

fn row_to_comment_mysql(row: &sqlx::mysql::MySqlRow) -> Comment {
    Comment {
        id: row.get("id"),
        content: row.get("content"),
        post_id: row.get("post_id"),
        user_id: row.get("user_id"),
        is_approved: row.get("is_approved"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        PostRepository, SqlxPostRepository, SqlxUserRepository, UserRepository,
    };
    use crate::db::{create_test_pool, schema};
    use crate::models::{CreatePostInput, CreateUserInput, MAX_COMMENT_LEN};

    struct Fixture {
        comments: SqlxCommentRepository,
        posts: SqlxPostRepository,
        users: SqlxUserRepository,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        schema::init_schema(&pool).await.expect("Failed to apply schema");
        Fixture {
            comments: SqlxCommentRepository::new(pool.clone()),
            posts: SqlxPostRepository::new(pool.clone()),
            users: SqlxUserRepository::new(pool),
        }
    }

    async fn sample_post(f: &Fixture) -> i64 {
        f.posts
            .create(&CreatePostInput::new("Host", "...").with_slug("host"))
            .await
            .expect("create post failed")
            .id
    }

    async fn sample_user(f: &Fixture, name: &str) -> i64 {
        f.users
            .create(&CreateUserInput::new(name, format!("{name}@example.com")))
            .await
            .expect("create user failed")
            .id
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let f = setup().await;
        let post = sample_post(&f).await;
        let user = sample_user(&f, "dara").await;

        let created = f
            .comments
            .create(&CreateCommentInput::new(post, "Well put.").by_user(user).approved())
            .await
            .expect("create failed");
        assert!(created.id > 0);
        assert!(created.is_approved);

        let listed = f.comments.list_for_post(post).await.expect("list failed");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content, "Well put.");
        assert_eq!(listed[0].user_id, Some(user));
    }

    #[tokio::test]
    async fn test_create_rejects_overlong_content() {
        let f = setup().await;
        let post = sample_post(&f).await;

        let result = f
            .comments
            .create(&CreateCommentInput::new(post, "y".repeat(MAX_COMMENT_LEN + 1)))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_deleting_post_orphans_comment() {
        let f = setup().await;
        let post = sample_post(&f).await;

        let comment = f
            .comments
            .create(&CreateCommentInput::new(post, "Still here"))
            .await
            .expect("create failed");

        assert!(f.posts.delete(post).await.expect("delete post failed"));

        let comment = f
            .comments
            .get_by_id(comment.id)
            .await
            .expect("get failed")
            .expect("comment should survive its post");
        assert_eq!(comment.post_id, None);
    }

    #[tokio::test]
    async fn test_deleting_author_orphans_comment() {
        let f = setup().await;
        let post = sample_post(&f).await;
        let user = sample_user(&f, "ghost").await;

        let comment = f
            .comments
            .create(&CreateCommentInput::new(post, "Posthumous").by_user(user))
            .await
            .expect("create failed");

        f.users.delete(user).await.expect("delete user failed");

        let comment = f
            .comments
            .get_by_id(comment.id)
            .await
            .expect("get failed")
            .expect("comment should survive its author");
        assert_eq!(comment.user_id, None);
    }

    #[tokio::test]
    async fn test_like_count_and_duplicate_noop() {
        let f = setup().await;
        let post = sample_post(&f).await;
        let liker = sample_user(&f, "liker").await;

        let comment = f
            .comments
            .create(&CreateCommentInput::new(post, "Agreed"))
            .await
            .expect("create failed");

        assert!(f
            .comments
            .add_like(comment.id, liker)
            .await
            .expect("like failed"));
        assert!(!f
            .comments
            .add_like(comment.id, liker)
            .await
            .expect("relike failed"));
        assert_eq!(
            f.comments.like_count(comment.id).await.expect("count failed"),
            1
        );

        assert!(f
            .comments
            .remove_like(comment.id, liker)
            .await
            .expect("unlike failed"));
        assert_eq!(
            f.comments.like_count(comment.id).await.expect("count failed"),
            0
        );
    }

    #[tokio::test]
    async fn test_set_approved() {
        let f = setup().await;
        let post = sample_post(&f).await;

        let comment = f
            .comments
            .create(&CreateCommentInput::new(post, "Pending"))
            .await
            .expect("create failed");
        assert!(!comment.is_approved);

        assert!(f
            .comments
            .set_approved(comment.id, true)
            .await
            .expect("approve failed"));

        let comment = f
            .comments
            .get_by_id(comment.id)
            .await
            .expect("get failed")
            .expect("missing");
        assert!(comment.is_approved);
    }

    #[tokio::test]
    async fn test_delete() {
        let f = setup().await;
        let post = sample_post(&f).await;

        let comment = f
            .comments
            .create(&CreateCommentInput::new(post, "Removed"))
            .await
            .expect("create failed");

        assert!(f.comments.delete(comment.id).await.expect("delete failed"));
        assert!(f
            .comments
            .get_by_id(comment.id)
            .await
            .expect("get failed")
            .is_none());
    }
}
