//! Post repository
//!
//! Database operations for posts, including the tag and like relations.
//!
//! Referential rules enforced by the schema and exercised here:
//! - deleting the author or the category nulls the post's FK, the post stays
//! - `post_tags` and `post_likes` reject duplicate pairs; a repeat
//!   `add_tag`/`add_like` reports `false` instead of failing
//! - `like_count` is a COUNT over `post_likes` at query time, never cached

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{CreatePostInput, ListParams, PagedResult, Post, Tag, UpdatePostInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post
    async fn create(&self, input: &CreatePostInput) -> Result<Post>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Get post by slug (first match; slugs are not unique)
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>>;

    /// List posts, newest first, paginated
    async fn list(&self, params: &ListParams) -> Result<PagedResult<Post>>;

    /// Apply a partial update; returns the updated row, None when missing.
    /// Bumps `updated_at`.
    async fn update(&self, id: i64, input: &UpdatePostInput) -> Result<Option<Post>>;

    /// Delete a post. Returns true when a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Attach a tag. Returns false when the pair already existed.
    async fn add_tag(&self, post_id: i64, tag_id: i64) -> Result<bool>;

    /// Detach a tag. Returns true when a row was removed.
    async fn remove_tag(&self, post_id: i64, tag_id: i64) -> Result<bool>;

    /// Tags attached to a post, ordered by name
    async fn tags_for_post(&self, post_id: i64) -> Result<Vec<Tag>>;

    /// Record a like by a user. Returns false when already liked (no-op).
    async fn add_like(&self, post_id: i64, user_id: i64) -> Result<bool>;

    /// Remove a like. Returns true when a row was removed.
    async fn remove_like(&self, post_id: i64, user_id: i64) -> Result<bool>;

    /// Number of likes: the cardinality of the like set at query time
    async fn like_count(&self, post_id: i64) -> Result<i64>;

    /// Whether the given user has liked the post
    async fn is_liked_by(&self, post_id: i64, user_id: i64) -> Result<bool>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: DynDatabasePool,
}

impl SqlxPostRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, input: &CreatePostInput) -> Result<Post> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().unwrap(), input).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().unwrap(), input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_by_slug_sqlite(self.pool.as_sqlite().unwrap(), slug).await
            }
            DatabaseDriver::Mysql => get_by_slug_mysql(self.pool.as_mysql().unwrap(), slug).await,
        }
    }

    async fn list(&self, params: &ListParams) -> Result<PagedResult<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.as_sqlite().unwrap(), params).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.as_mysql().unwrap(), params).await,
        }
    }

    async fn update(&self, id: i64, input: &UpdatePostInput) -> Result<Option<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_sqlite(self.pool.as_sqlite().unwrap(), id, input).await
            }
            DatabaseDriver::Mysql => update_mysql(self.pool.as_mysql().unwrap(), id, input).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => delete_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn add_tag(&self, post_id: i64, tag_id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                add_tag_sqlite(self.pool.as_sqlite().unwrap(), post_id, tag_id).await
            }
            DatabaseDriver::Mysql => {
                add_tag_mysql(self.pool.as_mysql().unwrap(), post_id, tag_id).await
            }
        }
    }

    async fn remove_tag(&self, post_id: i64, tag_id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                remove_tag_sqlite(self.pool.as_sqlite().unwrap(), post_id, tag_id).await
            }
            DatabaseDriver::Mysql => {
                remove_tag_mysql(self.pool.as_mysql().unwrap(), post_id, tag_id).await
            }
        }
    }

    async fn tags_for_post(&self, post_id: i64) -> Result<Vec<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                tags_for_post_sqlite(self.pool.as_sqlite().unwrap(), post_id).await
            }
            DatabaseDriver::Mysql => {
                tags_for_post_mysql(self.pool.as_mysql().unwrap(), post_id).await
            }
        }
    }

    async fn add_like(&self, post_id: i64, user_id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                add_like_sqlite(self.pool.as_sqlite().unwrap(), post_id, user_id).await
            }
            DatabaseDriver::Mysql => {
                add_like_mysql(self.pool.as_mysql().unwrap(), post_id, user_id).await
            }
        }
    }

    async fn remove_like(&self, post_id: i64, user_id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                remove_like_sqlite(self.pool.as_sqlite().unwrap(), post_id, user_id).await
            }
            DatabaseDriver::Mysql => {
                remove_like_mysql(self.pool.as_mysql().unwrap(), post_id, user_id).await
            }
        }
    }

    async fn like_count(&self, post_id: i64) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                like_count_sqlite(self.pool.as_sqlite().unwrap(), post_id).await
            }
            DatabaseDriver::Mysql => {
                like_count_mysql(self.pool.as_mysql().unwrap(), post_id).await
            }
        }
    }

    async fn is_liked_by(&self, post_id: i64, user_id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                is_liked_by_sqlite(self.pool.as_sqlite().unwrap(), post_id, user_id).await
            }
            DatabaseDriver::Mysql => {
                is_liked_by_mysql(self.pool.as_mysql().unwrap(), post_id, user_id).await
            }
        }
    }
}

const POST_COLUMNS: &str = "id, title, slug, content, featured_image, is_published, is_featured, \
                            author_id, category_id, created_at, updated_at";

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_sqlite(pool: &SqlitePool, input: &CreatePostInput) -> Result<Post> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO posts
            (title, slug, content, featured_image, is_published, is_featured,
             author_id, category_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.slug)
    .bind(&input.content)
    .bind(&input.featured_image)
    .bind(input.is_published)
    .bind(input.is_featured)
    .bind(input.author_id)
    .bind(input.category_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    Ok(Post {
        id: result.last_insert_rowid(),
        title: input.title.clone(),
        slug: input.slug.clone(),
        content: input.content.clone(),
        featured_image: input.featured_image.clone(),
        is_published: input.is_published,
        is_featured: input.is_featured,
        author_id: input.author_id,
        category_id: input.category_id,
        created_at: now,
        updated_at: now,
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get post by ID")?;

    Ok(row.map(|row| row_to_post_sqlite(&row)))
}

async fn get_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<Post>> {
    let row = sqlx::query(&format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE slug = ? ORDER BY id LIMIT 1"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by slug")?;

    Ok(row.map(|row| row_to_post_sqlite(&row)))
}

async fn list_sqlite(pool: &SqlitePool, params: &ListParams) -> Result<PagedResult<Post>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await
        .context("Failed to count posts")?;

    let rows = sqlx::query(&format!(
        "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    ))
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    let items = rows.iter().map(row_to_post_sqlite).collect();
    Ok(PagedResult::new(items, total, params))
}

async fn update_sqlite(pool: &SqlitePool, id: i64, input: &UpdatePostInput) -> Result<Option<Post>> {
    let Some(mut post) = get_by_id_sqlite(pool, id).await? else {
        return Ok(None);
    };
    apply_update(&mut post, input);
    post.updated_at = Utc::now();

    sqlx::query(
        r#"
        UPDATE posts
        SET title = ?, slug = ?, content = ?, featured_image = ?,
            is_published = ?, is_featured = ?, category_id = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&post.title)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.featured_image)
    .bind(post.is_published)
    .bind(post.is_featured)
    .bind(post.category_id)
    .bind(post.updated_at)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update post")?;

    Ok(Some(post))
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete post")?;

    Ok(result.rows_affected() > 0)
}

async fn add_tag_sqlite(pool: &SqlitePool, post_id: i64, tag_id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO post_tags (post_id, tag_id)
        VALUES (?, ?)
        "#,
    )
    .bind(post_id)
    .bind(tag_id)
    .execute(pool)
    .await
    .context("Failed to add tag to post")?;

    Ok(result.rows_affected() > 0)
}

async fn remove_tag_sqlite(pool: &SqlitePool, post_id: i64, tag_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM post_tags WHERE post_id = ? AND tag_id = ?")
        .bind(post_id)
        .bind(tag_id)
        .execute(pool)
        .await
        .context("Failed to remove tag from post")?;

    Ok(result.rows_affected() > 0)
}

async fn tags_for_post_sqlite(pool: &SqlitePool, post_id: i64) -> Result<Vec<Tag>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name, t.slug, t.description, t.created_at
        FROM tags t
        INNER JOIN post_tags pt ON t.id = pt.tag_id
        WHERE pt.post_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
    .context("Failed to get tags for post")?;

    Ok(rows
        .iter()
        .map(|row| Tag {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
            description: row.get("description"),
            created_at: row.get("created_at"),
        })
        .collect())
}

async fn add_like_sqlite(pool: &SqlitePool, post_id: i64, user_id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO post_likes (post_id, user_id, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to like post")?;

    Ok(result.rows_affected() > 0)
}

async fn remove_like_sqlite(pool: &SqlitePool, post_id: i64, user_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to unlike post")?;

    Ok(result.rows_affected() > 0)
}

async fn like_count_sqlite(pool: &SqlitePool, post_id: i64) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = ?")
        .bind(post_id)
        .fetch_one(pool)
        .await
        .context("Failed to count post likes")
}

async fn is_liked_by_sqlite(pool: &SqlitePool, post_id: i64, user_id: i64) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .fetch_one(pool)
            .await
            .context("Failed to check post like")?;

    Ok(count > 0)
}

fn row_to_post_sqlite(row: &sqlx::sqlite::SqliteRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        content: row.get("content"),
        featured_image: row.get("featured_image"),
        is_published: row.get("is_published"),
        is_featured: row.get("is_featured"),
        author_id: row.get("author_id"),
        category_id: row.get("category_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_mysql(pool: &MySqlPool, input: &CreatePostInput) -> Result<Post> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO posts
            (title, slug, content, featured_image, is_published, is_featured,
             author_id, category_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.slug)
    .bind(&input.content)
    .bind(&input.featured_image)
    .bind(input.is_published)
    .bind(input.is_featured)
    .bind(input.author_id)
    .bind(input.category_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    Ok(Post {
        id: result.last_insert_id() as i64,
        title: input.title.clone(),
        slug: input.slug.clone(),
        content: input.content.clone(),
        featured_image: input.featured_image.clone(),
        is_published: input.is_published,
        is_featured: input.is_featured,
        author_id: input.author_id,
        category_id: input.category_id,
        created_at: now,
        updated_at: now,
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get post by ID")?;

    Ok(row.map(|row| row_to_post_mysql(&row)))
}

async fn get_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<Option<Post>> {
    let row = sqlx::query(&format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE slug = ? ORDER BY id LIMIT 1"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by slug")?;

    Ok(row.map(|row| row_to_post_mysql(&row)))
}

async fn list_mysql(pool: &MySqlPool, params: &ListParams) -> Result<PagedResult<Post>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await
        .context("Failed to count posts")?;

    let rows = sqlx::query(&format!(
        "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    ))
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    let items = rows.iter().map(row_to_post_mysql).collect();
    Ok(PagedResult::new(items, total, params))
}

async fn update_mysql(pool: &MySqlPool, id: i64, input: &UpdatePostInput) -> Result<Option<Post>> {
    let Some(mut post) = get_by_id_mysql(pool, id).await? else {
        return Ok(None);
    };
    apply_update(&mut post, input);
    post.updated_at = Utc::now();

    sqlx::query(
        r#"
        UPDATE posts
        SET title = ?, slug = ?, content = ?, featured_image = ?,
            is_published = ?, is_featured = ?, category_id = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&post.title)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.featured_image)
    .bind(post.is_published)
    .bind(post.is_featured)
    .bind(post.category_id)
    .bind(post.updated_at)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update post")?;

    Ok(Some(post))
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete post")?;

    Ok(result.rows_affected() > 0)
}

async fn add_tag_mysql(pool: &MySqlPool, post_id: i64, tag_id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT IGNORE INTO post_tags (post_id, tag_id)
        VALUES (?, ?)
        "#,
    )
    .bind(post_id)
    .bind(tag_id)
    .execute(pool)
    .await
    .context("Failed to add tag to post")?;

    Ok(result.rows_affected() > 0)
}

async fn remove_tag_mysql(pool: &MySqlPool, post_id: i64, tag_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM post_tags WHERE post_id = ? AND tag_id = ?")
        .bind(post_id)
        .bind(tag_id)
        .execute(pool)
        .await
        .context("Failed to remove tag from post")?;

    Ok(result.rows_affected() > 0)
}

async fn tags_for_post_mysql(pool: &MySqlPool, post_id: i64) -> Result<Vec<Tag>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name, t.slug, t.description, t.created_at
        FROM tags t
        INNER JOIN post_tags pt ON t.id = pt.tag_id
        WHERE pt.post_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
    .context("Failed to get tags for post")?;

    Ok(rows
        .iter()
        .map(|row| Tag {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
            description: row.get("description"),
            created_at: row.get("created_at"),
        })
        .collect())
}

async fn add_like_mysql(pool: &MySqlPool, post_id: i64, user_id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT IGNORE INTO post_likes (post_id, user_id, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to like post")?;

    Ok(result.rows_affected() > 0)
}

async fn remove_like_mysql(pool: &MySqlPool, post_id: i64, user_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to unlike post")?;

    Ok(result.rows_affected() > 0)
}

async fn like_count_mysql(pool: &MySqlPool, post_id: i64) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = ?")
        .bind(post_id)
        .fetch_one(pool)
        .await
        .context("Failed to count post likes")
}

async fn is_liked_by_mysql(pool: &MySqlPool, post_id: i64, user_id: i64) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .fetch_one(pool)
            .await
            .context("Failed to check post like")?;

    Ok(count > 0)
}

fn row_to_post_mysql(row: &sqlx::mysql::MySqlRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        content: row.get("content"),
        featured_image: row.get("featured_image"),
        is_published: row.get("is_published"),
        is_featured: row.get("is_featured"),
        author_id: row.get("author_id"),
        category_id: row.get("category_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn apply_update(post: &mut Post, input: &UpdatePostInput) {
    if let Some(title) = &input.title {
        post.title = title.clone();
    }
    if let Some(slug) = &input.slug {
        post.slug = slug.clone();
    }
    if let Some(content) = &input.content {
        post.content = content.clone();
    }
    if let Some(featured_image) = &input.featured_image {
        post.featured_image = Some(featured_image.clone());
    }
    if let Some(category_id) = input.category_id {
        post.category_id = Some(category_id);
    }
    if let Some(is_published) = input.is_published {
        post.is_published = is_published;
    }
    if let Some(is_featured) = input.is_featured {
        post.is_featured = is_featured;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CategoryRepository, SqlxCategoryRepository, SqlxTagRepository, SqlxUserRepository,
        TagRepository, UserRepository,
    };
    use crate::db::{create_test_pool, schema};
    use crate::models::{Category, CreateUserInput};

    struct Fixture {
        posts: SqlxPostRepository,
        users: SqlxUserRepository,
        categories: SqlxCategoryRepository,
        tags: SqlxTagRepository,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        schema::init_schema(&pool).await.expect("Failed to apply schema");
        Fixture {
            posts: SqlxPostRepository::new(pool.clone()),
            users: SqlxUserRepository::new(pool.clone()),
            categories: SqlxCategoryRepository::new(pool.clone()),
            tags: SqlxTagRepository::new(pool),
        }
    }

    async fn sample_author(f: &Fixture) -> i64 {
        f.users
            .create(&CreateUserInput::new("author", "author@example.com"))
            .await
            .expect("create user failed")
            .id
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let f = setup().await;
        let author = sample_author(&f).await;

        let created = f
            .posts
            .create(
                &CreatePostInput::new("First Light", "It begins.")
                    .with_slug("first-light")
                    .with_author(author)
                    .published(),
            )
            .await
            .expect("create failed");
        assert!(created.id > 0);

        let found = f
            .posts
            .get_by_slug("first-light")
            .await
            .expect("get failed")
            .expect("missing");
        assert_eq!(found.title, "First Light");
        assert_eq!(found.author_id, Some(author));
        assert!(found.is_published);
        assert!(!found.is_featured);
    }

    #[tokio::test]
    async fn test_deleting_author_nulls_post_author() {
        let f = setup().await;
        let author = sample_author(&f).await;

        let post = f
            .posts
            .create(
                &CreatePostInput::new("Orphaned", "...")
                    .with_slug("orphaned")
                    .with_author(author),
            )
            .await
            .expect("create failed");

        assert!(f.users.delete(author).await.expect("delete user failed"));

        let post = f
            .posts
            .get_by_id(post.id)
            .await
            .expect("get failed")
            .expect("post should survive its author");
        assert_eq!(post.author_id, None);
    }

    #[tokio::test]
    async fn test_deleting_category_nulls_post_category() {
        let f = setup().await;

        let category = f
            .categories
            .create(&Category::new("Notes".to_string(), "notes".to_string(), None))
            .await
            .expect("create category failed");

        let post = f
            .posts
            .create(
                &CreatePostInput::new("Uncategorized-to-be", "...")
                    .with_slug("uncategorized-to-be")
                    .with_category(category.id),
            )
            .await
            .expect("create failed");

        assert!(f
            .categories
            .delete(category.id)
            .await
            .expect("delete category failed"));

        let post = f
            .posts
            .get_by_id(post.id)
            .await
            .expect("get failed")
            .expect("post should survive its category");
        assert_eq!(post.category_id, None);
    }

    #[tokio::test]
    async fn test_like_count_matches_like_set() {
        let f = setup().await;

        let post = f
            .posts
            .create(&CreatePostInput::new("Popular", "...").with_slug("popular"))
            .await
            .expect("create failed");

        for name in ["ana", "ben", "cho"] {
            let user = f
                .users
                .create(&CreateUserInput::new(name, format!("{name}@example.com")))
                .await
                .expect("create user failed");
            assert!(f
                .posts
                .add_like(post.id, user.id)
                .await
                .expect("like failed"));
        }

        assert_eq!(f.posts.like_count(post.id).await.expect("count failed"), 3);
    }

    #[tokio::test]
    async fn test_duplicate_like_is_noop() {
        let f = setup().await;
        let user = sample_author(&f).await;

        let post = f
            .posts
            .create(&CreatePostInput::new("Once", "...").with_slug("once"))
            .await
            .expect("create failed");

        assert!(f.posts.add_like(post.id, user).await.expect("like failed"));
        assert!(
            !f.posts.add_like(post.id, user).await.expect("relike failed"),
            "second like of the same post by the same user must be a no-op"
        );
        assert_eq!(f.posts.like_count(post.id).await.expect("count failed"), 1);
    }

    #[tokio::test]
    async fn test_unlike_removes_like() {
        let f = setup().await;
        let user = sample_author(&f).await;

        let post = f
            .posts
            .create(&CreatePostInput::new("Fickle", "...").with_slug("fickle"))
            .await
            .expect("create failed");

        f.posts.add_like(post.id, user).await.expect("like failed");
        assert!(f
            .posts
            .is_liked_by(post.id, user)
            .await
            .expect("check failed"));

        assert!(f
            .posts
            .remove_like(post.id, user)
            .await
            .expect("unlike failed"));
        assert_eq!(f.posts.like_count(post.id).await.expect("count failed"), 0);
        assert!(!f
            .posts
            .is_liked_by(post.id, user)
            .await
            .expect("check failed"));
    }

    #[tokio::test]
    async fn test_deleting_liker_removes_like_row() {
        let f = setup().await;
        let user = sample_author(&f).await;

        let post = f
            .posts
            .create(&CreatePostInput::new("Counted", "...").with_slug("counted"))
            .await
            .expect("create failed");

        f.posts.add_like(post.id, user).await.expect("like failed");
        f.users.delete(user).await.expect("delete user failed");

        // Membership rows go with the account; the post itself stays.
        assert_eq!(f.posts.like_count(post.id).await.expect("count failed"), 0);
        assert!(f
            .posts
            .get_by_id(post.id)
            .await
            .expect("get failed")
            .is_some());
    }

    #[tokio::test]
    async fn test_tag_attach_detach() {
        let f = setup().await;

        let post = f
            .posts
            .create(&CreatePostInput::new("Tagged", "...").with_slug("tagged"))
            .await
            .expect("create failed");
        let tag = f
            .tags
            .create(&Tag::new("Async".to_string(), "async".to_string(), None))
            .await
            .expect("create tag failed");

        assert!(f.posts.add_tag(post.id, tag.id).await.expect("tag failed"));
        assert!(
            !f.posts.add_tag(post.id, tag.id).await.expect("retag failed"),
            "duplicate pair must be rejected"
        );

        let tags = f.posts.tags_for_post(post.id).await.expect("list failed");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "Async");

        assert!(f
            .posts
            .remove_tag(post.id, tag.id)
            .await
            .expect("untag failed"));
        assert!(f
            .posts
            .tags_for_post(post.id)
            .await
            .expect("list failed")
            .is_empty());
    }

    #[tokio::test]
    async fn test_deleting_tag_cascades_join_rows() {
        let f = setup().await;

        let post = f
            .posts
            .create(&CreatePostInput::new("Labelled", "...").with_slug("labelled"))
            .await
            .expect("create failed");
        let tag = f
            .tags
            .create(&Tag::new("Old".to_string(), "old".to_string(), None))
            .await
            .expect("create tag failed");

        f.posts.add_tag(post.id, tag.id).await.expect("tag failed");
        f.tags.delete(tag.id).await.expect("delete tag failed");

        assert!(f
            .posts
            .tags_for_post(post.id)
            .await
            .expect("list failed")
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at() {
        let f = setup().await;

        let post = f
            .posts
            .create(&CreatePostInput::new("Draft", "v1").with_slug("draft"))
            .await
            .expect("create failed");

        let updated = f
            .posts
            .update(
                post.id,
                &UpdatePostInput::new()
                    .with_content("v2".to_string())
                    .with_published(true),
            )
            .await
            .expect("update failed")
            .expect("missing");

        assert_eq!(updated.content, "v2");
        assert!(updated.is_published);
        assert!(updated.updated_at >= post.updated_at);
        assert_eq!(updated.created_at, post.created_at);
    }

    #[tokio::test]
    async fn test_list_newest_first_paginated() {
        let f = setup().await;

        for i in 0..5 {
            f.posts
                .create(&CreatePostInput::new(format!("Post {i}"), "...").with_slug(format!("post-{i}")))
                .await
                .expect("create failed");
        }

        let page = f
            .posts
            .list(&ListParams::new(1, 2))
            .await
            .expect("list failed");
        assert_eq!(page.total, 5);
        assert_eq!(page.len(), 2);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.items[0].title, "Post 4");
        assert!(page.has_next());
    }
}
