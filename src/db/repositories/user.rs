//! User repository
//!
//! Database operations for user accounts. Deleting a user leaves authored
//! posts and comments behind with a null author (FK SET NULL), while like
//! rows cascade away with the account.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{CreateUserInput, UpdateUserInput, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, input: &CreateUserInput) -> Result<User>;

    /// Get user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get user by username
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    /// List all users ordered by join date
    async fn list(&self) -> Result<Vec<User>>;

    /// Apply a partial update; returns the updated row, None when missing
    async fn update(&self, id: i64, input: &UpdateUserInput) -> Result<Option<User>>;

    /// Delete a user. Returns true when a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: DynDatabasePool,
}

impl SqlxUserRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, input: &CreateUserInput) -> Result<User> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().unwrap(), input).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().unwrap(), input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_by_username_sqlite(self.pool.as_sqlite().unwrap(), username).await
            }
            DatabaseDriver::Mysql => {
                get_by_username_mysql(self.pool.as_mysql().unwrap(), username).await
            }
        }
    }

    async fn list(&self) -> Result<Vec<User>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn update(&self, id: i64, input: &UpdateUserInput) -> Result<Option<User>> {
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
}

const USER_COLUMNS: &str =
    "id, username, first_name, last_name, email, date_joined, avatar, bio, location, website";

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_sqlite(pool: &SqlitePool, input: &CreateUserInput) -> Result<User> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO users
            (username, first_name, last_name, email, date_joined, avatar, bio, location, website)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.username)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.email)
    .bind(now)
    .bind(&input.avatar)
    .bind(&input.bio)
    .bind(&input.location)
    .bind(&input.website)
    .execute(pool)
    .await
    .context("Failed to create user")?;

    Ok(User {
        id: result.last_insert_rowid(),
        username: input.username.clone(),
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        email: input.email.clone(),
        date_joined: now,
        avatar: input.avatar.clone(),
        bio: input.bio.clone(),
        location: input.location.clone(),
        website: input.website.clone(),
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by ID")?;

    Ok(row.map(|row| row_to_user_sqlite(&row)))
}

async fn get_by_username_sqlite(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
    .context("Failed to get user by username")?;

    Ok(row.map(|row| row_to_user_sqlite(&row)))
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY date_joined, id"
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list users")?;

    Ok(rows.iter().map(row_to_user_sqlite).collect())
}

async fn update_sqlite(pool: &SqlitePool, id: i64, input: &UpdateUserInput) -> Result<Option<User>> {
    let Some(mut user) = get_by_id_sqlite(pool, id).await? else {
        return Ok(None);
    };
    apply_update(&mut user, input);

    sqlx::query(
        r#"
        UPDATE users
        SET first_name = ?, last_name = ?, email = ?, avatar = ?, bio = ?, location = ?, website = ?
        WHERE id = ?
        "#,
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&user.avatar)
    .bind(&user.bio)
    .bind(&user.location)
    .bind(&user.website)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update user")?;

    Ok(Some(user))
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete user")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_user_sqlite(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        date_joined: row.get("date_joined"),
        avatar: row.get("avatar"),
        bio: row.get("bio"),
        location: row.get("location"),
        website: row.get("website"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_mysql(pool: &MySqlPool, input: &CreateUserInput) -> Result<User> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO users
            (username, first_name, last_name, email, date_joined, avatar, bio, location, website)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.username)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.email)
    .bind(now)
    .bind(&input.avatar)
    .bind(&input.bio)
    .bind(&input.location)
    .bind(&input.website)
    .execute(pool)
    .await
    .context("Failed to create user")?;

    Ok(User {
        id: result.last_insert_id() as i64,
        username: input.username.clone(),
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        email: input.email.clone(),
        date_joined: now,
        avatar: input.avatar.clone(),
        bio: input.bio.clone(),
        location: input.location.clone(),
        website: input.website.clone(),
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by ID")?;

    Ok(row.map(|row| row_to_user_mysql(&row)))
}

async fn get_by_username_mysql(pool: &MySqlPool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
    .context("Failed to get user by username")?;

    Ok(row.map(|row| row_to_user_mysql(&row)))
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY date_joined, id"
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list users")?;

    Ok(rows.iter().map(row_to_user_mysql).collect())
}

async fn update_mysql(pool: &MySqlPool, id: i64, input: &UpdateUserInput) -> Result<Option<User>> {
    let Some(mut user) = get_by_id_mysql(pool, id).await? else {
        return Ok(None);
    };
    apply_update(&mut user, input);

    sqlx::query(
        r#"
        UPDATE users
        SET first_name = ?, last_name = ?, email = ?, avatar = ?, bio = ?, location = ?, website = ?
        WHERE id = ?
        "#,
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&user.avatar)
    .bind(&user.bio)
    .bind(&user.location)
    .bind(&user.website)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update user")?;

    Ok(Some(user))
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete user")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_user_mysql(row: &sqlx::mysql::MySqlRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        date_joined: row.get("date_joined"),
        avatar: row.get("avatar"),
        bio: row.get("bio"),
        location: row.get("location"),
        website: row.get("website"),
    }
}

fn apply_update(user: &mut User, input: &UpdateUserInput) {
    if let Some(first_name) = &input.first_name {
        user.first_name = first_name.clone();
    }
    if let Some(last_name) = &input.last_name {
        user.last_name = last_name.clone();
    }
    if let Some(email) = &input.email {
        user.email = email.clone();
    }
    if let Some(avatar) = &input.avatar {
        user.avatar = Some(avatar.clone());
    }
    if let Some(bio) = &input.bio {
        user.bio = Some(bio.clone());
    }
    if let Some(location) = &input.location {
        user.location = Some(location.clone());
    }
    if let Some(website) = &input.website {
        user.website = Some(website.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, schema};

    async fn setup() -> SqlxUserRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        schema::init_schema(&pool).await.expect("Failed to apply schema");
        SqlxUserRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = setup().await;

        let created = repo
            .create(
                &CreateUserInput::new("amara", "amara@example.com")
                    .with_name("Amara", "Okafor")
                    .with_bio("Writes about storage engines"),
            )
            .await
            .expect("create failed");
        assert!(created.id > 0);

        let by_name = repo
            .get_by_username("amara")
            .await
            .expect("get failed")
            .expect("missing");
        assert_eq!(by_name.email, "amara@example.com");
        assert_eq!(by_name.bio.as_deref(), Some("Writes about storage engines"));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = setup().await;

        repo.create(&CreateUserInput::new("dana", "dana@example.com"))
            .await
            .expect("first create failed");

        let dup = repo
            .create(&CreateUserInput::new("dana", "other@example.com"))
            .await;
        assert!(dup.is_err(), "usernames are unique");
    }

    #[tokio::test]
    async fn test_update_profile_fields() {
        let repo = setup().await;

        let created = repo
            .create(&CreateUserInput::new("remy", "remy@example.com"))
            .await
            .expect("create failed");

        let mut input = UpdateUserInput::new();
        input.location = Some("Lyon".to_string());
        input.website = Some("https://remy.example".to_string());

        let updated = repo
            .update(created.id, &input)
            .await
            .expect("update failed")
            .expect("missing");
        assert_eq!(updated.location.as_deref(), Some("Lyon"));
        assert_eq!(updated.username, "remy");
    }

    #[tokio::test]
    async fn test_list_in_join_order() {
        let repo = setup().await;

        repo.create(&CreateUserInput::new("first", "f@example.com"))
            .await
            .expect("create failed");
        repo.create(&CreateUserInput::new("second", "s@example.com"))
            .await
            .expect("create failed");

        let all = repo.list().await.expect("list failed");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].username, "first");
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup().await;

        let created = repo
            .create(&CreateUserInput::new("gone", "gone@example.com"))
            .await
            .expect("create failed");

        assert!(repo.delete(created.id).await.expect("delete failed"));
        assert!(repo
            .get_by_id(created.id)
            .await
            .expect("get failed")
            .is_none());
    }
}
