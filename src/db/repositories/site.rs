//! Site repository
//!
//! Database operations for the site settings row. The blog treats the most
//! recently saved row as the active site; older rows are kept but ignored.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Site, UpdateSiteInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Site repository trait
#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// Save a new site settings row
    async fn save(&self, site: &Site) -> Result<Site>;

    /// Get the active (most recently saved) site settings
    async fn get(&self) -> Result<Option<Site>>;

    /// Apply a partial update to the site with the given ID.
    /// Returns the updated row, or None when the ID does not exist.
    async fn update(&self, id: i64, input: &UpdateSiteInput) -> Result<Option<Site>>;
}

/// SQLx-based site repository implementation
pub struct SqlxSiteRepository {
    pool: DynDatabasePool,
}

impl SqlxSiteRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SiteRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SiteRepository for SqlxSiteRepository {
    async fn save(&self, site: &Site) -> Result<Site> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => save_sqlite(self.pool.as_sqlite().unwrap(), site).await,
            DatabaseDriver::Mysql => save_mysql(self.pool.as_mysql().unwrap(), site).await,
        }
    }

    async fn get(&self) -> Result<Option<Site>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => get_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn update(&self, id: i64, input: &UpdateSiteInput) -> Result<Option<Site>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.as_sqlite().unwrap(), id, input).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.as_mysql().unwrap(), id, input).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn save_sqlite(pool: &SqlitePool, site: &Site) -> Result<Site> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO sites (name, description, logo, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&site.name)
    .bind(&site.description)
    .bind(&site.logo)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to save site")?;

    Ok(Site {
        id: result.last_insert_rowid(),
        name: site.name.clone(),
        description: site.description.clone(),
        logo: site.logo.clone(),
        created_at: now,
    })
}

async fn get_sqlite(pool: &SqlitePool) -> Result<Option<Site>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, description, logo, created_at
        FROM sites
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await
    .context("Failed to get site")?;

    match row {
        Some(row) => Ok(Some(row_to_site_sqlite(&row))),
        None => Ok(None),
    }
}

async fn update_sqlite(pool: &SqlitePool, id: i64, input: &UpdateSiteInput) -> Result<Option<Site>> {
    let Some(mut site) = fetch_by_id_sqlite(pool, id).await? else {
        return Ok(None);
    };
    apply_update(&mut site, input);

    sqlx::query(
        r#"
        UPDATE sites SET name = ?, description = ?, logo = ?
        WHERE id = ?
        "#,
    )
    .bind(&site.name)
    .bind(&site.description)
    .bind(&site.logo)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update site")?;

    Ok(Some(site))
}

async fn fetch_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Site>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, description, logo, created_at
        FROM sites
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get site by ID")?;

    Ok(row.map(|row| row_to_site_sqlite(&row)))
}

fn row_to_site_sqlite(row: &sqlx::sqlite::SqliteRow) -> Site {
    Site {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        logo: row.get("logo"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn save_mysql(pool: &MySqlPool, site: &Site) -> Result<Site> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO sites (name, description, logo, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&site.name)
    .bind(&site.description)
    .bind(&site.logo)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to save site")?;

    Ok(Site {
        id: result.last_insert_id() as i64,
        name: site.name.clone(),
        description: site.description.clone(),
        logo: site.logo.clone(),
        created_at: now,
    })
}

async fn get_mysql(pool: &MySqlPool) -> Result<Option<Site>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, description, logo, created_at
        FROM sites
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await
    .context("Failed to get site")?;

    match row {
        Some(row) => Ok(Some(row_to_site_mysql(&row))),
        None => Ok(None),
    }
}

async fn update_mysql(pool: &MySqlPool, id: i64, input: &UpdateSiteInput) -> Result<Option<Site>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, description, logo, created_at
        FROM sites
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get site by ID")?;

    let Some(mut site) = row.map(|row| row_to_site_mysql(&row)) else {
        return Ok(None);
    };
    apply_update(&mut site, input);

    sqlx::query(
        r#"
        UPDATE sites SET name = ?, description = ?, logo = ?
        WHERE id = ?
        "#,
    )
    .bind(&site.name)
    .bind(&site.description)
    .bind(&site.logo)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update site")?;

    Ok(Some(site))
}

fn row_to_site_mysql(row: &sqlx::mysql::MySqlRow) -> Site {
    Site {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        logo: row.get("logo"),
        created_at: row.get("created_at"),
    }
}

fn apply_update(site: &mut Site, input: &UpdateSiteInput) {
    if let Some(name) = &input.name {
        site.name = name.clone();
    }
    if let Some(description) = &input.description {
        site.description = description.clone();
    }
    if let Some(logo) = &input.logo {
        site.logo = Some(logo.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, schema};

    async fn setup() -> (DynDatabasePool, SqlxSiteRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        schema::init_schema(&pool).await.expect("Failed to apply schema");
        let repo = SqlxSiteRepository::new(pool.clone());
        (pool, repo)
    }

    #[tokio::test]
    async fn test_get_returns_none_before_save() {
        let (_pool, repo) = setup().await;
        assert!(repo.get().await.expect("get failed").is_none());
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let (_pool, repo) = setup().await;

        let saved = repo
            .save(&Site::new(
                "Inkpress".to_string(),
                "A quiet blog".to_string(),
                Some("site/logo/ink.png".to_string()),
            ))
            .await
            .expect("save failed");
        assert!(saved.id > 0);

        let current = repo.get().await.expect("get failed").expect("no site");
        assert_eq!(current.name, "Inkpress");
        assert_eq!(current.logo.as_deref(), Some("site/logo/ink.png"));
    }

    #[tokio::test]
    async fn test_get_returns_latest_row() {
        let (_pool, repo) = setup().await;

        repo.save(&Site::new("Old".to_string(), "".to_string(), None))
            .await
            .expect("save failed");
        repo.save(&Site::new("New".to_string(), "".to_string(), None))
            .await
            .expect("save failed");

        let current = repo.get().await.expect("get failed").expect("no site");
        assert_eq!(current.name, "New");
    }

    #[tokio::test]
    async fn test_update_partial() {
        let (_pool, repo) = setup().await;

        let saved = repo
            .save(&Site::new("Inkpress".to_string(), "Before".to_string(), None))
            .await
            .expect("save failed");

        let updated = repo
            .update(
                saved.id,
                &UpdateSiteInput::new().with_description("After".to_string()),
            )
            .await
            .expect("update failed")
            .expect("site missing");

        assert_eq!(updated.name, "Inkpress");
        assert_eq!(updated.description, "After");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_none() {
        let (_pool, repo) = setup().await;
        let result = repo
            .update(999, &UpdateSiteInput::new().with_name("x".to_string()))
            .await
            .expect("update failed");
        assert!(result.is_none());
    }
}
