//! Database layer
//!
//! Storage for the blog data model, supporting:
//! - SQLite (default, for single-binary deployment)
//! - MySQL (for larger deployments)
//!
//! The driver is selected from configuration; repositories dispatch on the
//! pool's driver to pick the backend-specific query path.
//!
//! # Usage
//!
//! ```ignore
//! use inkpress::config::DatabaseConfig;
//! use inkpress::db::{create_pool, schema};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! schema::init_schema(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod pool;
pub mod repositories;
pub mod schema;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
