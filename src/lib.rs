//! Inkpress - blog data backend
//!
//! Relational schema, repositories, and admin registry for a small blog:
//! six entities (Site, User, Category, Tag, Post, Comment), their
//! referential-integrity rules, and the descriptors behind the admin's
//! list views.

pub mod admin;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
