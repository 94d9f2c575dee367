//! Administrative surface
//!
//! The in-repo half of the admin interface: per-model descriptors for list
//! views (column sets, slug prepopulation sources) and the queries backing
//! them. Rendering, routing, and authentication belong to the surrounding
//! deployment; this module only declares what each model's changelist shows
//! and produces the rows.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;

use crate::config::DatabaseDriver;
use crate::db::repositories::{
    CategoryRepository, PostRepository, TagRepository, UserRepository,
};
use crate::db::DynDatabasePool;
use crate::models::ListParams;
use crate::services::slug;

/// Display descriptor for one registered model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAdmin {
    /// Model key, lowercase singular
    pub model: &'static str,
    /// Plural label shown in the admin index; the numeric prefixes fix the
    /// ordering of the index (inherited from the upstream admin).
    pub verbose_name_plural: &'static str,
    /// Columns of the changelist, in display order
    pub list_display: &'static [&'static str],
    /// Field whose value prepopulates the slug while editing, if any
    pub slug_source: Option<&'static str>,
}

/// All registered models, in admin-index order.
static REGISTRY: Lazy<Vec<ModelAdmin>> = Lazy::new(|| {
    vec![
        ModelAdmin {
            model: "site",
            verbose_name_plural: "1. Site",
            list_display: &["name"],
            slug_source: None,
        },
        ModelAdmin {
            model: "user",
            verbose_name_plural: "2. Users",
            list_display: &["username", "first_name", "last_name", "email", "date_joined"],
            slug_source: None,
        },
        ModelAdmin {
            model: "category",
            verbose_name_plural: "3. Categories",
            list_display: &["name"],
            slug_source: Some("name"),
        },
        ModelAdmin {
            model: "tag",
            verbose_name_plural: "4. Tags",
            list_display: &["name"],
            slug_source: Some("name"),
        },
        ModelAdmin {
            model: "post",
            verbose_name_plural: "5. Posts",
            list_display: &["title"],
            slug_source: Some("title"),
        },
        ModelAdmin {
            model: "comment",
            verbose_name_plural: "6. Comments",
            list_display: &["content"],
            slug_source: None,
        },
    ]
});

/// The full model registry, in admin-index order.
pub fn registry() -> &'static [ModelAdmin] {
    &REGISTRY
}

/// Look up a registered model by its key.
pub fn find(model: &str) -> Option<&'static ModelAdmin> {
    REGISTRY.iter().find(|entry| entry.model == model)
}

/// Derive the slug value for an edit form from its source field.
pub fn prepopulate_slug(source_value: &str) -> String {
    slug::generate(source_value)
}

/// A rendered changelist: column headers plus one row of display strings
/// per entity.
#[derive(Debug, Clone)]
pub struct Changelist {
    pub model: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<String>>,
}

impl Changelist {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Changelist for users: username, names, email, join date.
pub async fn user_changelist(repo: &dyn UserRepository) -> Result<Changelist> {
    let admin = find("user").expect("user is registered");
    let rows = repo
        .list()
        .await?
        .into_iter()
        .map(|user| {
            vec![
                user.username.clone(),
                user.first_name.clone(),
                user.last_name.clone(),
                user.email.clone(),
                user.date_joined.to_rfc3339(),
            ]
        })
        .collect();

    Ok(Changelist {
        model: admin.model,
        columns: admin.list_display,
        rows,
    })
}

/// Changelist for categories.
pub async fn category_changelist(repo: &dyn CategoryRepository) -> Result<Changelist> {
    let admin = find("category").expect("category is registered");
    let rows = repo
        .list()
        .await?
        .into_iter()
        .map(|category| vec![category.to_string()])
        .collect();

    Ok(Changelist {
        model: admin.model,
        columns: admin.list_display,
        rows,
    })
}

/// Changelist for tags.
pub async fn tag_changelist(repo: &dyn TagRepository) -> Result<Changelist> {
    let admin = find("tag").expect("tag is registered");
    let rows = repo
        .list()
        .await?
        .into_iter()
        .map(|tag| vec![tag.to_string()])
        .collect();

    Ok(Changelist {
        model: admin.model,
        columns: admin.list_display,
        rows,
    })
}

/// Changelist for posts, newest first.
pub async fn post_changelist(
    repo: &dyn PostRepository,
    params: &ListParams,
) -> Result<Changelist> {
    let admin = find("post").expect("post is registered");
    let rows = repo
        .list(params)
        .await?
        .items
        .into_iter()
        .map(|post| vec![post.to_string()])
        .collect();

    Ok(Changelist {
        model: admin.model,
        columns: admin.list_display,
        rows,
    })
}

/// Entity counts for the admin index page.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_categories: i64,
    pub total_tags: i64,
    pub total_posts: i64,
    pub published_posts: i64,
    pub total_comments: i64,
}

/// Count every entity for the admin index page.
pub async fn dashboard_stats(pool: &DynDatabasePool) -> Result<DashboardStats> {
    Ok(DashboardStats {
        total_users: count(pool, "SELECT COUNT(*) FROM users").await?,
        total_categories: count(pool, "SELECT COUNT(*) FROM categories").await?,
        total_tags: count(pool, "SELECT COUNT(*) FROM tags").await?,
        total_posts: count(pool, "SELECT COUNT(*) FROM posts").await?,
        published_posts: count(pool, "SELECT COUNT(*) FROM posts WHERE is_published = 1").await?,
        total_comments: count(pool, "SELECT COUNT(*) FROM comments").await?,
    })
}

async fn count(pool: &DynDatabasePool, query: &str) -> Result<i64> {
    match pool.driver() {
        DatabaseDriver::Sqlite => sqlx::query_scalar(query)
            .fetch_one(pool.as_sqlite().unwrap())
            .await
            .with_context(|| format!("Failed to run count: {}", query)),
        DatabaseDriver::Mysql => sqlx::query_scalar(query)
            .fetch_one(pool.as_mysql().unwrap())
            .await
            .with_context(|| format!("Failed to run count: {}", query)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        SqlxCategoryRepository, SqlxPostRepository, SqlxTagRepository, SqlxUserRepository,
    };
    use crate::db::repositories::{
        CategoryRepository as _, PostRepository as _, TagRepository as _, UserRepository as _,
    };
    use crate::db::{create_test_pool, schema};
    use crate::models::{Category, CreatePostInput, CreateUserInput, Tag};

    #[test]
    fn test_registry_order_and_labels() {
        let models: Vec<&str> = registry().iter().map(|m| m.model).collect();
        assert_eq!(
            models,
            vec!["site", "user", "category", "tag", "post", "comment"]
        );
        assert_eq!(registry()[0].verbose_name_plural, "1. Site");
    }

    #[test]
    fn test_slug_sources() {
        assert_eq!(find("category").unwrap().slug_source, Some("name"));
        assert_eq!(find("tag").unwrap().slug_source, Some("name"));
        assert_eq!(find("post").unwrap().slug_source, Some("title"));
        assert_eq!(find("user").unwrap().slug_source, None);
        assert!(find("unknown").is_none());
    }

    #[test]
    fn test_prepopulate_slug() {
        assert_eq!(prepopulate_slug("My First Post"), "my-first-post");
    }

    #[tokio::test]
    async fn test_user_changelist() {
        let pool = create_test_pool().await.expect("Failed to create pool");
        schema::init_schema(&pool).await.expect("Failed to apply schema");
        let repo = SqlxUserRepository::new(pool);

        repo.create(&CreateUserInput::new("nadia", "nadia@example.com").with_name("Nadia", "Kamel"))
            .await
            .expect("create failed");
        repo.create(&CreateUserInput::new("tomas", "tomas@example.com"))
            .await
            .expect("create failed");

        let list = user_changelist(&repo).await.expect("changelist failed");
        assert_eq!(
            list.columns,
            &["username", "first_name", "last_name", "email", "date_joined"]
        );
        assert_eq!(list.len(), 2);
        assert_eq!(list.rows[0][0], "nadia");
        assert_eq!(list.rows[0][1], "Nadia");
    }

    #[tokio::test]
    async fn test_category_and_tag_changelists() {
        let pool = create_test_pool().await.expect("Failed to create pool");
        schema::init_schema(&pool).await.expect("Failed to apply schema");

        let categories = SqlxCategoryRepository::new(pool.clone());
        let tags = SqlxTagRepository::new(pool);

        categories
            .create(&Category::new("Essays".to_string(), "essays".to_string(), None))
            .await
            .expect("create failed");
        tags.create(&Tag::new("Longform".to_string(), "longform".to_string(), None))
            .await
            .expect("create failed");

        let cats = category_changelist(&categories).await.expect("changelist failed");
        assert_eq!(cats.rows, vec![vec!["Essays".to_string()]]);

        let tag_list = tag_changelist(&tags).await.expect("changelist failed");
        assert_eq!(tag_list.rows, vec![vec!["Longform".to_string()]]);
    }

    #[tokio::test]
    async fn test_post_changelist_and_dashboard() {
        let pool = create_test_pool().await.expect("Failed to create pool");
        schema::init_schema(&pool).await.expect("Failed to apply schema");

        let posts = SqlxPostRepository::new(pool.clone());
        posts
            .create(&CreatePostInput::new("Drafted", "...").with_slug("drafted"))
            .await
            .expect("create failed");
        posts
            .create(
                &CreatePostInput::new("Shipped", "...")
                    .with_slug("shipped")
                    .published(),
            )
            .await
            .expect("create failed");

        let list = post_changelist(&posts, &ListParams::default())
            .await
            .expect("changelist failed");
        assert_eq!(list.len(), 2);

        let stats = dashboard_stats(&pool).await.expect("stats failed");
        assert_eq!(stats.total_posts, 2);
        assert_eq!(stats.published_posts, 1);
        assert_eq!(stats.total_users, 0);
    }
}
