use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Fixed set of listing categories, stored as the `product_category`
/// Postgres enum. The feed filter and the listing forms both parse into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_category", rename_all = "PascalCase")]
pub enum Category {
    Clothing,
    Electronics,
    Books,
    Home,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Clothing,
        Category::Electronics,
        Category::Books,
        Category::Home,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Clothing => "Clothing",
            Category::Electronics => "Electronics",
            Category::Books => "Books",
            Category::Home => "Home",
            Category::Other => "Other",
        }
    }

    /// Exact-name lookup, `None` for anything outside the fixed set.
    pub fn parse(raw: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == raw)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: f64,
    /// Relative media reference, e.g. `products/<file>` or the placeholder.
    pub image: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Persisted login session. A row here is what keeps a bearer token alive;
/// logout deletes the row and the token dies with it.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
