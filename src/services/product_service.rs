use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::products::{NewListing, UpdateListingForm},
    error::{AppError, AppResult},
    media,
    models::{Category, Product},
    routes::params::FeedQuery,
};

pub fn parse_category(raw: &str) -> AppResult<Category> {
    Category::parse(raw)
        .ok_or_else(|| AppError::Validation(format!("unknown category: {raw}")))
}

pub fn parse_price(raw: &str) -> AppResult<f64> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("price is not a number: {raw}")))?;
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Validation(
            "price must be a non-negative number".to_string(),
        ));
    }
    Ok(price)
}

pub async fn create_listing(
    pool: &DbPool,
    owner_id: Uuid,
    listing: NewListing,
) -> AppResult<Product> {
    if listing.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }

    let image = listing
        .image
        .unwrap_or_else(|| media::PLACEHOLDER_IMAGE.to_string());

    let id = Uuid::new_v4();
    let product: Product = sqlx::query_as(
        r#"
        INSERT INTO products (id, title, description, category, price, image, owner_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(listing.title)
    .bind(listing.description)
    .bind(listing.category)
    .bind(listing.price)
    .bind(image)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    tracing::info!(product_id = %product.id, owner_id = %owner_id, "listing created");
    Ok(product)
}

/// Public feed with optional title search and category filter, combined
/// with AND. Empty parameters count as absent. Insertion order.
pub async fn list_feed(pool: &DbPool, filter: FeedQuery) -> AppResult<Vec<Product>> {
    // An unknown category name can match nothing; skip the round trip.
    let category = match filter.category.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => match Category::parse(raw) {
            Some(c) => Some(c),
            None => return Ok(Vec::new()),
        },
        None => None,
    };
    let search = filter.search.as_deref().filter(|s| !s.is_empty());

    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM products");
    let mut sep = " WHERE ";
    if let Some(category) = category {
        query.push(sep).push("category = ").push_bind(category);
        sep = " AND ";
    }
    if let Some(search) = search {
        query
            .push(sep)
            .push("title ILIKE ")
            .push_bind(format!("%{search}%"));
    }
    query.push(" ORDER BY created_at");

    let products = query
        .build_query_as::<Product>()
        .fetch_all(pool)
        .await?;
    Ok(products)
}

pub async fn list_by_owner(pool: &DbPool, owner_id: Uuid) -> AppResult<Vec<Product>> {
    let products: Vec<Product> =
        sqlx::query_as("SELECT * FROM products WHERE owner_id = $1 ORDER BY created_at")
            .bind(owner_id)
            .fetch_all(pool)
            .await?;
    Ok(products)
}

pub async fn get_listing(pool: &DbPool, id: Uuid) -> AppResult<Product> {
    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    product.ok_or(AppError::NotFound)
}

/// Fetch a listing for its owner's edit form; any non-owner gets the same
/// refusal whether or not the product exists.
pub async fn get_owned_listing(pool: &DbPool, owner_id: Uuid, id: Uuid) -> AppResult<Product> {
    let product: Option<Product> =
        sqlx::query_as("SELECT * FROM products WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await?;
    product.ok_or(AppError::NotAuthorized)
}

/// Owner-only update of title, category, description and price. The image
/// reference never changes on edit.
pub async fn update_listing(
    pool: &DbPool,
    owner_id: Uuid,
    id: Uuid,
    form: UpdateListingForm,
) -> AppResult<Product> {
    let category = parse_category(&form.category)?;
    let price = parse_price(&form.price)?;
    if form.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }

    let product: Option<Product> = sqlx::query_as(
        r#"
        UPDATE products
        SET title = $3, category = $4, description = $5, price = $6
        WHERE id = $1 AND owner_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(form.title)
    .bind(category)
    .bind(form.description)
    .bind(price)
    .fetch_optional(pool)
    .await?;

    let product = product.ok_or(AppError::NotAuthorized)?;
    tracing::info!(product_id = %product.id, "listing updated");
    Ok(product)
}

/// Owner-only delete with caller-side referential cleanup: dependent
/// purchase and cart rows go first, then the product, all in one
/// transaction. The ownership check runs before any purge, so a non-owner
/// attempt leaves every row in place.
pub async fn delete_listing(pool: &DbPool, owner_id: Uuid, id: Uuid) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let owned: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM products WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&mut *tx)
            .await?;
    if owned.is_none() {
        return Err(AppError::NotAuthorized);
    }

    sqlx::query("DELETE FROM purchases WHERE product_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM cart_items WHERE product_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM products WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(product_id = %id, "listing deleted");
    Ok(())
}
