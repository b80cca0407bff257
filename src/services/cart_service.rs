use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, AppResult},
    models::Product,
};

/// Put a product in the user's cart. Carting one's own listing is refused;
/// a product already in the cart stays a single line.
pub async fn add_to_cart(pool: &DbPool, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
    let owner: Option<(Uuid,)> = sqlx::query_as("SELECT owner_id FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    let (owner_id,) = owner.ok_or(AppError::NotFound)?;
    if owner_id == user_id {
        return Err(AppError::SelfPurchase);
    }

    let exist: Option<(Uuid,)> =
        sqlx::query_as("SELECT user_id FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .fetch_optional(pool)
            .await?;
    if exist.is_none() {
        // ON CONFLICT covers a concurrent duplicate add.
        sqlx::query(
            "INSERT INTO cart_items (user_id, product_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await?;
    }

    tracing::info!(user_id = %user_id, product_id = %product_id, "added to cart");
    Ok(())
}

/// Idempotent removal; a missing line is already the desired state.
pub async fn remove_from_cart(pool: &DbPool, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await?;

    tracing::info!(user_id = %user_id, product_id = %product_id, "removed from cart");
    Ok(())
}

pub async fn list_cart(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<Product>> {
    let products: Vec<Product> = sqlx::query_as(
        r#"
        SELECT p.*
        FROM cart_items c
        JOIN products p ON p.id = c.product_id
        WHERE c.user_id = $1
        ORDER BY c.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(products)
}
