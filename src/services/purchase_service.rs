use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppResult,
    models::Product,
};

/// Convert the whole cart snapshot into purchase rows and clear it, in one
/// transaction. A failure anywhere rolls everything back, so the cart is
/// never emptied without the matching purchases or vice versa.
pub async fn checkout(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<Uuid>> {
    let mut tx = pool.begin().await?;

    let items: Vec<(Uuid,)> =
        sqlx::query_as("SELECT product_id FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await?;

    let mut purchase_ids = Vec::with_capacity(items.len());
    for (product_id,) in &items {
        let purchase_id = Uuid::new_v4();
        sqlx::query("INSERT INTO purchases (id, user_id, product_id) VALUES ($1, $2, $3)")
            .bind(purchase_id)
            .bind(user_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;
        purchase_ids.push(purchase_id);
    }

    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(user_id = %user_id, count = purchase_ids.len(), "checkout complete");
    Ok(purchase_ids)
}

/// Past purchases joined to their product rows. Purchases whose product
/// was since deleted drop out of the join.
pub async fn list_history(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<Product>> {
    let products: Vec<Product> = sqlx::query_as(
        r#"
        SELECT p.*
        FROM purchases pu
        JOIN products p ON p.id = pu.product_id
        WHERE pu.user_id = $1
        ORDER BY pu.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(products)
}
