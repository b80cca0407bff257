use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_marketplace::{config::AppConfig, db::create_pool, models::Category};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let alice_id = ensure_user(&pool, "alice@example.com", "alice", "alice123").await?;
    let bob_id = ensure_user(&pool, "bob@example.com", "bob", "bob123").await?;
    seed_products(&pool, alice_id, bob_id).await?;

    println!("Seed completed. Alice ID: {alice_id}, Bob ID: {bob_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    username: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, username, password_hash)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(username)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    // If the user already exists, fetch the id.
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email}");
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool, alice_id: Uuid, bob_id: Uuid) -> anyhow::Result<()> {
    let products = vec![
        ("Old Armchair", "Worn but comfy reading chair", Category::Home, 45.0, alice_id),
        ("Paperback Bundle", "Twelve assorted novels", Category::Books, 18.5, alice_id),
        ("Denim Jacket", "Lightly used, size M", Category::Clothing, 25.0, bob_id),
        ("USB Keyboard", "Mechanical, blue switches", Category::Electronics, 30.0, bob_id),
    ];

    for (title, desc, category, price, owner_id) in products {
        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM products WHERE title = $1 AND owner_id = $2")
                .bind(title)
                .bind(owner_id)
                .fetch_optional(pool)
                .await?;
        if exists.is_some() {
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO products (id, title, description, category, price, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(desc)
        .bind(category)
        .bind(price)
        .bind(owner_id)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
