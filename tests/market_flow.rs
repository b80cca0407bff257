use axum::extract::FromRequestParts;
use axum::http::{Request, header};
use axum_marketplace::{
    db::{DbPool, create_pool},
    dto::auth::{LoginForm, RegisterForm},
    dto::products::{NewListing, UpdateListingForm},
    error::AppError,
    middleware::auth::AuthUser,
    models::{Category, Product},
    services::{auth_service, cart_service, product_service, purchase_service},
    state::AppState,
};
use uuid::Uuid;

// Integration flows against a real database. Every test uses identities
// unique to the run, so they are safe to run in parallel and need no
// cleanup between runs.

async fn setup_pool() -> anyhow::Result<Option<DbPool>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(Some(pool))
}

fn unique(tag: &str) -> String {
    format!("{tag}-{}", Uuid::new_v4().simple())
}

async fn register(pool: &DbPool, tag: &str) -> anyhow::Result<Uuid> {
    let suffix = unique(tag);
    let profile = auth_service::register_user(
        pool,
        RegisterForm {
            email: format!("{suffix}@example.com"),
            username: suffix,
            password: "hunter2!".to_string(),
        },
    )
    .await?;
    Ok(profile.id)
}

async fn listing(pool: &DbPool, owner_id: Uuid, title: &str) -> anyhow::Result<Product> {
    let product = product_service::create_listing(
        pool,
        owner_id,
        NewListing {
            title: title.to_string(),
            description: "integration test listing".to_string(),
            category: Category::Other,
            price: 10.0,
            image: None,
        },
    )
    .await?;
    Ok(product)
}

#[tokio::test]
async fn register_login_logout_round_trip() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    // Only this test touches JWT_SECRET; nothing else in the binary reads it.
    unsafe { std::env::set_var("JWT_SECRET", "integration-test-secret") };

    let suffix = unique("auth");
    let email = format!("{suffix}@example.com");
    auth_service::register_user(
        &pool,
        RegisterForm {
            email: email.clone(),
            username: suffix,
            password: "correct horse".to_string(),
        },
    )
    .await?;

    // Wrong password is a generic credential failure.
    let wrong = auth_service::login_user(
        &pool,
        LoginForm {
            email: email.clone(),
            password: "battery staple".to_string(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

    let token = auth_service::login_user(
        &pool,
        LoginForm {
            email,
            password: "correct horse".to_string(),
        },
    )
    .await?
    .token;

    let state = AppState {
        pool: pool.clone(),
        media_root: std::env::temp_dir(),
    };

    let user = resolve_bearer(&state, &token).await.expect("fresh token resolves");

    auth_service::logout_user(&pool, &user).await?;

    // The session row is gone; the same token must stop resolving.
    let after_logout = resolve_bearer(&state, &token).await;
    assert!(matches!(after_logout, Err(AppError::InvalidCredentials)));

    Ok(())
}

async fn resolve_bearer(state: &AppState, token: &str) -> Result<AuthUser, AppError> {
    let (mut parts, _) = Request::builder()
        .uri("/dashboard")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(())
        .expect("request")
        .into_parts();
    AuthUser::from_request_parts(&mut parts, state).await
}

#[tokio::test]
async fn duplicate_email_registration_is_rejected() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };

    let suffix = unique("dup");
    let email = format!("{suffix}@example.com");
    auth_service::register_user(
        &pool,
        RegisterForm {
            email: email.clone(),
            username: format!("{suffix}-a"),
            password: "pw".to_string(),
        },
    )
    .await?;

    let second = auth_service::register_user(
        &pool,
        RegisterForm {
            email: email.clone(),
            username: format!("{suffix}-b"),
            password: "pw".to_string(),
        },
    )
    .await;
    assert!(matches!(second, Err(AppError::DuplicateRegistration)));

    let count: (i64,) = sqlx::query_as("SELECT count(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await?;
    assert_eq!(count.0, 1, "no second user row may exist");

    Ok(())
}

#[tokio::test]
async fn non_owner_can_neither_edit_nor_delete() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };

    let owner = register(&pool, "owner").await?;
    let stranger = register(&pool, "stranger").await?;
    let product = listing(&pool, owner, "Owner Lamp").await?;

    let edit = product_service::update_listing(
        &pool,
        stranger,
        product.id,
        UpdateListingForm {
            title: "Stolen Lamp".to_string(),
            category: "Home".to_string(),
            description: "nope".to_string(),
            price: "1".to_string(),
        },
    )
    .await;
    assert!(matches!(edit, Err(AppError::NotAuthorized)));

    // Put the product in the stranger's cart, then have the stranger try to
    // delete the listing: the refusal must leave the cart line untouched.
    cart_service::add_to_cart(&pool, stranger, product.id).await?;
    let delete = product_service::delete_listing(&pool, stranger, product.id).await;
    assert!(matches!(delete, Err(AppError::NotAuthorized)));

    let still_there = product_service::get_listing(&pool, product.id).await?;
    assert_eq!(still_there.title, "Owner Lamp");

    let cart = cart_service::list_cart(&pool, stranger).await?;
    assert_eq!(cart.len(), 1, "failed delete must not purge cart rows");

    Ok(())
}

#[tokio::test]
async fn own_product_cannot_be_carted() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };

    let owner = register(&pool, "selfbuy").await?;
    let product = listing(&pool, owner, "My Own Mug").await?;

    let result = cart_service::add_to_cart(&pool, owner, product.id).await;
    assert!(matches!(result, Err(AppError::SelfPurchase)));

    let cart = cart_service::list_cart(&pool, owner).await?;
    assert!(cart.is_empty());

    Ok(())
}

#[tokio::test]
async fn re_adding_a_carted_product_is_a_no_op() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };

    let owner = register(&pool, "seller").await?;
    let buyer = register(&pool, "buyer").await?;
    let product = listing(&pool, owner, "Popular Chair").await?;

    cart_service::add_to_cart(&pool, buyer, product.id).await?;
    cart_service::add_to_cart(&pool, buyer, product.id).await?;

    let cart = cart_service::list_cart(&pool, buyer).await?;
    assert_eq!(cart.len(), 1, "exactly one cart line per (user, product)");

    cart_service::remove_from_cart(&pool, buyer, product.id).await?;
    // Removing again is fine.
    cart_service::remove_from_cart(&pool, buyer, product.id).await?;
    assert!(cart_service::list_cart(&pool, buyer).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn checkout_converts_the_whole_cart() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };

    let owner = register(&pool, "vendor").await?;
    let buyer = register(&pool, "shopper").await?;
    let first = listing(&pool, owner, "Checkout Desk").await?;
    let second = listing(&pool, owner, "Checkout Shelf").await?;

    cart_service::add_to_cart(&pool, buyer, first.id).await?;
    cart_service::add_to_cart(&pool, buyer, second.id).await?;
    let cart_size = cart_service::list_cart(&pool, buyer).await?.len();

    let purchase_ids = purchase_service::checkout(&pool, buyer).await?;
    assert_eq!(purchase_ids.len(), cart_size);

    assert!(
        cart_service::list_cart(&pool, buyer).await?.is_empty(),
        "cart must be empty after checkout"
    );

    let purchases: (i64,) = sqlx::query_as("SELECT count(*) FROM purchases WHERE user_id = $1")
        .bind(buyer)
        .fetch_one(&pool)
        .await?;
    assert_eq!(purchases.0 as usize, cart_size);

    let history = purchase_service::list_history(&pool, buyer).await?;
    let titles: Vec<&str> = history.iter().map(|p| p.title.as_str()).collect();
    assert!(titles.contains(&"Checkout Desk"));
    assert!(titles.contains(&"Checkout Shelf"));

    // An empty cart checks out to nothing.
    let empty = purchase_service::checkout(&pool, buyer).await?;
    assert!(empty.is_empty());

    Ok(())
}

#[tokio::test]
async fn deleting_a_listing_purges_carts_and_history() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };

    let owner = register(&pool, "remover").await?;
    let buyer = register(&pool, "victim").await?;
    let marker = unique("Gone");
    let product = listing(&pool, owner, &marker).await?;

    // One purchased copy and one carted copy of the same listing.
    cart_service::add_to_cart(&pool, buyer, product.id).await?;
    purchase_service::checkout(&pool, buyer).await?;
    cart_service::add_to_cart(&pool, buyer, product.id).await?;

    product_service::delete_listing(&pool, owner, product.id).await?;

    assert!(
        cart_service::list_cart(&pool, buyer).await?.is_empty(),
        "delete must clear other users' carts"
    );

    let feed = product_service::list_feed(
        &pool,
        axum_marketplace::routes::params::FeedQuery {
            search: Some(marker),
            category: None,
        },
    )
    .await?;
    assert!(feed.is_empty(), "deleted listing must leave the feed");

    // The dependent purchase rows were purged with the product.
    let history = purchase_service::list_history(&pool, buyer).await?;
    assert!(history.iter().all(|p| p.id != product.id));

    Ok(())
}
