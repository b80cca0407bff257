use axum_marketplace::{
    db::{DbPool, create_pool},
    dto::auth::RegisterForm,
    dto::products::NewListing,
    models::{Category, Product},
    routes::params::FeedQuery,
    services::{auth_service, product_service},
};
use uuid::Uuid;

// Feed search/filter semantics: case-insensitive substring on title, exact
// category, AND-combined. Titles carry a per-run marker so the assertions
// hold on a shared database.

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

fn feed(search: Option<String>, category: Option<String>) -> FeedQuery {
    FeedQuery { search, category }
}

fn titles(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.title.as_str()).collect()
}

#[tokio::test]
async fn search_and_category_combine_with_and() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };

    let suffix = Uuid::new_v4().simple().to_string();
    let owner = auth_service::register_user(
        &pool,
        RegisterForm {
            email: format!("feed-{suffix}@example.com"),
            username: format!("feed-{suffix}"),
            password: "pw".to_string(),
        },
    )
    .await?
    .id;

    // The marker is stored uppercase and searched lowercase below.
    let marker = format!("MRK{}", suffix.to_uppercase());
    let chair = format!("Old Chair {marker}");
    let book = format!("Old Book {marker}");
    for (title, category) in [(&chair, Category::Home), (&book, Category::Books)] {
        product_service::create_listing(
            &pool,
            owner,
            NewListing {
                title: title.clone(),
                description: "feed filter fixture".to_string(),
                category,
                price: 5.0,
                image: None,
            },
        )
        .await?;
    }

    // Substring search alone, case-insensitive: both listings.
    let both = product_service::list_feed(&pool, feed(Some(marker.to_lowercase()), None)).await?;
    assert_eq!(both.len(), 2);
    assert!(titles(&both).contains(&chair.as_str()));
    assert!(titles(&both).contains(&book.as_str()));

    // Search AND category: only the book.
    let only_book = product_service::list_feed(
        &pool,
        feed(Some(marker.to_lowercase()), Some("Books".to_string())),
    )
    .await?;
    assert_eq!(titles(&only_book), vec![book.as_str()]);

    // A category with no matching listing yields nothing.
    let none = product_service::list_feed(
        &pool,
        feed(Some(marker.clone()), Some("Electronics".to_string())),
    )
    .await?;
    assert!(none.is_empty());

    // An unknown category name matches nothing rather than everything.
    let unknown = product_service::list_feed(
        &pool,
        feed(Some(marker.clone()), Some("Vehicles".to_string())),
    )
    .await?;
    assert!(unknown.is_empty());

    // Empty parameters count as absent: the marker search still scopes.
    let empty_category =
        product_service::list_feed(&pool, feed(Some(marker), Some(String::new()))).await?;
    assert_eq!(empty_category.len(), 2);

    Ok(())
}

#[tokio::test]
async fn owner_listings_are_scoped_to_the_owner() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };

    let suffix = Uuid::new_v4().simple().to_string();
    let mut owners = Vec::new();
    for tag in ["first", "second"] {
        let id = auth_service::register_user(
            &pool,
            RegisterForm {
                email: format!("{tag}-{suffix}@example.com"),
                username: format!("{tag}-{suffix}"),
                password: "pw".to_string(),
            },
        )
        .await?
        .id;
        owners.push(id);
    }

    product_service::create_listing(
        &pool,
        owners[0],
        NewListing {
            title: format!("Mine {suffix}"),
            description: "owned".to_string(),
            category: Category::Other,
            price: 1.0,
            image: None,
        },
    )
    .await?;

    let mine = product_service::list_by_owner(&pool, owners[0]).await?;
    assert_eq!(mine.len(), 1);
    let theirs = product_service::list_by_owner(&pool, owners[1]).await?;
    assert!(theirs.is_empty());

    Ok(())
}
