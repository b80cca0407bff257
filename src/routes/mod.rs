use axum::{Router, response::Redirect, routing::get};

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod doc;
pub mod health;
pub mod params;
pub mod products;
pub mod profile;
pub mod purchases;

// Build the application router without binding state; it is provided at
// the top level.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .merge(auth::router())
        .merge(profile::router())
        .merge(products::router())
        .merge(cart::router())
        .merge(purchases::router())
}

// The landing page is the feed.
async fn home() -> Redirect {
    Redirect::to("/feed")
}
