use axum::{
    Json, Router,
    extract::{Path, State},
    response::Redirect,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::cart::CartList,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart_list))
        .route("/add_to_cart/{id}", get(add_to_cart))
        .route("/remove_from_cart/{id}", get(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/cart",
    responses((status = 200, description = "Cart contents for the current user", body = ApiResponse<CartList>)),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let items = cart_service::list_cart(&state.pool, user.user_id).await?;
    Ok(Json(ApiResponse::success("Cart", CartList { items })))
}

#[utoipa::path(
    get,
    path = "/add_to_cart/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 303, description = "Added to cart"),
        (status = 400, description = "Own product"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Redirect> {
    cart_service::add_to_cart(&state.pool, user.user_id, id).await?;
    Ok(Redirect::to("/cart"))
}

#[utoipa::path(
    get,
    path = "/remove_from_cart/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses((status = 303, description = "Removed from cart")),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Redirect> {
    cart_service::remove_from_cart(&state.pool, user.user_id, id).await?;
    Ok(Redirect::to("/cart"))
}
