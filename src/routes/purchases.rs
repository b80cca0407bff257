use axum::{Json, Router, extract::State, response::Redirect, routing::get};

use crate::{
    dto::purchases::PurchaseList,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::purchase_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/purchase", get(purchase))
        .route("/previous_purchase", get(previous_purchase))
}

#[utoipa::path(
    get,
    path = "/purchase",
    responses((status = 303, description = "Cart converted to purchase history")),
    security(("bearer_auth" = [])),
    tag = "Purchases"
)]
pub async fn purchase(State(state): State<AppState>, user: AuthUser) -> AppResult<Redirect> {
    purchase_service::checkout(&state.pool, user.user_id).await?;
    Ok(Redirect::to("/previous_purchase"))
}

#[utoipa::path(
    get,
    path = "/previous_purchase",
    responses((status = 200, description = "Purchase history", body = ApiResponse<PurchaseList>)),
    security(("bearer_auth" = [])),
    tag = "Purchases"
)]
pub async fn previous_purchase(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PurchaseList>>> {
    let items = purchase_service::list_history(&state.pool, user.user_id).await?;
    Ok(Json(ApiResponse::success(
        "Previous purchases",
        PurchaseList { items },
    )))
}
