use axum::{
    Json, Router,
    extract::{Form, State},
    routing::get,
};

use crate::{
    dto::profile::{ProfileView, UpdateProfileForm},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::profile_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard).post(update_profile))
}

#[utoipa::path(
    get,
    path = "/dashboard",
    responses((status = 200, description = "Current profile", body = ApiResponse<ProfileView>)),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProfileView>>> {
    let profile = profile_service::get_profile(&state.pool, user.user_id).await?;
    Ok(Json(ApiResponse::success("Dashboard", profile)))
}

#[utoipa::path(
    post,
    path = "/dashboard",
    request_body = UpdateProfileForm,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<ProfileView>),
        (status = 409, description = "Username already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Form(form): Form<UpdateProfileForm>,
) -> AppResult<Json<ApiResponse<ProfileView>>> {
    let profile = profile_service::update_username(&state.pool, user.user_id, form).await?;
    Ok(Json(ApiResponse::success("Profile updated.", profile)))
}
