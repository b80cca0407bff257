use axum::{
    Json, Router,
    extract::{Form, State},
    response::Redirect,
    routing::get,
};

use crate::{
    dto::auth::{LoginForm, RegisterForm, SessionToken},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::auth_service::{login_user, logout_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", get(signup_form).post(signup))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

#[utoipa::path(get, path = "/signup", tag = "Auth")]
pub async fn signup_form() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success("Sign up", serde_json::json!({})))
}

#[utoipa::path(
    post,
    path = "/signup",
    request_body = RegisterForm,
    responses(
        (status = 303, description = "Registered, continue to login"),
        (status = 409, description = "Email or username already exists"),
    ),
    tag = "Auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Redirect> {
    register_user(&state.pool, form).await?;
    Ok(Redirect::to("/login"))
}

#[utoipa::path(get, path = "/login", tag = "Auth")]
pub async fn login_form() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success("Log in", serde_json::json!({})))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginForm,
    responses(
        (status = 200, description = "Session established", body = ApiResponse<SessionToken>),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Json<ApiResponse<SessionToken>>> {
    let token = login_user(&state.pool, form).await?;
    Ok(Json(ApiResponse::success("Logged in", token)))
}

#[utoipa::path(
    get,
    path = "/logout",
    responses((status = 303, description = "Session ended")),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<Redirect> {
    logout_user(&state.pool, &user).await?;
    Ok(Redirect::to("/login"))
}
