use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError, models::Session, state::AppState};

/// The authenticated identity threaded into every protected handler.
/// Resolved per request from the bearer token plus its persisted session
/// row; a token whose session was logged out no longer resolves.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub session_id: Uuid,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::InvalidCredentials)?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::InvalidCredentials)?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::InvalidCredentials);
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidCredentials)?;

        let session_id =
            Uuid::parse_str(&decoded.claims.sid).map_err(|_| AppError::InvalidCredentials)?;

        // The token alone is not enough: the session row must still exist.
        let session: Option<Session> =
            sqlx::query_as("SELECT * FROM sessions WHERE id = $1 AND expires_at > now()")
                .bind(session_id)
                .fetch_optional(&state.pool)
                .await?;
        let session = session.ok_or(AppError::InvalidCredentials)?;

        Ok(AuthUser {
            user_id: session.user_id,
            session_id: session.id,
        })
    }
}
