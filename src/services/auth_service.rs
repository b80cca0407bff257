use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::auth::{Claims, LoginForm, RegisterForm, SessionToken},
    dto::profile::ProfileView,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
};

const SESSION_TTL_HOURS: i64 = 24;

/// Create a user with a salted argon2 hash. Email and username collisions
/// both surface as the same generic conflict, whether caught by the
/// pre-check or by the unique constraint on a racing insert.
pub async fn register_user(pool: &DbPool, form: RegisterForm) -> AppResult<ProfileView> {
    let RegisterForm {
        email,
        username,
        password,
    } = form;

    if email.trim().is_empty() || username.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "email, username and password are required".to_string(),
        ));
    }

    let exist: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 OR username = $2")
            .bind(email.as_str())
            .bind(username.as_str())
            .fetch_optional(pool)
            .await?;
    if exist.is_some() {
        return Err(AppError::DuplicateRegistration);
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let id = Uuid::new_v4();
    let user: User = sqlx::query_as(
        "INSERT INTO users (id, email, username, password_hash) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(id)
    .bind(email.as_str())
    .bind(username.as_str())
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(map_unique_violation)?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(ProfileView::from(user))
}

/// Verify credentials, persist a session row and hand back the bearer
/// token that references it.
pub async fn login_user(pool: &DbPool, form: LoginForm) -> AppResult<SessionToken> {
    let LoginForm { email, password } = form;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;
    let user = user.ok_or(AppError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::InvalidCredentials);
    }

    let session_id = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(SESSION_TTL_HOURS);
    sqlx::query("INSERT INTO sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(session_id)
        .bind(user.id)
        .bind(expires_at)
        .execute(pool)
        .await?;

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        sid: session_id.to_string(),
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(SessionToken { token })
}

/// Delete the caller's session row. Idempotent; the bearer token stops
/// resolving as soon as the row is gone.
pub async fn logout_user(pool: &DbPool, user: &AuthUser) -> AppResult<()> {
    sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(user.session_id)
        .execute(pool)
        .await?;

    tracing::info!(user_id = %user.user_id, "user logged out");
    Ok(())
}

/// Collapse a raced unique-constraint failure into the same generic
/// conflict the pre-check produces.
pub(crate) fn map_unique_violation(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateRegistration,
        _ => AppError::Db(err),
    }
}
