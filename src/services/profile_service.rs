use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::profile::{ProfileView, UpdateProfileForm},
    error::{AppError, AppResult},
    models::User,
    services::auth_service::map_unique_violation,
};

pub async fn get_profile(pool: &DbPool, user_id: Uuid) -> AppResult<ProfileView> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    let user = user.ok_or(AppError::NotFound)?;
    Ok(ProfileView::from(user))
}

/// The username is the only mutable profile attribute.
pub async fn update_username(
    pool: &DbPool,
    user_id: Uuid,
    form: UpdateProfileForm,
) -> AppResult<ProfileView> {
    let username = form.username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }

    let user: User =
        sqlx::query_as("UPDATE users SET username = $2 WHERE id = $1 RETURNING *")
            .bind(user_id)
            .bind(username)
            .fetch_one(pool)
            .await
            .map_err(map_unique_violation)?;

    tracing::info!(user_id = %user.id, "profile updated");
    Ok(ProfileView::from(user))
}
