use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Bearer credential handed back on login. Holding on to it is the
/// rendering client's concern; the server keeps the matching session row.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionToken {
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Persisted session row id; deleted on logout.
    pub sid: String,
    pub exp: usize,
}
