use serde::Serialize;
use utoipa::ToSchema;

/// Uniform envelope for rendered view-models. The `message` field carries
/// the user-facing notice text for the current request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}
