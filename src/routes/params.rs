use serde::Deserialize;
use utoipa::ToSchema;

/// Feed query string. Empty values are treated the same as absent ones.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FeedQuery {
    /// Case-insensitive substring match on the listing title.
    pub search: Option<String>,
    /// Exact category name.
    pub category: Option<String>,
}
