use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Product;

/// The user's pending selection, joined to the product rows.
#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CartList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
