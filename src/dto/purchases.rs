use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Product;

/// Purchase history joined to the product rows that still exist.
#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct PurchaseList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
