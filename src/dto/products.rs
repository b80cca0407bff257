use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, Product};

/// Validated input for a new listing, assembled by the add-product route
/// from its multipart form.
#[derive(Debug)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: f64,
    /// Relative media reference when an image was uploaded.
    pub image: Option<String>,
}

/// Edit form. The image is intentionally absent: it never changes on edit.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateListingForm {
    pub title: String,
    pub category: String,
    pub description: String,
    pub price: String,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

/// View-model for the add/edit listing form pages.
#[derive(Serialize, ToSchema)]
pub struct ListingFormView {
    #[schema(value_type = Vec<String>)]
    pub categories: Vec<&'static str>,
    pub product: Option<Product>,
}

impl ListingFormView {
    pub fn new(product: Option<Product>) -> Self {
        Self {
            categories: Category::ALL.iter().map(Category::as_str).collect(),
            product,
        }
    }
}
