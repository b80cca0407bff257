use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginForm, RegisterForm, SessionToken},
        cart::CartList,
        products::{ListingFormView, ProductList, UpdateListingForm},
        profile::{ProfileView, UpdateProfileForm},
        purchases::PurchaseList,
    },
    models::{Category, Product},
    response::ApiResponse,
    routes::{auth, cart, health, params, products, profile, purchases},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::signup_form,
        auth::signup,
        auth::login_form,
        auth::login,
        auth::logout,
        profile::dashboard,
        profile::update_profile,
        products::feed,
        products::my_listings,
        products::product_detail,
        products::add_product_form,
        products::add_product,
        products::edit_product_form,
        products::edit_product,
        products::delete_product,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        purchases::purchase,
        purchases::previous_purchase,
    ),
    components(
        schemas(
            Category,
            Product,
            RegisterForm,
            LoginForm,
            SessionToken,
            ProfileView,
            UpdateProfileForm,
            UpdateListingForm,
            ListingFormView,
            ProductList,
            CartList,
            PurchaseList,
            params::FeedQuery,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartList>,
            ApiResponse<PurchaseList>,
            ApiResponse<ProfileView>,
            ApiResponse<SessionToken>,
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and logout"),
        (name = "Profile", description = "Dashboard and profile edit"),
        (name = "Products", description = "Listing feed and CRUD"),
        (name = "Cart", description = "Shopping cart"),
        (name = "Purchases", description = "Checkout and purchase history"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
