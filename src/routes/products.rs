use axum::{
    Json, Router,
    extract::{Form, Multipart, Path, Query, State},
    extract::multipart::MultipartError,
    response::Redirect,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::{ListingFormView, NewListing, ProductList, UpdateListingForm},
    error::{AppError, AppResult},
    media,
    middleware::auth::AuthUser,
    models::Product,
    response::ApiResponse,
    routes::params::FeedQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add_product", get(add_product_form).post(add_product))
        .route("/feed", get(feed))
        .route("/my_listings", get(my_listings))
        .route("/edit_product/{id}", get(edit_product_form).post(edit_product))
        .route("/delete_product/{id}", get(delete_product))
        .route("/product/{id}", get(product_detail))
}

#[utoipa::path(
    get,
    path = "/feed",
    params(
        ("search" = Option<String>, Query, description = "Substring match on title, case-insensitive"),
        ("category" = Option<String>, Query, description = "Exact category name"),
    ),
    responses((status = 200, description = "Public listing feed", body = ApiResponse<ProductList>)),
    tag = "Products"
)]
pub async fn feed(
    State(state): State<AppState>,
    Query(filter): Query<FeedQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let items = product_service::list_feed(&state.pool, filter).await?;
    Ok(Json(ApiResponse::success("Feed", ProductList { items })))
}

#[utoipa::path(
    get,
    path = "/my_listings",
    responses((status = 200, description = "Listings owned by the caller", body = ApiResponse<ProductList>)),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn my_listings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let items = product_service::list_by_owner(&state.pool, user.user_id).await?;
    Ok(Json(ApiResponse::success("My listings", ProductList { items })))
}

#[utoipa::path(
    get,
    path = "/product/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product detail", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn product_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = product_service::get_listing(&state.pool, id).await?;
    Ok(Json(ApiResponse::success("Product", product)))
}

#[utoipa::path(get, path = "/add_product", security(("bearer_auth" = [])), tag = "Products")]
pub async fn add_product_form(_user: AuthUser) -> Json<ApiResponse<ListingFormView>> {
    Json(ApiResponse::success(
        "Add product",
        ListingFormView::new(None),
    ))
}

/// Multipart form: `title`, `description`, `category`, `price`, and an
/// optional `photo` file (png/jpg/jpeg/gif).
#[utoipa::path(
    post,
    path = "/add_product",
    responses(
        (status = 303, description = "Product listed"),
        (status = 400, description = "Invalid form field or image type"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn add_product(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Redirect> {
    let mut title = String::new();
    let mut description = String::new();
    let mut category: Option<String> = None;
    let mut price: Option<String> = None;
    let mut photo: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = field.text().await.map_err(bad_form)?,
            "description" => description = field.text().await.map_err(bad_form)?,
            "category" => category = Some(field.text().await.map_err(bad_form)?),
            "price" => price = Some(field.text().await.map_err(bad_form)?),
            "photo" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(bad_form)?;
                if !file_name.is_empty() && !data.is_empty() {
                    photo = Some((file_name, data));
                }
            }
            _ => {}
        }
    }

    let category = product_service::parse_category(category.as_deref().ok_or_else(|| {
        AppError::Validation("category is required".to_string())
    })?)?;
    let price = product_service::parse_price(
        price
            .as_deref()
            .ok_or_else(|| AppError::Validation("price is required".to_string()))?,
    )?;

    let image = match photo {
        Some((file_name, data)) => Some(
            media::store_product_image(&state.media_root, user.user_id, &title, &file_name, &data)
                .await?,
        ),
        None => None,
    };

    product_service::create_listing(
        &state.pool,
        user.user_id,
        NewListing {
            title,
            description,
            category,
            price,
            image,
        },
    )
    .await?;

    Ok(Redirect::to("/my_listings"))
}

#[utoipa::path(
    get,
    path = "/edit_product/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Listing form with current values", body = ApiResponse<ListingFormView>),
        (status = 403, description = "Not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn edit_product_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ListingFormView>>> {
    let product = product_service::get_owned_listing(&state.pool, user.user_id, id).await?;
    Ok(Json(ApiResponse::success(
        "Edit product",
        ListingFormView::new(Some(product)),
    )))
}

#[utoipa::path(
    post,
    path = "/edit_product/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateListingForm,
    responses(
        (status = 303, description = "Product updated"),
        (status = 403, description = "Not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn edit_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Form(form): Form<UpdateListingForm>,
) -> AppResult<Redirect> {
    product_service::update_listing(&state.pool, user.user_id, id, form).await?;
    Ok(Redirect::to("/my_listings"))
}

#[utoipa::path(
    get,
    path = "/delete_product/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 303, description = "Product deleted"),
        (status = 403, description = "Not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Redirect> {
    product_service::delete_listing(&state.pool, user.user_id, id).await?;
    Ok(Redirect::to("/my_listings"))
}

fn bad_form(err: MultipartError) -> AppError {
    AppError::Validation(err.to_string())
}
