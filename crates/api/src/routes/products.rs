//! Product routes.

use axum::{Json, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sushi_core::{CategoryId, CurrencyCode, Page, Price, ProductId};

use super::categories::CategoryResponse;
use super::{ApiJson, ApiPath, ApiQuery, NameQuery, PageParams, blank_to_none, require_non_blank};
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::services::catalog::{NewProduct, ProductUpdate};
use crate::state::AppState;

/// Product fields shared by create and replace bodies.
#[derive(Debug, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub currency_code: CurrencyCode,
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
}

/// `PUT /api/products` body.
#[derive(Debug, Deserialize)]
pub struct ReplaceProductBody {
    pub id: ProductId,
    #[serde(flatten)]
    pub fields: ProductFields,
}

/// Validated product fields.
struct ValidProduct {
    name: String,
    description: Option<String>,
    price: Price,
    image_url: Option<String>,
    category_ids: Vec<CategoryId>,
}

impl ProductFields {
    fn validate(self) -> Result<ValidProduct> {
        let price = Price::new(self.price, self.currency_code)
            .map_err(|e| AppError::BadRequest(format!("price: {e}")))?;

        Ok(ValidProduct {
            name: require_non_blank("name", self.name)?,
            description: blank_to_none(self.description),
            price,
            image_url: blank_to_none(self.image_url),
            category_ids: self.category_ids,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Option<ProductId>,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    /// Price formatted for display (e.g. `R$39.90`).
    pub display_price: String,
    pub image_url: Option<String>,
    pub categories: Vec<CategoryResponse>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            display_price: product.price.to_string(),
            price: product.price,
            image_url: product.image_url,
            categories: product
                .categories
                .into_iter()
                .map(CategoryResponse::from)
                .collect(),
        }
    }
}

fn to_responses(products: Vec<Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

/// GET /api/products?page&size
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<ProductResponse>>> {
    let page = state.products().list_all_paged(params.into()).await?;
    Ok(Json(page.map(ProductResponse::from)))
}

/// GET /api/products/all
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    Ok(Json(to_responses(state.products().list_all().await?)))
}

/// GET /api/products/find?name=
pub async fn find_by_name(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NameQuery>,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = state.products().find_by_name(&query.name).await?;
    Ok(Json(to_responses(products)))
}

/// GET /api/products/by-category/{id}
pub async fn by_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CategoryId>,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = state.products().find_by_category(id).await?;
    Ok(Json(to_responses(products)))
}

/// GET /api/products/{id}
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<ProductResponse>> {
    Ok(Json(state.products().find_by_id(id).await?.into()))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ProductFields>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let valid = body.validate()?;
    let product = state
        .products()
        .create(NewProduct {
            name: valid.name,
            description: valid.description,
            price: valid.price,
            image_url: valid.image_url,
            category_ids: valid.category_ids,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// PUT /api/products
pub async fn replace(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ReplaceProductBody>,
) -> Result<StatusCode> {
    let valid = body.fields.validate()?;
    state
        .products()
        .replace(ProductUpdate {
            id: body.id,
            name: valid.name,
            description: valid.description,
            price: valid.price,
            image_url: valid.image_url,
            category_ids: valid.category_ids,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<StatusCode> {
    state.products().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
