//! Category routes.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use sushi_core::{CategoryId, Page};

use super::{ApiJson, ApiPath, ApiQuery, NameQuery, PageParams, blank_to_none, require_non_blank};
use crate::error::Result;
use crate::models::Category;
use crate::services::catalog::{CategoryUpdate, NewCategory};
use crate::state::AppState;

/// `POST /api/categories` body.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryBody {
    pub name: String,
    pub description: Option<String>,
}

/// `PUT /api/categories` body.
#[derive(Debug, Deserialize)]
pub struct ReplaceCategoryBody {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
        }
    }
}

fn to_responses(categories: Vec<Category>) -> Vec<CategoryResponse> {
    categories.into_iter().map(CategoryResponse::from).collect()
}

/// GET /api/categories?page&size
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<CategoryResponse>>> {
    let page = state.categories().list_all_paged(params.into()).await?;
    Ok(Json(page.map(CategoryResponse::from)))
}

/// GET /api/categories/all
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<CategoryResponse>>> {
    Ok(Json(to_responses(state.categories().list_all().await?)))
}

/// GET /api/categories/find?name=
pub async fn find_by_name(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NameQuery>,
) -> Result<Json<Vec<CategoryResponse>>> {
    let categories = state.categories().find_by_name(&query.name).await?;
    Ok(Json(to_responses(categories)))
}

/// GET /api/categories/{id}
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CategoryId>,
) -> Result<Json<CategoryResponse>> {
    Ok(Json(state.categories().find_by_id(id).await?.into()))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateCategoryBody>,
) -> Result<(StatusCode, Json<CategoryResponse>)> {
    let request = NewCategory {
        name: require_non_blank("name", body.name)?,
        description: blank_to_none(body.description),
    };
    let category = state.categories().create(request).await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

/// PUT /api/categories
pub async fn replace(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ReplaceCategoryBody>,
) -> Result<StatusCode> {
    let update = CategoryUpdate {
        id: body.id,
        name: require_non_blank("name", body.name)?,
        description: blank_to_none(body.description),
    };
    state.categories().replace(update).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/categories/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CategoryId>,
) -> Result<StatusCode> {
    state.categories().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
