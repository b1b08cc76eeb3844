//! Handlers for the `/categories` resource.
//!
//! Categories form a per-store tree. Siblings are kept in dense position
//! order; moving a category to another parent takes it out of the old
//! sibling list and inserts it into the new one.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use storehub_core::error::CoreError;
use storehub_core::naming::resolve_slug;
use storehub_core::types::DbId;
use storehub_db::models::category::{Category, CategoryListParams, CreateCategory, UpdateCategory};
use storehub_db::repositories::{CategoryDeletion, CategoryRepo, CategoryUpdate};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::ownership::ensure_store_owner;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("Category", id))
}

/// Load `parent_id` and require it to live in `store_id`.
async fn check_parent(state: &AppState, store_id: DbId, parent_id: DbId) -> AppResult<()> {
    let parent = CategoryRepo::find_by_id(&state.pool, parent_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Parent category {parent_id} does not exist"
            )))
        })?;
    if parent.store_id != store_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Parent category {parent_id} belongs to another store"
        ))));
    }
    Ok(())
}

/// POST /api/categories
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    input.validate()?;
    ensure_store_owner(&state.pool, input.store_id, &admin).await?;
    if let Some(parent_id) = input.parent_id {
        check_parent(&state, input.store_id, parent_id).await?;
    }

    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
    let category = CategoryRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(
        category_id = category.id,
        store_id = category.store_id,
        position = category.position,
        "Category created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(category))))
}

/// GET /api/categories?store_id=&parent_id=&roots_only=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CategoryListParams>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse::new(categories)))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(category)))
}

/// PATCH /api/categories/{id}
///
/// `"parent_id": null` moves the category to the root; omitting the field
/// leaves the parent unchanged. Renaming without an explicit `slug`
/// re-derives the slug from the new name.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    input.validate()?;
    let existing = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_store_owner(&state.pool, existing.store_id, &admin).await?;

    if let Some(Some(parent_id)) = input.parent_id {
        check_parent(&state, existing.store_id, parent_id).await?;
    }

    let slug = match (input.slug.as_deref(), input.name.as_deref()) {
        (None, None) => None,
        (explicit, name) => Some(resolve_slug(
            explicit,
            name.unwrap_or(&existing.name),
        )?),
    };

    let category = match CategoryRepo::update(&state.pool, id, &input, slug.as_deref()).await? {
        CategoryUpdate::Updated(category) => category,
        CategoryUpdate::NotFound => return Err(not_found(id)),
        CategoryUpdate::ParentIsDescendant => {
            return Err(AppError::Core(CoreError::Validation(
                "A category cannot be moved under itself or one of its descendants".into(),
            )))
        }
    };
    tracing::info!(
        category_id = id,
        store_id = category.store_id,
        parent_id = ?category.parent_id,
        position = category.position,
        "Category updated"
    );
    Ok(Json(DataResponse::new(category)))
}

/// DELETE /api/categories/{id}
///
/// Rejected with 409 while the category still has children.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_store_owner(&state.pool, existing.store_id, &admin).await?;

    match CategoryRepo::delete(&state.pool, id).await? {
        CategoryDeletion::Deleted => {
            tracing::info!(category_id = id, store_id = existing.store_id, "Category deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        CategoryDeletion::NotFound => Err(not_found(id)),
        CategoryDeletion::HasChildren => Err(AppError::Core(CoreError::Conflict(format!(
            "Category {id} has subcategories; move or delete them first"
        )))),
    }
}
