//! Repository for the `categories` table.
//!
//! Categories are ordered among siblings: the position scope is
//! `(store_id, parent_id)`. Re-parenting a category leaves a gap in the old
//! sibling list and opens a slot in the new one, in one transaction.

use sqlx::{PgExecutor, PgPool};
use storehub_core::naming::validate_parent;
use storehub_core::types::DbId;

use crate::models::category::{Category, CategoryListParams, CreateCategory, UpdateCategory};
use crate::repositories::position::{self, OrderedTable, PositionScope};

/// Column list for categories queries.
const COLUMNS: &str =
    "id, store_id, parent_id, name, slug, image_url, position, created_at, updated_at";

/// Result of [`CategoryRepo::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDeletion {
    Deleted,
    NotFound,
    /// The category still has subcategories and was left untouched.
    HasChildren,
}

/// Result of [`CategoryRepo::update`].
#[derive(Debug, Clone)]
pub enum CategoryUpdate {
    Updated(Category),
    NotFound,
    /// The new parent is the category itself or one of its descendants.
    ParentIsDescendant,
}

/// Provides CRUD operations for the category tree.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a category under `input.parent_id` with an already-resolved slug.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCategory,
        slug: &str,
    ) -> Result<Category, sqlx::Error> {
        let mut tx = pool.begin().await?;
        position::lock_store(&mut tx, input.store_id).await?;

        let scope = PositionScope::categories(input.store_id, input.parent_id);
        let pos = position::open_slot(&mut tx, &scope, input.position).await?;

        let query = format!(
            "INSERT INTO categories (store_id, parent_id, name, slug, image_url, position)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(input.store_id)
            .bind(input.parent_id)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.image_url)
            .bind(pos)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(category)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List categories of a store, optionally restricted to one sibling list.
    ///
    /// Results are ordered by parent, then position.
    pub async fn list(
        pool: &PgPool,
        params: &CategoryListParams,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE store_id = $1
               AND ($2::BIGINT IS NULL OR parent_id = $2)
               AND (NOT $3 OR parent_id IS NULL)
             ORDER BY parent_id ASC NULLS FIRST, position ASC, id ASC"
        );
        let roots_only = params.parent_id.is_none() && params.roots_only;
        sqlx::query_as::<_, Category>(&query)
            .bind(params.store_id)
            .bind(params.parent_id)
            .bind(roots_only)
            .fetch_all(pool)
            .await
    }

    /// Ids from `id` up to its root, starting with `id` itself.
    ///
    /// The walk stops at the first repeated id, so a corrupted tree still
    /// terminates.
    pub async fn ancestor_ids<'e, E>(executor: E, id: DbId) -> Result<Vec<DbId>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "WITH RECURSIVE chain AS (
                SELECT id, parent_id, 0 AS depth, ARRAY[id] AS path
                FROM categories WHERE id = $1
                UNION ALL
                SELECT c.id, c.parent_id, chain.depth + 1, chain.path || c.id
                FROM categories c
                JOIN chain ON c.id = chain.parent_id
                WHERE NOT c.id = ANY(chain.path)
             )
             SELECT id FROM chain ORDER BY depth",
        )
        .bind(id)
        .fetch_all(executor)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    pub async fn has_children<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM categories WHERE parent_id = $1)")
                .bind(id)
                .fetch_one(executor)
                .await?;
        Ok(row.0)
    }

    /// Update a category, re-parenting and/or moving it among its siblings.
    ///
    /// `slug` is the resolved slug when the name or slug changes. The caller
    /// has already checked that a new parent belongs to the same store. The
    /// cycle check runs under the store lock, so concurrent re-parents of the
    /// same tree cannot both pass it.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
        slug: Option<&str>,
    ) -> Result<CategoryUpdate, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(store_id) =
            position::lock_store_of(&mut tx, OrderedTable::Categories, id).await?
        else {
            return Ok(CategoryUpdate::NotFound);
        };

        let (current_parent, current_pos): (Option<DbId>, i32) =
            sqlx::query_as("SELECT parent_id, position FROM categories WHERE id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let new_parent = input.parent_id.unwrap_or(current_parent);
        if let Some(parent_id) = new_parent.filter(|_| new_parent != current_parent) {
            let ancestors = Self::ancestor_ids(&mut *tx, parent_id).await?;
            if validate_parent(id, Some(parent_id), &ancestors).is_err() {
                return Ok(CategoryUpdate::ParentIsDescendant);
            }
        }

        let pos = if new_parent != current_parent {
            let old_scope = PositionScope::categories(store_id, current_parent);
            position::close_gap(&mut tx, &old_scope, current_pos, Some(id)).await?;
            let new_scope = PositionScope::categories(store_id, new_parent);
            position::open_slot(&mut tx, &new_scope, input.position).await?
        } else if let Some(requested) = input.position {
            let scope = PositionScope::categories(store_id, current_parent);
            position::move_within(&mut tx, &scope, id, current_pos, requested).await?
        } else {
            current_pos
        };

        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                image_url = COALESCE($4, image_url),
                parent_id = $5,
                position = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.image_url)
            .bind(new_parent)
            .bind(pos)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(CategoryUpdate::Updated(category))
    }

    /// Delete a leaf category and close the gap among its siblings.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<CategoryDeletion, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(store_id) =
            position::lock_store_of(&mut tx, OrderedTable::Categories, id).await?
        else {
            return Ok(CategoryDeletion::NotFound);
        };

        if Self::has_children(&mut *tx, id).await? {
            return Ok(CategoryDeletion::HasChildren);
        }

        let (parent_id, deleted): (Option<DbId>, i32) = sqlx::query_as(
            "DELETE FROM categories WHERE id = $1 RETURNING parent_id, position",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        let scope = PositionScope::categories(store_id, parent_id);
        position::close_gap(&mut tx, &scope, deleted, None).await?;

        tx.commit().await?;
        Ok(CategoryDeletion::Deleted)
    }
}
