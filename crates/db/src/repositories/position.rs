//! Transactional execution of position reindex plans.
//!
//! The planners in [`storehub_core::ordering`] decide which range of a scope
//! shifts; the helpers here run that shift against the owning table. Every
//! helper takes an open transaction, and callers lock the owning store row
//! with [`lock_store`] or [`lock_store_of`] first so that concurrent
//! reindexes of the same store serialize.

use sqlx::{Postgres, Transaction};
use storehub_core::ordering::{
    insert_position, move_position, plan_delete, plan_insert, plan_move, PositionShift,
};
use storehub_core::types::DbId;

/// Tables whose rows carry a dense `position` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderedTable {
    Banners,
    Brands,
    Categories,
}

impl OrderedTable {
    fn table_name(self) -> &'static str {
        match self {
            Self::Banners => "banners",
            Self::Brands => "brands",
            Self::Categories => "categories",
        }
    }
}

/// One ordering scope: a store, or a store plus parent category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionScope {
    pub table: OrderedTable,
    pub store_id: DbId,
    pub parent_id: Option<DbId>,
}

impl PositionScope {
    pub fn banners(store_id: DbId) -> Self {
        Self {
            table: OrderedTable::Banners,
            store_id,
            parent_id: None,
        }
    }

    pub fn brands(store_id: DbId) -> Self {
        Self {
            table: OrderedTable::Brands,
            store_id,
            parent_id: None,
        }
    }

    /// Siblings under `parent_id` (root categories when `None`).
    pub fn categories(store_id: DbId, parent_id: Option<DbId>) -> Self {
        Self {
            table: OrderedTable::Categories,
            store_id,
            parent_id,
        }
    }

    /// SQL predicate selecting the scope, with placeholders starting at `$first`.
    fn predicate(&self, first: usize) -> String {
        match self.table {
            OrderedTable::Categories => format!(
                "store_id = ${first} AND parent_id IS NOT DISTINCT FROM ${}",
                first + 1
            ),
            _ => format!("store_id = ${first}"),
        }
    }

    fn bind_scope<'q, O>(
        &self,
        query: sqlx::query::QueryAs<'q, Postgres, O, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryAs<'q, Postgres, O, sqlx::postgres::PgArguments> {
        let query = query.bind(self.store_id);
        match self.table {
            OrderedTable::Categories => query.bind(self.parent_id),
            _ => query,
        }
    }
}

/// Lock a store row for the rest of the transaction.
///
/// Returns `RowNotFound` when the store does not exist.
pub async fn lock_store(tx: &mut Transaction<'_, Postgres>, store_id: DbId) -> Result<(), sqlx::Error> {
    sqlx::query_as::<_, (DbId,)>("SELECT id FROM stores WHERE id = $1 FOR UPDATE")
        .bind(store_id)
        .fetch_optional(&mut **tx)
        .await?
        .map(|_| ())
        .ok_or(sqlx::Error::RowNotFound)
}

/// Lock the store owning row `id` of `table`, returning the store id.
///
/// Returns `None` when the row does not exist.
pub async fn lock_store_of(
    tx: &mut Transaction<'_, Postgres>,
    table: OrderedTable,
    id: DbId,
) -> Result<Option<DbId>, sqlx::Error> {
    let query = format!(
        "SELECT s.id FROM stores s
         JOIN {t} r ON r.store_id = s.id
         WHERE r.id = $1
         FOR UPDATE OF s",
        t = table.table_name()
    );
    let row: Option<(DbId,)> = sqlx::query_as(&query)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row.map(|r| r.0))
}

/// Number of rows in a scope.
pub async fn count(tx: &mut Transaction<'_, Postgres>, scope: &PositionScope) -> Result<i64, sqlx::Error> {
    let query = format!(
        "SELECT COUNT(*) FROM {} WHERE {}",
        scope.table.table_name(),
        scope.predicate(1)
    );
    let row: (i64,) = scope
        .bind_scope(sqlx::query_as(&query))
        .fetch_one(&mut **tx)
        .await?;
    Ok(row.0)
}

/// Apply a planned shift to a scope, skipping `exclude_id` when given.
pub async fn shift(
    tx: &mut Transaction<'_, Postgres>,
    scope: &PositionScope,
    plan: PositionShift,
    exclude_id: Option<DbId>,
) -> Result<u64, sqlx::Error> {
    let query = format!(
        "UPDATE {} SET position = position + $1
         WHERE position BETWEEN $2 AND $3
           AND ($4::BIGINT IS NULL OR id <> $4)
           AND {}
         RETURNING id",
        scope.table.table_name(),
        scope.predicate(5)
    );
    let shifted: Vec<(DbId,)> = scope
        .bind_scope(
            sqlx::query_as(&query)
                .bind(plan.delta)
                .bind(plan.from)
                .bind(plan.upper_bound())
                .bind(exclude_id),
        )
        .fetch_all(&mut **tx)
        .await?;
    Ok(shifted.len() as u64)
}

/// Open a slot for a new row and return its position.
///
/// The new row is not yet in the scope; an omitted position appends.
pub async fn open_slot(
    tx: &mut Transaction<'_, Postgres>,
    scope: &PositionScope,
    requested: Option<i32>,
) -> Result<i32, sqlx::Error> {
    let existing = count(tx, scope).await?;
    let position = insert_position(requested, existing);
    shift(tx, scope, plan_insert(position), None).await?;
    Ok(position)
}

/// Make room for row `id` at `requested` and return the clamped target.
///
/// The caller writes the returned position to the row itself.
pub async fn move_within(
    tx: &mut Transaction<'_, Postgres>,
    scope: &PositionScope,
    id: DbId,
    current: i32,
    requested: i32,
) -> Result<i32, sqlx::Error> {
    let total = count(tx, scope).await?;
    let target = move_position(requested, total);
    if let Some(plan) = plan_move(current, target) {
        shift(tx, scope, plan, Some(id)).await?;
    }
    Ok(target)
}

/// Close the gap left by a row removed from `deleted`.
///
/// Also used when a category leaves its sibling scope for another parent;
/// pass the leaving row as `exclude_id` in that case.
pub async fn close_gap(
    tx: &mut Transaction<'_, Postgres>,
    scope: &PositionScope,
    deleted: i32,
    exclude_id: Option<DbId>,
) -> Result<(), sqlx::Error> {
    shift(tx, scope, plan_delete(deleted), exclude_id).await?;
    Ok(())
}

/// Positions of a scope in order, for invariant checks.
pub async fn positions(pool: &sqlx::PgPool, scope: &PositionScope) -> Result<Vec<i32>, sqlx::Error> {
    let query = format!(
        "SELECT position FROM {} WHERE {} ORDER BY position",
        scope.table.table_name(),
        scope.predicate(1)
    );
    let rows: Vec<(i32,)> = scope.bind_scope(sqlx::query_as(&query)).fetch_all(pool).await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}
