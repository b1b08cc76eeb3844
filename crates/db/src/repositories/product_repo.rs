//! Repository for `products` and its child tables.

use std::collections::HashMap;

use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use storehub_core::pricing::{resolve_price, ProductDiscount};
use storehub_core::search::{clamp_limit, clamp_offset, contains_pattern, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use storehub_core::types::DbId;

use crate::models::product::{
    ColorInput, CreateProduct, Product, ProductColor, ProductDetail, ProductImage,
    ProductListParams, ProductListing, ProductSize, UpdateProduct,
};
use crate::repositories::PromotionRepo;

/// Column list for products queries.
const COLUMNS: &str = "id, store_id, category_id, brand_id, name, slug, description, \
    price, stock, is_active, created_at, updated_at";

/// Provides CRUD operations for products and price resolution for listings.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a product and its images, colors and sizes in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProduct,
        slug: &str,
    ) -> Result<Product, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO products
                (store_id, category_id, brand_id, name, slug, description, price, stock, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, true))
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(input.store_id)
            .bind(input.category_id)
            .bind(input.brand_id)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.stock)
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

        replace_images(&mut tx, product.id, &input.images).await?;
        replace_colors(&mut tx, product.id, &input.colors).await?;
        replace_sizes(&mut tx, product.id, &input.sizes).await?;

        tx.commit().await?;
        Ok(product)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load products by id, in no particular order.
    pub async fn find_many<'e, E>(executor: E, ids: &[DbId]) -> Result<Vec<Product>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = ANY($1)");
        sqlx::query_as::<_, Product>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    /// Which of `ids` belong to `store_id`.
    pub async fn ids_in_store(
        pool: &PgPool,
        store_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM products WHERE store_id = $1 AND id = ANY($2)")
                .bind(store_id)
                .bind(ids)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// List products matching the filters, newest first.
    pub async fn list(pool: &PgPool, params: &ProductListParams) -> Result<Vec<Product>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        let offset = clamp_offset(params.offset);
        let pattern = params.search.as_deref().and_then(contains_pattern);

        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE ($1::BIGINT IS NULL OR store_id = $1)
               AND ($2::BIGINT IS NULL OR category_id = $2)
               AND ($3::BIGINT IS NULL OR brand_id = $3)
               AND ($4::TEXT IS NULL OR name ILIKE $4)
               AND ($5 OR is_active)
             ORDER BY created_at DESC, id DESC
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(params.store_id)
            .bind(params.category_id)
            .bind(params.brand_id)
            .bind(pattern)
            .bind(params.include_inactive)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Attach the resolved price from active promotions to each product.
    pub async fn with_prices(
        pool: &PgPool,
        products: Vec<Product>,
    ) -> Result<Vec<ProductListing>, sqlx::Error> {
        let ids: Vec<DbId> = products.iter().map(|p| p.id).collect();
        let mut discounts = discounts_by_product(pool, &ids).await?;
        Ok(products
            .into_iter()
            .map(|product| {
                let applicable = discounts.remove(&product.id).unwrap_or_default();
                let resolved = resolve_price(product.price, &applicable);
                ProductListing::new(product, resolved)
            })
            .collect())
    }

    /// Load a product with its child collections and resolved price.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<ProductDetail>, sqlx::Error> {
        let Some(product) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let listing = Self::with_prices(pool, vec![product])
            .await?
            .pop()
            .ok_or(sqlx::Error::RowNotFound)?;

        let images = sqlx::query_as::<_, ProductImage>(
            "SELECT id, product_id, url, position FROM product_images
             WHERE product_id = $1 ORDER BY position ASC, id ASC",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;
        let colors = sqlx::query_as::<_, ProductColor>(
            "SELECT id, product_id, name, hex_code FROM product_colors
             WHERE product_id = $1 ORDER BY id ASC",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;
        let sizes = sqlx::query_as::<_, ProductSize>(
            "SELECT id, product_id, name FROM product_sizes
             WHERE product_id = $1 ORDER BY id ASC",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(Some(ProductDetail {
            listing,
            images,
            colors,
            sizes,
        }))
    }

    /// Update a product. Present child collections replace existing ones.
    ///
    /// Returns `None` if not found.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
        slug: Option<&str>,
    ) -> Result<Option<Product>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE products SET
                category_id = CASE WHEN $2 THEN $3 ELSE category_id END,
                brand_id = CASE WHEN $4 THEN $5 ELSE brand_id END,
                name = COALESCE($6, name),
                slug = COALESCE($7, slug),
                description = COALESCE($8, description),
                price = COALESCE($9, price),
                stock = COALESCE($10, stock),
                is_active = COALESCE($11, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(product) = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(input.category_id.is_some())
            .bind(input.category_id.flatten())
            .bind(input.brand_id.is_some())
            .bind(input.brand_id.flatten())
            .bind(&input.name)
            .bind(slug)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.stock)
            .bind(input.is_active)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(images) = &input.images {
            replace_images(&mut tx, id, images).await?;
        }
        if let Some(colors) = &input.colors {
            replace_colors(&mut tx, id, colors).await?;
        }
        if let Some(sizes) = &input.sizes {
            replace_sizes(&mut tx, id, sizes).await?;
        }

        tx.commit().await?;
        Ok(Some(product))
    }

    /// Delete a product. Fails with a foreign key violation once it has been ordered.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Active discounts grouped per product, each list in application order.
pub(crate) async fn discounts_by_product<'e, E>(
    executor: E,
    product_ids: &[DbId],
) -> Result<HashMap<DbId, Vec<ProductDiscount>>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let rows = PromotionRepo::active_discounts(executor, product_ids).await?;
    let mut grouped: HashMap<DbId, Vec<ProductDiscount>> = HashMap::new();
    for row in rows {
        let product_id = row.product_id;
        let discount =
            ProductDiscount::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        grouped.entry(product_id).or_default().push(discount);
    }
    Ok(grouped)
}

async fn replace_images(
    tx: &mut Transaction<'_, Postgres>,
    product_id: DbId,
    urls: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM product_images WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    for (position, url) in urls.iter().enumerate() {
        sqlx::query("INSERT INTO product_images (product_id, url, position) VALUES ($1, $2, $3)")
            .bind(product_id)
            .bind(url)
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn replace_colors(
    tx: &mut Transaction<'_, Postgres>,
    product_id: DbId,
    colors: &[ColorInput],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM product_colors WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    for color in colors {
        sqlx::query("INSERT INTO product_colors (product_id, name, hex_code) VALUES ($1, $2, $3)")
            .bind(product_id)
            .bind(&color.name)
            .bind(&color.hex_code)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn replace_sizes(
    tx: &mut Transaction<'_, Postgres>,
    product_id: DbId,
    sizes: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM product_sizes WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    for size in sizes {
        sqlx::query("INSERT INTO product_sizes (product_id, name) VALUES ($1, $2)")
            .bind(product_id)
            .bind(size)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}
