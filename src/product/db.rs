use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;

use crate::category::CategoryId;
use crate::database::SqliteProductStore;
use crate::error::Error;

use super::{Product, ProductFields, ProductId};

const SELECT_PRODUCTS: &str = "SELECT p.*, c.name AS category_name
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id";

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert_product(&self, fields: &ProductFields) -> Result<Product, Error>;

    async fn fetch_products(&self, category_id: Option<CategoryId>) -> Result<Vec<Product>, Error>;

    async fn fetch_product_by_id(&self, product_id: ProductId) -> Result<Option<Product>, Error>;

    async fn update_product(
        &self,
        product_id: ProductId,
        fields: &ProductFields,
    ) -> Result<Option<Product>, Error>;

    async fn delete_product(&self, product_id: ProductId) -> Result<bool, Error>;

    async fn count_products_by_category(&self, category_id: CategoryId) -> Result<i64, Error>;
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    #[tracing::instrument(skip(self))]
    async fn insert_product(&self, fields: &ProductFields) -> Result<Product, Error> {
        let now = Utc::now();
        let product_id = sqlx::query_scalar::<_, ProductId>(
            "INSERT INTO products (name, description, price, category_id, image_url, is_popular, is_available, ingredients, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(fields.category_id)
        .bind(&fields.image_url)
        .bind(fields.is_popular)
        .bind(fields.is_available)
        .bind(Json(&fields.ingredients))
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        let product = sqlx::query_as::<_, Product>(&format!("{} WHERE p.id = ?", SELECT_PRODUCTS))
            .bind(product_id)
            .fetch_one(self.pool())
            .await?;

        Ok(product)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_products(&self, category_id: Option<CategoryId>) -> Result<Vec<Product>, Error> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "{} WHERE ?1 IS NULL OR p.category_id = ?1 ORDER BY p.name, p.id",
            SELECT_PRODUCTS
        ))
        .bind(category_id)
        .fetch_all(self.pool())
        .await?;

        Ok(products)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_product_by_id(&self, product_id: ProductId) -> Result<Option<Product>, Error> {
        let product = sqlx::query_as::<_, Product>(&format!("{} WHERE p.id = ?", SELECT_PRODUCTS))
            .bind(product_id)
            .fetch_optional(self.pool())
            .await?;

        Ok(product)
    }

    #[tracing::instrument(skip(self))]
    async fn update_product(
        &self,
        product_id: ProductId,
        fields: &ProductFields,
    ) -> Result<Option<Product>, Error> {
        let result = sqlx::query(
            "UPDATE products
             SET name = ?, description = ?, price = ?, category_id = ?, image_url = ?,
                 is_popular = ?, is_available = ?, ingredients = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(fields.category_id)
        .bind(&fields.image_url)
        .bind(fields.is_popular)
        .bind(fields.is_available)
        .bind(Json(&fields.ingredients))
        .bind(Utc::now())
        .bind(product_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.fetch_product_by_id(product_id).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_product(&self, product_id: ProductId) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(product_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn count_products_by_category(&self, category_id: CategoryId) -> Result<i64, Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE category_id = ?")
            .bind(category_id)
            .fetch_one(self.pool())
            .await?;

        Ok(count)
    }
}
