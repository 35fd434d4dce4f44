use async_trait::async_trait;
use chrono::Utc;

use crate::database::SqliteCategoryStore;
use crate::error::Error;

use super::{Category, CategoryFields, CategoryId};

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn insert_category(&self, fields: &CategoryFields) -> Result<Category, Error>;

    async fn fetch_categories(&self) -> Result<Vec<Category>, Error>;

    async fn fetch_category_by_id(&self, category_id: CategoryId)
        -> Result<Option<Category>, Error>;

    async fn update_category(
        &self,
        category_id: CategoryId,
        fields: &CategoryFields,
    ) -> Result<Option<Category>, Error>;

    async fn delete_category(&self, category_id: CategoryId) -> Result<bool, Error>;
}

#[async_trait]
impl CategoryStore for SqliteCategoryStore {
    #[tracing::instrument(skip(self))]
    async fn insert_category(&self, fields: &CategoryFields) -> Result<Category, Error> {
        let now = Utc::now();
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, description, image_url, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.image_url)
        .bind(fields.is_active)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_categories(&self) -> Result<Vec<Category>, Error> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name, id")
            .fetch_all(self.pool())
            .await?;

        Ok(categories)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_category_by_id(
        &self,
        category_id: CategoryId,
    ) -> Result<Option<Category>, Error> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(self.pool())
            .await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self))]
    async fn update_category(
        &self,
        category_id: CategoryId,
        fields: &CategoryFields,
    ) -> Result<Option<Category>, Error> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories
             SET name = ?, description = ?, image_url = ?, is_active = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.image_url)
        .bind(fields.is_active)
        .bind(Utc::now())
        .bind(category_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_category(&self, category_id: CategoryId) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(category_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
