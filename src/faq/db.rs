use async_trait::async_trait;
use chrono::Utc;

use crate::database::SqliteFaqStore;
use crate::error::Error;
use crate::ordering::{self, OrderScope};

use super::{Faq, FaqFields, FaqId};

fn scope() -> OrderScope {
    OrderScope::all("faqs")
}

#[async_trait]
pub trait FaqStore: Send + Sync {
    async fn insert_faq(&self, fields: &FaqFields) -> Result<Faq, Error>;

    async fn fetch_faqs(&self, include_inactive: bool) -> Result<Vec<Faq>, Error>;

    async fn update_faq(&self, faq_id: FaqId, fields: &FaqFields) -> Result<Option<Faq>, Error>;

    async fn delete_faq(&self, faq_id: FaqId) -> Result<bool, Error>;

    async fn reorder_faqs(&self, faq_ids: &[i64]) -> Result<usize, Error>;

    async fn move_faq(&self, faq_id: FaqId, to_index: usize) -> Result<Option<usize>, Error>;
}

#[async_trait]
impl FaqStore for SqliteFaqStore {
    #[tracing::instrument(skip(self))]
    async fn insert_faq(&self, fields: &FaqFields) -> Result<Faq, Error> {
        let mut tx = ordering::begin_write(self.pool()).await?;

        let position = ordering::next_position(&mut tx, scope()).await?;
        let now = Utc::now();
        let faq = sqlx::query_as::<_, Faq>(
            "INSERT INTO faqs (question, answer, category, is_active, display_order, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&fields.question)
        .bind(&fields.answer)
        .bind(&fields.category)
        .bind(fields.is_active)
        .bind(position)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(faq)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_faqs(&self, include_inactive: bool) -> Result<Vec<Faq>, Error> {
        let faqs = sqlx::query_as::<_, Faq>(
            "SELECT * FROM faqs
             WHERE ? OR is_active = 1
             ORDER BY display_order ASC, id ASC",
        )
        .bind(include_inactive)
        .fetch_all(self.pool())
        .await?;

        Ok(faqs)
    }

    #[tracing::instrument(skip(self))]
    async fn update_faq(&self, faq_id: FaqId, fields: &FaqFields) -> Result<Option<Faq>, Error> {
        let faq = sqlx::query_as::<_, Faq>(
            "UPDATE faqs
             SET question = ?, answer = ?, category = ?, is_active = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&fields.question)
        .bind(&fields.answer)
        .bind(&fields.category)
        .bind(fields.is_active)
        .bind(Utc::now())
        .bind(faq_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(faq)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_faq(&self, faq_id: FaqId) -> Result<bool, Error> {
        let mut tx = ordering::begin_write(self.pool()).await?;

        let result = sqlx::query("DELETE FROM faqs WHERE id = ?")
            .bind(faq_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        ordering::compact(&mut tx, scope()).await?;
        tx.commit().await?;

        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    async fn reorder_faqs(&self, faq_ids: &[i64]) -> Result<usize, Error> {
        ordering::reorder(self.pool(), scope(), faq_ids).await
    }

    #[tracing::instrument(skip(self))]
    async fn move_faq(&self, faq_id: FaqId, to_index: usize) -> Result<Option<usize>, Error> {
        ordering::move_item(self.pool(), scope(), faq_id.raw(), to_index).await
    }
}
