use async_trait::async_trait;
use chrono::Utc;

use crate::database::SqliteSliderStore;
use crate::error::Error;
use crate::ordering::{self, OrderScope};

use super::{Slider, SliderFields, SliderId};

fn scope() -> OrderScope {
    OrderScope::all("sliders")
}

#[async_trait]
pub trait SliderStore: Send + Sync {
    /// Inserts the slider at the end of the list.
    async fn insert_slider(&self, fields: &SliderFields) -> Result<Slider, Error>;

    async fn fetch_sliders(&self) -> Result<Vec<Slider>, Error>;

    async fn update_slider(
        &self,
        slider_id: SliderId,
        fields: &SliderFields,
    ) -> Result<Option<Slider>, Error>;

    /// Deletes the slider and closes the gap it leaves.
    async fn delete_slider(&self, slider_id: SliderId) -> Result<bool, Error>;

    async fn reorder_sliders(&self, slider_ids: &[i64]) -> Result<usize, Error>;

    async fn move_slider(&self, slider_id: SliderId, to_index: usize)
        -> Result<Option<usize>, Error>;
}

#[async_trait]
impl SliderStore for SqliteSliderStore {
    #[tracing::instrument(skip(self))]
    async fn insert_slider(&self, fields: &SliderFields) -> Result<Slider, Error> {
        let mut tx = ordering::begin_write(self.pool()).await?;

        let position = ordering::next_position(&mut tx, scope()).await?;
        let now = Utc::now();
        let slider = sqlx::query_as::<_, Slider>(
            "INSERT INTO sliders (title, description, image_url, link_url, is_active, display_order, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.image_url)
        .bind(&fields.link_url)
        .bind(fields.is_active)
        .bind(position)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(slider)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_sliders(&self) -> Result<Vec<Slider>, Error> {
        let sliders = sqlx::query_as::<_, Slider>(
            "SELECT * FROM sliders ORDER BY display_order ASC, id ASC",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(sliders)
    }

    #[tracing::instrument(skip(self))]
    async fn update_slider(
        &self,
        slider_id: SliderId,
        fields: &SliderFields,
    ) -> Result<Option<Slider>, Error> {
        let slider = sqlx::query_as::<_, Slider>(
            "UPDATE sliders
             SET title = ?, description = ?, image_url = ?, link_url = ?, is_active = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.image_url)
        .bind(&fields.link_url)
        .bind(fields.is_active)
        .bind(Utc::now())
        .bind(slider_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(slider)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_slider(&self, slider_id: SliderId) -> Result<bool, Error> {
        let mut tx = ordering::begin_write(self.pool()).await?;

        let result = sqlx::query("DELETE FROM sliders WHERE id = ?")
            .bind(slider_id)
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
    async fn reorder_sliders(&self, slider_ids: &[i64]) -> Result<usize, Error> {
        ordering::reorder(self.pool(), scope(), slider_ids).await
    }

    #[tracing::instrument(skip(self))]
    async fn move_slider(
        &self,
        slider_id: SliderId,
        to_index: usize,
    ) -> Result<Option<usize>, Error> {
        ordering::move_item(self.pool(), scope(), slider_id.raw(), to_index).await
    }
}
