use async_trait::async_trait;
use chrono::Utc;

use crate::database::SqliteCampaignStore;
use crate::error::Error;

use super::{Campaign, CampaignFields, CampaignId};

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, fields: &CampaignFields) -> Result<Campaign, Error>;

    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaign_by_id(&self, campaign_id: CampaignId)
        -> Result<Option<Campaign>, Error>;

    async fn update_campaign(
        &self,
        campaign_id: CampaignId,
        fields: &CampaignFields,
    ) -> Result<Option<Campaign>, Error>;

    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error>;
}

#[async_trait]
impl CampaignStore for SqliteCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, fields: &CampaignFields) -> Result<Campaign, Error> {
        let now = Utc::now();
        let campaign = sqlx::query_as::<_, Campaign>(
            "INSERT INTO campaigns (title, description, image_url, campaign_type, required_count, reward_count,
                                    reward_product_id, start_date, end_date, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.image_url)
        .bind(fields.campaign_type)
        .bind(fields.required_count)
        .bind(fields.reward_count)
        .bind(fields.reward_product_id)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(fields.is_active)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        let campaigns = sqlx::query_as::<_, Campaign>(
            "SELECT * FROM campaigns ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaign = sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = ?")
            .bind(campaign_id)
            .fetch_optional(self.pool())
            .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign(
        &self,
        campaign_id: CampaignId,
        fields: &CampaignFields,
    ) -> Result<Option<Campaign>, Error> {
        let campaign = sqlx::query_as::<_, Campaign>(
            "UPDATE campaigns
             SET title = ?, description = ?, image_url = ?, campaign_type = ?, required_count = ?,
                 reward_count = ?, reward_product_id = ?, start_date = ?, end_date = ?, is_active = ?,
                 updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.image_url)
        .bind(fields.campaign_type)
        .bind(fields.required_count)
        .bind(fields.reward_count)
        .bind(fields.reward_product_id)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(fields.is_active)
        .bind(Utc::now())
        .bind(campaign_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = ?")
            .bind(campaign_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
