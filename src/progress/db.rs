use async_trait::async_trait;
use chrono::Utc;

use crate::campaign::CampaignId;
use crate::database::SqliteProgressStore;
use crate::error::Error;
use crate::user::UserId;

use super::CampaignProgress;

#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn fetch_progress(
        &self,
        user_id: &UserId,
        campaign_id: CampaignId,
    ) -> Result<Option<CampaignProgress>, Error>;

    async fn fetch_progress_by_user(&self, user_id: &UserId)
        -> Result<Vec<CampaignProgress>, Error>;

    /// Returns the existing row, inserting an empty one first if needed.
    async fn upsert_empty_progress(
        &self,
        user_id: &UserId,
        campaign_id: CampaignId,
    ) -> Result<CampaignProgress, Error>;

    /// Adds one to the tally while it is below `required_count` and the
    /// reward is unclaimed, creating the row if needed. Returns `None` when
    /// nothing was written.
    async fn increment_progress(
        &self,
        user_id: &UserId,
        campaign_id: CampaignId,
        required_count: i32,
    ) -> Result<Option<CampaignProgress>, Error>;

    /// Marks the reward as claimed if the tally has reached `required_count`
    /// and is unclaimed. Returns `None` when no row matched those conditions.
    async fn claim_reward(
        &self,
        user_id: &UserId,
        campaign_id: CampaignId,
        required_count: i32,
    ) -> Result<Option<CampaignProgress>, Error>;
}

#[async_trait]
impl ProgressStore for SqliteProgressStore {
    #[tracing::instrument(skip(self))]
    async fn fetch_progress(
        &self,
        user_id: &UserId,
        campaign_id: CampaignId,
    ) -> Result<Option<CampaignProgress>, Error> {
        let progress = sqlx::query_as::<_, CampaignProgress>(
            "SELECT * FROM campaign_progress WHERE user_id = ? AND campaign_id = ?",
        )
        .bind(user_id)
        .bind(campaign_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(progress)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_progress_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CampaignProgress>, Error> {
        let progress = sqlx::query_as::<_, CampaignProgress>(
            "SELECT * FROM campaign_progress WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(progress)
    }

    #[tracing::instrument(skip(self))]
    async fn upsert_empty_progress(
        &self,
        user_id: &UserId,
        campaign_id: CampaignId,
    ) -> Result<CampaignProgress, Error> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO campaign_progress (user_id, campaign_id, current_count, is_completed, created_at, updated_at)
             VALUES (?1, ?2, 0, 0, ?3, ?3)
             ON CONFLICT (user_id, campaign_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(campaign_id)
        .bind(now)
        .execute(self.pool())
        .await?;

        let progress = sqlx::query_as::<_, CampaignProgress>(
            "SELECT * FROM campaign_progress WHERE user_id = ? AND campaign_id = ?",
        )
        .bind(user_id)
        .bind(campaign_id)
        .fetch_one(self.pool())
        .await?;

        Ok(progress)
    }

    #[tracing::instrument(skip(self))]
    async fn increment_progress(
        &self,
        user_id: &UserId,
        campaign_id: CampaignId,
        required_count: i32,
    ) -> Result<Option<CampaignProgress>, Error> {
        // the conflict branch sees the stored row, so the read and the write
        // happen in one statement
        let progress = sqlx::query_as::<_, CampaignProgress>(
            "INSERT INTO campaign_progress
                 (user_id, campaign_id, current_count, is_completed, completed_at, created_at, updated_at)
             VALUES (?1, ?2, 1, ?3 <= 1, CASE WHEN ?3 <= 1 THEN ?4 END, ?4, ?4)
             ON CONFLICT (user_id, campaign_id) DO UPDATE
             SET current_count = current_count + 1,
                 is_completed = current_count + 1 >= ?3,
                 completed_at = COALESCE(completed_at, CASE WHEN current_count + 1 >= ?3 THEN ?4 END),
                 updated_at = ?4
             WHERE reward_claimed_at IS NULL AND current_count < ?3
             RETURNING *",
        )
        .bind(user_id)
        .bind(campaign_id)
        .bind(required_count)
        .bind(Utc::now())
        .fetch_optional(self.pool())
        .await?;

        Ok(progress)
    }

    #[tracing::instrument(skip(self))]
    async fn claim_reward(
        &self,
        user_id: &UserId,
        campaign_id: CampaignId,
        required_count: i32,
    ) -> Result<Option<CampaignProgress>, Error> {
        let progress = sqlx::query_as::<_, CampaignProgress>(
            "UPDATE campaign_progress
             SET is_completed = 1,
                 completed_at = COALESCE(completed_at, ?3),
                 reward_claimed_at = ?3,
                 updated_at = ?3
             WHERE user_id = ?1 AND campaign_id = ?2
               AND current_count >= ?4 AND reward_claimed_at IS NULL
             RETURNING *",
        )
        .bind(user_id)
        .bind(campaign_id)
        .bind(Utc::now())
        .bind(required_count)
        .fetch_optional(self.pool())
        .await?;

        Ok(progress)
    }
}
