use actix_web::web::{Data, Json, Path};
use actix_web::{get, post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::campaign::{Campaign, CampaignBody, CampaignId};
use crate::database::Database;
use crate::error::Error;
use crate::product::ProductId;
use crate::user::UserId;

use super::{manager, CampaignProgress, ProgressId, ProgressState};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressBody {
    pub id: ProgressId,
    pub user_id: UserId,
    pub campaign_id: CampaignId,
    pub current_count: i32,
    pub required_count: i32,
    pub is_completed: bool,
    pub state: ProgressState,
    pub completed_at: Option<DateTime<Utc>>,
    pub reward_claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub campaign: CampaignBody,
}

impl ProgressBody {
    pub fn render(progress: CampaignProgress, campaign: Campaign) -> ProgressBody {
        let progress = progress.measured_against(campaign.required_count);
        ProgressBody {
            state: progress.state(),
            id: progress.id,
            user_id: progress.user_id,
            campaign_id: progress.campaign_id,
            current_count: progress.current_count,
            required_count: campaign.required_count,
            is_completed: progress.is_completed,
            completed_at: progress.completed_at,
            reward_claimed_at: progress.reward_claimed_at,
            created_at: progress.created_at,
            updated_at: progress.updated_at,
            campaign: CampaignBody::render(campaign),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RewardBody {
    pub product_id: Option<ProductId>,
    pub count: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClaimRewardBody {
    pub success: bool,
    pub message: String,
    pub progress: ProgressBody,
    pub reward: RewardBody,
}

#[get("/api/user-campaign-progress/{user_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_user_progress(
    db: Data<Box<dyn Database>>,
    params: Path<UserId>,
) -> Result<Json<Vec<ProgressBody>>, Error> {
    let user_id = params.into_inner();

    let entries = manager::list_progress(&***db, &user_id).await?;

    let body = entries
        .into_iter()
        .map(|(progress, campaign)| ProgressBody::render(progress, campaign))
        .collect();

    Ok(Json(body))
}

#[get("/api/user-campaign-progress/{user_id}/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_user_campaign_progress(
    db: Data<Box<dyn Database>>,
    params: Path<(UserId, CampaignId)>,
) -> Result<Json<ProgressBody>, Error> {
    let (user_id, campaign_id) = params.into_inner();

    let (progress, campaign) = manager::get_or_create_progress(&***db, &user_id, campaign_id).await?;

    Ok(Json(ProgressBody::render(progress, campaign)))
}

#[post("/api/user-campaign-progress/{user_id}/{campaign_id}/increment")]
#[tracing::instrument(skip(db))]
pub async fn increment_progress(
    db: Data<Box<dyn Database>>,
    params: Path<(UserId, CampaignId)>,
) -> Result<Json<ProgressBody>, Error> {
    let (user_id, campaign_id) = params.into_inner();

    let (progress, campaign) = manager::increment(&***db, &user_id, campaign_id).await?;

    Ok(Json(ProgressBody::render(progress, campaign)))
}

#[post("/api/user-campaign-progress/{user_id}/{campaign_id}/claim-reward")]
#[tracing::instrument(skip(db))]
pub async fn claim_reward(
    db: Data<Box<dyn Database>>,
    params: Path<(UserId, CampaignId)>,
) -> Result<Json<ClaimRewardBody>, Error> {
    let (user_id, campaign_id) = params.into_inner();

    let (progress, campaign) = manager::claim_reward(&***db, &user_id, campaign_id).await?;

    let reward = RewardBody {
        product_id: campaign.reward_product_id,
        count: campaign.reward_count,
    };

    Ok(Json(ClaimRewardBody {
        success: true,
        message: "Reward claimed successfully".into(),
        progress: ProgressBody::render(progress, campaign),
        reward,
    }))
}
