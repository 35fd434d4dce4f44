use chrono::Utc;

use crate::database::Database;
use crate::error::Error;

use super::{Campaign, CampaignFields, CampaignId};

async fn check_fields(db: &dyn Database, fields: &CampaignFields) -> Result<(), Error> {
    if let (Some(start), Some(end)) = (fields.start_date, fields.end_date) {
        if end < start {
            return Err(Error::InvalidField {
                field: "end_date",
                reason: "must not be before start_date",
            });
        }
    }

    if let Some(product_id) = fields.reward_product_id {
        if db.products().fetch_product_by_id(product_id).await?.is_none() {
            return Err(Error::InvalidField {
                field: "reward_product_id",
                reason: "no product has this id",
            });
        }
    }

    Ok(())
}

#[tracing::instrument(skip(db))]
pub async fn create_campaign(db: &dyn Database, fields: CampaignFields) -> Result<Campaign, Error> {
    check_fields(db, &fields).await?;

    let campaign = db.campaigns().insert_campaign(&fields).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: &dyn Database) -> Result<Vec<Campaign>, Error> {
    let campaigns = db.campaigns().fetch_campaigns().await?;

    Ok(campaigns)
}

/// Campaigns that are switched on and whose date window contains now.
#[tracing::instrument(skip(db))]
pub async fn get_active_campaigns(db: &dyn Database) -> Result<Vec<Campaign>, Error> {
    let now = Utc::now();
    let campaigns = db
        .campaigns()
        .fetch_campaigns()
        .await?
        .into_iter()
        .filter(|campaign| campaign.is_running_at(now))
        .collect();

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: &dyn Database,
    campaign_id: CampaignId,
    fields: CampaignFields,
) -> Result<Campaign, Error> {
    check_fields(db, &fields).await?;

    let campaign = db
        .campaigns()
        .update_campaign(campaign_id, &fields)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}

/// Deletes the campaign together with every user's progress on it.
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(db: &dyn Database, campaign_id: CampaignId) -> Result<(), Error> {
    if !db.campaigns().delete_campaign(campaign_id).await? {
        return Err(Error::CampaignNotFound { campaign_id });
    }

    Ok(())
}
