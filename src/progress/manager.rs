use futures::{stream, StreamExt, TryStreamExt};

use crate::campaign::{self, Campaign, CampaignId};
use crate::database::Database;
use crate::error::Error;
use crate::user::UserId;

use super::CampaignProgress;

/// Every tally the user holds on a switched-on campaign, newest first.
#[tracing::instrument(skip(db))]
pub async fn list_progress(
    db: &dyn Database,
    user_id: &UserId,
) -> Result<Vec<(CampaignProgress, Campaign)>, Error> {
    let progress = db.progress().fetch_progress_by_user(user_id).await?;

    let entries: Vec<_> = stream::iter(progress)
        .then(|progress| async move {
            let campaign = db
                .campaigns()
                .fetch_campaign_by_id(progress.campaign_id)
                .await?;
            Ok::<_, Error>(campaign.map(|campaign| (progress, campaign)))
        })
        .try_collect()
        .await?;

    Ok(entries
        .into_iter()
        .flatten()
        .filter(|(_, campaign)| campaign.is_active)
        .map(|(progress, campaign)| {
            (progress.measured_against(campaign.required_count), campaign)
        })
        .collect())
}

#[tracing::instrument(skip(db))]
pub async fn get_or_create_progress(
    db: &dyn Database,
    user_id: &UserId,
    campaign_id: CampaignId,
) -> Result<(CampaignProgress, Campaign), Error> {
    let campaign = campaign::manager::get_campaign_by_id(db, campaign_id).await?;

    let progress = match db.progress().fetch_progress(user_id, campaign_id).await? {
        Some(progress) => progress,
        None => {
            db.progress()
                .upsert_empty_progress(user_id, campaign_id)
                .await?
        }
    };

    Ok((progress.measured_against(campaign.required_count), campaign))
}

/// Records one qualifying purchase.
#[tracing::instrument(skip(db))]
pub async fn increment(
    db: &dyn Database,
    user_id: &UserId,
    campaign_id: CampaignId,
) -> Result<(CampaignProgress, Campaign), Error> {
    let campaign = campaign::manager::get_campaign_by_id(db, campaign_id).await?;

    let progress = db
        .progress()
        .increment_progress(user_id, campaign_id, campaign.required_count)
        .await?
        .ok_or_else(|| Error::CampaignAlreadyCompleted {
            user_id: user_id.clone(),
            campaign_id,
        })?;

    let progress = progress.measured_against(campaign.required_count);
    if progress.is_completed {
        tracing::info!(%user_id, %campaign_id, "campaign completed");
    }

    Ok((progress, campaign))
}

/// Hands out the reward of a completed tally, exactly once.
#[tracing::instrument(skip(db))]
pub async fn claim_reward(
    db: &dyn Database,
    user_id: &UserId,
    campaign_id: CampaignId,
) -> Result<(CampaignProgress, Campaign), Error> {
    let campaign = campaign::manager::get_campaign_by_id(db, campaign_id).await?;

    let claimed = db
        .progress()
        .claim_reward(user_id, campaign_id, campaign.required_count)
        .await?;
    if let Some(progress) = claimed {
        return Ok((progress.measured_against(campaign.required_count), campaign));
    }

    let progress = db
        .progress()
        .fetch_progress(user_id, campaign_id)
        .await?
        .ok_or_else(|| Error::ProgressNotFound {
            user_id: user_id.clone(),
            campaign_id,
        })?;

    if progress.reward_claimed_at.is_some() {
        return Err(Error::RewardAlreadyClaimed {
            user_id: user_id.clone(),
            campaign_id,
        });
    }

    Err(Error::CampaignNotCompleted {
        user_id: user_id.clone(),
        campaign_id,
        current_count: progress.current_count,
        required_count: campaign.required_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::{CampaignFields, CampaignType};
    use crate::database::SqliteDatabase;
    use crate::progress::ProgressState;

    fn coffee_card(required_count: i32, is_active: bool) -> CampaignFields {
        CampaignFields {
            title: "Ninth coffee free".into(),
            description: None,
            image_url: None,
            campaign_type: CampaignType::BuyXGetY,
            required_count,
            reward_count: 1,
            reward_product_id: None,
            start_date: None,
            end_date: None,
            is_active,
        }
    }

    async fn coffee_campaign(db: &SqliteDatabase, required_count: i32, is_active: bool) -> CampaignId {
        db.campaigns()
            .insert_campaign(&coffee_card(required_count, is_active))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn nine_increments_complete_and_tenth_is_rejected() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let campaign_id = coffee_campaign(&db, 9, true).await;
        let user_id = UserId::new("user-1");

        for count in 1..=8 {
            let (progress, _) = increment(&db, &user_id, campaign_id).await.unwrap();
            assert_eq!(progress.current_count, count);
            assert!(!progress.is_completed);
            assert_eq!(progress.state(), ProgressState::InProgress);
        }

        let (progress, _) = increment(&db, &user_id, campaign_id).await.unwrap();
        assert_eq!(progress.current_count, 9);
        assert!(progress.is_completed);
        assert!(progress.completed_at.is_some());
        assert_eq!(progress.state(), ProgressState::Completed);

        let result = increment(&db, &user_id, campaign_id).await;
        assert_eq!(
            result.unwrap_err(),
            Error::CampaignAlreadyCompleted {
                user_id: user_id.clone(),
                campaign_id
            }
        );

        let stored = db
            .progress()
            .fetch_progress(&user_id, campaign_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.current_count, 9);
        assert_eq!(stored.completed_at, progress.completed_at);
    }

    #[tokio::test]
    async fn single_step_campaign_completes_on_first_increment() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let campaign_id = coffee_campaign(&db, 1, true).await;
        let user_id = UserId::new("user-1");

        let (progress, _) = increment(&db, &user_id, campaign_id).await.unwrap();

        assert_eq!(progress.current_count, 1);
        assert!(progress.is_completed);
        assert!(progress.completed_at.is_some());
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let campaign_id = coffee_campaign(&db, 9, true).await;
        let user_id = UserId::new("user-1");

        let (first, second) = tokio::join!(
            increment(&db, &user_id, campaign_id),
            increment(&db, &user_id, campaign_id)
        );
        first.unwrap();
        second.unwrap();

        let stored = db
            .progress()
            .fetch_progress(&user_id, campaign_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.current_count, 2);
    }

    #[tokio::test]
    async fn claim_before_completion_is_rejected_and_writes_nothing() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let campaign_id = coffee_campaign(&db, 3, true).await;
        let user_id = UserId::new("user-1");
        increment(&db, &user_id, campaign_id).await.unwrap();

        let result = claim_reward(&db, &user_id, campaign_id).await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampaignNotCompleted {
                user_id: user_id.clone(),
                campaign_id,
                current_count: 1,
                required_count: 3,
            }
        );
        let stored = db
            .progress()
            .fetch_progress(&user_id, campaign_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.reward_claimed_at, None);
        assert_eq!(stored.completed_at, None);
    }

    #[tokio::test]
    async fn reward_can_only_be_claimed_once() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let campaign_id = coffee_campaign(&db, 2, true).await;
        let user_id = UserId::new("user-1");
        increment(&db, &user_id, campaign_id).await.unwrap();
        let (completed, _) = increment(&db, &user_id, campaign_id).await.unwrap();

        let (claimed, _) = claim_reward(&db, &user_id, campaign_id).await.unwrap();
        assert_eq!(claimed.state(), ProgressState::Rewarded);
        assert!(claimed.reward_claimed_at.is_some());
        assert_eq!(claimed.completed_at, completed.completed_at);

        let result = claim_reward(&db, &user_id, campaign_id).await;
        assert_eq!(
            result.unwrap_err(),
            Error::RewardAlreadyClaimed {
                user_id: user_id.clone(),
                campaign_id
            }
        );

        let result = increment(&db, &user_id, campaign_id).await;
        assert!(matches!(result, Err(Error::CampaignAlreadyCompleted { .. })));
    }

    #[tokio::test]
    async fn lowered_threshold_completes_existing_progress() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let campaign_id = coffee_campaign(&db, 9, true).await;
        let user_id = UserId::new("user-1");
        for _ in 0..5 {
            increment(&db, &user_id, campaign_id).await.unwrap();
        }

        campaign::manager::update_campaign(&db, campaign_id, coffee_card(3, true))
            .await
            .unwrap();

        let (progress, _) = get_or_create_progress(&db, &user_id, campaign_id)
            .await
            .unwrap();
        assert_eq!(progress.current_count, 5);
        assert!(progress.is_completed);
        assert_eq!(progress.state(), ProgressState::Completed);

        let result = increment(&db, &user_id, campaign_id).await;
        assert_eq!(
            result.unwrap_err(),
            Error::CampaignAlreadyCompleted {
                user_id: user_id.clone(),
                campaign_id
            }
        );

        let (claimed, _) = claim_reward(&db, &user_id, campaign_id).await.unwrap();
        assert_eq!(claimed.current_count, 5);
        assert!(claimed.completed_at.is_some());
        assert_eq!(claimed.state(), ProgressState::Rewarded);
    }

    #[tokio::test]
    async fn raised_threshold_reopens_unclaimed_progress() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let campaign_id = coffee_campaign(&db, 2, true).await;
        let user_id = UserId::new("user-1");
        increment(&db, &user_id, campaign_id).await.unwrap();
        let (completed, _) = increment(&db, &user_id, campaign_id).await.unwrap();
        assert!(completed.is_completed);

        campaign::manager::update_campaign(&db, campaign_id, coffee_card(4, true))
            .await
            .unwrap();

        let (progress, _) = get_or_create_progress(&db, &user_id, campaign_id)
            .await
            .unwrap();
        assert!(!progress.is_completed);
        assert_eq!(progress.state(), ProgressState::InProgress);

        let result = claim_reward(&db, &user_id, campaign_id).await;
        assert_eq!(
            result.unwrap_err(),
            Error::CampaignNotCompleted {
                user_id: user_id.clone(),
                campaign_id,
                current_count: 2,
                required_count: 4,
            }
        );

        increment(&db, &user_id, campaign_id).await.unwrap();
        let (progress, _) = increment(&db, &user_id, campaign_id).await.unwrap();
        assert_eq!(progress.current_count, 4);
        assert!(progress.is_completed);
        assert_eq!(progress.completed_at, completed.completed_at);
    }

    #[tokio::test]
    async fn claim_without_progress_is_not_found() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let campaign_id = coffee_campaign(&db, 2, true).await;
        let user_id = UserId::new("user-1");

        let result = claim_reward(&db, &user_id, campaign_id).await;

        assert_eq!(
            result.unwrap_err(),
            Error::ProgressNotFound {
                user_id,
                campaign_id
            }
        );
    }

    #[tokio::test]
    async fn progress_is_created_lazily() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let campaign_id = coffee_campaign(&db, 5, true).await;
        let user_id = UserId::new("user-1");

        let (created, _) = get_or_create_progress(&db, &user_id, campaign_id)
            .await
            .unwrap();
        let (fetched, _) = get_or_create_progress(&db, &user_id, campaign_id)
            .await
            .unwrap();

        assert_eq!(created.current_count, 0);
        assert_eq!(created.state(), ProgressState::NotStarted);
        assert_eq!(created.id, fetched.id);
    }

    #[tokio::test]
    async fn progress_for_unknown_campaign_is_not_found() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let campaign_id = CampaignId::from_raw(99);
        let user_id = UserId::new("user-1");

        let result = get_or_create_progress(&db, &user_id, campaign_id).await;
        assert_eq!(result.unwrap_err(), Error::CampaignNotFound { campaign_id });

        let result = increment(&db, &user_id, campaign_id).await;
        assert_eq!(result.unwrap_err(), Error::CampaignNotFound { campaign_id });
    }

    #[tokio::test]
    async fn list_progress_skips_inactive_campaigns() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let active = coffee_campaign(&db, 5, true).await;
        let inactive = coffee_campaign(&db, 5, false).await;
        let user_id = UserId::new("user-1");
        increment(&db, &user_id, active).await.unwrap();
        increment(&db, &user_id, inactive).await.unwrap();
        increment(&db, &UserId::new("user-2"), active).await.unwrap();

        let entries = list_progress(&db, &user_id).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0.campaign_id, active);
        assert_eq!(entries[0].1.id, active);
    }

    #[tokio::test]
    async fn deleting_a_campaign_deletes_its_progress() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let campaign_id = coffee_campaign(&db, 5, true).await;
        let user_id = UserId::new("user-1");
        increment(&db, &user_id, campaign_id).await.unwrap();

        campaign::manager::delete_campaign(&db, campaign_id)
            .await
            .unwrap();

        let stored = db
            .progress()
            .fetch_progress(&user_id, campaign_id)
            .await
            .unwrap();
        assert!(stored.is_none());
    }
}
