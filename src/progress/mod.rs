//! Per-user loyalty counters ("buy nine, get one") attached to campaigns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::campaign::CampaignId;
use crate::typedid::{TypedId, TypedIdMarker};
use crate::user::UserId;

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type ProgressId = TypedId<CampaignProgress>;

/// One user's tally towards one campaign's reward.
///
/// `completed_at` records when the tally first reached the campaign's
/// `required_count`; `reward_claimed_at` records the one and only reward
/// claim. Both are written once and never cleared.
///
/// The stored `is_completed` reflects the threshold at the last write, so
/// rows handed out of the manager go through [`CampaignProgress::measured_against`].
#[derive(Clone, Debug, FromRow)]
pub struct CampaignProgress {
    pub id: ProgressId,
    pub user_id: UserId,
    pub campaign_id: CampaignId,
    pub current_count: i32,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub reward_claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CampaignProgress {
    /// Re-derives `is_completed` from the campaign's current threshold,
    /// which may have been edited since the last increment.
    pub fn measured_against(mut self, required_count: i32) -> CampaignProgress {
        self.is_completed = self.current_count >= required_count;
        self
    }

    pub fn state(&self) -> ProgressState {
        if self.reward_claimed_at.is_some() {
            ProgressState::Rewarded
        } else if self.is_completed {
            ProgressState::Completed
        } else if self.current_count == 0 {
            ProgressState::NotStarted
        } else {
            ProgressState::InProgress
        }
    }
}

impl TypedIdMarker for CampaignProgress {
    fn tag() -> &'static str {
        "PRG"
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressState {
    NotStarted,
    InProgress,
    Completed,
    Rewarded,
}
