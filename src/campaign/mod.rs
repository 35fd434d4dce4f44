use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::product::ProductId;
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type CampaignId = TypedId<Campaign>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum CampaignType {
    General,
    BuyXGetY,
}

impl Default for CampaignType {
    fn default() -> CampaignType {
        CampaignType::General
    }
}

#[derive(Clone, Debug, FromRow)]
pub struct Campaign {
    pub id: CampaignId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub campaign_type: CampaignType,
    pub required_count: i32,
    pub reward_count: i32,
    pub reward_product_id: Option<ProductId>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Whether the campaign is switched on and `now` falls inside its window.
    pub fn is_running_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.start_date.map_or(true, |start| start <= now)
            && self.end_date.map_or(true, |end| now <= end)
    }
}

impl TypedIdMarker for Campaign {
    fn tag() -> &'static str {
        "CPN"
    }
}

#[derive(Clone, Debug)]
pub struct CampaignFields {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub campaign_type: CampaignType,
    pub required_count: i32,
    pub reward_count: i32,
    pub reward_product_id: Option<ProductId>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}
