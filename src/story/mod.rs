//! Stories are the tappable circles at the top of the mobile home screen; each
//! one plays its items in order.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type StoryId = TypedId<Story>;
pub type StoryItemId = TypedId<StoryItem>;

#[derive(Clone, Debug, FromRow)]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TypedIdMarker for Story {
    fn tag() -> &'static str {
        "STY"
    }
}

#[derive(Clone, Debug)]
pub struct StoryFields {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
}

/// One frame of a story. Positions are kept per story.
#[derive(Clone, Debug, FromRow)]
pub struct StoryItem {
    pub id: StoryItemId,
    pub story_id: StoryId,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TypedIdMarker for StoryItem {
    fn tag() -> &'static str {
        "STI"
    }
}

#[derive(Clone, Debug)]
pub struct StoryItemFields {
    pub story_id: StoryId,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
}
