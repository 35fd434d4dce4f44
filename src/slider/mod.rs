use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type SliderId = TypedId<Slider>;

/// A home screen banner, shown in `display_order`.
#[derive(Clone, Debug, FromRow)]
pub struct Slider {
    pub id: SliderId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TypedIdMarker for Slider {
    fn tag() -> &'static str {
        "SLD"
    }
}

#[derive(Clone, Debug)]
pub struct SliderFields {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub is_active: bool,
}
