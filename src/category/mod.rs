use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type CategoryId = TypedId<Category>;

#[derive(Clone, Debug, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TypedIdMarker for Category {
    fn tag() -> &'static str {
        "CAT"
    }
}

#[derive(Clone, Debug)]
pub struct CategoryFields {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
}
