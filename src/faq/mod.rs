use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type FaqId = TypedId<Faq>;

#[derive(Clone, Debug, FromRow)]
pub struct Faq {
    pub id: FaqId,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TypedIdMarker for Faq {
    fn tag() -> &'static str {
        "FAQ"
    }
}

#[derive(Clone, Debug)]
pub struct FaqFields {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub is_active: bool,
}
