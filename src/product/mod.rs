use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::category::CategoryId;
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type ProductId = TypedId<Product>;

/// A menu product, read together with the name of its category.
#[derive(Clone, Debug, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub image_url: Option<String>,
    pub is_popular: bool,
    pub is_available: bool,
    pub ingredients: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TypedIdMarker for Product {
    fn tag() -> &'static str {
        "PRD"
    }
}

#[derive(Clone, Debug)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<CategoryId>,
    pub image_url: Option<String>,
    pub is_popular: bool,
    pub is_available: bool,
    pub ingredients: Vec<String>,
}
