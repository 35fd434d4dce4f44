use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type BranchId = TypedId<Branch>;

#[derive(Clone, Debug, FromRow)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub address: String,
    pub location: String,
    pub phone: String,
    pub email: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub working_hours: Option<Json<Value>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TypedIdMarker for Branch {
    fn tag() -> &'static str {
        "BRN"
    }
}

#[derive(Clone, Debug)]
pub struct BranchFields {
    pub name: String,
    pub address: String,
    pub location: String,
    pub phone: String,
    pub email: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub working_hours: Option<Value>,
    pub is_active: bool,
}
