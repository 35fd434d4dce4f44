use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::Database;
use crate::error::Error;
use crate::utils::{default_true, optional_text, require_text, MessageBody};

use super::{manager, Branch, BranchFields, BranchId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveBranchBody {
    pub name: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
    pub working_hours: Option<Value>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SaveBranchBody {
    fn into_fields(self) -> Result<BranchFields, Error> {
        let address = require_text("address", self.address)?;

        Ok(BranchFields {
            name: require_text("name", self.name)?,
            location: optional_text(self.location).unwrap_or_else(|| address.clone()),
            address,
            phone: optional_text(self.phone).unwrap_or_default(),
            email: optional_text(self.email),
            latitude: coordinate(self.latitude.as_ref()),
            longitude: coordinate(self.longitude.as_ref()),
            working_hours: self.working_hours.and_then(working_hours),
            is_active: self.is_active,
        })
    }
}

/// Reads a coordinate sent either as a number or as numeric text; anything
/// else counts as zero.
fn coordinate(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    };

    parsed.filter(|number: &f64| number.is_finite()).unwrap_or(0.0)
}

/// Dashboard forms may send the schedule as a JSON-encoded string; it is
/// stored decoded when it parses and verbatim otherwise.
fn working_hours(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(serde_json::from_str(&text).unwrap_or(Value::String(text))),
        other => Some(other),
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BranchBody {
    pub id: BranchId,
    pub name: String,
    pub address: String,
    pub location: String,
    pub phone: String,
    pub email: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub working_hours: Option<Value>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BranchBody {
    pub fn render(branch: Branch) -> BranchBody {
        BranchBody {
            id: branch.id,
            name: branch.name,
            address: branch.address,
            location: branch.location,
            phone: branch.phone,
            email: branch.email,
            latitude: branch.latitude,
            longitude: branch.longitude,
            working_hours: branch.working_hours.map(|hours| hours.0),
            is_active: branch.is_active,
            created_at: branch.created_at,
            updated_at: branch.updated_at,
        }
    }
}

#[get("/api/branches")]
#[tracing::instrument(skip(db))]
pub async fn get_branches(db: Data<Box<dyn Database>>) -> Result<Json<Vec<BranchBody>>, Error> {
    let branches = manager::get_branches(&***db).await?;

    let body = branches.into_iter().map(BranchBody::render).collect();

    Ok(Json(body))
}

#[post("/api/branches")]
#[tracing::instrument(skip(db))]
pub async fn create_branch(
    db: Data<Box<dyn Database>>,
    body: Json<SaveBranchBody>,
) -> Result<HttpResponse, Error> {
    let fields = body.into_inner().into_fields()?;

    let branch = manager::create_branch(&***db, fields).await?;

    Ok(HttpResponse::Created().json(BranchBody::render(branch)))
}

#[put("/api/branches/{branch_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_branch(
    db: Data<Box<dyn Database>>,
    params: Path<BranchId>,
    body: Json<SaveBranchBody>,
) -> Result<Json<BranchBody>, Error> {
    let branch_id = params.into_inner();
    let fields = body.into_inner().into_fields()?;

    let branch = manager::update_branch(&***db, branch_id, fields).await?;

    Ok(Json(BranchBody::render(branch)))
}

#[delete("/api/branches/{branch_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_branch(
    db: Data<Box<dyn Database>>,
    params: Path<BranchId>,
) -> Result<Json<MessageBody>, Error> {
    let branch_id = params.into_inner();

    manager::delete_branch(&***db, branch_id).await?;

    Ok(Json(MessageBody::new("Branch deleted successfully")))
}
