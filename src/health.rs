use actix_web::get;
use actix_web::web::Json;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
}

#[get("/api/health")]
#[tracing::instrument]
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok".into(),
    })
}
