use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::utils::{default_true, optional_text, require_text, MessageBody, MoveBody, ReorderBody};

use super::{manager, Faq, FaqFields, FaqId};

#[derive(Clone, Debug, Deserialize)]
pub struct FaqQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveFaqBody {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SaveFaqBody {
    fn into_fields(self) -> Result<FaqFields, Error> {
        Ok(FaqFields {
            question: require_text("question", self.question)?,
            answer: require_text("answer", self.answer)?,
            category: optional_text(self.category),
            is_active: self.is_active,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FaqBody {
    pub id: FaqId,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FaqBody {
    pub fn render(faq: Faq) -> FaqBody {
        FaqBody {
            id: faq.id,
            question: faq.question,
            answer: faq.answer,
            category: faq.category,
            is_active: faq.is_active,
            display_order: faq.display_order,
            created_at: faq.created_at,
            updated_at: faq.updated_at,
        }
    }
}

fn render_all(faqs: Vec<Faq>) -> Vec<FaqBody> {
    faqs.into_iter().map(FaqBody::render).collect()
}

#[get("/api/faqs")]
#[tracing::instrument(skip(db))]
pub async fn get_faqs(
    db: Data<Box<dyn Database>>,
    query: Query<FaqQuery>,
) -> Result<Json<Vec<FaqBody>>, Error> {
    let faqs = manager::get_faqs(&***db, query.include_inactive).await?;

    Ok(Json(render_all(faqs)))
}

#[post("/api/faqs")]
#[tracing::instrument(skip(db))]
pub async fn create_faq(
    db: Data<Box<dyn Database>>,
    body: Json<SaveFaqBody>,
) -> Result<HttpResponse, Error> {
    let fields = body.into_inner().into_fields()?;

    let faq = manager::create_faq(&***db, fields).await?;

    Ok(HttpResponse::Created().json(FaqBody::render(faq)))
}

#[put("/api/faqs/{faq_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_faq(
    db: Data<Box<dyn Database>>,
    params: Path<FaqId>,
    body: Json<SaveFaqBody>,
) -> Result<Json<FaqBody>, Error> {
    let faq_id = params.into_inner();
    let fields = body.into_inner().into_fields()?;

    let faq = manager::update_faq(&***db, faq_id, fields).await?;

    Ok(Json(FaqBody::render(faq)))
}

#[delete("/api/faqs/{faq_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_faq(
    db: Data<Box<dyn Database>>,
    params: Path<FaqId>,
) -> Result<Json<MessageBody>, Error> {
    let faq_id = params.into_inner();

    manager::delete_faq(&***db, faq_id).await?;

    Ok(Json(MessageBody::new("FAQ deleted successfully")))
}

#[post("/api/faqs/reorder")]
#[tracing::instrument(skip(db))]
pub async fn reorder_faqs(
    db: Data<Box<dyn Database>>,
    body: Json<ReorderBody>,
) -> Result<Json<Vec<FaqBody>>, Error> {
    let faqs = manager::reorder_faqs(&***db, &body.ids).await?;

    Ok(Json(render_all(faqs)))
}

#[post("/api/faqs/{faq_id}/move")]
#[tracing::instrument(skip(db))]
pub async fn move_faq(
    db: Data<Box<dyn Database>>,
    params: Path<FaqId>,
    body: Json<MoveBody>,
) -> Result<Json<Vec<FaqBody>>, Error> {
    let faq_id = params.into_inner();

    let faqs = manager::move_faq(&***db, faq_id, body.to_index).await?;

    Ok(Json(render_all(faqs)))
}
