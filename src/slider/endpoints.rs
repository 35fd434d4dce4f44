use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::utils::{default_true, optional_text, require_text, MessageBody, MoveBody, ReorderBody};

use super::{manager, Slider, SliderFields, SliderId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveSliderBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SaveSliderBody {
    fn into_fields(self) -> Result<SliderFields, Error> {
        Ok(SliderFields {
            title: require_text("title", self.title)?,
            description: optional_text(self.description),
            image_url: optional_text(self.image_url),
            link_url: optional_text(self.link_url),
            is_active: self.is_active,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SliderBody {
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

impl SliderBody {
    pub fn render(slider: Slider) -> SliderBody {
        SliderBody {
            id: slider.id,
            title: slider.title,
            description: slider.description,
            image_url: slider.image_url,
            link_url: slider.link_url,
            is_active: slider.is_active,
            display_order: slider.display_order,
            created_at: slider.created_at,
            updated_at: slider.updated_at,
        }
    }
}

fn render_all(sliders: Vec<Slider>) -> Vec<SliderBody> {
    sliders.into_iter().map(SliderBody::render).collect()
}

#[get("/api/sliders")]
#[tracing::instrument(skip(db))]
pub async fn get_sliders(db: Data<Box<dyn Database>>) -> Result<Json<Vec<SliderBody>>, Error> {
    let sliders = manager::get_sliders(&***db).await?;

    Ok(Json(render_all(sliders)))
}

#[post("/api/sliders")]
#[tracing::instrument(skip(db))]
pub async fn create_slider(
    db: Data<Box<dyn Database>>,
    body: Json<SaveSliderBody>,
) -> Result<HttpResponse, Error> {
    let fields = body.into_inner().into_fields()?;

    let slider = manager::create_slider(&***db, fields).await?;

    Ok(HttpResponse::Created().json(SliderBody::render(slider)))
}

#[put("/api/sliders/{slider_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_slider(
    db: Data<Box<dyn Database>>,
    params: Path<SliderId>,
    body: Json<SaveSliderBody>,
) -> Result<Json<SliderBody>, Error> {
    let slider_id = params.into_inner();
    let fields = body.into_inner().into_fields()?;

    let slider = manager::update_slider(&***db, slider_id, fields).await?;

    Ok(Json(SliderBody::render(slider)))
}

#[delete("/api/sliders/{slider_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_slider(
    db: Data<Box<dyn Database>>,
    params: Path<SliderId>,
) -> Result<Json<MessageBody>, Error> {
    let slider_id = params.into_inner();

    manager::delete_slider(&***db, slider_id).await?;

    Ok(Json(MessageBody::new("Slider deleted successfully")))
}

#[post("/api/sliders/reorder")]
#[tracing::instrument(skip(db))]
pub async fn reorder_sliders(
    db: Data<Box<dyn Database>>,
    body: Json<ReorderBody>,
) -> Result<Json<Vec<SliderBody>>, Error> {
    let sliders = manager::reorder_sliders(&***db, &body.ids).await?;

    Ok(Json(render_all(sliders)))
}

#[post("/api/sliders/{slider_id}/move")]
#[tracing::instrument(skip(db))]
pub async fn move_slider(
    db: Data<Box<dyn Database>>,
    params: Path<SliderId>,
    body: Json<MoveBody>,
) -> Result<Json<Vec<SliderBody>>, Error> {
    let slider_id = params.into_inner();

    let sliders = manager::move_slider(&***db, slider_id, body.to_index).await?;

    Ok(Json(render_all(sliders)))
}
