use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::utils::{default_true, optional_text, require_text, MessageBody};

use super::{manager, Category, CategoryFields, CategoryId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveCategoryBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SaveCategoryBody {
    fn into_fields(self) -> Result<CategoryFields, Error> {
        Ok(CategoryFields {
            name: require_text("name", self.name)?,
            description: optional_text(self.description),
            image_url: optional_text(self.image_url),
            is_active: self.is_active,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryBody {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryBody {
    pub fn render(category: Category) -> CategoryBody {
        CategoryBody {
            id: category.id,
            name: category.name,
            description: category.description,
            image_url: category.image_url,
            is_active: category.is_active,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[get("/api/categories")]
#[tracing::instrument(skip(db))]
pub async fn get_categories(db: Data<Box<dyn Database>>) -> Result<Json<Vec<CategoryBody>>, Error> {
    let categories = manager::get_categories(&***db).await?;

    let body = categories.into_iter().map(CategoryBody::render).collect();

    Ok(Json(body))
}

#[post("/api/categories")]
#[tracing::instrument(skip(db))]
pub async fn create_category(
    db: Data<Box<dyn Database>>,
    body: Json<SaveCategoryBody>,
) -> Result<HttpResponse, Error> {
    let fields = body.into_inner().into_fields()?;

    let category = manager::create_category(&***db, fields).await?;

    Ok(HttpResponse::Created().json(CategoryBody::render(category)))
}

#[put("/api/categories/{category_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_category(
    db: Data<Box<dyn Database>>,
    params: Path<CategoryId>,
    body: Json<SaveCategoryBody>,
) -> Result<Json<CategoryBody>, Error> {
    let category_id = params.into_inner();
    let fields = body.into_inner().into_fields()?;

    let category = manager::update_category(&***db, category_id, fields).await?;

    Ok(Json(CategoryBody::render(category)))
}

#[delete("/api/categories/{category_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_category(
    db: Data<Box<dyn Database>>,
    params: Path<CategoryId>,
) -> Result<Json<MessageBody>, Error> {
    let category_id = params.into_inner();

    manager::delete_category(&***db, category_id).await?;

    Ok(Json(MessageBody::new("Category deleted successfully")))
}
