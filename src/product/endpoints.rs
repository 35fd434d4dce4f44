use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::CategoryId;
use crate::database::Database;
use crate::error::Error;
use crate::utils::{default_true, optional_text, require, require_text, MessageBody};

use super::{manager, Product, ProductFields, ProductId};

#[derive(Clone, Debug, Deserialize)]
pub struct ProductQuery {
    pub category_id: Option<CategoryId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveProductBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<CategoryId>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl SaveProductBody {
    fn into_fields(self) -> Result<ProductFields, Error> {
        let price = require("price", self.price)?;
        if !price.is_finite() || price < 0.0 {
            return Err(Error::InvalidField {
                field: "price",
                reason: "must be a non-negative number",
            });
        }

        Ok(ProductFields {
            name: require_text("name", self.name)?,
            description: optional_text(self.description),
            price,
            category_id: self.category_id,
            image_url: optional_text(self.image_url),
            is_popular: self.is_popular,
            is_available: self.is_available,
            ingredients: self
                .ingredients
                .into_iter()
                .filter_map(|ingredient| optional_text(Some(ingredient)))
                .collect(),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductBody {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub image_url: Option<String>,
    pub is_popular: bool,
    pub is_available: bool,
    pub ingredients: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductBody {
    pub fn render(product: Product) -> ProductBody {
        ProductBody {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            category_id: product.category_id,
            category_name: product.category_name,
            image_url: product.image_url,
            is_popular: product.is_popular,
            is_available: product.is_available,
            ingredients: product.ingredients.0,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[get("/api/products")]
#[tracing::instrument(skip(db))]
pub async fn get_products(
    db: Data<Box<dyn Database>>,
    query: Query<ProductQuery>,
) -> Result<Json<Vec<ProductBody>>, Error> {
    let products = manager::get_products(&***db, query.category_id).await?;

    let body = products.into_iter().map(ProductBody::render).collect();

    Ok(Json(body))
}

#[get("/api/products/{product_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_product_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<ProductId>,
) -> Result<Json<ProductBody>, Error> {
    let product_id = params.into_inner();

    let product = manager::get_product_by_id(&***db, product_id).await?;

    Ok(Json(ProductBody::render(product)))
}

#[post("/api/products")]
#[tracing::instrument(skip(db))]
pub async fn create_product(
    db: Data<Box<dyn Database>>,
    body: Json<SaveProductBody>,
) -> Result<HttpResponse, Error> {
    let fields = body.into_inner().into_fields()?;

    let product = manager::create_product(&***db, fields).await?;

    Ok(HttpResponse::Created().json(ProductBody::render(product)))
}

#[put("/api/products/{product_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_product(
    db: Data<Box<dyn Database>>,
    params: Path<ProductId>,
    body: Json<SaveProductBody>,
) -> Result<Json<ProductBody>, Error> {
    let product_id = params.into_inner();
    let fields = body.into_inner().into_fields()?;

    let product = manager::update_product(&***db, product_id, fields).await?;

    Ok(Json(ProductBody::render(product)))
}

#[delete("/api/products/{product_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_product(
    db: Data<Box<dyn Database>>,
    params: Path<ProductId>,
) -> Result<Json<MessageBody>, Error> {
    let product_id = params.into_inner();

    manager::delete_product(&***db, product_id).await?;

    Ok(Json(MessageBody::new("Product deleted successfully")))
}
