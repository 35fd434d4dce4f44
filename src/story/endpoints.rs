use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::utils::{
    default_true, optional_text, require, require_text, MessageBody, MoveBody, ReorderBody,
};

use super::{manager, Story, StoryFields, StoryId, StoryItem, StoryItemFields, StoryItemId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveStoryBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SaveStoryBody {
    fn into_fields(self) -> Result<StoryFields, Error> {
        Ok(StoryFields {
            title: require_text("title", self.title)?,
            description: optional_text(self.description),
            image_url: optional_text(self.image_url),
            is_active: self.is_active,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoryBody {
    pub id: StoryId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoryBody {
    pub fn render(story: Story) -> StoryBody {
        StoryBody {
            id: story.id,
            title: story.title,
            description: story.description,
            image_url: story.image_url,
            is_active: story.is_active,
            display_order: story.display_order,
            created_at: story.created_at,
            updated_at: story.updated_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveStoryItemBody {
    pub story_id: Option<StoryId>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SaveStoryItemBody {
    fn into_fields(self) -> Result<StoryItemFields, Error> {
        Ok(StoryItemFields {
            story_id: require("story_id", self.story_id)?,
            image_url: optional_text(self.image_url),
            description: optional_text(self.description),
            is_active: self.is_active,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoryItemBody {
    pub id: StoryItemId,
    pub story_id: StoryId,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoryItemBody {
    pub fn render(item: StoryItem) -> StoryItemBody {
        StoryItemBody {
            id: item.id,
            story_id: item.story_id,
            image_url: item.image_url,
            description: item.description,
            is_active: item.is_active,
            display_order: item.display_order,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StoryItemQuery {
    pub story_id: Option<StoryId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeletedStoryItemsBody {
    pub success: bool,
    pub message: String,
    pub deleted: u64,
}

fn render_stories(stories: Vec<Story>) -> Vec<StoryBody> {
    stories.into_iter().map(StoryBody::render).collect()
}

fn render_items(items: Vec<StoryItem>) -> Vec<StoryItemBody> {
    items.into_iter().map(StoryItemBody::render).collect()
}

#[get("/api/stories")]
#[tracing::instrument(skip(db))]
pub async fn get_stories(db: Data<Box<dyn Database>>) -> Result<Json<Vec<StoryBody>>, Error> {
    let stories = manager::get_stories(&***db).await?;

    Ok(Json(render_stories(stories)))
}

#[post("/api/stories")]
#[tracing::instrument(skip(db))]
pub async fn create_story(
    db: Data<Box<dyn Database>>,
    body: Json<SaveStoryBody>,
) -> Result<HttpResponse, Error> {
    let fields = body.into_inner().into_fields()?;

    let story = manager::create_story(&***db, fields).await?;

    Ok(HttpResponse::Created().json(StoryBody::render(story)))
}

#[put("/api/stories/{story_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_story(
    db: Data<Box<dyn Database>>,
    params: Path<StoryId>,
    body: Json<SaveStoryBody>,
) -> Result<Json<StoryBody>, Error> {
    let story_id = params.into_inner();
    let fields = body.into_inner().into_fields()?;

    let story = manager::update_story(&***db, story_id, fields).await?;

    Ok(Json(StoryBody::render(story)))
}

#[delete("/api/stories/{story_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_story(
    db: Data<Box<dyn Database>>,
    params: Path<StoryId>,
) -> Result<Json<MessageBody>, Error> {
    let story_id = params.into_inner();

    manager::delete_story(&***db, story_id).await?;

    Ok(Json(MessageBody::new("Story deleted successfully")))
}

#[post("/api/stories/reorder")]
#[tracing::instrument(skip(db))]
pub async fn reorder_stories(
    db: Data<Box<dyn Database>>,
    body: Json<ReorderBody>,
) -> Result<Json<Vec<StoryBody>>, Error> {
    let stories = manager::reorder_stories(&***db, &body.ids).await?;

    Ok(Json(render_stories(stories)))
}

#[post("/api/stories/{story_id}/move")]
#[tracing::instrument(skip(db))]
pub async fn move_story(
    db: Data<Box<dyn Database>>,
    params: Path<StoryId>,
    body: Json<MoveBody>,
) -> Result<Json<Vec<StoryBody>>, Error> {
    let story_id = params.into_inner();

    let stories = manager::move_story(&***db, story_id, body.to_index).await?;

    Ok(Json(render_stories(stories)))
}

#[post("/api/stories/{story_id}/items/reorder")]
#[tracing::instrument(skip(db))]
pub async fn reorder_story_items(
    db: Data<Box<dyn Database>>,
    params: Path<StoryId>,
    body: Json<ReorderBody>,
) -> Result<Json<Vec<StoryItemBody>>, Error> {
    let story_id = params.into_inner();

    let items = manager::reorder_story_items(&***db, story_id, &body.ids).await?;

    Ok(Json(render_items(items)))
}

#[get("/api/story-items")]
#[tracing::instrument(skip(db))]
pub async fn get_story_items(
    db: Data<Box<dyn Database>>,
    query: Query<StoryItemQuery>,
) -> Result<Json<Vec<StoryItemBody>>, Error> {
    let items = manager::get_story_items(&***db, query.story_id).await?;

    Ok(Json(render_items(items)))
}

#[post("/api/story-items")]
#[tracing::instrument(skip(db))]
pub async fn create_story_item(
    db: Data<Box<dyn Database>>,
    body: Json<SaveStoryItemBody>,
) -> Result<HttpResponse, Error> {
    let fields = body.into_inner().into_fields()?;

    let item = manager::create_story_item(&***db, fields).await?;

    Ok(HttpResponse::Created().json(StoryItemBody::render(item)))
}

#[put("/api/story-items/{story_item_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_story_item(
    db: Data<Box<dyn Database>>,
    params: Path<StoryItemId>,
    body: Json<SaveStoryItemBody>,
) -> Result<Json<StoryItemBody>, Error> {
    let story_item_id = params.into_inner();
    let fields = body.into_inner().into_fields()?;

    let item = manager::update_story_item(&***db, story_item_id, fields).await?;

    Ok(Json(StoryItemBody::render(item)))
}

#[delete("/api/story-items/{story_item_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_story_item(
    db: Data<Box<dyn Database>>,
    params: Path<StoryItemId>,
) -> Result<Json<MessageBody>, Error> {
    let story_item_id = params.into_inner();

    manager::delete_story_item(&***db, story_item_id).await?;

    Ok(Json(MessageBody::new("Story item deleted successfully")))
}

#[delete("/api/story-items")]
#[tracing::instrument(skip(db))]
pub async fn delete_story_items(
    db: Data<Box<dyn Database>>,
    query: Query<StoryItemQuery>,
) -> Result<Json<DeletedStoryItemsBody>, Error> {
    let story_id = require("story_id", query.story_id)?;

    let deleted = manager::delete_story_items(&***db, story_id).await?;

    Ok(Json(DeletedStoryItemsBody {
        success: true,
        message: "Story items deleted successfully".into(),
        deleted,
    }))
}

#[post("/api/story-items/{story_item_id}/move")]
#[tracing::instrument(skip(db))]
pub async fn move_story_item(
    db: Data<Box<dyn Database>>,
    params: Path<StoryItemId>,
    body: Json<MoveBody>,
) -> Result<Json<Vec<StoryItemBody>>, Error> {
    let story_item_id = params.into_inner();

    let items = manager::move_story_item(&***db, story_item_id, body.to_index).await?;

    Ok(Json(render_items(items)))
}
