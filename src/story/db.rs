use async_trait::async_trait;
use chrono::Utc;

use crate::database::SqliteStoryStore;
use crate::error::Error;
use crate::ordering::{self, OrderScope};

use super::{Story, StoryFields, StoryId, StoryItem, StoryItemFields, StoryItemId};

fn stories_scope() -> OrderScope {
    OrderScope::all("stories")
}

fn items_scope(story_id: StoryId) -> OrderScope {
    OrderScope::owned_by("story_items", "story_id", story_id.raw())
}

#[async_trait]
pub trait StoryStore: Send + Sync {
    async fn insert_story(&self, fields: &StoryFields) -> Result<Story, Error>;

    async fn fetch_stories(&self) -> Result<Vec<Story>, Error>;

    async fn fetch_story_by_id(&self, story_id: StoryId) -> Result<Option<Story>, Error>;

    async fn update_story(
        &self,
        story_id: StoryId,
        fields: &StoryFields,
    ) -> Result<Option<Story>, Error>;

    /// Deletes the story with all of its items.
    async fn delete_story(&self, story_id: StoryId) -> Result<bool, Error>;

    async fn reorder_stories(&self, story_ids: &[i64]) -> Result<usize, Error>;

    async fn move_story(&self, story_id: StoryId, to_index: usize)
        -> Result<Option<usize>, Error>;

    async fn insert_story_item(&self, fields: &StoryItemFields) -> Result<StoryItem, Error>;

    async fn fetch_story_items(&self, story_id: Option<StoryId>)
        -> Result<Vec<StoryItem>, Error>;

    async fn fetch_story_item_by_id(
        &self,
        story_item_id: StoryItemId,
    ) -> Result<Option<StoryItem>, Error>;

    /// Updates the item; an item handed to another story goes to the end of
    /// that story.
    async fn update_story_item(
        &self,
        story_item_id: StoryItemId,
        fields: &StoryItemFields,
    ) -> Result<Option<StoryItem>, Error>;

    async fn delete_story_item(&self, story_item_id: StoryItemId) -> Result<bool, Error>;

    async fn delete_story_items_by_story(&self, story_id: StoryId) -> Result<u64, Error>;

    async fn reorder_story_items(
        &self,
        story_id: StoryId,
        story_item_ids: &[i64],
    ) -> Result<usize, Error>;

    async fn move_story_item(
        &self,
        story_item_id: StoryItemId,
        to_index: usize,
    ) -> Result<Option<usize>, Error>;
}

#[async_trait]
impl StoryStore for SqliteStoryStore {
    #[tracing::instrument(skip(self))]
    async fn insert_story(&self, fields: &StoryFields) -> Result<Story, Error> {
        let mut tx = ordering::begin_write(self.pool()).await?;

        let position = ordering::next_position(&mut tx, stories_scope()).await?;
        let now = Utc::now();
        let story = sqlx::query_as::<_, Story>(
            "INSERT INTO stories (title, description, image_url, is_active, display_order, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.image_url)
        .bind(fields.is_active)
        .bind(position)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(story)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_stories(&self) -> Result<Vec<Story>, Error> {
        let stories = sqlx::query_as::<_, Story>(
            "SELECT * FROM stories ORDER BY display_order ASC, id ASC",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(stories)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_story_by_id(&self, story_id: StoryId) -> Result<Option<Story>, Error> {
        let story = sqlx::query_as::<_, Story>("SELECT * FROM stories WHERE id = ?")
            .bind(story_id)
            .fetch_optional(self.pool())
            .await?;

        Ok(story)
    }

    #[tracing::instrument(skip(self))]
    async fn update_story(
        &self,
        story_id: StoryId,
        fields: &StoryFields,
    ) -> Result<Option<Story>, Error> {
        let story = sqlx::query_as::<_, Story>(
            "UPDATE stories
             SET title = ?, description = ?, image_url = ?, is_active = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.image_url)
        .bind(fields.is_active)
        .bind(Utc::now())
        .bind(story_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(story)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_story(&self, story_id: StoryId) -> Result<bool, Error> {
        let mut tx = ordering::begin_write(self.pool()).await?;

        let result = sqlx::query("DELETE FROM stories WHERE id = ?")
            .bind(story_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        ordering::compact(&mut tx, stories_scope()).await?;
        tx.commit().await?;

        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    async fn reorder_stories(&self, story_ids: &[i64]) -> Result<usize, Error> {
        ordering::reorder(self.pool(), stories_scope(), story_ids).await
    }

    #[tracing::instrument(skip(self))]
    async fn move_story(
        &self,
        story_id: StoryId,
        to_index: usize,
    ) -> Result<Option<usize>, Error> {
        ordering::move_item(self.pool(), stories_scope(), story_id.raw(), to_index).await
    }

    #[tracing::instrument(skip(self))]
    async fn insert_story_item(&self, fields: &StoryItemFields) -> Result<StoryItem, Error> {
        let mut tx = ordering::begin_write(self.pool()).await?;

        let position = ordering::next_position(&mut tx, items_scope(fields.story_id)).await?;
        let now = Utc::now();
        let item = sqlx::query_as::<_, StoryItem>(
            "INSERT INTO story_items (story_id, image_url, description, is_active, display_order, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(fields.story_id)
        .bind(&fields.image_url)
        .bind(&fields.description)
        .bind(fields.is_active)
        .bind(position)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(item)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_story_items(
        &self,
        story_id: Option<StoryId>,
    ) -> Result<Vec<StoryItem>, Error> {
        let items = sqlx::query_as::<_, StoryItem>(
            "SELECT * FROM story_items
             WHERE ?1 IS NULL OR story_id = ?1
             ORDER BY story_id ASC, display_order ASC, id ASC",
        )
        .bind(story_id)
        .fetch_all(self.pool())
        .await?;

        Ok(items)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_story_item_by_id(
        &self,
        story_item_id: StoryItemId,
    ) -> Result<Option<StoryItem>, Error> {
        let item = sqlx::query_as::<_, StoryItem>("SELECT * FROM story_items WHERE id = ?")
            .bind(story_item_id)
            .fetch_optional(self.pool())
            .await?;

        Ok(item)
    }

    #[tracing::instrument(skip(self))]
    async fn update_story_item(
        &self,
        story_item_id: StoryItemId,
        fields: &StoryItemFields,
    ) -> Result<Option<StoryItem>, Error> {
        let mut tx = ordering::begin_write(self.pool()).await?;

        let previous_story = sqlx::query_scalar::<_, StoryId>(
            "SELECT story_id FROM story_items WHERE id = ?",
        )
        .bind(story_item_id)
        .fetch_optional(&mut *tx)
        .await?;
        let previous_story = match previous_story {
            Some(story_id) => story_id,
            None => return Ok(None),
        };

        let position = if previous_story == fields.story_id {
            None
        } else {
            Some(ordering::next_position(&mut tx, items_scope(fields.story_id)).await?)
        };

        let item = sqlx::query_as::<_, StoryItem>(
            "UPDATE story_items
             SET story_id = ?, image_url = ?, description = ?, is_active = ?,
                 display_order = COALESCE(?, display_order), updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(fields.story_id)
        .bind(&fields.image_url)
        .bind(&fields.description)
        .bind(fields.is_active)
        .bind(position)
        .bind(Utc::now())
        .bind(story_item_id)
        .fetch_one(&mut *tx)
        .await?;

        if position.is_some() {
            ordering::compact(&mut tx, items_scope(previous_story)).await?;
        }

        tx.commit().await?;

        Ok(Some(item))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_story_item(&self, story_item_id: StoryItemId) -> Result<bool, Error> {
        let mut tx = ordering::begin_write(self.pool()).await?;

        let story_id = sqlx::query_scalar::<_, StoryId>(
            "DELETE FROM story_items WHERE id = ? RETURNING story_id",
        )
        .bind(story_item_id)
        .fetch_optional(&mut *tx)
        .await?;
        let story_id = match story_id {
            Some(story_id) => story_id,
            None => return Ok(false),
        };

        ordering::compact(&mut tx, items_scope(story_id)).await?;
        tx.commit().await?;

        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_story_items_by_story(&self, story_id: StoryId) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM story_items WHERE story_id = ?")
            .bind(story_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip(self))]
    async fn reorder_story_items(
        &self,
        story_id: StoryId,
        story_item_ids: &[i64],
    ) -> Result<usize, Error> {
        ordering::reorder(self.pool(), items_scope(story_id), story_item_ids).await
    }

    #[tracing::instrument(skip(self))]
    async fn move_story_item(
        &self,
        story_item_id: StoryItemId,
        to_index: usize,
    ) -> Result<Option<usize>, Error> {
        let item = match self.fetch_story_item_by_id(story_item_id).await? {
            Some(item) => item,
            None => return Ok(None),
        };

        ordering::move_item(
            self.pool(),
            items_scope(item.story_id),
            story_item_id.raw(),
            to_index,
        )
        .await
    }
}
