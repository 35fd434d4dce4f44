use crate::database::Database;
use crate::error::Error;

use super::{Story, StoryFields, StoryId, StoryItem, StoryItemFields, StoryItemId};

#[tracing::instrument(skip(db))]
pub async fn create_story(db: &dyn Database, fields: StoryFields) -> Result<Story, Error> {
    let story = db.stories().insert_story(&fields).await?;

    Ok(story)
}

#[tracing::instrument(skip(db))]
pub async fn get_stories(db: &dyn Database) -> Result<Vec<Story>, Error> {
    let stories = db.stories().fetch_stories().await?;

    Ok(stories)
}

#[tracing::instrument(skip(db))]
pub async fn update_story(
    db: &dyn Database,
    story_id: StoryId,
    fields: StoryFields,
) -> Result<Story, Error> {
    let story = db
        .stories()
        .update_story(story_id, &fields)
        .await?
        .ok_or(Error::StoryNotFound { story_id })?;

    Ok(story)
}

#[tracing::instrument(skip(db))]
pub async fn delete_story(db: &dyn Database, story_id: StoryId) -> Result<(), Error> {
    if !db.stories().delete_story(story_id).await? {
        return Err(Error::StoryNotFound { story_id });
    }

    Ok(())
}

#[tracing::instrument(skip(db))]
pub async fn reorder_stories(db: &dyn Database, story_ids: &[i64]) -> Result<Vec<Story>, Error> {
    let written = db.stories().reorder_stories(story_ids).await?;
    tracing::debug!(written, "stories reordered");

    get_stories(db).await
}

#[tracing::instrument(skip(db))]
pub async fn move_story(
    db: &dyn Database,
    story_id: StoryId,
    to_index: usize,
) -> Result<Vec<Story>, Error> {
    db.stories()
        .move_story(story_id, to_index)
        .await?
        .ok_or(Error::StoryNotFound { story_id })?;

    get_stories(db).await
}

async fn check_story(db: &dyn Database, story_id: StoryId) -> Result<(), Error> {
    if db.stories().fetch_story_by_id(story_id).await?.is_none() {
        return Err(Error::InvalidField {
            field: "story_id",
            reason: "no story has this id",
        });
    }

    Ok(())
}

#[tracing::instrument(skip(db))]
pub async fn create_story_item(
    db: &dyn Database,
    fields: StoryItemFields,
) -> Result<StoryItem, Error> {
    check_story(db, fields.story_id).await?;

    let item = db.stories().insert_story_item(&fields).await?;

    Ok(item)
}

#[tracing::instrument(skip(db))]
pub async fn get_story_items(
    db: &dyn Database,
    story_id: Option<StoryId>,
) -> Result<Vec<StoryItem>, Error> {
    let items = db.stories().fetch_story_items(story_id).await?;

    Ok(items)
}

#[tracing::instrument(skip(db))]
pub async fn update_story_item(
    db: &dyn Database,
    story_item_id: StoryItemId,
    fields: StoryItemFields,
) -> Result<StoryItem, Error> {
    check_story(db, fields.story_id).await?;

    let item = db
        .stories()
        .update_story_item(story_item_id, &fields)
        .await?
        .ok_or(Error::StoryItemNotFound { story_item_id })?;

    Ok(item)
}

#[tracing::instrument(skip(db))]
pub async fn delete_story_item(db: &dyn Database, story_item_id: StoryItemId) -> Result<(), Error> {
    if !db.stories().delete_story_item(story_item_id).await? {
        return Err(Error::StoryItemNotFound { story_item_id });
    }

    Ok(())
}

/// Empties a story and returns how many items were removed.
#[tracing::instrument(skip(db))]
pub async fn delete_story_items(db: &dyn Database, story_id: StoryId) -> Result<u64, Error> {
    let deleted = db.stories().delete_story_items_by_story(story_id).await?;

    Ok(deleted)
}

#[tracing::instrument(skip(db))]
pub async fn reorder_story_items(
    db: &dyn Database,
    story_id: StoryId,
    story_item_ids: &[i64],
) -> Result<Vec<StoryItem>, Error> {
    if db.stories().fetch_story_by_id(story_id).await?.is_none() {
        return Err(Error::StoryNotFound { story_id });
    }

    let written = db
        .stories()
        .reorder_story_items(story_id, story_item_ids)
        .await?;
    tracing::debug!(written, "story items reordered");

    get_story_items(db, Some(story_id)).await
}

#[tracing::instrument(skip(db))]
pub async fn move_story_item(
    db: &dyn Database,
    story_item_id: StoryItemId,
    to_index: usize,
) -> Result<Vec<StoryItem>, Error> {
    db.stories()
        .move_story_item(story_item_id, to_index)
        .await?
        .ok_or(Error::StoryItemNotFound { story_item_id })?;

    let item = db
        .stories()
        .fetch_story_item_by_id(story_item_id)
        .await?
        .ok_or(Error::StoryItemNotFound { story_item_id })?;

    get_story_items(db, Some(item.story_id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SqliteDatabase;
    use crate::ordering::OrderingError;

    fn story(title: &str) -> StoryFields {
        StoryFields {
            title: title.into(),
            description: None,
            image_url: None,
            is_active: true,
        }
    }

    fn frame(story_id: StoryId) -> StoryItemFields {
        StoryItemFields {
            story_id,
            image_url: Some("/public/uploads/stories/frame.png".into()),
            description: None,
            is_active: true,
        }
    }

    fn order(items: &[StoryItem]) -> (Vec<StoryItemId>, Vec<i32>) {
        (
            items.iter().map(|item| item.id).collect(),
            items.iter().map(|item| item.display_order).collect(),
        )
    }

    #[tokio::test]
    async fn items_are_positioned_per_story() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let menu = create_story(&db, story("Menu")).await.unwrap();
        let news = create_story(&db, story("News")).await.unwrap();

        let first = create_story_item(&db, frame(menu.id)).await.unwrap();
        let other = create_story_item(&db, frame(news.id)).await.unwrap();
        let second = create_story_item(&db, frame(menu.id)).await.unwrap();

        assert_eq!(first.display_order, 1);
        assert_eq!(other.display_order, 1);
        assert_eq!(second.display_order, 2);
        assert_eq!(news.display_order, 2);
    }

    #[tokio::test]
    async fn reorder_items_within_one_story() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let menu = create_story(&db, story("Menu")).await.unwrap();
        let news = create_story(&db, story("News")).await.unwrap();
        let a = create_story_item(&db, frame(menu.id)).await.unwrap().id;
        let b = create_story_item(&db, frame(menu.id)).await.unwrap().id;
        let c = create_story_item(&db, frame(menu.id)).await.unwrap().id;
        let elsewhere = create_story_item(&db, frame(news.id)).await.unwrap().id;

        let items = reorder_story_items(&db, menu.id, &[c.raw(), a.raw(), b.raw()])
            .await
            .unwrap();
        assert_eq!(order(&items), (vec![c, a, b], vec![1, 2, 3]));

        let result =
            reorder_story_items(&db, menu.id, &[c.raw(), a.raw(), b.raw(), elsewhere.raw()]).await;
        assert_eq!(
            result.unwrap_err(),
            Error::InvalidOrdering {
                reason: OrderingError::UnknownId {
                    id: elsewhere.raw()
                }
            }
        );
    }

    #[tokio::test]
    async fn moving_an_item_to_another_story_appends_it() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let menu = create_story(&db, story("Menu")).await.unwrap();
        let news = create_story(&db, story("News")).await.unwrap();
        let a = create_story_item(&db, frame(menu.id)).await.unwrap().id;
        let b = create_story_item(&db, frame(menu.id)).await.unwrap().id;
        let c = create_story_item(&db, frame(menu.id)).await.unwrap().id;
        let d = create_story_item(&db, frame(news.id)).await.unwrap().id;

        let moved = update_story_item(&db, a, frame(news.id)).await.unwrap();

        assert_eq!(moved.story_id, news.id);
        assert_eq!(moved.display_order, 2);
        let menu_items = get_story_items(&db, Some(menu.id)).await.unwrap();
        assert_eq!(order(&menu_items), (vec![b, c], vec![1, 2]));
        let news_items = get_story_items(&db, Some(news.id)).await.unwrap();
        assert_eq!(order(&news_items), (vec![d, a], vec![1, 2]));
    }

    #[tokio::test]
    async fn move_story_item_stays_in_its_story() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let menu = create_story(&db, story("Menu")).await.unwrap();
        let a = create_story_item(&db, frame(menu.id)).await.unwrap().id;
        let b = create_story_item(&db, frame(menu.id)).await.unwrap().id;

        let items = move_story_item(&db, a, 5).await.unwrap();

        assert_eq!(order(&items), (vec![b, a], vec![1, 2]));
    }

    #[tokio::test]
    async fn deleting_an_item_closes_the_gap() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let menu = create_story(&db, story("Menu")).await.unwrap();
        let a = create_story_item(&db, frame(menu.id)).await.unwrap().id;
        let b = create_story_item(&db, frame(menu.id)).await.unwrap().id;
        let c = create_story_item(&db, frame(menu.id)).await.unwrap().id;

        delete_story_item(&db, b).await.unwrap();

        let items = get_story_items(&db, Some(menu.id)).await.unwrap();
        assert_eq!(order(&items), (vec![a, c], vec![1, 2]));
    }

    #[tokio::test]
    async fn deleting_a_story_removes_items_and_compacts_stories() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let menu = create_story(&db, story("Menu")).await.unwrap();
        let news = create_story(&db, story("News")).await.unwrap();
        create_story_item(&db, frame(menu.id)).await.unwrap();

        delete_story(&db, menu.id).await.unwrap();

        let stories = get_stories(&db).await.unwrap();
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].id, news.id);
        assert_eq!(stories[0].display_order, 1);
        assert!(get_story_items(&db, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_story_items_empties_only_that_story() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let menu = create_story(&db, story("Menu")).await.unwrap();
        let news = create_story(&db, story("News")).await.unwrap();
        create_story_item(&db, frame(menu.id)).await.unwrap();
        create_story_item(&db, frame(menu.id)).await.unwrap();
        create_story_item(&db, frame(news.id)).await.unwrap();

        let deleted = delete_story_items(&db, menu.id).await.unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(get_story_items(&db, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn item_for_unknown_story_is_rejected() {
        let db = SqliteDatabase::in_memory().await.unwrap();

        let result = create_story_item(&db, frame(StoryId::from_raw(3))).await;

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidField {
                field: "story_id",
                reason: "no story has this id",
            }
        );
    }
}
