use crate::database::Database;
use crate::error::Error;

use super::{Category, CategoryFields, CategoryId};

#[tracing::instrument(skip(db))]
pub async fn create_category(db: &dyn Database, fields: CategoryFields) -> Result<Category, Error> {
    let category = db.categories().insert_category(&fields).await?;

    Ok(category)
}

#[tracing::instrument(skip(db))]
pub async fn get_categories(db: &dyn Database) -> Result<Vec<Category>, Error> {
    let categories = db.categories().fetch_categories().await?;

    Ok(categories)
}

#[tracing::instrument(skip(db))]
pub async fn get_category_by_id(
    db: &dyn Database,
    category_id: CategoryId,
) -> Result<Category, Error> {
    let category = db
        .categories()
        .fetch_category_by_id(category_id)
        .await?
        .ok_or(Error::CategoryNotFound { category_id })?;

    Ok(category)
}

#[tracing::instrument(skip(db))]
pub async fn update_category(
    db: &dyn Database,
    category_id: CategoryId,
    fields: CategoryFields,
) -> Result<Category, Error> {
    let category = db
        .categories()
        .update_category(category_id, &fields)
        .await?
        .ok_or(Error::CategoryNotFound { category_id })?;

    Ok(category)
}

/// Deletes a category that no product references any more.
#[tracing::instrument(skip(db))]
pub async fn delete_category(db: &dyn Database, category_id: CategoryId) -> Result<(), Error> {
    let _ = get_category_by_id(db, category_id).await?;

    let product_count = db
        .products()
        .count_products_by_category(category_id)
        .await?;
    if product_count > 0 {
        return Err(Error::CategoryHasProducts {
            category_id,
            product_count,
        });
    }

    if !db.categories().delete_category(category_id).await? {
        return Err(Error::CategoryNotFound { category_id });
    }

    Ok(())
}
