use crate::category::CategoryId;
use crate::database::Database;
use crate::error::Error;

use super::{Product, ProductFields, ProductId};

/// Rejects a product that points at a category that does not exist.
async fn check_category(db: &dyn Database, category_id: Option<CategoryId>) -> Result<(), Error> {
    if let Some(category_id) = category_id {
        if db
            .categories()
            .fetch_category_by_id(category_id)
            .await?
            .is_none()
        {
            return Err(Error::InvalidField {
                field: "category_id",
                reason: "no category has this id",
            });
        }
    }

    Ok(())
}

#[tracing::instrument(skip(db))]
pub async fn create_product(db: &dyn Database, fields: ProductFields) -> Result<Product, Error> {
    check_category(db, fields.category_id).await?;

    let product = db.products().insert_product(&fields).await?;

    Ok(product)
}

#[tracing::instrument(skip(db))]
pub async fn get_products(
    db: &dyn Database,
    category_id: Option<CategoryId>,
) -> Result<Vec<Product>, Error> {
    let products = db.products().fetch_products(category_id).await?;

    Ok(products)
}

#[tracing::instrument(skip(db))]
pub async fn get_product_by_id(db: &dyn Database, product_id: ProductId) -> Result<Product, Error> {
    let product = db
        .products()
        .fetch_product_by_id(product_id)
        .await?
        .ok_or(Error::ProductNotFound { product_id })?;

    Ok(product)
}

#[tracing::instrument(skip(db))]
pub async fn update_product(
    db: &dyn Database,
    product_id: ProductId,
    fields: ProductFields,
) -> Result<Product, Error> {
    check_category(db, fields.category_id).await?;

    let product = db
        .products()
        .update_product(product_id, &fields)
        .await?
        .ok_or(Error::ProductNotFound { product_id })?;

    Ok(product)
}

#[tracing::instrument(skip(db))]
pub async fn delete_product(db: &dyn Database, product_id: ProductId) -> Result<(), Error> {
    if !db.products().delete_product(product_id).await? {
        return Err(Error::ProductNotFound { product_id });
    }

    Ok(())
}
