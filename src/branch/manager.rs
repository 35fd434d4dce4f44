use crate::database::Database;
use crate::error::Error;

use super::{Branch, BranchFields, BranchId};

#[tracing::instrument(skip(db))]
pub async fn create_branch(db: &dyn Database, fields: BranchFields) -> Result<Branch, Error> {
    let branch = db.branches().insert_branch(&fields).await?;

    Ok(branch)
}

#[tracing::instrument(skip(db))]
pub async fn get_branches(db: &dyn Database) -> Result<Vec<Branch>, Error> {
    let branches = db.branches().fetch_branches().await?;

    Ok(branches)
}

#[tracing::instrument(skip(db))]
pub async fn update_branch(
    db: &dyn Database,
    branch_id: BranchId,
    fields: BranchFields,
) -> Result<Branch, Error> {
    let branch = db
        .branches()
        .update_branch(branch_id, &fields)
        .await?
        .ok_or(Error::BranchNotFound { branch_id })?;

    Ok(branch)
}

#[tracing::instrument(skip(db))]
pub async fn delete_branch(db: &dyn Database, branch_id: BranchId) -> Result<(), Error> {
    if !db.branches().delete_branch(branch_id).await? {
        return Err(Error::BranchNotFound { branch_id });
    }

    Ok(())
}
