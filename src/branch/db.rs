use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;

use crate::database::SqliteBranchStore;
use crate::error::Error;

use super::{Branch, BranchFields, BranchId};

#[async_trait]
pub trait BranchStore: Send + Sync {
    async fn insert_branch(&self, fields: &BranchFields) -> Result<Branch, Error>;

    async fn fetch_branches(&self) -> Result<Vec<Branch>, Error>;

    async fn update_branch(
        &self,
        branch_id: BranchId,
        fields: &BranchFields,
    ) -> Result<Option<Branch>, Error>;

    async fn delete_branch(&self, branch_id: BranchId) -> Result<bool, Error>;
}

#[async_trait]
impl BranchStore for SqliteBranchStore {
    #[tracing::instrument(skip(self))]
    async fn insert_branch(&self, fields: &BranchFields) -> Result<Branch, Error> {
        let now = Utc::now();
        let branch = sqlx::query_as::<_, Branch>(
            "INSERT INTO branches (name, address, location, phone, email, latitude, longitude, working_hours,
                                   is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&fields.name)
        .bind(&fields.address)
        .bind(&fields.location)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(fields.latitude)
        .bind(fields.longitude)
        .bind(fields.working_hours.as_ref().map(Json))
        .bind(fields.is_active)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(branch)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_branches(&self) -> Result<Vec<Branch>, Error> {
        let branches = sqlx::query_as::<_, Branch>("SELECT * FROM branches ORDER BY id")
            .fetch_all(self.pool())
            .await?;

        Ok(branches)
    }

    #[tracing::instrument(skip(self))]
    async fn update_branch(
        &self,
        branch_id: BranchId,
        fields: &BranchFields,
    ) -> Result<Option<Branch>, Error> {
        let branch = sqlx::query_as::<_, Branch>(
            "UPDATE branches
             SET name = ?, address = ?, location = ?, phone = ?, email = ?, latitude = ?, longitude = ?,
                 working_hours = ?, is_active = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&fields.name)
        .bind(&fields.address)
        .bind(&fields.location)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(fields.latitude)
        .bind(fields.longitude)
        .bind(fields.working_hours.as_ref().map(Json))
        .bind(fields.is_active)
        .bind(Utc::now())
        .bind(branch_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(branch)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_branch(&self, branch_id: BranchId) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM branches WHERE id = ?")
            .bind(branch_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
