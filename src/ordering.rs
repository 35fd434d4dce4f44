//! Display-order maintenance for lists the dashboard re-arranges by hand.
//!
//! Every ordered table carries a `display_order` column. Within one owner
//! scope (a whole table, or the rows sharing a parent id) positions form the
//! sequence `1..=N` once any write through this module has committed.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::Serialize;
use sqlx::{FromRow, Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderingError {
    DuplicateId { id: i64 },
    UnknownId { id: i64 },
    MissingIds { ids: Vec<i64> },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromRow)]
pub struct Placement {
    pub id: i64,
    #[sqlx(rename = "display_order")]
    pub position: i32,
}

/// Computes the writes needed to put a scope into `desired` order.
///
/// `desired` must name every item of the scope exactly once. Only items whose
/// position actually changes are returned.
pub fn plan_reorder(current: &[Placement], desired: &[i64]) -> Result<Vec<Placement>, OrderingError> {
    let positions: HashMap<i64, i32> = current.iter().map(|p| (p.id, p.position)).collect();

    let mut seen = HashSet::with_capacity(desired.len());
    for &id in desired {
        if !positions.contains_key(&id) {
            return Err(OrderingError::UnknownId { id });
        }
        if !seen.insert(id) {
            return Err(OrderingError::DuplicateId { id });
        }
    }

    let missing: Vec<i64> = current
        .iter()
        .map(|p| p.id)
        .filter(|id| !seen.contains(id))
        .collect();
    if !missing.is_empty() {
        return Err(OrderingError::MissingIds { ids: missing });
    }

    let changes = desired
        .iter()
        .enumerate()
        .map(|(index, &id)| Placement {
            id,
            position: index as i32 + 1,
        })
        .filter(|p| positions[&p.id] != p.position)
        .collect();

    Ok(changes)
}

/// Moves the element at `from` so it ends up at `to` (clamped to the end).
///
/// Returns `None` when nothing would move.
pub fn move_within(ids: &[i64], from: usize, to: usize) -> Option<Vec<i64>> {
    if from >= ids.len() {
        return None;
    }

    let to = to.min(ids.len() - 1);
    if from == to {
        return None;
    }

    let mut moved = ids.to_vec();
    let id = moved.remove(from);
    moved.insert(to, id);

    Some(moved)
}

/// Identifies one ordered list: a table, optionally narrowed to the rows
/// owned by a parent.
#[derive(Copy, Clone, Debug)]
pub struct OrderScope {
    table: &'static str,
    owner: Option<(&'static str, i64)>,
}

impl OrderScope {
    pub fn all(table: &'static str) -> OrderScope {
        OrderScope { table, owner: None }
    }

    pub fn owned_by(table: &'static str, column: &'static str, owner_id: i64) -> OrderScope {
        OrderScope {
            table,
            owner: Some((column, owner_id)),
        }
    }

    fn condition(&self) -> String {
        match self.owner {
            Some((column, _)) => format!("WHERE {} = ?", column),
            None => String::new(),
        }
    }
}

/// Starts a transaction that holds the database write lock from its first
/// statement. Any transaction that reads positions before writing them must
/// be opened here.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, Error> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_placements(
    conn: &mut SqliteConnection,
    scope: OrderScope,
) -> Result<Vec<Placement>, Error> {
    let sql = format!(
        "SELECT id, display_order FROM {} {} ORDER BY display_order ASC, id ASC",
        scope.table,
        scope.condition()
    );

    let mut query = sqlx::query_as::<_, Placement>(&sql);
    if let Some((_, owner_id)) = scope.owner {
        query = query.bind(owner_id);
    }

    Ok(query.fetch_all(&mut *conn).await?)
}

#[tracing::instrument(skip(conn))]
pub async fn next_position(conn: &mut SqliteConnection, scope: OrderScope) -> Result<i32, Error> {
    let sql = format!(
        "SELECT COALESCE(MAX(display_order), 0) + 1 FROM {} {}",
        scope.table,
        scope.condition()
    );

    let mut query = sqlx::query_scalar::<_, i32>(&sql);
    if let Some((_, owner_id)) = scope.owner {
        query = query.bind(owner_id);
    }

    Ok(query.fetch_one(&mut *conn).await?)
}

#[tracing::instrument(skip(conn))]
async fn write_placements(
    conn: &mut SqliteConnection,
    scope: OrderScope,
    placements: &[Placement],
) -> Result<(), Error> {
    let sql = format!(
        "UPDATE {} SET display_order = ?, updated_at = ? WHERE id = ?",
        scope.table
    );
    let now = Utc::now();

    for placement in placements {
        sqlx::query(&sql)
            .bind(placement.position)
            .bind(now)
            .bind(placement.id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Closes any gaps left in a scope, keeping the relative order.
#[tracing::instrument(skip(conn))]
pub async fn compact(conn: &mut SqliteConnection, scope: OrderScope) -> Result<(), Error> {
    let current = fetch_placements(conn, scope).await?;
    let ids: Vec<i64> = current.iter().map(|p| p.id).collect();
    let changes = plan_reorder(&current, &ids)?;

    write_placements(conn, scope, &changes).await
}

/// Puts the whole scope into `desired` order in one transaction and returns
/// how many rows were written.
#[tracing::instrument(skip(pool))]
pub async fn reorder(pool: &SqlitePool, scope: OrderScope, desired: &[i64]) -> Result<usize, Error> {
    let mut tx = begin_write(pool).await?;

    let current = fetch_placements(&mut tx, scope).await?;
    let changes = plan_reorder(&current, desired)?;
    write_placements(&mut tx, scope, &changes).await?;

    tx.commit().await?;

    Ok(changes.len())
}

/// Moves one item to `to_index` (0-based) within its scope.
///
/// Returns `None` if the item is not part of the scope, otherwise the number
/// of rows written; moving an item onto its own index writes nothing.
#[tracing::instrument(skip(pool))]
pub async fn move_item(
    pool: &SqlitePool,
    scope: OrderScope,
    item_id: i64,
    to_index: usize,
) -> Result<Option<usize>, Error> {
    let mut tx = begin_write(pool).await?;

    let current = fetch_placements(&mut tx, scope).await?;
    let ids: Vec<i64> = current.iter().map(|p| p.id).collect();
    let from_index = match ids.iter().position(|&id| id == item_id) {
        Some(index) => index,
        None => return Ok(None),
    };

    let desired = match move_within(&ids, from_index, to_index) {
        Some(desired) => desired,
        None => return Ok(Some(0)),
    };

    let changes = plan_reorder(&current, &desired)?;
    write_placements(&mut tx, scope, &changes).await?;

    tx.commit().await?;

    Ok(Some(changes.len()))
}
