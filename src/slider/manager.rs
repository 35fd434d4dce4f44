use crate::database::Database;
use crate::error::Error;

use super::{Slider, SliderFields, SliderId};

#[tracing::instrument(skip(db))]
pub async fn create_slider(db: &dyn Database, fields: SliderFields) -> Result<Slider, Error> {
    let slider = db.sliders().insert_slider(&fields).await?;

    Ok(slider)
}

#[tracing::instrument(skip(db))]
pub async fn get_sliders(db: &dyn Database) -> Result<Vec<Slider>, Error> {
    let sliders = db.sliders().fetch_sliders().await?;

    Ok(sliders)
}

#[tracing::instrument(skip(db))]
pub async fn update_slider(
    db: &dyn Database,
    slider_id: SliderId,
    fields: SliderFields,
) -> Result<Slider, Error> {
    let slider = db
        .sliders()
        .update_slider(slider_id, &fields)
        .await?
        .ok_or(Error::SliderNotFound { slider_id })?;

    Ok(slider)
}

#[tracing::instrument(skip(db))]
pub async fn delete_slider(db: &dyn Database, slider_id: SliderId) -> Result<(), Error> {
    if !db.sliders().delete_slider(slider_id).await? {
        return Err(Error::SliderNotFound { slider_id });
    }

    Ok(())
}

/// Puts every slider into the given order and returns the new list.
#[tracing::instrument(skip(db))]
pub async fn reorder_sliders(db: &dyn Database, slider_ids: &[i64]) -> Result<Vec<Slider>, Error> {
    let written = db.sliders().reorder_sliders(slider_ids).await?;
    tracing::debug!(written, "sliders reordered");

    get_sliders(db).await
}

#[tracing::instrument(skip(db))]
pub async fn move_slider(
    db: &dyn Database,
    slider_id: SliderId,
    to_index: usize,
) -> Result<Vec<Slider>, Error> {
    db.sliders()
        .move_slider(slider_id, to_index)
        .await?
        .ok_or(Error::SliderNotFound { slider_id })?;

    get_sliders(db).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SqliteDatabase;
    use crate::ordering::OrderingError;

    fn banner(title: &str) -> SliderFields {
        SliderFields {
            title: title.into(),
            description: None,
            image_url: None,
            link_url: None,
            is_active: true,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_on_shared_file_get_distinct_positions() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("catalog.db").display());
        let db = SqliteDatabase::connect(&url).await.unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|index| {
                let db = db.clone();
                tokio::spawn(async move {
                    create_slider(&db, banner(&format!("Banner {}", index)))
                        .await
                        .map_err(|error| format!("{:?}", error))
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let sliders = get_sliders(&db).await.unwrap();
        let orders: Vec<i32> = sliders.iter().map(|slider| slider.display_order).collect();
        assert_eq!(orders, (1..=16).collect::<Vec<i32>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_deletes_on_shared_file_keep_positions_contiguous() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("catalog.db").display());
        let db = SqliteDatabase::connect(&url).await.unwrap();
        let mut ids = vec![];
        for index in 0..12 {
            let slider = create_slider(&db, banner(&format!("Banner {}", index)))
                .await
                .unwrap();
            ids.push(slider.id);
        }

        let tasks: Vec<_> = ids
            .iter()
            .step_by(2)
            .map(|&slider_id| {
                let db = db.clone();
                tokio::spawn(async move {
                    delete_slider(&db, slider_id)
                        .await
                        .map_err(|error| format!("{:?}", error))
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let sliders = get_sliders(&db).await.unwrap();
        let orders: Vec<i32> = sliders.iter().map(|slider| slider.display_order).collect();
        assert_eq!(orders, (1..=6).collect::<Vec<i32>>());
    }

    async fn three_sliders(db: &SqliteDatabase) -> Vec<i64> {
        let mut ids = vec![];
        for title in ["Spring", "Summer", "Autumn"] {
            ids.push(create_slider(db, banner(title)).await.unwrap().id.raw());
        }
        ids
    }

    fn order(sliders: &[Slider]) -> (Vec<i64>, Vec<i32>) {
        (
            sliders.iter().map(|s| s.id.raw()).collect(),
            sliders.iter().map(|s| s.display_order).collect(),
        )
    }

    #[tokio::test]
    async fn new_sliders_are_appended() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let ids = three_sliders(&db).await;

        let (listed, positions) = order(&get_sliders(&db).await.unwrap());

        assert_eq!(listed, ids);
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn every_permutation_is_persisted() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let ids = three_sliders(&db).await;
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        for permutation in [
            [a, b, c],
            [a, c, b],
            [b, a, c],
            [b, c, a],
            [c, a, b],
            [c, b, a],
        ] {
            let sliders = reorder_sliders(&db, &permutation).await.unwrap();
            let (listed, positions) = order(&sliders);
            assert_eq!(listed, permutation.to_vec());
            assert_eq!(positions, vec![1, 2, 3]);
        }
    }

    #[tokio::test]
    async fn invalid_reorder_changes_nothing() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let ids = three_sliders(&db).await;

        let result = reorder_sliders(&db, &[ids[2], ids[0]]).await;

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidOrdering {
                reason: OrderingError::MissingIds { ids: vec![ids[1]] }
            }
        );
        assert_eq!(order(&get_sliders(&db).await.unwrap()).0, ids);
    }

    #[tokio::test]
    async fn move_to_same_index_writes_nothing() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let ids = three_sliders(&db).await;
        let before = get_sliders(&db).await.unwrap();

        let written = db
            .sliders()
            .move_slider(SliderId::from_raw(ids[1]), 1)
            .await
            .unwrap();

        assert_eq!(written, Some(0));
        let after = get_sliders(&db).await.unwrap();
        assert_eq!(after[1].updated_at, before[1].updated_at);
    }

    #[tokio::test]
    async fn move_slider_shifts_neighbours() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let ids = three_sliders(&db).await;

        let sliders = move_slider(&db, SliderId::from_raw(ids[2]), 0).await.unwrap();

        assert_eq!(order(&sliders), (vec![ids[2], ids[0], ids[1]], vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn deleting_closes_the_gap() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let ids = three_sliders(&db).await;

        delete_slider(&db, SliderId::from_raw(ids[0])).await.unwrap();

        assert_eq!(
            order(&get_sliders(&db).await.unwrap()),
            (vec![ids[1], ids[2]], vec![1, 2])
        );
    }

    #[tokio::test]
    async fn update_keeps_position() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let ids = three_sliders(&db).await;

        let slider = update_slider(&db, SliderId::from_raw(ids[1]), banner("Winter"))
            .await
            .unwrap();

        assert_eq!(slider.title, "Winter".to_string());
        assert_eq!(slider.display_order, 2);
    }

    #[tokio::test]
    async fn move_unknown_slider_is_not_found() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        three_sliders(&db).await;
        let slider_id = SliderId::from_raw(77);

        let result = move_slider(&db, slider_id, 0).await;

        assert_eq!(result.unwrap_err(), Error::SliderNotFound { slider_id });
    }
}
