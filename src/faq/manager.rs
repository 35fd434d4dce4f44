use crate::database::Database;
use crate::error::Error;

use super::{Faq, FaqFields, FaqId};

#[tracing::instrument(skip(db))]
pub async fn create_faq(db: &dyn Database, fields: FaqFields) -> Result<Faq, Error> {
    let faq = db.faqs().insert_faq(&fields).await?;

    Ok(faq)
}

#[tracing::instrument(skip(db))]
pub async fn get_faqs(db: &dyn Database, include_inactive: bool) -> Result<Vec<Faq>, Error> {
    let faqs = db.faqs().fetch_faqs(include_inactive).await?;

    Ok(faqs)
}

#[tracing::instrument(skip(db))]
pub async fn update_faq(db: &dyn Database, faq_id: FaqId, fields: FaqFields) -> Result<Faq, Error> {
    let faq = db
        .faqs()
        .update_faq(faq_id, &fields)
        .await?
        .ok_or(Error::FaqNotFound { faq_id })?;

    Ok(faq)
}

#[tracing::instrument(skip(db))]
pub async fn delete_faq(db: &dyn Database, faq_id: FaqId) -> Result<(), Error> {
    if !db.faqs().delete_faq(faq_id).await? {
        return Err(Error::FaqNotFound { faq_id });
    }

    Ok(())
}

/// Reorders every FAQ, inactive ones included, and returns the full list.
#[tracing::instrument(skip(db))]
pub async fn reorder_faqs(db: &dyn Database, faq_ids: &[i64]) -> Result<Vec<Faq>, Error> {
    let written = db.faqs().reorder_faqs(faq_ids).await?;
    tracing::debug!(written, "faqs reordered");

    get_faqs(db, true).await
}

#[tracing::instrument(skip(db))]
pub async fn move_faq(db: &dyn Database, faq_id: FaqId, to_index: usize) -> Result<Vec<Faq>, Error> {
    db.faqs()
        .move_faq(faq_id, to_index)
        .await?
        .ok_or(Error::FaqNotFound { faq_id })?;

    get_faqs(db, true).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SqliteDatabase;
    use crate::ordering::OrderingError;

    fn faq(question: &str, is_active: bool) -> FaqFields {
        FaqFields {
            question: question.into(),
            answer: "Yes".into(),
            category: Some("general".into()),
            is_active,
        }
    }

    #[tokio::test]
    async fn inactive_faqs_are_hidden_by_default() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let shown = create_faq(&db, faq("Do you have wifi?", true)).await.unwrap();
        create_faq(&db, faq("Do you deliver?", false)).await.unwrap();

        let public = get_faqs(&db, false).await.unwrap();
        let all = get_faqs(&db, true).await.unwrap();

        assert_eq!(public.len(), 1);
        assert_eq!(public[0].id, shown.id);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let a = create_faq(&db, faq("A?", true)).await.unwrap().id.raw();
        let b = create_faq(&db, faq("B?", true)).await.unwrap().id.raw();

        let result = reorder_faqs(&db, &[a, a, b]).await;

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidOrdering {
                reason: OrderingError::DuplicateId { id: a }
            }
        );
    }

    #[tokio::test]
    async fn reorder_includes_inactive_faqs() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let a = create_faq(&db, faq("A?", true)).await.unwrap().id;
        let b = create_faq(&db, faq("B?", false)).await.unwrap().id;
        let c = create_faq(&db, faq("C?", true)).await.unwrap().id;

        let faqs = reorder_faqs(&db, &[b.raw(), c.raw(), a.raw()]).await.unwrap();

        let ids: Vec<_> = faqs.iter().map(|faq| faq.id).collect();
        assert_eq!(ids, vec![b, c, a]);
        let public: Vec<_> = get_faqs(&db, false)
            .await
            .unwrap()
            .iter()
            .map(|faq| faq.id)
            .collect();
        assert_eq!(public, vec![c, a]);
    }

    #[tokio::test]
    async fn move_faq_to_end() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let a = create_faq(&db, faq("A?", true)).await.unwrap().id;
        let b = create_faq(&db, faq("B?", true)).await.unwrap().id;
        let c = create_faq(&db, faq("C?", true)).await.unwrap().id;

        let faqs = move_faq(&db, a, 2).await.unwrap();

        let positions: Vec<_> = faqs.iter().map(|faq| (faq.id, faq.display_order)).collect();
        assert_eq!(positions, vec![(b, 1), (c, 2), (a, 3)]);
    }
}
