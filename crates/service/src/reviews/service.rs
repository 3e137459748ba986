use std::sync::Arc;

use models::{NewReview, Review, ReviewPatch};
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::reviews::repository::ReviewRepository;

/// Application service over the `reviews` collection.
pub struct ReviewService<R: ReviewRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: ReviewRepository + ?Sized> ReviewService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, input), fields(service_id = %input.service_id))]
    pub async fn create(&self, input: NewReview) -> Result<Option<String>, ServiceError> {
        input.validate()?;
        let id = self.repo.insert(input).await?;
        if let Some(id) = &id {
            info!(review_id = %id, "review_created");
        }
        Ok(id)
    }

    pub async fn list_for_service(&self, service_id: &str) -> Result<Vec<Review>, ServiceError> {
        self.repo.list_by_service(service_id).await
    }

    /// Reviews owned by `email`. Callers must have checked ownership first.
    pub async fn list_for_owner(&self, email: &str) -> Result<Vec<Review>, ServiceError> {
        self.repo.list_by_email(email).await
    }

    /// Fetch by id as a zero- or one-element list.
    pub async fn get(&self, raw_id: &str) -> Result<Vec<Review>, ServiceError> {
        let id = models::id::parse_object_id(raw_id)?;
        Ok(self.repo.find_by_id(id).await?.into_iter().collect())
    }

    /// Returns whether a review matched the id.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, raw_id: &str, patch: ReviewPatch) -> Result<bool, ServiceError> {
        let id = models::id::parse_object_id(raw_id)?;
        patch.validate()?;
        let matched = self.repo.update(id, &patch).await?;
        if matched {
            info!(review_id = %raw_id, "review_updated");
        }
        Ok(matched)
    }

    /// Returns whether a review was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, raw_id: &str) -> Result<bool, ServiceError> {
        let id = models::id::parse_object_id(raw_id)?;
        let removed = self.repo.delete(id).await?;
        if removed {
            info!(review_id = %raw_id, "review_deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::repository::mock::MemoryReviewRepository;
    use serde_json::json;

    fn svc() -> ReviewService<MemoryReviewRepository> {
        ReviewService::new(Arc::new(MemoryReviewRepository::default()))
    }

    fn review(user: &str, email: &str, service_id: &str, date: i64) -> NewReview {
        serde_json::from_value(json!({
            "user_name": user, "email": email, "service_id": service_id, "date": date
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn reviews_by_service_are_newest_first() -> anyhow::Result<()> {
        let svc = svc();
        svc.create(review("Alice", "a@x.com", "S1", 100)).await?;
        svc.create(review("Bob", "b@x.com", "S1", 300)).await?;
        svc.create(review("Carol", "c@x.com", "S2", 200)).await?;

        let s1: Vec<_> = svc.list_for_service("S1").await?.into_iter().map(|r| r.user_name).collect();
        assert_eq!(s1, vec!["Bob", "Alice"]);
        assert_eq!(svc.list_for_owner("c@x.com").await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn same_patch_twice_equals_once() -> anyhow::Result<()> {
        let svc = svc();
        let id = svc.create(review("Alice", "a@x.com", "S1", 100)).await?.expect("id");
        let patch: ReviewPatch = serde_json::from_value(json!({"text": "updated", "rating": 3}))?;

        assert!(svc.update(&id, patch.clone()).await?);
        let once = svc.get(&id).await?;
        assert!(svc.update(&id, patch).await?);
        let twice = svc.get(&id).await?;
        assert_eq!(once, twice);
        assert_eq!(twice[0].extra["text"], "updated");
        Ok(())
    }

    #[tokio::test]
    async fn delete_then_get_is_empty() -> anyhow::Result<()> {
        let svc = svc();
        let id = svc.create(review("Alice", "a@x.com", "S1", 100)).await?.expect("id");
        assert!(svc.delete(&id).await?);
        assert!(svc.get(&id).await?.is_empty());
        // second delete finds nothing
        assert!(!svc.delete(&id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn update_of_unknown_id_reports_no_match() -> anyhow::Result<()> {
        let svc = svc();
        let patch: ReviewPatch = serde_json::from_value(json!({"text": "x"}))?;
        assert!(!svc.update("63756f8ad1c9a7a1b2c3d4e5", patch).await?);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_ids_are_typed_errors() {
        let svc = svc();
        assert_eq!(svc.get("abc").await, Err(ServiceError::InvalidId("abc".into())));
        assert_eq!(svc.delete("abc").await, Err(ServiceError::InvalidId("abc".into())));
        let patch = ReviewPatch { date: Some(1), ..Default::default() };
        assert_eq!(svc.update("abc", patch).await, Err(ServiceError::InvalidId("abc".into())));
    }
}
