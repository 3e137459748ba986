use async_trait::async_trait;
use models::{NewReview, Review, ReviewPatch};
use mongodb::bson::oid::ObjectId;

use crate::errors::ServiceError;

/// Persistence for the `reviews` collection.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn insert(&self, input: NewReview) -> Result<Option<String>, ServiceError>;
    /// Reviews of one service ordered by `date` descending.
    async fn list_by_service(&self, service_id: &str) -> Result<Vec<Review>, ServiceError>;
    /// Reviews written under `email`, in store order.
    async fn list_by_email(&self, email: &str) -> Result<Vec<Review>, ServiceError>;
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Review>, ServiceError>;
    /// Merge `patch` into the matching review; returns whether one matched.
    async fn update(&self, id: ObjectId, patch: &ReviewPatch) -> Result<bool, ServiceError>;
    /// Returns whether a review was removed.
    async fn delete(&self, id: ObjectId) -> Result<bool, ServiceError>;
}

/// Simple in-memory repository for tests and local wiring
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MemoryReviewRepository {
        rows: Mutex<Vec<Review>>,
        reads: AtomicUsize,
    }

    impl MemoryReviewRepository {
        /// Number of read operations served so far.
        pub fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }

        fn rows(&self) -> Result<MutexGuard<'_, Vec<Review>>, ServiceError> {
            self.rows.lock().map_err(|_| ServiceError::Store("memory store poisoned".into()))
        }

        fn read(&self) {
            self.reads.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ReviewRepository for MemoryReviewRepository {
        async fn insert(&self, input: NewReview) -> Result<Option<String>, ServiceError> {
            let id = models::id::new_id();
            self.rows()?.push(input.into_review(id.clone()));
            Ok(Some(id))
        }

        async fn list_by_service(&self, service_id: &str) -> Result<Vec<Review>, ServiceError> {
            self.read();
            let mut out: Vec<Review> =
                self.rows()?.iter().filter(|r| r.service_id == service_id).cloned().collect();
            out.sort_by(|a, b| b.date.cmp(&a.date));
            Ok(out)
        }

        async fn list_by_email(&self, email: &str) -> Result<Vec<Review>, ServiceError> {
            self.read();
            Ok(self.rows()?.iter().filter(|r| r.email == email).cloned().collect())
        }

        async fn find_by_id(&self, id: ObjectId) -> Result<Option<Review>, ServiceError> {
            self.read();
            let hex = id.to_hex();
            Ok(self.rows()?.iter().find(|r| r.id.as_deref() == Some(hex.as_str())).cloned())
        }

        async fn update(&self, id: ObjectId, patch: &ReviewPatch) -> Result<bool, ServiceError> {
            let hex = id.to_hex();
            let mut rows = self.rows()?;
            match rows.iter_mut().find(|r| r.id.as_deref() == Some(hex.as_str())) {
                Some(review) => {
                    review.apply(patch);
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, id: ObjectId) -> Result<bool, ServiceError> {
            let hex = id.to_hex();
            let mut rows = self.rows()?;
            let before = rows.len();
            rows.retain(|r| r.id.as_deref() != Some(hex.as_str()));
            Ok(rows.len() != before)
        }
    }
}
