use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use models::{NewReview, NewVisaService, Review, ReviewPatch, VisaService};
use mongodb::bson::oid::ObjectId;

use crate::catalog::repository::ServiceRepository;
use crate::errors::ServiceError;
use crate::reviews::repository::ReviewRepository;
use crate::storage::json_map_store::JsonMapStore;

/// File-backed `services` collection, one JSON file keyed by hex id.
/// Meant for local development without a MongoDB deployment.
#[derive(Clone)]
pub struct FileServiceRepository {
    store: Arc<JsonMapStore<String, VisaService>>,
}

impl FileServiceRepository {
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = data_dir.as_ref().join(format!("{}.json", models::db::SERVICES_COLLECTION));
        Ok(Self { store: JsonMapStore::new(path).await? })
    }
}

#[derive(Clone)]
pub struct FileReviewRepository {
    store: Arc<JsonMapStore<String, Review>>,
}

impl FileReviewRepository {
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = data_dir.as_ref().join(format!("{}.json", models::db::REVIEWS_COLLECTION));
        Ok(Self { store: JsonMapStore::new(path).await? })
    }
}

#[async_trait]
impl ServiceRepository for FileServiceRepository {
    async fn insert(&self, input: NewVisaService) -> Result<Option<String>, ServiceError> {
        let id = models::id::new_id();
        self.store.insert(id.clone(), input.into_service(id.clone())).await?;
        Ok(Some(id))
    }

    async fn list_newest_first(&self) -> Result<Vec<VisaService>, ServiceError> {
        let mut all = self.store.values().await;
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(all)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<VisaService>, ServiceError> {
        Ok(self.store.get(&id.to_hex()).await)
    }
}

#[async_trait]
impl ReviewRepository for FileReviewRepository {
    async fn insert(&self, input: NewReview) -> Result<Option<String>, ServiceError> {
        let id = models::id::new_id();
        self.store.insert(id.clone(), input.into_review(id.clone())).await?;
        Ok(Some(id))
    }

    async fn list_by_service(&self, service_id: &str) -> Result<Vec<Review>, ServiceError> {
        let mut found = self.store.filter(|r| r.service_id == service_id).await;
        found.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(found)
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Review>, ServiceError> {
        Ok(self.store.filter(|r| r.email == email).await)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Review>, ServiceError> {
        Ok(self.store.get(&id.to_hex()).await)
    }

    async fn update(&self, id: ObjectId, patch: &ReviewPatch) -> Result<bool, ServiceError> {
        self.store.modify(&id.to_hex(), |review| review.apply(patch)).await
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, ServiceError> {
        self.store.remove(&id.to_hex()).await
    }
}
