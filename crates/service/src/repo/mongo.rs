use async_trait::async_trait;
use futures_util::TryStreamExt;
use models::{db::StoreHandle, NewReview, NewVisaService, Review, ReviewPatch, VisaService};
use mongodb::{
    bson::{self, doc, oid::ObjectId, Bson, Document},
    options::FindOptions,
    Collection,
};
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::catalog::repository::ServiceRepository;
use crate::errors::ServiceError;
use crate::reviews::repository::ReviewRepository;

/// MongoDB-backed repository for the `services` collection.
pub struct MongoServiceRepository {
    pub collection: Collection<Document>,
}

impl MongoServiceRepository {
    pub fn new(store: &StoreHandle) -> Self {
        Self { collection: store.collection(models::db::SERVICES_COLLECTION) }
    }
}

/// MongoDB-backed repository for the `reviews` collection.
pub struct MongoReviewRepository {
    pub collection: Collection<Document>,
}

impl MongoReviewRepository {
    pub fn new(store: &StoreHandle) -> Self {
        Self { collection: store.collection(models::db::REVIEWS_COLLECTION) }
    }
}

fn store_err(op: &'static str) -> impl Fn(mongodb::error::Error) -> ServiceError {
    move |e| {
        error!(op, error = %e, "store operation failed");
        ServiceError::store(e)
    }
}

fn newest_first() -> FindOptions {
    FindOptions::builder().sort(doc! { "date": -1 }).build()
}

/// Render the ObjectId `_id` as its hex string so the typed models stay
/// independent of BSON.
fn from_store_document<T: DeserializeOwned>(mut doc: Document) -> Result<T, ServiceError> {
    if let Some(Bson::ObjectId(oid)) = doc.get("_id") {
        let hex = oid.to_hex();
        doc.insert("_id", hex);
    }
    bson::from_document(doc).map_err(ServiceError::store)
}

async fn insert_document<T: serde::Serialize>(
    collection: &Collection<Document>,
    input: &T,
) -> Result<Option<String>, ServiceError> {
    let doc = bson::to_document(input).map_err(ServiceError::store)?;
    let res = collection.insert_one(doc, None).await.map_err(store_err("insert_one"))?;
    Ok(res.inserted_id.as_object_id().map(|oid| oid.to_hex()))
}

async fn find_all<T: DeserializeOwned>(
    collection: &Collection<Document>,
    filter: Document,
    options: Option<FindOptions>,
) -> Result<Vec<T>, ServiceError> {
    let cursor = collection.find(filter, options).await.map_err(store_err("find"))?;
    let docs: Vec<Document> = cursor.try_collect().await.map_err(store_err("find"))?;
    Ok(decode_listing(collection.name(), docs))
}

/// Decode a batch, skipping documents that do not fit the typed model so one
/// bad legacy record does not hide the rest of the collection.
fn decode_listing<T: DeserializeOwned>(collection: &str, docs: Vec<Document>) -> Vec<T> {
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        let id = doc.get("_id").map(ToString::to_string);
        match from_store_document(doc) {
            Ok(item) => out.push(item),
            Err(e) => warn!(collection, id = ?id, error = %e, "skipping undecodable document"),
        }
    }
    out
}

#[async_trait]
impl ServiceRepository for MongoServiceRepository {
    async fn insert(&self, input: NewVisaService) -> Result<Option<String>, ServiceError> {
        insert_document(&self.collection, &input).await
    }

    async fn list_newest_first(&self) -> Result<Vec<VisaService>, ServiceError> {
        find_all(&self.collection, doc! {}, Some(newest_first())).await
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<VisaService>, ServiceError> {
        let found = self
            .collection
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(store_err("find_one"))?;
        found.map(from_store_document).transpose()
    }
}

#[async_trait]
impl ReviewRepository for MongoReviewRepository {
    async fn insert(&self, input: NewReview) -> Result<Option<String>, ServiceError> {
        insert_document(&self.collection, &input).await
    }

    async fn list_by_service(&self, service_id: &str) -> Result<Vec<Review>, ServiceError> {
        find_all(&self.collection, doc! { "service_id": service_id }, Some(newest_first())).await
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Review>, ServiceError> {
        find_all(&self.collection, doc! { "email": email }, None).await
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Review>, ServiceError> {
        let found = self
            .collection
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(store_err("find_one"))?;
        found.map(from_store_document).transpose()
    }

    async fn update(&self, id: ObjectId, patch: &ReviewPatch) -> Result<bool, ServiceError> {
        let set = bson::to_document(patch).map_err(ServiceError::store)?;
        let res = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
            .await
            .map_err(store_err("update_one"))?;
        Ok(res.matched_count > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, ServiceError> {
        let res = self
            .collection
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(store_err("delete_one"))?;
        Ok(res.deleted_count > 0)
    }
}
