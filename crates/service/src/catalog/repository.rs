use async_trait::async_trait;
use models::{NewVisaService, VisaService};
use mongodb::bson::oid::ObjectId;

use crate::errors::ServiceError;

/// Persistence for the `services` collection.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Insert and return the store-assigned id, or `None` if the store
    /// acknowledged the write without reporting one.
    async fn insert(&self, input: NewVisaService) -> Result<Option<String>, ServiceError>;
    /// All services ordered by `date` descending.
    async fn list_newest_first(&self) -> Result<Vec<VisaService>, ServiceError>;
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<VisaService>, ServiceError>;
}

/// Simple in-memory repository for tests and local wiring
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryServiceRepository {
        rows: Mutex<Vec<VisaService>>,
        reads: AtomicUsize,
    }

    impl MemoryServiceRepository {
        /// Number of read operations served so far.
        pub fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }

        fn rows(&self) -> Result<std::sync::MutexGuard<'_, Vec<VisaService>>, ServiceError> {
            self.rows.lock().map_err(|_| ServiceError::Store("memory store poisoned".into()))
        }
    }

    #[async_trait]
    impl ServiceRepository for MemoryServiceRepository {
        async fn insert(&self, input: NewVisaService) -> Result<Option<String>, ServiceError> {
            let id = models::id::new_id();
            self.rows()?.push(input.into_service(id.clone()));
            Ok(Some(id))
        }

        async fn list_newest_first(&self) -> Result<Vec<VisaService>, ServiceError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let mut out = self.rows()?.clone();
            out.sort_by(|a, b| b.date.cmp(&a.date));
            Ok(out)
        }

        async fn find_by_id(&self, id: ObjectId) -> Result<Option<VisaService>, ServiceError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let hex = id.to_hex();
            Ok(self.rows()?.iter().find(|s| s.id.as_deref() == Some(hex.as_str())).cloned())
        }
    }
}
