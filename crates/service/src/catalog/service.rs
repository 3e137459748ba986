use std::sync::Arc;

use models::{NewVisaService, VisaService};
use tracing::{info, instrument};

use crate::catalog::repository::ServiceRepository;
use crate::errors::ServiceError;

/// Application service over the `services` collection.
pub struct CatalogService<R: ServiceRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: ServiceRepository + ?Sized> CatalogService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Validate and insert; `Ok(None)` means the store reported no id.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: NewVisaService) -> Result<Option<String>, ServiceError> {
        input.validate()?;
        let id = self.repo.insert(input).await?;
        if let Some(id) = &id {
            info!(service_id = %id, "service_created");
        }
        Ok(id)
    }

    pub async fn list(&self) -> Result<Vec<VisaService>, ServiceError> {
        self.repo.list_newest_first().await
    }

    /// Fetch by hex id. A malformed id is an error; an unknown one is `Ok(None)`.
    pub async fn get(&self, raw_id: &str) -> Result<Option<VisaService>, ServiceError> {
        let id = models::id::parse_object_id(raw_id)?;
        self.repo.find_by_id(id).await
    }
}
