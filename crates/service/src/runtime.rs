//! Runtime wiring
//!
//! Opens the configured document store and hands out the repositories built
//! on top of it, so binary crates never touch driver types directly.

use std::sync::Arc;

use configs::{DatabaseConfig, StoreBackend};
use models::db::StoreHandle;
use tracing::info;

use crate::catalog::repository::ServiceRepository;
use crate::repo::{FileReviewRepository, FileServiceRepository, MongoReviewRepository, MongoServiceRepository};
use crate::reviews::repository::ReviewRepository;

/// Ensure the data directory exists (file backend only needs it).
pub async fn ensure_env(data_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_data_dir(data_dir).await
}

/// Repositories for both collections plus the connection they share.
pub struct Repositories {
    pub services: Arc<dyn ServiceRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    store: Option<StoreHandle>,
}

impl Repositories {
    pub async fn open(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        match cfg.backend {
            StoreBackend::Mongo => {
                let store = models::db::connect(cfg).await?;
                info!(backend = "mongo", database = %cfg.name, "document store opened");
                Ok(Self {
                    services: Arc::new(MongoServiceRepository::new(&store)),
                    reviews: Arc::new(MongoReviewRepository::new(&store)),
                    store: Some(store),
                })
            }
            StoreBackend::File => {
                ensure_env(&cfg.data_dir).await?;
                info!(backend = "file", data_dir = %cfg.data_dir, "document store opened");
                Ok(Self {
                    services: Arc::new(FileServiceRepository::open(&cfg.data_dir).await?),
                    reviews: Arc::new(FileReviewRepository::open(&cfg.data_dir).await?),
                    store: None,
                })
            }
        }
    }

    /// In-memory repositories, used by tests and demos.
    pub fn in_memory() -> Self {
        Self {
            services: Arc::new(crate::catalog::repository::mock::MemoryServiceRepository::default()),
            reviews: Arc::new(crate::reviews::repository::mock::MemoryReviewRepository::default()),
            store: None,
        }
    }

    /// Release the store connection, if any.
    pub async fn close(self) {
        if let Some(store) = self.store {
            store.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_backend_opens_in_fresh_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("visa_runtime_{}", uuid::Uuid::new_v4()));
        let cfg = DatabaseConfig {
            backend: StoreBackend::File,
            data_dir: dir.to_string_lossy().to_string(),
            ..Default::default()
        };
        let repos = Repositories::open(&cfg).await?;
        assert!(repos.services.list_newest_first().await?.is_empty());
        repos.close().await;
        assert!(tokio::fs::metadata(dir.join("reviews.json")).await.is_ok());
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
