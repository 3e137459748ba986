use std::time::Duration;

use configs::DatabaseConfig;
use mongodb::{
    bson::{doc, Document},
    options::ClientOptions,
    Client, Collection, Database,
};
use tracing::{info, warn};

pub const SERVICES_COLLECTION: &str = "services";
pub const REVIEWS_COLLECTION: &str = "reviews";

/// Owned connection to the document store.
///
/// Built once at startup and handed to the repositories; the driver keeps its
/// own connection pool behind the cloned `Client`.
#[derive(Clone, Debug)]
pub struct StoreHandle {
    client: Client,
    db: Database,
}

impl StoreHandle {
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    /// Wait for in-use connections to be returned and close the pool.
    pub async fn close(self) {
        self.client.shutdown().await;
        info!("document store connection closed");
    }
}

pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<StoreHandle> {
    let mut options = ClientOptions::parse(&cfg.url).await?;
    options.app_name = Some("visa-consultant".to_string());
    options.max_pool_size = Some(cfg.max_pool_size);
    options.min_pool_size = Some(cfg.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(cfg.connect_timeout_secs));
    options.server_selection_timeout = Some(Duration::from_secs(cfg.connect_timeout_secs));

    let client = Client::with_options(options)?;
    let db = client.database(&cfg.name);
    let handle = StoreHandle { client, db };

    // 连接失败只记录日志，不阻止启动；每次请求仍会按需重试选择服务器
    match handle.ping().await {
        Ok(()) => info!(database = %cfg.name, "database is connected"),
        Err(e) => warn!(database = %cfg.name, error = %e, "database ping failed at startup"),
    }
    Ok(handle)
}
