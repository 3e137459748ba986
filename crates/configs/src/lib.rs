use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Which document store the repositories talk to.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongo,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
    #[serde(default = "default_min_pool_size")]
    pub min_pool_size: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: String::new(),
            name: default_db_name(),
            max_pool_size: default_max_pool_size(),
            min_pool_size: default_min_pool_size(),
            connect_timeout_secs: default_connect_timeout(),
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), token_ttl_hours: default_token_ttl() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 5000 }
fn default_request_timeout() -> u64 { 30 }
fn default_db_name() -> String { "VisaConsultant".into() }
fn default_max_pool_size() -> u32 { 10 }
fn default_min_pool_size() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 10 }
fn default_data_dir() -> String { "data".into() }
fn default_token_ttl() -> i64 { 24 }
fn default_log_format() -> String { "compact".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), fall back to defaults when the
    /// file is absent, then apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) => match e.downcast_ref::<std::io::Error>() {
                Some(io) if io.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
                _ => return Err(e),
            },
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay values from the environment. `lookup` is injectable for tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT").or_else(|| lookup("SERVER_PORT")).and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse().ok()) {
            self.server.worker_threads = Some(w);
        }
        if self.database.url.trim().is_empty() {
            if let Some(url) = lookup("DATABASE_URL") {
                self.database.url = url;
            }
        }
        if self.auth.jwt_secret.trim().is_empty() {
            if let Some(secret) = lookup("ACCESS_TOKEN_SECRET").or_else(|| lookup("JWT_SECRET")) {
                self.auth.jwt_secret = secret;
            }
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout();
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.backend == StoreBackend::File {
            if self.data_dir.trim().is_empty() {
                return Err(anyhow!("database.data_dir is required for the file backend"));
            }
            return Ok(());
        }
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
            return Err(anyhow!("database.url must start with mongodb:// or mongodb+srv://"));
        }
        if self.name.trim().is_empty() {
            return Err(anyhow!("database.name is empty"));
        }
        if self.max_pool_size == 0 || self.max_pool_size < self.min_pool_size {
            return Err(anyhow!("database.max_pool_size must be >= max(1, min_pool_size)"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(anyhow!("database.connect_timeout_secs must be positive"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or ACCESS_TOKEN_SECRET"));
        }
        if self.token_ttl_hours < 1 {
            return Err(anyhow!("auth.token_ttl_hours must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn parses_full_file() -> Result<()> {
        let cfg = parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            request_timeout_secs = 5

            [database]
            backend = "mongo"
            url = "mongodb://localhost:27017"
            name = "VisaTest"
            max_pool_size = 4

            [auth]
            jwt_secret = "s3cret"
            token_ttl_hours = 48

            [logging]
            format = "json"
            "#,
        )?;
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.request_timeout_secs, 5);
        assert_eq!(cfg.database.backend, StoreBackend::Mongo);
        assert_eq!(cfg.database.name, "VisaTest");
        assert_eq!(cfg.database.min_pool_size, 1);
        assert_eq!(cfg.auth.token_ttl_hours, 48);
        assert_eq!(cfg.logging.format, "json");
        Ok(())
    }

    #[test]
    fn empty_file_uses_defaults() -> Result<()> {
        let cfg = parse("")?;
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.database.name, "VisaConsultant");
        assert_eq!(cfg.auth.token_ttl_hours, 24);
        Ok(())
    }

    #[test]
    fn env_overrides_port_url_and_secret() -> Result<()> {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[
            ("PORT", "7000"),
            ("DATABASE_URL", "mongodb+srv://u:p@cluster0.example.net"),
            ("ACCESS_TOKEN_SECRET", "abc"),
        ]));
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.port, 7000);
        assert!(cfg.database.url.starts_with("mongodb+srv://"));
        assert_eq!(cfg.auth.jwt_secret, "abc");
        Ok(())
    }

    #[test]
    fn file_values_win_over_env() -> Result<()> {
        let mut cfg = parse("[auth]\njwt_secret = \"from-file\"")?;
        cfg.apply_env(env(&[("ACCESS_TOKEN_SECRET", "from-env")]));
        assert_eq!(cfg.auth.jwt_secret, "from-file");
        Ok(())
    }

    #[test]
    fn missing_secret_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "mongodb://localhost".into();
        let err = cfg.normalize_and_validate().unwrap_err();
        assert!(err.to_string().contains("jwt_secret"));
    }

    #[test]
    fn non_mongo_url_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "postgres://localhost/db".into();
        cfg.auth.jwt_secret = "x".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn file_backend_needs_no_url() -> Result<()> {
        let mut cfg = parse("[database]\nbackend = \"file\"\n[auth]\njwt_secret = \"x\"")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.database.backend, StoreBackend::File);
        Ok(())
    }
}
