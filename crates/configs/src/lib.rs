use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Where the server keeps its state.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Database,
    Memory,
}

impl std::str::FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "database" | "db" => Ok(StorageKind::Database),
            "memory" | "in-memory" => Ok(StorageKind::Memory),
            other => Err(anyhow!("unknown storage kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default)]
    pub storage: StorageKind,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 9090, worker_threads: Some(4), storage: StorageKind::Database }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the server tier, e.g. `http://127.0.0.1:9090`.
    pub server_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            server_url: "http://127.0.0.1:9090".into(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_request_timeout() -> u64 { 30 }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    parse(&content).with_context(|| format!("parsing {path}"))
}

/// `None` only when the file does not exist; unreadable or malformed files
/// are errors.
pub fn load_optional(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content).with_context(|| format!("parsing {path}")).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow!(e).context(format!("reading {path}"))),
    }
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file when present, otherwise defaults; environment variables
    /// fill in whatever the file leaves open.
    pub fn load_or_env() -> Result<Self> {
        Self::resolve(load_optional(&config_path())?, process_env)
    }

    /// Gateway settings only; the gateway never opens the database.
    pub fn load_gateway_or_env() -> Result<GatewayConfig> {
        let mut cfg = load_optional(&config_path())?.unwrap_or_default();
        cfg.apply_env_from(process_env)?;
        cfg.gateway.normalize()?;
        Ok(cfg.gateway)
    }

    /// Layers `env` over `file` (or the defaults) and validates the result.
    pub fn resolve<F>(file: Option<AppConfig>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = file.unwrap_or_default();
        cfg.apply_env_from(&env)?;
        cfg.server.normalize()?;
        cfg.gateway.normalize()?;
        cfg.database.normalize_from(&env);
        if cfg.server.storage == StorageKind::Database {
            cfg.database.validate()?;
        }
        Ok(cfg)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(process_env)
    }

    /// A variable that is set but does not parse is an error, never ignored.
    pub fn apply_env_from<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = env("SERVER_HOST") { self.server.host = host; }
        if let Some(port) = env_parse::<u16, _>(&env, "SERVER_PORT")? { self.server.port = port; }
        if let Some(w) = env_parse::<usize, _>(&env, "TOKIO_WORKER_THREADS")? { self.server.worker_threads = Some(w); }
        if let Some(kind) = env_parse::<StorageKind, _>(&env, "SHAREIT_STORAGE")? { self.server.storage = kind; }
        if let Some(host) = env("GATEWAY_HOST") { self.gateway.host = host; }
        if let Some(port) = env_parse::<u16, _>(&env, "GATEWAY_PORT")? { self.gateway.port = port; }
        if let Some(url) = env("SHAREIT_SERVER_URL") { self.gateway.server_url = url; }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.gateway.normalize()?;
        self.database.normalize_from_env();
        // the in-memory store never touches the database
        if self.server.storage == StorageKind::Database {
            self.database.validate()?;
        }
        Ok(())
    }
}

fn env_parse<T, F>(env: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow!("{key}={raw} is not a valid value")),
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl GatewayConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("gateway.port must be within 1..=65535"));
        }
        let trimmed = self.server_url.trim().trim_end_matches('/').to_string();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(anyhow!("gateway.server_url must start with http(s)://"));
        }
        self.server_url = trimmed;
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout();
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        self.normalize_from(process_env);
    }

    /// DATABASE_URL fills an empty url.
    pub fn normalize_from<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.url.trim().is_empty() {
            if let Some(url) = env("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}
