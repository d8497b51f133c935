use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub helm: HelmConfig,
    #[serde(default)]
    pub broker: BrokerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 80, worker_threads: Some(4) }
    }
}

/// Registry store location. Only the host is configurable through `REDIS_SERVER`;
/// the port defaults to the standard 6379.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default)]
    pub server: String,
    #[serde(default = "default_redis_port")]
    pub port: u16,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self { server: String::new(), port: default_redis_port() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HelmConfig {
    #[serde(default = "default_helm_binary")]
    pub binary: String,
    /// Value passed to `helm --host`; empty means whatever helm picks by default.
    #[serde(default)]
    pub host: String,
    /// Upper bound for a single `helm install`. Absent means wait forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for HelmConfig {
    fn default() -> Self {
        Self { binary: default_helm_binary(), host: String::new(), timeout_secs: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    #[serde(default = "default_last_operation_delay")]
    pub last_operation_delay_ms: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self { last_operation_delay_ms: default_last_operation_delay() }
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

fn default_redis_port() -> u16 { 6379 }
fn default_helm_binary() -> String { "helm".to_string() }
fn default_last_operation_delay() -> u64 { 2000 }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`); fall back to a pure environment config
    /// only when the file does not exist. A file that exists but fails to parse is an error.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path())
    }

    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            // 仅在文件不存在时回退到环境变量；文件存在但解析失败直接报错
            Err(e) if is_not_found(&e) => Self::from_env(),
            Err(e) => return Err(e.context(format!("failed to load config file {}", path))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg.server.worker_threads = std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .or(cfg.server.worker_threads);
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.redis.normalize_from_env();
        self.redis.validate()?;
        self.helm.normalize_from_env();
        self.helm.validate()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
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

impl RedisConfig {
    pub fn normalize_from_env(&mut self) {
        if self.server.trim().is_empty() {
            if let Ok(server) = std::env::var("REDIS_SERVER") {
                self.server = server;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("redis.port must be within 1..=65535"));
        }
        Ok(())
    }

    /// Connection URL for the registry. An empty server means the local host.
    pub fn url(&self) -> String {
        let host = match self.server.trim() {
            "" => "127.0.0.1",
            h => h,
        };
        format!("redis://{}:{}/", host, self.port)
    }
}

impl HelmConfig {
    pub fn normalize_from_env(&mut self) {
        if self.host.trim().is_empty() {
            if let Ok(host) = std::env::var("HELM_HOST") {
                self.host = host;
            }
        }
        if self.timeout_secs == Some(0) {
            self.timeout_secs = None;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.binary.trim().is_empty() {
            return Err(anyhow!("helm.binary must not be empty"));
        }
        Ok(())
    }
}
