use serde::Deserialize;

/// Top-level application configuration.
/// Loaded from environment variables (`PVM__SECTION__KEY`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings
    pub database: DatabaseConfig,
    /// JWT settings
    pub auth: AuthConfig,
    /// Public REST API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Remote archive host
    #[serde(default)]
    pub file_host: FileHostConfig,
    /// Static asset settings
    #[serde(default)]
    pub plugin: PluginConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Max connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the storefront that issues session tokens
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Namespace prefix of the latest-version route
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileHostConfig {
    /// Base URL archives live under; `{base_url}/{file_name}/{archive_prefix}{version}.zip`
    #[serde(default = "default_file_host_base")]
    pub base_url: String,
    #[serde(default = "default_archive_prefix")]
    pub archive_prefix: String,
}

impl Default for FileHostConfig {
    fn default() -> Self {
        Self {
            base_url: default_file_host_base(),
            archive_prefix: default_archive_prefix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    /// Public URL prefix the embedded stylesheets and scripts are served from
    #[serde(default = "default_asset_base_url")]
    pub asset_base_url: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            asset_base_url: default_asset_base_url(),
        }
    }
}

impl AppConfig {
    /// Load config from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PVM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        cfg.try_deserialize()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_connections() -> u32 {
    10
}
fn default_namespace() -> String {
    "wooxperto-plugin".to_string()
}
fn default_file_host_base() -> String {
    "https://www.wooxperto.com/our-plugins-zip".to_string()
}
fn default_archive_prefix() -> String {
    "xyzk-".to_string()
}
fn default_asset_base_url() -> String {
    "/assets".to_string()
}
