use crate::{
    api::config::{ActixConfig, CorsConfig},
    compiler::CompilerConfig,
    errors::ConfigError,
    registry::RemoteRegistryConfig,
};
use config::{Config, Environment, File};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

const CONFIG_DEFAULT: &'static str = "config/default";
const ENV_PREFIX: &'static str = "GATEWAY";
pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8080";

pub(crate) const LOG_TARGET: &'static str = "contract_gateway::config";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub actix: ActixConfig,
    pub cors: CorsConfig,
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
    pub registry: RemoteRegistryConfig,
    pub compiler: CompilerConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Artifact store root, created when missing
    pub storage_path: PathBuf,
    /// External URL of the gateway, used in every generated link
    pub base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./data/contracts"),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Configured base URL, or the default when it does not parse
    pub fn base_url(&self) -> Url {
        match Url::parse(&self.base_url) {
            Ok(url) => url,
            Err(err) => {
                warn!(
                    target: LOG_TARGET,
                    "Invalid base URL '{}' ({}), using {}", self.base_url, err, DEFAULT_BASE_URL
                );
                Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
            },
        }
    }

    /// Base URL as prefix of generated links, without trailing slash
    pub fn base_url_prefix(&self) -> String {
        self.base_url().as_str().trim_end_matches('/').to_string()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret of bearer tokens for event stream routes, routes are open when unset
    pub event_streams_secret: Option<String>,
}

impl NodeConfig {
    /// Load `config/default`, then `config/<GATEWAY_ENV>`, then `GATEWAY_*` environment variables
    /// (`__` separates nested keys, e.g. `GATEWAY_GATEWAY__BASE_URL`)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("GATEWAY_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .add_source(File::with_name(CONFIG_DEFAULT).required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        Self::load_from(&config)
    }

    pub fn load_from(config: &Config) -> Result<Self, ConfigError> {
        Ok(config.clone().try_deserialize()?)
    }
}
