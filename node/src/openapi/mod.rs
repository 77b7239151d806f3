//! Protocol descriptor (OpenAPI 2.0) generation from contract interfaces

use crate::{errors::GatewayError, types::Abi};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod generator;
pub use generator::OpenApiGenerator;

mod schema;

pub(crate) const LOG_TARGET: &'static str = "contract_gateway::openapi";

/// URL schemes a descriptor may advertise
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Where and how generated descriptors say the API is reachable
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub external_host: String,
    pub external_root_path: String,
    pub external_schemes: Vec<String>,
    pub basic_auth: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            external_host: "localhost:8080".into(),
            external_root_path: String::new(),
            external_schemes: vec!["http".into()],
            basic_auth: true,
        }
    }
}

impl GeneratorConfig {
    /// Derive host, root path and scheme from the gateway's external base URL
    pub fn from_base_url(base_url: &url::Url) -> Self {
        let mut external_host = base_url.host_str().unwrap_or("localhost").to_string();
        if let Some(port) = base_url.port() {
            external_host = format!("{}:{}", external_host, port);
        }
        Self {
            external_host,
            external_root_path: base_url.path().trim_end_matches('/').to_string(),
            external_schemes: vec![base_url.scheme().to_string()],
            ..Self::default()
        }
    }

    /// Replace advertised schemes with the requested comma separated list, keeping only http and https
    pub fn with_schemes(mut self, requested: &str) -> Self {
        self.external_schemes = requested
            .split(',')
            .filter(|scheme| {
                let allowed = ALLOWED_SCHEMES.contains(scheme);
                if !allowed {
                    warn!(target: LOG_TARGET, "Excluded unknown scheme: {}", scheme);
                }
                allowed
            })
            .map(String::from)
            .collect();
        self
    }

    pub fn with_basic_auth(mut self, basic_auth: bool) -> Self {
        self.basic_auth = basic_auth;
        self
    }
}

/// Which operations a descriptor exposes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorKind {
    /// Methods and events of a contract bound to an address
    Instance,
    /// Constructor plus address-parameterized methods and events
    Factory,
    /// Constructor only
    FactoryOnly,
}

impl DescriptorKind {
    pub fn factory(factory_only: bool) -> Self {
        if factory_only {
            DescriptorKind::FactoryOnly
        } else {
            DescriptorKind::Factory
        }
    }
}

/// Input of a single descriptor generation
#[derive(Clone, Copy, Debug)]
pub struct DescriptorRequest<'a> {
    /// Resource path the operations are rooted at, e.g. `/contracts/<address>`
    pub path: &'a str,
    pub title: &'a str,
    pub abi: &'a Abi,
    pub dev_doc: &'a str,
    pub kind: DescriptorKind,
}

/// Turns a contract interface into a protocol descriptor.
///
/// Structurally invalid interfaces are rejected with [GatewayError::InvalidInterface].
pub trait DescriptorGenerator: Send + Sync {
    fn generate(&self, config: &GeneratorConfig, request: DescriptorRequest<'_>) -> Result<Descriptor, GatewayError>;
}

/// Generated descriptor document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(Value);

impl Descriptor {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn into_raw(self) -> Value {
        self.0
    }

    /// `info.description`, empty if absent
    pub fn description(&self) -> &str {
        self.0["info"]["description"].as_str().unwrap_or_default()
    }

    pub fn info_extension(&self, key: &str) -> Option<&str> {
        self.0["info"][key].as_str()
    }

    /// Embed provenance metadata in the `info` section
    pub fn add_info_extension(&mut self, key: &str, value: &str) {
        if let Some(info) = self.section("info") {
            info.insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    /// Default the shared `from` parameter, when the descriptor declares one
    pub fn set_from_default(&mut self, from: &str) {
        if let Some(param) = self
            .section("parameters")
            .and_then(|params| params.get_mut(schema::FROM_PARAM))
            .and_then(Value::as_object_mut)
        {
            param.insert("default".to_string(), Value::String(from.to_string()));
        }
    }

    fn section(&mut self, name: &str) -> Option<&mut Map<String, Value>> {
        self.0.get_mut(name).and_then(Value::as_object_mut)
    }
}
