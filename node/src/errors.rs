use crate::db::errors::StoreError;
use config::ConfigError as ConfigSourceError;
use thiserror::Error;

/// Errors surfaced by the registry, resolution and deployment layers.
///
/// Every kind maps to exactly one HTTP status in [crate::api::errors::ApiError].
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },
    #[error("Name '{name}' is already registered to address {existing_address}")]
    NameConflict { name: String, existing_address: String },
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Invalid ABI id '{0}': use letters, digits, '-' or '_'")]
    InvalidId(String),
    #[error("Invalid ABI: {0}")]
    InvalidInterface(String),
    #[error("No ABI or contract source supplied")]
    MissingInterface,
    #[error("Failed to store record: {0}")]
    StoreWrite(#[source] StoreError),
    #[error("Failed to load record: {0}")]
    StoreCorrupt(#[source] StoreError),
    #[error("Compilation failed: {message}")]
    Compile { message: String, diagnostics: String },
    #[error("Remote registry error: {0}")]
    RemoteRegistry(#[from] RemoteRegistryError),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Event support is not configured on this gateway")]
    EventSupportMissing,
    #[error("Event stream error: {0}")]
    EventStream(String),
}

impl GatewayError {
    pub(crate) fn not_found(kind: &'static str, key: &str) -> Self {
        Self::NotFound {
            kind,
            key: key.to_owned(),
        }
    }

    pub(crate) fn name_conflict(name: &str, existing_address: &str) -> Self {
        Self::NameConflict {
            name: name.to_owned(),
            existing_address: existing_address.to_owned(),
        }
    }

    pub(crate) fn compile<M: Into<String>, D: Into<String>>(message: M, diagnostics: D) -> Self {
        Self::Compile {
            message: message.into(),
            diagnostics: diagnostics.into(),
        }
    }
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, key } => Self::NotFound { kind, key },
            err @ StoreError::Write { .. } | err @ StoreError::Serialize { .. } => Self::StoreWrite(err),
            err => Self::StoreCorrupt(err),
        }
    }
}

/// Remote registry failures, keeping "not there" apart from "could not ask"
#[derive(Error, Debug)]
pub enum RemoteRegistryError {
    #[error("{0} not found in remote registry")]
    NotFound(String),
    #[error("{0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO configuration error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Source(#[from] ConfigSourceError),
}
