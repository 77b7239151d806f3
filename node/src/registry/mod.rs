//! Registry of known contracts and ABIs, and the resolution of caller supplied names

mod index;
pub use index::RegistryIndex;

mod local;
pub use local::LocalRegistry;

pub mod remote;
pub use remote::{HttpRemoteRegistry, RemoteRegistry, RemoteRegistryConfig};

mod resolver;
pub use resolver::{Resolution, Resolver};

use serde::{Deserialize, Serialize};

pub(crate) const LOG_TARGET: &'static str = "contract_gateway::registry";

/// Which registry backs a deployment.
///
/// Decided once when a deployment is first processed and passed explicitly
/// through every call that depends on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryMode {
    /// Private file store under the gateway's storage path
    Local,
    /// Networked registry behind [RemoteRegistry]
    Remote,
}

impl Default for RegistryMode {
    fn default() -> Self {
        RegistryMode::Local
    }
}

impl RegistryMode {
    #[inline]
    pub fn is_remote(self) -> bool {
        self == RegistryMode::Remote
    }
}
