use super::Listable;
use crate::types::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contract instance bound to an ABI, keyed by normalized address.
/// Persisted as `contract_<address>.instance.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    pub address: Address,
    pub path: String,
    pub abi: String,
    #[serde(rename = "openapi")]
    pub openapi_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub registered_as: String,
    pub created: DateTime<Utc>,
}

impl ContractRecord {
    /// `path_name` is the friendly name when one was registered, otherwise the address
    pub fn new(address: Address, abi_id: &str, path_name: &str, registered_as: &str, base_url: &str) -> Self {
        let path = format!("/contracts/{}", path_name);
        Self {
            address,
            abi: abi_id.to_owned(),
            openapi_url: format!("{}{}?swagger", base_url, path),
            path,
            registered_as: registered_as.to_owned(),
            created: Utc::now(),
        }
    }

    #[inline]
    pub fn is_named(&self) -> bool {
        !self.registered_as.is_empty()
    }
}

impl Listable for ContractRecord {
    fn title(&self) -> &str {
        if self.is_named() {
            &self.registered_as
        } else {
            self.address.as_str()
        }
    }

    fn identity(&self) -> &str {
        self.address.as_str()
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}
