use super::{DeployContract, Listable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimal in-memory metadata of a registered contract interface, keyed by id
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub path: String,
    pub deployable: bool,
    #[serde(rename = "openapi")]
    pub openapi_url: String,
    pub compiler_version: String,
    pub created: DateTime<Utc>,
}

impl AbiRecord {
    /// Derive the record from the stored deployment payload
    pub fn from_deploy(id: &str, msg: &DeployContract, base_url: &str, created: DateTime<Utc>) -> Self {
        let path = format!("/abis/{}", id);
        Self {
            id: id.to_owned(),
            name: msg.contract_name.clone(),
            description: msg.description.clone(),
            openapi_url: format!("{}{}?swagger", base_url, path),
            path,
            deployable: msg.is_deployable(),
            compiler_version: msg.compiler_version.clone(),
            created,
        }
    }
}

impl Listable for AbiRecord {
    fn title(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    fn identity(&self) -> &str {
        &self.id
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}
