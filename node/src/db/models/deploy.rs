use crate::types::Abi;
use serde::{Deserialize, Serialize};

/// Full deployment payload of a contract interface.
///
/// This is what `abi_<id>.deploy.json` holds: the interface, compiled bytecode and docs,
/// enough to generate factory descriptors and deploy new instances later on.
/// Contract source is consumed by compilation and never persisted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployContract {
    pub id: String,
    #[serde(default)]
    pub contract_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing)]
    pub solidity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<Abi>,
    #[serde(default, with = "hex_bytes", skip_serializing_if = "Vec::is_empty")]
    pub compiled: Vec<u8>,
    #[serde(default, rename = "devdoc", skip_serializing_if = "String::is_empty")]
    pub dev_doc: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub compiler_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub evm_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub register_as: String,
}

impl DeployContract {
    /// Deployable only when compiled bytecode is present
    #[inline]
    pub fn is_deployable(&self) -> bool {
        !self.compiled.is_empty()
    }
}

/// Deployment payload bound to an address, as returned by instance lookups
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployContractWithAddress {
    #[serde(flatten)]
    pub contract: DeployContract,
    pub address: String,
}

/// `0x` prefixed hex (de)serialization of bytecode
mod hex_bytes {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let trimmed = raw.strip_prefix("0x").unwrap_or(&raw);
        hex::decode(trimmed).map_err(D::Error::custom)
    }
}
