use serde::{Deserialize, Serialize};

/// Completed deployment handed over by the transaction pipeline
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Id of the originating deployment request, also the id of its stored ABI
    pub request_id: String,
    /// Transaction was mined successfully
    pub success: bool,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub register_as: String,
    /// Descriptor URL of the new instance, set on success
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contract_swagger: String,
    /// Browsable page URL of the new instance, set on success
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contract_ui: String,
}
