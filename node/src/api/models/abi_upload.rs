use crate::{api::errors::ApiError, errors::GatewayError, gateway::AbiSubmission, types::Abi};
use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /abis`: an ABI with optional bytecode, or contract source to compile
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiUpload {
    /// ABI as JSON, or as a JSON encoded string
    #[serde(default)]
    pub abi: Option<Value>,
    #[serde(default)]
    pub bytecode: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub contract: String,
    #[serde(default)]
    pub compiler: String,
    #[serde(default)]
    pub evm: String,
}

impl AbiUpload {
    pub fn into_submission(self) -> Result<AbiSubmission, ApiError> {
        if let Some(abi) = self.abi {
            let abi = match abi {
                Value::String(raw) => Abi::from_json(&raw)?,
                raw => Abi::new(raw),
            };
            let trimmed = self.bytecode.strip_prefix("0x").unwrap_or(&self.bytecode);
            let bytecode =
                hex::decode(trimmed).map_err(|err| ApiError::bad_request(format!("Invalid bytecode: {}", err)))?;
            return Ok(AbiSubmission::Precompiled { abi, bytecode });
        }
        if self.source.is_empty() {
            return Err(GatewayError::MissingInterface.into());
        }
        Ok(AbiSubmission::Source {
            source: self.source,
            contract_name: self.contract,
            compiler_version: self.compiler,
            evm_version: self.evm,
        })
    }
}
