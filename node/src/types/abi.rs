use super::errors::TypeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Contract interface definition exactly as it was submitted.
///
/// The raw JSON is kept so the stored payload and the `?abi` representation
/// round-trip byte for byte; [Abi::entries] gives the validated, typed view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Abi(Value);

impl Abi {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Parse ABI from JSON text
    pub fn from_json(json: &str) -> Result<Self, TypeError> {
        let raw = serde_json::from_str(json).map_err(|err| TypeError::parse_field("ABI", err.into()))?;
        Ok(Self(raw))
    }

    #[inline]
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Structurally validated entries.
    ///
    /// An ABI must be a JSON array of entries, every parameter must declare a type.
    pub fn entries(&self) -> Result<Vec<AbiEntry>, TypeError> {
        if !self.0.is_array() {
            return Err(TypeError::parse_field_raw("ABI", "expected JSON array"));
        }
        let entries: Vec<AbiEntry> =
            serde_json::from_value(self.0.clone()).map_err(|err| TypeError::parse_field("ABI", err.into()))?;
        for entry in entries.iter() {
            if let Some(param) = entry.inputs.iter().chain(entry.outputs.iter()).find(|p| !p.is_valid()) {
                return Err(TypeError::parse_field_raw("ABI parameter type", &param.name));
            }
        }
        Ok(entries)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiEntryType {
    Function,
    Constructor,
    Event,
    Fallback,
    Receive,
    Error,
}

impl Default for AbiEntryType {
    fn default() -> Self {
        AbiEntryType::Function
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type", default)]
    pub kind: AbiEntryType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(default)]
    pub state_mutability: Option<String>,
    #[serde(default)]
    pub constant: bool,
    #[serde(default)]
    pub payable: bool,
    #[serde(default)]
    pub anonymous: bool,
}

impl AbiEntry {
    /// Functions that never write to the chain
    pub fn is_read_only(&self) -> bool {
        self.constant || matches!(self.state_mutability.as_deref(), Some("view") | Some("pure"))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub indexed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
}

impl AbiParam {
    fn is_valid(&self) -> bool {
        !self.kind.is_empty() && self.components.iter().all(AbiParam::is_valid)
    }
}
