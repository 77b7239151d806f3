use crate::types::AbiParam;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

pub(crate) const FROM_PARAM: &'static str = "fromParam";

lazy_static! {
    static ref ARRAY_SUFFIX: Regex = Regex::new(r"^(.*)\[(\d*)\]$").unwrap();
}

/// JSON schema of a single ABI parameter.
/// Numbers are carried as strings to avoid precision loss, byte arrays as `0x` hex.
pub(crate) fn param_schema(param: &AbiParam) -> Value {
    type_schema(&param.kind, &param.components)
}

fn type_schema(kind: &str, components: &[AbiParam]) -> Value {
    if let Some(captures) = ARRAY_SUFFIX.captures(kind) {
        let mut schema = json!({
            "type": "array",
            "items": type_schema(&captures[1], components),
        });
        if let Ok(len) = captures[2].parse::<u64>() {
            schema["minItems"] = json!(len);
            schema["maxItems"] = json!(len);
        }
        return schema;
    }
    match kind {
        "bool" => json!({"type": "boolean"}),
        "string" => json!({"type": "string"}),
        "address" => json!({"type": "string", "pattern": "^(0x)?[a-fA-F0-9]{40}$"}),
        "tuple" => object_schema(components),
        kind if kind.starts_with("uint") => json!({"type": "string", "pattern": "^[0-9]+$", "description": kind}),
        kind if kind.starts_with("int") => json!({"type": "string", "pattern": "^-?[0-9]+$", "description": kind}),
        kind if kind.starts_with("bytes") => json!({"type": "string", "pattern": "^(0x)?[a-fA-F0-9]*$", "description": kind}),
        kind => json!({"type": "string", "description": kind}),
    }
}

/// Object schema with one property per parameter, unnamed parameters are called `output<n>`
pub(crate) fn object_schema(params: &[AbiParam]) -> Value {
    let properties: Map<String, Value> = params
        .iter()
        .enumerate()
        .map(|(i, param)| (param_name(param, i), param_schema(param)))
        .collect();
    json!({"type": "object", "properties": properties})
}

/// [object_schema] with devdoc `@param` text as property descriptions
pub(crate) fn documented_schema(params: &[AbiParam], doc: Option<&MethodDoc>) -> Value {
    let mut schema = object_schema(params);
    if let Some(doc) = doc {
        for (name, text) in doc.params.iter() {
            if let Some(property) = schema["properties"].get_mut(name) {
                property["description"] = json!(text);
            }
        }
    }
    schema
}

pub(crate) fn param_name(param: &AbiParam, position: usize) -> String {
    if param.name.is_empty() {
        format!("output{}", position)
    } else {
        param.name.clone()
    }
}

/// Canonical signature, `name(type1,type2)`, the key devdoc uses for methods
pub(crate) fn signature(name: &str, inputs: &[AbiParam]) -> String {
    let types: Vec<_> = inputs.iter().map(canonical_type).collect();
    format!("{}({})", name, types.join(","))
}

fn canonical_type(param: &AbiParam) -> String {
    match param.kind.strip_prefix("tuple") {
        Some(suffix) => {
            let inner: Vec<_> = param.components.iter().map(canonical_type).collect();
            format!("({}){}", inner.join(","), suffix)
        },
        None => param.kind.clone(),
    }
}

/// Developer documentation emitted by the compiler
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DevDoc {
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub methods: HashMap<String, MethodDoc>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MethodDoc {
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl DevDoc {
    /// Missing or unparsable docs yield empty docs
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(raw).unwrap_or_default()
    }

    pub fn method(&self, signature: &str) -> Option<&MethodDoc> {
        self.methods.get(signature)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn param(name: &str, kind: &str) -> AbiParam {
        AbiParam {
            name: name.into(),
            kind: kind.into(),
            indexed: false,
            components: Vec::new(),
            internal_type: None,
        }
    }

    #[test]
    fn schemas_by_type() {
        assert_eq!(param_schema(&param("a", "bool"))["type"], json!("boolean"));
        assert_eq!(param_schema(&param("a", "uint256"))["type"], json!("string"));
        let fixed = param_schema(&param("a", "address[2]"));
        assert_eq!(fixed["type"], json!("array"));
        assert_eq!(fixed["maxItems"], json!(2));
        assert_eq!(fixed["items"]["pattern"], json!("^(0x)?[a-fA-F0-9]{40}$"));
        let nested = param_schema(&param("a", "bytes32[][]"));
        assert_eq!(nested["items"]["type"], json!("array"));
        assert!(nested.get("maxItems").is_none());

        let mut tuple = param("t", "tuple");
        tuple.components = vec![param("x", "uint8"), param("", "string")];
        let schema = param_schema(&tuple);
        assert_eq!(schema["properties"]["x"]["type"], json!("string"));
        assert_eq!(schema["properties"]["output1"]["type"], json!("string"));
    }

    #[test]
    fn signatures() {
        let mut tuple = param("t", "tuple[]");
        tuple.components = vec![param("x", "uint8"), param("y", "address")];
        assert_eq!(signature("f", &[param("a", "uint256"), tuple]), "f(uint256,(uint8,address)[])");
        assert_eq!(signature("g", &[]), "g()");
    }

    #[test]
    fn devdoc_parsing() {
        let doc = DevDoc::parse(r#"{"details": "Stores a value", "methods": {"set(uint256)": {"details": "Set it"}}}"#);
        assert_eq!(doc.details, "Stores a value");
        assert_eq!(doc.method("set(uint256)").unwrap().details, "Set it");
        assert!(DevDoc::parse("").details.is_empty());
        assert!(DevDoc::parse("{broken").methods.is_empty());
    }
}
