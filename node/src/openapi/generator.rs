use super::{
    schema::{documented_schema, object_schema, param_name, param_schema, signature, DevDoc, MethodDoc, FROM_PARAM},
    Descriptor,
    DescriptorGenerator,
    DescriptorKind,
    DescriptorRequest,
    GeneratorConfig,
};
use crate::{
    errors::GatewayError,
    types::{AbiEntry, AbiEntryType},
};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

const ADDRESS_PARAM: &'static str = "addressParam";
const REGISTER_PARAM: &'static str = "registerParam";

/// Swagger 2.0 descriptor generator
#[derive(Clone, Debug, Default)]
pub struct OpenApiGenerator;

impl OpenApiGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorGenerator for OpenApiGenerator {
    fn generate(&self, config: &GeneratorConfig, request: DescriptorRequest<'_>) -> Result<Descriptor, GatewayError> {
        let entries = request
            .abi
            .entries()
            .map_err(|err| GatewayError::InvalidInterface(err.to_string()))?;
        if let Some(unnamed) = entries
            .iter()
            .find(|e| matches!(e.kind, AbiEntryType::Function | AbiEntryType::Event) && e.name.is_empty())
        {
            return Err(GatewayError::InvalidInterface(format!("unnamed {:?} entry", unnamed.kind)));
        }
        let dev_doc = DevDoc::parse(request.dev_doc);

        let mut paths = Map::new();
        if request.kind != DescriptorKind::Instance {
            let constructor = entries.iter().find(|e| e.kind == AbiEntryType::Constructor);
            paths.insert("/".into(), constructor_path(constructor, dev_doc.method("constructor")));
        }
        if request.kind != DescriptorKind::FactoryOnly {
            let prefix = match request.kind {
                DescriptorKind::Instance => "",
                _ => "/{address}",
            };
            let mut seen = HashSet::new();
            for entry in entries.iter() {
                match entry.kind {
                    AbiEntryType::Function => {
                        let sig = signature(&entry.name, &entry.inputs);
                        // overloads are addressed by full signature
                        let segment = if seen.insert(entry.name.clone()) {
                            entry.name.clone()
                        } else {
                            sig.clone()
                        };
                        paths.insert(format!("{}/{}", prefix, segment), method_path(entry, dev_doc.method(&sig)));
                    },
                    AbiEntryType::Event => {
                        paths.insert(format!("{}/{}/subscribe", prefix, entry.name), subscribe_path(entry));
                    },
                    _ => {},
                }
            }
        }

        let description = if dev_doc.details.is_empty() {
            dev_doc.title.clone()
        } else {
            dev_doc.details.clone()
        };
        let mut parameters = json!({
            FROM_PARAM: {
                "name": "from",
                "in": "query",
                "type": "string",
                "description": "The account address to send transactions from",
            },
        });
        if request.kind != DescriptorKind::Instance {
            parameters[ADDRESS_PARAM] = json!({
                "name": "address",
                "in": "path",
                "required": true,
                "type": "string",
                "description": "The address of the contract instance",
            });
            parameters[REGISTER_PARAM] = json!({
                "name": "register",
                "in": "query",
                "type": "string",
                "description": "Friendly name to register the deployed instance under",
            });
        }
        let mut document = json!({
            "swagger": "2.0",
            "info": {
                "title": request.title,
                "version": "1.0",
                "description": description,
            },
            "host": config.external_host,
            "basePath": format!("{}{}", config.external_root_path, request.path),
            "schemes": config.external_schemes,
            "consumes": ["application/json"],
            "produces": ["application/json"],
            "parameters": parameters,
            "paths": paths,
        });
        if config.basic_auth {
            document["securityDefinitions"] = json!({"basicAuth": {"type": "basic"}});
            document["security"] = json!([{"basicAuth": []}]);
        }
        Ok(Descriptor::new(document))
    }
}

fn shared_param(name: &str) -> Value {
    json!({"$ref": format!("#/parameters/{}", name)})
}

fn body_param(entry: &AbiEntry, doc: Option<&MethodDoc>) -> Value {
    json!({
        "name": "body",
        "in": "body",
        "required": true,
        "schema": documented_schema(&entry.inputs, doc),
    })
}

fn constructor_path(constructor: Option<&AbiEntry>, doc: Option<&MethodDoc>) -> Value {
    let body = match constructor {
        Some(entry) => body_param(entry, doc),
        None => json!({"name": "body", "in": "body", "required": true, "schema": {"type": "object"}}),
    };
    json!({
        "post": {
            "operationId": "constructor",
            "summary": "Deploy a new instance of the contract",
            "parameters": [body, shared_param(FROM_PARAM), shared_param(REGISTER_PARAM)],
            "responses": {
                "200": {"description": "Deployment receipt", "schema": {"type": "object"}},
            },
        },
    })
}

fn method_path(entry: &AbiEntry, doc: Option<&MethodDoc>) -> Value {
    let details = doc.map(|doc| doc.details.as_str()).unwrap_or_default();
    let outputs: Map<String, Value> = entry
        .outputs
        .iter()
        .enumerate()
        .map(|(i, param)| (param_name(param, i), param_schema(param)))
        .collect();
    let mut summary = entry.name.clone();
    if entry.is_read_only() {
        summary.push_str(" [read-only]");
    }
    let operation = |body: bool| {
        let mut parameters = vec![shared_param(FROM_PARAM)];
        if body {
            parameters.insert(0, body_param(entry, doc));
        }
        json!({
            "operationId": format!("{}_{}", entry.name, if body { "post" } else { "get" }),
            "summary": summary,
            "description": details,
            "parameters": parameters,
            "responses": {
                "200": {"description": "Successful response", "schema": {"type": "object", "properties": outputs}},
            },
        })
    };
    json!({"get": operation(false), "post": operation(true)})
}

fn subscribe_path(entry: &AbiEntry) -> Value {
    json!({
        "post": {
            "operationId": format!("{}_subscribe", entry.name),
            "summary": format!("{} [event]", entry.name),
            "parameters": [{
                "name": "body",
                "in": "body",
                "required": true,
                "schema": {
                    "type": "object",
                    "properties": {
                        "stream": {"type": "string", "description": "Event stream to deliver events to"},
                        "fromBlock": {"type": "string", "description": "Block to start from"},
                    },
                },
            }],
            "responses": {
                "200": {"description": "Subscription created", "schema": object_schema(&entry.inputs)},
            },
        },
    })
}
