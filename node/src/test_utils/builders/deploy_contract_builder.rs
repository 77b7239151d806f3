use crate::{db::models::DeployContract, types::Abi};
use serde_json::{json, Value};

/// Deployment payload with a small valid ABI: a constructor, a getter, a setter and an event
pub fn simple_abi() -> Value {
    json!([
        {"type": "constructor", "inputs": [{"name": "initial", "type": "uint256"}]},
        {
            "type": "function", "name": "get", "inputs": [],
            "outputs": [{"name": "value", "type": "uint256"}], "stateMutability": "view"
        },
        {
            "type": "function", "name": "set", "inputs": [{"name": "value", "type": "uint256"}],
            "outputs": [], "stateMutability": "nonpayable"
        },
        {
            "type": "event", "name": "Changed", "anonymous": false,
            "inputs": [{"name": "value", "type": "uint256", "indexed": false}]
        }
    ])
}

#[allow(dead_code)]
pub struct DeployContractBuilder {
    pub id: String,
    pub contract_name: String,
    pub abi: Option<Value>,
    pub compiled: Vec<u8>,
    pub dev_doc: String,
    pub register_as: String,
}

#[allow(dead_code)]
impl DeployContractBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            contract_name: "Simple".to_string(),
            abi: Some(simple_abi()),
            compiled: Vec::new(),
            dev_doc: String::new(),
            register_as: String::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.contract_name = name.to_string();
        self
    }

    pub fn abi(mut self, abi: Option<Value>) -> Self {
        self.abi = abi;
        self
    }

    pub fn bytecode(mut self, compiled: Vec<u8>) -> Self {
        self.compiled = compiled;
        self
    }

    pub fn dev_doc(mut self, dev_doc: &str) -> Self {
        self.dev_doc = dev_doc.to_string();
        self
    }

    pub fn register_as(mut self, name: &str) -> Self {
        self.register_as = name.to_string();
        self
    }

    pub fn build(self) -> DeployContract {
        DeployContract {
            id: self.id,
            contract_name: self.contract_name,
            abi: self.abi.map(Abi::new),
            compiled: self.compiled,
            dev_doc: self.dev_doc,
            register_as: self.register_as,
            ..DeployContract::default()
        }
    }
}
