//! Contract source compilation, delegated to an external compiler toolchain

use crate::{errors::GatewayError, types::Abi};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

mod solc;
pub use solc::SolcCompiler;

pub(crate) const LOG_TARGET: &'static str = "contract_gateway::compiler";

/// Output of compiling a single contract
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledContract {
    pub contract_name: String,
    pub abi: Abi,
    pub bytecode: Vec<u8>,
    pub dev_doc: String,
    pub compiler_version: String,
}

pub trait Compiler: Send + Sync {
    /// Compile `source` and select contract `name`, or the only contract when `name` is empty
    fn compile(
        &self,
        source: &str,
        name: &str,
        compiler_version: &str,
        evm_version: &str,
    ) -> Result<CompiledContract, GatewayError>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Default solc binary
    pub solc_path: String,
    /// Requested compiler version -> solc binary
    #[serde(default)]
    pub versions: HashMap<String, String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            solc_path: "solc".into(),
            versions: HashMap::new(),
        }
    }
}
