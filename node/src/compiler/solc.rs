use super::{CompiledContract, Compiler, CompilerConfig, LOG_TARGET};
use crate::{errors::GatewayError, types::Abi};
use log::info;
use serde::Deserialize;
use serde_json::Value;
use std::{
    collections::HashMap,
    io::Write,
    process::{Command, Stdio},
};

/// `solc --combined-json` output
#[derive(Debug, Deserialize)]
struct CombinedJson {
    contracts: HashMap<String, CombinedContract>,
    #[serde(default)]
    version: String,
}

#[derive(Debug, Deserialize)]
struct CombinedContract {
    abi: Value,
    #[serde(default)]
    bin: String,
    #[serde(default)]
    devdoc: Value,
}

/// [Compiler] running a local solc binary, source is passed on stdin
pub struct SolcCompiler {
    config: CompilerConfig,
}

impl SolcCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    fn solc_path(&self, compiler_version: &str) -> Result<&str, GatewayError> {
        if compiler_version.is_empty() {
            return Ok(&self.config.solc_path);
        }
        self.config
            .versions
            .get(compiler_version)
            .map(String::as_str)
            .ok_or_else(|| GatewayError::compile(format!("Compiler version {} not available", compiler_version), ""))
    }

    fn args(evm_version: &str) -> Vec<String> {
        let mut args = vec!["--combined-json".to_string(), "abi,bin,devdoc".to_string()];
        if !evm_version.is_empty() {
            args.push("--evm-version".into());
            args.push(evm_version.into());
        }
        args.push("-".into());
        args
    }
}

impl Compiler for SolcCompiler {
    fn compile(
        &self,
        source: &str,
        name: &str,
        compiler_version: &str,
        evm_version: &str,
    ) -> Result<CompiledContract, GatewayError>
    {
        let solc = self.solc_path(compiler_version)?;
        let args = Self::args(evm_version);
        info!(target: LOG_TARGET, "Compiling: {} {}", solc, args.join(" "));
        let mut child = Command::new(solc)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| GatewayError::compile(format!("Failed to run {}: {}", solc, err), ""))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|err| GatewayError::compile(format!("Failed to pass source to {}: {}", solc, err), ""))?;
        }
        let output = child
            .wait_with_output()
            .map_err(|err| GatewayError::compile(format!("Failed to run {}: {}", solc, err), ""))?;
        if !output.status.success() {
            return Err(GatewayError::compile(
                format!("{} exited with {}", solc, output.status),
                String::from_utf8_lossy(&output.stderr),
            ));
        }
        parse_combined_json(&output.stdout, name)
    }
}

/// Select contract `name` from combined JSON output.
///
/// Keys are `<file>:<name>`; with an empty `name` the output must hold exactly one contract.
fn parse_combined_json(stdout: &[u8], name: &str) -> Result<CompiledContract, GatewayError> {
    let combined: CombinedJson = serde_json::from_slice(stdout)
        .map_err(|err| GatewayError::compile("Failed to process solc output", err.to_string()))?;
    let mut matching: Vec<_> = combined
        .contracts
        .into_iter()
        .filter(|(key, _)| name.is_empty() || key.rsplit(':').next() == Some(name))
        .collect();
    let (key, contract) = match matching.len() {
        1 => matching.remove(0),
        0 => return Err(GatewayError::compile(format!("Contract '{}' not found in output", name), "")),
        _ => {
            let mut names: Vec<_> = matching.into_iter().map(|(key, _)| key).collect();
            names.sort();
            return Err(GatewayError::compile(
                "More than one contract in output, select one by name",
                names.join(", "),
            ));
        },
    };
    // older solc versions emit abi and devdoc as JSON encoded strings
    let abi = match contract.abi {
        Value::String(raw) => Abi::from_json(&raw).map_err(|err| GatewayError::InvalidInterface(err.to_string()))?,
        raw => Abi::new(raw),
    };
    let dev_doc = match contract.devdoc {
        Value::String(raw) => raw,
        Value::Null => String::new(),
        raw => raw.to_string(),
    };
    let bytecode = hex::decode(contract.bin.trim_start_matches("0x"))
        .map_err(|err| GatewayError::compile("Invalid bytecode in solc output", err.to_string()))?;
    Ok(CompiledContract {
        contract_name: key.rsplit(':').next().unwrap_or(&key).to_string(),
        abi,
        bytecode,
        dev_doc,
        compiler_version: combined.version,
    })
}
