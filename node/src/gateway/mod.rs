//! Deployment lifecycle: storing interfaces before deployment, registering instances after it

use crate::{
    compiler::{CompiledContract, Compiler},
    db::{
        models::{AbiRecord, ContractRecord, DeployContract},
        ArtifactStore,
    },
    errors::GatewayError,
    events::SubscriptionManager,
    publisher::DescriptorPublisher,
    registry::{LocalRegistry, RegistryMode, RemoteRegistry},
    types::{Abi, Address},
};
use chrono::Utc;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

mod receipt;
pub use receipt::TransactionReceipt;

pub(crate) const LOG_TARGET: &'static str = "contract_gateway::gateway";

/// New interface submitted for storage
#[derive(Clone, Debug, PartialEq)]
pub enum AbiSubmission {
    /// Interface with optional compiled bytecode
    Precompiled { abi: Abi, bytecode: Vec<u8> },
    /// Contract source to compile
    Source {
        source: String,
        contract_name: String,
        compiler_version: String,
        evm_version: String,
    },
}

/// Collaborators of the gateway, shared with the HTTP layer
pub struct ContractGateway {
    registry: Arc<LocalRegistry>,
    remote: Arc<dyn RemoteRegistry>,
    compiler: Arc<dyn Compiler>,
    publisher: Arc<DescriptorPublisher>,
    events: Option<Arc<dyn SubscriptionManager>>,
}

impl ContractGateway {
    pub fn new(
        registry: Arc<LocalRegistry>,
        remote: Arc<dyn RemoteRegistry>,
        compiler: Arc<dyn Compiler>,
        publisher: Arc<DescriptorPublisher>,
        events: Option<Arc<dyn SubscriptionManager>>,
    ) -> Self
    {
        Self {
            registry,
            remote,
            compiler,
            publisher,
            events,
        }
    }

    #[inline]
    pub fn registry(&self) -> &LocalRegistry {
        &self.registry
    }

    #[inline]
    pub fn publisher(&self) -> &DescriptorPublisher {
        &self.publisher
    }

    /// Event stream subsystem, [GatewayError::EventSupportMissing] when none is configured
    pub fn events(&self) -> Result<&dyn SubscriptionManager, GatewayError> {
        self.events.as_deref().ok_or(GatewayError::EventSupportMissing)
    }

    /// Compile the contract source if supplied, then store the interface locally.
    ///
    /// The compiled code is kept on the message so deployment does not compile again.
    /// Nothing is stored for remote registry deployments.
    pub fn pre_deploy(&self, msg: &mut DeployContract, mode: RegistryMode) -> Result<Option<AbiRecord>, GatewayError> {
        let compiled = if msg.solidity.is_empty() {
            None
        } else {
            Some(
                self.compiler
                    .compile(&msg.solidity, &msg.contract_name, &msg.compiler_version, &msg.evm_version)?,
            )
        };
        if mode.is_remote() {
            if let Some(compiled) = compiled {
                apply_compiled(msg, compiled);
            }
            return Ok(None);
        }
        self.store_deployable_abi(msg, compiled).map(Some)
    }

    /// Validate and store the deployment payload under its id.
    ///
    /// Compiled output takes precedence over what the message carries. The interface is
    /// validated by generating its factory descriptor, whose description is kept on the payload.
    pub fn store_deployable_abi(
        &self,
        msg: &mut DeployContract,
        compiled: Option<CompiledContract>,
    ) -> Result<AbiRecord, GatewayError>
    {
        match compiled {
            Some(compiled) => apply_compiled(msg, compiled),
            None if msg.abi.is_none() => return Err(GatewayError::MissingInterface),
            None => {},
        }
        if msg.id.is_empty() {
            msg.id = Uuid::new_v4().to_string();
        }
        msg.id = ArtifactStore::normalize_abi_id(&msg.id).ok_or_else(|| GatewayError::InvalidId(msg.id.clone()))?;
        let descriptor = self.publisher.factory_descriptor(&msg.id, msg)?;
        msg.description = descriptor.description().to_string();
        // source is consumed by compilation and never persisted
        msg.solidity.clear();
        info!(target: LOG_TARGET, "{}: Storing deployable ABI '{}'", msg.id, msg.contract_name);
        self.registry.store_abi(&msg.id, msg, Utc::now())
    }

    /// Process a deployment receipt: set the instance URLs and register the new instance.
    ///
    /// Only successful deployments register anything. Locally the instance record references
    /// the ABI stored under the request id; remotely only requested names are registered.
    pub async fn post_deploy(&self, receipt: &mut TransactionReceipt, mode: RegistryMode) -> Result<(), GatewayError> {
        let raw_address = receipt
            .contract_address
            .as_deref()
            .ok_or_else(|| GatewayError::InvalidAddress(format!("{}: missing contract address", receipt.request_id)))?;
        let address = raw_address
            .parse::<Address>()
            .map_err(|err| GatewayError::InvalidAddress(format!("{}: {}", receipt.request_id, err)))?;
        if !receipt.success {
            return Ok(());
        }
        let base_path = if mode.is_remote() { "instances" } else { "contracts" };
        let path_name = if receipt.register_as.is_empty() {
            address.as_str().to_string()
        } else {
            receipt.register_as.clone()
        };
        let resource = format!("{}/{}/{}", self.publisher.base_url(), base_path, path_name);
        receipt.contract_swagger = format!("{}?openapi", resource);
        receipt.contract_ui = format!("{}?ui", resource);

        if mode.is_remote() {
            if !receipt.register_as.is_empty() {
                self.remote
                    .register_instance(&receipt.register_as, &address.to_prefixed())
                    .await?;
            }
        } else {
            // the ABI was stored under the normalized request id by pre_deploy
            let abi_id = ArtifactStore::normalize_abi_id(&receipt.request_id)
                .ok_or_else(|| GatewayError::InvalidId(receipt.request_id.clone()))?;
            self.registry
                .store_new_contract(address, &abi_id, &path_name, &receipt.register_as)?;
        }
        Ok(())
    }

    /// Bind a stored ABI to an address, optionally under a friendly name
    pub fn register_contract(&self, abi_id: &str, address: &str, register_as: &str) -> Result<ContractRecord, GatewayError> {
        let address = address
            .parse::<Address>()
            .map_err(|err| GatewayError::InvalidAddress(err.to_string()))?;
        let abi_id = abi_id.to_lowercase();
        self.registry.load_abi(&abi_id)?;
        let path_name = if register_as.is_empty() {
            address.as_str().to_string()
        } else {
            register_as.to_string()
        };
        self.registry
            .store_new_contract(address, &abi_id, &path_name, register_as)
    }

    /// Fails with [GatewayError::NameConflict] when `name` is taken in the registry `mode` selects
    pub async fn check_name_available(&self, name: &str, mode: RegistryMode) -> Result<(), GatewayError> {
        match mode {
            RegistryMode::Local => self.registry.index().check_name_available(name),
            RegistryMode::Remote => match self.remote.load_factory_for_instance(name, false).await? {
                Some(existing) => Err(GatewayError::name_conflict(name, &existing.address)),
                None => Ok(()),
            },
        }
    }

    /// Store a newly uploaded interface under a fresh id
    pub fn add_abi(&self, submission: AbiSubmission) -> Result<AbiRecord, GatewayError> {
        let mut msg = DeployContract {
            id: Uuid::new_v4().to_string(),
            ..DeployContract::default()
        };
        let compiled = match submission {
            AbiSubmission::Precompiled { abi, bytecode } => {
                msg.abi = Some(abi);
                msg.compiled = bytecode;
                None
            },
            AbiSubmission::Source {
                source,
                contract_name,
                compiler_version,
                evm_version,
            } => Some(
                self.compiler
                    .compile(&source, &contract_name, &compiler_version, &evm_version)?,
            ),
        };
        self.store_deployable_abi(&mut msg, compiled)
    }
}

fn apply_compiled(msg: &mut DeployContract, compiled: CompiledContract) {
    msg.abi = Some(compiled.abi);
    msg.compiled = compiled.bytecode;
    msg.dev_doc = compiled.dev_doc;
    msg.contract_name = compiled.contract_name;
    msg.compiler_version = compiled.compiler_version;
}
