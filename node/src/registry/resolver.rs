use super::{LocalRegistry, LOG_TARGET};
use crate::{
    db::models::{AbiRecord, ContractRecord, DeployContract},
    errors::GatewayError,
};
use log::info;

/// Outcome of resolving a caller supplied token against the local registry
#[derive(Clone, Debug)]
pub struct Resolution {
    pub deploy: DeployContract,
    pub abi: AbiRecord,
    pub contract: Option<ContractRecord>,
    /// Set when the token was resolved as a friendly name
    pub registered_name: Option<String>,
}

/// Turns addresses, ABI ids and friendly names into registry records
pub struct Resolver<'a> {
    registry: &'a LocalRegistry,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a LocalRegistry) -> Self {
        Self { registry }
    }

    /// Resolve `token` as an address first, falling back to a friendly name.
    ///
    /// When both fail the address lookup error is returned, not the name one.
    pub fn resolve(&self, token: &str) -> Result<Resolution, GatewayError> {
        let address_err = match self.registry.load_instance(token) {
            Ok((deploy, contract)) => return self.resolution(deploy, contract, None),
            Err(err) => err,
        };
        let named = match self.registry.index().lookup_by_name(token) {
            Ok(named) => named,
            Err(err) => {
                info!(target: LOG_TARGET, "{} is not a friendly name: {}", token, err);
                return Err(address_err);
            },
        };
        info!(target: LOG_TARGET, "{} -> 0x{}", token, named.address);
        let (deploy, contract) = self.registry.load_instance(named.address.as_str())?;
        self.resolution(deploy, contract, Some(token.to_owned()))
    }

    /// Resolve an unbound interface by ABI id
    pub fn resolve_abi(&self, id: &str) -> Result<Resolution, GatewayError> {
        let (deploy, abi) = self.registry.load_abi(&id.to_lowercase())?;
        Ok(Resolution {
            deploy,
            abi,
            contract: None,
            registered_name: None,
        })
    }

    fn resolution(
        &self,
        deploy: DeployContract,
        contract: ContractRecord,
        registered_name: Option<String>,
    ) -> Result<Resolution, GatewayError>
    {
        let abi = self.registry.index().lookup_abi(&contract.abi)?;
        Ok(Resolution {
            deploy,
            abi,
            contract: Some(contract),
            registered_name,
        })
    }
}
