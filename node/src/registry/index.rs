use super::LOG_TARGET;
use crate::{
    db::models::{sort_listing, AbiRecord, ContractRecord, DeployContract},
    errors::GatewayError,
    types::Address,
};
use chrono::{DateTime, Utc};
use log::info;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct Maps {
    contracts: HashMap<String, ContractRecord>,
    names: HashMap<String, ContractRecord>,
    abis: HashMap<String, AbiRecord>,
}

impl Maps {
    fn check_name(&self, name: &str, address: Option<&Address>) -> Result<(), GatewayError> {
        match self.names.get(name) {
            Some(existing) if Some(&existing.address) != address => {
                Err(GatewayError::name_conflict(name, existing.address.as_str()))
            },
            _ => Ok(()),
        }
    }
}

/// In-memory index over the artifact store: address, friendly name and ABI id maps.
///
/// A single lock covers all three maps. It is only held to mutate or copy
/// a map, never across file I/O or sorting.
pub struct RegistryIndex {
    base_url: String,
    maps: Mutex<Maps>,
}

impl RegistryIndex {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            maps: Mutex::new(Maps::default()),
        }
    }

    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fails with [GatewayError::NameConflict] if `name` is bound to any address
    pub fn check_name_available(&self, name: &str) -> Result<(), GatewayError> {
        self.maps.lock().check_name(name, None)
    }

    /// Same as [check_name_available](Self::check_name_available) but re-registering
    /// the name for the address already holding it is not a conflict
    pub fn check_name_available_for(&self, name: &str, address: &Address) -> Result<(), GatewayError> {
        self.maps.lock().check_name(name, Some(address))
    }

    /// Insert contract record into the address map, and the name map when named.
    ///
    /// Nothing is modified when the name is taken by another address.
    pub fn add_contract(&self, record: ContractRecord) -> Result<(), GatewayError> {
        let mut maps = self.maps.lock();
        if record.is_named() {
            maps.check_name(&record.registered_as, Some(&record.address))?;
            info!(
                target: LOG_TARGET,
                "Registering {} as '{}'", record.address, record.registered_as
            );
            maps.names.insert(record.registered_as.clone(), record.clone());
        }
        let key = record.address.as_str().to_owned();
        if let Some(previous) = maps.contracts.insert(key, record.clone()) {
            let stale_name = previous.is_named() && previous.registered_as != record.registered_as;
            if stale_name && maps.names.get(&previous.registered_as).map(|r| &r.address) == Some(&record.address) {
                maps.names.remove(&previous.registered_as);
            }
        }
        Ok(())
    }

    /// Insert ABI metadata derived from the deployment payload, unconditionally
    pub fn add_abi(&self, id: &str, msg: &DeployContract, created: DateTime<Utc>) -> AbiRecord {
        let record = AbiRecord::from_deploy(id, msg, &self.base_url, created);
        self.maps.lock().abis.insert(id.to_owned(), record.clone());
        record
    }

    /// Contracts sorted by title then address
    pub fn snapshot_contracts(&self) -> Vec<ContractRecord> {
        let records: Vec<_> = self.maps.lock().contracts.values().cloned().collect();
        sort_listing(records)
    }

    /// ABIs sorted by title then id
    pub fn snapshot_abis(&self) -> Vec<AbiRecord> {
        let records: Vec<_> = self.maps.lock().abis.values().cloned().collect();
        sort_listing(records)
    }

    /// Lookup by normalized address
    pub fn lookup_contract(&self, address: &str) -> Result<ContractRecord, GatewayError> {
        self.maps
            .lock()
            .contracts
            .get(address)
            .cloned()
            .ok_or_else(|| GatewayError::not_found("Contract", address))
    }

    pub fn lookup_by_name(&self, name: &str) -> Result<ContractRecord, GatewayError> {
        self.maps
            .lock()
            .names
            .get(name)
            .cloned()
            .ok_or_else(|| GatewayError::not_found("Registered name", name))
    }

    pub fn lookup_abi(&self, id: &str) -> Result<AbiRecord, GatewayError> {
        self.maps
            .lock()
            .abis
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::not_found("ABI", id))
    }

    pub fn contract_count(&self) -> usize {
        self.maps.lock().contracts.len()
    }

    pub fn abi_count(&self) -> usize {
        self.maps.lock().abis.len()
    }
}
