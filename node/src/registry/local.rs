use super::{RegistryIndex, Resolver, LOG_TARGET};
use crate::{
    db::{
        migrations::{self, MigrationReport},
        models::{AbiRecord, ContractRecord, DeployContract},
        ArtifactStore,
        StoredFile,
    },
    errors::GatewayError,
    types::Address,
};
use chrono::{DateTime, Utc};
use log::{error, info};

/// File-backed registry: the artifact store as source of truth plus its in-memory index.
///
/// Writes go to the store first; the index is only updated once the file is durable.
pub struct LocalRegistry {
    store: ArtifactStore,
    index: RegistryIndex,
}

impl LocalRegistry {
    /// Registry with an empty index, use [open](Self::open) to load existing records
    pub fn new<S: Into<String>>(store: ArtifactStore, base_url: S) -> Self {
        Self {
            store,
            index: RegistryIndex::new(base_url),
        }
    }

    /// Open registry, migrating legacy records and building the index before returning
    pub fn open<S: Into<String>>(store: ArtifactStore, base_url: S) -> Result<Self, GatewayError> {
        let registry = Self::new(store, base_url);
        registry.build_index()?;
        Ok(registry)
    }

    #[inline]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    #[inline]
    pub fn index(&self) -> &RegistryIndex {
        &self.index
    }

    #[inline]
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self)
    }

    /// Replay the store into the index: ABIs, then instances, then legacy migrations.
    ///
    /// Unreadable files are logged and skipped.
    pub fn build_index(&self) -> Result<MigrationReport, GatewayError> {
        info!(target: LOG_TARGET, "Building installed smart contract index");
        let mut instances = Vec::new();
        let mut legacy = Vec::new();
        for file_name in self.store.list_files()? {
            match ArtifactStore::classify(&file_name) {
                StoredFile::Abi(id) => self.load_abi_file(&id),
                StoredFile::Instance(address) => instances.push(address),
                StoredFile::Legacy(address) => legacy.push(address),
                StoredFile::Unrecognized => {},
            }
        }
        for address in instances {
            self.load_instance_file(&address);
        }
        let report = migrations::migrate_legacy(self, &legacy);
        info!(
            target: LOG_TARGET,
            "Smart contract index built. {} entries",
            self.index.contract_count()
        );
        Ok(report)
    }

    /// Persist a new contract instance, then add it to the index.
    ///
    /// `path_name` becomes the resource path suffix: the friendly name if registered, else the address.
    pub fn store_new_contract(
        &self,
        address: Address,
        abi_id: &str,
        path_name: &str,
        register_as: &str,
    ) -> Result<ContractRecord, GatewayError>
    {
        let record = ContractRecord::new(address, abi_id, path_name, register_as, self.index.base_url());
        if record.is_named() {
            self.index
                .check_name_available_for(&record.registered_as, &record.address)?;
        }
        let previous = self.store.read_instance(&record.address).ok();
        self.store.write_instance(&record)?;
        if let Err(err) = self.index.add_contract(record.clone()) {
            // name was claimed by a concurrent writer after the check, put the file back
            let undo = match previous {
                Some(previous) => self.store.write_instance(&previous),
                None => self.store.remove_instance(&record.address),
            };
            if let Err(undo_err) = undo {
                error!(
                    target: LOG_TARGET,
                    "Failed to roll back instance file for {}: {}", record.address, undo_err
                );
            }
            return Err(err);
        }
        Ok(record)
    }

    /// Persist the deployment payload under `id`, then add its metadata to the index
    pub fn store_abi(&self, id: &str, msg: &DeployContract, created: DateTime<Utc>) -> Result<AbiRecord, GatewayError> {
        self.store.write_abi(id, msg)?;
        Ok(self.index.add_abi(id, msg, created))
    }

    /// Indexed ABI metadata plus its full payload read from the store
    pub fn load_abi(&self, id: &str) -> Result<(DeployContract, AbiRecord), GatewayError> {
        let info = self.index.lookup_abi(id).map_err(|err| {
            info!(target: LOG_TARGET, "ABI with ID {} not found locally", id);
            err
        })?;
        let msg = self.store.read_abi(id)?;
        Ok((msg, info))
    }

    /// Contract at the (unnormalized) address, with its ABI payload
    pub fn load_instance(&self, address: &str) -> Result<(DeployContract, ContractRecord), GatewayError> {
        let normalized = Address::normalize(address);
        let info = self.index.lookup_contract(&normalized)?;
        let (msg, _) = self.load_abi(&info.abi)?;
        Ok((msg, info))
    }

    fn load_abi_file(&self, id: &str) {
        match self.store.read_abi(id) {
            Ok(msg) => {
                let created = self.store.abi_modified(id).unwrap_or_else(Utc::now);
                self.index.add_abi(id, &msg, created);
            },
            Err(err) => error!(target: LOG_TARGET, "Failed to load ABI deployment file {}: {}", id, err),
        }
    }

    fn load_instance_file(&self, address: &Address) {
        let result = self
            .store
            .read_instance(address)
            .map_err(GatewayError::from)
            .and_then(|record| self.index.add_contract(record));
        if let Err(err) = result {
            error!(
                target: LOG_TARGET,
                "Failed to load contract instance file for {}: {}", address, err
            );
        }
    }
}
