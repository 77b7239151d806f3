use crate::{config::NodeConfig, db::ArtifactStore, registry::LocalRegistry};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
pub enum ListCommands {
    /// List stored ABIs
    Abis,
    /// List registered contract instances
    Contracts,
}

impl ListCommands {
    pub fn run(self, node_config: NodeConfig) -> anyhow::Result<()> {
        let store = ArtifactStore::open(&node_config.gateway.storage_path)?;
        let registry = LocalRegistry::open(store, node_config.gateway.base_url_prefix())?;
        let index = registry.index();

        match self {
            Self::Abis => {
                for abi in index.snapshot_abis() {
                    println!("{}\t{}\t{}", abi.id, abi.name, abi.created);
                }
            },
            Self::Contracts => {
                for contract in index.snapshot_contracts() {
                    println!("0x{}\t{}\t{}", contract.address, contract.registered_as, contract.abi);
                }
            },
        };
        Ok(())
    }
}

/// Rebuild the index of the configured store, migrating legacy descriptors on the way
pub fn migrate(node_config: NodeConfig) -> anyhow::Result<()> {
    let store = ArtifactStore::open(&node_config.gateway.storage_path)?;
    let registry = LocalRegistry::new(store, node_config.gateway.base_url_prefix());
    let report = registry.build_index()?;
    println!(
        "Migrated {} legacy descriptors, skipped {}",
        report.migrated, report.skipped
    );
    Ok(())
}
