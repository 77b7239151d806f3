//! One-off migration of the obsolete combined descriptor format.
//!
//! Legacy files `contract_<address>.swagger.json` held a whole generated descriptor with
//! the deployment id and registered name embedded as `info` extensions. Each one is
//! rewritten as a contract instance record and then removed.

use super::LOG_TARGET;
use crate::{registry::LocalRegistry, types::Address};
use log::{error, info, warn};
use serde::Deserialize;

pub const REGISTERED_NAME_EXTENSION: &'static str = "x-registered-name";
pub const DEPLOYMENT_ID_EXTENSION: &'static str = "x-deployment-id";

/// The only part of a legacy descriptor migration cares about
#[derive(Debug, Deserialize)]
pub struct LegacyDescriptor {
    pub info: Option<LegacyInfo>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyInfo {
    #[serde(rename = "x-registered-name")]
    pub registered_name: Option<String>,
    #[serde(rename = "x-deployment-id")]
    pub deployment_id: Option<String>,
}

#[derive(Debug, Default, PartialEq)]
pub struct MigrationReport {
    pub migrated: usize,
    pub skipped: usize,
}

/// Migrate every legacy file at `addresses`; failures are logged per file and never abort the scan
pub fn migrate_legacy(registry: &LocalRegistry, addresses: &[Address]) -> MigrationReport {
    let mut report = MigrationReport::default();
    for address in addresses {
        if migrate_contract(registry, address) {
            report.migrated += 1;
        } else {
            report.skipped += 1;
        }
    }
    if !addresses.is_empty() {
        info!(
            target: LOG_TARGET,
            "Legacy migration: {} migrated, {} skipped", report.migrated, report.skipped
        );
    }
    report
}

fn migrate_contract(registry: &LocalRegistry, address: &Address) -> bool {
    let store = registry.store();
    let descriptor: LegacyDescriptor = match store.read_legacy(address) {
        Ok(descriptor) => descriptor,
        Err(err) => {
            error!(target: LOG_TARGET, "Failed to parse legacy descriptor for {}: {}", address, err);
            return false;
        },
    };
    let info = match descriptor.info {
        Some(info) => info,
        None => {
            error!(target: LOG_TARGET, "Failed to migrate invalid legacy descriptor for {}", address);
            return false;
        },
    };
    let deployment_id = match info.deployment_id {
        Some(id) => id,
        None => {
            warn!(
                target: LOG_TARGET,
                "Descriptor for {} cannot be migrated due to missing '{}' extension", address, DEPLOYMENT_ID_EXTENSION
            );
            return false;
        },
    };
    let registered_name = info.registered_name.unwrap_or_default();
    if let Err(err) =
        registry.store_new_contract(address.clone(), &deployment_id, address.as_str(), &registered_name)
    {
        error!(target: LOG_TARGET, "Failed to write migrated instance file: {}", err);
        return false;
    }
    if let Err(err) = store.remove_legacy(address) {
        error!(target: LOG_TARGET, "Failed to clean-up migrated file for {}: {}", address, err);
    }
    true
}
