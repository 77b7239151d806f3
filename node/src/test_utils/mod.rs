use crate::{
    compiler::Compiler,
    db::{models::ContractRecord, ArtifactStore},
    events::SubscriptionManager,
    gateway::ContractGateway,
    openapi::{GeneratorConfig, OpenApiGenerator},
    publisher::DescriptorPublisher,
    registry::{LocalRegistry, RemoteRegistry},
    types::Address,
};
use std::sync::Arc;
use tempdir::TempDir;

pub(crate) mod actix;
pub(crate) mod builders;

mod fakes;
pub use fakes::{MemoryRemoteRegistry, MemorySubscriptionManager, StaticCompiler};

pub const TEST_BASE_URL: &'static str = "http://localhost:8080";

pub fn load_env() {
    let _ = dotenv::dotenv();
    let _ = pretty_env_logger::try_init();
}

/// Deterministic address built from a sequence number
pub fn test_address(n: u32) -> Address {
    format!("{:040x}", n).parse().expect("test address is valid hex")
}

/// Instance record of `abi`, registered as `name` unless empty
pub fn test_contract(n: u32, abi: &str, name: &str) -> ContractRecord {
    let address = test_address(n);
    let path_name = if name.is_empty() {
        address.as_str().to_string()
    } else {
        name.to_string()
    };
    ContractRecord::new(address, abi, &path_name, name, TEST_BASE_URL)
}

/// Artifact store rooted in a fresh temporary directory, keep the [TempDir] alive while in use
pub fn test_store() -> (TempDir, ArtifactStore) {
    load_env();
    let dir = TempDir::new("contract_gateway").expect("failed to create temp dir");
    let store = ArtifactStore::open(dir.path()).expect("failed to open artifact store");
    (dir, store)
}

/// Registry with an empty index over a fresh store
pub fn test_registry() -> (TempDir, LocalRegistry) {
    let (dir, store) = test_store();
    (dir, LocalRegistry::new(store, TEST_BASE_URL))
}

/// Gateway over a fresh registry with the given collaborators
pub fn test_gateway(
    remote: Arc<dyn RemoteRegistry>,
    compiler: Arc<dyn Compiler>,
    events: Option<Arc<dyn SubscriptionManager>>,
) -> (TempDir, ContractGateway)
{
    let (dir, registry) = test_registry();
    let registry = Arc::new(registry);
    let publisher = DescriptorPublisher::new(
        registry.clone(),
        remote.clone(),
        Arc::new(OpenApiGenerator::new()),
        GeneratorConfig::default(),
        TEST_BASE_URL.to_string(),
    );
    let gateway = ContractGateway::new(registry, remote, compiler, Arc::new(publisher), events);
    (dir, gateway)
}
