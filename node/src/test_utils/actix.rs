use super::{load_env, test_gateway, MemoryRemoteRegistry, MemorySubscriptionManager, StaticCompiler};
use crate::{
    api::{middleware::AppVersionHeader, routing},
    config::AuthConfig,
    db::models::AbiRecord,
    events::SubscriptionManager,
    gateway::ContractGateway,
    test_utils::builders::{simple_abi, DeployContractBuilder},
};
use actix_http::Request;
use actix_web::{body::MessageBody, dev::{Service, ServiceResponse}, test, web, App};
use chrono::Utc;
use std::sync::Arc;
use tempdir::TempDir;

/// Collaborators of a test API instance, kept alive while the service is in use
pub struct TestState {
    _dir: TempDir,
    pub gateway: web::Data<ContractGateway>,
    pub remote: Arc<MemoryRemoteRegistry>,
    pub auth: web::Data<AuthConfig>,
}

impl TestState {
    /// In-memory remote registry and subscription manager, open event stream routes
    pub fn new() -> Self {
        Self::build(MemoryRemoteRegistry::default(), Some(MemorySubscriptionManager::default()))
    }

    pub fn with_remote(remote: MemoryRemoteRegistry) -> Self {
        Self::build(remote, Some(MemorySubscriptionManager::default()))
    }

    pub fn with_events(events: MemorySubscriptionManager) -> Self {
        Self::build(MemoryRemoteRegistry::default(), Some(events))
    }

    pub fn without_events() -> Self {
        Self::build(MemoryRemoteRegistry::default(), None)
    }

    /// Require bearer tokens signed with `secret` on event stream routes
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.auth = web::Data::new(AuthConfig {
            event_streams_secret: Some(secret.to_string()),
        });
        self
    }

    /// Store a deployable copy of the simple test ABI under `id`
    pub fn store_abi(&self, id: &str) -> AbiRecord {
        let msg = DeployContractBuilder::new(id)
            .abi(Some(simple_abi()))
            .bytecode(vec![0x60, 0x80])
            .build();
        self.gateway
            .registry()
            .store_abi(id, &msg, Utc::now())
            .expect("failed to store test ABI")
    }

    fn build(remote: MemoryRemoteRegistry, events: Option<MemorySubscriptionManager>) -> Self {
        let remote = Arc::new(remote);
        let events = events.map(|events| Arc::new(events) as Arc<dyn SubscriptionManager>);
        let (dir, gateway) = test_gateway(remote.clone(), Arc::new(StaticCompiler::default()), events);
        Self {
            _dir: dir,
            gateway: web::Data::new(gateway),
            remote,
            auth: web::Data::new(AuthConfig::default()),
        }
    }
}

/// Initialized API service over `state`, wired like the server minus CORS and request logging
pub async fn test_app(
    state: &TestState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    load_env();
    test::init_service(
        App::new()
            .app_data(state.gateway.clone())
            .app_data(state.auth.clone())
            .app_data(routing::json_config())
            .wrap(AppVersionHeader::new())
            .configure(routing::routes)
            .default_service(web::route().to(routing::not_found)),
    )
    .await
}
