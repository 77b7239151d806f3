use crate::{
    compiler::{CompiledContract, Compiler},
    db::models::{DeployContract, DeployContractWithAddress},
    errors::{GatewayError, RemoteRegistryError},
    events::{StreamInfo, SubscriptionInfo, SubscriptionManager},
    registry::RemoteRegistry,
};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;

/// In-memory [RemoteRegistry], counting lookups that reach it
#[derive(Default)]
pub struct MemoryRemoteRegistry {
    pub gateways: Mutex<HashMap<String, DeployContract>>,
    pub instances: Mutex<HashMap<String, DeployContractWithAddress>>,
    pub registered: Mutex<Vec<(String, String)>>,
    pub refreshes: Mutex<usize>,
    pub fail_transport: bool,
}

impl MemoryRemoteRegistry {
    pub fn with_gateway(self, msg: DeployContract) -> Self {
        self.gateways.lock().insert(msg.id.clone(), msg);
        self
    }

    pub fn with_instance(self, name: &str, contract: DeployContract, address: &str) -> Self {
        self.instances.lock().insert(name.to_string(), DeployContractWithAddress {
            contract,
            address: address.to_string(),
        });
        self
    }

    fn check_transport(&self) -> Result<(), GatewayError> {
        if self.fail_transport {
            return Err(RemoteRegistryError::Transport("connection refused".into()).into());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RemoteRegistry for MemoryRemoteRegistry {
    async fn load_factory_for_instance(
        &self,
        name: &str,
        force_refresh: bool,
    ) -> Result<Option<DeployContractWithAddress>, GatewayError>
    {
        self.check_transport()?;
        if force_refresh {
            *self.refreshes.lock() += 1;
        }
        Ok(self.instances.lock().get(name).cloned())
    }

    async fn load_factory_for_gateway(
        &self,
        id: &str,
        force_refresh: bool,
    ) -> Result<Option<DeployContract>, GatewayError>
    {
        self.check_transport()?;
        if force_refresh {
            *self.refreshes.lock() += 1;
        }
        Ok(self.gateways.lock().get(id).cloned())
    }

    async fn register_instance(&self, name: &str, address: &str) -> Result<(), GatewayError> {
        self.check_transport()?;
        self.registered.lock().push((name.to_string(), address.to_string()));
        Ok(())
    }
}

/// In-memory [SubscriptionManager] with sequential ids
#[derive(Default)]
pub struct MemorySubscriptionManager {
    streams: Mutex<HashMap<String, StreamInfo>>,
    subscriptions: Mutex<HashMap<String, SubscriptionInfo>>,
    seq: Mutex<u32>,
}

impl MemorySubscriptionManager {
    pub fn with_subscription(self, id: &str, stream: &str) -> Self {
        self.subscriptions.lock().insert(id.to_string(), SubscriptionInfo {
            id: id.to_string(),
            stream: stream.to_string(),
            created: Some(Utc::now()),
            ..SubscriptionInfo::default()
        });
        self
    }

    fn next_id(&self) -> String {
        let mut seq = self.seq.lock();
        *seq += 1;
        format!("es-{}", seq)
    }

    fn with_stream<T, F: FnOnce(&mut StreamInfo) -> T>(&self, id: &str, f: F) -> Result<T, GatewayError> {
        let mut streams = self.streams.lock();
        let stream = streams
            .get_mut(id)
            .ok_or_else(|| GatewayError::not_found("Stream", id))?;
        Ok(f(stream))
    }
}

#[async_trait::async_trait]
impl SubscriptionManager for MemorySubscriptionManager {
    async fn add_stream(&self, mut spec: StreamInfo) -> Result<StreamInfo, GatewayError> {
        if !spec.details.contains_key("type") {
            return Err(GatewayError::EventStream("Stream type is required".into()));
        }
        spec.id = self.next_id();
        spec.created = Some(Utc::now());
        self.streams.lock().insert(spec.id.clone(), spec.clone());
        Ok(spec)
    }

    async fn streams(&self) -> Vec<StreamInfo> {
        self.streams.lock().values().cloned().collect()
    }

    async fn stream_by_id(&self, id: &str) -> Result<StreamInfo, GatewayError> {
        self.with_stream(id, |stream| stream.clone())
    }

    async fn update_stream(&self, id: &str, spec: StreamInfo) -> Result<StreamInfo, GatewayError> {
        self.with_stream(id, |stream| {
            if !spec.name.is_empty() {
                stream.name = spec.name;
            }
            stream.details.extend(spec.details);
            stream.clone()
        })
    }

    async fn suspend_stream(&self, id: &str) -> Result<(), GatewayError> {
        self.with_stream(id, |stream| stream.suspended = true)
    }

    async fn resume_stream(&self, id: &str) -> Result<(), GatewayError> {
        self.with_stream(id, |stream| stream.suspended = false)
    }

    async fn delete_stream(&self, id: &str) -> Result<(), GatewayError> {
        self.streams
            .lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| GatewayError::not_found("Stream", id))
    }

    async fn subscriptions(&self) -> Vec<SubscriptionInfo> {
        self.subscriptions.lock().values().cloned().collect()
    }

    async fn subscription_by_id(&self, id: &str) -> Result<SubscriptionInfo, GatewayError> {
        self.subscriptions
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::not_found("Subscription", id))
    }

    async fn delete_subscription(&self, id: &str) -> Result<(), GatewayError> {
        self.subscriptions
            .lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| GatewayError::not_found("Subscription", id))
    }

    async fn reset_subscription(&self, id: &str, from_block: &str) -> Result<(), GatewayError> {
        let mut subscriptions = self.subscriptions.lock();
        let sub = subscriptions
            .get_mut(id)
            .ok_or_else(|| GatewayError::not_found("Subscription", id))?;
        sub.from_block = from_block.to_string();
        Ok(())
    }
}

/// [Compiler] answering every compilation with the same output, or failing when empty
#[derive(Default)]
pub struct StaticCompiler {
    pub output: Option<CompiledContract>,
    pub calls: Mutex<Vec<String>>,
}

impl StaticCompiler {
    pub fn returning(output: CompiledContract) -> Self {
        Self {
            output: Some(output),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl Compiler for StaticCompiler {
    fn compile(
        &self,
        _source: &str,
        name: &str,
        _compiler_version: &str,
        _evm_version: &str,
    ) -> Result<CompiledContract, GatewayError>
    {
        self.calls.lock().push(name.to_string());
        self.output
            .clone()
            .ok_or_else(|| GatewayError::compile("Compilation failed", "Error: expected ';'"))
    }
}
