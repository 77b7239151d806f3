//! Networked registry used instead of the local file store for remote-mode deployments

use super::LOG_TARGET;
use crate::{
    db::models::{DeployContract, DeployContractWithAddress},
    errors::{GatewayError, RemoteRegistryError},
    types::Abi,
};
use log::{debug, info};
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use url::form_urlencoded;

/// Lookups and registrations against a remote registry.
///
/// `force_refresh` must bypass any cache the implementation keeps.
#[async_trait::async_trait]
pub trait RemoteRegistry: Send + Sync {
    /// Instance registered under friendly `name`, with the factory payload of its ABI
    async fn load_factory_for_instance(
        &self,
        name: &str,
        force_refresh: bool,
    ) -> Result<Option<DeployContractWithAddress>, GatewayError>;

    /// Factory payload of the gateway (unbound ABI) with the given id
    async fn load_factory_for_gateway(&self, id: &str, force_refresh: bool)
        -> Result<Option<DeployContract>, GatewayError>;

    async fn register_instance(&self, name: &str, address: &str) -> Result<(), GatewayError>;
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RemoteRegistryConfig {
    /// URL prefix the url-encoded gateway id is appended to
    pub gateway_url_prefix: Option<String>,
    /// URL prefix the url-encoded instance name is appended to, registrations are POSTed here
    pub instance_url_prefix: Option<String>,
}

/// Record as returned by the remote registry
#[derive(Debug, Deserialize)]
struct RemoteRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    abi: Option<Abi>,
    #[serde(default)]
    bytecode: String,
    #[serde(default)]
    devdoc: String,
    #[serde(default)]
    address: String,
}

impl RemoteRecord {
    fn into_deploy(self) -> Result<DeployContract, GatewayError> {
        let trimmed = self.bytecode.strip_prefix("0x").unwrap_or(&self.bytecode);
        let compiled = hex::decode(trimmed)
            .map_err(|err| RemoteRegistryError::Transport(format!("Invalid bytecode for '{}': {}", self.id, err)))?;
        Ok(DeployContract {
            id: self.id,
            contract_name: self.name,
            abi: self.abi,
            compiled,
            dev_doc: self.devdoc,
            ..DeployContract::default()
        })
    }
}

/// [RemoteRegistry] over HTTP with an in-memory lookup cache
pub struct HttpRemoteRegistry {
    config: RemoteRegistryConfig,
    client: reqwest::Client,
    gateways: Mutex<HashMap<String, DeployContract>>,
    instances: Mutex<HashMap<String, DeployContractWithAddress>>,
}

impl HttpRemoteRegistry {
    pub fn new(config: RemoteRegistryConfig) -> Self {
        if config.gateway_url_prefix.is_none() && config.instance_url_prefix.is_none() {
            info!(target: LOG_TARGET, "Remote registry not configured");
        }
        Self {
            config,
            client: reqwest::Client::new(),
            gateways: Mutex::new(HashMap::new()),
            instances: Mutex::new(HashMap::new()),
        }
    }

    async fn fetch(&self, prefix: &str, key: &str) -> Result<Option<RemoteRecord>, GatewayError> {
        let encoded: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
        let url = format!("{}{}", prefix, encoded);
        debug!(target: LOG_TARGET, "Remote registry lookup {}", url);
        let response = self.client.get(&url).send().await.map_err(transport)?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await.map_err(transport)?)),
            status => Err(RemoteRegistryError::Transport(format!("{} returned {}", url, status)).into()),
        }
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    RemoteRegistryError::Transport(err.to_string()).into()
}

#[async_trait::async_trait]
impl RemoteRegistry for HttpRemoteRegistry {
    async fn load_factory_for_instance(
        &self,
        name: &str,
        force_refresh: bool,
    ) -> Result<Option<DeployContractWithAddress>, GatewayError>
    {
        if !force_refresh {
            if let Some(cached) = self.instances.lock().get(name) {
                return Ok(Some(cached.clone()));
            }
        }
        let prefix = match &self.config.instance_url_prefix {
            Some(prefix) => prefix,
            None => return Ok(None),
        };
        let record = match self.fetch(prefix, name).await? {
            Some(record) => record,
            None => return Ok(None),
        };
        let address = record.address.clone();
        let instance = DeployContractWithAddress {
            contract: record.into_deploy()?,
            address,
        };
        self.instances.lock().insert(name.to_owned(), instance.clone());
        Ok(Some(instance))
    }

    async fn load_factory_for_gateway(
        &self,
        id: &str,
        force_refresh: bool,
    ) -> Result<Option<DeployContract>, GatewayError>
    {
        if !force_refresh {
            if let Some(cached) = self.gateways.lock().get(id) {
                return Ok(Some(cached.clone()));
            }
        }
        let prefix = match &self.config.gateway_url_prefix {
            Some(prefix) => prefix,
            None => return Ok(None),
        };
        let deploy = match self.fetch(prefix, id).await? {
            Some(record) => record.into_deploy()?,
            None => return Ok(None),
        };
        self.gateways.lock().insert(id.to_owned(), deploy.clone());
        Ok(Some(deploy))
    }

    async fn register_instance(&self, name: &str, address: &str) -> Result<(), GatewayError> {
        let prefix = self
            .config
            .instance_url_prefix
            .as_ref()
            .ok_or_else(|| RemoteRegistryError::Transport("Remote registry not configured".into()))?;
        info!(target: LOG_TARGET, "Registering {} as '{}' in remote registry", address, name);
        let response = self
            .client
            .post(prefix.as_str())
            .json(&json!({ "name": name, "address": address }))
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(
                RemoteRegistryError::Transport(format!("Registration of '{}' returned {}", name, response.status())).into(),
            );
        }
        self.instances.lock().remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::{dev::ServerHandle, web, App, HttpResponse, HttpServer};
    use std::{
        net::TcpListener,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    #[test]
    fn remote_record_to_deploy() {
        let record: RemoteRecord = serde_json::from_value(json!({
            "id": "gw-1",
            "name": "Simple",
            "abi": [],
            "bytecode": "0x6080",
            "address": "0xabc"
        }))
        .unwrap();
        let deploy = record.into_deploy().unwrap();
        assert_eq!(deploy.id, "gw-1");
        assert_eq!(deploy.contract_name, "Simple");
        assert_eq!(deploy.compiled, vec![0x60, 0x80]);
    }

    #[derive(Default)]
    struct Hits {
        instances: AtomicUsize,
        gateways: AtomicUsize,
        registrations: AtomicUsize,
    }

    fn record(key: &str) -> serde_json::Value {
        json!({
            "id": key,
            "name": "Simple",
            "abi": [],
            "bytecode": "0x6080",
            "address": "0x0000000000000000000000000000000000000001"
        })
    }

    async fn get_instance(hits: web::Data<Hits>, name: web::Path<String>) -> HttpResponse {
        hits.instances.fetch_add(1, Ordering::SeqCst);
        HttpResponse::Ok().json(record(&name))
    }

    async fn get_gateway(hits: web::Data<Hits>, id: web::Path<String>) -> HttpResponse {
        hits.gateways.fetch_add(1, Ordering::SeqCst);
        if id.as_str() == "missing" {
            return HttpResponse::NotFound().finish();
        }
        HttpResponse::Ok().json(record(&id))
    }

    async fn post_instance(hits: web::Data<Hits>) -> HttpResponse {
        hits.registrations.fetch_add(1, Ordering::SeqCst);
        HttpResponse::Ok().finish()
    }

    fn serve_registry(hits: Arc<Hits>) -> anyhow::Result<(RemoteRegistryConfig, ServerHandle)> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::from(hits.clone()))
                .route("/instances/", web::post().to(post_instance))
                .route("/instances/{name}", web::get().to(get_instance))
                .route("/gateways/{id}", web::get().to(get_gateway))
        })
        .workers(1)
        .listen(listener)?
        .run();
        let handle = server.handle();
        actix_rt::spawn(server);
        let config = RemoteRegistryConfig {
            gateway_url_prefix: Some(format!("http://{}/gateways/", addr)),
            instance_url_prefix: Some(format!("http://{}/instances/", addr)),
        };
        Ok((config, handle))
    }

    #[actix_rt::test]
    async fn lookups_are_cached_until_refreshed() -> anyhow::Result<()> {
        let hits = Arc::new(Hits::default());
        let (config, handle) = serve_registry(hits.clone())?;
        let registry = HttpRemoteRegistry::new(config);

        let instance = registry.load_factory_for_instance("token", false).await?.unwrap();
        assert_eq!(instance.address, "0x0000000000000000000000000000000000000001");
        assert_eq!(hits.instances.load(Ordering::SeqCst), 1);

        assert!(registry.load_factory_for_instance("token", false).await?.is_some());
        assert_eq!(hits.instances.load(Ordering::SeqCst), 1);

        assert!(registry.load_factory_for_instance("token", true).await?.is_some());
        assert_eq!(hits.instances.load(Ordering::SeqCst), 2);

        let gateway = registry.load_factory_for_gateway("gw-1", false).await?.unwrap();
        assert_eq!(gateway.id, "gw-1");
        registry.load_factory_for_gateway("gw-1", false).await?;
        assert_eq!(hits.gateways.load(Ordering::SeqCst), 1);
        registry.load_factory_for_gateway("gw-1", true).await?;
        assert_eq!(hits.gateways.load(Ordering::SeqCst), 2);

        // not-found answers are never cached
        assert!(registry.load_factory_for_gateway("missing", false).await?.is_none());
        assert!(registry.load_factory_for_gateway("missing", false).await?.is_none());
        assert_eq!(hits.gateways.load(Ordering::SeqCst), 4);

        handle.stop(false).await;
        Ok(())
    }

    #[actix_rt::test]
    async fn registration_clears_cached_name() -> anyhow::Result<()> {
        let hits = Arc::new(Hits::default());
        let (config, handle) = serve_registry(hits.clone())?;
        let registry = HttpRemoteRegistry::new(config);

        registry.load_factory_for_instance("token", false).await?;
        registry.load_factory_for_instance("other", false).await?;
        assert_eq!(hits.instances.load(Ordering::SeqCst), 2);

        registry
            .register_instance("token", "0x0000000000000000000000000000000000000002")
            .await?;
        assert_eq!(hits.registrations.load(Ordering::SeqCst), 1);

        registry.load_factory_for_instance("token", false).await?;
        assert_eq!(hits.instances.load(Ordering::SeqCst), 3);
        registry.load_factory_for_instance("other", false).await?;
        assert_eq!(hits.instances.load(Ordering::SeqCst), 3);

        handle.stop(false).await;
        Ok(())
    }

    #[actix_rt::test]
    async fn unconfigured_registry() {
        let registry = HttpRemoteRegistry::new(RemoteRegistryConfig::default());
        assert!(registry.load_factory_for_instance("x", false).await.unwrap().is_none());
        assert!(registry.load_factory_for_gateway("x", true).await.unwrap().is_none());
        assert!(matches!(
            registry.register_instance("x", "0x00").await,
            Err(GatewayError::RemoteRegistry(RemoteRegistryError::Transport(_)))
        ));
    }
}
