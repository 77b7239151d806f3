//! Descriptor Publisher: answers "give me the descriptor, raw ABI, summary or page for X"
//! for local contracts and ABIs as well as remote registry backed instances and gateways.

use crate::{
    db::{
        migrations::{DEPLOYMENT_ID_EXTENSION, REGISTERED_NAME_EXTENSION},
        models::DeployContract,
    },
    errors::{GatewayError, RemoteRegistryError},
    openapi::{Descriptor, DescriptorGenerator, DescriptorKind, DescriptorRequest, GeneratorConfig},
    registry::{LocalRegistry, RemoteRegistry},
    types::Abi,
};
use log::debug;
use serde_json::{json, Value};
use std::sync::Arc;
use url::form_urlencoded;

mod ui;
pub use ui::{render_page, PageTarget};

pub(crate) const LOG_TARGET: &'static str = "contract_gateway::publisher";

/// Resource families, each with its own canonical path prefix
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    /// Local instance bound to an address, `/contracts/<id>`
    Contract,
    /// Local unbound interface, `/abis/<id>`
    Abi,
    /// Remote registry instance, `/instances/<name>`
    Instance,
    /// Remote registry gateway, `/gateways/<name>`
    Gateway,
}

impl ResourceKind {
    fn prefix(self) -> &'static str {
        match self {
            ResourceKind::Contract => "contract",
            ResourceKind::Abi => "abi",
            ResourceKind::Instance => "instance",
            ResourceKind::Gateway => "gateway",
        }
    }

    fn is_factory(self) -> bool {
        matches!(self, ResourceKind::Abi | ResourceKind::Gateway)
    }
}

/// Descriptor generation options selected by the caller
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DescriptorOptions {
    pub factory_only: bool,
    /// Advertise basic auth, defaults to the gateway's configuration when unset
    pub basic_auth: Option<bool>,
    /// Comma separated schemes to advertise instead of the configured ones
    pub schemes: Option<String>,
    /// Default value of the `from` parameter
    pub from: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Representation {
    Descriptor(DescriptorOptions),
    RawInterface,
    Summary,
    HumanPage { factory_only: bool, from: Option<String> },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Published {
    /// Generated descriptor plus the id used when offering it as a file download
    Descriptor { descriptor: Descriptor, file_id: String },
    RawInterface(Value),
    Summary(Value),
    Page(String),
}

/// Interface located for a resource, wherever it came from
struct Located {
    deploy: DeployContract,
    summary: Value,
    /// Bound address for instances
    address: Option<String>,
    registered_name: String,
    /// Id in the descriptor file name and page links
    file_id: String,
}

pub struct DescriptorPublisher {
    registry: Arc<LocalRegistry>,
    remote: Arc<dyn RemoteRegistry>,
    generator: Arc<dyn DescriptorGenerator>,
    config: GeneratorConfig,
    base_url: String,
}

impl DescriptorPublisher {
    pub fn new(
        registry: Arc<LocalRegistry>,
        remote: Arc<dyn RemoteRegistry>,
        generator: Arc<dyn DescriptorGenerator>,
        config: GeneratorConfig,
        base_url: String,
    ) -> Self
    {
        Self {
            registry,
            remote,
            generator,
            config,
            base_url,
        }
    }

    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Locate `locator` among resources of `kind` and render the requested representation.
    ///
    /// `refresh` bypasses remote registry caches, it has no effect on local resources.
    pub async fn describe(
        &self,
        kind: ResourceKind,
        locator: &str,
        representation: &Representation,
        refresh: bool,
    ) -> Result<Published, GatewayError>
    {
        let located = match kind {
            ResourceKind::Contract | ResourceKind::Abi => return self.describe_local(kind, locator, representation),
            ResourceKind::Instance => self.locate_instance(locator, refresh).await?,
            ResourceKind::Gateway => self.locate_gateway(locator, refresh).await?,
        };
        self.render(kind, locator, located, representation)
    }

    /// [describe](Self::describe) for resources held in the local store, blocking on its reads.
    ///
    /// Remote kinds are never held locally and report not found.
    pub fn describe_local(
        &self,
        kind: ResourceKind,
        locator: &str,
        representation: &Representation,
    ) -> Result<Published, GatewayError>
    {
        let located = match kind {
            ResourceKind::Contract => self.locate_contract(locator)?,
            ResourceKind::Abi => self.locate_abi(locator)?,
            ResourceKind::Instance => return Err(GatewayError::not_found("Local instance", locator)),
            ResourceKind::Gateway => return Err(GatewayError::not_found("Local gateway", locator)),
        };
        self.render(kind, locator, located, representation)
    }

    fn render(
        &self,
        kind: ResourceKind,
        locator: &str,
        located: Located,
        representation: &Representation,
    ) -> Result<Published, GatewayError>
    {
        debug!(target: LOG_TARGET, "Describing {} '{}'", kind.prefix(), locator);
        match representation {
            Representation::Summary => Ok(Published::Summary(located.summary)),
            Representation::RawInterface => Ok(Published::RawInterface(
                located.deploy.abi.map(|abi| abi.raw().clone()).unwrap_or(Value::Null),
            )),
            Representation::HumanPage { factory_only, from } => Ok(Published::Page(render_page(
                &self.base_url,
                PageTarget {
                    prefix: kind.prefix(),
                    id: &located.file_id,
                    from: from.as_deref(),
                    is_factory: kind.is_factory(),
                    factory_only: *factory_only,
                },
            ))),
            Representation::Descriptor(options) => {
                let mut descriptor = self.descriptor_for(kind, locator, &located, options)?;
                if let Some(from) = options.from.as_deref().filter(|from| !from.is_empty()) {
                    descriptor.set_from_default(from);
                }
                Ok(Published::Descriptor {
                    descriptor,
                    file_id: located.file_id,
                })
            },
        }
    }

    /// Factory descriptor of a locally stored interface, used to validate new ABIs
    pub fn factory_descriptor(&self, abi_id: &str, deploy: &DeployContract) -> Result<Descriptor, GatewayError> {
        let located = Located {
            deploy: deploy.clone(),
            summary: Value::Null,
            address: None,
            registered_name: String::new(),
            file_id: abi_id.to_string(),
        };
        self.descriptor_for(ResourceKind::Abi, abi_id, &located, &DescriptorOptions::default())
    }

    fn descriptor_for(
        &self,
        kind: ResourceKind,
        locator: &str,
        located: &Located,
        options: &DescriptorOptions,
    ) -> Result<Descriptor, GatewayError>
    {
        let mut config = self.config.clone();
        if let Some(basic_auth) = options.basic_auth {
            config = config.with_basic_auth(basic_auth);
        }
        if let Some(schemes) = options.schemes.as_deref() {
            config = config.with_schemes(schemes);
        }
        let abi = located.deploy.abi.as_ref().ok_or(GatewayError::MissingInterface)?;
        let (path, descriptor_kind) = match kind {
            ResourceKind::Contract => {
                let suffix = if located.registered_name.is_empty() {
                    located.address.clone().unwrap_or_default()
                } else {
                    escape(&located.registered_name)
                };
                (format!("/contracts/{}", suffix), DescriptorKind::Instance)
            },
            ResourceKind::Abi => (
                format!("/abis/{}", located.file_id),
                DescriptorKind::factory(options.factory_only),
            ),
            ResourceKind::Instance => (format!("/instances/{}", escape(locator)), DescriptorKind::Instance),
            ResourceKind::Gateway => (
                format!("/gateways/{}", escape(locator)),
                DescriptorKind::factory(options.factory_only),
            ),
        };
        let title = match kind {
            ResourceKind::Instance | ResourceKind::Gateway => locator,
            // descriptors need a title, fall back to the ABI id
            _ if located.deploy.contract_name.is_empty() => located.deploy.id.as_str(),
            _ => located.deploy.contract_name.as_str(),
        };
        let mut descriptor = self.generator.generate(&config, DescriptorRequest {
            path: &path,
            title,
            abi,
            dev_doc: &located.deploy.dev_doc,
            kind: descriptor_kind,
        })?;
        if matches!(kind, ResourceKind::Contract | ResourceKind::Abi) {
            if !located.registered_name.is_empty() {
                descriptor.add_info_extension(REGISTERED_NAME_EXTENSION, &located.registered_name);
            }
            if !located.deploy.id.is_empty() {
                descriptor.add_info_extension(DEPLOYMENT_ID_EXTENSION, &located.deploy.id);
            }
        }
        Ok(descriptor)
    }

    fn locate_contract(&self, locator: &str) -> Result<Located, GatewayError> {
        let resolution = self.registry.resolver().resolve(locator)?;
        let contract = resolution
            .contract
            .ok_or_else(|| GatewayError::not_found("Contract", locator))?;
        let mut deploy = resolution.deploy;
        // payloads are keyed by the ABI id, older payloads may not carry it
        if deploy.id.is_empty() {
            deploy.id = contract.abi.clone();
        }
        Ok(Located {
            summary: json!(contract),
            address: Some(contract.address.as_str().to_string()),
            registered_name: contract.registered_as.clone(),
            // names are kept as given, addresses in their normalized form
            file_id: resolution
                .registered_name
                .unwrap_or_else(|| contract.address.as_str().to_string()),
            deploy,
        })
    }

    fn locate_abi(&self, locator: &str) -> Result<Located, GatewayError> {
        let resolution = self.registry.resolver().resolve_abi(locator)?;
        let mut deploy = resolution.deploy;
        if deploy.id.is_empty() {
            deploy.id = resolution.abi.id.clone();
        }
        Ok(Located {
            summary: json!(resolution.abi),
            address: None,
            registered_name: String::new(),
            file_id: resolution.abi.id,
            deploy,
        })
    }

    async fn locate_instance(&self, locator: &str, refresh: bool) -> Result<Located, GatewayError> {
        let found = self
            .remote
            .load_factory_for_instance(locator, refresh)
            .await?
            .ok_or_else(|| RemoteRegistryError::NotFound(format!("Instance '{}'", locator)))?;
        Ok(Located {
            summary: remote_summary(&found.contract.id, found.contract.abi.as_ref(), &found.address),
            address: Some(found.address),
            registered_name: locator.to_string(),
            file_id: locator.to_string(),
            deploy: found.contract,
        })
    }

    async fn locate_gateway(&self, locator: &str, refresh: bool) -> Result<Located, GatewayError> {
        let deploy = self
            .remote
            .load_factory_for_gateway(locator, refresh)
            .await?
            .ok_or_else(|| RemoteRegistryError::NotFound(format!("Gateway '{}'", locator)))?;
        Ok(Located {
            summary: remote_summary(&deploy.id, deploy.abi.as_ref(), ""),
            address: None,
            registered_name: String::new(),
            file_id: locator.to_string(),
            deploy,
        })
    }
}

fn remote_summary(id: &str, abi: Option<&Abi>, address: &str) -> Value {
    let mut summary = json!({"id": id, "abi": abi});
    if !address.is_empty() {
        summary["address"] = json!(address);
    }
    summary
}

fn escape(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        openapi::OpenApiGenerator,
        test_utils::{builders::DeployContractBuilder, test_address, test_registry, MemoryRemoteRegistry, TEST_BASE_URL},
    };
    use chrono::Utc;
    use tempdir::TempDir;

    fn publisher(remote: MemoryRemoteRegistry) -> (TempDir, Arc<LocalRegistry>, DescriptorPublisher) {
        let (dir, registry) = test_registry();
        let registry = Arc::new(registry);
        let publisher = DescriptorPublisher::new(
            registry.clone(),
            Arc::new(remote),
            Arc::new(OpenApiGenerator::new()),
            GeneratorConfig::default(),
            TEST_BASE_URL.to_string(),
        );
        (dir, registry, publisher)
    }

    fn descriptor(published: Published) -> Descriptor {
        match published {
            Published::Descriptor { descriptor, .. } => descriptor,
            other => panic!("Expected descriptor, got {:?}", other),
        }
    }

    fn full() -> Representation {
        Representation::Descriptor(DescriptorOptions::default())
    }

    #[actix_rt::test]
    async fn contract_descriptor_carries_provenance() -> anyhow::Result<()> {
        let (_dir, registry, publisher) = publisher(MemoryRemoteRegistry::default());
        let msg = DeployContractBuilder::new("abi-1").build();
        registry.store_abi("abi-1", &msg, Utc::now())?;
        registry.store_new_contract(test_address(1), "abi-1", "foo", "foo")?;

        let descriptor = descriptor(publisher.describe(ResourceKind::Contract, "foo", &full(), false).await?);
        assert_eq!(descriptor.info_extension(REGISTERED_NAME_EXTENSION), Some("foo"));
        assert_eq!(descriptor.info_extension(DEPLOYMENT_ID_EXTENSION), Some("abi-1"));
        assert_eq!(descriptor.raw()["basePath"], json!("/contracts/foo"));

        let address = test_address(1).to_prefixed();
        let published = publisher
            .describe(ResourceKind::Contract, &address.to_uppercase(), &full(), false)
            .await?;
        match published {
            Published::Descriptor { file_id, .. } => assert_eq!(file_id, test_address(1).as_str()),
            other => panic!("Expected descriptor, got {:?}", other),
        }

        registry.store_new_contract(test_address(3), "abi-1", "MyToken", "MyToken")?;
        match publisher.describe(ResourceKind::Contract, "MyToken", &full(), false).await? {
            Published::Descriptor { file_id, .. } => assert_eq!(file_id, "MyToken"),
            other => panic!("Expected descriptor, got {:?}", other),
        }
        Ok(())
    }

    #[actix_rt::test]
    async fn unnamed_contract_descriptor() -> anyhow::Result<()> {
        let (_dir, registry, publisher) = publisher(MemoryRemoteRegistry::default());
        registry.store_abi("abi-1", &DeployContractBuilder::new("abi-1").build(), Utc::now())?;
        registry.store_new_contract(test_address(2), "abi-1", test_address(2).as_str(), "")?;
        let options = DescriptorOptions {
            from: Some("0xfeed".into()),
            basic_auth: Some(false),
            schemes: Some("https,gopher".into()),
            ..DescriptorOptions::default()
        };
        let descriptor = descriptor(
            publisher
                .describe(ResourceKind::Contract, test_address(2).as_str(), &Representation::Descriptor(options), false)
                .await?,
        );
        let raw = descriptor.raw();
        assert_eq!(raw["basePath"], json!(format!("/contracts/{}", test_address(2))));
        assert_eq!(raw["schemes"], json!(["https"]));
        assert!(raw.get("securityDefinitions").is_none());
        assert_eq!(raw["parameters"]["fromParam"]["default"], json!("0xfeed"));
        assert_eq!(descriptor.info_extension(REGISTERED_NAME_EXTENSION), None);
        Ok(())
    }

    #[actix_rt::test]
    async fn abi_representations() -> anyhow::Result<()> {
        let (_dir, registry, publisher) = publisher(MemoryRemoteRegistry::default());
        let msg = DeployContractBuilder::new("abi-1").bytecode(vec![0x60]).build();
        registry.store_abi("abi-1", &msg, Utc::now())?;

        match publisher.describe(ResourceKind::Abi, "ABI-1", &Representation::Summary, false).await? {
            Published::Summary(summary) => {
                assert_eq!(summary["id"], json!("abi-1"));
                assert_eq!(summary["deployable"], json!(true));
            },
            other => panic!("Expected summary, got {:?}", other),
        }
        match publisher.describe(ResourceKind::Abi, "abi-1", &Representation::RawInterface, false).await? {
            Published::RawInterface(abi) => assert_eq!(&abi, msg.abi.as_ref().unwrap().raw()),
            other => panic!("Expected raw interface, got {:?}", other),
        }
        let page = Representation::HumanPage {
            factory_only: false,
            from: None,
        };
        match publisher.describe(ResourceKind::Abi, "abi-1", &page, false).await? {
            Published::Page(html) => assert!(html.contains("http://localhost:8080/abis/abi-1?swagger")),
            other => panic!("Expected page, got {:?}", other),
        }
        assert_eq!(
            publisher.describe_local(ResourceKind::Abi, "abi-1", &page)?,
            publisher.describe(ResourceKind::Abi, "abi-1", &page, true).await?
        );
        let factory = descriptor(
            publisher
                .describe(
                    ResourceKind::Abi,
                    "abi-1",
                    &Representation::Descriptor(DescriptorOptions {
                        factory_only: true,
                        ..DescriptorOptions::default()
                    }),
                    false,
                )
                .await?,
        );
        assert_eq!(factory.raw()["paths"].as_object().unwrap().len(), 1);
        assert_eq!(factory.info_extension(DEPLOYMENT_ID_EXTENSION), Some("abi-1"));
        Ok(())
    }

    #[actix_rt::test]
    async fn missing_resources() {
        let (_dir, _registry, publisher) = publisher(MemoryRemoteRegistry::default());
        assert!(matches!(
            publisher.describe(ResourceKind::Contract, "nope", &full(), false).await,
            Err(GatewayError::NotFound { .. })
        ));
        assert!(matches!(
            publisher.describe(ResourceKind::Abi, "nope", &full(), false).await,
            Err(GatewayError::NotFound { .. })
        ));
        assert!(matches!(
            publisher.describe(ResourceKind::Instance, "nope", &full(), false).await,
            Err(GatewayError::RemoteRegistry(RemoteRegistryError::NotFound(_)))
        ));
    }

    #[actix_rt::test]
    async fn remote_resources() -> anyhow::Result<()> {
        let remote = MemoryRemoteRegistry::default()
            .with_gateway(DeployContractBuilder::new("gw-1").build())
            .with_instance("my-instance", DeployContractBuilder::new("gw-1").build(), "0xabc");
        let (_dir, _registry, publisher) = publisher(remote);

        assert!(matches!(
            publisher.describe_local(ResourceKind::Instance, "my-instance", &full()),
            Err(GatewayError::NotFound { .. })
        ));
        assert!(matches!(
            publisher.describe_local(ResourceKind::Gateway, "gw-1", &full()),
            Err(GatewayError::NotFound { .. })
        ));
        let instance = descriptor(publisher.describe(ResourceKind::Instance, "my-instance", &full(), true).await?);
        assert_eq!(instance.raw()["basePath"], json!("/instances/my-instance"));
        assert_eq!(instance.raw()["info"]["title"], json!("my-instance"));
        assert!(instance.raw()["paths"].get("/").is_none());

        let gateway = descriptor(publisher.describe(ResourceKind::Gateway, "gw-1", &full(), false).await?);
        assert_eq!(gateway.raw()["basePath"], json!("/gateways/gw-1"));
        assert!(gateway.raw()["paths"].get("/").is_some());

        match publisher.describe(ResourceKind::Instance, "my-instance", &Representation::Summary, false).await? {
            Published::Summary(summary) => {
                assert_eq!(summary["id"], json!("gw-1"));
                assert_eq!(summary["address"], json!("0xabc"));
            },
            other => panic!("Expected summary, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn invalid_stored_interface() {
        let (_dir, _registry, publisher) = publisher(MemoryRemoteRegistry::default());
        let msg = DeployContractBuilder::new("bad").abi(Some(json!({"not": "array"}))).build();
        assert!(matches!(
            publisher.factory_descriptor("bad", &msg),
            Err(GatewayError::InvalidInterface(_))
        ));
        let msg = DeployContractBuilder::new("none").abi(None).build();
        assert!(matches!(
            publisher.factory_descriptor("none", &msg),
            Err(GatewayError::MissingInterface)
        ));
    }
}
