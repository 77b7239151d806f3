use crate::{
    api::{middleware::*, routing, LOG_TARGET},
    compiler::SolcCompiler,
    config::NodeConfig,
    db::ArtifactStore,
    gateway::ContractGateway,
    openapi::{GeneratorConfig, OpenApiGenerator},
    publisher::DescriptorPublisher,
    registry::{HttpRemoteRegistry, LocalRegistry, RemoteRegistry},
};
use actix_cors::Cors;
use actix_web::{http, middleware::Logger, web, App, HttpServer};
use log::info;
use std::sync::Arc;

// Must be valid JSON
const LOGGER_FORMAT: &'static str = r#"{"level": "INFO", "target":"api::request", "remote_ip":"%a", "user_agent": "%{User-Agent}i", "request": "%r", "uri": "%U", "status_code": %s, "response_time": %D, "api_version":"%{x-app-version}o", "client_version": "%{X-API-Client-Version}i" }"#;

/// Open the artifact store and wire the gateway with its default collaborators.
///
/// Legacy records are migrated and the index is fully built before this returns.
pub fn build_gateway(config: &NodeConfig) -> anyhow::Result<ContractGateway> {
    let base_url = config.gateway.base_url_prefix();
    let store = ArtifactStore::open(&config.gateway.storage_path)?;
    let registry = Arc::new(LocalRegistry::open(store, base_url.clone())?);
    let remote: Arc<dyn RemoteRegistry> = Arc::new(HttpRemoteRegistry::new(config.registry.clone()));
    let publisher = DescriptorPublisher::new(
        registry.clone(),
        remote.clone(),
        Arc::new(OpenApiGenerator::new()),
        GeneratorConfig::from_base_url(&config.gateway.base_url()),
        base_url,
    );
    Ok(ContractGateway::new(
        registry,
        remote,
        Arc::new(SolcCompiler::new(config.compiler.clone())),
        Arc::new(publisher),
        None,
    ))
}

pub async fn actix_main(config: NodeConfig) -> anyhow::Result<()> {
    let gateway = web::Data::new(build_gateway(&config)?);
    let auth = web::Data::new(config.auth.clone());
    info!(
        target: LOG_TARGET,
        "Serving {} contracts and {} ABIs from {}",
        gateway.registry().index().contract_count(),
        gateway.registry().index().abi_count(),
        config.gateway.storage_path.display()
    );
    println!("Server starting at {}:{}", config.actix.host, config.actix.port);

    let cors_config = config.cors.clone();
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(gateway.clone())
            .app_data(auth.clone())
            .app_data(routing::json_config())
            .wrap({
                let cors = match cors_config.allowed_origins.as_str() {
                    "*" => Cors::default().allow_any_origin().send_wildcard(),
                    origin => Cors::default().allowed_origin(origin),
                };
                cors.allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
                    .allowed_headers(vec![http::header::AUTHORIZATION, http::header::ACCEPT])
                    .allowed_header(http::header::CONTENT_TYPE)
                    .expose_headers(vec![SEMVER_HEADER_NAME])
                    .max_age(cors_config.max_age)
            })
            .wrap(Logger::new(LOGGER_FORMAT).exclude("/status"))
            .wrap(AppVersionHeader::new())
            .configure(routing::routes)
            .default_service(web::route().to(routing::not_found))
    })
    .bind(config.actix.addr())?;

    if let Some(workers) = config.actix.workers {
        server = server.workers(workers);
    }

    if let Some(backlog) = config.actix.backlog {
        server = server.backlog(backlog);
    };

    if let Some(maxconn) = config.actix.maxconn {
        server = server.max_connections(maxconn);
    };

    server.run().await?;

    Ok(())
}
