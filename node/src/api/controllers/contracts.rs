use super::published_response;
use crate::{
    api::{
        errors::ApiError,
        models::{AbiUpload, RepresentationQuery},
        LOG_TARGET,
    },
    gateway::ContractGateway,
    publisher::ResourceKind,
};
use actix_web::{
    web::{self, Data, Json, Path, Query},
    HttpResponse,
};
use log::info;
use std::collections::HashMap;

pub async fn list_contracts(gateway: Data<ContractGateway>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(gateway.registry().index().snapshot_contracts()))
}

pub async fn list_abis(gateway: Data<ContractGateway>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(gateway.registry().index().snapshot_abis()))
}

/// Contract by address or friendly name
pub async fn get_contract(
    gateway: Data<ContractGateway>,
    address: Path<String>,
    query: Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError>
{
    describe_local(gateway, ResourceKind::Contract, address.into_inner(), &query).await
}

pub async fn get_abi(
    gateway: Data<ContractGateway>,
    abi: Path<String>,
    query: Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError>
{
    describe_local(gateway, ResourceKind::Abi, abi.into_inner(), &query).await
}

/// Store reads run on the blocking pool, like every other store access of the handlers
async fn describe_local(
    gateway: Data<ContractGateway>,
    kind: ResourceKind,
    locator: String,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, ApiError>
{
    let flags = RepresentationQuery::from_query(query);
    let representation = flags.representation();
    let published =
        web::block(move || gateway.publisher().describe_local(kind, &locator, &representation)).await??;
    published_response(published, flags.download)
}

/// Remote registry resources
pub(crate) async fn describe(
    gateway: &ContractGateway,
    kind: ResourceKind,
    locator: &str,
    query: &HashMap<String, String>,
) -> Result<HttpResponse, ApiError>
{
    let flags = RepresentationQuery::from_query(query);
    let published = gateway
        .publisher()
        .describe(kind, locator, &flags.representation(), flags.refresh)
        .await?;
    published_response(published, flags.download)
}

/// Bind stored ABI to an address, `?register=<name>` registers a friendly name
pub async fn register_contract(
    gateway: Data<ContractGateway>,
    path: Path<(String, String)>,
    query: Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError>
{
    let (abi, address) = path.into_inner();
    let register_as = query.get("register").cloned().unwrap_or_default();
    let record = {
        let abi = abi.clone();
        web::block(move || gateway.register_contract(&abi, &address, &register_as)).await??
    };
    info!(target: LOG_TARGET, "Registered {} as instance of ABI {}", record.address, abi);
    Ok(HttpResponse::Created().json(record))
}

/// Store a new ABI, compiling the uploaded source if needed
pub async fn add_abi(gateway: Data<ContractGateway>, upload: Json<AbiUpload>) -> Result<HttpResponse, ApiError> {
    let submission = upload.into_inner().into_submission()?;
    let record = web::block(move || gateway.add_abi(submission)).await??;
    Ok(HttpResponse::Ok().json(record))
}
