use super::contracts::describe;
use crate::{api::errors::ApiError, gateway::ContractGateway, publisher::ResourceKind};
use actix_web::{
    web::{Data, Path, Query},
    HttpResponse,
};
use std::collections::HashMap;

/// Instance known to the remote registry under `lookup`, served at `/instances` and `/i`
pub async fn get_instance(
    gateway: Data<ContractGateway>,
    lookup: Path<String>,
    query: Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError>
{
    describe(&gateway, ResourceKind::Instance, &lookup, &query).await
}

/// Factory interface known to the remote registry under `lookup`, served at `/gateways` and `/g`
pub async fn get_gateway(
    gateway: Data<ContractGateway>,
    lookup: Path<String>,
    query: Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError>
{
    describe(&gateway, ResourceKind::Gateway, &lookup, &query).await
}
