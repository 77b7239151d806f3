use crate::{
    api::{errors::ApiError, models::EventStreamAuth, LOG_TARGET},
    events::{sort_by_created, StreamInfo},
    gateway::ContractGateway,
};
use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};
use log::info;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    #[serde(default)]
    pub from_block: String,
}

pub async fn create_stream(
    _auth: EventStreamAuth,
    gateway: Data<ContractGateway>,
    spec: Json<StreamInfo>,
) -> Result<HttpResponse, ApiError>
{
    let stream = gateway.events()?.add_stream(spec.into_inner()).await?;
    info!(target: LOG_TARGET, "Created event stream {}", stream.id);
    Ok(HttpResponse::Ok().json(stream))
}

pub async fn list_streams(_auth: EventStreamAuth, gateway: Data<ContractGateway>) -> Result<HttpResponse, ApiError> {
    let streams = gateway.events()?.streams().await;
    Ok(HttpResponse::Ok().json(sort_by_created(streams)))
}

pub async fn get_stream(
    _auth: EventStreamAuth,
    gateway: Data<ContractGateway>,
    id: Path<String>,
) -> Result<HttpResponse, ApiError>
{
    Ok(HttpResponse::Ok().json(gateway.events()?.stream_by_id(&id).await?))
}

pub async fn update_stream(
    _auth: EventStreamAuth,
    gateway: Data<ContractGateway>,
    id: Path<String>,
    spec: Json<StreamInfo>,
) -> Result<HttpResponse, ApiError>
{
    let stream = gateway.events()?.update_stream(&id, spec.into_inner()).await?;
    Ok(HttpResponse::Ok().json(stream))
}

pub async fn delete_stream(
    _auth: EventStreamAuth,
    gateway: Data<ContractGateway>,
    id: Path<String>,
) -> Result<HttpResponse, ApiError>
{
    gateway.events()?.delete_stream(&id).await?;
    info!(target: LOG_TARGET, "Deleted event stream {}", id);
    Ok(HttpResponse::NoContent().finish())
}

pub async fn suspend_stream(
    _auth: EventStreamAuth,
    gateway: Data<ContractGateway>,
    id: Path<String>,
) -> Result<HttpResponse, ApiError>
{
    gateway.events()?.suspend_stream(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn resume_stream(
    _auth: EventStreamAuth,
    gateway: Data<ContractGateway>,
    id: Path<String>,
) -> Result<HttpResponse, ApiError>
{
    gateway.events()?.resume_stream(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_subscriptions(
    _auth: EventStreamAuth,
    gateway: Data<ContractGateway>,
) -> Result<HttpResponse, ApiError>
{
    let subscriptions = gateway.events()?.subscriptions().await;
    Ok(HttpResponse::Ok().json(sort_by_created(subscriptions)))
}

pub async fn get_subscription(
    _auth: EventStreamAuth,
    gateway: Data<ContractGateway>,
    id: Path<String>,
) -> Result<HttpResponse, ApiError>
{
    Ok(HttpResponse::Ok().json(gateway.events()?.subscription_by_id(&id).await?))
}

pub async fn delete_subscription(
    _auth: EventStreamAuth,
    gateway: Data<ContractGateway>,
    id: Path<String>,
) -> Result<HttpResponse, ApiError>
{
    gateway.events()?.delete_subscription(&id).await?;
    info!(target: LOG_TARGET, "Deleted subscription {}", id);
    Ok(HttpResponse::NoContent().finish())
}

pub async fn reset_subscription(
    _auth: EventStreamAuth,
    gateway: Data<ContractGateway>,
    id: Path<String>,
    body: Json<ResetRequest>,
) -> Result<HttpResponse, ApiError>
{
    gateway.events()?.reset_subscription(&id, &body.from_block).await?;
    Ok(HttpResponse::NoContent().finish())
}
