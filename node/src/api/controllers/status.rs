use crate::{
    api::{errors::ApiError, middleware::APP_VERSION},
    gateway::ContractGateway,
};
use actix_web::{web::Data, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Serialize, Deserialize)]
struct Status {
    pub version: String,
    pub contracts: usize,
    pub abis: usize,
    pub events: bool,
}

pub async fn check(gateway: Data<ContractGateway>) -> Result<HttpResponse, ApiError> {
    let index = gateway.registry().index();
    let status = Status {
        version: APP_VERSION.to_string(),
        contracts: index.contract_count(),
        abis: index.abi_count(),
        events: gateway.events().is_ok(),
    };
    Ok(HttpResponse::Ok().json(json!(status)))
}
