use crate::api::{
    controllers::{contracts, remote, status, streams},
    errors::ApiError,
};
use actix_web::{web, HttpResponse};
use serde_json::json;

pub fn routes(app: &mut web::ServiceConfig) {
    // Please try to keep in alphabetical order
    app.service(
        web::resource("/abis")
            .route(web::get().to(contracts::list_abis))
            .route(web::post().to(contracts::add_abi)),
    )
    .service(web::resource("/abis/{abi}").route(web::get().to(contracts::get_abi)))
    .service(web::resource("/abis/{abi}/{address}").route(web::post().to(contracts::register_contract)))
    .service(web::resource("/contracts").route(web::get().to(contracts::list_contracts)))
    .service(web::resource("/contracts/{address}").route(web::get().to(contracts::get_contract)))
    .service(
        web::resource("/eventstreams")
            .route(web::get().to(streams::list_streams))
            .route(web::post().to(streams::create_stream)),
    )
    .service(
        web::resource("/eventstreams/{id}")
            .route(web::get().to(streams::get_stream))
            .route(web::patch().to(streams::update_stream))
            .route(web::delete().to(streams::delete_stream)),
    )
    .service(web::resource("/eventstreams/{id}/resume").route(web::post().to(streams::resume_stream)))
    .service(web::resource("/eventstreams/{id}/suspend").route(web::post().to(streams::suspend_stream)))
    .service(web::resource("/g/{lookup}").route(web::get().to(remote::get_gateway)))
    .service(web::resource("/gateways/{lookup}").route(web::get().to(remote::get_gateway)))
    .service(web::resource("/i/{lookup}").route(web::get().to(remote::get_instance)))
    .service(web::resource("/instances/{lookup}").route(web::get().to(remote::get_instance)))
    .service(web::resource("/status").route(web::get().to(status::check)))
    .service(web::resource("/subscriptions").route(web::get().to(streams::list_subscriptions)))
    .service(
        web::resource("/subscriptions/{id}")
            .route(web::get().to(streams::get_subscription))
            .route(web::delete().to(streams::delete_subscription)),
    )
    .service(web::resource("/subscriptions/{id}/reset").route(web::post().to(streams::reset_subscription)));
}

/// JSON body extraction answering malformed payloads with a 400 in the API error format
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _| ApiError::bad_request(err.to_string()).into())
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({"error": "Not found"}))
}
