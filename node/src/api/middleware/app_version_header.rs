use actix_web::middleware::DefaultHeaders;

pub const SEMVER_HEADER_NAME: &'static str = "X-App-Version";
pub const APP_VERSION: &'static str = env!("CARGO_PKG_VERSION");

/// Stamps every response with the gateway version
pub struct AppVersionHeader;

impl AppVersionHeader {
    pub fn new() -> DefaultHeaders {
        DefaultHeaders::new().add((SEMVER_HEADER_NAME, APP_VERSION))
    }
}
