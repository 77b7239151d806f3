use crate::{api::errors::ApiError, config::AuthConfig, errors::GatewayError};
use actix_web::{dev, http::header::Header, web, FromRequest, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures::future::{err, ok, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Claims of a bearer token granting access to event stream routes
#[derive(PartialEq, Debug, Serialize, Deserialize)]
pub struct AccessToken {
    pub sub: String,
    pub exp: u64,
}

impl AccessToken {
    pub fn new(subject: String, expiry_in_minutes: u64) -> Self {
        let expiry = SystemTime::now() + Duration::from_secs(expiry_in_minutes * 60);
        let exp = expiry.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default();
        AccessToken { sub: subject, exp }
    }
}

/// Authorization guard of event stream routes.
///
/// With no secret configured the routes are open, otherwise an HS256 signed,
/// unexpired bearer token is required.
#[derive(Debug)]
pub struct EventStreamAuth(pub Option<AccessToken>);

impl FromRequest for EventStreamAuth {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let secret = match req
            .app_data::<web::Data<AuthConfig>>()
            .and_then(|auth| auth.event_streams_secret.clone())
        {
            Some(secret) => secret,
            None => return ok(EventStreamAuth(None)),
        };
        let bearer = match Authorization::<Bearer>::parse(req) {
            Ok(bearer) => bearer.into_scheme(),
            Err(_) => return err(GatewayError::Unauthorized("Missing auth token".into()).into()),
        };
        match decode::<AccessToken>(
            bearer.token(),
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        ) {
            Ok(token) => ok(EventStreamAuth(Some(token.claims))),
            Err(_) => err(GatewayError::Unauthorized("Invalid auth token".into()).into()),
        }
    }
}
