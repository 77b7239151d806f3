pub mod config;
pub mod controllers;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routing;
pub mod server;

pub(crate) const LOG_TARGET: &'static str = "contract_gateway::api";
