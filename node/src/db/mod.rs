//! Durable file-backed storage of ABIs and contract instances

pub mod errors;
pub mod migrations;
pub mod models;

mod store;
pub use store::{ArtifactStore, StoredFile};

pub(crate) const LOG_TARGET: &'static str = "contract_gateway::db";
