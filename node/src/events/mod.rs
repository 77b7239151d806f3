//! Event stream and subscription seam.
//!
//! Streams and subscriptions are owned by a separate subsystem; the gateway only
//! relays authorized requests to a [SubscriptionManager] and shapes the responses.

use crate::errors::GatewayError;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event stream definition, fields other than the identity are passed through untouched
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub suspended: bool,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub stream: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from_block: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Anything listed by creation time, oldest first, ties broken by id
pub trait TimeSortable {
    fn created(&self) -> Option<DateTime<Utc>>;
    fn id(&self) -> &str;
}

impl TimeSortable for StreamInfo {
    fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl TimeSortable for SubscriptionInfo {
    fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    fn id(&self) -> &str {
        &self.id
    }
}

pub fn sort_by_created<T: TimeSortable>(items: Vec<T>) -> Vec<T> {
    items
        .into_iter()
        .sorted_by(|a, b| a.created().cmp(&b.created()).then_with(|| a.id().cmp(b.id())))
        .collect()
}

/// Event stream subsystem operations. Unknown ids must surface as [GatewayError::NotFound].
#[async_trait::async_trait]
pub trait SubscriptionManager: Send + Sync {
    async fn add_stream(&self, spec: StreamInfo) -> Result<StreamInfo, GatewayError>;

    async fn streams(&self) -> Vec<StreamInfo>;

    async fn stream_by_id(&self, id: &str) -> Result<StreamInfo, GatewayError>;

    async fn update_stream(&self, id: &str, spec: StreamInfo) -> Result<StreamInfo, GatewayError>;

    async fn suspend_stream(&self, id: &str) -> Result<(), GatewayError>;

    async fn resume_stream(&self, id: &str) -> Result<(), GatewayError>;

    async fn delete_stream(&self, id: &str) -> Result<(), GatewayError>;

    async fn subscriptions(&self) -> Vec<SubscriptionInfo>;

    async fn subscription_by_id(&self, id: &str) -> Result<SubscriptionInfo, GatewayError>;

    async fn delete_subscription(&self, id: &str) -> Result<(), GatewayError>;

    /// Restart delivery of a subscription from `from_block`
    async fn reset_subscription(&self, id: &str, from_block: &str) -> Result<(), GatewayError>;
}
