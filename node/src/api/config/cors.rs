use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Single allowed origin, or `*` for any
    pub allowed_origins: String,
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: "*".to_string(),
            max_age: 3600,
        }
    }
}
