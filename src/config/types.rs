use serde::{Deserialize, Serialize};

use super::defaults::*;

// ============================================================================
// Gateway Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    pub bind_host: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_GATEWAY_PORT,
            bind_host: None,
        }
    }
}

// ============================================================================
// Backend Store Configuration
// ============================================================================

/// Where the agent, workspace-assignment, and embed-settings stores live.
/// When no base URL is configured the engine runs against in-memory stores
/// (local development mode).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

// ============================================================================
// Remote Platform Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RemotePlatformConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

// ============================================================================
// Read Behavior
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadConfig {
    #[serde(default = "default_read_retries")]
    pub max_retries: u32,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_READ_RETRIES,
        }
    }
}

fn default_gateway_port() -> u16 {
    DEFAULT_GATEWAY_PORT
}

fn default_read_retries() -> u32 {
    DEFAULT_READ_RETRIES
}
