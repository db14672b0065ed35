//! Connection settings for a bridge.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{DurationSecondsWithFrac, serde_as};

/// Where the bridge lives and how long to wait for each reply.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use milight_bridge_rs::BridgeConfig;
///
/// let config = BridgeConfig::new("192.168.1.23").with_timeout(Duration::from_secs(1));
/// assert_eq!(config.port, 5987);
/// assert_eq!(config.endpoint(), "192.168.1.23:5987");
/// ```
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub address: String,
    #[serde(default = "BridgeConfig::default_port")]
    pub port: u16,
    /// Bound applied to every single receive, in seconds.
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    #[serde(default = "BridgeConfig::default_timeout")]
    pub timeout: Duration,
}

impl BridgeConfig {
    pub const DEFAULT_PORT: u16 = 5987;
    pub const DEFAULT_TIMEOUT_SECS: f64 = 5.0;

    pub fn new(address: &str) -> Self {
        BridgeConfig {
            address: address.to_string(),
            port: Self::DEFAULT_PORT,
            timeout: Self::default_timeout(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    fn default_timeout() -> Duration {
        Duration::from_secs_f64(Self::DEFAULT_TIMEOUT_SECS)
    }
}
