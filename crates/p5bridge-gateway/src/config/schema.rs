use std::collections::HashSet;
use std::net::IpAddr;
use std::time::Duration;

use serde::Deserialize;
use p5bridge_core::error::{BridgeError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    pub version: u32,

    #[serde(default)]
    pub bridge: BridgeSection,

    #[serde(default)]
    pub heartbeat: HeartbeatSection,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            bridge: BridgeSection::default(),
            heartbeat: HeartbeatSection::default(),
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BridgeError::UnsupportedVersion);
        }
        self.bridge.validate()?;
        self.heartbeat.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeSection {
    #[serde(default = "default_host")]
    pub host: String,

    /// Candidate ports, tried in order.
    #[serde(default = "default_ports")]
    pub ports: Vec<u16>,
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            ports: default_ports(),
        }
    }
}

impl BridgeSection {
    pub fn validate(&self) -> Result<()> {
        self.host_addr()?;
        if self.ports.is_empty() {
            return Err(BridgeError::InvalidConfig("bridge.ports must not be empty".into()));
        }
        if self.ports.contains(&0) {
            return Err(BridgeError::InvalidConfig(
                "bridge.ports must not contain 0".into(),
            ));
        }
        let unique: HashSet<u16> = self.ports.iter().copied().collect();
        if unique.len() != self.ports.len() {
            return Err(BridgeError::InvalidConfig(
                "bridge.ports must not contain duplicates".into(),
            ));
        }
        Ok(())
    }

    pub fn host_addr(&self) -> Result<IpAddr> {
        self.host
            .parse()
            .map_err(|_| BridgeError::InvalidConfig(format!("bridge.host must be an IP address: {}", self.host)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeartbeatSection {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

impl Default for HeartbeatSection {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
        }
    }
}

impl HeartbeatSection {
    pub fn validate(&self) -> Result<()> {
        if !(1000..=600000).contains(&self.timeout_ms) {
            return Err(BridgeError::InvalidConfig(
                "heartbeat.timeout_ms must be between 1000 and 600000".into(),
            ));
        }
        if !(100..=self.timeout_ms).contains(&self.sweep_interval_ms) {
            return Err(BridgeError::InvalidConfig(
                "heartbeat.sweep_interval_ms must be between 100 and timeout_ms".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_ports() -> Vec<u16> {
    vec![3001, 3002, 3003, 3004]
}
fn default_timeout_ms() -> u64 {
    30000
}
fn default_sweep_interval_ms() -> u64 {
    10000
}
