//! Bridge config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io;

use p5bridge_core::error::{BridgeError, Result};

pub use schema::{BridgeConfig, BridgeSection, HeartbeatSection};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "P5BRIDGE_CONFIG";
/// Config file used when `P5BRIDGE_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "p5bridge.yaml";

pub fn load_from_file(path: &str) -> Result<BridgeConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| BridgeError::InvalidConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<BridgeConfig> {
    let cfg: BridgeConfig = serde_yaml::from_str(s)
        .map_err(|e| BridgeError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the config for the binary.
///
/// An explicit `P5BRIDGE_CONFIG` must exist. The default path is optional and
/// falls back to built-in defaults when absent.
pub fn load() -> Result<BridgeConfig> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return load_from_file(&path);
    }
    match fs::read_to_string(DEFAULT_CONFIG_PATH) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = DEFAULT_CONFIG_PATH, "no config file, using defaults");
            let cfg = BridgeConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
        Err(e) => Err(BridgeError::InvalidConfig(format!(
            "read config {DEFAULT_CONFIG_PATH} failed: {e}"
        ))),
    }
}
