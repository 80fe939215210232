// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{FlowConfig, RawFlowConfig};
use crate::errors::Result;

/// Parse a flow file without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawFlowConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    load_from_str(&contents)
}

pub fn load_from_str(contents: &str) -> Result<RawFlowConfig> {
    Ok(toml::from_str(contents)?)
}

/// Parse and validate a flow file.
///
/// A relative `[log].path` is rewritten to be relative to the directory of
/// the config file, so runs resume the same log wherever they are started
/// from.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<FlowConfig> {
    let path = path.as_ref();
    let mut raw = load_from_path(path)?;
    if let Some(log_path) = raw.log.path.take() {
        raw.log.path = Some(resolve_relative(path, log_path));
    }
    FlowConfig::try_from(raw)
}

fn resolve_relative(config_path: &Path, target: PathBuf) -> PathBuf {
    if target.is_absolute() {
        return target;
    }
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(target),
        _ => target,
    }
}
