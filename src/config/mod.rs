// src/config/mod.rs

//! TOML flow files: model, loading and validation.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_from_str};
pub use model::{FlowConfig, FlowSection, LogSection, RawFlowConfig, TaskConfig};
