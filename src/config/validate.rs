// src/config/validate.rs

use crate::config::model::{FlowConfig, RawFlowConfig};
use crate::errors::{LogflowError, Result};
use crate::types::LogKind;

impl TryFrom<RawFlowConfig> for FlowConfig {
    type Error = LogflowError;

    fn try_from(raw: RawFlowConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(FlowConfig::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawFlowConfig) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_flow_section(cfg)?;
    validate_log_section(cfg)?;
    validate_task_dependencies(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawFlowConfig) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(LogflowError::Config(
            "config must contain at least one [task.<id>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_flow_section(cfg: &RawFlowConfig) -> Result<()> {
    if cfg.flow.name.trim().is_empty() {
        return Err(LogflowError::Config(
            "[flow].name must not be blank".to_string(),
        ));
    }
    Ok(())
}

fn validate_log_section(cfg: &RawFlowConfig) -> Result<()> {
    match cfg.log.backend {
        LogKind::File if cfg.log.path.is_none() => Err(LogflowError::Config(
            "[log].path is required for the file backend".to_string(),
        )),
        LogKind::Array => match cfg.log.capacity {
            None => Err(LogflowError::Config(
                "[log].capacity is required for the array backend".to_string(),
            )),
            Some(0) => Err(LogflowError::Config(
                "[log].capacity must be >= 1 (got 0)".to_string(),
            )),
            Some(_) => Ok(()),
        },
        _ => Ok(()),
    }
}

fn validate_task_dependencies(cfg: &RawFlowConfig) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        if task.service.trim().is_empty() {
            return Err(LogflowError::Config(format!(
                "task '{name}' has a blank `service`"
            )));
        }
        for dep in task.after.iter() {
            if dep == name {
                return Err(LogflowError::Config(format!(
                    "task '{name}' cannot depend on itself in `after`"
                )));
            }
            if !cfg.task.contains_key(dep) {
                return Err(LogflowError::Config(format!(
                    "task '{name}' has unknown dependency '{dep}' in `after`"
                )));
            }
        }
    }
    Ok(())
}
