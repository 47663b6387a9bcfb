use thiserror::Error;

use crate::core::ContainerKey;

pub type LifecycleResult<T> = Result<T, LifecycleError>;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("chart container not found: {0}")]
    ContainerNotFound(String),

    #[error("no live chart registered for container `{0}`")]
    NotRegistered(ContainerKey),

    #[error("invalid chart spec: {0}")]
    InvalidSpec(String),

    #[error("chart backend failure: {0}")]
    Backend(String),

    #[error("invalid lifecycle config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
