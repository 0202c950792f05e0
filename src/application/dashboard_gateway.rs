// Gateway trait for loading and saving dashboard configs
use crate::domain::dashboard::DashboardConfig;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// Nothing saved yet; callers fall back to the default layout
    #[error("no saved dashboard config")]
    NotFound,
    #[error("dashboard config rejected: {0}")]
    Validation(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("a save is already in progress")]
    ConcurrentSave,
}

pub type DashboardResult<T> = Result<T, DashboardError>;

#[async_trait]
pub trait DashboardGateway: Send + Sync {
    /// Load the saved config
    async fn fetch_config(&self) -> DashboardResult<DashboardConfig>;

    /// Save a config and return the server-normalized copy
    /// (server-assigned ids, repacked positions)
    async fn save_config(&self, config: &DashboardConfig) -> DashboardResult<DashboardConfig>;
}
