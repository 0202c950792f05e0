// In-memory gateway - Offline mode, applies the same checks the backend does
use crate::application::dashboard_gateway::{DashboardError, DashboardGateway, DashboardResult};
use crate::domain::dashboard::DashboardConfig;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct MemoryDashboardGateway {
    saved: Mutex<Option<DashboardConfig>>,
}

impl MemoryDashboardGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DashboardConfig) -> Self {
        Self {
            saved: Mutex::new(Some(config)),
        }
    }

    fn saved(&self) -> MutexGuard<'_, Option<DashboardConfig>> {
        self.saved.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DashboardGateway for MemoryDashboardGateway {
    async fn fetch_config(&self) -> DashboardResult<DashboardConfig> {
        self.saved().clone().ok_or(DashboardError::NotFound)
    }

    async fn save_config(&self, config: &DashboardConfig) -> DashboardResult<DashboardConfig> {
        let mut accepted = config.clone();
        accepted.normalize();
        accepted
            .validate()
            .map_err(|violation| DashboardError::Validation(violation.to_string()))?;

        *self.saved() = Some(accepted.clone());
        Ok(accepted)
    }
}
