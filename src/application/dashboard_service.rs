// Dashboard service - Use case for loading a dashboard into a fresh store
use crate::application::config_store::DashboardStore;
use crate::application::dashboard_gateway::{DashboardError, DashboardGateway, DashboardResult};
use crate::domain::dashboard::DashboardConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    gateway: Arc<dyn DashboardGateway>,
}

impl DashboardService {
    pub fn new(gateway: Arc<dyn DashboardGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch the saved config, falling back to the default layout when the
    /// backend has none yet
    pub async fn load_config(&self) -> DashboardResult<DashboardConfig> {
        match self.gateway.fetch_config().await {
            Ok(mut config) => {
                config.normalize();
                if let Err(violation) = config.validate() {
                    tracing::warn!("Loaded dashboard config has a layout problem: {}", violation);
                }
                Ok(config)
            }
            Err(DashboardError::NotFound) => {
                tracing::info!("No saved dashboard config, using default layout");
                Ok(DashboardConfig::default_layout())
            }
            Err(e) => Err(e),
        }
    }

    /// Build a brand-new store for a freshly mounted dashboard view
    pub async fn mount(&self) -> DashboardResult<DashboardStore> {
        let config = self.load_config().await?;
        Ok(DashboardStore::new(self.gateway.clone(), config))
    }
}
