// REST gateway for dashboard configs
use crate::application::dashboard_gateway::{DashboardError, DashboardGateway, DashboardResult};
use crate::domain::dashboard::DashboardConfig;
use crate::infrastructure::config::GatewaySettings;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDashboardGateway {
    client: reqwest::Client,
    base_url: String,
    owner: String,
    token: Option<String>,
}

impl HttpDashboardGateway {
    pub fn new(settings: &GatewaySettings, owner: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            owner: owner.into(),
            token: settings.token.clone(),
        })
    }

    fn config_url(&self) -> String {
        format!(
            "{}/dashboards/{}/config",
            self.base_url,
            urlencoding::encode(&self.owner)
        )
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, self.config_url())
            .header("Accept", "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

fn network_error(e: reqwest::Error) -> DashboardError {
    DashboardError::Network(e.to_string())
}

async fn read_config(response: reqwest::Response) -> DashboardResult<DashboardConfig> {
    response
        .json::<DashboardConfig>()
        .await
        .map_err(|e| DashboardError::Network(format!("invalid dashboard config body: {}", e)))
}

#[async_trait]
impl DashboardGateway for HttpDashboardGateway {
    async fn fetch_config(&self) -> DashboardResult<DashboardConfig> {
        tracing::debug!("Fetching dashboard config for {}", self.owner);
        let response = self
            .request(reqwest::Method::GET)
            .send()
            .await
            .map_err(network_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(DashboardError::NotFound),
            status if status.is_success() => read_config(response).await,
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(DashboardError::Network(format!(
                    "fetch failed with status {}: {}",
                    status, body
                )))
            }
        }
    }

    async fn save_config(&self, config: &DashboardConfig) -> DashboardResult<DashboardConfig> {
        tracing::debug!(
            "Saving dashboard config for {} ({} widgets)",
            self.owner,
            config.widgets.len()
        );
        let response = self
            .request(reqwest::Method::PUT)
            .json(config)
            .send()
            .await
            .map_err(network_error)?;

        match response.status() {
            status if status.is_success() => read_config(response).await,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let body = response.text().await.unwrap_or_default();
                Err(DashboardError::Validation(body))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(DashboardError::Network(format!(
                    "save failed with status {}: {}",
                    status, body
                )))
            }
        }
    }
}
