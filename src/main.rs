// Main entry point - Dependency injection and dashboard mount
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use restaurant_dashboard::application::dashboard_gateway::DashboardGateway;
use restaurant_dashboard::application::dashboard_service::DashboardService;
use restaurant_dashboard::infrastructure::config::load_app_config;
use restaurant_dashboard::infrastructure::http_gateway::HttpDashboardGateway;
use restaurant_dashboard::infrastructure::memory_gateway::MemoryDashboardGateway;
use restaurant_dashboard::presentation::dashboard_view::DashboardView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let app_config = load_app_config().context("Failed to load config/dashboard")?;

    // Create gateway (infrastructure layer)
    let gateway: Arc<dyn DashboardGateway> = if app_config.dashboard.offline {
        tracing::info!("Offline mode, dashboard changes stay in memory");
        Arc::new(MemoryDashboardGateway::new())
    } else {
        Arc::new(HttpDashboardGateway::new(
            &app_config.gateway,
            app_config.dashboard.owner.clone(),
        )?)
    };

    // Mount the dashboard (application + presentation layers)
    let service = DashboardService::new(gateway);
    let view = DashboardView::mount(&service)
        .await
        .with_context(|| format!("Failed to load dashboard for {}", app_config.dashboard.owner))?;

    for kpi in view.kpi_render_plan() {
        tracing::info!(id = %kpi.id, icon = kpi.icon, unit = kpi.unit, "KPI {}", kpi.label);
    }
    for widget in view.widget_render_plan() {
        tracing::info!(
            id = %widget.id,
            kind = ?widget.chart_kind,
            width = widget.size.width,
            height = widget.size.height,
            metric = %widget.data_source.metric,
            "Widget"
        );
    }

    Ok(())
}
