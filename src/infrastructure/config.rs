use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    /// User or branch key whose layout is loaded
    #[serde(default = "default_owner")]
    pub owner: String,
    /// Keep everything in memory instead of calling the backend
    #[serde(default)]
    pub offline: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            offline: false,
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_owner() -> String {
    "default".to_string()
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from("config/dashboard")
}

/// Load settings from `path`, then let `DASHBOARD__SECTION__KEY` env vars override them
pub fn load_app_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
