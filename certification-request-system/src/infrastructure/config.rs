use serde::Deserialize;

/// Builds the raw configuration from an optional `config.yaml` next to the
/// binary plus `CERT__`-prefixed environment variables, env taking
/// precedence.
pub fn build_config() -> anyhow::Result<config::Config> {
    let config = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("CERT").separator("__"))
        .build()?;
    Ok(config)
}

#[derive(Default, Clone, Deserialize, Debug)]
pub struct DeskConfig {
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    /// Staleness window served by the snapshot caches.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// How long a caller waits on a write queue before giving up.
    #[serde(default = "default_write_timeout_secs")]
    pub write_timeout_secs: u64,
}

#[derive(Clone, Deserialize, Debug)]
pub struct HostConfig {
    #[serde(default = "HostConfig::default_bind_address")]
    pub bind_address: String,
    #[serde(default = "HostConfig::default_bind_port")]
    pub bind_port: u16,
}

impl HostConfig {
    fn default_bind_address() -> String {
        "0.0.0.0".to_string()
    }
    fn default_bind_port() -> u16 {
        8080
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bind_address: Self::default_bind_address(),
            bind_port: Self::default_bind_port(),
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct SheetsConfig {
    #[serde(default = "SheetsConfig::default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub spreadsheet_id: String,
    /// Ready-to-use bearer token; refreshing it is the credential
    /// provider's job, not this service's.
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "SheetsConfig::default_tickets_sheet")]
    pub tickets_sheet: String,
    #[serde(default = "SheetsConfig::default_orders_sheet")]
    pub orders_sheet: String,
}

impl SheetsConfig {
    fn default_endpoint() -> String {
        "https://sheets.googleapis.com".to_string()
    }
    fn default_tickets_sheet() -> String {
        "tickets".to_string()
    }
    fn default_orders_sheet() -> String {
        "pedidos".to_string()
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            spreadsheet_id: Default::default(),
            access_token: Default::default(),
            tickets_sheet: Self::default_tickets_sheet(),
            orders_sheet: Self::default_orders_sheet(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 {
    5 * 60
}

fn default_write_timeout_secs() -> u64 {
    30
}
