use serde::Deserialize;
use std::env;
use uuid::Uuid;
use seatwise_catalog::VehicleClass;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    pub seed: Option<SeedConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Number of operations kept for undo
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Stored when a seat is blocked without a reason
    #[serde(default = "default_block_reason")]
    pub default_block_reason: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            default_block_reason: default_block_reason(),
        }
    }
}

fn default_history_limit() -> usize { 10 }

fn default_block_reason() -> String { "blocked".to_string() }

/// Demo seat map created at startup
#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    pub name: String,
    pub rows: u32,
    pub columns: u32,
    #[serde(default = "default_vehicle_class")]
    pub vehicle_class: VehicleClass,
    pub transport_id: Option<Uuid>,
    #[serde(default)]
    pub passengers: Vec<String>,
}

fn default_vehicle_class() -> VehicleClass { VehicleClass::Bus }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `SEATWISE__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("SEATWISE").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
