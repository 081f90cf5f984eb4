use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::matcher::DEFAULT_NEIGHBOUR_THRESHOLD;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DssConfig {
    /// "json" (flat file) or "sled".
    #[serde(default = "default_backend")]
    pub db_backend: String,
    /// JSON file path, or sled directory, depending on the backend.
    #[serde(default = "default_data_path")]
    pub data_path: String,
    /// Neighbour count for the ranked recommendation path.
    #[serde(default = "default_threshold")]
    pub neighbour_threshold: usize,
    /// When true, `/api/recommend` also returns similarity-ranked
    /// per-software scores next to the exact matches.
    #[serde(default)]
    pub ranked_recommendation: bool,
    #[serde(default)]
    pub listen: ListenConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        ListenConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DssConfig {
    fn default() -> Self {
        DssConfig {
            db_backend: default_backend(),
            data_path: default_data_path(),
            neighbour_threshold: default_threshold(),
            ranked_recommendation: false,
            listen: ListenConfig::default(),
        }
    }
}

fn default_backend() -> String {
    "json".to_string()
}

fn default_data_path() -> String {
    "projects.json".to_string()
}

fn default_threshold() -> usize {
    DEFAULT_NEIGHBOUR_THRESHOLD
}

/// Layered load: built-in defaults, then `dss.toml`, then `DSS_*`
/// environment variables.
pub fn load_config() -> Result<DssConfig, figment::Error> {
    load_config_from(Toml::file("dss.toml"))
}

pub fn load_config_from(toml: figment::providers::Data<figment::providers::Toml>) -> Result<DssConfig, figment::Error> {
    let figment = Figment::from(Serialized::defaults(DssConfig::default()))
        .merge(toml)
        .merge(Env::prefixed("DSS_").split("__"));

    let config: DssConfig = figment.extract()?;

    if config.data_path.trim().is_empty() {
        return Err(figment::Error::from("data_path must be set"));
    }

    Ok(config)
}
