//! Service configuration from environment variables

use std::env::VarError;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_PORT: &str = "8083";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// JSON catalog to serve; an empty catalog when unset.
    pub catalog_path: Option<PathBuf>,
    pub log_filter: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load `.env` (if any) and read configuration from the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| lookup(var).unwrap_or_else(|_| default.to_string());

    let raw_port = or_default("PORT", DEFAULT_PORT);
    let port = raw_port.trim().parse::<u16>().map_err(|e| ConfigError::InvalidEnvVar {
        var: "PORT".to_string(),
        reason: e.to_string(),
    })?;

    let catalog_path = lookup("PRICING_CATALOG_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig { port, catalog_path, log_filter: or_default("RUST_LOG", DEFAULT_LOG_FILTER) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from_map<'a>(map: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| map.get(key).map(|v| (*v).to_string()).ok_or(VarError::NotPresent)
    }

    #[test]
    fn test_defaults() {
        let map = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.port, 8083);
        assert_eq!(cfg.catalog_path, None);
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn test_overrides() {
        let map = HashMap::from([("PORT", "9000"), ("PRICING_CATALOG_PATH", "./catalog.json"), ("RUST_LOG", "debug")]);
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.catalog_path, Some(PathBuf::from("./catalog.json")));
        assert_eq!(cfg.log_filter, "debug");
    }

    #[test]
    fn test_blank_catalog_path_is_unset() {
        let map = HashMap::from([("PRICING_CATALOG_PATH", "  ")]);
        assert_eq!(build_app_config(lookup_from_map(&map)).unwrap().catalog_path, None);
    }

    #[test]
    fn test_invalid_port() {
        let map = HashMap::from([("PORT", "eighty")]);
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PORT"));
    }
}
