use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::pipeline::ResizeFilter;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidVar {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub resize_filter: ResizeFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            model_path: PathBuf::from("pneumonia_detection.onnx"),
            allowed_origins: vec!["http://localhost:3000".into()],
            max_upload_bytes: 20 * 1024 * 1024,
            resize_filter: ResizeFilter::default(),
        }
    }
}

impl Config {
    /// `.env`, then the YAML file named by `XRAY_CONFIG` (if any), then
    /// environment variables, later sources winning.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let base = match env::var("XRAY_CONFIG") {
            Ok(path) => {
                log::info!("Reading configuration from {}", path);
                Self::from_yaml_file(Path::new(&path))?
            }
            Err(_) => Self::default(),
        };

        base.with_overrides(|key| env::var(key).ok())
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(config_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(config_str)?)
    }

    /// Applies `HOST`, `PORT`, `MODEL_PATH`, `ALLOWED_ORIGINS`,
    /// `MAX_UPLOAD_BYTES` and `RESIZE_FILTER` as returned by `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_var("PORT", port)?;
        }
        if let Some(model_path) = lookup("MODEL_PATH") {
            self.model_path = PathBuf::from(model_path);
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(limit) = lookup("MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = parse_var("MAX_UPLOAD_BYTES", limit)?;
        }
        if let Some(filter) = lookup("RESIZE_FILTER") {
            self.resize_filter = parse_var("RESIZE_FILTER", filter)?;
        }
        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::InvalidVar {
        key,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_reference_deployment() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.model_path, PathBuf::from("pneumonia_detection.onnx"));
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.resize_filter, ResizeFilter::Triangle);
    }

    #[test]
    fn yaml_fills_only_given_keys() {
        let config = Config::from_yaml_str(
            "port: 9090\nmodel_path: /models/xray.onnx\nresize_filter: catmull_rom\n",
        )
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.model_path, PathBuf::from("/models/xray.onnx"));
        assert_eq!(config.resize_filter, ResizeFilter::CatmullRom);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn yaml_file_is_read_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "allowed_origins: [\"https://xray.example\"]").unwrap();
        let config = Config::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.allowed_origins, vec!["https://xray.example"]);
    }

    #[test]
    fn missing_yaml_file_is_reported() {
        let err = Config::from_yaml_file(Path::new("/no/such/config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn environment_overrides_yaml() {
        let config = Config::from_yaml_str("port: 9090\n")
            .unwrap()
            .with_overrides(lookup(&[
                ("PORT", "7000"),
                ("ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
                ("RESIZE_FILTER", "nearest"),
                ("MAX_UPLOAD_BYTES", "1024"),
            ]))
            .unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.resize_filter, ResizeFilter::Nearest);
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::default()
            .with_overrides(lookup(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { key: "PORT", .. }));
    }
}
