use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// On-disk config syntax, picked from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }

    pub fn parse<T: DeserializeOwned>(self, s: &str) -> Result<T, String> {
        match self {
            ConfigFormat::Toml => toml::from_str(s).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(s).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(s).map_err(|e| e.to_string()),
        }
    }

    pub fn render<T: Serialize>(self, value: &T) -> Result<String, String> {
        match self {
            ConfigFormat::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/sweep.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("sweep.YML")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("sweep.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("sweep.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("sweep")), ConfigFormat::Toml);
    }
}
