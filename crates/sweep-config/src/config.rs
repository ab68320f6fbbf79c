use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sweep_core::{ConfigError, RetentionRule, RuleSet, DEFAULT_RETENTION_DAYS};

use crate::email::{EmailSettings, TlsMode};
use crate::format::ConfigFormat;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// Directory scanned for expired files. A leading `~` is expanded.
    pub root_path: String,
    /// Retention for files no rule matches.
    #[serde(default = "default_retention_days")]
    pub default_retention_days: u32,
    pub email: EmailSettings,
    /// Evaluated in order; the first matching pattern wins.
    #[serde(default)]
    pub rules: Vec<RetentionRule>,
}

fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

impl SweepConfig {
    pub fn example() -> Self {
        Self {
            root_path: "/srv/exports".to_string(),
            default_retention_days: DEFAULT_RETENTION_DAYS,
            email: EmailSettings {
                smtp_host: "smtp.example.com".to_string(),
                port: 587,
                from: "retention@example.com".to_string(),
                to: "ops@example.com".to_string(),
                credential: "Y2hhbmdlLW1l".to_string(),
                username: None,
                tls: TlsMode::Starttls,
                enabled: true,
            },
            rules: vec![
                RetentionRule::new("logs/*", 30),
                RetentionRule::new("*.tmp", 1),
            ],
        }
    }

    /// Reads, parses and validates a config file. Nothing else is touched.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let s = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let cfg: SweepConfig = ConfigFormat::from_path(path)
            .parse(&s)
            .map_err(|message| ConfigError::Parse { path: path.to_path_buf(), message })?;
        cfg.validate()?;
        tracing::debug!(path = %path.display(), rules = cfg.rules.len(), "config loaded");
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| ConfigError::Io { path: parent.to_path_buf(), source })?;
        }
        let s = ConfigFormat::from_path(path)
            .render(self)
            .map_err(|message| ConfigError::Parse { path: path.to_path_buf(), message })?;
        std::fs::write(path, s).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_path.trim().is_empty() {
            return Err(ConfigError::Invalid("root_path must not be empty".to_string()));
        }
        self.email.validate()?;
        self.rule_set()?;
        Ok(())
    }

    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.root_path).as_ref())
    }

    pub fn rule_set(&self) -> Result<RuleSet, ConfigError> {
        Ok(RuleSet::compile(&self.rules)?.with_default_days(self.default_retention_days))
    }
}
