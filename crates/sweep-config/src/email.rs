use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sweep_core::ConfigError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain connect, then upgrade with STARTTLS (usually port 587).
    #[default]
    Starttls,
    /// TLS from the first byte (SMTPS, usually port 465).
    Implicit,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailSettings {
    pub smtp_host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub from: String,
    pub to: String,
    /// Base64 of the plaintext SMTP password.
    pub credential: String,
    /// SMTP login; the `from` address when unset.
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub tls: TlsMode,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

impl EmailSettings {
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.from)
    }

    pub fn decode_credential(&self) -> Result<String, ConfigError> {
        let bytes = STANDARD
            .decode(self.credential.trim())
            .map_err(|e| ConfigError::Credential(e.to_string()))?;
        String::from_utf8(bytes)
            .map_err(|_| ConfigError::Credential("decoded value is not valid UTF-8".to_string()))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }
        for (name, value) in [("email.smtp_host", &self.smtp_host), ("email.from", &self.from), ("email.to", &self.to)] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
            }
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("email.port must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSettings")
            .field("smtp_host", &self.smtp_host)
            .field("port", &self.port)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("credential", &"<redacted>")
            .field("username", &self.username)
            .field("tls", &self.tls)
            .field("enabled", &self.enabled)
            .finish()
    }
}
