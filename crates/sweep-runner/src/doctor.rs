use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use sweep_config::SweepConfig;

#[derive(Clone, Debug)]
pub struct CheckReport {
    pub root: PathBuf,
    pub rules: usize,
    pub default_retention_days: u32,
    pub email_enabled: bool,
}

/// Validate everything a run depends on without deleting or sending anything.
pub fn check(config_path: &Path) -> Result<CheckReport> {
    let cfg = SweepConfig::load_from(config_path).context("load configuration")?;
    if cfg.email.enabled {
        cfg.email.decode_credential().context("decode email credential")?;
    }

    let root = cfg.root_path();
    let meta = std::fs::metadata(&root).with_context(|| format!("stat root path {}", root.display()))?;
    if !meta.is_dir() {
        return Err(anyhow!("root path {} is not a directory", root.display()));
    }
    std::fs::read_dir(&root).with_context(|| format!("read root path {}", root.display()))?;

    Ok(CheckReport {
        root,
        rules: cfg.rules.len(),
        default_retention_days: cfg.default_retention_days,
        email_enabled: cfg.email.enabled,
    })
}
