use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Optional `chronicle.toml` next to the working directory.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Vault directory. Defaults to `.chronicle`.
    pub vault: Option<PathBuf>,
    /// Seconds between provider completion polls.
    pub poll_interval_secs: Option<u64>,
}

impl Config {
    /// Load `chronicle.toml` from the current directory if present.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("chronicle.toml"))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Vault directory after applying the command-line override.
    pub fn vault_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.vault.clone())
            .unwrap_or_else(|| PathBuf::from(".chronicle"))
    }
}
