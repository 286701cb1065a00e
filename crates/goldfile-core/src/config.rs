use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    gold::Gold,
    mode::UpdateMode,
    store::{DEFAULT_DIR, ReferenceStore},
};

pub const CONFIG_FILE_NAME: &str = "goldfile.config.toml";
pub const CONFIG_PATH_ENV: &str = "GOLDFILE_CONFIG_PATH";
pub const DIR_ENV: &str = "GOLDFILE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GoldConfig {
    pub gold_dir: PathBuf,
    pub update: bool,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub log_filter: String,
    pub log_file_prefix: String,
}

impl Default for GoldConfig {
    fn default() -> Self {
        Self {
            gold_dir: PathBuf::from(DEFAULT_DIR),
            update: false,
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            log_filter: "info,goldfile_core=debug".to_string(),
            log_file_prefix: "goldfile".to_string(),
        }
    }
}

impl GoldConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse goldfile config TOML")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config in {}", path.display()))
    }

    /// Loads the discovered config file, or defaults when there is none,
    /// then applies `GOLDFILE_DIR` and `GOLDFILE_UPDATE`.
    pub fn load() -> Result<Self> {
        let mut config = match discover_config_path()? {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(dir) = env::var_os(DIR_ENV).filter(|value| !value.is_empty()) {
            self.gold_dir = PathBuf::from(dir);
        }
        if let Some(mode) = UpdateMode::env_override() {
            self.update = mode.is_update();
        }
    }

    #[must_use]
    pub fn update_mode(&self) -> UpdateMode {
        UpdateMode::from_flag(self.update)
    }

    #[must_use]
    pub fn store(&self) -> ReferenceStore {
        ReferenceStore::new(&self.gold_dir)
    }

    #[must_use]
    pub fn into_gold(self) -> Gold {
        Gold::new(self.store(), self.update_mode())
    }
}

fn discover_config_path() -> Result<Option<PathBuf>> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Ok(Some(path));
        }
        anyhow::bail!("{CONFIG_PATH_ENV} points at missing file {}", path.display());
    }

    let cwd = env::current_dir().context("failed to resolve current directory")?;
    let candidates = [cwd.join(CONFIG_FILE_NAME), cwd.join("..").join(CONFIG_FILE_NAME)];
    Ok(candidates.into_iter().find(|path| path.is_file()))
}
