//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables: `ORACLE_*` (e.g. `ORACLE_STORAGE__JWT`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./oracle.toml` or `./.oracle.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/rwa-oracle/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        // Add global config (XDG or fallback)
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        // Add project-level config files (check both names)
        for filename in &["oracle.toml", ".oracle.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
                break;
            }
        }

        // Add explicit config path
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Environment variables win over everything (secrets usually
        // arrive this way)
        figment = figment.merge(Env::prefixed("ORACLE_").split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for tests and --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/rwa-oracle/config.toml if set, otherwise
    /// falls back to ~/.config/rwa-oracle/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("rwa-oracle").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        for filename in &["oracle.toml", ".oracle.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }
}
