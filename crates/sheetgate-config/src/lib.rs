//! # sheetgate-config
//!
//! Layered configuration loading for sheetgate using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SHEETGATE_*` prefix, e.g. `SHEETGATE_MAX_THREADS`)
//! 2. Project-level `sheetgate.toml`
//! 3. Project-level `config.json` (the legacy checker config file)
//! 4. User-level `~/.config/sheetgate/config.toml`
//! 5. Built-in defaults
//!
//! Unknown keys are ignored in every layer.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use sheetgate_config::SheetgateConfig;
//!
//! let config = SheetgateConfig::load(Path::new(".")).expect("config");
//! println!("revision sheet: {}", config.sheet_name);
//! ```

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::SheetgateConfig;

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-local TOML config file name.
pub const PROJECT_CONFIG_FILE: &str = "sheetgate.toml";

/// Project-local JSON config file name kept for existing setups.
pub const LEGACY_CONFIG_FILE: &str = "config.json";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SHEETGATE_";

impl SheetgateConfig {
    /// Load and validate configuration for the project at `project_root`.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load the project's `.env` file (if any) and then the configuration.
    pub fn load_with_dotenv(project_root: &Path) -> Result<Self, ConfigError> {
        let env_path = project_root.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        }
        Self::load(project_root)
    }

    /// Load configuration, substituting the defaults wholesale on failure.
    ///
    /// The failure is returned alongside so callers can surface it.
    #[must_use]
    pub fn load_or_default(project_root: &Path) -> (Self, Option<ConfigError>) {
        match Self::load_with_dotenv(project_root) {
            Ok(config) => (config, None),
            Err(error) => (Self::default(), Some(error)),
        }
    }

    /// Build the full provider chain for `project_root`.
    #[must_use]
    pub fn figment(project_root: &Path) -> Figment {
        Self::figment_from(Self::global_config_path().as_deref(), project_root)
    }

    /// Build the provider chain with an explicit (or no) user-global file.
    ///
    /// Public so tests can skip the real user config.
    #[must_use]
    pub fn figment_from(global_config: Option<&Path>, project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = global_config
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Legacy project JSON
        let legacy_path = project_root.join(LEGACY_CONFIG_FILE);
        if legacy_path.exists() {
            figment = figment.merge(Json::file(legacy_path));
        }

        // Layer 3: Project TOML
        let local_path = project_root.join(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sheetgate").join("config.toml"))
    }
}
