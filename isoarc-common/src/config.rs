//! Configuration loading and path resolution
//!
//! Each pipeline path resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "ISOARC_CONFIG";
pub const WORKS_CSV_ENV: &str = "ISOARC_WORKS_CSV";
pub const FIGURES_CSV_ENV: &str = "ISOARC_FIGURES_CSV";
pub const OUT_DIR_ENV: &str = "ISOARC_OUT_DIR";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "isoarc.toml";

/// Values used when nothing else is configured
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDefaults {
    pub works_csv: PathBuf,
    pub figures_csv: PathBuf,
    pub out_dir: PathBuf,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            works_csv: PathBuf::from("data-source/works.csv"),
            figures_csv: PathBuf::from("data-source/figures.csv"),
            out_dir: PathBuf::from("public/data"),
            log_level: "info".to_string(),
        }
    }
}

/// `[paths]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub works: Option<PathBuf>,
    #[serde(default)]
    pub figures: Option<PathBuf>,
    #[serde(default)]
    pub out: Option<PathBuf>,
}

/// `[logging]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    CompiledDefaults::default().log_level
}

/// Contents of `isoarc.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
}

/// Locate and load the config file.
///
/// An explicit path (flag, then `ISOARC_CONFIG`) must exist and parse. The
/// implicit locations (`./isoarc.toml`, then the platform config dir) are
/// optional: when none exists the compiled defaults apply.
pub fn discover_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        return load_toml_config(path);
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return load_toml_config(Path::new(&path));
    }

    for candidate in implicit_config_paths() {
        if candidate.is_file() {
            debug!(path = %candidate.display(), "Using config file");
            return load_toml_config(&candidate);
        }
    }

    debug!("No config file found, using compiled defaults");
    Ok(TomlConfig::default())
}

fn implicit_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("isoarc").join("config.toml"));
    }
    paths
}

/// Input and output locations for one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct BuildPaths {
    pub works_csv: PathBuf,
    pub figures_csv: PathBuf,
    pub out_dir: PathBuf,
}

impl BuildPaths {
    pub fn works_json(&self) -> PathBuf {
        self.out_dir.join("works.json")
    }

    pub fn figures_json(&self) -> PathBuf {
        self.out_dir.join("figures.json")
    }
}

/// Command-line overrides; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub works_csv: Option<PathBuf>,
    pub figures_csv: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

/// Resolves build paths across CLI, environment, config file, and defaults
pub struct PathResolver {
    config: TomlConfig,
    defaults: CompiledDefaults,
}

impl PathResolver {
    pub fn new(config: TomlConfig) -> Self {
        Self {
            config,
            defaults: CompiledDefaults::default(),
        }
    }

    pub fn resolve(&self, overrides: &PathOverrides) -> BuildPaths {
        BuildPaths {
            works_csv: resolve_one(
                overrides.works_csv.as_ref(),
                WORKS_CSV_ENV,
                self.config.paths.works.as_ref(),
                &self.defaults.works_csv,
            ),
            figures_csv: resolve_one(
                overrides.figures_csv.as_ref(),
                FIGURES_CSV_ENV,
                self.config.paths.figures.as_ref(),
                &self.defaults.figures_csv,
            ),
            out_dir: resolve_one(
                overrides.out_dir.as_ref(),
                OUT_DIR_ENV,
                self.config.paths.out.as_ref(),
                &self.defaults.out_dir,
            ),
        }
    }

    /// Configured log level, for use when `RUST_LOG` is unset
    pub fn log_level(&self) -> &str {
        &self.config.logging.level
    }
}

fn resolve_one(
    cli_arg: Option<&PathBuf>,
    env_var_name: &str,
    config_value: Option<&PathBuf>,
    default: &Path,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.clone();
    }

    // Priority 2: Environment variable
    match std::env::var(env_var_name) {
        Ok(path) if !path.trim().is_empty() => return PathBuf::from(path),
        Ok(_) => warn!("{} is set but empty, ignoring", env_var_name),
        Err(_) => {}
    }

    // Priority 3: TOML config file
    if let Some(path) = config_value {
        return path.clone();
    }

    // Priority 4: Compiled default
    default.to_path_buf()
}
