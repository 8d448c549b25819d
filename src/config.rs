use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bundle: BundleConfig,
    #[serde(default)]
    pub assets: AssetConfig,
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BundleConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_license")]
    pub license: String,
    #[serde(default = "default_size_budget_kb")]
    pub size_budget_kb: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetConfig {
    #[serde(default = "default_asset_root")]
    pub root: PathBuf,
}

/// Design tokens written to `variables.css`.
///
/// Each table replaces the built-in one only when present in the file, so a
/// config that only names a theme keeps the default palette.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Theme {
    #[serde(default = "default_theme_name")]
    pub name: String,
    #[serde(default = "default_colors")]
    pub colors: IndexMap<String, String>,
    #[serde(default = "default_radius")]
    pub radius: IndexMap<String, String>,
    #[serde(default = "default_shadows")]
    pub shadows: IndexMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if config.assets.root.is_relative() {
        if let Some(dir) = path.parent() {
            config.assets.root = dir.join(&config.assets.root);
        }
    }
    log::debug!(
        "loaded config {} (theme {}, assets {})",
        path.display(),
        config.theme.name,
        config.assets.root.display()
    );
    Ok(config)
}

impl BundleConfig {
    pub fn size_budget_bytes(&self) -> u64 {
        self.size_budget_kb * 1024
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            version: default_version(),
            license: default_license(),
            size_budget_kb: default_size_budget_kb(),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: default_asset_root(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            colors: default_colors(),
            radius: default_radius(),
            shadows: default_shadows(),
        }
    }
}

fn default_title() -> String {
    "Dash UI Kit".to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_license() -> String {
    "MIT".to_string()
}

fn default_size_budget_kb() -> u64 {
    50
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_theme_name() -> String {
    "default".to_string()
}

fn token_table(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn default_colors() -> IndexMap<String, String> {
    token_table(&[
        ("primary", "220 80% 50%"),
        ("secondary", "210 40% 96%"),
        ("accent", "270 60% 55%"),
        ("background", "0 0% 100%"),
        ("foreground", "222 47% 11%"),
        ("muted", "210 40% 96%"),
        ("muted_foreground", "215 16% 47%"),
        ("border", "214 32% 91%"),
        ("input", "214 32% 91%"),
        ("ring", "220 80% 50%"),
        ("destructive", "0 84% 60%"),
        ("destructive_foreground", "0 0% 98%"),
    ])
}

fn default_radius() -> IndexMap<String, String> {
    token_table(&[
        ("sm", "0.25rem"),
        ("md", "0.5rem"),
        ("lg", "1rem"),
        ("full", "9999px"),
    ])
}

fn default_shadows() -> IndexMap<String, String> {
    token_table(&[
        ("sm", "0 1px 2px 0 rgb(0 0 0 / 0.05)"),
        (
            "md",
            "0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1)",
        ),
        (
            "lg",
            "0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1)",
        ),
        (
            "xl",
            "0 20px 25px -5px rgb(0 0 0 / 0.1), 0 8px 10px -6px rgb(0 0 0 / 0.1)",
        ),
    ])
}
