use std::path::{Path, PathBuf};

use {
    tracing::{debug, warn},
    url::Url,
};

use crate::{
    env_subst::substitute_env,
    error::{Context, Error, Result},
    schema::{MedcheckConfig, parse_endpoint},
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "medcheck.toml",
    "medcheck.yaml",
    "medcheck.yml",
    "medcheck.json",
];

/// Environment variable that overrides `[backend] url`.
pub const API_URL_ENV: &str = "MEDCHECK_API_URL";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<MedcheckConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./medcheck.{toml,yaml,yml,json}`
/// 2. `~/.config/medcheck/medcheck.{toml,yaml,yml,json}`
///
/// Returns `MedcheckConfig::default()` if no file is found or it fails to
/// parse.
pub fn discover_and_load() -> MedcheckConfig {
    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return MedcheckConfig::default();
    };
    debug!(path = %path.display(), "loading config");
    load_config(&path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
        MedcheckConfig::default()
    })
}

fn find_config_file() -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .or_else(|| {
            let dir = config_dir()?;
            CONFIG_FILENAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|p| p.exists())
        })
}

/// Returns the user-global config directory (`~/.config/medcheck/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "medcheck").map(|d| d.config_dir().to_path_buf())
}

/// Overlay environment values onto `config`.
pub fn apply_env_overrides(config: &mut MedcheckConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

fn apply_env_overrides_with(
    config: &mut MedcheckConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
        debug!(env = API_URL_ENV, "backend url taken from environment");
        config.backend.url = Some(url);
    }
}

/// Resolve the backend endpoint once at startup.
///
/// Precedence: `cli_url` > [`API_URL_ENV`] > config file. An explicit
/// `config_path` must exist and parse; otherwise the standard locations are
/// searched.
pub fn resolve_endpoint(cli_url: Option<&str>, config_path: Option<&Path>) -> Result<Url> {
    if let Some(raw) = cli_url {
        debug!("backend url taken from command line");
        return parse_endpoint(raw.trim());
    }

    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => discover_and_load(),
    };
    apply_env_overrides(&mut config);
    let url = config.endpoint()?;
    debug!(%url, "resolved backend endpoint");
    Ok(url)
}

fn parse_config(raw: &str, path: &Path) -> Result<MedcheckConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::message(format!("unsupported config format: .{ext}"))),
    }
}
