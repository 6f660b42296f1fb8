//! Backend endpoint configuration.
//!
//! Config files: `medcheck.toml`, `medcheck.yaml`, `medcheck.yml`, or
//! `medcheck.json`, searched in `./` then `~/.config/medcheck/`.
//! `MEDCHECK_API_URL` overrides the file; `${ENV_VAR}` and
//! `${ENV_VAR:-default}` are expanded in file contents.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{
        API_URL_ENV, apply_env_overrides, config_dir, discover_and_load, load_config,
        resolve_endpoint,
    },
    schema::{BackendConfig, MedcheckConfig, parse_endpoint},
};
