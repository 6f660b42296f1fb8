use std::path::Path;

use {anyhow::Result, clap::Subcommand};

use medcheck_config::{API_URL_ENV, config_dir, resolve_endpoint};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Resolve the backend endpoint and report where it came from.
    Check,
    /// Print the user-global config directory.
    Dir,
}

pub fn handle_config(
    action: ConfigAction,
    api_url: Option<&str>,
    config: Option<&Path>,
) -> Result<()> {
    match action {
        ConfigAction::Check => check(api_url, config),
        ConfigAction::Dir => {
            match config_dir() {
                Some(dir) => println!("{}", dir.display()),
                None => eprintln!("no home directory found"),
            }
            Ok(())
        },
    }
}

fn check(api_url: Option<&str>, config: Option<&Path>) -> Result<()> {
    let source = if api_url.is_some() {
        "--api-url".to_string()
    } else if std::env::var(API_URL_ENV).is_ok_and(|v| !v.trim().is_empty()) {
        API_URL_ENV.to_string()
    } else if let Some(path) = config {
        path.display().to_string()
    } else {
        "config file".to_string()
    };

    match resolve_endpoint(api_url, config) {
        Ok(url) => {
            println!("Backend: {url}");
            eprintln!("(from {source})");
            Ok(())
        },
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        },
    }
}
