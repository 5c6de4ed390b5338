//! CLI argument definitions for the Vox server.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::{Path, PathBuf};

use vox_core::config::VoxConfig;

/// Vox: conversation and text-to-speech backend for the voice assistant.
#[derive(Parser, Debug, Default)]
#[command(name = "vox", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Address to bind the API server to.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > VOX_CONFIG env var > platform default (~/.vox/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("VOX_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Apply CLI overrides on top of an already env-resolved config.
    pub fn apply_to(&self, config: &mut VoxConfig) {
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref level) = self.log_level {
            config.server.log_level = level.clone();
        }
    }
}

/// Load the effective configuration: file (or defaults), then environment,
/// then CLI flags.
pub fn load_config(args: &CliArgs, path: &Path) -> VoxConfig {
    let mut config = VoxConfig::load_or_default(path);
    config.apply_env_overrides();
    args.apply_to(&mut config);
    config
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".vox").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".vox").join("config.toml");
    }
    PathBuf::from("config.toml")
}

/// Load `KEY=VALUE` lines from `.env` in the working directory.
///
/// Variables already present in the environment are left untouched. Must run
/// before any other thread is started.
pub fn load_dotenv() {
    load_dotenv_from(Path::new(".env"));
}

pub(crate) fn load_dotenv_from(path: &Path) {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return;
    };
    for (key, value) in parse_dotenv(&contents) {
        if std::env::var(&key).is_err() {
            std::env::set_var(key, value);
        }
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            let value = value.trim().trim_matches('"').trim_matches('\'');
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}
