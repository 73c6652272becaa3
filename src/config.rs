//! Token resolution for the Fedora dist-git forge.
//!
//! The environment variable takes precedence; the packit user configuration
//! file is the fallback. A config file that cannot be read or parsed logs a
//! warning and resolution falls through to the "not found" error.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use tracing::warn;

/// Environment variable consulted first for the forge token.
pub const TOKEN_ENV_VAR: &str = "FEDORA_DISTGIT_TOKEN";

#[derive(Debug, Deserialize)]
struct PackitConfig {
    #[serde(default)]
    authentication: Option<AuthenticationConfig>,
}

#[derive(Debug, Deserialize)]
struct AuthenticationConfig {
    #[serde(default)]
    pagure: Option<PagureAuth>,
}

#[derive(Debug, Deserialize)]
struct PagureAuth {
    #[serde(default)]
    token: Option<String>,
}

/// Resolves the forge token from explicit sources.
///
/// Pure over its inputs so tests never have to touch process environment:
/// `env_token` is the value of [`TOKEN_ENV_VAR`] (if set) and `config_path`
/// the location of the packit configuration file (if known).
pub fn resolve_token_from(env_token: Option<String>, config_path: Option<&Path>) -> Result<String> {
    if let Some(token) = env_token.filter(|token| !token.trim().is_empty()) {
        return Ok(token);
    }

    if let Some(path) = config_path {
        if let Some(token) = token_from_config_file(path) {
            return Ok(token);
        }
    }

    anyhow::bail!(
        "Fedora dist-git token not found. Please either:\n  \
         1. Set {TOKEN_ENV_VAR} environment variable, or\n  \
         2. Configure token in ~/.config/packit.yaml under authentication.pagure.token"
    )
}

/// Resolves the forge token from the process environment and the user's
/// packit configuration file.
pub fn resolve_token() -> Result<String> {
    resolve_token_from(
        std::env::var(TOKEN_ENV_VAR).ok(),
        packit_config_path().as_deref(),
    )
}

fn packit_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("packit.yaml"))
}

fn token_from_config_file(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!("Failed to read token from {}: {err}", path.display());
            return None;
        }
    };

    let config: PackitConfig = match serde_yaml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            warn!("Failed to read token from {}: {err}", path.display());
            return None;
        }
    };

    config
        .authentication?
        .pagure?
        .token
        .filter(|token| !token.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn env_token_takes_precedence_over_config_file() {
        let file = write_config("authentication:\n  pagure:\n    token: file-token\n");
        let token = resolve_token_from(Some("env-token".to_string()), Some(file.path())).unwrap();
        assert_eq!(token, "env-token");
    }

    #[test]
    fn falls_back_to_nested_config_field() {
        let file = write_config(
            "debug: true\nauthentication:\n  pagure:\n    token: file-token\n    instance_url: https://src.fedoraproject.org\n",
        );
        let token = resolve_token_from(None, Some(file.path())).unwrap();
        assert_eq!(token, "file-token");
    }

    #[test]
    fn blank_env_token_is_ignored() {
        let file = write_config("authentication:\n  pagure:\n    token: file-token\n");
        let token = resolve_token_from(Some("   ".to_string()), Some(file.path())).unwrap();
        assert_eq!(token, "file-token");
    }

    #[test]
    fn missing_both_sources_is_an_error() {
        let err = resolve_token_from(None, None).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("FEDORA_DISTGIT_TOKEN"));
        assert!(message.contains("authentication.pagure.token"));
    }

    #[test]
    fn nonexistent_config_file_falls_through() {
        let path = Path::new("/nonexistent/packit.yaml");
        assert!(resolve_token_from(None, Some(path)).is_err());
    }

    #[test]
    fn malformed_config_falls_through() {
        let file = write_config("{ authentication: [\n");
        assert!(resolve_token_from(None, Some(file.path())).is_err());
    }

    #[test]
    fn config_without_token_field_falls_through() {
        let file = write_config("authentication:\n  github.com:\n    token: other-forge\n");
        assert!(resolve_token_from(None, Some(file.path())).is_err());
    }
}
