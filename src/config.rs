// ============================================================================
// Configuration
// ============================================================================
// Lue depuis les variables d'environnement (après chargement d'un .env
// éventuel par le binaire)
//
//   OPTIONS_SERVER_URL    URL de base du serveur  (défaut http://127.0.0.1:5000)
//   OPTIONS_OUTPUT        page HTML générée       (défaut results.html)
//   OPTIONS_TIMEOUT_SECS  timeout des requêtes    (défaut : aucun)
//   LAZYOPTIONS_LOG_DIR   répertoire des logs     (défaut : voir default_log_dir)
//
// CONCEPT RUST : closure de lookup
// - from_lookup() prend une fonction clé -> valeur
// - Les tests passent une HashMap au lieu de modifier l'environnement
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_OUTPUT: &str = "results.html";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { key: &'static str, value: String },

    #[error("{key} must start with http:// or https://, got {value:?}")]
    InvalidServerUrl { key: &'static str, value: String },
}

/// Configuration du binaire
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server_url: String,
    pub output_path: PathBuf,
    pub request_timeout: Option<Duration>,
    pub log_dir: PathBuf,
}

impl Config {
    /// Lit la configuration depuis l'environnement du processus
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Une variable vide compte comme absente
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_url = match get("OPTIONS_SERVER_URL") {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => url,
            Some(url) => {
                return Err(ConfigError::InvalidServerUrl {
                    key: "OPTIONS_SERVER_URL",
                    value: url,
                })
            }
            None => DEFAULT_SERVER_URL.to_string(),
        };

        let request_timeout = match get("OPTIONS_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        key: "OPTIONS_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => None,
        };

        Ok(Self {
            server_url,
            output_path: get("OPTIONS_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            request_timeout,
            log_dir: get("LAZYOPTIONS_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_log_dir),
        })
    }
}

/// Répertoire des logs par défaut
///
/// - Linux/WSL : ~/.local/share/lazyoptions/logs
/// - macOS : ~/Library/Application Support/lazyoptions/logs
/// - Windows : C:\Users\<user>\AppData\Local\lazyoptions\logs
/// - Sinon : ./logs
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("lazyoptions").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.output_path, PathBuf::from("results.html"));
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.log_dir, default_log_dir());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("OPTIONS_SERVER_URL", "https://options.example.com"),
            ("OPTIONS_OUTPUT", "/tmp/out.html"),
            ("OPTIONS_TIMEOUT_SECS", "30"),
            ("LAZYOPTIONS_LOG_DIR", "/var/log/lazyoptions"),
        ])
        .unwrap();

        assert_eq!(config.server_url, "https://options.example.com");
        assert_eq!(config.output_path, PathBuf::from("/tmp/out.html"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/lazyoptions"));
    }

    #[test]
    fn test_empty_value_means_default() {
        let config = config(&[("OPTIONS_SERVER_URL", "  ")]).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config(&[("OPTIONS_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            config(&[("OPTIONS_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            config(&[("OPTIONS_SERVER_URL", "localhost:5000")]),
            Err(ConfigError::InvalidServerUrl { .. })
        ));
    }
}
