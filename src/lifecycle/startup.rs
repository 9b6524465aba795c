//! Startup orchestration.
//!
//! # Responsibilities
//! - Read configuration
//! - Install logging from it before anything else logs
//! - Validate configuration once a subscriber can see the warnings
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Logging is installed from unvalidated settings; a bad level string
//!   falls back inside `EnvFilter` rather than blocking startup

use std::error::Error as StdError;
use std::path::Path;

use thiserror::Error;

use crate::config::validation::validate_config;
use crate::config::{read_config, ConfigError, GatewayConfig};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("logging setup failed: {0}")]
    Logging(Box<dyn StdError + Send + Sync>),
}

/// Read the config at `path` (defaults when `None`), hand it to
/// `install_logging`, then validate it.
pub fn configure<F, E>(path: Option<&Path>, install_logging: F) -> Result<GatewayConfig, StartupError>
where
    F: FnOnce(&GatewayConfig) -> Result<(), E>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    let config = match path {
        Some(path) => read_config(path)?,
        None => GatewayConfig::default(),
    };

    install_logging(&config).map_err(|e| StartupError::Logging(e.into()))?;

    validate_config(&config).map_err(ConfigError::Validation)?;
    tracing::info!(
        path = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "<defaults>".into()),
        routes = config.routes.len(),
        destinations = config.destinations.len(),
        "Configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn write_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("legacy-gateway-{name}-{}.toml", std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_warnings_reach_the_installed_subscriber() {
        let path = write_config(
            "warnings",
            r#"
            [destinations.crs]
            type = "tcp"
            ip = "127.0.0.1"
            ports = { spending_history = [] }

            [destinations.queue]
            type = "mq"
            ip = "127.0.0.1"
            "#,
        );

        let captured = Captured::default();
        let mut guard = None;
        let result = configure(Some(&path), |config| {
            assert_eq!(config.destinations.len(), 2);
            let writer = captured.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_ansi(false)
                .finish();
            guard = Some(tracing::subscriber::set_default(subscriber));
            Ok::<_, io::Error>(())
        });
        fs::remove_file(&path).unwrap();
        drop(guard);

        assert!(result.is_ok());
        let logs = captured.text();
        assert!(logs.contains("Empty port list"), "{logs}");
        assert!(logs.contains("Destination is not tcp"), "{logs}");
        assert!(logs.contains("Configuration loaded"), "{logs}");
    }

    #[test]
    fn invalid_config_fails_after_logging_is_installed() {
        let path = write_config("invalid", "[timeouts]\nread_write_ms = 0\n");

        let mut installed = false;
        let result = configure(Some(&path), |_| {
            installed = true;
            Ok::<_, io::Error>(())
        });
        fs::remove_file(&path).unwrap();

        assert!(installed);
        assert!(matches!(
            result,
            Err(StartupError::Config(ConfigError::Validation(_)))
        ));
    }

    #[test]
    fn logging_failure_stops_startup() {
        let err = configure(None, |_| Err(io::Error::other("already installed"))).unwrap_err();
        assert!(matches!(err, StartupError::Logging(_)));
        assert_eq!(err.to_string(), "logging setup failed: already installed");
    }
}
