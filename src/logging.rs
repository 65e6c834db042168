use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

const LOG_FILE: &str = "grammar-tutor.log";

/// Sends tracing output to a daily log file under `config.log_dir`; the
/// terminal belongs to the UI. Keep the guard alive until exit so buffered
/// lines are flushed.
///
/// An unusable log directory is reported on stderr and logging is discarded
/// rather than stopping the tutor.
pub fn init(config: &Config) -> WorkerGuard {
    let (non_blocking, guard) = match open_log_file(&config.log_dir) {
        Ok(appender) => tracing_appender::non_blocking(appender),
        Err(e) => {
            eprintln!(
                "cannot write logs to {}: {}; continuing without a log file",
                config.log_dir.display(),
                e
            );
            tracing_appender::non_blocking(io::sink())
        }
    };
    let env_filter = EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
    {
        eprintln!("logging already initialised: {}", e);
    }

    guard
}

/// Creates `dir` if needed and opens the daily rolling log file inside it.
pub fn open_log_file(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE)
        .build(dir)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config_with_log_dir(log_dir: PathBuf) -> Config {
        Config {
            api_key: None,
            model: "gemini-test".to_string(),
            api_base: "http://localhost".to_string(),
            learner_language: "Chinese".to_string(),
            log_dir,
            rust_log: "debug".to_string(),
        }
    }

    #[test]
    fn test_unusable_log_dir_is_an_error() {
        assert!(open_log_file(Path::new("/proc/self/no-such-dir/logs")).is_err());
    }

    #[test]
    fn test_log_dir_is_created() {
        let dir = std::env::temp_dir().join(format!("grammar-tutor-{}", uuid::Uuid::new_v4().simple()));
        assert!(open_log_file(&dir).is_ok());
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_init_survives_unusable_log_dir() {
        let config = config_with_log_dir(PathBuf::from("/proc/self/no-such-dir/logs"));
        let _guard = init(&config);
        tracing::info!("discarded");
    }
}
