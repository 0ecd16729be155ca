use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use nbtcodec_error::{ensure, CodecResult, StatusCode};

/// Формат вывода логов.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Настройки логирования. Логи всегда идут в stderr, чтобы не смешиваться
/// с данными в stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Директива фильтра: уровень (`warn`) или полная строка EnvFilter.
    pub level: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            with_ansi: true,
            with_target: false,
        }
    }
}

impl LoggingConfig {
    /// Директива для [`EnvFilter`].
    pub fn build_filter_directive(&self) -> String {
        self.level.trim().to_string()
    }

    pub fn validate(&self) -> CodecResult<()> {
        let directive = self.build_filter_directive();
        ensure!(
            !directive.is_empty(),
            StatusCode::InvalidConfig,
            "logging.level must not be empty"
        );
        ensure!(
            EnvFilter::try_new(&directive).is_ok(),
            StatusCode::InvalidConfig,
            "invalid logging.level directive '{}'",
            directive
        );
        Ok(())
    }
}
