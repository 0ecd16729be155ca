//! Логирование на `tracing`: фильтр из конфигурации или `RUST_LOG`,
//! один слой форматирования в stderr.

pub mod config;
mod filters;
mod formatter;

pub use config::{LogFormat, LoggingConfig};
use nbtcodec_error::{CodecResult, GenericError, StackError, StatusCode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Инициализация глобального subscriber'а.
///
/// Повторный вызов возвращает ошибку, а не паникует.
pub fn init_logging(config: &LoggingConfig) -> CodecResult<()> {
    config.validate()?;

    let env_filter = filters::build_filter_from_config(config);
    let fmt_layer = formatter::build_formatter_from_config(config);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| StackError::new(GenericError::new(StatusCode::Internal, e.to_string())))?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.level,
        format = ?config.format,
        "logging initialized"
    );
    Ok(())
}
