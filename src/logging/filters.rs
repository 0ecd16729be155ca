use tracing_subscriber::EnvFilter;

use crate::logging::config::LoggingConfig;

/// Фильтр событий: `RUST_LOG`, если задана, иначе директива из конфига.
pub fn build_filter_from_config(config: &LoggingConfig) -> EnvFilter {
    let directive = config.build_filter_directive();

    match EnvFilter::try_from_default_env() {
        Ok(env_filter) => env_filter,
        Err(_) => match EnvFilter::try_new(&directive) {
            Ok(filter) => filter,
            Err(e) => {
                // Логгер ещё не поднят, поэтому сообщаем напрямую.
                eprintln!("invalid log filter directive '{directive}': {e}; falling back to 'warn'");
                EnvFilter::new("warn")
            }
        },
    }
}
