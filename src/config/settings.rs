use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use nbtcodec_error::{ensure, CodecResult, GenericError, StackError, StatusCode};

use crate::{
    codec::{
        CompressionPolicy, DecodeOptions, EncodeOptions, DEFAULT_GZIP_LEVEL, DEFAULT_MAX_DEPTH,
        MAX_DEPTH_LIMIT, MAX_GZIP_LEVEL,
    },
    logging::LoggingConfig,
};

/// Префикс переменных окружения: `NBTCODEC_MAX_DEPTH`,
/// `NBTCODEC_LOGGING__LEVEL` и т.д.
pub const ENV_PREFIX: &str = "NBTCODEC";

/// Настройки кодека и CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    /// Предел вложенности List/Compound.
    pub max_depth: usize,
    /// Обработка gzip-обёртки при чтении.
    pub compression: CompressionPolicy,
    /// Уровень gzip при записи, 0..=9.
    pub gzip_level: u32,
    pub logging: LoggingConfig,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            compression: CompressionPolicy::Auto,
            gzip_level: DEFAULT_GZIP_LEVEL,
            logging: LoggingConfig::default(),
        }
    }
}

impl CodecSettings {
    /// Собирает настройки: значения по умолчанию, затем файл (если
    /// указан), затем переменные окружения.
    pub fn load(path: Option<&Path>) -> CodecResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let cfg = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?;

        let settings: Self = cfg.try_deserialize().map_err(config_error)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> CodecResult<()> {
        ensure!(
            self.max_depth > 0,
            StatusCode::InvalidConfig,
            "max_depth must be positive"
        );
        ensure!(
            self.max_depth <= MAX_DEPTH_LIMIT,
            StatusCode::InvalidConfig,
            "max_depth {} exceeds the hard limit {}",
            self.max_depth,
            MAX_DEPTH_LIMIT
        );
        ensure!(
            self.gzip_level <= MAX_GZIP_LEVEL,
            StatusCode::InvalidConfig,
            "gzip_level {} is out of range 0..={}",
            self.gzip_level,
            MAX_GZIP_LEVEL
        );
        self.logging.validate()
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            max_depth: self.max_depth,
            compression: self.compression,
        }
    }

    /// Параметры записи; `gzip = false` отключает сжатие.
    pub fn encode_options(
        &self,
        gzip: bool,
    ) -> EncodeOptions {
        EncodeOptions {
            max_depth: self.max_depth,
            gzip: gzip.then_some(self.gzip_level),
        }
    }
}

fn config_error(e: ConfigError) -> StackError {
    StackError::new(GenericError::new(StatusCode::InvalidConfig, e.to_string()))
}
