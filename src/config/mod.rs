//! Конфигурация на крейте `config`: значения по умолчанию, необязательный
//! файл и переменные окружения с префиксом `NBTCODEC`.

pub mod settings;

pub use settings::{CodecSettings, ENV_PREFIX};
