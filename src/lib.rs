//! Кодек Named Binary Tag (NBT).
//!
//! Декодирует бинарный документ NBT в упорядоченное дерево [`Compound`] и
//! кодирует дерево обратно в байты, которые декодируются в равное дерево.
//! Вокруг ядра: gzip-обёртка и типизированное JSON-представление.

/// Бинарный кодек: реестр типов, курсор, декодер, энкодер, документ,
/// gzip и JSON.
pub mod codec;
/// Загрузка настроек (умолчания, файл, окружение `NBTCODEC_*`).
pub mod config;
/// Настройка подписчика `tracing`.
pub mod logging;
/// Дерево в памяти: [`Tag`], [`List`], [`Compound`].
pub mod tag;

pub use codec::{
    decode_document, decode_document_with, decode_tag, encode_document, encode_document_with,
    encode_tag, from_json_str, from_json_str_with, read_document, to_json_string, write_document,
    ByteReader, ByteWriter, CompressionPolicy, DecodeOptions, EncodeOptions, TagDecoder,
    TagEncoder, TagType, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT,
};
pub use config::CodecSettings;
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use nbtcodec_error::{
    CodecResult, CompressionOp, ErrorExt, LogLevel, NbtError, NbtResult, ResultExt, StackError,
    StatusCode,
};
pub use tag::{Compound, List, Tag};
