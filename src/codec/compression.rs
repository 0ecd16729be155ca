//! Модуль для сжатия и распаковки NBT-документов с помощью gzip.
//!
//! Документы на диске обычно лежат в gzip-обёртке. Здесь определяются
//! политика распознавания обёртки и функции компрессии/декомпрессии.

use std::{
    borrow::Cow,
    io::{Read, Write},
};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use nbtcodec_error::{CompressionOp, NbtError, NbtResult};
use serde::{Deserialize, Serialize};

/// Первые два байта любого gzip-потока.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Уровень сжатия по умолчанию: баланс между скоростью и размером.
pub const DEFAULT_GZIP_LEVEL: u32 = 6;

/// Максимальный уровень, который принимает gzip.
pub const MAX_GZIP_LEVEL: u32 = 9;

/// Как обращаться с gzip-обёрткой при чтении.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionPolicy {
    /// Распаковать, если вход начинается с [`GZIP_MAGIC`].
    #[default]
    Auto,
    /// Вход обязан быть gzip.
    Gzip,
    /// Вход читается как есть.
    None,
}

/// Проверяет наличие сигнатуры gzip в начале буфера.
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Сжимает буфер целиком. Уровень выше 9 приводится к 9.
pub fn gzip_compress(
    data: &[u8],
    level: u32,
) -> NbtResult<Vec<u8>> {
    let level = Compression::new(level.min(MAX_GZIP_LEVEL));
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2 + 32), level);
    encoder
        .write_all(data)
        .map_err(|e| NbtError::compression(CompressionOp::Compress, e))?;
    encoder
        .finish()
        .map_err(|e| NbtError::compression(CompressionOp::Compress, e))
}

/// Распаковывает gzip-поток целиком.
pub fn gzip_decompress(data: &[u8]) -> NbtResult<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len().saturating_mul(4));
    GzDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| NbtError::compression(CompressionOp::Decompress, e))?;
    Ok(out)
}

/// Применяет политику к входу. Без распаковки буфер не копируется.
///
/// Ошибка распаковки не откатывается к чтению сырых байт.
pub fn maybe_decompress(
    data: &[u8],
    policy: CompressionPolicy,
) -> NbtResult<Cow<'_, [u8]>> {
    match policy {
        CompressionPolicy::None => Ok(Cow::Borrowed(data)),
        CompressionPolicy::Auto if !is_gzip(data) => Ok(Cow::Borrowed(data)),
        CompressionPolicy::Auto | CompressionPolicy::Gzip => {
            gzip_decompress(data).map(Cow::Owned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет, что сжатие и последующая декомпрессия возвращают
    /// исходные данные, а результат помечен сигнатурой gzip.
    #[test]
    fn test_compress_decompress_roundtrip() {
        let data: Vec<u8> = (0..512).map(|i| (i % 7) as u8).collect();
        let compressed = gzip_compress(&data, DEFAULT_GZIP_LEVEL).unwrap();
        assert!(is_gzip(&compressed));
        assert_eq!(gzip_decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_level_is_clamped() {
        let compressed = gzip_compress(b"abc", 42).unwrap();
        assert_eq!(gzip_decompress(&compressed).unwrap(), b"abc");
    }

    #[test]
    fn test_is_gzip() {
        assert!(is_gzip(&[0x1F, 0x8B, 0x08]));
        assert!(!is_gzip(&[0x0A, 0x00, 0x00]));
        assert!(!is_gzip(&[0x1F]));
        assert!(!is_gzip(&[]));
    }

    /// Тест проверяет, что Auto не трогает несжатый вход.
    #[test]
    fn test_auto_passes_plain_input() {
        let plain = [0x0A, 0x00, 0x00, 0x00];
        let out = maybe_decompress(&plain, CompressionPolicy::Auto).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(&*out, &plain);
    }

    #[test]
    fn test_auto_unwraps_gzip() {
        let compressed = gzip_compress(b"payload", 1).unwrap();
        let out = maybe_decompress(&compressed, CompressionPolicy::Auto).unwrap();
        assert_eq!(&*out, b"payload");
    }

    #[test]
    fn test_none_keeps_gzip_bytes() {
        let compressed = gzip_compress(b"payload", 1).unwrap();
        let out = maybe_decompress(&compressed, CompressionPolicy::None).unwrap();
        assert_eq!(&*out, compressed.as_slice());
    }

    #[test]
    fn test_forced_gzip_on_plain_input_fails() {
        let err = maybe_decompress(&[0x0A, 0x00, 0x00, 0x00], CompressionPolicy::Gzip).unwrap_err();
        assert!(matches!(
            err,
            NbtError::Compression {
                operation: CompressionOp::Decompress,
                ..
            }
        ));
    }

    /// Повреждённый поток с верной сигнатурой даёт ошибку, а не сырые байты.
    #[test]
    fn test_corrupt_gzip_is_error() {
        let mut compressed = gzip_compress(b"some longer payload here", 6).unwrap();
        let len = compressed.len();
        compressed.truncate(len - 6);
        assert!(maybe_decompress(&compressed, CompressionPolicy::Auto).is_err());
    }

    #[test]
    fn test_policy_serde_lowercase() {
        let json = serde_json::to_string(&CompressionPolicy::Gzip).unwrap();
        assert_eq!(json, "\"gzip\"");
        let p: CompressionPolicy = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(p, CompressionPolicy::None);
    }
}
