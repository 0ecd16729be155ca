//! Адаптер уровня документа: корневая обёртка `0A 00 00` вокруг тела
//! Compound и удобные точки входа с gzip.

use nbtcodec_error::{NbtError, NbtResult};
use tracing::{debug, trace};

use super::{
    compression::{gzip_compress, maybe_decompress, CompressionPolicy},
    cursor::{ByteReader, ByteWriter},
    decode::{TagDecoder, DEFAULT_MAX_DEPTH},
    encode::TagEncoder,
    tags::{TagType, STRING_LENGTH_WIDTH},
};
use crate::Compound;

/// Параметры чтения документа.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub max_depth: usize,
    pub compression: CompressionPolicy,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            compression: CompressionPolicy::Auto,
        }
    }
}

/// Параметры записи документа. `gzip: None`: без сжатия.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub max_depth: usize,
    pub gzip: Option<u32>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            gzip: None,
        }
    }
}

/// Декодирует несжатый документ с лимитом глубины по умолчанию.
pub fn decode_document(bytes: &[u8]) -> NbtResult<Compound> {
    decode_document_with(bytes, &TagDecoder::default())
}

/// Декодирует несжатый документ заданным декодером.
///
/// Имя корня читается и отбрасывается без проверки UTF-8. Байты после
/// терминатора корня игнорируются.
pub fn decode_document_with(
    bytes: &[u8],
    decoder: &TagDecoder,
) -> NbtResult<Compound> {
    if bytes.is_empty() {
        return Err(NbtError::EmptyInput);
    }
    let mut reader = ByteReader::new(bytes);
    let found = reader.read_u8()?;
    if found != TagType::Compound.id() {
        return Err(NbtError::MissingRootCompound { found });
    }

    let name = reader.read_length_prefixed(STRING_LENGTH_WIDTH)?;
    trace!(root_name_len = name.len(), "skipping root name");

    let root = decoder.decode_compound(&mut reader)?;
    if !reader.is_empty() {
        debug!(
            trailing = reader.remaining(),
            "ignoring bytes after root compound"
        );
    }
    Ok(root)
}

/// Кодирует документ с лимитом глубины по умолчанию.
pub fn encode_document(root: &Compound) -> NbtResult<Vec<u8>> {
    encode_document_with(root, &TagEncoder::default())
}

/// Кодирует документ: `0A 00 00`, тело корня, ничего после терминатора.
pub fn encode_document_with(
    root: &Compound,
    encoder: &TagEncoder,
) -> NbtResult<Vec<u8>> {
    let mut writer = ByteWriter::with_capacity(64);
    writer.write_u8(TagType::Compound.id());
    writer.write_length_prefixed(&[], STRING_LENGTH_WIDTH)?;
    encoder.encode_compound(root, &mut writer)?;
    Ok(writer.into_vec())
}

/// Применяет политику сжатия и декодирует документ.
pub fn read_document(
    bytes: &[u8],
    options: &DecodeOptions,
) -> NbtResult<Compound> {
    let raw = maybe_decompress(bytes, options.compression)?;
    debug!(
        input = bytes.len(),
        decoded = raw.len(),
        policy = ?options.compression,
        "reading document"
    );
    decode_document_with(&raw, &TagDecoder::new(options.max_depth))
}

/// Кодирует документ и при необходимости сжимает его.
pub fn write_document(
    root: &Compound,
    options: &EncodeOptions,
) -> NbtResult<Vec<u8>> {
    let encoded = encode_document_with(root, &TagEncoder::new(options.max_depth))?;
    match options.gzip {
        Some(level) => {
            let compressed = gzip_compress(&encoded, level)?;
            debug!(
                raw = encoded.len(),
                compressed = compressed.len(),
                level,
                "wrote gzip document"
            );
            Ok(compressed)
        }
        None => Ok(encoded),
    }
}
