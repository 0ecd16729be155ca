use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибка разбора или кодирования NBT-документа.
///
/// Все операции кодека атомарны: при любой ошибке частичное дерево не
/// возвращается. Смещения (`offset`) отсчитываются от начала буфера,
/// переданного декодеру (после распаковки).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NbtError {
    /// Пустой входной буфер.
    #[error("input is empty")]
    EmptyInput,

    /// Первый байт документа не равен тегу Compound (0x0A).
    #[error("missing root compound: first byte is 0x{found:02X}, expected 0x0A")]
    MissingRootCompound { found: u8 },

    /// Чтение за концом буфера или Compound без завершающего End.
    #[error("truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Идентификатор типа вне диапазона 0..=12.
    #[error("unknown tag 0x{tag:02X} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    /// Тег End (0) встретился там, где ожидалось значение.
    #[error("unexpected End tag at offset {offset}")]
    UnexpectedEndTag { offset: usize },

    /// Строка не является корректным UTF-8.
    #[error("invalid UTF-8 string at offset {offset}: {reason}")]
    InvalidEncoding { offset: usize, reason: String },

    /// Значение нельзя представить в формате.
    #[error("value cannot be encoded: {reason}")]
    UnencodableValue { reason: String },

    /// Превышена допустимая глубина вложенности List/Compound.
    #[error("nesting depth {depth} exceeds limit {max}")]
    DepthExceeded { depth: usize, max: usize },

    /// Ошибка внешнего слоя сжатия (gzip).
    #[error("{operation} failed: {reason}")]
    Compression {
        operation: CompressionOp,
        reason: String,
    },

    /// Ошибка преобразования в JSON или из JSON.
    #[error("JSON conversion failed: {reason}")]
    Json { reason: String },
}

/// Тип операции сжатия для контекста ошибки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionOp {
    Compress,
    Decompress,
}

impl NbtError {
    /// Конструктор для `UnencodableValue`.
    pub fn unencodable(reason: impl Into<String>) -> Self {
        Self::UnencodableValue {
            reason: reason.into(),
        }
    }

    /// Конструктор для ошибок слоя сжатия.
    pub fn compression(
        operation: CompressionOp,
        reason: impl ToString,
    ) -> Self {
        Self::Compression {
            operation,
            reason: reason.to_string(),
        }
    }

    /// Смещение в буфере, на котором произошла ошибка (если известно).
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::TruncatedInput { offset, .. }
            | Self::UnknownTag { offset, .. }
            | Self::UnexpectedEndTag { offset }
            | Self::InvalidEncoding { offset, .. } => Some(*offset),
            Self::MissingRootCompound { .. } => Some(0),
            _ => None,
        }
    }

    /// Возвращает подсказку для пользователя.
    pub fn recovery_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingRootCompound { found: 0x1F } => {
                Some("Input looks gzip-compressed; decompress it first")
            }
            Self::MissingRootCompound { .. } => Some("Input is not an NBT document"),
            Self::TruncatedInput { .. } => Some("File may be truncated. Check file integrity"),
            Self::DepthExceeded { .. } => Some("Increase max_depth if the input is trusted"),
            Self::Compression {
                operation: CompressionOp::Decompress,
                ..
            } => Some("gzip stream is corrupted or not gzip at all"),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompressionOp {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Compress => write!(f, "Compression"),
            Self::Decompress => write!(f, "Decompression"),
        }
    }
}

impl ErrorExt for NbtError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyInput => StatusCode::EmptyInput,
            Self::MissingRootCompound { .. } => StatusCode::MissingRootCompound,
            Self::TruncatedInput { .. } => StatusCode::UnexpectedEof,
            Self::UnknownTag { .. } => StatusCode::UnknownTag,
            Self::UnexpectedEndTag { .. } => StatusCode::UnexpectedEndTag,
            Self::InvalidEncoding { .. } => StatusCode::InvalidUtf8,
            Self::UnencodableValue { .. } => StatusCode::EncodingError,
            Self::DepthExceeded { .. } => StatusCode::DepthLimit,
            Self::Compression {
                operation: CompressionOp::Compress,
                ..
            } => StatusCode::CompressionFailed,
            Self::Compression {
                operation: CompressionOp::Decompress,
                ..
            } => StatusCode::DecompressionFailed,
            Self::Json { .. } => StatusCode::ParseError,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn log_message(&self) -> String {
        let mut msg = format!("{self:?}");
        if let Some(hint) = self.recovery_hint() {
            msg.push_str(&format!(" | Hint: {hint}"));
        }
        msg
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", self.type_name()),
            ("status_code", self.status_code().to_string()),
        ];

        match self {
            Self::UnknownTag { tag, .. } => {
                tags.push(("invalid_tag", format!("0x{tag:02X}")));
            }
            Self::Compression { operation, .. } => {
                tags.push(("compression_op", format!("{operation:?}")));
            }
            _ => {}
        }
        if let Some(offset) = self.offset() {
            tags.push(("offset", offset.to_string()));
        }

        tags
    }
}

impl From<NbtError> for std::io::Error {
    fn from(e: NbtError) -> Self {
        let kind = match &e {
            NbtError::TruncatedInput { .. } => std::io::ErrorKind::UnexpectedEof,
            NbtError::UnencodableValue { .. } => std::io::ErrorKind::InvalidInput,
            NbtError::Compression { .. } => std::io::ErrorKind::Other,
            _ => std::io::ErrorKind::InvalidData,
        };

        std::io::Error::new(kind, e.to_string())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
