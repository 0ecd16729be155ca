use std::fmt;

#[cfg(feature = "serde")]
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Коды статуса для категоризации ошибок.
///
/// # Диапазоны:
/// - 0xxx: Успех
/// - 1xxx: Общие ошибки
/// - 2xxx: Ошибки входных данных и конфигурации
/// - 5xxx: Сжатие / ввод-вывод
/// - 8xxx: Ошибки формата NBT
#[cfg_attr(feature = "serde", derive(Serialize_repr, Deserialize_repr))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Успех ===
    Success = 0,

    // === 1xxx: Общие ошибки ===
    Unknown = 1000,
    Unsupported = 1001,
    Unexpected = 1002,
    Internal = 1003,
    InvalidArgs = 1004,

    // === 2xxx: Входные данные ===
    NotFound = 2000,
    InvalidData = 2001,
    InvalidConfig = 2002,

    // === 5xxx: Сжатие/IO ===
    Io = 5000,
    CompressionFailed = 5001,
    DecompressionFailed = 5002,

    // === 8xxx: Формат ===
    EmptyInput = 8000,
    MissingRootCompound = 8001,
    UnexpectedEof = 8002,
    UnknownTag = 8003,
    UnexpectedEndTag = 8004,
    InvalidUtf8 = 8005,
    EncodingError = 8006,
    DepthLimit = 8007,
    ParseError = 8008,
}

/// Уровень, с которым CLI пишет ошибку в журнал.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Ошибка разбора или кодирования NBT (диапазон 8xxx).
    pub fn is_format_error(&self) -> bool {
        (8000..=8999).contains(&self.code())
    }

    /// Требуется ли логировать как критическую ошибку.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Internal | Self::Unexpected)
    }

    /// Рекомендуемый уровень логирования для данного кода.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::NotFound => LogLevel::Debug,
            Self::InvalidArgs
            | Self::InvalidData
            | Self::EmptyInput
            | Self::MissingRootCompound
            | Self::UnexpectedEof
            | Self::UnknownTag
            | Self::UnexpectedEndTag
            | Self::InvalidUtf8 => LogLevel::Info,
            Self::Internal | Self::Unexpected => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }

    /// Код завершения процесса для CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InvalidArgs | Self::InvalidConfig => 2,
            c if c.is_format_error() => 3,
            Self::Io | Self::NotFound | Self::CompressionFailed | Self::DecompressionFailed => 4,
            _ => 1,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
