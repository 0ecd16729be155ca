//! Бинарный кодек NBT.
//!
//! ## Формат
//!
//! Документ состоит из: байт типа Compound (`0x0A`), имя корня (строка с
//! префиксом длины u16) и тело корня: записи `тип, ключ, значение`,
//! завершённые байтом `0x00`. Все числа big-endian.
//!
//! ```no_run
//! use nbtcodec::codec::{read_document, write_document, DecodeOptions, EncodeOptions};
//!
//! let bytes = std::fs::read("level.dat")?;
//! let root = read_document(&bytes, &DecodeOptions::default())?;
//! let out = write_document(&root, &EncodeOptions { gzip: Some(6), ..Default::default() })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Модули
//!
//! - [`tags`]: реестр типов и их идентификаторов
//! - [`cursor`]: чтение/запись примитивов поверх буфера
//! - [`decode`]: десериализация из бинарного формата
//! - [`encode`]: сериализация в бинарный формат
//! - [`document`]: корневая обёртка и точки входа
//! - [`compression`]: gzip-обёртка
//! - [`json`]: типизированное JSON-представление

pub mod compression;
pub mod cursor;
pub mod decode;
pub mod document;
pub mod encode;
pub mod json;
pub mod tags;

pub use compression::*;
pub use cursor::*;
pub use decode::*;
pub use document::*;
pub use encode::*;
pub use json::*;
pub use tags::*;
