//! Модуль для десериализации дерева [`Tag`] из бинарного формата NBT.
//!
//! Рекурсивный спуск: вызывающий знает тип значения (из байта типа записи
//! Compound или из объявленного типа элементов List) и передаёт курсор,
//! стоящий на начале полезной нагрузки.

use byteorder::{BigEndian, ByteOrder};
use nbtcodec_error::{NbtError, NbtResult};
use tracing::warn;

use super::{
    cursor::ByteReader,
    tags::{TagType, COUNT_WIDTH, STRING_LENGTH_WIDTH},
};
use crate::{Compound, List, Tag};

/// Максимальная вложенность List/Compound по умолчанию.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Жёсткий потолок вложенности: больший `max_depth` урезается до него,
/// чтобы рекурсия не исчерпала стек потока.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Рекурсивный декодер с ограничением глубины.
///
/// Корневой Compound находится на глубине 0, его прямые потомки
/// на глубине 1. Контейнер глубже `max_depth` даёт `DepthExceeded`.
/// `max_depth` не превышает [`MAX_DEPTH_LIMIT`].
#[derive(Debug, Clone, Copy)]
pub struct TagDecoder {
    max_depth: usize,
}

impl Default for TagDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl TagDecoder {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.min(MAX_DEPTH_LIMIT),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Декодирует одно значение типа `tag_type` с текущей позиции курсора.
    pub fn decode_tag(
        &self,
        tag_type: TagType,
        reader: &mut ByteReader<'_>,
    ) -> NbtResult<Tag> {
        self.decode_value(tag_type, reader, 0)
    }

    /// Декодирует тело Compound (записи до байта End).
    pub fn decode_compound(
        &self,
        reader: &mut ByteReader<'_>,
    ) -> NbtResult<Compound> {
        self.read_compound_body(reader, 0)
    }

    fn decode_value(
        &self,
        tag_type: TagType,
        reader: &mut ByteReader<'_>,
        depth: usize,
    ) -> NbtResult<Tag> {
        if tag_type.is_container() && depth > self.max_depth {
            return Err(NbtError::DepthExceeded {
                depth,
                max: self.max_depth,
            });
        }

        match tag_type {
            TagType::End => Err(NbtError::UnexpectedEndTag {
                offset: reader.position(),
            }),
            TagType::Byte => Ok(Tag::Byte(reader.read_i8()?)),
            TagType::Short => Ok(Tag::Short(reader.read_i16()?)),
            TagType::Int => Ok(Tag::Int(reader.read_i32()?)),
            TagType::Long => Ok(Tag::Long(reader.read_i64()?)),
            TagType::Float => Ok(Tag::Float(reader.read_f32()?)),
            TagType::Double => Ok(Tag::Double(reader.read_f64()?)),
            TagType::ByteArray => {
                let raw = read_array_bytes(reader, tag_type)?;
                Ok(Tag::ByteArray(raw.to_vec()))
            }
            TagType::ShortArray => {
                let raw = read_array_bytes(reader, tag_type)?;
                Ok(Tag::ShortArray(
                    raw.chunks_exact(2).map(BigEndian::read_u16).collect(),
                ))
            }
            TagType::IntArray => {
                let raw = read_array_bytes(reader, tag_type)?;
                Ok(Tag::IntArray(
                    raw.chunks_exact(4).map(BigEndian::read_u32).collect(),
                ))
            }
            TagType::String => Ok(Tag::String(read_string(reader)?)),
            TagType::List => self.read_list(reader, depth).map(Tag::List),
            TagType::Compound => self.read_compound_body(reader, depth).map(Tag::Compound),
        }
    }

    fn read_list(
        &self,
        reader: &mut ByteReader<'_>,
        depth: usize,
    ) -> NbtResult<List> {
        let type_offset = reader.position();
        let element_type = TagType::from_id(reader.read_u8()?, type_offset)?;
        let count = reader.read_u32()? as usize;

        if element_type == TagType::End && count > 0 {
            return Err(NbtError::UnexpectedEndTag {
                offset: type_offset,
            });
        }

        // Каждый элемент занимает минимум один байт, так что враждебный
        // счётчик не приводит к огромной аллокации до ошибки TruncatedInput.
        let mut elements = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            elements.push(self.decode_value(element_type, reader, depth + 1)?);
        }
        Ok(List::from_parts_unchecked(element_type, elements))
    }

    fn read_compound_body(
        &self,
        reader: &mut ByteReader<'_>,
        depth: usize,
    ) -> NbtResult<Compound> {
        let mut map = Compound::new();
        loop {
            let type_offset = reader.position();
            // Конец буфера до байта End: TruncatedInput из read_u8.
            let id = reader.read_u8()?;
            let tag_type = TagType::from_id(id, type_offset)?;
            if tag_type == TagType::End {
                return Ok(map);
            }

            let key = read_string(reader)?;
            let value = self.decode_value(tag_type, reader, depth + 1)?;
            // Формат не запрещает дубликаты; побеждает последнее значение.
            if map.insert(key, value).is_some() {
                warn!(offset = type_offset, "duplicate compound key, keeping the later value");
            }
        }
    }
}

/// Декодирует значение с лимитом глубины по умолчанию.
pub fn decode_tag(
    tag_type: TagType,
    reader: &mut ByteReader<'_>,
) -> NbtResult<Tag> {
    TagDecoder::default().decode_tag(tag_type, reader)
}

/// Строка: длина u16 BE, затем UTF-8.
pub fn read_string(reader: &mut ByteReader<'_>) -> NbtResult<String> {
    let offset = reader.position();
    let bytes = reader.read_length_prefixed(STRING_LENGTH_WIDTH)?;
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| NbtError::InvalidEncoding {
            offset,
            reason: e.to_string(),
        })
}

/// Счётчик u32 BE, затем `count × width` сырых байт.
fn read_array_bytes<'a>(
    reader: &mut ByteReader<'a>,
    tag_type: TagType,
) -> NbtResult<&'a [u8]> {
    let width = tag_type.element_width().ok_or(NbtError::UnknownTag {
        tag: tag_type.id(),
        offset: reader.position(),
    })?;
    let count = reader.read_be_uint(COUNT_WIDTH)? as usize;
    let needed = count.checked_mul(width).ok_or(NbtError::TruncatedInput {
        offset: reader.position(),
        needed: usize::MAX,
        available: reader.remaining(),
    })?;
    reader.read_fixed(needed)
}
