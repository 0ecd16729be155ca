//! Модуль сериализации дерева [`Tag`] в бинарный формат NBT.
//!
//! Тип на проводе выводится из варианта значения через реестр
//! [`TagType`]. Элементы List не помечаются типом по отдельности:
//! объявленный тип элементов пишется один раз.

use nbtcodec_error::{NbtError, NbtResult};

use super::{
    cursor::ByteWriter,
    decode::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT},
    tags::{tag_type_for, TagType, COUNT_WIDTH, STRING_LENGTH_WIDTH},
};
use crate::{Compound, List, Tag};

/// Рекурсивный энкодер с тем же ограничением глубины, что и декодер.
#[derive(Debug, Clone, Copy)]
pub struct TagEncoder {
    max_depth: usize,
}

impl Default for TagEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl TagEncoder {
    /// `max_depth` урезается до [`MAX_DEPTH_LIMIT`].
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.min(MAX_DEPTH_LIMIT),
        }
    }

    /// Записывает полезную нагрузку значения (без байта типа).
    pub fn encode_tag(
        &self,
        tag: &Tag,
        writer: &mut ByteWriter,
    ) -> NbtResult<()> {
        self.encode_value(tag, writer, 0)
    }

    /// Записывает тело Compound, включая завершающий End.
    pub fn encode_compound(
        &self,
        compound: &Compound,
        writer: &mut ByteWriter,
    ) -> NbtResult<()> {
        self.write_compound_body(compound, writer, 0)
    }

    fn encode_value(
        &self,
        tag: &Tag,
        writer: &mut ByteWriter,
        depth: usize,
    ) -> NbtResult<()> {
        let tag_type = tag_type_for(tag)?;
        if tag_type.is_container() && depth > self.max_depth {
            return Err(NbtError::DepthExceeded {
                depth,
                max: self.max_depth,
            });
        }

        match tag {
            Tag::Byte(v) => writer.write_i8(*v),
            Tag::Short(v) => writer.write_i16(*v),
            Tag::Int(v) => writer.write_i32(*v),
            Tag::Long(v) => writer.write_i64(*v),
            Tag::Float(v) => writer.write_f32(*v),
            Tag::Double(v) => writer.write_f64(*v),
            Tag::ByteArray(values) => {
                write_count(writer, values.len(), TagType::ByteArray)?;
                writer.write_fixed(values);
            }
            Tag::ShortArray(values) => {
                write_count(writer, values.len(), TagType::ShortArray)?;
                for v in values {
                    writer.write_u16(*v);
                }
            }
            Tag::IntArray(values) => {
                write_count(writer, values.len(), TagType::IntArray)?;
                for v in values {
                    writer.write_u32(*v);
                }
            }
            Tag::String(s) => write_string(writer, s)?,
            Tag::List(list) => self.write_list(list, writer, depth)?,
            Tag::Compound(compound) => self.write_compound_body(compound, writer, depth)?,
        }
        Ok(())
    }

    fn write_list(
        &self,
        list: &List,
        writer: &mut ByteWriter,
        depth: usize,
    ) -> NbtResult<()> {
        // Однородность уже проверена в tag_type_for.
        writer.write_u8(list.element_type().id());
        write_count(writer, list.len(), TagType::List)?;
        for element in list {
            self.encode_value(element, writer, depth + 1)?;
        }
        Ok(())
    }

    fn write_compound_body(
        &self,
        compound: &Compound,
        writer: &mut ByteWriter,
        depth: usize,
    ) -> NbtResult<()> {
        for (key, value) in compound {
            writer.write_u8(value.tag_type().id());
            write_string(writer, key).map_err(|_| {
                NbtError::unencodable(format!(
                    "compound key of {} bytes exceeds {} bytes",
                    key.len(),
                    u16::MAX
                ))
            })?;
            self.encode_value(value, writer, depth + 1)?;
        }
        writer.write_u8(TagType::End.id());
        Ok(())
    }
}

/// Кодирует значение с лимитом глубины по умолчанию.
pub fn encode_tag(
    tag: &Tag,
    writer: &mut ByteWriter,
) -> NbtResult<()> {
    TagEncoder::default().encode_tag(tag, writer)
}

/// Строка: длина u16 BE, затем UTF-8 байты.
pub fn write_string(
    writer: &mut ByteWriter,
    s: &str,
) -> NbtResult<()> {
    if s.len() > u16::MAX as usize {
        return Err(NbtError::unencodable(format!(
            "string of {} bytes exceeds {} bytes",
            s.len(),
            u16::MAX
        )));
    }
    writer.write_length_prefixed(s.as_bytes(), STRING_LENGTH_WIDTH)
}

fn write_count(
    writer: &mut ByteWriter,
    count: usize,
    tag_type: TagType,
) -> NbtResult<()> {
    writer
        .write_be_uint(count as u64, COUNT_WIDTH)
        .map_err(|_| NbtError::unencodable(format!("{tag_type} of {count} elements is too long")))
}
