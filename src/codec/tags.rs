//! Реестр типов бинарного формата NBT.
//!
//! Каждое значение на проводе помечается однобайтовым идентификатором
//! 0..=12. Таблица неизменяема и является единственным источником фактов о
//! типах: декодер и энкодер обращаются к ней, а не выводят ширины сами.

use nbtcodec_error::{NbtError, NbtResult};
use num_enum::TryFromPrimitive;
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::Tag;

/// Терминатор Compound
pub const TAG_END: u8 = 0x00;
/// i8
pub const TAG_BYTE: u8 = 0x01;
/// i16
pub const TAG_SHORT: u8 = 0x02;
/// i32
pub const TAG_INT: u8 = 0x03;
/// i64
pub const TAG_LONG: u8 = 0x04;
/// f32
pub const TAG_FLOAT: u8 = 0x05;
/// f64
pub const TAG_DOUBLE: u8 = 0x06;
/// Массив u8
pub const TAG_BYTE_ARRAY: u8 = 0x07;
/// Строка UTF-8 с префиксом длины u16
pub const TAG_STRING: u8 = 0x08;
/// Однородный список
pub const TAG_LIST: u8 = 0x09;
/// Словарь строка -> тег
pub const TAG_COMPOUND: u8 = 0x0A;
/// Массив u32
pub const TAG_INT_ARRAY: u8 = 0x0B;
/// Массив u16
pub const TAG_SHORT_ARRAY: u8 = 0x0C;

/// Ширина префикса длины строки в байтах.
pub const STRING_LENGTH_WIDTH: usize = 2;
/// Ширина счётчика элементов массива/списка в байтах.
pub const COUNT_WIDTH: usize = 4;

/// Тип значения на проводе.
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, Serialize_repr, Deserialize_repr,
)]
pub enum TagType {
    End = TAG_END,
    Byte = TAG_BYTE,
    Short = TAG_SHORT,
    Int = TAG_INT,
    Long = TAG_LONG,
    Float = TAG_FLOAT,
    Double = TAG_DOUBLE,
    ByteArray = TAG_BYTE_ARRAY,
    String = TAG_STRING,
    List = TAG_LIST,
    Compound = TAG_COMPOUND,
    IntArray = TAG_INT_ARRAY,
    ShortArray = TAG_SHORT_ARRAY,
}

impl TagType {
    /// Все типы в порядке идентификаторов.
    pub const ALL: [TagType; 13] = [
        TagType::End,
        TagType::Byte,
        TagType::Short,
        TagType::Int,
        TagType::Long,
        TagType::Float,
        TagType::Double,
        TagType::ByteArray,
        TagType::String,
        TagType::List,
        TagType::Compound,
        TagType::IntArray,
        TagType::ShortArray,
    ];

    /// Идентификатор на проводе.
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Направление декодирования: идентификатор -> тип.
    ///
    /// `offset`: позиция байта типа во входном буфере, попадает в ошибку.
    pub fn from_id(
        id: u8,
        offset: usize,
    ) -> NbtResult<Self> {
        Self::try_from(id).map_err(|_| NbtError::UnknownTag { tag: id, offset })
    }

    /// Направление кодирования: значение -> тип.
    pub fn of(tag: &Tag) -> Self {
        match tag {
            Tag::Byte(_) => TagType::Byte,
            Tag::Short(_) => TagType::Short,
            Tag::Int(_) => TagType::Int,
            Tag::Long(_) => TagType::Long,
            Tag::Float(_) => TagType::Float,
            Tag::Double(_) => TagType::Double,
            Tag::ByteArray(_) => TagType::ByteArray,
            Tag::String(_) => TagType::String,
            Tag::List(_) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
            Tag::IntArray(_) => TagType::IntArray,
            Tag::ShortArray(_) => TagType::ShortArray,
        }
    }

    /// Ширина скалярного значения в байтах (`None` для не-скаляров).
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            TagType::Byte => Some(1),
            TagType::Short => Some(2),
            TagType::Int | TagType::Float => Some(4),
            TagType::Long | TagType::Double => Some(8),
            _ => None,
        }
    }

    /// Ширина элемента массива в байтах (`None` для не-массивов).
    pub const fn element_width(self) -> Option<usize> {
        match self {
            TagType::ByteArray => Some(1),
            TagType::ShortArray => Some(2),
            TagType::IntArray => Some(4),
            _ => None,
        }
    }

    /// Контейнер, увеличивающий глубину вложенности.
    pub const fn is_container(self) -> bool {
        matches!(self, TagType::List | TagType::Compound)
    }

    pub const fn name(self) -> &'static str {
        match self {
            TagType::End => "TAG_End",
            TagType::Byte => "TAG_Byte",
            TagType::Short => "TAG_Short",
            TagType::Int => "TAG_Int",
            TagType::Long => "TAG_Long",
            TagType::Float => "TAG_Float",
            TagType::Double => "TAG_Double",
            TagType::ByteArray => "TAG_Byte_Array",
            TagType::String => "TAG_String",
            TagType::List => "TAG_List",
            TagType::Compound => "TAG_Compound",
            TagType::IntArray => "TAG_Int_Array",
            TagType::ShortArray => "TAG_Short_Array",
        }
    }
}

/// Тип значения для записи на провод.
///
/// В отличие от [`TagType::of`], проверяет, что значение представимо:
/// элементы List совпадают с объявленным типом, а список типа End пуст.
pub fn tag_type_for(tag: &Tag) -> NbtResult<TagType> {
    if let Tag::List(list) = tag {
        let element_type = list.element_type();
        if element_type == TagType::End && !list.is_empty() {
            return Err(NbtError::unencodable(
                "non-empty list cannot have element type TAG_End",
            ));
        }
        if let Some((index, bad)) = list
            .iter()
            .enumerate()
            .find(|(_, e)| e.tag_type() != element_type)
        {
            return Err(NbtError::unencodable(format!(
                "list of {element_type} contains {} at index {index}",
                bad.type_name()
            )));
        }
    }
    Ok(TagType::of(tag))
}

impl std::fmt::Display for TagType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Compound, List};

    /// Тест проверяет, что таблица тотальна по 0..=12 и id совпадает с
    /// индексом.
    #[test]
    fn test_registry_is_total() {
        for (i, ty) in TagType::ALL.iter().enumerate() {
            assert_eq!(ty.id() as usize, i);
            assert_eq!(TagType::from_id(i as u8, 0).unwrap(), *ty);
        }
    }

    #[test]
    fn test_unknown_id() {
        let err = TagType::from_id(13, 42).unwrap_err();
        assert_eq!(err, NbtError::UnknownTag { tag: 13, offset: 42 });
        assert!(TagType::from_id(0xFF, 0).is_err());
    }

    #[test]
    fn test_widths() {
        assert_eq!(TagType::Byte.fixed_width(), Some(1));
        assert_eq!(TagType::Double.fixed_width(), Some(8));
        assert_eq!(TagType::String.fixed_width(), None);
        assert_eq!(TagType::ByteArray.element_width(), Some(1));
        assert_eq!(TagType::ShortArray.element_width(), Some(2));
        assert_eq!(TagType::IntArray.element_width(), Some(4));
        assert_eq!(TagType::List.element_width(), None);
    }

    #[test]
    fn test_of_value() {
        assert_eq!(TagType::of(&Tag::Long(1)), TagType::Long);
        assert_eq!(TagType::of(&Tag::ShortArray(vec![])), TagType::ShortArray);
        assert_eq!(
            TagType::of(&Tag::List(List::empty(TagType::Byte))),
            TagType::List
        );
        assert_eq!(
            TagType::of(&Tag::Compound(Compound::new())),
            TagType::Compound
        );
    }

    #[test]
    fn test_tag_type_for_checks_lists() {
        let ok = List::new(TagType::Int, vec![Tag::Int(1)]).unwrap();
        assert_eq!(tag_type_for(&Tag::List(ok)).unwrap(), TagType::List);
        assert_eq!(tag_type_for(&Tag::Byte(1)).unwrap(), TagType::Byte);

        let bad = List::from_parts_unchecked(TagType::Int, vec![Tag::Int(1), Tag::Long(2)]);
        let err = tag_type_for(&Tag::List(bad)).unwrap_err();
        assert!(err.to_string().contains("index 1"));

        let end = List::from_parts_unchecked(TagType::End, vec![Tag::Byte(0)]);
        assert!(matches!(
            tag_type_for(&Tag::List(end)),
            Err(NbtError::UnencodableValue { .. })
        ));
    }
}
