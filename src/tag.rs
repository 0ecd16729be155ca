use indexmap::IndexMap;
use nbtcodec_error::{NbtError, NbtResult};
use serde::{Deserialize, Serialize};

use crate::codec::tags::TagType;

/// Именованная коллекция значений.
///
/// Ключи уникальны, обход идёт в порядке вставки; в этом же порядке записи
/// пишутся при кодировании.
pub type Compound = IndexMap<String, Tag>;

/// Типизированный узел дерева NBT.
///
/// `End` не является значением и варианта не имеет: он существует только
/// на проводе как терминатор Compound (см. [`TagType::End`]).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Tag {
    /// Знаковое 8-битное целое.
    Byte(i8),
    /// Знаковое 16-битное целое.
    Short(i16),
    /// Знаковое 32-битное целое.
    Int(i32),
    /// Знаковое 64-битное целое.
    Long(i64),
    /// IEEE float, 32 бита.
    Float(f32),
    /// IEEE float, 64 бита.
    Double(f64),
    /// Сырые беззнаковые байты.
    ByteArray(Vec<u8>),
    /// Текст UTF-8, на проводе не длиннее `u16::MAX` байт.
    String(String),
    /// Однородная последовательность с объявленным типом элементов.
    List(List),
    /// Вложенная именованная коллекция.
    Compound(Compound),
    /// Беззнаковые 32-битные значения.
    IntArray(Vec<u32>),
    /// Беззнаковые 16-битные значения.
    ShortArray(Vec<u16>),
}

/// Однородный список значений.
///
/// Тип элементов задаётся при создании и общий для всех элементов; пустой
/// список тоже хранит объявленный тип.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawList")]
pub struct List {
    element_type: TagType,
    elements: Vec<Tag>,
}

/// Непроверенная форма: через неё проходят списки из serde.
#[derive(Deserialize)]
struct RawList {
    element_type: TagType,
    elements: Vec<Tag>,
}

impl Tag {
    /// Тип значения на проводе.
    pub fn tag_type(&self) -> TagType {
        TagType::of(self)
    }

    /// Имя типа для людей (`TAG_Int`, `TAG_Compound`, ...).
    pub fn type_name(&self) -> &'static str {
        self.tag_type().name()
    }

    pub fn as_byte(&self) -> Option<i8> {
        match self {
            Tag::Byte(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_short(&self) -> Option<i16> {
        match self {
            Tag::Short(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Tag::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Tag::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Tag::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Tag::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_byte_array(&self) -> Option<&[u8]> {
        match self {
            Tag::ByteArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[u32]> {
        match self {
            Tag::IntArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_short_array(&self) -> Option<&[u16]> {
        match self {
            Tag::ShortArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Tag::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }
}

impl List {
    /// Создаёт список, проверяя, что каждый элемент имеет тип `element_type`.
    ///
    /// Непустой список не может быть объявлен с [`TagType::End`].
    pub fn new(
        element_type: TagType,
        elements: Vec<Tag>,
    ) -> NbtResult<Self> {
        if element_type == TagType::End && !elements.is_empty() {
            return Err(NbtError::unencodable(
                "non-empty list cannot have element type TAG_End",
            ));
        }
        if let Some((index, bad)) = elements
            .iter()
            .enumerate()
            .find(|(_, e)| e.tag_type() != element_type)
        {
            return Err(NbtError::unencodable(format!(
                "list of {} contains {} at index {index}",
                element_type.name(),
                bad.type_name()
            )));
        }
        Ok(Self {
            element_type,
            elements,
        })
    }

    /// Пустой список с объявленным типом элементов.
    pub fn empty(element_type: TagType) -> Self {
        Self {
            element_type,
            elements: Vec::new(),
        }
    }

    /// Добавляет элемент объявленного типа.
    pub fn push(
        &mut self,
        tag: Tag,
    ) -> NbtResult<()> {
        if tag.tag_type() != self.element_type {
            return Err(NbtError::unencodable(format!(
                "cannot push {} into list of {}",
                tag.type_name(),
                self.element_type.name()
            )));
        }
        self.elements.push(tag);
        Ok(())
    }

    pub fn element_type(&self) -> TagType {
        self.element_type
    }

    pub fn elements(&self) -> &[Tag] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn into_elements(self) -> Vec<Tag> {
        self.elements
    }

    /// Создаёт список без проверки однородности. Вызывающий гарантирует,
    /// что все элементы имеют тип `element_type` (декодер так и строит).
    pub(crate) fn from_parts_unchecked(
        element_type: TagType,
        elements: Vec<Tag>,
    ) -> Self {
        Self {
            element_type,
            elements,
        }
    }
}

impl TryFrom<RawList> for List {
    type Error = NbtError;

    fn try_from(raw: RawList) -> Result<Self, Self::Error> {
        List::new(raw.element_type, raw.elements)
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

macro_rules! impl_from_for_tag {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Tag {
                fn from(v: $ty) -> Self {
                    Tag::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_tag! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Vec<u8> => ByteArray,
    String => String,
    List => List,
    Compound => Compound,
    Vec<u32> => IntArray,
    Vec<u16> => ShortArray,
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Tag::String(s.to_owned())
    }
}
