#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nbtcodec::{decode_document, encode_document, Compound, List, Tag, TagType};

/// Плоское описание дерева, из которого строится Compound.
#[derive(Debug, Arbitrary)]
enum FuzzTag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(u32),
    Double(u64),
    Bytes(Vec<u8>),
    Str(String),
    Ints(Vec<u32>),
    Shorts(Vec<u16>),
    LongList(Vec<i64>),
    Nested(Vec<(String, FuzzTag)>),
}

impl FuzzTag {
    fn into_tag(self) -> Tag {
        match self {
            FuzzTag::Byte(v) => Tag::Byte(v),
            FuzzTag::Short(v) => Tag::Short(v),
            FuzzTag::Int(v) => Tag::Int(v),
            FuzzTag::Long(v) => Tag::Long(v),
            // Через биты, чтобы NaN сравнивался по представлению ниже.
            FuzzTag::Float(bits) => Tag::Float(f32::from_bits(bits)),
            FuzzTag::Double(bits) => Tag::Double(f64::from_bits(bits)),
            FuzzTag::Bytes(v) => Tag::ByteArray(v),
            FuzzTag::Str(s) => Tag::String(s),
            FuzzTag::Ints(v) => Tag::IntArray(v),
            FuzzTag::Shorts(v) => Tag::ShortArray(v),
            FuzzTag::LongList(v) => Tag::List(
                List::new(TagType::Long, v.into_iter().map(Tag::Long).collect())
                    .expect("homogeneous list"),
            ),
            FuzzTag::Nested(entries) => Tag::Compound(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.into_tag()))
                    .collect(),
            ),
        }
    }
}

fuzz_target!(|entries: Vec<(String, FuzzTag)>| {
    let root: Compound = entries.into_iter().map(|(k, v)| (k, v.into_tag())).collect();

    // Строки длиннее u16::MAX законно отвергаются.
    let Ok(bytes) = encode_document(&root) else {
        return;
    };
    let decoded = decode_document(&bytes).expect("encoded document must decode");
    // Сравнение байтами: NaN != NaN, но его биты сохраняются.
    assert_eq!(encode_document(&decoded).expect("re-encode"), bytes);
});
