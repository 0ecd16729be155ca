//! Property-based tests для кодека NBT
//!
//! Генерируются случайные деревья и проверяется, что decode(encode(x)) == x
//! во всех режимах: сырой документ, gzip и JSON.

use nbtcodec::{
    codec::{decode_document, encode_document, from_json_str, to_json_string},
    read_document, write_document, DecodeOptions, EncodeOptions, NbtError,
};
use proptest::prelude::*;

use generators::*;

const PROPTEST_CASES: u32 = 256;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: PROPTEST_CASES,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_document_roundtrip(root in root_strategy(true)) {
        let bytes = encode_document(&root).unwrap();
        prop_assert_eq!(&bytes[..3], &[0x0A, 0x00, 0x00]);
        prop_assert_eq!(*bytes.last().unwrap(), 0x00);
        prop_assert_eq!(decode_document(&bytes).unwrap(), root);
    }

    /// Повторное кодирование декодированного дерева даёт те же байты.
    #[test]
    fn prop_encoding_is_stable(root in root_strategy(true)) {
        let bytes = encode_document(&root).unwrap();
        let again = encode_document(&decode_document(&bytes).unwrap()).unwrap();
        prop_assert_eq!(bytes, again);
    }

    #[test]
    fn prop_gzip_roundtrip(root in root_strategy(true), level in 0u32..=9) {
        let options = EncodeOptions { gzip: Some(level), ..EncodeOptions::default() };
        let bytes = write_document(&root, &options).unwrap();
        prop_assert_eq!(read_document(&bytes, &DecodeOptions::default()).unwrap(), root);
    }

    #[test]
    fn prop_json_roundtrip(root in root_strategy(false)) {
        let json = to_json_string(&root, false).unwrap();
        prop_assert_eq!(from_json_str(&json).unwrap(), root);
    }

    /// Любой строгий префикс документа отвергается, а не декодируется молча.
    #[test]
    fn prop_truncation_is_rejected(root in root_strategy(true), cut in any::<prop::sample::Index>()) {
        let bytes = encode_document(&root).unwrap();
        let len = cut.index(bytes.len());
        match decode_document(&bytes[..len]) {
            Err(NbtError::EmptyInput) => prop_assert_eq!(len, 0),
            Err(NbtError::TruncatedInput { .. }) => prop_assert!(len > 0),
            other => prop_assert!(false, "prefix of {} bytes gave {:?}", len, other),
        }
    }

    /// Произвольные байты никогда не приводят к панике.
    #[test]
    fn prop_garbage_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode_document(&data);
        let mut prefixed = vec![0x0A, 0x00, 0x00];
        prefixed.extend_from_slice(&data);
        let _ = decode_document(&prefixed);
    }
}
