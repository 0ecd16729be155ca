#![no_main]

use libfuzzer_sys::fuzz_target;
use nbtcodec::{codec::TagDecoder, decode_document, decode_document_with, encode_document};

// Произвольные байты: декодер обязан вернуть Ok или Err, но не паниковать.
// Успешно декодированное дерево должно снова кодироваться и декодироваться.
fuzz_target!(|data: &[u8]| {
    let _ = decode_document_with(data, &TagDecoder::new(32));

    if let Ok(root) = decode_document(data) {
        let bytes = encode_document(&root).expect("decoded tree must encode");
        let again = decode_document(&bytes).expect("re-encoded tree must decode");
        assert_eq!(
            encode_document(&again).expect("second encode"),
            bytes,
            "encoding is not stable"
        );
    }
});
