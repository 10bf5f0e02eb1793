#![no_main]

use keyshake_crypto::{decode_public_key, encode_public_key};
use libfuzzer_sys::fuzz_target;

// Feeds raw DER through the base64 layer so the fuzzer reaches the SPKI parser.
fuzz_target!(|der: &[u8]| {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

    if let Ok(key) = decode_public_key(&BASE64.encode(der)) {
        let encoded = encode_public_key(key.as_public_key()).expect("accepted key re-encodes");
        assert_eq!(decode_public_key(&encoded).ok(), Some(key));
    }
});
