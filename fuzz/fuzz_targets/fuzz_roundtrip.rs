#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut encoded = vec![0u8; base32::encoded_len(data.len()).unwrap()];
    let written = base32::encode_into(data, &mut encoded).unwrap();
    assert_eq!(written, encoded.len(), "Encoded length mismatch");

    // Conformance with external crate
    let external_encoded =
        base32_external::encode(base32_external::Alphabet::Rfc4648 { padding: true }, data);
    assert_eq!(
        encoded,
        external_encoded.as_bytes(),
        "External crate encode mismatch"
    );

    let mut decoded = vec![0u8; base32::decoded_len(&encoded).unwrap()];
    let read = base32::decode_into(&encoded, &mut decoded).unwrap();
    assert_eq!(data, &decoded[..read], "Roundtrip failed");

    assert_eq!(
        base32::LENIENT.decode(&encoded).unwrap(),
        data,
        "Lenient roundtrip failed"
    );
});
