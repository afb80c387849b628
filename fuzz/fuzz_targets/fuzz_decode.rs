#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Parameters<'a> {
    case_insensitive: bool,
    strict_trailing_bits: bool,
    spare_capacity: u8,
    input: &'a [u8],
}

fuzz_target!(|params: Parameters| {
    let engine = base32::Engine::new(base32::Config {
        case_insensitive: params.case_insensitive,
        strict_trailing_bits: params.strict_trailing_bits,
    });

    let validated = engine.validate(params.input);
    let capacity = base32::max_decoded_len(params.input.len()) + params.spare_capacity as usize;
    let mut output = vec![0u8; capacity];
    let decoded = engine.decode_into(params.input, &mut output);
    assert_eq!(validated, decoded, "validate and decode_into disagree");

    if let Ok(len) = decoded {
        // Strict canonical input re-encodes to itself.
        if !params.case_insensitive && params.strict_trailing_bits {
            assert_eq!(base32::encode(&output[..len]).as_bytes(), params.input);
        }
    }
});
