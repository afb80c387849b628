//! RFC 4648 base32 encoding and decoding over caller-provided buffers.
//!
//! The core API never allocates: [`encode_into`] and [`decode_into`] write
//! into a slice supplied by the caller and report how many bytes they wrote.
//! Use [`encoded_len`] and [`decoded_len`] to size those slices exactly.
//! [`encode`] and [`decode`] are owned-return wrappers around the same code.
//!
//! Only the standard alphabet (`A-Z`, `2-7`) with `=` padding is supported.
//! Encoded data is always a whole number of 8-character blocks.
//!
//! Decoding policy is chosen through an [`Engine`]. The free functions use
//! [`STANDARD`], which accepts uppercase symbols only and rejects a final
//! symbol whose unused low bits are not zero. [`LENIENT`] accepts lowercase
//! and ignores those bits.
//!
//! # Example
//!
//! ```
//! let data = b"foobar";
//! let mut encoded = vec![0u8; base32::encoded_len(data.len()).unwrap()];
//! let written = base32::encode_into(data, &mut encoded).unwrap();
//! assert_eq!(&encoded[..written], b"MZXW6YTBOI======");
//!
//! let mut decoded = vec![0u8; base32::decoded_len(&encoded).unwrap()];
//! let read = base32::decode_into(&encoded, &mut decoded).unwrap();
//! assert_eq!(&decoded[..read], data);
//! ```

use thiserror::Error;
use tracing::debug;

#[cfg(test)]
#[path = "base32_tests.rs"]
mod tests;

/// RFC 4648 standard base32 alphabet (A-Z, 2-7).
pub const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Padding character.
pub const PAD: u8 = b'=';

/// Marks a byte that is not an alphabet symbol in a decode table.
const INVALID: u8 = 0xFF;

/// Decode table accepting uppercase symbols only.
static DECODE_TABLE_UPPER: [u8; 256] = build_decode_table(false);

/// Decode table accepting both cases.
static DECODE_TABLE_ANY_CASE: [u8; 256] = build_decode_table(true);

/// Symbols carrying data in a block, indexed by the number of input bytes (0..=5).
const SYMBOLS_FOR_BYTES: [usize; 6] = [0, 2, 4, 5, 7, 8];

/// Bytes carried by a final block, indexed by its padding count (0..=8).
/// `None` marks counts no encoder can produce.
const BYTES_FOR_PADDING: [Option<usize>; 9] = [
    Some(5),
    Some(4),
    None,
    Some(3),
    Some(2),
    None,
    Some(1),
    None,
    None,
];

const fn build_decode_table(accept_lowercase: bool) -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 32 {
        let c = ALPHABET[i];
        table[c as usize] = i as u8;
        if accept_lowercase && c.is_ascii_uppercase() {
            table[c.to_ascii_lowercase() as usize] = i as u8;
        }
        i += 1;
    }
    table
}

/// Errors returned by the codec.
///
/// Positions are byte offsets into the encoded input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The output slice cannot hold the result. Nothing was written.
    #[error("output buffer too small: {required} bytes required, {available} available")]
    BufferTooSmall { required: usize, available: usize },

    /// Encoded input whose length is not a multiple of 8.
    #[error("invalid input length {length}: must be a multiple of 8")]
    InvalidLength { length: usize },

    /// Padding outside the tail of the final block, followed by a symbol,
    /// or in a count no encoder produces.
    #[error("invalid padding at position {position}")]
    InvalidPadding { position: usize },

    /// A byte outside the alphabet, or a final symbol with non-zero unused
    /// bits under strict decoding.
    #[error("invalid character 0x{byte:02x} at position {position}")]
    InvalidCharacter { byte: u8, position: usize },

    /// The encoded length of `length` input bytes does not fit in `usize`.
    #[error("encoded length of {length} bytes overflows usize")]
    Overflow { length: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cold]
fn reject(error: Error) -> Error {
    debug!(%error, "base32 codec rejected call");
    error
}

/// Decoding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Accept `a-z` as well as `A-Z`.
    pub case_insensitive: bool,
    /// Reject a final symbol whose bits beyond the last input byte are set.
    pub strict_trailing_bits: bool,
}

impl Default for Config {
    fn default() -> Self {
        STANDARD.config
    }
}

/// A base32 codec bound to a decoding [`Config`].
///
/// Encoding output does not depend on the configuration: it is always
/// uppercase and padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engine {
    config: Config,
}

/// Uppercase only, canonical trailing bits required.
pub const STANDARD: Engine = Engine::new(Config {
    case_insensitive: false,
    strict_trailing_bits: true,
});

/// Either case, trailing bits ignored.
pub const LENIENT: Engine = Engine::new(Config {
    case_insensitive: true,
    strict_trailing_bits: false,
});

impl Default for Engine {
    fn default() -> Self {
        STANDARD
    }
}

/// Shape of the final block of an encoded input.
#[derive(Debug, Clone, Copy)]
struct Tail {
    /// Non-padding characters.
    symbols: usize,
    /// Bytes the block decodes to.
    bytes: usize,
}

/// Returns the exact number of bytes [`encode_into`] writes for `len` input
/// bytes: `ceil(len / 5) * 8`.
///
/// # Errors
///
/// [`Error::Overflow`] if the result does not fit in `usize`.
///
/// # Example
///
/// ```
/// use base32::encoded_len;
///
/// assert_eq!(encoded_len(0).unwrap(), 0);
/// assert_eq!(encoded_len(1).unwrap(), 8);
/// assert_eq!(encoded_len(5).unwrap(), 8);
/// assert_eq!(encoded_len(6).unwrap(), 16);
/// assert!(encoded_len(usize::MAX).is_err());
/// ```
#[inline]
pub fn encoded_len(len: usize) -> Result<usize> {
    len.div_ceil(5)
        .checked_mul(8)
        .ok_or_else(|| reject(Error::Overflow { length: len }))
}

/// Upper bound on the decoded size of `len` encoded bytes.
///
/// Sizing an output with this is always enough for valid input; the exact
/// figure needs the padding, see [`decoded_len`].
#[inline]
pub const fn max_decoded_len(len: usize) -> usize {
    len / 8 * 5
}

/// Returns the exact decoded size of `input` from its length and padding.
///
/// Only the final block is inspected, so an `Ok` here does not mean the
/// input will decode. Use [`validate`] for a full check.
///
/// ```
/// assert_eq!(base32::decoded_len(b"MZXW6YTBOI======").unwrap(), 6);
/// assert!(base32::decoded_len(b"MZXW6").is_err());
/// ```
pub fn decoded_len(input: &[u8]) -> Result<usize> {
    Ok(layout(input)?.map_or(0, |(len, _)| len))
}

/// Exact decoded length and final block shape, `None` for empty input.
fn layout(input: &[u8]) -> Result<Option<(usize, Tail)>> {
    if input.is_empty() {
        return Ok(None);
    }
    check_length(input)?;
    let tail = inspect_tail(input)?;
    Ok(Some(((input.len() / 8 - 1) * 5 + tail.bytes, tail)))
}

fn check_length(input: &[u8]) -> Result<()> {
    if input.len() % 8 != 0 {
        return Err(reject(Error::InvalidLength {
            length: input.len(),
        }));
    }
    Ok(())
}

/// Reads the padding of the last block. `input` is non-empty and a multiple of 8.
fn inspect_tail(input: &[u8]) -> Result<Tail> {
    let start = input.len() - 8;
    let block = &input[start..];

    let symbols = block.iter().position(|&c| c == PAD).unwrap_or(8);
    let position = start + symbols;
    if block[symbols..].iter().any(|&c| c != PAD) {
        return Err(reject(Error::InvalidPadding { position }));
    }

    match BYTES_FOR_PADDING[8 - symbols] {
        Some(bytes) => Ok(Tail { symbols, bytes }),
        None => Err(reject(Error::InvalidPadding { position })),
    }
}

/// Encodes `input` into `output` using [`STANDARD`].
///
/// Writes exactly [`encoded_len`]`(input.len())` bytes and leaves the rest of
/// `output` untouched.
///
/// # Returns
///
/// The number of bytes written.
///
/// # Errors
///
/// [`Error::BufferTooSmall`] if `output` is shorter than the encoding,
/// detected before anything is written.
///
/// # Example
///
/// ```
/// let mut output = [0u8; 8];
/// assert_eq!(base32::encode_into(b"Hello", &mut output).unwrap(), 8);
/// assert_eq!(&output, b"JBSWY3DP");
/// ```
#[inline]
pub fn encode_into(input: &[u8], output: &mut [u8]) -> Result<usize> {
    STANDARD.encode_into(input, output)
}

/// Encodes `input` into a new `String` using [`STANDARD`].
///
/// ```
/// assert_eq!(base32::encode(b"foobar"), "MZXW6YTBOI======");
/// assert_eq!(base32::encode(b""), "");
/// ```
#[inline]
pub fn encode(input: &[u8]) -> String {
    STANDARD.encode(input)
}

/// Decodes `input` into `output` using [`STANDARD`].
///
/// # Returns
///
/// The number of bytes written, equal to [`decoded_len`]`(input)`.
///
/// # Errors
///
/// Length and padding errors, then [`Error::BufferTooSmall`], are reported
/// before any byte is written. Character errors may be found after earlier
/// blocks were written; the contents of `output` are unspecified then.
///
/// # Example
///
/// ```
/// let mut output = [0u8; 5];
/// assert_eq!(base32::decode_into(b"JBSWY3DP", &mut output).unwrap(), 5);
/// assert_eq!(&output, b"Hello");
/// ```
#[inline]
pub fn decode_into(input: &[u8], output: &mut [u8]) -> Result<usize> {
    STANDARD.decode_into(input, output)
}

/// Decodes `input` into a new `Vec<u8>` using [`STANDARD`].
///
/// ```
/// assert_eq!(base32::decode("MZXW6YTBOI======").unwrap(), b"foobar");
/// assert!(base32::decode("mzxw6ytboi======").is_err());
/// ```
#[inline]
pub fn decode<T: AsRef<[u8]>>(input: T) -> Result<Vec<u8>> {
    STANDARD.decode(input)
}

/// Checks `input` under [`STANDARD`] without writing anything and returns
/// its exact decoded length.
#[inline]
pub fn validate(input: &[u8]) -> Result<usize> {
    STANDARD.validate(input)
}

impl Engine {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> Config {
        self.config
    }

    #[inline]
    fn decode_table(&self) -> &'static [u8; 256] {
        if self.config.case_insensitive {
            &DECODE_TABLE_ANY_CASE
        } else {
            &DECODE_TABLE_UPPER
        }
    }

    /// See [`encode_into`].
    pub fn encode_into(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let required = encoded_len(input.len())?;
        if output.len() < required {
            return Err(reject(Error::BufferTooSmall {
                required,
                available: output.len(),
            }));
        }

        let full_groups = input.len() / 5;
        for (group, block) in input
            .chunks_exact(5)
            .zip(output.chunks_exact_mut(8))
        {
            encode_group(group, block);
        }

        // Short final group: encode zero-extended, then overwrite the
        // symbols that carry no input with padding.
        let rest = &input[full_groups * 5..];
        if !rest.is_empty() {
            let mut group = [0u8; 5];
            group[..rest.len()].copy_from_slice(rest);
            let block = &mut output[full_groups * 8..required];
            encode_group(&group, block);
            block[SYMBOLS_FOR_BYTES[rest.len()]..].fill(PAD);
        }

        Ok(required)
    }

    /// See [`encode`].
    pub fn encode(&self, input: &[u8]) -> String {
        // A slice holds at most isize::MAX bytes, whose encoding fits in usize.
        let len = encoded_len(input.len()).expect("slice lengths never overflow encoded_len");
        let mut output = vec![0u8; len];
        self.encode_into(input, &mut output)
            .expect("output sized by encoded_len");
        String::from_utf8(output).expect("base32 output is always valid UTF-8")
    }

    /// See [`validate`].
    pub fn validate(&self, input: &[u8]) -> Result<usize> {
        match layout(input)? {
            Some((len, tail)) => {
                self.decode_blocks(input, tail, |_, _| {})?;
                Ok(len)
            }
            None => Ok(0),
        }
    }

    /// See [`decode_into`].
    pub fn decode_into(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let Some((required, tail)) = layout(input)? else {
            return Ok(0);
        };
        if output.len() < required {
            return Err(reject(Error::BufferTooSmall {
                required,
                available: output.len(),
            }));
        }

        self.decode_blocks(input, tail, |index, bytes| {
            let start = index * 5;
            output[start..start + bytes.len()].copy_from_slice(bytes);
        })?;

        Ok(required)
    }

    /// See [`decode`].
    pub fn decode<T: AsRef<[u8]>>(&self, input: T) -> Result<Vec<u8>> {
        let input = input.as_ref();
        let mut output = vec![0u8; decoded_len(input)?];
        let written = self.decode_into(input, &mut output)?;
        output.truncate(written);
        Ok(output)
    }

    /// Decodes every block of an input already measured by [`layout`],
    /// handing the bytes of block `index` to `emit`.
    fn decode_blocks<F>(&self, input: &[u8], tail: Tail, mut emit: F) -> Result<()>
    where
        F: FnMut(usize, &[u8]),
    {
        let table = self.decode_table();
        let last = input.len() / 8 - 1;

        for (index, block) in input.chunks_exact(8).enumerate() {
            let offset = index * 8;
            let (symbols, len) = if index == last {
                (tail.symbols, tail.bytes)
            } else {
                (8, 5)
            };

            let mut values = [0u8; 8];
            let mut seen = 0u8;
            for (value, &c) in values.iter_mut().zip(&block[..symbols]) {
                *value = table[c as usize];
                seen |= *value;
            }
            if seen > 31 {
                return Err(reject(locate_invalid(table, &block[..symbols], offset)));
            }

            if symbols < 8 && self.config.strict_trailing_bits {
                let unused = symbols * 5 - len * 8;
                let mask = (1u8 << unused) - 1;
                if values[symbols - 1] & mask != 0 {
                    return Err(reject(Error::InvalidCharacter {
                        byte: block[symbols - 1],
                        position: offset + symbols - 1,
                    }));
                }
            }

            let [v0, v1, v2, v3, v4, v5, v6, v7] = values;
            let bytes = [
                (v0 << 3) | (v1 >> 2),
                (v1 << 6) | (v2 << 1) | (v3 >> 4),
                (v3 << 4) | (v4 >> 1),
                (v4 << 7) | (v5 << 2) | (v6 >> 3),
                (v6 << 5) | v7,
            ];
            emit(index, &bytes[..len]);
        }

        Ok(())
    }
}

/// Encodes one 5-byte group into an 8-character block.
#[inline(always)]
fn encode_group(group: &[u8], block: &mut [u8]) {
    let (b0, b1, b2, b3, b4) = (group[0], group[1], group[2], group[3], group[4]);

    block[0] = ALPHABET[(b0 >> 3) as usize];
    block[1] = ALPHABET[(((b0 & 0x07) << 2) | (b1 >> 6)) as usize];
    block[2] = ALPHABET[((b1 >> 1) & 0x1F) as usize];
    block[3] = ALPHABET[(((b1 & 0x01) << 4) | (b2 >> 4)) as usize];
    block[4] = ALPHABET[(((b2 & 0x0F) << 1) | (b3 >> 7)) as usize];
    block[5] = ALPHABET[((b3 >> 2) & 0x1F) as usize];
    block[6] = ALPHABET[(((b3 & 0x03) << 3) | (b4 >> 5)) as usize];
    block[7] = ALPHABET[(b4 & 0x1F) as usize];
}

/// Slow path: finds the first byte of `symbols` that failed the table lookup.
#[cold]
fn locate_invalid(table: &[u8; 256], symbols: &[u8], offset: usize) -> Error {
    for (i, &c) in symbols.iter().enumerate() {
        if table[c as usize] != INVALID {
            continue;
        }
        let position = offset + i;
        return if c == PAD {
            Error::InvalidPadding { position }
        } else {
            Error::InvalidCharacter { byte: c, position }
        };
    }
    unreachable!("locate_invalid called on a block without invalid symbols")
}
