//! Helpers to build strands and to turn converted buffers back into strings
use crate::error::ComplementError;
use crate::sequence::NUCLEOTIDES;
use rand::Rng;

/// Length of the strands used in the contest
pub const CHAIN_SIZE: usize = 22_000_000;

/// Draws a strand of `size` symbols, uniformly from `C`, `A`, `T`, `G`
pub fn generate_strand<R: Rng>(rng: &mut R, size: usize) -> String {
    (0..size)
        .map(|_| NUCLEOTIDES[rng.gen_range(0..NUCLEOTIDES.len())] as char)
        .collect()
}

/// Turns a converted buffer back into a `String`.
pub fn into_strand(buf: Vec<u8>) -> String {
    // a successful conversion leaves only ASCII nucleotides in the buffer
    String::from_utf8(buf).expect("complemented strand is not ASCII")
}

/// Rewrites an `InvalidSymbol` raised on the bytes of `input` so that it
/// names the character the caller sent, positioned at its first byte.
/// Other errors are returned unchanged.
pub fn decode_symbol(input: &str, err: ComplementError) -> ComplementError {
    match err {
        ComplementError::InvalidSymbol {
            position: Some(position),
            ..
        } if position < input.len() => {
            let start = (0..=position)
                .rev()
                .find(|i| input.is_char_boundary(*i))
                .unwrap_or(0);
            match input[start..].chars().next() {
                Some(symbol) => ComplementError::InvalidSymbol {
                    symbol,
                    position: Some(start),
                },
                None => err,
            }
        }
        other => other,
    }
}
