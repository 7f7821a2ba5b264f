//! Module for nucleotides and the complement rule

use crate::error::{ComplementError, Result};
use log::error;
use phf::{phf_map, Map};

/// Binary constant for Adenine
pub const ADENINE: u8 = b'A';
/// Binary constant for Thymine
pub const THYMINE: u8 = b'T';
/// Binary constant for Cytosine
pub const CYTOSINE: u8 = b'C';
/// Binary constant for Guanine
pub const GUANINE: u8 = b'G';

/// All nucleotides, in the order used to draw random strands
pub static NUCLEOTIDES: [u8; 4] = [CYTOSINE, ADENINE, THYMINE, GUANINE];

/// map of complements
pub const COMPLEMENTS: Map<u8, u8> = phf_map! {
    b'T' => b'A',
    b'A' => b'T',
    b'C' => b'G',
    b'G' => b'C',
};

/// Checks if the value is one of `NUCLEOTIDES`
pub fn is_nucleotide(symbol: u8) -> bool {
    matches!(symbol, ADENINE | THYMINE | GUANINE | CYTOSINE)
}

/// Returns the Watson-Crick complement of a single symbol.
///
/// Only uppercase `A`, `T`, `C` and `G` are accepted, anything else
/// (lowercase, ambiguity codes, non ASCII bytes) is an `InvalidSymbol`.
pub fn complement(symbol: u8) -> Result<u8> {
    COMPLEMENTS
        .get(&symbol)
        .copied()
        .ok_or(ComplementError::InvalidSymbol {
            symbol: symbol as char,
            position: None,
        })
}

/// Complements `chunk` in place. `offset` is the position of the chunk's
/// first byte in the whole strand and is used to report errors.
///
/// Stops at the first invalid symbol; bytes before it are already
/// rewritten.
pub fn complement_in_place(chunk: &mut [u8], offset: usize) -> Result<()> {
    for (idx, base) in chunk.iter_mut().enumerate() {
        *base = complement(*base).map_err(|e| {
            let e = e.at(offset + idx);
            error!("{}", e);
            e
        })?;
    }
    Ok(())
}
