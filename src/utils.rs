//! Low-level primitives shared by the format layers.
//!
//! Each reader either returns exactly what it promises or fails - there is
//! no partial-read ambiguity.

use std::result::Result as StdResult;

use crate::{Error, Result};

/// Cursor reading bits MSB-first out of a slice of 32-bit words.
///
/// Reads cross word boundaries transparently.
#[derive(Debug, Clone)]
pub(crate) struct BitReader<'a> {
    words: &'a [u32],
    word: usize,
    bit: u32,
}

impl<'a> BitReader<'a> {
    /// Start at `bit` (0 = most significant) of `words[word]`.
    pub(crate) fn new(words: &'a [u32], word: usize, bit: u32) -> Self {
        Self { words, word, bit }
    }

    /// Read `n` bits (at most 32) as an unsigned integer.
    ///
    /// Returns [`Error::VerifierUnderflow`] if the words run out first. The
    /// cursor position is unspecified after a failed read.
    pub(crate) fn read(&mut self, n: u32) -> Result<u32> {
        debug_assert!(n <= 32);
        let mut out = 0u32;
        for _ in 0..n {
            if self.bit > 31 {
                self.bit = 0;
                self.word += 1;
            }
            let w = *self.words.get(self.word).ok_or(Error::VerifierUnderflow)?;
            out = (out << 1) | ((w >> (31 - self.bit)) & 1);
            self.bit += 1;
        }
        Ok(out)
    }

    /// Skip `n` bits of any length.
    pub(crate) fn skip(&mut self, mut n: u32) -> Result<()> {
        while n > 0 {
            let step = n.min(32);
            self.read(step)?;
            n -= step;
        }
        Ok(())
    }
}

/// Parse exactly eight hex digits into a `u32`.
pub(crate) fn hex_u32(s: &str) -> StdResult<u32, ()> {
    let b = decode_hex_n::<4>(s)?;
    Ok(u32::from_be_bytes(b))
}

/// Parse exactly `2 * N` hex digits into `N` bytes.
pub(crate) fn decode_hex_n<const N: usize>(s: &str) -> StdResult<[u8; N], ()> {
    let s = s.trim();
    if s.len() != N * 2 {
        return Err(());
    }
    let mut out = [0u8; N];
    for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
        let hi = hex_nibble(chunk[0])?;
        let lo = hex_nibble(chunk[1])?;
        out[i] = (hi << 4) | lo;
    }
    Ok(out)
}

fn hex_nibble(b: u8) -> StdResult<u8, ()> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_msb_first_across_words() {
        let words = [0x8000_0001, 0xC000_0000];
        let mut r = BitReader::new(&words, 0, 0);
        assert_eq!(r.read(1).unwrap(), 1);
        assert_eq!(r.read(30).unwrap(), 0);
        assert_eq!(r.read(3).unwrap(), 0b111);
        assert_eq!(r.read(4).unwrap(), 0);
    }

    #[test]
    fn starts_mid_word() {
        let words = [0x0ABC_DEF0];
        let mut r = BitReader::new(&words, 0, 4);
        assert_eq!(r.read(12).unwrap(), 0xABC);
    }

    #[test]
    fn underflow_is_error() {
        let words = [0u32; 2];
        let mut r = BitReader::new(&words, 1, 30);
        assert!(r.read(2).is_ok());
        assert!(matches!(r.read(1), Err(Error::VerifierUnderflow)));
        assert!(matches!(
            BitReader::new(&[], 0, 0).read(1),
            Err(Error::VerifierUnderflow)
        ));
    }

    #[test]
    fn skip_longer_than_word() {
        let words = [0, 0, 0x0000_0001];
        let mut r = BitReader::new(&words, 0, 0);
        r.skip(95).unwrap();
        assert_eq!(r.read(1).unwrap(), 1);
    }

    #[test]
    fn zero_bit_read_is_free() {
        let mut r = BitReader::new(&[], 0, 0);
        assert_eq!(r.read(0).unwrap(), 0);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(hex_u32("04030209"), Ok(0x0403_0209));
        assert_eq!(hex_u32(" deadFACE "), Ok(0xDEAD_FACE));
        assert!(hex_u32("0403020").is_err());
        assert!(hex_u32("0403020G").is_err());
        assert_eq!(
            decode_hex_n::<8>("1D2E7A853FABD946"),
            Ok([0x1D, 0x2E, 0x7A, 0x85, 0x3F, 0xAB, 0xD9, 0x46])
        );
    }
}
