//! ARMAX code text, checksum, and verifier framing.
//!
//! ## Text form
//!
//! A code line is 13 symbols from a 32-symbol alphabet (digits and capitals
//! without `I`, `L`, `O`, `S`), usually written `XXXX-XXXX-XXXXX`. Each
//! symbol carries 5 bits; the first 64 of the 65 bits form two words.
//!
//! ## Decrypted layout
//!
//! After every line has been through [`crate::crypto::armax::decrypt_code`],
//! the flat word list starts with a bitstream, read MSB-first:
//!
//! | Word | Bits | Field |
//! |------|------|-------|
//! | 0 | 0-3   | 4-bit checksum over the whole list (with these bits zeroed) |
//! | 0 | 4-16  | game id (13 bits) |
//! | 0-1 | 17-39 | reserved fields (19 + 1 + 1 bits), then region (2 bits) |
//! | 1 | 40-   | verifier: size-classed records ended by a set terminator bit |
//!
//! The verifier's length decides how many lines are ARMAX metadata. Any lines
//! after it are AR2 ciphertext that was wrapped in ARMAX encryption, and get a
//! second pass through [`crate::crypto::ar2`].

use tracing::{debug, warn};

use crate::crypto::ar2::Ar2Engine;
use crate::crypto::armax::{RoundSeeds, decrypt_codes};
use crate::utils::BitReader;
use crate::{Error, Result};

/// The 32 code symbols, in value order.
pub const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRTUVWXYZ";

/// Symbols in one code line.
pub const CODE_LEN: usize = 13;

/// Value paired with a dangling final address word.
pub const MISSING_VALUE: u32 = 0xDEAD_BEEF;

/// AR2 key used by the PS2 ARMAX device for wrapped AR2 lines.
pub const PS2_AR2_KEY: u32 = 0x0403_0209;

// Payload length in bits of each verifier size class.
const SIZE_CLASS_BITS: [u32; 8] = [6, 10, 12, 19, 19, 8, 7, 32];

// Bits of the game-id/region header counted against the first line.
const HEADER_BITS: u32 = 24;

const CRC_TABLE_HI: [u16; 16] = [
    0x0000, 0x1081, 0x2102, 0x3183, 0x4204, 0x5285, 0x6306, 0x7387, 0x8408, 0x9489, 0xA50A,
    0xB58B, 0xC60C, 0xD68D, 0xE70E, 0xF78F,
];
const CRC_TABLE_LO: [u16; 16] = [
    0x0000, 0x1189, 0x2312, 0x329B, 0x4624, 0x57AD, 0x6536, 0x74BF, 0x8C48, 0x9DC1, 0xAF5A,
    0xBED3, 0xCA6C, 0xDBE5, 0xE97E, 0xF8F7,
];

/// Strip dashes and whitespace and uppercase.
pub fn normalize(code: &str) -> String {
    code.chars()
        .filter(|&c| c != '-' && !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Whether `line` is a well-formed code once normalized.
pub fn is_armax_code(line: &str) -> bool {
    alpha_to_bin(&normalize(line)).is_ok()
}

/// Render a normalized 13-symbol code as `XXXX-XXXX-XXXXX`.
///
/// Other lengths are returned unchanged.
pub fn format_code(code: &str) -> String {
    if code.len() != CODE_LEN || !code.is_ascii() {
        return code.to_owned();
    }
    format!("{}-{}-{}", &code[..4], &code[4..8], &code[8..])
}

fn symbol_value(c: char) -> Result<u32> {
    ALPHABET
        .iter()
        .position(|&a| a as char == c)
        .map(|v| v as u32)
        .ok_or(Error::InvalidCharacter(c))
}

/// Convert a normalized code to its two encrypted words.
///
/// The last bit of the final symbol is dropped.
pub fn alpha_to_bin(code: &str) -> Result<[u32; 2]> {
    let len = code.chars().count();
    if len != CODE_LEN {
        return Err(Error::InvalidLength(len));
    }
    let mut v = [0u32; CODE_LEN];
    for (slot, c) in v.iter_mut().zip(code.chars()) {
        *slot = symbol_value(c)?;
    }

    let bin0 = (v[0] << 27)
        | (v[1] << 22)
        | (v[2] << 17)
        | (v[3] << 12)
        | (v[4] << 7)
        | (v[5] << 2)
        | (v[6] >> 3);
    let bin1 = ((v[6] & 0x07) << 29)
        | (v[7] << 24)
        | (v[8] << 19)
        | (v[9] << 14)
        | (v[10] << 9)
        | (v[11] << 4)
        | (v[12] >> 1);
    Ok([bin0, bin1])
}

fn crc16_words(words: impl IntoIterator<Item = u32>) -> u16 {
    let mut crc = 0u16;
    for word in words {
        for byte in word.to_le_bytes() {
            let t = byte ^ (crc & 0xFF) as u8;
            crc = CRC_TABLE_HI[(t >> 4) as usize] ^ CRC_TABLE_LO[(t & 0x0F) as usize] ^ (crc >> 8);
        }
    }
    crc
}

/// CRC-16 over the words, each fed least significant byte first.
pub fn crc16(words: &[u32]) -> u16 {
    crc16_words(words.iter().copied())
}

fn fold_nibbles(crc: u16) -> u8 {
    ((crc >> 12) ^ (crc >> 8) ^ (crc >> 4) ^ crc) as u8 & 0x0F
}

/// The 4-bit checksum of `words`: the four nibbles of [`crc16`] XORed.
pub fn verify(words: &[u32]) -> u8 {
    fold_nibbles(crc16(words))
}

/// Game metadata carried by the first decrypted line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameInfo {
    /// 13-bit game identifier.
    pub game_id: u16,
    /// 2-bit region code.
    pub region: u8,
}

/// Read the game id and region from a decrypted list.
pub fn read_game_info(codes: &[u32]) -> Result<GameInfo> {
    let mut r = BitReader::new(codes, 0, 4);
    let game_id = r.read(13)? as u16;
    r.skip(19)?;
    r.skip(1)?;
    r.skip(1)?;
    let region = r.read(2)? as u8;
    Ok(GameInfo { game_id, region })
}

/// Compare the checksum stored in the top nibble of `codes[0]` with one
/// recomputed over the list with that nibble zeroed.
///
/// `codes` is never modified.
pub fn check_crc(codes: &[u32]) -> Result<()> {
    let Some((&first, rest)) = codes.split_first() else {
        return Err(Error::NoCodes);
    };
    let stored = (first >> 28) as u8;
    let masked = std::iter::once(first & 0x0FFF_FFFF).chain(rest.iter().copied());
    let computed = fold_nibbles(crc16_words(masked));
    if stored != computed {
        return Err(Error::CrcMismatch { stored, computed });
    }
    Ok(())
}

/// Decrypt every line of `codes` in place, then read the game metadata and
/// check the stored checksum.
///
/// On a checksum mismatch the words stay decrypted, so callers can still
/// show them.
pub fn batch_decrypt(codes: &mut [u32], seeds: &RoundSeeds) -> Result<GameInfo> {
    decrypt_codes(codes, seeds);
    let game = read_game_info(codes)?;
    check_crc(codes)?;
    Ok(game)
}

/// Count the lines occupied by the verifier, starting at bit 8 of word 1.
///
/// The first line is always counted; every further started 64 bits of
/// verifier beyond the 24 header bits adds one.
pub fn read_verifier_length(codes: &[u32]) -> Result<usize> {
    let mut r = BitReader::new(codes, 1, 8);
    let mut bits = 1u32;
    let mut terminator = r.read(1)?;
    while terminator == 0 {
        let class = r.read(3)?;
        let len = *SIZE_CLASS_BITS
            .get(class as usize)
            .ok_or(Error::UnknownSizeClass(class))?;
        r.skip(len)?;
        terminator = r.read(1)?;
        bits += 3 + len + 1;
    }
    let extra = bits.saturating_sub(HEADER_BITS);
    Ok(1 + extra.div_ceil(64) as usize)
}

/// Result of [`decode_batch`].
///
/// A batch-fatal error still carries the words decoded so far, which may be
/// garbage but are useful for diagnostics.
#[derive(Debug)]
pub struct Decoded {
    /// Decoded (address, value) pairs.
    pub pairs: Vec<(u32, u32)>,
    pub game: GameInfo,
    /// Set when the batch failed; `pairs` then holds raw decrypted words.
    pub error: Option<Error>,
}

impl Decoded {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn failed(words: &[u32], game: GameInfo, error: Error) -> Self {
        warn!(error = %error, "armax batch failed");
        Self {
            pairs: to_pairs(words),
            game,
            error: Some(error),
        }
    }
}

fn to_pairs(words: &[u32]) -> Vec<(u32, u32)> {
    words
        .chunks(2)
        .map(|c| (c[0], c.get(1).copied().unwrap_or(MISSING_VALUE)))
        .collect()
}

/// Decode a batch of ARMAX code lines with the standard round seeds.
pub fn decode_batch<S: AsRef<str>>(codes: &[S], ar2_key: u32) -> Decoded {
    decode_batch_with(codes, ar2_key, RoundSeeds::standard())
}

/// Decode a batch of ARMAX code lines.
///
/// Lines that are not valid codes are logged and skipped. Lines after the
/// verifier are decrypted again as AR2 with an engine seeded from `ar2_key`.
pub fn decode_batch_with<S: AsRef<str>>(codes: &[S], ar2_key: u32, seeds: &RoundSeeds) -> Decoded {
    let mut words = Vec::with_capacity(codes.len() * 2);
    for code in codes {
        let code = code.as_ref();
        match alpha_to_bin(&normalize(code)) {
            Ok(w) => words.extend_from_slice(&w),
            Err(e) => warn!(code, error = %e, "skipping armax code"),
        }
    }
    if words.is_empty() {
        return Decoded::failed(&words, GameInfo::default(), Error::NoCodes);
    }

    decrypt_codes(&mut words, seeds);
    let game = match read_game_info(&words) {
        Ok(g) => g,
        Err(e) => return Decoded::failed(&words, GameInfo::default(), e),
    };
    if let Err(e) = check_crc(&words) {
        return Decoded::failed(&words, game, e);
    }
    let lines = match read_verifier_length(&words) {
        Ok(n) => n,
        Err(e) => return Decoded::failed(&words, game, e),
    };

    let split = (lines * 2).min(words.len());
    let (armax, tail) = words.split_at(split);
    debug!(
        game_id = game.game_id,
        region = game.region,
        armax_lines = lines,
        ar2_words = tail.len(),
        "armax batch decrypted"
    );

    let mut out = armax.to_vec();
    if !tail.is_empty() {
        let tail: Vec<u32> = tail.iter().map(|w| w.swap_bytes()).collect();
        let mut ar2 = Ar2Engine::new(ar2_key);
        out.extend(ar2.batch_decrypt(&tail));
    }
    Decoded {
        pairs: to_pairs(&out),
        game,
        error: None,
    }
}
