//! Free-text cheat listings.
//!
//! Cheat sites publish codes as plain text: a description line followed by
//! one or more code lines.
//!
//! ```text
//! Infinite Health
//! GMZE-T6VW-H2W3W
//! VED7-KAJZ-AMKYH
//! ```
//!
//! Every non-blank line is either a code line or a description. A
//! description applies to the next code line; consecutive descriptions keep
//! only the last one.
//!
//! * **ARMAX** listings take 13-symbol codes, dashes optional.
//! * **AR2** listings take `AAAAAAAA VVVVVVVV` hex pairs.
//!
//! Decoding can add or remove lines (ARMAX verifier lines, AR2 key lines), so
//! descriptions are matched to decoded rows by position.

use tracing::debug;

use crate::crypto::ar2::Ar2Engine;
use crate::formats::armax::{self, GameInfo};
use crate::keys::KeySet;
use crate::Error;

/// One code line and the description that preceded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<C> {
    pub description: Option<String>,
    pub code: C,
}

/// A parsed listing. `C` is a normalized ARMAX code string or an AR2
/// (address, value) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<C> {
    pub entries: Vec<Entry<C>>,
}

/// A decoded cheat row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cheat {
    pub description: Option<String>,
    pub address: u32,
    pub value: u32,
}

/// Output of decoding a listing.
#[derive(Debug)]
pub struct DecodedListing {
    pub cheats: Vec<Cheat>,
    /// Game metadata, for ARMAX listings.
    pub game: Option<GameInfo>,
    /// Batch-fatal error; `cheats` then holds undecoded diagnostics.
    pub error: Option<Error>,
}

impl DecodedListing {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn parse_with<C>(text: &str, parse_code: impl Fn(&str) -> Option<C>) -> Listing<C> {
    let mut entries = Vec::new();
    let mut description = None;
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match parse_code(line) {
            Some(code) => entries.push(Entry {
                description: description.take(),
                code,
            }),
            None => description = Some(line.to_owned()),
        }
    }
    if let Some(d) = description {
        debug!(description = %d, "description without a code");
    }
    Listing { entries }
}

fn parse_hex_word(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 8 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(s, 16).ok()
}

/// Parse an `AAAAAAAA VVVVVVVV` line.
pub fn parse_ar2_line(line: &str) -> Option<(u32, u32)> {
    let mut parts = line.split_whitespace();
    let addr = parse_hex_word(parts.next()?)?;
    let val = parse_hex_word(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((addr, val))
}

impl<C> Listing<C> {
    /// Attach descriptions to decoded pairs by position.
    pub fn cheats(&self, pairs: &[(u32, u32)]) -> Vec<Cheat> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, &(address, value))| Cheat {
                description: self.entries.get(i).and_then(|e| e.description.clone()),
                address,
                value,
            })
            .collect()
    }
}

impl Listing<String> {
    pub fn parse_armax(text: &str) -> Self {
        parse_with(text, |line| {
            let code = armax::normalize(line);
            armax::alpha_to_bin(&code).ok().map(|_| code)
        })
    }

    /// Decode every code as one ARMAX batch.
    pub fn decode_armax(&self, keys: &KeySet) -> DecodedListing {
        let codes: Vec<&str> = self.entries.iter().map(|e| e.code.as_str()).collect();
        let seeds = keys.round_seeds();
        let decoded = armax::decode_batch_with(&codes, keys.armax_ar2_key, &seeds);
        DecodedListing {
            cheats: self.cheats(&decoded.pairs),
            game: Some(decoded.game),
            error: decoded.error,
        }
    }
}

impl Listing<(u32, u32)> {
    pub fn parse_ar2(text: &str) -> Self {
        parse_with(text, parse_ar2_line)
    }

    /// Decode the pairs with an AR2 engine seeded from `keys.ar2_seed`.
    pub fn decode_ar2(&self, keys: &KeySet) -> DecodedListing {
        let words: Vec<u32> = self
            .entries
            .iter()
            .flat_map(|e| [e.code.0, e.code.1])
            .collect();
        let mut engine = Ar2Engine::new(keys.ar2_seed);
        let out = engine.batch_decrypt(&words);
        let pairs: Vec<(u32, u32)> = out.chunks_exact(2).map(|c| (c[0], c[1])).collect();
        DecodedListing {
            cheats: self.cheats(&pairs),
            game: None,
            error: None,
        }
    }
}
