//! Key material for the two code formats.
//!
//! * **AR2 seed** - the 4-byte seed a raw AR2/GS2 listing starts from. The
//!   listing can replace it mid-stream with key lines.
//! * **ARMAX AR2 key** - the seed used for AR2 lines wrapped inside an ARMAX
//!   batch.
//! * **ARMAX seed table** - the 8-byte table the 32 ARMAX round seeds are
//!   derived from.
//!
//! Every field has the PS2 value as its default, so most callers never load
//! anything. This module is a plain data container; the ciphers live in
//! [`crate::crypto`].
//!
//! ## Key file format
//! Simple `name = hex_value` text, one entry per line, comments prefixed
//! with `;`:
//!
//! ```text
//! ; PS2 defaults
//! ar2_seed = 05100518
//! armax_ar2_key = 04030209
//! armax_seed_table = 1D2E7A853FABD946
//! ```

use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read};

use tracing::debug;

use crate::crypto::ar2::AR1_SEED;
use crate::crypto::armax::{RoundSeeds, SEED_SUB_TABLE};
use crate::formats::armax::PS2_AR2_KEY;
use crate::utils::{decode_hex_n, hex_u32};
use crate::{Error, Result};

/// All keys needed to decode AR2 and ARMAX codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySet {
    /// Starting seed for raw AR2 listings.
    pub ar2_seed: u32,
    /// Seed for AR2 lines that follow an ARMAX verifier.
    pub armax_ar2_key: u32,
    /// Sub-table fed to ARMAX round-seed generation.
    pub armax_seed_table: [u8; 8],
}

impl Default for KeySet {
    fn default() -> Self {
        Self {
            ar2_seed: AR1_SEED,
            armax_ar2_key: PS2_AR2_KEY,
            armax_seed_table: SEED_SUB_TABLE,
        }
    }
}

impl KeySet {
    /// Create a key set with the PS2 defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override keys from a `name = hex` reader.
    ///
    /// Lines beginning with `;` and blank lines are ignored. Unknown key
    /// names are skipped so that files can carry extra entries; a known name
    /// with a malformed value is an error.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<()> {
        let buf = BufReader::new(reader);
        for line in buf.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            let Some((name, value)) = line.split_once('=') else {
                continue;
            };
            let (name, value) = (name.trim(), value.trim());
            match name {
                "ar2_seed" => {
                    self.ar2_seed = hex_u32(value).map_err(|_| Error::Parse("bad ar2_seed"))?;
                }
                "armax_ar2_key" => {
                    self.armax_ar2_key =
                        hex_u32(value).map_err(|_| Error::Parse("bad armax_ar2_key"))?;
                }
                "armax_seed_table" => {
                    self.armax_seed_table = decode_hex_n::<8>(value)
                        .map_err(|_| Error::Parse("bad armax_seed_table"))?;
                }
                _ => debug!(name, "unknown key name"),
            }
        }
        Ok(())
    }

    /// Round seeds for [`Self::armax_seed_table`]. The default table reuses
    /// the process-wide [`RoundSeeds::standard`].
    pub fn round_seeds(&self) -> Cow<'static, RoundSeeds> {
        if self.armax_seed_table == SEED_SUB_TABLE {
            Cow::Borrowed(RoundSeeds::standard())
        } else {
            Cow::Owned(RoundSeeds::from_sub_table(&self.armax_seed_table))
        }
    }
}
