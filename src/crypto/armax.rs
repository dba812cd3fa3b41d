//! Action Replay MAX block cipher.
//!
//! ## Structure
//!
//! ARMAX encrypts each code line (two 32-bit words) with a 16-round Feistel
//! network over a 64-bit block, the same shape as DES:
//!
//! ```text
//! (addr, val)
//!   └── unscramble1          fixed initial bit permutation
//!         └── 16 rounds      addr ^= F(val, k[i], k[i+1]); val ^= F(addr, ...)
//!               └── unscramble2   fixed final bit permutation
//! ```
//!
//! `F` combines eight fixed 64-entry substitution tables, each indexed by a
//! 6-bit slice of the round input.
//!
//! ## Round seeds
//!
//! The 32 round-seed words are not carried by the codes. They are derived
//! once from a fixed 8-byte table by [`generate_seeds`] and shared by every
//! code. [`RoundSeeds::standard`] returns that table, built on first use.
//!
//! Only the decryption direction is implemented.

use std::sync::OnceLock;

/// The 8-byte table every ARMAX round-seed set is derived from.
pub const SEED_SUB_TABLE: [u8; 8] = [0x1D, 0x2E, 0x7A, 0x85, 0x3F, 0xAB, 0xD9, 0x46];

// 1-based bit positions in the sub-table, selecting the 56 key bits.
const KEY_PERM: [u8; 56] = [
    0x39, 0x31, 0x29, 0x21, 0x19, 0x11, 0x09, 0x01, 0x3A, 0x32, 0x2A, 0x22, 0x1A, 0x12,
    0x0A, 0x02, 0x3B, 0x33, 0x2B, 0x23, 0x1B, 0x13, 0x0B, 0x03, 0x3C, 0x34, 0x2C, 0x24,
    0x3F, 0x37, 0x2F, 0x27, 0x1F, 0x17, 0x0F, 0x07, 0x3E, 0x36, 0x2E, 0x26, 0x1E, 0x16,
    0x0E, 0x06, 0x3D, 0x35, 0x2D, 0x25, 0x1D, 0x15, 0x0D, 0x05, 0x1C, 0x14, 0x0C, 0x04,
];

const BIT_MASKS: [u8; 8] = [0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01];

// Left-rotation offset of the 56-bit key selection for each of the 16 rounds.
const ROUND_SHIFTS: [u8; 16] = [
    0x01, 0x02, 0x04, 0x06, 0x08, 0x0A, 0x0C, 0x0E, 0x0F, 0x11, 0x13, 0x15, 0x17, 0x19, 0x1B, 0x1C,
];

// Selects 48 of the 56 rotated key bits, six per round-seed byte.
const COMPRESS_PERM: [u8; 48] = [
    0x0E, 0x11, 0x0B, 0x18, 0x01, 0x05, 0x03, 0x1C, 0x0F, 0x06, 0x15, 0x0A,
    0x17, 0x13, 0x0C, 0x04, 0x1A, 0x08, 0x10, 0x07, 0x1B, 0x14, 0x0D, 0x02,
    0x29, 0x34, 0x1F, 0x25, 0x2F, 0x37, 0x1E, 0x28, 0x33, 0x2D, 0x21, 0x30,
    0x2C, 0x31, 0x27, 0x38, 0x22, 0x35, 0x2E, 0x2A, 0x32, 0x24, 0x1D, 0x20,
];

/// Derive the 32 round-seed words from an 8-byte sub-table.
///
/// With `reverse` unset the seed pairs are reordered last-to-first, which is
/// the order decryption consumes them in.
pub fn generate_seeds(sub_table: &[u8; 8], reverse: bool) -> [u32; 32] {
    let mut selected = [false; 56];
    for (bit, &pos) in selected.iter_mut().zip(KEY_PERM.iter()) {
        let p = (pos - 1) as usize;
        *bit = sub_table[p >> 3] & BIT_MASKS[p & 7] != 0;
    }

    let mut seeds = [0u32; 32];
    for (round, &shift) in ROUND_SHIFTS.iter().enumerate() {
        // Both 28-bit halves rotate independently.
        let mut rotated = [false; 56];
        for (j, bit) in rotated.iter_mut().enumerate() {
            let mut k = shift as usize + j;
            if j > 0x1B {
                if k > 0x37 {
                    k -= 0x1C;
                }
            } else if k > 0x1B {
                k -= 0x1C;
            }
            *bit = selected[k];
        }

        let mut packed = [0u8; 8];
        for (j, &pos) in COMPRESS_PERM.iter().enumerate() {
            if rotated[(pos - 1) as usize] {
                packed[j / 6] |= BIT_MASKS[j % 6] >> 2;
            }
        }
        seeds[round * 2] = u32::from_be_bytes([packed[0], packed[2], packed[4], packed[6]]);
        seeds[round * 2 + 1] = u32::from_be_bytes([packed[1], packed[3], packed[5], packed[7]]);
    }

    if !reverse {
        for (n, i) in (0..16).step_by(2).enumerate() {
            let j = 0x1F - 2 * n;
            seeds.swap(i, j - 1);
            seeds.swap(i + 1, j);
        }
    }
    seeds
}

/// The 32 round-seed words consumed by [`decrypt_block`], two per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSeeds([u32; 32]);

impl RoundSeeds {
    /// Build the decryption seed order from `sub_table`.
    pub fn from_sub_table(sub_table: &[u8; 8]) -> Self {
        Self(generate_seeds(sub_table, false))
    }

    /// The seeds for [`SEED_SUB_TABLE`], computed once per process.
    pub fn standard() -> &'static RoundSeeds {
        static STANDARD: OnceLock<RoundSeeds> = OnceLock::new();
        STANDARD.get_or_init(|| Self::from_sub_table(&SEED_SUB_TABLE))
    }

    pub fn words(&self) -> &[u32; 32] {
        &self.0
    }
}

/// Initial permutation of a block. Unkeyed.
pub fn unscramble1(mut addr: u32, mut val: u32) -> (u32, u32) {
    val = val.rotate_left(4);

    let mut tmp = (addr ^ val) & 0xF0F0_F0F0;
    addr ^= tmp;
    val = (val ^ tmp).rotate_right(20);

    tmp = (addr ^ val) & 0xFFFF_0000;
    addr ^= tmp;
    val = (val ^ tmp).rotate_right(18);

    tmp = (addr ^ val) & 0x3333_3333;
    addr ^= tmp;
    val = (val ^ tmp).rotate_right(6);

    tmp = (addr ^ val) & 0x00FF_00FF;
    addr ^= tmp;
    val = (val ^ tmp).rotate_left(9);

    tmp = (addr ^ val) & 0xAAAA_AAAA;
    addr = (addr ^ tmp).rotate_left(1);
    val ^= tmp;

    (addr, val)
}

/// Final permutation of a block. Unkeyed.
///
/// Inverse of [`unscramble1`] with the halves exchanged: if
/// `unscramble1(a, v) == (x, y)` then `unscramble2(y, x) == (v, a)`.
pub fn unscramble2(mut addr: u32, mut val: u32) -> (u32, u32) {
    val = val.rotate_right(1);

    let mut tmp = (addr ^ val) & 0xAAAA_AAAA;
    val ^= tmp;
    addr = (addr ^ tmp).rotate_right(9);

    tmp = (addr ^ val) & 0x00FF_00FF;
    val ^= tmp;
    addr = (addr ^ tmp).rotate_left(6);

    tmp = (addr ^ val) & 0x3333_3333;
    val ^= tmp;
    addr = (addr ^ tmp).rotate_left(18);

    tmp = (addr ^ val) & 0xFFFF_0000;
    val ^= tmp;
    addr = (addr ^ tmp).rotate_left(20);

    tmp = (addr ^ val) & 0xF0F0_F0F0;
    val ^= tmp;
    addr = (addr ^ tmp).rotate_right(4);

    (addr, val)
}

// Substitution tables of the round function.
const SP0: [u32; 64] = [
    0x0101_0400, 0x0000_0000, 0x0001_0000, 0x0101_0404, 0x0101_0004, 0x0001_0404,
    0x0000_0004, 0x0001_0000, 0x0000_0400, 0x0101_0400, 0x0101_0404, 0x0000_0400,
    0x0100_0404, 0x0101_0004, 0x0100_0000, 0x0000_0004, 0x0000_0404, 0x0100_0400,
    0x0100_0400, 0x0001_0400, 0x0001_0400, 0x0101_0000, 0x0101_0000, 0x0100_0404,
    0x0001_0004, 0x0100_0004, 0x0100_0004, 0x0001_0004, 0x0000_0000, 0x0000_0404,
    0x0001_0404, 0x0100_0000, 0x0001_0000, 0x0101_0404, 0x0000_0004, 0x0101_0000,
    0x0101_0400, 0x0100_0000, 0x0100_0000, 0x0000_0400, 0x0101_0004, 0x0001_0000,
    0x0001_0400, 0x0100_0004, 0x0000_0400, 0x0000_0004, 0x0100_0404, 0x0001_0404,
    0x0101_0404, 0x0001_0004, 0x0101_0000, 0x0100_0404, 0x0100_0004, 0x0000_0404,
    0x0001_0404, 0x0101_0400, 0x0000_0404, 0x0100_0400, 0x0100_0400, 0x0000_0000,
    0x0001_0004, 0x0001_0400, 0x0000_0000, 0x0101_0004,
];

const SP1: [u32; 64] = [
    0x8010_8020, 0x8000_8000, 0x0000_8000, 0x0010_8020, 0x0010_0000, 0x0000_0020,
    0x8010_0020, 0x8000_8020, 0x8000_0020, 0x8010_8020, 0x8010_8000, 0x8000_0000,
    0x8000_8000, 0x0010_0000, 0x0000_0020, 0x8010_0020, 0x0010_8000, 0x0010_0020,
    0x8000_8020, 0x0000_0000, 0x8000_0000, 0x0000_8000, 0x0010_8020, 0x8010_0000,
    0x0010_0020, 0x8000_0020, 0x0000_0000, 0x0010_8000, 0x0000_8020, 0x8010_8000,
    0x8010_0000, 0x0000_8020, 0x0000_0000, 0x0010_8020, 0x8010_0020, 0x0010_0000,
    0x8000_8020, 0x8010_0000, 0x8010_8000, 0x0000_8000, 0x8010_0000, 0x8000_8000,
    0x0000_0020, 0x8010_8020, 0x0010_8020, 0x0000_0020, 0x0000_8000, 0x8000_0000,
    0x0000_8020, 0x8010_8000, 0x0010_0000, 0x8000_0020, 0x0010_0020, 0x8000_8020,
    0x8000_0020, 0x0010_0020, 0x0010_8000, 0x0000_0000, 0x8000_8000, 0x0000_8020,
    0x8000_0000, 0x8010_0020, 0x8010_8020, 0x0010_8000,
];

const SP2: [u32; 64] = [
    0x0000_0208, 0x0802_0200, 0x0000_0000, 0x0802_0008, 0x0800_0200, 0x0000_0000,
    0x0002_0208, 0x0800_0200, 0x0002_0008, 0x0800_0008, 0x0800_0008, 0x0002_0000,
    0x0802_0208, 0x0002_0008, 0x0802_0000, 0x0000_0208, 0x0800_0000, 0x0000_0008,
    0x0802_0200, 0x0000_0200, 0x0002_0200, 0x0802_0000, 0x0802_0008, 0x0002_0208,
    0x0800_0208, 0x0002_0200, 0x0002_0000, 0x0800_0208, 0x0000_0008, 0x0802_0208,
    0x0000_0200, 0x0800_0000, 0x0802_0200, 0x0800_0000, 0x0002_0008, 0x0000_0208,
    0x0002_0000, 0x0802_0200, 0x0800_0200, 0x0000_0000, 0x0000_0200, 0x0002_0008,
    0x0802_0208, 0x0800_0200, 0x0800_0008, 0x0000_0200, 0x0000_0000, 0x0802_0008,
    0x0800_0208, 0x0002_0000, 0x0800_0000, 0x0802_0208, 0x0000_0008, 0x0002_0208,
    0x0002_0200, 0x0800_0008, 0x0802_0000, 0x0800_0208, 0x0000_0208, 0x0802_0000,
    0x0002_0208, 0x0000_0008, 0x0802_0008, 0x0002_0200,
];

const SP3: [u32; 64] = [
    0x0080_2001, 0x0000_2081, 0x0000_2081, 0x0000_0080, 0x0080_2080, 0x0080_0081,
    0x0080_0001, 0x0000_2001, 0x0000_0000, 0x0080_2000, 0x0080_2000, 0x0080_2081,
    0x0000_0081, 0x0000_0000, 0x0080_0080, 0x0080_0001, 0x0000_0001, 0x0000_2000,
    0x0080_0000, 0x0080_2001, 0x0000_0080, 0x0080_0000, 0x0000_2001, 0x0000_2080,
    0x0080_0081, 0x0000_0001, 0x0000_2080, 0x0080_0080, 0x0000_2000, 0x0080_2080,
    0x0080_2081, 0x0000_0081, 0x0080_0080, 0x0080_0001, 0x0080_2000, 0x0080_2081,
    0x0000_0081, 0x0000_0000, 0x0000_0000, 0x0080_2000, 0x0000_2080, 0x0080_0080,
    0x0080_0081, 0x0000_0001, 0x0080_2001, 0x0000_2081, 0x0000_2081, 0x0000_0080,
    0x0080_2081, 0x0000_0081, 0x0000_0001, 0x0000_2000, 0x0080_0001, 0x0000_2001,
    0x0080_2080, 0x0080_0081, 0x0000_2001, 0x0000_2080, 0x0080_0000, 0x0080_2001,
    0x0000_0080, 0x0080_0000, 0x0000_2000, 0x0080_2080,
];

const SP4: [u32; 64] = [
    0x0000_0100, 0x0208_0100, 0x0208_0000, 0x4200_0100, 0x0008_0000, 0x0000_0100,
    0x4000_0000, 0x0208_0000, 0x4008_0100, 0x0008_0000, 0x0200_0100, 0x4008_0100,
    0x4200_0100, 0x4208_0000, 0x0008_0100, 0x4000_0000, 0x0200_0000, 0x4008_0000,
    0x4008_0000, 0x0000_0000, 0x4000_0100, 0x4208_0100, 0x4208_0100, 0x0200_0100,
    0x4208_0000, 0x4000_0100, 0x0000_0000, 0x4200_0000, 0x0208_0100, 0x0200_0000,
    0x4200_0000, 0x0008_0100, 0x0008_0000, 0x4200_0100, 0x0000_0100, 0x0200_0000,
    0x4000_0000, 0x0208_0000, 0x4200_0100, 0x4008_0100, 0x0200_0100, 0x4000_0000,
    0x4208_0000, 0x0208_0100, 0x4008_0100, 0x0000_0100, 0x0200_0000, 0x4208_0000,
    0x4208_0100, 0x0008_0100, 0x4200_0000, 0x4208_0100, 0x0208_0000, 0x0000_0000,
    0x4008_0000, 0x4200_0000, 0x0008_0100, 0x0200_0100, 0x4000_0100, 0x0008_0000,
    0x0000_0000, 0x4008_0000, 0x0208_0100, 0x4000_0100,
];

const SP5: [u32; 64] = [
    0x2000_0010, 0x2040_0000, 0x0000_4000, 0x2040_4010, 0x2040_0000, 0x0000_0010,
    0x2040_4010, 0x0040_0000, 0x2000_4000, 0x0040_4010, 0x0040_0000, 0x2000_0010,
    0x0040_0010, 0x2000_4000, 0x2000_0000, 0x0000_4010, 0x0000_0000, 0x0040_0010,
    0x2000_4010, 0x0000_4000, 0x0040_4000, 0x2000_4010, 0x0000_0010, 0x2040_0010,
    0x2040_0010, 0x0000_0000, 0x0040_4010, 0x2040_4000, 0x0000_4010, 0x0040_4000,
    0x2040_4000, 0x2000_0000, 0x2000_4000, 0x0000_0010, 0x2040_0010, 0x0040_4000,
    0x2040_4010, 0x0040_0000, 0x0000_4010, 0x2000_0010, 0x0040_0000, 0x2000_4000,
    0x2000_0000, 0x0000_4010, 0x2000_0010, 0x2040_4010, 0x0040_4000, 0x2040_0000,
    0x0040_4010, 0x2040_4000, 0x0000_0000, 0x2040_0010, 0x0000_0010, 0x0000_4000,
    0x2040_0000, 0x0040_4010, 0x0000_4000, 0x0040_0010, 0x2000_4010, 0x0000_0000,
    0x2040_4000, 0x2000_0000, 0x0040_0010, 0x2000_4010,
];

const SP6: [u32; 64] = [
    0x0020_0000, 0x0420_0002, 0x0400_0802, 0x0000_0000, 0x0000_0800, 0x0400_0802,
    0x0020_0802, 0x0420_0800, 0x0420_0802, 0x0020_0000, 0x0000_0000, 0x0400_0002,
    0x0000_0002, 0x0400_0000, 0x0420_0002, 0x0000_0802, 0x0400_0800, 0x0020_0802,
    0x0020_0002, 0x0400_0800, 0x0400_0002, 0x0420_0000, 0x0420_0800, 0x0020_0002,
    0x0420_0000, 0x0000_0800, 0x0000_0802, 0x0420_0802, 0x0020_0800, 0x0000_0002,
    0x0400_0000, 0x0020_0800, 0x0400_0000, 0x0020_0800, 0x0020_0000, 0x0400_0802,
    0x0400_0802, 0x0420_0002, 0x0420_0002, 0x0000_0002, 0x0020_0002, 0x0400_0000,
    0x0400_0800, 0x0020_0000, 0x0420_0800, 0x0000_0802, 0x0020_0802, 0x0420_0800,
    0x0000_0802, 0x0400_0002, 0x0420_0802, 0x0420_0000, 0x0020_0800, 0x0000_0000,
    0x0000_0002, 0x0420_0802, 0x0000_0000, 0x0020_0802, 0x0420_0000, 0x0000_0800,
    0x0400_0002, 0x0400_0800, 0x0000_0800, 0x0020_0002,
];

const SP7: [u32; 64] = [
    0x1000_1040, 0x0000_1000, 0x0004_0000, 0x1004_1040, 0x1000_0000, 0x1000_1040,
    0x0000_0040, 0x1000_0000, 0x0004_0040, 0x1004_0000, 0x1004_1040, 0x0004_1000,
    0x1004_1000, 0x0004_1040, 0x0000_1000, 0x0000_0040, 0x1004_0000, 0x1000_0040,
    0x1000_1000, 0x0000_1040, 0x0004_1000, 0x0004_0040, 0x1004_0040, 0x1004_1000,
    0x0000_1040, 0x0000_0000, 0x0000_0000, 0x1004_0040, 0x1000_0040, 0x1000_1000,
    0x0004_1040, 0x0004_0000, 0x0004_1040, 0x0004_0000, 0x1004_1000, 0x0000_1000,
    0x0000_0040, 0x1004_0040, 0x0000_1000, 0x0004_1040, 0x1000_1000, 0x0000_0040,
    0x1000_0040, 0x1004_0000, 0x1004_0040, 0x1000_0000, 0x0004_0000, 0x1000_1040,
    0x0000_0000, 0x1004_1040, 0x0004_0040, 0x1000_0040, 0x1004_0000, 0x1000_1000,
    0x1000_1040, 0x0000_0000, 0x1004_1040, 0x0004_1000, 0x0004_1000, 0x0000_1040,
    0x0000_1040, 0x0004_0040, 0x1000_0000, 0x1004_1000,
];

#[inline]
fn round_function(half: u32, k0: u32, k1: u32) -> u32 {
    let a = (half.rotate_right(4) ^ k0) as usize;
    let b = (half ^ k1) as usize;
    SP6[a & 0x3F]
        ^ SP4[(a >> 8) & 0x3F]
        ^ SP2[(a >> 16) & 0x3F]
        ^ SP0[(a >> 24) & 0x3F]
        ^ SP7[b & 0x3F]
        ^ SP5[(b >> 8) & 0x3F]
        ^ SP3[(b >> 16) & 0x3F]
        ^ SP1[(b >> 24) & 0x3F]
}

/// Decrypt one 64-bit block.
pub fn decrypt_block(addr: u32, val: u32, seeds: &RoundSeeds) -> (u32, u32) {
    let (mut addr, mut val) = unscramble1(addr, val);
    for k in seeds.0.chunks_exact(4) {
        addr ^= round_function(val, k[0], k[1]);
        val ^= round_function(addr, k[2], k[3]);
    }
    unscramble2(addr, val)
}

/// Decrypt one stored code line.
///
/// Stored words are byte-swapped relative to the block cipher's view, and
/// the decrypted halves come back exchanged.
pub fn decrypt_code(code: [u32; 2], seeds: &RoundSeeds) -> [u32; 2] {
    let (addr, val) = decrypt_block(code[0].swap_bytes(), code[1].swap_bytes(), seeds);
    [val.swap_bytes(), addr.swap_bytes()]
}

/// Decrypt every complete pair of `codes` in place. A trailing odd word is
/// left alone.
pub fn decrypt_codes(codes: &mut [u32], seeds: &RoundSeeds) {
    for pair in codes.chunks_exact_mut(2) {
        let [a, v] = decrypt_code([pair[0], pair[1]], seeds);
        pair[0] = a;
        pair[1] = v;
    }
}
