//! Action Replay 2 / GameShark 2 word cipher.
//!
//! AR2 codes are (address, value) pairs of 32-bit words. Each word is
//! decrypted byte-by-byte with one of eight cipher types; the type and a
//! 5-bit table index come from a 4-byte seed:
//!
//! | Seed byte | Use |
//! |-----------|-----|
//! | 0 | cipher type for the address word |
//! | 1 | table index for the address word |
//! | 2 | cipher type for the value word |
//! | 3 | table index for the value word |
//!
//! The seed is not fixed for a whole listing. A pair whose decrypted address
//! is [`KEY_ADDR`] is a key update: its decrypted value becomes the new seed
//! and the pair itself is dropped from the output.

use tracing::debug;

/// Decrypted address marking an in-stream seed update.
pub const KEY_ADDR: u32 = 0xDEAD_FACE;

/// Seed used for raw AR2 listings (the "AR1" seed).
pub const AR1_SEED: u32 = 0x0510_0518;

// Four 32-entry byte tables. Row `n` is selected by the cipher type, column
// by the 5-bit seed index.
const TABLES: [[u8; 32]; 4] = [
    [
        0x00, 0x1F, 0x9B, 0x69, 0xA5, 0x80, 0x90, 0xB2, 0xD7, 0x44, 0xEC, 0x75, 0x3B, 0x62, 0x0C,
        0xA3, 0xA6, 0xE4, 0x1F, 0x4C, 0x05, 0xE4, 0x44, 0x6E, 0xD9, 0x5B, 0x34, 0xE6, 0x08, 0x31,
        0x91, 0x72,
    ],
    [
        0x00, 0xAE, 0xF3, 0x7B, 0x12, 0xC9, 0x83, 0xF0, 0xA9, 0x57, 0x50, 0x08, 0x04, 0x81, 0x02,
        0x21, 0x96, 0x09, 0x0F, 0x90, 0xC3, 0x62, 0x27, 0x21, 0x3B, 0x22, 0x4E, 0x88, 0xF5, 0xC5,
        0x75, 0x91,
    ],
    [
        0x00, 0xE3, 0xA2, 0x45, 0x40, 0xE0, 0x09, 0xEA, 0x42, 0x65, 0x1C, 0xC1, 0xEB, 0xB0, 0x69,
        0x14, 0x01, 0xD2, 0x8E, 0xFB, 0xFA, 0x86, 0x09, 0x95, 0x1B, 0x61, 0x14, 0x0E, 0x99, 0x21,
        0xEC, 0x40,
    ],
    [
        0x00, 0x25, 0x6D, 0x4F, 0xC5, 0xCA, 0x04, 0x39, 0x3A, 0x7D, 0x0D, 0xF1, 0x43, 0x05, 0x71,
        0x66, 0x82, 0x31, 0x21, 0xD8, 0xFE, 0x4D, 0xC2, 0xC8, 0xCC, 0x09, 0xA0, 0x06, 0x49, 0xD5,
        0xF1, 0x83,
    ],
];

#[inline]
fn nibble_swap(b: u8) -> u8 {
    b.rotate_left(4)
}

/// Decrypt one AR2 code word.
///
/// `cipher` is the cipher type (0-7; larger values leave the word
/// unchanged) and `seed_index` is masked to 5 bits.
///
/// Bytes are numbered most significant first: `b[0]` is bits 24-31.
pub fn decrypt_word(code: u32, cipher: u8, seed_index: u8) -> u32 {
    let idx = (seed_index & 0x1F) as usize;
    let t = |row: usize| TABLES[row][idx];
    let t_rot = |row: usize, by: usize| TABLES[row][(idx + by) & 0x1F];

    let mut cipher = cipher;
    if cipher == 7 {
        if idx & 1 == 0 {
            return !code;
        }
        cipher = 1;
    }

    let mut b = code.to_be_bytes();
    match cipher {
        0 => {
            b[0] ^= t(0);
            b[1] ^= t(1);
            b[2] ^= t(2);
            b[3] ^= t(3);
        }
        1 => {
            b[0] = nibble_swap(b[0]) ^ t(0);
            b[1] = nibble_swap(b[1]) ^ t(2);
            b[2] = nibble_swap(b[2]) ^ t(3);
            b[3] = nibble_swap(b[3]) ^ t(1);
        }
        2 => {
            b[0] = b[0].wrapping_add(t(0));
            b[1] = b[1].wrapping_add(t(1));
            b[2] = b[2].wrapping_add(t(2));
            b[3] = b[3].wrapping_add(t(3));
        }
        3 => {
            b[0] = b[0].wrapping_sub(t(3));
            b[1] = b[1].wrapping_sub(t(2));
            b[2] = b[2].wrapping_sub(t(1));
            b[3] = b[3].wrapping_sub(t(0));
        }
        4 => {
            b[0] = (b[0] ^ t(0)).wrapping_add(t(0));
            b[1] = (b[1] ^ t(3)).wrapping_add(t(3));
            b[2] = (b[2] ^ t(1)).wrapping_add(t(1));
            b[3] = (b[3] ^ t(2)).wrapping_add(t(2));
        }
        5 => {
            b[0] = b[0].wrapping_sub(t(1)) ^ t(0);
            b[1] = b[1].wrapping_sub(t(2)) ^ t(1);
            b[2] = b[2].wrapping_sub(t(3)) ^ t(2);
            b[3] = b[3].wrapping_sub(t(0)) ^ t(3);
        }
        6 => {
            b[0] = b[0].wrapping_add(t_rot(0, 0));
            b[1] = b[1].wrapping_sub(t_rot(1, 1));
            b[2] = b[2].wrapping_add(t_rot(2, 2));
            b[3] = b[3].wrapping_sub(t_rot(3, 3));
        }
        _ => {}
    }
    u32::from_be_bytes(b)
}

/// AR2 decryption state: the rolling 4-byte seed.
///
/// Each engine owns its seed, so independent listings can be decoded
/// side by side without sharing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ar2Engine {
    seed: [u8; 4],
}

impl Default for Ar2Engine {
    fn default() -> Self {
        Self::new(AR1_SEED)
    }
}

impl Ar2Engine {
    /// Create an engine seeded with `key`.
    pub fn new(key: u32) -> Self {
        Self {
            seed: key.to_be_bytes(),
        }
    }

    /// Replace the seed. The most significant byte of `key` becomes the
    /// address cipher type.
    pub fn set_seed(&mut self, key: u32) {
        self.seed = key.to_be_bytes();
    }

    /// Current seed bytes.
    pub fn seed(&self) -> [u8; 4] {
        self.seed
    }

    /// Decrypt one (address, value) pair with the current seed.
    pub fn decrypt_pair(&self, addr: u32, val: u32) -> (u32, u32) {
        let [t0, i0, t1, i1] = self.seed;
        (decrypt_word(addr, t0, i0), decrypt_word(val, t1, i1))
    }

    /// Decrypt a flat list of words, two at a time.
    ///
    /// Key-update pairs reseed the engine and are left out of the result, so
    /// the output can be shorter than `codes`. A dangling final word is
    /// copied through undecrypted.
    pub fn batch_decrypt(&mut self, codes: &[u32]) -> Vec<u32> {
        let mut out = Vec::with_capacity(codes.len());
        let mut pairs = codes.chunks_exact(2);
        for pair in pairs.by_ref() {
            let (addr, val) = self.decrypt_pair(pair[0], pair[1]);
            if addr == KEY_ADDR {
                debug!("ar2 seed update: {val:08X}");
                self.set_seed(val);
                continue;
            }
            out.push(addr);
            out.push(val);
        }
        out.extend_from_slice(pairs.remainder());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Inverse of `decrypt_word` for cipher types 0-6, used only to build
    // ciphertext for the tests below.
    fn encrypt_word(plain: u32, cipher: u8, seed_index: u8) -> u32 {
        let idx = (seed_index & 0x1F) as usize;
        let t = |row: usize| TABLES[row][idx];
        let t_rot = |row: usize, by: usize| TABLES[row][(idx + by) & 0x1F];
        let mut b = plain.to_be_bytes();
        match cipher {
            0 => {
                b[0] ^= t(0);
                b[1] ^= t(1);
                b[2] ^= t(2);
                b[3] ^= t(3);
            }
            1 => {
                b[0] = nibble_swap(b[0] ^ t(0));
                b[1] = nibble_swap(b[1] ^ t(2));
                b[2] = nibble_swap(b[2] ^ t(3));
                b[3] = nibble_swap(b[3] ^ t(1));
            }
            2 => {
                b[0] = b[0].wrapping_sub(t(0));
                b[1] = b[1].wrapping_sub(t(1));
                b[2] = b[2].wrapping_sub(t(2));
                b[3] = b[3].wrapping_sub(t(3));
            }
            3 => {
                b[0] = b[0].wrapping_add(t(3));
                b[1] = b[1].wrapping_add(t(2));
                b[2] = b[2].wrapping_add(t(1));
                b[3] = b[3].wrapping_add(t(0));
            }
            4 => {
                b[0] = b[0].wrapping_sub(t(0)) ^ t(0);
                b[1] = b[1].wrapping_sub(t(3)) ^ t(3);
                b[2] = b[2].wrapping_sub(t(1)) ^ t(1);
                b[3] = b[3].wrapping_sub(t(2)) ^ t(2);
            }
            5 => {
                b[0] = (b[0] ^ t(0)).wrapping_add(t(1));
                b[1] = (b[1] ^ t(1)).wrapping_add(t(2));
                b[2] = (b[2] ^ t(2)).wrapping_add(t(3));
                b[3] = (b[3] ^ t(3)).wrapping_add(t(0));
            }
            6 => {
                b[0] = b[0].wrapping_sub(t_rot(0, 0));
                b[1] = b[1].wrapping_add(t_rot(1, 1));
                b[2] = b[2].wrapping_sub(t_rot(2, 2));
                b[3] = b[3].wrapping_add(t_rot(3, 3));
            }
            _ => unreachable!(),
        }
        u32::from_be_bytes(b)
    }

    #[test]
    fn known_words() {
        let expected: [(u32, u32); 9] = [
            (0x7B4F_1337, 0xB726_16BD),
            (0x4806_2AFC, 0x8403_A095),
            (0x7BAF_9BC7, 0xB746_963D),
            (0xC3EF_DB0F, 0x4DF4_44D3),
            (0xE4CA_A882, 0x5CB6_5678),
            (0xFE94_4240, 0xA5E6_D116),
            (0x7B22_3674, 0xB76B_5F3F),
            (0x4806_2AFC, 0xEDCB_A987),
            (0x1234_5678, 0x1234_5678),
        ];
        for (cipher, &(odd, even)) in expected.iter().enumerate() {
            assert_eq!(decrypt_word(0x1234_5678, cipher as u8, 3), odd, "type {cipher}");
            assert_eq!(decrypt_word(0x1234_5678, cipher as u8, 4), even, "type {cipher}");
        }
    }

    #[test]
    fn seed_index_is_masked() {
        assert_eq!(
            decrypt_word(0xCAFE_BABE, 2, 0x20 | 5),
            decrypt_word(0xCAFE_BABE, 2, 5)
        );
    }

    #[test]
    fn encrypt_then_decrypt_is_identity() {
        for cipher in 0..=6u8 {
            for idx in 0..32u8 {
                for &w in &[0u32, 0xFFFF_FFFF, 0x2012_3456, 0xDEAD_FACE, 0x0102_0304] {
                    let c = encrypt_word(w, cipher, idx);
                    assert_eq!(decrypt_word(c, cipher, idx), w, "type {cipher} idx {idx}");
                }
            }
        }
    }

    #[test]
    fn type7_even_index_is_complement() {
        for idx in (0..32u8).step_by(2) {
            let w = 0x1357_9BDF;
            assert_eq!(decrypt_word(w, 7, idx), !w);
            assert_eq!(decrypt_word(decrypt_word(w, 7, idx), 7, idx), w);
        }
    }

    #[test]
    fn type7_odd_index_is_type1() {
        for idx in (1..32u8).step_by(2) {
            assert_eq!(decrypt_word(0xA5A5_0F0F, 7, idx), decrypt_word(0xA5A5_0F0F, 1, idx));
        }
    }

    #[test]
    fn set_seed_stores_big_endian_bytes() {
        let mut e = Ar2Engine::default();
        assert_eq!(e.seed(), [0x05, 0x10, 0x05, 0x18]);
        e.set_seed(0x0403_0209);
        assert_eq!(e.seed(), [0x04, 0x03, 0x02, 0x09]);
    }

    #[test]
    fn batch_keeps_dangling_word() {
        let mut e = Ar2Engine::new(AR1_SEED);
        let out = e.batch_decrypt(&[
            0x1111_1111,
            0x2222_2222,
            0x3333_3333,
            0x4444_4444,
            0x5555_5555,
        ]);
        assert_eq!(
            out,
            [0xDD86_8EE9, 0x3E3C_4D85, 0x3BA4_B00F, 0xD012_63A7, 0x5555_5555]
        );
        assert_eq!(e.seed(), [0x05, 0x10, 0x05, 0x18]);
    }

    #[test]
    fn key_pair_reseeds_and_is_dropped() {
        let mut e = Ar2Engine::new(AR1_SEED);
        let out = e.batch_decrypt(&[0x0E3C_7DF2, 0x1853_E59E, 0xDE8C_C254, 0xBCA9_9A82]);
        assert_eq!(out, [0x2012_3456, 0x0000_FFFF]);
        assert_eq!(e.seed(), [0x04, 0x03, 0x02, 0x09]);
    }

    #[test]
    fn built_key_pair_round_trips() {
        let mut e = Ar2Engine::new(0x0207_0311);
        let [t0, i0, t1, i1] = e.seed();
        let key_addr = encrypt_word(KEY_ADDR, t0, i0);
        let key_val = encrypt_word(0x0600_0615, t1, i1);
        let addr = encrypt_word(0x2000_1000, 6, 0);
        let val = encrypt_word(0x0000_0063, 6, 0x15);
        let out = e.batch_decrypt(&[key_addr, key_val, addr, val]);
        assert_eq!(out, [0x2000_1000, 0x0000_0063]);
    }

    #[test]
    fn empty_and_single_word() {
        let mut e = Ar2Engine::default();
        assert!(e.batch_decrypt(&[]).is_empty());
        assert_eq!(e.batch_decrypt(&[0x1234_5678]), [0x1234_5678]);
    }
}
