//! Frozen decode vectors.
//!
//! Expected values were captured from a reference decoder; any change in
//! output is a regression.

use cheatkit::Error;
use cheatkit::crypto::ar2::{AR1_SEED, Ar2Engine};
use cheatkit::crypto::armax::{RoundSeeds, decrypt_block};
use cheatkit::formats::armax::{
    GameInfo, PS2_AR2_KEY, alpha_to_bin, batch_decrypt, decode_batch, read_verifier_length,
};

const TWO_LINE: [&str; 2] = ["GMZET6VWH2W3W", "VED7KAJZAMKYH"];

fn encoded(codes: &[&str]) -> Vec<u32> {
    codes
        .iter()
        .flat_map(|c| alpha_to_bin(c).unwrap())
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
// ARMAX
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn known_code_before_and_after_rounds() {
    let [bin0, bin1] = alpha_to_bin("CEB513B0BNBKA").unwrap();
    assert_eq!((bin0, bin1), (0x6396_508D, 0x605D_5735));
    assert_eq!(
        decrypt_block(bin0, bin1, RoundSeeds::standard()),
        (0x9D37_EC84, 0x81BC_FAE3)
    );
}

#[test]
fn known_good_batch_passes_crc() {
    let mut codes = encoded(&TWO_LINE);
    let game = batch_decrypt(&mut codes, RoundSeeds::standard()).unwrap();
    assert_eq!(game.game_id, 2543);
    assert_eq!(game.region, 1);
    assert_eq!(codes[0] >> 28, 1);
}

/// Every single-bit flip of the encoded batch, decrypted and checked.
/// A 4-bit checksum lets about 1 in 16 through; this batch lets exactly 10
/// of 128 through.
#[test]
fn single_bit_flips_rarely_pass_crc() {
    let base = encoded(&TWO_LINE);
    let mut passed = Vec::new();
    for word in 0..base.len() {
        for bit in 0..32 {
            let mut codes = base.clone();
            codes[word] ^= 1 << bit;
            if batch_decrypt(&mut codes, RoundSeeds::standard()).is_ok() {
                passed.push((word, bit));
            }
        }
    }
    assert_eq!(
        passed,
        [
            (0, 14),
            (0, 16),
            (0, 26),
            (1, 21),
            (1, 29),
            (2, 16),
            (2, 19),
            (2, 27),
            (3, 3),
            (3, 27)
        ]
    );
}

#[test]
fn verifier_terminated_immediately_is_one_line() {
    assert_eq!(read_verifier_length(&[0xFFFF_FFFF, 0x0080_0000]).unwrap(), 1);
    assert_eq!(read_verifier_length(&[0, 0xFFFF_FFFF]).unwrap(), 1);
}

#[test]
fn end_to_end_two_line_code() {
    let d = decode_batch(&TWO_LINE, PS2_AR2_KEY);
    assert!(d.is_ok());
    assert!(d.game.game_id < 1 << 13);
    assert!(d.game.region < 4);
    assert_eq!(
        d.pairs,
        [(0x14F7_AABF, 0x1180_0000), (0x0447_80D8, 0x1000_0020)]
    );
}

#[test]
fn end_to_end_single_line_fails_crc() {
    let d = decode_batch(&["GMZET6VWH2W3W"], PS2_AR2_KEY);
    assert!(!d.is_ok());
    assert!(matches!(d.error, Some(Error::CrcMismatch { .. })));
    assert_eq!(d.pairs.len(), 1);
}

#[test]
fn other_single_lines_fail_crc_with_metadata() {
    let cases = [
        ("VED7KAJZAMKYH", (0xD67E_B7F2, 0xA39B_A9CC), 3325, 3),
        ("1E88A92EA7GRR", (0xE47A_B407, 0xD28C_3D9A), 2293, 2),
        ("CEB513B0BNBKA", (0xB501_B331, 0x9C9D_B16C), 2563, 0),
    ];
    for (code, pair, game_id, region) in cases {
        let d = decode_batch(&[code], PS2_AR2_KEY);
        assert!(matches!(d.error, Some(Error::CrcMismatch { .. })), "{code}");
        assert_eq!(d.pairs, [pair], "{code}");
        assert_eq!(d.game, GameInfo { game_id, region }, "{code}");
    }
}

// ═══════════════════════════════════════════════════════════════════════
// AR2
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn ar2_key_line_switches_seed() {
    let mut engine = Ar2Engine::new(AR1_SEED);
    let out = engine.batch_decrypt(&[0x0E3C_7DF2, 0x1853_E59E, 0xDE8C_C254, 0xBCA9_9A82]);
    assert_eq!(out, [0x2012_3456, 0x0000_FFFF]);
    assert_eq!(engine.seed(), PS2_AR2_KEY.to_be_bytes());
}

#[test]
fn ar2_engines_do_not_share_state() {
    let mut a = Ar2Engine::new(AR1_SEED);
    let b = Ar2Engine::new(AR1_SEED);
    a.batch_decrypt(&[0x0E3C_7DF2, 0x1853_E59E]);
    assert_ne!(a.seed(), b.seed());
    assert_eq!(b.seed(), AR1_SEED.to_be_bytes());
}
