//! Code ciphers.
//!
//! Both engines operate on raw 32-bit words. Text handling, checksums, and
//! the verifier that decides which decrypted words are ARMAX metadata live
//! in [`crate::formats::armax`].
//!
//! The implementations are meant for **decoding cheat codes** only. They are
//! not constant-time and make no attempt to resist cryptanalysis.
//!
//! ## Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`ar2`]   | AR2/GS2 byte cipher with a rolling 4-byte seed |
//! | [`armax`] | ARMAX 16-round Feistel cipher and round-seed generation |
//!
//! ## Key hierarchy (brief)
//!
//! ```text
//! SEED_SUB_TABLE (8 bytes)
//!   └── generate_seeds → RoundSeeds (32 words)
//!         └── decrypt_block for every ARMAX line
//!
//! AR2 seed (4 bytes: type, index, type, index)
//!   └── decrypt_word for every AR2 word
//!         └── 0xDEADFACE pair → replaces the seed mid-stream
//! ```

pub mod ar2;
pub mod armax;
