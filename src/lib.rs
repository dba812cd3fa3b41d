//! **cheatkit** - a decoder for PS2 Action Replay cheat codes.
//!
//! # Supported formats
//! | Module | Format |
//! |--------|--------|
//! | [`crypto::ar2`]      | AR2 / GS2 - seeded byte cipher over address/value words |
//! | [`crypto::armax`]    | ARMAX - 16-round Feistel block cipher |
//! | [`formats::armax`]   | ARMAX code text, checksum, and verifier framing |
//! | [`formats::listing`] | Plain-text cheat listings |
//! | [`formats::pnach`]   | PNACH emulator patch lines |
//!
//! # Entry points
//! * [`formats::armax::decode_batch`] - ARMAX code lines to (address, value)
//!   pairs, including any wrapped AR2 lines.
//! * [`crypto::ar2::Ar2Engine::batch_decrypt`] - raw AR2 words.

pub mod crypto;
pub mod error;
pub mod formats;
pub mod keys;
pub mod utils;

pub use error::{Error, Result};
