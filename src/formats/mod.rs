//! Text and framing layers around the ciphers.
//!
//! All modules follow the same conventions:
//!
//! * **Text in, words out** - parsing turns human-entered code text into
//!   32-bit words; rendering turns decoded words back into text.
//! * **Batch-level recovery** - a malformed line is logged and skipped; only
//!   checksum and verifier failures fail a batch, and those still hand back
//!   the words decoded so far.
//! * **No I/O** - callers read and write files themselves.
//!
//! ## Format overview
//!
//! | Module      | Format | Description |
//! |-------------|--------|-------------|
//! | [`armax`]   | ARMAX  | Code text, CRC, verifier framing, and the batch decode pipeline |
//! | [`listing`] | Text   | Description + code listings for ARMAX and AR2 |
//! | [`pnach`]   | PNACH  | `patch=1,EE,...` emulator patch lines |

pub mod armax;
pub mod listing;
pub mod pnach;
