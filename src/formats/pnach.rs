//! PNACH patch text.
//!
//! Emulator patch files are plain text. Each decoded cheat becomes one
//! line:
//!
//! ```text
//! patch=1,EE,AAAAAAAA,extended,VVVVVVVV
//! ```
//!
//! This module only renders text; where it ends up is the caller's concern.

use std::fmt;

use crate::formats::listing::Cheat;

/// One `patch=` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchLine {
    pub address: u32,
    pub value: u32,
}

impl fmt::Display for PatchLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "patch=1,EE,{:08X},extended,{:08X}", self.address, self.value)
    }
}

impl From<(u32, u32)> for PatchLine {
    fn from((address, value): (u32, u32)) -> Self {
        Self { address, value }
    }
}

/// A patch document: header lines followed by described patches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchSet {
    pub game_title: Option<String>,
    pub comment: Option<String>,
    pub cheats: Vec<Cheat>,
}

impl PatchSet {
    pub fn new(cheats: Vec<Cheat>) -> Self {
        Self {
            cheats,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.game_title = Some(title.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl fmt::Display for PatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header = false;
        if let Some(title) = &self.game_title {
            writeln!(f, "gametitle={title}")?;
            header = true;
        }
        if let Some(comment) = &self.comment {
            writeln!(f, "comment={comment}")?;
            header = true;
        }
        if header {
            writeln!(f)?;
        }
        for cheat in &self.cheats {
            if let Some(desc) = &cheat.description {
                writeln!(f, "// {desc}")?;
            }
            writeln!(f, "{}", PatchLine::from((cheat.address, cheat.value)))?;
        }
        Ok(())
    }
}
