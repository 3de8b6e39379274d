//! Tile flag tokens as they appear in the `flags` property.
//!
//! A flag string is a pipe-delimited set of symbolic tokens, e.g.
//! `"LADDER|CLIFF"` or `"PATH|RIGHT"`. The literal `NULL` marks a tile
//! with no special behaviour and must not be combined with anything else.

use bitflags::bitflags;
use serde::{Serialize, Serializer};
use thiserror::Error;

bitflags! {
    /// Decoded flag set. Bit values are part of the binary export format.
    #[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Hash)]
    pub struct TileFlags: u16 {
        const NULL   = 1 << 0;
        const WALL   = 1 << 1;
        const LADDER = 1 << 2;
        const CLIFF  = 1 << 3;
        const VOID   = 1 << 4;
        const PATH   = 1 << 5;
        const LEFT   = 1 << 6;
        const RIGHT  = 1 << 7;
        const UP     = 1 << 8;
        const DOWN   = 1 << 9;
    }
}

bitflags! {
    /// Tile edges a path connects to.
    #[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Hash)]
    pub struct Edges: u8 {
        const UP    = 1 << 0;
        const DOWN  = 1 << 1;
        const LEFT  = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagParseError {
    #[error("unknown tile flag `{0}`")]
    UnknownFlag(String),
}

/// Splits a raw flag string into trimmed tokens. Empty tokens are kept so
/// callers can decide what to do with `"WALL|"`.
pub fn tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split('|').map(str::trim)
}

impl TileFlags {
    pub const DIRECTIONS: Self = Self::LEFT.union(Self::RIGHT).union(Self::UP).union(Self::DOWN);

    /// Decodes a single token. `""` and `NONE` decode to the empty set.
    pub fn from_token(token: &str) -> Option<Self> {
        let flag = match token {
            "NULL" => Self::NULL,
            "WALL" => Self::WALL,
            "LADDER" => Self::LADDER,
            "CLIFF" => Self::CLIFF,
            "VOID" => Self::VOID,
            "PATH" => Self::PATH,
            "LEFT" => Self::LEFT,
            "RIGHT" => Self::RIGHT,
            "UP" => Self::UP,
            "DOWN" => Self::DOWN,
            "" | "NONE" => Self::empty(),
            _ => return None,
        };
        Some(flag)
    }

    /// Decodes a whole `flags` property value, stopping at the first unknown token.
    pub fn parse_tokens(value: &str) -> Result<Self, FlagParseError> {
        tokens(value).try_fold(Self::empty(), |flags, token| {
            Self::from_token(token)
                .map(|flag| flags | flag)
                .ok_or_else(|| FlagParseError::UnknownFlag(token.to_string()))
        })
    }

    /// Encodes back into the pipe-delimited form, in bit order.
    pub fn to_tokens(self) -> String {
        self.iter_names()
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Regions that never block movement: ladders and walkways.
    pub fn is_sensor(self) -> bool {
        self.intersects(Self::LADDER | Self::PATH)
    }

    pub fn is_blocking(self) -> bool {
        self.contains(Self::WALL) && !self.is_sensor()
    }

    pub fn directions(self) -> Edges {
        let mut edges = Edges::empty();
        edges.set(Edges::UP, self.contains(Self::UP));
        edges.set(Edges::DOWN, self.contains(Self::DOWN));
        edges.set(Edges::LEFT, self.contains(Self::LEFT));
        edges.set(Edges::RIGHT, self.contains(Self::RIGHT));
        edges
    }
}

impl Edges {
    pub fn to_tokens(self) -> String {
        self.iter_names()
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
            .join("|")
    }
}

// Serialized in the same pipe-delimited form the `flags` property uses.
impl Serialize for TileFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_tokens())
    }
}

impl Serialize for Edges {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_tokens())
    }
}
