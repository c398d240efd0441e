//! Values stored in a section palette.
//!
//! A section is generic over its value type. [`BlockStateId`] is the value
//! the world server stores for block data: a runtime state ID assigned by
//! the block catalog, where 0 is air so that zeroed memory means empty
//! space.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Runtime block state identifier stored in each palette entry.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BlockStateId(pub i32);

impl BlockStateId {
    /// The air block.
    pub const AIR: BlockStateId = BlockStateId(0);
}

impl fmt::Display for BlockStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<i32> for BlockStateId {
    fn from(value: i32) -> Self {
        BlockStateId(value)
    }
}

/// Conversion between a palette value and its signed 32-bit wire form.
pub trait WireValue: Sized {
    /// Returns the value written to the wire.
    fn to_wire(self) -> i32;

    /// Converts a decoded wire value, or returns `None` if it is out of range.
    fn from_wire(raw: i32) -> Option<Self>;
}

impl WireValue for BlockStateId {
    fn to_wire(self) -> i32 {
        self.0
    }

    fn from_wire(raw: i32) -> Option<Self> {
        Some(BlockStateId(raw))
    }
}

impl WireValue for i32 {
    fn to_wire(self) -> i32 {
        self
    }

    fn from_wire(raw: i32) -> Option<Self> {
        Some(raw)
    }
}

impl WireValue for u16 {
    fn to_wire(self) -> i32 {
        i32::from(self)
    }

    fn from_wire(raw: i32) -> Option<Self> {
        u16::try_from(raw).ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
