//! Palette-compressed block storage for 16×16×16 chunk sections.
//!
//! Each cell stores a small index into a per-section palette. Indices are
//! bit-packed at the narrowest width in the fixed tier table that can address
//! the palette, and the packed array is re-packed in place whenever a new
//! value pushes the palette past that width.

pub mod bit_packed;
pub mod container;
pub mod error;
pub mod palette;
pub mod profile;
pub mod value;
pub mod varint;
pub mod wire;

pub use bit_packed::BitPackedArray;
pub use container::{PalettedContainer, SECTION_SIZE, SECTION_VOLUME};
pub use error::SectionError;
pub use palette::Palette;
pub use profile::Profile;
pub use value::{BlockStateId, WireValue};
pub use wire::{NETWORK_ENCODING_FLAG, descriptor};

/// Block data for one chunk section.
pub type BlockSection = PalettedContainer<BlockStateId>;
