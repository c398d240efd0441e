//! Bit-width tiers for packed palette indices.
//!
//! A [`Profile`] describes how paletted indices are laid out inside 32-bit
//! words. Entries never straddle a word boundary, so widths that do not
//! divide 32 leave the high bits of every word unused and the last word of a
//! section may be only partially filled.
//!
//! The tier table is fixed: `{1, 2, 3, 4, 5, 6, 8, 16}`. A palette needing 7
//! bits is stored at 8, and anything needing 9 to 16 bits is stored at 16.
//! Decoders on the other side of the wire only understand these widths.

use crate::SECTION_VOLUME;

/// Number of bits in one storage word.
pub const WORD_BITS: usize = u32::BITS as usize;

/// One bit-width tier of the packed index array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Profile {
    /// 1 bit per entry, up to 2 palette entries.
    #[default]
    Bits1,
    /// 2 bits per entry, up to 4 palette entries.
    Bits2,
    /// 3 bits per entry, up to 8 palette entries.
    Bits3,
    /// 4 bits per entry, up to 16 palette entries.
    Bits4,
    /// 5 bits per entry, up to 32 palette entries.
    Bits5,
    /// 6 bits per entry, up to 64 palette entries.
    Bits6,
    /// 8 bits per entry, up to 256 palette entries.
    Bits8,
    /// 16 bits per entry, up to 65 536 palette entries.
    Bits16,
}

impl Profile {
    /// Every tier, narrowest first.
    pub const ALL: [Profile; 8] = [
        Profile::Bits1,
        Profile::Bits2,
        Profile::Bits3,
        Profile::Bits4,
        Profile::Bits5,
        Profile::Bits6,
        Profile::Bits8,
        Profile::Bits16,
    ];

    /// The narrowest tier.
    pub const SMALLEST: Profile = Profile::Bits1;

    /// Largest palette any tier can address.
    pub const MAX_PALETTE_SIZE: usize = Profile::Bits16.max_palette_size();

    /// Returns the tier for an exact bit width, or `None` if the width is not
    /// part of the table.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(Profile::Bits1),
            2 => Some(Profile::Bits2),
            3 => Some(Profile::Bits3),
            4 => Some(Profile::Bits4),
            5 => Some(Profile::Bits5),
            6 => Some(Profile::Bits6),
            8 => Some(Profile::Bits8),
            16 => Some(Profile::Bits16),
            _ => None,
        }
    }

    /// Returns the narrowest tier able to address `size` palette entries.
    ///
    /// # Panics
    ///
    /// Panics if `size` exceeds [`Profile::MAX_PALETTE_SIZE`]. A 4096-cell
    /// section can never legitimately reference that many values.
    pub fn for_palette_size(size: usize) -> Self {
        match size {
            0..=2 => Profile::Bits1,
            3..=4 => Profile::Bits2,
            5..=8 => Profile::Bits3,
            9..=16 => Profile::Bits4,
            17..=32 => Profile::Bits5,
            33..=64 => Profile::Bits6,
            65..=256 => Profile::Bits8,
            257..=65_536 => Profile::Bits16,
            _ => panic!(
                "palette size {size} exceeds the widest profile ({} entries)",
                Self::MAX_PALETTE_SIZE
            ),
        }
    }

    /// Bits used by one entry.
    pub const fn bits(self) -> u8 {
        match self {
            Profile::Bits1 => 1,
            Profile::Bits2 => 2,
            Profile::Bits3 => 3,
            Profile::Bits4 => 4,
            Profile::Bits5 => 5,
            Profile::Bits6 => 6,
            Profile::Bits8 => 8,
            Profile::Bits16 => 16,
        }
    }

    /// Entries stored in one 32-bit word.
    pub const fn entries_per_word(self) -> usize {
        WORD_BITS / self.bits() as usize
    }

    /// Mask selecting one entry once shifted down to bit 0.
    pub const fn mask(self) -> u32 {
        (1u32 << self.bits()) - 1
    }

    /// Number of distinct palette indices this tier can store.
    pub const fn max_palette_size(self) -> usize {
        1usize << self.bits()
    }

    /// Words needed to hold a full section at this tier.
    pub const fn word_count(self) -> usize {
        SECTION_VOLUME.div_ceil(self.entries_per_word())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
