//! Palette-compressed storage for one 16×16×16 chunk section.
//!
//! A [`PalettedContainer`] keeps a palette of the distinct values present in
//! the section and a [`BitPackedArray`] of palette indices, one per cell. The
//! packed width follows the palette size: registering a value the current
//! profile cannot address re-packs the array into the next tier before the
//! cell is written.
//!
//! The container does no locking. Growth replaces the packed words and their
//! profile together, so callers sharing a container across threads must hold
//! their own lock for every get/set/clone sequence.

use std::hash::Hash;

use rustc_hash::FxHashSet;

use crate::bit_packed::BitPackedArray;
use crate::error::SectionError;
use crate::palette::Palette;
use crate::profile::Profile;

/// Side length of a section in cells.
pub const SECTION_SIZE: usize = 16;

/// Total number of cells in a section (16³).
pub const SECTION_VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;

/// Palette-compressed values for the 4096 cells of a chunk section.
///
/// Cells are addressed by flat index `(x << 8) | (z << 4) | y`. Cloning
/// produces a fully independent copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PalettedContainer<V> {
    /// Distinct values, indexed by the packed entries.
    palette: Palette<V>,
    /// Packed palette indices.
    storage: BitPackedArray,
}

impl<V: Copy + Eq + Hash + Default> PalettedContainer<V> {
    /// Creates a container with no values registered yet.
    ///
    /// `palette_size_hint` reserves palette capacity and picks the starting
    /// profile, so a caller expecting many distinct values can skip the
    /// intermediate growth steps. Until the first [`set`](Self::set), every
    /// cell reads as `V::default()`; afterwards unset cells read as the first
    /// value set.
    pub fn empty(palette_size_hint: usize) -> Self {
        let hint = palette_size_hint.min(Profile::MAX_PALETTE_SIZE);
        Self {
            palette: Palette::with_capacity(hint),
            storage: BitPackedArray::new(Profile::for_palette_size(hint)),
        }
    }

    /// Creates a container where every cell holds `value`.
    ///
    /// The palette has a single entry and the zeroed 1-bit words already
    /// point at it.
    pub fn filled_with(value: V) -> Self {
        Self {
            palette: Palette::from_entries(vec![value]),
            storage: BitPackedArray::new(Profile::SMALLEST),
        }
    }

    /// Assembles a container from decoded parts.
    ///
    /// The palette must be non-empty, free of repeated values and
    /// addressable by `profile`, and `words` must be exactly
    /// `profile.word_count()` long. The reverse lookup is built on the first
    /// mutation.
    pub fn from_palette_and_words(
        profile: Profile,
        palette: Vec<V>,
        words: Vec<u32>,
    ) -> Result<Self, SectionError> {
        if palette.is_empty() || palette.len() > profile.max_palette_size() {
            return Err(SectionError::PaletteSizeMismatch {
                len: palette.len(),
                bits: profile.bits(),
            });
        }
        let mut seen = FxHashSet::with_capacity_and_hasher(palette.len(), Default::default());
        if let Some(index) = palette.iter().position(|&value| !seen.insert(value)) {
            return Err(SectionError::DuplicatePaletteEntry { index });
        }
        let storage = BitPackedArray::from_words(profile, words)?;
        Ok(Self {
            palette: Palette::from_entries(palette),
            storage,
        })
    }

    /// Returns the value of the cell at flat `index`.
    ///
    /// A packed index pointing past the palette means the section is
    /// corrupt; it is logged and read as `V::default()`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= SECTION_VOLUME`.
    pub fn get(&self, index: usize) -> V {
        let palette_index = self.storage.get(index);
        match self.palette.get(usize::from(palette_index)) {
            Some(value) => value,
            None if self.palette.is_empty() => V::default(),
            None => {
                tracing::warn!(
                    "Palette index {} out of range at cell {} (palette has {} entries)",
                    palette_index,
                    index,
                    self.palette.len()
                );
                V::default()
            }
        }
    }

    /// Sets the cell at flat `index` to `value`.
    ///
    /// New values are appended to the palette. If that pushes the palette
    /// past the current profile's capacity the packed array grows first.
    ///
    /// # Panics
    ///
    /// Panics if `index >= SECTION_VOLUME` or if the palette would exceed
    /// [`Profile::MAX_PALETTE_SIZE`] entries.
    pub fn set(&mut self, index: usize, value: V) {
        assert!(index < SECTION_VOLUME, "cell index {index} out of bounds");
        let (palette_index, inserted) = self.palette.index_or_insert(value);
        if inserted && self.palette.len() > self.storage.profile().max_palette_size() {
            self.storage.grow(Profile::for_palette_size(self.palette.len()));
        }
        self.storage.set(index, palette_index);
    }

    /// Returns the value at `(x, y, z)`. Each coordinate must be in `0..16`.
    pub fn get_xyz(&self, x: usize, y: usize, z: usize) -> V {
        self.get(Self::flat_index(x, y, z))
    }

    /// Sets the value at `(x, y, z)`. Each coordinate must be in `0..16`.
    pub fn set_xyz(&mut self, x: usize, y: usize, z: usize, value: V) {
        self.set(Self::flat_index(x, y, z), value);
    }

    /// Converts `(x, y, z)` to a flat cell index (y varies fastest).
    pub fn flat_index(x: usize, y: usize, z: usize) -> usize {
        assert!(
            x < SECTION_SIZE && y < SECTION_SIZE && z < SECTION_SIZE,
            "cell ({x}, {y}, {z}) out of bounds"
        );
        (x << 8) | (z << 4) | y
    }

    /// Resets every cell to `value`.
    pub fn fill(&mut self, value: V) {
        *self = Self::filled_with(value);
    }

    /// Replaces every occurrence of `old` with `new`.
    ///
    /// When `new` is not yet in the palette the entry for `old` is renamed
    /// in place. Otherwise cells pointing at `old` are rewritten to `new`'s
    /// index, and `old`'s entry stays unused until [`compact`](Self::compact).
    pub fn replace_all(&mut self, old: V, new: V) {
        if old == new {
            return;
        }
        let Some(old_index) = self.palette.index_of(old) else {
            return;
        };
        match self.palette.index_of(new) {
            None => self.palette.rename(old_index, new),
            Some(new_index) => {
                for index in 0..SECTION_VOLUME {
                    if self.storage.get(index) == old_index {
                        self.storage.set(index, new_index);
                    }
                }
            }
        }
    }

    /// Drops palette entries no cell references and narrows the packed
    /// array to the smallest profile that fits what remains.
    ///
    /// Cell values are unchanged, but palette indices are reassigned. A
    /// section holding out-of-range indices is left untouched.
    pub fn compact(&mut self) {
        if self.palette.is_empty() {
            return;
        }

        let mut used = vec![false; self.palette.len()];
        for palette_index in self.storage.iter() {
            match used.get_mut(usize::from(palette_index)) {
                Some(flag) => *flag = true,
                None => {
                    tracing::warn!(
                        "Skipping compaction of corrupt section (palette index {} of {})",
                        palette_index,
                        self.palette.len()
                    );
                    return;
                }
            }
        }

        let used_count = used.iter().filter(|&&u| u).count();
        let profile = Profile::for_palette_size(used_count);
        if used_count == self.palette.len() && profile == self.storage.profile() {
            return;
        }

        let (palette, remap) = self.palette.compacted(&used);
        self.storage = self
            .storage
            .repack_with(profile, |old| remap[usize::from(old)]);
        tracing::debug!(
            "Compacted section palette from {} to {} entries ({} bits)",
            self.palette.len(),
            palette.len(),
            profile.bits()
        );
        self.palette = palette;
    }

    /// Iterates over the values of all cells in flat order.
    pub fn values(&self) -> impl Iterator<Item = V> + '_ {
        (0..SECTION_VOLUME).map(move |index| self.get(index))
    }

    /// Returns the palette in registration order.
    pub fn palette(&self) -> &[V] {
        self.palette.as_slice()
    }

    /// Returns the number of palette entries.
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    /// Returns the active profile.
    pub fn profile(&self) -> Profile {
        self.storage.profile()
    }

    /// Returns the current bit width per cell.
    pub fn bits_per_entry(&self) -> u8 {
        self.storage.profile().bits()
    }

    /// Returns the packed words.
    pub fn words(&self) -> &[u32] {
        self.storage.words()
    }

    /// Returns the underlying packed array.
    pub fn storage(&self) -> &BitPackedArray {
        &self.storage
    }

    /// Returns memory used by the packed words in bytes.
    pub fn storage_bytes(&self) -> usize {
        self.storage.storage_bytes()
    }
}

impl<V: Copy + Eq + Hash + Default> Default for PalettedContainer<V> {
    fn default() -> Self {
        Self::filled_with(V::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::BlockStateId;

    fn block(id: i32) -> BlockStateId {
        BlockStateId(id)
    }

    #[test]
    fn test_scenario_growth_from_one_to_two_bits() {
        let mut section = PalettedContainer::empty(0);
        assert_eq!(section.profile(), Profile::Bits1);

        section.set(0, block(5));
        assert_eq!(section.palette(), &[block(5)]);
        assert_eq!(section.get(0), block(5));
        assert_eq!(section.get(1), block(5));

        section.set(1, block(7));
        assert_eq!(section.palette(), &[block(5), block(7)]);
        assert_eq!(section.bits_per_entry(), 1);
        assert_eq!(section.get(1), block(7));

        section.set(2, block(9));
        assert_eq!(section.bits_per_entry(), 2);
        assert_eq!(section.palette(), &[block(5), block(7), block(9)]);
        assert_eq!(section.get(0), block(5));
        assert_eq!(section.get(1), block(7));
        assert_eq!(section.get(2), block(9));
        assert_eq!(section.get(3), block(5));
    }

    #[test]
    fn test_empty_section_reads_default_before_first_set() {
        let section: PalettedContainer<BlockStateId> = PalettedContainer::empty(4);
        assert_eq!(section.palette_len(), 0);
        assert_eq!(section.get(0), BlockStateId::AIR);
        assert_eq!(section.get(SECTION_VOLUME - 1), BlockStateId::AIR);
    }

    #[test]
    fn test_size_hint_picks_starting_profile() {
        let section: PalettedContainer<BlockStateId> = PalettedContainer::empty(20);
        assert_eq!(section.profile(), Profile::Bits5);
        let section: PalettedContainer<BlockStateId> = PalettedContainer::empty(usize::MAX);
        assert_eq!(section.profile(), Profile::Bits16);
    }

    #[test]
    fn test_filled_section_reads_fill_everywhere() {
        let section = PalettedContainer::filled_with(block(3));
        assert_eq!(section.palette_len(), 1);
        assert_eq!(section.profile(), Profile::Bits1);
        assert!(section.storage().is_zeroed());
        assert!(section.values().all(|v| v == block(3)));
    }

    #[test]
    fn test_set_same_value_does_not_grow_palette() {
        let mut section = PalettedContainer::filled_with(block(3));
        for i in 0..SECTION_VOLUME {
            section.set(i, block(3));
        }
        assert_eq!(section.palette_len(), 1);
        assert!(section.storage().is_zeroed());
    }

    #[test]
    fn test_growth_through_every_tier_preserves_cells() {
        let mut section = PalettedContainer::filled_with(block(0));
        let mut expected_bits = Vec::new();
        for i in 1..300 {
            section.set(i, block(i as i32));
            if expected_bits.last() != Some(&section.bits_per_entry()) {
                expected_bits.push(section.bits_per_entry());
            }
            for j in 0..=i {
                assert_eq!(section.get(j), block(j as i32), "cell {j} after {i} sets");
            }
        }
        assert_eq!(expected_bits, [1, 2, 3, 4, 5, 6, 8, 16]);
    }

    #[test]
    fn test_growth_happens_exactly_at_capacity() {
        let mut section = PalettedContainer::filled_with(block(0));
        for i in 1..16 {
            section.set(i, block(i as i32));
        }
        assert_eq!(section.palette_len(), 16);
        assert_eq!(section.profile(), Profile::Bits4);
        section.set(16, block(16));
        assert_eq!(section.profile(), Profile::Bits5);
    }

    #[test]
    fn test_corrupt_index_reads_default() {
        let mut words = vec![0u32; Profile::Bits2.word_count()];
        // Cell 1 points at palette index 3, but the palette has two entries.
        words[0] = 3 << 2;
        let section =
            PalettedContainer::from_palette_and_words(Profile::Bits2, vec![block(4), block(8)], words)
                .unwrap();
        assert_eq!(section.get(0), block(4));
        // Logs a warning and reads as air.
        assert_eq!(section.get(1), BlockStateId::AIR);
        assert_eq!(section.get(2), block(4));
    }

    #[test]
    fn test_from_palette_and_words_validates_shape() {
        let result = PalettedContainer::<BlockStateId>::from_palette_and_words(
            Profile::Bits1,
            vec![],
            vec![0; 128],
        );
        assert_eq!(
            result,
            Err(SectionError::PaletteSizeMismatch { len: 0, bits: 1 })
        );

        let result = PalettedContainer::from_palette_and_words(
            Profile::Bits1,
            vec![block(1), block(2), block(3)],
            vec![0; 128],
        );
        assert_eq!(
            result,
            Err(SectionError::PaletteSizeMismatch { len: 3, bits: 1 })
        );

        let result =
            PalettedContainer::from_palette_and_words(Profile::Bits1, vec![block(1)], vec![0; 64]);
        assert_eq!(
            result,
            Err(SectionError::WordCountMismatch {
                expected: 128,
                actual: 64
            })
        );
    }

    #[test]
    fn test_from_palette_and_words_rejects_repeated_values() {
        let result = PalettedContainer::from_palette_and_words(
            Profile::Bits2,
            vec![block(5), block(6), block(5)],
            vec![0; Profile::Bits2.word_count()],
        );
        assert_eq!(result, Err(SectionError::DuplicatePaletteEntry { index: 2 }));
    }

    #[test]
    fn test_decoded_section_accepts_mutation() {
        let mut section = PalettedContainer::from_palette_and_words(
            Profile::Bits2,
            vec![block(10), block(20), block(30)],
            vec![0; Profile::Bits2.word_count()],
        )
        .unwrap();
        section.set(5, block(20));
        assert_eq!(section.palette_len(), 3, "existing entry must be reused");
        section.set(6, block(40));
        assert_eq!(section.palette_len(), 4);
        assert_eq!(section.profile(), Profile::Bits2);
        assert_eq!(section.get(5), block(20));
        assert_eq!(section.get(6), block(40));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = PalettedContainer::filled_with(block(1));
        original.set(10, block(2));
        let mut copy = original.clone();

        copy.set(10, block(3));
        copy.set(11, block(4));
        assert_eq!(original.get(10), block(2));
        assert_eq!(original.get(11), block(1));
        assert_eq!(original.palette_len(), 2);
        assert_eq!(copy.get(10), block(3));
        assert_eq!(copy.palette_len(), 4);
    }

    #[test]
    fn test_xyz_addressing() {
        assert_eq!(PalettedContainer::<BlockStateId>::flat_index(0, 1, 0), 1);
        assert_eq!(PalettedContainer::<BlockStateId>::flat_index(0, 0, 1), 16);
        assert_eq!(PalettedContainer::<BlockStateId>::flat_index(1, 0, 0), 256);
        assert_eq!(
            PalettedContainer::<BlockStateId>::flat_index(15, 15, 15),
            SECTION_VOLUME - 1
        );

        let mut section = PalettedContainer::filled_with(BlockStateId::AIR);
        section.set_xyz(3, 4, 5, block(9));
        assert_eq!(section.get_xyz(3, 4, 5), block(9));
        assert_eq!(section.get((3 << 8) | (5 << 4) | 4), block(9));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_xyz_out_of_bounds_panics() {
        let section = PalettedContainer::filled_with(BlockStateId::AIR);
        section.get_xyz(16, 0, 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_set_out_of_bounds_panics() {
        let mut section = PalettedContainer::filled_with(BlockStateId::AIR);
        section.set(SECTION_VOLUME, block(1));
    }

    #[test]
    #[should_panic(expected = "exceeds the widest profile")]
    fn test_palette_overflow_panics() {
        let mut section = PalettedContainer::filled_with(0i32);
        for value in 1..=65_536 {
            section.set(0, value);
        }
    }

    #[test]
    fn test_fill_resets_section() {
        let mut section = PalettedContainer::filled_with(block(1));
        for i in 0..40 {
            section.set(i, block(i as i32 + 2));
        }
        section.fill(block(6));
        assert_eq!(section, PalettedContainer::filled_with(block(6)));
    }

    #[test]
    fn test_replace_all_renames_entry() {
        let mut section = PalettedContainer::filled_with(block(1));
        section.set(7, block(2));
        section.replace_all(block(1), block(5));
        assert_eq!(section.palette(), &[block(5), block(2)]);
        assert_eq!(section.get(0), block(5));
        assert_eq!(section.get(7), block(2));
        // The renamed entry is found again by later writes.
        section.set(8, block(5));
        assert_eq!(section.palette_len(), 2);
    }

    #[test]
    fn test_replace_all_merges_into_existing_entry() {
        let mut section = PalettedContainer::filled_with(block(1));
        section.set(7, block(2));
        section.set(8, block(3));
        section.replace_all(block(2), block(3));
        assert_eq!(section.get(7), block(3));
        assert_eq!(section.get(8), block(3));
        assert_eq!(section.get(0), block(1));

        section.compact();
        assert_eq!(section.palette(), &[block(1), block(3)]);
        assert_eq!(section.profile(), Profile::Bits1);
        assert_eq!(section.get(7), block(3));
    }

    #[test]
    fn test_replace_all_missing_value_is_noop() {
        let mut section = PalettedContainer::filled_with(block(1));
        let before = section.clone();
        section.replace_all(block(9), block(2));
        assert_eq!(section, before);
    }

    #[test]
    fn test_compact_drops_unused_entries_and_narrows() {
        let mut section = PalettedContainer::filled_with(block(0));
        for i in 0..20 {
            section.set(i, block(i as i32 + 100));
        }
        assert_eq!(section.profile(), Profile::Bits5);
        // Overwrite all but two of the distinct values.
        for i in 2..20 {
            section.set(i, block(0));
        }
        section.compact();
        assert_eq!(section.palette(), &[block(0), block(100), block(101)]);
        assert_eq!(section.profile(), Profile::Bits2);
        assert_eq!(section.get(0), block(100));
        assert_eq!(section.get(1), block(101));
        assert!((2..SECTION_VOLUME).all(|i| section.get(i) == block(0)));
    }

    #[test]
    fn test_compact_without_changes_is_noop() {
        let mut section = PalettedContainer::filled_with(block(0));
        section.set(1, block(1));
        let before = section.clone();
        section.compact();
        assert_eq!(section, before);
    }

    #[test]
    fn test_compact_leaves_corrupt_section_untouched() {
        let mut words = vec![0u32; Profile::Bits2.word_count()];
        words[0] = 3;
        let mut section =
            PalettedContainer::from_palette_and_words(Profile::Bits2, vec![block(4)], words)
                .unwrap();
        let before = section.clone();
        section.compact();
        assert_eq!(section, before);
    }
}
