//! Bit-packed array holding one paletted index per section cell.
//!
//! Indices are packed into `u32` words at the width of the active
//! [`Profile`]. An entry never crosses a word boundary: word `i` holds
//! entries `i * epw .. (i + 1) * epw` in its low bits, where `epw` is the
//! profile's entries-per-word. When `epw` does not divide the section volume
//! the final word is only partially used.

use crate::SECTION_VOLUME;
use crate::error::SectionError;
use crate::profile::Profile;

/// Fixed-capacity packed storage for the 4096 paletted indices of a section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitPackedArray {
    /// Raw storage, `profile.word_count()` words long.
    words: Box<[u32]>,
    /// Layout of the words.
    profile: Profile,
}

impl BitPackedArray {
    /// Creates an array at the given profile with every index set to zero.
    pub fn new(profile: Profile) -> Self {
        Self {
            words: vec![0u32; profile.word_count()].into_boxed_slice(),
            profile,
        }
    }

    /// Wraps existing words laid out according to `profile`.
    ///
    /// Only the word count is validated. Indices that point past the palette
    /// are caught when read.
    pub fn from_words(profile: Profile, words: Vec<u32>) -> Result<Self, SectionError> {
        let expected = profile.word_count();
        if words.len() != expected {
            return Err(SectionError::WordCountMismatch {
                expected,
                actual: words.len(),
            });
        }
        Ok(Self {
            words: words.into_boxed_slice(),
            profile,
        })
    }

    /// Returns the index stored for the cell at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= SECTION_VOLUME`.
    #[inline]
    pub fn get(&self, index: usize) -> u16 {
        assert!(index < SECTION_VOLUME, "cell index {index} out of bounds");
        let epw = self.profile.entries_per_word();
        let word = self.words[index / epw];
        let shift = (index % epw) as u32 * u32::from(self.profile.bits());
        ((word >> shift) & self.profile.mask()) as u16
    }

    /// Stores `value` for the cell at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= SECTION_VOLUME`, and in debug builds if `value`
    /// does not fit the current profile.
    #[inline]
    pub fn set(&mut self, index: usize, value: u16) {
        assert!(index < SECTION_VOLUME, "cell index {index} out of bounds");
        debug_assert!(
            u32::from(value) <= self.profile.mask(),
            "value {value} exceeds {}-bit capacity",
            self.profile.bits()
        );
        let epw = self.profile.entries_per_word();
        let shift = (index % epw) as u32 * u32::from(self.profile.bits());
        let mask = self.profile.mask();
        let word = &mut self.words[index / epw];
        *word = (*word & !(mask << shift)) | ((u32::from(value) & mask) << shift);
    }

    /// Re-packs every entry into the wider `profile`.
    ///
    /// Exactly [`SECTION_VOLUME`] entries are copied in flat order, so the
    /// unused tail of a partially filled last word is never read. Growing to
    /// the current profile is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `profile` is narrower than the current one.
    pub fn grow(&mut self, profile: Profile) {
        assert!(
            profile >= self.profile,
            "cannot grow from {}-bit to narrower {}-bit profile",
            self.profile.bits(),
            profile.bits()
        );
        if profile == self.profile {
            return;
        }
        tracing::trace!(
            "Growing packed array from {} to {} bits",
            self.profile.bits(),
            profile.bits()
        );
        *self = self.repack_with(profile, |index| index);
    }

    /// Builds a copy of this array at `profile` with every index passed
    /// through `remap`.
    ///
    /// Unlike [`grow`](Self::grow) the target may be narrower; the caller
    /// guarantees every remapped index fits it.
    pub fn repack_with(&self, profile: Profile, mut remap: impl FnMut(u16) -> u16) -> Self {
        let mut packed = Self::new(profile);
        let old_epw = self.profile.entries_per_word();
        let old_bits = u32::from(self.profile.bits());
        let old_mask = self.profile.mask();

        // Walk word by word; the last word contributes only the entries that
        // remain before SECTION_VOLUME.
        for (word_index, &word) in self.words.iter().enumerate() {
            let base = word_index * old_epw;
            let count = old_epw.min(SECTION_VOLUME - base);
            for slot in 0..count {
                let value = ((word >> (slot as u32 * old_bits)) & old_mask) as u16;
                packed.set(base + slot, remap(value));
            }
        }
        packed
    }

    /// Iterates over all [`SECTION_VOLUME`] stored indices in flat order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        (0..SECTION_VOLUME).map(move |index| self.get(index))
    }

    /// Returns `true` if every stored index is zero.
    pub fn is_zeroed(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Returns the active profile.
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Returns the raw storage words.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Returns the size of the backing storage in bytes.
    pub fn storage_bytes(&self) -> usize {
        self.words.len() * size_of::<u32>()
    }
}

impl Default for BitPackedArray {
    fn default() -> Self {
        Self::new(Profile::SMALLEST)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
