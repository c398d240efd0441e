//! Append-only list of the distinct values present in a section.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::profile::Profile;

/// Ordered list of distinct values with an O(1) value → index lookup.
///
/// Entries keep their index for as long as the palette lives; only
/// [`compacted`](Self::compacted) produces a palette with new indices. The
/// reverse map is built on first lookup, so a palette decoded from the wire
/// costs nothing until it is mutated.
#[derive(Clone, Debug)]
pub struct Palette<V> {
    /// Values in registration order.
    entries: Vec<V>,
    /// Reverse lookup: value → index. `None` until first needed.
    lookup: Option<FxHashMap<V, u16>>,
}

impl<V: Copy + Eq + Hash> Palette<V> {
    /// Creates an empty palette with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            lookup: None,
        }
    }

    /// Creates a palette from values in registration order.
    ///
    /// The reverse map is not built until the palette is first searched.
    pub fn from_entries(entries: Vec<V>) -> Self {
        Self {
            entries,
            lookup: None,
        }
    }

    /// Returns the value stored at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<V> {
        self.entries.get(index).copied()
    }

    /// Returns the index of `value`, if registered.
    pub fn index_of(&mut self, value: V) -> Option<u16> {
        self.lookup().get(&value).copied()
    }

    /// Returns the index of `value`, appending it first if it is new.
    ///
    /// The boolean is `true` when the value was appended.
    ///
    /// # Panics
    ///
    /// Panics if the palette already holds [`Profile::MAX_PALETTE_SIZE`]
    /// entries.
    pub fn index_or_insert(&mut self, value: V) -> (u16, bool) {
        if let Some(index) = self.index_of(value) {
            return (index, false);
        }
        assert!(
            self.entries.len() < Profile::MAX_PALETTE_SIZE,
            "palette exceeds the widest profile ({} entries)",
            Profile::MAX_PALETTE_SIZE
        );
        let index = self.entries.len() as u16;
        self.entries.push(value);
        if let Some(lookup) = self.lookup.as_mut() {
            lookup.insert(value, index);
        }
        (index, true)
    }

    /// Replaces the value at `index` with `value`.
    ///
    /// The caller guarantees `value` is not already registered.
    pub fn rename(&mut self, index: u16, value: V) {
        let old = std::mem::replace(&mut self.entries[usize::from(index)], value);
        if let Some(lookup) = self.lookup.as_mut() {
            lookup.remove(&old);
            lookup.insert(value, index);
        }
    }

    /// Builds a palette holding only the entries flagged in `keep`, in their
    /// original order, and the old → new index table for it.
    pub fn compacted(&self, keep: &[bool]) -> (Self, Vec<u16>) {
        let mut remap = vec![0u16; self.entries.len()];
        let mut entries = Vec::with_capacity(keep.iter().filter(|&&k| k).count());
        for (old_index, (&value, &kept)) in self.entries.iter().zip(keep).enumerate() {
            if kept {
                remap[old_index] = entries.len() as u16;
                entries.push(value);
            }
        }
        (Self::from_entries(entries), remap)
    }

    /// Number of registered values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no value has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered values in index order.
    pub fn as_slice(&self) -> &[V] {
        &self.entries
    }

    fn lookup(&mut self) -> &FxHashMap<V, u16> {
        let entries = &self.entries;
        self.lookup.get_or_insert_with(|| {
            entries
                .iter()
                .enumerate()
                .map(|(index, &value)| (value, index as u16))
                .collect()
        })
    }
}

impl<V: PartialEq> PartialEq for Palette<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V: Eq> Eq for Palette<V> {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
