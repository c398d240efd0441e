//! Network encoding of a [`PalettedContainer`].
//!
//! ## Layout
//!
//! | Size | Field |
//! |------|-------|
//! | 1 | Descriptor: `(bit_width << 1) \| 1`, bit 0 flags the network encoding |
//! | W×4 | Packed words, `u32` little-endian, W = `Profile::word_count()` |
//! | varint | Palette length (unsigned LEB128) |
//! | N×varint | Palette values (zigzag LEB128) in registration order |
//!
//! Packed indices refer to palette positions as written, so the palette is
//! never reordered on the way out.

use std::hash::Hash;
use std::io::{self, Write};

use crate::container::PalettedContainer;
use crate::error::SectionError;
use crate::profile::Profile;
use crate::value::WireValue;
use crate::varint::{read_var_i32, read_var_u32, var_u32_len, write_var_i32, write_var_u32};

/// Descriptor bit marking the network (varint palette) encoding.
pub const NETWORK_ENCODING_FLAG: u8 = 0x01;

/// Returns the descriptor byte for `profile` in the network encoding.
pub const fn descriptor(profile: Profile) -> u8 {
    (profile.bits() << 1) | NETWORK_ENCODING_FLAG
}

impl<V: Copy + Eq + Hash + Default + WireValue> PalettedContainer<V> {
    /// Writes the section in the network encoding.
    ///
    /// A section with nothing registered is written as a single-entry
    /// palette holding `V::default()`, which is what every cell reads.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&[descriptor(self.profile())])?;

        let words = self.words();
        let mut word_bytes = Vec::with_capacity(words.len() * 4);
        for word in words {
            word_bytes.extend_from_slice(&word.to_le_bytes());
        }
        writer.write_all(&word_bytes)?;

        let palette = self.palette();
        if palette.is_empty() {
            write_var_u32(writer, 1)?;
            return write_var_i32(writer, V::default().to_wire());
        }
        write_var_u32(writer, palette.len() as u32)?;
        for &value in palette {
            write_var_i32(writer, value.to_wire())?;
        }
        Ok(())
    }

    /// Encodes the section into a new byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut buf).expect("writing to a Vec cannot fail");
        buf
    }

    /// Exact number of bytes [`write_to`](Self::write_to) produces.
    pub fn encoded_len(&self) -> usize {
        let palette = self.palette();
        let palette_bytes = if palette.is_empty() {
            var_u32_len(1) + var_i32_len(V::default().to_wire())
        } else {
            var_u32_len(palette.len() as u32)
                + palette
                    .iter()
                    .map(|&value| var_i32_len(value.to_wire()))
                    .sum::<usize>()
        };
        1 + self.words().len() * 4 + palette_bytes
    }

    /// Decodes one section from the front of `input` and advances past it.
    ///
    /// On error `input` is left where it was; the section is rejected as a
    /// whole.
    pub fn read_from(input: &mut &[u8]) -> Result<Self, SectionError> {
        let mut cursor = *input;

        let Some((&descriptor, rest)) = cursor.split_first() else {
            return Err(SectionError::Truncated {
                expected: 1,
                actual: 0,
            });
        };
        cursor = rest;
        if descriptor & NETWORK_ENCODING_FLAG == 0 {
            return Err(SectionError::UnsupportedEncoding(descriptor));
        }
        let bits = descriptor >> 1;
        let profile = Profile::from_bits(bits).ok_or(SectionError::InvalidBitWidth(bits))?;

        let word_bytes = profile.word_count() * 4;
        if cursor.len() < word_bytes {
            return Err(SectionError::Truncated {
                expected: word_bytes,
                actual: cursor.len(),
            });
        }
        let (raw, rest) = cursor.split_at(word_bytes);
        cursor = rest;
        let words: Vec<u32> = raw
            .chunks_exact(4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        let palette_len = read_var_u32(&mut cursor)? as usize;
        if palette_len == 0 || palette_len > profile.max_palette_size() {
            return Err(SectionError::PaletteSizeMismatch {
                len: palette_len,
                bits,
            });
        }
        let mut palette = Vec::with_capacity(palette_len);
        for _ in 0..palette_len {
            let raw = read_var_i32(&mut cursor)?;
            palette.push(V::from_wire(raw).ok_or(SectionError::InvalidValue(raw))?);
        }

        let section = Self::from_palette_and_words(profile, palette, words)?;
        tracing::debug!(
            "Decoded {}-bit section with {} palette entries",
            bits,
            palette_len
        );
        *input = cursor;
        Ok(section)
    }

    /// Decodes a buffer holding exactly one section.
    pub fn from_bytes(data: &[u8]) -> Result<Self, SectionError> {
        let mut input = data;
        let section = Self::read_from(&mut input)?;
        if !input.is_empty() {
            return Err(SectionError::TrailingBytes(input.len()));
        }
        Ok(section)
    }
}

fn var_i32_len(value: i32) -> usize {
    var_u32_len(crate::varint::zigzag_encode(value))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
