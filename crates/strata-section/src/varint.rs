//! LEB128 variable-length integers and zigzag signed encoding.
//!
//! Palette counts are written unsigned; palette values are zigzag-mapped
//! first so small negative values stay short.

use std::io::{self, Write};

use crate::error::SectionError;

/// Longest valid encoding of a 32-bit value.
const MAX_VARINT_LEN: usize = 5;

/// Writes `value` as an unsigned LEB128 varint.
pub fn write_var_u32<W: Write + ?Sized>(writer: &mut W, mut value: u32) -> io::Result<()> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let mut len = 0;
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf[len] = byte;
        len += 1;
        if value == 0 {
            break;
        }
    }
    writer.write_all(&buf[..len])
}

/// Writes `value` as a zigzag-encoded LEB128 varint.
pub fn write_var_i32<W: Write + ?Sized>(writer: &mut W, value: i32) -> io::Result<()> {
    write_var_u32(writer, zigzag_encode(value))
}

/// Reads an unsigned LEB128 varint from the front of `input`, advancing it.
pub fn read_var_u32(input: &mut &[u8]) -> Result<u32, SectionError> {
    let mut result: u32 = 0;
    for i in 0..MAX_VARINT_LEN {
        let Some((&byte, rest)) = input.split_first() else {
            return Err(SectionError::Truncated {
                expected: 1,
                actual: 0,
            });
        };
        *input = rest;

        let payload = u32::from(byte & 0x7F);
        let shift = 7 * i as u32;
        // The fifth byte only has room for the top 4 bits.
        if i == MAX_VARINT_LEN - 1 && payload > 0x0F {
            return Err(SectionError::MalformedVarInt);
        }
        result |= payload << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }
    Err(SectionError::MalformedVarInt)
}

/// Reads a zigzag-encoded LEB128 varint from the front of `input`.
pub fn read_var_i32(input: &mut &[u8]) -> Result<i32, SectionError> {
    read_var_u32(input).map(zigzag_decode)
}

/// Number of bytes [`write_var_u32`] emits for `value`.
pub fn var_u32_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0x0FFF_FFFF => 4,
        _ => 5,
    }
}

/// Maps signed to unsigned: 0 → 0, -1 → 1, 1 → 2, -2 → 3, ...
#[inline]
pub fn zigzag_encode(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode`].
#[inline]
pub fn zigzag_decode(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_u32(value: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        write_var_u32(&mut buf, value).unwrap();
        buf
    }

    #[test]
    fn test_single_byte_boundary() {
        assert_eq!(encode_u32(0), [0x00]);
        assert_eq!(encode_u32(127), [0x7F]);
        assert_eq!(encode_u32(128), [0x80, 0x01]);
        assert_eq!(encode_u32(300), [0xAC, 0x02]);
    }

    #[test]
    fn test_encoded_length_matches_prediction() {
        for value in [0, 1, 127, 128, 16_383, 16_384, 2_097_151, 2_097_152, u32::MAX] {
            assert_eq!(encode_u32(value).len(), var_u32_len(value), "value {value}");
        }
    }

    #[test]
    fn test_multiple_values_in_buffer() {
        let mut buf = Vec::new();
        write_var_u32(&mut buf, 100).unwrap();
        write_var_i32(&mut buf, -200).unwrap();
        write_var_u32(&mut buf, u32::MAX).unwrap();

        let mut input = buf.as_slice();
        assert_eq!(read_var_u32(&mut input).unwrap(), 100);
        assert_eq!(read_var_i32(&mut input).unwrap(), -200);
        assert_eq!(read_var_u32(&mut input).unwrap(), u32::MAX);
        assert!(input.is_empty());
    }

    #[test]
    fn test_zigzag_mapping() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-2), 3);
        assert_eq!(zigzag_encode(i32::MAX), u32::MAX - 1);
        assert_eq!(zigzag_encode(i32::MIN), u32::MAX);
        for value in [0, 1, -1, 63, -64, 1_000_000, i32::MIN, i32::MAX] {
            assert_eq!(zigzag_decode(zigzag_encode(value)), value);
        }
    }

    #[test]
    fn test_truncated_varint() {
        let mut input: &[u8] = &[];
        assert!(matches!(
            read_var_u32(&mut input),
            Err(SectionError::Truncated { .. })
        ));

        let mut input: &[u8] = &[0x80, 0x80];
        assert!(matches!(
            read_var_u32(&mut input),
            Err(SectionError::Truncated { .. })
        ));
    }

    #[test]
    fn test_overlong_varint_rejected() {
        let mut input: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        assert_eq!(read_var_u32(&mut input), Err(SectionError::MalformedVarInt));

        // Fifth byte carrying more than 4 payload bits overflows a u32.
        let mut input: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF, 0x1F];
        assert_eq!(read_var_u32(&mut input), Err(SectionError::MalformedVarInt));
    }
}
