//! Integer content, ported from `crefl_asn1_ber_integer_{u64,s64}_*` in
//! `casn1.cc`: minimal big-endian byte count, with the signed variant's
//! length and sign-extension chosen so two's-complement values round-trip
//! (`0x7f` -> 1 byte, `0x80` -> 2 bytes, `-0x80` -> 1 byte, `-0x81` -> 2
//! bytes — `casn1.cc`'s own documented examples).

use crate::asn1::{Asn1Error, Asn1Result};
use crate::cursor::Cursor;

/// Minimal big-endian byte count for `value`, reserving the top bit so the
/// content never reads back as negative (e.g. `255` takes 2 bytes, `0x00
/// 0xff`, not 1). `casn1.cc`'s own `crefl_asn1_ber_integer_u64_length`
/// omits this and would emit a 1-byte `0xff` for `255` — ambiguous with
/// `-1` under two's complement: `2^56-1` encodes with a leading zero byte
/// to keep the sign bit clear, so this follows the same shape as
/// [`integer_s64_length`] applied to a nonnegative magnitude rather than
/// the original's.
pub fn integer_u64_length(value: u64) -> usize {
    8 - ((value.leading_zeros() as i64 - 1) / 8) as usize
}

pub fn integer_u64_read(c: &mut Cursor, len: usize) -> Asn1Result<u64> {
    if len > 8 {
        return Err(Asn1Error::InvalidIntegerLength);
    }
    let mut v: u64 = 0;
    for _ in 0..len {
        v = (v << 8) | c.read_u8()? as u64;
    }
    Ok(v)
}

pub fn integer_u64_write(c: &mut Cursor, len: usize, value: u64) -> Asn1Result<()> {
    if len < 1 || len > 8 {
        return Err(Asn1Error::InvalidIntegerLength);
    }
    let mut v = if len == 8 { value } else { value << (64 - len * 8) };
    for _ in 0..len {
        c.write_u8((v >> 56) as u8)?;
        v <<= 8;
    }
    Ok(())
}

/// Minimal two's-complement byte count: the sign bit of the top byte must
/// match `value`'s sign, so `clz` is taken over the complement for
/// negative values.
pub fn integer_s64_length(value: i64) -> usize {
    if value == 0 {
        1
    } else {
        let magnitude = if value < 0 { !value } else { value } as u64;
        8 - ((magnitude.leading_zeros() as i64 - 1) / 8) as usize
    }
}

fn sign_extend_s64(x: i64, y: u32) -> i64 {
    x.wrapping_shl(y).wrapping_shr(y)
}

pub fn integer_s64_read(c: &mut Cursor, len: usize) -> Asn1Result<i64> {
    let v = integer_u64_read(c, len)? as i64;
    Ok(sign_extend_s64(v, 64 - (len * 8) as u32))
}

pub fn integer_s64_write(c: &mut Cursor, len: usize, value: i64) -> Asn1Result<()> {
    integer_u64_write(c, len, value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(0xff)]
    #[case(0x1_0000)]
    #[case(u64::MAX)]
    fn u64_round_trips(#[case] value: u64) {
        let len = integer_u64_length(value);
        let mut c = Cursor::with_capacity(len);
        integer_u64_write(&mut c, len, value).unwrap();
        c.reset();
        assert_eq!(integer_u64_read(&mut c, len).unwrap(), value);
    }

    #[rstest]
    #[case(0)]
    #[case(0x7f)]
    #[case(0x80)]
    #[case(-0x80)]
    #[case(-0x81)]
    #[case(i64::MAX)]
    #[case(i64::MIN)]
    fn s64_round_trips(#[case] value: i64) {
        let len = integer_s64_length(value);
        let mut c = Cursor::with_capacity(len);
        integer_s64_write(&mut c, len, value).unwrap();
        c.reset();
        assert_eq!(integer_s64_read(&mut c, len).unwrap(), value);
    }

    #[test]
    fn documented_signed_length_examples() {
        assert_eq!(integer_s64_length(0x7f), 1);
        assert_eq!(integer_s64_length(0x80), 2);
        assert_eq!(integer_s64_length(-0x80), 1);
        assert_eq!(integer_s64_length(-0x81), 2);
    }

    #[test]
    fn two_to_the_56_minus_one_encodes_with_a_leading_zero_byte() {
        // tag 0x02, length 0x08, content with a leading zero byte to keep
        // the sign bit clear.
        let value: u64 = (1u64 << 56) - 1;
        let len = integer_u64_length(value);
        assert_eq!(len, 8);
        let mut c = Cursor::with_capacity(len);
        integer_u64_write(&mut c, len, value).unwrap();
        assert_eq!(c.data(), &[0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    }
}
