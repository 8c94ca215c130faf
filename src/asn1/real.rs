//! REAL content (ISO/IEC 8825-1:2003 8.5), ported from
//! `crefl_asn1_ber_real_f64_*` and the IEEE-754 bit-field helpers in
//! `casn1.cc`. Only the binary encoding (base 2, 1- or 2-byte exponent) is
//! implemented, matching what the original ever produces; special values
//! (`±0`, `±∞`, NaN) get their own one-byte sentinels and the decimal
//! encoding forms (8.5.8) are rejected on read as
//! [`Asn1Error::UnsupportedRealEncoding`].
//!
//! IEEE-754's exponent is relative to the mantissa's most significant bit;
//! ASN.1's is relative to its least significant bit. [`f64_asn1_data`]
//! strips the mantissa's trailing zero bits and renormalizes the exponent
//! to match before the generic integer codec in [`crate::asn1::integer`]
//! writes it.

use crate::asn1::integer::{
    integer_s64_length, integer_s64_read, integer_s64_write, integer_u64_length,
    integer_u64_read, integer_u64_write,
};
use crate::asn1::{Asn1Error, Asn1Result};
use crate::cursor::Cursor;

const F64_EXP_SIZE: u32 = 11;
const F64_MANT_SIZE: u32 = 52;
const F64_EXP_BIAS: i64 = (1 << (F64_EXP_SIZE - 1)) - 1;
const F64_MANT_MASK: u64 = (1u64 << F64_MANT_SIZE) - 1;
const F64_EXP_MASK: u64 = (1u64 << F64_EXP_SIZE) - 1;
const F64_MANT_PREFIX: u64 = 1u64 << F64_MANT_SIZE;

fn f64_mant_dec(x: f64) -> u64 {
    x.to_bits() & F64_MANT_MASK
}

fn f64_exp_dec(x: f64) -> u64 {
    (x.to_bits() >> F64_MANT_SIZE) & F64_EXP_MASK
}

fn f64_sign_dec(x: f64) -> bool {
    (x.to_bits() >> (F64_MANT_SIZE + F64_EXP_SIZE)) & 1 != 0
}

fn f64_from_parts(mant: u64, exp: u64, sign: bool) -> f64 {
    let bits = (mant & F64_MANT_MASK)
        | ((exp & F64_EXP_MASK) << F64_MANT_SIZE)
        | ((sign as u64) << (F64_MANT_SIZE + F64_EXP_SIZE));
    f64::from_bits(bits)
}

const REAL_FMT_SHIFT: u8 = 6;
const REAL_FMT_MASK: u8 = 0b11;
const REAL_EXP_SHIFT: u8 = 0;
const REAL_EXP_MASK: u8 = 0b11;

#[derive(Clone, Copy, PartialEq, Eq)]
enum RealFmt {
    Decimal,
    Special,
    BinaryPos,
    BinaryNeg,
}

fn real_format(b: u8) -> RealFmt {
    match (b >> REAL_FMT_SHIFT) & REAL_FMT_MASK {
        0b00 => RealFmt::Decimal,
        0b01 => RealFmt::Special,
        0b10 => RealFmt::BinaryPos,
        _ => RealFmt::BinaryNeg,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RealExp {
    One,
    Two,
    Other,
}

fn real_exp_mode(b: u8) -> RealExp {
    match (b >> REAL_EXP_SHIFT) & REAL_EXP_MASK {
        0b00 => RealExp::One,
        0b01 => RealExp::Two,
        _ => RealExp::Other,
    }
}

fn binary_header(sign: bool, exp: RealExp) -> u8 {
    let exp_bits = match exp {
        RealExp::One => 0b00,
        RealExp::Two => 0b01,
        RealExp::Other => unreachable!("only 1- or 2-byte exponents are ever written"),
    };
    0x80 | ((sign as u8) << 6) | exp_bits
}

const REAL_SPECIAL_POS_INF: u8 = 0b0100_0000;
const REAL_SPECIAL_NEG_INF: u8 = 0b0100_0001;
const REAL_SPECIAL_NEG_ZERO: u8 = 0b0100_0010;
const REAL_SPECIAL_NAN: u8 = 0b0100_0011;

/// Mantissa and exponent renormalized to ASN.1's lsb-relative convention,
/// plus their minimal encoded lengths — `f64_asn1_data` in `casn1.cc`.
struct Asn1RealData {
    frac: u64,
    sexp: i64,
    frac_len: usize,
    exp_len: usize,
    sign: bool,
    inf: bool,
    nan: bool,
    zero: bool,
}

fn asn1_real_data(value: f64) -> Asn1RealData {
    let sexp_biased = f64_exp_dec(value) as i64;
    let mut frac = f64_mant_dec(value) as i64 + (if sexp_biased == 0 { 0 } else { F64_MANT_PREFIX as i64 });
    let frac_tz = if frac == 0 { 0 } else { frac.trailing_zeros() };
    let frac_lz = if frac == 0 { 64 } else { (frac as u64).leading_zeros() };
    frac >>= frac_tz;

    let mut sexp = sexp_biased;
    if sexp_biased > 0 {
        sexp += frac_lz as i64 + frac_tz as i64 - 63 - F64_EXP_BIAS;
    }

    Asn1RealData {
        frac: frac as u64,
        sexp,
        frac_len: integer_u64_length(frac as u64),
        exp_len: integer_s64_length(sexp),
        sign: f64_sign_dec(value),
        inf: f64_exp_dec(value) == F64_EXP_MASK && f64_mant_dec(value) == 0,
        nan: f64_exp_dec(value) == F64_EXP_MASK && f64_mant_dec(value) != 0,
        zero: f64_exp_dec(value) == 0 && f64_mant_dec(value) == 0,
    }
}

pub fn real_f64_length(value: f64) -> usize {
    let d = asn1_real_data(value);
    if d.zero {
        if d.sign { 1 } else { 3 }
    } else if d.inf || d.nan {
        1
    } else {
        1 + d.exp_len + d.frac_len
    }
}

pub fn real_f64_write(c: &mut Cursor, value: f64) -> Asn1Result<()> {
    let d = asn1_real_data(value);

    let header = if d.zero && d.sign {
        REAL_SPECIAL_NEG_ZERO
    } else if d.inf {
        if d.sign { REAL_SPECIAL_NEG_INF } else { REAL_SPECIAL_POS_INF }
    } else if d.nan {
        REAL_SPECIAL_NAN
    } else {
        let exp_mode = match d.exp_len {
            1 => RealExp::One,
            2 => RealExp::Two,
            _ => return Err(Asn1Error::UnsupportedRealEncoding),
        };
        binary_header(d.sign, exp_mode)
    };
    c.write_u8(header)?;

    if (d.zero && d.sign) || d.inf || d.nan {
        return Ok(());
    }
    integer_s64_write(c, d.exp_len, d.sexp)?;
    integer_u64_write(c, d.frac_len, d.frac)?;
    Ok(())
}

pub fn real_f64_read(c: &mut Cursor, len: usize) -> Asn1Result<f64> {
    let b = c.read_u8()?;
    match b {
        REAL_SPECIAL_POS_INF => return Ok(f64::INFINITY),
        REAL_SPECIAL_NEG_INF => return Ok(f64::NEG_INFINITY),
        REAL_SPECIAL_NEG_ZERO => return Ok(-0.0),
        REAL_SPECIAL_NAN => return Ok(f64::NAN),
        _ => {}
    }

    let sign = match real_format(b) {
        RealFmt::BinaryPos => false,
        RealFmt::BinaryNeg => true,
        _ => return Err(Asn1Error::UnsupportedRealEncoding),
    };
    let exp_len = match real_exp_mode(b) {
        RealExp::One => 1,
        RealExp::Two => 2,
        RealExp::Other => return Err(Asn1Error::UnsupportedRealEncoding),
    };
    let frac_len = len
        .checked_sub(exp_len + 1)
        .ok_or(Asn1Error::UnsupportedRealEncoding)?;

    let sexp = integer_s64_read(c, exp_len)?;
    let frac = integer_u64_read(c, frac_len)?;
    let frac_lz = if frac == 0 { 64 } else { frac.leading_zeros() } as i64;

    let (mant, exp) = if frac == 0 && sexp == 0 {
        (0u64, 0u64)
    } else if frac == 1 {
        // frac is just the implied leading bit with nothing after it (any
        // power of two, including 1.0 itself): the mantissa field is all
        // zero and `frac_lz == 63`, so the general shift below would be a
        // shift-by-64 (`frac_lz + 1`), which overflows. Fold it in here
        // instead of guarding the shift.
        (0u64, (F64_EXP_BIAS + sexp) as u64)
    } else {
        // left-justify with the msb at bit 52, then drop the implied
        // leading 1 the way `f64_unpack_float` expects it absent.
        let shifted = ((frac as i64) << (frac_lz + 1)) as u64 >> (64 - F64_MANT_SIZE);
        let fexp = F64_EXP_BIAS + 63 + sexp - frac_lz;
        (shifted, fexp as u64)
    };

    if mant > F64_MANT_MASK || exp > F64_EXP_MASK {
        return Err(Asn1Error::UnsupportedRealEncoding);
    }

    Ok(f64_from_parts(mant, exp, sign))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn round_trip(value: f64) -> f64 {
        let len = real_f64_length(value);
        let mut c = Cursor::with_capacity(len);
        real_f64_write(&mut c, value).unwrap();
        assert_eq!(c.offset(), len);
        c.reset();
        real_f64_read(&mut c, len).unwrap()
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-1.0)]
    #[case(2.0)]
    #[case(0.5)]
    #[case(std::f64::consts::PI)]
    #[case(std::f64::consts::E)]
    #[case(1e307)]
    #[case(f64::MIN_POSITIVE)]
    fn positive_and_general_values_round_trip_bit_exact(#[case] value: f64) {
        assert_eq!(round_trip(value).to_bits(), value.to_bits());
    }

    #[test]
    fn negative_zero_round_trips_through_the_one_byte_sentinel() {
        let len = real_f64_length(-0.0);
        assert_eq!(len, 1);
        let v = round_trip(-0.0);
        assert_eq!(v.to_bits(), (-0.0f64).to_bits());
    }

    #[test]
    fn positive_zero_uses_the_general_three_byte_encoding() {
        assert_eq!(real_f64_length(0.0), 3);
    }

    #[test]
    fn infinities_round_trip() {
        assert_eq!(round_trip(f64::INFINITY), f64::INFINITY);
        assert_eq!(round_trip(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn nan_round_trips_as_a_nan() {
        assert!(round_trip(f64::NAN).is_nan());
    }

    #[test]
    fn pi_matches_its_known_binary_real_encoding() {
        let len = real_f64_length(std::f64::consts::PI);
        let mut c = Cursor::with_capacity(len);
        real_f64_write(&mut c, std::f64::consts::PI).unwrap();
        assert_eq!(
            c.data(),
            &[0x80, 0xD0, 0x03, 0x24, 0x3F, 0x6A, 0x88, 0x85, 0xA3]
        );
    }
}
