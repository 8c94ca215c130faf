//! Boolean content, ported from `crefl_asn1_ber_boolean_*` in `casn1.cc`:
//! always exactly one byte, zero for `false` and any nonzero byte decoding
//! to `true` (matching the original's `bool` cast of the raw byte rather
//! than an exact `0x01`/`0xff` check).

use crate::asn1::Asn1Result;
use crate::cursor::Cursor;

pub fn boolean_length(_value: bool) -> usize {
    1
}

pub fn boolean_read(c: &mut Cursor) -> Asn1Result<bool> {
    Ok(c.read_u8()? != 0)
}

pub fn boolean_write(c: &mut Cursor, value: bool) -> Asn1Result<()> {
    c.write_u8(value as u8)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn boolean_round_trips(#[case] value: bool) {
        let mut c = Cursor::with_capacity(1);
        boolean_write(&mut c, value).unwrap();
        c.reset();
        assert_eq!(boolean_read(&mut c).unwrap(), value);
    }

    #[test]
    fn any_nonzero_byte_reads_as_true() {
        let mut c = Cursor::from_bytes(vec![0x2a]);
        assert!(boolean_read(&mut c).unwrap());
    }
}
