//! Null content (ISO/IEC 8825-1:2003 8.8), ported from
//! `crefl_asn1_ber_null_*` in `casn1.cc`: zero-length content, valid only
//! when the header declares `length == 0`.

use crate::asn1::{Asn1Error, Asn1Result};
use crate::cursor::Cursor;

pub fn null_length() -> usize {
    0
}

pub fn null_read(_c: &mut Cursor, len: usize) -> Asn1Result<()> {
    if len == 0 {
        Ok(())
    } else {
        Err(Asn1Error::UnsupportedLength)
    }
}

pub fn null_write(_c: &mut Cursor, len: usize) -> Asn1Result<()> {
    if len == 0 {
        Ok(())
    } else {
        Err(Asn1Error::UnsupportedLength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_round_trips_as_zero_bytes() {
        let mut c = Cursor::with_capacity(0);
        null_write(&mut c, 0).unwrap();
        c.reset();
        assert!(null_read(&mut c, 0).is_ok());
    }

    #[test]
    fn nonzero_length_is_rejected() {
        let mut c = Cursor::with_capacity(0);
        assert!(null_write(&mut c, 1).is_err());
    }
}
