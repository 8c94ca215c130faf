//! Length octets, ported from `crefl_asn1_ber_length_*` in `casn1.cc`: the
//! short form for lengths `<= 0x7f`, the long form (a length-of-length byte
//! followed by that many big-endian bytes) otherwise. The indefinite form
//! (`length-of-length == 0`) is explicitly unsupported, matching the
//! original's own rejection of it.

use crate::asn1::{Asn1Error, Asn1Result};
use crate::cursor::Cursor;

pub fn length_length(length: u64) -> usize {
    1 + if length >= 0x80 { 8 - (length.leading_zeros() / 8) as usize } else { 0 }
}

pub fn length_read(c: &mut Cursor) -> Asn1Result<u64> {
    let b = c.read_u8()?;
    if b & 0x80 == 0 {
        return Ok((b & 0x7f) as u64);
    }
    let llen = (b & 0x7f) as usize;
    if llen == 0 || llen > 8 {
        return Err(Asn1Error::UnsupportedLength);
    }
    let mut l: u64 = 0;
    for _ in 0..llen {
        let b = c.read_u8()?;
        l = (l << 8) | b as u64;
    }
    Ok(l)
}

pub fn length_write(c: &mut Cursor, length: u64) -> Asn1Result<()> {
    if length <= 0x7f {
        c.write_u8(length as u8)?;
        return Ok(());
    }
    let llen = 8 - (length.leading_zeros() / 8) as usize;
    c.write_u8(llen as u8 | 0x80)?;
    let mut l = length << (64 - llen * 8);
    for _ in 0..llen {
        c.write_u8((l >> 56) as u8)?;
        l <<= 8;
    }
    Ok(())
}
