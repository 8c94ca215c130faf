//! Octet string content (ISO/IEC 8825-1:2003 8.7), ported from
//! `crefl_asn1_ber_octets_*` in `casn1.cc`: a raw byte copy, the length
//! octets carrying its size directly rather than a separate codec.

use crate::asn1::Asn1Result;
use crate::cursor::Cursor;

pub fn octets_length(bytes: &[u8]) -> usize {
    bytes.len()
}

pub fn octets_read(c: &mut Cursor, len: usize) -> Asn1Result<Vec<u8>> {
    Ok(c.read_bytes(len)?)
}

pub fn octets_write(c: &mut Cursor, bytes: &[u8]) -> Asn1Result<()> {
    c.write_bytes(bytes)?;
    Ok(())
}
