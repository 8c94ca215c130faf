//! DER framing: identifier + length + content, composing the primitives in
//! the sibling modules the way `crefl_asn1_der_*` composes
//! `crefl_asn1_ber_ident_*`/`crefl_asn1_ber_length_*` with each content
//! codec. Every function here always uses [`Class::Universal`] and a
//! primitive (non-constructed) identifier, matching every `crefl_asn1_der_*`
//! call site in `casn1.cc`.

use crate::asn1::ident::{ident_length, ident_read, ident_write, Class, Identifier};
use crate::asn1::length::{length_length, length_read, length_write};
use crate::asn1::oid::{self, Oid};
use crate::asn1::{boolean, integer, null, octets, real, Asn1Result, Tag};
use crate::cursor::Cursor;

fn universal(tag: Tag) -> Identifier {
    Identifier { class: Class::Universal, constructed: false, tag: tag.0 }
}

pub fn boolean_read(c: &mut Cursor) -> Asn1Result<bool> {
    ident_read(c)?;
    length_read(c)?;
    boolean::boolean_read(c)
}

pub fn boolean_write(c: &mut Cursor, value: bool) -> Asn1Result<()> {
    ident_write(c, universal(Tag::BOOLEAN))?;
    length_write(c, boolean::boolean_length(value) as u64)?;
    boolean::boolean_write(c, value)
}

pub fn integer_u64_read(c: &mut Cursor) -> Asn1Result<u64> {
    ident_read(c)?;
    let len = length_read(c)? as usize;
    integer::integer_u64_read(c, len)
}

pub fn integer_u64_write(c: &mut Cursor, value: u64) -> Asn1Result<()> {
    let len = integer::integer_u64_length(value);
    ident_write(c, universal(Tag::INTEGER))?;
    length_write(c, len as u64)?;
    integer::integer_u64_write(c, len, value)
}

pub fn integer_s64_read(c: &mut Cursor) -> Asn1Result<i64> {
    ident_read(c)?;
    let len = length_read(c)? as usize;
    integer::integer_s64_read(c, len)
}

pub fn integer_s64_write(c: &mut Cursor, value: i64) -> Asn1Result<()> {
    let len = integer::integer_s64_length(value);
    ident_write(c, universal(Tag::INTEGER))?;
    length_write(c, len as u64)?;
    integer::integer_s64_write(c, len, value)
}

pub fn real_f64_read(c: &mut Cursor) -> Asn1Result<f64> {
    ident_read(c)?;
    let len = length_read(c)? as usize;
    real::real_f64_read(c, len)
}

pub fn real_f64_write(c: &mut Cursor, value: f64) -> Asn1Result<()> {
    ident_write(c, universal(Tag::REAL))?;
    length_write(c, real::real_f64_length(value) as u64)?;
    real::real_f64_write(c, value)
}

pub fn oid_read(c: &mut Cursor) -> Asn1Result<Oid> {
    ident_read(c)?;
    let len = length_read(c)? as usize;
    oid::oid_read(c, len)
}

pub fn oid_write(c: &mut Cursor, value: &Oid) -> Asn1Result<()> {
    ident_write(c, universal(Tag::OBJECT_IDENTIFIER))?;
    length_write(c, oid::oid_length(value) as u64)?;
    oid::oid_write(c, value)
}

pub fn octets_read(c: &mut Cursor) -> Asn1Result<Vec<u8>> {
    ident_read(c)?;
    let len = length_read(c)? as usize;
    octets::octets_read(c, len)
}

pub fn octets_write(c: &mut Cursor, bytes: &[u8]) -> Asn1Result<()> {
    ident_write(c, universal(Tag::OCTET_STRING))?;
    length_write(c, octets::octets_length(bytes) as u64)?;
    octets::octets_write(c, bytes)
}

pub fn null_read(c: &mut Cursor) -> Asn1Result<()> {
    ident_read(c)?;
    let len = length_read(c)? as usize;
    null::null_read(c, len)
}

pub fn null_write(c: &mut Cursor) -> Asn1Result<()> {
    ident_write(c, universal(Tag::NULL))?;
    length_write(c, null::null_length() as u64)?;
    null::null_write(c, 0)
}

/// Encoded byte length of a DER-framed boolean (identifier + length + content).
pub fn boolean_framed_length(value: bool) -> usize {
    ident_length(universal(Tag::BOOLEAN)) + length_length(boolean::boolean_length(value) as u64)
        + boolean::boolean_length(value)
}
