//! ASN.1 X.690 BER/DER primitives (component B), one file per primitive
//! mirroring `casn1.cc`/`casn1.h`'s split and `idb-rs`'s own `til/`
//! directory granularity: identifier, length, boolean, integer, real,
//! OID, octet string, null, plus a `der` module composing identifier +
//! length + content the way `crefl_asn1_der_*` does.
//!
//! Every primitive here is a thin, total wrapper over [`crate::cursor::Cursor`]:
//! nothing allocates beyond what the value itself needs, and malformed
//! input is always a [`crate::cursor::CodecError`] or an [`Asn1Error`], never a panic.

pub mod boolean;
pub mod der;
pub mod ident;
pub mod integer;
pub mod length;
pub mod null;
pub mod octets;
pub mod oid;
pub mod real;

pub use ident::{Class, Identifier};
pub use oid::Oid;

use std::fmt;

use crate::cursor::CodecError;

/// Universal tag numbers, the `asn1_tag` enum in `casn1.h`. Non-contiguous
/// because ASN.1 reserves several numbers the original language front end
/// never emits (14, 15, 21, 29); kept as named constants rather than an
/// enum so a `Tag(9)` read off the wire for an unlisted number round-trips
/// instead of failing to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u64);

impl Tag {
    pub const RESERVED: Tag = Tag(0);
    pub const BOOLEAN: Tag = Tag(1);
    pub const INTEGER: Tag = Tag(2);
    pub const BIT_STRING: Tag = Tag(3);
    pub const OCTET_STRING: Tag = Tag(4);
    pub const NULL: Tag = Tag(5);
    pub const OBJECT_IDENTIFIER: Tag = Tag(6);
    pub const OBJECT_DESCRIPTOR: Tag = Tag(7);
    pub const EXTERNAL: Tag = Tag(8);
    pub const REAL: Tag = Tag(9);
    pub const ENUMERATED: Tag = Tag(10);
    pub const EMBEDDED_PDV: Tag = Tag(11);
    pub const UTF8_STRING: Tag = Tag(12);
    pub const RELATIVE_OID: Tag = Tag(13);
    pub const SEQUENCE: Tag = Tag(16);
    pub const SET: Tag = Tag(17);
    pub const NUMERIC_STRING: Tag = Tag(18);
    pub const PRINTABLE_STRING: Tag = Tag(19);
    pub const T61_STRING: Tag = Tag(20);
    pub const IA5_STRING: Tag = Tag(22);
    pub const UTC_TIME: Tag = Tag(23);
    pub const GENERALIZED_TIME: Tag = Tag(24);
    pub const GRAPHIC_STRING: Tag = Tag(25);
    pub const ISO646_STRING: Tag = Tag(26);
    pub const GENERAL_STRING: Tag = Tag(27);
    pub const UTF32_STRING: Tag = Tag(28);
    pub const UTF16_STRING: Tag = Tag(30);
}

const TAG_NAMES: [&str; 32] = [
    "reserved",
    "boolean",
    "integer",
    "bit_string",
    "octet_string",
    "null",
    "object_identifier",
    "object_descriptor",
    "external",
    "real",
    "enumerated",
    "embedded_pdv",
    "utf8_string",
    "relative_oid",
    "reserved_14",
    "reserved_15",
    "sequence",
    "set",
    "numeric_string",
    "printable_string",
    "t61_string",
    "reserved_21",
    "ia5_string",
    "utc_time",
    "generalized_time",
    "graphic_string",
    "iso646_string",
    "general_string",
    "utf32_string",
    "reserved_29",
    "utf16_string",
    "reserved_31",
];

/// Name of a universal tag number, `"<unknown>"` for anything `>= 32`, the
/// Rust counterpart of `asn1_tag_name`.
pub fn tag_name(tag: u64) -> &'static str {
    TAG_NAMES.get(tag as usize).copied().unwrap_or("<unknown>")
}

/// Malformed-encoding errors specific to the ASN.1 layer, distinct from
/// [`CodecError`]'s plain buffer over/underflow: a length that uses the
/// unsupported indefinite form, a high-tag-number encoding that doesn't
/// round-trip, a REAL encoding using a base/scale/exponent-mode this codec
/// doesn't implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asn1Error {
    Codec(CodecError),
    /// Long-form length declared `n == 0` (indefinite form) or `n > 8`.
    UnsupportedLength,
    /// High-tag-number continuation used for a value that fits in the
    /// low-tag-number form, or a tag number wider than 56 bits.
    InvalidTagNumber,
    /// A REAL's format/base/scale/exponent-mode byte isn't one this codec
    /// decodes (non-binary base, 3-byte or length-prefixed exponent).
    UnsupportedRealEncoding,
    /// An integer length byte outside 1..=8.
    InvalidIntegerLength,
}

impl From<CodecError> for Asn1Error {
    fn from(e: CodecError) -> Self {
        Asn1Error::Codec(e)
    }
}

impl fmt::Display for Asn1Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asn1Error::Codec(e) => write!(f, "{e}"),
            Asn1Error::UnsupportedLength => write!(f, "unsupported ASN.1 length encoding"),
            Asn1Error::InvalidTagNumber => write!(f, "invalid ASN.1 high tag number encoding"),
            Asn1Error::UnsupportedRealEncoding => {
                write!(f, "unsupported ASN.1 REAL encoding")
            }
            Asn1Error::InvalidIntegerLength => write!(f, "invalid ASN.1 integer length"),
        }
    }
}

impl std::error::Error for Asn1Error {}

pub type Asn1Result<T> = Result<T, Asn1Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_name_covers_the_32_entry_table() {
        assert_eq!(tag_name(9), "real");
        assert_eq!(tag_name(14), "reserved_14");
        assert_eq!(tag_name(32), "<unknown>");
    }
}
