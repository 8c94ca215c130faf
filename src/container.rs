//! The on-disk container (§6.1): a fixed header, a packed array of node
//! records and a trailing string-table blob. No file in `original_source/`
//! survived the retrieval filter under this name (`cfileio.cc` was
//! filtered out); the layout here follows the on-disk container format
//! described below, using `bincode`/`serde` for the fixed-width binary
//! fields the same way `idb-rs` uses them for IDA's own binary fields.
//!
//! Node records store their `name` offset relative to the start of the
//! *user* string-table blob, not the combined heap, so that a record
//! written by one process reads back correctly regardless of where the
//! reader's built-in prefix happens to end — the reader rebases every
//! offset by the current built-in heap length as it appends the blob.

use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::props::Props;
use crate::{DeclDb, DeclId, NodeTag};

pub const MAGIC: [u8; 8] = *b"crefl_00";

#[derive(Serialize, Deserialize)]
struct RawHeader {
    magic: [u8; 8],
    entry_count: u32,
    string_table_size: u32,
    root_element: u32,
}

#[derive(Serialize, Deserialize)]
struct RawRecord {
    tag: u8,
    props: u32,
    name: u32,
    next: u32,
    link: u32,
    attr: u32,
    source: u32,
    quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// The built-in prefix wasn't installed before reading.
    NoDefaults,
    /// The 8-byte magic didn't match `"crefl_00"`.
    BadMagic,
    /// A tag byte, or a `next`/`link`/`attr`/`source`/root reference,
    /// doesn't name a node that will exist once the file is loaded.
    OutOfRange,
    /// The header or a record couldn't be decoded as fixed-width fields.
    Malformed(String),
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::NoDefaults => write!(f, "destination db has no built-in defaults installed"),
            ContainerError::BadMagic => write!(f, "bad container magic"),
            ContainerError::OutOfRange => write!(f, "reference out of range in container file"),
            ContainerError::Malformed(e) => write!(f, "malformed container: {e}"),
        }
    }
}

impl std::error::Error for ContainerError {}

pub type ContainerResult<T> = Result<T, ContainerError>;

/// Serializes `db`'s user-contributed nodes (everything past the built-in
/// intrinsic prefix) plus its user string heap into the on-disk format.
pub fn write(db: &DeclDb) -> ContainerResult<Vec<u8>> {
    let entry_count = (db.len() - db.decl_builtin) as u32;
    let user_bytes = db.names.user_bytes();
    let builtin_len = db.names.builtin_len() as u32;

    let header = RawHeader {
        magic: MAGIC,
        entry_count,
        string_table_size: user_bytes.len() as u32,
        root_element: db.root_element.0,
    };

    let mut out = Vec::new();
    bincode::serialize_into(&mut out, &header).map_err(|e| ContainerError::Malformed(e.to_string()))?;

    for idx in db.decl_builtin..db.len() {
        let id = DeclId(idx as u32);
        let name_off = db.name_offset(id);
        let rel_name = if name_off == 0 { 0 } else { name_off - builtin_len };
        let rec = RawRecord {
            tag: db.tag(id).into(),
            props: db.props(id).bits(),
            name: rel_name,
            next: db.next(id).0,
            link: db.link(id).0,
            attr: db.attr(id).0,
            source: db.source(id).0,
            quantity: db.quantity(id),
        };
        bincode::serialize_into(&mut out, &rec).map_err(|e| ContainerError::Malformed(e.to_string()))?;
    }

    out.extend_from_slice(user_bytes);
    Ok(out)
}

/// Populates `db` (which must already have [`crate::builtin::install`]
/// applied and nothing else) from a byte blob produced by [`write`]. User
/// ids in the file line up one-to-one with the new ids appended to `db`,
/// per §6.1.
pub fn read(db: &mut DeclDb, bytes: &[u8]) -> ContainerResult<()> {
    if db.decl_builtin <= 1 {
        return Err(ContainerError::NoDefaults);
    }

    let mut cur = std::io::Cursor::new(bytes);
    let header: RawHeader =
        bincode::deserialize_from(&mut cur).map_err(|e| ContainerError::Malformed(e.to_string()))?;
    if header.magic != MAGIC {
        return Err(ContainerError::BadMagic);
    }

    let mut records = Vec::with_capacity(header.entry_count as usize);
    for _ in 0..header.entry_count {
        let rec: RawRecord =
            bincode::deserialize_from(&mut cur).map_err(|e| ContainerError::Malformed(e.to_string()))?;
        NodeTag::try_from(rec.tag).map_err(|_| ContainerError::OutOfRange)?;
        records.push(rec);
    }

    let mut string_bytes = vec![0u8; header.string_table_size as usize];
    cur.read_exact(&mut string_bytes).map_err(|e| ContainerError::Malformed(e.to_string()))?;

    let first_user_id = db.decl_builtin as u32;
    let total_ids = first_user_id + header.entry_count;

    let check_ref = |v: u32| -> ContainerResult<()> {
        if v != 0 && v >= total_ids {
            return Err(ContainerError::OutOfRange);
        }
        Ok(())
    };
    for rec in &records {
        check_ref(rec.next)?;
        check_ref(rec.link)?;
        check_ref(rec.attr)?;
        check_ref(rec.source)?;
        if rec.name != 0 && rec.name >= header.string_table_size {
            return Err(ContainerError::OutOfRange);
        }
    }
    if header.root_element != 0 && header.root_element >= total_ids {
        return Err(ContainerError::OutOfRange);
    }

    let heap_base = db.names.append_block(&string_bytes);

    for rec in records {
        let tag = NodeTag::try_from(rec.tag).expect("validated above");
        let id = db.decl_new(tag);
        let name = if rec.name == 0 { 0 } else { heap_base + rec.name };
        db.set_name(id, name);
        db.set_props(id, Props::from_bits(rec.props));
        db.set_next(id, DeclId(rec.next));
        db.set_link(id, DeclId(rec.link));
        db.set_attr(id, DeclId(rec.attr));
        db.set_source(id, DeclId(rec.source));
        db.set_quantity(id, rec.quantity);
    }
    db.root_element = DeclId(header.root_element);

    Ok(())
}
