//! Struct/union/array/pointer bit-width computation, ported directly from
//! `_pad_align`/`crefl_type_width`/`crefl_struct_width`/`crefl_union_width`
//! in `cmodel.cc`. Named and organized after `til/size_calculator.rs`'s
//! own type-size pass.

use crate::accessors;
use crate::props::Props;
use crate::{DeclRef, NodeTag};

const MAX_ALIGN_LOG2: u32 = 9; // 1 << 9 == 512 bits, the widest built-in (cquad)

fn log2_floor(width: u64) -> u32 {
    if width == 0 {
        0
    } else {
        63 - width.leading_zeros()
    }
}

/// Adds one field's contribution to a running struct offset (or, called
/// with `offset = 0`, computes a single field's own padded width for a
/// union). `count` repeats the padded unit, for arrays.
fn pad_align(offset: u64, width: u64, count: u64, props: Props) -> u64 {
    let n = log2_floor(width).min(MAX_ALIGN_LOG2);

    let (offset, addend) = if props.contains(Props::PAD_BYTE) {
        ((offset + 7) & !7, (width + 7) & !7)
    } else if props.contains(Props::PAD_POW2) {
        let mask = (1u64 << n) - 1;
        ((offset + mask) & !mask, (width + mask) & !mask)
    } else {
        (offset, width)
    };

    offset + addend * count
}

/// Bit width of an intrinsic, or 0 if `d` isn't one.
pub fn intrinsic_width(d: &DeclRef<'_>) -> u64 {
    if accessors::is_intrinsic(d) {
        d.quantity()
    } else {
        0
    }
}

/// Single dispatch point over every tag with a well-defined width: added
/// the Rust counterpart of `crefl_type_width`: a single dispatch point
/// over every tag with a well-defined width, rather than one function per
/// tag.
pub fn type_width(d: &DeclRef<'_>) -> u64 {
    match d.tag() {
        NodeTag::Intrinsic => intrinsic_width(d),
        NodeTag::Struct => struct_width(d),
        NodeTag::Union => union_width(d),
        NodeTag::Field => type_width(&d.link()),
        NodeTag::Array => {
            let elem = accessors::array_type(d);
            type_width(&elem) * accessors::array_count(d)
        }
        NodeTag::Pointer => accessors::pointer_width(d),
        _ => 0,
    }
}

/// One field's padded, aligned contribution starting from `offset` — for a
/// struct `offset` is the running total, for a union it's always 0 and the
/// caller takes the max across fields instead of accumulating. `None` for
/// field types that don't add width (bare typedefs etc, matching
/// `crefl_struct_width`'s switch falling through with no case).
fn field_contribution(offset: u64, t: &DeclRef<'_>) -> Option<u64> {
    match t.tag() {
        NodeTag::Array => {
            let elem = accessors::array_type(t);
            Some(pad_align(offset, type_width(&elem), t.quantity(), elem.props()))
        }
        NodeTag::Pointer => Some(pad_align(offset, type_width(t), 1, Props::PAD_POW2)),
        NodeTag::Struct => Some(pad_align(offset, type_width(t), 1, Props::PAD_POW2)),
        NodeTag::Union | NodeTag::Intrinsic => {
            Some(pad_align(offset, type_width(t), 1, t.props()))
        }
        _ => None,
    }
}

/// Sum of each field's padded, aligned offset contribution. 0 if `d` isn't
/// a `struct`.
pub fn struct_width(d: &DeclRef<'_>) -> u64 {
    if !accessors::is_struct(d) {
        return 0;
    }
    let mut offset = 0u64;
    let mut dx = d.link();
    while !dx.is_null() {
        if dx.tag() == NodeTag::Field {
            let t = accessors::field_type(&dx);
            if let Some(next) = field_contribution(offset, &t) {
                offset = next;
            }
        }
        dx = dx.next();
    }
    offset
}

/// Max over each field's own padded width. 0 if `d` isn't a `union`.
pub fn union_width(d: &DeclRef<'_>) -> u64 {
    if !accessors::is_union(d) {
        return 0;
    }
    let mut offset = 0u64;
    let mut dx = d.link();
    while !dx.is_null() {
        if dx.tag() == NodeTag::Field {
            let t = accessors::field_type(&dx);
            if let Some(width) = field_contribution(0, &t) {
                if width > offset {
                    offset = width;
                }
            }
        }
        dx = dx.next();
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builtin, DeclDb, NodeTag};

    fn field(db: &mut DeclDb, of: crate::DeclId) -> crate::DeclId {
        let f = db.decl_new(NodeTag::Field);
        db.set_link(f, of);
        f
    }

    #[test]
    fn struct_of_int_and_byte_packs_to_pow2_boundaries() {
        let mut db = DeclDb::new();
        builtin::install(&mut db);
        let int_id = builtin::by_name(&db, "int").unwrap().id; // 32 bits, pad_pow2
        let byte_id = builtin::by_name(&db, "byte").unwrap().id; // 8 bits, pad_pow2

        let f1 = field(&mut db, int_id);
        let f2 = field(&mut db, byte_id);
        db.set_next(f1, f2);
        let st = db.decl_new(NodeTag::Struct);
        db.set_link(st, f1);

        let r = db.r#ref(st);
        // int at offset 0 (32-bit aligned) -> offset 32; byte aligned to 8 -> 32+8 = 40
        assert_eq!(struct_width(&r), 40);
    }

    #[test]
    fn union_width_is_the_widest_field() {
        let mut db = DeclDb::new();
        builtin::install(&mut db);
        let int_id = builtin::by_name(&db, "int").unwrap().id; // 32
        let long_id = builtin::by_name(&db, "long").unwrap().id; // 64

        let f1 = field(&mut db, int_id);
        let f2 = field(&mut db, long_id);
        db.set_next(f1, f2);
        let un = db.decl_new(NodeTag::Union);
        db.set_link(un, f1);

        let r = db.r#ref(un);
        assert_eq!(union_width(&r), 64);
    }

    #[test]
    fn array_width_multiplies_element_width_by_count() {
        let mut db = DeclDb::new();
        builtin::install(&mut db);
        let int_id = builtin::by_name(&db, "int").unwrap().id;
        let arr = db.decl_new(NodeTag::Array);
        db.set_link(arr, int_id);
        db.set_quantity(arr, 4);

        let r = db.r#ref(arr);
        assert_eq!(type_width(&r), 128);
    }

    #[test]
    fn bool_is_byte_padded_not_pow2() {
        let mut db = DeclDb::new();
        builtin::install(&mut db);
        let bool_id = builtin::by_name(&db, "bool").unwrap().id;
        let bit_id = builtin::by_name(&db, "bit").unwrap().id;

        let f1 = field(&mut db, bool_id);
        let f2 = field(&mut db, bit_id);
        db.set_next(f1, f2);
        let st = db.decl_new(NodeTag::Struct);
        db.set_link(st, f1);

        let r = db.r#ref(st);
        // bool is 1 bit padded to a byte -> offset 8; bit is 1-bit pad_pow2 (n=0) -> +1 = 9
        assert_eq!(struct_width(&r), 9);
    }
}
