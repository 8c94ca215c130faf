//! The fixed table of built-in intrinsic types, installed once per
//! [`DeclDb`] before any user declarations are added.
//!
//! Ported field-for-field from `all_types[]` in the original `ctypes.cc`.
//! The vector types (`vec2h`..`vec4ul`) that file guards out with `#if 0`
//! stay excluded here too; see DESIGN.md's open-question resolutions.

use crate::props::Props;
use crate::{DeclDb, DeclId, NodeTag};

struct Intrinsic {
    name: &'static str,
    width: u64,
    props: Props,
}

const TABLE: &[Intrinsic] = &[
    Intrinsic { name: "void", width: 0, props: Props(Props::PAD_BIT.0) },
    Intrinsic { name: "bool", width: 1, props: Props(Props::SINT.0 | Props::PAD_BYTE.0) },
    Intrinsic { name: "bit", width: 1, props: Props(Props::UINT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "sign", width: 1, props: Props(Props::SINT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "ubyte", width: 8, props: Props(Props::UINT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "byte", width: 8, props: Props(Props::SINT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "ushort", width: 16, props: Props(Props::UINT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "short", width: 16, props: Props(Props::SINT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "uint", width: 32, props: Props(Props::UINT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "int", width: 32, props: Props(Props::SINT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "ulong", width: 64, props: Props(Props::UINT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "long", width: 64, props: Props(Props::SINT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "ucent", width: 128, props: Props(Props::UINT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "cent", width: 128, props: Props(Props::SINT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "half", width: 16, props: Props(Props::FLOAT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "float", width: 32, props: Props(Props::FLOAT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "double", width: 64, props: Props(Props::FLOAT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "quad", width: 128, props: Props(Props::FLOAT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "chalf", width: 32, props: Props(Props::CFLOAT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "cfloat", width: 64, props: Props(Props::CFLOAT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "cdouble", width: 128, props: Props(Props::CFLOAT.0 | Props::PAD_POW2.0) },
    Intrinsic { name: "cquad", width: 256, props: Props(Props::CFLOAT.0 | Props::PAD_POW2.0) },
];

/// Populates `db` with the 22 built-in intrinsics in table order and
/// freezes the arena/heap prefix they occupy, the Rust equivalent of
/// `crefl_db_defaults`. Must be called exactly once, before any user
/// declarations are created, since [`DeclDb::intrinsic`] only scans the
/// frozen prefix.
pub fn install(db: &mut DeclDb) {
    debug_assert!(db.is_empty(), "install must run before any user declarations exist");
    for entry in TABLE {
        let id = db.decl_new(NodeTag::Intrinsic);
        let name = db.name_new(entry.name);
        db.set_name(id, name);
        db.set_props(id, entry.props);
        db.set_quantity(id, entry.width);
    }
    db.freeze_builtin();
}

/// Looks up a built-in intrinsic by its table name (`"int"`, `"double"`,
/// ...). Returns `None` if `name` doesn't name a built-in.
pub fn by_name<'a>(db: &'a DeclDb, name: &str) -> Option<crate::DeclRef<'a>> {
    for idx in 1..db.decl_builtin {
        let id = DeclId(idx as u32);
        if db.decl_name(id) == name {
            return Some(db.r#ref(id));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installs_exactly_22_intrinsics_in_order() {
        let mut db = DeclDb::new();
        install(&mut db);
        assert_eq!(db.decl_builtin, 23); // node 0 (null) + 22 intrinsics
        assert_eq!(db.decl_name(DeclId(1)), "void");
        assert_eq!(db.decl_name(DeclId(22)), "cquad");
    }

    #[test]
    fn int_is_32_bit_signed_padded_to_power_of_two() {
        let mut db = DeclDb::new();
        install(&mut db);
        let r = by_name(&db, "int").unwrap();
        assert_eq!(r.quantity(), 32);
        assert!(r.props().contains(Props::SINT));
        assert!(r.props().contains(Props::PAD_POW2));
    }

    #[test]
    fn void_has_zero_width() {
        let mut db = DeclDb::new();
        install(&mut db);
        let r = by_name(&db, "void").unwrap();
        assert_eq!(r.quantity(), 0);
    }

    #[test]
    fn intrinsic_lookup_matches_by_props_superset_and_width() {
        let mut db = DeclDb::new();
        install(&mut db);
        let r = db.intrinsic(Props::SINT, 32);
        assert_eq!(r.name(), "int");
        assert!(db.intrinsic(Props::SINT, 17).is_null());
    }
}
