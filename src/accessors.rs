//! Tagged accessors over [`DeclRef`]: total functions that return the null
//! ref (or `false`) on a tag mismatch instead of panicking, mirroring
//! `crefl_field_type`/`crefl_is_*` and friends in `cmodel.cc`.

use crate::{DeclRef, NodeTag};

macro_rules! is_tag {
    ($(#[$doc:meta])* $fn_name:ident, $tag:ident) => {
        $(#[$doc])*
        pub fn $fn_name(d: &DeclRef<'_>) -> bool {
            !d.is_null() && d.tag() == NodeTag::$tag
        }
    };
}

is_tag!(is_typedef, Typedef);
is_tag!(is_intrinsic, Intrinsic);
is_tag!(is_set, Set);
is_tag!(is_enum, Enum);
is_tag!(is_struct, Struct);
is_tag!(is_union, Union);
is_tag!(is_field, Field);
is_tag!(is_array, Array);
is_tag!(is_pointer, Pointer);
is_tag!(is_constant, Constant);
is_tag!(is_function, Function);
is_tag!(is_param, Param);
is_tag!(is_qualifier, Qualifier);
is_tag!(is_attribute, Attribute);
is_tag!(is_value, Value);
is_tag!(is_archive, Archive);
is_tag!(is_source, Source);
is_tag!(is_alias, Alias);

/// True for any node that denotes a type (as opposed to a value, attribute
/// or structural container): everything but `none`/`param`/`attribute`/
/// `value`/`archive`/`source`.
pub fn is_type(d: &DeclRef<'_>) -> bool {
    if d.is_null() {
        return false;
    }
    !matches!(
        d.tag(),
        NodeTag::None
            | NodeTag::Param
            | NodeTag::Attribute
            | NodeTag::Value
            | NodeTag::Archive
            | NodeTag::Source
    )
}

macro_rules! typed_link {
    ($(#[$doc:meta])* $fn_name:ident, $tag:ident) => {
        $(#[$doc])*
        pub fn $fn_name<'a>(d: &DeclRef<'a>) -> DeclRef<'a> {
            if !d.is_null() && d.tag() == NodeTag::$tag {
                d.link()
            } else {
                DeclRef::null(d.db)
            }
        }
    };
}

typed_link!(
    /// The type a `typedef` node names, or the null ref if `d` isn't one.
    typedef_type,
    Typedef
);
typed_link!(
    /// The type a `field` node holds, or the null ref if `d` isn't one.
    field_type,
    Field
);
typed_link!(
    /// The element type of an `array` node, or the null ref if `d` isn't one.
    array_type,
    Array
);
typed_link!(
    /// The pointee type of a `pointer` node, or the null ref if `d` isn't
    /// one. The pointer's own width is carried separately in `quantity`,
    /// see [`pointer_width`].
    pointer_type,
    Pointer
);
typed_link!(
    /// The type of a `constant` node's value, or the null ref if `d` isn't
    /// one.
    constant_type,
    Constant
);
typed_link!(
    /// The type a `param` node declares, or the null ref if `d` isn't one.
    param_type,
    Param
);
typed_link!(
    /// The qualified type beneath a `qualifier` node, or the null ref if
    /// `d` isn't one.
    qualifier_type,
    Qualifier
);
typed_link!(
    /// The value node an `attribute` carries, or the null ref if `d` isn't
    /// an `attribute` or carries none.
    attribute_value,
    Attribute
);

/// Number of repetitions of an array's element type, or 0 if `d` isn't an
/// `array` node.
pub fn array_count(d: &DeclRef<'_>) -> u64 {
    if is_array(d) {
        d.quantity()
    } else {
        0
    }
}

/// Bit width of a pointer's representation, or 0 if `d` isn't a `pointer`
/// node.
pub fn pointer_width(d: &DeclRef<'_>) -> u64 {
    if is_pointer(d) {
        d.quantity()
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use crate::DeclDb;

    #[test]
    fn field_type_returns_null_on_mismatch() {
        let mut db = DeclDb::new();
        builtin::install(&mut db);
        let r = db.r#ref(crate::DeclId(1)); // an intrinsic, not a field
        assert!(field_type(&r).is_null());
    }

    #[test]
    fn field_type_follows_link_on_match() {
        let mut db = DeclDb::new();
        builtin::install(&mut db);
        let int_id = builtin::by_name(&db, "int").unwrap().id;
        let field_id = db.decl_new(NodeTag::Field);
        db.set_link(field_id, int_id);
        let r = db.r#ref(field_id);
        let t = field_type(&r);
        assert_eq!(t.id, int_id);
        assert_eq!(t.name(), "int");
    }

    #[test]
    fn is_type_excludes_structural_tags() {
        let mut db = DeclDb::new();
        builtin::install(&mut db);
        let src = db.r#ref(db.decl_new(NodeTag::Source));
        let int_ref = builtin::by_name(&db, "int").unwrap();
        assert!(!is_type(&src));
        assert!(is_type(&int_ref));
    }
}
