//! Child-list walkers over container nodes, following the count-then-fill
//! convention of `_decl_array_fetch` in `cmodel.cc`: a caller asks for a
//! count with an empty buffer, allocates, then asks again to fill it. The
//! Rust rendition collapses both passes into one `Vec`-returning call,
//! which is the idiomatic Rust replacement for that two-pass convention,
//! but the predicate-gated sibling walk underneath is unchanged.

use crate::accessors;
use crate::{DeclRef, NodeTag};

fn fetch<'a>(root: DeclRef<'a>, pred: impl Fn(&DeclRef<'a>) -> bool) -> Vec<DeclRef<'a>> {
    let mut out = Vec::new();
    let mut d = root;
    while !d.is_null() {
        if pred(&d) {
            out.push(d);
        }
        d = d.next();
    }
    out
}

/// `None` if `d` isn't an `enum` node, otherwise its `constant` children.
pub fn enum_constants<'a>(d: &DeclRef<'a>) -> Option<Vec<DeclRef<'a>>> {
    if !accessors::is_enum(d) {
        return None;
    }
    Some(fetch(d.link(), accessors::is_constant))
}

/// `None` if `d` isn't a `set` node, otherwise its `constant` children.
pub fn set_constants<'a>(d: &DeclRef<'a>) -> Option<Vec<DeclRef<'a>>> {
    if !accessors::is_set(d) {
        return None;
    }
    Some(fetch(d.link(), accessors::is_constant))
}

/// `None` if `d` isn't a `struct` node, otherwise its `field` children.
pub fn struct_fields<'a>(d: &DeclRef<'a>) -> Option<Vec<DeclRef<'a>>> {
    if !accessors::is_struct(d) {
        return None;
    }
    Some(fetch(d.link(), accessors::is_field))
}

/// `None` if `d` isn't a `union` node, otherwise its `field` children.
pub fn union_fields<'a>(d: &DeclRef<'a>) -> Option<Vec<DeclRef<'a>>> {
    if !accessors::is_union(d) {
        return None;
    }
    Some(fetch(d.link(), accessors::is_field))
}

/// `None` if `d` isn't a `function` node, otherwise its `param` children.
pub fn function_params<'a>(d: &DeclRef<'a>) -> Option<Vec<DeclRef<'a>>> {
    if !accessors::is_function(d) {
        return None;
    }
    Some(fetch(d.link(), accessors::is_param))
}

/// `None` if `d` isn't a `source` node, otherwise every declaration in it.
pub fn source_decls<'a>(d: &DeclRef<'a>) -> Option<Vec<DeclRef<'a>>> {
    if !accessors::is_source(d) {
        return None;
    }
    Some(fetch(d.link(), |_| true))
}

/// `None` if `d` isn't a `source` node, otherwise just its type decls.
pub fn source_types<'a>(d: &DeclRef<'a>) -> Option<Vec<DeclRef<'a>>> {
    if !accessors::is_source(d) {
        return None;
    }
    Some(fetch(d.link(), accessors::is_type))
}

/// `None` if `d` isn't a `source` node, otherwise just its `field` decls.
pub fn source_fields<'a>(d: &DeclRef<'a>) -> Option<Vec<DeclRef<'a>>> {
    if !accessors::is_source(d) {
        return None;
    }
    Some(fetch(d.link(), accessors::is_field))
}

/// `None` if `d` isn't a `source` node, otherwise just its `function` decls.
pub fn source_functions<'a>(d: &DeclRef<'a>) -> Option<Vec<DeclRef<'a>>> {
    if !accessors::is_source(d) {
        return None;
    }
    Some(fetch(d.link(), accessors::is_function))
}

/// `None` if `d` isn't an `archive` node, otherwise its `source` children.
pub fn archive_sources<'a>(d: &DeclRef<'a>) -> Option<Vec<DeclRef<'a>>> {
    if !accessors::is_archive(d) {
        return None;
    }
    Some(fetch(d.link(), accessors::is_source))
}

/// True for any node (used by `source_decls`'s "any declaration" predicate).
pub fn is_any(_d: &DeclRef<'_>) -> bool {
    true
}

/// Raw constant value carried by a `value`/`constant` node's `quantity`
/// field, or `None` if `d` isn't a `constant`.
pub fn constant_value(d: &DeclRef<'_>) -> Option<u64> {
    if accessors::is_constant(d) {
        Some(d.quantity())
    } else {
        None
    }
}

/// Function entry address carried in a `function` node's `quantity` field,
/// or `None` if `d` isn't a `function`.
pub fn function_addr(d: &DeclRef<'_>) -> Option<u64> {
    if d.tag() == NodeTag::Function {
        Some(d.quantity())
    } else {
        None
    }
}
