//! Linker / merger (component F): copy-and-deduplicate N source graphs
//! into one destination archive, ported from `crefl_copy_node`/
//! `crefl_link_merge` in `clink.cc`.
//!
//! The destination keeps a single `hash -> DeclId` map across every input.
//! Container types (set/enum/struct/union/function) that hash equal to one
//! already copied are reused; non-container types (typedefs, fields,
//! params, pointers, arrays, qualifiers) are always copied fresh so their
//! `next` link stays position-specific, per §4.4.

use std::collections::HashMap;
use std::fmt;

use crate::hash::{Digest, HashIndex};
use crate::{DeclDb, DeclId, NodeTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// A source `DeclDb`'s built-in intrinsic prefix doesn't match the
    /// destination's.
    IncompatibleBuiltins,
    /// A source's `root_element` is null or not a `source` node.
    InvalidRoot,
    /// A reference inside a source graph points outside its own arena.
    OutOfRange,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::IncompatibleBuiltins => write!(f, "source built-in prefix does not match destination"),
            LinkError::InvalidRoot => write!(f, "source root is not a valid `source` node"),
            LinkError::OutOfRange => write!(f, "reference out of range in source graph"),
        }
    }
}

impl std::error::Error for LinkError {}

pub type LinkResult<T> = Result<T, LinkError>;

/// Merges `inputs` into a fresh `archive` node in `dst`, named `name`. `dst`
/// must already carry the default built-in intrinsics and nothing else.
/// Returns the id of the new archive, also recorded as `dst.root_element`.
pub fn link(dst: &mut DeclDb, name: &str, inputs: &[&DeclDb]) -> LinkResult<DeclId> {
    for src in inputs {
        if src.decl_builtin != dst.decl_builtin {
            return Err(LinkError::IncompatibleBuiltins);
        }
    }

    let mut merger = Merger::new();
    let archive_id = dst.decl_new(NodeTag::Archive);
    let off = dst.name_new(name);
    dst.set_name(archive_id, off);

    let mut prev = DeclId::NULL;
    let mut first = DeclId::NULL;
    for src in inputs {
        let root = src.root_element;
        if root.is_null() || !src.in_bounds(root) || src.tag(root) != NodeTag::Source {
            return Err(LinkError::InvalidRoot);
        }
        let mut index = HashIndex::new();
        let new_source = merger.copy(dst, src, &mut index, root, true, DeclId::NULL)?;
        if first.is_null() {
            first = new_source;
        }
        if !prev.is_null() {
            dst.set_next(prev, new_source);
        }
        prev = new_source;
    }
    dst.set_link(archive_id, first);
    dst.root_element = archive_id;
    Ok(archive_id)
}

/// The `hash -> DeclId` map, shared across every input graph of one merge
/// so that identical declarations in different translation units collapse
/// to a single destination node.
pub struct Merger {
    map: HashMap<Digest, DeclId>,
}

impl Merger {
    pub fn new() -> Self {
        Merger { map: HashMap::new() }
    }

    /// Copies `n` (from `src`) into `dst`, reusing or aliasing per §4.4.
    /// `via_link` is true when `n` was reached through its parent's single
    /// `link` field rather than a sibling `next` chain; `cur_source` is the
    /// destination id of the enclosing `source` node, threaded down so
    /// every copied node's own `source` field points at it.
    fn copy(
        &mut self,
        dst: &mut DeclDb,
        src: &DeclDb,
        index: &mut HashIndex,
        n: DeclId,
        via_link: bool,
        cur_source: DeclId,
    ) -> LinkResult<DeclId> {
        if n.is_null() {
            return Ok(DeclId::NULL);
        }
        if !src.in_bounds(n) {
            return Err(LinkError::OutOfRange);
        }

        if src.tag(n) == NodeTag::Intrinsic {
            return Ok(n);
        }

        let h = index.hash(src, n);
        let is_container = src.tag(n).is_container();

        if let Some(&existing) = self.map.get(&h) {
            if is_container {
                if via_link {
                    return Ok(existing);
                }
                let alias = dst.decl_new(NodeTag::Alias);
                let name = src.decl_name(n);
                if !name.is_empty() {
                    let off = dst.name_new(name);
                    dst.set_name(alias, off);
                }
                dst.set_link(alias, existing);
                dst.set_source(alias, cur_source);
                return Ok(alias);
            }
            // Non-container hit: fall through, always copied fresh.
        }

        let new_id = dst.decl_new(src.tag(n));
        self.map.insert(h, new_id);

        let name = src.decl_name(n);
        if !name.is_empty() {
            let off = dst.name_new(name);
            dst.set_name(new_id, off);
        }
        dst.set_props(new_id, src.props(n));
        dst.set_quantity(new_id, src.quantity(n));
        dst.set_source(new_id, cur_source);

        let child_source = if src.tag(n) == NodeTag::Source { new_id } else { cur_source };

        let attr = src.attr(n);
        if !attr.is_null() {
            let new_attr = self.copy(dst, src, index, attr, true, child_source)?;
            dst.set_attr(new_id, new_attr);
        }

        let link_target = src.link(n);
        if !link_target.is_null() {
            if is_container {
                let mut child = link_target;
                let mut via = true;
                let mut head = DeclId::NULL;
                let mut prev = DeclId::NULL;
                while !child.is_null() {
                    if !src.in_bounds(child) {
                        return Err(LinkError::OutOfRange);
                    }
                    let new_child = self.copy(dst, src, index, child, via, child_source)?;
                    via = false;
                    if head.is_null() {
                        head = new_child;
                    }
                    if !prev.is_null() {
                        dst.set_next(prev, new_child);
                    }
                    prev = new_child;
                    child = src.next(child);
                }
                dst.set_link(new_id, head);
            } else {
                let new_link = self.copy(dst, src, index, link_target, true, child_source)?;
                dst.set_link(new_id, new_link);
            }
        }

        Ok(new_id)
    }
}

impl Default for Merger {
    fn default() -> Self {
        Merger::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{accessors, builtin, enumerate};

    fn unit_with_point(source_name: &str) -> DeclDb {
        let mut db = DeclDb::new();
        builtin::install(&mut db);
        let float_id = builtin::by_name(&db, "float").unwrap().id;

        let fx = db.decl_new(NodeTag::Field);
        let nx = db.name_new("x");
        db.set_name(fx, nx);
        db.set_link(fx, float_id);

        let fy = db.decl_new(NodeTag::Field);
        let ny = db.name_new("y");
        db.set_name(fy, ny);
        db.set_link(fy, float_id);
        db.set_next(fx, fy);

        let st = db.decl_new(NodeTag::Struct);
        let sn = db.name_new("point");
        db.set_name(st, sn);
        db.set_link(st, fx);

        let src = db.decl_new(NodeTag::Source);
        let srcname = db.name_new(source_name);
        db.set_name(src, srcname);
        db.set_link(src, st);

        db.root_element = src;
        db
    }

    #[test]
    fn merge_two_units_dedups_the_identical_struct() {
        let unit_a = unit_with_point("a.c");
        let unit_b = unit_with_point("b.c");

        let mut dst = DeclDb::new();
        builtin::install(&mut dst);
        let archive = link(&mut dst, "prog", &[&unit_a, &unit_b]).unwrap();

        let archive_ref = dst.r#ref(archive);
        let sources = enumerate::archive_sources(&archive_ref).unwrap();
        assert_eq!(sources.len(), 2);

        let structs: Vec<_> = sources
            .iter()
            .map(|s| enumerate::source_decls(s).unwrap())
            .map(|decls| {
                decls
                    .into_iter()
                    .find(|d| accessors::is_struct(d) || accessors::is_alias(d))
                    .unwrap()
            })
            .collect();

        // Resolve through an alias to its canonical target if needed.
        let resolve = |d: &crate::DeclRef<'_>| -> DeclId {
            if accessors::is_alias(d) {
                d.db.link(d.id)
            } else {
                d.id
            }
        };
        assert_eq!(resolve(&structs[0]), resolve(&structs[1]));
    }

    #[test]
    fn merge_is_idempotent_with_itself() {
        let unit = unit_with_point("a.c");

        let mut dst = DeclDb::new();
        builtin::install(&mut dst);
        let archive = link(&mut dst, "prog", &[&unit, &unit]).unwrap();

        let archive_ref = dst.r#ref(archive);
        let sources = enumerate::archive_sources(&archive_ref).unwrap();
        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn rejects_mismatched_builtin_prefixes() {
        let unit = unit_with_point("a.c");
        let mut dst = DeclDb::new(); // no defaults installed: decl_builtin == 1
        let err = link(&mut dst, "prog", &[&unit]).unwrap_err();
        assert_eq!(err, LinkError::IncompatibleBuiltins);
    }

    #[test]
    fn merged_struct_width_matches_source_width() {
        let unit = unit_with_point("a.c");
        let mut dst = DeclDb::new();
        builtin::install(&mut dst);
        let archive = link(&mut dst, "prog", &[&unit]).unwrap();

        let archive_ref = dst.r#ref(archive);
        let source = enumerate::archive_sources(&archive_ref).unwrap().remove(0);
        let st = enumerate::source_decls(&source)
            .unwrap()
            .into_iter()
            .find(accessors::is_struct)
            .unwrap();
        assert_eq!(crate::width::struct_width(&st), 64);
    }

    #[test]
    fn repeated_declaration_within_one_source_becomes_an_alias() {
        let mut db = DeclDb::new();
        builtin::install(&mut db);
        let float_id = builtin::by_name(&db, "float").unwrap().id;

        let new_struct = |db: &mut DeclDb| {
            let fx = db.decl_new(NodeTag::Field);
            let nx = db.name_new("x");
            db.set_name(fx, nx);
            db.set_link(fx, float_id);
            let st = db.decl_new(NodeTag::Struct);
            let sn = db.name_new("point");
            db.set_name(st, sn);
            db.set_link(st, fx);
            st
        };

        let first = new_struct(&mut db);
        let second = new_struct(&mut db);
        db.set_next(first, second);

        let src = db.decl_new(NodeTag::Source);
        let srcname = db.name_new("a.c");
        db.set_name(src, srcname);
        db.set_link(src, first);
        db.root_element = src;

        let mut dst = DeclDb::new();
        builtin::install(&mut dst);
        let archive = link(&mut dst, "prog", &[&db]).unwrap();

        let archive_ref = dst.r#ref(archive);
        let source = enumerate::archive_sources(&archive_ref).unwrap().remove(0);
        let decls = enumerate::source_decls(&source).unwrap();
        assert_eq!(decls.len(), 2);
        assert!(accessors::is_struct(&decls[0]));
        assert!(accessors::is_alias(&decls[1]));
        assert_eq!(decls[1].db.link(decls[1].id), decls[0].id);
    }
}
