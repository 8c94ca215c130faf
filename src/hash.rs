//! Content hasher & index (component E): a canonical SHA-224 digest for
//! every node, position-invariant and cycle-safe, ported from
//! `crefl_node_hash`/`crefl_hash_node_sum` and the `decl_entry`/`decl_index`
//! pair in `clink.cc`/`model.h`.
//!
//! A node's digest depends only on its own tag/name/props/quantity, its
//! attribute subtree, and (recursively) the nodes it links to or contains
//! — never on its own `next` pointer, which is what makes the digest
//! invariant to where a declaration sits among its siblings.

use sha2::{Digest as _, Sha224};

use crate::{DeclDb, DeclId, NodeTag, StringHeap};

/// A SHA-224 digest, the fixed-size hash every node is stamped with.
pub type Digest = [u8; 28];

#[derive(Clone, Copy, Default)]
struct Entry {
    fqn: u32,
    marked: bool,
    valid: bool,
    hash: Digest,
}

/// Parallel structure to a [`DeclDb`]'s node arena: one [`Entry`] per node
/// id, built lazily as [`HashIndex::hash`] visits nodes. Owns its own
/// private string heap for FQNs, matching §3.4's "index's private heap" —
/// an index never borrows or mutates the [`DeclDb`] it hashes.
#[derive(Default)]
pub struct HashIndex {
    entries: Vec<Entry>,
    heap: StringHeap,
}

impl HashIndex {
    pub fn new() -> Self {
        HashIndex { entries: Vec::new(), heap: StringHeap::default() }
    }

    fn ensure(&mut self, id: DeclId) {
        let need = id.index() + 1;
        if self.entries.len() < need {
            let mut cap = self.entries.len().max(1);
            while cap < need {
                cap *= 2;
            }
            self.entries.resize(cap, Entry::default());
        }
    }

    /// The digest of `id`, computing and caching it (and everything it
    /// reaches) if this is the first visit. Top-level entry point —
    /// `parent` is null and the FQN prefix starts empty.
    pub fn hash(&mut self, db: &DeclDb, id: DeclId) -> Digest {
        self.hash_node(db, id, DeclId::NULL, "")
    }

    /// The digest already computed for `id`, if any.
    pub fn hash_of(&self, id: DeclId) -> Option<Digest> {
        self.entries.get(id.index()).filter(|e| e.valid).map(|e| e.hash)
    }

    /// True if `id`'s entry is marked (currently on the recursion stack)
    /// but not yet valid — the index's cycle signal.
    fn is_cycle(&self, id: DeclId) -> bool {
        self.entries.get(id.index()).is_some_and(|e| e.marked && !e.valid)
    }

    /// The fully-qualified name recorded for `id` the last time it was
    /// hashed, `""` if it hasn't been visited.
    pub fn fqn(&self, id: DeclId) -> &str {
        self.entries.get(id.index()).map(|e| self.heap.get(e.fqn)).unwrap_or("")
    }

    fn compute_fqn(db: &DeclDb, id: DeclId, parent: DeclId, prefix: &str) -> String {
        if !parent.is_null() && matches!(db.tag(parent), NodeTag::Source | NodeTag::Archive) {
            return db.decl_name(id).to_string();
        }
        if matches!(db.tag(id), NodeTag::Array | NodeTag::Pointer) {
            return prefix.to_string();
        }
        let name = db.decl_name(id);
        if name.is_empty() {
            prefix.to_string()
        } else if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}::{name}")
        }
    }

    fn hash_node(&mut self, db: &DeclDb, id: DeclId, parent: DeclId, prefix: &str) -> Digest {
        let fqn = Self::compute_fqn(db, id, parent, prefix);

        self.ensure(id);
        if self.entries[id.index()].valid {
            return self.entries[id.index()].hash;
        }
        self.entries[id.index()].marked = true;

        let mut ctx = Sha224::new();
        ctx.update(b"(T=");
        ctx.update(db.tag(id).name().as_bytes());
        ctx.update(b";N=");
        ctx.update(db.decl_name(id).as_bytes());
        ctx.update(b";P=");
        ctx.update(db.props(id).bits().to_le_bytes());
        ctx.update(b";Q=");
        ctx.update(db.quantity(id).to_le_bytes());

        let attr = db.attr(id);
        if !attr.is_null() {
            ctx.update(b";A=");
            let h = self.hash_node(db, attr, id, &fqn);
            ctx.update(b";H=");
            ctx.update(h);
        }

        let link = db.link(id);
        if !link.is_null() {
            if db.tag(id).is_container() {
                ctx.update(b";L=");
                let mut child = link;
                while !child.is_null() {
                    ctx.update(b";X=");
                    let h = self.hash_node(db, child, id, &fqn);
                    ctx.update(h);
                    child = db.next(child);
                }
            } else {
                self.ensure(link);
                if self.is_cycle(link) {
                    ctx.update(db.tag(link).name().as_bytes());
                    ctx.update(db.decl_name(link).as_bytes());
                } else {
                    ctx.update(b";H=");
                    let h = self.hash_node(db, link, id, &fqn);
                    ctx.update(h);
                }
            }
        }

        ctx.update(b")");
        let digest: Digest = ctx.finalize().into();

        self.ensure(id);
        let entry = &mut self.entries[id.index()];
        entry.hash = digest;
        entry.valid = true;
        entry.fqn = self.heap.name_new(&fqn);
        digest
    }
}
