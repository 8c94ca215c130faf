//! A reflection toolchain for a statically-typed systems language: a
//! content-addressed declaration graph plus the ASN.1 BER/DER and
//! LEB128/VLU/VF codecs used to put its values on the wire.
//!
//! The graph (this module, [`builtin`], [`accessors`], [`enumerate`] and
//! [`width`]) is a flat arena of fixed-size, tagged nodes threaded together
//! by [`DeclId`] links: structs, unions, enums, pointers, arrays and the
//! rest are all the same [`DeclNode`] record, distinguished by [`NodeTag`].
//! [`hash`] gives every node a canonical SHA-224 digest so that [`link`] can
//! deduplicate and merge graphs from independent translation units into one
//! archive. [`cursor`], [`asn1`] and [`varint`] are independent of the graph
//! and describe how primitive values are encoded on the wire.
#![forbid(unsafe_code)]

pub mod accessors;
pub mod asn1;
pub mod builtin;
pub mod container;
pub mod cursor;
pub mod enumerate;
pub mod hash;
pub mod link;
pub mod props;
pub mod varint;
pub mod width;

#[cfg(test)]
mod test;

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

pub use props::Props;

/// Discriminant of a [`DeclNode`].
///
/// `None` is the tag of node 0, the reserved null node; it is never
/// produced by [`DeclDb::decl_new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum NodeTag {
    None = 0,
    Intrinsic = 1,
    Typedef = 2,
    Set = 3,
    Enum = 4,
    Struct = 5,
    Union = 6,
    Field = 7,
    Array = 8,
    Pointer = 9,
    Constant = 10,
    Function = 11,
    Param = 12,
    Qualifier = 13,
    Attribute = 14,
    Value = 15,
    Archive = 16,
    Source = 17,
    Alias = 18,
}

impl NodeTag {
    /// Stable name used by the hasher's tag delimiter and in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            NodeTag::None => "none",
            NodeTag::Intrinsic => "intrinsic",
            NodeTag::Typedef => "typedef",
            NodeTag::Set => "set",
            NodeTag::Enum => "enum",
            NodeTag::Struct => "struct",
            NodeTag::Union => "union",
            NodeTag::Field => "field",
            NodeTag::Array => "array",
            NodeTag::Pointer => "pointer",
            NodeTag::Constant => "constant",
            NodeTag::Function => "function",
            NodeTag::Param => "param",
            NodeTag::Qualifier => "qualifier",
            NodeTag::Attribute => "attribute",
            NodeTag::Value => "value",
            NodeTag::Archive => "archive",
            NodeTag::Source => "source",
            NodeTag::Alias => "alias",
        }
    }

    /// Container tags thread an ordered child list through `next`, reached
    /// via `link`. Non-container tags use `link` to point at a single
    /// referenced type.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeTag::Archive
                | NodeTag::Source
                | NodeTag::Set
                | NodeTag::Enum
                | NodeTag::Struct
                | NodeTag::Union
                | NodeTag::Function
        )
    }
}

/// A 1-based index into the node arena. `0` is the reserved null id; node 0
/// is never dereferenced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DeclId(pub u32);

impl DeclId {
    pub const NULL: DeclId = DeclId(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `NodeTag` has no natural zero variant we'd want constructed by accident,
/// so the node record keeps tag in its own zero-is-`None` slot rather than
/// deriving `Default` on `NodeTag` itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeTagSlot(pub NodeTag);

impl Default for NodeTagSlot {
    fn default() -> Self {
        NodeTagSlot(NodeTag::None)
    }
}

/// A fixed-size declaration node. Every tag overlays the same seven links
/// plus the `quantity` scalar; `model.h` fixes what each field means per
/// tag.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeclNode {
    pub tag: NodeTagSlot,
    pub props: Props,
    pub name: u32,
    pub next: DeclId,
    pub link: DeclId,
    pub attr: DeclId,
    pub source: DeclId,
    pub quantity: u64,
}

/// Append-only byte arena for node names. Offset `0` is the empty string;
/// names are NUL-terminated so they can be read back without a length
/// prefix. Two identical names written twice live at two different offsets
/// — equality is by content, never by offset.
#[derive(Clone, Debug)]
pub struct StringHeap {
    data: Vec<u8>,
    builtin_len: usize,
}

impl Default for StringHeap {
    fn default() -> Self {
        StringHeap::new()
    }
}

impl StringHeap {
    fn new() -> Self {
        // index 0 is the implicit empty string; nothing is ever stored there.
        StringHeap { data: vec![0u8], builtin_len: 1 }
    }

    /// Appends a NUL-terminated copy of `s` and returns its offset. The
    /// empty string always returns offset 0 without growing the heap.
    pub fn name_new(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }
        let offset = self.data.len() as u32;
        self.data.extend_from_slice(s.as_bytes());
        self.data.push(0);
        offset
    }

    /// Reads the NUL-terminated string at `offset`. Offset 0 is `""`.
    pub fn get(&self, offset: u32) -> &str {
        if offset == 0 {
            return "";
        }
        let start = offset as usize;
        let end = self.data[start..]
            .iter()
            .position(|&b| b == 0)
            .map(|p| start + p)
            .unwrap_or(self.data.len());
        std::str::from_utf8(&self.data[start..end]).unwrap_or("")
    }

    fn freeze_builtin(&mut self) {
        self.builtin_len = self.data.len();
    }

    /// Byte length of the heap excluding the built-in prefix, i.e. the
    /// user-contributed portion persisted by [`crate::container`].
    pub fn user_len(&self) -> usize {
        self.data.len() - self.builtin_len
    }

    pub fn user_bytes(&self) -> &[u8] {
        &self.data[self.builtin_len..]
    }

    pub(crate) fn builtin_len(&self) -> usize {
        self.builtin_len
    }

    /// Appends a raw, already NUL-delimited byte block (the user portion
    /// read back from a container file) and returns the offset it starts
    /// at, so the caller can rebase the block's own internal offsets.
    pub(crate) fn append_block(&mut self, bytes: &[u8]) -> u32 {
        let base = self.data.len() as u32;
        self.data.extend_from_slice(bytes);
        base
    }
}

/// Owns the node arena and string heap for one reflection graph.
///
/// Nodes are append-only: [`DeclDb::decl_new`] always pushes, nothing is
/// ever removed individually. The whole arena is released together when
/// the `DeclDb` is dropped, in place of the original's explicit
/// `crefl_db_destroy`.
#[derive(Clone, Debug)]
pub struct DeclDb {
    nodes: Vec<DeclNode>,
    pub(crate) names: StringHeap,
    pub(crate) decl_builtin: usize,
    pub root_element: DeclId,
}

impl Default for DeclDb {
    fn default() -> Self {
        DeclDb::new()
    }
}

impl DeclDb {
    /// Allocates an empty arena (node 0 reserved, no built-ins installed).
    /// Call [`builtin::install`] to populate the built-in intrinsic table
    /// before using [`DeclDb::intrinsic`].
    pub fn new() -> Self {
        DeclDb {
            nodes: vec![DeclNode::default()],
            names: StringHeap::new(),
            decl_builtin: 1,
            root_element: DeclId::NULL,
        }
    }

    /// Appends a zeroed node with the given tag and returns its id.
    pub fn decl_new(&mut self, tag: NodeTag) -> DeclId {
        let node = DeclNode { tag: NodeTagSlot(tag), ..DeclNode::default() };
        self.nodes.push(node);
        DeclId((self.nodes.len() - 1) as u32)
    }

    /// Appends a NUL-terminated copy of `s` to the string heap.
    pub fn name_new(&mut self, s: &str) -> u32 {
        self.names.name_new(s)
    }

    pub fn name(&self, offset: u32) -> &str {
        self.names.get(offset)
    }

    /// Marks the current arena/heap length as the built-in prefix boundary.
    /// Called once by [`builtin::install`] right after populating the
    /// intrinsic table.
    pub(crate) fn freeze_builtin(&mut self) {
        self.decl_builtin = self.nodes.len();
        self.names.freeze_builtin();
    }

    /// Number of nodes, including the reserved node 0.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// True if `id` is 0 (null, always a valid no-op reference) or indexes
    /// an existing node. Used to reject out-of-range references from a
    /// malformed or foreign graph before dereferencing them (§4.4, §7.3).
    pub fn in_bounds(&self, id: DeclId) -> bool {
        id.index() < self.nodes.len()
    }

    pub(crate) fn node(&self, id: DeclId) -> &DeclNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: DeclId) -> &mut DeclNode {
        &mut self.nodes[id.index()]
    }

    pub fn tag(&self, id: DeclId) -> NodeTag {
        self.node(id).tag.0
    }

    pub fn set_props(&mut self, id: DeclId, props: Props) {
        self.node_mut(id).props = props;
    }

    pub fn set_name(&mut self, id: DeclId, name: u32) {
        self.node_mut(id).name = name;
    }

    pub fn set_next(&mut self, id: DeclId, next: DeclId) {
        self.node_mut(id).next = next;
    }

    pub fn set_link(&mut self, id: DeclId, link: DeclId) {
        self.node_mut(id).link = link;
    }

    pub fn set_attr(&mut self, id: DeclId, attr: DeclId) {
        self.node_mut(id).attr = attr;
    }

    pub fn set_source(&mut self, id: DeclId, source: DeclId) {
        self.node_mut(id).source = source;
    }

    pub fn set_quantity(&mut self, id: DeclId, quantity: u64) {
        self.node_mut(id).quantity = quantity;
    }

    pub fn props(&self, id: DeclId) -> Props {
        self.node(id).props
    }

    pub fn decl_name(&self, id: DeclId) -> &str {
        self.names.get(self.node(id).name)
    }

    pub fn name_offset(&self, id: DeclId) -> u32 {
        self.node(id).name
    }

    pub fn has_name(&self, id: DeclId) -> bool {
        self.node(id).name != 0
    }

    pub fn next(&self, id: DeclId) -> DeclId {
        self.node(id).next
    }

    pub fn link(&self, id: DeclId) -> DeclId {
        self.node(id).link
    }

    pub fn attr(&self, id: DeclId) -> DeclId {
        self.node(id).attr
    }

    pub fn source(&self, id: DeclId) -> DeclId {
        self.node(id).source
    }

    pub fn quantity(&self, id: DeclId) -> u64 {
        self.node(id).quantity
    }

    /// A borrowed view over `id`, the idiomatic replacement for the
    /// original's `decl_ref { db, decl_idx }` pair.
    pub fn r#ref(&self, id: DeclId) -> DeclRef<'_> {
        DeclRef { db: self, id }
    }

    pub fn root(&self) -> DeclRef<'_> {
        self.r#ref(self.root_element)
    }

    /// Linear scan of the built-in intrinsic prefix for a node whose
    /// `quantity` equals `width` and whose `props` is a superset of the
    /// requested bits. Returns the null ref if none match.
    pub fn intrinsic(&self, props: Props, width: u64) -> DeclRef<'_> {
        for idx in 1..self.decl_builtin {
            let id = DeclId(idx as u32);
            let node = self.node(id);
            if node.tag.0 == NodeTag::Intrinsic
                && node.quantity == width
                && node.props.contains(props)
            {
                return self.r#ref(id);
            }
        }
        self.r#ref(DeclId::NULL)
    }
}

/// A borrowed, `Copy` view of one node, paired with the arena it lives in.
///
/// Borrowing `&DeclDb` instead of holding a raw pointer means the compiler
/// enforces the "ids are stable, pointers aren't" rule: a `DeclRef` cannot
/// outlive a mutation of the `DeclDb` it points into, because that mutation
/// requires `&mut DeclDb` which the live borrow forbids.
#[derive(Clone, Copy)]
pub struct DeclRef<'a> {
    pub db: &'a DeclDb,
    pub id: DeclId,
}

impl<'a> DeclRef<'a> {
    pub fn null(db: &'a DeclDb) -> Self {
        DeclRef { db, id: DeclId::NULL }
    }

    pub fn is_null(&self) -> bool {
        self.id.is_null()
    }

    pub fn tag(&self) -> NodeTag {
        self.db.tag(self.id)
    }

    pub fn props(&self) -> Props {
        self.db.props(self.id)
    }

    pub fn name(&self) -> &'a str {
        self.db.decl_name(self.id)
    }

    pub fn has_name(&self) -> bool {
        self.db.has_name(self.id)
    }

    pub fn next(&self) -> DeclRef<'a> {
        DeclRef { db: self.db, id: self.db.next(self.id) }
    }

    pub fn link(&self) -> DeclRef<'a> {
        DeclRef { db: self.db, id: self.db.link(self.id) }
    }

    pub fn attr(&self) -> DeclRef<'a> {
        DeclRef { db: self.db, id: self.db.attr(self.id) }
    }

    pub fn source(&self) -> DeclRef<'a> {
        DeclRef { db: self.db, id: self.db.source(self.id) }
    }

    pub fn quantity(&self) -> u64 {
        self.db.quantity(self.id)
    }
}

impl fmt::Debug for DeclRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclRef")
            .field("id", &self.id)
            .field("tag", &self.tag())
            .finish()
    }
}
