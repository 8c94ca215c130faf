//! End-to-end scenarios spanning the graph, hasher, linker and codecs
//! together, one test per concrete end-to-end walkthrough. Each
//! module's own `#[cfg(test)]` block covers its unit-level properties;
//! this file is where pieces meet.

use crate::asn1::der;
use crate::asn1::Oid;
use crate::cursor::Cursor;
use crate::{accessors, builtin, container, enumerate, link, varint, width, DeclDb, NodeTag};

fn field(db: &mut DeclDb, name: &str, of: crate::DeclId) -> crate::DeclId {
    let f = db.decl_new(NodeTag::Field);
    let n = db.name_new(name);
    db.set_name(f, n);
    db.set_link(f, of);
    f
}

fn array(db: &mut DeclDb, of: crate::DeclId, count: u64) -> crate::DeclId {
    let a = db.decl_new(NodeTag::Array);
    db.set_link(a, of);
    db.set_quantity(a, count);
    a
}

/// Scenario 1: `struct { int a; int b; }`.
#[test]
fn struct_over_two_int_fields() {
    let mut db = DeclDb::new();
    builtin::install(&mut db);
    let int_id = builtin::by_name(&db, "int").unwrap().id;

    let fa = field(&mut db, "a", int_id);
    let fb = field(&mut db, "b", int_id);
    db.set_next(fa, fb);

    let st = db.decl_new(NodeTag::Struct);
    db.set_link(st, fa);

    let st_ref = db.r#ref(st);
    assert_eq!(width::struct_width(&st_ref), 64);

    let fields = enumerate::struct_fields(&st_ref).unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name(), "a");
    assert_eq!(fields[1].name(), "b");
}

/// Scenario 2: `struct { int[5] a; int[10] b; }`.
#[test]
fn struct_of_two_arrays() {
    let mut db = DeclDb::new();
    builtin::install(&mut db);
    let int_id = builtin::by_name(&db, "int").unwrap().id;

    let arr_a = array(&mut db, int_id, 5);
    let arr_b = array(&mut db, int_id, 10);
    let fa = field(&mut db, "a", arr_a);
    let fb = field(&mut db, "b", arr_b);
    db.set_next(fa, fb);

    let st = db.decl_new(NodeTag::Struct);
    db.set_link(st, fa);

    let st_ref = db.r#ref(st);
    let fields = enumerate::struct_fields(&st_ref).unwrap();
    let ta = accessors::field_type(&fields[0]);
    let tb = accessors::field_type(&fields[1]);
    assert_eq!(width::type_width(&ta), 160);
    assert_eq!(width::type_width(&tb), 320);
    assert_eq!(accessors::array_count(&ta), 5);
    assert_eq!(width::struct_width(&st_ref), 480);
}

/// Scenario 3: ASN.1 integer `2^56 - 1` encodes with a leading zero byte
/// to keep the sign bit clear.
#[test]
fn asn1_integer_two_pow_56_minus_1() {
    let value: u64 = 72_057_594_037_927_935; // 2^56 - 1
    let mut c = Cursor::with_capacity(16);
    der::integer_u64_write(&mut c, value).unwrap();
    let len = c.offset();
    c.reset();
    let bytes = c.read_bytes(len).unwrap();
    assert_eq!(bytes, vec![0x02, 0x08, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);

    c.reset();
    let decoded = der::integer_u64_read(&mut c).unwrap();
    assert_eq!(decoded, value);
}

/// Scenario 4: ASN.1 REAL encoding of pi.
#[test]
fn asn1_real_pi() {
    let pi = std::f64::consts::PI;
    let mut c = Cursor::with_capacity(16);
    der::real_f64_write(&mut c, pi).unwrap();
    let len = c.offset();
    c.reset();
    let bytes = c.read_bytes(len).unwrap();
    assert_eq!(
        bytes,
        vec![0x09, 0x09, 0x80, 0xD0, 0x03, 0x24, 0x3F, 0x6A, 0x88, 0x85, 0xA3]
    );

    c.reset();
    let decoded = der::real_f64_read(&mut c).unwrap();
    assert!((decoded - pi).abs() < 1e-15);
}

/// Scenario 5: LEB128 `2^54`.
#[test]
fn leb128_two_pow_54() {
    let value: u64 = 18_014_398_509_481_984; // 2^54
    let mut c = Cursor::with_capacity(16);
    varint::leb_u64_write(&mut c, value).unwrap();
    let len = c.offset();
    c.reset();
    let bytes = c.read_bytes(len).unwrap();
    assert_eq!(bytes, vec![0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x20]);

    c.reset();
    let decoded = varint::leb_u64_read(&mut c).unwrap();
    assert_eq!(decoded, value);
}

/// Scenario 6: OID `1.2.840.113549.1.1.11` (sha256WithRSAEncryption).
#[test]
fn oid_sha256_with_rsa_encryption() {
    let oid = Oid::new(vec![1, 2, 840, 113549, 1, 1, 11]);
    let mut c = Cursor::with_capacity(16);
    der::oid_write(&mut c, &oid).unwrap();
    let len = c.offset();
    c.reset();
    let bytes = c.read_bytes(len).unwrap();
    assert_eq!(
        bytes,
        vec![0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0B]
    );

    c.reset();
    let decoded = der::oid_read(&mut c).unwrap();
    assert_eq!(decoded.to_dotted_string(), "1.2.840.113549.1.1.11");
}

/// Scenario 7: merging two compilation units that each declare an
/// identical `struct point { float x; float y; }` collapses to one
/// canonical struct, reachable from both sources.
#[test]
fn merging_two_units_with_the_same_struct_deduplicates() {
    fn unit(source_name: &str) -> DeclDb {
        let mut db = DeclDb::new();
        builtin::install(&mut db);
        let float_id = builtin::by_name(&db, "float").unwrap().id;

        let fx = field(&mut db, "x", float_id);
        let fy = field(&mut db, "y", float_id);
        db.set_next(fx, fy);

        let st = db.decl_new(NodeTag::Struct);
        let sn = db.name_new("point");
        db.set_name(st, sn);
        db.set_link(st, fx);

        let src = db.decl_new(NodeTag::Source);
        let srcn = db.name_new(source_name);
        db.set_name(src, srcn);
        db.set_link(src, st);

        db.root_element = src;
        db
    }

    let unit_a = unit("a.c");
    let unit_b = unit("b.c");

    let mut dst = DeclDb::new();
    builtin::install(&mut dst);
    let archive = link::link(&mut dst, "prog", &[&unit_a, &unit_b]).unwrap();

    let archive_ref = dst.r#ref(archive);
    let sources = enumerate::archive_sources(&archive_ref).unwrap();
    assert_eq!(sources.len(), 2);

    let canonical_id = |s: &crate::DeclRef<'_>| -> crate::DeclId {
        let decl = enumerate::source_decls(s)
            .unwrap()
            .into_iter()
            .find(|d| accessors::is_struct(d) || accessors::is_alias(d))
            .unwrap();
        if accessors::is_alias(&decl) {
            decl.db.link(decl.id)
        } else {
            decl.id
        }
    };

    assert_eq!(canonical_id(&sources[0]), canonical_id(&sources[1]));
}

/// The on-disk container survives a merged archive's user nodes and string
/// heap round-trip, independent of the hasher/linker above.
#[test]
fn merged_archive_round_trips_through_the_container_format() {
    let mut db = DeclDb::new();
    builtin::install(&mut db);
    let int_id = builtin::by_name(&db, "int").unwrap().id;

    let fa = field(&mut db, "a", int_id);
    let st = db.decl_new(NodeTag::Struct);
    let stn = db.name_new("thing");
    db.set_name(st, stn);
    db.set_link(st, fa);

    let src = db.decl_new(NodeTag::Source);
    let srcn = db.name_new("a.c");
    db.set_name(src, srcn);
    db.set_link(src, st);
    db.root_element = src;

    let bytes = container::write(&db).unwrap();

    let mut loaded = DeclDb::new();
    builtin::install(&mut loaded);
    container::read(&mut loaded, &bytes).unwrap();

    let loaded_root = loaded.r#ref(loaded.root_element);
    assert_eq!(loaded_root.name(), "a.c");
    let loaded_struct = enumerate::source_decls(&loaded_root).unwrap().remove(0);
    assert_eq!(loaded_struct.name(), "thing");
    assert_eq!(width::struct_width(&loaded_struct), 32);
}

/// A `DER` value built with a high tag number (above 30) round-trips,
/// the composed cross-module check on top of `asn1::ident`'s own
/// bit-level unit tests.
#[test]
fn der_value_with_a_high_tag_number_round_trips() {
    use crate::asn1::ident::{self, Class, Identifier};

    let id = Identifier { class: Class::ContextSpecific, constructed: false, tag: 200 };
    let mut c = Cursor::with_capacity(16);
    ident::ident_write(&mut c, id).unwrap();
    c.reset();
    let decoded = ident::ident_read(&mut c).unwrap();
    assert_eq!(decoded.tag, 200);
    assert_eq!(decoded.class, Class::ContextSpecific);
}
