//! The `Props` bitset: one 32-bit namespace shared by every tag, the same
//! bits meaning different things depending on the node's `NodeTag` — type
//! arithmetic qualifiers on an intrinsic, padding policy on a field,
//! linkage/visibility on a function or source. Built with the same
//! `flags_to_struct!`-style bitset-newtype idiom used elsewhere in this
//! crate: a plain integer wrapper with named constant bits and small
//! boolean queries, rather than an enum per flag.

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A set of `decl_props` bits. `Default` is the empty set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Props(pub u32);

macro_rules! flags {
    ($($(#[$doc:meta])* $name:ident = $bit:expr;)*) => {
        impl Props {
            $(
                $(#[$doc])*
                pub const $name: Props = Props($bit);
            )*
        }
    };
}

flags! {
    /// Integral arithmetic type (intrinsic).
    INTEGRAL = 1 << 0;
    /// IEEE-754 real arithmetic type (intrinsic).
    REAL = 1 << 1;
    /// Complex number composed of two `REAL` lanes (intrinsic).
    COMPLEX = 1 << 2;
    /// Signed representation (intrinsic, combine with `INTEGRAL`).
    SIGNED = 1 << 3;
    /// Unsigned representation (intrinsic, combine with `INTEGRAL`).
    UNSIGNED = 1 << 4;
    /// IEEE-754 binary encoding (intrinsic, combine with `REAL`/`COMPLEX`).
    IEEE754 = 1 << 5;
    /// Round width up to the next power of two (field/struct/union padding).
    PAD_POW2 = 1 << 6;
    /// No padding; pack to the exact bit width (field padding).
    PAD_BIT = 1 << 7;
    /// Round width up to a whole byte (field padding).
    PAD_BYTE = 1 << 8;
    /// Field occupies a sub-byte run of bits rather than whole units.
    BITFIELD = 1 << 9;
    /// `const`-qualified (qualifier).
    CONST = 1 << 10;
    /// `volatile`-qualified (qualifier).
    VOLATILE = 1 << 11;
    /// `restrict`-qualified (qualifier).
    RESTRICT = 1 << 12;
    /// Internal linkage (function/constant/source).
    STATIC = 1 << 13;
    /// `extern "C"` linkage (function/source).
    EXTERN_C = 1 << 14;
    /// Inlining requested (function).
    INLINE = 1 << 15;
    /// Function never returns (function).
    NORETURN = 1 << 16;
    /// Symbol visibility restricted to its defining archive (function/source).
    LOCAL = 1 << 17;
    /// Symbol visibility exported from its defining archive (function/source).
    GLOBAL = 1 << 18;
    /// Weak symbol binding (function/source).
    WEAK = 1 << 19;
    /// Default-visibility symbol binding (function/source).
    DEFAULT = 1 << 20;
    /// Hidden-visibility symbol binding (function/source).
    HIDDEN = 1 << 21;
    /// `in` parameter direction (param).
    IN = 1 << 22;
    /// `out` parameter direction (param).
    OUT = 1 << 23;
    /// Variable-length array (array).
    VLA = 1 << 24;
}

impl Props {
    /// Signed integral: `INTEGRAL | SIGNED`.
    pub const SINT: Props = Props(Props::INTEGRAL.0 | Props::SIGNED.0);
    /// Unsigned integral: `INTEGRAL | UNSIGNED`.
    pub const UINT: Props = Props(Props::INTEGRAL.0 | Props::UNSIGNED.0);
    /// IEEE-754 real: `REAL | IEEE754`.
    pub const FLOAT: Props = Props(Props::REAL.0 | Props::IEEE754.0);
    /// IEEE-754 complex: `COMPLEX | IEEE754`.
    pub const CFLOAT: Props = Props(Props::COMPLEX.0 | Props::IEEE754.0);

    pub const fn empty() -> Props {
        Props(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Props {
        Props(bits)
    }

    /// True if every bit set in `other` is also set in `self`.
    pub const fn contains(self, other: Props) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Props) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Props) {
        self.0 |= other.0;
    }
}

impl BitOr for Props {
    type Output = Props;
    fn bitor(self, rhs: Props) -> Props {
        Props(self.0 | rhs.0)
    }
}

impl BitOrAssign for Props {
    fn bitor_assign(&mut self, rhs: Props) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Props {
    type Output = Props;
    fn bitand(self, rhs: Props) -> Props {
        Props(self.0 & rhs.0)
    }
}

impl std::fmt::Debug for Props {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Props({:#010x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_subset_test() {
        let p = Props::SINT | Props::PAD_BYTE;
        assert!(p.contains(Props::INTEGRAL));
        assert!(p.contains(Props::SIGNED));
        assert!(!p.contains(Props::UNSIGNED));
        assert!(p.contains(Props::empty()));
    }

    #[test]
    fn composite_constants_match_bitwise_or() {
        assert_eq!(Props::SINT, Props::INTEGRAL | Props::SIGNED);
        assert_eq!(Props::UINT, Props::INTEGRAL | Props::UNSIGNED);
        assert_eq!(Props::FLOAT, Props::REAL | Props::IEEE754);
        assert_eq!(Props::CFLOAT, Props::COMPLEX | Props::IEEE754);
    }
}
