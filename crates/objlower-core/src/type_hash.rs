//! Deterministic hash-based identity for declared types and variables.
//!
//! A [`TypeHash`] is computed from a type's qualified source name, so the
//! front end, the rewrite passes and the generator can all refer to the same
//! declaration without sharing pointers or registration order.
//!
//! # Examples
//!
//! ```
//! use objlower_core::TypeHash;
//!
//! let a = TypeHash::from_name("com.example.Counter");
//! let b = TypeHash::from_name("com.example.Counter");
//! assert_eq!(a, b);
//!
//! let field = TypeHash::from_field(a, "COUNT");
//! assert_ne!(field, a);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
///
/// Keeps type hashes and field hashes apart even when names coincide.
pub mod hash_constants {
    /// Separator constant for path components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for field hashes.
    pub const FIELD: u64 = 0x7d3c8b4a92e15f6d;
}

/// A deterministic 64-bit hash identifying a declared type or field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a dotted qualified type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a field hash from its declaring type and simple name.
    #[inline]
    pub fn from_field(owner: TypeHash, name: &str) -> Self {
        let hash = hash_constants::FIELD ^ xxh64(name.as_bytes(), 0);
        TypeHash(hash.wrapping_mul(hash_constants::SEP).wrapping_add(owner.0))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
