//! Hash functions used to place keys in a [`HashTable`].
//!
//! A table is parameterized over a [`HashFunction`] rather than a
//! [`BuildHasher`]: the hash function receives the whole key and returns an
//! [`Id`] directly, which lets integer keys hash to themselves and lets
//! sequence-like keys run a plain FNV-1 accumulation over their elements.
//!
//! [`DefaultHash`] picks a strategy from the static shape of the key:
//!
//! - integers, `bool` and `char` hash to their own value;
//! - nullable C strings (`Option<&CStr>`) run FNV-1 up to the NUL sentinel,
//!   with `None` hashing to the FNV-1 seed;
//! - length-bearing sequences (`str`, `String`, slices, arrays and vectors of
//!   integer-like elements) run FNV-1 over exactly `len` elements.
//!
//! Any other key type needs an explicit hash function, for instance
//! [`BuildHasherFunction`] wrapping a [`BuildHasher`].
//!
//! [`HashTable`]: crate::hash_table::HashTable

use alloc::string::String;
use alloc::vec::Vec;
use core::ffi::CStr;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::hash::Hasher;

/// Hash code type. Unsigned and pointer-width.
pub type Id = usize;

/// Computes the [`Id`] a key is placed by.
///
/// Implementations must be consistent with the key's `Eq`: keys that compare
/// equal must produce the same id.
pub trait HashFunction<K: ?Sized> {
    /// Returns the hash code for `key`.
    fn hash(&self, key: &K) -> Id;
}

/// Rolling FNV-1 accumulator.
///
/// Each element is folded in as `hash = (hash * PRIME) ^ element`, wrapping
/// at the width of [`Id`]. The multiplication comes before the XOR.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fnv1 {
    hash: Id,
}

impl Fnv1 {
    /// Initial accumulator value.
    pub const SEED: Id = 0x811C_9DC5;
    /// Multiplier applied before each element.
    pub const PRIME: Id = 0x0100_0193;

    /// Creates an accumulator holding [`Fnv1::SEED`].
    pub const fn new() -> Self {
        Self { hash: Self::SEED }
    }

    /// Folds one element into the accumulator.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self, element: Id) {
        self.hash = self.hash.wrapping_mul(Self::PRIME) ^ element;
    }

    /// Returns the current hash.
    #[inline]
    pub fn get(&self) -> Id {
        self.hash
    }
}

impl Default for Fnv1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1 {
    fn finish(&self) -> u64 {
        self.hash as u64
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.next(byte as Id);
        }
    }
}

/// Elements that FNV-1 can fold directly.
pub trait Element: Copy {
    /// The element widened to an [`Id`].
    fn widen(self) -> Id;
}

/// Keys [`DefaultHash`] knows how to hash.
pub trait DefaultHashable {
    /// Returns the default hash code for `self`.
    fn default_hash(&self) -> Id;
}

macro_rules! impl_identity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Element for $ty {
                #[inline]
                fn widen(self) -> Id {
                    self as Id
                }
            }

            impl DefaultHashable for $ty {
                #[inline]
                fn default_hash(&self) -> Id {
                    self.widen()
                }
            }
        )*
    };
}

impl_identity!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool
);

impl Element for char {
    #[inline]
    fn widen(self) -> Id {
        self as u32 as Id
    }
}

impl DefaultHashable for char {
    #[inline]
    fn default_hash(&self) -> Id {
        self.widen()
    }
}

fn fnv1_sequence<T: Element>(elements: impl IntoIterator<Item = T>) -> Id {
    let mut fnv1 = Fnv1::new();
    for element in elements {
        fnv1.next(element.widen());
    }
    fnv1.get()
}

impl<T: Element> DefaultHashable for [T] {
    fn default_hash(&self) -> Id {
        fnv1_sequence(self.iter().copied())
    }
}

impl<T: Element, const N: usize> DefaultHashable for [T; N] {
    fn default_hash(&self) -> Id {
        self.as_slice().default_hash()
    }
}

impl<T: Element> DefaultHashable for Vec<T> {
    fn default_hash(&self) -> Id {
        self.as_slice().default_hash()
    }
}

impl DefaultHashable for str {
    fn default_hash(&self) -> Id {
        self.as_bytes().default_hash()
    }
}

impl DefaultHashable for String {
    fn default_hash(&self) -> Id {
        self.as_str().default_hash()
    }
}

impl DefaultHashable for CStr {
    fn default_hash(&self) -> Id {
        fnv1_sequence(
            self.to_bytes_with_nul()
                .iter()
                .copied()
                .take_while(|&byte| byte != 0),
        )
    }
}

impl DefaultHashable for Option<&CStr> {
    fn default_hash(&self) -> Id {
        match self {
            Some(c_str) => c_str.default_hash(),
            None => Fnv1::SEED,
        }
    }
}

impl<T: DefaultHashable + ?Sized> DefaultHashable for &T {
    #[inline]
    fn default_hash(&self) -> Id {
        (**self).default_hash()
    }
}

/// The default hash function, dispatching on the key's shape.
///
/// # Examples
///
/// ```rust
/// use probe_hash::hash_function::DefaultHash;
/// use probe_hash::hash_function::Fnv1;
/// use probe_hash::hash_function::HashFunction;
///
/// assert_eq!(DefaultHash.hash(&42u32), 42);
/// assert_eq!(DefaultHash.hash(""), Fnv1::SEED);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultHash;

impl<K: DefaultHashable + ?Sized> HashFunction<K> for DefaultHash {
    #[inline]
    fn hash(&self, key: &K) -> Id {
        key.default_hash()
    }
}

/// Adapts a [`BuildHasher`] into a [`HashFunction`] for any `K: Hash`.
///
/// # Examples
///
/// ```rust
/// use core::hash::BuildHasherDefault;
///
/// use probe_hash::HashMap;
/// use probe_hash::hash_function::BuildHasherFunction;
/// use probe_hash::hash_function::Fnv1;
///
/// let mut map: HashMap<(u8, u8), &str, BuildHasherFunction<BuildHasherDefault<Fnv1>>> =
///     HashMap::with_hash_function(BuildHasherFunction::default());
/// map.insert((1, 2), "pair");
/// assert_eq!(map.get(&(1, 2)), Some(&"pair"));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildHasherFunction<S>(pub S);

impl<K: Hash + ?Sized, S: BuildHasher> HashFunction<K> for BuildHasherFunction<S> {
    #[inline]
    fn hash(&self, key: &K) -> Id {
        self.0.hash_one(key) as Id
    }
}

/// A [`BuildHasherFunction`] over foldhash's fixed-seed fast hasher.
#[cfg(feature = "foldhash")]
pub type FoldHash = BuildHasherFunction<foldhash::fast::FixedState>;
