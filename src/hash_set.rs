use alloc::vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::entry_iterator::EntryIterator;
use crate::hash_entry::HashEntry;
use crate::hash_entry::KeyEntry;
use crate::hash_function::DefaultHash;
use crate::hash_function::HashFunction;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::hash_table::should_enlarge;
use crate::hash_table::should_shrink;

/// A hash set backed by a key-only linear-probing [`HashTable`].
///
/// `HashSet<T, H>` stores distinct values hashed by `H`, which defaults to
/// [`DefaultHash`]. It applies the same load-factor policy as
/// [`HashMap`](crate::HashMap): grow to double capacity before an insertion at
/// a load factor of 0.7, halve after a removal that reaches 0.3.
///
/// # Examples
///
/// ```rust
/// use probe_hash::HashSet;
///
/// let set = HashSet::from([15u32, 25, 35, 15, 25, 35]);
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.capacity(), 8);
/// ```
#[derive(Clone)]
pub struct HashSet<T, H = DefaultHash> {
    table: HashTable<T, (), H>,
}

impl<T, H> PartialEq for HashSet<T, H>
where
    T: Eq,
    H: HashFunction<T>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, H> Eq for HashSet<T, H>
where
    T: Eq,
    H: HashFunction<T>,
{
}

impl<T: Debug, H> Debug for HashSet<T, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> HashSet<T, DefaultHash> {
    /// Creates an empty, unallocated set.
    pub fn new() -> Self {
        Self::with_hash_function(DefaultHash)
    }

    /// Creates an empty set with room for `capacity` slots, rounded up to a
    /// power of two.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hash_function(capacity, DefaultHash)
    }
}

impl<T, H: Default> Default for HashSet<T, H> {
    fn default() -> Self {
        Self::with_hash_function(H::default())
    }
}

impl<T, H> HashSet<T, H> {
    /// Creates an empty, unallocated set using `hash_function`.
    pub fn with_hash_function(hash_function: H) -> Self {
        Self {
            table: HashTable::with_hash_function(hash_function),
        }
    }

    /// Creates an empty set with room for `capacity` slots, rounded up to a
    /// power of two, using `hash_function`.
    pub fn with_capacity_and_hash_function(capacity: usize, hash_function: H) -> Self {
        Self {
            table: HashTable::with_capacity_and_hash_function(
                capacity.next_power_of_two(),
                hash_function,
            ),
        }
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the backing table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns `min(len / capacity, 1.0)`, or 1.0 for an unallocated set.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// The hash function used to place values.
    pub fn hash_function(&self) -> &H {
        self.table.hash_function()
    }

    /// Clears the set, removing all values. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Removes all values and returns them in slot order. Capacity is
    /// unchanged.
    pub fn drain(&mut self) -> Drain<T> {
        Drain {
            inner: self.table.drain().into_iter(),
        }
    }

    /// An iterator visiting all elements in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            entries: self.table.iter(),
        }
    }

    /// The resumable cursor over the occupied slots.
    pub fn entries(&self) -> EntryIterator<'_, T> {
        self.table.iter()
    }

    /// The raw slot array, including free slots and tombstones.
    pub fn as_entries(&self) -> &[KeyEntry<T>] {
        self.table.entries()
    }

    /// Returns statistics about the backing table.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Returns the probe-length histogram of the backing table.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> crate::hash_table::ProbeHistogram {
        self.table.probe_histogram()
    }
}

impl<T: Eq, H: HashFunction<T>> HashSet<T, H> {
    fn enlarge(&mut self) {
        if should_enlarge(self.table.len(), self.table.capacity()) {
            self.table.enlarge(self.table.capacity() << 1);
        }
    }

    fn shrink(&mut self) {
        if should_shrink(self.table.len(), self.table.capacity()) {
            self.table.shrink(self.table.capacity() >> 1);
        }
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. An equal value already
    /// in the set is left in place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert!(set.insert(2u8));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        self.enlarge();
        match self.table.set(value) {
            Some(TableEntry::Vacant(entry)) => {
                entry.insert(());
                true
            }
            Some(TableEntry::Occupied(_)) => false,
            None => unreachable!("table below the load-factor ceiling always has a vacant slot"),
        }
    }

    /// Returns `true` if the set contains a value.
    pub fn contains(&self, value: &T) -> bool {
        self.table.contains(value)
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.table.get(value).and_then(HashEntry::key)
    }

    /// Removes a value from the set. Returns whether the value was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set = HashSet::from([1u32, 2, 3]);
    /// assert!(set.remove(&2));
    /// assert!(!set.remove(&2));
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`, if any.
    ///
    /// Shrinks the set afterwards if its load factor has dropped to 0.3.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let (removed, ()) = self.table.unset(value)?;
        self.shrink();
        Some(removed)
    }

    /// Returns `true` if `self` has no elements in common with `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let a = HashSet::from([1, 2]);
    /// let b = HashSet::from([3, 4]);
    /// assert!(a.is_disjoint(&b));
    /// ```
    pub fn is_disjoint(&self, other: &HashSet<T, H>) -> bool {
        if self.len() <= other.len() {
            self.iter().all(|v| !other.contains(v))
        } else {
            other.iter().all(|v| !self.contains(v))
        }
    }

    /// Returns `true` if `other` contains at least all the elements in
    /// `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let a = HashSet::from([1, 2]);
    /// let b = HashSet::from([1, 2, 3]);
    /// assert!(a.is_subset(&b));
    /// assert!(!b.is_subset(&a));
    /// ```
    pub fn is_subset(&self, other: &HashSet<T, H>) -> bool {
        if self.len() > other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if `self` contains at least all the elements in
    /// `other`.
    pub fn is_superset(&self, other: &HashSet<T, H>) -> bool {
        other.is_subset(self)
    }
}

/// An iterator over the elements of a `HashSet`.
pub struct Iter<'a, T> {
    entries: EntryIterator<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()?.key()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// A draining iterator over the elements of a `HashSet`.
pub struct Drain<T> {
    inner: vec::IntoIter<(T, ())>,
}

impl<T> Iterator for Drain<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(v, ())| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Drain<T> {}

/// An owning iterator over the elements of a `HashSet`.
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<T, ()>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(v, ())| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T, H> IntoIterator for HashSet<T, H> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, H> IntoIterator for &'a HashSet<T, H> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, H> FromIterator<T> for HashSet<T, H>
where
    T: Eq,
    H: HashFunction<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hash_function(H::default());
        set.extend(iter);
        set
    }
}

impl<T, H> Extend<T> for HashSet<T, H>
where
    T: Eq,
    H: HashFunction<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, const N: usize> From<[T; N]> for HashSet<T, DefaultHash>
where
    T: Eq,
    DefaultHash: HashFunction<T>,
{
    fn from(values: [T; N]) -> Self {
        let mut set = Self::with_capacity(N);
        set.extend(values);
        set
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::hash_entry::EntryState;
    use crate::hash_function::BuildHasherFunction;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    type SipHash = BuildHasherFunction<SipHashBuilder>;

    #[test]
    fn test_new_and_default() {
        let set: HashSet<u32> = HashSet::new();
        assert_eq!(set.capacity(), 0);
        assert_eq!(set.load_factor(), 1.0);

        let set: HashSet<u32, SipHash> = HashSet::default();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), 0);
    }

    #[test]
    fn test_from_duplicates() {
        let set = HashSet::from([15u32, 25, 35, 15, 25, 35]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.capacity(), 8);
        for value in [15, 25, 35] {
            assert!(set.contains(&value));
        }
        assert!(!set.contains(&45));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut set: HashSet<String> = HashSet::new();
        assert!(set.insert("abc".to_string()));
        assert!(set.insert("def".to_string()));
        assert!(!set.insert("abc".to_string()));
        assert_eq!(set.len(), 2);

        assert!(set.remove(&"abc".to_string()));
        assert!(!set.remove(&"abc".to_string()));
        assert!(!set.contains(&"abc".to_string()));
        assert!(set.contains(&"def".to_string()));
    }

    #[test]
    fn test_get_and_take() {
        let mut set = HashSet::from(["x".to_string(), "y".to_string()]);
        assert_eq!(set.get(&"x".to_string()), Some(&"x".to_string()));
        assert_eq!(set.get(&"z".to_string()), None);
        assert_eq!(set.take(&"x".to_string()), Some("x".to_string()));
        assert_eq!(set.take(&"x".to_string()), None);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_growth_and_shrink() {
        let mut set: HashSet<u32> = HashSet::new();
        for value in 0..3 {
            set.insert(value);
        }
        assert_eq!((set.capacity(), set.load_factor()), (4, 0.75));
        set.insert(3);
        assert_eq!((set.capacity(), set.load_factor()), (8, 0.5));

        set.remove(&0);
        assert_eq!(set.capacity(), 8);
        set.remove(&1);
        assert_eq!((set.capacity(), set.load_factor()), (4, 0.5));
    }

    #[test]
    fn test_collisions_reuse_tombstone() {
        let mut set = HashSet::from([15u32, 23, 31]);
        assert!(set.remove(&23));
        assert!(set.insert(39));
        assert_eq!(set.capacity(), 4);
        assert_eq!(set.as_entries()[0].key(), Some(&39));
        assert_eq!(set.as_entries()[2].state(), EntryState::Free);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut set: HashSet<u64> = (0..10).collect();
        let capacity = set.capacity();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), capacity);
        assert!((0..10).all(|v| !set.contains(&v)));
    }

    #[test]
    fn test_relations() {
        let small = HashSet::from([1u32, 2]);
        let large = HashSet::from([1u32, 2, 3]);
        let other = HashSet::from([7u32, 8, 9, 10]);

        assert!(small.is_subset(&large));
        assert!(large.is_superset(&small));
        assert!(!large.is_subset(&small));
        assert!(small.is_disjoint(&other));
        assert!(other.is_disjoint(&large));
        assert!(!small.is_disjoint(&large));

        let empty: HashSet<u32> = HashSet::new();
        assert!(empty.is_subset(&small));
        assert!(empty.is_disjoint(&small));
    }

    #[test]
    fn test_equality_and_clone() {
        let a: HashSet<u32> = (0..50).collect();
        let b: HashSet<u32> = (0..50).rev().collect();
        assert_eq!(a, b);

        let mut c = a.clone();
        assert_eq!(c.capacity(), a.capacity());
        c.remove(&0);
        assert_ne!(a, c);

        let moved = core::mem::take(&mut c);
        assert_eq!(moved.len(), 49);
        assert_eq!(c.capacity(), 0);
    }

    #[test]
    fn test_iteration() {
        let mut set: HashSet<u64, SipHash> = HashSet::default();
        set.extend(0..100u64);
        assert_eq!(set.iter().len(), 100);
        assert_eq!(set.entries().len(), 100);

        let mut seen: Vec<u64> = set.iter().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..100u64).collect::<Vec<_>>());

        let by_ref = (&set).into_iter().count();
        assert_eq!(by_ref, 100);

        let mut owned: Vec<u64> = set.clone().into_iter().collect();
        owned.sort_unstable();
        assert_eq!(owned, seen);

        let mut drained: Vec<u64> = set.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, seen);
        assert!(set.is_empty());
    }

    #[test]
    fn test_debug_format() {
        let set = HashSet::from([5u8]);
        assert_eq!(format!("{set:?}"), "{5}");
    }

    #[test]
    fn test_load_factor_stays_in_band() {
        let mut set: HashSet<u32, SipHash> = HashSet::default();
        for value in 0..1_000 {
            set.insert(value);
            assert!(set.load_factor() <= 0.75, "{:?}", set.debug_stats());
        }
        for value in 0..990 {
            set.remove(&value);
            if set.capacity() > 64 {
                assert!(set.load_factor() > 0.15, "{:?}", set.debug_stats());
            }
        }
        assert_eq!(set.len(), 10);
        assert!(set.capacity() <= 32);
    }
}
