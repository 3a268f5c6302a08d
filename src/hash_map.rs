use alloc::vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::ops::Index;

use crate::entry_iterator::EntryIterator;
use crate::error::Error;
use crate::error::Result;
use crate::hash_entry::HashEntry;
use crate::hash_function::DefaultHash;
use crate::hash_function::HashFunction;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::hash_table::should_enlarge;
use crate::hash_table::should_shrink;

const NO_SLOT: &str = "table below the load-factor ceiling always has a vacant slot";

/// A hash map backed by a linear-probing [`HashTable`].
///
/// `HashMap<K, V, H>` stores key-value pairs where keys implement `Eq` and are
/// hashed by `H`, which defaults to [`DefaultHash`]. The map owns the
/// load-factor policy: it doubles its capacity before an insertion when the
/// load factor has reached 0.7 and halves it after a removal that brings the
/// load factor down to 0.3. Capacity is always a power of two, at least 4.
///
/// # Examples
///
/// ```rust
/// use probe_hash::HashMap;
///
/// let mut map = HashMap::from([("abc", 1), ("def", 2), ("ghi", 3)]);
/// assert_eq!(map.capacity(), 4);
/// assert_eq!(map.load_factor(), 0.75);
///
/// map.insert("jkl", 4);
/// assert_eq!(map.capacity(), 8);
/// assert_eq!(map.load_factor(), 0.5);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, H = DefaultHash> {
    table: HashTable<K, V, H>,
}

impl<K: Debug, V: Debug, H> Debug for HashMap<K, V, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> HashMap<K, V, DefaultHash> {
    /// Creates an empty, unallocated map.
    ///
    /// The map reports capacity 0 and load factor 1.0 until the first
    /// insertion allocates it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let map: HashMap<u32, &str> = HashMap::new();
    /// assert_eq!(map.capacity(), 0);
    /// assert_eq!(map.load_factor(), 1.0);
    /// ```
    pub fn new() -> Self {
        Self::with_hash_function(DefaultHash)
    }

    /// Creates an empty map with room for `capacity` slots, rounded up to a
    /// power of two.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let map: HashMap<u32, &str> = HashMap::with_capacity(5);
    /// assert_eq!(map.capacity(), 8);
    /// assert_eq!(map.load_factor(), 0.0);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hash_function(capacity, DefaultHash)
    }
}

impl<K, V, H: Default> Default for HashMap<K, V, H> {
    fn default() -> Self {
        Self::with_hash_function(H::default())
    }
}

impl<K, V, H> HashMap<K, V, H> {
    /// Creates an empty, unallocated map using `hash_function`.
    pub fn with_hash_function(hash_function: H) -> Self {
        Self {
            table: HashTable::with_hash_function(hash_function),
        }
    }

    /// Creates an empty map with room for `capacity` slots, rounded up to a
    /// power of two, using `hash_function`.
    pub fn with_capacity_and_hash_function(capacity: usize, hash_function: H) -> Self {
        Self {
            table: HashTable::with_capacity_and_hash_function(
                capacity.next_power_of_two(),
                hash_function,
            ),
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the backing table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns `min(len / capacity, 1.0)`, or 1.0 for an unallocated map.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// The hash function used to place keys.
    pub fn hash_function(&self) -> &H {
        self.table.hash_function()
    }

    /// Removes all entries. Capacity is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::from([(1u32, "a"), (2, "b")]);
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 4);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Removes all entries and returns them in slot order. Capacity is
    /// unchanged.
    pub fn drain(&mut self) -> vec::IntoIter<(K, V)> {
        self.table.drain().into_iter()
    }

    /// An iterator visiting all key-value pairs in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            entries: self.table.iter(),
        }
    }

    /// An iterator visiting all keys in slot order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// An iterator visiting all values in slot order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// The resumable cursor over the occupied slots.
    pub fn entries(&self) -> EntryIterator<'_, K, V> {
        self.table.iter()
    }

    /// The raw slot array, including free slots and tombstones.
    pub fn as_entries(&self) -> &[HashEntry<K, V>] {
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

impl<K: Eq, V, H: HashFunction<K>> HashMap<K, V, H> {
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

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    /// If the map did have this key present, the value is updated, and the old
    /// value is returned. The key is not updated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert(37u32, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Gets the given key's entry for in-place manipulation.
    ///
    /// Grows the map first if its load factor has reached 0.7.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let mut letters: HashMap<char, u32> = HashMap::new();
    /// for ch in "a short treatise on fungi".chars() {
    ///     *letters.entry(ch).or_insert(0) += 1;
    /// }
    /// assert_eq!(letters[&'s'], 2);
    /// assert_eq!(letters[&'t'], 3);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        self.enlarge();
        match self.table.set(key) {
            Some(TableEntry::Occupied(entry)) => Entry::Occupied(OccupiedEntry { entry }),
            Some(TableEntry::Vacant(entry)) => Entry::Vacant(VacantEntry { entry }),
            None => unreachable!("{NO_SLOT}"),
        }
    }

    /// Returns a mutable reference to the value for `key`, inserting
    /// `V::default()` first if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::new();
    /// *map.get_or_default("abc") += 1;
    /// *map.get_or_default("abc") += 1;
    /// assert_eq!(map.get(&"abc"), Some(&2));
    /// ```
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.table.get(key).and_then(HashEntry::value)
    }

    /// Returns the stored key and value corresponding to the key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.table.get(key).and_then(HashEntry::pair)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table.get_mut(key).map(|(_, value)| value)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] carrying a copy of `key` if it is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::Error;
    /// use probe_hash::HashMap;
    ///
    /// let map = HashMap::from([("abc", 1)]);
    /// assert_eq!(map.try_get(&"abc"), Ok(&1));
    /// assert_eq!(map.try_get(&"cba"), Err(Error::KeyNotFound("cba")));
    /// ```
    pub fn try_get(&self, key: &K) -> Result<&V, K>
    where
        K: Clone,
    {
        self.get(key).ok_or_else(|| Error::KeyNotFound(key.clone()))
    }

    /// Returns `true` if the map contains a value for the key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.table.contains(key)
    }

    /// Removes a key from the map, returning the value if it was present.
    ///
    /// Shrinks the map afterwards if its load factor has dropped to 0.3.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::from([("abc", 1), ("def", 2), ("ghi", 3), ("jkl", 4)]);
    /// assert_eq!(map.capacity(), 8);
    ///
    /// assert_eq!(map.remove(&"def"), Some(2));
    /// assert_eq!(map.remove(&"def"), None);
    /// assert_eq!(map.remove(&"jkl"), Some(4));
    /// assert_eq!(map.capacity(), 4);
    /// assert_eq!(map.load_factor(), 0.5);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let removed = self.table.unset(key)?;
        self.shrink();
        Some(removed)
    }

    /// Removes a key from the map and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] carrying a copy of `key` if it is absent.
    pub fn try_remove(&mut self, key: &K) -> Result<V, K>
    where
        K: Clone,
    {
        self.remove(key)
            .ok_or_else(|| Error::KeyNotFound(key.clone()))
    }
}

impl<K, V, H> Index<&K> for HashMap<K, V, H>
where
    K: Eq + Debug,
    H: HashFunction<K>,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("{}", Error::KeyNotFound(key)),
        }
    }
}

impl<K, V, H> PartialEq for HashMap<K, V, H>
where
    K: Eq,
    V: PartialEq,
    H: HashFunction<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K, V, H> Eq for HashMap<K, V, H>
where
    K: Eq,
    V: Eq,
    H: HashFunction<K>,
{
}

impl<K, V, H> Extend<(K, V)> for HashMap<K, V, H>
where
    K: Eq,
    H: HashFunction<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, H> FromIterator<(K, V)> for HashMap<K, V, H>
where
    K: Eq,
    H: HashFunction<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hash_function(H::default());
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for HashMap<K, V, DefaultHash>
where
    K: Eq,
    DefaultHash: HashFunction<K>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        let mut map = Self::with_capacity(N);
        map.extend(pairs);
        map
    }
}

impl<'a, K, V, H> IntoIterator for &'a HashMap<K, V, H> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, H> IntoIterator for HashMap<K, V, H> {
    type IntoIter = crate::hash_table::IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}

/// A view into a single entry in the map, which may be vacant or occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, K, V>,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        self.entry.key()
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.entry.into_key()
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        self.entry.insert(value)
    }
}

/// A view into an occupied entry in the map.
///
/// Removal goes through [`HashMap::remove`] so the shrink policy applies.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, K, V>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        self.entry.key()
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        self.entry.get()
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        self.entry.get_mut()
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        self.entry.into_mut()
    }

    /// Sets the value of the entry, returning the old value.
    pub fn insert(&mut self, value: V) -> V {
        self.entry.insert(value)
    }
}

/// An iterator over the entries of a `HashMap`.
pub struct Iter<'a, K, V> {
    entries: EntryIterator<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()?.pair()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
