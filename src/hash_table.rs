use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::entry_iterator::EntryIterator;
use crate::hash_entry::HashEntry;
use crate::hash_function::DefaultHash;
use crate::hash_function::HashFunction;
use crate::hash_function::Id;

/// Smallest capacity an explicitly sized table is given.
pub const MIN_CAPACITY: usize = 4;

/// Load factor at or above which the map and set grow before inserting.
pub const MAX_LOAD_FACTOR: f64 = 0.7;

/// Load factor at or below which the map and set shrink after removing.
pub const MIN_LOAD_FACTOR: f64 = 0.3;

/// `min(size / capacity, 1.0)`, with an unallocated table reported as full.
#[inline]
pub(crate) fn load_factor(size: usize, capacity: usize) -> f64 {
    if capacity == 0 {
        return 1.0;
    }
    (size as f64 / capacity as f64).min(1.0)
}

#[inline]
pub(crate) fn should_enlarge(size: usize, capacity: usize) -> bool {
    load_factor(size, capacity) >= MAX_LOAD_FACTOR
}

#[inline]
pub(crate) fn should_shrink(size: usize, capacity: usize) -> bool {
    load_factor(size, capacity) <= MIN_LOAD_FACTOR
}

fn free_entries<K, V>(capacity: usize) -> Box<[HashEntry<K, V>]> {
    (0..capacity).map(|_| HashEntry::free()).collect()
}

/// Finds the slot for `key` by linear probing from `hash % capacity`.
///
/// Returns the slot holding `key` if it is live. Otherwise returns the first
/// non-occupied slot seen before the probe reached a free slot, so tombstones
/// along the chain are reused. `None` means every slot is occupied by some
/// other key.
fn load<K: Eq, V>(entries: &[HashEntry<K, V>], hash: Id, key: &K) -> Option<usize> {
    let capacity = entries.len();
    if capacity == 0 {
        return None;
    }

    let start = hash % capacity;
    let mut preferred = None;
    for offset in 0..capacity {
        let index = (start + offset) % capacity;
        let entry = &entries[index];
        match entry.key() {
            Some(live) if entry.hash() == hash && live == key => return Some(index),
            Some(_) => {}
            None => {
                preferred.get_or_insert(index);
                if entry.is_free() {
                    break;
                }
            }
        }
    }

    preferred
}

/// Places an entry known to be absent into a table without tombstones.
fn place<K, V>(entries: &mut [HashEntry<K, V>], hash: Id, key: K, value: V) {
    let capacity = entries.len();
    let start = hash % capacity;
    for offset in 0..capacity {
        let entry = &mut entries[(start + offset) % capacity];
        if !entry.is_occupied() {
            entry.fill(hash, key, value);
            return;
        }
    }
    unreachable!("resized table has no free slot");
}

/// Diagnostic summary of a table's slot array.
///
/// Available in tests and with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of live entries.
    pub populated: usize,
    /// Total number of slots.
    pub capacity: usize,
    /// Number of tombstones left by removals.
    pub tombstones: usize,
    /// Number of never-used slots.
    pub free_slots: usize,
    /// `populated / capacity`, 1.0 when unallocated.
    pub load_factor: f64,
    /// Longest distance of a live entry from its home slot.
    pub max_probe_length: usize,
    /// Mean distance of live entries from their home slots.
    pub mean_probe_length: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slots: {} free, {} tombstones",
            self.free_slots, self.tombstones
        );
        println!(
            "Probe length: max {}, mean {:.2}",
            self.max_probe_length, self.mean_probe_length
        );
    }
}

/// Count of live entries per probe length, index `n` holding the entries
/// found `n` slots past their home slot.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeHistogram {
    /// Entry counts indexed by probe length.
    pub counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Total number of entries counted.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.total());

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let partial = match units % 8 {
                1 => Some('▏'),
                2 => Some('▎'),
                3 => Some('▍'),
                4 => Some('▌'),
                5 => Some('▋'),
                6 => Some('▊'),
                7 => Some('▉'),
                _ => None,
            };
            bar.extend(partial);
            bar
        };

        for (length, &count) in self.counts.iter().enumerate() {
            println!("{:>3} | {} ({})", length, make_bar(count), count);
        }
    }
}

/// An open-addressing hash table with linear probing.
///
/// `HashTable<K, V, H>` owns a flat array of [`HashEntry`] slots. A key is
/// placed at `hash % capacity` or, on collision, at the next slot that is not
/// occupied. Removals leave tombstones so that probe chains stay intact; the
/// tombstones are reused by later insertions and discarded on the next
/// resize or clear.
///
/// The table has no growth policy of its own: it never resizes unless
/// [`enlarge`](HashTable::enlarge) or [`shrink`](HashTable::shrink) is called.
/// [`HashMap`](crate::HashMap) and [`HashSet`](crate::HashSet) layer the
/// load-factor policy on top.
///
/// ## Example
///
/// ```rust
/// use probe_hash::HashTable;
/// use probe_hash::hash_table::Entry;
///
/// let mut table: HashTable<u32, &str> = HashTable::with_capacity(4);
/// match table.set(15) {
///     Some(Entry::Vacant(entry)) => {
///         entry.insert("fifteen");
///     }
///     Some(Entry::Occupied(_)) => unreachable!(),
///     None => unreachable!("table is full"),
/// }
///
/// assert_eq!(table.get(&15).and_then(|e| e.value()), Some(&"fifteen"));
/// assert_eq!(table.unset(&15), Some((15, "fifteen")));
/// assert!(table.is_empty());
/// ```
pub struct HashTable<K, V = (), H = DefaultHash> {
    entries: Box<[HashEntry<K, V>]>,
    size: usize,
    hash_function: H,
}

impl<K: Debug, V: Debug, H> Debug for HashTable<K, V, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .field("entries", &self.entries)
            .finish()
    }
}

impl<K: Clone, V: Clone, H: Clone> Clone for HashTable<K, V, H> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            size: self.size,
            hash_function: self.hash_function.clone(),
        }
    }
}

impl<K, V, H: Default> Default for HashTable<K, V, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H: Default> HashTable<K, V, H> {
    /// Creates an unallocated table with capacity 0.
    pub fn new() -> Self {
        Self::with_hash_function(H::default())
    }

    /// Creates a table with at least `capacity` slots (minimum
    /// [`MIN_CAPACITY`]).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hash_function(capacity, H::default())
    }
}

impl<K, V, H> HashTable<K, V, H> {
    /// Creates an unallocated table using `hash_function`.
    pub fn with_hash_function(hash_function: H) -> Self {
        Self {
            entries: Box::new([]),
            size: 0,
            hash_function,
        }
    }

    /// Creates a table with at least `capacity` slots (minimum
    /// [`MIN_CAPACITY`]) using `hash_function`.
    pub fn with_capacity_and_hash_function(capacity: usize, hash_function: H) -> Self {
        Self {
            entries: free_entries(capacity.max(MIN_CAPACITY)),
            size: 0,
            hash_function,
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the table holds no live entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// `min(len / capacity, 1.0)`; an unallocated table reports 1.0.
    #[inline]
    pub fn load_factor(&self) -> f64 {
        load_factor(self.size, self.capacity())
    }

    /// The raw slot array, including free slots and tombstones.
    #[inline]
    pub fn entries(&self) -> &[HashEntry<K, V>] {
        &self.entries
    }

    /// Iterates the live entries in slot order.
    pub fn iter(&self) -> EntryIterator<'_, K, V> {
        EntryIterator::new(&self.entries, self.size)
    }

    /// The hash function used to place keys.
    #[inline]
    pub fn hash_function(&self) -> &H {
        &self.hash_function
    }

    /// Drops every live entry and frees every slot. Capacity is unchanged.
    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.reset();
        }
        self.size = 0;
    }

    /// Removes every live entry, returning them in slot order. Capacity is
    /// unchanged.
    pub fn drain(&mut self) -> Vec<(K, V)> {
        let drained = self
            .entries
            .iter_mut()
            .filter_map(|entry| {
                let pair = entry.take();
                entry.reset();
                pair
            })
            .collect();
        self.size = 0;
        drained
    }

    /// Moves every live entry into a fresh array of `capacity` slots.
    fn resize(&mut self, capacity: usize) {
        debug_assert!(capacity > self.size);
        let old = core::mem::replace(&mut self.entries, free_entries(capacity));
        for entry in old.into_vec() {
            if let Some((hash, key, value)) = entry.into_parts() {
                place(&mut self.entries, hash, key, value);
            }
        }
    }

    /// Grows to `max(capacity, MIN_CAPACITY)` slots if that is strictly more
    /// than the current capacity. Returns whether the table was resized.
    pub fn enlarge(&mut self, capacity: usize) -> bool {
        let capacity = capacity.max(MIN_CAPACITY);
        if capacity <= self.capacity() {
            return false;
        }
        self.resize(capacity);
        true
    }

    /// Shrinks to `max(capacity, MIN_CAPACITY)` slots if that is strictly
    /// less than the current capacity and strictly more than `len`. Returns
    /// whether the table was resized.
    pub fn shrink(&mut self, capacity: usize) -> bool {
        let capacity = capacity.max(MIN_CAPACITY);
        if capacity >= self.capacity() || capacity <= self.size {
            return false;
        }
        self.resize(capacity);
        true
    }

    /// Returns statistics about slot usage and probe lengths.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let mut tombstones = 0;
        let mut free_slots = 0;
        let mut max_probe_length = 0;
        let mut total_probe_length = 0;
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.is_occupied() {
                let length = self.probe_length(index, entry.hash());
                max_probe_length = max_probe_length.max(length);
                total_probe_length += length;
            } else if entry.is_deleted() {
                tombstones += 1;
            } else {
                free_slots += 1;
            }
        }

        DebugStats {
            populated: self.size,
            capacity: self.capacity(),
            tombstones,
            free_slots,
            load_factor: self.load_factor(),
            max_probe_length,
            mean_probe_length: if self.size == 0 {
                0.0
            } else {
                total_probe_length as f64 / self.size as f64
            },
        }
    }

    /// Returns how many live entries sit at each distance from their home
    /// slot.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut counts = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.is_occupied() {
                let length = self.probe_length(index, entry.hash());
                if counts.len() <= length {
                    counts.resize(length + 1, 0);
                }
                counts[length] += 1;
            }
        }
        ProbeHistogram { counts }
    }

    #[cfg(any(test, feature = "stats"))]
    fn probe_length(&self, index: usize, hash: Id) -> usize {
        let capacity = self.capacity();
        (index + capacity - hash % capacity) % capacity
    }
}

impl<K: Eq, V, H: HashFunction<K>> HashTable<K, V, H> {
    /// Locates the slot for `key`, for inserting or updating.
    ///
    /// Returns [`Entry::Occupied`] if `key` is live (the passed key is
    /// dropped and the slot is left unchanged) and [`Entry::Vacant`] with the
    /// slot the key would be written to otherwise. Returns `None` if every
    /// slot is occupied by other keys, including when the table is
    /// unallocated.
    pub fn set(&mut self, key: K) -> Option<Entry<'_, K, V>> {
        let hash = self.hash_function.hash(&key);
        let index = load(&self.entries, hash, &key)?;
        let slot = &mut self.entries[index];
        let size = &mut self.size;
        Some(if slot.is_occupied() {
            Entry::Occupied(OccupiedEntry { slot, size })
        } else {
            Entry::Vacant(VacantEntry {
                slot,
                size,
                hash,
                key,
            })
        })
    }

    /// Returns the slot holding `key`, if it is live.
    pub fn get(&self, key: &K) -> Option<&HashEntry<K, V>> {
        let hash = self.hash_function.hash(key);
        let index = load(&self.entries, hash, key)?;
        let entry = &self.entries[index];
        entry.is_occupied().then_some(entry)
    }

    /// Returns the live key and a mutable reference to its value.
    pub fn get_mut(&mut self, key: &K) -> Option<(&K, &mut V)> {
        let hash = self.hash_function.hash(key);
        let index = load(&self.entries, hash, key)?;
        self.entries[index].pair_mut()
    }

    /// Removes `key`, leaving a tombstone, and returns the removed pair.
    pub fn unset(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_function.hash(key);
        let index = load(&self.entries, hash, key)?;
        let removed = self.entries[index].take()?;
        self.size -= 1;
        Some(removed)
    }

    /// Returns `true` if `key` is live.
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<K, V, H> IntoIterator for HashTable<K, V, H> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.size,
            entries: self.entries.into_vec().into_iter(),
        }
    }
}

/// An owning iterator over the live pairs of a table, in slot order.
pub struct IntoIter<K, V> {
    entries: alloc::vec::IntoIter<HashEntry<K, V>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let (_, key, value) = self.entries.find_map(HashEntry::into_parts)?;
        self.remaining -= 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// A view into a single slot of the table, which may be vacant or occupied.
///
/// This enum is constructed from the [`set`] method on [`HashTable`].
///
/// [`set`]: HashTable::set
pub enum Entry<'a, K, V> {
    /// The key is not live; the slot is where it would be written.
    Vacant(VacantEntry<'a, K, V>),
    /// The key is live in this slot.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to the value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// The entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V: Default> Entry<'a, K, V> {
    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

/// A view into a slot the key is not live in.
pub struct VacantEntry<'a, K, V> {
    slot: &'a mut HashEntry<K, V>,
    size: &'a mut usize,
    hash: Id,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// The key that would be inserted.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes back the key without inserting.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Writes the key and `value` into the slot and returns a mutable
    /// reference to the value.
    pub fn insert(self, value: V) -> &'a mut V {
        *self.size += 1;
        self.slot.fill(self.hash, self.key, value)
    }
}

/// A view into the slot holding a live key.
pub struct OccupiedEntry<'a, K, V> {
    slot: &'a mut HashEntry<K, V>,
    size: &'a mut usize,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    fn split(&self) -> (&K, &V) {
        match self.slot.pair() {
            Some(pair) => pair,
            None => unreachable!("occupied entry over a non-occupied slot"),
        }
    }

    fn split_mut(&mut self) -> (&K, &mut V) {
        match self.slot.pair_mut() {
            Some(pair) => pair,
            None => unreachable!("occupied entry over a non-occupied slot"),
        }
    }

    /// The live key.
    pub fn key(&self) -> &K {
        self.split().0
    }

    /// The live value.
    pub fn get(&self) -> &V {
        self.split().1
    }

    /// The live value, mutably.
    pub fn get_mut(&mut self) -> &mut V {
        self.split_mut().1
    }

    /// Converts into a mutable reference bound to the table's borrow.
    pub fn into_mut(self) -> &'a mut V {
        match self.slot.value_mut() {
            Some(value) => value,
            None => unreachable!("occupied entry over a non-occupied slot"),
        }
    }

    /// Replaces the value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the pair, leaving a tombstone.
    pub fn remove_entry(self) -> (K, V) {
        *self.size -= 1;
        match self.slot.take() {
            Some(pair) => pair,
            None => unreachable!("occupied entry over a non-occupied slot"),
        }
    }

    /// Removes the pair, leaving a tombstone, and returns the value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}
