use core::iter::FusedIterator;

use crate::error::Error;
use crate::hash_entry::HashEntry;

/// A resumable cursor over the occupied slots of a table.
///
/// Slots are visited in slot-array order. The cursor stops once it has
/// yielded as many entries as the table held when the cursor was created, so
/// a sparse tail of free slots and tombstones is never scanned.
///
/// Created by [`HashTable::iter`](crate::HashTable::iter),
/// [`HashMap::entries`](crate::HashMap::entries) and
/// [`HashSet::entries`](crate::HashSet::entries).
pub struct EntryIterator<'a, K, V = ()> {
    entries: &'a [HashEntry<K, V>],
    size: usize,
    count: usize,
    index: usize,
}

impl<'a, K, V> EntryIterator<'a, K, V> {
    pub(crate) fn new(entries: &'a [HashEntry<K, V>], size: usize) -> Self {
        Self {
            entries,
            size,
            count: 0,
            index: 0,
        }
    }

    /// Returns `true` while fewer than `len` entries have been yielded.
    pub fn has_next(&self) -> bool {
        self.count < self.size
    }

    /// Advances to the next occupied slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] once no occupied slot remains.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::Error;
    /// use probe_hash::HashSet;
    ///
    /// let set = HashSet::from([7u32]);
    /// let mut entries = set.entries();
    /// assert_eq!(entries.try_next().map(|e| e.key()), Ok(Some(&7)));
    /// assert!(!entries.has_next());
    /// assert!(matches!(entries.try_next(), Err(Error::InvalidOperation)));
    /// ```
    pub fn try_next(&mut self) -> Result<&'a HashEntry<K, V>, Error<K>> {
        while let Some(entry) = self.entries.get(self.index) {
            self.index += 1;
            if entry.is_occupied() {
                self.count += 1;
                return Ok(entry);
            }
        }
        Err(Error::InvalidOperation)
    }
}

impl<'a, K, V> Iterator for EntryIterator<'a, K, V> {
    type Item = &'a HashEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        self.try_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.size - self.count;
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for EntryIterator<'_, K, V> {}

impl<K, V> FusedIterator for EntryIterator<'_, K, V> {}

impl<K, V> Clone for EntryIterator<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries,
            size: self.size,
            count: self.count,
            index: self.index,
        }
    }
}
