use core::fmt::Debug;
use core::mem::MaybeUninit;

use crate::hash_function::Id;

/// Lifecycle tag of a slot.
///
/// Slots move `Free -> Occupied -> Deleted`, and a `Deleted` slot may become
/// `Occupied` again. Only clearing or resizing the table returns a slot to
/// `Free`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryState {
    /// Never used since the last clear or resize. Terminates a probe.
    Free,
    /// Holds a live key and value.
    Occupied,
    /// Tombstone left by a removal. Probes continue past it.
    Deleted,
}

/// One slot of a [`HashTable`](crate::HashTable).
///
/// The key and value are initialized if and only if the state is
/// [`EntryState::Occupied`]. The cached hash is meaningful whenever the slot
/// is not [`EntryState::Free`].
pub struct HashEntry<K, V = ()> {
    hash: Id,
    state: EntryState,
    key: MaybeUninit<K>,
    value: MaybeUninit<V>,
}

/// A key-only slot, as stored by [`HashSet`](crate::HashSet).
pub type KeyEntry<K> = HashEntry<K, ()>;

impl<K, V> HashEntry<K, V> {
    /// Returns an empty slot.
    pub const fn free() -> Self {
        Self {
            hash: Id::MAX,
            state: EntryState::Free,
            key: MaybeUninit::uninit(),
            value: MaybeUninit::uninit(),
        }
    }

    /// Hash code cached when the slot was last filled.
    #[inline]
    pub fn hash(&self) -> Id {
        self.hash
    }

    /// Current lifecycle tag.
    #[inline]
    pub fn state(&self) -> EntryState {
        self.state
    }

    /// Returns `true` if the slot holds a live key and value.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.state == EntryState::Occupied
    }

    /// Returns `true` if the slot has not been used since the last clear or
    /// resize.
    #[inline]
    pub fn is_free(&self) -> bool {
        self.state == EntryState::Free
    }

    /// Returns `true` if the slot is a tombstone.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.state == EntryState::Deleted
    }

    /// The live key, if any.
    #[inline]
    pub fn key(&self) -> Option<&K> {
        if self.is_occupied() {
            // SAFETY: The key is initialized whenever the slot is occupied.
            Some(unsafe { self.key.assume_init_ref() })
        } else {
            None
        }
    }

    /// The live value, if any.
    #[inline]
    pub fn value(&self) -> Option<&V> {
        if self.is_occupied() {
            // SAFETY: The value is initialized whenever the slot is occupied.
            Some(unsafe { self.value.assume_init_ref() })
        } else {
            None
        }
    }

    /// The live key and value, if any.
    #[inline]
    pub fn pair(&self) -> Option<(&K, &V)> {
        if self.is_occupied() {
            // SAFETY: Both halves are initialized whenever the slot is occupied.
            unsafe {
                Some((
                    self.key.assume_init_ref(),
                    self.value.assume_init_ref(),
                ))
            }
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> Option<&mut V> {
        if self.is_occupied() {
            // SAFETY: The value is initialized whenever the slot is occupied.
            Some(unsafe { self.value.assume_init_mut() })
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn pair_mut(&mut self) -> Option<(&K, &mut V)> {
        if self.is_occupied() {
            // SAFETY: Both halves are initialized whenever the slot is occupied,
            // and the two fields are disjoint borrows.
            unsafe {
                Some((
                    self.key.assume_init_ref(),
                    self.value.assume_init_mut(),
                ))
            }
        } else {
            None
        }
    }

    /// Writes a new key and value into a slot that is not occupied.
    pub(crate) fn fill(&mut self, hash: Id, key: K, value: V) -> &mut V {
        debug_assert!(!self.is_occupied(), "filling an occupied slot");
        self.hash = hash;
        self.state = EntryState::Occupied;
        self.key.write(key);
        self.value.write(value)
    }

    /// Moves the key and value out and leaves a tombstone.
    pub(crate) fn take(&mut self) -> Option<(K, V)> {
        if !self.is_occupied() {
            return None;
        }

        self.state = EntryState::Deleted;
        // SAFETY: The slot was occupied, so both halves are initialized. The
        // state no longer claims ownership, so they are read exactly once.
        unsafe {
            Some((
                self.key.assume_init_read(),
                self.value.assume_init_read(),
            ))
        }
    }

    /// Moves the slot's contents out together with the cached hash.
    pub(crate) fn into_parts(mut self) -> Option<(Id, K, V)> {
        let hash = self.hash;
        let (key, value) = self.take()?;
        Some((hash, key, value))
    }

    /// Drops any live contents and marks the slot free.
    pub(crate) fn reset(&mut self) {
        if self.is_occupied() {
            // SAFETY: The slot is occupied, so both halves are initialized. The
            // state is overwritten below, so they are never dropped again.
            unsafe {
                self.key.assume_init_drop();
                self.value.assume_init_drop();
            }
        }
        self.hash = Id::MAX;
        self.state = EntryState::Free;
    }
}

impl<K, V> Default for HashEntry<K, V> {
    fn default() -> Self {
        Self::free()
    }
}

impl<K, V> Drop for HashEntry<K, V> {
    fn drop(&mut self) {
        if self.is_occupied() {
            // SAFETY: Occupied slots own an initialized key and value.
            unsafe {
                self.key.assume_init_drop();
                self.value.assume_init_drop();
            }
        }
    }
}

impl<K: Clone, V: Clone> Clone for HashEntry<K, V> {
    fn clone(&self) -> Self {
        let mut entry = Self {
            hash: self.hash,
            state: EntryState::Free,
            key: MaybeUninit::uninit(),
            value: MaybeUninit::uninit(),
        };
        if let Some((key, value)) = self.pair() {
            entry.key.write(key.clone());
            entry.value.write(value.clone());
        }
        // Tag last: a slot must not claim contents a panicking clone never wrote.
        entry.state = self.state;
        entry
    }
}

impl<K: Debug, V: Debug> Debug for HashEntry<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.pair() {
            Some((key, value)) => f
                .debug_struct("Occupied")
                .field("hash", &self.hash)
                .field("key", key)
                .field("value", value)
                .finish(),
            None => match self.state {
                EntryState::Deleted => f.debug_tuple("Deleted").field(&self.hash).finish(),
                _ => f.write_str("Free"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn free_slot_is_empty() {
        let entry: HashEntry<u32, u32> = HashEntry::free();
        assert_eq!(entry.state(), EntryState::Free);
        assert!(entry.is_free());
        assert_eq!(entry.key(), None);
        assert_eq!(entry.value(), None);
        assert_eq!(entry.pair(), None);
    }

    #[test]
    fn fill_take_reset_cycle() {
        let mut entry: HashEntry<String, i32> = HashEntry::free();
        *entry.fill(7, "abc".to_string(), 1) += 1;
        assert!(entry.is_occupied());
        assert_eq!(entry.hash(), 7);
        assert_eq!(entry.pair(), Some((&"abc".to_string(), &2)));

        assert_eq!(entry.take(), Some(("abc".to_string(), 2)));
        assert!(entry.is_deleted());
        assert_eq!(entry.hash(), 7);
        assert_eq!(entry.take(), None);

        entry.fill(9, "def".to_string(), 3);
        assert!(entry.is_occupied());
        entry.reset();
        assert!(entry.is_free());
        assert_eq!(entry.key(), None);
    }

    #[test]
    fn contents_dropped_exactly_once() {
        let tracker = Rc::new(());
        {
            let mut entry: HashEntry<u8, Rc<()>> = HashEntry::free();
            entry.fill(0, 0, tracker.clone());
            assert_eq!(Rc::strong_count(&tracker), 2);

            let cloned = entry.clone();
            assert_eq!(Rc::strong_count(&tracker), 3);
            drop(cloned);

            let (_, value) = entry.take().unwrap();
            assert_eq!(Rc::strong_count(&tracker), 2);
            drop(value);
            assert_eq!(Rc::strong_count(&tracker), 1);

            entry.fill(0, 0, tracker.clone());
            entry.reset();
            assert_eq!(Rc::strong_count(&tracker), 1);

            entry.fill(0, 0, tracker.clone());
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn into_parts_keeps_hash() {
        let mut entry: KeyEntry<u64> = HashEntry::free();
        entry.fill(42, 5, ());
        assert_eq!(entry.into_parts(), Some((42, 5, ())));
        assert_eq!(HashEntry::<u64>::free().into_parts(), None);
    }

    #[test]
    fn debug_shows_state() {
        let mut entry: HashEntry<u8, u8> = HashEntry::free();
        assert_eq!(format!("{entry:?}"), "Free");
        entry.fill(3, 1, 2);
        assert_eq!(
            format!("{entry:?}"),
            "Occupied { hash: 3, key: 1, value: 2 }"
        );
        entry.take();
        assert_eq!(format!("{entry:?}"), "Deleted(3)");
    }
}
