//! # flatradix
//!
//! A static associative container: the key set is fixed at construction,
//! values stay mutable. Knowing every key up front, construction builds a
//! multi-way radix dispatch tree over the key bytes and flattens it into one
//! contiguous buffer of 32-bit words. Lookups — including rejection of
//! absent keys — walk that buffer iteratively with one compare, one table
//! read and one unsigned subtraction per level.
//!
//! Built for workloads where the key set is known at initialisation and
//! lookup throughput matters: command dispatchers, routing tables, interned
//! symbols, configuration maps.
//!
//! ## Example
//!
//! ```rust
//! use flatradix::StaticRadixMap;
//!
//! let map: StaticRadixMap<String, u32> = StaticRadixMap::new([
//!     ("get".to_string(), 1u32),
//!     ("put".to_string(), 2),
//!     ("delete".to_string(), 3),
//! ])
//! .unwrap();
//!
//! assert_eq!(map.get("put"), Some(&2));
//! assert_eq!(map.get("patch"), None);
//! assert_eq!(map.value("delete"), 3);
//! assert_eq!(map.value("head"), 0);
//! ```
//!
//! ## Thread compatibility
//!
//! After construction the map is read-only in structure: any number of
//! threads may look up and read values concurrently without synchronisation.
//! Mutation of values or of the container itself requires external
//! exclusion.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod build;
mod flat;
pub mod key;

pub use key::KeyBytes;

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

use crate::build::BuildNode;
use crate::flat::{DispatchTree, MAX_TAGGED};

/// Errors surfaced by construction and the failing accessors.
///
/// The lookup hot path never fails; construction reports its problems before
/// any map state becomes observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadixMapError {
    /// The supplied key set contains duplicates — including keys that no
    /// byte position can tell apart, which is the same thing.
    KeysNotUnique,
    /// [`StaticRadixMap::value_ref`] or [`StaticRadixMap::value_mut`] was
    /// called with a key not in the map.
    KeyNotFound,
    /// The entry count or the flattened tree outgrew the 31-bit tag space.
    TooManyEntries,
}

impl fmt::Display for RadixMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadixMapError::KeysNotUnique => write!(f, "keys are not unique"),
            RadixMapError::KeyNotFound => write!(f, "key does not exist"),
            RadixMapError::TooManyEntries => {
                write!(f, "entry count exceeds the 31-bit index space")
            }
        }
    }
}

impl std::error::Error for RadixMapError {}

/// Result type for map operations.
pub type Result<T> = std::result::Result<T, RadixMapError>;

/// A map over a fixed key set, dispatching on key bytes through a flattened
/// radix tree.
///
/// Entries keep their construction order: iteration, [`find`] positions and
/// [`equal_range`] all refer to that order. Values are mutable in place and
/// their addresses are stable for the life of the map.
///
/// With `QUERY_ONLY_EXISTING = true` the caller promises to never look up an
/// absent key; the walk then skips the slot range check and the final key
/// verification. Breaking that promise yields unspecified results (an
/// arbitrary entry or a miss) but never reads outside the map's buffers.
///
/// [`find`]: StaticRadixMap::find
/// [`equal_range`]: StaticRadixMap::equal_range
#[derive(Clone)]
pub struct StaticRadixMap<K, V, const QUERY_ONLY_EXISTING: bool = false> {
    entries: Vec<(K, V)>,
    tree: DispatchTree,
}

impl<K: KeyBytes, V, const QUERY_ONLY_EXISTING: bool> StaticRadixMap<K, V, QUERY_ONLY_EXISTING> {
    /// Builds a map from the complete key-value set.
    ///
    /// Entries are copied in iteration order and that order is preserved by
    /// iteration forever after. Fails with [`RadixMapError::KeysNotUnique`]
    /// on duplicate keys and [`RadixMapError::TooManyEntries`] past
    /// 2³¹ − 1 entries; on failure no map state is left behind.
    pub fn new<I>(input: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let iter = input.into_iter();
        let mut entries: Vec<(K, V)> = Vec::with_capacity(iter.size_hint().0);
        entries.extend(iter);

        if entries.len() > MAX_TAGGED as usize {
            return Err(RadixMapError::TooManyEntries);
        }
        if entries.is_empty() {
            return Ok(Self {
                entries,
                tree: DispatchTree::new(),
            });
        }

        let keys: Vec<&[u8]> = entries.iter().map(|(k, _)| k.key_bytes()).collect();
        let selection: Vec<u32> = (0..entries.len() as u32).collect();
        let root = BuildNode::build(&keys, &selection)?;
        let tree = DispatchTree::from_build(&root)?;

        Ok(Self { entries, tree })
    }

    /// Entry index for `key`, or `None` when absent.
    #[inline]
    fn lookup_index(&self, key: &[u8]) -> Option<usize> {
        if QUERY_ONLY_EXISTING {
            let idx = self.tree.descend_trusted(key)? as usize;
            // Contract misuse can surface a stale word; stay in bounds.
            (idx < self.entries.len()).then_some(idx)
        } else {
            let idx = self.tree.descend(key)? as usize;
            // The walk only proves the route; representational equality
            // decides the hit.
            (self.entries[idx].0.key_bytes() == key).then_some(idx)
        }
    }

    /// A reference to the value for `key`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: KeyBytes + ?Sized,
    {
        let idx = self.lookup_index(key.key_bytes())?;
        Some(&self.entries[idx].1)
    }

    /// A mutable reference to the value for `key`.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: KeyBytes + ?Sized,
    {
        let idx = self.lookup_index(key.key_bytes())?;
        Some(&mut self.entries[idx].1)
    }

    /// The stored key and value for `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: KeyBytes + ?Sized,
    {
        let idx = self.lookup_index(key.key_bytes())?;
        let (k, v) = &self.entries[idx];
        Some((k, v))
    }

    /// The value for `key` by copy, or `V::default()` when absent.
    ///
    /// Never fails; a miss is indistinguishable from a stored default value.
    pub fn value<Q>(&self, key: &Q) -> V
    where
        V: Default + Clone,
        K: Borrow<Q>,
        Q: KeyBytes + ?Sized,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// A reference to the value for `key`, failing with
    /// [`RadixMapError::KeyNotFound`] when absent.
    pub fn value_ref<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: KeyBytes + ?Sized,
    {
        self.get(key).ok_or(RadixMapError::KeyNotFound)
    }

    /// A mutable reference to the value for `key`, failing with
    /// [`RadixMapError::KeyNotFound`] when absent.
    pub fn value_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: KeyBytes + ?Sized,
    {
        self.get_mut(key).ok_or(RadixMapError::KeyNotFound)
    }

    /// Whether `key` is in the map.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: KeyBytes + ?Sized,
    {
        self.lookup_index(key.key_bytes()).is_some()
    }

    /// `1` when `key` is in the map, `0` otherwise.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: KeyBytes + ?Sized,
    {
        self.contains(key) as usize
    }

    /// Position of `key`'s entry in iteration order, or `None` when absent.
    ///
    /// Resolve positions with [`get_index`](StaticRadixMap::get_index).
    pub fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: KeyBytes + ?Sized,
    {
        self.lookup_index(key.key_bytes())
    }

    /// The half-open range of positions holding `key`: length 1 on a hit,
    /// the empty range at the end otherwise.
    pub fn equal_range<Q>(&self, key: &Q) -> Range<usize>
    where
        K: Borrow<Q>,
        Q: KeyBytes + ?Sized,
    {
        match self.find(key) {
            Some(idx) => idx..idx + 1,
            None => self.entries.len()..self.entries.len(),
        }
    }
}

impl<K, V, const QUERY_ONLY_EXISTING: bool> StaticRadixMap<K, V, QUERY_ONLY_EXISTING> {
    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest entry count any map can hold: the 31-bit leaf tag space.
    pub fn max_len(&self) -> usize {
        MAX_TAGGED as usize
    }

    /// Entry at `index` in iteration order.
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.entries.get(index).map(|(k, v)| (k, v))
    }

    /// Entries in construction order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + ExactSizeIterator {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Entries in construction order with mutable values.
    ///
    /// Keys are never handed out mutably; changing a key's bytes would
    /// desynchronise it from the dispatch tree.
    pub fn iter_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = (&K, &mut V)> + ExactSizeIterator {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    /// Entries in reverse construction order.
    pub fn iter_rev(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().rev().map(|(k, v)| (k, v))
    }

    /// Exchanges the contents of two maps. Never fails.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Drops every entry and the dispatch tree, leaving the empty map.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.tree.clear();
    }

    /// Heap footprint in bytes: the container itself, the entry sequence and
    /// the dispatch buffer.
    pub fn memory_used(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.entries.capacity() * std::mem::size_of::<(K, V)>()
            + self.tree.memory_used()
    }

    /// Mean dispatch-tree depth over all entries. Purely informational: a
    /// proxy for the per-lookup work.
    pub fn average_depth(&self) -> f64 {
        self.tree.average_depth(self.entries.len())
    }
}

impl<K, V, const QUERY_ONLY_EXISTING: bool> Default for StaticRadixMap<K, V, QUERY_ONLY_EXISTING> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            tree: DispatchTree::new(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, const QUERY_ONLY_EXISTING: bool> fmt::Debug
    for StaticRadixMap<K, V, QUERY_ONLY_EXISTING>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// Equality and ordering compare the entry sequences, also across the two
// `QUERY_ONLY_EXISTING` instantiations.
impl<K: PartialEq, V: PartialEq, const A: bool, const B: bool> PartialEq<StaticRadixMap<K, V, B>>
    for StaticRadixMap<K, V, A>
{
    fn eq(&self, other: &StaticRadixMap<K, V, B>) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq, V: Eq, const QUERY_ONLY_EXISTING: bool> Eq
    for StaticRadixMap<K, V, QUERY_ONLY_EXISTING>
{
}

impl<K: PartialOrd, V: PartialOrd, const A: bool, const B: bool>
    PartialOrd<StaticRadixMap<K, V, B>> for StaticRadixMap<K, V, A>
{
    fn partial_cmp(&self, other: &StaticRadixMap<K, V, B>) -> Option<Ordering> {
        self.entries.partial_cmp(&other.entries)
    }
}

impl<K: Ord, V: Ord, const QUERY_ONLY_EXISTING: bool> Ord
    for StaticRadixMap<K, V, QUERY_ONLY_EXISTING>
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.entries.cmp(&other.entries)
    }
}


#[cfg(test)]
mod proptests;
