use std::iter::FusedIterator;

use crate::{
    Cursor, OrderedMap, Result,
    iter::tree,
    map::{Entry, KeyOrder},
};

/// An iterator over the entries of an [`OrderedMap`], sorted by key.
///
/// This `struct` is created by the [`iter`] method on [`OrderedMap`].
///
/// [`iter`]: OrderedMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: tree::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(inner: tree::Iter<'a, Entry<K, V>>) -> Self {
        Iter { inner }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next().map(|e| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<(&'a K, &'a V)> {
        self.next_back()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next_back().map(|e| (&e.key, &e.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// An iterator over the keys of an [`OrderedMap`].
///
/// This `struct` is created by the [`keys`] method on [`OrderedMap`].
///
/// [`keys`]: OrderedMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Keys { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<&'a K> {
        self.next_back()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of an [`OrderedMap`].
///
/// This `struct` is created by the [`values`] method on [`OrderedMap`].
///
/// [`values`]: OrderedMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Values { inner }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<&'a V> {
        self.next_back()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a V> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// An owning iterator over the entries of an [`OrderedMap`], sorted by key.
pub struct IntoEntries<K, V>(tree::IntoIter<Entry<K, V>, KeyOrder<K>>);

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoEntries<K, V>;

    fn into_iter(self) -> IntoEntries<K, V> {
        IntoEntries(self.tree.into_iter())
    }
}

impl<K, V> Iterator for IntoEntries<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.0.next().map(Entry::into_pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoEntries<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.0.next_back().map(Entry::into_pair)
    }
}

impl<K, V> ExactSizeIterator for IntoEntries<K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K, V> FusedIterator for IntoEntries<K, V> {}

/// A removal-safe cursor over the entries of an [`OrderedMap`].
///
/// This `struct` is created by the [`entry_cursor`] method on
/// [`OrderedMap`].
///
/// [`entry_cursor`]: OrderedMap::entry_cursor
pub struct EntryCursor<'a, K, V> {
    inner: Cursor<'a, Entry<K, V>, KeyOrder<K>>,
}

impl<'a, K, V> EntryCursor<'a, K, V> {
    pub(crate) fn new(inner: Cursor<'a, Entry<K, V>, KeyOrder<K>>) -> Self {
        EntryCursor { inner }
    }

    pub fn has_next(&mut self) -> bool {
        self.inner.has_next()
    }

    pub fn next(&mut self) -> Result<(&K, &V)> {
        self.inner.next().map(|e| (&e.key, &e.value))
    }

    /// Removes the entry last returned by `next`.
    pub fn remove(&mut self) -> Result<(K, V)> {
        self.inner.remove().map(Entry::into_pair)
    }

    /// The value of the entry last returned by `next`, unless it was
    /// removed.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.inner.current_mut().map(|e| &mut e.value)
    }
}

/// A removal-safe cursor over the keys of an [`OrderedMap`].
///
/// This `struct` is created by the [`key_cursor`] method on [`OrderedMap`].
///
/// [`key_cursor`]: OrderedMap::key_cursor
pub struct KeyCursor<'a, K, V> {
    inner: Cursor<'a, Entry<K, V>, KeyOrder<K>>,
}

impl<'a, K, V> KeyCursor<'a, K, V> {
    pub(crate) fn new(inner: Cursor<'a, Entry<K, V>, KeyOrder<K>>) -> Self {
        KeyCursor { inner }
    }

    pub fn has_next(&mut self) -> bool {
        self.inner.has_next()
    }

    pub fn next(&mut self) -> Result<&K> {
        self.inner.next().map(|e| &e.key)
    }

    /// Removes the entry whose key was last returned by `next`.
    pub fn remove(&mut self) -> Result<K> {
        self.inner.remove().map(|e| e.key)
    }
}

/// A removal-safe cursor over the values of an [`OrderedMap`].
///
/// This `struct` is created by the [`value_cursor`] method on
/// [`OrderedMap`].
///
/// [`value_cursor`]: OrderedMap::value_cursor
pub struct ValueCursor<'a, K, V> {
    inner: Cursor<'a, Entry<K, V>, KeyOrder<K>>,
}

impl<'a, K, V> ValueCursor<'a, K, V> {
    pub(crate) fn new(inner: Cursor<'a, Entry<K, V>, KeyOrder<K>>) -> Self {
        ValueCursor { inner }
    }

    pub fn has_next(&mut self) -> bool {
        self.inner.has_next()
    }

    pub fn next(&mut self) -> Result<&V> {
        self.inner.next().map(|e| &e.value)
    }

    pub fn next_mut(&mut self) -> Result<&mut V> {
        self.inner.advance()?;
        self.inner
            .current_mut()
            .map(|e| &mut e.value)
            .ok_or(crate::Error::NotFound)
    }

    /// Removes the entry whose value was last returned by `next`.
    pub fn remove(&mut self) -> Result<V> {
        self.inner.remove().map(|e| e.value)
    }
}
