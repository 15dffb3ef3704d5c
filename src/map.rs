use std::{any, cmp::Ordering, fmt::Debug, ops::Index};

use compare::Compare;
use log::debug;

use crate::{
    EntryCursor, Error, KeyCursor, Keys, NaturalOrder, OrderedMap, Result, Tree, ValueCursor,
    Values, iter::map::Iter,
};

/// A stored key-value pair. Only the key takes part in ordering.
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> Entry<K, V> {
    fn new(key: K, value: V) -> Self {
        Entry { key, value }
    }

    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// The key ordering of a map, as configured at construction or resolved on
/// first insertion.
pub(crate) enum KeyOrder<K> {
    /// Holds the key type's registry lookup, run on first insertion.
    Unresolved(fn() -> Option<fn(&K, &K) -> Ordering>),
    Natural(fn(&K, &K) -> Ordering),
    Custom(Box<dyn Fn(&K, &K) -> Ordering>),
}

impl<K> KeyOrder<K> {
    fn keys(&self, l: &K, r: &K) -> Ordering {
        match self {
            KeyOrder::Natural(cmp) => cmp(l, r),
            KeyOrder::Custom(cmp) => cmp(l, r),
            // Entries only exist once the ordering is resolved, and an empty
            // tree never compares.
            KeyOrder::Unresolved(_) => unreachable!("key ordering used before resolution"),
        }
    }
}

impl<K, V> Compare<Entry<K, V>> for KeyOrder<K> {
    fn compare(&self, l: &Entry<K, V>, r: &Entry<K, V>) -> Ordering {
        self.keys(&l.key, &r.key)
    }
}

impl<K: NaturalOrder, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Debug, V: Debug> Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Index<&K> for OrderedMap<K, V> {
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `OrderedMap`.
    #[inline]
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: NaturalOrder, V> OrderedMap<K, V> {
    /// A map whose ordering is inferred from the key type on first
    /// insertion; see [`NaturalOrder`].
    pub fn new() -> Self {
        OrderedMap {
            tree: Tree::with_comparator(KeyOrder::Unresolved(K::natural_order)),
        }
    }
}

impl<K, V> OrderedMap<K, V> {
    /// A map ordered by `cmp`, which must be a total order over keys. The
    /// key type needs no [`NaturalOrder`] impl.
    ///
    /// ```
    /// use noirmap::OrderedMap;
    ///
    /// let mut map = OrderedMap::with_comparator(|l: &u8, r: &u8| r.cmp(l));
    /// map.put(1, "a").unwrap();
    /// map.put(2, "b").unwrap();
    /// assert_eq!(Some(&2), map.first_key());
    /// ```
    pub fn with_comparator<C>(cmp: C) -> Self
    where
        C: Compare<K> + 'static,
        K: 'static,
    {
        OrderedMap {
            tree: Tree::with_comparator(KeyOrder::Custom(Box::new(move |l: &K, r: &K| {
                cmp.compare(l, r)
            }))),
        }
    }

    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Removes every entry. The ordering stays configured.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|n| {
            let entry = &unsafe { n.as_ref() }.payload;
            (&entry.key, &entry.value)
        })
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.find(key)
            .map(|mut n| &mut unsafe { n.as_mut() }.payload.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Whether some entry holds a value equal to `value`. Linear time.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.tree.traverse_and_test(|entry| entry.value == *value)
    }

    /// Removes the entry for `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let node = self.find(key);
        self.tree.remove_node(node).map(|entry| entry.value)
    }

    pub fn first_key(&self) -> Option<&K> {
        self.tree.first().map(|entry| &entry.key)
    }

    pub fn last_key(&self) -> Option<&K> {
        self.tree.last().map(|entry| &entry.key)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|entry| (&entry.key, &entry.value))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|entry| (&entry.key, &entry.value))
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree.pop_first().map(Entry::into_pair)
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree.pop_last().map(Entry::into_pair)
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.tree.iter())
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// A cursor over the entries that can remove the entry it last
    /// returned.
    ///
    /// ```
    /// use noirmap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// for k in [3, 1, 2] {
    ///     map.put(k, k * 10).unwrap();
    /// }
    /// let mut cursor = map.entry_cursor();
    /// let mut seen = Vec::new();
    /// while cursor.has_next() {
    ///     seen.push(*cursor.next().unwrap().0);
    ///     cursor.remove().unwrap();
    /// }
    /// assert_eq!(seen, [1, 2, 3]);
    /// assert!(map.is_empty());
    /// ```
    pub fn entry_cursor(&mut self) -> EntryCursor<'_, K, V> {
        EntryCursor::new(self.tree.cursor())
    }

    /// Like [`OrderedMap::entry_cursor`], yielding keys.
    pub fn key_cursor(&mut self) -> KeyCursor<'_, K, V> {
        KeyCursor::new(self.tree.cursor())
    }

    /// Like [`OrderedMap::entry_cursor`], yielding values.
    pub fn value_cursor(&mut self) -> ValueCursor<'_, K, V> {
        ValueCursor::new(self.tree.cursor())
    }

    fn find(&self, key: &K) -> crate::NodePtr<Entry<K, V>> {
        let order = self.tree.comparator();
        self.tree.find_with(|entry| order.keys(key, &entry.key))
    }

    /// Associates `value` with `key`, returning the value it replaced.
    ///
    /// On a map built with [`OrderedMap::new`], the first call resolves the
    /// key ordering and fails if `K` registers none. Maps built with
    /// [`OrderedMap::with_comparator`] never fail.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.resolve_order()?;
        Ok(self
            .tree
            .insert(Entry::new(key, value))
            .map(|entry| entry.value))
    }

    /// Recomputes the value for `key` from its current value, if any.
    ///
    /// `f` returning `None` removes the entry (or leaves it absent);
    /// returning `Some` inserts or replaces it. Returns the value now
    /// stored.
    ///
    /// ```
    /// use noirmap::OrderedMap;
    ///
    /// let mut counts = OrderedMap::new();
    /// for word in ["a", "b", "a"] {
    ///     counts.compute(word, |_, n| Some(n.unwrap_or(0) + 1)).unwrap();
    /// }
    /// assert_eq!(Some(&2), counts.get(&"a"));
    /// ```
    pub fn compute<F>(&mut self, key: K, f: F) -> Result<Option<&V>>
    where
        F: FnOnce(&K, Option<V>) -> Option<V>,
    {
        let node = self.find(&key);
        let old = self.tree.remove_node(node).map(|entry| entry.value);
        let Some(value) = f(&key, old) else {
            return Ok(None);
        };
        // An unresolved map is empty: this can only fail when there was no
        // old entry to lose.
        self.resolve_order()?;
        let (node, _) = self.tree.insert_node(Entry::new(key, value));
        Ok(Some(&unsafe { node.as_ref() }.payload.value))
    }

    fn resolve_order(&mut self) -> Result<()> {
        if let KeyOrder::Unresolved(natural_order) = self.tree.cmp {
            let cmp = natural_order()
                .ok_or_else(|| Error::UnconfiguredOrdering(any::type_name::<K>()))?;
            debug!("resolved natural ordering for {}", any::type_name::<K>());
            // Unresolved maps are empty, so no stored entry changes order.
            self.tree.cmp = KeyOrder::Natural(cmp);
        }
        Ok(())
    }
}
