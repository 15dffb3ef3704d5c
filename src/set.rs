use std::fmt::Debug;

use compare::{Compare, Natural};

use crate::{Cursor, Iter, OrderedSet, Tree};

impl<T: Ord> OrderedSet<T, Natural<T>> {
    pub fn new() -> Self {
        Self { tree: Tree::new() }
    }
}

impl<T: Ord> Default for OrderedSet<T, Natural<T>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug, C> Debug for OrderedSet<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> OrderedSet<T, C> {
    pub const fn with_comparator(cmp: C) -> Self {
        Self {
            tree: Tree::with_comparator(cmp),
        }
    }

    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    pub fn pop_first(&mut self) -> Option<T> {
        self.tree.pop_first()
    }

    pub fn pop_last(&mut self) -> Option<T> {
        self.tree.pop_last()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.tree.iter()
    }

    /// A cursor that can drop elements while walking the set in order.
    pub fn cursor(&mut self) -> Cursor<'_, T, C> {
        self.tree.cursor()
    }
}

impl<T, C: Compare<T>> OrderedSet<T, C> {
    /// Adds `value` and returns whether it was absent.
    ///
    /// An equal element already present is replaced by `value`.
    pub fn insert(&mut self, value: T) -> bool {
        self.tree.insert(value).is_none()
    }

    pub fn remove(&mut self, value: &T) -> bool {
        self.tree.remove(value).is_some()
    }

    /// Removes and returns the element equal to `value`, if any.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.tree.remove(value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    pub fn get(&self, value: &T) -> Option<&T> {
        self.tree.find(value)
    }
}
