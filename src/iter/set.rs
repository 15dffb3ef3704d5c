use compare::{Compare, Natural};

use crate::{IntoIter, Iter, OrderedSet, Tree};

impl<T: Ord> FromIterator<T> for OrderedSet<T, Natural<T>> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        OrderedSet {
            tree: Tree::from_iter(iter),
        }
    }
}

impl<T, C: Compare<T>> Extend<T> for OrderedSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

impl<'a, T, C> IntoIterator for &'a OrderedSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, C> IntoIterator for OrderedSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T, C>;

    fn into_iter(self) -> IntoIter<T, C> {
        self.tree.into_iter()
    }
}
