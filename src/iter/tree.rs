use std::{iter::FusedIterator, marker::PhantomData};

use compare::{Compare, Natural};

use crate::{NodePtr, Tree};

/// An iterator over the payloads of a [`Tree`], in ascending order.
pub struct Iter<'a, T> {
    first: NodePtr<T>,
    last: NodePtr<T>,
    len: usize,
    _phantom: PhantomData<&'a T>,
}

impl<T> Iter<'_, T> {
    pub(crate) fn new(first: NodePtr<T>, last: NodePtr<T>, len: usize) -> Self {
        Iter {
            first,
            last,
            len,
            _phantom: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        self.first.map(|n| {
            let n = unsafe { n.as_ref() };
            self.len -= 1;
            self.first = n.next();
            &n.payload
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        self.last.map(|n| {
            let n = unsafe { n.as_ref() };
            self.len -= 1;
            self.last = n.prev();
            &n.payload
        })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter::new(self.first, self.last, self.len)
    }
}

impl<'a, T, C> IntoIterator for &'a Tree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// An owning iterator over the payloads of a [`Tree`], in ascending order.
pub struct IntoIter<T, C>(Tree<T, C>);

impl<T, C> IntoIterator for Tree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T, C>;

    fn into_iter(self) -> IntoIter<T, C> {
        IntoIter(self)
    }
}

impl<T, C> Iterator for IntoIter<T, C> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }

    fn last(mut self) -> Option<T> {
        self.next_back()
    }
}

impl<T, C> DoubleEndedIterator for IntoIter<T, C> {
    fn next_back(&mut self) -> Option<T> {
        self.0.pop_last()
    }
}

impl<T, C> ExactSizeIterator for IntoIter<T, C> {
    fn len(&self) -> usize {
        self.0.len
    }
}

impl<T, C> FusedIterator for IntoIter<T, C> {}

impl<T, C: Compare<T>> Extend<T> for Tree<T, C> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(move |payload| {
            self.insert(payload);
        });
    }
}

impl<T: Ord> FromIterator<T> for Tree<T, Natural<T>> {
    /// Later payloads replace earlier equal ones.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Tree::new();
        tree.extend(iter);
        tree
    }
}
