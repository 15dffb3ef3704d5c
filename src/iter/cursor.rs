use std::ptr::NonNull;

use crate::{Error, Node, NodePtr, Result, Tree};

enum Position<T> {
    /// Before the first payload.
    Start,
    /// On the payload last returned by `next`.
    At(NonNull<Node<T>>),
    /// The payload last returned was removed; holds the successor computed
    /// before the removal.
    Removed(NodePtr<T>),
}

/// An ascending cursor over a [`Tree`] that can remove the payload it last
/// returned without losing its place.
///
/// ```
/// use noirmap::Tree;
///
/// let mut tree: Tree<u32, _> = (0..10).collect();
/// let mut cursor = tree.cursor();
/// while cursor.has_next() {
///     if cursor.next().unwrap() % 3 != 0 {
///         cursor.remove().unwrap();
///     }
/// }
/// assert_eq!(vec![&0, &3, &6, &9], tree.iter().collect::<Vec<_>>());
/// ```
pub struct Cursor<'a, T, C> {
    tree: &'a mut Tree<T, C>,
    position: Position<T>,
    // The candidate found by the last `has_next`, consumed by `next`.
    peeked: Option<NodePtr<T>>,
}

impl<'a, T, C> Cursor<'a, T, C> {
    pub(crate) fn new(tree: &'a mut Tree<T, C>) -> Self {
        Cursor {
            tree,
            position: Position::Start,
            peeked: None,
        }
    }

    /// Whether `next` would return a payload.
    pub fn has_next(&mut self) -> bool {
        if let Some(candidate) = self.peeked {
            return candidate.is_some();
        }
        let candidate = match self.position {
            Position::Start => self.tree.root.first(),
            // SAFETY: the cursor's borrow keeps the node in the tree.
            Position::At(node) => unsafe { node.as_ref() }.next(),
            Position::Removed(next) => next,
        };
        self.peeked = Some(candidate);
        candidate.is_some()
    }

    /// Advances to the next payload and returns it.
    pub fn next(&mut self) -> Result<&T> {
        let node = self.advance()?;
        Ok(&unsafe { node.as_ref() }.payload)
    }

    /// Removes the payload last returned by `next`, and returns it.
    ///
    /// Fails with [`Error::InvalidState`] unless `next` was called since the
    /// last removal.
    pub fn remove(&mut self) -> Result<T> {
        let Position::At(node) = self.position else {
            return Err(Error::InvalidState);
        };
        // The successor must be captured before unlinking: rebalancing
        // moves payloads and links around the removed node.
        // SAFETY: node is still linked.
        let next = unsafe { node.as_ref() }.next();
        self.peeked = None;
        self.position = Position::Removed(next);
        self.tree.remove_node(Some(node)).ok_or(Error::InvalidState)
    }

    /// The payload last returned by `next`, unless it was removed.
    pub fn current(&self) -> Option<&T> {
        match self.position {
            Position::At(node) => Some(&unsafe { node.as_ref() }.payload),
            _ => None,
        }
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut T> {
        match self.position {
            Position::At(mut node) => Some(&mut unsafe { node.as_mut() }.payload),
            _ => None,
        }
    }

    pub(crate) fn advance(&mut self) -> Result<NonNull<Node<T>>> {
        if !self.has_next() {
            return Err(Error::NotFound);
        }
        match self.peeked.take().flatten() {
            Some(node) => {
                self.position = Position::At(node);
                Ok(node)
            }
            None => Err(Error::NotFound),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{Error, Tree, tree::test::assert_invariants};
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    #[test]
    fn empty_tree() {
        let mut tree = Tree::<u8, _>::new();
        let mut cursor = tree.cursor();
        assert_eq!(false, cursor.has_next());
        assert_eq!(Err(Error::NotFound), cursor.next());
        assert_eq!(Err(Error::InvalidState), cursor.remove());
    }

    #[test]
    fn next_without_has_next() {
        let mut tree: Tree<_, _> = [2, 1].into_iter().collect();
        let mut cursor = tree.cursor();
        assert_eq!(Ok(&1), cursor.next());
        assert_eq!(Ok(&2), cursor.next());
        assert_eq!(Err(Error::NotFound), cursor.next());
        assert_eq!(Err(Error::NotFound), cursor.next());
        assert_eq!(false, cursor.has_next());
    }

    #[test]
    fn has_next_is_idempotent() {
        let mut tree: Tree<_, _> = (0..3).collect();
        let mut cursor = tree.cursor();
        assert_eq!(true, cursor.has_next());
        assert_eq!(true, cursor.has_next());
        assert_eq!(Ok(&0), cursor.next());
        assert_eq!(Some(&0), cursor.current());
    }

    #[test]
    fn remove_requires_next() {
        let mut tree: Tree<_, _> = (0..3).collect();
        let mut cursor = tree.cursor();
        assert_eq!(Err(Error::InvalidState), cursor.remove());
        assert_eq!(Ok(&0), cursor.next());
        assert_eq!(Ok(0), cursor.remove());
        assert_eq!(None, cursor.current());
        assert_eq!(Err(Error::InvalidState), cursor.remove());
        assert_eq!(Ok(&1), cursor.next());
        assert_eq!(2, tree.len());
    }

    #[test]
    fn remove_after_has_next() {
        let mut tree: Tree<_, _> = (0..3).collect();
        let mut cursor = tree.cursor();
        assert_eq!(Ok(&0), cursor.next());
        assert_eq!(true, cursor.has_next());
        assert_eq!(Ok(0), cursor.remove());
        assert_eq!(Ok(&1), cursor.next());
    }

    #[test]
    fn drain_visits_each_once() {
        let mut tree: Tree<_, _> = (0..100).rev().collect();
        let mut seen = Vec::new();
        let mut cursor = tree.cursor();
        while cursor.has_next() {
            seen.push(*cursor.next().unwrap());
            cursor.remove().unwrap();
        }
        assert_eq!((0..100).collect::<Vec<_>>(), seen);
        assert_eq!(0, tree.len());
        assert!(tree.root().is_none());
    }

    #[test]
    fn remove_inner_nodes_keeps_order() {
        // Every odd key removed: most have two children when removed.
        let mut tree: Tree<_, _> = (0..64).collect();
        let mut cursor = tree.cursor();
        let mut kept = Vec::new();
        while cursor.has_next() {
            let k = *cursor.next().unwrap();
            if k % 2 == 1 {
                assert_eq!(Ok(k), cursor.remove());
            } else {
                kept.push(k);
            }
        }
        assert_invariants(&tree);
        assert_eq!(kept, tree.iter().copied().collect::<Vec<_>>());
    }

    #[quickcheck]
    fn qc_cursor_filter(keys: Vec<u16>, modulus: u8) -> bool {
        let modulus = u16::from(modulus.max(1));
        let mut tree: Tree<u16, _> = keys.iter().copied().collect();
        let mut expected: Vec<u16> = tree.iter().copied().collect();
        let mut visited = Vec::new();

        let mut cursor = tree.cursor();
        while cursor.has_next() {
            let k = *cursor.next().unwrap();
            visited.push(k);
            if k % modulus == 0 {
                cursor.remove().unwrap();
            }
        }

        let all_visited = visited == expected;
        expected.retain(|k| k % modulus != 0);
        assert_invariants(&tree);
        all_visited && tree.iter().copied().eq(expected)
    }
}
