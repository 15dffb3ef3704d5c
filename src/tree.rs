use std::{cmp::Ordering::*, fmt::Debug, marker::PhantomData, mem, ptr::NonNull};

use compare::{Compare, Natural};
use log::trace;

use crate::{
    ComingFrom, Cursor, Iter, Node, NodePtr, Root, Tree,
    alloc::{leak_alloc_node, own_back},
};

impl<T: Ord> Tree<T, Natural<T>> {
    /// A tree ordered by `T`'s [`Ord`] implementation.
    pub fn new() -> Self {
        Self::with_comparator(compare::natural())
    }
}

impl<T: Ord> Default for Tree<T, Natural<T>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Drop for Tree<T, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Debug, C> Debug for Tree<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> Tree<T, C> {
    pub const fn with_comparator(cmp: C) -> Self {
        Tree {
            root: Root::new(),
            cmp,
            len: 0,
            _marker: PhantomData,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root node, for inspecting the shape of the tree.
    pub fn root(&self) -> Option<&Node<T>> {
        // SAFETY: every reachable node is owned by self.
        self.root.node().map(|n| unsafe { n.as_ref() })
    }

    pub fn first(&self) -> Option<&T> {
        self.root.first().map(|n| &unsafe { n.as_ref() }.payload)
    }

    pub fn last(&self) -> Option<&T> {
        self.root.last().map(|n| &unsafe { n.as_ref() }.payload)
    }

    /// Calls `f` on every payload in ascending order.
    pub fn traverse_and_consume<F>(&self, f: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(f);
    }

    /// Whether any payload satisfies `predicate`, visiting payloads in
    /// ascending order and stopping at the first match.
    pub fn traverse_and_test<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().any(predicate)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.first(), self.root.last(), self.len)
    }

    /// A cursor positioned before the first payload. Unlike [`Tree::iter`]
    /// it can remove the payload it last returned.
    pub fn cursor(&mut self) -> Cursor<'_, T, C> {
        Cursor::new(self)
    }

    pub fn pop_first(&mut self) -> Option<T> {
        let first = self.root.first();
        self.remove_node(first)
    }

    pub fn pop_last(&mut self) -> Option<T> {
        let last = self.root.last();
        self.remove_node(last)
    }

    /// Drops every payload. Runs in linear time without recursion.
    pub fn clear(&mut self) {
        let mut next = self.root.take();
        while let Some(current) = next {
            let current_ref = unsafe { current.as_ref() };
            if current_ref.left.is_some() {
                next = current_ref.left;
                continue;
            }
            if current_ref.right.is_some() {
                next = current_ref.right;
                continue;
            }
            next = current_ref.parent_ptr();
            // Detach the leaf; don't call erase => no rebalancing needed.
            if let Some(mut parent) = next {
                let parent = unsafe { parent.as_mut() };
                if parent.left == Some(current) {
                    parent.left = None;
                } else {
                    parent.right = None;
                }
            }
            // SAFETY: current is a detached leaf allocated by insert.
            drop(unsafe { own_back(current) });
        }
        self.len = 0;
    }

    /// Binary search driven by `f`, which orders the probe against a
    /// stored payload.
    pub(crate) fn find_with<F>(&self, mut f: F) -> NodePtr<T>
    where
        F: FnMut(&T) -> std::cmp::Ordering,
    {
        let mut node = self.root.node();
        while let Some(candidate) = node {
            let candidate = unsafe { candidate.as_ref() };
            match f(&candidate.payload) {
                Equal => break,
                Greater => node = candidate.right,
                Less => node = candidate.left,
            }
        }
        node
    }

    /// Unlinks `node` and hands its payload back. `None` is a no-op.
    pub(crate) fn remove_node(&mut self, node: NodePtr<T>) -> Option<T> {
        let victim = self.root.erase(node?);
        self.len -= 1;
        trace!("unlinked node, {} left", self.len);
        // SAFETY: erase fully detached victim from the tree.
        Some(unsafe { own_back(victim) }.payload)
    }
}

impl<T, C: Compare<T>> Tree<T, C> {
    pub fn find(&self, probe: &T) -> Option<&T> {
        self.find_node(probe)
            .map(|n| &unsafe { n.as_ref() }.payload)
    }

    pub fn contains(&self, probe: &T) -> bool {
        self.find_node(probe).is_some()
    }

    /// Inserts `payload`, replacing and returning an equal payload if one
    /// is already stored.
    pub fn insert(&mut self, payload: T) -> Option<T> {
        self.insert_node(payload).1
    }

    pub fn remove(&mut self, probe: &T) -> Option<T> {
        let node = self.find_node(probe);
        self.remove_node(node)
    }

    /// The largest stored payload strictly before the one equal to `probe`.
    /// `None` if `probe` isn't stored or is the first.
    pub fn predecessor(&self, probe: &T) -> Option<&T> {
        let node = self.find_node(probe)?;
        unsafe { node.as_ref() }
            .prev()
            .map(|n| &unsafe { n.as_ref() }.payload)
    }

    /// The smallest stored payload strictly after the one equal to `probe`.
    /// `None` if `probe` isn't stored or is the last.
    pub fn successor(&self, probe: &T) -> Option<&T> {
        let node = self.find_node(probe)?;
        unsafe { node.as_ref() }
            .next()
            .map(|n| &unsafe { n.as_ref() }.payload)
    }

    pub(crate) fn find_node(&self, probe: &T) -> NodePtr<T> {
        self.find_with(|payload| self.cmp.compare(probe, payload))
    }

    /// Returns the node now holding `payload`, and the payload it replaced
    /// if an equal one was stored.
    pub(crate) fn insert_node(&mut self, payload: T) -> (NonNull<Node<T>>, Option<T>) {
        let Some(mut candidate) = self.root.node() else {
            let node = leak_alloc_node(payload);
            self.root.set_root(node);
            self.len = 1;
            trace!("attached root");
            return (node, None);
        };

        let direction = loop {
            let candidate_ref = unsafe { candidate.as_mut() };
            let (direction, next) = match self.cmp.compare(&payload, &candidate_ref.payload) {
                Equal => {
                    let old = mem::replace(&mut candidate_ref.payload, payload);
                    return (candidate, Some(old));
                }
                Greater => (ComingFrom::Right, candidate_ref.right),
                Less => (ComingFrom::Left, candidate_ref.left),
            };
            match next {
                Some(next) => candidate = next,
                None => break direction,
            }
        };

        let node = leak_alloc_node(payload);
        // SAFETY: node is fresh, and the direction slot of candidate is
        // empty by the loop above.
        unsafe { Node::link(node, candidate, direction) };
        self.root.insert_color(node);
        self.len += 1;
        trace!("attached node, {} total", self.len);
        (node, None)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::Color;

    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;
    use rand::{Rng, SeedableRng, seq::SliceRandom};
    use rand_chacha::ChaCha8Rng;

    /// Checks every structural invariant, panicking on the first violation.
    pub(crate) fn assert_invariants<T, C: Compare<T>>(tree: &Tree<T, C>) {
        fn check<T, C: Compare<T>>(node: &Node<T>, cmp: &C, count: &mut usize) -> usize {
            *count += 1;
            let mut heights = [1usize; 2];
            for (i, child) in [node.left(), node.right()].into_iter().enumerate() {
                if let Some(child) = child {
                    assert!(
                        std::ptr::eq(child.parent().unwrap(), node),
                        "parent link is not the inverse of a child link"
                    );
                    assert!(
                        !(node.is_red() && child.is_red()),
                        "red node has a red child"
                    );
                    let expected = if i == 0 { Greater } else { Less };
                    assert_eq!(expected, cmp.compare(&node.payload, &child.payload));
                    heights[i] = check(child, cmp, count);
                }
            }
            assert_eq!(heights[0], heights[1], "black height mismatch");
            heights[0] + usize::from(node.is_black())
        }

        let Some(root) = tree.root() else {
            assert_eq!(0, tree.len());
            return;
        };
        assert_eq!(Color::Black, root.color());
        assert!(root.parent().is_none());
        let mut count = 0;
        check(root, &tree.cmp, &mut count);
        assert_eq!(count, tree.len());
        // Transitivity covers the rest of the order; check neighbours too.
        let payloads: Vec<_> = tree.iter().collect();
        for pair in payloads.windows(2) {
            assert_eq!(Less, tree.cmp.compare(pair[0], pair[1]));
        }
    }

    fn key(node: Option<&Node<i32>>) -> (i32, Color) {
        let node = node.unwrap();
        (node.payload, node.color())
    }

    #[test]
    fn tree_ctor_works() {
        let tree = Tree::<usize, _>::new();
        assert_eq!(None, tree.first());
        assert_eq!(false, tree.contains(&42));
        assert_eq!(true, tree.is_empty());
    }

    #[test]
    fn ascending_inserts_produce_known_shape() {
        let mut tree = Tree::new();
        for k in (100..=180).step_by(10) {
            assert_eq!(None, tree.insert(k));
        }
        assert_invariants(&tree);

        let root = tree.root();
        assert_eq!((130, Color::Black), key(root));
        let left = root.and_then(Node::left);
        let right = root.and_then(Node::right);
        assert_eq!((110, Color::Red), key(left));
        assert_eq!((100, Color::Black), key(left.and_then(Node::left)));
        assert_eq!((120, Color::Black), key(left.and_then(Node::right)));
        assert_eq!((150, Color::Red), key(right));
        assert_eq!((140, Color::Black), key(right.and_then(Node::left)));
        let inner = right.and_then(Node::right);
        assert_eq!((170, Color::Black), key(inner));
        assert_eq!((160, Color::Red), key(inner.and_then(Node::left)));
        assert_eq!((180, Color::Red), key(inner.and_then(Node::right)));

        assert_eq!(Some(&100), tree.first());
        assert_eq!(Some(&180), tree.last());
    }

    #[test]
    fn contains_many() {
        let mut tree = Tree::new();
        assert_eq!(None, tree.insert(42));
        assert_eq!(None, tree.insert(0));
        assert_eq!(None, tree.insert(100));
        assert_eq!(3, tree.len());

        assert_eq!(true, tree.contains(&42));
        assert_eq!(true, tree.contains(&0));
        assert_eq!(true, tree.contains(&100));
        assert_eq!(false, tree.contains(&1));
        assert_eq!(false, tree.contains(&1000));
    }

    #[test]
    fn insert_same_key_replaces() {
        let mut tree = Tree::with_comparator(|l: &(u8, char), r: &(u8, char)| l.0.cmp(&r.0));
        assert_eq!(None, tree.insert((42, 'a')));
        assert_eq!(Some((42, 'a')), tree.insert((42, 'b')));
        assert_eq!(1, tree.len());
        assert_eq!(Some(&(42, 'b')), tree.find(&(42, 'z')));
    }

    #[test]
    fn remove_all_shapes() {
        let mut tree: Tree<i32, _> = (0..32).collect();
        for k in [31, 30, 15, 7, 0] {
            assert_eq!(Some(k), tree.remove(&k));
            assert_eq!(None, tree.remove(&k));
            assert_invariants(&tree);
        }
        while let Some(root) = tree.root().map(|n| n.payload) {
            assert_eq!(Some(root), tree.remove(&root));
            assert_invariants(&tree);
        }
        assert_eq!(0, tree.len());
    }

    #[test]
    fn remove_node_none_is_noop() {
        let mut tree: Tree<i32, _> = (0..4).collect();
        assert_eq!(None, tree.remove_node(None));
        assert_eq!(4, tree.len());
    }

    #[test]
    fn pop_first_and_last() {
        let mut tree = Tree::new();
        assert_eq!(None, tree.pop_first());
        assert_eq!(None, tree.pop_last());

        tree.extend([42, 0, 100]);
        assert_eq!(Some(0), tree.pop_first());
        assert_eq!(Some(100), tree.pop_last());
        assert_eq!(Some(42), tree.pop_first());
        assert_eq!(None, tree.pop_first());
        assert_eq!(0, tree.len());
    }

    #[test]
    fn navigation() {
        let tree: Tree<i32, _> = [50, 10, 40, 20, 30].into_iter().collect();
        assert_eq!(None, tree.predecessor(&10));
        assert_eq!(Some(&10), tree.predecessor(&20));
        assert_eq!(Some(&40), tree.successor(&30));
        assert_eq!(None, tree.successor(&50));
        assert_eq!(None, tree.successor(&35));
    }

    #[test]
    fn traversals() {
        let tree: Tree<i32, _> = [3, 1, 2].into_iter().collect();
        let mut seen = Vec::new();
        tree.traverse_and_consume(|k| seen.push(*k));
        assert_eq!(vec![1, 2, 3], seen);

        let mut visited = 0;
        assert_eq!(
            true,
            tree.traverse_and_test(|k| {
                visited += 1;
                *k == 2
            })
        );
        assert_eq!(2, visited);
        assert_eq!(false, tree.traverse_and_test(|k| *k > 3));
    }

    #[test]
    fn reversed_comparator() {
        let mut tree = Tree::with_comparator(|l: &i32, r: &i32| r.cmp(l));
        tree.extend([1, 3, 2]);
        assert_eq!(vec![&3, &2, &1], tree.iter().collect::<Vec<_>>());
        assert_invariants(&tree);
    }

    #[test]
    fn clear_then_reuse() {
        let mut tree: Tree<String, _> = (0..64).map(|i| format!("{i:02}")).collect();
        tree.clear();
        assert_eq!(0, tree.len());
        assert!(tree.root().is_none());
        tree.insert("again".to_string());
        assert_eq!(Some(&"again".to_string()), tree.first());
    }

    #[test]
    fn seeded_random_workload() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        let mut keys: Vec<u32> = (0..512).collect();
        keys.shuffle(&mut rng);

        let mut tree = Tree::new();
        for k in &keys {
            tree.insert(*k);
        }
        assert_invariants(&tree);

        keys.shuffle(&mut rng);
        for (i, k) in keys.iter().enumerate() {
            if rng.random_bool(0.5) {
                assert_eq!(Some(*k), tree.remove(k));
            } else {
                tree.insert(*k);
            }
            if i % 64 == 0 {
                assert_invariants(&tree);
            }
        }
        assert_invariants(&tree);
    }

    #[quickcheck]
    fn qc_insert_remove_keeps_invariants(ops: Vec<(bool, u8)>) -> bool {
        let mut tree = Tree::new();
        let mut model = std::collections::BTreeSet::new();
        for (insert, k) in ops {
            if insert {
                assert_eq!(model.insert(k), tree.insert(k).is_none());
            } else {
                assert_eq!(model.remove(&k), tree.remove(&k).is_some());
            }
            assert_invariants(&tree);
        }
        tree.iter().eq(model.iter())
    }

    #[quickcheck]
    fn qc_predecessor_successor_duality(keys: Vec<i16>) -> bool {
        let tree: Tree<i16, _> = keys.into_iter().collect();
        tree.iter().all(|k| {
            let back = tree.predecessor(k).map_or(true, |p| tree.successor(p) == Some(k));
            let forth = tree.successor(k).map_or(true, |s| tree.predecessor(s) == Some(k));
            back && forth
        })
    }
}
