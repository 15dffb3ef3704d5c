use std::{mem, ptr::NonNull};

use super::{Color, Node, NodePtr, NodePtrExt, Root};

impl<T> Default for Root<T> {
    fn default() -> Self {
        Root::new()
    }
}

// Navigation.
impl<T> Root<T> {
    pub(crate) const fn new() -> Self {
        Root { root: None }
    }

    #[inline(always)]
    pub(crate) fn node(&self) -> NodePtr<T> {
        self.root
    }

    pub(crate) fn first(&self) -> NodePtr<T> {
        let mut n = self.root?;
        while let Some(left) = unsafe { n.as_ref() }.left {
            n = left;
        }
        Some(n)
    }

    pub(crate) fn last(&self) -> NodePtr<T> {
        let mut n = self.root?;
        while let Some(right) = unsafe { n.as_ref() }.right {
            n = right;
        }
        Some(n)
    }

    /// Forgets every node. The caller reclaims them.
    pub(crate) fn take(&mut self) -> NodePtr<T> {
        self.root.take()
    }
}

// Insertion.
impl<T> Root<T> {
    /// Installs `node` as the root of an empty tree.
    pub(crate) fn set_root(&mut self, node: NonNull<Node<T>>) {
        let node = Some(node);
        node.set_color(Color::Black);
        node.set_parent(None);
        self.root = node;
    }

    /// Restores the red-black properties after `node` was linked as a red
    /// leaf.
    pub(crate) fn insert_color(&mut self, node: NonNull<Node<T>>) {
        let mut node: NodePtr<T> = Some(node);

        /*
         * Loop invariant: node is red. The only possible violation is a
         * red parent.
         */
        while node != self.root && node.parent().is_red() {
            let mut parent = node.parent();
            // A red parent is never the root, so gparent exists.
            let gparent = parent.parent();

            if parent == gparent.left() {
                let uncle = gparent.right();
                if uncle.is_red() {
                    /*
                     * Case 1 - uncle is red (color flips).
                     *
                     *       G            g
                     *      / \          / \
                     *     p   u  -->   P   U
                     *    /            /
                     *   n            n
                     *
                     * g's parent might be red: recurse at g.
                     */
                    parent.set_color(Color::Black);
                    uncle.set_color(Color::Black);
                    gparent.set_color(Color::Red);
                    node = gparent;
                    continue;
                }

                if node == parent.right() {
                    /*
                     * Case 2 - uncle is black and node is an inner child
                     * (left rotate at parent).
                     *
                     *      G             G
                     *     / \           / \
                     *    p   U  -->    n   U
                     *     \           /
                     *      n         p
                     */
                    node = parent;
                    self.rotate_left(node);
                    parent = node.parent();
                }

                /*
                 * Case 3 - uncle is black and node is an outer child
                 * (right rotate at gparent).
                 *
                 *        G           P
                 *       / \         / \
                 *      p   U  -->  n   g
                 *     /                 \
                 *    n                   U
                 */
                parent.set_color(Color::Black);
                gparent.set_color(Color::Red);
                self.rotate_right(gparent);
            } else {
                let uncle = gparent.left();
                if uncle.is_red() {
                    /* Case 1 - color flips */
                    parent.set_color(Color::Black);
                    uncle.set_color(Color::Black);
                    gparent.set_color(Color::Red);
                    node = gparent;
                    continue;
                }

                if node == parent.left() {
                    /* Case 2 - right rotate at parent */
                    node = parent;
                    self.rotate_right(node);
                    parent = node.parent();
                }

                /* Case 3 - left rotate at gparent */
                parent.set_color(Color::Black);
                gparent.set_color(Color::Red);
                self.rotate_left(gparent);
            }
        }

        self.root.set_color(Color::Black);
        self.root.set_parent(None);
    }
}

// Removal.
impl<T> Root<T> {
    /// Unlinks `node`'s payload from the tree and returns the node that was
    /// physically unlinked. That node carries the payload that `node` held
    /// on entry.
    ///
    /// A node with two children is never unlinked itself: its payload is
    /// swapped with its in-order predecessor, which has no right child,
    /// and the predecessor is unlinked instead.
    pub(crate) fn erase(&mut self, node: NonNull<Node<T>>) -> NonNull<Node<T>> {
        let mut victim = node;
        // SAFETY: node belongs to this tree.
        let (left, right) = {
            let node_ref = unsafe { node.as_ref() };
            (node_ref.left, node_ref.right)
        };
        if let (Some(left), Some(_)) = (left, right) {
            let mut predecessor = left;
            while let Some(next) = unsafe { predecessor.as_ref() }.right {
                predecessor = next;
            }
            // SAFETY: predecessor lives in node's left subtree, so the two
            // mutable borrows are disjoint.
            unsafe {
                mem::swap(
                    &mut (*node.as_ptr()).payload,
                    &mut (*predecessor.as_ptr()).payload,
                );
            }
            victim = predecessor;
        }

        let victim_ptr: NodePtr<T> = Some(victim);
        let child = victim_ptr.left().or(victim_ptr.right());
        let parent = victim_ptr.parent();
        let was_black = victim_ptr.is_black();

        if child.is_some() {
            /*
             * Case 1 - a single child takes victim's place.
             *
             *      (p)          (p)
             *       |            |
             *       V    -->     c
             *      /
             *     c
             */
            self.change_child(victim_ptr, child, parent);
            child.set_parent(parent);
            if was_black {
                self.erase_color(child);
            }
        } else if parent.is_none() {
            /* Case 2 - victim is a lone root. */
            self.root = None;
        } else {
            /*
             * Case 3 - victim is a leaf. A black leaf leaves a double-black
             * hole behind, fixed while victim still occupies it so the
             * sibling can be found.
             */
            if was_black {
                self.erase_color(victim_ptr);
            }
            let parent = victim_ptr.parent();
            self.change_child(victim_ptr, None, parent);
        }

        victim_ptr.set_left(None);
        victim_ptr.set_right(None);
        victim_ptr.set_parent(None);
        victim
    }

    /// Pushes the double-black defect at `node` up until it can be absorbed.
    fn erase_color(&mut self, mut node: NodePtr<T>) {
        /*
         * Loop invariants:
         * - node is black and not the root;
         * - every leaf path through node has one black node fewer than
         *   the other leaf paths.
         */
        while node != self.root && node.is_black() {
            let parent = node.parent();

            if node == parent.left() {
                let mut sibling = parent.right();
                if sibling.is_red() {
                    /*
                     * Case 1 - left rotate at parent
                     *
                     *     P               S
                     *    / \             / \
                     *   N   s    -->    p   Sr
                     *      / \         / \
                     *     Sl  Sr      N   Sl
                     */
                    sibling.set_color(Color::Black);
                    parent.set_color(Color::Red);
                    self.rotate_left(parent);
                    sibling = parent.right();
                }

                if sibling.left().is_black() && sibling.right().is_black() {
                    /*
                     * Case 2 - sibling color flip, recurse at parent
                     * (p could be either color here).
                     *
                     *    (p)           (p)
                     *    / \           / \
                     *   N   S    -->  N   s
                     *      / \           / \
                     *     Sl  Sr        Sl  Sr
                     */
                    sibling.set_color(Color::Red);
                    node = parent;
                    continue;
                }

                if sibling.right().is_black() {
                    /*
                     * Case 3 - right rotate at sibling
                     *
                     *   (p)           (p)
                     *   / \           / \
                     *  N   S    -->  N   Sl
                     *     / \             \
                     *    sl  Sr            s
                     *                       \
                     *                        Sr
                     */
                    sibling.left().set_color(Color::Black);
                    sibling.set_color(Color::Red);
                    self.rotate_right(sibling);
                    sibling = parent.right();
                }

                /*
                 * Case 4 - left rotate at parent + color flips
                 *
                 *      (p)             (s)
                 *      / \             / \
                 *     N   S     -->   P   Sr
                 *        / \         / \
                 *      (sl) sr      N  (sl)
                 */
                sibling.set_color(parent.color());
                parent.set_color(Color::Black);
                sibling.right().set_color(Color::Black);
                self.rotate_left(parent);
                node = self.root;
            } else {
                let mut sibling = parent.left();
                if sibling.is_red() {
                    /* Case 1 - right rotate at parent */
                    sibling.set_color(Color::Black);
                    parent.set_color(Color::Red);
                    self.rotate_right(parent);
                    sibling = parent.left();
                }

                if sibling.left().is_black() && sibling.right().is_black() {
                    /* Case 2 - sibling color flip */
                    sibling.set_color(Color::Red);
                    node = parent;
                    continue;
                }

                if sibling.left().is_black() {
                    /* Case 3 - left rotate at sibling */
                    sibling.right().set_color(Color::Black);
                    sibling.set_color(Color::Red);
                    self.rotate_left(sibling);
                    sibling = parent.left();
                }

                /* Case 4 - right rotate at parent + color flips */
                sibling.set_color(parent.color());
                parent.set_color(Color::Black);
                sibling.left().set_color(Color::Black);
                self.rotate_right(parent);
                node = self.root;
            }
        }

        node.set_color(Color::Black);
        self.root.set_parent(None);
    }
}

// Link surgery.
impl<T> Root<T> {
    fn change_child(&mut self, old: NodePtr<T>, new: NodePtr<T>, parent: NodePtr<T>) {
        if parent.is_some() {
            if parent.left() == old {
                parent.set_left(new);
            } else {
                parent.set_right(new);
            }
        } else {
            self.root = new;
        }
    }

    /// ```text
    ///     N              R
    ///    / \            / \
    ///   a   R   -->    N   c
    ///      / \        / \
    ///     b   c      a   b
    /// ```
    fn rotate_left(&mut self, node: NodePtr<T>) {
        let pivot = node.right();
        if pivot.is_none() {
            return;
        }
        let inner = pivot.left();
        node.set_right(inner);
        inner.set_parent(node);

        let parent = node.parent();
        pivot.set_parent(parent);
        self.change_child(node, pivot, parent);

        pivot.set_left(node);
        node.set_parent(pivot);
    }

    fn rotate_right(&mut self, node: NodePtr<T>) {
        let pivot = node.left();
        if pivot.is_none() {
            return;
        }
        let inner = pivot.right();
        node.set_left(inner);
        inner.set_parent(node);

        let parent = node.parent();
        pivot.set_parent(parent);
        self.change_child(node, pivot, parent);

        pivot.set_right(node);
        node.set_parent(pivot);
    }
}
