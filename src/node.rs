use std::{
    fmt::Debug,
    ptr::{self, NonNull},
};

use super::{Color, ComingFrom, Node, NodePtr};

// Public API.
impl<T> Node<T> {
    pub(crate) fn new(payload: T) -> Self {
        Node {
            parent_color: ptr::null_mut(),
            right: None,
            left: None,
            payload,
        }
    }

    #[inline(always)]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    #[inline(always)]
    pub fn is_black(&self) -> bool {
        self.color() == Color::Black
    }

    #[inline(always)]
    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    #[inline(always)]
    pub fn color(&self) -> Color {
        Color::from(self.parent_color.addr() & 1)
    }

    pub fn left(&self) -> Option<&Node<T>> {
        // SAFETY: children are owned by the same tree as self.
        self.left.map(|n| unsafe { n.as_ref() })
    }

    pub fn right(&self) -> Option<&Node<T>> {
        // SAFETY: children are owned by the same tree as self.
        self.right.map(|n| unsafe { n.as_ref() })
    }

    pub fn parent(&self) -> Option<&Node<T>> {
        // SAFETY: the parent is owned by the same tree as self.
        self.parent_ptr().map(|n| unsafe { n.as_ref() })
    }

    /// The in-order successor of this node.
    pub fn successor(&self) -> Option<&Node<T>> {
        // SAFETY: same tree as self.
        self.next().map(|n| unsafe { n.as_ref() })
    }

    /// The in-order predecessor of this node.
    pub fn predecessor(&self) -> Option<&Node<T>> {
        // SAFETY: same tree as self.
        self.prev().map(|n| unsafe { n.as_ref() })
    }
}

// Crate API.
impl<T> Node<T> {
    #[inline(always)]
    pub(crate) fn parent_ptr(&self) -> NodePtr<T> {
        NonNull::new(self.parent_color.map_addr(|p| p & !1))
    }

    #[inline(always)]
    pub(crate) fn set_parent(&mut self, parent: NodePtr<T>) {
        self.set_parent_and_color(parent, self.color());
    }

    #[inline(always)]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.set_parent_and_color(self.parent_ptr(), color);
    }

    #[inline(always)]
    pub(crate) fn set_parent_and_color(&mut self, parent: NodePtr<T>, color: Color) {
        self.parent_color = parent
            .map_or(ptr::null_mut(), NonNull::as_ptr)
            .map_addr(|p| p | usize::from(color));
    }

    /// Hangs a fresh red leaf under `parent`.
    ///
    /// # Safety
    ///
    /// `node` and `parent` must be valid, distinct, and the `direction`
    /// slot of `parent` must be empty.
    #[inline(always)]
    pub(crate) unsafe fn link(
        mut node: NonNull<Node<T>>,
        mut parent: NonNull<Node<T>>,
        direction: ComingFrom,
    ) {
        // SAFETY: delegated to the caller. The two &mut never alias.
        let node_ref = unsafe { node.as_mut() };
        node_ref.set_parent_and_color(Some(parent), Color::Red);
        node_ref.left = None;
        node_ref.right = None;
        let parent = unsafe { parent.as_mut() };
        match direction {
            ComingFrom::Left => parent.left = Some(node),
            ComingFrom::Right => parent.right = Some(node),
        };
    }

    #[inline(always)]
    pub(crate) fn next(&self) -> NodePtr<T> {
        // If we have a right-hand child, go down and then left as far as we
        // can.
        if let Some(mut current) = self.right {
            // SAFETY: by if guard, current is valid.
            while let Some(left) = unsafe { current.as_ref() }.left {
                current = left;
            }
            return Some(current);
        }
        // No right-hand children. Everything down and left is smaller than us,
        // so any 'next' node must be in the general direction of our parent.
        //
        // [1] Go up the tree
        //     [2] any time the ancestor is a right-hand child of its parent,
        //         keep going up.
        //     [3] First time it's a left-hand child of its parent, [4] said
        //         parent is our 'next' node.
        let mut node_ref = self;
        loop {
            let parent = node_ref.parent_ptr()?;
            // SAFETY: parent links always point into the same tree.
            let parent_ref = unsafe { parent.as_ref() };
            if parent_ref.right != Some(NonNull::from(node_ref)) {
                // [3] left-hand child, [4] said parent is our 'next' node.
                return Some(parent);
            }
            // [2] right-hand child, keep going up.
            node_ref = parent_ref;
        }
    }

    #[inline(always)]
    pub(crate) fn prev(&self) -> NodePtr<T> {
        // Mirror of next: down-left then right as far as we can.
        if let Some(mut current) = self.left {
            // SAFETY: by if guard, current is valid.
            while let Some(right) = unsafe { current.as_ref() }.right {
                current = right;
            }
            return Some(current);
        }

        let mut node_ref = self;
        loop {
            let parent = node_ref.parent_ptr()?;
            // SAFETY: parent links always point into the same tree.
            let parent_ref = unsafe { parent.as_ref() };
            if parent_ref.left != Some(NonNull::from(node_ref)) {
                return Some(parent);
            }
            node_ref = parent_ref;
        }
    }
}

impl<T> Debug for Node<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}::({:?})", self.color(), self.payload))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    // Links parent to child(ren) by hand; colors are irrelevant here.
    macro_rules! link {
        ($parent:expr, $child:expr, left) => {
            $parent.left = NonNull::new($child as *mut _);
            $child.set_parent(NonNull::new($parent as *mut _));
        };
        ($parent:expr, $child:expr, right) => {
            $parent.right = NonNull::new($child as *mut _);
            $child.set_parent(NonNull::new($parent as *mut _));
        };
        ($parent:expr, $left:expr, $right:expr) => {
            link!($parent, $left, left);
            link!($parent, $right, right);
        };
    }

    fn walk<T: Copy>(node: &Node<T>, forward: bool) -> Vec<T> {
        let mut out = Vec::new();
        let mut current = if forward { node.successor() } else { node.predecessor() };
        while let Some(n) = current {
            out.push(n.payload);
            current = if forward { n.successor() } else { n.predecessor() };
        }
        out
    }

    #[test]
    fn fresh_node_is_red_and_detached() {
        let node = Node::new(1);
        assert_eq!(Color::Red, node.color());
        assert!(node.parent().is_none());
        assert!(node.successor().is_none());
        assert!(node.predecessor().is_none());
    }

    #[test]
    fn color_survives_reparenting() {
        let mut parent = Node::new(2);
        let mut child = Node::new(1);
        child.set_color(Color::Black);
        link!(&mut parent, &mut child, left);
        assert_eq!(Color::Black, child.color());
        assert_eq!(Some(&2), child.parent().map(Node::payload));

        child.set_color(Color::Red);
        assert_eq!(Some(&2), child.parent().map(Node::payload));
        child.set_parent(None);
        assert_eq!(Color::Red, child.color());
        assert!(child.parent().is_none());
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn successor_and_predecessor_walk_in_order() {
        let mut n7 = Node::new(7);
        let mut n3 = Node::new(3);
        let mut n10 = Node::new(10);
        let mut n1 = Node::new(1);
        let mut n5 = Node::new(5);
        let mut n12 = Node::new(12);

        link!(&mut n10, &mut n12, right);
        link!(&mut n3, &mut n1, &mut n5);
        link!(&mut n7, &mut n3, &mut n10);

        assert_eq!(vec![3, 5, 7, 10, 12], walk(&n1, true));
        assert_eq!(vec![7, 10, 12], walk(&n5, true));
        assert_eq!(vec![10, 12], walk(&n7, true));
        assert_eq!(Vec::<i32>::new(), walk(&n12, true));

        assert_eq!(vec![10, 7, 5, 3, 1], walk(&n12, false));
        assert_eq!(vec![5, 3, 1], walk(&n7, false));
        assert_eq!(vec![3, 1], walk(&n5, false));
        assert_eq!(Vec::<i32>::new(), walk(&n1, false));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn successor_of_predecessor_is_self() {
        let mut n7 = Node::new(7);
        let mut n3 = Node::new(3);
        let mut n10 = Node::new(10);
        let mut n1 = Node::new(1);
        let mut n5 = Node::new(5);

        link!(&mut n3, &mut n1, &mut n5);
        link!(&mut n7, &mut n3, &mut n10);

        for node in [&n3, &n5, &n7] {
            let back = node.predecessor().and_then(Node::successor);
            assert_eq!(Some(node.payload), back.map(|n| n.payload));
            let forth = node.successor().and_then(Node::predecessor);
            assert_eq!(Some(node.payload), forth.map(|n| n.payload));
        }
    }
}
