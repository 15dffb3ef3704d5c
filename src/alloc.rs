use std::ptr::NonNull;

use crate::Node;

/// Moves `payload` into a fresh heap node and leaks it.
///
/// The node is red and unlinked; the tree takes ownership of it.
pub(crate) fn leak_alloc_node<T>(payload: T) -> NonNull<Node<T>> {
    NonNull::from(Box::leak(Box::new(Node::new(payload))))
}

/// # Safety
///
/// `node` must come from [`leak_alloc_node`], be unlinked from its tree,
/// and not be reclaimed twice.
pub(crate) unsafe fn own_back<T>(node: NonNull<Node<T>>) -> Box<Node<T>> {
    unsafe { Box::from_raw(node.as_ptr()) }
}
