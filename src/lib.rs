//! A red-black ordered map with a cursor that survives removals.
//!
//! The engine is [`Tree`], an intrusive-style red-black tree over opaque
//! payloads ordered by a [`Compare`] implementation. [`OrderedMap`] and
//! [`OrderedSet`] are thin adapters on top of it.
//!
//! ```
//! use noirmap::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! map.put(3, "c").unwrap();
//! map.put(1, "a").unwrap();
//! map.put(2, "b").unwrap();
//!
//! let mut cursor = map.entry_cursor();
//! while cursor.has_next() {
//!     let (key, _) = cursor.next().unwrap();
//!     if key % 2 == 1 {
//!         cursor.remove().unwrap();
//!     }
//! }
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), [2]);
//! ```
mod alloc;
mod error;
mod iter;
mod map;
mod natural;
mod node;
mod root;
mod set;
mod tree;

use std::{marker::PhantomData, ptr::NonNull};

pub use compare::{Compare, Natural};

pub use error::{Error, Result};
pub use iter::{
    cursor::Cursor,
    map::{EntryCursor, IntoEntries, Iter as Entries, KeyCursor, Keys, ValueCursor, Values},
    tree::{IntoIter, Iter},
};
pub use natural::NaturalOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red = 0,
    Black = 1,
}

impl From<Color> for usize {
    fn from(color: Color) -> usize {
        color as usize
    }
}

impl From<usize> for Color {
    fn from(color: usize) -> Color {
        match color {
            0 => Color::Red,
            _ => Color::Black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComingFrom {
    Left,
    Right,
}

pub(crate) type NodePtr<T> = Option<NonNull<Node<T>>>;

/// Link surgery on possibly-absent nodes. Reads on `None` behave like a
/// black leaf, writes on `None` are no-ops.
pub(crate) trait NodePtrExt {
    type Payload;

    fn color(&self) -> Color;
    fn is_black(&self) -> bool;
    fn is_red(&self) -> bool;
    fn left(&self) -> NodePtr<Self::Payload>;
    fn parent(&self) -> NodePtr<Self::Payload>;
    fn right(&self) -> NodePtr<Self::Payload>;
    fn set_color(&self, color: Color);
    fn set_left(&self, left: NodePtr<Self::Payload>);
    fn set_parent(&self, parent: NodePtr<Self::Payload>);
    fn set_right(&self, right: NodePtr<Self::Payload>);
}

impl<T> NodePtrExt for NodePtr<T> {
    type Payload = T;

    #[inline(always)]
    fn color(&self) -> Color {
        self.map_or(Color::Black, |v| unsafe { v.as_ref() }.color())
    }

    #[inline(always)]
    fn is_black(&self) -> bool {
        self.map_or(true, |v| unsafe { v.as_ref() }.is_black())
    }

    #[inline(always)]
    fn is_red(&self) -> bool {
        self.map_or(false, |v| unsafe { v.as_ref() }.is_red())
    }

    #[inline(always)]
    fn left(&self) -> NodePtr<T> {
        self.and_then(|v| unsafe { v.as_ref() }.left)
    }

    #[inline(always)]
    fn parent(&self) -> NodePtr<T> {
        self.and_then(|v| unsafe { v.as_ref() }.parent_ptr())
    }

    #[inline(always)]
    fn right(&self) -> NodePtr<T> {
        self.and_then(|v| unsafe { v.as_ref() }.right)
    }

    #[inline(always)]
    fn set_color(&self, color: Color) {
        if let Some(mut node) = *self {
            unsafe { node.as_mut() }.set_color(color);
        }
    }

    #[inline(always)]
    fn set_left(&self, left: NodePtr<T>) {
        if let Some(mut node) = *self {
            unsafe { node.as_mut() }.left = left;
        }
    }

    #[inline(always)]
    fn set_parent(&self, parent: NodePtr<T>) {
        if let Some(mut node) = *self {
            unsafe { node.as_mut() }.set_parent(parent);
        }
    }

    #[inline(always)]
    fn set_right(&self, right: NodePtr<T>) {
        if let Some(mut node) = *self {
            unsafe { node.as_mut() }.right = right;
        }
    }
}

/// A tree cell. The parent pointer and the color share one word: the
/// color lives in the lowest bit.
pub struct Node<T> {
    pub(crate) parent_color: *mut Node<T>,
    pub(crate) right: NodePtr<T>,
    pub(crate) left: NodePtr<T>,
    pub(crate) payload: T,
}

/// The structural half of the engine: links, rotations and recoloring.
/// It never compares payloads.
pub(crate) struct Root<T> {
    root: NodePtr<T>,
}

/// A red-black tree of payloads ordered by `C`.
///
/// Equal payloads (as decided by `C`) are never stored twice: inserting
/// one replaces the stored payload.
pub struct Tree<T, C> {
    root: Root<T>,
    cmp: C,
    len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

/// An ordered map whose ordering is either supplied up front or resolved
/// from the key type on first insertion.
pub struct OrderedMap<K, V> {
    tree: Tree<map::Entry<K, V>, map::KeyOrder<K>>,
}

/// An ordered set over the same engine as [`OrderedMap`].
pub struct OrderedSet<T, C> {
    tree: Tree<T, C>,
}
