pub(crate) mod cursor;
pub(crate) mod map;
pub(crate) mod set;
pub(crate) mod tree;
