//! Module exporting traits and the common entry points of this library.

pub use crate::base::{DevTree, DevTreeProp, QueryOptions};

pub use fallible_iterator::FallibleIterator;
