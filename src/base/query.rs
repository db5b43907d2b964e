//! One-shot queries on an unvalidated buffer.
//!
//! Each call validates the header and walks the structure block from scratch. Prefer holding a
//! [`DevTree`] when several properties are read from the same blob.

use crate::error::Result;

use super::walk::QueryOptions;
use super::{DevTree, DevTreeProp};

/// Validate `buf` and search it for a property.
///
/// See [`DevTree::query()`] for the meaning of `path` and a missing `name`.
pub fn get_property_with<'dt>(
    buf: &'dt [u8],
    path: &str,
    name: Option<&str>,
    opts: &QueryOptions,
) -> Result<DevTreeProp<'dt>> {
    DevTree::new_with(buf, opts)?.query(path, name, opts)
}

/// Validate `buf` and return the property `name` of the node(s) selected by `path`.
pub fn get_property<'dt>(buf: &'dt [u8], path: &str, name: &str) -> Result<DevTreeProp<'dt>> {
    get_property_with(buf, path, Some(name), &QueryOptions::default())
}

/// Validate `buf` and return the value of a property as a slice of `buf`.
pub fn get_property_value<'dt>(buf: &'dt [u8], path: &str, name: &str) -> Result<&'dt [u8]> {
    get_property(buf, path, name).map(|prop| prop.raw())
}

/// Validate `buf` and return the value of a property holding exactly one big-endian `u32`.
pub fn get_property_u32(buf: &[u8], path: &str, name: &str) -> Result<u32> {
    get_property(buf, path, name)?.get_u32()
}

/// Validate `buf` and return the value of a null terminated string property.
pub fn get_property_str<'dt>(buf: &'dt [u8], path: &str, name: &str) -> Result<&'dt str> {
    get_property(buf, path, name)?.get_str()
}
