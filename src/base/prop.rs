use core::mem::size_of;
use core::str::from_utf8;

use crate::error::{DevTreeError, Result};
use crate::priv_util::SliceRead;

/// A property matched by a query.
///
/// Both the name and the value borrow from the blob; nothing is copied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DevTreeProp<'dt> {
    pub(super) offset: usize,
    pub(super) name: &'dt [u8],
    pub(super) propbuf: &'dt [u8],
}

impl<'dt> DevTreeProp<'dt> {
    /// Returns the name of the property within the device tree.
    #[inline]
    pub fn name(&self) -> Result<&'dt str> {
        Ok(from_utf8(self.name)?)
    }

    /// Returns the raw bytes of the property's name.
    #[inline]
    #[must_use]
    pub fn name_bytes(&self) -> &'dt [u8] {
        self.name
    }

    /// Offset of the property's token from the start of the blob.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the length of the property value within the device tree
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.propbuf.len()
    }

    /// Returns this property's data as a raw slice
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &'dt [u8] {
        self.propbuf
    }

    /// Decode the value as a single big-endian [`u32`].
    ///
    /// Returns [`DevTreeError::TypeMismatch`] unless the value is exactly 4 bytes long.
    pub fn get_u32(&self) -> Result<u32> {
        if self.propbuf.len() != size_of::<u32>() {
            return Err(DevTreeError::TypeMismatch);
        }
        Ok(self.propbuf.read_be_u32(0)?)
    }

    /// Returns the value as a string.
    ///
    /// The value must be non-empty and end with a null byte, otherwise
    /// [`DevTreeError::TypeMismatch`] is returned. Like a C string, the result stops at the first
    /// null byte.
    pub fn get_str(&self) -> Result<&'dt str> {
        match self.propbuf.last() {
            Some(&0) => {}
            _ => return Err(DevTreeError::TypeMismatch),
        }
        let s = self.propbuf.read_bstring0(0)?;
        Ok(from_utf8(s)?)
    }

    /// Returns true if every byte but a mandatory trailing null is printable ASCII.
    #[must_use]
    pub fn is_printable_str(&self) -> bool {
        is_printable_str(self.propbuf)
    }
}

pub(crate) fn is_printable_str(buf: &[u8]) -> bool {
    match buf.split_last() {
        Some((&0, s)) => s.iter().all(|b| (0x20..=0x7e).contains(b)),
        _ => false,
    }
}
