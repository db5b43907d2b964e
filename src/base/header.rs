//! Flattened device tree header validation.
//!
//! Validation only ever touches the fixed-size header. The structure and strings blocks are
//! range-checked against `totalsize` but never dereferenced here.

use core::mem::size_of;

use crate::error::{DevTreeError, HeaderError, Result};
use crate::priv_util::SliceRead;
use crate::spec::{
    fdt_header, FDT_LAST_COMP_VERSION, FDT_MAGIC, FDT_MIN_PAYLOAD, FDT_SIZE_LIMIT, FDT_VERSION,
};

/// Size in bytes of the fixed header.
pub const HEADER_SIZE: usize = size_of::<fdt_header>();

macro_rules! get_be32_field {
    ( $f:ident, $s:ident , $buf:expr ) => {
        $buf.read_be_u32(offset_of!($s, $f))
            .map_err(|_| DevTreeError::InvalidHeader(HeaderError::Truncated))
    };
}

/// Returns true if the 4 bytes at `offset` hold the FDT magic.
#[inline]
pub fn has_magic(buf: &[u8], offset: usize) -> bool {
    match buf.get(offset..) {
        Some(hdr) => get_be32_field!(magic, fdt_header, hdr) == Ok(FDT_MAGIC),
        None => false,
    }
}

/// Checks that `[off, off + size)` lies strictly after the header and within `totalsize`.
fn block_contained(off: u32, size: u32, totalsize: u32) -> bool {
    if off as usize <= HEADER_SIZE || off >= totalsize {
        return false;
    }
    match off.checked_add(size) {
        Some(end) => end <= totalsize,
        None => false,
    }
}

/// Validate the header found at `offset` within `buf` and return its `totalsize`.
///
/// The magic number is checked before anything else is read. When `strict` is false only
/// `totalsize` is range-checked, which is enough to estimate the extent of a blob. When `strict`
/// is true the version pair, the containment of the structure and strings blocks and
/// `boot_cpuid_phys` are checked as well.
///
/// This never checks that `buf` actually holds `totalsize` bytes.
pub fn validate_header(buf: &[u8], offset: usize, strict: bool) -> Result<usize> {
    let hdr = buf
        .get(offset..)
        .ok_or(DevTreeError::InvalidHeader(HeaderError::Truncated))?;

    if get_be32_field!(magic, fdt_header, hdr)? != FDT_MAGIC {
        return Err(DevTreeError::InvalidMagicNumber);
    }
    if hdr.len() < HEADER_SIZE {
        return Err(DevTreeError::InvalidHeader(HeaderError::Truncated));
    }

    let totalsize = get_be32_field!(totalsize, fdt_header, hdr)?;
    if totalsize >= FDT_SIZE_LIMIT || (totalsize as usize) < HEADER_SIZE + FDT_MIN_PAYLOAD {
        return Err(DevTreeError::InvalidHeader(HeaderError::TotalSize));
    }

    if !strict {
        return Ok(totalsize as usize);
    }

    let version = get_be32_field!(version, fdt_header, hdr)?;
    let last_comp_version = get_be32_field!(last_comp_version, fdt_header, hdr)?;
    if version != FDT_VERSION || last_comp_version != FDT_LAST_COMP_VERSION {
        return Err(DevTreeError::InvalidHeader(HeaderError::Version));
    }

    let off_dt_struct = get_be32_field!(off_dt_struct, fdt_header, hdr)?;
    let size_dt_struct = get_be32_field!(size_dt_struct, fdt_header, hdr)?;
    if !block_contained(off_dt_struct, size_dt_struct, totalsize) {
        return Err(DevTreeError::InvalidHeader(HeaderError::StructBlock));
    }

    let off_dt_strings = get_be32_field!(off_dt_strings, fdt_header, hdr)?;
    let size_dt_strings = get_be32_field!(size_dt_strings, fdt_header, hdr)?;
    if !block_contained(off_dt_strings, size_dt_strings, totalsize) {
        return Err(DevTreeError::InvalidHeader(HeaderError::StringsBlock));
    }

    if get_be32_field!(boot_cpuid_phys, fdt_header, hdr)? != 0 {
        return Err(DevTreeError::InvalidHeader(HeaderError::BootCpu));
    }

    Ok(totalsize as usize)
}

/// Verify the magic of the blob at the start of `buf` and return its reported `totalsize`.
///
/// When the size of a blob is not known up front, call this on a buffer at least
/// [`HEADER_SIZE`] bytes long and resize the slice before handing it to
/// [`DevTree::new()`](crate::base::DevTree::new).
#[inline]
pub fn read_totalsize(buf: &[u8]) -> Result<usize> {
    validate_header(buf, 0, false)
}
