//! Locating a flattened device tree inside a larger image.

use super::header::{has_magic, validate_header, HEADER_SIZE};

/// Slack kept between the last candidate offset and the end of the buffer.
const SCAN_MARGIN: usize = 8;

/// Returns the offset of the first blob in `buf` which passes strict header validation.
///
/// Candidates are tried in ascending order. The magic is compared before the full header is
/// validated. A candidate is skipped when its `totalsize` does not fit in the rest of `buf`, or
/// when `max_size` is given and `totalsize` exceeds it.
pub fn find_blob_offset(buf: &[u8], max_size: Option<usize>) -> Option<usize> {
    let end = buf.len().checked_sub(HEADER_SIZE + SCAN_MARGIN)?;

    (0..end).find(|&pos| {
        if !has_magic(buf, pos) {
            return false;
        }
        let totalsize = match validate_header(buf, pos, true) {
            Ok(size) => size,
            Err(e) => {
                log::trace!("rejected candidate blob at {:#x}: {}", pos, e);
                return false;
            }
        };
        if let Some(max) = max_size {
            if max > 0 && totalsize > max {
                log::trace!("candidate blob at {:#x} exceeds {} bytes", pos, max);
                return false;
            }
        }
        totalsize <= buf.len() - pos
    })
}

/// Returns the first valid blob within `buf`, trimmed to its `totalsize`.
///
/// See [`find_blob_offset`].
pub fn find_blob(buf: &[u8], max_size: Option<usize>) -> Option<&[u8]> {
    let pos = find_blob_offset(buf, max_size)?;
    let size = validate_header(buf, pos, true).ok()?;
    buf.get(pos..pos + size)
}
