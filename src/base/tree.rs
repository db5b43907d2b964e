#[cfg(doc)]
use crate::base::parse::ParsedTok;

use core::fmt;

use crate::error::{DevTreeError, HeaderError, Result, StructureError};
use crate::priv_util::SliceRead;
use crate::spec::fdt_header;

use super::header::validate_header;
use super::parse::DevTreeParseIter;
use super::path::PathPattern;
use super::walk::{QueryOptions, Walker};
use super::DevTreeProp;

macro_rules! get_be32_field {
    ( $f:ident, $s:ident , $buf:expr ) => {
        // The header was validated on construction, so the read cannot fail.
        $buf.read_be_u32(offset_of!($s, $f)).unwrap_or_default()
    };
}

/// A validated Flattened Device Tree.
///
/// Holding a `DevTree` only means the header passed strict validation. No tree is built: every
/// query walks the structure block again from the start, so queries are independent of each other
/// and may run concurrently on a shared blob.
#[derive(Copy, Clone, Debug)]
pub struct DevTree<'dt> {
    buf: &'dt [u8],
    struct_block: &'dt [u8],
    strings_block: &'dt [u8],
}

impl<'dt> PartialEq for DevTree<'dt> {
    fn eq(&self, other: &Self) -> bool {
        self.buf as *const [u8] == other.buf as *const [u8]
    }
}

impl<'dt> DevTree<'dt> {
    /// Construct the parseable DevTree object from the provided byte slice.
    ///
    /// The header at the start of `buf` must pass strict validation and `buf` must hold at least
    /// `totalsize` bytes. Any trailing bytes are ignored.
    pub fn new(buf: &'dt [u8]) -> Result<Self> {
        let totalsize = validate_header(buf, 0, true)?;
        let buf = buf
            .get(..totalsize)
            .ok_or(DevTreeError::InvalidHeader(HeaderError::BufferTooSmall))?;

        let off_dt_struct = get_be32_field!(off_dt_struct, fdt_header, buf) as usize;
        let size_dt_struct = get_be32_field!(size_dt_struct, fdt_header, buf) as usize;
        let off_dt_strings = get_be32_field!(off_dt_strings, fdt_header, buf) as usize;
        let size_dt_strings = get_be32_field!(size_dt_strings, fdt_header, buf) as usize;

        // Containment was checked by validate_header.
        let struct_block = buf
            .get(off_dt_struct..off_dt_struct + size_dt_struct)
            .ok_or(DevTreeError::InvalidHeader(HeaderError::StructBlock))?;
        let strings_block = buf
            .get(off_dt_strings..off_dt_strings + size_dt_strings)
            .ok_or(DevTreeError::InvalidHeader(HeaderError::StringsBlock))?;

        Ok(Self {
            buf,
            struct_block,
            strings_block,
        })
    }

    /// Like [`DevTree::new()`], logging the reason a header is rejected.
    pub fn new_with(buf: &'dt [u8], opts: &QueryOptions) -> Result<Self> {
        Self::new(buf).map_err(|e| {
            if opts.report_errors {
                log::error!("FDT: {}", e);
            }
            e
        })
    }

    /// Returns the totalsize field of the Device Tree. This is the number of bytes of the device
    /// tree structure.
    #[inline]
    #[must_use]
    pub fn totalsize(&self) -> usize {
        get_be32_field!(totalsize, fdt_header, self.buf) as usize
    }

    /// Returns the rsvmap offset field of the Device Tree
    #[inline]
    #[must_use]
    pub fn off_mem_rsvmap(&self) -> usize {
        get_be32_field!(off_mem_rsvmap, fdt_header, self.buf) as usize
    }

    /// Returns the dt_struct offset field of the Device Tree
    #[inline]
    #[must_use]
    pub fn off_dt_struct(&self) -> usize {
        get_be32_field!(off_dt_struct, fdt_header, self.buf) as usize
    }

    /// Returns the dt_strings offset field of the Device Tree
    #[inline]
    #[must_use]
    pub fn off_dt_strings(&self) -> usize {
        get_be32_field!(off_dt_strings, fdt_header, self.buf) as usize
    }

    /// Returns the magic field of the Device Tree
    #[inline]
    #[must_use]
    pub fn magic(&self) -> u32 {
        get_be32_field!(magic, fdt_header, self.buf)
    }

    /// Returns the version field of the Device Tree
    #[inline]
    #[must_use]
    pub fn version(&self) -> u32 {
        get_be32_field!(version, fdt_header, self.buf)
    }

    /// Returns the boot_cpuid_phys field of the Device Tree
    #[inline]
    #[must_use]
    pub fn boot_cpuid_phys(&self) -> u32 {
        get_be32_field!(boot_cpuid_phys, fdt_header, self.buf)
    }

    /// Returns the last_comp_version field of the Device Tree
    #[inline]
    #[must_use]
    pub fn last_comp_version(&self) -> u32 {
        get_be32_field!(last_comp_version, fdt_header, self.buf)
    }

    /// Returns the size_dt_strings field of the Device Tree
    #[inline]
    #[must_use]
    pub fn size_dt_strings(&self) -> u32 {
        get_be32_field!(size_dt_strings, fdt_header, self.buf)
    }

    /// Returns the size_dt_struct field of the Device Tree
    #[inline]
    #[must_use]
    pub fn size_dt_struct(&self) -> u32 {
        get_be32_field!(size_dt_struct, fdt_header, self.buf)
    }

    /// The blob, trimmed to `totalsize`.
    #[must_use]
    pub fn buf(&self) -> &'dt [u8] {
        self.buf
    }

    /// The structure block.
    #[must_use]
    pub fn struct_block(&self) -> &'dt [u8] {
        self.struct_block
    }

    /// The strings block.
    #[must_use]
    pub fn strings_block(&self) -> &'dt [u8] {
        self.strings_block
    }

    /// Returns the null terminated string at `offset` within the strings block.
    ///
    /// Both the offset and the terminator must lie inside the strings block.
    pub fn string_at(&self, offset: usize) -> Result<&'dt [u8]> {
        self.strings_block
            .read_bstring0(offset)
            .map_err(|_| StructureError::BadNameOffset.into())
    }

    /// Returns an iterator over low level parsing tokens, [`ParsedTok`].
    #[must_use]
    pub fn parse_iter(&self) -> DevTreeParseIter<'dt> {
        DevTreeParseIter::new(self)
    }

    /// Search for the property `name` of the node(s) selected by `path`.
    ///
    /// `path` is parsed before the walk starts, so a malformed path is reported as
    /// [`DevTreeError::InvalidPath`] whatever the blob contains. The first match in tree order is
    /// returned.
    ///
    /// Without a `name` nothing can match: the whole tree is walked with
    /// [`QueryOptions::DIAGNOSTIC`] and [`DevTreeError::NotFound`] is returned once it completes.
    pub fn query(
        &self,
        path: &str,
        name: Option<&str>,
        opts: &QueryOptions,
    ) -> Result<DevTreeProp<'dt>> {
        let opts = match name {
            Some(_) => *opts,
            None => QueryOptions::DIAGNOSTIC,
        };
        let pattern = PathPattern::parse(path).map_err(|e| {
            if opts.report_errors {
                log::error!("FDT: incorrect path {:?}: {}", path, e);
            }
            DevTreeError::from(e)
        })?;

        log::trace!("searching for {:?} below {:?}", name, path);
        Walker::new(self, opts)
            .target(pattern, name)
            .run()?
            .ok_or(DevTreeError::NotFound)
    }

    /// Returns the property `name` of the node(s) selected by `path`.
    ///
    /// See [`DevTree::query()`].
    pub fn prop(&self, path: &str, name: &str) -> Result<DevTreeProp<'dt>> {
        self.query(path, Some(name), &QueryOptions::default())
    }

    /// Returns the value of a property as a slice of the blob.
    pub fn prop_value(&self, path: &str, name: &str) -> Result<&'dt [u8]> {
        self.prop(path, name).map(|prop| prop.raw())
    }

    /// Returns the value of a property holding exactly one big-endian `u32`.
    pub fn prop_u32(&self, path: &str, name: &str) -> Result<u32> {
        self.prop(path, name)?.get_u32()
    }

    /// Returns the value of a null terminated string property.
    pub fn prop_str(&self, path: &str, name: &str) -> Result<&'dt str> {
        self.prop(path, name)?.get_str()
    }

    /// Write a listing of every node path and property to `out`.
    ///
    /// Nodes are written as `/parent/child/`, properties as `  name = "text"` when the value is a
    /// printable string and as `  name = [size:N]` otherwise.
    pub fn dump(&self, out: &mut dyn fmt::Write) -> Result<()> {
        Walker::new(self, QueryOptions::default())
            .listing(out)
            .run()
            .map(|_| ())
    }
}
