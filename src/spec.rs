//! On-disk definitions of the flattened device tree format.
use endian_type::types::u32_be;
use num_derive::FromPrimitive;

pub const FDT_MAGIC: u32 = 0xd00d_feed;

/// The only format revision accepted by strict validation.
pub const FDT_VERSION: u32 = 17;
/// The `last_comp_version` paired with [`FDT_VERSION`].
pub const FDT_LAST_COMP_VERSION: u32 = 16;

/// Minimum number of bytes a blob must carry beyond its header.
pub const FDT_MIN_PAYLOAD: usize = 128;

/// Maximum number of named nodes below the root.
pub const MAX_DEPTH: usize = 32;

/// Upper bound (exclusive) for `totalsize` and property lengths.
pub const FDT_SIZE_LIMIT: u32 = i32::MAX as u32;

#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FdtTok {
    BeginNode = 0x1,
    EndNode = 0x2,
    Prop = 0x3,
    Nop = 0x4,
    End = 0x9,
}

// As defined by the Devicetree Specification.
#[repr(C)]
pub struct fdt_header {
    pub magic: u32_be,
    pub totalsize: u32_be,
    pub off_dt_struct: u32_be,
    pub off_dt_strings: u32_be,
    pub off_mem_rsvmap: u32_be,
    pub version: u32_be,
    pub last_comp_version: u32_be,
    pub boot_cpuid_phys: u32_be,
    pub size_dt_strings: u32_be,
    pub size_dt_struct: u32_be,
}

#[repr(C)]
pub struct fdt_prop_header {
    pub len: u32_be,
    pub nameoff: u32_be,
}

assert_eq_size!(fdt_header, [u32; 10]);
assert_eq_size!(fdt_prop_header, [u32; 2]);
assert_eq_align!(fdt_prop_header, u32);
