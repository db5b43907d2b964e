//! Device tree location, validation and property lookup.
//!
//! # Overview
//!
//! Everything in this module operates directly on the FDT buffer. No tree is built in memory;
//! each query parses the structure block on the fly, from the root, until it finds the requested
//! property. Every value handed back borrows from the buffer.
//!
//! # Examples
//!
//! ## Locating a blob
//!
//! ```
//! use fdt_lookup::base::*;
//!
//! # let image: &[u8] = &[];
//! // Find the first blob (of at most 64KiB) inside a firmware image.
//! if let Some(fdt) = find_blob(image, Some(0x10000)) {
//!     let devtree = DevTree::new(fdt).expect("located blobs always validate");
//! }
//! ```
//!
//! ## Property lookup
//!
//! Path segments ending in `*` match any node name with that prefix:
//! ```
//! # use fdt_lookup::base::*;
//! # fn example(devtree: DevTree) -> fdt_lookup::error::Result<()> {
//! let bootargs = devtree.prop_str("/chosen", "bootargs")?;
//! let mac = devtree.prop_value("/soc/ethernet*", "local-mac-address")?;
//! let phandle = devtree.prop_u32("/soc/ethernet*/mdio/phy*", "phandle")?;
//! # Ok(())
//! # }
//! ```

#[doc(hidden)]
pub mod header;
#[doc(hidden)]
pub mod locate;
#[doc(hidden)]
pub mod prop;
#[doc(hidden)]
pub mod query;
#[doc(hidden)]
pub mod tree;

pub mod parse;
pub mod path;
mod walk;

#[doc(inline)]
pub use header::*;
#[doc(inline)]
pub use locate::*;
#[doc(inline)]
pub use prop::*;
#[doc(inline)]
pub use query::*;
#[doc(inline)]
pub use tree::*;

pub use path::PathPattern;
pub use walk::QueryOptions;
