//! Locate, validate and query flattened device tree blobs.
//!
//! A blob is searched for inside an arbitrary buffer with [`base::find_blob`], checked against a
//! strict header profile by [`base::DevTree::new`], and queried one property at a time by
//! hierarchical path. Nothing is copied and no tree is kept between queries.
//!
//! ```
//! use fdt_lookup::prelude::*;
//!
//! # let fdt: &[u8] = &[];
//! let devtree = DevTree::new(fdt).expect("Buffer does not contain a device tree.");
//! let console = devtree.prop_str("/chosen", "stdout-path");
//! ```
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
extern crate memoffset;
#[macro_use]
extern crate static_assertions;

pub mod base;
pub mod error;
pub mod prelude;
pub mod spec;

mod priv_util;
