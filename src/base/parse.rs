//! Low level flattened device tree parsing functions.
//!

use core::mem::size_of;

use num_traits::FromPrimitive;

use crate::base::DevTree;
use crate::error::{DevTreeError, Result, StructureError};
use crate::priv_util::{align_u32, SliceRead};
use crate::spec::{fdt_prop_header, FdtTok, FDT_SIZE_LIMIT};

use fallible_iterator::FallibleIterator;

/// This function implements the logic to tokenize the device tree's main structure block.
///
/// `buf` must be exactly the structure block and `off` a u32 aligned offset into it. This
/// function will return the next [`ParsedTok`] if one exists, or `None` once the `END` token is
/// reached. If it succeeds in parsing a token, `off` will be advanced to the start of the next
/// token within `buf`, which keeps it u32 aligned.
///
/// Nothing outside of `buf` is ever read; a token or payload which would run past its end is
/// reported as [`StructureError::UnexpectedEnd`].
pub fn next_devtree_token<'a>(buf: &'a [u8], off: &mut usize) -> Result<Option<ParsedTok<'a>>> {
    debug_assert!(*off % size_of::<u32>() == 0);

    let tok_off = *off;
    let fdt_tok_val = buf.read_be_u32(tok_off)?;
    *off += size_of::<u32>();

    match FromPrimitive::from_u32(fdt_tok_val) {
        Some(FdtTok::BeginNode) => {
            // Read the name (or return an error if the device tree is incorrectly formatted).
            let name = buf
                .read_bstring0(*off)
                .map_err(|_| StructureError::UnterminatedName)?;

            // Move past the name and its null byte, then align back to u32.
            *off = align_u32(*off + name.len() + 1);

            Ok(Some(ParsedTok::BeginNode(ParsedBeginNode {
                offset: tok_off,
                name,
            })))
        }
        Some(FdtTok::Prop) => {
            let prop_len = buf.read_be_u32(*off + offset_of!(fdt_prop_header, len))?;
            let name_offset = buf.read_be_u32(*off + offset_of!(fdt_prop_header, nameoff))?;
            if prop_len >= FDT_SIZE_LIMIT {
                return Err(StructureError::PropertyTooLarge.into());
            }

            // Move offset past prop header
            *off += size_of::<fdt_prop_header>();
            let end = off
                .checked_add(prop_len as usize)
                .ok_or(StructureError::UnexpectedEnd)?;
            let prop_buf = buf.get(*off..end).ok_or(StructureError::UnexpectedEnd)?;

            // Move the offset past the prop data and align back to u32.
            *off = align_u32(end);

            Ok(Some(ParsedTok::Prop(ParsedProp {
                offset: tok_off,
                name_offset: name_offset as usize,
                prop_buf,
            })))
        }
        Some(FdtTok::EndNode) => Ok(Some(ParsedTok::EndNode)),
        Some(FdtTok::Nop) => Ok(Some(ParsedTok::Nop)),
        Some(FdtTok::End) => Ok(None),
        None => {
            // Invalid token
            Err(StructureError::UnknownToken(fdt_tok_val).into())
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParsedBeginNode<'a> {
    /// Offset of the token within the structure block.
    pub offset: usize,
    pub name: &'a [u8],
}

#[derive(Debug, Clone, Copy)]
pub struct ParsedProp<'a> {
    /// Offset of the token within the structure block.
    pub offset: usize,
    pub prop_buf: &'a [u8],
    pub name_offset: usize,
}

/// Enumeration of all tokens within a device tree's structure block.
#[derive(Debug, Clone, Copy)]
pub enum ParsedTok<'a> {
    BeginNode(ParsedBeginNode<'a>),
    EndNode,
    Prop(ParsedProp<'a>),
    Nop,
}

/// A [`FallibleIterator`] over the tokens of a [`DevTree`]'s structure block.
///
/// Iteration stops at the `END` token. Once an error has been returned the iterator should not
/// be polled again; a malformed stream cannot be resynchronized.
#[derive(Clone, Debug)]
pub struct DevTreeParseIter<'dt> {
    pub offset: usize,
    buf: &'dt [u8],
}

impl<'dt> DevTreeParseIter<'dt> {
    pub(crate) fn new(fdt: &DevTree<'dt>) -> Self {
        Self {
            offset: 0,
            buf: fdt.struct_block(),
        }
    }
}

impl<'dt> FallibleIterator for DevTreeParseIter<'dt> {
    type Error = DevTreeError;
    type Item = ParsedTok<'dt>;

    fn next(&mut self) -> Result<Option<Self::Item>> {
        next_devtree_token(self.buf, &mut self.offset)
    }
}
