//! Path patterns used to target a property.
//!
//! A pattern is a `/`-separated list of node names. A single leading and a single trailing `/`
//! are ignored. A segment ending in `*` matches every node name starting with the rest of the
//! segment, any other segment must equal the node name exactly.

use crate::error::PathError;

/// A parsed, non-empty path pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPattern<'p> {
    trimmed: &'p str,
    depth: usize,
}

impl<'p> PathPattern<'p> {
    /// Parse `path`, rejecting it up front if any segment would be empty.
    pub fn parse(path: &'p str) -> Result<Self, PathError> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(PathError::SlashOnly);
        }

        let mut depth = 0;
        for seg in trimmed.split('/') {
            if seg.is_empty() {
                return Err(PathError::EmptySegment);
            }
            depth += 1;
        }

        Ok(Self { trimmed, depth })
    }

    /// Number of segments in the pattern.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns an iterator over the pattern's segments.
    pub fn segments(&self) -> impl Iterator<Item = &'p str> {
        self.trimmed.split('/')
    }

    /// Returns true if the property `prop_name` found below `ancestors` (at `depth`) is the one
    /// targeted by this pattern and `target_name`.
    ///
    /// The depth must equal the pattern's segment count and the property name must equal
    /// `target_name` exactly before any segment is compared.
    #[must_use]
    pub fn matches(
        &self,
        ancestors: &[&[u8]],
        depth: usize,
        prop_name: &[u8],
        target_name: Option<&str>,
    ) -> bool {
        let target_name = match target_name {
            Some(name) => name,
            None => return false,
        };
        if depth != self.depth || ancestors.len() < depth {
            return false;
        }
        if prop_name != target_name.as_bytes() {
            return false;
        }

        self.segments()
            .zip(ancestors)
            .all(|(seg, name)| segment_matches(seg.as_bytes(), name))
    }
}

fn segment_matches(seg: &[u8], name: &[u8]) -> bool {
    match seg.split_last() {
        Some((&b'*', prefix)) => name.starts_with(prefix),
        _ => name == seg,
    }
}
