//! Errors reported by this library

use crate::priv_util::SliceReadError;
use core::fmt;
use core::result;
use core::str::Utf8Error;

/// A header field which failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    /// Fewer bytes than a full header remain at the given offset.
    Truncated,
    /// `totalsize` is smaller than a header plus minimum payload, or absurdly large.
    TotalSize,
    /// `version` / `last_comp_version` are not the supported 17 / 16 pair.
    Version,
    /// The structure block is not contained in the blob.
    StructBlock,
    /// The strings block is not contained in the blob.
    StringsBlock,
    /// `boot_cpuid_phys` is not zero.
    BootCpu,
    /// The buffer holds fewer bytes than `totalsize`.
    BufferTooSmall,
}

/// A malformed path pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// Nothing left once a single leading `/` is removed.
    Empty,
    /// Nothing left once a single leading and trailing `/` are removed.
    SlashOnly,
    /// Two consecutive `/` produced an empty segment.
    EmptySegment,
}

impl PathError {
    /// The negative status code historically reported for this error.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            PathError::Empty => -10,
            PathError::SlashOnly => -11,
            PathError::EmptySegment => -12,
        }
    }
}

/// A violation of the structure block's well-formedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureError {
    /// The structure block does not start with a `BEGIN_NODE` token.
    MissingRoot,
    /// The first node carries a name.
    RootName,
    /// A node below the root has an empty name.
    EmptyNodeName,
    /// A node name runs off the end of the structure block.
    UnterminatedName,
    /// Nodes are nested deeper than [`crate::spec::MAX_DEPTH`].
    TooDeep,
    /// A property length is not below `i32::MAX`.
    PropertyTooLarge,
    /// A property name offset points outside the strings block.
    BadNameOffset,
    /// A token or its payload runs off the end of the structure block.
    UnexpectedEnd,
    /// A token value outside the defined set.
    UnknownToken(u32),
}

/// An error describe parsing problems when locating or querying device trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevTreeError {
    /// The magic number FDT_MAGIC was not found at the start of the
    /// structure.
    InvalidMagicNumber,

    /// The header was rejected by validation.
    InvalidHeader(HeaderError),

    /// The supplied path pattern is malformed.
    InvalidPath(PathError),

    /// The data was not formatted as expected.  This likely indicates an error in the Device Tree
    /// we're parsing.
    ParseError(StructureError),

    /// No property matched the query.
    NotFound,

    /// The property exists but its value cannot be decoded as requested.
    TypeMismatch,

    /// While trying to convert a string that was supposed to be UTF-8, invalid
    /// `str` sequences were encounter.
    StrError(Utf8Error),
}

impl DevTreeError {
    /// Returns true if this error was caused by the path argument rather than the blob.
    #[must_use]
    pub fn is_path_error(&self) -> bool {
        matches!(self, DevTreeError::InvalidPath(_))
    }
}

impl From<SliceReadError> for DevTreeError {
    fn from(_: SliceReadError) -> DevTreeError {
        DevTreeError::ParseError(StructureError::UnexpectedEnd)
    }
}

impl From<Utf8Error> for DevTreeError {
    fn from(e: Utf8Error) -> DevTreeError {
        DevTreeError::StrError(e)
    }
}

impl From<PathError> for DevTreeError {
    fn from(e: PathError) -> DevTreeError {
        DevTreeError::InvalidPath(e)
    }
}

impl From<StructureError> for DevTreeError {
    fn from(e: StructureError) -> DevTreeError {
        DevTreeError::ParseError(e)
    }
}

/// The result of a parse.
pub type Result<T> = core::result::Result<T, DevTreeError>;

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match *self {
            HeaderError::Truncated => write!(f, "header is truncated"),
            HeaderError::TotalSize => write!(f, "totalsize out of range"),
            HeaderError::Version => write!(f, "unsupported version"),
            HeaderError::StructBlock => write!(f, "structure block out of bounds"),
            HeaderError::StringsBlock => write!(f, "strings block out of bounds"),
            HeaderError::BootCpu => write!(f, "boot_cpuid_phys is not zero"),
            HeaderError::BufferTooSmall => write!(f, "buffer is shorter than totalsize"),
        }
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match *self {
            PathError::Empty => write!(f, "path is empty"),
            PathError::SlashOnly => write!(f, "path holds only slashes"),
            PathError::EmptySegment => write!(f, "path contains an empty segment"),
        }
    }
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match *self {
            StructureError::MissingRoot => write!(f, "structure block does not begin with a node"),
            StructureError::RootName => write!(f, "root node has a name"),
            StructureError::EmptyNodeName => write!(f, "node name is empty"),
            StructureError::UnterminatedName => write!(f, "node name is not terminated"),
            StructureError::TooDeep => write!(f, "tree is too deep"),
            StructureError::PropertyTooLarge => write!(f, "property is too large"),
            StructureError::BadNameOffset => write!(f, "property name offset out of bounds"),
            StructureError::UnexpectedEnd => write!(f, "unexpected end of structure block"),
            StructureError::UnknownToken(tok) => write!(f, "incorrect tag id 0x{:X}", tok),
        }
    }
}

impl fmt::Display for DevTreeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match *self {
            DevTreeError::InvalidMagicNumber => write!(f, "Device tree contains invalid magic number."),
            DevTreeError::InvalidHeader(err) => write!(f, "Invalid device tree header: {}", err),
            DevTreeError::InvalidPath(err) => write!(f, "Invalid path ({}): {}", err.code(), err),
            DevTreeError::ParseError(err) => write!(f, "Failed to parse device tree: {}", err),
            DevTreeError::NotFound => write!(f, "Property not found."),
            DevTreeError::TypeMismatch => write!(f, "Property value has an unexpected size or format."),
            DevTreeError::StrError(utf_err) => write!(f, "Failed to parse device tree string: {}", utf_err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DevTreeError {}
