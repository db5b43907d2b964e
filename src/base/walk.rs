//! Depth-tracked walk over the structure block.
//!
//! A [`Walker`] is the state of a single query. It is built, run once and dropped; no state
//! survives between queries.

use core::fmt;
use core::fmt::Write as _;
use core::str::from_utf8;

use fallible_iterator::FallibleIterator;

use super::parse::{DevTreeParseIter, ParsedBeginNode, ParsedProp, ParsedTok};
use super::path::PathPattern;
use super::prop::{is_printable_str, DevTreeProp};
use super::DevTree;
use crate::error::{DevTreeError, Result, StructureError};
use crate::spec::MAX_DEPTH;

/// Options controlling the diagnostics emitted by a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Log every node path and property encountered.
    pub verbose: bool,
    /// Log header and structure errors before returning them.
    pub report_errors: bool,
}

impl QueryOptions {
    /// Both verbose output and error reporting, as used for tree inspection.
    pub const DIAGNOSTIC: QueryOptions = QueryOptions {
        verbose: true,
        report_errors: true,
    };
}

/// Writes bytes which may not be UTF-8, escaping what isn't.
struct Bytes<'a>(&'a [u8]);

impl fmt::Display for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match from_utf8(self.0) {
            Ok(s) => f.write_str(s),
            Err(_) => self
                .0
                .iter()
                .try_for_each(|b| write!(f, "{}", core::ascii::escape_default(*b))),
        }
    }
}

/// `/a/b/` style rendering of an ancestor stack.
struct NodePath<'a, 'dt>(&'a [&'dt [u8]]);

impl fmt::Display for NodePath<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("/")?;
        for name in self.0 {
            write!(f, "{}/", Bytes(name))?;
        }
        Ok(())
    }
}

/// One property line of a tree listing.
struct PropLine<'a>(&'a [u8], &'a [u8]);

impl fmt::Display for PropLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let PropLine(name, value) = *self;
        if is_printable_str(value) {
            write!(f, "  {} = \"{}\"", Bytes(name), Bytes(&value[..value.len() - 1]))
        } else {
            write!(f, "  {} = [size:{}]", Bytes(name), value.len())
        }
    }
}

/// Write one listing line to `sink`, or to the log when there is none.
fn emit(sink: &mut Option<&mut dyn fmt::Write>, line: fmt::Arguments) {
    match sink {
        Some(sink) => {
            // The listing is best effort.
            let _ = writeln!(sink, "{}", line);
        }
        None => log::info!("{}", line),
    }
}

pub(crate) struct Walker<'a, 'dt, 'q> {
    fdt: &'a DevTree<'dt>,
    /// `None` until the root node has been entered.
    depth: Option<usize>,
    path: [&'dt [u8]; MAX_DEPTH],
    pattern: Option<PathPattern<'q>>,
    target_name: Option<&'q str>,
    opts: QueryOptions,
    sink: Option<&'a mut dyn fmt::Write>,
}

impl<'a, 'dt: 'a, 'q> Walker<'a, 'dt, 'q> {
    pub(crate) fn new(fdt: &'a DevTree<'dt>, opts: QueryOptions) -> Self {
        let unnamed: &'dt [u8] = &[];
        Self {
            fdt,
            depth: None,
            path: [unnamed; MAX_DEPTH],
            pattern: None,
            target_name: None,
            opts,
            sink: None,
        }
    }

    /// Bind the property this walk is searching for.
    pub(crate) fn target(mut self, pattern: PathPattern<'q>, name: Option<&'q str>) -> Self {
        self.pattern = Some(pattern);
        self.target_name = name;
        self
    }

    /// Send the tree listing to `sink` instead of the log.
    pub(crate) fn listing(mut self, sink: &'a mut dyn fmt::Write) -> Self {
        self.sink = Some(sink);
        self
    }

    fn ancestors(&self) -> &[&'dt [u8]] {
        &self.path[..self.depth.unwrap_or(0)]
    }

    fn listing_enabled(&self) -> bool {
        self.sink.is_some() || self.opts.verbose
    }

    fn fail(&self, err: DevTreeError) -> DevTreeError {
        if self.opts.report_errors {
            log::error!("FDT: {}", err);
        }
        err
    }

    /// Walk the structure block in order until the target property is found.
    ///
    /// Returns `Ok(None)` once the `END` token is reached without a match. Any structural error
    /// aborts the whole walk.
    pub(crate) fn run(mut self) -> Result<Option<DevTreeProp<'dt>>> {
        let mut tokens = DevTreeParseIter::new(self.fdt);

        // The stream must open with the unnamed root node.
        match tokens.clone().next() {
            Ok(Some(ParsedTok::BeginNode(_))) => {}
            Ok(_) => return Err(self.fail(StructureError::MissingRoot.into())),
            Err(e) => return Err(self.fail(e)),
        }

        loop {
            let tok = match tokens.next() {
                Ok(Some(tok)) => tok,
                Ok(None) => return Ok(None),
                Err(e) => return Err(self.fail(e)),
            };

            match tok {
                ParsedTok::BeginNode(node) => self.enter(node)?,
                ParsedTok::Prop(prop) => {
                    if let Some(found) = self.visit(prop)? {
                        return Ok(Some(found));
                    }
                }
                ParsedTok::EndNode => {
                    if let Some(d) = self.depth {
                        if d > 0 {
                            self.depth = Some(d - 1);
                        }
                    }
                }
                ParsedTok::Nop => {}
            }
        }
    }

    fn enter(&mut self, node: ParsedBeginNode<'dt>) -> Result<()> {
        let depth = match self.depth {
            None => {
                if !node.name.is_empty() {
                    return Err(self.fail(StructureError::RootName.into()));
                }
                0
            }
            Some(d) => {
                if node.name.is_empty() {
                    return Err(self.fail(StructureError::EmptyNodeName.into()));
                }
                self.path[d] = node.name;
                d + 1
            }
        };
        self.depth = Some(depth);

        if self.listing_enabled() {
            emit(&mut self.sink, format_args!("{}", NodePath(&self.path[..depth])));
        }

        if depth == MAX_DEPTH {
            return Err(self.fail(StructureError::TooDeep.into()));
        }
        Ok(())
    }

    fn visit(&mut self, prop: ParsedProp<'dt>) -> Result<Option<DevTreeProp<'dt>>> {
        let name = match self.fdt.string_at(prop.name_offset) {
            Ok(name) => name,
            Err(e) => return Err(self.fail(e)),
        };

        if self.listing_enabled() {
            emit(&mut self.sink, format_args!("{}", PropLine(name, prop.prop_buf)));
        }

        let depth = match self.depth {
            Some(d) => d,
            None => return Ok(None),
        };
        let hit = match self.pattern {
            Some(ref pattern) => pattern.matches(self.ancestors(), depth, name, self.target_name),
            None => false,
        };
        if !hit {
            return Ok(None);
        }

        log::trace!(
            "matched {}{} at {:#x}",
            NodePath(self.ancestors()),
            Bytes(name),
            self.fdt.off_dt_struct() + prop.offset
        );
        Ok(Some(DevTreeProp {
            offset: self.fdt.off_dt_struct() + prop.offset,
            name,
            propbuf: prop.prop_buf,
        }))
    }
}
