use crate::{
    Options,
    error::{Detail, Warning},
    grammar::{LineMap, Scanner, ScannerState},
    model::Location,
};

/// Resume point recorded before every top-level node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    pub(crate) offset: usize,
    /// Number of document children already produced.
    pub(crate) node_index: usize,
    /// Number of warnings already recorded.
    pub(crate) warnings: usize,
    pub(crate) scanner: ScannerState,
}

/// Mutable state of one parse. Never shared between parses.
#[derive(Debug)]
pub(crate) struct ParserState<'a> {
    pub(crate) input: &'a str,
    pub(crate) options: &'a Options,
    pub(crate) line_map: LineMap,
    pub(crate) scanner: Scanner,
    pub(crate) warnings: Vec<Warning>,
    pub(crate) checkpoints: Vec<Checkpoint>,
    /// Current nesting of lists, continuations and conditionals.
    pub(crate) depth: usize,
    /// Marker keys of the lists enclosing the current position, outermost first.
    pub(crate) list_keys: Vec<String>,
    /// Offset of the last section marker reported as skipping levels, so a marker that
    /// falls through several sections is reported once.
    pub(crate) last_skipped_section: Option<usize>,
}

impl<'a> ParserState<'a> {
    pub(crate) fn new(input: &'a str, options: &'a Options) -> Self {
        Self {
            input,
            options,
            line_map: LineMap::new(input),
            scanner: Scanner::new(),
            warnings: Vec::new(),
            checkpoints: Vec::new(),
            depth: 0,
            list_keys: Vec::new(),
            last_skipped_section: None,
        }
    }

    pub(crate) fn create_location(&self, start: usize, end: usize) -> Location {
        self.line_map.location(start, end, self.input)
    }

    pub(crate) fn detail(&self, start: usize, end: usize) -> Detail {
        Detail {
            location: self.create_location(start, end),
        }
    }

    pub(crate) fn warn(&mut self, warning: Warning) {
        tracing::warn!(%warning, "recovered from malformed input");
        self.warnings.push(warning);
    }

    /// Record a checkpoint for the top-level node about to start at `offset`.
    pub(crate) fn checkpoint(&mut self, offset: usize, node_index: usize) {
        self.checkpoints.push(Checkpoint {
            offset,
            node_index,
            warnings: self.warnings.len(),
            scanner: self.scanner.snapshot(),
        });
    }
}
