mod block;
mod delimited;
mod inline;
mod line;
mod line_map;
mod list;
mod precedence;
mod scanner;
mod shapes;
mod state;
pub(crate) mod utf8_utils;

pub(crate) use inline::inline_content;
pub(crate) use line_map::LineMap;
pub use precedence::{Precedence, SECTION_MARKERS, SectionMarker};
pub use scanner::{
    ColonRole, ExternalToken, OpenRegion, RegionKind, Scanned, Scanner, ScannerState, ValidTokens,
    colon_role,
};
pub(crate) use state::{Checkpoint, ParserState};
