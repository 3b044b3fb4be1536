//! The contextual scanner.
//!
//! Some tokens cannot be recognized by a context-free rule: whether `----` closes a
//! block depends on which block is open, whether a colon is plain text depends on the
//! shape of the surrounding line, and so on. The scanner owns that context (a stack of
//! open regions plus a line-start flag) and is queried by the grammars before they fall
//! back to the context-free line shapes.
//!
//! The scanner never fails: when nothing matches it returns `None` and the caller tries
//! its next rule.

use std::ops::BitOr;

use crate::{
    Error,
    grammar::{
        line::Line,
        shapes::line_shapes,
        utf8_utils::{char_before, slice},
    },
    model::NodeKind,
};

/// Kinds of region that can be open on the scanner stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Example,
    Listing,
    Literal,
    Quote,
    Sidebar,
    Passthrough,
    Open,
    Table,
    Comment,
}

impl RegionKind {
    const ALL: [RegionKind; 9] = [
        RegionKind::Example,
        RegionKind::Listing,
        RegionKind::Literal,
        RegionKind::Quote,
        RegionKind::Sidebar,
        RegionKind::Passthrough,
        RegionKind::Open,
        RegionKind::Table,
        RegionKind::Comment,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RegionKind::Example => "example",
            RegionKind::Listing => "listing",
            RegionKind::Literal => "literal",
            RegionKind::Quote => "quote",
            RegionKind::Sidebar => "sidebar",
            RegionKind::Passthrough => "passthrough",
            RegionKind::Open => "open",
            RegionKind::Table => "table",
            RegionKind::Comment => "comment",
        }
    }

    /// The block node, opening fence and closing fence kinds of this region.
    pub(crate) fn nodes(self) -> (NodeKind, NodeKind, NodeKind) {
        match self {
            RegionKind::Example => (
                NodeKind::ExampleBlock,
                NodeKind::ExampleOpen,
                NodeKind::ExampleClose,
            ),
            RegionKind::Listing => (
                NodeKind::ListingBlock,
                NodeKind::ListingOpen,
                NodeKind::ListingClose,
            ),
            RegionKind::Literal => (
                NodeKind::LiteralBlock,
                NodeKind::LiteralOpen,
                NodeKind::LiteralClose,
            ),
            RegionKind::Quote => (
                NodeKind::QuoteBlock,
                NodeKind::QuoteOpen,
                NodeKind::QuoteClose,
            ),
            RegionKind::Sidebar => (
                NodeKind::SidebarBlock,
                NodeKind::SidebarOpen,
                NodeKind::SidebarClose,
            ),
            RegionKind::Passthrough => (
                NodeKind::PassthroughBlock,
                NodeKind::PassthroughOpen,
                NodeKind::PassthroughClose,
            ),
            RegionKind::Open => (
                NodeKind::OpenBlock,
                NodeKind::OpenBlockOpen,
                NodeKind::OpenBlockClose,
            ),
            RegionKind::Table => (
                NodeKind::TableBlock,
                NodeKind::TableOpen,
                NodeKind::TableClose,
            ),
            RegionKind::Comment => (
                NodeKind::BlockComment,
                NodeKind::BlockCommentStart,
                NodeKind::BlockCommentEnd,
            ),
        }
    }

    fn code(self) -> u8 {
        match self {
            RegionKind::Example => 0,
            RegionKind::Listing => 1,
            RegionKind::Literal => 2,
            RegionKind::Quote => 3,
            RegionKind::Sidebar => 4,
            RegionKind::Passthrough => 5,
            RegionKind::Open => 6,
            RegionKind::Table => 7,
            RegionKind::Comment => 8,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

/// An open region: its kind and the length of its opening fence.
///
/// Tables record the number of leading pipes instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenRegion {
    pub kind: RegionKind,
    pub fence_len: usize,
}

/// Everything the scanner remembers between requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScannerState {
    stack: Vec<OpenRegion>,
    at_line_start: bool,
}

impl Default for ScannerState {
    fn default() -> Self {
        Self {
            stack: Vec::new(),
            at_line_start: true,
        }
    }
}

impl ScannerState {
    #[must_use]
    pub fn stack(&self) -> &[OpenRegion] {
        &self.stack
    }

    #[must_use]
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }
}

/// Tokens the scanner can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalToken {
    /// Opening fence. `FenceStart(RegionKind::Comment)` is the block comment start.
    FenceStart(RegionKind),
    /// Closing fence, only ever for the region on top of the stack.
    FenceEnd(RegionKind),
    /// A whole line of opaque region content, terminator included.
    ContentLine,
    ListContinuation,
    AttributeListStart,
    PlainColon,
    InlineMacroMarker,
    BlockMacroMarker,
    /// Zero-width: where a bare URL stops.
    AutolinkBoundary,
}

impl ExternalToken {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ExternalToken::FenceStart(RegionKind::Comment) => "BLOCK_COMMENT_START",
            ExternalToken::FenceEnd(RegionKind::Comment) => "BLOCK_COMMENT_END",
            ExternalToken::FenceStart(_) => "FENCE_START",
            ExternalToken::FenceEnd(_) => "FENCE_END",
            ExternalToken::ContentLine => "DELIMITED_BLOCK_CONTENT_LINE",
            ExternalToken::ListContinuation => "LIST_CONTINUATION",
            ExternalToken::AttributeListStart => "ATTRIBUTE_LIST_START",
            ExternalToken::PlainColon => "PLAIN_COLON",
            ExternalToken::InlineMacroMarker => "INLINE_MACRO_MARKER",
            ExternalToken::BlockMacroMarker => "BLOCK_MACRO_MARKER",
            ExternalToken::AutolinkBoundary => "AUTOLINK_BOUNDARY",
        }
    }
}

/// The set of token classes the caller can accept at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidTokens(u16);

impl ValidTokens {
    pub const NONE: Self = Self(0);
    pub const FENCE_START: Self = Self(1);
    pub const FENCE_END: Self = Self(1 << 1);
    pub const CONTENT_LINE: Self = Self(1 << 2);
    pub const LIST_CONTINUATION: Self = Self(1 << 3);
    pub const ATTRIBUTE_LIST_START: Self = Self(1 << 4);
    pub const PLAIN_COLON: Self = Self(1 << 5);
    pub const INLINE_MACRO_MARKER: Self = Self(1 << 6);
    pub const BLOCK_MACRO_MARKER: Self = Self(1 << 7);
    pub const AUTOLINK_BOUNDARY: Self = Self(1 << 8);

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

impl BitOr for ValidTokens {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A recognized token and the bytes it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanned {
    pub token: ExternalToken,
    pub start: usize,
    pub end: usize,
}

impl Scanned {
    fn new(token: ExternalToken, start: usize, end: usize) -> Self {
        Self { token, start, end }
    }
}

/// What a colon means, decided from the line around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColonRole {
    AttributeDelimiter,
    DescriptionMarker,
    MacroMarker,
    Plain,
}

/// The contextual scanner. One instance belongs to exactly one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scanner {
    state: ScannerState,
}

impl Scanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    /// Innermost open region.
    #[must_use]
    pub fn top(&self) -> Option<OpenRegion> {
        self.state.stack.last().copied()
    }

    #[must_use]
    pub fn snapshot(&self) -> ScannerState {
        self.state.clone()
    }

    pub fn restore(&mut self, state: ScannerState) {
        self.state = state;
    }

    /// Encode the state as bytes: the line-start flag, the stack depth, then one
    /// `(kind, fence length)` record per open region.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(5 + self.state.stack.len() * 5);
        bytes.push(u8::from(self.state.at_line_start));
        let depth = u32::try_from(self.state.stack.len()).unwrap_or(u32::MAX);
        bytes.extend_from_slice(&depth.to_le_bytes());
        for region in &self.state.stack {
            bytes.push(region.kind.code());
            let fence_len = u32::try_from(region.fence_len).unwrap_or(u32::MAX);
            bytes.extend_from_slice(&fence_len.to_le_bytes());
        }
        bytes
    }

    /// Rebuild a scanner from [`Scanner::serialize`] output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScannerState`] when the bytes are truncated, carry
    /// trailing data, or name an unknown region kind.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        fn read_u32(bytes: &[u8], at: usize) -> Result<u32, Error> {
            bytes
                .get(at..at + 4)
                .and_then(|chunk| <[u8; 4]>::try_from(chunk).ok())
                .map(u32::from_le_bytes)
                .ok_or_else(|| Error::InvalidScannerState(format!("truncated at byte {at}")))
        }

        let at_line_start = match bytes.first() {
            Some(0) => false,
            Some(1) => true,
            Some(other) => {
                return Err(Error::InvalidScannerState(format!(
                    "invalid line-start flag {other}"
                )));
            }
            None => return Err(Error::InvalidScannerState("empty state".to_string())),
        };
        let depth = read_u32(bytes, 1)? as usize;
        let expected_len = depth
            .checked_mul(5)
            .and_then(|records| records.checked_add(5))
            .ok_or_else(|| Error::InvalidScannerState(format!("depth {depth} overflows")))?;
        if bytes.len() != expected_len {
            return Err(Error::InvalidScannerState(format!(
                "expected {expected_len} bytes for depth {depth}, got {}",
                bytes.len()
            )));
        }
        let mut stack = Vec::with_capacity(depth);
        for index in 0..depth {
            let at = 5 + index * 5;
            let code = bytes.get(at).copied().unwrap_or(u8::MAX);
            let kind = RegionKind::from_code(code).ok_or_else(|| {
                Error::InvalidScannerState(format!("unknown region kind {code}"))
            })?;
            let fence_len = read_u32(bytes, at + 1)? as usize;
            stack.push(OpenRegion { kind, fence_len });
        }
        Ok(Self {
            state: ScannerState {
                stack,
                at_line_start,
            },
        })
    }

    fn is_line_start(&self, input: &str, pos: usize) -> bool {
        if pos == 0 {
            self.state.at_line_start
        } else {
            input.as_bytes().get(pos - 1) == Some(&b'\n')
        }
    }

    /// Recognize the token at `pos` without changing any state.
    #[must_use]
    pub fn peek(&self, input: &str, pos: usize, valid: ValidTokens) -> Option<Scanned> {
        if pos > input.len() || !input.is_char_boundary(pos) {
            return None;
        }
        let at_line_start = self.is_line_start(input, pos);
        let line = Line::at(input, pos);

        if at_line_start && pos < input.len() {
            let text = line.text(input);
            if let Some(top) = self.top() {
                if valid.contains(ValidTokens::FENCE_END)
                    && let Some((kind, fence_len)) = fence(text)
                    && closes(top, kind, fence_len)
                {
                    let width = fence_width(OpenRegion { kind, fence_len });
                    return Some(Scanned::new(ExternalToken::FenceEnd(kind), pos, pos + width));
                }
                if valid.contains(ValidTokens::CONTENT_LINE) {
                    return Some(Scanned::new(ExternalToken::ContentLine, pos, line.end));
                }
                return None;
            }

            if valid.contains(ValidTokens::FENCE_START)
                && let Some((kind, fence_len)) = fence(text)
            {
                let width = fence_width(OpenRegion { kind, fence_len });
                return Some(Scanned::new(ExternalToken::FenceStart(kind), pos, pos + width));
            }
            if valid.contains(ValidTokens::LIST_CONTINUATION)
                && text.trim_end_matches([' ', '\t']) == "+"
            {
                return Some(Scanned::new(ExternalToken::ListContinuation, pos, pos + 1));
            }
            if valid.contains(ValidTokens::ATTRIBUTE_LIST_START) && is_attribute_list_line(text) {
                return Some(Scanned::new(ExternalToken::AttributeListStart, pos, pos + 1));
            }
            if valid.contains(ValidTokens::BLOCK_MACRO_MARKER)
                && let Ok(shape) = line_shapes::block_macro(text)
            {
                let marker = pos + shape.name.1;
                return Some(Scanned::new(ExternalToken::BlockMacroMarker, marker, marker + 2));
            }
        }

        if valid.contains(ValidTokens::PLAIN_COLON)
            && input.as_bytes().get(pos) == Some(&b':')
            && colon_role(input, pos) == ColonRole::Plain
        {
            return Some(Scanned::new(ExternalToken::PlainColon, pos, pos + 1));
        }

        if valid.contains(ValidTokens::INLINE_MACRO_MARKER)
            && is_word_start(input, pos)
            && let Ok(shape) = line_shapes::inline_macro(slice(input, pos, line.content_end))
        {
            let marker = pos + shape.name.1;
            return Some(Scanned::new(ExternalToken::InlineMacroMarker, marker, marker + 1));
        }

        if valid.contains(ValidTokens::AUTOLINK_BOUNDARY) {
            let boundary = pos + autolink_len(slice(input, pos, line.content_end));
            if boundary > pos {
                return Some(Scanned::new(ExternalToken::AutolinkBoundary, boundary, boundary));
            }
        }

        None
    }

    /// Recognize the token at `pos` and apply its state transition.
    pub fn scan(&mut self, input: &str, pos: usize, valid: ValidTokens) -> Option<Scanned> {
        let scanned = self.peek(input, pos, valid)?;
        match scanned.token {
            ExternalToken::FenceStart(kind) => {
                let fence_len = fence(Line::at(input, pos).text(input)).map_or(0, |(_, len)| len);
                tracing::trace!(kind = kind.name(), fence_len, pos, "push region");
                self.state.stack.push(OpenRegion { kind, fence_len });
            }
            ExternalToken::FenceEnd(kind) => {
                tracing::trace!(kind = kind.name(), pos, "pop region");
                self.state.stack.pop();
            }
            ExternalToken::ContentLine
            | ExternalToken::ListContinuation
            | ExternalToken::AttributeListStart
            | ExternalToken::PlainColon
            | ExternalToken::InlineMacroMarker
            | ExternalToken::BlockMacroMarker
            | ExternalToken::AutolinkBoundary => {}
        }
        self.state.at_line_start =
            scanned.end == 0 || input.as_bytes().get(scanned.end - 1) == Some(&b'\n');
        Some(scanned)
    }

    /// Pop the innermost region at end of input.
    pub fn close_implicitly(&mut self) -> Option<OpenRegion> {
        let region = self.state.stack.pop()?;
        tracing::debug!(kind = region.kind.name(), "closing unterminated region at end of input");
        self.state.at_line_start = true;
        Some(region)
    }
}

/// Recognize a fence line: its region kind and fence length.
///
/// Fences sit at column 0 and may only be followed by spaces or tabs. Example,
/// listing, literal, quote, sidebar and passthrough fences are four or more characters,
/// the open block fence is exactly `--`, the comment fence exactly `////`, and table
/// fences are one or two pipes followed by exactly `===`.
pub(crate) fn fence(line: &str) -> Option<(RegionKind, usize)> {
    let trimmed = line.trim_end_matches([' ', '\t']);
    if trimmed == "|===" {
        return Some((RegionKind::Table, 1));
    }
    if trimmed == "||===" {
        return Some((RegionKind::Table, 2));
    }
    let first = trimmed.chars().next()?;
    if !trimmed.chars().all(|c| c == first) {
        return None;
    }
    let len = trimmed.len();
    let kind = match (first, len) {
        ('=', 4..) => RegionKind::Example,
        ('-', 2) => RegionKind::Open,
        ('-', 4..) => RegionKind::Listing,
        ('.', 4..) => RegionKind::Literal,
        ('_', 4..) => RegionKind::Quote,
        ('*', 4..) => RegionKind::Sidebar,
        ('+', 4..) => RegionKind::Passthrough,
        ('/', 4) => RegionKind::Comment,
        _ => return None,
    };
    Some((kind, len))
}

/// Whether a fence line of `kind` and `fence_len` closes `top`.
///
/// Any run of the top region's character closes it. Table fences differ in their
/// pipe count, so `||===` only closes a nested table.
fn closes(top: OpenRegion, kind: RegionKind, fence_len: usize) -> bool {
    kind == top.kind && (kind != RegionKind::Table || fence_len == top.fence_len)
}

/// Bytes covered by a fence token.
fn fence_width(region: OpenRegion) -> usize {
    match region.kind {
        RegionKind::Table => region.fence_len + 3,
        RegionKind::Example
        | RegionKind::Listing
        | RegionKind::Literal
        | RegionKind::Quote
        | RegionKind::Sidebar
        | RegionKind::Passthrough
        | RegionKind::Open
        | RegionKind::Comment => region.fence_len,
    }
}

/// A bracketed line that neither the anchor nor the id/roles shape claims.
fn is_attribute_list_line(text: &str) -> bool {
    text.starts_with('[')
        && line_shapes::block_anchor(text).is_err()
        && line_shapes::id_and_roles(text).is_err()
        && line_shapes::attribute_list(text).is_ok()
}

fn is_word_start(input: &str, pos: usize) -> bool {
    char_before(input, pos).is_none_or(|c| !c.is_alphanumeric() && c != '_')
}

/// Length of the bare URL body starting `text`.
///
/// The body stops before whitespace, brackets, angle brackets, a closing parenthesis
/// and `,;!?"'`. Trailing `.` and `:` are sentence punctuation, not part of the URL.
pub(crate) fn autolink_len(text: &str) -> usize {
    let body = text
        .find(|c: char| {
            c.is_whitespace()
                || matches!(c, '[' | ']' | '<' | '>' | ')' | ',' | ';' | '!' | '?' | '"' | '\'')
        })
        .map_or(text, |stop| slice(text, 0, stop));
    body.trim_end_matches(['.', ':']).len()
}

/// Decide what the colon at `pos` means, looking only at its own line.
#[must_use]
pub fn colon_role(input: &str, pos: usize) -> ColonRole {
    let line_start = input
        .get(..pos)
        .and_then(|head| head.rfind('\n'))
        .map_or(0, |newline| newline + 1);
    let line = Line::at(input, line_start);
    let text = line.text(input);
    let column = pos - line_start;

    if let Ok(shape) = line_shapes::attribute_entry(text) {
        let closing = slice(text, shape.name.1, text.len())
            .find(':')
            .map(|index| shape.name.1 + index);
        if column == 0 || closing == Some(column) {
            return ColonRole::AttributeDelimiter;
        }
    }

    if let Ok(shape) = line_shapes::description_item(text)
        && (shape.marker.0..shape.marker.1).contains(&column)
    {
        return ColonRole::DescriptionMarker;
    }

    if let Ok(shape) = line_shapes::block_macro(text)
        && (column == shape.name.1 || column == shape.name.1 + 1)
    {
        return ColonRole::MacroMarker;
    }

    let name_start = slice(text, 0, column)
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .last()
        .map_or(column, |(index, _)| index);
    if name_start < column
        && is_word_start(text, name_start)
        && line_shapes::inline_macro(slice(text, name_start, text.len()))
            .is_ok_and(|shape| shape.name.1 == column - name_start)
    {
        return ColonRole::MacroMarker;
    }

    ColonRole::Plain
}
