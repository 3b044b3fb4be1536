//! The block grammar.
//!
//! Blocks are recognized line by line. [`ParserState::classify`] offers the line to
//! every block rule and keeps the highest ranked candidate; the builders below then
//! consume the lines that belong to that block. Anything unclaimed is a paragraph, so
//! every line of the input ends up in exactly one block.

use crate::{
    error::Warning,
    grammar::{
        ExternalToken, ParserState, Precedence, RegionKind, Scanned, ValidTokens,
        inline::{bibliography_anchor, inline_content},
        list::ItemStart,
        line::{Line, Part, assemble, skip_blanks, tail},
        precedence::{Candidate, SectionMarker, choose, section_marker},
        shapes::{
            AttributeEntryShape, ConditionalShape, DescriptionShape, ListItemShape, line_shapes,
        },
        utf8_utils::slice,
    },
    model::{FieldName, Node, NodeKind},
};

/// What a line starts, once precedence has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BlockStart {
    Fence(RegionKind),
    Section(SectionMarker),
    AdmonitionBlock,
    MathBlock(MathNotation),
    Bibliography,
    Conditional(ConditionalShape),
    Endif,
    AttributeEntry(AttributeEntryShape),
    BlockMacro,
    LineComment,
    ThematicBreak,
    PageBreak,
    ListItem(ListItemShape),
    Description(DescriptionShape),
    Metadata,
    Paragraph,
}

/// The label line of a math block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MathNotation {
    Stem,
    Latexmath,
    Asciimath,
}

impl MathNotation {
    fn from_label(text: &str) -> Option<Self> {
        match text.trim_end_matches([' ', '\t']) {
            "[stem]" => Some(MathNotation::Stem),
            "[latexmath]" => Some(MathNotation::Latexmath),
            "[asciimath]" => Some(MathNotation::Asciimath),
            _ => None,
        }
    }

    /// Block and label kinds.
    fn nodes(self) -> (NodeKind, NodeKind) {
        match self {
            MathNotation::Stem => (NodeKind::StemBlock, NodeKind::StemBlockLabel),
            MathNotation::Latexmath => (NodeKind::LatexmathBlock, NodeKind::LatexmathBlockLabel),
            MathNotation::Asciimath => (NodeKind::AsciimathBlock, NodeKind::AsciimathBlockLabel),
        }
    }
}

/// Where the block loop currently is, and therefore which lines end it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Scope {
    /// Level of the innermost section, `None` at document level.
    section: Option<u8>,
    /// Whether section lines may open a section here at all.
    sections: bool,
    in_list: bool,
    conditionals: usize,
}

impl Scope {
    pub(crate) fn document() -> Self {
        Self {
            section: None,
            sections: true,
            in_list: false,
            conditionals: 0,
        }
    }

    /// Document level admits every level, a level-N section only N+1.
    fn admits_section(self, level: u8) -> bool {
        self.sections && self.section.is_none_or(|current| level == current + 1)
    }

    fn in_section(self, level: u8) -> Self {
        Self {
            section: Some(level),
            ..self
        }
    }

    fn in_conditional(self) -> Self {
        Self {
            conditionals: self.conditionals + 1,
            ..self
        }
    }

    pub(crate) fn in_list(self) -> Self {
        Self {
            sections: false,
            in_list: true,
            ..self
        }
    }
}

/// Leading `metadata` child of a block, if any.
pub(crate) fn open_children(metadata: Option<Node>) -> Vec<Node> {
    metadata.into_iter().collect()
}

impl ParserState<'_> {
    /// Parse top-level blocks from `start`, appending to the already reused `children`.
    #[tracing::instrument(skip_all, fields(start, reused = children.len()))]
    pub(crate) fn document(&mut self, start: usize, mut children: Vec<Node>) -> Node {
        let scope = Scope::document();
        let mut pos = start;
        while pos < self.input.len() {
            self.checkpoint(pos, children.len());
            self.last_skipped_section = None;
            let line = Line::at(self.input, pos);
            if line.is_blank(self.input) {
                children.push(Node::leaf(NodeKind::BlankLine, line.start, line.end));
                pos = line.end;
                continue;
            }
            pos = self.block(pos, scope, &mut children);
        }
        Node::branch(NodeKind::Document, children, 0)
    }

    /// Parse blocks until the input ends or a line ends `scope`.
    pub(crate) fn blocks(&mut self, mut pos: usize, scope: Scope, out: &mut Vec<Node>) -> usize {
        while pos < self.input.len() {
            let line = Line::at(self.input, pos);
            if line.is_blank(self.input) {
                out.push(Node::leaf(NodeKind::BlankLine, line.start, line.end));
                pos = line.end;
                continue;
            }
            if self.stops(pos, scope) {
                break;
            }
            pos = self.block(pos, scope, out);
        }
        pos
    }

    /// Parse the block starting at `pos`, which must not be blank.
    pub(crate) fn block(&mut self, pos: usize, scope: Scope, out: &mut Vec<Node>) -> usize {
        let line = Line::at(self.input, pos);
        match self.classify(&line) {
            BlockStart::Metadata => self.block_with_metadata(pos, scope, out),
            start => self.build(start, &line, scope, None, out),
        }
    }

    /// A block nested in a list item or continuation, guarded by the nesting limit.
    pub(crate) fn nested_block(&mut self, pos: usize, scope: Scope, out: &mut Vec<Node>) -> usize {
        if self.too_deep(pos) {
            return self.paragraph(&Line::at(self.input, pos), scope, None, out);
        }
        self.depth += 1;
        let next = self.block(pos, scope, out);
        self.depth -= 1;
        next
    }

    /// Record a warning when one more level would exceed the nesting limit.
    pub(crate) fn too_deep(&mut self, pos: usize) -> bool {
        if self.depth < self.options.max_nesting {
            return false;
        }
        let line = Line::at(self.input, pos);
        let detail = self.detail(line.start, line.content_end);
        self.warn(Warning::NestingTooDeep(detail, self.options.max_nesting));
        true
    }

    /// Lines that end `scope` without belonging to it.
    pub(crate) fn stops(&mut self, pos: usize, scope: Scope) -> bool {
        let line = Line::at(self.input, pos);
        let text = line.text(self.input);
        if scope.conditionals > 0 && line_shapes::endif(text).is_ok() {
            return true;
        }
        if scope.in_list
            && self
                .scanner
                .peek(self.input, pos, ValidTokens::LIST_CONTINUATION)
                .is_some()
        {
            return true;
        }
        let Some(marker) = section_marker(text) else {
            return false;
        };
        if scope.admits_section(marker.level) {
            return false;
        }
        if let Some(current) = scope.section
            && marker.level > current + 1
            && self.last_skipped_section != Some(pos)
        {
            self.last_skipped_section = Some(pos);
            let detail = self.detail(pos, pos + marker.marker.len());
            self.warn(Warning::SectionLevelSkipped(detail, marker.level, current + 1));
        }
        true
    }

    /// Whether the line at `pos` ends a paragraph or a run of list item text.
    pub(crate) fn interrupts(&mut self, pos: usize, scope: Scope) -> bool {
        let line = Line::at(self.input, pos);
        line.is_blank(self.input)
            || self.stops(pos, scope)
            || !matches!(
                self.classify(&line),
                BlockStart::Paragraph | BlockStart::Metadata
            )
    }

    /// Decide what `line` starts. Every matching rule is a candidate; the highest
    /// [`Precedence`] wins and a paragraph is the fallback.
    pub(crate) fn classify(&self, line: &Line) -> BlockStart {
        let text = line.text(self.input);
        let pos = line.start;
        let mut candidates = Vec::new();
        let mut offer =
            |precedence, start| candidates.push(Candidate::new(precedence, line.end, start));

        if let Some(Scanned {
            token: ExternalToken::FenceStart(kind),
            ..
        }) = self.scanner.peek(self.input, pos, ValidTokens::FENCE_START)
        {
            let precedence = match kind {
                RegionKind::Comment => Precedence::BlockComment,
                RegionKind::Table => Precedence::TableMarker,
                RegionKind::Example
                | RegionKind::Listing
                | RegionKind::Literal
                | RegionKind::Quote
                | RegionKind::Sidebar
                | RegionKind::Passthrough
                | RegionKind::Open => Precedence::Fence,
            };
            offer(precedence, BlockStart::Fence(kind));
        }
        if let Some(marker) = section_marker(text) {
            offer(marker.precedence, BlockStart::Section(marker));
        }
        if self.admonition_fence(line).is_some() {
            offer(Precedence::Admonition, BlockStart::AdmonitionBlock);
        }
        if let Some(notation) = MathNotation::from_label(text)
            && self.opens_passthrough(line.end)
        {
            offer(Precedence::MathBlock, BlockStart::MathBlock(notation));
        }
        if bibliography_anchor(self.input, pos, line.content_end).is_some() {
            offer(Precedence::Bibliography, BlockStart::Bibliography);
        }
        if let Ok(shape) = line_shapes::conditional(text) {
            offer(Precedence::Conditional, BlockStart::Conditional(shape));
        }
        if line_shapes::endif(text).is_ok() {
            offer(Precedence::Conditional, BlockStart::Endif);
        }
        if let Ok(shape) = line_shapes::attribute_entry(text) {
            offer(Precedence::AttributeEntry, BlockStart::AttributeEntry(shape));
        }
        if self
            .scanner
            .peek(self.input, pos, ValidTokens::BLOCK_MACRO_MARKER)
            .is_some()
        {
            offer(Precedence::BlockMacro, BlockStart::BlockMacro);
        }
        if text.starts_with("//") {
            offer(Precedence::LineComment, BlockStart::LineComment);
        }
        match text.trim_end_matches([' ', '\t']) {
            "'''" => offer(Precedence::Break, BlockStart::ThematicBreak),
            "<<<" => offer(Precedence::Break, BlockStart::PageBreak),
            _ => {}
        }
        if let Ok(shape) = line_shapes::list_item(text) {
            let precedence = if shape.key == "<>" {
                Precedence::CalloutMarker
            } else {
                Precedence::ListMarker
            };
            offer(precedence, BlockStart::ListItem(shape));
        }
        if let Ok(shape) = line_shapes::description_item(text) {
            offer(Precedence::DescriptionMarker, BlockStart::Description(shape));
        }
        if self.is_metadata_line(line) {
            offer(Precedence::Metadata, BlockStart::Metadata);
        }

        let chosen = choose(candidates).map_or(BlockStart::Paragraph, |candidate| candidate.value);
        tracing::trace!(pos, ?chosen, "classified line");
        chosen
    }

    fn build(
        &mut self,
        start: BlockStart,
        line: &Line,
        scope: Scope,
        metadata: Option<Node>,
        out: &mut Vec<Node>,
    ) -> usize {
        match start {
            BlockStart::Fence(_) => match self.fenced(line, metadata.clone()) {
                Some((node, next)) => {
                    out.push(node);
                    next
                }
                None => self.paragraph(line, scope, metadata, out),
            },
            BlockStart::Section(marker) if scope.admits_section(marker.level) => {
                self.section(line, marker, scope, metadata, out)
            }
            BlockStart::AdmonitionBlock => self.admonition_block(line, scope, metadata, out),
            BlockStart::MathBlock(notation) => {
                self.math_block(line, notation, scope, metadata, out)
            }
            BlockStart::Bibliography => self.bibliography_entry(line, scope, metadata, out),
            BlockStart::Conditional(shape) => self.conditional(line, &shape, scope, metadata, out),
            BlockStart::Endif => {
                out.extend(metadata);
                self.stray_endif(line, out)
            }
            BlockStart::AttributeEntry(shape) => self.attribute_entry(line, &shape, metadata, out),
            BlockStart::BlockMacro => self.block_macro(line, scope, metadata, out),
            BlockStart::LineComment => self.line_comment(line, metadata, out),
            BlockStart::ThematicBreak => {
                self.break_line(line, NodeKind::ThematicBreak, metadata, out)
            }
            BlockStart::PageBreak => self.break_line(line, NodeKind::PageBreak, metadata, out),
            BlockStart::ListItem(shape) => {
                self.list(line, ItemStart::Item(shape), scope, metadata, out)
            }
            BlockStart::Description(shape) => {
                self.list(line, ItemStart::Description(shape), scope, metadata, out)
            }
            BlockStart::Section(_) | BlockStart::Metadata | BlockStart::Paragraph => {
                self.paragraph(line, scope, metadata, out)
            }
        }
    }

    /// Collect metadata lines, then attach them to the block that follows.
    fn block_with_metadata(&mut self, pos: usize, scope: Scope, out: &mut Vec<Node>) -> usize {
        let mut lines = Vec::new();
        let mut next = pos;
        while next < self.input.len() {
            let line = Line::at(self.input, next);
            if line.is_blank(self.input) || self.stops(next, scope) {
                break;
            }
            if self.classify(&line) != BlockStart::Metadata {
                break;
            }
            lines.extend(self.metadata_line(&line));
            lines.extend(tail(self.input, &line, line.trimmed_end(self.input)));
            next = line.end;
        }
        let line = Line::at(self.input, next);
        let start = (next < self.input.len()
            && !line.is_blank(self.input)
            && !self.stops(next, scope))
        .then(|| self.classify(&line))
        .filter(|start| *start != BlockStart::Endif);
        match start {
            Some(start) => {
                let metadata =
                    Node::branch(NodeKind::Metadata, lines, pos).with_field(FieldName::Metadata);
                self.build(start, &line, scope, Some(metadata), out)
            }
            None => {
                let metadata = Node::branch(NodeKind::Metadata, lines, pos);
                let detail = self.detail(metadata.start_byte(), metadata.end_byte());
                self.warn(Warning::DetachedMetadata(detail));
                out.push(metadata);
                next
            }
        }
    }

    fn is_metadata_line(&self, line: &Line) -> bool {
        let text = line.text(self.input);
        line_shapes::block_anchor(text).is_ok()
            || line_shapes::id_and_roles(text).is_ok()
            || line_shapes::block_title(text).is_ok()
            || self
                .scanner
                .peek(self.input, line.start, ValidTokens::ATTRIBUTE_LIST_START)
                .is_some()
    }

    /// One metadata line, without its terminator.
    fn metadata_line(&self, line: &Line) -> Option<Node> {
        let text = line.text(self.input);
        let end = line.trimmed_end(self.input);
        let shaped = |kind, parts: Vec<Part>| {
            Node::branch(
                kind,
                assemble(self.input, line.start, end, line.start, &parts),
                line.start,
            )
        };

        if let Ok(parts) = line_shapes::block_anchor(text) {
            return Some(shaped(NodeKind::BlockAnchor, parts));
        }
        if let Ok(parts) = line_shapes::id_and_roles(text) {
            return Some(shaped(NodeKind::IdAndRoles, parts));
        }
        if self
            .scanner
            .peek(self.input, line.start, ValidTokens::ATTRIBUTE_LIST_START)
            .is_some()
            && let Ok(parts) = line_shapes::attribute_list(text)
        {
            return Some(shaped(NodeKind::BlockAttributes, parts));
        }
        let title_start = line.start + line_shapes::block_title(text).ok()?;
        let children = vec![
            Node::leaf(NodeKind::Punctuation, line.start, title_start),
            self.title(title_start, end),
        ];
        Some(Node::branch(NodeKind::BlockTitle, children, line.start))
    }

    /// A `title` node wrapping the inline content of `start..end`.
    fn title(&self, start: usize, end: usize) -> Node {
        let children = inline_content(self, start, end).into_iter().collect();
        Node::branch(NodeKind::Title, children, start).with_field(FieldName::Title)
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(level = marker.level, pos = line.start)
    )]
    fn section(
        &mut self,
        line: &Line,
        marker: SectionMarker,
        scope: Scope,
        metadata: Option<Node>,
        out: &mut Vec<Node>,
    ) -> usize {
        let marker_end = line.start + marker.marker.len();
        let title_start = skip_blanks(self.input, marker_end, line.content_end);
        let title_end = line.trimmed_end(self.input);

        let mut children = open_children(metadata);
        children.push(
            Node::leaf(NodeKind::SectionMarker, line.start, marker_end)
                .with_field(FieldName::Marker),
        );
        children.push(Node::leaf(NodeKind::Whitespace, marker_end, title_start));
        children.push(self.title(title_start, title_end));
        children.extend(tail(self.input, line, title_end));

        let next = self.blocks(line.end, scope.in_section(marker.level), &mut children);
        out.push(Node::branch(NodeKind::Section, children, line.start));
        next
    }

    pub(crate) fn paragraph(
        &mut self,
        line: &Line,
        scope: Scope,
        metadata: Option<Node>,
        out: &mut Vec<Node>,
    ) -> usize {
        let mut children = open_children(metadata);
        let text = line.text(self.input);
        let content_start = match line_shapes::admonition_label(text) {
            Ok(label_end) => {
                let label_end = line.start + label_end;
                let content_start = skip_blanks(self.input, label_end, line.content_end);
                children.push(
                    Node::leaf(NodeKind::AdmonitionLabel, line.start, label_end)
                        .with_field(FieldName::Label),
                );
                children.push(Node::leaf(NodeKind::Whitespace, label_end, content_start));
                content_start
            }
            Err(_) => line.start,
        };
        children.extend(self.content_line(content_start, line));

        let mut next = line.end;
        while next < self.input.len() && !self.interrupts(next, scope) {
            let line = Line::at(self.input, next);
            children.extend(self.content_line(line.start, &line));
            next = line.end;
        }
        out.push(Node::branch(NodeKind::Paragraph, children, line.start));
        next
    }

    /// Inline content from `start` to the end of `line`, then its terminator.
    pub(crate) fn content_line(&self, start: usize, line: &Line) -> Vec<Node> {
        let mut nodes: Vec<Node> = inline_content(self, start, line.content_end)
            .map(|node| node.with_field(FieldName::Content))
            .into_iter()
            .collect();
        nodes.extend(tail(self.input, line, line.content_end));
        nodes
    }

    /// The fence line of an admonition block: `[NOTE]`, optional blank lines, then a
    /// delimited block fence.
    fn admonition_fence(&self, line: &Line) -> Option<usize> {
        line_shapes::admonition_tag(line.text(self.input)).ok()?;
        let mut next = line.end;
        while next < self.input.len() {
            let candidate = Line::at(self.input, next);
            if !candidate.is_blank(self.input) {
                return match self.scanner.peek(self.input, next, ValidTokens::FENCE_START)?.token {
                    ExternalToken::FenceStart(RegionKind::Table | RegionKind::Comment) => None,
                    ExternalToken::FenceStart(_) => Some(next),
                    ExternalToken::FenceEnd(_)
                    | ExternalToken::ContentLine
                    | ExternalToken::ListContinuation
                    | ExternalToken::AttributeListStart
                    | ExternalToken::PlainColon
                    | ExternalToken::InlineMacroMarker
                    | ExternalToken::BlockMacroMarker
                    | ExternalToken::AutolinkBoundary => None,
                };
            }
            next = candidate.end;
        }
        None
    }

    fn admonition_block(
        &mut self,
        line: &Line,
        scope: Scope,
        metadata: Option<Node>,
        out: &mut Vec<Node>,
    ) -> usize {
        let Some(fence_pos) = self.admonition_fence(line) else {
            return self.paragraph(line, scope, metadata, out);
        };
        let tag_end = line.start + line_shapes::admonition_tag(line.text(self.input)).unwrap_or(0);
        let parts = [Part::new(
            NodeKind::AdmonitionLabel,
            Some(FieldName::Label),
            1,
            tag_end - line.start - 1,
        )];
        let mut children = open_children(metadata);
        children.extend(assemble(self.input, line.start, tag_end, line.start, &parts));
        children.extend(tail(self.input, line, tag_end));

        let mut next = line.end;
        while next < fence_pos {
            let blank = Line::at(self.input, next);
            children.push(Node::leaf(NodeKind::BlankLine, blank.start, blank.end));
            next = blank.end;
        }
        if let Some((block, block_end)) = self.fenced(&Line::at(self.input, fence_pos), None) {
            children.push(block.with_field(FieldName::Content));
            next = block_end;
        }
        out.push(Node::branch(NodeKind::AdmonitionBlock, children, line.start));
        next
    }

    /// Whether a passthrough fence opens at `pos`.
    fn opens_passthrough(&self, pos: usize) -> bool {
        pos < self.input.len()
            && self
                .scanner
                .peek(self.input, pos, ValidTokens::FENCE_START)
                .is_some_and(|scanned| {
                    scanned.token == ExternalToken::FenceStart(RegionKind::Passthrough)
                })
    }

    /// `[stem]`, `[latexmath]` or `[asciimath]` directly followed by a passthrough fence.
    fn math_block(
        &mut self,
        line: &Line,
        notation: MathNotation,
        scope: Scope,
        metadata: Option<Node>,
        out: &mut Vec<Node>,
    ) -> usize {
        let (block_kind, label_kind) = notation.nodes();
        let label_end = line.trimmed_end(self.input);
        let mut children = open_children(metadata.clone());
        children.push(Node::leaf(label_kind, line.start, label_end).with_field(FieldName::Label));
        children.extend(tail(self.input, line, label_end));
        match self.fenced_as(&Line::at(self.input, line.end), children, Some(block_kind)) {
            Some((block, next)) => {
                out.push(block);
                next
            }
            None => self.paragraph(line, scope, metadata, out),
        }
    }

    /// `[[[id,citation]]] description` on a line of its own.
    fn bibliography_entry(
        &mut self,
        line: &Line,
        scope: Scope,
        metadata: Option<Node>,
        out: &mut Vec<Node>,
    ) -> usize {
        let Some((anchor, anchor_end)) =
            bibliography_anchor(self.input, line.start, line.content_end)
        else {
            return self.paragraph(line, scope, metadata, out);
        };
        let mut children = open_children(metadata);
        children.push(anchor.with_field(FieldName::Anchor));
        let text_start = skip_blanks(self.input, anchor_end, line.content_end);
        if text_start < line.content_end {
            if text_start > anchor_end {
                children.push(Node::leaf(NodeKind::Whitespace, anchor_end, text_start));
            }
            children.extend(self.content_line(text_start, line));
        } else {
            children.extend(tail(self.input, line, anchor_end));
        }
        out.push(Node::branch(NodeKind::BibliographyEntry, children, line.start));
        line.end
    }

    #[tracing::instrument(level = "debug", skip_all, fields(pos = line.start))]
    fn conditional(
        &mut self,
        line: &Line,
        shape: &ConditionalShape,
        scope: Scope,
        metadata: Option<Node>,
        out: &mut Vec<Node>,
    ) -> usize {
        if self.too_deep(line.start) {
            return self.paragraph(line, scope, metadata, out);
        }
        let directive_end = line.start + shape.end;
        let mut children = open_children(metadata);
        children.push(
            Node::leaf(shape.kind.directive_node(), line.start, directive_end)
                .with_field(FieldName::Directive),
        );
        children.extend(tail(self.input, line, directive_end));

        let mut next = line.end;
        if !shape.single_line {
            self.depth += 1;
            next = self.blocks(next, scope.in_conditional(), &mut children);
            self.depth -= 1;

            let end_line = Line::at(self.input, next);
            match line_shapes::endif(end_line.text(self.input)) {
                Ok(end) if next < self.input.len() => {
                    let end = end_line.start + end;
                    children.push(
                        Node::leaf(NodeKind::EndifDirective, end_line.start, end)
                            .with_field(FieldName::End),
                    );
                    children.extend(tail(self.input, &end_line, end));
                    next = end_line.end;
                }
                Ok(_) | Err(_) => {
                    let detail = self.detail(line.start, directive_end);
                    self.warn(Warning::MissingEndif(detail));
                }
            }
        }
        out.push(Node::branch(NodeKind::ConditionalBlock, children, line.start));
        next
    }

    fn stray_endif(&mut self, line: &Line, out: &mut Vec<Node>) -> usize {
        let end = line.start + line_shapes::endif(line.text(self.input)).unwrap_or(0);
        let detail = self.detail(line.start, end);
        self.warn(Warning::UnmatchedEndif(detail));
        out.push(Node::leaf(NodeKind::EndifDirective, line.start, end));
        out.extend(tail(self.input, line, end));
        line.end
    }

    fn attribute_entry(
        &mut self,
        line: &Line,
        shape: &AttributeEntryShape,
        metadata: Option<Node>,
        out: &mut Vec<Node>,
    ) -> usize {
        let value_end = line.trimmed_end(self.input);
        let mut parts = vec![Part::new(
            NodeKind::AttributeName,
            Some(FieldName::Name),
            shape.name.0,
            shape.name.1,
        )];
        parts.extend(shape.value_start.map(|start| {
            Part::new(
                NodeKind::AttributeValue,
                Some(FieldName::Value),
                start,
                value_end - line.start,
            )
        }));
        let mut children = open_children(metadata);
        children.extend(assemble(self.input, line.start, value_end, line.start, &parts));
        children.extend(tail(self.input, line, value_end));

        let mut next = line.end;
        let mut continued =
            shape.value_start.is_some() && continues(slice(self.input, line.start, value_end));
        while continued && next < self.input.len() {
            let line = Line::at(self.input, next);
            if line.is_blank(self.input) {
                break;
            }
            let end = line.trimmed_end(self.input);
            let text = slice(self.input, line.start, end);
            let part = Part::new(
                NodeKind::AttributeValue,
                Some(FieldName::Value),
                skip_blanks(self.input, line.start, end) - line.start,
                end - line.start,
            );
            children.extend(assemble(self.input, line.start, end, line.start, &[part]));
            children.extend(tail(self.input, &line, end));
            continued = continues(text);
            next = line.end;
        }
        out.push(Node::branch(NodeKind::AttributeEntry, children, line.start));
        next
    }

    fn block_macro(
        &mut self,
        line: &Line,
        scope: Scope,
        metadata: Option<Node>,
        out: &mut Vec<Node>,
    ) -> usize {
        let text = line.text(self.input);
        let (Some(marker), Ok(shape)) = (
            self.scanner
                .peek(self.input, line.start, ValidTokens::BLOCK_MACRO_MARKER),
            line_shapes::block_macro(text),
        ) else {
            return self.paragraph(line, scope, metadata, out);
        };
        let parts = [
            Part::new(NodeKind::MacroName, Some(FieldName::Name), shape.name.0, shape.name.1),
            Part::new(
                NodeKind::MacroMarker,
                None,
                marker.start - line.start,
                marker.end - line.start,
            ),
            Part::new(
                NodeKind::MacroTarget,
                Some(FieldName::Target),
                shape.target.0,
                shape.target.1,
            ),
            Part::new(NodeKind::MacroBody, Some(FieldName::Body), shape.body.0, shape.body.1),
        ];
        let end = line.start + shape.end;
        let mut children = open_children(metadata);
        children.extend(assemble(self.input, line.start, end, line.start, &parts));
        children.extend(tail(self.input, line, end));
        out.push(Node::branch(NodeKind::BlockMacro, children, line.start));
        line.end
    }

    fn line_comment(&mut self, line: &Line, metadata: Option<Node>, out: &mut Vec<Node>) -> usize {
        let marker_end = line.start + 2;
        let mut children = open_children(metadata);
        children.push(Node::leaf(NodeKind::Punctuation, line.start, marker_end));
        if marker_end < line.content_end {
            children.push(
                Node::leaf(NodeKind::Text, marker_end, line.content_end)
                    .with_field(FieldName::Text),
            );
        }
        children.extend(tail(self.input, line, line.content_end));
        out.push(Node::branch(NodeKind::LineComment, children, line.start));
        line.end
    }

    fn break_line(
        &mut self,
        line: &Line,
        kind: NodeKind,
        metadata: Option<Node>,
        out: &mut Vec<Node>,
    ) -> usize {
        let end = line.trimmed_end(self.input);
        let mut children = open_children(metadata);
        children.push(Node::leaf(NodeKind::Punctuation, line.start, end));
        children.extend(tail(self.input, line, end));
        out.push(Node::branch(kind, children, line.start));
        line.end
    }
}

/// A value line ending in ` \` continues on the next line.
fn continues(text: &str) -> bool {
    text.ends_with(" \\")
}
