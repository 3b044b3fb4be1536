//! The inline grammar.
//!
//! Every position of an inline run is offered to the rules that can start with the
//! character found there. The candidates are ranked with [`Precedence`]; the two
//! designated choice points (explicit vs. bare link, double vs. single delimiter) use
//! [`longest_match`] first. Anything no rule claims becomes plain text, and special
//! characters nothing claims become single-character leaves, so every byte of the run
//! ends up in exactly one leaf.

use crate::{
    grammar::{
        ParserState, Precedence, Scanner, ValidTokens,
        line::{Part, assemble},
        precedence::{Candidate, choose, longest_match},
        shapes::line_shapes,
        utf8_utils::{char_at, char_before, slice},
    },
    model::{FieldName, Node, NodeKind},
};

/// Formatting kinds already open around the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Formats(u8);

impl Formats {
    const NONE: Self = Self(0);
    const STRONG: Self = Self(1);
    const EMPHASIS: Self = Self(1 << 1);
    const MONOSPACE: Self = Self(1 << 2);
    const SUPERSCRIPT: Self = Self(1 << 3);
    const SUBSCRIPT: Self = Self(1 << 4);
    const ROLE: Self = Self(1 << 5);

    fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    fn contains(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

#[derive(Debug, Clone, Copy)]
struct Delimiter {
    mark: &'static str,
    double: Option<&'static str>,
    kind: NodeKind,
    flag: Formats,
    precedence: Precedence,
}

const DELIMITERS: [Delimiter; 5] = [
    Delimiter {
        mark: "*",
        double: Some("**"),
        kind: NodeKind::Strong,
        flag: Formats::STRONG,
        precedence: Precedence::Strong,
    },
    Delimiter {
        mark: "_",
        double: Some("__"),
        kind: NodeKind::Emphasis,
        flag: Formats::EMPHASIS,
        precedence: Precedence::Emphasis,
    },
    Delimiter {
        mark: "`",
        double: Some("``"),
        kind: NodeKind::Monospace,
        flag: Formats::MONOSPACE,
        precedence: Precedence::Monospace,
    },
    Delimiter {
        mark: "^",
        double: None,
        kind: NodeKind::Superscript,
        flag: Formats::SUPERSCRIPT,
        precedence: Precedence::Superscript,
    },
    Delimiter {
        mark: "~",
        double: None,
        kind: NodeKind::Subscript,
        flag: Formats::SUBSCRIPT,
        precedence: Precedence::Subscript,
    },
];

const URL_SCHEMES: [&str; 4] = ["https://", "http://", "ftp://", "irc://"];

/// Characters that never join a plain text run.
fn is_special(c: char) -> bool {
    matches!(
        c,
        '*'
            | '_'
            | '`'
            | '^'
            | '~'
            | '+'
            | '['
            | ']'
            | '{'
            | '}'
            | '<'
            | '>'
            | '('
            | ')'
            | ':'
            | '#'
    )
}

fn macro_kind(name: &str) -> NodeKind {
    match name {
        "link" | "mailto" => NodeKind::LinkMacro,
        "image" => NodeKind::Image,
        "footnote" | "footnoteref" => NodeKind::Footnote,
        "indexterm" | "indexterm2" => NodeKind::IndexTerm,
        "pass" => NodeKind::PassMacro,
        "kbd" | "btn" | "menu" => NodeKind::UiMacro,
        "stem" | "latexmath" | "asciimath" => NodeKind::MathMacro,
        "xref" => NodeKind::ExternalXref,
        _ => NodeKind::InlineMacro,
    }
}

/// A raw span of `len` bytes between two `width`-byte delimiters.
fn passthrough_span(pos: usize, width: usize, len: usize, kind: NodeKind) -> Candidate<Node> {
    let content_start = pos + width;
    let content_end = content_start + len;
    let mut children = vec![Node::leaf(NodeKind::Delimiter, pos, content_start)];
    if content_start < content_end {
        children.push(
            Node::leaf(NodeKind::PassthroughText, content_start, content_end)
                .with_field(FieldName::Text),
        );
    }
    children.push(Node::leaf(NodeKind::Delimiter, content_end, content_end + width));
    Candidate::new(
        Precedence::Passthrough,
        content_end + width,
        Node::branch(kind, children, pos),
    )
}

/// `[[[id]]]` or `[[[id,citation]]]` at `pos`, and where it ends.
pub(crate) fn bibliography_anchor(input: &str, pos: usize, end: usize) -> Option<(Node, usize)> {
    let (parts, len) = line_shapes::bibliography_anchor(slice(input, pos, end)).ok()?;
    let children = assemble(input, pos, pos + len, pos, &parts);
    Some((Node::branch(NodeKind::BibliographyAnchor, children, pos), pos + len))
}

/// Tokenize `start..end` into an `inline_content` node. Empty runs yield nothing.
pub(crate) fn inline_content(state: &ParserState<'_>, start: usize, end: usize) -> Option<Node> {
    if start >= end {
        return None;
    }
    let children = if state.options.inline {
        InlineParser::new(state.input, &state.scanner).inlines(start, end, Formats::NONE)
    } else {
        vec![Node::leaf(NodeKind::Text, start, end)]
    };
    Some(Node::branch(NodeKind::InlineContent, children, start))
}

struct InlineParser<'a> {
    input: &'a str,
    scanner: &'a Scanner,
}

impl<'a> InlineParser<'a> {
    fn new(input: &'a str, scanner: &'a Scanner) -> Self {
        Self { input, scanner }
    }

    fn text(&self, start: usize, end: usize) -> &'a str {
        slice(self.input, start, end)
    }

    #[tracing::instrument(level = "trace", skip(self))]
    fn inlines(&self, start: usize, end: usize, excluded: Formats) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut text_start = None;
        let mut pos = start;
        while pos < end {
            let Some(c) = char_at(self.input, pos) else {
                break;
            };
            if let Some(candidate) = self.candidate(pos, end, c, excluded) {
                if let Some(run) = text_start.take() {
                    nodes.push(Node::leaf(NodeKind::Text, run, pos));
                }
                pos = candidate.end;
                nodes.push(candidate.value);
                continue;
            }
            let next = pos + c.len_utf8();
            if is_special(c) {
                if let Some(run) = text_start.take() {
                    nodes.push(Node::leaf(NodeKind::Text, run, pos));
                }
                let kind = if c == ':'
                    && self
                        .scanner
                        .peek(self.bounded(end), pos, ValidTokens::PLAIN_COLON)
                        .is_some()
                {
                    NodeKind::TextColon
                } else {
                    NodeKind::TextChar
                };
                nodes.push(Node::leaf(kind, pos, next));
            } else {
                text_start.get_or_insert(pos);
            }
            pos = next;
        }
        if let Some(run) = text_start {
            nodes.push(Node::leaf(NodeKind::Text, run, end));
        }
        nodes
    }

    /// The input cut at the end of the current run, so scanner lookahead stays inside it.
    fn bounded(&self, end: usize) -> &'a str {
        slice(self.input, 0, end)
    }

    fn candidate(
        &self,
        pos: usize,
        end: usize,
        c: char,
        excluded: Formats,
    ) -> Option<Candidate<Node>> {
        let candidate = match c {
            '*' | '_' | '`' | '^' | '~' => DELIMITERS
                .iter()
                .find(|delimiter| delimiter.mark.starts_with(c))
                .and_then(|delimiter| self.formatting(pos, end, delimiter, excluded)),
            '+' => self.passthrough(pos, end),
            ' ' => self.line_break(pos, end),
            '[' => choose(
                [
                    self.bibliography_anchor(pos, end),
                    self.inline_anchor(pos, end),
                    self.role_span(pos, end, excluded),
                ]
                .into_iter()
                .flatten(),
            ),
            '{' => self.attribute_reference(pos, end),
            '<' => self.internal_xref(pos, end),
            '(' => self.index_term(pos, end),
            c if c.is_ascii_alphabetic() && self.is_word_start(pos) => choose(
                [self.link(pos, end), self.inline_macro(pos, end)]
                    .into_iter()
                    .flatten(),
            ),
            _ => None,
        };
        candidate.filter(|candidate| candidate.end > pos && candidate.end <= end)
    }

    fn is_word_start(&self, pos: usize) -> bool {
        char_before(self.input, pos).is_none_or(|c| !c.is_alphanumeric() && c != '_')
    }

    fn formatting(
        &self,
        pos: usize,
        end: usize,
        delimiter: &Delimiter,
        excluded: Formats,
    ) -> Option<Candidate<Node>> {
        if excluded.contains(delimiter.flag) {
            return None;
        }
        let double = delimiter.double.and_then(|mark| {
            self.delimited_span(pos, end, mark, delimiter, Precedence::DoubleDelimiter, excluded)
        });
        let single = self.delimited_span(
            pos,
            end,
            delimiter.mark,
            delimiter,
            delimiter.precedence,
            excluded,
        );
        longest_match([double, single])
    }

    fn delimited_span(
        &self,
        pos: usize,
        end: usize,
        mark: &str,
        delimiter: &Delimiter,
        precedence: Precedence,
        excluded: Formats,
    ) -> Option<Candidate<Node>> {
        let rest = self.text(pos, end);
        let after_open = rest.strip_prefix(mark)?;
        let content_start = pos + mark.len();
        // A single delimiter's content cannot start with the delimiter itself.
        if after_open.starts_with(delimiter.mark) && mark.len() == 1 {
            return None;
        }
        let close = after_open.find(mark)?;
        if close == 0 {
            return None;
        }
        let content_end = content_start + close;
        let close_end = content_end + mark.len();

        let mut children = vec![Node::leaf(NodeKind::Delimiter, pos, content_start)];
        children.extend(self.inlines(content_start, content_end, excluded.with(delimiter.flag)));
        children.push(Node::leaf(NodeKind::Delimiter, content_end, close_end));
        Some(Candidate::new(
            precedence,
            close_end,
            Node::branch(delimiter.kind, children, pos),
        ))
    }

    /// `+++raw+++`, or the single-plus form `+raw+`.
    fn passthrough(&self, pos: usize, end: usize) -> Option<Candidate<Node>> {
        let rest = self.text(pos, end);
        if let Some(after_open) = rest.strip_prefix("+++") {
            let close = after_open.find("+++")?;
            return Some(passthrough_span(pos, 3, close, NodeKind::Passthrough));
        }
        let after_open = rest.strip_prefix('+')?;
        if after_open.starts_with(|c: char| c.is_whitespace() || c == '+') {
            return None;
        }
        let close = after_open.find('+')?;
        Some(passthrough_span(pos, 1, close, NodeKind::UnconstrainedPassthrough))
    }

    /// ` +` ending the run.
    fn line_break(&self, pos: usize, end: usize) -> Option<Candidate<Node>> {
        (self.text(pos, end) == " +").then(|| {
            Candidate::new(
                Precedence::LineBreak,
                end,
                Node::leaf(NodeKind::LineBreak, pos, end),
            )
        })
    }

    fn inline_anchor(&self, pos: usize, end: usize) -> Option<Candidate<Node>> {
        let (parts, len) = line_shapes::inline_anchor(self.text(pos, end)).ok()?;
        let children = assemble(self.input, pos, pos + len, pos, &parts);
        Some(Candidate::new(
            Precedence::Reference,
            pos + len,
            Node::branch(NodeKind::InlineAnchor, children, pos),
        ))
    }

    fn bibliography_anchor(&self, pos: usize, end: usize) -> Option<Candidate<Node>> {
        let (node, anchor_end) = bibliography_anchor(self.input, pos, end)?;
        Some(Candidate::new(Precedence::Reference, anchor_end, node))
    }

    /// `[role]#text#`.
    fn role_span(&self, pos: usize, end: usize, excluded: Formats) -> Option<Candidate<Node>> {
        if excluded.contains(Formats::ROLE) {
            return None;
        }
        let rest = self.text(pos, end);
        let open = if rest.starts_with("[.") { 2 } else { 1 };
        let role_len = rest
            .get(open..)?
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-')))?;
        if role_len == 0 || rest.get(open + role_len..)?.strip_prefix("]#").is_none() {
            return None;
        }
        let role_start = pos + open;
        let role_end = role_start + role_len;
        let content_start = role_end + 2;
        let close = self.text(content_start, end).find('#')?;
        if close == 0 {
            return None;
        }
        let content_end = content_start + close;

        let mut children = vec![
            Node::leaf(NodeKind::Punctuation, pos, role_start),
            Node::leaf(NodeKind::Role, role_start, role_end).with_field(FieldName::Role),
            Node::leaf(NodeKind::Punctuation, role_end, role_end + 1),
            Node::leaf(NodeKind::Delimiter, role_end + 1, content_start),
        ];
        children.extend(self.inlines(content_start, content_end, excluded.with(Formats::ROLE)));
        children.push(Node::leaf(NodeKind::Delimiter, content_end, content_end + 1));
        Some(Candidate::new(
            Precedence::RoleSpan,
            content_end + 1,
            Node::branch(NodeKind::RoleSpan, children, pos),
        ))
    }

    /// `{name}`, kept opaque.
    fn attribute_reference(&self, pos: usize, end: usize) -> Option<Candidate<Node>> {
        let body = self.text(pos, end).strip_prefix('{')?;
        let close = body.find('}')?;
        let name = body.get(..close)?;
        let mut chars = name.chars();
        let valid = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| {
            let end = pos + close + 2;
            Candidate::new(
                Precedence::Reference,
                end,
                Node::leaf(NodeKind::AttributeReference, pos, end),
            )
        })
    }

    /// `<<id>>` or `<<id,text>>`, kept opaque.
    fn internal_xref(&self, pos: usize, end: usize) -> Option<Candidate<Node>> {
        let body = self.text(pos, end).strip_prefix("<<")?;
        let close = body.find(">>")?;
        let inner = body.get(..close)?;
        let target = inner.split(',').next().unwrap_or_default();
        let mut chars = target.chars();
        let valid = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| {
                c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '#' | '/' | ':')
            })
            && !inner.contains(['<', '>']);
        valid.then(|| {
            let end = pos + close + 4;
            Candidate::new(
                Precedence::Reference,
                end,
                Node::leaf(NodeKind::InternalXref, pos, end),
            )
        })
    }

    /// `(((primary, secondary)))` or `((visible term))`.
    fn index_term(&self, pos: usize, end: usize) -> Option<Candidate<Node>> {
        let rest = self.text(pos, end);
        [("(((", ")))"), ("((", "))")]
            .into_iter()
            .find_map(|(open, close)| {
                let body = rest.strip_prefix(open)?;
                let len = body.find(close)?;
                let terms = body.get(..len)?;
                if terms.is_empty() || terms.contains(['(', ')']) {
                    return None;
                }
                Some((open.len(), len))
            })
            .map(|(width, len)| {
                let text_start = pos + width;
                let text_end = text_start + len;
                let end = text_end + width;
                let children = vec![
                    Node::leaf(NodeKind::Punctuation, pos, text_start),
                    Node::leaf(NodeKind::IndexText, text_start, text_end)
                        .with_field(FieldName::Text),
                    Node::leaf(NodeKind::Punctuation, text_end, end),
                ];
                Candidate::new(
                    Precedence::IndexTerm,
                    end,
                    Node::branch(NodeKind::IndexTerm, children, pos),
                )
            })
    }

    /// A bare URL, or a URL followed by `[text]`, whichever consumes more.
    fn link(&self, pos: usize, end: usize) -> Option<Candidate<Node>> {
        let rest = self.text(pos, end);
        let scheme = URL_SCHEMES.iter().find(|scheme| rest.starts_with(**scheme))?;
        let boundary = self
            .scanner
            .peek(self.bounded(end), pos, ValidTokens::AUTOLINK_BOUNDARY)?
            .start;
        if boundary <= pos + scheme.len() {
            return None;
        }
        let auto = Candidate::new(
            Precedence::AutoLink,
            boundary,
            Node::leaf(NodeKind::AutoLink, pos, boundary),
        );

        let explicit = self
            .text(boundary, end)
            .strip_prefix('[')
            .and_then(|payload| payload.find(']'))
            .map(|close| {
                let text_start = boundary + 1;
                let text_end = text_start + close;
                let mut children = vec![
                    Node::leaf(NodeKind::AutoLink, pos, boundary).with_field(FieldName::Url),
                    Node::leaf(NodeKind::Punctuation, boundary, text_start),
                ];
                if text_start < text_end {
                    children.push(
                        Node::leaf(NodeKind::LinkText, text_start, text_end)
                            .with_field(FieldName::Text),
                    );
                }
                children.push(Node::leaf(NodeKind::Punctuation, text_end, text_end + 1));
                Candidate::new(
                    Precedence::ExplicitLink,
                    text_end + 1,
                    Node::branch(NodeKind::Link, children, pos),
                )
            });

        longest_match([explicit, Some(auto)])
    }

    /// `name:target[body]`, once the scanner confirms an inline macro marker here.
    fn inline_macro(&self, pos: usize, end: usize) -> Option<Candidate<Node>> {
        let marker = self
            .scanner
            .peek(self.bounded(end), pos, ValidTokens::INLINE_MACRO_MARKER)?;
        let shape = line_shapes::inline_macro(self.text(pos, end)).ok()?;
        let name = self.text(pos + shape.name.0, pos + shape.name.1);
        let kind = macro_kind(name);
        let macro_end = pos + shape.end;

        if kind == NodeKind::ExternalXref {
            return Some(Candidate::new(
                Precedence::InlineMacro,
                macro_end,
                Node::leaf(kind, pos, macro_end),
            ));
        }

        let parts = [
            Part::new(NodeKind::MacroName, Some(FieldName::Name), shape.name.0, shape.name.1),
            Part::new(
                NodeKind::MacroMarker,
                None,
                marker.start - pos,
                marker.end - pos,
            ),
            Part::new(
                NodeKind::MacroTarget,
                Some(FieldName::Target),
                shape.target.0,
                shape.target.1,
            ),
            Part::new(NodeKind::MacroBody, Some(FieldName::Body), shape.body.0, shape.body.1),
        ];
        let children = assemble(self.input, pos, macro_end, pos, &parts);
        Some(Candidate::new(
            Precedence::InlineMacro,
            macro_end,
            Node::branch(kind, children, pos),
        ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{Options, model::tree::to_sexp};

    fn sexp(input: &str) -> String {
        let options = Options::default();
        let state = ParserState::new(input, &options);
        inline_content(&state, 0, input.len()).map_or_else(String::new, |node| to_sexp(&node))
    }

    fn leaves(input: &str) -> Vec<(&'static str, String)> {
        let options = Options::default();
        let state = ParserState::new(input, &options);
        inline_content(&state, 0, input.len())
            .map(|node| {
                node.leaves()
                    .map(|leaf| {
                        let text = slice(input, leaf.start_byte(), leaf.end_byte());
                        (leaf.kind_name(), text.to_string())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    #[tracing_test::traced_test]
    fn double_delimiter_wins() {
        assert_eq!(sexp("**bold**"), "(inline_content (strong (text)))");
        assert_eq!(
            leaves("**bold**"),
            vec![
                ("delimiter", "**".to_string()),
                ("text", "bold".to_string()),
                ("delimiter", "**".to_string()),
            ]
        );
    }

    #[test]
    fn single_spans_left_to_right() {
        assert_eq!(
            sexp("*a*b*c*"),
            "(inline_content (strong (text)) (text) (strong (text)))"
        );
    }

    #[test]
    fn same_kind_does_not_nest() {
        // The inner `_` pair cannot open inside emphasis, so it stays plain.
        assert_eq!(
            sexp("__a _b_ c__"),
            "(inline_content (emphasis (text) (text_char) (text) (text_char) (text)))"
        );
    }

    #[test]
    fn cross_kind_nesting() {
        assert_eq!(
            sexp("*bold _it_ `code`*"),
            "(inline_content (strong (text) (emphasis (text)) (text) (monospace (text))))"
        );
        assert_eq!(
            sexp("E=mc^2^ H~2~O"),
            "(inline_content (text) (superscript (text)) (text) (subscript (text)) (text))"
        );
    }

    #[test]
    fn explicit_link_beats_bare_url() {
        assert_eq!(
            sexp("http://x.com[text]"),
            "(inline_content (link url: (auto_link) text: (link_text)))"
        );
        assert_eq!(
            sexp("see http://x.com."),
            "(inline_content (text) (auto_link) (text))"
        );
    }

    #[rstest]
    #[case("image:logo.png[Logo]", "(inline_content (image name: (macro_name) target: (macro_target) body: (macro_body)))")]
    #[case("kbd:[Ctrl+T]", "(inline_content (ui_macro name: (macro_name) body: (macro_body)))")]
    #[case("footnote:[A note.]", "(inline_content (footnote name: (macro_name) body: (macro_body)))")]
    #[case("xref:other.adoc[Other]", "(inline_content (external_xref))")]
    #[case("pass:[<u>x</u>]", "(inline_content (pass_macro name: (macro_name) body: (macro_body)))")]
    #[case("stem:[sqrt(4)]", "(inline_content (math_macro name: (macro_name) body: (macro_body)))")]
    #[case("indexterm:[Tigers,Big cats]", "(inline_content (index_term name: (macro_name) body: (macro_body)))")]
    #[case("link:index.html[Docs]", "(inline_content (link_macro name: (macro_name) target: (macro_target) body: (macro_body)))")]
    #[case("custom:target[]", "(inline_content (inline_macro name: (macro_name) target: (macro_target)))")]
    fn macros(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sexp(input), expected);
    }

    #[test]
    fn macro_leaves_cover_the_macro() {
        assert_eq!(
            leaves("kbd:[F1]"),
            vec![
                ("macro_name", "kbd".to_string()),
                ("macro_marker", ":".to_string()),
                ("punctuation", "[".to_string()),
                ("macro_body", "F1".to_string()),
                ("punctuation", "]".to_string()),
            ]
        );
    }

    #[rstest]
    #[case("{version}", "(inline_content (attribute_reference))")]
    #[case("<<intro>>", "(inline_content (internal_xref))")]
    #[case("<<intro,the intro>>", "(inline_content (internal_xref))")]
    #[case("[[here]]", "(inline_content (inline_anchor id: (id)))")]
    #[case("[[here,Here]]", "(inline_content (inline_anchor id: (id) text: (anchor_text)))")]
    #[case("((Tigers))", "(inline_content (index_term text: (index_text)))")]
    #[case("(((Big cats,Tigers)))", "(inline_content (index_term text: (index_text)))")]
    #[case("+++<b>raw</b>+++", "(inline_content (passthrough text: (passthrough_text)))")]
    #[case("[.underline]#text#", "(inline_content (role_span role: (role) (text)))")]
    #[case("[[[bib1]]] Author", "(inline_content (bibliography_anchor id: (bibliography_id)) (text))")]
    #[case("[[[pp,Hunt 1999]]]", "(inline_content (bibliography_anchor id: (bibliography_id) citation: (bibliography_citation)))")]
    fn references_and_spans(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sexp(input), expected);
    }

    #[test]
    fn references_are_opaque() {
        assert_eq!(leaves("<<a_b_c>>").len(), 1);
        assert_eq!(leaves("{a_b_c}").len(), 1);
        // Not a valid attribute name, so the braces are plain characters.
        assert_eq!(
            sexp("{a*b*}"),
            "(inline_content (text_char) (text) (strong (text)) (text_char))"
        );
    }

    #[test]
    fn colons_and_catch_all() {
        assert_eq!(
            sexp("Time: 10:30 <x> ]"),
            "(inline_content (text) (text_colon) (text) (text_colon) (text) (text_char) (text) (text_char) (text) (text_char))"
        );
    }

    #[rstest]
    #[case("a +x+ b", "(inline_content (text) (unconstrained_passthrough text: (passthrough_text)) (text))")]
    #[case("+{attr} *raw*+", "(inline_content (unconstrained_passthrough text: (passthrough_text)))")]
    #[case("a + b+", "(inline_content (text) (text_char) (text) (text_char))")]
    #[case("C++ is", "(inline_content (text) (text_char) (text_char) (text))")]
    fn single_plus_passthrough(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sexp(input), expected);
    }

    #[test]
    fn hard_line_break() {
        assert_eq!(sexp("first +"), "(inline_content (text) (line_break))");
        assert_eq!(sexp("a + b"), "(inline_content (text) (text_char) (text))");
    }

    #[test]
    fn bounded_url_inside_strong() {
        assert_eq!(
            sexp("*see http://x.com*"),
            "(inline_content (strong (text) (auto_link)))"
        );
    }

    #[test]
    fn unicode_text_runs() {
        assert_eq!(
            leaves("héllo *wörld*"),
            vec![
                ("text", "héllo ".to_string()),
                ("delimiter", "*".to_string()),
                ("text", "wörld".to_string()),
                ("delimiter", "*".to_string()),
            ]
        );
    }

    #[test]
    fn inline_disabled() {
        let options = Options::builder().without_inline().build();
        let input = "*not parsed*";
        let state = ParserState::new(input, &options);
        let node = inline_content(&state, 0, input.len()).map(|node| to_sexp(&node));
        assert_eq!(node.as_deref(), Some("(inline_content (text))"));
    }
}
