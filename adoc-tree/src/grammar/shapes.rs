//! Context-free line shapes.
//!
//! These rules never depend on scanner state: they describe what a single line (or the
//! start of an inline run) looks like once the contextual decisions have been made.
//! Positions are relative to the start of the parsed slice.

use crate::{
    grammar::line::Part,
    model::{FieldName, NodeKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ListKind {
    Unordered,
    Ordered,
    Description,
    Callout,
}

impl ListKind {
    pub(crate) fn list_node(self) -> NodeKind {
        match self {
            ListKind::Unordered => NodeKind::UnorderedList,
            ListKind::Ordered => NodeKind::OrderedList,
            ListKind::Description => NodeKind::DescriptionList,
            ListKind::Callout => NodeKind::CalloutList,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConditionalKind {
    Ifdef,
    Ifndef,
    Ifeval,
}

impl ConditionalKind {
    pub(crate) fn directive_node(self) -> NodeKind {
        match self {
            ConditionalKind::Ifdef => NodeKind::IfdefDirective,
            ConditionalKind::Ifndef => NodeKind::IfndefDirective,
            ConditionalKind::Ifeval => NodeKind::IfevalDirective,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttributeEntryShape {
    pub(crate) unset: bool,
    pub(crate) name: (usize, usize),
    pub(crate) value_start: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConditionalShape {
    pub(crate) kind: ConditionalKind,
    /// Non-empty text between the brackets of `ifdef::attr[text]` makes the directive
    /// self-contained: it has no body and no end directive.
    pub(crate) single_line: bool,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MacroShape {
    pub(crate) name: (usize, usize),
    pub(crate) target: (usize, usize),
    pub(crate) body: (usize, usize),
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListItemShape {
    pub(crate) kind: ListKind,
    /// Markers with the same key belong to the same list; `1.` and `7.` share one.
    pub(crate) key: String,
    pub(crate) marker_end: usize,
    pub(crate) content_start: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DescriptionShape {
    pub(crate) term_end: usize,
    pub(crate) marker: (usize, usize),
    pub(crate) key: String,
    pub(crate) content_start: Option<usize>,
}

peg::parser! {
    pub(crate) grammar line_shapes() for str {
        rule ws() = [' ' | '\t']
        rule eol() = ws()* ![_]
        rule rest() = [_]*
        rule open_square_bracket() = "["
        rule close_square_bracket() = "]"
        rule double_open_square_bracket() = "[["
        rule double_close_square_bracket() = "]]"
        rule comma() = ","

        rule id() -> Part
            = start:position!() ['A'..='Z' | 'a'..='z' | '_'] ['A'..='Z' | 'a'..='z' | '0'..='9' | '_' | '-']* end:position!()
        {
            Part::new(NodeKind::Id, Some(FieldName::Id), start, end)
        }

        rule anchor_body() -> Vec<Part>
            = double_open_square_bracket() id:id() text:(comma() ws()* start:position!() [^(']' | '\r' | '\n')]+ end:position!() {
                Part::new(NodeKind::AnchorText, Some(FieldName::Text), start, end)
            })? double_close_square_bracket()
        {
            let mut parts = vec![id];
            parts.extend(text);
            parts
        }

        /// `[[id]]` or `[[id,reftext]]` alone on a line.
        pub(crate) rule block_anchor() -> Vec<Part>
            = parts:anchor_body() eol() { parts }

        /// `[[id]]` at the start of an inline run, with its end offset.
        pub(crate) rule inline_anchor() -> (Vec<Part>, usize)
            = parts:anchor_body() end:position!() rest() { (parts, end) }

        /// `[[[id]]]` or `[[[id,citation]]]` at the start of a run, with its end offset.
        pub(crate) rule bibliography_anchor() -> (Vec<Part>, usize)
            = "[[[" id:(start:position!() [^(',' | ']' | '\r' | '\n')]+ end:position!() {
                Part::new(NodeKind::BibliographyId, Some(FieldName::Id), start, end)
            }) citation:(comma() start:position!() [^(']' | '\r' | '\n')]+ end:position!() {
                Part::new(NodeKind::BibliographyCitation, Some(FieldName::Citation), start, end)
            })? "]]]" end:position!() rest()
        {
            let mut parts = vec![id];
            parts.extend(citation);
            (parts, end)
        }

        rule role() -> Part
            = start:position!() ['A'..='Z' | 'a'..='z' | '0'..='9' | '_' | '-']+ end:position!()
        {
            Part::new(NodeKind::Role, Some(FieldName::Role), start, end)
        }

        /// `[#id.role1.role2]`; at least one id or role.
        pub(crate) rule id_and_roles() -> Vec<Part>
            = open_square_bracket() id:("#" id:id() { id })? roles:("." role:role() { role })* close_square_bracket() eol()
        {?
            if id.is_none() && roles.is_empty() {
                Err("id or role")
            } else {
                Ok(id.into_iter().chain(roles).collect())
            }
        }

        /// Any other bracketed line. The payload stays opaque.
        pub(crate) rule attribute_list() -> Vec<Part>
            = open_square_bracket() start:position!() (!(close_square_bracket() eol()) [^('\n' | '\r')])* end:position!() close_square_bracket() eol()
        {
            if start < end {
                vec![Part::new(NodeKind::AttributeList, Some(FieldName::Attributes), start, end)]
            } else {
                Vec::new()
            }
        }

        rule admonition_type() = "NOTE" / "TIP" / "IMPORTANT" / "WARNING" / "CAUTION"

        /// `[NOTE]` tag of a block admonition, returning the tag end.
        pub(crate) rule admonition_tag() -> usize
            = open_square_bracket() admonition_type() close_square_bracket() end:position!() eol() { end }

        /// `NOTE: text` paragraph label, returning the label end (after the colon).
        pub(crate) rule admonition_label() -> usize
            = admonition_type() ":" end:position!() ws()+ [_] rest() { end }

        /// `.Title`, returning where the title text starts.
        pub(crate) rule block_title() -> usize
            = "." start:position!() !['.' | ' ' | '\t'] [_] rest() { start }

        rule attribute_name() -> (usize, usize)
            = start:position!() ['A'..='Z' | 'a'..='z' | '0'..='9' | '_'] ['A'..='Z' | 'a'..='z' | '0'..='9' | '_' | '-']* end:position!()
        {
            (start, end)
        }

        /// `:name: value`, `:name:`, `:!name:` and `:name!:`.
        pub(crate) rule attribute_entry() -> AttributeEntryShape
            = ":" leading:"!"? name:attribute_name() trailing:"!"? ":" value_start:(ws()+ start:position!() [_] rest() { start })? eol()
        {?
            let unset = leading.is_some() || trailing.is_some();
            if (leading.is_some() && trailing.is_some()) || (unset && value_start.is_some()) {
                Err("unset entry without value")
            } else {
                Ok(AttributeEntryShape { unset, name, value_start })
            }
        }

        rule conditional_kind() -> ConditionalKind
            = "ifdef" { ConditionalKind::Ifdef }
            / "ifndef" { ConditionalKind::Ifndef }
            / "ifeval" { ConditionalKind::Ifeval }

        rule directive_target() -> (usize, usize)
            = start:position!() [^('[' | ']' | ' ' | '\t' | '\r' | '\n')]* end:position!() { (start, end) }

        rule bracketed_body() -> (usize, usize)
            = open_square_bracket() start:position!() (!(close_square_bracket() eol()) [^('\n' | '\r')])* end:position!() close_square_bracket()
        {
            (start, end)
        }

        /// `ifdef::a[]`, `ifndef::a,b[]`, `ifeval::[expr]` and `ifdef::a[text]`.
        pub(crate) rule conditional() -> ConditionalShape
            = kind:conditional_kind() "::" target:directive_target() body:bracketed_body() end:position!() eol()
        {?
            let has_target = target.0 < target.1;
            let has_body = body.0 < body.1;
            match kind {
                ConditionalKind::Ifeval if has_target || !has_body => Err("ifeval::[expression]"),
                ConditionalKind::Ifeval => Ok(ConditionalShape { kind, single_line: false, end }),
                ConditionalKind::Ifdef | ConditionalKind::Ifndef if !has_target => Err("attribute name"),
                ConditionalKind::Ifdef | ConditionalKind::Ifndef => Ok(ConditionalShape { kind, single_line: has_body, end }),
            }
        }

        /// `endif::[]` or `endif::attr[]`, returning the directive end.
        pub(crate) rule endif() -> usize
            = "endif::" directive_target() open_square_bracket() close_square_bracket() end:position!() eol() { end }

        rule macro_name() -> (usize, usize)
            = start:position!() ['A'..='Z' | 'a'..='z'] ['A'..='Z' | 'a'..='z' | '0'..='9' | '_' | '-']* end:position!()
        {
            (start, end)
        }

        /// `name::target[body]` alone on a line.
        pub(crate) rule block_macro() -> MacroShape
            = name:macro_name() "::" target:directive_target() body:bracketed_body() end:position!() eol()
        {
            MacroShape { name, target, body, end }
        }

        /// `name:target[body]` at the start of an inline run.
        pub(crate) rule inline_macro() -> MacroShape
            = name:macro_name() ":" !":" target:directive_target() open_square_bracket() body_start:position!() [^(']' | '\r' | '\n')]* body_end:position!() close_square_bracket() end:position!() rest()
        {
            MacroShape { name, target, body: (body_start, body_end), end }
        }

        rule list_marker() -> (ListKind, String)
            = m:$("*"+) { (ListKind::Unordered, m.to_string()) }
            / "-" { (ListKind::Unordered, "-".to_string()) }
            / ['0'..='9']+ "." { (ListKind::Ordered, "1.".to_string()) }
            / m:$("."+) { (ListKind::Ordered, m.to_string()) }
            / "<" (['0'..='9']+ / ".") ">" { (ListKind::Callout, "<>".to_string()) }

        /// `* item`, `- item`, `. item`, `1. item` and `<1> item`.
        pub(crate) rule list_item() -> ListItemShape
            = marker:list_marker() marker_end:position!() ws()+ content_start:position!() [_] rest()
        {
            ListItemShape { kind: marker.0, key: marker.1, marker_end, content_start }
        }

        rule description_separator() = "::::" / ":::" / "::" / ";;"

        /// `term:: text` or a bare `term::`.
        pub(crate) rule description_item() -> DescriptionShape
            = term:$(![' ' | '\t'] (!(description_separator() (ws() / ![_])) [_])+) term_end:position!()
              marker_start:position!() key:$(description_separator()) marker_end:position!()
              content_start:(ws()+ start:position!() [_] rest() { Some(start) } / eol() { None })
        {?
            if term.ends_with([' ', '\t']) {
                Err("term ending in whitespace")
            } else {
                Ok(DescriptionShape {
                    term_end,
                    marker: (marker_start, marker_end),
                    key: key.to_string(),
                    content_start,
                })
            }
        }

        rule span_spec()
            = ['0'..='9']+ "." ['0'..='9']+ "+"
            / ['0'..='9']+ "+"
            / "." ['0'..='9']+ "+"

        rule format_spec() = ['a' | 'e' | 'l' | 'm' | 's' | 'h' | 'v' | 'd']

        /// The spec written right before a cell-opening pipe: `2+`, `1.3+`, `.2+`, `a`.
        pub(crate) rule cell_spec() -> Vec<Part>
            = span:(start:position!() span_spec() end:position!() {
                Part::new(NodeKind::SpanSpec, None, start, end)
            })? format:(start:position!() format_spec() end:position!() {
                Part::new(NodeKind::FormatSpec, None, start, end)
            })?
        {?
            if span.is_none() && format.is_none() {
                Err("span or format spec")
            } else {
                Ok(span.into_iter().chain(format).collect())
            }
        }
    }
}
