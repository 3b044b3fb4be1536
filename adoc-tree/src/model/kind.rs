use serde::{Serialize, Serializer};

macro_rules! node_kinds {
    (
        named { $($named:ident => $named_str:literal),* $(,)? }
        anonymous { $($anon:ident => $anon_str:literal),* $(,)? }
    ) => {
        /// The type of a syntax tree node.
        ///
        /// The string returned by [`NodeKind::as_str`] is the stable type name consumers
        /// match on. Named kinds appear in s-expressions, anonymous kinds (punctuation,
        /// whitespace, line terminators) only in the leaf partition.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[non_exhaustive]
        pub enum NodeKind {
            $($named,)*
            $($anon,)*
        }

        impl NodeKind {
            /// Every kind, named ones first.
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$named,)* $(NodeKind::$anon,)*];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(NodeKind::$named => $named_str,)*
                    $(NodeKind::$anon => $anon_str,)*
                }
            }

            #[must_use]
            pub const fn is_named(self) -> bool {
                match self {
                    $(NodeKind::$named => true,)*
                    $(NodeKind::$anon => false,)*
                }
            }

            /// Look a kind up by its type name.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($named_str => Some(NodeKind::$named),)*
                    $($anon_str => Some(NodeKind::$anon),)*
                    _ => None,
                }
            }
        }
    };
}

node_kinds! {
    named {
        Document => "document",
        Section => "section",
        SectionMarker => "section_marker",
        Title => "title",
        Metadata => "metadata",
        BlockAnchor => "block_anchor",
        Id => "id",
        AnchorText => "anchor_text",
        BlockTitle => "block_title",
        IdAndRoles => "id_and_roles",
        Role => "role",
        BlockAttributes => "block_attributes",
        AttributeList => "attribute_list",
        AttributeEntry => "attribute_entry",
        AttributeName => "attribute_name",
        AttributeValue => "attribute_value",
        Paragraph => "paragraph",
        AdmonitionLabel => "admonition_label",
        InlineContent => "inline_content",
        UnorderedList => "unordered_list",
        OrderedList => "ordered_list",
        DescriptionList => "description_list",
        CalloutList => "callout_list",
        ListItem => "list_item",
        DescriptionItem => "description_item",
        ListMarker => "list_marker",
        Term => "term",
        DescriptionMarker => "description_marker",
        ListItemContinuation => "list_item_continuation",
        ListContinuation => "list_continuation",
        ExampleBlock => "example_block",
        ExampleOpen => "example_open",
        ExampleClose => "example_close",
        ListingBlock => "listing_block",
        ListingOpen => "listing_open",
        ListingClose => "listing_close",
        LiteralBlock => "literal_block",
        LiteralOpen => "literal_open",
        LiteralClose => "literal_close",
        QuoteBlock => "quote_block",
        QuoteOpen => "quote_open",
        QuoteClose => "quote_close",
        SidebarBlock => "sidebar_block",
        SidebarOpen => "sidebar_open",
        SidebarClose => "sidebar_close",
        PassthroughBlock => "passthrough_block",
        PassthroughOpen => "passthrough_open",
        PassthroughClose => "passthrough_close",
        OpenBlock => "open_block",
        OpenBlockOpen => "open_block_open",
        OpenBlockClose => "open_block_close",
        BlockContent => "block_content",
        ContentLine => "content_line",
        AdmonitionBlock => "admonition_block",
        StemBlock => "stem_block",
        LatexmathBlock => "latexmath_block",
        AsciimathBlock => "asciimath_block",
        StemBlockLabel => "stem_block_label",
        LatexmathBlockLabel => "latexmath_block_label",
        AsciimathBlockLabel => "asciimath_block_label",
        MathContent => "math_content",
        MathLine => "math_line",
        BibliographyEntry => "bibliography_entry",
        BibliographyAnchor => "bibliography_anchor",
        BibliographyId => "bibliography_id",
        BibliographyCitation => "bibliography_citation",
        TableBlock => "table_block",
        TableOpen => "table_open",
        TableClose => "table_close",
        TableContent => "table_content",
        TableRow => "table_row",
        TableCell => "table_cell",
        CellSpec => "cell_spec",
        SpanSpec => "span_spec",
        FormatSpec => "format_spec",
        CellContent => "cell_content",
        ConditionalBlock => "conditional_block",
        IfdefDirective => "ifdef_directive",
        IfndefDirective => "ifndef_directive",
        IfevalDirective => "ifeval_directive",
        EndifDirective => "endif_directive",
        BlockComment => "block_comment",
        BlockCommentStart => "block_comment_start",
        BlockCommentEnd => "block_comment_end",
        CommentLine => "comment_line",
        LineComment => "line_comment",
        BlockMacro => "block_macro",
        MacroName => "macro_name",
        MacroTarget => "macro_target",
        MacroBody => "macro_body",
        ThematicBreak => "thematic_break",
        PageBreak => "page_break",
        Strong => "strong",
        Emphasis => "emphasis",
        Monospace => "monospace",
        Superscript => "superscript",
        Subscript => "subscript",
        InlineAnchor => "inline_anchor",
        InternalXref => "internal_xref",
        ExternalXref => "external_xref",
        AutoLink => "auto_link",
        Link => "link",
        LinkText => "link_text",
        InlineMacro => "inline_macro",
        LinkMacro => "link_macro",
        Image => "image",
        Footnote => "footnote",
        IndexTerm => "index_term",
        IndexText => "index_text",
        UiMacro => "ui_macro",
        PassMacro => "pass_macro",
        MathMacro => "math_macro",
        Passthrough => "passthrough",
        PassthroughText => "passthrough_text",
        UnconstrainedPassthrough => "unconstrained_passthrough",
        AttributeReference => "attribute_reference",
        RoleSpan => "role_span",
        LineBreak => "line_break",
        Text => "text",
        TextColon => "text_colon",
        TextChar => "text_char",
    }
    anonymous {
        Delimiter => "delimiter",
        Punctuation => "punctuation",
        Whitespace => "whitespace",
        LineEnding => "line_ending",
        BlankLine => "blank_line",
        MacroMarker => "macro_marker",
    }
}

impl NodeKind {
    /// List container kinds, used by normalization and the list grammar.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(
            self,
            NodeKind::UnorderedList
                | NodeKind::OrderedList
                | NodeKind::DescriptionList
                | NodeKind::CalloutList
        )
    }

    /// The seven delimited block kinds.
    #[must_use]
    pub const fn is_delimited_block(self) -> bool {
        matches!(
            self,
            NodeKind::ExampleBlock
                | NodeKind::ListingBlock
                | NodeKind::LiteralBlock
                | NodeKind::QuoteBlock
                | NodeKind::SidebarBlock
                | NodeKind::PassthroughBlock
                | NodeKind::OpenBlock
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// The role a child plays inside its parent, e.g. the `title` of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FieldName {
    Anchor,
    Metadata,
    Marker,
    Title,
    Id,
    Text,
    Role,
    Name,
    Value,
    Content,
    Label,
    Open,
    Close,
    Term,
    Url,
    Target,
    Body,
    Spec,
    Directive,
    End,
    Attributes,
    Citation,
}

impl FieldName {
    pub const ALL: &'static [FieldName] = &[
        FieldName::Anchor,
        FieldName::Metadata,
        FieldName::Marker,
        FieldName::Title,
        FieldName::Id,
        FieldName::Text,
        FieldName::Role,
        FieldName::Name,
        FieldName::Value,
        FieldName::Content,
        FieldName::Label,
        FieldName::Open,
        FieldName::Close,
        FieldName::Term,
        FieldName::Url,
        FieldName::Target,
        FieldName::Body,
        FieldName::Spec,
        FieldName::Directive,
        FieldName::End,
        FieldName::Attributes,
        FieldName::Citation,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldName::Anchor => "anchor",
            FieldName::Metadata => "metadata",
            FieldName::Marker => "marker",
            FieldName::Title => "title",
            FieldName::Id => "id",
            FieldName::Text => "text",
            FieldName::Role => "role",
            FieldName::Name => "name",
            FieldName::Value => "value",
            FieldName::Content => "content",
            FieldName::Label => "label",
            FieldName::Open => "open",
            FieldName::Close => "close",
            FieldName::Term => "term",
            FieldName::Url => "url",
            FieldName::Target => "target",
            FieldName::Body => "body",
            FieldName::Spec => "spec",
            FieldName::Directive => "directive",
            FieldName::End => "end",
            FieldName::Attributes => "attributes",
            FieldName::Citation => "citation",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        FieldName::ALL.iter().copied().find(|field| field.as_str() == name)
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
