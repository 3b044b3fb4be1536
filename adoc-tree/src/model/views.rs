//! Typed views over the untyped tree.
//!
//! A view is a `(&Tree, &Node)` pair checked for the right node kind. It copies
//! nothing; every accessor reads straight from the node's children and the source.

use crate::{
    grammar::RegionKind,
    model::{FieldName, Node, NodeKind, Tree},
};

macro_rules! views {
    ($($(#[$meta:meta])* $name:ident => $($kind:ident)|+;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name<'t> {
                tree: &'t Tree,
                node: &'t Node,
            }

            impl<'t> $name<'t> {
                /// View `node` as this construct, if it is one.
                #[must_use]
                pub fn cast(tree: &'t Tree, node: &'t Node) -> Option<Self> {
                    matches!(node.kind(), $(NodeKind::$kind)|+).then_some(Self { tree, node })
                }

                #[must_use]
                pub fn node(&self) -> &'t Node {
                    self.node
                }
            }
        )*
    };
}

views! {
    /// A section: its marker, title and the blocks up to the next section it does not
    /// nest.
    Section => Section;
    List => UnorderedList | OrderedList | DescriptionList | CalloutList;
    ListItem => ListItem | DescriptionItem;
    /// Example, listing, literal, quote, sidebar, passthrough and open blocks.
    DelimitedBlock => ExampleBlock | ListingBlock | LiteralBlock | QuoteBlock | SidebarBlock
        | PassthroughBlock | OpenBlock;
    Table => TableBlock;
    Row => TableRow;
    Cell => TableCell;
    AttributeEntry => AttributeEntry;
    ConditionalBlock => ConditionalBlock;
    /// Block macros and every named inline macro.
    Macro => BlockMacro | InlineMacro | LinkMacro | Image | Footnote | IndexTerm | PassMacro
        | UiMacro | MathMacro;
    BlockComment => BlockComment;
    /// Bare URLs and URLs with link text, plus `link:` and `mailto:` macros.
    Link => AutoLink | Link | LinkMacro;
    Paragraph => Paragraph;
}

/// Kinds of list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Unordered,
    Ordered,
    Description,
    Callout,
}

fn field_text<'t>(tree: &'t Tree, node: &Node, field: FieldName) -> Option<&'t str> {
    node.child_by_field(field).map(|child| tree.text(child))
}

/// Named children that are the body of `node` rather than one of its labelled parts.
fn body(node: &Node) -> impl Iterator<Item = &Node> {
    node.named_children().filter(|child| child.field().is_none())
}

/// Inline content lines of `node`, joined with newlines.
fn content_text(tree: &Tree, node: &Node) -> String {
    node.children_by_field(FieldName::Content)
        .map(|content| tree.text(content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Id set by a `[[id]]` anchor or a `[#id]` line in the block's metadata.
fn metadata_id<'t>(tree: &'t Tree, node: &Node) -> Option<&'t str> {
    node.child_by_field(FieldName::Metadata)?
        .named_children()
        .find_map(|line| field_text(tree, line, FieldName::Id))
}

impl<'t> Section<'t> {
    /// 1 for `=`, 2 for `==` and so on.
    #[must_use]
    pub fn level(&self) -> u8 {
        let marker = field_text(self.tree, self.node, FieldName::Marker).unwrap_or_default();
        u8::try_from(marker.len()).unwrap_or(u8::MAX)
    }

    #[must_use]
    pub fn title(&self) -> &'t str {
        field_text(self.tree, self.node, FieldName::Title).unwrap_or_default()
    }

    #[must_use]
    pub fn anchor_id(&self) -> Option<&'t str> {
        metadata_id(self.tree, self.node)
    }

    /// Blocks and nested sections, in order.
    pub fn blocks(&self) -> impl Iterator<Item = &'t Node> + use<'t> {
        body(self.node)
    }
}

impl<'t> List<'t> {
    #[must_use]
    pub fn kind(&self) -> ListKind {
        const KINDS: [(NodeKind, ListKind); 3] = [
            (NodeKind::OrderedList, ListKind::Ordered),
            (NodeKind::DescriptionList, ListKind::Description),
            (NodeKind::CalloutList, ListKind::Callout),
        ];
        KINDS
            .iter()
            .find(|(node, _)| *node == self.node.kind())
            .map_or(ListKind::Unordered, |(_, kind)| *kind)
    }

    pub fn items(&self) -> impl Iterator<Item = ListItem<'t>> + use<'t> {
        let tree = self.tree;
        self.node
            .named_children()
            .filter_map(move |child| ListItem::cast(tree, child))
    }
}

impl<'t> ListItem<'t> {
    #[must_use]
    pub fn marker(&self) -> &'t str {
        field_text(self.tree, self.node, FieldName::Marker).unwrap_or_default()
    }

    /// The term of a description item.
    #[must_use]
    pub fn term(&self) -> Option<&'t str> {
        field_text(self.tree, self.node, FieldName::Term)
    }

    /// Item text, one line per source line.
    #[must_use]
    pub fn content(&self) -> String {
        content_text(self.tree, self.node)
    }

    /// The block attached by each `+` continuation. An empty continuation yields
    /// nothing.
    pub fn continuations(&self) -> impl Iterator<Item = &'t Node> + use<'t> {
        self.node
            .named_children()
            .filter(|child| child.kind() == NodeKind::ListItemContinuation)
            .filter_map(|continuation| {
                continuation
                    .named_children()
                    .find(|child| child.kind() != NodeKind::ListContinuation)
            })
    }

    pub fn nested(&self) -> impl Iterator<Item = List<'t>> + use<'t> {
        let tree = self.tree;
        self.node
            .named_children()
            .filter_map(move |child| List::cast(tree, child))
    }
}

impl<'t> DelimitedBlock<'t> {
    #[must_use]
    pub fn kind(&self) -> RegionKind {
        const KINDS: [(NodeKind, RegionKind); 6] = [
            (NodeKind::ExampleBlock, RegionKind::Example),
            (NodeKind::ListingBlock, RegionKind::Listing),
            (NodeKind::LiteralBlock, RegionKind::Literal),
            (NodeKind::QuoteBlock, RegionKind::Quote),
            (NodeKind::SidebarBlock, RegionKind::Sidebar),
            (NodeKind::PassthroughBlock, RegionKind::Passthrough),
        ];
        KINDS
            .iter()
            .find(|(node, _)| *node == self.node.kind())
            .map_or(RegionKind::Open, |(_, kind)| *kind)
    }

    #[must_use]
    pub fn metadata(&self) -> Option<&'t Node> {
        self.node.child_by_field(FieldName::Metadata)
    }

    /// Content lines without their terminators.
    #[must_use]
    pub fn lines(&self) -> Vec<&'t str> {
        region_lines(self.tree, self.node, NodeKind::BlockContent)
    }

    /// False when the block ran to the end of the input.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.node.child_by_field(FieldName::Close).is_some()
    }
}

fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn region_lines<'t>(tree: &'t Tree, node: &'t Node, content: NodeKind) -> Vec<&'t str> {
    node.child_of_kind(content)
        .map(|content| {
            content
                .children()
                .iter()
                .map(|line| strip_terminator(tree.text(line)))
                .collect()
        })
        .unwrap_or_default()
}

impl<'t> Table<'t> {
    /// Text of the `.Title` line in the table's metadata.
    #[must_use]
    pub fn title(&self) -> Option<&'t str> {
        self.node
            .child_by_field(FieldName::Metadata)?
            .named_children()
            .find(|line| line.kind() == NodeKind::BlockTitle)
            .and_then(|line| field_text(self.tree, line, FieldName::Title))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'t>> + use<'t> {
        let tree = self.tree;
        self.node
            .child_of_kind(NodeKind::TableContent)
            .into_iter()
            .flat_map(Node::named_children)
            .filter_map(move |child| Row::cast(tree, child))
    }

    /// Every line between the fences, rows or not.
    #[must_use]
    pub fn lines(&self) -> Vec<&'t str> {
        region_lines(self.tree, self.node, NodeKind::TableContent)
    }
}

impl<'t> Row<'t> {
    pub fn cells(&self) -> impl Iterator<Item = Cell<'t>> + use<'t> {
        let tree = self.tree;
        self.node
            .named_children()
            .filter_map(move |child| Cell::cast(tree, child))
    }
}

impl<'t> Cell<'t> {
    #[must_use]
    pub fn spec(&self) -> Option<&'t str> {
        field_text(self.tree, self.node, FieldName::Spec)
    }

    /// Cell text, trimmed.
    #[must_use]
    pub fn text(&self) -> &'t str {
        field_text(self.tree, self.node, FieldName::Content)
            .unwrap_or_default()
            .trim()
    }
}

impl<'t> AttributeEntry<'t> {
    #[must_use]
    pub fn name(&self) -> &'t str {
        field_text(self.tree, self.node, FieldName::Name).unwrap_or_default()
    }

    /// The value, with continued lines joined by single spaces.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        let lines: Vec<&str> = self
            .node
            .children_by_field(FieldName::Value)
            .map(|value| {
                let text = self.tree.text(value);
                text.strip_suffix(" \\").unwrap_or(text).trim_end()
            })
            .collect();
        (!lines.is_empty()).then(|| lines.join(" "))
    }

    /// `:!name:` or `:name!:`.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        let Some(name) = self.node.child_by_field(FieldName::Name) else {
            return false;
        };
        let source = self.tree.source();
        source.get(..name.start_byte()).is_some_and(|before| before.ends_with('!'))
            || source.get(name.end_byte()..).is_some_and(|after| after.starts_with('!'))
    }
}

impl<'t> ConditionalBlock<'t> {
    /// The opening directive, e.g. `ifdef::backend-html5[]`.
    #[must_use]
    pub fn directive(&self) -> &'t str {
        field_text(self.tree, self.node, FieldName::Directive).unwrap_or_default()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &'t Node> + use<'t> {
        body(self.node)
    }

    /// Whether the block has its `endif`. Single-line conditionals need none.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.node.child_by_field(FieldName::End).is_some() || self.is_single_line()
    }

    /// `ifdef::attr[text]`: the text is the whole conditional.
    #[must_use]
    pub fn is_single_line(&self) -> bool {
        let directive = self.directive();
        !directive.starts_with("ifeval") && !directive.ends_with("[]")
    }
}

impl<'t> Macro<'t> {
    #[must_use]
    pub fn name(&self) -> &'t str {
        field_text(self.tree, self.node, FieldName::Name).unwrap_or_default()
    }

    #[must_use]
    pub fn target(&self) -> &'t str {
        field_text(self.tree, self.node, FieldName::Target).unwrap_or_default()
    }

    /// Text between the brackets.
    #[must_use]
    pub fn body(&self) -> &'t str {
        field_text(self.tree, self.node, FieldName::Body).unwrap_or_default()
    }

    #[must_use]
    pub fn is_block(&self) -> bool {
        self.node.kind() == NodeKind::BlockMacro
    }
}

impl<'t> BlockComment<'t> {
    #[must_use]
    pub fn lines(&self) -> Vec<&'t str> {
        self.node
            .named_children()
            .filter(|child| child.kind() == NodeKind::CommentLine)
            .map(|line| strip_terminator(self.tree.text(line)))
            .collect()
    }
}

impl<'t> Link<'t> {
    /// The URL, or the address of a `mailto:` macro.
    #[must_use]
    pub fn url(&self) -> &'t str {
        let field = if self.node.kind() == NodeKind::LinkMacro {
            FieldName::Target
        } else {
            FieldName::Url
        };
        field_text(self.tree, self.node, field).unwrap_or_else(|| self.tree.text(self.node))
    }

    #[must_use]
    pub fn text(&self) -> Option<&'t str> {
        let field = if self.node.kind() == NodeKind::LinkMacro {
            FieldName::Body
        } else {
            FieldName::Text
        };
        field_text(self.tree, self.node, field)
    }
}

impl<'t> Paragraph<'t> {
    /// `NOTE`, `TIP` and so on for `NOTE: text` paragraphs.
    #[must_use]
    pub fn admonition(&self) -> Option<&'t str> {
        field_text(self.tree, self.node, FieldName::Label).map(|label| label.trim_end_matches(':'))
    }

    #[must_use]
    pub fn content(&self) -> String {
        content_text(self.tree, self.node)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::parse;

    fn first<'t, V>(tree: &'t Tree, cast: impl Fn(&'t Tree, &'t Node) -> Option<V>) -> Option<V> {
        tree.root().descendants().find_map(|node| cast(tree, node))
    }

    #[test]
    fn section_view() {
        let tree = parse("[[intro]]\n== Intro\n\ntext\n\n=== Sub\n");
        let section = first(&tree, Section::cast);
        assert_eq!(section.map(|s| s.level()), Some(2));
        assert_eq!(section.map(|s| s.title()), Some("Intro"));
        assert_eq!(section.and_then(|s| s.anchor_id()), Some("intro"));
        let kinds: Vec<_> = section
            .into_iter()
            .flat_map(|s| s.blocks())
            .map(Node::kind)
            .collect();
        assert_eq!(kinds, vec![NodeKind::Paragraph, NodeKind::Section]);
    }

    #[test]
    fn iterators_outlive_their_view() {
        let tree = parse("* one\n* two\n");
        let items: Vec<String> = tree
            .root()
            .named_children()
            .filter_map(|node| List::cast(&tree, node))
            .flat_map(|list| list.items())
            .map(|item| item.content())
            .collect();
        assert_eq!(items, vec!["one", "two"]);
    }

    #[test]
    fn section_anchor_from_id_line() {
        let tree = parse("[#setup.big]\n== Setup\n");
        assert_eq!(first(&tree, Section::cast).and_then(|s| s.anchor_id()), Some("setup"));
    }

    #[test]
    fn list_view() {
        let tree = parse("* one\n+\n----\ncode\n----\n* two\n** nested\n");
        let list = first(&tree, List::cast);
        assert!(list.is_some());
        let Some(list) = list else { return };
        assert_eq!(list.kind(), ListKind::Unordered);
        let items: Vec<_> = list.items().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items.first().map(ListItem::content).as_deref(), Some("one"));
        assert_eq!(
            items
                .first()
                .into_iter()
                .flat_map(ListItem::continuations)
                .map(Node::kind)
                .collect::<Vec<_>>(),
            vec![NodeKind::ListingBlock]
        );
        let nested: Vec<_> = items.get(1).into_iter().flat_map(ListItem::nested).collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(
            nested.first().and_then(|list| list.items().next()).map(|item| item.marker()),
            Some("**")
        );
    }

    #[test]
    fn description_item_term() {
        let tree = parse("CPU:: The brain\n");
        let item = first(&tree, ListItem::cast);
        assert_eq!(item.and_then(|item| item.term()), Some("CPU"));
        assert_eq!(item.map(|item| item.content()).as_deref(), Some("The brain"));
    }

    #[rstest]
    #[case("----\na\nb\n----\n", RegionKind::Listing, vec!["a", "b"], true)]
    #[case("====\nx\n", RegionKind::Example, vec!["x"], false)]
    #[case("--\n--\n", RegionKind::Open, vec![], true)]
    fn delimited_block_view(
        #[case] input: &str,
        #[case] kind: RegionKind,
        #[case] lines: Vec<&str>,
        #[case] closed: bool,
    ) {
        let tree = parse(input);
        let block = first(&tree, DelimitedBlock::cast);
        assert_eq!(block.map(|b| b.kind()), Some(kind));
        assert_eq!(block.map(|b| b.lines()), Some(lines));
        assert_eq!(block.map(|b| b.is_closed()), Some(closed));
    }

    #[test]
    fn table_view() {
        let tree = parse(".Sizes\n|===\n|a |b\n\n2+|wide\n|===\n");
        let table = first(&tree, Table::cast);
        assert!(table.is_some());
        let Some(table) = table else { return };
        assert_eq!(table.title(), Some("Sizes"));
        let rows: Vec<Vec<(Option<&str>, &str)>> = table
            .rows()
            .map(|row| row.cells().map(|cell| (cell.spec(), cell.text())).collect())
            .collect();
        assert_eq!(
            rows,
            vec![vec![(None, "a"), (None, "b")], vec![(Some("2+"), "wide")]]
        );
        assert_eq!(table.lines(), vec!["|a |b", "", "2+|wide"]);
    }

    #[rstest]
    #[case(":toc: left\n", "toc", Some("left"), false)]
    #[case(":!toc:\n", "toc", None, true)]
    #[case(":toc!:\n", "toc", None, true)]
    #[case(":empty:\n", "empty", None, false)]
    #[case(":desc: first \\\n  second\n", "desc", Some("first second"), false)]
    fn attribute_entry_view(
        #[case] input: &str,
        #[case] name: &str,
        #[case] value: Option<&str>,
        #[case] unset: bool,
    ) {
        let tree = parse(input);
        let entry = first(&tree, AttributeEntry::cast);
        assert_eq!(entry.map(|e| e.name()), Some(name));
        assert_eq!(entry.and_then(|e| e.value()).as_deref(), value);
        assert_eq!(entry.map(|e| e.is_unset()), Some(unset));
    }

    #[rstest]
    #[case("ifdef::x[]\ntext\nendif::x[]\n", true, 1)]
    #[case("ifdef::x[]\ntext\n", false, 1)]
    #[case("ifdef::x[inline text]\n", true, 0)]
    fn conditional_view(#[case] input: &str, #[case] terminated: bool, #[case] blocks: usize) {
        let tree = parse(input);
        let conditional = first(&tree, ConditionalBlock::cast);
        assert_eq!(conditional.map(|c| c.is_terminated()), Some(terminated));
        assert_eq!(conditional.map(|c| c.blocks().count()), Some(blocks));
        assert!(conditional.is_some_and(|c| c.directive().starts_with("ifdef::x[")));
    }

    #[rstest]
    #[case("image::logo.png[Logo]\n", "image", "logo.png", "Logo", true)]
    #[case("Press kbd:[Ctrl+C] now\n", "kbd", "", "Ctrl+C", false)]
    #[case("See footnote:[a note].\n", "footnote", "", "a note", false)]
    fn macro_view(
        #[case] input: &str,
        #[case] name: &str,
        #[case] target: &str,
        #[case] body: &str,
        #[case] is_block: bool,
    ) {
        let tree = parse(input);
        let found =
            first(&tree, Macro::cast).map(|m| (m.name(), m.target(), m.body(), m.is_block()));
        assert_eq!(found, Some((name, target, body, is_block)));
    }

    #[rstest]
    #[case("see https://x.org now\n", "https://x.org", None)]
    #[case("see https://x.org[the site]\n", "https://x.org", Some("the site"))]
    #[case("mail mailto:me@x.org[me]\n", "me@x.org", Some("me"))]
    fn link_view(#[case] input: &str, #[case] url: &str, #[case] text: Option<&str>) {
        let tree = parse(input);
        let link = first(&tree, Link::cast);
        assert_eq!(link.map(|l| (l.url(), l.text())), Some((url, text)));
    }

    #[test]
    fn block_comment_view() {
        let tree = parse("////\nfirst\nsecond\n////\n");
        assert_eq!(
            first(&tree, BlockComment::cast).map(|c| c.lines()),
            Some(vec!["first", "second"])
        );
    }

    #[rstest]
    #[case("NOTE: Mind the gap\nplease\n", Some("NOTE"), "Mind the gap\nplease")]
    #[case("Plain text\n", None, "Plain text")]
    fn paragraph_view(
        #[case] input: &str,
        #[case] admonition: Option<&str>,
        #[case] content: &str,
    ) {
        let tree = parse(input);
        let paragraph = first(&tree, Paragraph::cast);
        assert_eq!(paragraph.and_then(|p| p.admonition()), admonition);
        assert_eq!(paragraph.map(|p| p.content()).as_deref(), Some(content));
    }
}
