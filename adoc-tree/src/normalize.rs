//! Post-processing that regroups the top level of a tree for consumers that think in
//! whole lists.
//!
//! The parser ends a list at every blank line, so `* a\n\n* b` is two lists. Here each
//! run of adjacent lists of the same kind becomes one group with the items of all of
//! them.

use serde::Serialize;

use crate::model::{Node, NodeKind, Tree};

/// A byte range in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    #[serde(rename = "startIndex")]
    pub start: usize,
    #[serde(rename = "endIndex")]
    pub end: usize,
}

impl From<&Node> for Range {
    fn from(node: &Node) -> Self {
        Self {
            start: node.start_byte(),
            end: node.end_byte(),
        }
    }
}

/// A list item inside a merged list group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedItem {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub range: Range,
}

/// A top-level block, or a run of same-kind lists merged into one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedBlock {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub range: Range,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<NormalizedItem>,
}

fn items(list: &Node) -> impl Iterator<Item = NormalizedItem> + '_ {
    list.named_children()
        .filter(|child| matches!(child.kind(), NodeKind::ListItem | NodeKind::DescriptionItem))
        .map(|item| NormalizedItem {
            kind: item.kind(),
            range: Range::from(item),
        })
}

/// Walk the named top-level nodes of `tree`, merging adjacent lists of the same kind.
#[tracing::instrument(skip_all)]
#[must_use]
pub fn normalize(tree: &Tree) -> Vec<NormalizedBlock> {
    let mut blocks: Vec<NormalizedBlock> = Vec::new();
    for node in tree.root().named_children() {
        let kind = node.kind();
        if kind.is_list()
            && let Some(group) = blocks.last_mut()
            && group.kind == kind
            && !group.items.is_empty()
        {
            tracing::trace!(kind = %kind, start = node.start_byte(), "merging list into group");
            group.range.end = node.end_byte();
            group.items.extend(items(node));
            continue;
        }
        blocks.push(NormalizedBlock {
            kind,
            range: Range::from(node),
            items: if kind.is_list() {
                items(node).collect()
            } else {
                Vec::new()
            },
        });
    }
    blocks
}
