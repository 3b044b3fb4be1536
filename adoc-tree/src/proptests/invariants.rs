//! Parser invariant tests using property-based testing
//!
//! These tests verify that certain properties hold for ANY input to the parser.
//! They're organized by priority:
//! - P0: Critical invariants (parser never panics, leaves cover the input)
//! - P1: Structural invariants (branch spans, determinism)
//! - P2: Incremental invariants (reparse equals parse, scanner state round trip)

use proptest::prelude::*;

use crate::{
    Node, NodeKind, Options, Scanner, ValidTokens, parse, parse_with_options,
};

use super::generators::*;

// Configuration for proptest - can be overridden with PROPTEST_CASES env var
proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000, // Default for local dev
        max_shrink_iters: 10000,
        .. ProptestConfig::default()
    })]

    // ====================================================================
    // P0: CRITICAL INVARIANTS - These must NEVER fail
    // ====================================================================

    /// The parser should never panic on any input, no matter how malformed.
    #[test]
    fn parser_never_panics(input in any_document_string()) {
        let _ = parse(&input);
    }

    /// The leaves partition the input: they are non-empty, contiguous, and their
    /// texts concatenate back to the source.
    #[test]
    fn leaves_cover_input(input in structured_document()) {
        let tree = parse(&input);
        verify_leaf_partition(tree.root(), &input)?;
    }

    #[test]
    fn leaves_cover_ascii_input(input in ascii_document()) {
        let tree = parse(&input);
        verify_leaf_partition(tree.root(), &input)?;
    }

    /// All byte offsets must fall on valid UTF-8 character boundaries.
    #[test]
    fn byte_offsets_utf8_safe(input in unicode_stress_test()) {
        let tree = parse(&input);
        for node in tree.root().descendants() {
            prop_assert!(
                input.is_char_boundary(node.start_byte()),
                "{} starts mid-character",
                node.kind()
            );
            prop_assert!(
                input.is_char_boundary(node.end_byte()),
                "{} ends mid-character",
                node.kind()
            );
        }
        verify_leaf_partition(tree.root(), &input)?;
    }

    // ====================================================================
    // P1: STRUCTURAL INVARIANTS
    // ====================================================================

    /// Every branch spans exactly its children, which are in order and abut.
    #[test]
    fn branches_span_children(input in structured_document()) {
        let tree = parse(&input);
        for node in tree.root().descendants() {
            verify_branch_span(node)?;
        }
    }

    /// Parsing is a pure function of the input.
    #[test]
    fn parsing_is_deterministic(input in structured_document()) {
        prop_assert_eq!(parse(&input), parse(&input));
    }

    /// Without inline tokenization every inline run is one text leaf.
    #[test]
    fn inline_disabled_yields_text_runs(input in structured_document()) {
        let options = Options::builder().without_inline().build();
        let tree = parse_with_options(&input, &options);
        for node in tree.root().descendants() {
            if node.kind() == NodeKind::InlineContent {
                let kinds: Vec<_> = node.children().iter().map(Node::kind).collect();
                prop_assert_eq!(kinds, vec![NodeKind::Text]);
            }
        }
        verify_leaf_partition(tree.root(), &input)?;
    }

    /// Every warning points inside the input.
    #[test]
    fn warnings_in_bounds(input in structured_document()) {
        let tree = parse(&input);
        for warning in tree.warnings() {
            prop_assert!(warning.location().validate(&input).is_ok(), "{warning}");
        }
    }

    // ====================================================================
    // P2: INCREMENTAL INVARIANTS
    // ====================================================================

    /// Reparsing after an edit gives exactly the tree a fresh parse gives.
    #[test]
    fn reparse_equals_parse((old, new, edit) in edited_document()) {
        let tree = parse(&old);
        let reparsed = tree.reparse(&new, &edit);
        prop_assert!(reparsed.is_ok());
        if let Ok(reparsed) = reparsed {
            prop_assert_eq!(reparsed, parse(&new));
        }
    }

    /// A scanner restored from its bytes continues exactly like the original.
    #[test]
    fn scanner_state_round_trips(input in structured_document()) {
        let mut scanner = Scanner::new();
        let mut pos = 0;
        let tokens = ValidTokens::FENCE_START | ValidTokens::FENCE_END;
        while pos < input.len() {
            let _ = scanner.scan(&input, pos, tokens);
            pos = input
                .get(pos..)
                .and_then(|rest| rest.find('\n'))
                .map_or(input.len(), |newline| pos + newline + 1);
        }
        let restored = Scanner::deserialize(&scanner.serialize());
        prop_assert_eq!(restored.ok(), Some(scanner));
    }
}

// ====================================================================
// Helper functions for invariant verification
// ====================================================================

fn verify_leaf_partition(root: &Node, input: &str) -> Result<(), TestCaseError> {
    let mut pos = 0;
    for leaf in root.leaves() {
        prop_assert!(leaf.start_byte() < leaf.end_byte(), "empty {} leaf", leaf.kind());
        prop_assert_eq!(leaf.start_byte(), pos, "gap or overlap before {}", leaf.kind());
        pos = leaf.end_byte();
    }
    prop_assert_eq!(pos, input.len());
    let rebuilt: String = root
        .leaves()
        .filter_map(|leaf| input.get(leaf.byte_range()))
        .collect();
    prop_assert_eq!(rebuilt.as_str(), input);
    Ok(())
}

fn verify_branch_span(node: &Node) -> Result<(), TestCaseError> {
    let (Some(first), Some(last)) = (node.children().first(), node.children().last()) else {
        return Ok(());
    };
    prop_assert_eq!(node.start_byte(), first.start_byte());
    prop_assert_eq!(node.end_byte(), last.end_byte());
    for pair in node.children().windows(2) {
        if let [left, right] = pair {
            prop_assert_eq!(
                left.end_byte(),
                right.start_byte(),
                "{} and {} do not abut",
                left.kind(),
                right.kind()
            );
        }
    }
    Ok(())
}
