//! Custom input generators for property-based testing
//!
//! These generators create the kinds of input the parser has to survive: arbitrary
//! text, ASCII text, `AsciiDoc`-shaped documents with unbalanced constructs, and
//! multi-byte text that catches offsets splitting a character.
#![allow(clippy::expect_used)]
use proptest::prelude::*;

use crate::InputEdit;

/// Generate any string including edge cases like empty, very long,
/// with control characters, and so on.
pub fn any_document_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(".*").expect("Failed to create any string strategy")
}

/// Generate ASCII-safe document strings that are more likely to be
/// valid `AsciiDoc` but still exercise the parser thoroughly.
pub fn ascii_document() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x20-\x7E\n\t]*").expect("Failed to create ASCII string strategy")
}

/// One line-level construct, possibly unbalanced on its own.
fn chunk() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("= Title\n".to_string()),
        Just("== Section\n".to_string()),
        Just("==== Deep\n".to_string()),
        Just("\n".to_string()),
        Just("* list item\n".to_string()),
        Just("** nested item\n".to_string()),
        Just(". ordered\n".to_string()),
        Just("term:: description\n".to_string()),
        Just("<1> callout\n".to_string()),
        Just("+\n".to_string()),
        Just("----\n".to_string()),
        Just("====\n".to_string()),
        Just("=====\n".to_string()),
        Just("++++\n".to_string()),
        Just("[stem]\n".to_string()),
        Just("[[[ref,Ref]]] Author\n".to_string()),
        Just("****\n".to_string()),
        Just("--\n".to_string()),
        Just("////\n".to_string()),
        Just("|===\n".to_string()),
        Just("|a |b\n".to_string()),
        Just("2+|span\n".to_string()),
        Just("[NOTE]\n".to_string()),
        Just("NOTE: admonition paragraph\n".to_string()),
        Just("[[anchor]]\n".to_string()),
        Just("[#id.role]\n".to_string()),
        Just("[source,rust]\n".to_string()),
        Just(".Block title\n".to_string()),
        Just(":name: value\n".to_string()),
        Just(":long: first \\\n".to_string()),
        Just(":!unset:\n".to_string()),
        Just("ifdef::attr[]\n".to_string()),
        Just("ifeval::[1 > 0]\n".to_string()),
        Just("endif::[]\n".to_string()),
        Just("image::logo.png[Logo]\n".to_string()),
        Just("'''\n".to_string()),
        Just("<<<\n".to_string()),
        Just("// line comment\n".to_string()),
        Just("Some *bold* and _emphasis_ and `mono` text.\n".to_string()),
        Just("See https://example.com[a site] and <<ref,text>>.\n".to_string()),
        Just("Use kbd:[Ctrl+C] or footnote:[note] and {attr}.\n".to_string()),
        Just("((term)) [[inline]] [.role]#span# +++pass+++ x^2^ H~2~O\n".to_string()),
        Just("hard break +\n".to_string()),
        Just("Keep +{attr} *as is*+ here.\n".to_string()),
        prop::string::string_regex(r"[a-zA-Z0-9 .,:!?*_`#\[\]{}<>+-]{0,30}\n?")
            .expect("Failed to create text chunk"),
    ]
}

/// Generate strings with `AsciiDoc`-like structure but potentially invalid.
/// This helps find issues with delimiter matching, nesting, etc.
pub fn structured_document() -> impl Strategy<Value = String> {
    prop::collection::vec(chunk(), 0..24).prop_map(|chunks| chunks.concat())
}

/// A document, and the same document with one chunk inserted, removed or replaced,
/// plus the edit between them.
pub fn edited_document() -> impl Strategy<Value = (String, String, InputEdit)> {
    (structured_document(), any::<prop::sample::Index>(), 0..12usize, chunk()).prop_map(
        |(old, at, removed, inserted)| {
            let boundaries: Vec<usize> = old
                .char_indices()
                .map(|(index, _)| index)
                .chain(std::iter::once(old.len()))
                .collect();
            let start = boundaries.get(at.index(boundaries.len())).copied().unwrap_or(0);
            let old_end = boundaries
                .iter()
                .copied()
                .filter(|&boundary| boundary >= start)
                .nth(removed)
                .unwrap_or(old.len());
            let new = format!(
                "{}{inserted}{}",
                old.get(..start).unwrap_or_default(),
                old.get(old_end..).unwrap_or_default()
            );
            let edit = InputEdit {
                start_byte: start,
                old_end_byte: old_end,
                new_end_byte: start + inserted.len(),
            };
            (old, new, edit)
        },
    )
}

/// Generate potentially problematic Unicode strings to test UTF-8 handling.
pub fn unicode_stress_test() -> impl Strategy<Value = String> {
    prop_oneof![
        // ASCII with newlines and tabs
        prop::string::string_regex(r"[\x20-\x7E\n\t]{0,100}")
            .expect("Failed to create ASCII string strategy"),
        // Emoji mixed with markup
        prop::collection::vec(
            prop_oneof![Just("😀"), Just("🎉"), Just("*"), Just("🚀"), Just("\n"), Just("_")],
            0..20
        )
        .prop_map(|v| v.concat()),
        // Right-to-left text (Hebrew)
        prop::collection::vec(
            prop_oneof![Just("א"), Just("ב"), Just("ג"), Just("ד"), Just(" "), Just("::")],
            0..30
        )
        .prop_map(|v| v.concat()),
        // Multi-byte characters (CJK) around fences
        prop::collection::vec(
            prop_oneof![Just("一"), Just("二"), Just("三"), Just("\n----\n"), Just("|")],
            0..20
        )
        .prop_map(|v| v.concat()),
        // Combining characters with base chars
        prop::collection::vec(
            prop_oneof![Just("a"), Just("e"), Just("i"), Just("o"), Just("u")],
            0..10
        )
        .prop_map(|chars| {
            chars
                .into_iter()
                .flat_map(|c| [c, "\u{0301}"]) // Add combining acute accent
                .collect::<String>()
        }),
        // Zero-width and special Unicode
        prop::collection::vec(
            prop_oneof![
                Just("\u{200B}"), // Zero-width space
                Just("\u{FEFF}"), // Zero-width no-break space
                Just("\u{200D}"), // Zero-width joiner
                Just("a"),
                Just(" "),
                Just("\r\n"),
                Just("\n")
            ],
            0..20
        )
        .prop_map(|v| v.concat()),
    ]
}
