//! The single ordering used to resolve every ambiguity in both grammars.
//!
//! Whenever more than one rule can claim the same position, the candidate with the
//! higher [`Precedence`] wins. The only other tie-break is [`longest_match`], which the
//! grammars call explicitly at the two places where more consumed input must win:
//! explicit vs. bare links, and double vs. single formatting delimiters.

/// How specific a rule is, lowest first.
///
/// Block and inline rules share one ordering so it can be audited in one place; the
/// grammars only ever compare candidates from the same layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// Single character consumed so the parser always advances.
    CatchAll,
    PlainText,
    PlainColon,
    Paragraph,
    Subscript,
    Superscript,
    Monospace,
    Emphasis,
    Strong,
    IndexTerm,
    LineBreak,
    RoleSpan,
    Reference,
    Metadata,
    ListMarker,
    DescriptionMarker,
    CalloutMarker,
    LineComment,
    Break,
    BlockMacro,
    AttributeEntry,
    Bibliography,
    Conditional,
    Admonition,
    MathBlock,
    TableMarker,
    Section6,
    Section5,
    Section4,
    Section3,
    Section2,
    Section1,
    DoubleDelimiter,
    Passthrough,
    InlineMacro,
    AutoLink,
    ExplicitLink,
    BlockComment,
    Fence,
}

/// A section marker and its rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMarker {
    pub level: u8,
    pub marker: &'static str,
    pub precedence: Precedence,
}

/// Section markers by level. A level-N section only nests level N+1.
pub const SECTION_MARKERS: [SectionMarker; 6] = [
    SectionMarker {
        level: 1,
        marker: "=",
        precedence: Precedence::Section1,
    },
    SectionMarker {
        level: 2,
        marker: "==",
        precedence: Precedence::Section2,
    },
    SectionMarker {
        level: 3,
        marker: "===",
        precedence: Precedence::Section3,
    },
    SectionMarker {
        level: 4,
        marker: "====",
        precedence: Precedence::Section4,
    },
    SectionMarker {
        level: 5,
        marker: "=====",
        precedence: Precedence::Section5,
    },
    SectionMarker {
        level: 6,
        marker: "======",
        precedence: Precedence::Section6,
    },
];

/// Find the marker that opens `line`, if it is a section line.
///
/// A marker only matches when followed by whitespace and a title, so a run of `=` is
/// never split into a shorter marker plus leftover `=`.
pub(crate) fn section_marker(line: &str) -> Option<SectionMarker> {
    let candidates = SECTION_MARKERS.iter().filter_map(|marker| {
        let rest = line.strip_prefix(marker.marker)?;
        let title = rest.strip_prefix([' ', '\t'])?;
        if title.trim().is_empty() {
            return None;
        }
        Some(Candidate::new(marker.precedence, marker.marker.len(), *marker))
    });
    choose(candidates).map(|candidate| candidate.value)
}

/// A rule that matched at some position, ending at `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate<T> {
    pub(crate) precedence: Precedence,
    pub(crate) end: usize,
    pub(crate) value: T,
}

impl<T> Candidate<T> {
    pub(crate) fn new(precedence: Precedence, end: usize, value: T) -> Self {
        Self {
            precedence,
            end,
            value,
        }
    }
}

/// Static precedence: the highest rank wins; on equal rank the first candidate wins.
pub(crate) fn choose<T>(
    candidates: impl IntoIterator<Item = Candidate<T>>,
) -> Option<Candidate<T>> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(best) if best.precedence >= candidate.precedence => Some(best),
        Some(_) | None => Some(candidate),
    })
}

/// Local longest match: the candidate consuming the most input wins, falling back to
/// static precedence when two end at the same offset.
pub(crate) fn longest_match<T>(
    candidates: impl IntoIterator<Item = Option<Candidate<T>>>,
) -> Option<Candidate<T>> {
    candidates
        .into_iter()
        .flatten()
        .fold(None, |best, candidate| match best {
            Some(best)
                if (best.end, best.precedence) >= (candidate.end, candidate.precedence) =>
            {
                Some(best)
            }
            Some(_) | None => Some(candidate),
        })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn ordering_follows_specificity() {
        assert!(Precedence::CatchAll < Precedence::PlainText);
        assert!(Precedence::PlainText < Precedence::Strong);
        assert!(Precedence::Strong < Precedence::ListMarker);
        assert!(Precedence::ListMarker < Precedence::Admonition);
        assert!(Precedence::Metadata < Precedence::Bibliography);
        assert!(Precedence::Admonition < Precedence::MathBlock);
        assert!(Precedence::MathBlock < Precedence::Section6);
        assert!(Precedence::Section1 < Precedence::DoubleDelimiter);
        assert!(Precedence::DoubleDelimiter < Precedence::Fence);
        assert!(Precedence::AutoLink < Precedence::ExplicitLink);
    }

    #[test]
    fn section_markers_rank_by_level() {
        for pair in SECTION_MARKERS.windows(2) {
            if let [higher, lower] = pair {
                assert!(higher.precedence > lower.precedence);
                assert_eq!(higher.level + 1, lower.level);
            }
        }
    }

    #[rstest]
    #[case("= Title", Some(1))]
    #[case("=== Deep title", Some(3))]
    #[case("====== Six", Some(6))]
    #[case("======= Seven", None)]
    #[case("==Title", None)]
    #[case("== ", None)]
    #[case("====", None)]
    fn section_marker_levels(#[case] line: &str, #[case] level: Option<u8>) {
        assert_eq!(section_marker(line).map(|marker| marker.level), level);
    }

    #[test]
    fn choose_prefers_rank_then_order() {
        let winner = choose([
            Candidate::new(Precedence::Strong, 3, "strong"),
            Candidate::new(Precedence::DoubleDelimiter, 8, "double"),
            Candidate::new(Precedence::DoubleDelimiter, 9, "later double"),
        ]);
        assert_eq!(winner.map(|c| c.value), Some("double"));
        assert_eq!(choose(Vec::<Candidate<()>>::new()), None);
    }

    #[test]
    fn longest_match_prefers_consumed_input() {
        let winner = longest_match([
            Some(Candidate::new(Precedence::ExplicitLink, 18, "explicit")),
            Some(Candidate::new(Precedence::AutoLink, 12, "auto")),
        ]);
        assert_eq!(winner.map(|c| c.value), Some("explicit"));

        let winner = longest_match([None, Some(Candidate::new(Precedence::AutoLink, 12, "auto"))]);
        assert_eq!(winner.map(|c| c.value), Some("auto"));

        let tie = longest_match([
            Some(Candidate::new(Precedence::Strong, 5, "single")),
            Some(Candidate::new(Precedence::DoubleDelimiter, 5, "double")),
        ]);
        assert_eq!(tie.map(|c| c.value), Some("double"));
    }
}
