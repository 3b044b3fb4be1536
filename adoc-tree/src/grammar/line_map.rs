use crate::model::{Location, Position};

/// Line starts of one source text, for turning byte offsets into line and column.
///
/// Nodes keep byte offsets only: the leaf partition, s-expressions and reparse all
/// work in bytes, and a reused node stays valid as long as the bytes before it are
/// unchanged. Lines and columns are only needed when a warning or `Tree::location`
/// is shown to a person, so they are resolved here, on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineMap {
    line_starts: Vec<usize>,
}

impl LineMap {
    pub(crate) fn new(input: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(input.match_indices('\n').map(|(newline, _)| newline + 1))
            .collect();
        Self { line_starts }
    }

    /// 1-based position of `offset`. Columns count characters, and an offset inside a
    /// multi-byte character resolves to that character.
    #[tracing::instrument(level = "trace", skip(self, input))]
    pub(crate) fn offset_to_position(&self, offset: usize, input: &str) -> Position {
        let offset = offset.min(input.len());
        let line = self.line_starts.partition_point(|start| *start <= offset);
        let line_start = self
            .line_starts
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or(0);
        let boundary = (line_start..=offset)
            .rev()
            .find(|at| input.is_char_boundary(*at))
            .unwrap_or(line_start);
        let column = input
            .get(line_start..boundary)
            .map_or(0, |text| text.chars().count());
        Position {
            line,
            column: column + 1,
        }
    }

    /// Location of the byte range `start..end`.
    pub(crate) fn location(&self, start: usize, end: usize, input: &str) -> Location {
        Location::new(
            start,
            end,
            self.offset_to_position(start, input),
            self.offset_to_position(end, input),
        )
    }

    /// Number of lines, counting a trailing empty line after a final newline.
    pub(crate) fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
