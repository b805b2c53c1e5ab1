use serde::Serialize;

/// A 1-indexed source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// An inclusive source range; `end` never precedes `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Build a range from raw line/column components.
    #[must_use]
    pub const fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start: Position {
                line: start_line,
                column: start_col,
            },
            end: Position {
                line: end_line,
                column: end_col,
            },
        }
    }
}

/// Line-start offset table for one source text.
///
/// Built in a single pass; scoped to a single parse call so concurrent
/// parses never share position state.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineMap {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Map a byte offset to its 1-indexed (line, column) position.
    ///
    /// Offsets past the end of the text degrade to the position just
    /// past the final character rather than panicking.
    #[must_use]
    pub fn offset_to_line_col(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line_idx = self.line_starts.partition_point(|&s| s <= offset) - 1;
        Position {
            line: line_idx + 1,
            column: offset - self.line_starts[line_idx] + 1,
        }
    }

    /// Number of lines in the mapped text.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line() {
        let map = LineMap::new("set x 1\nset y 2\n");
        assert_eq!(map.offset_to_line_col(0), Position { line: 1, column: 1 });
        assert_eq!(map.offset_to_line_col(4), Position { line: 1, column: 5 });
    }

    #[test]
    fn second_line() {
        let map = LineMap::new("set x 1\nset y 2\n");
        assert_eq!(map.offset_to_line_col(8), Position { line: 2, column: 1 });
        assert_eq!(
            map.offset_to_line_col(12),
            Position { line: 2, column: 5 }
        );
    }

    #[test]
    fn offset_past_end_degrades() {
        let map = LineMap::new("puts hi");
        let pos = map.offset_to_line_col(500);
        assert_eq!(pos, Position { line: 1, column: 8 });
    }

    #[test]
    fn empty_text() {
        let map = LineMap::new("");
        assert_eq!(map.offset_to_line_col(0), Position { line: 1, column: 1 });
        assert_eq!(map.line_count(), 1);
    }

    #[test]
    fn range_construction() {
        let r = Range::new(1, 1, 3, 5);
        assert_eq!(r.start.line, 1);
        assert_eq!(r.end.line, 3);
        assert!(r.end.line >= r.start.line);
    }
}
