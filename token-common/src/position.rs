use std::fmt;

/// Represents the position of a token in the source text.
///
/// Positions are attached to tokens by the tokenizer and are optional: the
/// rule engine only consults them for line anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Byte offset from the start of the input
    pub offset: usize,
}

impl Position {
    /// Creates a new position at the start of the input.
    pub fn new() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Creates a position with the given values.
    pub fn at(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Returns true if both positions lie on the same line.
    pub fn same_line(&self, other: &Position) -> bool {
        self.line == other.line
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_new() {
        let pos = Position::new();
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 1);
        assert_eq!(pos.offset, 0);
    }

    #[test]
    fn test_position_default_is_start() {
        assert_eq!(Position::default(), Position::at(1, 1, 0));
    }

    #[test]
    fn test_same_line() {
        let a = Position::at(3, 1, 20);
        let b = Position::at(3, 9, 28);
        let c = Position::at(4, 1, 30);
        assert!(a.same_line(&b));
        assert!(!b.same_line(&c));
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::at(12, 4, 200).to_string(), "12:4");
    }

    #[test]
    fn test_ordering_follows_line_then_column() {
        assert!(Position::at(1, 9, 8) < Position::at(2, 1, 10));
        assert!(Position::at(2, 1, 10) < Position::at(2, 3, 12));
    }
}
