/// A checkpoint for saving and restoring a token stream cursor.
///
/// Rules take a checkpoint before trying to match and restore it on failure,
/// which is how the engine guarantees that a failed rule never consumes input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint {
    /// The raw token index at this checkpoint.
    index: usize,
}

impl Checkpoint {
    /// Creates a new checkpoint at the given raw index.
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Returns the raw token index stored in this checkpoint.
    pub fn index(&self) -> usize {
        self.index
    }
}
