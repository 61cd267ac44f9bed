use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Immutable token text referencing a shared buffer.
///
/// A tokenizer can hand out slices of its source buffer without copying, and
/// tokens built from owned strings get a buffer of their own. Either way the
/// slice is cheap to clone and derefs to `&str`.
#[derive(Clone, Debug)]
pub struct TextSlice {
    buffer: Arc<str>,
    start: usize,
    end: usize,
}

impl TextSlice {
    /// Creates a new slice from the given shared buffer and byte range.
    pub fn new(buffer: Arc<str>, start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        debug_assert!(end <= buffer.len());
        debug_assert!(buffer.is_char_boundary(start) && buffer.is_char_boundary(end));
        Self { buffer, start, end }
    }

    /// Creates a slice that covers the entire buffer.
    pub fn from_arc(buffer: Arc<str>) -> Self {
        let end = buffer.len();
        Self {
            buffer,
            start: 0,
            end,
        }
    }

    /// Returns the text as a string slice.
    pub fn as_str(&self) -> &str {
        &self.buffer[self.start..self.end]
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns the length in characters.
    pub fn char_len(&self) -> usize {
        self.as_str().chars().count()
    }

    /// Returns `true` if the slice is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the start offset within the shared buffer.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the end offset within the shared buffer.
    pub fn end(&self) -> usize {
        self.end
    }
}

impl std::fmt::Display for TextSlice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Deref for TextSlice {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for TextSlice {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for TextSlice {
    fn from(value: &str) -> Self {
        Self::from_arc(Arc::from(value))
    }
}

impl From<String> for TextSlice {
    fn from(value: String) -> Self {
        Self::from_arc(Arc::from(value))
    }
}

impl PartialEq<&str> for TextSlice {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<TextSlice> for &str {
    fn eq(&self, other: &TextSlice) -> bool {
        *self == other.as_str()
    }
}

// Equality is textual: two slices of different buffers with the same text are equal.
impl PartialEq for TextSlice {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TextSlice {}

impl Hash for TextSlice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}
