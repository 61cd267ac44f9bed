use std::borrow::Cow;
use std::fmt;

/// A type tag attached to a token by the tokenizer.
///
/// The set of tags is open: tokenizers define their own (`keyword`,
/// `identifier`, `number`, ...). Tags compare by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenType(Cow<'static, str>);

impl TokenType {
    /// Tag for tokens that end a line.
    pub const NEWLINE: TokenType = TokenType::from_static("newline");
    /// Tag for whitespace tokens.
    pub const WHITESPACE: TokenType = TokenType::from_static("whitespace");

    /// Creates a tag from a static name without allocating.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a tag from any string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TokenType {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_and_owned_tags_are_equal() {
        assert_eq!(TokenType::from_static("keyword"), TokenType::new("keyword"));
    }

    #[test]
    fn test_name_and_display() {
        assert_eq!(TokenType::NEWLINE.name(), "newline");
        assert_eq!(TokenType::new("number").to_string(), "number");
    }
}
