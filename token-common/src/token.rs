//! The immutable token model.
//!
//! Tokens are produced by an external tokenizer and are read-only from the
//! engine's point of view. The type-tag set can only be shaped while a token
//! is being built (see [`TokenBuilder`]); afterwards every token is a plain
//! value that is cheap to clone.

use crate::{Position, TextSlice, TokenType};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// A unit of input text plus metadata.
///
/// Decorating variants (`Shadow`, `Indexed`, `Annotated`) delegate their text,
/// position and types to the token they wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A plain token.
    Text(TextToken),
    /// A composite token that owns an ordered run of child tokens.
    Group(TokenGroup),
    /// A token that is kept in the stream but invisible to matchers.
    Shadow(ShadowToken),
    /// A token decorated with an ordinal.
    Indexed(IndexedToken),
    /// A token decorated with key/value metadata.
    Annotated(AnnotatedToken),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextToken {
    value: TextSlice,
    position: Option<Position>,
    types: BTreeSet<TokenType>,
}

impl TextToken {
    pub fn value(&self) -> &TextSlice {
        &self.value
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn types(&self) -> &BTreeSet<TokenType> {
        &self.types
    }
}

/// A composite token. Positionally it counts as exactly one token; its
/// children can be matched by `Group` rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGroup {
    children: Arc<Vec<Token>>,
    value: TextSlice,
    position: Option<Position>,
    types: BTreeSet<TokenType>,
}

impl TokenGroup {
    /// Creates a group whose text is the concatenation of its children and
    /// whose position is the first child's position.
    pub fn new(children: Vec<Token>) -> Self {
        let value: String = children.iter().map(Token::value).collect();
        let position = children.first().and_then(Token::position);
        Self {
            children: Arc::new(children),
            value: TextSlice::from(value),
            position,
            types: BTreeSet::new(),
        }
    }

    pub fn with_types<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TokenType>,
    {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn children(&self) -> &[Token] {
        &self.children
    }

    /// Returns the shared child list, for building a stream over the group.
    pub fn shared_children(&self) -> Arc<Vec<Token>> {
        Arc::clone(&self.children)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowToken {
    inner: Arc<Token>,
}

impl ShadowToken {
    pub fn inner(&self) -> &Token {
        &self.inner
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedToken {
    index: usize,
    inner: Arc<Token>,
}

impl IndexedToken {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn inner(&self) -> &Token {
        &self.inner
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedToken {
    inner: Arc<Token>,
    annotations: BTreeMap<String, String>,
}

impl AnnotatedToken {
    pub fn inner(&self) -> &Token {
        &self.inner
    }

    pub fn annotations(&self) -> &BTreeMap<String, String> {
        &self.annotations
    }
}

/// Builder for plain tokens. This is the only place a token's type set can
/// be changed.
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    value: TextSlice,
    position: Option<Position>,
    types: BTreeSet<TokenType>,
}

impl TokenBuilder {
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_type(mut self, token_type: impl Into<TokenType>) -> Self {
        self.types.insert(token_type.into());
        self
    }

    pub fn with_types<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TokenType>,
    {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Token {
        Token::Text(TextToken {
            value: self.value,
            position: self.position,
            types: self.types,
        })
    }
}

impl Token {
    /// Starts building a plain token.
    pub fn builder(value: impl Into<TextSlice>) -> TokenBuilder {
        TokenBuilder {
            value: value.into(),
            position: None,
            types: BTreeSet::new(),
        }
    }

    /// Creates a plain token with no position and no types.
    pub fn text(value: impl Into<TextSlice>) -> Token {
        Self::builder(value).build()
    }

    /// Creates a plain token carrying a single type tag.
    pub fn typed(value: impl Into<TextSlice>, token_type: impl Into<TokenType>) -> Token {
        Self::builder(value).with_type(token_type).build()
    }

    pub fn group(children: Vec<Token>) -> Token {
        Token::Group(TokenGroup::new(children))
    }

    /// Hides a token from matchers. Shadowing a shadow token, decorated or
    /// not, is a no-op.
    pub fn shadow(token: Token) -> Token {
        if token.is_shadow() {
            return token;
        }
        Token::Shadow(ShadowToken {
            inner: Arc::new(token),
        })
    }

    pub fn indexed(index: usize, token: Token) -> Token {
        Token::Indexed(IndexedToken {
            index,
            inner: Arc::new(token),
        })
    }

    /// Attaches a key/value annotation. Annotating an annotated token adds
    /// to its existing metadata.
    pub fn annotated(token: Token, key: impl Into<String>, value: impl Into<String>) -> Token {
        match token {
            Token::Annotated(mut annotated) => {
                annotated.annotations.insert(key.into(), value.into());
                Token::Annotated(annotated)
            }
            other => {
                let mut annotations = BTreeMap::new();
                annotations.insert(key.into(), value.into());
                Token::Annotated(AnnotatedToken {
                    inner: Arc::new(other),
                    annotations,
                })
            }
        }
    }

    pub fn text_slice(&self) -> &TextSlice {
        match self {
            Token::Text(token) => &token.value,
            Token::Group(group) => &group.value,
            Token::Shadow(shadow) => shadow.inner.text_slice(),
            Token::Indexed(indexed) => indexed.inner.text_slice(),
            Token::Annotated(annotated) => annotated.inner.text_slice(),
        }
    }

    pub fn value(&self) -> &str {
        self.text_slice().as_str()
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Token::Text(token) => token.position,
            Token::Group(group) => group.position,
            Token::Shadow(shadow) => shadow.inner.position(),
            Token::Indexed(indexed) => indexed.inner.position(),
            Token::Annotated(annotated) => annotated.inner.position(),
        }
    }

    pub fn types(&self) -> &BTreeSet<TokenType> {
        match self {
            Token::Text(token) => &token.types,
            Token::Group(group) => &group.types,
            Token::Shadow(shadow) => shadow.inner.types(),
            Token::Indexed(indexed) => indexed.inner.types(),
            Token::Annotated(annotated) => annotated.inner.types(),
        }
    }

    pub fn has_type(&self, token_type: &TokenType) -> bool {
        self.types().contains(token_type)
    }

    /// Returns true if this token carries every tag in `required`.
    pub fn has_all_types(&self, required: &BTreeSet<TokenType>) -> bool {
        required.is_subset(self.types())
    }

    /// Returns true if the token is hidden from matchers. Index and
    /// annotation decorators keep a shadow hidden.
    pub fn is_shadow(&self) -> bool {
        match self {
            Token::Shadow(_) => true,
            Token::Indexed(indexed) => indexed.inner.is_shadow(),
            Token::Annotated(annotated) => annotated.inner.is_shadow(),
            Token::Text(_) | Token::Group(_) => false,
        }
    }

    /// Returns the group behind this token, looking through index and
    /// annotation decorators.
    pub fn as_group(&self) -> Option<&TokenGroup> {
        match self {
            Token::Group(group) => Some(group),
            Token::Indexed(indexed) => indexed.inner.as_group(),
            Token::Annotated(annotated) => annotated.inner.as_group(),
            Token::Text(_) | Token::Shadow(_) => None,
        }
    }

    /// Returns the ordinal of the nearest `Indexed` decorator.
    pub fn index(&self) -> Option<usize> {
        match self {
            Token::Indexed(indexed) => Some(indexed.index),
            Token::Annotated(annotated) => annotated.inner.index(),
            Token::Shadow(shadow) => shadow.inner.index(),
            Token::Text(_) | Token::Group(_) => None,
        }
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        match self {
            Token::Annotated(annotated) => annotated
                .annotations
                .get(key)
                .map(String::as_str)
                .or_else(|| annotated.inner.annotation(key)),
            Token::Indexed(indexed) => indexed.inner.annotation(key),
            Token::Shadow(shadow) => shadow.inner.annotation(key),
            Token::Text(_) | Token::Group(_) => None,
        }
    }

    /// Returns the wrapped token of an outermost shadow, or `self` otherwise.
    pub fn unshadowed(&self) -> &Token {
        match self {
            Token::Shadow(shadow) => shadow.inner.unshadowed(),
            other => other,
        }
    }

    /// Returns true if the token terminates a line, either by tag or by text.
    pub fn ends_line(&self) -> bool {
        self.has_type(&TokenType::NEWLINE) || self.value().ends_with('\n')
    }

    /// Returns true if the token is itself a line break.
    pub fn is_line_break(&self) -> bool {
        self.has_type(&TokenType::NEWLINE) || self.value().starts_with(['\n', '\r'])
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token::text(value)
    }
}

impl From<TokenGroup> for Token {
    fn from(group: TokenGroup) -> Self {
        Token::Group(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_types_and_position() {
        let token = Token::builder("fn")
            .position(Position::at(1, 1, 0))
            .with_type("keyword")
            .with_type(TokenType::new("reserved"))
            .build();

        assert_eq!(token.value(), "fn");
        assert_eq!(token.position(), Some(Position::at(1, 1, 0)));
        assert!(token.has_type(&TokenType::new("keyword")));
        assert!(token.has_type(&TokenType::new("reserved")));
        assert_eq!(token.types().len(), 2);
    }

    #[test]
    fn test_has_all_types_is_superset_check() {
        let token = Token::builder("x").with_types(["identifier", "local"]).build();
        let required: BTreeSet<TokenType> = ["identifier"].into_iter().map(Into::into).collect();
        let too_many: BTreeSet<TokenType> =
            ["identifier", "global"].into_iter().map(Into::into).collect();

        assert!(token.has_all_types(&required));
        assert!(!token.has_all_types(&too_many));
        assert!(token.has_all_types(&BTreeSet::new()));
    }

    #[test]
    fn test_group_concatenates_children() {
        let group = TokenGroup::new(vec![
            Token::builder("(").position(Position::at(2, 3, 10)).build(),
            Token::text("x"),
            Token::text(")"),
        ])
        .with_types(["parens"]);

        assert_eq!(group.len(), 3);
        let token = Token::from(group);
        assert_eq!(token.value(), "(x)");
        assert_eq!(token.position(), Some(Position::at(2, 3, 10)));
        assert!(token.has_type(&TokenType::new("parens")));
        assert!(token.as_group().is_some());
    }

    #[test]
    fn test_decorators_delegate() {
        let base = Token::typed("value", "word");
        let decorated = Token::annotated(Token::indexed(7, base.clone()), "role", "subject");

        assert_eq!(decorated.value(), "value");
        assert!(decorated.has_type(&TokenType::new("word")));
        assert_eq!(decorated.index(), Some(7));
        assert_eq!(decorated.annotation("role"), Some("subject"));
        assert_eq!(decorated.annotation("missing"), None);
        assert_ne!(decorated, base);
    }

    #[test]
    fn test_annotating_twice_merges_metadata() {
        let token = Token::annotated(Token::text("a"), "k1", "v1");
        let token = Token::annotated(token, "k2", "v2");

        match &token {
            Token::Annotated(annotated) => {
                assert_eq!(annotated.annotations().len(), 2);
                assert_eq!(annotated.inner(), &Token::text("a"));
            }
            other => panic!("expected annotated token, got {other:?}"),
        }
    }

    #[test]
    fn test_shadow_is_idempotent() {
        let shadow = Token::shadow(Token::text(" "));
        let again = Token::shadow(shadow.clone());
        assert_eq!(shadow, again);
        assert!(again.is_shadow());
        assert_eq!(again.unshadowed(), &Token::text(" "));
        assert!(again.as_group().is_none());
    }

    #[test]
    fn test_line_break_detection() {
        assert!(Token::text("\n").is_line_break());
        assert!(Token::text("\r\n").ends_line());
        assert!(Token::typed(";", TokenType::NEWLINE).is_line_break());
        assert!(!Token::text("x").ends_line());
    }

    #[test]
    fn test_structural_equality_includes_position() {
        let a = Token::builder("a").position(Position::at(1, 1, 0)).build();
        let b = Token::builder("a").position(Position::at(1, 3, 2)).build();
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }
}
