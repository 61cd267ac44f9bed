use std::fmt;
use token_common::Token;

/// Tag naming the kind of rule that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    AlwaysMatch,
    NeverMatch,
    Value,
    Pattern,
    Length,
    Type,
    Custom,
    Not,
    Sequence,
    AnyOf,
    Boundary,
    Optional,
    Repeated,
    Lookahead,
    Lookbehind,
    StartAnchor,
    EndAnchor,
    Recursive,
    Lazy,
    Group,
    Capture,
    Reference,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::AlwaysMatch => "always-match",
            RuleKind::NeverMatch => "never-match",
            RuleKind::Value => "value",
            RuleKind::Pattern => "pattern",
            RuleKind::Length => "length",
            RuleKind::Type => "type",
            RuleKind::Custom => "custom",
            RuleKind::Not => "not",
            RuleKind::Sequence => "sequence",
            RuleKind::AnyOf => "any-of",
            RuleKind::Boundary => "boundary",
            RuleKind::Optional => "optional",
            RuleKind::Repeated => "repeated",
            RuleKind::Lookahead => "lookahead",
            RuleKind::Lookbehind => "lookbehind",
            RuleKind::StartAnchor => "start-anchor",
            RuleKind::EndAnchor => "end-anchor",
            RuleKind::Recursive => "recursive",
            RuleKind::Lazy => "lazy",
            RuleKind::Group => "group",
            RuleKind::Capture => "capture",
            RuleKind::Reference => "reference",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of a successful match.
///
/// `start` and `end` are raw indices into the matched stream; `tokens` is the
/// raw span between them, shadow tokens included. Zero-width matches have
/// `start == end` and no tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRuleMatch {
    start: usize,
    end: usize,
    tokens: Vec<Token>,
    kind: RuleKind,
}

impl TokenRuleMatch {
    pub fn new(start: usize, end: usize, tokens: Vec<Token>, kind: RuleKind) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            end,
            tokens,
            kind,
        }
    }

    /// Creates a zero-width match at `index`.
    pub fn empty(index: usize, kind: RuleKind) -> Self {
        Self::new(index, index, Vec::new(), kind)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of raw stream slots the match covers.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_zero_width(&self) -> bool {
        self.start == self.end
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// The matched tokens that are visible to matchers.
    pub fn visible_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|token| !token.is_shadow())
    }

    /// Concatenated text of the visible matched tokens.
    pub fn text(&self) -> String {
        self.visible_tokens().map(Token::value).collect()
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub(crate) fn with_kind(mut self, kind: RuleKind) -> Self {
        self.kind = kind;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_width_match() {
        let m = TokenRuleMatch::empty(3, RuleKind::Optional);
        assert!(m.is_zero_width());
        assert_eq!(m.len(), 0);
        assert!(m.tokens().is_empty());
        assert_eq!(m.text(), "");
    }

    #[test]
    fn test_text_skips_shadow_tokens() {
        let m = TokenRuleMatch::new(
            0,
            3,
            vec![
                Token::text("a"),
                Token::shadow(Token::text(" ")),
                Token::text("b"),
            ],
            RuleKind::Sequence,
        );
        assert_eq!(m.text(), "ab");
        assert_eq!(m.visible_tokens().count(), 2);
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(RuleKind::AnyOf.to_string(), "any-of");
    }
}
