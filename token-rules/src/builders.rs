//! Convenience constructors that wrap an existing rule.
//!
//! Every method here is pure composition: it consumes `self` and returns a
//! new rule. Methods that take counts validate them and fail with
//! [`RuleError::InvalidArgument`](crate::RuleError::InvalidArgument).

use crate::assertions::Polarity;
use crate::combinators::RuleList;
use crate::error::Result;
use crate::quantifiers::Repetition;
use crate::rule::TokenRule;
use std::sync::Arc;

impl TokenRule {
    /// Matches `self` or nothing. Never fails.
    pub fn optional(self) -> TokenRule {
        TokenRule::Optional(Arc::new(self))
    }

    /// Matches `self` `min` or more times.
    pub fn at_least(self, min: usize) -> Result<TokenRule> {
        TokenRule::repeated(self, min, None)
    }

    /// Matches `self` exactly `count` times.
    pub fn exactly(self, count: usize) -> Result<TokenRule> {
        TokenRule::repeated(self, count, Some(count))
    }

    /// Matches `self` up to `max` times, possibly zero.
    pub fn at_most(self, max: usize) -> Result<TokenRule> {
        TokenRule::repeated(self, 0, Some(max))
    }

    /// Matches `self` between `min` and `max` times, inclusive.
    pub fn between(self, min: usize, max: usize) -> Result<TokenRule> {
        TokenRule::repeated(self, min, Some(max))
    }

    pub fn zero_or_more(self) -> TokenRule {
        TokenRule::Repeated(Repetition::unbounded(self, 0))
    }

    pub fn one_or_more(self) -> TokenRule {
        TokenRule::Repeated(Repetition::unbounded(self, 1))
    }

    /// Matches a single `TokenGroup` whose children match `self` from the
    /// first child.
    pub fn group(self) -> TokenRule {
        TokenRule::Group(Arc::new(self))
    }

    pub fn lookahead(self) -> TokenRule {
        self.lookaround(true, Polarity::Positive)
    }

    pub fn negative_lookahead(self) -> TokenRule {
        self.lookaround(true, Polarity::Negative)
    }

    pub fn lookbehind(self) -> TokenRule {
        self.lookaround(false, Polarity::Positive)
    }

    pub fn negative_lookbehind(self) -> TokenRule {
        self.lookaround(false, Polarity::Negative)
    }

    /// Binds whatever `self` matches under `key`.
    pub fn capture(self, key: impl Into<Arc<str>>) -> TokenRule {
        TokenRule::Capture {
            key: key.into(),
            inner: Arc::new(self),
        }
    }

    /// Appends `next` to this rule, extending an existing sequence in place.
    pub fn then(self, next: TokenRule) -> TokenRule {
        match self {
            TokenRule::Sequence(rules) => TokenRule::Sequence(rules.push(next)),
            first => TokenRule::Sequence(RuleList::pair(first, next)),
        }
    }

    /// Adds `alternative` after this rule's alternatives.
    pub fn or(self, alternative: TokenRule) -> TokenRule {
        match self {
            TokenRule::AnyOf(rules) => TokenRule::AnyOf(rules.push(alternative)),
            first => TokenRule::AnyOf(RuleList::pair(first, alternative)),
        }
    }

    fn lookaround(self, ahead: bool, polarity: Polarity) -> TokenRule {
        let inner = Arc::new(self);
        if ahead {
            TokenRule::Lookahead { inner, polarity }
        } else {
            TokenRule::Lookbehind { inner, polarity }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TokenRuleContext;
    use crate::stream::TokenStream;
    use token_common::Token;

    #[test]
    fn test_then_flattens_sequences() {
        let rule = TokenRule::value("a")
            .then(TokenRule::value("b"))
            .then(TokenRule::value("c"));
        assert_eq!(
            format!("{rule:?}"),
            r#"seq[value("a"), value("b"), value("c")]"#
        );
    }

    #[test]
    fn test_or_builds_ordered_choice() {
        let rule = TokenRule::value("a").or(TokenRule::value("b"));
        let mut ctx = TokenRuleContext::empty();
        let mut s = TokenStream::new(vec![Token::text("b")]);
        assert!(rule.try_match(&mut s, &mut ctx).unwrap().is_some());
        assert_eq!(format!("{rule:?}"), r#"any_of[value("a"), value("b")]"#);
    }

    #[test]
    fn test_lookaround_debug() {
        assert_eq!(
            format!("{:?}", TokenRule::value("a").negative_lookbehind()),
            r#"!lookbehind(value("a"))"#
        );
        assert_eq!(
            format!("{:?}", TokenRule::value("a").capture("k")),
            r#"capture(k, value("a"))"#
        );
    }
}
