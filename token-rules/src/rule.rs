use crate::assertions::{self, AnchorKind, Polarity};
use crate::captures::{self, ReferenceMode};
use crate::combinators::{self, BoundarySpan, RuleList};
use crate::context::TokenRuleContext;
use crate::error::{PredicateError, Result, RuleError};
use crate::lazy::{ForwardRef, LazyRule, RecursiveRule};
use crate::negatable::{
    CustomMatcher, LengthMatcher, Negatable, NegatedRule, PatternMatcher, TypeMatcher,
    ValueMatcher,
};
use crate::quantifiers::{self, Repetition};
use crate::rule_match::{RuleKind, TokenRuleMatch};
use crate::stream::TokenStream;
use std::fmt;
use std::sync::Arc;
use token_common::{Token, TokenType};
use tracing::trace;

pub type MatchResult = Result<Option<TokenRuleMatch>>;

/// Consumes exactly one visible token.
pub const ALWAYS_MATCH: TokenRule = TokenRule::AlwaysMatch;
/// Never matches.
pub const NEVER_MATCH: TokenRule = TokenRule::NeverMatch;
pub const START_OF_DOCUMENT: TokenRule = TokenRule::StartAnchor(AnchorKind::Document);
pub const START_OF_LINE: TokenRule = TokenRule::StartAnchor(AnchorKind::Line);
pub const END_OF_DOCUMENT: TokenRule = TokenRule::EndAnchor(AnchorKind::Document);
pub const END_OF_LINE: TokenRule = TokenRule::EndAnchor(AnchorKind::Line);

/// A matcher over a token stream.
///
/// Every variant honors the same contract: a failed match leaves the stream
/// cursor and the capture context exactly as it found them, and a successful
/// match advances the cursor past the tokens it consumed.
#[derive(Clone)]
pub enum TokenRule {
    AlwaysMatch,
    NeverMatch,
    Value(ValueMatcher),
    Pattern(PatternMatcher),
    Length(LengthMatcher),
    Type(TypeMatcher),
    Custom(CustomMatcher),
    Not(NegatedRule),
    Sequence(RuleList),
    AnyOf(RuleList),
    Boundary(BoundarySpan),
    Optional(Arc<TokenRule>),
    Repeated(Repetition),
    Lookahead {
        inner: Arc<TokenRule>,
        polarity: Polarity,
    },
    Lookbehind {
        inner: Arc<TokenRule>,
        polarity: Polarity,
    },
    StartAnchor(AnchorKind),
    EndAnchor(AnchorKind),
    Recursive(RecursiveRule),
    /// The placeholder a recursive rule's factory embeds to refer to itself.
    Forward(ForwardRef),
    Lazy(LazyRule),
    Group(Arc<TokenRule>),
    Capture {
        key: Arc<str>,
        inner: Arc<TokenRule>,
    },
    Reference {
        key: Arc<str>,
        mode: ReferenceMode,
    },
}

impl TokenRule {
    /// Matches a token whose text equals `text` exactly.
    pub fn value(text: impl Into<String>) -> TokenRule {
        TokenRule::Value(ValueMatcher::new(text, false))
    }

    /// Matches a token whose text equals `text` ignoring case.
    pub fn value_ignore_case(text: impl Into<String>) -> TokenRule {
        TokenRule::Value(ValueMatcher::new(text, true))
    }

    /// Matches a token whose entire text matches `pattern`.
    pub fn pattern(pattern: &str) -> Result<TokenRule> {
        PatternMatcher::new(pattern).map(TokenRule::Pattern)
    }

    /// Matches a token whose length in characters lies in `min..=max`.
    pub fn length(min: usize, max: usize) -> Result<TokenRule> {
        LengthMatcher::new(min, max).map(TokenRule::Length)
    }

    /// Matches a token carrying every tag in `required`.
    pub fn types<I, T>(required: I) -> TokenRule
    where
        I: IntoIterator<Item = T>,
        T: Into<TokenType>,
    {
        TokenRule::Type(TypeMatcher::new(
            required.into_iter().map(Into::into).collect(),
        ))
    }

    /// Matches a token accepted by `predicate`.
    pub fn custom<F>(label: impl Into<Arc<str>>, predicate: F) -> TokenRule
    where
        F: Fn(&Token) -> bool + Send + Sync + 'static,
    {
        TokenRule::Custom(CustomMatcher::new(label, move |token| Ok(predicate(token))))
    }

    /// Like [`custom`](Self::custom), for predicates that can fail. The
    /// predicate's error reaches the caller of `try_match` unchanged.
    pub fn try_custom<F, E>(label: impl Into<Arc<str>>, predicate: F) -> TokenRule
    where
        F: Fn(&Token) -> std::result::Result<bool, E> + Send + Sync + 'static,
        E: Into<PredicateError>,
    {
        TokenRule::Custom(CustomMatcher::new(label, move |token| {
            predicate(token).map_err(Into::into)
        }))
    }

    /// Matches every rule in order with no gap.
    pub fn sequence<I>(rules: I) -> Result<TokenRule>
    where
        I: IntoIterator<Item = TokenRule>,
    {
        RuleList::new(RuleKind::Sequence, rules).map(TokenRule::Sequence)
    }

    /// Tries every rule in order at the same position; the first match wins.
    pub fn any_of<I>(rules: I) -> Result<TokenRule>
    where
        I: IntoIterator<Item = TokenRule>,
    {
        RuleList::new(RuleKind::AnyOf, rules).map(TokenRule::AnyOf)
    }

    /// Matches `start`, then any tokens, up to and including the first `end`.
    pub fn boundary(start: TokenRule, end: TokenRule) -> TokenRule {
        Self::boundary_with(start, ALWAYS_MATCH, end)
    }

    /// Matches `start`, then repetitions of `between`, then `end`.
    pub fn boundary_with(start: TokenRule, between: TokenRule, end: TokenRule) -> TokenRule {
        TokenRule::Boundary(BoundarySpan::new(start, between, end))
    }

    /// Matches `inner` greedily between `min` and `max` times (`None` is unbounded).
    pub fn repeated(inner: TokenRule, min: usize, max: Option<usize>) -> Result<TokenRule> {
        Repetition::new(inner, min, max).map(TokenRule::Repeated)
    }

    pub fn start_anchor(kind: AnchorKind) -> TokenRule {
        TokenRule::StartAnchor(kind)
    }

    pub fn end_anchor(kind: AnchorKind) -> TokenRule {
        TokenRule::EndAnchor(kind)
    }

    /// Builds a self-referential rule. The factory receives a placeholder
    /// that matches like the finished rule and may embed it anywhere.
    pub fn recursive<F>(factory: F) -> Result<TokenRule>
    where
        F: FnOnce(TokenRule) -> Result<TokenRule>,
    {
        RecursiveRule::build(factory).map(TokenRule::Recursive)
    }

    /// Matches `inner` against a back-reference binding.
    pub fn reference(key: impl Into<Arc<str>>, mode: ReferenceMode) -> TokenRule {
        TokenRule::Reference {
            key: key.into(),
            mode,
        }
    }

    /// Attempts to match at the stream's cursor.
    ///
    /// Returns `Ok(None)` when the rule does not match; in that case the
    /// cursor and the context are restored to their state before the call.
    pub fn try_match(
        &self,
        stream: &mut TokenStream,
        context: &mut TokenRuleContext,
    ) -> MatchResult {
        let checkpoint = stream.checkpoint();
        let bindings = context.checkpoint();
        let outcome = self.match_here(stream, context);
        if !matches!(outcome, Ok(Some(_))) {
            stream.restore(checkpoint);
            context.rollback(bindings);
        }
        outcome
    }

    fn match_here(&self, stream: &mut TokenStream, context: &mut TokenRuleContext) -> MatchResult {
        match self {
            TokenRule::AlwaysMatch => Ok(stream.consume_current(RuleKind::AlwaysMatch)),
            TokenRule::NeverMatch => Ok(None),
            TokenRule::Value(matcher) => matcher.match_current(stream),
            TokenRule::Pattern(matcher) => matcher.match_current(stream),
            TokenRule::Length(matcher) => matcher.match_current(stream),
            TokenRule::Type(matcher) => matcher.match_current(stream),
            TokenRule::Custom(matcher) => matcher.match_current(stream),
            TokenRule::Not(negated) => negated.match_current(stream),
            TokenRule::Sequence(rules) => combinators::match_sequence(rules, stream, context),
            TokenRule::AnyOf(rules) => combinators::match_any_of(rules, stream, context),
            TokenRule::Boundary(span) => span.match_span(stream, context),
            TokenRule::Optional(inner) => quantifiers::match_optional(inner, stream, context),
            TokenRule::Repeated(repetition) => repetition.match_repeated(stream, context),
            TokenRule::Lookahead { inner, polarity } => {
                assertions::match_lookahead(inner, *polarity, stream, context)
            }
            TokenRule::Lookbehind { inner, polarity } => {
                assertions::match_lookbehind(inner, *polarity, stream, context)
            }
            TokenRule::StartAnchor(kind) => Ok(assertions::at_start(*kind, stream)
                .then(|| TokenRuleMatch::empty(stream.current_index(), RuleKind::StartAnchor))),
            TokenRule::EndAnchor(kind) => Ok(assertions::at_end(*kind, stream)
                .then(|| TokenRuleMatch::empty(stream.current_index(), RuleKind::EndAnchor))),
            TokenRule::Recursive(recursive) => match recursive.target() {
                Some(target) => target.try_match(stream, context),
                None => Ok(None),
            },
            TokenRule::Forward(forward) => {
                let Some(cell) = forward.resolve() else {
                    trace!("recursive placeholder outlived its rule");
                    return Ok(None);
                };
                match cell.get() {
                    Some(target) => target.try_match(stream, context),
                    None => Ok(None),
                }
            }
            TokenRule::Lazy(lazy) => match lazy.target() {
                Some(target) => target.try_match(stream, context),
                None => {
                    trace!(index = stream.current_index(), "matched through an unset lazy rule");
                    Ok(None)
                }
            },
            TokenRule::Group(inner) => combinators::match_group(inner, stream, context),
            TokenRule::Capture { key, inner } => {
                captures::match_capture(key, inner, stream, context)
            }
            TokenRule::Reference { key, mode } => {
                captures::match_reference(key, *mode, stream, context)
            }
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            TokenRule::AlwaysMatch => RuleKind::AlwaysMatch,
            TokenRule::NeverMatch => RuleKind::NeverMatch,
            TokenRule::Value(_) => RuleKind::Value,
            TokenRule::Pattern(_) => RuleKind::Pattern,
            TokenRule::Length(_) => RuleKind::Length,
            TokenRule::Type(_) => RuleKind::Type,
            TokenRule::Custom(_) => RuleKind::Custom,
            TokenRule::Not(_) => RuleKind::Not,
            TokenRule::Sequence(_) => RuleKind::Sequence,
            TokenRule::AnyOf(_) => RuleKind::AnyOf,
            TokenRule::Boundary(_) => RuleKind::Boundary,
            TokenRule::Optional(_) => RuleKind::Optional,
            TokenRule::Repeated(_) => RuleKind::Repeated,
            TokenRule::Lookahead { .. } => RuleKind::Lookahead,
            TokenRule::Lookbehind { .. } => RuleKind::Lookbehind,
            TokenRule::StartAnchor(_) => RuleKind::StartAnchor,
            TokenRule::EndAnchor(_) => RuleKind::EndAnchor,
            TokenRule::Recursive(_) | TokenRule::Forward(_) => RuleKind::Recursive,
            TokenRule::Lazy(_) => RuleKind::Lazy,
            TokenRule::Group(_) => RuleKind::Group,
            TokenRule::Capture { .. } => RuleKind::Capture,
            TokenRule::Reference { .. } => RuleKind::Reference,
        }
    }

    /// Returns the single-token view of this rule, if it has one.
    pub fn as_negatable(&self) -> Option<&dyn Negatable> {
        match self {
            TokenRule::Value(matcher) => Some(matcher),
            TokenRule::Pattern(matcher) => Some(matcher),
            TokenRule::Length(matcher) => Some(matcher),
            TokenRule::Type(matcher) => Some(matcher),
            TokenRule::Custom(matcher) => Some(matcher),
            TokenRule::Not(negated) => Some(negated),
            _ => None,
        }
    }

    pub fn is_negatable(&self) -> bool {
        matches!(self, TokenRule::AlwaysMatch | TokenRule::NeverMatch) || self.as_negatable().is_some()
    }

    /// Inverts a single-token rule.
    ///
    /// Negating a negation returns the original rule. Composite rules have no
    /// single well-defined span to invert and return
    /// [`RuleError::Unsupported`].
    pub fn not(self) -> Result<TokenRule> {
        match self {
            TokenRule::AlwaysMatch => Ok(TokenRule::NeverMatch),
            TokenRule::NeverMatch => Ok(TokenRule::AlwaysMatch),
            TokenRule::Not(negated) => Ok(negated.into_inner()),
            rule if rule.as_negatable().is_some() => {
                Ok(TokenRule::Not(NegatedRule::new(Arc::new(rule))))
            }
            rule => Err(RuleError::Unsupported {
                operation: "not",
                rule: rule.kind().as_str(),
            }),
        }
    }
}

impl fmt::Debug for TokenRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenRule::AlwaysMatch => f.write_str("always"),
            TokenRule::NeverMatch => f.write_str("never"),
            TokenRule::Value(matcher) if matcher.ignore_case() => {
                write!(f, "value_ci({:?})", matcher.text())
            }
            TokenRule::Value(matcher) => write!(f, "value({:?})", matcher.text()),
            TokenRule::Pattern(matcher) => write!(f, "pattern(/{}/)", matcher.source()),
            TokenRule::Length(matcher) => write!(f, "length({}..={})", matcher.min(), matcher.max()),
            TokenRule::Type(matcher) => {
                let names: Vec<&str> = matcher.required().iter().map(TokenType::name).collect();
                write!(f, "type[{}]", names.join(", "))
            }
            TokenRule::Custom(matcher) => write!(f, "custom({})", matcher.label()),
            TokenRule::Not(negated) => write!(f, "not({:?})", negated.inner()),
            TokenRule::Sequence(rules) => write!(f, "seq{:?}", rules),
            TokenRule::AnyOf(rules) => write!(f, "any_of{:?}", rules),
            TokenRule::Boundary(span) => write!(f, "{span:?}"),
            TokenRule::Optional(inner) => write!(f, "optional({inner:?})"),
            TokenRule::Repeated(repetition) => write!(f, "{repetition:?}"),
            TokenRule::Lookahead { inner, polarity } => {
                write!(f, "{}lookahead({inner:?})", polarity.prefix())
            }
            TokenRule::Lookbehind { inner, polarity } => {
                write!(f, "{}lookbehind({inner:?})", polarity.prefix())
            }
            TokenRule::StartAnchor(kind) => write!(f, "^{kind}"),
            TokenRule::EndAnchor(kind) => write!(f, "${kind}"),
            TokenRule::Recursive(recursive) => write!(f, "{recursive:?}"),
            TokenRule::Forward(forward) => write!(f, "{forward:?}"),
            TokenRule::Lazy(lazy) => write!(f, "{lazy:?}"),
            TokenRule::Group(inner) => write!(f, "group({inner:?})"),
            TokenRule::Capture { key, inner } => write!(f, "capture({key}, {inner:?})"),
            TokenRule::Reference { key, mode } => write!(f, "ref({key}, {mode})"),
        }
    }
}

impl From<LazyRule> for TokenRule {
    fn from(lazy: LazyRule) -> Self {
        TokenRule::Lazy(lazy)
    }
}
