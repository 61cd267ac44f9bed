//! Structural combinators: sequence, ordered choice, boundary spans and
//! group descent.

use crate::context::TokenRuleContext;
use crate::error::{Result, RuleError};
use crate::rule::{MatchResult, TokenRule};
use crate::rule_match::RuleKind;
use crate::stream::TokenStream;
use std::fmt;
use std::sync::Arc;

/// A non-empty, ordered list of rules.
#[derive(Clone)]
pub struct RuleList {
    rules: Vec<Arc<TokenRule>>,
}

impl RuleList {
    pub(crate) fn new<I>(kind: RuleKind, rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = TokenRule>,
    {
        let rules: Vec<Arc<TokenRule>> = rules.into_iter().map(Arc::new).collect();
        if rules.is_empty() {
            return Err(RuleError::invalid(kind, "at least one rule is required"));
        }
        Ok(Self { rules })
    }

    pub(crate) fn pair(first: TokenRule, second: TokenRule) -> Self {
        Self {
            rules: vec![Arc::new(first), Arc::new(second)],
        }
    }

    pub(crate) fn push(mut self, rule: TokenRule) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn rules(&self) -> &[Arc<TokenRule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.iter()).finish()
    }
}

pub(crate) fn match_sequence(
    rules: &RuleList,
    stream: &mut TokenStream,
    context: &mut TokenRuleContext,
) -> MatchResult {
    let start = stream.current_index();
    for rule in rules.rules() {
        if rule.try_match(stream, context)?.is_none() {
            return Ok(None);
        }
    }
    Ok(Some(stream.span_match(start, RuleKind::Sequence)))
}

pub(crate) fn match_any_of(
    rules: &RuleList,
    stream: &mut TokenStream,
    context: &mut TokenRuleContext,
) -> MatchResult {
    for rule in rules.rules() {
        if let Some(found) = rule.try_match(stream, context)? {
            return Ok(Some(found.with_kind(RuleKind::AnyOf)));
        }
    }
    Ok(None)
}

pub(crate) fn match_group(
    inner: &TokenRule,
    stream: &mut TokenStream,
    context: &mut TokenRuleContext,
) -> MatchResult {
    let children = match stream.current().and_then(|token| token.as_group()) {
        Some(group) => group.shared_children(),
        None => return Ok(None),
    };
    let mut interior = TokenStream::immutable(children);
    if inner.try_match(&mut interior, context)?.is_none() {
        return Ok(None);
    }
    Ok(stream.consume_current(RuleKind::Group))
}

/// A delimited span: `start`, then repetitions of `between`, then `end`.
///
/// The region is scanned lazily: before each `between` step the `end` rule is
/// tried, and the first `end` that matches closes the span.
#[derive(Clone)]
pub struct BoundarySpan {
    start: Arc<TokenRule>,
    between: Arc<TokenRule>,
    end: Arc<TokenRule>,
}

impl BoundarySpan {
    pub(crate) fn new(start: TokenRule, between: TokenRule, end: TokenRule) -> Self {
        Self {
            start: Arc::new(start),
            between: Arc::new(between),
            end: Arc::new(end),
        }
    }

    pub fn start(&self) -> &TokenRule {
        &self.start
    }

    pub fn between(&self) -> &TokenRule {
        &self.between
    }

    pub fn end(&self) -> &TokenRule {
        &self.end
    }

    pub(crate) fn match_span(
        &self,
        stream: &mut TokenStream,
        context: &mut TokenRuleContext,
    ) -> MatchResult {
        let start = stream.current_index();
        if self.start.try_match(stream, context)?.is_none() {
            return Ok(None);
        }
        loop {
            if self.end.try_match(stream, context)?.is_some() {
                return Ok(Some(stream.span_match(start, RuleKind::Boundary)));
            }
            if !stream.has_more_tokens() {
                return Ok(None);
            }
            match self.between.try_match(stream, context)? {
                Some(step) if !step.is_zero_width() => {}
                // a zero-width step cannot bring `end` any closer
                _ => return Ok(None),
            }
        }
    }
}

impl fmt::Debug for BoundarySpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "boundary({:?}, {:?}, {:?})",
            self.start, self.between, self.end
        )
    }
}
