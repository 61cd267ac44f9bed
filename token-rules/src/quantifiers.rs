use crate::context::TokenRuleContext;
use crate::error::{Result, RuleError};
use crate::rule::{MatchResult, TokenRule};
use crate::rule_match::{RuleKind, TokenRuleMatch};
use crate::stream::TokenStream;
use std::fmt;
use std::sync::Arc;

pub(crate) fn match_optional(
    inner: &TokenRule,
    stream: &mut TokenStream,
    context: &mut TokenRuleContext,
) -> MatchResult {
    match inner.try_match(stream, context)? {
        Some(found) => Ok(Some(found.with_kind(RuleKind::Optional))),
        None => Ok(Some(TokenRuleMatch::empty(
            stream.current_index(),
            RuleKind::Optional,
        ))),
    }
}

/// Greedy bounded repetition of a single rule.
#[derive(Clone)]
pub struct Repetition {
    inner: Arc<TokenRule>,
    min: usize,
    max: Option<usize>,
}

impl Repetition {
    pub(crate) fn new(inner: TokenRule, min: usize, max: Option<usize>) -> Result<Self> {
        if let Some(max) = max {
            if max == 0 {
                return Err(RuleError::invalid(RuleKind::Repeated, "max must be positive"));
            }
            if max < min {
                return Err(RuleError::invalid(
                    RuleKind::Repeated,
                    format!("max ({max}) is smaller than min ({min})"),
                ));
            }
        }
        Ok(Self {
            inner: Arc::new(inner),
            min,
            max,
        })
    }

    pub(crate) fn unbounded(inner: TokenRule, min: usize) -> Self {
        Self {
            inner: Arc::new(inner),
            min,
            max: None,
        }
    }

    pub fn inner(&self) -> &TokenRule {
        &self.inner
    }

    pub fn min(&self) -> usize {
        self.min
    }

    /// `None` means unbounded.
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub(crate) fn match_repeated(
        &self,
        stream: &mut TokenStream,
        context: &mut TokenRuleContext,
    ) -> MatchResult {
        let start = stream.current_index();
        let mut count = 0usize;
        while self.max.map_or(true, |max| count < max) {
            match self.inner.try_match(stream, context)? {
                Some(step) if step.is_zero_width() => {
                    // further iterations would match the same empty span
                    count = (count + 1).max(self.min);
                    break;
                }
                Some(_) => count += 1,
                None => break,
            }
        }
        if count < self.min {
            return Ok(None);
        }
        Ok(Some(stream.span_match(start, RuleKind::Repeated)))
    }
}

impl fmt::Debug for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "repeat{{{},{}}}({:?})", self.min, max, self.inner),
            None => write!(f, "repeat{{{},}}({:?})", self.min, self.inner),
        }
    }
}
