//! Single-token matchers.
//!
//! These are the only rules that can be negated: each decides on exactly one
//! token, so the inverse is well defined. Composite rules do not implement
//! [`Negatable`].

use crate::error::{PredicateError, Result, RuleError};
use crate::rule::TokenRule;
use crate::rule_match::{RuleKind, TokenRuleMatch};
use crate::stream::TokenStream;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use token_common::{Token, TokenType};

/// A rule that decides on a single token.
pub trait Negatable: Send + Sync {
    fn kind(&self) -> RuleKind;

    /// Decides whether `token` is accepted.
    fn test(&self, token: &Token) -> Result<bool>;

    /// Matches the current visible token, consuming it on success.
    fn match_current(&self, stream: &mut TokenStream) -> Result<Option<TokenRuleMatch>> {
        let accepted = match stream.current() {
            Some(token) => self.test(token)?,
            None => return Ok(None),
        };
        if accepted {
            Ok(stream.consume_current(self.kind()))
        } else {
            Ok(None)
        }
    }
}

/// Matches a token whose text equals a literal.
#[derive(Debug, Clone)]
pub struct ValueMatcher {
    text: String,
    folded: Option<String>,
}

impl ValueMatcher {
    pub fn new(text: impl Into<String>, ignore_case: bool) -> Self {
        let text = text.into();
        let folded = ignore_case.then(|| text.to_lowercase());
        Self { text, folded }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ignore_case(&self) -> bool {
        self.folded.is_some()
    }
}

impl Negatable for ValueMatcher {
    fn kind(&self) -> RuleKind {
        RuleKind::Value
    }

    fn test(&self, token: &Token) -> Result<bool> {
        Ok(match &self.folded {
            Some(folded) => token.value().to_lowercase() == *folded,
            None => token.value() == self.text,
        })
    }
}

/// Matches a token whose whole text matches a regular expression.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    source: String,
    anchored: Regex,
}

impl PatternMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let anchored = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|err| RuleError::invalid(RuleKind::Pattern, err.to_string()))?;
        Ok(Self {
            source: pattern.to_string(),
            anchored,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Negatable for PatternMatcher {
    fn kind(&self) -> RuleKind {
        RuleKind::Pattern
    }

    fn test(&self, token: &Token) -> Result<bool> {
        Ok(self.anchored.is_match(token.value()))
    }
}

/// Matches a token whose text length, in characters, lies in `min..=max`.
#[derive(Debug, Clone, Copy)]
pub struct LengthMatcher {
    min: usize,
    max: usize,
}

impl LengthMatcher {
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if max < min {
            return Err(RuleError::invalid(
                RuleKind::Length,
                format!("max ({max}) is less than min ({min})"),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl Negatable for LengthMatcher {
    fn kind(&self) -> RuleKind {
        RuleKind::Length
    }

    fn test(&self, token: &Token) -> Result<bool> {
        let len = token.text_slice().char_len();
        Ok((self.min..=self.max).contains(&len))
    }
}

/// Matches a token carrying every required type tag.
#[derive(Debug, Clone)]
pub struct TypeMatcher {
    required: BTreeSet<TokenType>,
}

impl TypeMatcher {
    pub fn new(required: BTreeSet<TokenType>) -> Self {
        Self { required }
    }

    pub fn required(&self) -> &BTreeSet<TokenType> {
        &self.required
    }
}

impl Negatable for TypeMatcher {
    fn kind(&self) -> RuleKind {
        RuleKind::Type
    }

    fn test(&self, token: &Token) -> Result<bool> {
        Ok(token.has_all_types(&self.required))
    }
}

type PredicateFn = dyn Fn(&Token) -> std::result::Result<bool, PredicateError> + Send + Sync;

/// Matches a token accepted by a user predicate. Predicate errors are
/// returned to the caller as [`RuleError::Predicate`].
#[derive(Clone)]
pub struct CustomMatcher {
    label: Arc<str>,
    predicate: Arc<PredicateFn>,
}

impl CustomMatcher {
    pub fn new<F>(label: impl Into<Arc<str>>, predicate: F) -> Self
    where
        F: Fn(&Token) -> std::result::Result<bool, PredicateError> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for CustomMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomMatcher")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Negatable for CustomMatcher {
    fn kind(&self) -> RuleKind {
        RuleKind::Custom
    }

    fn test(&self, token: &Token) -> Result<bool> {
        (self.predicate)(token).map_err(RuleError::Predicate)
    }
}

/// The inverse of a single-token rule. Built by [`TokenRule::not`].
#[derive(Debug, Clone)]
pub struct NegatedRule {
    inner: Arc<TokenRule>,
}

impl NegatedRule {
    pub(crate) fn new(inner: Arc<TokenRule>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &TokenRule {
        &self.inner
    }

    pub(crate) fn into_inner(self) -> TokenRule {
        Arc::try_unwrap(self.inner).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl Negatable for NegatedRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Not
    }

    fn test(&self, token: &Token) -> Result<bool> {
        match self.inner.as_negatable() {
            Some(inner) => Ok(!inner.test(token)?),
            None => Err(RuleError::Unsupported {
                operation: "not",
                rule: "a composite rule",
            }),
        }
    }
}
