use crate::rule::TokenRule;
use indexmap::IndexMap;
use std::sync::Arc;
use token_common::Token;

/// A value bound under a capture key.
#[derive(Debug, Clone)]
pub enum CapturedValue {
    /// A span matched by a `Capture` rule, together with the rule that matched it.
    Span {
        start: usize,
        end: usize,
        tokens: Vec<Token>,
        rule: Arc<TokenRule>,
    },
    /// A rule bound directly, for `RULE` references.
    Rule(Arc<TokenRule>),
}

impl CapturedValue {
    /// The captured tokens, if this binding holds a span.
    pub fn tokens(&self) -> Option<&[Token]> {
        match self {
            CapturedValue::Span { tokens, .. } => Some(tokens),
            CapturedValue::Rule(_) => None,
        }
    }

    /// Concatenated text of the visible captured tokens.
    pub fn text(&self) -> Option<String> {
        self.tokens().map(|tokens| {
            tokens
                .iter()
                .filter(|token| !token.is_shadow())
                .map(Token::value)
                .collect()
        })
    }

    pub fn rule(&self) -> &Arc<TokenRule> {
        match self {
            CapturedValue::Span { rule, .. } | CapturedValue::Rule(rule) => rule,
        }
    }
}

/// Marker returned by [`TokenRuleContext::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextCheckpoint(usize);

/// The capture table threaded through every match call.
///
/// Keys are write-once: the first binding of a key wins for the lifetime of
/// the context. Bindings are kept in insertion order so that a failed match
/// attempt can be undone by truncating back to a checkpoint.
#[derive(Debug, Clone, Default)]
pub struct TokenRuleContext {
    captures: IndexMap<Arc<str>, CapturedValue>,
}

impl TokenRuleContext {
    /// Creates a context with no bindings.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&CapturedValue> {
        self.captures.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.captures.contains_key(key)
    }

    pub fn captured_tokens(&self, key: &str) -> Option<&[Token]> {
        self.get(key).and_then(CapturedValue::tokens)
    }

    pub fn captured_text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(CapturedValue::text)
    }

    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    /// Iterates bindings in the order they were made.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CapturedValue)> {
        self.captures.iter().map(|(key, value)| (key.as_ref(), value))
    }

    /// Binds `value` under `key` unless the key is already bound.
    /// Returns whether the binding was made.
    pub fn bind(&mut self, key: Arc<str>, value: CapturedValue) -> bool {
        if self.captures.contains_key(&key) {
            return false;
        }
        self.captures.insert(key, value);
        true
    }

    /// Binds a rule for later `RULE` references.
    pub fn bind_rule(&mut self, key: impl Into<Arc<str>>, rule: TokenRule) -> bool {
        self.bind(key.into(), CapturedValue::Rule(Arc::new(rule)))
    }

    pub fn checkpoint(&self) -> ContextCheckpoint {
        ContextCheckpoint(self.captures.len())
    }

    /// Drops every binding made after `checkpoint`.
    pub fn rollback(&mut self, checkpoint: ContextCheckpoint) {
        self.captures.truncate(checkpoint.0);
    }

    pub fn clear(&mut self) {
        self.captures.clear();
    }
}
