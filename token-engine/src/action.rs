//! Rewrite actions: what a pass emits in place of a matched span.

use std::collections::BTreeSet;
use std::fmt;
use token_common::{Token, TokenGroup, TokenType};
use token_rules::{TokenRuleContext, TokenRuleMatch};

/// What an action can see besides the match itself.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pass: usize,
    captures: &'a TokenRuleContext,
    input: &'a [Token],
}

impl<'a> ActionContext<'a> {
    pub fn new(pass: usize, captures: &'a TokenRuleContext, input: &'a [Token]) -> Self {
        Self {
            pass,
            captures,
            input,
        }
    }

    /// Zero-based index of the running pass.
    pub fn pass_index(&self) -> usize {
        self.pass
    }

    /// Captures made while matching.
    pub fn captures(&self) -> &'a TokenRuleContext {
        self.captures
    }

    pub fn captured_tokens(&self, key: &str) -> Option<&'a [Token]> {
        self.captures.captured_tokens(key)
    }

    pub fn captured_text(&self, key: &str) -> Option<String> {
        self.captures.captured_text(key)
    }

    /// The whole input of the running pass.
    pub fn input(&self) -> &'a [Token] {
        self.input
    }
}

/// Produces the tokens that replace a matched span.
///
/// Closures with the same signature are actions too, which covers computed
/// replacements.
pub trait TokenAction: Send + Sync {
    fn apply(&self, found: &TokenRuleMatch, context: &ActionContext<'_>) -> Vec<Token>;
}

impl<F> TokenAction for F
where
    F: Fn(&TokenRuleMatch, &ActionContext<'_>) -> Vec<Token> + Send + Sync,
{
    fn apply(&self, found: &TokenRuleMatch, context: &ActionContext<'_>) -> Vec<Token> {
        self(found, context)
    }
}

/// Emits the matched tokens unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityAction;

impl TokenAction for IdentityAction {
    fn apply(&self, found: &TokenRuleMatch, _context: &ActionContext<'_>) -> Vec<Token> {
        found.tokens().to_vec()
    }
}

/// Drops the matched tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveAction;

impl TokenAction for RemoveAction {
    fn apply(&self, _found: &TokenRuleMatch, _context: &ActionContext<'_>) -> Vec<Token> {
        Vec::new()
    }
}

/// Replaces every match with a fixed token list.
#[derive(Debug, Clone, Default)]
pub struct ReplaceAction {
    tokens: Vec<Token>,
}

impl ReplaceAction {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Replaces with plain tokens built from `values`.
    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(values.into_iter().map(|v| Token::text(v.as_ref())).collect())
    }
}

impl TokenAction for ReplaceAction {
    fn apply(&self, _found: &TokenRuleMatch, _context: &ActionContext<'_>) -> Vec<Token> {
        self.tokens.clone()
    }
}

/// Splits the matched tokens by a predicate: accepted tokens go to the
/// consumer, rejected ones stay in the output. Shadow tokens always stay.
pub struct ExtractAction {
    predicate: Box<dyn Fn(&Token) -> bool + Send + Sync>,
    consumer: Box<dyn Fn(Token) + Send + Sync>,
}

impl ExtractAction {
    pub fn new<P, C>(predicate: P, consumer: C) -> Self
    where
        P: Fn(&Token) -> bool + Send + Sync + 'static,
        C: Fn(Token) + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            consumer: Box::new(consumer),
        }
    }
}

impl TokenAction for ExtractAction {
    fn apply(&self, found: &TokenRuleMatch, _context: &ActionContext<'_>) -> Vec<Token> {
        let mut kept = Vec::new();
        for token in found.tokens() {
            if !token.is_shadow() && (self.predicate)(token) {
                (self.consumer)(token.clone());
            } else {
                kept.push(token.clone());
            }
        }
        kept
    }
}

impl fmt::Debug for ExtractAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractAction").finish_non_exhaustive()
    }
}

/// Collapses the matched span into a single `TokenGroup`.
#[derive(Debug, Clone, Default)]
pub struct GroupAction {
    types: BTreeSet<TokenType>,
}

impl GroupAction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags the produced groups with `types`.
    pub fn with_types<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TokenType>,
    {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }
}

impl TokenAction for GroupAction {
    fn apply(&self, found: &TokenRuleMatch, _context: &ActionContext<'_>) -> Vec<Token> {
        if found.is_zero_width() {
            return Vec::new();
        }
        let group = TokenGroup::new(found.tokens().to_vec()).with_types(self.types.iter().cloned());
        vec![Token::Group(group)]
    }
}

/// Hides the matched tokens from later passes while keeping them in the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowAction;

impl TokenAction for ShadowAction {
    fn apply(&self, found: &TokenRuleMatch, _context: &ActionContext<'_>) -> Vec<Token> {
        found.tokens().iter().cloned().map(Token::shadow).collect()
    }
}
