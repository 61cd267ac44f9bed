use crate::error::{Result, RuleError};
use crate::rule_match::{RuleKind, TokenRuleMatch};
use std::sync::Arc;
use token_common::{Checkpoint, Position, Token};

/// Whether a stream may edit its token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// The stream owns its list and may push or insert tokens.
    Mutable,
    /// The stream is a read-only view of a shared list.
    Immutable,
}

/// A cursor over an ordered token list.
///
/// The cursor is a raw index into the list. Shadow tokens occupy slots in the
/// list but are skipped by [`current`](Self::current), [`peek_at`](Self::peek_at)
/// and [`advance`](Self::advance), so matchers never see them.
///
/// The list is shared: [`copy_from_zero`](Self::copy_from_zero) hands out an
/// independent cursor over the same tokens without copying them, and edits on
/// a mutable stream are copy-on-write so existing snapshots are unaffected.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Arc<Vec<Token>>,
    cursor: usize,
    mode: StreamMode,
}

impl TokenStream {
    /// Creates a mutable stream that owns `tokens`.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: Arc::new(tokens),
            cursor: 0,
            mode: StreamMode::Mutable,
        }
    }

    /// Creates a mutable stream from an iterator of tokens.
    pub fn from_token_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Token>,
    {
        Self::new(iter.into_iter().collect())
    }

    /// Creates a read-only view over a shared token list.
    pub fn immutable(tokens: Arc<Vec<Token>>) -> Self {
        Self {
            tokens,
            cursor: 0,
            mode: StreamMode::Immutable,
        }
    }

    pub fn mode(&self) -> StreamMode {
        self.mode
    }

    /// Returns an independent read-only cursor at index 0 over the same tokens.
    pub fn copy_from_zero(&self) -> TokenStream {
        Self::immutable(Arc::clone(&self.tokens))
    }

    /// Number of raw slots, shadow tokens included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn shared_tokens(&self) -> Arc<Vec<Token>> {
        Arc::clone(&self.tokens)
    }

    /// Returns the raw tokens in `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> &[Token] {
        let end = end.min(self.tokens.len());
        &self.tokens[start.min(end)..end]
    }

    /// Returns the current raw cursor index.
    pub fn current_index(&self) -> usize {
        self.cursor
    }

    /// Returns the index of the first visible token at or after `index`, or
    /// the stream length if there is none.
    pub fn visible_index_from(&self, index: usize) -> usize {
        self.tokens
            .iter()
            .enumerate()
            .skip(index)
            .find(|(_, token)| !token.is_shadow())
            .map(|(i, _)| i)
            .unwrap_or(self.tokens.len())
    }

    /// Returns true if a visible token remains at or after the cursor.
    pub fn has_more_tokens(&self) -> bool {
        self.current().is_some()
    }

    /// Returns the current visible token without advancing.
    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.visible_index_from(self.cursor))
    }

    /// Alias of [`current`](Self::current).
    pub fn peek(&self) -> Option<&Token> {
        self.current()
    }

    /// Returns the visible token `offset` positions after the current one.
    pub fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .filter(|token| !token.is_shadow())
            .nth(offset)
    }

    /// Returns the nearest visible token before the cursor.
    pub fn previous_visible(&self) -> Option<&Token> {
        self.tokens[..self.cursor.min(self.tokens.len())]
            .iter()
            .rev()
            .find(|token| !token.is_shadow())
    }

    /// Moves past the current visible token and returns the new index.
    ///
    /// At the end of the visible tokens the cursor does not move.
    pub fn advance(&mut self) -> usize {
        let next = self.visible_index_from(self.cursor);
        if next < self.tokens.len() {
            self.cursor = next + 1;
        }
        self.cursor
    }

    /// Returns the position of the current visible token, if it carries one.
    pub fn position(&self) -> Option<Position> {
        self.current().and_then(Token::position)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.cursor)
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.cursor = checkpoint.index().min(self.tokens.len());
    }

    /// Moves the cursor to a raw index.
    pub fn seek(&mut self, index: usize) -> Result<()> {
        if index > self.tokens.len() {
            return Err(RuleError::OutOfBounds {
                index,
                len: self.tokens.len(),
            });
        }
        self.cursor = index;
        Ok(())
    }

    /// Builds a match covering the raw span from `start` to the cursor.
    pub fn span_match(&self, start: usize, kind: RuleKind) -> TokenRuleMatch {
        TokenRuleMatch::new(
            start,
            self.cursor,
            self.slice(start, self.cursor).to_vec(),
            kind,
        )
    }

    /// Consumes the current visible token and returns it as a match.
    pub fn consume_current(&mut self, kind: RuleKind) -> Option<TokenRuleMatch> {
        let start = self.cursor;
        self.current()?;
        self.advance();
        Some(self.span_match(start, kind))
    }

    /// Appends a token. Only mutable streams can be edited.
    pub fn push(&mut self, token: Token) -> Result<()> {
        self.ensure_mutable("push")?;
        Arc::make_mut(&mut self.tokens).push(token);
        Ok(())
    }

    /// Inserts a token at a raw index. Inserting before the cursor keeps the
    /// cursor on the same token.
    pub fn insert(&mut self, index: usize, token: Token) -> Result<()> {
        self.ensure_mutable("insert")?;
        if index > self.tokens.len() {
            return Err(RuleError::OutOfBounds {
                index,
                len: self.tokens.len(),
            });
        }
        Arc::make_mut(&mut self.tokens).insert(index, token);
        if index < self.cursor {
            self.cursor += 1;
        }
        Ok(())
    }

    /// Consumes the stream and returns its tokens, cloning them only if the
    /// list is still shared.
    pub fn into_tokens(self) -> Vec<Token> {
        Arc::try_unwrap(self.tokens).unwrap_or_else(|shared| (*shared).clone())
    }

    fn ensure_mutable(&self, operation: &'static str) -> Result<()> {
        match self.mode {
            StreamMode::Mutable => Ok(()),
            StreamMode::Immutable => Err(RuleError::Unsupported {
                operation,
                rule: "an immutable token stream",
            }),
        }
    }
}
