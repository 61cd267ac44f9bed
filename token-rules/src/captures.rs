use crate::context::{CapturedValue, TokenRuleContext};
use crate::rule::{MatchResult, TokenRule};
use crate::rule_match::{RuleKind, TokenRuleMatch};
use crate::stream::TokenStream;
use std::fmt;
use std::sync::Arc;
use token_common::Token;

/// How a back-reference compares against its binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceMode {
    /// The upcoming tokens' text equals the captured tokens' text, token by token.
    Dynamic,
    /// The rule that made the capture matches again at the cursor.
    Rule,
    /// The upcoming tokens are structurally equal to the captured tokens.
    Tokens,
}

impl fmt::Display for ReferenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceMode::Dynamic => f.write_str("dynamic"),
            ReferenceMode::Rule => f.write_str("rule"),
            ReferenceMode::Tokens => f.write_str("tokens"),
        }
    }
}

pub(crate) fn match_capture(
    key: &Arc<str>,
    inner: &Arc<TokenRule>,
    stream: &mut TokenStream,
    context: &mut TokenRuleContext,
) -> MatchResult {
    let Some(found) = inner.try_match(stream, context)? else {
        return Ok(None);
    };
    context.bind(
        Arc::clone(key),
        CapturedValue::Span {
            start: found.start(),
            end: found.end(),
            tokens: found.tokens().to_vec(),
            rule: Arc::clone(inner),
        },
    );
    Ok(Some(found.with_kind(RuleKind::Capture)))
}

pub(crate) fn match_reference(
    key: &str,
    mode: ReferenceMode,
    stream: &mut TokenStream,
    context: &mut TokenRuleContext,
) -> MatchResult {
    let Some(bound) = context.get(key) else {
        return Ok(None);
    };
    match mode {
        ReferenceMode::Rule => {
            let rule = Arc::clone(bound.rule());
            Ok(rule
                .try_match(stream, context)?
                .map(|found| found.with_kind(RuleKind::Reference)))
        }
        ReferenceMode::Dynamic => match bound.tokens() {
            Some(captured) => Ok(replay(captured, stream, |a, b| a.value() == b.value())),
            None => Ok(None),
        },
        ReferenceMode::Tokens => match bound.tokens() {
            Some(captured) => Ok(replay(captured, stream, |a, b| a == b)),
            None => Ok(None),
        },
    }
}

/// Walks the visible captured tokens against the upcoming visible tokens.
fn replay<F>(captured: &[Token], stream: &mut TokenStream, same: F) -> Option<TokenRuleMatch>
where
    F: Fn(&Token, &Token) -> bool,
{
    let start = stream.current_index();
    for expected in captured.iter().filter(|token| !token.is_shadow()) {
        match stream.current() {
            Some(actual) if same(expected, actual) => {
                stream.advance();
            }
            _ => return None,
        }
    }
    Some(stream.span_match(start, RuleKind::Reference))
}
