//! Zero-width assertions: lookaround probes and document/line anchors.

use crate::context::TokenRuleContext;
use crate::rule::{MatchResult, TokenRule};
use crate::rule_match::{RuleKind, TokenRuleMatch};
use crate::stream::TokenStream;
use std::fmt;
use std::sync::Arc;
use token_common::Token;

/// Whether a lookaround succeeds when its probe matches or when it does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub(crate) fn prefix(self) -> &'static str {
        match self {
            Polarity::Positive => "",
            Polarity::Negative => "!",
        }
    }

    fn accepts(self, found: bool) -> bool {
        found == (self == Polarity::Positive)
    }
}

/// The boundary an anchor tests for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    Document,
    Line,
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorKind::Document => f.write_str("document"),
            AnchorKind::Line => f.write_str("line"),
        }
    }
}

pub(crate) fn match_lookahead(
    inner: &TokenRule,
    polarity: Polarity,
    stream: &mut TokenStream,
    context: &mut TokenRuleContext,
) -> MatchResult {
    let checkpoint = stream.checkpoint();
    let bindings = context.checkpoint();
    let found = inner.try_match(stream, context)?.is_some();
    stream.restore(checkpoint);
    context.rollback(bindings);
    Ok(polarity
        .accepts(found)
        .then(|| TokenRuleMatch::empty(stream.current_index(), RuleKind::Lookahead)))
}

/// Probes `inner` from every earlier start position, nearest first, on a
/// view of the stream cut off at the cursor. The probe succeeds if some match
/// reaches the cursor, ignoring shadow tokens in between. Rules inside the
/// probe cannot see past the cursor.
pub(crate) fn match_lookbehind(
    inner: &TokenRule,
    polarity: Polarity,
    stream: &mut TokenStream,
    context: &mut TokenRuleContext,
) -> MatchResult {
    let target = stream.current_index();
    let mut probe = TokenStream::immutable(Arc::new(stream.slice(0, target).to_vec()));
    let bindings = context.checkpoint();
    let mut found = false;
    for start in (0..=target).rev() {
        probe.seek(start)?;
        let reached = inner
            .try_match(&mut probe, context)?
            .is_some_and(|candidate| probe.visible_index_from(candidate.end()) == target);
        context.rollback(bindings);
        if reached {
            found = true;
            break;
        }
    }
    Ok(polarity
        .accepts(found)
        .then(|| TokenRuleMatch::empty(target, RuleKind::Lookbehind)))
}

pub(crate) fn at_start(kind: AnchorKind, stream: &TokenStream) -> bool {
    let Some(previous) = stream.previous_visible() else {
        return true;
    };
    match kind {
        AnchorKind::Document => false,
        AnchorKind::Line => previous.ends_line() || on_later_line(stream.current(), previous),
    }
}

pub(crate) fn at_end(kind: AnchorKind, stream: &TokenStream) -> bool {
    let Some(current) = stream.current() else {
        return true;
    };
    match kind {
        AnchorKind::Document => false,
        AnchorKind::Line => {
            current.is_line_break()
                || stream.previous_visible().is_some_and(|previous| {
                    !previous.ends_line() && on_later_line(Some(current), previous)
                })
        }
    }
}

fn on_later_line(current: Option<&Token>, previous: &Token) -> bool {
    match (current.and_then(Token::position), previous.position()) {
        (Some(current), Some(previous)) => !current.same_line(&previous) && current > previous,
        _ => false,
    }
}
