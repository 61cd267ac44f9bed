//! Token rules: a matcher DSL over already-tokenized input.
//!
//! A [`TokenRule`] is matched against a [`TokenStream`] together with a
//! [`TokenRuleContext`] that carries named captures. Rules compose into
//! sequences, ordered choices, repetitions, lookaround assertions, anchors
//! and self-referential grammars.

pub mod assertions;
mod builders;
pub mod captures;
pub mod combinators;
pub mod context;
pub mod error;
pub mod lazy;
pub mod negatable;
pub mod quantifiers;
pub mod rule;
pub mod rule_match;
mod search;
pub mod stream;

pub use assertions::{AnchorKind, Polarity};
pub use captures::ReferenceMode;
pub use combinators::{BoundarySpan, RuleList};
pub use context::{CapturedValue, ContextCheckpoint, TokenRuleContext};
pub use error::{PredicateError, Result, RuleError};
pub use lazy::{ForwardRef, LazyRule, RecursiveRule};
pub use negatable::{
    CustomMatcher, LengthMatcher, Negatable, NegatedRule, PatternMatcher, TypeMatcher,
    ValueMatcher,
};
pub use quantifiers::Repetition;
pub use rule::{
    MatchResult, TokenRule, ALWAYS_MATCH, END_OF_DOCUMENT, END_OF_LINE, NEVER_MATCH,
    START_OF_DOCUMENT, START_OF_LINE,
};
pub use rule_match::{RuleKind, TokenRuleMatch};
pub use stream::{StreamMode, TokenStream};
pub use token_common::Position;
