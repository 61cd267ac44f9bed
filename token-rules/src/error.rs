use crate::rule_match::RuleKind;
use thiserror::Error;

/// Error raised by a user-supplied predicate.
pub type PredicateError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while building or running token rules.
///
/// A rule that simply does not match is *not* an error; matching returns
/// `Ok(None)` for that.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A rule was constructed with arguments it cannot honor.
    #[error("invalid {rule} rule: {message}")]
    InvalidArgument { rule: RuleKind, message: String },

    /// The target of a lazy rule was read before it was set.
    #[error("lazy rule accessed before it was initialized")]
    NotInitialized,

    /// A lazy rule was set a second time.
    #[error("lazy rule is already initialized")]
    AlreadyInitialized,

    /// The operation is not defined for this kind of rule or stream.
    #[error("`{operation}` is not supported by {rule}")]
    Unsupported {
        operation: &'static str,
        rule: &'static str,
    },

    /// A stream was positioned outside its token list.
    #[error("index {index} is out of bounds for a stream of {len} tokens")]
    OutOfBounds { index: usize, len: usize },

    /// A custom predicate failed; the original error is the source.
    #[error("custom predicate failed: {0}")]
    Predicate(#[source] PredicateError),
}

impl RuleError {
    pub(crate) fn invalid(rule: RuleKind, message: impl Into<String>) -> Self {
        RuleError::InvalidArgument {
            rule,
            message: message.into(),
        }
    }
}

pub type Result<T, E = RuleError> = std::result::Result<T, E>;
