//! Forward references for self-referential grammars.

use crate::error::{Result, RuleError};
use crate::rule::TokenRule;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::{Arc, Weak};

/// A forward-reference cell that is wired once during grammar construction.
///
/// Cloning a `LazyRule` yields another handle to the same cell. Before
/// [`set`](Self::set) is called, matching through the rule fails silently
/// while [`get`](Self::get) returns [`RuleError::NotInitialized`].
///
/// A lazy rule whose target contains the lazy rule itself forms a reference
/// cycle that is never freed; use [`TokenRule::recursive`] for grammars that
/// are rebuilt repeatedly.
#[derive(Clone, Default)]
pub struct LazyRule {
    cell: Arc<OnceCell<TokenRule>>,
}

impl LazyRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires the target rule. A lazy rule can only be set once.
    pub fn set(&self, rule: TokenRule) -> Result<()> {
        self.cell
            .set(rule)
            .map_err(|_| RuleError::AlreadyInitialized)
    }

    /// Returns the target rule.
    pub fn get(&self) -> Result<&TokenRule> {
        self.cell.get().ok_or(RuleError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    pub(crate) fn target(&self) -> Option<&TokenRule> {
        self.cell.get()
    }

    /// Returns a rule that delegates to this cell.
    pub fn rule(&self) -> TokenRule {
        TokenRule::Lazy(self.clone())
    }
}

impl fmt::Debug for LazyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_initialized() {
            f.write_str("lazy(<set>)")
        } else {
            f.write_str("lazy(<unset>)")
        }
    }
}

/// The owning end of a rule built by [`TokenRule::recursive`].
#[derive(Clone)]
pub struct RecursiveRule {
    cell: Arc<OnceCell<TokenRule>>,
}

impl RecursiveRule {
    pub(crate) fn build<F>(factory: F) -> Result<Self>
    where
        F: FnOnce(TokenRule) -> Result<TokenRule>,
    {
        let cell = Arc::new(OnceCell::new());
        let placeholder = TokenRule::Forward(ForwardRef {
            cell: Arc::downgrade(&cell),
        });
        let rule = factory(placeholder)?;
        cell.set(rule).map_err(|_| RuleError::AlreadyInitialized)?;
        Ok(Self { cell })
    }

    pub fn target(&self) -> Option<&TokenRule> {
        self.cell.get()
    }
}

impl fmt::Debug for RecursiveRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target() {
            Some(rule) => write!(f, "recursive({rule:?})"),
            None => f.write_str("recursive(<unset>)"),
        }
    }
}

/// The placeholder handed to a recursive rule's factory.
///
/// It holds the cell weakly so the grammar owns itself without a cycle. Once
/// the owning [`RecursiveRule`] is dropped the placeholder no longer matches.
#[derive(Clone)]
pub struct ForwardRef {
    cell: Weak<OnceCell<TokenRule>>,
}

impl ForwardRef {
    /// Resolves the placeholder to its owner's rule.
    pub(crate) fn resolve(&self) -> Option<Arc<OnceCell<TokenRule>>> {
        self.cell.upgrade()
    }
}

impl fmt::Debug for ForwardRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<self>")
    }
}
