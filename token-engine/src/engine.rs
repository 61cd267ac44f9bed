use crate::action::{ActionContext, TokenAction};
use crate::config::{CaptureScope, EngineConfig};
use std::fmt;
use std::sync::Arc;
use token_common::Token;
use token_rules::{Result, TokenRule, TokenRuleContext, TokenStream};
use tracing::{debug, debug_span, trace};

struct Pass {
    rule: TokenRule,
    action: Box<dyn TokenAction>,
}

/// An ordered pipeline of rewrite passes.
///
/// Each registered `(rule, action)` pair is one full left-to-right scan.
/// Passes run in registration order and every pass reads the output of the
/// one before it:
///
/// ```
/// use token_common::Token;
/// use token_engine::{ReplaceAction, TokenRuleEngine};
/// use token_rules::{TokenRule, ALWAYS_MATCH};
///
/// let engine = TokenRuleEngine::new()
///     .with_rule(TokenRule::value("test"), ReplaceAction::values(["FIRST"]))
///     .with_rule(ALWAYS_MATCH, ReplaceAction::values(["SECOND"]));
///
/// let output = engine.process(vec![Token::text("test")]).unwrap();
/// assert_eq!(output[0].value(), "SECOND");
/// ```
pub struct TokenRuleEngine {
    passes: Vec<Pass>,
    config: EngineConfig,
}

impl TokenRuleEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            passes: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Appends a pass.
    pub fn register<A>(&mut self, rule: TokenRule, action: A) -> &mut Self
    where
        A: TokenAction + 'static,
    {
        self.passes.push(Pass {
            rule,
            action: Box::new(action),
        });
        self
    }

    /// Appends a pass, builder style.
    pub fn with_rule<A>(mut self, rule: TokenRule, action: A) -> Self
    where
        A: TokenAction + 'static,
    {
        self.register(rule, action);
        self
    }

    /// Number of registered passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Runs every pass over `tokens` and returns the final token list.
    ///
    /// With no passes registered the input comes back unchanged. Errors
    /// raised by custom predicates abort processing.
    pub fn process(&self, tokens: Vec<Token>) -> Result<Arc<[Token]>> {
        let span = debug_span!(
            "process",
            engine = self.config.name().unwrap_or("token-rule-engine"),
            passes = self.passes.len(),
        );
        let _entered = span.enter();

        let mut current = tokens;
        for (index, pass) in self.passes.iter().enumerate() {
            current = self.run_pass(index, pass, current)?;
        }
        Ok(Arc::from(current))
    }

    fn run_pass(&self, index: usize, pass: &Pass, input: Vec<Token>) -> Result<Vec<Token>> {
        let mut stream = TokenStream::new(input);
        let snapshot = stream.shared_tokens();
        let mut output = Vec::with_capacity(snapshot.len());
        let mut pass_captures = TokenRuleContext::empty();
        let mut rewrites = 0usize;

        while stream.current_index() < snapshot.len() {
            let cursor = stream.current_index();
            let token = &snapshot[cursor];
            if token.is_shadow() {
                output.push(token.clone());
                stream.seek(cursor + 1)?;
                continue;
            }

            let mut match_captures = TokenRuleContext::empty();
            let captures = match self.config.capture_scope() {
                CaptureScope::PerMatch => &mut match_captures,
                CaptureScope::PerPass => &mut pass_captures,
            };

            let Some(found) = pass.rule.try_match(&mut stream, captures)? else {
                output.push(token.clone());
                stream.seek(cursor + 1)?;
                continue;
            };

            rewrites += 1;
            let context = ActionContext::new(index, captures, &snapshot);
            let replacement = pass.action.apply(&found, &context);
            trace!(
                pass = index,
                start = found.start(),
                end = found.end(),
                emitted = replacement.len(),
                "rewrite"
            );
            output.extend(replacement);

            if found.is_zero_width() {
                // keep the token under an empty match and move on
                output.push(token.clone());
                stream.seek(cursor + 1)?;
            }
        }

        debug!(
            pass = index,
            rule = %pass.rule.kind(),
            rewrites,
            input = snapshot.len(),
            output = output.len(),
            "rewrite pass complete"
        );
        Ok(output)
    }
}

impl Default for TokenRuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokenRuleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRuleEngine")
            .field("config", &self.config)
            .field(
                "passes",
                &self.passes.iter().map(|pass| &pass.rule).collect::<Vec<_>>(),
            )
            .finish()
    }
}
