//! Token Engine
//!
//! Runs an ordered list of `(rule, action)` rewrite passes over a token list.
//! Each pass is a full left-to-right scan over the output of the previous
//! pass; see [`TokenRuleEngine`].

pub mod action;
pub mod config;
pub mod engine;

pub use action::{
    ActionContext, ExtractAction, GroupAction, IdentityAction, RemoveAction, ReplaceAction,
    ShadowAction, TokenAction,
};
pub use config::{CaptureScope, EngineConfig};
pub use engine::TokenRuleEngine;
