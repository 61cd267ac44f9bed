//! 括号折叠示例
//!
//! 本示例展示了如何使用 token-rules 和 token-engine 把括号结构折叠成
//! `TokenGroup`：
//! 1. 第一遍：把空白 token 变成 shadow token，后续规则看不到它们
//! 2. 第二遍：用递归规则匹配成对的括号，并把整段折叠成嵌套的分组
//! 3. 第三遍：用 `group()` 规则识别分组内部，删除空括号
//!
//! 未闭合的括号不会被折叠，原样保留在输出中。

use token_common::{Token, TokenGroup};
use token_engine::{ActionContext, RemoveAction, ShadowAction, TokenRuleEngine};
use token_example::{render, tokenize};
use token_rules::{RuleError, TokenRule, TokenRuleMatch};

// ============================================================================
// 规则定义
// ============================================================================

/// `parens := "(" (parens | plain)* ")"`
fn parens() -> Result<TokenRule, RuleError> {
    TokenRule::recursive(|parens| {
        let plain = TokenRule::custom("plain", |t: &Token| !matches!(t.value(), "(" | ")"));
        Ok(TokenRule::value("(")
            .then(parens.or(plain).zero_or_more())
            .then(TokenRule::value(")")))
    })
}

/// 空括号：分组内只有 `(` 和 `)`
fn empty_parens() -> Result<TokenRule, RuleError> {
    Ok(TokenRule::sequence([
        TokenRule::value("("),
        TokenRule::value(")"),
        token_rules::END_OF_DOCUMENT,
    ])?
    .group())
}

// ============================================================================
// 折叠动作
// ============================================================================

/// 把一段扁平的括号 token 按嵌套层次折叠成分组
fn fold(tokens: &[Token]) -> Vec<Token> {
    let mut stack: Vec<Vec<Token>> = vec![Vec::new()];
    for token in tokens {
        match token.value() {
            "(" if !token.is_shadow() => stack.push(vec![token.clone()]),
            ")" if !token.is_shadow() && stack.len() > 1 => {
                let mut children = stack.pop().unwrap_or_default();
                children.push(token.clone());
                let group = Token::Group(TokenGroup::new(children).with_types(["parens"]));
                if let Some(parent) = stack.last_mut() {
                    parent.push(group);
                }
            }
            _ => {
                if let Some(current) = stack.last_mut() {
                    current.push(token.clone());
                }
            }
        }
    }
    stack.into_iter().flatten().collect()
}

fn build_engine() -> Result<TokenRuleEngine, RuleError> {
    let engine = TokenRuleEngine::new()
        .with_rule(TokenRule::types(["whitespace"]), ShadowAction)
        .with_rule(parens()?, |found: &TokenRuleMatch, _: &ActionContext<'_>| {
            fold(found.tokens())
        })
        .with_rule(empty_parens()?, RemoveAction);
    Ok(engine)
}

fn main() -> Result<(), RuleError> {
    println!("=== 括号折叠示例 ===\n");

    let engine = build_engine()?;
    let inputs = [
        "call(a (b c) d)",
        "f(x) + g((y)) ()",
        "unclosed(a (b)",
    ];

    for (i, input) in inputs.iter().enumerate() {
        println!("【示例 {}】{}", i + 1, input);
        println!("{}", "=".repeat(50));

        let output = engine.process(tokenize(input))?;
        println!("输出: {}", render(&output));
        let groups = output.iter().filter(|t| t.as_group().is_some()).count();
        println!("顶层分组数: {}\n", groups);
    }

    Ok(())
}
