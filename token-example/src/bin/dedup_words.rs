//! 重复单词删除示例
//!
//! 本示例展示了捕获（capture）与反向引用（back-reference）的用法：
//! 1. 第一遍：把空白 token 变成 shadow token
//! 2. 第二遍：捕获一个单词，再用 DYNAMIC 反向引用匹配紧随其后的重复单词，
//!    只保留第一个，并用注解记录重复次数
//!
//! 反向引用按文本比较，因此 `the the` 会被合并，而 `The the` 不会。

use token_common::Token;
use token_engine::{ActionContext, ShadowAction, TokenRuleEngine};
use token_example::{render, tokenize};
use token_rules::{ReferenceMode, RuleError, TokenRule, TokenRuleMatch};

fn repeated_word() -> Result<TokenRule, RuleError> {
    let word = TokenRule::types(["word"]);
    Ok(word
        .capture("word")
        .then(TokenRule::reference("word", ReferenceMode::Dynamic).at_least(1)?))
}

/// 保留第一个单词，并附加 `repeats` 注解
fn keep_first(found: &TokenRuleMatch, context: &ActionContext<'_>) -> Vec<Token> {
    let repeats = found.visible_tokens().count();
    context
        .captured_tokens("word")
        .unwrap_or_default()
        .iter()
        .map(|token| Token::annotated(token.clone(), "repeats", repeats.to_string()))
        .collect()
}

fn build_engine() -> Result<TokenRuleEngine, RuleError> {
    Ok(TokenRuleEngine::new()
        .with_rule(TokenRule::types(["whitespace"]), ShadowAction)
        .with_rule(repeated_word()?, keep_first))
}

fn main() -> Result<(), RuleError> {
    println!("=== 重复单词删除示例 ===\n");

    let engine = build_engine()?;
    let inputs = [
        "the the cat sat sat sat on the mat",
        "The the end",
        "no repeats here",
    ];

    for (i, input) in inputs.iter().enumerate() {
        println!("【示例 {}】{}", i + 1, input);
        println!("{}", "=".repeat(50));

        let output = engine.process(tokenize(input))?;
        println!("输出: {}", render(&output));
        for token in output.iter() {
            if let Some(repeats) = token.annotation("repeats") {
                println!("  `{}` 出现了 {} 次", token.value(), repeats);
            }
        }
        println!();
    }

    Ok(())
}
