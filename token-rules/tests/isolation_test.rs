//! A failed alternative must not leak cursor movement or captures into the
//! alternatives and sequence members that follow it.

use token_common::Token;
use token_rules::{ReferenceMode, TokenRule, TokenRuleContext, TokenStream, ALWAYS_MATCH};

fn stream(values: &[&str]) -> TokenStream {
    TokenStream::from_token_iter(values.iter().map(|v| Token::text(*v)))
}

fn seq(rules: impl IntoIterator<Item = TokenRule>) -> TokenRule {
    TokenRule::sequence(rules).unwrap()
}

#[test]
fn test_partial_alternative_does_not_move_cursor() {
    // The first alternative consumes "a" before failing on "c"
    let choice = TokenRule::any_of([
        seq([TokenRule::value("a"), TokenRule::value("b")]),
        seq([TokenRule::value("a"), TokenRule::value("c")]),
    ])
    .unwrap();
    let rule = seq([choice, TokenRule::value("d")]);
    let mut ctx = TokenRuleContext::empty();

    let m = rule
        .try_match(&mut stream(&["a", "c", "d"]), &mut ctx)
        .unwrap()
        .unwrap();
    assert_eq!((m.start(), m.end()), (0, 3));
}

#[test]
fn test_sibling_after_choice_starts_where_winner_ended() {
    let choice = TokenRule::any_of([
        seq([TokenRule::value("x"), TokenRule::value("y"), TokenRule::value("z")]),
        TokenRule::value("x"),
    ])
    .unwrap();
    let rule = seq([choice, TokenRule::value("y")]);
    let mut ctx = TokenRuleContext::empty();

    // First alternative reaches "y" then fails on "q"; the sibling must see "y"
    let m = rule
        .try_match(&mut stream(&["x", "y", "q"]), &mut ctx)
        .unwrap()
        .unwrap();
    assert_eq!(m.end(), 2);
}

#[test]
fn test_failed_alternative_drops_its_captures() {
    let choice = TokenRule::any_of([
        seq([TokenRule::value("a").capture("k"), TokenRule::value("b")]),
        seq([ALWAYS_MATCH, TokenRule::pattern("[a-z]").unwrap().capture("k")]),
    ])
    .unwrap();
    let rule = seq([choice, TokenRule::reference("k", ReferenceMode::Dynamic)]);
    let mut ctx = TokenRuleContext::empty();

    // "a" is captured by the failing first branch, then "c" by the winner
    let m = rule
        .try_match(&mut stream(&["a", "c", "c"]), &mut ctx)
        .unwrap()
        .unwrap();
    assert_eq!(m.end(), 3);
    assert_eq!(ctx.captured_text("k").as_deref(), Some("c"));
}

#[test]
fn test_failed_sequence_restores_context() {
    let rule = seq([
        TokenRule::value("a").capture("first"),
        TokenRule::value("b").capture("second"),
        TokenRule::value("z"),
    ]);
    let mut s = stream(&["a", "b", "c"]);
    let mut ctx = TokenRuleContext::empty();

    assert!(rule.try_match(&mut s, &mut ctx).unwrap().is_none());
    assert_eq!(s.current_index(), 0);
    assert!(ctx.is_empty());
}

#[test]
fn test_nested_choices_backtrack_locally() {
    let inner = TokenRule::any_of([
        seq([TokenRule::value("1"), TokenRule::value("2")]),
        TokenRule::value("1"),
    ])
    .unwrap();
    let outer = TokenRule::any_of([
        seq([inner.clone(), TokenRule::value("3")]),
        seq([inner, TokenRule::value("2"), TokenRule::value("4")]),
    ])
    .unwrap();
    let mut ctx = TokenRuleContext::empty();

    // Ordered choice does not revisit the inner choice: "1 2" wins inside and
    // the outer first branch then fails on "4"; the second branch re-runs the
    // inner choice, which again consumes "1 2", so "2" cannot follow
    assert!(outer
        .try_match(&mut stream(&["1", "2", "4"]), &mut ctx)
        .unwrap()
        .is_none());
    assert!(outer
        .try_match(&mut stream(&["1", "2", "3"]), &mut ctx)
        .unwrap()
        .is_some());
}
