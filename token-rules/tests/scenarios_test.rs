use rstest::rstest;
use token_common::Token;
use token_rules::{
    LazyRule, RuleError, RuleKind, TokenRule, TokenRuleContext, TokenStream, ALWAYS_MATCH,
    NEVER_MATCH,
};

fn stream(values: &[&str]) -> TokenStream {
    TokenStream::from_token_iter(values.iter().map(|v| Token::text(*v)))
}

// =============================================================================
// Literal values
// =============================================================================

#[rstest]
#[case("Hello", true)]
#[case("HELLO", true)]
#[case("hello", true)]
#[case("goodbye", false)]
#[case("hello!", false)]
fn test_value_ignore_case(#[case] input: &str, #[case] expected: bool) {
    let rule = TokenRule::value_ignore_case("hello");
    let mut ctx = TokenRuleContext::empty();
    let found = rule.try_match(&mut stream(&[input]), &mut ctx).unwrap();
    assert_eq!(found.is_some(), expected);
}

#[rstest]
#[case("hello", true)]
#[case("Hello", false)]
fn test_value_is_case_sensitive_by_default(#[case] input: &str, #[case] expected: bool) {
    let rule = TokenRule::value("hello");
    let mut ctx = TokenRuleContext::empty();
    let found = rule.try_match(&mut stream(&[input]), &mut ctx).unwrap();
    assert_eq!(found.is_some(), expected);
}

// =============================================================================
// Repetition
// =============================================================================

#[test]
fn test_repeated_takes_at_most_max() {
    let rule = TokenRule::repeated(TokenRule::value("a"), 2, Some(3)).unwrap();
    let mut s = stream(&["a", "a", "a", "a"]);
    let mut ctx = TokenRuleContext::empty();

    let m = rule.try_match(&mut s, &mut ctx).unwrap().unwrap();
    assert_eq!((m.start(), m.end()), (0, 3));
    assert_eq!(m.tokens().len(), 3);

    // The fourth token is left for the next attempt
    assert_eq!(s.current_index(), 3);
    let rest = TokenRule::value("a").try_match(&mut s, &mut ctx).unwrap();
    assert!(rest.is_some());
}

#[rstest]
#[case(&["a"], None)]
#[case(&["a", "a"], Some(2))]
#[case(&["a", "a", "a", "a", "a"], Some(3))]
#[case(&["b", "a", "a"], None)]
fn test_repeated_bounds(#[case] input: &[&str], #[case] expected_end: Option<usize>) {
    let rule = TokenRule::value("a").between(2, 3).unwrap();
    let mut ctx = TokenRuleContext::empty();
    let found = rule.try_match(&mut stream(input), &mut ctx).unwrap();
    assert_eq!(found.map(|m| m.end()), expected_end);
}

// =============================================================================
// Sequences
// =============================================================================

#[test]
fn test_parenthesized_sequence() {
    let rule = TokenRule::sequence([TokenRule::value("("), ALWAYS_MATCH, TokenRule::value(")")])
        .unwrap();
    let mut ctx = TokenRuleContext::empty();

    let m = rule
        .try_match(&mut stream(&["(", "x", ")"]), &mut ctx)
        .unwrap()
        .unwrap();
    assert_eq!((m.start(), m.end()), (0, 3));
    assert_eq!(m.kind(), RuleKind::Sequence);
}

// =============================================================================
// Lazy rules
// =============================================================================

#[test]
fn test_unset_lazy_rule() {
    let lazy = LazyRule::new();
    let rule = lazy.rule();
    let mut s = stream(&["a"]);
    let mut ctx = TokenRuleContext::empty();

    assert!(rule.try_match(&mut s, &mut ctx).unwrap().is_none());
    assert_eq!(s.current_index(), 0);
    assert!(matches!(lazy.get(), Err(RuleError::NotInitialized)));
}

#[test]
fn test_lazy_rule_delegates_once_set() {
    let lazy = LazyRule::new();
    let rule = TokenRule::sequence([TokenRule::value("("), lazy.rule()]).unwrap();
    lazy.set(TokenRule::value(")")).unwrap();

    let mut ctx = TokenRuleContext::empty();
    assert!(rule
        .try_match(&mut stream(&["(", ")"]), &mut ctx)
        .unwrap()
        .is_some());
    assert!(matches!(
        lazy.set(NEVER_MATCH),
        Err(RuleError::AlreadyInitialized)
    ));
}

// =============================================================================
// Groups
// =============================================================================

#[test]
fn test_group_consumes_one_outer_token() {
    let rule = TokenRule::value("inner").group();
    let mut s = TokenStream::new(vec![
        Token::group(vec![Token::text("inner"), Token::text("other")]),
        Token::text("tail"),
    ]);
    let mut ctx = TokenRuleContext::empty();

    let m = rule.try_match(&mut s, &mut ctx).unwrap().unwrap();
    assert_eq!((m.start(), m.end()), (0, 1));
    assert_eq!(s.current_index(), 1);
    assert!(m.tokens()[0].as_group().is_some());
}

#[test]
fn test_nested_group_rules() {
    let rule = TokenRule::value("leaf").group().group();
    let mut s = TokenStream::new(vec![Token::group(vec![Token::group(vec![
        Token::text("leaf"),
    ])])]);
    let mut ctx = TokenRuleContext::empty();
    assert!(rule.try_match(&mut s, &mut ctx).unwrap().is_some());
}
