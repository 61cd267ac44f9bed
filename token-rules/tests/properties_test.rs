//! Property-based tests for the matching contract.

use proptest::prelude::*;
use token_common::Token;
use token_rules::{TokenRule, TokenRuleContext, TokenStream, ALWAYS_MATCH, NEVER_MATCH};

fn tokens() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[abc]", 0..8)
}

fn stream_of(values: &[String]) -> TokenStream {
    TokenStream::from_token_iter(values.iter().map(|v| Token::text(v.as_str())))
}

fn leaf() -> impl Strategy<Value = TokenRule> {
    prop_oneof![
        "[abc]".prop_map(|v| TokenRule::value(v)),
        "[abc]".prop_map(|v| TokenRule::value(v).not().unwrap()),
        Just(ALWAYS_MATCH),
        Just(NEVER_MATCH),
    ]
}

fn rule() -> impl Strategy<Value = TokenRule> {
    leaf().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4)
                .prop_map(|rules| TokenRule::sequence(rules).unwrap()),
            prop::collection::vec(inner.clone(), 1..4)
                .prop_map(|rules| TokenRule::any_of(rules).unwrap()),
            inner.clone().prop_map(TokenRule::optional),
            (inner.clone(), 0usize..3, 1usize..3).prop_map(|(rule, min, extra)| {
                TokenRule::repeated(rule, min, Some(min + extra)).unwrap()
            }),
            inner.clone().prop_map(TokenRule::lookahead),
            inner.clone().prop_map(TokenRule::negative_lookbehind),
            inner.prop_map(|rule| rule.capture("k")),
        ]
    })
}

proptest! {
    #[test]
    fn failed_match_restores_cursor_and_context(
        rule in rule(),
        values in tokens(),
        offset in 0usize..8,
    ) {
        let mut s = stream_of(&values);
        let start = offset.min(values.len());
        s.seek(start).unwrap();
        let mut ctx = TokenRuleContext::empty();

        if rule.try_match(&mut s, &mut ctx).unwrap().is_none() {
            prop_assert_eq!(s.current_index(), start);
            prop_assert!(ctx.is_empty());
        }
    }

    #[test]
    fn successful_match_ends_at_cursor(rule in rule(), values in tokens()) {
        let mut s = stream_of(&values);
        let mut ctx = TokenRuleContext::empty();

        if let Some(m) = rule.try_match(&mut s, &mut ctx).unwrap() {
            prop_assert_eq!(m.start(), 0);
            prop_assert_eq!(m.end(), s.current_index());
            prop_assert_eq!(m.tokens().len(), m.end() - m.start());
        }
    }

    #[test]
    fn optional_never_fails(rule in rule(), values in tokens()) {
        let mut s = stream_of(&values);
        let mut ctx = TokenRuleContext::empty();
        prop_assert!(rule.optional().try_match(&mut s, &mut ctx).unwrap().is_some());
    }

    #[test]
    fn repetition_respects_bounds(
        values in tokens(),
        min in 0usize..4,
        extra in 0usize..3,
    ) {
        let max = (min + extra).max(1);
        let rule = TokenRule::repeated(TokenRule::value("a"), min, Some(max)).unwrap();
        let leading = values.iter().take_while(|v| v.as_str() == "a").count();
        let mut ctx = TokenRuleContext::empty();

        match rule.try_match(&mut stream_of(&values), &mut ctx).unwrap() {
            Some(m) => prop_assert_eq!(m.len(), leading.min(max)),
            None => prop_assert!(leading < min),
        }
    }

    #[test]
    fn lookaround_never_moves_cursor(
        rule in rule(),
        values in tokens(),
        offset in 0usize..8,
    ) {
        let start = offset.min(values.len());
        for probe in [
            rule.clone().lookahead(),
            rule.clone().negative_lookahead(),
            rule.clone().lookbehind(),
            rule.clone().negative_lookbehind(),
        ] {
            let mut s = stream_of(&values);
            s.seek(start).unwrap();
            let mut ctx = TokenRuleContext::empty();
            let found = probe.try_match(&mut s, &mut ctx).unwrap();
            prop_assert_eq!(s.current_index(), start);
            if let Some(m) = found {
                prop_assert!(m.is_zero_width());
            }
        }
    }

    #[test]
    fn double_negation_behaves_like_original(value in "[abc]", values in tokens()) {
        let original = TokenRule::value(value.clone());
        let twice = TokenRule::value(value).not().unwrap().not().unwrap();
        for token in &values {
            let mut ctx = TokenRuleContext::empty();
            let a = original.try_match(&mut stream_of(std::slice::from_ref(token)), &mut ctx).unwrap();
            let b = twice.try_match(&mut stream_of(std::slice::from_ref(token)), &mut ctx).unwrap();
            prop_assert_eq!(a.is_some(), b.is_some());
        }
    }
}
