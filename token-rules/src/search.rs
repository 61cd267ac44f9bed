//! Scanning helpers for running a rule over a whole token list.

use crate::context::TokenRuleContext;
use crate::error::Result;
use crate::rule::TokenRule;
use crate::rule_match::TokenRuleMatch;
use crate::stream::TokenStream;
use std::sync::Arc;
use token_common::Token;

impl TokenRule {
    /// Returns the leftmost match in `tokens`.
    pub fn find_first(&self, tokens: &[Token]) -> Result<Option<TokenRuleMatch>> {
        let mut stream = snapshot(tokens);
        loop {
            let mut context = TokenRuleContext::empty();
            if let Some(found) = self.try_match(&mut stream, &mut context)? {
                return Ok(Some(found));
            }
            if !step(&mut stream) {
                return Ok(None);
            }
        }
    }

    /// Returns every non-overlapping match in `tokens`, left to right.
    ///
    /// After a zero-width match the scan moves on by one token, so an empty
    /// match is reported at most once per position.
    pub fn find_all(&self, tokens: &[Token]) -> Result<Vec<TokenRuleMatch>> {
        let mut stream = snapshot(tokens);
        let mut found = Vec::new();
        loop {
            let mut context = TokenRuleContext::empty();
            match self.try_match(&mut stream, &mut context)? {
                Some(hit) if !hit.is_zero_width() => found.push(hit),
                Some(hit) => {
                    found.push(hit);
                    if !step(&mut stream) {
                        break;
                    }
                }
                None => {
                    if !step(&mut stream) {
                        break;
                    }
                }
            }
        }
        Ok(found)
    }

    /// Returns true if the rule matches from the first token and consumes
    /// every visible token.
    pub fn matches_all(&self, tokens: &[Token]) -> Result<bool> {
        let mut stream = snapshot(tokens);
        let mut context = TokenRuleContext::empty();
        Ok(self.try_match(&mut stream, &mut context)?.is_some() && !stream.has_more_tokens())
    }
}

fn snapshot(tokens: &[Token]) -> TokenStream {
    TokenStream::immutable(Arc::new(tokens.to_vec()))
}

/// Moves past the current visible token; false once none remain.
fn step(stream: &mut TokenStream) -> bool {
    if !stream.has_more_tokens() {
        return false;
    }
    stream.advance();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(values: &[&str]) -> Vec<Token> {
        values.iter().map(|v| Token::text(*v)).collect()
    }

    #[test]
    fn test_find_first_scans_forward() {
        let rule = TokenRule::value("b");
        let found = rule.find_first(&tokens(&["a", "b", "b"])).unwrap().unwrap();
        assert_eq!((found.start(), found.end()), (1, 2));
        assert!(rule.find_first(&tokens(&["a"])).unwrap().is_none());
    }

    #[test]
    fn test_find_all_is_non_overlapping() {
        let pair = TokenRule::value("a").exactly(2).unwrap();
        let found = pair.find_all(&tokens(&["a", "a", "a", "b", "a", "a"])).unwrap();
        let spans: Vec<_> = found.iter().map(|m| (m.start(), m.end())).collect();
        assert_eq!(spans, vec![(0, 2), (4, 6)]);
    }

    #[test]
    fn test_find_all_reports_each_empty_match_once() {
        let anchor = crate::rule::END_OF_DOCUMENT;
        let found = anchor.find_all(&tokens(&["a", "b"])).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start(), 2);
    }

    #[test]
    fn test_matches_all_requires_full_consumption() {
        let words = TokenRule::pattern("[a-z]+").unwrap().one_or_more();
        assert!(words.matches_all(&tokens(&["ab", "cd"])).unwrap());
        assert!(!words.matches_all(&tokens(&["ab", "42"])).unwrap());
    }
}
