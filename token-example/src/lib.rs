//! Shared helpers for the example binaries.

use std::sync::Arc;
use token_common::{Position, TextSlice, Token, TokenType};

/// A minimal whitespace/bracket splitter standing in for a real tokenizer.
///
/// Produces word tokens, single-character bracket tokens, `whitespace`
/// tokens for runs of blanks and `newline` tokens for line breaks. Every
/// token carries its position and shares the source buffer.
pub fn tokenize(source: &str) -> Vec<Token> {
    let buffer: Arc<str> = Arc::from(source);
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();
    let mut line = 1;
    let mut column = 1;

    while let Some((start, c)) = chars.next() {
        let position = Position::at(line, column, start);
        let mut end = start + c.len_utf8();
        let mut width = 1;
        let token_type = match c {
            '\n' => Some(TokenType::NEWLINE),
            '(' | ')' | '[' | ']' => None,
            c if c.is_whitespace() => {
                while let Some(&(i, next)) = chars.peek() {
                    if next == '\n' || !next.is_whitespace() {
                        break;
                    }
                    end = i + next.len_utf8();
                    width += 1;
                    chars.next();
                }
                Some(TokenType::WHITESPACE)
            }
            _ => {
                while let Some(&(i, next)) = chars.peek() {
                    if next.is_whitespace() || "()[]".contains(next) {
                        break;
                    }
                    end = i + next.len_utf8();
                    width += 1;
                    chars.next();
                }
                Some(TokenType::new("word"))
            }
        };

        let mut builder = Token::builder(TextSlice::new(Arc::clone(&buffer), start, end))
            .position(position);
        if let Some(token_type) = token_type {
            builder = builder.with_type(token_type);
        }
        tokens.push(builder.build());

        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += width;
        }
    }
    tokens
}

/// Renders tokens back to text, showing groups as `{...}`.
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token.as_group() {
            Some(group) => {
                out.push('{');
                out.push_str(&render(group.children()));
                out.push('}');
            }
            None => out.push_str(token.value()),
        }
    }
    out
}
