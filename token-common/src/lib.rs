//! Token Common
//!
//! Shared value types for the token rule crates: source positions, stream
//! checkpoints, shared text slices and the immutable `Token` model that the
//! matching engine consumes.

pub mod checkpoint;
pub mod position;
pub mod text_slice;
pub mod token;
pub mod token_type;

pub use checkpoint::Checkpoint;
pub use position::Position;
pub use text_slice::TextSlice;
pub use token::{
    AnnotatedToken, IndexedToken, ShadowToken, TextToken, Token, TokenBuilder, TokenGroup,
};
pub use token_type::TokenType;
