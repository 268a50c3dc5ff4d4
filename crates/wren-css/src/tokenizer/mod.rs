//! CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).

mod token;
mod tokenizer;

pub use token::CSSToken;
pub use tokenizer::{CSSTokenizer, tokenize};
