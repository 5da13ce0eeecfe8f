//! Utilities for Tagwright.

mod text;
mod words;

pub use self::text::{escape_attr_value, escape_text, random_string, text_to_html};
pub use self::words::{
    has_word, has_word_with_prefix, merge_words, remove_words, remove_words_with_prefix,
};
