//! Set-like operations over space-separated word lists, such as the value of
//! a `class` or `aria-labelledby` attribute.
//!
//! Any run of whitespace separates two words. Leading and trailing whitespace
//! is ignored and results are always joined with single spaces.

/// Appends the words of `additions` that are not yet part of `original`.
///
/// Words already present keep their position, so merging never reshuffles
/// the original list. Since the order of a class list can matter for CSS,
/// callers should add words in the order they want them to appear.
pub fn merge_words(original: &str, additions: &str) -> String {
    let mut words: Vec<&str> = original.split_whitespace().collect();
    for word in additions.split_whitespace() {
        if !words.contains(&word) {
            words.push(word);
        }
    }
    words.join(" ")
}

/// Removes every word of `removals` from `original`, preserving the order of
/// the remaining words.
pub fn remove_words(original: &str, removals: &str) -> String {
    let removals: Vec<&str> = removals.split_whitespace().collect();
    original
        .split_whitespace()
        .filter(|word| !removals.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes all words starting with `prefix`.
///
/// CSS frameworks often build families of classes from a base name, like
/// `col-lg-6` or `large-6`. This strips a whole family at once.
pub fn remove_words_with_prefix(original: &str, prefix: &str) -> String {
    original
        .split_whitespace()
        .filter(|word| !word.starts_with(prefix))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `needle` is one of the words in `haystack`.
pub fn has_word(haystack: &str, needle: &str) -> bool {
    haystack.split_whitespace().any(|word| word == needle)
}

/// Whether any word in `haystack` starts with `prefix`.
pub fn has_word_with_prefix(haystack: &str, prefix: &str) -> bool {
    haystack.split_whitespace().any(|word| word.starts_with(prefix))
}
