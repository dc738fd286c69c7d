//! Placeholder discovery over free-form template text.

/// Prefix marking an entity placeholder: `$entityName`.
pub const SUBSTITUTE_PREFIX: char = '$';

/// Punctuation that separates words, in addition to whitespace.
const DELIMITERS: &[char] = &[',', ':', '.', '?', '!', '[', ']'];

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || DELIMITERS.contains(&c)
}

/// Split `text` into words on runs of whitespace and `, : . ? ! [ ]`.
///
/// Empty words are discarded. Each word borrows from `text`, so callers can
/// locate it again by substring search.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_delimiter).filter(|word| !word.is_empty())
}

/// Entity names referenced by `$name` words in `text`, in order of appearance.
pub fn placeholders(text: &str) -> impl Iterator<Item = &str> {
    tokenize(text).filter_map(|word| word.strip_prefix(SUBSTITUTE_PREFIX))
}
