//! Substitution engine for plain-text templates.
//!
//! Runs in two passes. The entity pass replaces each `$name` word with the
//! formatted values of `name`. The bracket pass then resolves contingent
//! phrases: `[...]` keeps its content when every placeholder inside was
//! filled and is removed entirely otherwise.

use tracing::trace;

use crate::core::entity_map::FilledEntityMap;
use crate::core::tokenizer::{tokenize, SUBSTITUTE_PREFIX};

/// Resolve placeholders then contingent phrases in `text`.
pub fn substitute(text: &str, entities: &FilledEntityMap) -> String {
    let text = substitute_entities(text, entities);
    substitute_brackets(&text)
}

/// Replace `$name` words with entity values.
///
/// Words are visited in order of appearance. Each visit replaces the first
/// remaining occurrence of the word, so a placeholder written twice is
/// substituted twice. Names that are unknown or render to empty text stay
/// literal.
pub fn substitute_entities(text: &str, entities: &FilledEntityMap) -> String {
    let mut output = text.to_string();

    for word in tokenize(text) {
        let Some(name) = word.strip_prefix(SUBSTITUTE_PREFIX) else {
            continue;
        };

        match entities.value_as_string(name) {
            Some(value) if !value.is_empty() => {
                output = output.replacen(word, &value, 1);
            }
            _ => trace!(entity = name, "leaving placeholder unfilled"),
        }
    }

    output
}

/// Resolve `[...]` contingent phrases left to right.
///
/// Each step pairs the first `[` with the first `]`. The pair is not matched
/// for nesting, and a `]` before the first `[` ends resolution. A phrase that
/// still contains `$` after its first character is dropped with its brackets;
/// otherwise only the brackets are removed.
pub fn substitute_brackets(text: &str) -> String {
    let mut text = text.to_string();

    loop {
        let (Some(start), Some(end)) = (text.find('['), text.find(']')) else {
            return text;
        };
        if end < start {
            return text;
        }

        let phrase = &text[start + 1..end];
        let unfilled = phrase
            .find(SUBSTITUTE_PREFIX)
            .is_some_and(|index| index > 0);

        let replacement = if unfilled {
            trace!(phrase, "dropping contingent phrase");
            String::new()
        } else {
            phrase.to_string()
        };
        text.replace_range(start..=end, &replacement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(pairs: &[(&str, &[&str])]) -> FilledEntityMap {
        pairs
            .iter()
            .fold(FilledEntityMap::builder(), |builder, (name, texts)| {
                builder.texts(*name, texts.iter().copied())
            })
            .build()
    }

    #[test]
    fn fills_known_entity() {
        let entities = store(&[("size", &["large"])]);
        assert_eq!(
            substitute("I want a $size coffee", &entities),
            "I want a large coffee"
        );
    }

    #[test]
    fn unfilled_entity_stays_literal() {
        let entities = store(&[]);
        assert_eq!(
            substitute("I want a $size coffee", &entities),
            "I want a $size coffee"
        );
    }

    #[test]
    fn empty_values_count_as_unfilled() {
        let entities = store(&[("size", &[])]);
        assert_eq!(substitute("a $size cup", &entities), "a $size cup");
    }

    #[test]
    fn multiple_values_are_joined() {
        let entities = store(&[("topping", &["caramel", "cream", "nuts"])]);
        assert_eq!(
            substitute("with $topping.", &entities),
            "with caramel, cream and nuts."
        );
    }

    #[test]
    fn adjacent_punctuation_is_preserved() {
        let entities = store(&[("name", &["Sam"])]);
        assert_eq!(substitute("Hi $name! ($name?)", &entities), "Hi Sam! ($name?)");
    }

    #[test]
    fn repeated_placeholder_is_replaced_each_time() {
        let entities = store(&[("name", &["Sam"])]);
        assert_eq!(substitute("$name, oh $name", &entities), "Sam, oh Sam");
    }

    #[test]
    fn satisfied_contingency_keeps_phrase() {
        let entities = store(&[("topping", &["caramel"])]);
        assert_eq!(
            substitute("coffee[, with $topping]", &entities),
            "coffee, with caramel"
        );
    }

    #[test]
    fn unsatisfied_contingency_drops_phrase() {
        let entities = store(&[]);
        assert_eq!(substitute("coffee[, with $topping]", &entities), "coffee");
    }

    #[test]
    fn sequential_groups_resolve_independently() {
        let entities = store(&[("size", &["large"])]);
        assert_eq!(
            substitute("coffee[ in $size][ with $topping][ please]", &entities),
            "coffee in large please"
        );
    }

    #[test]
    fn placeholder_at_phrase_start_is_not_dropped() {
        assert_eq!(substitute_brackets("a [$x] b"), "a $x b");
    }

    #[test]
    fn malformed_brackets_are_left_alone() {
        assert_eq!(substitute_brackets("open [ only"), "open [ only");
        assert_eq!(substitute_brackets("close ] only"), "close ] only");
        assert_eq!(substitute_brackets("b] then [a"), "b] then [a");
    }

    #[test]
    fn nested_brackets_use_first_open_first_close() {
        assert_eq!(substitute_brackets("a[b[c]d]"), "abcd");
        assert_eq!(substitute_brackets("a[b[c $x]d]"), "ad]");
    }

    #[test]
    fn text_without_markers_is_unchanged() {
        let entities = store(&[("size", &["large"])]);
        let text = "Plain text, nothing to do.";
        assert_eq!(substitute(text, &entities), text);
        assert_eq!(substitute(&substitute(text, &entities), &entities), text);
    }
}
