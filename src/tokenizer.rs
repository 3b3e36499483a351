//! Tokenizer adapter: the external text-analysis collaborator, reduced to
//! its contract — a pure, deterministic `string -> ordered sequence of
//! string` function that word-splits and Porter-stems.
//!
//! Both the indexer and the query parser route every word token through
//! [`tokenize`] so that stemming is applied identically on both sides of
//! the index.

/// Splits `text` on non-alphanumeric boundaries and stems each resulting
/// word with the Porter stemming algorithm. Empty words are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(stem_word)
        .collect()
}

/// Stems a single already-isolated word. Used by the query parser, where
/// word boundaries are already known from raw tokenization.
pub fn stem_word(word: &str) -> String {
    porter_stemmer::stem(&word.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_stems() {
        let tokens = tokenize("cats, dogs running");
        assert_eq!(tokens, vec!["cat".to_string(), "dog".to_string(), "run".to_string()]);
    }

    #[test]
    fn drops_empty_words() {
        let tokens = tokenize("  hello,,  world  ");
        assert_eq!(tokens, vec!["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn deterministic() {
        assert_eq!(tokenize("compression"), tokenize("compression"));
    }
}
