//! Dictionary collaborators feeding candidate words to the filler.
//!
//! The persistent dictionary store lives outside this crate; the filler
//! only needs to stream words of a given length in a stable order, which is
//! what [`Lexicon`] captures. [`WordList`] is the in-memory reference
//! implementation used by the tests and small callers.

use indexmap::IndexSet;

/// Shortest admissible dictionary word.
pub const MIN_WORD_LEN: usize = 3;
/// Longest admissible dictionary word.
pub const MAX_WORD_LEN: usize = 15;

/// An error returned when a word cannot enter a [`WordList`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordError {
    #[error("word {0:?} must be between 3 and 15 letters long")]
    BadLength(String),

    #[error("word {0:?} contains a character outside a-z")]
    NotAlphabetic(String),
}

/// A source of candidate words.
///
/// Words are expected to be lowercase and alphabetic, with lengths within
/// `3..=15`. Implementations must visit words in a stable order: the
/// filler's output order is only reproducible if the dictionary stream is.
/// Duplicate words in the stream are tolerated (the encoder collapses
/// them).
pub trait Lexicon {
    /// Visits every word of the given length.
    fn for_each_word(&self, len: usize, visit: &mut dyn FnMut(&str));
}

impl<L: Lexicon + ?Sized> Lexicon for &L {
    fn for_each_word(&self, len: usize, visit: &mut dyn FnMut(&str)) {
        (**self).for_each_word(len, visit)
    }
}

/// An in-memory word list preserving insertion order.
///
/// Words are validated on insertion: lowercase alphabetic (uppercase input
/// is normalised), length within `3..=15`. Repeated insertions collapse to
/// the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: IndexSet<String>,
}

impl WordList {
    pub fn new() -> WordList {
        WordList::default()
    }

    /// Builds a word list from anything iterating over words.
    pub fn from_words<I>(words: I) -> Result<WordList, WordError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut list = WordList::new();
        for word in words {
            list.insert(word.as_ref())?;
        }
        Ok(list)
    }

    /// Inserts a word. Returns whether it was new.
    pub fn insert(&mut self, word: &str) -> Result<bool, WordError> {
        let word = word.to_ascii_lowercase();
        if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&word.len()) {
            return Err(WordError::BadLength(word));
        }
        if !word.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(WordError::NotAlphabetic(word));
        }
        Ok(self.words.insert(word))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Lexicon for WordList {
    fn for_each_word(&self, len: usize, visit: &mut dyn FnMut(&str)) {
        for word in &self.words {
            if word.len() == len {
                visit(word);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_validates_and_normalises() {
        let mut list = WordList::new();
        assert_eq!(list.insert("Cat"), Ok(true));
        assert!(list.contains("cat"));

        assert_eq!(list.insert("at"), Err(WordError::BadLength("at".into())));
        assert_eq!(
            list.insert("antidisestablish"),
            Err(WordError::BadLength("antidisestablish".into()))
        );
        assert_eq!(
            list.insert("c-t"),
            Err(WordError::NotAlphabetic("c-t".into()))
        );
    }

    #[test]
    fn duplicates_collapse() {
        let mut list = WordList::new();
        assert_eq!(list.insert("cat"), Ok(true));
        assert_eq!(list.insert("cat"), Ok(false));
        assert_eq!(list.insert("CAT"), Ok(false));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn streaming_preserves_insertion_order_per_length() {
        let list = WordList::from_words(["mouse", "cat", "horse", "dog", "eel"]).unwrap();

        let mut threes = vec![];
        list.for_each_word(3, &mut |w| threes.push(w.to_string()));
        assert_eq!(threes, ["cat", "dog", "eel"]);

        let mut fives = vec![];
        list.for_each_word(5, &mut |w| fives.push(w.to_string()));
        assert_eq!(fives, ["mouse", "horse"]);
    }
}
