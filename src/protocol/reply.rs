//! Reply records
//!
//! Maps the raw sentences of a paragraph into key/value records. Each
//! `!re` data sentence becomes one record; attribute words look like
//! `=key=value` (or `.id=*1` for property words) and are split on the
//! first `=` after the leading marker character.

use std::collections::HashMap;

use super::sentence::{Paragraph, Sentence};

/// One reply record: attribute key to attribute value
///
/// Keys are unique within a record; insertion order is not preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyRecord {
    attributes: HashMap<String, String>,
}

impl ReplyRecord {
    /// Build a record from the attribute words of one data sentence
    ///
    /// The kind word is skipped; words with no `=` separator after the
    /// marker character carry no key/value pair and are ignored.
    pub fn from_sentence(sentence: &Sentence) -> Self {
        let mut attributes = HashMap::new();
        for word in sentence.words().iter().skip(1) {
            if let Some((key, value)) = split_attribute(word) {
                attributes.insert(key.to_string(), value.to_string());
            }
        }
        Self { attributes }
    }

    /// Look up an attribute value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// True when the record has no attributes
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate over key/value pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Consume the record, yielding the underlying map
    pub fn into_map(self) -> HashMap<String, String> {
        self.attributes
    }
}

impl Paragraph {
    /// Map every sentence except the final `!done` into a record
    pub fn records(&self) -> Vec<ReplyRecord> {
        let sentences = self.sentences();
        let data = sentences.len().saturating_sub(1);
        sentences[..data].iter().map(ReplyRecord::from_sentence).collect()
    }
}

/// Split `=key=value` into `("key", "value")`
///
/// The leading marker character is stripped and the remainder split on
/// its first `=`.
fn split_attribute(word: &str) -> Option<(&str, &str)> {
    let mut chars = word.chars();
    chars.next()?;
    chars.as_str().split_once('=')
}

/// Extract the `message` attribute of a trap sentence, when present
pub fn trap_message(sentence: &Sentence) -> Option<&str> {
    sentence
        .words()
        .iter()
        .skip(1)
        .find_map(|word| {
            let (key, value) = split_attribute(word)?;
            (key == "message").then_some(value)
        })
}
