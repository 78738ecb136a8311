//! Prefix-searchable inverted index over a record collection.
//!
//! The index maps every token of the indexed fields to the documents that
//! contain it. Tokens live in a `BTreeMap`, so a prefix query is a range scan
//! starting at the prefix.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use tracing::{debug, trace};

use crate::record::Record;

#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    // Reference key of every indexed document, in insertion order.
    refs: Vec<String>,
    postings: BTreeMap<String, BTreeSet<usize>>,
}

/// Splits text into lowercase search tokens.
///
/// Separators are whitespace and `-`. Leading and trailing non-alphanumeric
/// characters are trimmed from each token, so `#FF0000` indexes as `ff0000`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == '-')
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

impl SearchIndex {
    /// Indexes `fields` of every record under its `reference_field` value.
    ///
    /// Records without a reference value cannot be referred to and are left
    /// out of the index.
    pub fn build<'a, I>(records: I, reference_field: &str, fields: &[String]) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let start_time = Instant::now();
        let mut index = SearchIndex::default();

        for record in records {
            let reference = match record.get(reference_field) {
                Some(v) if !v.is_null() => v.as_text().into_owned(),
                _ => {
                    trace!("Skipping record without reference field {reference_field}");
                    continue;
                }
            };

            let doc = index.refs.len();
            index.refs.push(reference);
            for field in fields {
                if let Some(value) = record.get(field) {
                    for token in tokenize(&value.as_text()) {
                        index.postings.entry(token).or_default().insert(doc);
                    }
                }
            }
        }

        debug!(
            "Built search index over {} documents, {} tokens in {}ms",
            index.refs.len(),
            index.postings.len(),
            start_time.elapsed().as_millis()
        );
        index
    }

    /// Reference keys of all documents matching `query`.
    ///
    /// Every query token is matched as a prefix of an indexed token and a
    /// document matches when any token does. Keys come back once each, in
    /// the order the documents were indexed. Callers handle the empty query
    /// themselves; a query without tokens matches nothing.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let mut docs = BTreeSet::new();
        for term in tokenize(query) {
            for (_, postings) in self
                .postings
                .range(term.clone()..)
                .take_while(|(token, _)| token.starts_with(&term))
            {
                docs.extend(postings.iter().copied());
            }
        }

        let mut seen = BTreeSet::new();
        docs.into_iter()
            .map(|doc| self.refs[doc].as_str())
            .filter(|r| seen.insert(*r))
            .collect()
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> Vec<Record> {
        vec![
            Record::new().with("id", 1_i64).with("name", "Red").with("hex", "#FF0000"),
            Record::new().with("id", 2_i64).with("name", "Dark Red").with("hex", "#8B0000"),
            Record::new().with("id", 3_i64).with("name", "Reddish-Brown").with("hex", "#A52A2A"),
            Record::new().with("id", 4_i64).with("name", "Blue").with("hex", "#0000FF"),
        ]
    }

    fn fields() -> Vec<String> {
        vec!["hex".to_string(), "name".to_string()]
    }

    #[test]
    fn tokenizer_splits_and_trims() {
        assert_eq!(tokenize("Reddish-Brown"), vec!["reddish", "brown"]);
        assert_eq!(tokenize("  #FF0000 "), vec!["ff0000"]);
        assert!(tokenize("  -- ").is_empty());
    }

    #[test]
    fn prefix_matches_in_index_order() {
        let records = colors();
        let index = SearchIndex::build(&records, "name", &fields());
        assert_eq!(index.len(), 4);
        assert_eq!(index.search("red"), vec!["Red", "Dark Red", "Reddish-Brown"]);
        assert_eq!(index.search("RE"), vec!["Red", "Dark Red", "Reddish-Brown"]);
    }

    #[test]
    fn secondary_field_is_searchable() {
        let records = colors();
        let index = SearchIndex::build(&records, "name", &fields());
        assert_eq!(index.search("#00"), vec!["Blue"]);
        assert_eq!(index.search("8b"), vec!["Dark Red"]);
    }

    #[test]
    fn any_term_matches() {
        let records = colors();
        let index = SearchIndex::build(&records, "name", &fields());
        assert_eq!(index.search("blue brown"), vec!["Reddish-Brown", "Blue"]);
    }

    #[test]
    fn no_match_is_empty() {
        let records = colors();
        let index = SearchIndex::build(&records, "name", &fields());
        assert!(index.search("green").is_empty());
        assert!(index.search("   ").is_empty());
    }

    #[test]
    fn records_without_reference_are_skipped() {
        let records = vec![
            Record::new().with("id", 1_i64).with("hex", "#FFFFFF"),
            Record::new().with("id", 2_i64).with("name", "White"),
        ];
        let index = SearchIndex::build(&records, "name", &fields());
        assert_eq!(index.len(), 1);
        assert!(index.search("ffffff").is_empty());
        assert_eq!(index.search("wh"), vec!["White"]);
    }
}
