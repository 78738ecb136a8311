use std::collections::HashSet;
use std::time::Instant;

use tracing::trace;

use crate::record::Record;
use crate::search::{SearchIndex, tokenize};

/// True when `query` should show the whole collection.
pub fn is_empty_query(query: &str) -> bool {
    tokenize(query).is_empty()
}

/// Positions of the records in `source` that match `query`.
///
/// Matching is answered by the index, but the result keeps the order of
/// `source`. An empty query returns every position.
pub fn filter_rows(
    source: &[Record],
    index: &SearchIndex,
    reference_field: &str,
    query: &str,
) -> Vec<usize> {
    if is_empty_query(query) {
        return (0..source.len()).collect();
    }

    let start_time = Instant::now();
    let matches: HashSet<&str> = index.search(query).into_iter().collect();
    let rows: Vec<usize> = source
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            record
                .get(reference_field)
                .filter(|v| !v.is_null())
                .is_some_and(|v| matches.contains(v.as_text().as_ref()))
        })
        .map(|(idx, _)| idx)
        .collect();

    trace!(
        "Filter \"{}\" kept {} of {} rows in {}ms",
        query,
        rows.len(),
        source.len(),
        start_time.elapsed().as_millis()
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Vec<Record>, SearchIndex) {
        let records: Vec<Record> = ["Teal", "Tan", "Olive", "Tomato"]
            .iter()
            .enumerate()
            .map(|(i, name)| Record::new().with("id", i as i64).with("name", *name))
            .collect();
        let index = SearchIndex::build(&records, "name", &["name".to_string()]);
        (records, index)
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let (records, index) = setup();
        assert_eq!(filter_rows(&records, &index, "name", ""), vec![0, 1, 2, 3]);
        assert_eq!(filter_rows(&records, &index, "name", "  "), vec![0, 1, 2, 3]);
    }

    #[test]
    fn result_follows_source_order() {
        let (records, index) = setup();
        assert_eq!(filter_rows(&records, &index, "name", "t"), vec![0, 1, 3]);
        assert_eq!(filter_rows(&records, &index, "name", "ol"), vec![2]);
    }

    #[test]
    fn no_match_is_empty() {
        let (records, index) = setup();
        assert!(filter_rows(&records, &index, "name", "zz").is_empty());
    }
}
