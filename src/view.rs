//! The derived view over a record collection.
//!
//! A [`ViewState`] is never patched in place. Every interaction returns a new
//! state whose visible page is `paginate(sort(filter(source, query)))`. The
//! source collection, search index and schema are shared between states
//! through `Arc`s, so deriving a new state only costs the recomputed rows.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::column::{self, Column};
use crate::config::GridConfig;
use crate::filter::filter_rows;
use crate::paginate::{self, PageSize};
use crate::record::Record;
use crate::search::SearchIndex;
use crate::sort::sort_by_active;

/// A signal from the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    QueryChanged(String),
    ColumnHeaderClicked(String),
    PageSizeChanged(PageSize),
    PageChanged(usize),
}

#[derive(Debug, Clone)]
pub struct ViewState {
    config: Arc<GridConfig>,
    source: Arc<[Record]>,
    index: Arc<SearchIndex>,
    columns: Arc<[Column]>,
    query: String,
    page_size: PageSize,
    page_index: usize,
    filtered: Arc<Vec<usize>>, // Positions in source matching the query, in source order
    rows: Arc<Vec<usize>>,     // `filtered` ordered by the active column
}

// At most one column may be sorting; keep the first one a caller marked.
fn normalize_columns(columns: Vec<Column>) -> Vec<Column> {
    let mut seen_sorting = false;
    columns
        .into_iter()
        .map(|mut c| {
            if c.sorting {
                if seen_sorting {
                    c.sorting = false;
                    c.ascending = false;
                }
                seen_sorting = true;
            }
            c
        })
        .collect()
}

impl ViewState {
    pub fn new(records: Vec<Record>, columns: Vec<Column>, config: GridConfig) -> Self {
        let source: Arc<[Record]> = records.into();
        let index = SearchIndex::build(
            source.iter(),
            &config.reference_field,
            &config.search_fields,
        );
        let columns: Arc<[Column]> = normalize_columns(columns).into();
        let page_size = config.page_size;

        let mut state = ViewState {
            config: Arc::new(config),
            source,
            index: Arc::new(index),
            columns,
            query: String::new(),
            page_size,
            page_index: 1,
            filtered: Arc::new(Vec::new()),
            rows: Arc::new(Vec::new()),
        };
        state.refilter();
        debug!(
            "Created view over {} records and {} columns",
            state.source.len(),
            state.columns.len()
        );
        state
    }

    /// Dispatches an interaction to its handler.
    pub fn apply(&self, interaction: Interaction) -> Self {
        trace!("Applying {interaction:?}");
        match interaction {
            Interaction::QueryChanged(query) => self.on_query_changed(&query),
            Interaction::ColumnHeaderClicked(accessor) => self.on_column_header_clicked(&accessor),
            Interaction::PageSizeChanged(size) => self.on_page_size_changed(size),
            Interaction::PageChanged(page) => self.on_page_changed(page),
        }
    }

    /// New query: refilter, keep the active sort, back to page 1.
    pub fn on_query_changed(&self, query: &str) -> Self {
        let mut next = self.clone();
        next.query = query.to_string();
        next.page_index = 1;
        next.refilter();
        debug!("Query \"{}\" matches {} records", next.query, next.visible_count());
        next
    }

    /// Header click: toggle that column's sort and go back to page 1.
    ///
    /// Unknown and unsortable columns leave the state unchanged.
    pub fn on_column_header_clicked(&self, accessor: &str) -> Self {
        let Some(columns) = column::toggle_sort(&self.columns, accessor) else {
            return self.clone();
        };
        let mut next = self.clone();
        next.columns = columns.into();
        next.page_index = 1;
        next.resort();
        debug!(
            "Sorted by {} ({})",
            accessor,
            if next.active_column().is_some_and(|c| c.ascending) { "ascending" } else { "descending" }
        );
        next
    }

    pub fn on_page_size_changed(&self, page_size: PageSize) -> Self {
        ViewState {
            page_size,
            page_index: 1,
            ..self.clone()
        }
    }

    /// Moves to `page_index`. Page 0 is read as page 1; pages past the end
    /// are kept and show nothing.
    pub fn on_page_changed(&self, page_index: usize) -> Self {
        ViewState {
            page_index: page_index.max(1),
            ..self.clone()
        }
    }

    /// Replaces the source collection and rebuilds the search index. Query
    /// and sort carry over, the page goes back to 1.
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        let source: Arc<[Record]> = records.into();
        let index = SearchIndex::build(
            source.iter(),
            &self.config.reference_field,
            &self.config.search_fields,
        );
        let mut next = ViewState {
            source,
            index: Arc::new(index),
            page_index: 1,
            ..self.clone()
        };
        next.refilter();
        next
    }

    fn refilter(&mut self) {
        let filtered = filter_rows(
            &self.source,
            &self.index,
            &self.config.reference_field,
            &self.query,
        );
        self.filtered = Arc::new(filtered);
        self.resort();
    }

    fn resort(&mut self) {
        let rows = sort_by_active(
            &self.source,
            self.filtered.as_ref().clone(),
            &self.columns,
            self.config.temporal_field.as_deref(),
        );
        self.rows = Arc::new(rows);
    }

    /// Records on the current page, in display order.
    pub fn visible(&self) -> Vec<&Record> {
        paginate::paginate(self.rows.as_slice(), self.page_index, self.page_size)
            .iter()
            .map(|&idx| &self.source[idx])
            .collect()
    }

    /// All records passing the query, in display order.
    pub fn ordered(&self) -> impl Iterator<Item = &Record> {
        self.rows.iter().map(|&idx| &self.source[idx])
    }

    /// Number of records passing the query, before pagination.
    pub fn visible_count(&self) -> usize {
        self.rows.len()
    }

    pub fn page_count(&self) -> usize {
        paginate::page_count(self.visible_count(), self.page_size)
    }

    /// Whether pagination controls are worth showing.
    pub fn shows_pagination(&self) -> bool {
        self.page_size.get() < self.visible_count()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn active_column(&self) -> Option<&Column> {
        column::active_column(&self.columns)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn source(&self) -> &[Record] {
        &self.source
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Format;
    use crate::record::Value;

    fn paints() -> Vec<Record> {
        vec![
            Record::new().with("id", 1_i64).with("name", "Crimson").with("hex", "#DC143C").with("price", "12"),
            Record::new().with("id", 2_i64).with("name", "Coral").with("hex", "#FF7F50").with("price", "4.5"),
            Record::new().with("id", 3_i64).with("name", "Azure").with("hex", "#F0FFFF").with("price", "30"),
            Record::new().with("id", 4_i64).with("name", "Cyan").with("hex", "#00FFFF").with("price", "4.5"),
            Record::new().with("id", 5_i64).with("name", "Amber").with("hex", "#FFBF00").with("price", Value::Null),
        ]
    }

    fn schema() -> Vec<Column> {
        vec![
            Column::new("name").header("Name"),
            Column::new("price").header("Price").format(Format::Currency),
            Column::new("hex").header("Color").sortable(false).format(Format::Color),
        ]
    }

    fn names<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
        records
            .into_iter()
            .map(|r| r.get("name").map(|v| v.as_text().into_owned()).unwrap_or_default())
            .collect()
    }

    fn view() -> ViewState {
        ViewState::new(paints(), schema(), GridConfig::default().page_size(PageSize::Ten))
    }

    #[test]
    fn starts_unfiltered_on_page_one() {
        let v = view();
        assert_eq!(v.page_index(), 1);
        assert_eq!(v.visible_count(), 5);
        assert_eq!(names(v.visible()), ["Crimson", "Coral", "Azure", "Cyan", "Amber"]);
        assert!(v.active_column().is_none());
        assert!(!v.shows_pagination());
    }

    #[test]
    fn query_filters_in_source_order() {
        let v = view().on_query_changed("c");
        assert_eq!(names(v.visible()), ["Crimson", "Coral", "Cyan"]);
        assert_eq!(v.visible_count(), 3);

        let v = v.on_query_changed("");
        assert_eq!(v.visible_count(), 5);
    }

    #[test]
    fn query_matches_secondary_field() {
        let v = view().on_query_changed("#ff");
        assert_eq!(names(v.visible()), ["Coral", "Amber"]);
    }

    #[test]
    fn sort_keeps_query_and_query_keeps_sort() {
        let v = view().on_query_changed("c").on_column_header_clicked("name");
        assert_eq!(names(v.visible()), ["Coral", "Crimson", "Cyan"]);

        let v = v.on_query_changed("");
        assert_eq!(names(v.visible()), ["Amber", "Azure", "Coral", "Crimson", "Cyan"]);
    }

    #[test]
    fn second_click_reverses() {
        let v = view().on_column_header_clicked("name");
        let first = names(v.ordered());
        let v = v.on_column_header_clicked("name");
        let mut second = names(v.ordered());
        second.reverse();
        assert_eq!(first, second);
        assert!(!v.active_column().map(|c| c.ascending).unwrap_or(true));
    }

    #[test]
    fn numeric_sort_with_missing_last() {
        let v = view().on_column_header_clicked("price");
        assert_eq!(names(v.ordered()), ["Coral", "Cyan", "Crimson", "Azure", "Amber"]);
        let v = v.on_column_header_clicked("price");
        assert_eq!(names(v.ordered()), ["Azure", "Crimson", "Coral", "Cyan", "Amber"]);
    }

    #[test]
    fn exactly_one_sorting_column() {
        let v = view()
            .on_column_header_clicked("name")
            .on_column_header_clicked("price");
        assert_eq!(v.columns().iter().filter(|c| c.sorting).count(), 1);
        assert_eq!(v.active_column().map(|c| c.accessor.as_str()), Some("price"));
        assert!(!v.columns()[0].ascending);
    }

    #[test]
    fn unsortable_click_is_noop() {
        let v = view().on_page_changed(2);
        let after = v.on_column_header_clicked("hex");
        assert_eq!(after.page_index(), 2);
        assert_eq!(after.columns(), v.columns());
        let after = v.on_column_header_clicked("nope");
        assert_eq!(after.page_index(), 2);
    }

    #[test]
    fn interactions_reset_page() {
        let v = view().on_page_changed(3);
        assert_eq!(v.page_index(), 3);
        assert!(v.visible().is_empty());
        assert_eq!(v.on_query_changed("a").page_index(), 1);
        assert_eq!(v.on_column_header_clicked("name").page_index(), 1);
        assert_eq!(v.on_page_size_changed(PageSize::TwentyFive).page_index(), 1);
        assert_eq!(v.on_page_changed(0).page_index(), 1);
    }

    #[test]
    fn unmatched_query_is_empty_view() {
        let v = view().on_query_changed("zzz");
        assert_eq!(v.visible_count(), 0);
        assert!(v.visible().is_empty());
        assert_eq!(v.page_count(), 1);
    }

    #[test]
    fn apply_dispatches() {
        let v = view()
            .apply(Interaction::QueryChanged("c".into()))
            .apply(Interaction::ColumnHeaderClicked("name".into()))
            .apply(Interaction::PageSizeChanged(PageSize::TwentyFive))
            .apply(Interaction::PageChanged(1));
        assert_eq!(v.query(), "c");
        assert_eq!(v.page_size(), PageSize::TwentyFive);
        assert_eq!(names(v.visible()), ["Coral", "Crimson", "Cyan"]);
    }

    #[test]
    fn replacing_records_rebuilds_the_index() {
        let v = view().on_query_changed("c").on_column_header_clicked("name");
        let mut records = paints();
        records.push(Record::new().with("id", 6_i64).with("name", "Cerulean").with("hex", "#007BA7"));
        let v = v.with_records(records);
        assert_eq!(names(v.visible()), ["Cerulean", "Coral", "Crimson", "Cyan"]);
        assert_eq!(v.source().len(), 6);
    }

    #[test]
    fn extra_sorting_columns_are_cleared() {
        let columns = toggle_all(schema());
        let v = ViewState::new(paints(), columns, GridConfig::default());
        assert_eq!(v.columns().iter().filter(|c| c.sorting).count(), 1);
        assert_eq!(v.active_column().map(|c| c.accessor.as_str()), Some("name"));
        assert_eq!(names(v.ordered()), ["Amber", "Azure", "Coral", "Crimson", "Cyan"]);
    }

    // Marks every column as sorting ascending, which breaks the one-sort rule.
    fn toggle_all(columns: Vec<Column>) -> Vec<Column> {
        columns
            .into_iter()
            .map(|c| {
                let accessor = c.accessor.clone();
                column::toggle_sort(&[c.sortable(true)], &accessor)
                    .and_then(|mut v| v.pop())
                    .unwrap()
            })
            .collect()
    }
}
