use derive_setters::Setters;

use crate::paginate::PageSize;

/// Settings of a grid view.
///
/// ```
/// use gridview::{GridConfig, PageSize};
///
/// let cfg = GridConfig::default()
///     .reference_field("title")
///     .page_size(PageSize::TwentyFive);
/// assert_eq!(cfg.reference_field, "title");
/// ```
#[derive(Debug, Clone, PartialEq, Setters)]
#[setters(into)]
pub struct GridConfig {
    /// Field whose value identifies a record in search results.
    pub reference_field: String,
    /// Fields the search index tokenizes.
    pub search_fields: Vec<String>,
    /// Field always compared as a date-time when sorted.
    #[setters(strip_option)]
    pub temporal_field: Option<String>,
    pub page_size: PageSize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            reference_field: "name".to_string(),
            search_fields: vec!["hex".to_string(), "name".to_string()],
            temporal_field: Some("updated_at".to_string()),
            page_size: PageSize::default(),
        }
    }
}
