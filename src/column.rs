use derive_setters::Setters;
use tracing::trace;

/// How a column's raw value is turned into its display form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    None,
    Currency,
    Date,
    Color,
}

/// A schema entry describing which record field a table column shows.
///
/// `sorting` and `ascending` are owned by the view engine and only change
/// through [`toggle_sort`].
#[derive(Debug, Clone, PartialEq, Setters)]
#[setters(into)]
pub struct Column {
    #[setters(skip)]
    pub accessor: String,
    pub header: String,
    pub sortable: bool,
    pub width: u16,
    pub format: Format,
    #[setters(skip)]
    pub sorting: bool,
    #[setters(skip)]
    pub ascending: bool,
}

impl Column {
    pub fn new(accessor: impl Into<String>) -> Self {
        let accessor = accessor.into();
        Column {
            header: accessor.clone(),
            accessor,
            sortable: true,
            width: 0,
            format: Format::None,
            sorting: false,
            ascending: false,
        }
    }

    /// Sort indicator for the header, if this column is the active sort.
    pub fn indicator(&self) -> Option<&'static str> {
        match (self.sortable && self.sorting, self.ascending) {
            (true, true) => Some("▲"),
            (true, false) => Some("▼"),
            (false, _) => None,
        }
    }
}

/// Applies a header click to the column schema.
///
/// Returns the new schema, or `None` when the click is a no-op (unknown or
/// unsortable column). The clicked column flips its direction and becomes
/// the only sorting column; every other column is reset.
pub fn toggle_sort(columns: &[Column], accessor: &str) -> Option<Vec<Column>> {
    let target = columns.iter().find(|c| c.accessor == accessor)?;
    if !target.sortable {
        trace!("Ignoring click on unsortable column {accessor}");
        return None;
    }

    let updated = columns
        .iter()
        .map(|c| {
            if c.accessor == accessor {
                Column {
                    sorting: true,
                    ascending: !c.ascending,
                    ..c.clone()
                }
            } else {
                Column {
                    sorting: false,
                    ascending: false,
                    ..c.clone()
                }
            }
        })
        .collect();
    Some(updated)
}

/// The column currently driving the sort order.
pub fn active_column(columns: &[Column]) -> Option<&Column> {
    columns.iter().find(|c| c.sorting)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<Column> {
        vec![
            Column::new("name").header("Name"),
            Column::new("price").format(Format::Currency),
            Column::new("hex").sortable(false).format(Format::Color),
        ]
    }

    #[test]
    fn first_click_sorts_ascending() {
        let columns = toggle_sort(&schema(), "name").unwrap();
        assert!(columns[0].sorting);
        assert!(columns[0].ascending);
        assert_eq!(columns[0].indicator(), Some("▲"));
        assert_eq!(active_column(&columns).map(|c| c.accessor.as_str()), Some("name"));
    }

    #[test]
    fn second_click_flips_direction() {
        let once = toggle_sort(&schema(), "name").unwrap();
        let twice = toggle_sort(&once, "name").unwrap();
        assert!(twice[0].sorting);
        assert!(!twice[0].ascending);
        assert_eq!(twice[0].indicator(), Some("▼"));
    }

    #[test]
    fn only_one_column_sorts() {
        let columns = toggle_sort(&schema(), "name").unwrap();
        let columns = toggle_sort(&columns, "price").unwrap();
        assert_eq!(columns.iter().filter(|c| c.sorting).count(), 1);
        assert!(!columns[0].sorting);
        assert!(!columns[0].ascending);
        assert!(columns[1].ascending);
    }

    #[test]
    fn unsortable_or_unknown_is_noop() {
        let columns = schema();
        assert!(toggle_sort(&columns, "hex").is_none());
        assert!(toggle_sort(&columns, "missing").is_none());
        assert!(active_column(&columns).is_none());
    }

    #[test]
    fn header_defaults_to_accessor() {
        let c = Column::new("updated_at");
        assert_eq!(c.header, "updated_at");
        assert!(c.sortable);
        assert_eq!(c.format, Format::None);
        assert_eq!(c.indicator(), None);
    }
}
