//! Filter, sort and paginate views over an in-memory record collection.
//!
//! ```
//! use gridview::{Column, GridConfig, Record, ViewState};
//!
//! let records = vec![
//!     Record::new().with("id", 1_i64).with("name", "Teal").with("hex", "#008080"),
//!     Record::new().with("id", 2_i64).with("name", "Tan").with("hex", "#D2B48C"),
//!     Record::new().with("id", 3_i64).with("name", "Olive").with("hex", "#808000"),
//! ];
//! let columns = vec![Column::new("name").header("Name"), Column::new("hex")];
//!
//! let view = ViewState::new(records, columns, GridConfig::default())
//!     .on_query_changed("t")
//!     .on_column_header_clicked("name");
//! let page: Vec<_> = view.visible().into_iter().map(|r| r.get("name").unwrap().as_text()).collect();
//! assert_eq!(page, ["Tan", "Teal"]);
//! ```

pub mod column;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod paginate;
pub mod record;
pub mod search;
pub mod sort;
pub mod view;

pub use column::{Column, Format};
pub use config::GridConfig;
pub use error::GridError;
pub use format::{Cell, cell, format_value};
pub use paginate::PageSize;
pub use record::{Record, Value};
pub use search::SearchIndex;
pub use sort::{Direction, Strategy};
pub use view::{Interaction, ViewState};
