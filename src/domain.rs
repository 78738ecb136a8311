use std::io::Error;

use gridview::GridError;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;
use thiserror::Error;

pub const HELP_TEXT: &str = "\
gridview keys

  /            search by name or color
  Esc          clear the search / close this help
  Left, Right  select a column header
  Enter, s     sort by the selected column (again to reverse)
  n, PgDn      next page
  p, PgUp      previous page
  Home, End    first / last page
  +, -         more / fewer rows per page
  ?            this help
  q            quit";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    IoError(#[from] Error),
    #[error("polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    GridError(#[from] GridError),
    #[error("loading failed: {0}")]
    LoadingFailed(String),
    #[error("file not found")]
    FileNotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("unknown file type")]
    UnknownFileType,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub event_poll_time: u64,
    pub max_column_width: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            max_column_width: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    Exit,
    Help,
    Search,
    RawKey(KeyEvent),
    MoveLeft,
    MoveRight,
    Sort,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    GrowPageSize,
    ShrinkPageSize,
    Resize(usize, usize),
}
