use ratatui::crossterm::event::KeyEvent;
use std::time::Instant;
use tracing::{debug, trace};

use gridview::{Cell, Format, Interaction, ViewState, cell};

use crate::domain::{HELP_TEXT, Message};
use crate::inputter::{InputResult, Inputter};

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    POPUP,
    SEARCH,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub title: String,
    pub width: u16,
    pub selected: bool,
    pub highlighted: bool, // Active sort column
    pub swatch: bool,
}

/// Everything the ui needs for one frame.
#[derive(Debug, Clone)]
pub struct UIData {
    pub name: String,
    pub header: Vec<HeaderView>,
    pub rows: Vec<Vec<Cell>>,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub nrows: usize, // Records passing the query
    pub total_rows: usize,
    pub show_pagination: bool,
    pub query: InputResult,
    pub active_search: bool,
    pub show_popup: bool,
    pub popup_message: String,
    pub status_message: String,
}

pub struct Model {
    pub status: Status,
    name: String,
    view: ViewState,
    modus: Modus,
    selected_column: usize,
    input: Inputter,
    last_input: InputResult,
    status_message: String,
    uidata: UIData,
}

impl Model {
    pub fn new(name: impl Into<String>, view: ViewState) -> Self {
        let mut model = Self {
            status: Status::READY,
            name: name.into(),
            view,
            modus: Modus::TABLE,
            selected_column: 0,
            input: Inputter::default(),
            last_input: InputResult::default(),
            status_message: "Started gridview!".to_string(),
            uidata: UIData {
                name: String::new(),
                header: Vec::new(),
                rows: Vec::new(),
                page_index: 1,
                page_count: 1,
                page_size: 0,
                nrows: 0,
                total_rows: 0,
                show_pagination: false,
                query: InputResult::default(),
                active_search: false,
                show_popup: false,
                popup_message: String::new(),
                status_message: String::new(),
            },
        };
        model.update_uidata();
        model
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// In search mode every key goes to the query editor.
    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::SEARCH
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Option<Message>) {
        let Some(msg) = message else {
            return;
        };
        trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);
        if let Message::Resize(width, height) = msg {
            // The table is laid out by ratatui on the next draw
            trace!("UI was resized to {width}x{height}");
            self.update_uidata();
            return;
        }
        match self.modus {
            Modus::TABLE => match msg {
                Message::Quit => self.quit(),
                Message::Exit => self.clear_query(),
                Message::Help => self.show_help(),
                Message::Search => self.enter_search(),
                Message::MoveLeft => self.move_selection(-1),
                Message::MoveRight => self.move_selection(1),
                Message::Sort => self.sort_selected_column(),
                Message::NextPage => self.goto_page(self.view.page_index().saturating_add(1)),
                Message::PreviousPage => self.goto_page(self.view.page_index().saturating_sub(1)),
                Message::FirstPage => self.goto_page(1),
                Message::LastPage => self.goto_page(self.view.page_count()),
                Message::GrowPageSize => self.apply(Interaction::PageSizeChanged(
                    self.view.page_size().next(),
                )),
                Message::ShrinkPageSize => self.apply(Interaction::PageSizeChanged(
                    self.view.page_size().previous(),
                )),
                _ => (),
            },
            Modus::POPUP => match msg {
                Message::Quit => self.quit(),
                Message::Exit | Message::Help => self.close_popup(),
                _ => (),
            },
            Modus::SEARCH => {
                if let Message::RawKey(key) = msg {
                    self.raw_input(key)
                }
            }
        }
        self.update_uidata();
    }

    fn apply(&mut self, interaction: Interaction) {
        self.view = self.view.apply(interaction);
    }

    fn goto_page(&mut self, page: usize) {
        // Keyboard paging stays within the available pages
        let page = page.clamp(1, self.view.page_count());
        if page != self.view.page_index() {
            self.apply(Interaction::PageChanged(page));
        }
    }

    fn move_selection(&mut self, step: isize) {
        let ncolumns = self.view.columns().len();
        if ncolumns == 0 {
            return;
        }
        self.selected_column = self
            .selected_column
            .saturating_add_signed(step)
            .min(ncolumns - 1);
    }

    fn sort_selected_column(&mut self) {
        let Some(column) = self.view.columns().get(self.selected_column) else {
            return;
        };
        if !column.sortable {
            let message = format!("{} can not be sorted", column.header);
            self.set_status_message(message);
            return;
        }
        let accessor = column.accessor.clone();
        self.apply(Interaction::ColumnHeaderClicked(accessor));
        if let Some(active) = self.view.active_column() {
            let direction = if active.ascending { "ascending" } else { "descending" };
            let message = format!("Sorted by {} {}", active.header, direction);
            self.set_status_message(message);
        }
    }

    fn show_help(&mut self) {
        self.modus = Modus::POPUP;
    }

    fn close_popup(&mut self) {
        trace!("Close popup ...");
        self.modus = Modus::TABLE;
    }

    fn enter_search(&mut self) {
        trace!("Entering search mode ...");
        self.modus = Modus::SEARCH;
        self.input.set(self.view.query());
        self.last_input = self.input.get();
    }

    fn clear_query(&mut self) {
        if !self.view.query().is_empty() {
            self.apply(Interaction::QueryChanged(String::new()));
            self.input.clear();
            self.last_input = self.input.get();
            self.set_status_message("Search cleared");
        }
    }

    fn raw_input(&mut self, key: KeyEvent) {
        let previous = self.last_input.input.clone();
        self.last_input = self.input.read(key);
        if self.last_input.input != previous {
            let start_time = Instant::now();
            self.apply(Interaction::QueryChanged(self.last_input.input.clone()));
            debug!(
                "Search \"{}\" found {} matching rows in {}ms",
                self.last_input.input,
                self.view.visible_count(),
                start_time.elapsed().as_millis()
            );
        }
        if self.last_input.finished {
            self.modus = Modus::TABLE;
            let message = format!("Found {} results", self.view.visible_count());
            self.set_status_message(message);
        }
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    fn update_uidata(&mut self) {
        let view = &self.view;
        let header = view
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, c)| HeaderView {
                title: match c.indicator() {
                    Some(arrow) => format!("{} {}", c.header, arrow),
                    None => c.header.clone(),
                },
                width: c.width,
                selected: idx == self.selected_column,
                highlighted: c.sortable && c.sorting,
                swatch: c.format == Format::Color,
            })
            .collect();
        let rows = view
            .visible()
            .into_iter()
            .map(|record| view.columns().iter().map(|c| cell(record, c)).collect())
            .collect();

        self.uidata = UIData {
            name: self.name.clone(),
            header,
            rows,
            page_index: view.page_index(),
            page_count: view.page_count(),
            page_size: view.page_size().get(),
            nrows: view.visible_count(),
            total_rows: view.source().len(),
            show_pagination: view.shows_pagination(),
            query: self.last_input.clone(),
            active_search: self.modus == Modus::SEARCH,
            show_popup: self.modus == Modus::POPUP,
            popup_message: HELP_TEXT.to_string(),
            status_message: self.status_message.clone(),
        };
    }
}
