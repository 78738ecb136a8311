use std::str::FromStr;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Cell as TableCell, Clear, Paragraph, Row, Table},
};

use gridview::Cell;

use crate::model::{Model, UIData};

const CMDLINE_HEIGHT: u16 = 1;
const STATUSLINE_HEIGHT: u16 = 1;
const POPUP_WIDTH: u16 = 56;
const POPUP_HEIGHT: u16 = 16;

#[derive(Debug, Default)]
pub struct TableUI;

impl TableUI {
    pub fn draw(&self, model: &Model, frame: &mut Frame) {
        let uidata = model.get_uidata();
        let [search_area, table_area, status_area] = Layout::vertical([
            Constraint::Length(CMDLINE_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(STATUSLINE_HEIGHT),
        ])
        .areas(frame.area());

        frame.render_widget(Self::search_line(uidata), search_area);
        frame.render_widget(Self::table(uidata), table_area);
        frame.render_widget(Self::status_line(uidata), status_area);

        if uidata.active_search {
            // Curser after the prompt "Search: "
            let x = search_area.x + 8 + uidata.query.curser_pos as u16;
            frame.set_cursor_position((x.min(search_area.right().saturating_sub(1)), search_area.y));
        }

        if uidata.show_popup {
            let area = Self::centered(frame.area(), POPUP_WIDTH, POPUP_HEIGHT);
            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(uidata.popup_message.as_str())
                    .block(Block::bordered().title(" Help ".bold())),
                area,
            );
        }
    }

    fn search_line(uidata: &UIData) -> Paragraph<'_> {
        let style = if uidata.active_search {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text = if uidata.query.input.is_empty() && !uidata.active_search {
            "Search by name... (/)".to_string()
        } else {
            uidata.query.input.clone()
        };
        Paragraph::new(Line::from(vec![
            Span::styled("Search: ", style.add_modifier(Modifier::BOLD)),
            Span::styled(text, style),
        ]))
    }

    fn table(uidata: &UIData) -> Table<'_> {
        let header = Row::new(uidata.header.iter().map(|h| {
            let mut style = Style::default().add_modifier(Modifier::BOLD);
            if h.highlighted {
                style = style.fg(Color::Black).bg(Color::Yellow);
            }
            if h.selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            TableCell::from(h.title.as_str()).style(style)
        }));

        let rows: Vec<Row> = uidata
            .rows
            .iter()
            .map(|cells| Row::new(cells.iter().map(Self::cell)))
            .collect();

        let widths: Vec<Constraint> = uidata
            .header
            .iter()
            .map(|h| Constraint::Length(h.width))
            .collect();

        let title = Line::from(format!(" {} ", uidata.name)).bold();
        Table::new(rows, widths)
            .header(header)
            .block(Block::bordered().title(title.centered()))
    }

    fn cell(cell: &Cell) -> TableCell<'_> {
        match cell {
            Cell::Text(text) => TableCell::from(text.as_str()),
            Cell::Swatch(color) => match Color::from_str(color) {
                Ok(c) => TableCell::from("      ").style(Style::default().bg(c)),
                Err(_) => TableCell::from(color.as_str()),
            },
        }
    }

    fn status_line(uidata: &UIData) -> Paragraph<'_> {
        let mut spans = vec![
            Span::from(format!(
                " {} of {} records, {} per page ",
                uidata.nrows, uidata.total_rows, uidata.page_size
            )),
        ];
        if uidata.show_pagination {
            spans.push(
                format!(
                    " Page {}/{} <n>/<p> ",
                    uidata.page_index, uidata.page_count
                )
                .blue()
                .bold(),
            );
        }
        spans.push(Span::from(format!(" {}", uidata.status_message)).italic());
        Paragraph::new(Line::from(spans))
    }

    fn centered(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }
}
