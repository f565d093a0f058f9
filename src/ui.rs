use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
};

use crate::domain::{CMDMode, TVConfig};
use crate::model::{DialogFocus, DialogView, UIData};

pub const COLUMN_WIDTH_MARGIN: usize = 1;
pub const FRAME_WIDTH: usize = 2;
pub const CMDLINE_HEIGH: u16 = 1;
pub const STATUSLINE_HEIGHT: u16 = 1;

#[derive(Debug)]
pub struct TableUI {
    max_column_width: usize,
}

impl TableUI {
    pub fn new(config: &TVConfig) -> Self {
        Self {
            max_column_width: config.max_column_width,
        }
    }

    pub fn draw(&self, uidata: &UIData, frame: &mut Frame) {
        let [main, statusline, cmdline] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(STATUSLINE_HEIGHT),
            Constraint::Length(CMDLINE_HEIGH),
        ])
        .areas(frame.area());

        self.draw_table(uidata, frame, main);
        self.draw_statusline(uidata, frame, statusline);
        self.draw_cmdline(uidata, frame, cmdline);

        if let Some(view) = &uidata.dialog {
            self.draw_dialog(view, frame);
        }
        if let Some(message) = &uidata.popup {
            self.draw_popup(message, frame);
        }
    }

    fn draw_table(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let title = Line::from(format!(" {} ", uidata.name).bold());
        let instructions = Line::from(vec![
            " Search ".into(),
            "</>".blue().bold(),
            " Filter ".into(),
            "<f>".blue().bold(),
            " Page ".into(),
            "<n/p>".blue().bold(),
            " Help ".into(),
            "<?>".blue().bold(),
            " Quit ".into(),
            "<q> ".blue().bold(),
        ]);
        let block = Block::bordered()
            .title(title.centered())
            .title_bottom(instructions.centered())
            .border_set(border::THICK);

        if uidata.loading && uidata.columns.is_empty() {
            frame.render_widget(Paragraph::new("Loading ...").centered().block(block), area);
            return;
        }
        if uidata.columns.is_empty() {
            frame.render_widget(Paragraph::new("No columns").centered().block(block), area);
            return;
        }

        let header_style = Style::default().add_modifier(Modifier::BOLD);
        let selected_style = header_style.fg(Color::Black).bg(Color::Yellow);

        let mut header = vec![Cell::from(uidata.index.name.clone()).dim()];
        header.extend(uidata.columns.iter().enumerate().map(|(cidx, c)| {
            let style = if uidata.selected_column == Some(cidx) {
                selected_style
            } else {
                header_style
            };
            Cell::from(c.name.clone()).style(style)
        }));

        let nrows = uidata.index.data.len();
        let rows: Vec<Row> = if nrows == 0 {
            vec![Row::new(vec![
                Cell::from(""),
                Cell::from("No data").italic().dim(),
            ])]
        } else {
            (0..nrows)
                .map(|r| {
                    let mut cells = vec![Cell::from(uidata.index.data[r].clone()).dim()];
                    cells.extend(uidata.columns.iter().map(|c| {
                        let value = c.data.get(r).map(String::as_str).unwrap_or("");
                        Cell::from(truncate(value, c.width.min(self.max_column_width)))
                    }));
                    Row::new(cells)
                })
                .collect()
        };

        let mut widths = vec![Constraint::Length(uidata.index.width as u16)];
        widths.extend(
            uidata
                .columns
                .iter()
                .map(|c| Constraint::Length(c.width as u16)),
        );

        let table = Table::new(rows, widths)
            .header(Row::new(header))
            .column_spacing(1)
            .block(block);
        frame.render_widget(table, area);
    }

    fn draw_statusline(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::from(format!(" {} ", uidata.records)).bold(),
            Span::from(format!("| page {} / {} ", uidata.page, uidata.total_pages)),
        ];
        if !uidata.search_text.is_empty() {
            spans.push(Span::from(format!("| search \"{}\" ", uidata.search_text)).yellow());
        }
        if uidata.nfilters > 0 {
            spans.push(Span::from(format!("| {} filters ", uidata.nfilters)).yellow());
        }
        if let Some((column, ascending)) = &uidata.sort {
            let arrow = if *ascending { "↑" } else { "↓" };
            spans.push(Span::from(format!("| sorted by {column} {arrow} ")));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).reversed(), area);
    }

    fn draw_cmdline(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        match &uidata.cmdinput {
            Some((mode, input)) => {
                let prompt = match mode {
                    CMDMode::Search => "/",
                    CMDMode::GotoPage => "page: ",
                    CMDMode::FilterValue => "value: ",
                };
                let line = Line::from(vec![prompt.bold(), input.input.clone().into()]);
                frame.render_widget(Paragraph::new(line), area);
                let x = area.x + (prompt.chars().count() + input.curser_pos) as u16;
                frame.set_cursor_position(Position::new(x.min(area.right()), area.y));
            }
            None => {
                frame.render_widget(Paragraph::new(uidata.status_message.clone()).dim(), area);
            }
        }
    }

    fn draw_dialog(&self, view: &DialogView, frame: &mut Frame) {
        let area = popup_area(frame.area(), 80, 60);
        frame.render_widget(Clear, area);

        let block = Block::bordered()
            .title(Line::from(" Filters ".bold()).centered())
            .title_bottom(
                Line::from(" ←→ operator  Enter value  Tab switch  d remove  x clear  Esc close ")
                    .centered(),
            )
            .border_set(border::ROUNDED);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [columns_area, active_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(inner);

        let highlight = Style::default().fg(Color::Black).bg(Color::Yellow);
        let columns_focused = view.cursor.focus == DialogFocus::Columns;

        let items: Vec<ListItem> = view
            .dialog
            .entries
            .iter()
            .map(|entry| {
                let selected = entry.column == view.cursor.column;
                let operator = if selected {
                    view.cursor.operator
                } else {
                    entry.operator
                };
                let line = Line::from(vec![
                    Span::from(format!("{:<20}", truncate(&entry.name, 20))),
                    Span::from(format!(" [{:<12}] ", operator.label())).blue(),
                    Span::from(entry.value.clone()),
                ]);
                if selected && columns_focused {
                    let mut choices = vec![Span::from("  ")];
                    for op in entry.operators {
                        let choice = Span::from(format!(" {} ", op.as_str()));
                        choices.push(if *op == operator {
                            choice.reversed()
                        } else {
                            choice
                        });
                    }
                    ListItem::new(vec![line.style(highlight), Line::from(choices)])
                } else {
                    ListItem::new(line)
                }
            })
            .collect();
        frame.render_widget(
            List::new(items).block(Block::bordered().title(" Columns ")),
            columns_area,
        );

        let active_block = Block::bordered().title(" Active ");
        if view.dialog.has_filters() {
            let items: Vec<ListItem> = view
                .dialog
                .active
                .iter()
                .enumerate()
                .map(|(idx, entry)| {
                    let item = ListItem::new(entry.describe());
                    if !columns_focused && idx == view.cursor.active {
                        item.style(highlight)
                    } else {
                        item
                    }
                })
                .collect();
            frame.render_widget(List::new(items).block(active_block), active_area);
        } else {
            frame.render_widget(
                Paragraph::new(view.dialog.status_line())
                    .dim()
                    .block(active_block),
                active_area,
            );
        }
    }

    fn draw_popup(&self, message: &str, frame: &mut Frame) {
        let area = popup_area(frame.area(), 60, 70);
        frame.render_widget(Clear, area);
        let block = Block::bordered()
            .title(Line::from(" tpv ".bold()).centered())
            .title_bottom(Line::from(" Esc to close ").centered())
            .border_set(border::ROUNDED);
        frame.render_widget(
            Paragraph::new(message.to_string())
                .wrap(Wrap { trim: false })
                .block(block),
            area,
        );
    }
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else if width == 0 {
        String::new()
    } else {
        let mut out: String = value.chars().take(width - 1).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::FilterDialog;
    use crate::model::{ColumnView, DialogCursor};
    use crate::state::TableState;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn truncates_long_values() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn draws_page_and_status() {
        let uidata = UIData {
            name: "people.csv".into(),
            columns: vec![ColumnView {
                name: "Name".into(),
                width: 6,
                data: vec!["Alice".into(), "Bob".into()],
            }],
            index: ColumnView {
                name: "#".into(),
                width: 1,
                data: vec!["1".into(), "2".into()],
            },
            selected_column: Some(0),
            records: "2 records".into(),
            page: 1,
            total_pages: 1,
            ..UIData::default()
        };
        let ui = TableUI::new(&TVConfig::default());
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| ui.draw(&uidata, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("people.csv"));
        assert!(text.contains("Alice"));
        assert!(text.contains("2 records"));
        assert!(text.contains("page 1 / 1"));
    }

    #[test]
    fn dialog_lists_operator_choices() {
        let state = TableState::new(crate::table::Table::new(
            vec!["Name".into(), "Age".into()],
            vec![vec!["Alice".into(), "30".into()]],
        ));
        let uidata = UIData {
            dialog: Some(DialogView {
                dialog: FilterDialog::build(&state),
                cursor: DialogCursor::default(),
            }),
            ..UIData::default()
        };
        let ui = TableUI::new(&TVConfig::default());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| ui.draw(&uidata, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Filters"));
        assert!(text.contains("[Contains"));
        assert!(text.contains(" greater "));
        assert!(text.contains(" less "));
        assert!(text.contains("No filters applied"));
    }
}
