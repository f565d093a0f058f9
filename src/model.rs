use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Instant;

use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, info, trace, warn};

use crate::dialog::{DialogAction, DialogOutcome, FilterDialog};
use crate::domain::{CMDMode, HELP_TEXT, Message, TVConfig, TVError};
use crate::filter::FilterOperator;
use crate::inputter::{InputResult, Inputter};
use crate::pagination::PageTarget;
use crate::session::{LoadOutcome, LoadTicket, PreviewSlot};
use crate::state::TableState;
use crate::table::Table;
use crate::ui::{COLUMN_WIDTH_MARGIN, FRAME_WIDTH};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Status {
    LOADING,
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    POPUP,
    DIALOG,
    CMDINPUT,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnView {
    pub name: String,
    pub width: usize,
    pub data: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DialogFocus {
    #[default]
    Columns,
    Active,
}

/// Selection inside the filter dialog. Survives rebuilds of the dialog, the
/// dialog content itself does not.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogCursor {
    pub focus: DialogFocus,
    pub column: usize,
    pub operator: FilterOperator,
    pub active: usize,
}

impl Default for DialogCursor {
    fn default() -> Self {
        DialogCursor {
            focus: DialogFocus::Columns,
            column: 0,
            operator: FilterOperator::Contains,
            active: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogView {
    pub dialog: FilterDialog,
    pub cursor: DialogCursor,
}

#[derive(Debug, Clone, Default)]
pub struct UIData {
    pub name: String,
    pub columns: Vec<ColumnView>,
    pub index: ColumnView,
    pub selected_column: Option<usize>,
    pub records: String,
    pub page: usize,
    pub total_pages: usize,
    pub search_text: String,
    pub nfilters: usize,
    pub sort: Option<(String, bool)>,
    pub popup: Option<String>,
    pub dialog: Option<DialogView>,
    pub cmdinput: Option<(CMDMode, InputResult)>,
    pub status_message: String,
    pub loading: bool,
}

pub struct Model {
    config: TVConfig,
    source: PathBuf,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    slot: PreviewSlot,
    loader: Sender<Message>,
    selected_column: usize,
    offset_column: usize,
    dialog: Option<DialogView>,
    input: Inputter,
    cmd_mode: Option<CMDMode>,
    last_input: InputResult,
    popup_message: String,
    status_message: String,
    ui_width: usize,
    uidata: UIData,
}

impl Model {
    pub fn init(
        config: &TVConfig,
        source: PathBuf,
        loader: Sender<Message>,
        ui_width: usize,
    ) -> Self {
        let mut model = Self {
            config: config.clone(),
            source,
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            slot: PreviewSlot::new(),
            loader,
            selected_column: 0,
            offset_column: 0,
            dialog: None,
            input: Inputter::default(),
            cmd_mode: None,
            last_input: InputResult::default(),
            popup_message: String::new(),
            status_message: "Started tpv!".to_string(),
            ui_width,
            uidata: UIData::default(),
        };
        model.update_uidata();
        model
    }

    /// Start a new load of the source. Any load still running is superseded.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.status = Status::LOADING;
        self.status_message = "Loading ...".to_string();
        let ticket = self.slot.begin_load(self.source.clone());
        self.update_uidata();
        ticket
    }

    /// Load the source on a worker thread, the result comes back as `Message::Loaded`.
    pub fn reload(&mut self) {
        let ticket = self.begin_load();
        let loader = self.loader.clone();
        thread::spawn(move || {
            let result = Table::load(ticket.source.clone());
            if loader.send(Message::Loaded(ticket, result)).is_err() {
                debug!("Preview was closed before loading finished");
            }
        });
    }

    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::CMDINPUT
    }

    pub fn in_dialog(&self) -> bool {
        self.modus == Modus::DIALOG
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn state(&self) -> Option<&TableState> {
        self.slot.state()
    }

    pub fn quit(&mut self) {
        self.slot.close();
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), TVError> {
        if let Some(msg) = message {
            trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);
            match msg {
                Message::Loaded(ticket, result) => self.loaded(ticket, result),
                Message::Resize(width, _height) => self.ui_resize(width),
                msg => match self.modus {
                    Modus::TABLE => self.update_table(msg),
                    Modus::POPUP => match msg {
                        Message::Quit => self.quit(),
                        Message::Exit | Message::Enter => self.exit(),
                        _ => (),
                    },
                    Modus::DIALOG => self.update_dialog(msg),
                    Modus::CMDINPUT => {
                        if let Message::RawKey(key) = msg {
                            self.raw_input(key)
                        }
                    }
                },
            }
        }
        self.update_uidata();
        Ok(())
    }

    fn update_table(&mut self, msg: Message) {
        match msg {
            Message::Quit => self.quit(),
            Message::Help => self.show_popup(HELP_TEXT.to_string()),
            Message::Reload => self.reload(),
            Message::Search => {
                let current = self.state().map(|s| s.search_text().to_string());
                self.enter_cmd_mode(CMDMode::Search, current.as_deref().unwrap_or(""));
            }
            Message::GotoPage => self.enter_cmd_mode(CMDMode::GotoPage, ""),
            Message::FilterDialog => self.open_dialog(),
            Message::ClearFilters => {
                if let Some(state) = self.slot.state_mut() {
                    state.clear_filters();
                    self.set_status_message("Cleared all filters");
                }
            }
            Message::NextPage => self.navigate(PageTarget::Next),
            Message::PrevPage => self.navigate(PageTarget::Previous),
            Message::FirstPage => self.navigate(PageTarget::First),
            Message::LastPage => self.navigate(PageTarget::Last),
            Message::SortAscending => self.sort_selected_column(true),
            Message::SortDescending => self.sort_selected_column(false),
            Message::ClearSort => {
                if let Some(state) = self.slot.state_mut() {
                    state.clear_sort();
                }
            }
            Message::MoveLeft => self.selected_column = self.selected_column.saturating_sub(1),
            Message::MoveRight => {
                let ncolumns = self.state().map(|s| s.columns().len()).unwrap_or(0);
                if self.selected_column + 1 < ncolumns {
                    self.selected_column += 1;
                }
            }
            _ => (),
        }
    }

    fn update_dialog(&mut self, msg: Message) {
        match msg {
            Message::Quit => self.quit(),
            Message::Exit => self.dispatch_dialog(DialogAction::Close),
            Message::ClearFilters => self.dispatch_dialog(DialogAction::ClearAll),
            Message::SwitchFocus => {
                if let Some(view) = self.dialog.as_mut() {
                    view.cursor.focus = match view.cursor.focus {
                        DialogFocus::Columns if view.dialog.has_filters() => DialogFocus::Active,
                        _ => DialogFocus::Columns,
                    };
                }
            }
            Message::MoveUp => self.move_dialog_cursor(-1),
            Message::MoveDown => self.move_dialog_cursor(1),
            Message::MoveLeft | Message::MoveRight => {
                if let Some(view) = self.dialog.as_mut()
                    && view.cursor.focus == DialogFocus::Columns
                {
                    view.cursor.operator = if matches!(msg, Message::MoveLeft) {
                        view.cursor.operator.previous()
                    } else {
                        view.cursor.operator.next()
                    };
                }
            }
            Message::Enter => {
                let prefill = self.dialog.as_ref().and_then(|view| {
                    (view.cursor.focus == DialogFocus::Columns)
                        .then(|| view.dialog.entries.get(view.cursor.column))
                        .flatten()
                        .map(|entry| entry.value.clone())
                });
                if let Some(value) = prefill {
                    self.enter_cmd_mode(CMDMode::FilterValue, &value);
                }
            }
            Message::Delete => {
                let column = self.dialog.as_ref().and_then(|view| {
                    (view.cursor.focus == DialogFocus::Active)
                        .then(|| view.dialog.active.get(view.cursor.active))
                        .flatten()
                        .map(|entry| entry.column)
                });
                if let Some(column) = column {
                    self.dispatch_dialog(DialogAction::Remove(column));
                }
            }
            _ => (),
        }
    }

    // -------------------- Control handling functions ---------------------- //

    fn loaded(&mut self, ticket: LoadTicket, result: Result<Table, TVError>) {
        let start_time = Instant::now();
        match self.slot.finish_load(ticket, result) {
            LoadOutcome::Installed => {
                self.status = Status::READY;
                self.selected_column = 0;
                self.offset_column = 0;
                self.rebuild_dialog();
                let nrows = self.state().map(|s| s.table().nrows()).unwrap_or(0);
                info!(
                    "Installed preview with {} rows in {}ms",
                    nrows,
                    start_time.elapsed().as_millis()
                );
                self.set_status_message(format!("Loaded {nrows} rows"));
            }
            LoadOutcome::Superseded => {}
            LoadOutcome::Failed(e) => {
                self.status = Status::READY;
                self.set_status_message(format!("Loading failed: {e}"));
                if self.state().is_none() {
                    self.show_popup(format!("Could not load {:?}\n\n{e}", self.source));
                }
            }
        }
    }

    // A freshly installed table has no filters, so an open dialog is rebuilt from it.
    // Dialog and pending filter input are dropped when the new table has no columns.
    fn rebuild_dialog(&mut self) {
        let Some(mut view) = self.dialog.take() else {
            return;
        };
        let dialog = self.slot.state().map(FilterDialog::build);
        if let Some(dialog) = dialog.filter(|d| !d.entries.is_empty()) {
            view.cursor.column = view.cursor.column.min(dialog.entries.len() - 1);
            view.cursor.active = 0;
            view.cursor.focus = DialogFocus::Columns;
            view.dialog = dialog;
            self.dialog = Some(view);
            return;
        }

        debug!("Closing filter dialog, new table has no columns");
        match self.modus {
            Modus::DIALOG => self.modus = Modus::TABLE,
            Modus::CMDINPUT if self.cmd_mode == Some(CMDMode::FilterValue) => {
                self.cmd_mode = None;
                self.input.clear();
                self.last_input = self.input.get();
                self.modus = Modus::TABLE;
                self.previous_modus = Modus::DIALOG;
            }
            _ => {
                if self.previous_modus == Modus::DIALOG {
                    self.previous_modus = Modus::TABLE;
                }
            }
        }
    }

    fn ui_resize(&mut self, width: usize) {
        trace!("UI was resized! w:{}->{}", self.ui_width, width);
        self.ui_width = width;
    }

    fn exit(&mut self) {
        match self.modus {
            Modus::TABLE => {}
            Modus::POPUP => {
                trace!("Close popup ...");
                self.modus = self.previous_modus;
                self.previous_modus = Modus::POPUP;
            }
            Modus::DIALOG => self.dispatch_dialog(DialogAction::Close),
            Modus::CMDINPUT => {}
        }
    }

    fn show_popup(&mut self, message: String) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
        self.popup_message = message;
    }

    fn navigate(&mut self, target: PageTarget) {
        if let Some(state) = self.slot.state_mut() {
            state.navigate_to_page(target);
        }
    }

    fn sort_selected_column(&mut self, ascending: bool) {
        let column = self.selected_column;
        if let Some(state) = self.slot.state_mut() {
            state.sort_by(column, ascending);
            let name = state.columns().get(column).cloned().unwrap_or_default();
            self.set_status_message(format!(
                "Sorted by {} {}",
                name,
                if ascending { "ascending" } else { "descending" }
            ));
        }
    }

    fn open_dialog(&mut self) {
        let Some(state) = self.slot.state() else {
            return;
        };
        let dialog = FilterDialog::build(state);
        let mut cursor = DialogCursor {
            column: self.selected_column.min(dialog.entries.len().saturating_sub(1)),
            ..DialogCursor::default()
        };
        if let Some(entry) = dialog.entries.get(cursor.column) {
            cursor.operator = entry.operator;
        }
        trace!("Open filter dialog at column {}", cursor.column);
        self.dialog = Some(DialogView { dialog, cursor });
        self.previous_modus = self.modus;
        self.modus = Modus::DIALOG;
    }

    fn dispatch_dialog(&mut self, action: DialogAction) {
        let Some(state) = self.slot.state_mut() else {
            return;
        };
        match FilterDialog::dispatch(state, action) {
            DialogOutcome::Closed => {
                self.dialog = None;
                self.modus = Modus::TABLE;
                self.previous_modus = Modus::DIALOG;
            }
            DialogOutcome::Unchanged => {}
            DialogOutcome::Changed => {
                let dialog = FilterDialog::build(state);
                let records = state.total_records();
                if let Some(view) = self.dialog.as_mut() {
                    view.cursor.active = view
                        .cursor
                        .active
                        .min(dialog.active.len().saturating_sub(1));
                    if !dialog.has_filters() {
                        view.cursor.focus = DialogFocus::Columns;
                    }
                    view.dialog = dialog;
                }
                self.set_status_message(format!("{records} records match"));
            }
        }
    }

    fn move_dialog_cursor(&mut self, step: i64) {
        if let Some(view) = self.dialog.as_mut() {
            let cursor = &mut view.cursor;
            match cursor.focus {
                DialogFocus::Columns => {
                    let len = view.dialog.entries.len();
                    cursor.column = step_index(cursor.column, step, len);
                    if let Some(entry) = view.dialog.entries.get(cursor.column) {
                        cursor.operator = entry.operator;
                    }
                }
                DialogFocus::Active => {
                    let len = view.dialog.active.len();
                    cursor.active = step_index(cursor.active, step, len);
                }
            }
        }
    }

    fn raw_input(&mut self, key: KeyEvent) {
        self.last_input = self.input.read(key);
        if self.last_input.finished {
            self.handle_cmd_input();
        }
    }

    fn enter_cmd_mode(&mut self, mode: CMDMode, prefill: &str) {
        trace!("Entering command mode {:?} ...", mode);
        self.previous_modus = self.modus;
        self.modus = Modus::CMDINPUT;
        self.cmd_mode = Some(mode);

        self.input.clear();
        self.input.set(prefill);
        self.last_input = self.input.get();
    }

    fn handle_cmd_input(&mut self) {
        trace!("Handle cmd input {:?}", self.last_input);

        self.modus = self.previous_modus;
        self.previous_modus = Modus::CMDINPUT;

        let cmd_mode = self.cmd_mode.take();
        if self.last_input.canceled {
            return;
        }

        let cmd_input = self.last_input.input.clone();
        match cmd_mode {
            Some(CMDMode::Search) => {
                if let Some(state) = self.slot.state_mut() {
                    let start_time = Instant::now();
                    state.search_table(&cmd_input);
                    let records = state.total_records();
                    debug!(
                        "Search for \"{}\" found {} rows in {}ms",
                        cmd_input,
                        records,
                        start_time.elapsed().as_millis()
                    );
                    self.set_status_message(format!("Found {records} records"));
                }
            }
            Some(CMDMode::GotoPage) => match cmd_input.parse::<PageTarget>() {
                Ok(target) => self.navigate(target),
                Err(e) => {
                    warn!("Invalid page input: {e}");
                    self.set_status_message(e.to_string());
                }
            },
            Some(CMDMode::FilterValue) => {
                if let Some(view) = self.dialog.as_ref() {
                    let action = DialogAction::Apply {
                        column: view.cursor.column,
                        operator: view.cursor.operator,
                        value: cmd_input,
                    };
                    self.dispatch_dialog(action);
                }
            }
            None => {
                info!("Cmd mode is none!")
            }
        }
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    fn calculate_column_width(name: &str, data: &[String], max_column_width: usize) -> usize {
        let content = data
            .iter()
            .map(|s| s.chars().count())
            .chain(std::iter::once(name.chars().count()))
            .max()
            .unwrap_or(0);
        std::cmp::min(content + COLUMN_WIDTH_MARGIN, max_column_width).max(1)
    }

    fn get_visible_name(name: &str, width: usize) -> String {
        if width < 3 {
            return String::new();
        }
        if name.chars().count() > width {
            let mut reduced: String = name.chars().take(width - 3).collect();
            reduced.push_str("...");
            reduced
        } else {
            name.to_string()
        }
    }

    fn update_uidata(&mut self) {
        let popup = (self.modus == Modus::POPUP).then(|| self.popup_message.clone());
        let cmdinput = match (self.modus, self.cmd_mode) {
            (Modus::CMDINPUT, Some(mode)) => Some((mode, self.last_input.clone())),
            _ => None,
        };
        let loading = self.status == Status::LOADING;

        let Some(state) = self.slot.state() else {
            self.uidata = UIData {
                name: self.source.to_string_lossy().to_string(),
                records: "0 records".to_string(),
                page: 1,
                total_pages: 1,
                popup,
                cmdinput,
                status_message: self.status_message.clone(),
                loading,
                ..UIData::default()
            };
            return;
        };

        let page_rows: Vec<&[String]> = state.page_rows().collect();
        let offset = state.page_offset();
        let index_data: Vec<String> = state.filtered_rows()
            [offset..offset + page_rows.len()]
            .iter()
            .map(|idx| (idx + 1).to_string())
            .collect();
        let index = ColumnView {
            name: "#".to_string(),
            width: index_data.iter().map(|s| s.len()).max().unwrap_or(1),
            data: index_data,
        };

        // Build all column views of the current page, then keep the ones that fit.
        let all_columns: Vec<ColumnView> = state
            .columns()
            .iter()
            .enumerate()
            .map(|(cidx, name)| {
                let data: Vec<String> = page_rows
                    .iter()
                    .map(|row| row.get(cidx).cloned().unwrap_or_default())
                    .collect();
                let width = Self::calculate_column_width(name, &data, self.config.max_column_width);
                ColumnView {
                    name: Self::get_visible_name(name, width),
                    width,
                    data,
                }
            })
            .collect();

        let table_width = self.ui_width.saturating_sub(index.width + 1 + FRAME_WIDTH);
        self.selected_column = self
            .selected_column
            .min(all_columns.len().saturating_sub(1));
        self.offset_column = visible_offset(
            &all_columns.iter().map(|c| c.width + 1).collect::<Vec<_>>(),
            self.offset_column,
            self.selected_column,
            table_width,
        );

        let mut visible_width = 0;
        let columns: Vec<ColumnView> = all_columns
            .into_iter()
            .skip(self.offset_column)
            .take_while(|c| {
                let fits = visible_width == 0 || visible_width + c.width + 1 <= table_width;
                visible_width += c.width + 1;
                fits
            })
            .collect();

        let sort = state.sort().map(|order| {
            (
                state.columns().get(order.column).cloned().unwrap_or_default(),
                order.ascending,
            )
        });

        self.uidata = UIData {
            name: state.table().name.clone(),
            selected_column: (!columns.is_empty())
                .then(|| self.selected_column - self.offset_column),
            columns,
            index,
            records: crate::render::records_label(state),
            page: state.current_page(),
            total_pages: state.total_pages(),
            search_text: state.search_text().to_string(),
            nfilters: state.active_filters().len(),
            sort,
            popup,
            dialog: self.dialog.clone().filter(|_| {
                matches!(self.modus, Modus::DIALOG)
                    || (self.modus == Modus::CMDINPUT && self.previous_modus == Modus::DIALOG)
            }),
            cmdinput,
            status_message: self.status_message.clone(),
            loading,
        };
    }
}

fn step_index(current: usize, step: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as i64 + step).clamp(0, len as i64 - 1) as usize
}

/// First column to render so that `selected` is visible within `budget`.
fn visible_offset(widths: &[usize], offset: usize, selected: usize, budget: usize) -> usize {
    if selected < offset {
        return selected;
    }
    let mut offset = offset;
    while offset < selected && widths[offset..=selected].iter().sum::<usize>() > budget {
        offset += 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    fn loaded_model(rows: usize) -> Model {
        let (tx, _rx) = mpsc::channel();
        let mut model = Model::init(&TVConfig::default(), "people.csv".into(), tx, 120);
        let table = Table::new(
            vec!["Name".into(), "Age".into()],
            (0..rows)
                .map(|i| vec![format!("person{i}"), (20 + i).to_string()])
                .collect(),
        );
        let ticket = model.begin_load();
        model
            .update(Some(Message::Loaded(ticket, Ok(table))))
            .unwrap();
        model
    }

    fn type_line(model: &mut Model, s: &str) {
        for c in s.chars() {
            model
                .update(Some(Message::RawKey(KeyEvent::new(
                    KeyCode::Char(c),
                    KeyModifiers::NONE,
                ))))
                .unwrap();
        }
        model
            .update(Some(Message::RawKey(KeyEvent::new(
                KeyCode::Enter,
                KeyModifiers::NONE,
            ))))
            .unwrap();
    }

    #[test]
    fn load_fills_first_page() {
        let model = loaded_model(65);
        let ui = model.get_uidata();
        assert_eq!(model.status, Status::READY);
        assert_eq!(ui.records, "65 records");
        assert_eq!(ui.total_pages, 3);
        assert_eq!(ui.columns.len(), 2);
        assert_eq!(ui.columns[0].data.len(), 30);
        assert_eq!(ui.index.data[0], "1");
    }

    #[test]
    fn stale_load_is_ignored() {
        let (tx, _rx) = mpsc::channel();
        let mut model = Model::init(&TVConfig::default(), "a.csv".into(), tx, 80);
        let old = model.begin_load();
        let new = model.begin_load();
        let table = |name: &str| Table::new(vec!["c".into()], vec![]).with_name(name);
        model
            .update(Some(Message::Loaded(new, Ok(table("new")))))
            .unwrap();
        model
            .update(Some(Message::Loaded(old, Ok(table("old")))))
            .unwrap();
        assert_eq!(model.get_uidata().name, "new");
    }

    #[test]
    fn paging_and_search() {
        let mut model = loaded_model(65);
        model.update(Some(Message::LastPage)).unwrap();
        assert_eq!(model.get_uidata().page, 3);
        assert_eq!(model.get_uidata().index.data[0], "61");

        model.update(Some(Message::Search)).unwrap();
        assert!(model.raw_keyevents());
        type_line(&mut model, "person1");
        let ui = model.get_uidata();
        assert!(!model.raw_keyevents());
        assert_eq!(ui.page, 1);
        assert_eq!(ui.records, "11 records");
        assert_eq!(ui.search_text, "person1");
    }

    #[test]
    fn goto_page_input() {
        let mut model = loaded_model(65);
        model.update(Some(Message::GotoPage)).unwrap();
        type_line(&mut model, "99");
        assert_eq!(model.get_uidata().page, 3);
        model.update(Some(Message::GotoPage)).unwrap();
        type_line(&mut model, "soon");
        assert_eq!(model.get_uidata().page, 3);
        assert!(model.get_uidata().status_message.contains("invalid page"));
    }

    #[test]
    fn filter_dialog_round_trip() {
        let mut model = loaded_model(10);
        model.update(Some(Message::MoveRight)).unwrap();
        model.update(Some(Message::FilterDialog)).unwrap();
        assert!(model.in_dialog());
        assert_eq!(
            model.get_uidata().dialog.as_ref().unwrap().cursor.column,
            1
        );

        // Contains -> Equals -> Starts -> Ends -> Greater
        for _ in 0..4 {
            model.update(Some(Message::MoveRight)).unwrap();
        }
        model.update(Some(Message::Enter)).unwrap();
        type_line(&mut model, "26");
        assert!(model.in_dialog());
        let ui = model.get_uidata();
        assert_eq!(ui.records, "3 records");
        let view = ui.dialog.as_ref().unwrap();
        assert_eq!(view.dialog.active.len(), 1);

        model.update(Some(Message::SwitchFocus)).unwrap();
        model.update(Some(Message::Delete)).unwrap();
        let ui = model.get_uidata();
        assert_eq!(ui.records, "10 records");
        assert_eq!(
            ui.dialog.as_ref().unwrap().cursor.focus,
            DialogFocus::Columns
        );

        model.update(Some(Message::Exit)).unwrap();
        assert!(!model.in_dialog());
        assert!(model.get_uidata().dialog.is_none());
    }

    #[test]
    fn reload_while_typing_filter_value_keeps_dialog() {
        let mut model = loaded_model(10);
        model.update(Some(Message::FilterDialog)).unwrap();
        model.update(Some(Message::Enter)).unwrap();
        assert!(model.raw_keyevents());

        let people = Table::new(
            vec!["Name".into(), "Age".into()],
            vec![
                vec!["Alice".into(), "30".into()],
                vec!["Bob".into(), "25".into()],
                vec!["Carol".into(), "40".into()],
            ],
        );
        let ticket = model.begin_load();
        model
            .update(Some(Message::Loaded(ticket, Ok(people))))
            .unwrap();
        assert!(model.get_uidata().dialog.is_some());

        type_line(&mut model, "a");
        let ui = model.get_uidata();
        assert!(model.in_dialog());
        assert_eq!(ui.records, "2 records");
        assert_eq!(ui.dialog.as_ref().unwrap().dialog.active.len(), 1);
    }

    #[test]
    fn reload_without_columns_closes_dialog_input() {
        let mut model = loaded_model(10);
        model.update(Some(Message::FilterDialog)).unwrap();
        model.update(Some(Message::Enter)).unwrap();

        let ticket = model.begin_load();
        model
            .update(Some(Message::Loaded(ticket, Ok(Table::new(vec![], vec![])))))
            .unwrap();
        assert!(!model.raw_keyevents());
        assert!(!model.in_dialog());
        assert!(model.get_uidata().dialog.is_none());
        assert!(model.get_uidata().cmdinput.is_none());
    }

    #[test]
    fn offset_keeps_selection_visible() {
        let widths = vec![10, 10, 10, 10];
        assert_eq!(visible_offset(&widths, 0, 1, 25), 0);
        assert_eq!(visible_offset(&widths, 0, 3, 25), 2);
        assert_eq!(visible_offset(&widths, 3, 1, 25), 1);
    }

    #[test]
    fn long_names_are_shortened() {
        assert_eq!(Model::get_visible_name("Temperature", 8), "Tempe...");
        assert_eq!(Model::get_visible_name("Age", 8), "Age");
        assert_eq!(Model::get_visible_name("Age", 2), "");
    }
}
