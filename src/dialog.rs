use tracing::{debug, trace};

use crate::filter::{ColumnFilter, FilterOperator};
use crate::state::TableState;

/// One row of the filter dialog: a column with its operator choice and value input.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnEntry {
    pub column: usize,
    pub name: String,
    pub operators: &'static [FilterOperator],
    pub operator: FilterOperator,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFilterEntry {
    pub column: usize,
    pub name: String,
    pub filter: ColumnFilter,
}

impl ActiveFilterEntry {
    pub fn describe(&self) -> String {
        format!(
            "{} {} \"{}\"",
            self.name,
            self.filter.operator.label().to_lowercase(),
            self.filter.value
        )
    }
}

/// Snapshot of everything the filter dialog shows.
///
/// It is built fresh from the session every time the dialog opens or an
/// action was dispatched and never updated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDialog {
    pub entries: Vec<ColumnEntry>,
    pub active: Vec<ActiveFilterEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogAction {
    Apply {
        column: usize,
        operator: FilterOperator,
        value: String,
    },
    Remove(usize),
    ClearAll,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DialogOutcome {
    /// The dialog stays open and has to be rebuilt.
    Changed,
    /// Nothing happened, e.g. an empty value was applied.
    Unchanged,
    Closed,
}

impl FilterDialog {
    pub fn build(state: &TableState) -> Self {
        let filters = state.active_filters();
        let entries = state
            .columns()
            .iter()
            .enumerate()
            .map(|(column, name)| {
                let current = filters.get(column);
                ColumnEntry {
                    column,
                    name: name.clone(),
                    operators: &FilterOperator::ALL,
                    operator: current
                        .map(|f| f.operator)
                        .unwrap_or(FilterOperator::Contains),
                    value: current.map(|f| f.value.clone()).unwrap_or_default(),
                }
            })
            .collect();
        let active = filters
            .iter()
            .map(|(column, filter)| ActiveFilterEntry {
                column,
                name: state
                    .columns()
                    .get(column)
                    .cloned()
                    .unwrap_or_else(|| format!("#{column}")),
                filter: filter.clone(),
            })
            .collect();
        trace!("Built filter dialog for {} columns", state.columns().len());
        FilterDialog { entries, active }
    }

    pub fn has_filters(&self) -> bool {
        !self.active.is_empty()
    }

    /// Line shown in place of the active filter list when there is none.
    pub fn status_line(&self) -> String {
        match self.active.len() {
            0 => "No filters applied".to_string(),
            1 => "1 filter applied".to_string(),
            n => format!("{n} filters applied"),
        }
    }

    pub fn dispatch(state: &mut TableState, action: DialogAction) -> DialogOutcome {
        debug!("Filter dialog action {:?}", action);
        match action {
            DialogAction::Apply {
                column,
                operator,
                value,
            } => {
                if state.apply_filter(column, operator, &value) {
                    DialogOutcome::Changed
                } else {
                    DialogOutcome::Unchanged
                }
            }
            DialogAction::Remove(column) => {
                if state.remove_filter(column) {
                    DialogOutcome::Changed
                } else {
                    DialogOutcome::Unchanged
                }
            }
            DialogAction::ClearAll => {
                if state.active_filters().is_empty() {
                    DialogOutcome::Unchanged
                } else {
                    state.clear_filters();
                    DialogOutcome::Changed
                }
            }
            DialogAction::Close => DialogOutcome::Closed,
        }
    }
}
