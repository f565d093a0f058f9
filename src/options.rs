use tracing::warn;

use crate::domain::TVError;
use crate::filter::parse_filter_arg;
use crate::pagination::PageTarget;
use crate::state::TableState;

/// View options given on the command line for `--print`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewOptions {
    pub filters: Vec<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl PreviewOptions {
    // Page selection comes last since every other option resets to the first page.
    pub fn apply(&self, state: &mut TableState) -> Result<(), TVError> {
        for arg in self.filters.iter() {
            let (column, filter) = parse_filter_arg(arg)?;
            let column = state.table().column_index(&column)?;
            if !state.apply_filter(column, filter.operator, &filter.value) {
                warn!("Ignored filter \"{arg}\"");
            }
        }
        if let Some(search) = &self.search {
            state.search_table(search);
        }
        if let Some(sort) = &self.sort {
            let (column, ascending) = parse_sort_arg(sort);
            let column = state.table().column_index(column)?;
            state.sort_by(column, ascending);
        }
        if let Some(page) = &self.page {
            state.navigate_to_page(page.parse::<PageTarget>()?);
        }
        Ok(())
    }
}

/// Splits `COLUMN[:asc|:desc]` into the column key and the direction.
/// Anything after a colon that is not a direction stays part of the column.
pub fn parse_sort_arg(arg: &str) -> (&str, bool) {
    match arg.rsplit_once(':') {
        Some((column, dir)) if dir.eq_ignore_ascii_case("desc") => (column, false),
        Some((column, dir)) if dir.eq_ignore_ascii_case("asc") => (column, true),
        _ => (arg, true),
    }
}
