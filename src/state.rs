use std::sync::Arc;
use tracing::{debug, warn};

use crate::filter::{ColumnFilter, FilterOperator, FilterSpec};
use crate::pagination::{PageTarget, Pager};
use crate::search::filter_rows;
use crate::sort::{SortOrder, sort_rows};
use crate::table::Table;

/// State of one open preview: the immutable row model plus everything the
/// user narrowed it down with.
///
/// `filtered_rows` holds indices into the table rows and is recomputed
/// whenever the search text, the filters or the sort order change. Paging
/// only re-slices it.
#[derive(Debug, Clone)]
pub struct TableState {
    table: Arc<Table>,
    filtered_rows: Arc<Vec<usize>>,
    search_text: String,
    active_filters: FilterSpec,
    sort: Option<SortOrder>,
    pager: Pager,
}

impl TableState {
    pub fn new(table: Table) -> Self {
        Self::from_shared(Arc::new(table))
    }

    pub fn from_shared(table: Arc<Table>) -> Self {
        let filtered_rows = Arc::new((0..table.nrows()).collect());
        Self {
            table,
            filtered_rows,
            search_text: String::new(),
            active_filters: FilterSpec::new(),
            sort: None,
            pager: Pager::default(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.table.columns
    }

    pub fn filtered_rows(&self) -> &[usize] {
        &self.filtered_rows
    }

    /// Cells of the filtered rows, in display order.
    pub fn filtered_values(&self) -> Vec<&[String]> {
        self.filtered_rows
            .iter()
            .map(|&idx| self.table.rows[idx].as_slice())
            .collect()
    }

    pub fn total_records(&self) -> usize {
        self.filtered_rows.len()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn active_filters(&self) -> &FilterSpec {
        &self.active_filters
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    pub fn current_page(&self) -> usize {
        self.pager.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.filtered_rows.len())
    }

    pub fn search_table(&mut self, search_text: &str) {
        self.search_text = search_text.to_string();
        self.refresh();
    }

    /// Adds or replaces the filter of a column. Blank values are ignored.
    /// Returns whether the filters changed.
    pub fn apply_filter(&mut self, column: usize, operator: FilterOperator, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            debug!("Ignoring empty filter for column {column}");
            return false;
        }
        if column >= self.table.ncolumns() {
            warn!(
                "Ignoring filter for column {column}, table has {} columns",
                self.table.ncolumns()
            );
            return false;
        }
        self.active_filters
            .set(column, ColumnFilter::new(operator, value));
        self.refresh();
        true
    }

    pub fn remove_filter(&mut self, column: usize) -> bool {
        if self.active_filters.remove(column).is_some() {
            self.refresh();
            true
        } else {
            false
        }
    }

    /// Drops every filter; the search text stays active.
    pub fn clear_filters(&mut self) {
        self.active_filters.clear();
        self.refresh();
    }

    pub fn sort_by(&mut self, column: usize, ascending: bool) {
        if column >= self.table.ncolumns() {
            warn!("Cannot sort by unknown column {column}");
            return;
        }
        self.sort = Some(SortOrder { column, ascending });
        self.refresh();
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.refresh();
    }

    pub fn navigate_to_page(&mut self, target: PageTarget) -> usize {
        let page = self.pager.navigate(target, self.filtered_rows.len());
        debug!("Showing page {}/{}", page, self.total_pages());
        page
    }

    /// Rows visible on the current page.
    pub fn page_rows(&self) -> impl Iterator<Item = &[String]> {
        self.filtered_rows[self.pager.page_range(self.filtered_rows.len())]
            .iter()
            .map(|&idx| self.table.rows[idx].as_slice())
    }

    /// Position in `filtered_rows` of the first row on the current page.
    pub fn page_offset(&self) -> usize {
        self.pager.page_range(self.filtered_rows.len()).start
    }

    fn refresh(&mut self) {
        let mut rows = filter_rows(&self.table, &self.active_filters, &self.search_text);
        if let Some(order) = self.sort {
            sort_rows(&self.table, &mut rows, order);
        }
        self.filtered_rows = Arc::new(rows);
        self.pager.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> TableState {
        TableState::new(Table::new(
            vec!["Name".into(), "Age".into()],
            vec![
                vec!["Alice".into(), "30".into()],
                vec!["Bob".into(), "25".into()],
                vec!["Carol".into(), "40".into()],
            ],
        ))
    }

    #[test]
    fn page_offset_points_into_filtered_rows() {
        let mut state = TableState::new(Table::new(
            vec!["Id".into()],
            (0..100).map(|i| vec![i.to_string()]).collect(),
        ));
        state.apply_filter(0, FilterOperator::Ends, "5");
        state.navigate_to_page(PageTarget::Last);
        assert_eq!(state.total_records(), 10);
        assert_eq!(state.page_offset(), 0);

        state.clear_filters();
        state.apply_filter(0, FilterOperator::Greater, "9");
        state.navigate_to_page(PageTarget::Number(2));
        let offset = state.page_offset();
        assert_eq!(offset, 30);
        let first = state.page_rows().next().unwrap();
        assert_eq!(first[0], "40");
        assert_eq!(state.filtered_rows()[offset], 40);
    }

    #[test]
    fn blank_filter_is_ignored() {
        let mut state = people();
        assert!(!state.apply_filter(0, FilterOperator::Contains, "   "));
        assert!(state.active_filters().is_empty());
        assert_eq!(state.total_records(), 3);
    }

    #[test]
    fn filter_on_unknown_column_is_ignored() {
        let mut state = people();
        assert!(!state.apply_filter(7, FilterOperator::Contains, "a"));
        assert!(state.active_filters().is_empty());
    }

    #[test]
    fn filtering_resets_page() {
        let rows = (0..65).map(|i| vec![i.to_string()]).collect();
        let mut state = TableState::new(Table::new(vec!["n".into()], rows));
        state.navigate_to_page(PageTarget::Last);
        assert_eq!(state.current_page(), 3);
        state.apply_filter(0, FilterOperator::Less, "50");
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.total_pages(), 2);
    }

    #[test]
    fn removing_last_filter_shows_everything() {
        let mut state = people();
        state.apply_filter(1, FilterOperator::Greater, "28");
        assert_eq!(state.total_records(), 2);
        assert!(state.remove_filter(1));
        assert!(!state.remove_filter(1));
        assert!(state.active_filters().is_empty());
        assert_eq!(state.total_records(), 3);
    }

    #[test]
    fn sort_survives_refiltering() {
        let mut state = people();
        state.sort_by(1, false);
        assert_eq!(state.filtered_rows(), &[2, 0, 1]);
        state.search_table("o");
        assert_eq!(state.filtered_rows(), &[2, 1]);
        state.clear_sort();
        assert_eq!(state.filtered_rows(), &[1, 2]);
    }

    #[test]
    fn page_rows_follow_current_page() {
        let rows = (0..65).map(|i| vec![i.to_string()]).collect();
        let mut state = TableState::new(Table::new(vec!["n".into()], rows));
        state.navigate_to_page(PageTarget::Number(3));
        let page: Vec<&[String]> = state.page_rows().collect();
        assert_eq!(page.len(), 5);
        assert_eq!(page[0][0], "60");
        assert_eq!(state.page_offset(), 60);
    }
}
