use rayon::prelude::*;
use std::time::Instant;
use tracing::trace;

use crate::filter::{FilterSpec, row_matches_filters};
use crate::table::Table;

/// True if any cell of the row contains `needle`. `needle` must already be lowercase.
pub fn row_matches_search(row: &[String], needle: &str) -> bool {
    needle.is_empty() || row.iter().any(|cell| cell.to_lowercase().contains(needle))
}

/// Indices of all rows passing the active filters and the search text, in table order.
///
/// Filters combine with AND, the search text matches if any single cell contains it.
pub fn filter_rows(table: &Table, active_filters: &FilterSpec, search_text: &str) -> Vec<usize> {
    let start_time = Instant::now();
    let needle = search_text.to_lowercase();

    let matches: Vec<usize> = table
        .rows
        .par_iter()
        .enumerate()
        .filter(|(_, row)| {
            row_matches_filters(row, active_filters) && row_matches_search(row, &needle)
        })
        .map(|(idx, _)| idx)
        .collect();

    trace!(
        "Filtering {} rows with {} filters and search \"{}\" kept {} rows in {}ms",
        table.nrows(),
        active_filters.len(),
        search_text,
        matches.len(),
        start_time.elapsed().as_millis()
    );
    matches
}
