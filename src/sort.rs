use std::cmp::{Ordering, Reverse};

use crate::filter::parse_number;
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: usize,
    pub ascending: bool,
}

// A column counts as numeric if it has at least one value and all of its non-empty values parse.
// "NaN" parses here but not in the comparator, so those cells land after the numbers.
fn is_numeric_column(table: &Table, column: usize) -> bool {
    let mut values = (0..table.nrows())
        .map(|row| table.cell(row, column).trim())
        .filter(|v| !v.is_empty())
        .peekable();
    values.peek().is_some() && values.all(|v| v.parse::<f64>().is_ok())
}

/// Stable sort of row indices by one column.
pub fn sort_rows(table: &Table, rows: &mut [usize], order: SortOrder) {
    let column = order.column;
    if is_numeric_column(table, column) {
        // Valid numbers come first in both directions, empty and NaN cells last.
        rows.sort_by(|&a, &b| {
            match (
                parse_number(table.cell(a, column)),
                parse_number(table.cell(b, column)),
            ) {
                (Some(a_float), Some(b_float)) => {
                    let ord = a_float.total_cmp(&b_float);
                    if order.ascending { ord } else { ord.reverse() }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    } else if order.ascending {
        rows.sort_by_cached_key(|&r| table.cell(r, column).to_lowercase());
    } else {
        rows.sort_by_cached_key(|&r| Reverse(table.cell(r, column).to_lowercase()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(values: &[&str]) -> Table {
        Table::new(
            vec!["v".into(), "id".into()],
            values
                .iter()
                .enumerate()
                .map(|(i, v)| vec![v.to_string(), i.to_string()])
                .collect(),
        )
    }

    #[test]
    fn numeric_columns_sort_by_value() {
        let t = table(&["10", "9", "", "100"]);
        let mut rows = vec![0, 1, 2, 3];
        sort_rows(&t, &mut rows, SortOrder { column: 0, ascending: true });
        assert_eq!(rows, vec![1, 0, 3, 2]);
        sort_rows(&t, &mut rows, SortOrder { column: 0, ascending: false });
        assert_eq!(rows, vec![3, 0, 1, 2]);
    }

    #[test]
    fn nan_cells_sort_after_numbers() {
        let values: Vec<String> = (0..200)
            .map(|i| {
                if i % 3 == 0 {
                    "NaN".to_string()
                } else {
                    ((i * 37) % 101).to_string()
                }
            })
            .collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let t = table(&refs);

        for ascending in [true, false] {
            let mut rows: Vec<usize> = (0..200).collect();
            sort_rows(&t, &mut rows, SortOrder { column: 0, ascending });
            let cells: Vec<&str> = rows.iter().map(|&r| t.cell(r, 0)).collect();

            let first_nan = cells.iter().position(|c| *c == "NaN").unwrap();
            assert!(cells[first_nan..].iter().all(|c| *c == "NaN"));
            let numbers: Vec<f64> = cells[..first_nan]
                .iter()
                .map(|c| c.parse::<f64>().unwrap())
                .collect();
            if ascending {
                assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
            } else {
                assert!(numbers.windows(2).all(|w| w[0] >= w[1]));
            }
        }
    }

    #[test]
    fn text_columns_sort_case_insensitive_and_stable() {
        let t = table(&["b", "A", "a", "C"]);
        let mut rows = vec![0, 1, 2, 3];
        sort_rows(&t, &mut rows, SortOrder { column: 0, ascending: true });
        assert_eq!(rows, vec![1, 2, 0, 3]);
        let mut rows = vec![0, 1, 2, 3];
        sort_rows(&t, &mut rows, SortOrder { column: 0, ascending: false });
        assert_eq!(rows, vec![3, 0, 1, 2]);
    }
}
