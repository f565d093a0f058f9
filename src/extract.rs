use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, trace};

use crate::domain::TVError;
use crate::table::Table;

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("static selector 'table'"));
static HEADER_ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("thead tr").expect("static selector 'thead tr'"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("static selector 'tr'"));
static BODY_ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody tr").expect("static selector 'tbody tr'"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th, td").expect("static selector 'th, td'"));
static TH_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("static selector 'th'"));

/// Reads the first `<table>` of an HTML fragment into the row model.
///
/// Header names come from the first `<thead>` row. Without a `<thead>`, a
/// leading row made only of `<th>` cells is used as the header instead. Body
/// rows are the `<tbody>` rows, or all remaining rows if there is no
/// `<tbody>`. Nested tables are not looked into. A table without any header
/// gets the names `Column 1`, `Column 2`, ... for its widest row.
pub fn extract_table(html: &str) -> Result<Table, TVError> {
    let document = Html::parse_fragment(html);
    let table = document
        .select(&TABLE_SELECTOR)
        .next()
        .ok_or(TVError::NoTable)?;

    let head_rows = own_rows(table, &HEADER_ROW_SELECTOR);
    let mut body_rows = own_rows(table, &BODY_ROW_SELECTOR);

    let columns = if let Some(head) = head_rows.first() {
        cell_texts(*head)
    } else {
        // The parser wraps bare rows into an implied <tbody>, so the header
        // row usually shows up among the body rows here.
        if body_rows.is_empty() {
            body_rows = own_rows(table, &ROW_SELECTOR);
        }
        match body_rows.first().copied() {
            Some(first) if is_header_row(first) => {
                body_rows.retain(|row| row.id() != first.id());
                cell_texts(first)
            }
            _ => Vec::new(),
        }
    };

    if head_rows.is_empty() && body_rows.is_empty() {
        trace!("Table has neither header nor body rows");
    }

    let rows: Vec<Vec<String>> = body_rows.into_iter().map(cell_texts).collect();
    let columns = if columns.is_empty() {
        positional_columns(&rows)
    } else {
        columns
    };
    debug!(
        "Extracted table with {} columns and {} rows",
        columns.len(),
        rows.len()
    );
    Ok(Table::new(columns, rows))
}

fn positional_columns(rows: &[Vec<String>]) -> Vec<String> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    (1..=width).map(|n| format!("Column {n}")).collect()
}

// Rows of nested tables are skipped.
fn own_rows<'a>(table: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    table
        .select(selector)
        .filter(|row| owning_table(*row).map(|t| t.id()) == Some(table.id()))
        .collect()
}

fn cell_texts(row: ElementRef) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| CELL_SELECTOR.matches(cell))
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}

fn is_header_row(row: ElementRef) -> bool {
    let mut cells = row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| CELL_SELECTOR.matches(cell))
        .peekable();
    cells.peek().is_some() && cells.all(|cell| TH_SELECTOR.matches(&cell))
}

fn owning_table(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: &str = r#"
        <div class="preview">
          <table class="table">
            <thead><tr><th> Name </th><th>Age</th></tr></thead>
            <tbody>
              <tr><td>Alice</td><td> 30 </td></tr>
              <tr><td>Bob</td><td>25</td></tr>
              <tr><td>Carol</td></tr>
            </tbody>
          </table>
        </div>"#;

    #[test]
    fn reads_header_and_body() {
        let table = extract_table(PEOPLE).unwrap();
        assert_eq!(table.columns, vec!["Name", "Age"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["Alice", "30"]);
        assert_eq!(table.rows[2], vec!["Carol"]);
        assert_eq!(table.cell(2, 1), "");
    }

    #[test]
    fn extraction_is_idempotent() {
        assert_eq!(extract_table(PEOPLE).unwrap(), extract_table(PEOPLE).unwrap());
    }

    #[test]
    fn empty_body_yields_no_rows() {
        let table =
            extract_table("<table><thead><tr><th>A</th></tr></thead><tbody></tbody></table>")
                .unwrap();
        assert_eq!(table.columns, vec!["A"]);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn header_row_without_thead() {
        let table = extract_table(
            "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>",
        )
        .unwrap();
        assert_eq!(table.columns, vec!["A", "B"]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn headerless_table_gets_positional_names() {
        let table = extract_table(
            "<table><tr><td>Alice</td><td>30</td></tr><tr><td>Bob</td><td>25</td><td>x</td></tr></table>",
        )
        .unwrap();
        assert_eq!(table.columns, vec!["Column 1", "Column 2", "Column 3"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(0, 2), "");

        let mut state = crate::state::TableState::new(table);
        assert!(state.apply_filter(1, crate::filter::FilterOperator::Less, "28"));
        assert_eq!(state.filtered_rows(), &[1]);
    }

    #[test]
    fn empty_table_has_no_columns() {
        let table = extract_table("<table></table>").unwrap();
        assert!(table.columns.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn nested_tables_are_ignored() {
        let table = extract_table(
            "<table><thead><tr><th>Outer</th></tr></thead><tbody>\
             <tr><td>x<table><tbody><tr><td>inner</td></tr></tbody></table></td></tr>\
             </tbody></table>",
        )
        .unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn missing_table_is_an_error() {
        assert!(matches!(
            extract_table("<p>nothing here</p>"),
            Err(TVError::NoTable)
        ));
    }
}
