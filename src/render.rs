use html_escape::{encode_double_quoted_attribute, encode_safe};
use std::fmt::Write;

use crate::state::TableState;

pub const NO_DATA_TEXT: &str = "No data";

pub fn records_label(state: &TableState) -> String {
    format!("{} records", state.total_records())
}

pub fn render_thead(state: &TableState) -> String {
    let mut out = String::from("<thead><tr>");
    for name in state.columns() {
        let _ = write!(out, "<th>{}</th>", encode_safe(name));
    }
    out.push_str("</tr></thead>");
    out
}

/// Renders the rows of the current page as a complete `<tbody>`.
///
/// Each row gets one cell per column, missing trailing cells are left empty.
/// Without any filtered rows a single placeholder row spanning all columns is
/// emitted instead.
pub fn render_tbody(state: &TableState) -> String {
    let ncolumns = state.columns().len();
    let mut out = String::from("<tbody>");

    if state.total_records() == 0 {
        let _ = write!(
            out,
            "<tr><td colspan=\"{}\" class=\"no-data\">{}</td></tr>",
            std::cmp::max(1, ncolumns),
            NO_DATA_TEXT
        );
    } else {
        for row in state.page_rows() {
            out.push_str("<tr>");
            for column in 0..std::cmp::max(ncolumns, row.len()) {
                let value = row.get(column).map(String::as_str).unwrap_or("");
                let _ = write!(out, "<td>{}</td>", encode_safe(value));
            }
            out.push_str("</tr>");
        }
    }

    out.push_str("</tbody>");
    out
}

/// Records label plus the current / total page inputs.
pub fn render_controls(state: &TableState) -> String {
    let total_pages = state.total_pages();
    format!(
        concat!(
            "<div class=\"table-controls\">",
            "<span class=\"records\">{}</span>",
            "<div class=\"pagination\">",
            "<input type=\"number\" class=\"current-page\" min=\"1\" max=\"{}\" value=\"{}\">",
            " / ",
            "<input type=\"number\" class=\"total-pages\" value=\"{}\" readonly>",
            "</div>",
            "<input type=\"search\" class=\"table-search\" value=\"{}\">",
            "</div>"
        ),
        records_label(state),
        total_pages,
        state.current_page(),
        total_pages,
        encode_double_quoted_attribute(state.search_text()),
    )
}

pub fn render_preview(state: &TableState) -> String {
    format!(
        "<div class=\"table-preview\">{}<table class=\"table\">{}{}</table></div>",
        render_controls(state),
        render_thead(state),
        render_tbody(state)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterOperator;
    use crate::table::Table;

    fn state() -> TableState {
        TableState::new(Table::new(
            vec!["Name".into(), "Note".into()],
            vec![
                vec!["Alice".into(), "<b>&".into()],
                vec!["Bob".into()],
            ],
        ))
    }

    #[test]
    fn rows_are_escaped_and_padded() {
        let html = render_tbody(&state());
        assert_eq!(
            html,
            "<tbody><tr><td>Alice</td><td>&lt;b&gt;&amp;</td></tr>\
             <tr><td>Bob</td><td></td></tr></tbody>"
        );
    }

    #[test]
    fn empty_result_renders_placeholder() {
        let mut state = state();
        state.apply_filter(0, FilterOperator::Equals, "nobody");
        assert_eq!(
            render_tbody(&state),
            "<tbody><tr><td colspan=\"2\" class=\"no-data\">No data</td></tr></tbody>"
        );
    }

    #[test]
    fn placeholder_spans_at_least_one_column() {
        let state = TableState::new(Table::default());
        assert!(render_tbody(&state).contains("colspan=\"1\""));
    }

    #[test]
    fn controls_show_records_and_pages() {
        let mut state = state();
        state.search_table("\"bo");
        let html = render_controls(&state);
        assert!(html.contains("<span class=\"records\">0 records</span>"));
        assert!(html.contains("class=\"current-page\" min=\"1\" max=\"1\" value=\"1\""));
        assert!(html.contains("value=\"&quot;bo\""));
    }

    #[test]
    fn preview_contains_header() {
        let html = render_preview(&state());
        assert!(html.contains("<thead><tr><th>Name</th><th>Note</th></tr></thead>"));
        assert!(html.contains("2 records"));
    }
}
