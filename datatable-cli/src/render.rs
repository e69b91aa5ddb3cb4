//! Plain-text rendering of a table snapshot.

use datatable_lib::TableSnapshot;
use serde_json::Value;

const CELL_WIDTH: usize = 18;

fn pad(text: &str) -> String {
    let mut cell: String = text.chars().take(CELL_WIDTH).collect();
    let len = cell.chars().count();
    cell.extend(std::iter::repeat_n(' ', CELL_WIDTH - len));
    cell
}

/// Renders the snapshot as a text table with a pager line.
pub fn render(snapshot: &TableSnapshot<Value>) -> String {
    let mut out = String::new();

    let filters: Vec<String> = snapshot
        .filters
        .iter()
        .map(|f| match f.selected_option() {
            Some(option) => format!("{}={}", f.key, option.label(true)),
            None => format!("{}=*", f.key),
        })
        .collect();
    out.push_str(&format!(
        "search: {:?}  filters: [{}]\n",
        snapshot.search,
        filters.join(", ")
    ));

    if let Some(message) = snapshot.error() {
        out.push_str(&format!("! {message}\n"));
    }
    if snapshot.show_empty() {
        out.push_str(&format!("  {}\n", snapshot.empty_message));
        return out;
    }

    let mut header = String::from("    ");
    for column in &snapshot.headers {
        header.push_str(&pad(&column.name));
    }
    header.push_str("actions");
    out.push_str(header.trim_end());
    out.push('\n');

    for (index, _) in snapshot.rows.iter().enumerate() {
        let mark = if snapshot.is_row_selected(index) {
            "[x] "
        } else {
            "[ ] "
        };
        let mut line = String::from(mark);
        for col in 0..snapshot.headers.len() {
            line.push_str(&pad(&snapshot.cell(index, col).unwrap_or_default()));
        }
        if let Some(actions) = snapshot.visible_actions.get(index) {
            line.push_str(&actions.join(","));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let p = &snapshot.pagination;
    let pager: Vec<String> = p
        .range
        .iter()
        .map(|n| {
            if *n == p.page {
                format!("[{n}]")
            } else {
                n.to_string()
            }
        })
        .collect();
    out.push_str(&format!(
        "showing {}-{} of {}  pages: {}\n",
        p.first_item(),
        p.last_item(),
        p.total,
        pager.join(" ")
    ));
    out
}
