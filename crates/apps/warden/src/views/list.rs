//! Table rendering for the list panels

use admin::SelectionSet;
use admin::list::{ListRow, ListView};

/// Render a list as a plain-text table. Ticked rows are marked with `*`
/// when the panel supports selection.
pub fn render_table(view: &ListView, selection: Option<&SelectionSet>) -> String {
    let mut lines = Vec::new();
    if let Some(status) = &view.status {
        lines.push(status.clone());
    }

    let mut widths: Vec<usize> = view.columns.iter().map(|c| c.chars().count()).collect();
    for row in &view.rows {
        if let ListRow::Item { cells, .. } = row {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let format_row = |mark: &str, cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        format!("{} {}", mark, padded.join("  ")).trim_end().to_string()
    };

    let header: Vec<String> = view.columns.iter().map(|c| c.to_string()).collect();
    lines.push(format_row(" ", &header));

    for row in &view.rows {
        match row {
            ListRow::Item { id, cells } => {
                let mark = match selection {
                    Some(sel) if sel.contains(*id) => "*",
                    _ => " ",
                };
                lines.push(format_row(mark, cells));
            }
            ListRow::Message(message) => lines.push(format!("  {}", message)),
        }
    }

    let mut footer = view.summary.clone();
    if let Some(pager) = &view.pagination {
        footer.push_str(&format!(
            "  第 {}/{} 页{}{}",
            pager.page,
            pager.total_pages,
            if pager.prev_enabled { "  [prev]" } else { "" },
            if pager.next_enabled { "  [next]" } else { "" },
        ));
    }
    if let Some(sel) = selection.filter(|s| !s.is_empty()) {
        footer.push_str(&format!("  已选 {}", sel.len()));
    }
    lines.push(footer);
    lines.join("\n")
}
