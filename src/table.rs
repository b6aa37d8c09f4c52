use std::borrow::Cow;
use std::fmt::Write as _;

/// Renders rows as left-aligned columns separated by two spaces, with a
/// dashed rule under the header.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|h| h.chars().count().max(3))
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(sanitize_cell(cell).chars().count());
        }
    }

    let mut output = String::new();
    let header_cells = headers.iter().map(|h| Cow::Borrowed(*h)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&header_cells, &widths));
    let rule = widths.iter().map(|w| Cow::Owned("-".repeat(*w))).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths));
    for row in rows {
        let cells = row.iter().map(|cell| sanitize_cell(cell)).collect::<Vec<_>>();
        let _ = writeln!(output, "{}", format_row(&cells, &widths));
    }
    output
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(cells: &[Cow<'_, str>], widths: &[usize]) -> String {
    let mut line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    line.truncate(line.trim_end().len());
    line
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_padded_to_widest_cell() {
        let rendered = render_table(
            &["table", "column"],
            &[
                vec!["orders.csv".to_string(), "id".to_string()],
                vec!["a.csv".to_string(), "amount".to_string()],
            ],
        );
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "table       column");
        assert_eq!(lines[1], "----------  ------");
        assert_eq!(lines[2], "orders.csv  id");
        assert_eq!(lines[3], "a.csv       amount");
    }

    #[test]
    fn control_characters_are_flattened() {
        let rendered = render_table(&["details"], &[vec!["a\nb".to_string()]]);
        assert!(rendered.lines().any(|line| line == "a b"));
    }
}
