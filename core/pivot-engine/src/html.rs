//! FILENAME: core/pivot-engine/src/html.rs
//! PURPOSE: Emits a rendered pivot table as HTML table markup.
//! CONTEXT: Header rows go in <thead>, body rows in <tbody>. Descriptions
//! become `title` attributes; conditionally formatted values get inline colours.

use crate::view::{PivotTableCell, PivotTableView};

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn title_attr(description: Option<&str>) -> String {
    match description {
        Some(d) if !d.is_empty() => format!(" title=\"{}\"", escape_html(d)),
        _ => String::new(),
    }
}

fn cell_markup(cell: &PivotTableCell) -> String {
    let text = escape_html(&cell.text());
    let title = title_attr(cell.description());

    match cell {
        PivotTableCell::RowNumberCorner => String::from("<th class=\"pivot-row-number\"></th>"),
        PivotTableCell::RowNumber { .. } => format!("<td class=\"pivot-row-number\">{}</td>", text),
        PivotTableCell::Title(c) => {
            let mut class = String::from("pivot-title");
            if c.is_empty {
                class.push_str(" pivot-title-empty");
            }
            if c.is_header_title {
                class.push_str(" pivot-title-header");
            }
            format!(
                "<th class=\"{}\" data-level=\"{}\"{}>{}</th>",
                class, c.level, title, text
            )
        }
        PivotTableCell::Header(c) => format!(
            "<th class=\"pivot-header\" data-level=\"{}\"{}>{}</th>",
            c.level, title, text
        ),
        PivotTableCell::Index(_) => format!("<td class=\"pivot-index\"{}>{}</td>", title, text),
        PivotTableCell::Value(c) => {
            let style = match &c.formatting {
                Some(f) => {
                    let mut style = format!("background-color: {};", escape_html(&f.background_color));
                    if let Some(font) = &f.font_color {
                        style.push_str(&format!(" color: {};", escape_html(font)));
                    }
                    format!(" style=\"{}\"", style)
                }
                None => String::new(),
            };
            format!("<td class=\"pivot-value\"{}{}>{}</td>", style, title, text)
        }
    }
}

/// Renders the view as a complete `<table>` element.
pub fn to_html(view: &PivotTableView) -> String {
    let mut out = String::from("<table class=\"pivot-table\">");

    out.push_str("<thead>");
    for row in &view.header_rows {
        out.push_str("<tr>");
        for cell in &row.cells {
            out.push_str(&cell_markup(cell));
        }
        out.push_str("</tr>");
    }
    out.push_str("</thead>");

    out.push_str("<tbody>");
    for row in &view.body_rows {
        out.push_str("<tr>");
        for cell in &row.cells {
            out.push_str(&cell_markup(cell));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody>");

    out.push_str("</table>");
    out
}
